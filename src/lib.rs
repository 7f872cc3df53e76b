/*!
Attribute indexing and cell traversal for dart based combinatorial maps.

# Overview

+ The topology is stored in a [`CMap2`], an oriented combinatorial 2-map. Its
  atomic elements are [`Dart`]s, and every cell ([`Vertex`], [`Edge`],
  [`Face`], [`Volume`]) is an orbit of darts. Any dart of the orbit can be
  used as a handle to the cell. Holes are closed by boundary faces, which are
  never reported by traversals.

+ Data is attached to cells through attributes. Each cell type has its own
  [`AttributeContainer`], a set of named columns sharing the same rows. When
  the first attribute is added on a cell type, that cell type becomes
  *embedded*: every cell gets a row index of its own, and new cells get one
  as they are created. Indices released by removed cells are reused.

+ [`Mesh`] is the read interface used by algorithms. It is implemented by
  the map itself and by [`CellFilter`], a view that hides cells from
  traversals without touching the map. Traversals visit each cell once, in a
  stable order, and can be stopped early by returning `false`.

+ Built on top of these, the [`geometry`] module computes areas, centroids,
  normals and ear triangulations from a position attribute, and
  [`MeshRender`] builds the index tables needed to draw a mesh.

Cells are traversed and indexed through shared references, while every
operation that creates cells, indices or attributes needs a mutable
reference to the map. With the `parallel` feature, which is enabled by
default, cells can also be processed on the rayon thread pool.

```
use dartmap::{CMap2, Face, Mesh, geometry};

let (map, position) = CMap2::unit_box().unwrap();
assert_eq!(map.nb_cells::<Face>(), 6);
let area = geometry::mean_area(&map, &position).unwrap();
assert!((area - 1.0).abs() < 1e-12);
```
*/

mod check;
mod cmap2;
mod container;
mod element;
mod embedding;
mod error;
mod iterator;
mod macros;
mod marker;
mod mesh;
mod primitive;
mod render;
mod traversal;
mod view;

pub mod geometry;
#[cfg(feature = "parallel")]
pub mod parallel;

pub use cmap2::CMap2;
pub use container::{
    Attribute, AttributeContainer, AttributeData, EdgeAttribute, FaceAttribute, VertexAttribute,
    VolumeAttribute,
};
pub use element::{CellType, Dart, Edge, Face, Orbit, Vertex, Volume};
pub use error::Error;
pub use mesh::Mesh;
pub use render::{DrawingType, IndexBuffer, MeshRender};
pub use view::CellFilter;
