/*!
Geometric queries on meshes whose vertices carry a position attribute.

Positions are read through a [`VertexAttribute<Vec3>`](crate::VertexAttribute),
so these functions work the same on a map and on any of its views.
*/

mod area;
mod centroid;
mod ear_triangulation;
mod normal;

/// Position and vector type used by the geometry functions.
pub type Vec3 = glam::DVec3;

/// Scalar type used for areas and lengths.
pub type Scalar = f64;

#[cfg(feature = "parallel")]
pub use area::parallel_mean_area;
pub use area::{area, mean_area, total_area, triangle_area};
pub use centroid::centroid;
pub use ear_triangulation::{append_ear_triangulation, append_fan_triangulation, ear_triangles};
pub use normal::{face_normal, newell_normal};
