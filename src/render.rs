use std::{fmt::Display, time::Instant};

use crate::{
    container::VertexAttribute,
    element::{Edge, Face, Vertex, Volume},
    error::Error,
    geometry::{Vec3, append_ear_triangulation, append_fan_triangulation},
    mesh::Mesh,
};

/// The index tables a [`MeshRender`] can build.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum DrawingType {
    /// One vertex index per vertex.
    Points,
    /// Two vertex indices per edge.
    Lines,
    /// Three vertex indices per triangle. Faces are triangulated.
    Triangles,
    /// Three vertex indices and the volume index, per triangle of each volume.
    VolumesFaces,
    /// Two vertex indices and the volume index, per edge of each volume.
    VolumesEdges,
    /// The vertex index and the volume index, per vertex of each volume.
    VolumesVertices,
    /// The index of each edge, in the order of [`Lines`](Self::Lines).
    IndexEdges,
    /// The index of the face of each triangle of [`Triangles`](Self::Triangles).
    IndexFaces,
    /// The index of each volume.
    IndexVolumes,
}

const NUM_PRIMITIVES: usize = 9;

impl DrawingType {
    pub const ALL: [DrawingType; NUM_PRIMITIVES] = [
        DrawingType::Points,
        DrawingType::Lines,
        DrawingType::Triangles,
        DrawingType::VolumesFaces,
        DrawingType::VolumesEdges,
        DrawingType::VolumesVertices,
        DrawingType::IndexEdges,
        DrawingType::IndexFaces,
        DrawingType::IndexVolumes,
    ];

    fn slot(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            DrawingType::Points => "POINTS",
            DrawingType::Lines => "LINES",
            DrawingType::Triangles => "TRIANGLES",
            DrawingType::VolumesFaces => "VOLUMES_FACES",
            DrawingType::VolumesEdges => "VOLUMES_EDGES",
            DrawingType::VolumesVertices => "VOLUMES_VERTICES",
            DrawingType::IndexEdges => "INDEX_EDGES",
            DrawingType::IndexFaces => "INDEX_FACES",
            DrawingType::IndexVolumes => "INDEX_VOLUMES",
        }
    }
}

impl Display for DrawingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A named table of indices, ready to be uploaded as an element buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexBuffer {
    name: &'static str,
    indices: Vec<u32>,
}

impl IndexBuffer {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/**
 * Builds the index tables needed to draw a mesh.
 *
 * Vertex indices come from the vertex embedding, so the vertices must be
 * indexed, typically by a position attribute. Edge, face and volume indices
 * come from their embeddings when they exist. Otherwise cells are numbered
 * in traversal order, which is the same on every pass over an unchanged
 * mesh.
 */
pub struct MeshRender {
    buffers: [IndexBuffer; NUM_PRIMITIVES],
    uptodate: [bool; NUM_PRIMITIVES],
}

impl Default for MeshRender {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshRender {
    pub fn new() -> Self {
        MeshRender {
            buffers: DrawingType::ALL.map(|prim| IndexBuffer {
                name: prim.name(),
                indices: Vec::new(),
            }),
            uptodate: [false; NUM_PRIMITIVES],
        }
    }

    pub fn is_primitive_uptodate(&self, prim: DrawingType) -> bool {
        self.uptodate[prim.slot()]
    }

    /// Mark the table of `prim` as needing a rebuild, e.g. after the mesh
    /// changed. The current indices are kept until then.
    pub fn set_primitive_dirty(&mut self, prim: DrawingType) {
        self.uptodate[prim.slot()] = false;
    }

    pub fn buffer(&self, prim: DrawingType) -> &IndexBuffer {
        &self.buffers[prim.slot()]
    }

    pub fn indices(&self, prim: DrawingType) -> &[u32] {
        self.buffers[prim.slot()].indices()
    }

    fn update(&mut self, prim: DrawingType, indices: Vec<u32>) {
        self.uptodate[prim.slot()] = true;
        self.buffers[prim.slot()].indices = indices;
    }

    /**
     * Rebuild the table of `prim`, along with the tables computed in the same
     * pass: lines with edge indices, triangles with face indices, and all
     * the volume tables together.
     *
     * Faces with more than three sides are ear triangulated when `position`
     * is given, and split as a fan otherwise.
     */
    pub fn init_primitives<M: Mesh>(
        &mut self,
        mesh: &M,
        prim: DrawingType,
        position: Option<&VertexAttribute<Vec3>>,
    ) -> Result<(), Error> {
        let start = Instant::now();
        let mut indices = Vec::with_capacity(1024);
        let mut emb = Vec::with_capacity(1024);
        match prim {
            DrawingType::Points => {
                init_points(mesh, &mut indices)?;
                self.update(DrawingType::Points, indices);
            }
            DrawingType::Lines | DrawingType::IndexEdges => {
                init_lines(mesh, &mut indices, &mut emb)?;
                self.update(DrawingType::Lines, indices);
                self.update(DrawingType::IndexEdges, emb);
            }
            DrawingType::Triangles | DrawingType::IndexFaces => {
                init_triangles(mesh, position, &mut indices, &mut emb)?;
                self.update(DrawingType::Triangles, indices);
                self.update(DrawingType::IndexFaces, emb);
            }
            DrawingType::VolumesFaces
            | DrawingType::VolumesEdges
            | DrawingType::VolumesVertices
            | DrawingType::IndexVolumes => {
                let mut edges = Vec::with_capacity(1024);
                let mut verts = Vec::with_capacity(1024);
                init_volumes(mesh, position, &mut indices, &mut edges, &mut verts, &mut emb)?;
                self.update(DrawingType::VolumesFaces, indices);
                self.update(DrawingType::VolumesEdges, edges);
                self.update(DrawingType::VolumesVertices, verts);
                self.update(DrawingType::IndexVolumes, emb);
            }
        }
        log::debug!("Built {prim} indices in {:?}.", start.elapsed());
        Ok(())
    }
}

fn init_points<M: Mesh>(mesh: &M, indices: &mut Vec<u32>) -> Result<(), Error> {
    mesh.try_foreach_cell(|v: Vertex| {
        indices.push(mesh.index_of(v)?);
        Ok(())
    })
}

fn init_lines<M: Mesh>(mesh: &M, indices: &mut Vec<u32>, emb_edge: &mut Vec<u32>) -> Result<(), Error> {
    let emb = mesh.is_indexed::<Edge>();
    let mut i_e = 0;
    let mut verts = Vec::with_capacity(2);
    mesh.try_foreach_cell(|e: Edge| {
        verts.clear();
        mesh.append_incident_vertices(e, &mut verts);
        for v in verts.iter() {
            indices.push(mesh.index_of(*v)?);
        }
        emb_edge.push(if emb { mesh.index_of(e)? } else { i_e });
        i_e += 1;
        Ok(())
    })
}

/// Appends the triangles of `f`, calling `on_triangle` after each of them.
fn append_face_triangles<M, F>(
    mesh: &M,
    f: Face,
    position: Option<&VertexAttribute<Vec3>>,
    verts: &mut Vec<Vertex>,
    table: &mut Vec<u32>,
    mut on_triangle: F,
) -> Result<(), Error>
where
    M: Mesh,
    F: FnMut(&mut Vec<u32>),
{
    verts.clear();
    mesh.append_incident_vertices(f, verts);
    if verts.len() == 3 {
        for v in verts.iter() {
            table.push(mesh.index_of(*v)?);
        }
        on_triangle(table);
        return Ok(());
    }
    match position {
        Some(position) => append_ear_triangulation(mesh, f, position, table, on_triangle),
        None => append_fan_triangulation(mesh, f, table, on_triangle),
    }
}

fn init_triangles<M: Mesh>(
    mesh: &M,
    position: Option<&VertexAttribute<Vec3>>,
    indices: &mut Vec<u32>,
    emb_face: &mut Vec<u32>,
) -> Result<(), Error> {
    let emb = mesh.is_indexed::<Face>();
    let mut i_f = 0;
    let mut verts = Vec::new();
    mesh.try_foreach_cell(|f: Face| {
        let id = if emb { mesh.index_of(f)? } else { i_f };
        i_f += 1;
        append_face_triangles(mesh, f, position, &mut verts, indices, |_| emb_face.push(id))
    })
}

fn init_volumes<M: Mesh>(
    mesh: &M,
    position: Option<&VertexAttribute<Vec3>>,
    faces: &mut Vec<u32>,
    edges: &mut Vec<u32>,
    verts: &mut Vec<u32>,
    emb_vol: &mut Vec<u32>,
) -> Result<(), Error> {
    let emb = mesh.is_indexed::<Volume>();
    let mut i_vol = 0;
    let mut corners = Vec::new();
    mesh.try_foreach_cell(|vol: Volume| {
        let id = if emb { mesh.index_of(vol)? } else { i_vol };
        i_vol += 1;
        for f in mesh.incident::<Face, _>(vol) {
            append_face_triangles(mesh, f, position, &mut corners, faces, |t| t.push(id))?;
        }
        for e in mesh.incident::<Edge, _>(vol) {
            corners.clear();
            mesh.append_incident_vertices(e, &mut corners);
            for v in corners.iter() {
                edges.push(mesh.index_of(*v)?);
            }
            edges.push(id);
        }
        for v in mesh.incident::<Vertex, _>(vol) {
            verts.push(mesh.index_of(v)?);
            verts.push(id);
        }
        emb_vol.push(id);
        Ok(())
    })
}
