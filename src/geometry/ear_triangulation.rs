use super::{
    Vec3,
    normal::{corner_positions, newell_normal},
};
use crate::{container::VertexAttribute, element::Face, error::Error, mesh::Mesh};

fn append_fan(corners: &[usize], out: &mut Vec<[usize; 3]>) {
    for i in 1..corners.len().saturating_sub(1) {
        out.push([corners[0], corners[i], corners[i + 1]]);
    }
}

/// Whether `p` lies inside or on the triangle `abc`, seen along `normal`.
fn in_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3, normal: Vec3) -> bool {
    (b - a).cross(p - a).dot(normal) >= 0.0
        && (c - b).cross(p - b).dot(normal) >= 0.0
        && (a - c).cross(p - c).dot(normal) >= 0.0
}

fn is_ear(corners: &[Vec3], remaining: &[usize], i: usize, normal: Vec3) -> bool {
    let n = remaining.len();
    let (ia, ib, ic) = (remaining[(i + n - 1) % n], remaining[i], remaining[(i + 1) % n]);
    let (a, b, c) = (corners[ia], corners[ib], corners[ic]);
    // Reflex and flat corners are not ears.
    if (b - a).cross(c - b).dot(normal) <= 0.0 {
        return false;
    }
    remaining
        .iter()
        .filter(|j| **j != ia && **j != ib && **j != ic)
        .all(|j| !in_triangle(corners[*j], a, b, c, normal))
}

/**
 * Triangulate a simple polygon by ear clipping. Returns the triangles as
 * triples of corner indices, wound like the polygon.
 *
 * Ears are clipped in order of their position along the boundary. If the
 * polygon is degenerate, or no ear can be found because the polygon is not
 * simple, the remaining corners are triangulated as a fan.
 */
pub fn ear_triangles(corners: &[Vec3]) -> Vec<[usize; 3]> {
    let mut triangles = Vec::with_capacity(corners.len().saturating_sub(2));
    let mut remaining: Vec<usize> = (0..corners.len()).collect();
    let normal = newell_normal(corners);
    if normal == Vec3::ZERO {
        if corners.len() > 3 {
            log::warn!(
                "Polygon with {} corners has no normal, triangulating it as a fan.",
                corners.len()
            );
        }
        append_fan(&remaining, &mut triangles);
        return triangles;
    }
    while remaining.len() > 3 {
        let n = remaining.len();
        let Some(i) = (0..n).find(|i| is_ear(corners, &remaining, *i, normal)) else {
            log::warn!("No ear left among {n} corners, triangulating them as a fan.");
            break;
        };
        triangles.push([remaining[(i + n - 1) % n], remaining[i], remaining[(i + 1) % n]]);
        remaining.remove(i);
    }
    append_fan(&remaining, &mut triangles);
    triangles
}

/**
 * Append the vertex indices of the triangles of `f` to `table`, three per
 * triangle, calling `on_triangle` with the table after each one. Faces are
 * triangulated by ear clipping, so concave faces are handled.
 */
pub fn append_ear_triangulation<M, F>(
    mesh: &M,
    f: Face,
    position: &VertexAttribute<Vec3>,
    table: &mut Vec<u32>,
    mut on_triangle: F,
) -> Result<(), Error>
where
    M: Mesh,
    F: FnMut(&mut Vec<u32>),
{
    let verts = mesh.incident_vertices(f);
    let indices = verts
        .iter()
        .map(|v| mesh.index_of(*v))
        .collect::<Result<Vec<_>, _>>()?;
    let mut corners = Vec::with_capacity(verts.len());
    corner_positions(mesh, &verts, position, &mut corners)?;
    for [a, b, c] in ear_triangles(&corners) {
        table.extend([indices[a], indices[b], indices[c]]);
        on_triangle(table);
    }
    Ok(())
}

/// Same as [`append_ear_triangulation`], without positions: faces are split
/// into a fan around their first vertex.
pub fn append_fan_triangulation<M, F>(
    mesh: &M,
    f: Face,
    table: &mut Vec<u32>,
    mut on_triangle: F,
) -> Result<(), Error>
where
    M: Mesh,
    F: FnMut(&mut Vec<u32>),
{
    let indices = mesh
        .incident_vertices(f)
        .iter()
        .map(|v| mesh.index_of(*v))
        .collect::<Result<Vec<_>, _>>()?;
    for i in 1..indices.len().saturating_sub(1) {
        table.extend([indices[0], indices[i], indices[i + 1]]);
        on_triangle(table);
    }
    Ok(())
}
