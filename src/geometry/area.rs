use super::{Scalar, Vec3, centroid};
use crate::{
    container::VertexAttribute,
    element::{Face, Vertex},
    error::Error,
    mesh::Mesh,
};

pub fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> Scalar {
    0.5 * (b - a).cross(c - a).length()
}

/**
 * Area of the face `f`. Triangles are measured directly, larger faces as a
 * fan of triangles around their centroid, which is exact for convex and
 * star-shaped planar faces.
 */
pub fn area<M: Mesh>(mesh: &M, f: Face, position: &VertexAttribute<Vec3>) -> Result<Scalar, Error> {
    let verts = mesh.incident_vertices(f);
    let p = |v: Vertex| -> Result<Vec3, Error> { mesh.value(position, v).copied() };
    if verts.len() == 3 {
        return Ok(triangle_area(p(verts[0])?, p(verts[1])?, p(verts[2])?));
    }
    let center = centroid(mesh, f, position)?;
    let mut total = 0.0;
    for (i, v) in verts.iter().enumerate() {
        let next = verts[(i + 1) % verts.len()];
        total += triangle_area(center, p(*v)?, p(next)?);
    }
    Ok(total)
}

/// Sum of the areas of the faces visited by `foreach_cell`, and their number.
fn sum_areas<M: Mesh>(mesh: &M, position: &VertexAttribute<Vec3>) -> Result<(Scalar, usize), Error> {
    let mut sum = 0.0;
    let mut count = 0;
    mesh.try_foreach_cell(|f: Face| {
        sum += area(mesh, f, position)?;
        count += 1;
        Ok(())
    })?;
    Ok((sum, count))
}

pub fn total_area<M: Mesh>(mesh: &M, position: &VertexAttribute<Vec3>) -> Result<Scalar, Error> {
    sum_areas(mesh, position).map(|(sum, _)| sum)
}

/// Average area of the faces of `mesh`. A mesh without faces has a mean area
/// of zero.
pub fn mean_area<M: Mesh>(mesh: &M, position: &VertexAttribute<Vec3>) -> Result<Scalar, Error> {
    let (sum, count) = sum_areas(mesh, position)?;
    Ok(if count == 0 { 0.0 } else { sum / count as Scalar })
}

/// Same as [`mean_area`], with the faces split across the rayon thread pool.
#[cfg(feature = "parallel")]
pub fn parallel_mean_area<M>(mesh: &M, position: &VertexAttribute<Vec3>) -> Result<Scalar, Error>
where
    M: Mesh + Sync,
{
    let (sum, count) = crate::parallel::parallel_fold_cells(
        mesh,
        || Ok((0.0, 0usize)),
        |acc: Result<(Scalar, usize), Error>, f: Face| {
            let (sum, count) = acc?;
            Ok((sum + area(mesh, f, position)?, count + 1))
        },
        |a, b| {
            let (s0, n0) = a?;
            let (s1, n1) = b?;
            Ok((s0 + s1, n0 + n1))
        },
    )?;
    log::trace!("Mean area over {count} faces.");
    Ok(if count == 0 { 0.0 } else { sum / count as Scalar })
}
