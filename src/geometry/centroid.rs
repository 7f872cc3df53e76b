use super::Vec3;
use crate::{container::VertexAttribute, element::CellType, error::Error, mesh::Mesh};

/// Average position of the vertices of `c`.
pub fn centroid<M, C>(mesh: &M, c: C, position: &VertexAttribute<Vec3>) -> Result<Vec3, Error>
where
    M: Mesh,
    C: CellType,
{
    let mut sum = Vec3::ZERO;
    let mut count = 0usize;
    let mut result = Ok(());
    mesh.foreach_incident_vertex(c, |v| match mesh.value(position, v) {
        Ok(p) => {
            sum += *p;
            count += 1;
            true
        }
        Err(e) => {
            result = Err(e);
            false
        }
    });
    result?;
    Ok(if count == 0 {
        Vec3::ZERO
    } else {
        sum / count as f64
    })
}
