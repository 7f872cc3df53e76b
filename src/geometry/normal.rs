use super::Vec3;
use crate::{
    container::VertexAttribute,
    element::{Face, Vertex},
    error::Error,
    mesh::Mesh,
};

/// Unit normal of the polygon with the given corners, computed with Newell's
/// method. Degenerate polygons get a zero normal.
pub fn newell_normal(corners: &[Vec3]) -> Vec3 {
    if corners.len() < 3 {
        return Vec3::ZERO;
    }
    let mut n = Vec3::ZERO;
    for (i, pc) in corners.iter().enumerate() {
        let pn = corners[(i + 1) % corners.len()];
        let (a, b) = (*pc - pn, *pc + pn);
        n.x += a.y * b.z;
        n.y += a.z * b.x;
        n.z += a.x * b.y;
    }
    n.normalize_or_zero()
}

pub(crate) fn corner_positions(
    mesh: &impl Mesh,
    verts: &[Vertex],
    position: &VertexAttribute<Vec3>,
    out: &mut Vec<Vec3>,
) -> Result<(), Error> {
    out.clear();
    for v in verts {
        out.push(*mesh.value(position, *v)?);
    }
    Ok(())
}

pub fn face_normal<M: Mesh>(mesh: &M, f: Face, position: &VertexAttribute<Vec3>) -> Result<Vec3, Error> {
    let verts = mesh.incident_vertices(f);
    let mut corners = Vec::with_capacity(verts.len());
    corner_positions(mesh, &verts, position, &mut corners)?;
    Ok(newell_normal(&corners))
}

#[cfg(test)]
mod test {
    use super::{face_normal, newell_normal};
    use crate::{cmap2::CMap2, element::Face, error::Error, geometry::Vec3, mesh::Mesh};

    #[test]
    fn t_box_normals_point_outwards() {
        let (map, position) = CMap2::unit_box().expect("Cannot create box");
        let expected = [
            Vec3::NEG_Z,
            Vec3::NEG_Y,
            Vec3::X,
            Vec3::Y,
            Vec3::NEG_X,
            Vec3::Z,
        ];
        for (f, n) in map.cells::<Face>().into_iter().zip(expected) {
            let normal = face_normal(&map, f, &position).expect("Cannot compute normal");
            assert!(normal.abs_diff_eq(n, 1e-12), "{normal} != {n}");
        }
    }

    #[test]
    fn t_degenerate_normal() {
        assert_eq!(newell_normal(&[Vec3::ZERO, Vec3::X]), Vec3::ZERO);
        assert_eq!(
            newell_normal(&[Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0)]),
            Vec3::ZERO
        );
    }

    #[test]
    fn t_removed_position() {
        let (mut map, position) = CMap2::unit_box().expect("Cannot create box");
        let f = map.cells::<Face>()[0];
        let (_, other) = CMap2::unit_box().expect("Cannot create box");
        assert_eq!(face_normal(&map, f, &other), Err(Error::ForeignAttribute));
        map.remove(position).expect("Cannot remove attribute");
        assert_eq!(face_normal(&map, f, &position), Err(Error::RemovedAttribute));
    }
}
