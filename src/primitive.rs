use crate::{
    cmap2::CMap2,
    container::VertexAttribute,
    element::Vertex,
    error::Error,
    geometry::{Scalar, Vec3},
};

impl CMap2 {
    /**
     * Builds a map from a polygon soup, like [`from_polygons`](Self::from_polygons),
     * and stores the given points in a vertex attribute called `"position"`.
     * Points no face refers to are dropped.
     */
    pub fn from_polygons_with_positions<F>(
        points: &[Vec3],
        faces: &[F],
    ) -> Result<(Self, VertexAttribute<Vec3>), Error>
    where
        F: AsRef<[u32]>,
    {
        let (mut map, verts) = Self::from_polygons(points.len(), faces)?;
        let position = map.add_attribute::<Vertex, Vec3>("position")?;
        for (v, p) in verts.iter().zip(points.iter()) {
            if let Some(v) = v {
                map.set_value(&position, *v, *p)?;
            }
        }
        Ok((map, position))
    }

    /// Makes a box with the following topology, spanning from the min point to
    /// the max point.
    ///
    ///  ```text
    ///       7-----------6
    ///      /|          /|
    ///     / |         / |
    ///    4-----------5  |
    ///    |  |        |  |
    ///    |  3--------|--2
    ///    | /         | /
    ///    |/          |/
    ///    0-----------1
    ///  ```
    pub fn quad_box(min: Vec3, max: Vec3) -> Result<(Self, VertexAttribute<Vec3>), Error> {
        const BOX_POS: [(bool, bool, bool); 8] = [
            (false, false, false),
            (true, false, false),
            (true, true, false),
            (false, true, false),
            (false, false, true),
            (true, false, true),
            (true, true, true),
            (false, true, true),
        ];
        const BOX_IDX: [[u32; 4]; 6] = [
            [0, 3, 2, 1],
            [0, 1, 5, 4],
            [1, 2, 6, 5],
            [2, 3, 7, 6],
            [3, 0, 4, 7],
            [4, 5, 6, 7],
        ];
        let points = BOX_POS.map(|(xf, yf, zf)| {
            Vec3::new(
                if xf { max.x } else { min.x },
                if yf { max.y } else { min.y },
                if zf { max.z } else { min.z },
            )
        });
        Self::from_polygons_with_positions(&points, &BOX_IDX)
    }

    /// Create a box with quadrilateral faces, of size 1, spanning from the
    /// origin to (1, 1, 1).
    pub fn unit_box() -> Result<(Self, VertexAttribute<Vec3>), Error> {
        Self::quad_box(Vec3::ZERO, Vec3::ONE)
    }

    /// Regular tetrahedron inscribed in the sphere of the given radius,
    /// centered at the origin.
    pub fn tetrahedron(radius: Scalar) -> Result<(Self, VertexAttribute<Vec3>), Error> {
        let a = radius / 3.0f64.sqrt();
        let points = [
            Vec3::new(a, a, a),
            Vec3::new(a, -a, -a),
            Vec3::new(-a, a, -a),
            Vec3::new(-a, -a, a),
        ];
        let faces: [[u32; 3]; 4] = [[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]];
        Self::from_polygons_with_positions(&points, &faces)
    }

    /// A single regular polygon in the XY plane, wound counter-clockwise, with
    /// its corners on the circle of the given radius.
    pub fn regular_polygon(
        nsides: usize,
        radius: Scalar,
    ) -> Result<(Self, VertexAttribute<Vec3>), Error> {
        let points: Vec<Vec3> = (0..nsides)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as Scalar / nsides as Scalar;
                Vec3::new(radius * angle.cos(), radius * angle.sin(), 0.0)
            })
            .collect();
        let face: Vec<u32> = (0..nsides as u32).collect();
        Self::from_polygons_with_positions(&points, &[face])
    }

    /// An open grid of `nx` by `ny` square quads of the given size in the XY
    /// plane, with a corner at the origin.
    pub fn quad_grid(
        nx: usize,
        ny: usize,
        size: Scalar,
    ) -> Result<(Self, VertexAttribute<Vec3>), Error> {
        let mut points = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..=ny {
            for i in 0..=nx {
                points.push(Vec3::new(i as Scalar * size, j as Scalar * size, 0.0));
            }
        }
        let index = |i: usize, j: usize| (j * (nx + 1) + i) as u32;
        let mut faces = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                faces.push([
                    index(i, j),
                    index(i + 1, j),
                    index(i + 1, j + 1),
                    index(i, j + 1),
                ]);
            }
        }
        Self::from_polygons_with_positions(&points, &faces)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        cmap2::CMap2,
        element::{Edge, Face, Vertex, Volume},
        error::Error,
        geometry::{Vec3, area, face_normal},
        macros::assert_scalar_eq,
        mesh::Mesh,
    };

    #[test]
    fn t_unit_box() {
        let (map, position) = CMap2::unit_box().expect("Cannot create box");
        assert_eq!(map.nb_cells::<Vertex>(), 8);
        assert_eq!(map.nb_cells::<Edge>(), 12);
        assert_eq!(map.nb_cells::<Face>(), 6);
        assert_eq!(map.nb_cells::<Volume>(), 1);
        for f in map.cells::<Face>() {
            assert_scalar_eq!(area(&map, f, &position).expect("Cannot compute area"), 1.0);
        }
        let sum: Vec3 = map
            .attribute_values(&position)
            .expect("Cannot read positions")
            .iter()
            .sum();
        assert!(sum.abs_diff_eq(Vec3::splat(4.0), 1e-12));
    }

    #[test]
    fn t_tetrahedron() {
        let (map, position) = CMap2::tetrahedron(1.0).expect("Cannot create tetrahedron");
        assert_eq!(map.nb_cells::<Vertex>(), 4);
        assert_eq!(map.nb_cells::<Edge>(), 6);
        assert_eq!(map.nb_cells::<Face>(), 4);
        assert!(map.darts().all(|d| !map.is_boundary(d)));
        let faces = map.cells::<Face>();
        let a0 = area(&map, faces[0], &position).expect("Cannot compute area");
        for f in faces {
            assert_scalar_eq!(area(&map, f, &position).expect("Cannot compute area"), a0);
            // Outward normals point away from the center.
            let n = face_normal(&map, f, &position).expect("Cannot compute normal");
            let v = map.incident_vertices(f)[0];
            let p = map.value(&position, v).expect("Cannot read position");
            assert!(n.dot(*p) > 0.0);
        }
    }

    #[test]
    fn t_regular_polygon() {
        let (map, position) = CMap2::regular_polygon(6, 1.0).expect("Cannot create polygon");
        let f = map.cells::<Face>()[0];
        assert_eq!(map.codegree(f), 6);
        // Six equilateral triangles of side 1.
        assert_scalar_eq!(
            area(&map, f, &position).expect("Cannot compute area"),
            1.5 * 3.0f64.sqrt()
        );
        assert_eq!(
            CMap2::regular_polygon(2, 1.0).err(),
            Some(Error::InvalidFaceSize(2))
        );
    }

    #[test]
    fn t_quad_grid() {
        let (map, _) = CMap2::quad_grid(3, 2, 1.0).expect("Cannot create grid");
        assert_eq!(map.nb_cells::<Vertex>(), 12);
        assert_eq!(map.nb_cells::<Edge>(), 17);
        assert_eq!(map.nb_cells::<Face>(), 6);
        // One boundary face around the grid.
        assert_eq!(map.darts().filter(|d| map.is_boundary(*d)).count(), 10);
    }
}
