use std::collections::HashMap;

use crate::{
    container::AttributeContainer,
    element::{CellType, Dart, Face, NUM_ORBITS, Orbit, Vertex, Volume},
    error::Error,
    iterator,
    marker::DartMarker,
};

/// Per dart table of cell indices for one orbit.
pub(crate) enum Embedding {
    Unembedded,
    Embedded(Vec<Option<u32>>),
}

/**
 * A closed, oriented combinatorial 2-map.
 *
 * Faces are cycles of `phi1`, and `phi2` pairs the two darts of every edge.
 * Holes are filled with boundary faces, so `phi2` has no fixed point among
 * the live darts once a construction step returns. Boundary darts are flagged
 * and never stand in for a face.
 *
 * Each orbit can be embedded, in which case every live dart remembers the
 * index of its cell in the attribute container of that orbit.
 */
pub struct CMap2 {
    phi1: Vec<Dart>,
    phi_1: Vec<Dart>,
    phi2: Vec<Dart>,
    boundary: Vec<bool>,
    live: Vec<bool>,
    free_darts: Vec<Dart>,
    pub(crate) embeddings: [Embedding; NUM_ORBITS],
    pub(crate) containers: [AttributeContainer; NUM_ORBITS],
}

impl CMap2 {
    pub fn new() -> Self {
        CMap2 {
            phi1: Vec::new(),
            phi_1: Vec::new(),
            phi2: Vec::new(),
            boundary: Vec::new(),
            live: Vec::new(),
            free_darts: Vec::new(),
            embeddings: std::array::from_fn(|_| Embedding::Unembedded),
            containers: Orbit::ALL.map(AttributeContainer::new),
        }
    }

    /// Number of live darts, boundary darts included.
    pub fn nb_darts(&self) -> usize {
        self.live.len() - self.free_darts.len()
    }

    /// Number of dart slots, including removed darts waiting to be reused.
    pub fn dart_capacity(&self) -> usize {
        self.live.len()
    }

    /// Live darts in increasing index order.
    pub fn darts(&self) -> impl Iterator<Item = Dart> + use<'_> {
        self.live
            .iter()
            .enumerate()
            .filter(|(_, live)| **live)
            .map(|(i, _)| Dart::from(i as u32))
    }

    pub fn is_live(&self, d: Dart) -> bool {
        self.live.get(d.index() as usize).copied().unwrap_or(false)
    }

    pub fn phi1(&self, d: Dart) -> Dart {
        self.phi1[d.index() as usize]
    }

    pub fn phi_1(&self, d: Dart) -> Dart {
        self.phi_1[d.index() as usize]
    }

    pub fn phi2(&self, d: Dart) -> Dart {
        self.phi2[d.index() as usize]
    }

    pub fn is_boundary(&self, d: Dart) -> bool {
        self.boundary[d.index() as usize]
    }

    pub fn face_darts(&self, d: Dart) -> impl Iterator<Item = Dart> + use<'_> {
        iterator::face_darts(self, d)
    }

    pub fn vertex_darts(&self, d: Dart) -> impl Iterator<Item = Dart> + use<'_> {
        iterator::vertex_darts(self, d)
    }

    /**
     * Calls `f` on every dart of the orbit of `d`, stopping early when `f`
     * returns false. Face and vertex orbits are visited in cycle order
     * starting at `d`.
     */
    pub fn foreach_dart_of_orbit<F>(&self, orbit: Orbit, d: Dart, mut f: F)
    where
        F: FnMut(Dart) -> bool,
    {
        match orbit {
            Orbit::Vertex => {
                for x in iterator::vertex_darts(self, d) {
                    if !f(x) {
                        return;
                    }
                }
            }
            Orbit::Edge => {
                for x in iterator::edge_darts(self, d) {
                    if !f(x) {
                        return;
                    }
                }
            }
            Orbit::Face => {
                for x in iterator::face_darts(self, d) {
                    if !f(x) {
                        return;
                    }
                }
            }
            Orbit::Volume => {
                let mut marker = DartMarker::dense(self);
                let mut stack = vec![d];
                marker.mark(d);
                while let Some(x) = stack.pop() {
                    if !f(x) {
                        return;
                    }
                    for y in [self.phi1(x), self.phi2(x)] {
                        if !marker.mark(y) {
                            stack.push(y);
                        }
                    }
                }
            }
        }
    }

    /// Whether the handles `a` and `b` refer to the same cell.
    pub fn same_cell<C: CellType>(&self, a: C, b: C) -> bool {
        let mut found = false;
        self.foreach_dart_of_orbit(C::ORBIT, a.dart(), |x| {
            found = x == b.dart();
            !found
        });
        found
    }

    pub(crate) fn orbit_darts(&self, orbit: Orbit, d: Dart, out: &mut Vec<Dart>) {
        out.clear();
        self.foreach_dart_of_orbit(orbit, d, |x| {
            out.push(x);
            true
        });
    }

    fn add_dart(&mut self) -> Dart {
        let d = match self.free_darts.pop() {
            Some(d) => d,
            None => {
                let d = Dart::from(self.live.len() as u32);
                self.phi1.push(d);
                self.phi_1.push(d);
                self.phi2.push(d);
                self.boundary.push(false);
                self.live.push(false);
                for emb in self.embeddings.iter_mut() {
                    if let Embedding::Embedded(table) = emb {
                        table.push(None);
                    }
                }
                d
            }
        };
        let i = d.index() as usize;
        self.phi1[i] = d;
        self.phi_1[i] = d;
        self.phi2[i] = d;
        self.boundary[i] = false;
        self.live[i] = true;
        for emb in self.embeddings.iter_mut() {
            if let Embedding::Embedded(table) = emb {
                table[i] = None;
            }
        }
        d
    }

    fn remove_dart(&mut self, d: Dart) {
        let i = d.index() as usize;
        self.live[i] = false;
        for emb in self.embeddings.iter_mut() {
            if let Embedding::Embedded(table) = emb {
                table[i] = None;
            }
        }
        self.free_darts.push(d);
    }

    fn phi1_sew(&mut self, d: Dart, e: Dart) {
        let f = self.phi1(d);
        let g = self.phi1(e);
        self.phi1[d.index() as usize] = g;
        self.phi_1[g.index() as usize] = d;
        self.phi1[e.index() as usize] = f;
        self.phi_1[f.index() as usize] = e;
    }

    fn phi2_sew(&mut self, d: Dart, e: Dart) {
        self.phi2[d.index() as usize] = e;
        self.phi2[e.index() as usize] = d;
    }

    /// Creates a cycle of `size` darts linked by `phi1`, without any `phi2`.
    fn add_cycle(&mut self, size: usize) -> Dart {
        let first = self.add_dart();
        let mut prev = first;
        for _ in 1..size {
            let d = self.add_dart();
            self.phi1[prev.index() as usize] = d;
            self.phi_1[d.index() as usize] = prev;
            prev = d;
        }
        self.phi1[prev.index() as usize] = first;
        self.phi_1[first.index() as usize] = prev;
        first
    }

    /**
     * Fills the hole bordered by `d` with a boundary face and returns the
     * boundary dart sewn to `d`. `d` must be a fixed point of `phi2`.
     */
    fn close_hole(&mut self, d: Dart) -> Dart {
        let first = self.add_dart();
        self.boundary[first.index() as usize] = true;
        self.phi2_sew(d, first);
        let mut d_next = d;
        loop {
            let mut d_phi1;
            loop {
                d_phi1 = self.phi1(d_next);
                d_next = self.phi2(d_phi1);
                if d_next == d_phi1 || d_phi1 == d {
                    break;
                }
            }
            if d_phi1 == d {
                break;
            }
            let next = self.add_dart();
            self.boundary[next.index() as usize] = true;
            self.phi2_sew(d_phi1, next);
            self.phi1_sew(first, next);
        }
        first
    }

    /// Closes every hole of the map. Returns the number of holes closed.
    fn close_map(&mut self) -> usize {
        let mut nholes = 0;
        // Boundary darts appended while closing are already sewn.
        for i in 0..self.dart_capacity() {
            let d = Dart::from(i as u32);
            if self.live[i] && self.phi2(d) == d {
                self.close_hole(d);
                nholes += 1;
            }
        }
        log::trace!("Closed {nholes} holes.");
        nholes
    }

    /// Allocates a new index for the cell of `d`, if its orbit is embedded.
    fn new_orbit_embedding(&mut self, orbit: Orbit, d: Dart, scratch: &mut Vec<Dart>) {
        if !self.is_orbit_embedded(orbit) {
            return;
        }
        let index = self.containers[orbit.slot()].allocate_index();
        self.set_orbit_embedding(orbit, d, index, scratch);
    }

    /**
     * Adds an isolated polygon with `size` sides, closed by its own boundary
     * face. Every embedded orbit receives fresh indices for the new cells:
     * `size` vertices, `size` edges, one face and one volume.
     */
    pub fn add_face(&mut self, size: usize) -> Result<Face, Error> {
        if size < 3 {
            return Err(Error::InvalidFaceSize(size));
        }
        let d = self.add_cycle(size);
        self.close_hole(d);
        let mut scratch = Vec::new();
        let darts: Vec<Dart> = self.face_darts(d).collect();
        for x in darts.iter() {
            self.new_orbit_embedding(Orbit::Vertex, *x, &mut scratch);
            self.new_orbit_embedding(Orbit::Edge, *x, &mut scratch);
        }
        self.new_orbit_embedding(Orbit::Face, d, &mut scratch);
        self.new_orbit_embedding(Orbit::Volume, d, &mut scratch);
        log::trace!("Added face {d} with {size} sides.");
        Ok(Face::from_dart(d))
    }

    /**
     * Removes a connected component and releases the indices of all its
     * embedded cells, so that the rows can be reused by later cells.
     */
    pub fn remove_volume(&mut self, vol: Volume) -> Result<(), Error> {
        let d = vol.dart();
        if !self.is_live(d) {
            return Err(Error::DeadCell(d.index()));
        }
        let mut darts = Vec::new();
        self.orbit_darts(Orbit::Volume, d, &mut darts);
        for orbit in Orbit::ALL {
            let Embedding::Embedded(table) = &self.embeddings[orbit.slot()] else {
                continue;
            };
            let mut indices: Vec<u32> = darts
                .iter()
                .filter_map(|x| table[x.index() as usize])
                .collect();
            indices.sort_unstable();
            indices.dedup();
            for i in indices {
                self.containers[orbit.slot()].release_index(i)?;
            }
        }
        for x in darts.iter() {
            self.remove_dart(*x);
        }
        log::debug!("Removed volume {d} with {} darts.", darts.len());
        Ok(())
    }

    /**
     * Builds a map from an indexed polygon soup. Faces sharing an edge must
     * traverse it in opposite directions. Holes are closed with boundary
     * faces.
     *
     * Returns the map and the vertex built for each input vertex, or `None`
     * for input vertices no face refers to.
     */
    pub fn from_polygons<F>(
        nb_vertices: usize,
        faces: &[F],
    ) -> Result<(Self, Vec<Option<Vertex>>), Error>
    where
        F: AsRef<[u32]>,
    {
        let mut map = CMap2::new();
        let mut vertex_dart: Vec<Option<Dart>> = vec![None; nb_vertices];
        let mut corners: Vec<usize> = vec![0; nb_vertices];
        let mut edges: HashMap<(u32, u32), Dart> = HashMap::new();
        let mut darts: Vec<Dart> = Vec::new();
        for face in faces {
            let face = face.as_ref();
            if face.len() < 3 {
                return Err(Error::InvalidFaceSize(face.len()));
            }
            for (i, &v) in face.iter().enumerate() {
                if v as usize >= nb_vertices {
                    return Err(Error::InvalidVertexIndex(v));
                }
                if face[..i].contains(&v) {
                    return Err(Error::RepeatedVertex(v));
                }
            }
            let first = map.add_cycle(face.len());
            darts.clear();
            darts.extend(map.face_darts(first));
            for (i, d) in darts.iter().enumerate() {
                let from = face[i];
                let to = face[(i + 1) % face.len()];
                if edges.insert((from, to), *d).is_some() {
                    return Err(Error::NonManifoldEdge(from, to));
                }
                vertex_dart[from as usize].get_or_insert(*d);
                corners[from as usize] += 1;
            }
        }
        for (&(from, to), &d) in edges.iter() {
            if let Some(&e) = edges.get(&(to, from)) {
                map.phi2_sew(d, e);
            }
        }
        map.close_map();
        // A vertex whose corners form more than one fan is pinched.
        for (v, d) in vertex_dart.iter().enumerate() {
            if let Some(d) = d {
                let ninterior = map.vertex_darts(*d).filter(|x| !map.is_boundary(*x)).count();
                if ninterior != corners[v] {
                    return Err(Error::NonManifoldVertex(v as u32));
                }
            }
        }
        log::debug!(
            "Built map with {} faces and {} darts.",
            faces.len(),
            map.nb_darts()
        );
        let vertices = vertex_dart
            .into_iter()
            .map(|d| d.map(Vertex::from_dart))
            .collect();
        Ok((map, vertices))
    }
}

impl Default for CMap2 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::CMap2;
    use crate::{
        element::{CellType, Dart, Edge, Face, Orbit, Vertex, Volume},
        error::Error,
        mesh::Mesh,
    };

    /// Six quads forming a closed box, with the vertex numbering of a unit cube.
    pub(crate) fn quad_box() -> (CMap2, Vec<Vertex>) {
        let faces: [[u32; 4]; 6] = [
            [0, 3, 2, 1],
            [0, 1, 5, 4],
            [1, 2, 6, 5],
            [2, 3, 7, 6],
            [3, 0, 4, 7],
            [4, 5, 6, 7],
        ];
        let (map, verts) = CMap2::from_polygons(8, &faces).expect("Cannot build box");
        (map, verts.into_iter().flatten().collect())
    }

    /// Four triangles around an apex, open at the bottom.
    pub(crate) fn open_pyramid() -> (CMap2, Vec<Vertex>) {
        let faces: [[u32; 3]; 4] = [[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]];
        let (map, verts) = CMap2::from_polygons(5, &faces).expect("Cannot build pyramid");
        (map, verts.into_iter().flatten().collect())
    }

    fn check_involutions(map: &CMap2) {
        for d in map.darts() {
            assert_eq!(map.phi_1(map.phi1(d)), d);
            assert_eq!(map.phi1(map.phi_1(d)), d);
            assert_ne!(map.phi2(d), d, "{d} is not sewn");
            assert_eq!(map.phi2(map.phi2(d)), d);
        }
    }

    #[test]
    fn t_add_face() {
        let mut map = CMap2::new();
        let f = map.add_face(5).expect("Cannot add face");
        assert_eq!(map.nb_darts(), 10);
        check_involutions(&map);
        assert_eq!(map.face_darts(f.dart()).count(), 5);
        assert!(map.face_darts(map.phi2(f.dart())).all(|d| map.is_boundary(d)));
        assert_eq!(map.add_face(2), Err(Error::InvalidFaceSize(2)));
    }

    #[test]
    fn t_quad_box() {
        let (map, verts) = quad_box();
        assert_eq!(verts.len(), 8);
        assert_eq!(map.nb_darts(), 24);
        assert!(map.darts().all(|d| !map.is_boundary(d)));
        check_involutions(&map);
        assert_eq!(map.nb_cells::<Vertex>(), 8);
        assert_eq!(map.nb_cells::<Edge>(), 12);
        assert_eq!(map.nb_cells::<Face>(), 6);
        assert_eq!(map.nb_cells::<Volume>(), 1);
        for v in verts {
            assert_eq!(map.vertex_darts(v.dart()).count(), 3);
        }
    }

    #[test]
    fn t_open_pyramid() {
        let (map, verts) = open_pyramid();
        check_involutions(&map);
        // 12 interior darts and a square boundary face.
        assert_eq!(map.nb_darts(), 16);
        assert_eq!(map.darts().filter(|d| map.is_boundary(*d)).count(), 4);
        assert_eq!(map.nb_cells::<Vertex>(), 5);
        assert_eq!(map.nb_cells::<Edge>(), 8);
        assert_eq!(map.nb_cells::<Face>(), 4);
        let apex = verts[4];
        assert_eq!(
            map.vertex_darts(apex.dart())
                .filter(|d| !map.is_boundary(*d))
                .count(),
            4
        );
    }

    #[test]
    fn t_unused_vertices() {
        let (map, verts) = CMap2::from_polygons(4, &[[0u32, 1, 2]]).expect("Cannot build");
        assert!(verts[3].is_none());
        assert_eq!(map.nb_cells::<Vertex>(), 3);
    }

    #[test]
    fn t_invalid_polygons() {
        assert_eq!(
            CMap2::from_polygons(3, &[vec![0u32, 1]]).err(),
            Some(Error::InvalidFaceSize(2))
        );
        assert_eq!(
            CMap2::from_polygons(3, &[[0u32, 1, 3]]).err(),
            Some(Error::InvalidVertexIndex(3))
        );
        assert_eq!(
            CMap2::from_polygons(3, &[[0u32, 1, 0]]).err(),
            Some(Error::RepeatedVertex(0))
        );
        assert_eq!(
            CMap2::from_polygons(4, &[[0u32, 1, 2], [0, 1, 3]]).err(),
            Some(Error::NonManifoldEdge(0, 1))
        );
        // Two triangles touching at a single vertex.
        assert_eq!(
            CMap2::from_polygons(5, &[[0u32, 1, 2], [0, 3, 4]]).err(),
            Some(Error::NonManifoldVertex(0))
        );
    }

    #[test]
    fn t_remove_volume_reuses_darts() {
        let mut map = CMap2::new();
        let f0 = map.add_face(3).expect("Cannot add face");
        let f1 = map.add_face(4).expect("Cannot add face");
        assert_eq!(map.nb_cells::<Volume>(), 2);
        map.remove_volume(Volume::from_dart(f0.dart()))
            .expect("Cannot remove volume");
        assert_eq!(map.nb_darts(), 8);
        assert!(!map.is_live(f0.dart()));
        assert_eq!(
            map.remove_volume(Volume::from_dart(f0.dart())),
            Err(Error::DeadCell(f0.dart().index()))
        );
        assert_eq!(map.cells::<Face>(), [f1]);
        let capacity = map.dart_capacity();
        map.add_face(3).expect("Cannot add face");
        assert_eq!(map.dart_capacity(), capacity);
        check_involutions(&map);
    }

    #[test]
    fn t_volume_orbit() {
        let mut map = CMap2::new();
        let f = map.add_face(4).expect("Cannot add face");
        map.add_face(3).expect("Cannot add face");
        let mut darts: Vec<Dart> = Vec::new();
        map.orbit_darts(Orbit::Volume, f.dart(), &mut darts);
        darts.sort();
        assert_eq!(darts, (0..8u32).map(Dart::from).collect::<Vec<_>>());
    }
}
