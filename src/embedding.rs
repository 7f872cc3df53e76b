use crate::{
    cmap2::{CMap2, Embedding},
    container::{Attribute, AttributeContainer, AttributeData},
    element::{CellType, Dart, Orbit},
    error::Error,
    mesh::Mesh,
};

impl CMap2 {
    pub fn is_orbit_embedded(&self, orbit: Orbit) -> bool {
        matches!(self.embeddings[orbit.slot()], Embedding::Embedded(_))
    }

    pub fn is_embedded<C: CellType>(&self) -> bool {
        self.is_orbit_embedded(C::ORBIT)
    }

    /**
     * Give every existing cell of type `C` an index of its own in the
     * attribute container of `C`. From then on, cells created by
     * [`add_face`](Self::add_face) are indexed as they appear.
     *
     * Fails with [`Error::AlreadyEmbedded`] if the cells are already indexed.
     */
    pub fn create_embedding<C: CellType>(&mut self) -> Result<(), Error> {
        let orbit = C::ORBIT;
        if self.is_orbit_embedded(orbit) {
            return Err(Error::AlreadyEmbedded(orbit));
        }
        self.embeddings[orbit.slot()] = Embedding::Embedded(vec![None; self.dart_capacity()]);
        let cells = self.cells::<C>();
        let mut scratch = Vec::new();
        for c in cells.iter() {
            let index = self.containers[orbit.slot()].allocate_index();
            self.set_orbit_embedding(orbit, c.dart(), index, &mut scratch);
        }
        log::debug!("Embedded {} {orbit} cells.", cells.len());
        Ok(())
    }

    /// Write `index` on every dart of the orbit of `d`.
    pub(crate) fn set_orbit_embedding(
        &mut self,
        orbit: Orbit,
        d: Dart,
        index: u32,
        scratch: &mut Vec<Dart>,
    ) {
        self.orbit_darts(orbit, d, scratch);
        if let Embedding::Embedded(table) = &mut self.embeddings[orbit.slot()] {
            for x in scratch.iter() {
                table[x.index() as usize] = Some(index);
            }
        }
    }

    /// The index of the cell of `orbit` containing the dart `d`.
    pub fn dart_embedding(&self, orbit: Orbit, d: Dart) -> Result<u32, Error> {
        match &self.embeddings[orbit.slot()] {
            Embedding::Unembedded => Err(Error::NotEmbedded(orbit)),
            Embedding::Embedded(table) => match table.get(d.index() as usize) {
                Some(Some(index)) => Ok(*index),
                _ => Err(Error::DeadCell(d.index())),
            },
        }
    }

    pub fn attribute_container(&self, orbit: Orbit) -> &AttributeContainer {
        &self.containers[orbit.slot()]
    }

    /**
     * Add a named attribute on the cells of type `C`. If the cells are not
     * indexed yet, they are embedded first, so the new column has one value
     * per existing cell, initialized with `T::default()`.
     */
    pub fn add_attribute<C, T>(&mut self, name: &str) -> Result<Attribute<C, T>, Error>
    where
        C: CellType,
        T: AttributeData,
    {
        let container = &self.containers[C::ORBIT.slot()];
        if container.attribute_names().any(|n| n == name) {
            return Err(Error::DuplicateName {
                orbit: C::ORBIT,
                name: name.to_string(),
            });
        }
        if !self.is_embedded::<C>() {
            self.create_embedding::<C>()?;
        }
        self.containers[C::ORBIT.slot()].add_attribute(name)
    }

    /// Remove the attribute called `name` from the cells of type `C`.
    pub fn remove_attribute<C: CellType>(&mut self, name: &str) -> Result<(), Error> {
        self.containers[C::ORBIT.slot()].remove_attribute(name)
    }

    pub fn remove<C, T>(&mut self, attr: Attribute<C, T>) -> Result<(), Error>
    where
        C: CellType,
    {
        self.containers[C::ORBIT.slot()].remove(attr)
    }

    pub fn value_mut<C, T>(&mut self, attr: &Attribute<C, T>, c: C) -> Result<&mut T, Error>
    where
        C: CellType,
        T: AttributeData,
    {
        let index = self.index_of(c)?;
        let values = self.containers[C::ORBIT.slot()].values_mut(attr)?;
        let len = values.len();
        values
            .get_mut(index as usize)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    pub fn set_value<C, T>(&mut self, attr: &Attribute<C, T>, c: C, value: T) -> Result<(), Error>
    where
        C: CellType,
        T: AttributeData,
    {
        *self.value_mut(attr, c)? = value;
        Ok(())
    }

    /// The whole column, indexed by cell index. Rows that are not allocated
    /// hold stale or default values.
    pub fn attribute_values_mut<C, T>(&mut self, attr: &Attribute<C, T>) -> Result<&mut [T], Error>
    where
        C: CellType,
        T: AttributeData,
    {
        self.containers[C::ORBIT.slot()].values_mut(attr)
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use crate::{
        cmap2::{
            CMap2,
            test::{open_pyramid, quad_box},
        },
        element::{CellType, Edge, Face, Orbit, Vertex, Volume},
        error::Error,
        mesh::Mesh,
    };

    fn check_embedding<C: CellType>(map: &CMap2) {
        let mut seen = HashSet::new();
        map.foreach_cell(|c: C| {
            let index = map.index_of(c).expect("Cell is not indexed");
            assert!(seen.insert(index), "index {index} is shared by two cells");
            assert!(map.attribute_container(C::ORBIT).is_valid_index(index));
            map.foreach_dart_of_orbit(C::ORBIT, c.dart(), |d| {
                if C::ORBIT != Orbit::Face || !map.is_boundary(d) {
                    assert_eq!(map.dart_embedding(C::ORBIT, d), Ok(index));
                }
                true
            });
            true
        });
        assert_eq!(
            seen.len(),
            map.attribute_container(C::ORBIT).nb_indices(),
            "dangling indices"
        );
    }

    #[test]
    fn t_create_embedding() {
        let (mut map, _) = quad_box();
        assert!(!map.is_embedded::<Vertex>());
        assert_eq!(
            map.index_of(map.cells::<Vertex>()[0]),
            Err(Error::NotEmbedded(Orbit::Vertex))
        );
        map.create_embedding::<Vertex>()
            .expect("Cannot embed vertices");
        map.create_embedding::<Edge>().expect("Cannot embed edges");
        map.create_embedding::<Face>().expect("Cannot embed faces");
        map.create_embedding::<Volume>()
            .expect("Cannot embed volumes");
        assert_eq!(
            map.create_embedding::<Face>(),
            Err(Error::AlreadyEmbedded(Orbit::Face))
        );
        check_embedding::<Vertex>(&map);
        check_embedding::<Edge>(&map);
        check_embedding::<Face>(&map);
        check_embedding::<Volume>(&map);
        assert_eq!(map.attribute_container(Orbit::Edge).nb_indices(), 12);
        // Indices follow the traversal order.
        let indices: Vec<u32> = map
            .cells::<Face>()
            .iter()
            .map(|f| map.index_of(*f).expect("Face is not indexed"))
            .collect();
        assert_eq!(indices, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn t_add_attribute_embeds_existing_vertices() {
        let (mut map, verts) = open_pyramid();
        assert_eq!(map.nb_cells::<Vertex>(), 5);
        let position = map
            .add_attribute::<Vertex, [f64; 3]>("position")
            .expect("Cannot add attribute");
        assert!(map.is_embedded::<Vertex>());
        check_embedding::<Vertex>(&map);
        let container = map.attribute_container(Orbit::Vertex);
        assert_eq!(container.nb_indices(), 5);
        assert_eq!(container.column_len("position"), Some(5));
        assert_eq!(
            map.add_attribute::<Vertex, f64>("position"),
            Err(Error::DuplicateName {
                orbit: Orbit::Vertex,
                name: "position".to_string()
            })
        );
        map.set_value(&position, verts[4], [0.0, 0.0, 1.0])
            .expect("Cannot set value");
        assert_eq!(map.value(&position, verts[4]), Ok(&[0.0, 0.0, 1.0]));
        assert_eq!(map.value(&position, verts[0]), Ok(&[0.0; 3]));
    }

    #[test]
    fn t_second_attribute_keeps_indices() {
        let (mut map, _) = quad_box();
        let id = map
            .add_attribute::<Edge, u32>("id")
            .expect("Cannot add attribute");
        let edges = map.cells::<Edge>();
        for e in edges.iter() {
            let index = map.index_of(*e).expect("Edge is not indexed");
            map.set_value(&id, *e, index + 100).expect("Cannot set value");
        }
        let before: Vec<u32> = edges
            .iter()
            .map(|e| map.index_of(*e).expect("Edge is not indexed"))
            .collect();
        map.add_attribute::<Edge, bool>("sharp")
            .expect("Cannot add attribute");
        let container = map.attribute_container(Orbit::Edge);
        assert_eq!(container.nb_indices(), 12);
        assert_eq!(container.capacity(), 12);
        for (e, index) in edges.iter().zip(before) {
            assert_eq!(map.index_of(*e), Ok(index));
            assert_eq!(map.value(&id, *e), Ok(&(index + 100)));
        }
    }

    #[test]
    fn t_new_faces_are_indexed() {
        let mut map = CMap2::new();
        map.create_embedding::<Vertex>()
            .expect("Cannot embed vertices");
        map.create_embedding::<Face>().expect("Cannot embed faces");
        map.create_embedding::<Volume>()
            .expect("Cannot embed volumes");
        let f0 = map.add_face(3).expect("Cannot add face");
        let f1 = map.add_face(4).expect("Cannot add face");
        assert_eq!(map.index_of(f0), Ok(0));
        assert_eq!(map.index_of(f1), Ok(1));
        assert_eq!(map.attribute_container(Orbit::Vertex).nb_indices(), 7);
        check_embedding::<Vertex>(&map);
        check_embedding::<Face>(&map);
        check_embedding::<Volume>(&map);
        // The boundary face of an isolated polygon carries no face index.
        let b = map.phi2(f0.dart());
        assert_eq!(
            map.dart_embedding(Orbit::Face, b),
            Err(Error::DeadCell(b.index()))
        );
    }

    #[test]
    fn t_removed_cells_release_indices() {
        let mut map = CMap2::new();
        let area = map
            .add_attribute::<Face, f64>("area")
            .expect("Cannot add attribute");
        let f0 = map.add_face(3).expect("Cannot add face");
        let f1 = map.add_face(3).expect("Cannot add face");
        map.set_value(&area, f0, 1.0).expect("Cannot set value");
        map.set_value(&area, f1, 2.0).expect("Cannot set value");
        map.remove_volume(Volume::from_dart(f0.dart()))
            .expect("Cannot remove volume");
        assert_eq!(map.attribute_container(Orbit::Face).nb_indices(), 1);
        assert_eq!(map.index_of(f0), Err(Error::DeadCell(f0.dart().index())));
        // The released row is reused and reset.
        let f2 = map.add_face(5).expect("Cannot add face");
        assert_eq!(map.index_of(f2), Ok(0));
        assert_eq!(map.value(&area, f2), Ok(&0.0));
        assert_eq!(map.value(&area, f1), Ok(&2.0));
        assert_eq!(map.attribute_container(Orbit::Face).capacity(), 2);
    }

    #[test]
    fn t_remove_attribute() {
        let (mut map, verts) = quad_box();
        let weight = map
            .add_attribute::<Vertex, f32>("weight")
            .expect("Cannot add attribute");
        map.remove_attribute::<Vertex>("weight")
            .expect("Cannot remove attribute");
        assert_eq!(map.value(&weight, verts[0]), Err(Error::RemovedAttribute));
        assert_eq!(
            map.remove_attribute::<Vertex>("weight"),
            Err(Error::AttributeNotFound("weight".to_string()))
        );
        // The cells stay indexed and the name can be reused.
        assert!(map.is_embedded::<Vertex>());
        let weight = map
            .add_attribute::<Vertex, f32>("weight")
            .expect("Cannot add attribute");
        map.remove(weight).expect("Cannot remove attribute");
        assert_eq!(map.remove(weight), Err(Error::RemovedAttribute));
    }
}
