use crate::{
    cmap2::{CMap2, Embedding},
    element::{Dart, Orbit},
    error::Error,
};

fn check_darts(map: &CMap2) -> Result<(), Error> {
    for d in map.darts() {
        let next = map.phi1(d);
        if !map.is_live(next) || map.phi_1(next) != d {
            return Err(Error::InvalidPhi1(d.index()));
        }
        let opp = map.phi2(d);
        // Every edge has two darts once holes are closed.
        if opp == d || !map.is_live(opp) || map.phi2(opp) != d {
            return Err(Error::InvalidPhi2(d.index()));
        }
        if map.is_boundary(d) && map.is_boundary(opp) {
            return Err(Error::InconsistentBoundary(d.index()));
        }
        // A face is either entirely boundary or entirely interior.
        if map.is_boundary(next) != map.is_boundary(d) {
            return Err(Error::InconsistentBoundary(next.index()));
        }
    }
    Ok(())
}

fn check_orbit_embedding(
    map: &CMap2,
    orbit: Orbit,
    table: &[Option<u32>],
    visited: &mut [bool],
    darts: &mut Vec<Dart>,
) -> Result<(), Error> {
    visited.fill(false);
    let container = map.attribute_container(orbit);
    let mut used = vec![false; container.capacity()];
    let mut ncells = 0;
    for d in map.darts() {
        if visited[d.index() as usize] || (orbit == Orbit::Face && map.is_boundary(d)) {
            continue;
        }
        map.orbit_darts(orbit, d, darts);
        let index = table[d.index() as usize].ok_or(Error::InconsistentEmbedding {
            orbit,
            dart: d.index(),
        })?;
        for x in darts.iter() {
            visited[x.index() as usize] = true;
            if table[x.index() as usize] != Some(index) {
                return Err(Error::InconsistentEmbedding {
                    orbit,
                    dart: x.index(),
                });
            }
        }
        if !container.is_valid_index(index) {
            return Err(Error::IndexNotAllocated(index));
        }
        if std::mem::replace(&mut used[index as usize], true) {
            return Err(Error::SharedIndex { orbit, index });
        }
        ncells += 1;
    }
    if ncells != container.nb_indices() {
        return Err(Error::DanglingIndices(orbit));
    }
    Ok(())
}

impl CMap2 {
    /**
     * Check the topology of the map and the embeddings of its cells.
     *
     * This returns an error if a permutation is broken, a face mixes boundary
     * and interior darts, two darts of the same cell disagree on its index,
     * two cells share an index, or a container holds indices no cell uses.
     */
    pub fn check(&self) -> Result<(), Error> {
        check_darts(self)?;
        let mut visited = vec![false; self.dart_capacity()].into_boxed_slice();
        let mut darts = Vec::new();
        for orbit in Orbit::ALL {
            if let Embedding::Embedded(table) = &self.embeddings[orbit.slot()] {
                check_orbit_embedding(self, orbit, table, &mut visited, &mut darts)?;
            }
        }
        log::trace!("Checked {} darts.", self.nb_darts());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{
        cmap2::{
            CMap2,
            test::{open_pyramid, quad_box},
        },
        element::{CellType, Edge, Face, Vertex, Volume},
    };

    #[test]
    fn t_check_built_maps() {
        let (mut map, _) = quad_box();
        map.check().expect("Invalid box");
        map.create_embedding::<Vertex>().expect("Cannot embed");
        map.create_embedding::<Edge>().expect("Cannot embed");
        map.create_embedding::<Face>().expect("Cannot embed");
        map.create_embedding::<Volume>().expect("Cannot embed");
        map.check().expect("Invalid box embeddings");
        let (mut map, _) = open_pyramid();
        map.add_attribute::<Face, u8>("tag").expect("Cannot add attribute");
        map.check().expect("Invalid pyramid");
    }

    #[test]
    fn t_check_after_edits() {
        let (mut map, _) = CMap2::quad_grid(4, 4, 1.0).expect("Cannot create grid");
        map.create_embedding::<Edge>().expect("Cannot embed");
        map.create_embedding::<Volume>().expect("Cannot embed");
        let tri = map.add_face(3).expect("Cannot add face");
        map.add_face(6).expect("Cannot add face");
        map.check().expect("Invalid map after adding faces");
        map.remove_volume(Volume::from_dart(tri.dart()))
            .expect("Cannot remove volume");
        map.check().expect("Invalid map after removing a volume");
        map.add_face(4).expect("Cannot add face");
        map.check().expect("Invalid map after reusing darts");
    }
}
