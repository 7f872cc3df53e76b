use crate::{
    cmap2::CMap2,
    element::{CellType, Dart, NUM_ORBITS},
    error::Error,
    mesh::Mesh,
};

type Predicate<'a> = Box<dyn Fn(Dart) -> bool + Send + Sync + 'a>;

/**
 * Read-only view of a mesh that hides some of its cells from
 * [`foreach_cell`](Mesh::foreach_cell).
 *
 * Each cell type can have its own predicate, cell types without one are not
 * filtered. Cell indices, incidence and attribute values are those of the
 * wrapped mesh, so attributes created on the map can be read through the
 * view. Views can be stacked, in which case a cell must pass every filter.
 */
pub struct CellFilter<'a, M: Mesh> {
    mesh: &'a M,
    filters: [Option<Predicate<'a>>; NUM_ORBITS],
}

impl<'a, M: Mesh> CellFilter<'a, M> {
    pub fn new(mesh: &'a M) -> Self {
        CellFilter {
            mesh,
            filters: std::array::from_fn(|_| None),
        }
    }

    /// The wrapped mesh.
    pub fn mesh(&self) -> &'a M {
        self.mesh
    }

    /// Only visit the cells of type `C` for which `pred` returns true.
    /// Replaces the previous predicate for `C`, if any.
    pub fn set_filter<C, F>(&mut self, pred: F)
    where
        C: CellType,
        F: Fn(C) -> bool + Send + Sync + 'a,
    {
        self.filters[C::ORBIT.slot()] = Some(Box::new(move |d| pred(C::from_dart(d))));
    }

    pub fn with_filter<C, F>(mut self, pred: F) -> Self
    where
        C: CellType,
        F: Fn(C) -> bool + Send + Sync + 'a,
    {
        self.set_filter(pred);
        self
    }

    pub fn clear_filter<C: CellType>(&mut self) {
        self.filters[C::ORBIT.slot()] = None;
    }

    pub fn has_filter<C: CellType>(&self) -> bool {
        self.filters[C::ORBIT.slot()].is_some()
    }
}

impl<M: Mesh> Mesh for CellFilter<'_, M> {
    fn map(&self) -> &CMap2 {
        self.mesh.map()
    }

    fn selects<C: CellType>(&self, c: C) -> bool {
        self.filters[C::ORBIT.slot()]
            .as_ref()
            .is_none_or(|pred| pred(c.dart()))
            && self.mesh.selects(c)
    }

    fn index_of<C: CellType>(&self, c: C) -> Result<u32, Error> {
        self.mesh.index_of(c)
    }

    fn is_indexed<C: CellType>(&self) -> bool {
        self.mesh.is_indexed::<C>()
    }
}

#[cfg(test)]
mod test {
    use super::CellFilter;
    use crate::{
        cmap2::{CMap2, test::quad_box},
        element::{CellType, Edge, Face, Vertex},
        mesh::Mesh,
    };

    #[test]
    fn t_filter_cells() {
        let (mut map, _) = quad_box();
        let flag = map
            .add_attribute::<Face, bool>("selected")
            .expect("Cannot add attribute");
        let faces = map.cells::<Face>();
        for f in faces.iter().step_by(2) {
            map.set_value(&flag, *f, true).expect("Cannot set value");
        }
        let map = &map;
        let view = CellFilter::new(map)
            .with_filter(move |f: Face| map.value(&flag, f).is_ok_and(|flag| *flag));
        assert_eq!(view.cells::<Face>(), [faces[0], faces[2], faces[4]]);
        // Other cell types are not filtered.
        assert_eq!(view.nb_cells::<Vertex>(), 8);
        // Indices and values come from the map.
        for f in view.cells::<Face>() {
            assert_eq!(view.index_of(f), map.index_of(f));
            assert_eq!(view.value(&flag, f), Ok(&true));
        }
        // Incidence is not filtered.
        assert_eq!(view.incident::<Face, _>(map.cells::<Edge>()[0]).len(), 2);
        assert_eq!(view.codegree(faces[1]), 4);
    }

    #[test]
    fn t_stacked_filters() {
        let (map, _) = quad_box();
        let faces = map.cells::<Face>();
        let even = CellFilter::new(&map).with_filter(|f: Face| f.dart().index() % 8 == 0);
        let mut first = CellFilter::new(&even);
        first.set_filter(|f: Face| f.dart().index() < 10);
        assert!(first.has_filter::<Face>());
        assert_eq!(first.cells::<Face>(), [faces[0], faces[2]]);
        first.clear_filter::<Face>();
        assert_eq!(first.cells::<Face>(), [faces[0], faces[2], faces[4]]);
        let empty = CellFilter::new(&map).with_filter(|_: Vertex| false);
        assert_eq!(empty.nb_cells::<Vertex>(), 0);
        let _: &CMap2 = empty.mesh();
    }
}
