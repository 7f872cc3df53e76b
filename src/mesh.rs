use crate::{
    cmap2::CMap2,
    container::{Attribute, AttributeData},
    element::{CellType, Edge, Face, Vertex, Volume},
    error::Error,
    traversal,
};

mod private {
    pub trait Sealed {}

    impl Sealed for crate::cmap2::CMap2 {}

    impl<M: super::Mesh> Sealed for crate::view::CellFilter<'_, M> {}
}

/**
 * Read access shared by a map and the views built on top of it: cell
 * indices, cell traversal, incidence, and attribute values.
 *
 * Visitors passed to the traversal functions return `true` to continue and
 * `false` to stop early. This trait is sealed, it is only implemented by
 * [`CMap2`] and [`CellFilter`](crate::view::CellFilter).
 */
pub trait Mesh: private::Sealed {
    /// The map holding the topology and the attributes.
    fn map(&self) -> &CMap2;

    /// Whether `foreach_cell` visits `c`. Maps select every cell.
    fn selects<C: CellType>(&self, _c: C) -> bool {
        true
    }

    /// Index of the cell `c` in the attribute container of its orbit.
    fn index_of<C: CellType>(&self, c: C) -> Result<u32, Error> {
        self.map().dart_embedding(C::ORBIT, c.dart())
    }

    fn is_indexed<C: CellType>(&self) -> bool {
        self.map().is_embedded::<C>()
    }

    /// Visit every selected cell of type `C` once, in a stable order.
    fn foreach_cell<C, F>(&self, f: F)
    where
        C: CellType,
        F: FnMut(C) -> bool,
    {
        traversal::foreach_cell(self, f);
    }

    /// Like [`foreach_cell`](Self::foreach_cell), stopping at the first error.
    fn try_foreach_cell<C, F>(&self, mut f: F) -> Result<(), Error>
    where
        C: CellType,
        F: FnMut(C) -> Result<(), Error>,
    {
        let mut result = Ok(());
        self.foreach_cell(|c: C| match f(c) {
            Ok(()) => true,
            Err(e) => {
                result = Err(e);
                false
            }
        });
        result
    }

    fn cells<C: CellType>(&self) -> Vec<C> {
        let mut cells = Vec::new();
        self.foreach_cell(|c| {
            cells.push(c);
            true
        });
        cells
    }

    fn nb_cells<C: CellType>(&self) -> usize {
        let mut count = 0;
        self.foreach_cell(|_: C| {
            count += 1;
            true
        });
        count
    }

    /**
     * Visit the cells of type `X` incident to `c`. Incidence ignores the
     * filters of views, and never reports boundary faces.
     */
    fn foreach_incident<X, C, F>(&self, c: C, mut f: F)
    where
        X: CellType,
        C: CellType,
        F: FnMut(X) -> bool,
    {
        traversal::foreach_incident_dart(self.map(), C::ORBIT, c.dart(), X::ORBIT, |d| {
            f(X::from_dart(d))
        });
    }

    fn foreach_incident_vertex<C, F>(&self, c: C, f: F)
    where
        C: CellType,
        F: FnMut(Vertex) -> bool,
    {
        self.foreach_incident(c, f);
    }

    fn foreach_incident_edge<C, F>(&self, c: C, f: F)
    where
        C: CellType,
        F: FnMut(Edge) -> bool,
    {
        self.foreach_incident(c, f);
    }

    fn foreach_incident_face<C, F>(&self, c: C, f: F)
    where
        C: CellType,
        F: FnMut(Face) -> bool,
    {
        self.foreach_incident(c, f);
    }

    fn foreach_incident_volume<C, F>(&self, c: C, f: F)
    where
        C: CellType,
        F: FnMut(Volume) -> bool,
    {
        self.foreach_incident(c, f);
    }

    fn incident<X, C>(&self, c: C) -> Vec<X>
    where
        X: CellType,
        C: CellType,
    {
        let mut cells = Vec::new();
        self.foreach_incident(c, |x| {
            cells.push(x);
            true
        });
        cells
    }

    /// The vertices of `c`. For a face they come in boundary order.
    fn incident_vertices<C: CellType>(&self, c: C) -> Vec<Vertex> {
        self.incident(c)
    }

    /// Like [`incident_vertices`](Self::incident_vertices), appending to `out`
    /// to avoid an allocation per cell in hot loops.
    fn append_incident_vertices<C: CellType>(&self, c: C, out: &mut Vec<Vertex>) {
        self.foreach_incident_vertex(c, |v| {
            out.push(v);
            true
        });
    }

    /**
     * Number of cells of the next lower dimension incident to `c`: vertices
     * of an edge, edges of a face, faces of a volume. Vertices have none.
     */
    fn codegree<C: CellType>(&self, c: C) -> usize {
        let Some(lower) = C::ORBIT.lower() else {
            return 0;
        };
        let mut count = 0;
        traversal::foreach_incident_dart(self.map(), C::ORBIT, c.dart(), lower, |_| {
            count += 1;
            true
        });
        count
    }

    fn get_attribute<C, T>(&self, name: &str) -> Result<Option<Attribute<C, T>>, Error>
    where
        C: CellType,
        T: AttributeData,
    {
        self.map().attribute_container(C::ORBIT).get_attribute(name)
    }

    /// The value of `attr` on the cell `c`.
    fn value<C, T>(&self, attr: &Attribute<C, T>, c: C) -> Result<&T, Error>
    where
        C: CellType,
        T: AttributeData,
    {
        let index = self.index_of(c)?;
        let values = self.attribute_values(attr)?;
        values.get(index as usize).ok_or(Error::IndexOutOfRange {
            index,
            len: values.len(),
        })
    }

    /// The whole column of `attr`, indexed by cell index.
    fn attribute_values<C, T>(&self, attr: &Attribute<C, T>) -> Result<&[T], Error>
    where
        C: CellType,
        T: AttributeData,
    {
        self.map().attribute_container(C::ORBIT).values(attr)
    }
}

impl Mesh for CMap2 {
    fn map(&self) -> &CMap2 {
        self
    }
}
