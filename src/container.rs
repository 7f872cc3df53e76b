use std::{
    any::{Any, type_name},
    collections::HashMap,
    fmt::Debug,
    marker::PhantomData,
    sync::atomic::{AtomicU64, Ordering},
};

use slotmap::SlotMap;

use crate::{
    element::{CellType, Edge, Face, Orbit, Vertex, Volume},
    error::Error,
};

slotmap::new_key_type! {
    pub(crate) struct ColumnKey;
}

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(0);

/// Values that can be stored in an attribute. Every row starts out as
/// `T::default()`.
pub trait AttributeData: Clone + Default + Send + Sync + 'static {}

impl<T> AttributeData for T where T: Clone + Default + Send + Sync + 'static {}

/// What the container needs to keep a column in sync with its rows, without
/// knowing the type of the values.
trait GenericColumn: Send + Sync {
    fn name(&self) -> &str;

    fn value_type(&self) -> &'static str;

    fn len(&self) -> usize;

    fn push_default(&mut self);

    fn reset(&mut self, i: usize);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Column<T> {
    name: String,
    values: Vec<T>,
}

impl<T> GenericColumn for Column<T>
where
    T: AttributeData,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn value_type(&self) -> &'static str {
        type_name::<T>()
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn push_default(&mut self) {
        self.values.push(T::default());
    }

    fn reset(&mut self, i: usize) {
        self.values[i] = T::default();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Handle to a column of values of type `T`, one per cell of type `C`.
///
/// The column itself is owned by the attribute container of the map. The
/// handle is a plain key: copying it is free, and it can be used with any
/// view of the map that created it. Once the column is removed, every access
/// through the handle fails with [`Error::RemovedAttribute`]. Using it with
/// another map fails with [`Error::ForeignAttribute`].
pub struct Attribute<C, T> {
    owner: u64,
    key: ColumnKey,
    _phantom: PhantomData<fn() -> (C, T)>,
}

impl<C, T> Attribute<C, T> {
    fn new(owner: u64, key: ColumnKey) -> Self {
        Attribute {
            owner,
            key,
            _phantom: PhantomData,
        }
    }
}

impl<C, T> Clone for Attribute<C, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, T> Copy for Attribute<C, T> {}

impl<C, T> PartialEq for Attribute<C, T> {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.key == other.key
    }
}

impl<C, T> Eq for Attribute<C, T> {}

impl<C, T> Debug for Attribute<C, T>
where
    C: CellType,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Attribute<{}, {}>({:?})",
            C::ORBIT,
            type_name::<T>(),
            self.key
        )
    }
}

/// Vertex attribute. A value of type `T` is defined on each vertex.
pub type VertexAttribute<T> = Attribute<Vertex, T>;

/// Edge attribute. A value of type `T` is defined on each edge.
pub type EdgeAttribute<T> = Attribute<Edge, T>;

/// Face attribute. A value of type `T` is defined on each face.
pub type FaceAttribute<T> = Attribute<Face, T>;

/// Volume attribute. A value of type `T` is defined on each volume.
pub type VolumeAttribute<T> = Attribute<Volume, T>;

/// Columnar storage for the attributes of one orbit.
///
/// Rows are identified by dense indices. All columns always have exactly
/// [`capacity`](Self::capacity) values and share the same set of allocated
/// rows. Released rows go on a free list and are handed out again, reset to
/// their default values, by the next allocation. Columns never shrink.
pub struct AttributeContainer {
    id: u64,
    orbit: Orbit,
    columns: SlotMap<ColumnKey, Box<dyn GenericColumn>>,
    names: HashMap<String, ColumnKey>,
    live: Vec<bool>,
    free: Vec<u32>,
}

impl AttributeContainer {
    pub fn new(orbit: Orbit) -> Self {
        AttributeContainer {
            id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
            orbit,
            columns: SlotMap::with_key(),
            names: HashMap::new(),
            live: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn orbit(&self) -> Orbit {
        self.orbit
    }

    /// Number of rows, allocated or not. This is the length of every column.
    pub fn capacity(&self) -> usize {
        self.live.len()
    }

    /// Number of allocated rows.
    pub fn nb_indices(&self) -> usize {
        self.live.len() - self.free.len()
    }

    pub fn is_valid_index(&self, index: u32) -> bool {
        self.live.get(index as usize).copied().unwrap_or(false)
    }

    /// Iterate over the allocated rows in increasing order.
    pub fn indices(&self) -> impl Iterator<Item = u32> + use<'_> {
        self.live
            .iter()
            .enumerate()
            .filter(|(_, live)| **live)
            .map(|(i, _)| i as u32)
    }

    pub fn nb_attributes(&self) -> usize {
        self.columns.len()
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> + use<'_> {
        self.columns.values().map(|col| col.name())
    }

    /// Length of the column with the given name.
    pub fn column_len(&self, name: &str) -> Option<usize> {
        self.names
            .get(name)
            .and_then(|key| self.columns.get(*key))
            .map(|col| col.len())
    }

    /// Create a new column called `name`, with one default value per row.
    pub fn add_attribute<C, T>(&mut self, name: &str) -> Result<Attribute<C, T>, Error>
    where
        C: CellType,
        T: AttributeData,
    {
        debug_assert_eq!(C::ORBIT, self.orbit);
        if self.names.contains_key(name) {
            return Err(Error::DuplicateName {
                orbit: self.orbit,
                name: name.to_string(),
            });
        }
        let key = self.columns.insert(Box::new(Column::<T> {
            name: name.to_string(),
            values: vec![T::default(); self.capacity()],
        }));
        self.names.insert(name.to_string(), key);
        Ok(Attribute::new(self.id, key))
    }

    /// Look up a column by name.
    ///
    /// A missing column is not an error, `Ok(None)` is returned instead. A
    /// column that exists with values of a type other than `T` is reported
    /// as [`Error::TypeMismatch`].
    pub fn get_attribute<C, T>(&self, name: &str) -> Result<Option<Attribute<C, T>>, Error>
    where
        C: CellType,
        T: AttributeData,
    {
        debug_assert_eq!(C::ORBIT, self.orbit);
        let Some(&key) = self.names.get(name) else {
            return Ok(None);
        };
        let col = self.columns.get(key).ok_or(Error::RemovedAttribute)?;
        if col.as_any().is::<Column<T>>() {
            Ok(Some(Attribute::new(self.id, key)))
        } else {
            Err(mismatch::<T>(&**col))
        }
    }

    /// Remove the column called `name`. Handles to it become stale.
    pub fn remove_attribute(&mut self, name: &str) -> Result<(), Error> {
        let key = self
            .names
            .remove(name)
            .ok_or_else(|| Error::AttributeNotFound(name.to_string()))?;
        self.columns.remove(key);
        Ok(())
    }

    /// Remove the column referred to by `attr`.
    pub fn remove<C, T>(&mut self, attr: Attribute<C, T>) -> Result<(), Error> {
        self.check_owner(&attr)?;
        let col = self
            .columns
            .remove(attr.key)
            .ok_or(Error::RemovedAttribute)?;
        self.names.remove(col.name());
        Ok(())
    }

    pub fn contains<C, T>(&self, attr: &Attribute<C, T>) -> bool {
        attr.owner == self.id && self.columns.contains_key(attr.key)
    }

    pub fn attribute_name<C, T>(&self, attr: &Attribute<C, T>) -> Result<&str, Error> {
        self.check_owner(attr)?;
        self.columns
            .get(attr.key)
            .map(|col| col.name())
            .ok_or(Error::RemovedAttribute)
    }

    pub(crate) fn values<C, T>(&self, attr: &Attribute<C, T>) -> Result<&[T], Error>
    where
        T: AttributeData,
    {
        self.check_owner(attr)?;
        let col = self.columns.get(attr.key).ok_or(Error::RemovedAttribute)?;
        col.as_any()
            .downcast_ref::<Column<T>>()
            .map(|col| col.values.as_slice())
            .ok_or_else(|| mismatch::<T>(&**col))
    }

    pub(crate) fn values_mut<C, T>(&mut self, attr: &Attribute<C, T>) -> Result<&mut [T], Error>
    where
        T: AttributeData,
    {
        self.check_owner(attr)?;
        let col = self
            .columns
            .get_mut(attr.key)
            .ok_or(Error::RemovedAttribute)?;
        if !col.as_any().is::<Column<T>>() {
            return Err(mismatch::<T>(&**col));
        }
        col.as_any_mut()
            .downcast_mut::<Column<T>>()
            .map(|col| col.values.as_mut_slice())
            .ok_or(Error::RemovedAttribute)
    }

    fn check_owner<C, T>(&self, attr: &Attribute<C, T>) -> Result<(), Error> {
        if attr.owner == self.id {
            Ok(())
        } else {
            Err(Error::ForeignAttribute)
        }
    }

    /// Get a free row. Rows on the free list are reused first, otherwise every
    /// column grows by one.
    pub fn allocate_index(&mut self) -> u32 {
        match self.free.pop() {
            Some(index) => {
                self.live[index as usize] = true;
                for col in self.columns.values_mut() {
                    col.reset(index as usize);
                }
                log::trace!("{}: reusing index {index}", self.orbit);
                index
            }
            None => {
                let index = self.live.len() as u32;
                self.live.push(true);
                for col in self.columns.values_mut() {
                    col.push_default();
                }
                index
            }
        }
    }

    /// Put a row back on the free list. The columns keep their size.
    pub fn release_index(&mut self, index: u32) -> Result<(), Error> {
        let len = self.live.len();
        match self.live.get_mut(index as usize) {
            None => Err(Error::IndexOutOfRange { index, len }),
            Some(false) => Err(Error::IndexNotAllocated(index)),
            Some(live) => {
                *live = false;
                self.free.push(index);
                log::trace!("{}: released index {index}", self.orbit);
                Ok(())
            }
        }
    }
}

fn mismatch<T>(col: &dyn GenericColumn) -> Error {
    Error::TypeMismatch {
        name: col.name().to_string(),
        expected: type_name::<T>(),
        found: col.value_type(),
    }
}
