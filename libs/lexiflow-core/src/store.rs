//! Record store interface and an in-memory implementation.

use crate::error::StoreError;
use crate::types::{Record, RecordId, SchedulePatch};
use std::cell::RefCell;

type Result<T> = std::result::Result<T, StoreError>;

/// Key-indexed persistence for one record kind.
///
/// Ids are assigned by the store and increase with every insert.
/// `list_all` returns records in storage (insertion) order.
pub trait RecordStore<R: Record> {
    fn list_all(&self) -> Result<Vec<R>>;
    fn insert(&self, record: R::New) -> Result<RecordId>;
    /// Insert many records; returned ids follow input order.
    fn bulk_insert(&self, records: Vec<R::New>) -> Result<Vec<RecordId>>;
    /// Overwrite box, due time and update time; every other field is untouched.
    fn update(&self, id: RecordId, patch: &SchedulePatch) -> Result<()>;
    fn delete(&self, id: RecordId) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

impl<R, S> RecordStore<R> for &S
where
    R: Record,
    S: RecordStore<R> + ?Sized,
{
    fn list_all(&self) -> Result<Vec<R>> {
        (**self).list_all()
    }

    fn insert(&self, record: R::New) -> Result<RecordId> {
        (**self).insert(record)
    }

    fn bulk_insert(&self, records: Vec<R::New>) -> Result<Vec<RecordId>> {
        (**self).bulk_insert(records)
    }

    fn update(&self, id: RecordId, patch: &SchedulePatch) -> Result<()> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: RecordId) -> Result<()> {
        (**self).delete(id)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

/// Store that keeps records in memory.
#[derive(Debug)]
pub struct MemoryStore<R> {
    inner: RefCell<MemoryInner<R>>,
}

#[derive(Debug)]
struct MemoryInner<R> {
    records: Vec<R>,
    next_id: RecordId,
}

impl<R> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(MemoryInner {
                records: Vec::new(),
                next_id: 1,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RecordStore<R> for MemoryStore<R> {
    fn list_all(&self) -> Result<Vec<R>> {
        Ok(self.inner.borrow().records.clone())
    }

    fn insert(&self, record: R::New) -> Result<RecordId> {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.records.push(R::from_new(id, record));
        Ok(id)
    }

    fn bulk_insert(&self, records: Vec<R::New>) -> Result<Vec<RecordId>> {
        records.into_iter().map(|record| self.insert(record)).collect()
    }

    fn update(&self, id: RecordId, patch: &SchedulePatch) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        record.apply(patch);
        Ok(())
    }

    fn delete(&self, id: RecordId) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        let before = inner.records.len();
        inner.records.retain(|r| r.id() != id);
        if inner.records.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.inner.borrow_mut().records.clear();
        Ok(())
    }
}
