//! In-process Record Store.
//!
//! Behaves like the hosted table for the four operations: ids ascend from 1,
//! `list` returns rows in id order, and deleting a missing id succeeds.
//! Failures can be injected once per operation for tests and demos.

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};

use crate::error::StoreError;
use crate::manager::Operation;
use crate::record::{Record, RecordFields, RecordId};
use crate::store::{RecordStore, Result};

#[derive(Debug)]
pub struct MemoryStore {
    rows: RefCell<BTreeMap<RecordId, RecordFields>>,
    next_id: Cell<i64>,
    fail_next: RefCell<HashSet<Operation>>,
    list_failures: Cell<usize>,
    list_calls: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
            fail_next: RefCell::new(HashSet::new()),
            list_failures: Cell::new(0),
            list_calls: Cell::new(0),
        }
    }

    /// Seed the store with rows, continuing id assignment after the largest.
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let store = Self::new();
        {
            let mut rows = store.rows.borrow_mut();
            for record in records {
                rows.insert(record.id, record.fields);
            }
            let next = rows.keys().next_back().map_or(1, |id| id.0 + 1);
            store.next_id.set(next);
        }
        store
    }

    /// Make the next request of `op` fail.
    pub fn fail_next(&self, op: Operation) {
        self.fail_next.borrow_mut().insert(op);
    }

    /// Make the next `count` list requests fail.
    pub fn fail_lists(&self, count: usize) {
        self.list_failures.set(count);
    }

    /// Number of list requests received, failed ones included.
    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    /// Rows currently stored, bypassing failure injection.
    pub fn rows(&self) -> Vec<Record> {
        self.rows
            .borrow()
            .iter()
            .map(|(id, fields)| Record {
                id: *id,
                fields: fields.clone(),
            })
            .collect()
    }

    fn check(&self, op: Operation) -> Result<()> {
        if self.fail_next.borrow_mut().remove(&op) {
            return Err(StoreError::Injected(op.name()));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl RecordStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Record>> {
        self.list_calls.set(self.list_calls.get() + 1);
        let remaining = self.list_failures.get();
        if remaining > 0 {
            self.list_failures.set(remaining - 1);
            return Err(StoreError::Injected("list"));
        }
        Ok(self.rows())
    }

    async fn insert(&self, fields: &RecordFields) -> Result<Record> {
        self.check(Operation::Create)?;
        let id = RecordId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.rows.borrow_mut().insert(id, fields.clone());
        Ok(Record {
            id,
            fields: fields.clone(),
        })
    }

    async fn update(&self, id: RecordId, fields: &RecordFields) -> Result<Record> {
        self.check(Operation::Update)?;
        let mut rows = self.rows.borrow_mut();
        let row = rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        *row = fields.clone();
        Ok(Record {
            id,
            fields: fields.clone(),
        })
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        self.check(Operation::Delete)?;
        self.rows.borrow_mut().remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> RecordFields {
        RecordFields::new("Ann", "30", "555", "a@x.com")
    }

    #[tokio::test]
    async fn test_insert_assigns_ascending_ids() {
        let store = MemoryStore::new();
        let first = store.insert(&ann()).await.unwrap();
        let second = store.insert(&ann()).await.unwrap();
        assert_eq!(first.id, RecordId(1));
        assert_eq!(second.id, RecordId(2));
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_with_records_continues_ids() {
        let store = MemoryStore::with_records([Record {
            id: RecordId(9),
            fields: ann(),
        }]);
        let created = store.insert(&ann()).await.unwrap();
        assert_eq!(created.id, RecordId(10));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.update(RecordId(4), &ann()).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound(RecordId(4)));
    }

    #[tokio::test]
    async fn test_delete_missing_succeeds() {
        let store = MemoryStore::new();
        assert!(store.delete(RecordId(4)).await.is_ok());
    }

    #[tokio::test]
    async fn test_injected_failure_fires_once() {
        let store = MemoryStore::new();
        store.fail_next(Operation::Create);
        assert_eq!(
            store.insert(&ann()).await.unwrap_err(),
            StoreError::Injected("create")
        );
        assert!(store.insert(&ann()).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_failures_count_down() {
        let store = MemoryStore::new();
        store.fail_lists(2);
        assert!(store.list().await.is_err());
        assert!(store.list().await.is_err());
        assert!(store.list().await.is_ok());
        assert_eq!(store.list_calls(), 3);
    }
}
