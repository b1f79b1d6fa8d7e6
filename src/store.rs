//! The Record Store contract.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::record::{Record, RecordFields, RecordId};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Request/response access to the hosted `users` table.
///
/// Implementations are single-threaded: browser futures are not `Send`.
#[async_trait(?Send)]
pub trait RecordStore {
    /// All records, unfiltered and unpaginated.
    async fn list(&self) -> Result<Vec<Record>>;

    /// Insert a new record; the store assigns its `id`.
    async fn insert(&self, fields: &RecordFields) -> Result<Record>;

    /// Overwrite the four business fields of record `id`.
    async fn update(&self, id: RecordId, fields: &RecordFields) -> Result<Record>;

    async fn delete(&self, id: RecordId) -> Result<()>;
}

#[async_trait(?Send)]
impl<S: RecordStore + ?Sized> RecordStore for std::rc::Rc<S> {
    async fn list(&self) -> Result<Vec<Record>> {
        (**self).list().await
    }

    async fn insert(&self, fields: &RecordFields) -> Result<Record> {
        (**self).insert(fields).await
    }

    async fn update(&self, id: RecordId, fields: &RecordFields) -> Result<Record> {
        (**self).update(id, fields).await
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        (**self).delete(id).await
    }
}
