//! The Record Manager: view state for a create form, an update form and a
//! records table, driven against a [`RecordStore`].
//!
//! Every mutation follows the same shape: set the operation's busy flag,
//! issue one request, record a success or error status, clear the flag and
//! re-fetch the whole list. Local state is never patched from responses.
//!
//! The manager is single-threaded. State lives in a `RefCell` and no borrow
//! is held across an `.await`, so a create, an update and a delete may all
//! be in flight at once. A second submission of an operation that is
//! already in flight is rejected with [`RecordError::Busy`].
//!
//! Refreshes are ticketed in issue order; a result is dropped if a refresh
//! issued later has already been applied.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, error, info, warn};

use crate::error::{RecordError, StoreError};
use crate::record::{Field, Record, RecordFields, RecordId, UpdateDraft};
use crate::store::RecordStore;

/// Banner shown when the list could not be re-fetched.
pub const LOAD_FAILED_MESSAGE: &str = "Error loading users";

/// A mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Operation::Create => "User created successfully!",
            Operation::Update => "User updated successfully!",
            Operation::Delete => "User deleted successfully!",
        }
    }

    /// Generic user-facing failure text; error details only go to the log.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Create => "Error creating user",
            Operation::Update => "Error updating user",
            Operation::Delete => "Error deleting user",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

impl StatusKind {
    /// CSS class name of the banner.
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

/// Transient outcome banner, replaced by the next outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub kind: StatusKind,
}

impl Status {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Error,
        }
    }
}

/// One flag per mutating operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyFlags {
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl BusyFlags {
    pub fn get(&self, op: Operation) -> bool {
        match op {
            Operation::Create => self.create,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }

    fn set(&mut self, op: Operation, busy: bool) {
        match op {
            Operation::Create => self.create = busy,
            Operation::Update => self.update = busy,
            Operation::Delete => self.delete = busy,
        }
    }
}

/// Everything the interface renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Result of the last applied fetch.
    pub records: Vec<Record>,
    pub create_draft: RecordFields,
    pub update_draft: UpdateDraft,
    pub busy: BusyFlags,
    pub status: Option<Status>,
}

type Listener = Rc<dyn Fn()>;

/// Drives the four operations against an injected store.
pub struct RecordManager<S> {
    store: S,
    state: RefCell<ViewState>,
    refresh_issued: Cell<u64>,
    refresh_applied: Cell<u64>,
    listener: RefCell<Option<Listener>>,
}

impl<S: RecordStore> RecordManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: RefCell::new(ViewState::default()),
            refresh_issued: Cell::new(0),
            refresh_applied: Cell::new(0),
            listener: RefCell::new(None),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register the callback run after every state change, replacing any
    /// previous one.
    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn records(&self) -> Vec<Record> {
        self.state.borrow().records.clone()
    }

    pub fn status(&self) -> Option<Status> {
        self.state.borrow().status.clone()
    }

    pub fn create_draft(&self) -> RecordFields {
        self.state.borrow().create_draft.clone()
    }

    pub fn update_draft(&self) -> UpdateDraft {
        self.state.borrow().update_draft.clone()
    }

    pub fn busy(&self) -> BusyFlags {
        self.state.borrow().busy
    }

    /// Re-fetch every record and replace the list.
    ///
    /// On failure the list is left as it was and an error banner is shown,
    /// unless a later refresh has already succeeded.
    pub async fn refresh(&self) -> Result<(), RecordError> {
        let ticket = self.refresh_issued.get() + 1;
        self.refresh_issued.set(ticket);

        let result = self.store.list().await;
        let applied = self.refresh_applied.get();
        if ticket < applied {
            debug!(ticket, applied, "dropping stale refresh result");
            return result.map(|_| ()).map_err(RecordError::ListFailed);
        }

        match result {
            Ok(records) => {
                self.refresh_applied.set(ticket);
                debug!(ticket, count = records.len(), "records refreshed");
                self.state.borrow_mut().records = records;
                self.notify();
                Ok(())
            }
            Err(err) => {
                error!(ticket, error = %err, "error fetching users");
                self.set_status(Status::error(LOAD_FAILED_MESSAGE));
                Err(RecordError::ListFailed(err))
            }
        }
    }

    /// Merge one field into the create draft.
    pub fn start_create(&self, field: Field, value: impl Into<String>) {
        self.state.borrow_mut().create_draft.set(field, value);
        self.notify();
    }

    /// Insert the create draft, then refresh.
    ///
    /// The draft is kept after submission, whatever the outcome.
    pub async fn submit_create(&self) -> Result<Record, RecordError> {
        let op = Operation::Create;
        let fields = self.begin(op, |state| Ok(state.create_draft.clone()))?;

        let result = self.store.insert(&fields).await;
        let outcome = self.finish(op, result);
        self.refresh_after(op).await;
        outcome
    }

    /// Copy record `id` into the update draft.
    ///
    /// Returns `false` and leaves the draft untouched when `id` is not in
    /// the current list.
    pub fn select_for_edit(&self, id: RecordId) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(draft) = state
            .records
            .iter()
            .find(|record| record.id == id)
            .map(UpdateDraft::from)
        else {
            debug!(%id, "record not in list; update draft unchanged");
            return false;
        };
        state.update_draft = draft;
        drop(state);
        self.notify();
        true
    }

    /// Merge one field into the update draft.
    pub fn start_update(&self, field: Field, value: impl Into<String>) {
        self.state.borrow_mut().update_draft.fields.set(field, value);
        self.notify();
    }

    /// Write the update draft to its record, then refresh.
    ///
    /// With no record selected no request is sent, but the list is still
    /// re-fetched.
    pub async fn submit_update(&self) -> Result<Record, RecordError> {
        let op = Operation::Update;
        let prepared = self.begin(op, |state| {
            let id = state.update_draft.id.ok_or(RecordError::NothingSelected)?;
            Ok((id, state.update_draft.fields.clone()))
        });
        let (id, fields) = match prepared {
            Ok(input) => input,
            Err(err @ RecordError::Busy(_)) => return Err(err),
            Err(err) => {
                self.refresh_after(op).await;
                return Err(err);
            }
        };

        let result = self.store.update(id, &fields).await;
        let outcome = self.finish(op, result);
        self.refresh_after(op).await;
        outcome
    }

    /// Delete record `id`, then refresh.
    pub async fn remove_record(&self, id: RecordId) -> Result<(), RecordError> {
        let op = Operation::Delete;
        self.begin(op, |_| Ok(()))?;

        let result = self.store.delete(id).await;
        if result.is_ok() {
            debug!(%id, "delete acknowledged");
        }
        let outcome = self.finish(op, result);
        self.refresh_after(op).await;
        outcome
    }

    /// Claim the busy flag for `op` and extract its request input.
    fn begin<T>(
        &self,
        op: Operation,
        prepare: impl FnOnce(&ViewState) -> Result<T, RecordError>,
    ) -> Result<T, RecordError> {
        let mut state = self.state.borrow_mut();
        if state.busy.get(op) {
            debug!(%op, "request already in flight; ignoring submission");
            return Err(RecordError::Busy(op));
        }

        let input = match prepare(&*state) {
            Ok(input) => input,
            Err(err) => {
                warn!(%op, error = %err, "not sending request");
                state.status = Some(Status::error(op.failure_message()));
                drop(state);
                self.notify();
                return Err(err);
            }
        };

        state.busy.set(op, true);
        drop(state);
        self.notify();
        Ok(input)
    }

    /// Record the outcome of `op` and release its busy flag.
    fn finish<T: fmt::Debug>(
        &self,
        op: Operation,
        result: Result<T, StoreError>,
    ) -> Result<T, RecordError> {
        let status = match &result {
            Ok(value) => {
                info!(%op, response = ?value, "{}", op.success_message());
                Status::success(op.success_message())
            }
            Err(err) => {
                error!(%op, error = %err, "{}", op.failure_message());
                Status::error(op.failure_message())
            }
        };

        {
            let mut state = self.state.borrow_mut();
            state.busy.set(op, false);
            state.status = Some(status);
        }
        self.notify();

        result.map_err(|source| RecordError::RequestFailed { op, source })
    }

    async fn refresh_after(&self, op: Operation) {
        if let Err(err) = self.refresh().await {
            warn!(%op, error = %err, "list is stale after request");
        }
    }

    fn set_status(&self, status: Status) {
        self.state.borrow_mut().status = Some(status);
        self.notify();
    }

    fn notify(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn fill(manager: &RecordManager<MemoryStore>, fields: &RecordFields) {
        for field in Field::ALL {
            manager.start_create(field, fields.get(field));
        }
    }

    fn ann() -> RecordFields {
        RecordFields::new("Ann", "30", "555", "a@x.com")
    }

    fn seeded() -> RecordManager<MemoryStore> {
        RecordManager::new(MemoryStore::with_records([
            Record {
                id: RecordId(1),
                fields: ann(),
            },
            Record {
                id: RecordId(2),
                fields: RecordFields::new("Bo", "41", "777", "b@x.com"),
            },
        ]))
    }

    #[test]
    fn test_initial_state_is_empty() {
        let manager = RecordManager::new(MemoryStore::new());
        assert_eq!(manager.snapshot(), ViewState::default());
        assert_eq!(manager.status(), None);
    }

    #[test]
    fn test_start_create_merges_fields() {
        let manager = RecordManager::new(MemoryStore::new());
        manager.start_create(Field::Name, "Ann");
        manager.start_create(Field::Age, "30");
        manager.start_create(Field::Name, "Anne");
        let draft = manager.create_draft();
        assert_eq!(draft.name, "Anne");
        assert_eq!(draft.age, "30");
        assert_eq!(draft.email, "");
    }

    #[tokio::test]
    async fn test_submit_create_sets_status_and_refreshes() {
        let manager = RecordManager::new(MemoryStore::new());
        fill(&manager, &ann());

        let created = manager.submit_create().await.unwrap();
        assert_eq!(created.fields, ann());
        assert_eq!(manager.records(), vec![created]);
        assert_eq!(
            manager.status(),
            Some(Status::success("User created successfully!"))
        );
        assert!(!manager.busy().create);
        // draft is not cleared
        assert_eq!(manager.create_draft(), ann());
    }

    #[tokio::test]
    async fn test_submit_create_failure_still_refreshes() {
        let manager = RecordManager::new(MemoryStore::new());
        manager.store().insert(&ann()).await.unwrap();
        manager.store().fail_next(Operation::Create);
        fill(&manager, &ann());

        let err = manager.submit_create().await.unwrap_err();
        assert!(matches!(
            err,
            RecordError::RequestFailed {
                op: Operation::Create,
                ..
            }
        ));
        assert_eq!(manager.status(), Some(Status::error("Error creating user")));
        assert!(!manager.busy().create);
        assert_eq!(manager.records().len(), 1);
    }

    #[tokio::test]
    async fn test_select_for_edit_copies_record() {
        let manager = seeded();
        manager.refresh().await.unwrap();

        assert!(manager.select_for_edit(RecordId(2)));
        let draft = manager.update_draft();
        assert_eq!(draft.id, Some(RecordId(2)));
        assert_eq!(draft.fields.name, "Bo");

        // editing the draft does not touch the list
        manager.start_update(Field::Name, "Bob");
        assert_eq!(manager.records()[1].fields.name, "Bo");
    }

    #[tokio::test]
    async fn test_select_for_edit_unknown_id_is_noop() {
        let manager = seeded();
        manager.refresh().await.unwrap();
        manager.select_for_edit(RecordId(1));
        manager.start_update(Field::Email, "typed@x.com");
        let before = manager.update_draft();

        assert!(!manager.select_for_edit(RecordId(99)));
        assert_eq!(manager.update_draft(), before);
    }

    #[tokio::test]
    async fn test_submit_update_without_selection() {
        let manager = seeded();
        manager.start_update(Field::Name, "Nobody");

        let err = manager.submit_update().await.unwrap_err();
        assert_eq!(err, RecordError::NothingSelected);
        assert_eq!(manager.status(), Some(Status::error("Error updating user")));
        assert!(!manager.busy().update);
        assert_eq!(manager.store().rows()[0].fields, ann());
        // list was still re-fetched
        assert_eq!(manager.records().len(), 2);
        assert_eq!(manager.store().list_calls(), 1);
    }

    #[tokio::test]
    async fn test_submit_update_keeps_id() {
        let manager = seeded();
        manager.refresh().await.unwrap();
        manager.select_for_edit(RecordId(1));
        manager.start_update(Field::Age, "31");

        let updated = manager.submit_update().await.unwrap();
        assert_eq!(updated.id, RecordId(1));
        let row = manager
            .records()
            .into_iter()
            .find(|r| r.id == RecordId(1))
            .unwrap();
        assert_eq!(row.fields.age, "31");
        assert_eq!(
            manager.status(),
            Some(Status::success("User updated successfully!"))
        );
    }

    #[tokio::test]
    async fn test_remove_record_failure_reports_error() {
        let manager = seeded();
        manager.refresh().await.unwrap();
        manager.store().fail_next(Operation::Delete);

        assert!(manager.remove_record(RecordId(1)).await.is_err());
        assert_eq!(manager.status(), Some(Status::error("Error deleting user")));
        assert_eq!(manager.records().len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_stale_list() {
        let manager = seeded();
        manager.refresh().await.unwrap();
        let before = manager.records();

        manager.store().fail_lists(1);
        let err = manager.refresh().await.unwrap_err();
        assert!(matches!(err, RecordError::ListFailed(_)));
        assert_eq!(manager.records(), before);
        assert_eq!(manager.status(), Some(Status::error(LOAD_FAILED_MESSAGE)));
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let manager = seeded();
        manager.refresh().await.unwrap();
        let first = manager.records();
        manager.refresh().await.unwrap();
        assert_eq!(manager.records(), first);
    }

    #[tokio::test]
    async fn test_listener_sees_busy_flag() {
        let manager = Rc::new(RecordManager::new(MemoryStore::new()));
        let seen_busy = Rc::new(Cell::new(false));
        let calls = Rc::new(Cell::new(0));
        {
            let weak = Rc::downgrade(&manager);
            let seen_busy = seen_busy.clone();
            let calls = calls.clone();
            manager.subscribe(move || {
                calls.set(calls.get() + 1);
                if let Some(manager) = weak.upgrade()
                    && manager.busy().create
                {
                    seen_busy.set(true);
                }
            });
        }

        manager.submit_create().await.unwrap();
        assert!(seen_busy.get());
        // busy set, outcome recorded, records replaced
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_operation_messages() {
        assert_eq!(Operation::Delete.success_message(), "User deleted successfully!");
        assert_eq!(Operation::Update.failure_message(), "Error updating user");
        assert_eq!(StatusKind::Error.as_str(), "error");
    }
}
