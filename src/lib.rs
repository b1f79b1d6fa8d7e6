//! # users-rs
//!
//! A small form-and-table record manager for a hosted `users` table.
//!
//! The crate is a thin client: persistence, identity and querying belong to
//! the Record Store (a PostgREST table), and this library only keeps the view
//! state a two-form, one-table interface needs.
//!
//! ## Overview
//!
//! - **Records**: `id` assigned by the store plus four business fields
//! - **Drafts**: per-form field buffers, never shared with the fetched list
//! - **Full refresh**: every mutation is followed by a complete re-fetch
//! - **Stores**: in-memory, native HTTP (`native` feature), or any
//!   [`RecordStore`] implementation handed to the manager
//!
//! ## Example
//!
//! ```
//! use users_rs::{Field, MemoryStore, RecordManager};
//!
//! # tokio_test_block_on(async {
//! let manager = RecordManager::new(MemoryStore::new());
//! manager.start_create(Field::Name, "Ann");
//! manager.start_create(Field::Age, "30");
//! manager.start_create(Field::ContactNo, "555");
//! manager.start_create(Field::Email, "a@x.com");
//!
//! let created = manager.submit_create().await.unwrap();
//! assert_eq!(manager.records(), vec![created]);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod config;
pub mod error;
#[cfg(feature = "native")]
pub mod http;
pub mod manager;
pub mod memory;
pub mod postgrest;
pub mod record;
pub mod store;

pub use config::StoreConfig;
pub use error::{ConfigError, RecordError, StoreError};
#[cfg(feature = "native")]
pub use http::HttpStore;
pub use manager::{BusyFlags, Operation, RecordManager, Status, StatusKind, ViewState};
pub use memory::MemoryStore;
pub use record::{Field, Record, RecordFields, RecordId, UpdateDraft};
pub use store::RecordStore;
