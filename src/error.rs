//! Error types.

use thiserror::Error;

use crate::manager::Operation;
use crate::record::RecordId;

/// A failed call to the Record Store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("request could not be sent: {0}")]
    Transport(String),

    #[error("store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected store response: {0}")]
    Decode(String),

    #[error("no record with id {0}")]
    NotFound(RecordId),

    #[error("injected failure for {0}")]
    Injected(&'static str),
}

/// A failed Record Manager operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("failed to load records: {0}")]
    ListFailed(#[source] StoreError),

    #[error("{op} request failed: {source}")]
    RequestFailed {
        op: Operation,
        #[source]
        source: StoreError,
    },

    #[error("a {0} request is already in flight")]
    Busy(Operation),

    #[error("no record selected for update")]
    NothingSelected,

    #[error("unknown field '{0}'")]
    UnknownField(String),
}

/// Invalid Record Store connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("invalid store url '{0}': expected http:// or https://")]
    InvalidUrl(String),

    #[error("invalid timeout '{0}': expected whole seconds")]
    InvalidTimeout(String),
}
