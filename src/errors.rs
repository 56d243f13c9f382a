//! Error hierarchy for the kv facade
//!
//! Errors are grouped by the layer that raises them. Store failures are
//! passed through untouched; only [`Error::NotFound`] is interpreted by the
//! config binder.

use config::ConfigError;
use tokio::task::JoinError;

use crate::ScalarKind;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Key absent in the store
    #[error("kv \"{key}\" not found")]
    NotFound { key: String },

    /// Failures reported by the external store client
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Structured config binding failures
    #[error(transparent)]
    Bind(#[from] BindError),

    /// Service registration and discovery failures
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Background watch task failures
    #[error(transparent)]
    Watch(#[from] WatchError),

    /// Client configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// True when the error means "key absent", the only recoverable lookup
    /// failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Store agent could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Store answered with an error status
    #[error("Store rejected request for {key}: {message}")]
    Rejected { key: String, message: String },

    /// Transport layer failure with source context
    #[error("Store transport failure: {source}")]
    Transport {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// Stored or default text does not parse as the target scalar kind
    #[error("malformed {kind} value {raw:?}")]
    MalformedValue { kind: ScalarKind, raw: String },

    /// Scalar kind has no coercion rule
    #[error("unsupported type \"{kind}\"")]
    UnsupportedType { kind: ScalarKind },

    /// Field metadata is not a list of key:value pairs
    #[error("invalid tag options {tag:?}")]
    InvalidTagSyntax { tag: String },

    /// Two sibling fields resolve to the same store path
    #[error("duplicate path segment at {path}")]
    DuplicatePathSegment { path: String },

    /// Field table lists a field the record does not hand out
    #[error("record has no accessor for field {field}")]
    MissingAccessor { field: &'static str },
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid service address {addr:?}")]
    InvalidServiceAddress { addr: String },

    #[error("invalid port {port:?}")]
    InvalidPort { port: String },

    #[error("service \"{service}\" not found")]
    ServiceNotFound { service: String },
}

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Background watch task failed: {0}")]
    TaskFailed(#[from] JoinError),
}
