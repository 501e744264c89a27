//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use tutor_core::model::{ChallengeError, ChallengeId};

/// Errors raised while loading the challenge catalog.
///
/// Any of these abandons the whole load; the registry then falls back to the
/// embedded catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("no challenge locations configured")]
    NoLocations,
    #[error("unsupported location {0}")]
    UnsupportedLocation(String),
    #[error("failed to fetch {location}: {reason}")]
    Fetch { location: String, reason: String },
    #[error("failed to parse {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid challenge in {location}: {source}")]
    Invalid {
        location: String,
        #[source]
        source: ChallengeError,
    },
    #[error("duplicate challenge id {0}")]
    DuplicateId(ChallengeId),
}

/// Errors emitted by `ProgressStore` writes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to encode progress record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors emitted by session commands.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("challenge catalog is empty")]
    EmptyCatalog,
    #[error("no challenge is active")]
    NotStarted,
    #[error("already at the first challenge")]
    BeforeFirst,
    #[error("challenge index {index} is out of range (0..{count})")]
    OutOfRange { index: usize, count: usize },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
