//! Typed errors for the portal library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match on
//! the failure class.

use medichain_client::{ApiError, Role};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from a storage backend.
///
/// Backend failures are host faults (unreadable session directory, broken
/// permissions), not session outcomes. They propagate as errors instead of
/// mapping to an absent or corrupt session.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Session directory could not be created
    #[error("cannot prepare session directory {path}: {source}")]
    Init {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading, writing or removing one entry failed
    #[error("storage I/O error for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Session payload could not be encoded for storage
    #[error("cannot encode session payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors surfaced by portal flows.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Required input missing or mismatched; raised before any network call
    #[error("{0}")]
    Validation(String),

    /// The operation needs a stored session for the role and none is usable
    #[error("no {role} session is stored; please log in first")]
    SessionRequired { role: Role },

    /// The backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The session store failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type alias for portal flow operations.
pub type Result<T> = std::result::Result<T, PortalError>;

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
