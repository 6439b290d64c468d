//! Error types for flow databases and method storage

use lcia_model::FlowKey;
use std::path::PathBuf;

/// Storage errors
///
/// Only [`StoreError::UnknownObject`] is an expected condition; callers
/// handle it and propagate everything else.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No node with this name and category path in the database
    #[error("unknown object: '{key}' in database '{database}'")]
    UnknownObject {
        /// Database searched
        database: String,
        /// Flow looked up
        key: FlowKey,
    },

    /// Lookup matched more than one node
    #[error("{count} nodes match '{key}' in database '{database}'")]
    MultipleResults {
        /// Database searched
        database: String,
        /// Flow looked up
        key: FlowKey,
        /// Number of matching nodes
        count: usize,
    },

    /// A node with this code already exists
    #[error("duplicate code '{code}' in database '{database}'")]
    DuplicateCode {
        /// Database written to
        database: String,
        /// Conflicting node code
        code: String,
    },

    /// Filesystem failure
    #[error("io error on {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Stored snapshot could not be decoded
    #[error("corrupt project snapshot {path}: {source}")]
    Corrupt {
        /// Snapshot file
        path: PathBuf,
        /// Decoding error
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot could not be encoded
    #[error("snapshot encoding failed: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StoreError {
    /// Create unknown object error
    pub fn unknown_object(database: impl Into<String>, key: FlowKey) -> Self {
        Self::UnknownObject {
            database: database.into(),
            key,
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this is the not-found condition
    #[inline]
    #[must_use]
    pub fn is_unknown_object(&self) -> bool {
        matches!(self, Self::UnknownObject { .. })
    }
}

/// Result type alias for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
