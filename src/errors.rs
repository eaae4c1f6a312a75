//! Error types for the object store, the index and the tree builder
//!
//! Library code returns [`Error`]; command handlers wrap it in `anyhow` with
//! additional context before it reaches `main`.

use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by the object codec while splitting `<type> <len>\0<payload>`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("malformed object header: {0}")]
    MalformedHeader(&'static str),

    #[error("malformed object length: {0:?}")]
    MalformedLength(String),

    #[error("truncated payload: expected {expected} bytes, found {actual}")]
    TruncatedPayload { expected: usize, actual: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("corrupt object {id}: {reason}")]
    CorruptObject { id: ObjectId, reason: String },

    #[error("malformed {kind} object: {reason}")]
    MalformedObject { kind: &'static str, reason: String },

    #[error("unexpected end of index file while reading {0}")]
    TruncatedIndex(&'static str),

    #[error("invalid index file: {0}")]
    InvalidIndex(String),

    #[error("unable to read {path}: {source}")]
    PathUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path name too long for the index: {0}")]
    PathTooLong(String),

    #[error("{0} is not tracked in the index")]
    NotTracked(String),

    #[error("invalid object id: {0:?}")]
    InvalidObjectId(String),

    #[error("invalid entry mode: {0:o}")]
    InvalidEntryMode(u32),

    #[error("invalid ref name: {0:?}")]
    InvalidRefName(String),

    #[error("not a bit repository (or any of the parent directories): {0}")]
    RepositoryNotFound(PathBuf),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::PathUnreadable {
            path: path.into(),
            source,
        }
    }
}
