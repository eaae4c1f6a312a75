//! Command implementations
//!
//! Every command is a method on [`Repository`](crate::areas::repository::Repository)
//! returning `anyhow::Result`, writing its output through the repository writer.
//!
//! - `plumbing`: Low-level commands for direct object and index manipulation

pub mod plumbing;

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;

/// Failures caused by how a command was invoked rather than by the repository
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("Not a valid object name {0}")]
    UnknownRevision(String),

    #[error("short object ID {prefix} is ambiguous ({} candidates)", candidates.len())]
    AmbiguousObjectId {
        prefix: String,
        candidates: Vec<ObjectId>,
    },

    #[error("{id} is not a valid '{expected}' object (found {actual})")]
    WrongObjectType {
        id: ObjectId,
        expected: ObjectType,
        actual: ObjectType,
    },

    #[error("{0}: cannot add to the index - missing --add option?")]
    MissingAddOption(String),

    #[error("{0}: does not exist and --remove not passed")]
    MissingRemoveOption(String),
}
