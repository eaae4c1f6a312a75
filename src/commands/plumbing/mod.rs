//! Plumbing commands
//!
//! - `init`: Create the repository layout
//! - `hash_object`: Compute (and optionally store) blob ids
//! - `cat_file`: Inspect stored objects
//! - `update_index`: Stage, refresh, or drop index entries
//! - `ls_files`: List index entries
//! - `write_tree`: Turn the index into tree objects
//! - `commit_tree`: Record a commit for a tree
//! - `update_ref`: Point a reference at an object

pub mod cat_file;
pub mod commit_tree;
pub mod hash_object;
pub mod init;
pub mod ls_files;
pub mod update_index;
pub mod update_ref;
pub mod write_tree;

use crate::areas::repository::Repository;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::commands::UsageError;
use crate::errors::Error;

/// Shortest abbreviated id accepted on the command line
pub const MIN_ABBREV_LENGTH: usize = 4;

impl Repository {
    /// Resolve a full id, a reference name, or an abbreviated id to a stored object
    pub fn resolve_object(&self, revision: &str) -> anyhow::Result<ObjectId> {
        let is_hex = revision.chars().all(|c| c.is_ascii_hexdigit());

        if revision.len() == OBJECT_ID_LENGTH && is_hex {
            let oid = ObjectId::try_parse(revision)?;
            if !self.database().contains(&oid) {
                return Err(Error::ObjectNotFound(oid).into());
            }
            return Ok(oid);
        }

        match self.refs().read(revision) {
            Ok(Some(oid)) => return Ok(oid),
            Ok(None) | Err(Error::InvalidRefName(_)) => {}
            Err(e) => return Err(e.into()),
        }

        if revision.len() < MIN_ABBREV_LENGTH || !is_hex {
            return Err(UsageError::UnknownRevision(revision.to_string()).into());
        }

        let mut candidates = self.database().find_objects_by_prefix(revision)?;
        match candidates.len() {
            0 => Err(UsageError::UnknownRevision(revision.to_string()).into()),
            1 => Ok(candidates.remove(0)),
            _ => Err(UsageError::AmbiguousObjectId {
                prefix: revision.to_string(),
                candidates,
            }
            .into()),
        }
    }

    /// Resolve `revision` and check that it names an object of the `expected` type
    pub fn resolve_object_of_type(
        &self,
        revision: &str,
        expected: ObjectType,
    ) -> anyhow::Result<ObjectId> {
        let oid = self.resolve_object(revision)?;
        let actual = self.database().object_type(&oid)?;

        if actual != expected {
            return Err(UsageError::WrongObjectType {
                id: oid,
                expected,
                actual,
            }
            .into());
        }

        Ok(oid)
    }
}
