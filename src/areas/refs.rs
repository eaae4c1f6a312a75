//! References
//!
//! References are human-readable names pointing at objects, stored as text
//! files under the repository directory:
//! - Direct: a 40-character id followed by a newline
//! - Symbolic: `ref: <name>`, used by `HEAD` to name the current branch

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use derive_new::new;
use regex::Regex;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Branch HEAD points at in a fresh repository
pub const DEFAULT_BRANCH: &str = "master";

const SYMREF_PREFIX: &str = "ref: ";

/// Symbolic references are followed at most this many times
const MAX_SYMREF_DEPTH: usize = 5;

/// Path segments git refuses in reference names
const INVALID_REF_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

static INVALID_REF_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(INVALID_REF_NAME_REGEX).ok());

/// Raw content of a reference file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefValue {
    /// Points at another reference
    SymRef(String),
    /// Points directly at an object
    Oid(ObjectId),
}

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository directory (typically `.bit`)
    path: Box<Path>,
}

impl Refs {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    /// Reject names git would refuse, such as `refs/heads/a..b` or `refs/heads/x.lock`
    pub fn validate_name(name: &str) -> Result<()> {
        let invalid = match INVALID_REF_NAME.as_ref() {
            Some(regex) => regex.is_match(name),
            None => true,
        };

        if name.is_empty() || invalid {
            return Err(Error::InvalidRefName(name.to_string()));
        }

        Ok(())
    }

    /// Content of the reference file `name`, without following it
    pub fn read_value(&self, name: &str) -> Result<Option<RefValue>> {
        Self::validate_name(name)?;
        let ref_path = self.path.join(name);

        let content = match std::fs::read_to_string(&ref_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) if ref_path.is_dir() => {
                debug!(name, error = %e, "reference path is a directory");
                return Ok(None);
            }
            Err(e) => return Err(Error::io(ref_path, e)),
        };
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        match content.strip_prefix(SYMREF_PREFIX) {
            Some(target) => Ok(Some(RefValue::SymRef(target.trim().to_string()))),
            None => Ok(Some(RefValue::Oid(ObjectId::try_parse(content)?))),
        }
    }

    /// Object id `name` resolves to, following symbolic references
    pub fn read(&self, name: &str) -> Result<Option<ObjectId>> {
        let mut current = name.to_string();

        for _ in 0..MAX_SYMREF_DEPTH {
            match self.read_value(&current)? {
                None => return Ok(None),
                Some(RefValue::Oid(oid)) => return Ok(Some(oid)),
                Some(RefValue::SymRef(target)) => current = target,
            }
        }

        Err(Error::InvalidRefName(format!(
            "{name}: too many levels of symbolic references"
        )))
    }

    pub fn read_head(&self) -> Result<Option<ObjectId>> {
        self.read(HEAD_REF_NAME)
    }

    /// Write `<oid>\n` to the reference file, creating parent directories
    pub fn write(&self, name: &str, oid: &ObjectId) -> Result<()> {
        Self::validate_name(name)?;
        self.write_file(name, &format!("{oid}\n"))?;
        debug!(name, oid = %oid, "reference updated");

        Ok(())
    }

    /// Point HEAD at `target`, e.g. `refs/heads/master`
    pub fn set_head(&self, target: &str) -> Result<()> {
        Self::validate_name(target)?;
        self.write_file(HEAD_REF_NAME, &format!("{SYMREF_PREFIX}{target}\n"))
    }

    fn write_file(&self, name: &str, content: &str) -> Result<()> {
        let ref_path = self.path.join(name);
        let ref_dir = ref_path.parent().unwrap_or(&self.path);
        std::fs::create_dir_all(ref_dir).map_err(|e| Error::io(ref_dir, e))?;

        super::replace_file(ref_dir, "tmp-ref-", &ref_path, content.as_bytes())
    }
}
