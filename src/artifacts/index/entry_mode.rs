//! File modes recorded in index entries and tree records
//!
//! The packed mode word is a 4-bit object type (regular file, symlink,
//! gitlink, directory) followed by 9 unix permission bits. Regular files only
//! ever carry `644` or `755`; every other kind carries no permission bits.

use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd, Hash)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
}

#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum EntryMode {
    File(FileMode),
    Symlink,
    Gitlink,
    Directory,
}

impl Default for EntryMode {
    fn default() -> Self {
        EntryMode::File(FileMode::Regular)
    }
}

impl EntryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::File(FileMode::Regular) => "100644",
            EntryMode::File(FileMode::Executable) => "100755",
            EntryMode::Symlink => "120000",
            EntryMode::Gitlink => "160000",
            EntryMode::Directory => "40000",
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            EntryMode::File(FileMode::Regular) => 0o100644,
            EntryMode::File(FileMode::Executable) => 0o100755,
            EntryMode::Symlink => 0o120000,
            EntryMode::Gitlink => 0o160000,
            EntryMode::Directory => 0o40000,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    /// Object kind the mode points at, as shown by `cat-file -p` on a tree
    pub fn object_kind(&self) -> &'static str {
        match self {
            EntryMode::Directory => "tree",
            EntryMode::Gitlink => "commit",
            EntryMode::File(_) | EntryMode::Symlink => "blob",
        }
    }

    /// Parse the octal form used in tree records (`100644`, `40000`, ...)
    pub fn from_octal_str(mode: &str) -> Result<Self> {
        let raw = u32::from_str_radix(mode, 8)
            .map_err(|_| Error::MalformedObject {
                kind: "tree",
                reason: format!("invalid mode {mode:?}"),
            })?;

        Self::try_from(raw)
    }
}

impl TryFrom<u32> for EntryMode {
    type Error = Error;

    fn try_from(mode: u32) -> Result<Self> {
        match mode {
            0o100644 => Ok(EntryMode::File(FileMode::Regular)),
            0o100755 => Ok(EntryMode::File(FileMode::Executable)),
            0o120000 => Ok(EntryMode::Symlink),
            0o160000 => Ok(EntryMode::Gitlink),
            0o40000 => Ok(EntryMode::Directory),
            _ => Err(Error::InvalidEntryMode(mode)),
        }
    }
}

impl From<EntryMode> for u32 {
    fn from(mode: EntryMode) -> Self {
        mode.as_u32()
    }
}

impl From<FileMode> for EntryMode {
    fn from(mode: FileMode) -> Self {
        EntryMode::File(mode)
    }
}
