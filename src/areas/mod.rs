//! Core repository components
//!
//! - `database`: Loose object database for blobs, trees, and commits
//! - `index`: Staging area recording what goes into the next tree
//! - `refs`: Reference files (branches, tags, HEAD)
//! - `repository`: Repository layout, root discovery, and coordination
//! - `workspace`: Working tree file access

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;

use crate::errors::{Error, Result};
use fake::rand;
use std::io::Write;
use std::path::Path;

/// Write `content` to a fresh `{prefix}{random}` file in `dir`, then rename it over `target`
///
/// The temp file is removed again when writing or renaming fails.
pub(crate) fn replace_file(dir: &Path, prefix: &str, target: &Path, content: &[u8]) -> Result<()> {
    let temp_path = dir.join(format!("{prefix}{}", rand::random::<u32>()));

    let result = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .and_then(|mut file| file.write_all(content))
        .map_err(|e| Error::io(&temp_path, e))
        .and_then(|()| std::fs::rename(&temp_path, target).map_err(|e| Error::io(target, e)));

    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }

    result
}
