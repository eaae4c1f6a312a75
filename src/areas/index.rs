//! Index (staging area)
//!
//! The index tracks which files go into the next tree, together with the
//! `lstat` metadata captured when they were staged and the id of the blob
//! holding their content.
//!
//! The whole file is read at the start of an operation, mutated in memory and
//! written back once at the end through a temporary file that is renamed over
//! the index path. Bytes after the last entry (checksum trailers, extensions
//! written by other tools) are ignored on load and not written back.

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::index::HEADER_SIZE;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, trace};

/// In-memory view of the index file
///
/// Entries are keyed by path name; `String` ordering is byte ordering, so
/// iteration always yields the order entries are saved in.
#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.bit/index`)
    path: Box<Path>,
    /// Tracked files mapped by path name
    entries: BTreeMap<String, IndexEntry>,
    /// Index file header metadata
    header: IndexHeader,
}

impl Index {
    /// Create a new empty index bound to `path`
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            header: IndexHeader::empty(),
        }
    }

    /// Read the index at `path`, or start an empty one if the file does not exist
    pub fn load(path: Box<Path>) -> Result<Self> {
        let mut index = Index::new(path);
        index.rehydrate()?;
        Ok(index)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &IndexHeader {
        &self.header
    }

    /// Discard in-memory state and re-read the file
    pub fn rehydrate(&mut self) -> Result<()> {
        self.clear();

        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(Error::io(&*self.path, e)),
        };

        // a zero-length file is what an interrupted first write leaves behind
        if content.is_empty() {
            return Ok(());
        }

        let mut reader = content.as_slice();
        let entries_count = self.parse_header(&mut reader)?;
        self.parse_entries(entries_count, &mut reader)?;

        if !reader.is_empty() {
            trace!(trailing = reader.len(), "ignoring bytes after the last index entry");
        }
        debug!(path = %self.path.display(), entries = self.entries.len(), "index loaded");

        Ok(())
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.header = IndexHeader::empty();
    }

    fn parse_header(&mut self, reader: &mut &[u8]) -> Result<u32> {
        let data: &[u8] = reader;
        let (header_bytes, rest) = data
            .split_first_chunk::<HEADER_SIZE>()
            .ok_or(Error::TruncatedIndex("header"))?;
        self.header = IndexHeader::deserialize(header_bytes)?;
        *reader = rest;

        Ok(self.header.entries_count())
    }

    fn parse_entries(&mut self, entries_count: u32, reader: &mut &[u8]) -> Result<()> {
        for _ in 0..entries_count {
            let entry = IndexEntry::deserialize(reader)?;

            if self.entries.contains_key(&entry.name) {
                return Err(Error::InvalidIndex(format!("duplicate entry {}", entry.name)));
            }
            if let Some(other) = self.conflicting_entry(&entry.name) {
                return Err(Error::InvalidIndex(format!(
                    "{} and {other} cannot both be tracked",
                    entry.name
                )));
            }
            self.entries.insert(entry.name.clone(), entry);
        }

        Ok(())
    }

    /// Write every entry in path order, replacing the index file
    pub fn save(&mut self) -> Result<()> {
        self.header.entries_count = self.entries.len() as u32;

        let mut content = Vec::with_capacity(
            HEADER_SIZE + self.entries.values().map(IndexEntry::disk_size).sum::<usize>(),
        );
        content.extend_from_slice(&self.header.serialize());
        for entry in self.entries.values() {
            content.extend_from_slice(&entry.serialize());
        }

        let index_dir = self.path.parent().unwrap_or(Path::new("."));
        super::replace_file(index_dir, "tmp-index-", &self.path, &content)?;

        debug!(path = %self.path.display(), entries = self.entries.len(), "index saved");

        Ok(())
    }

    /// Hash and store the current content of `name`, then record it
    ///
    /// An existing entry for the same path is replaced.
    pub fn stage(&mut self, database: &Database, workspace: &Workspace, name: &str) -> Result<ObjectId> {
        let metadata = workspace.stat_file(name)?;
        let content = workspace.read_content(name)?;
        let oid = database.write(ObjectType::Blob, &content)?;

        let entry = IndexEntry::new(name, oid, metadata)?;
        let replaced = self.add(entry);
        debug!(name, oid = %oid, replaced, "path staged");

        Ok(oid)
    }

    /// Drop `name` from the index once it is gone from the workspace
    ///
    /// Returns whether the entry was removed; a path that still exists on
    /// disk is left alone.
    pub fn unstage(&mut self, workspace: &Workspace, name: &str) -> Result<bool> {
        if !self.entries.contains_key(name) {
            return Err(Error::NotTracked(name.to_string()));
        }

        if workspace.exists(name) {
            trace!(name, "path still exists, keeping entry");
            return Ok(false);
        }

        self.remove(name);
        debug!(name, "path unstaged");

        Ok(true)
    }

    /// Whether the workspace content of `entry` no longer hashes to its recorded id
    ///
    /// A file that has disappeared counts as modified.
    pub fn is_modified(&self, workspace: &Workspace, entry: &IndexEntry) -> Result<bool> {
        match workspace.read_content(&entry.name) {
            Ok(content) => Ok(Database::hash(ObjectType::Blob, &content) != entry.oid),
            Err(Error::PathUnreadable { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_deleted(&self, workspace: &Workspace, name: &str) -> bool {
        !workspace.exists(name)
    }

    /// Insert or replace an entry, returning whether one was replaced
    ///
    /// Entries that would clash with the new one in a tree (a file where a
    /// directory is needed, or the other way around) are dropped first.
    pub fn add(&mut self, entry: IndexEntry) -> bool {
        self.discard_conflicts(&entry.name);

        let replaced = self.entries.insert(entry.name.clone(), entry).is_some();
        self.header.entries_count = self.entries.len() as u32;

        replaced
    }

    pub fn remove(&mut self, name: &str) -> Option<IndexEntry> {
        let removed = self.entries.remove(name);
        if removed.is_some() {
            self.header.entries_count = self.entries.len() as u32;
        }

        removed
    }

    /// A tracked entry that is a parent directory of `name`, or lives beneath it
    fn conflicting_entry(&self, name: &str) -> Option<&str> {
        let mut parent = name;
        while let Some((dir, _)) = parent.rsplit_once('/') {
            if let Some((tracked, _)) = self.entries.get_key_value(dir) {
                return Some(tracked);
            }
            parent = dir;
        }

        let prefix = format!("{name}/");
        self.entries
            .range(prefix.clone()..)
            .next()
            .map(|(child, _)| child.as_str())
            .filter(|child| child.starts_with(&prefix))
    }

    fn discard_conflicts(&mut self, name: &str) {
        let mut parent = name;
        while let Some((dir, _)) = parent.rsplit_once('/') {
            if self.entries.remove(dir).is_some() {
                debug!(name = dir, "dropping file replaced by a directory");
            }
            parent = dir;
        }

        let prefix = format!("{name}/");
        let children = self
            .entries
            .range(prefix.clone()..)
            .take_while(|(child, _)| child.starts_with(&prefix))
            .map(|(child, _)| child.clone())
            .collect::<Vec<_>>();
        for child in children {
            debug!(name = %child, "dropping entry replaced by a file");
            self.entries.remove(&child);
        }
    }

    pub fn entry_by_path(&self, name: &str) -> Option<&IndexEntry> {
        self.entries.get(name)
    }

    pub fn is_tracked(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entries in path byte order
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
