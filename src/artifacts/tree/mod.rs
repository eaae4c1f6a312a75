//! Tree builder
//!
//! Turns the flat, path-sorted list of index entries into a hierarchy of
//! [`Directory`] nodes and writes that hierarchy bottom-up as tree objects.
//!
//! ## Ordering
//!
//! Children are sorted byte-ascending by name right before a directory is
//! serialized, whatever order the entries arrived in. Files and directories
//! share one ordering, so the directory `b` sorts before the file `b.txt`.

pub mod tree_node;

use crate::areas::database::Database;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::GitObject;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeRecord};
use crate::errors::Result;
pub use tree_node::{Directory, FileLeaf, TreeNode};
use tracing::{debug, trace};

impl Directory {
    /// Build the root directory from index entries
    ///
    /// The root carries an empty name; every other directory is named after
    /// its own path segment.
    pub fn build<'e>(entries: impl IntoIterator<Item = &'e IndexEntry>) -> Self {
        let mut root = Directory::new("");

        for entry in entries {
            let segments = entry
                .name
                .split('/')
                .filter(|segment| !segment.is_empty())
                .collect::<Vec<_>>();
            root.insert(&segments, entry.mode(), entry.oid);
        }

        root
    }

    /// Serialize children first, then this directory, handing each tree to `store`
    ///
    /// The id returned by `store` is cached on the directory node and used in
    /// the parent's record.
    pub fn serialize_with<F>(&mut self, store: &mut F) -> Result<ObjectId>
    where
        F: FnMut(&Directory, Tree) -> Result<ObjectId>,
    {
        self.children.sort_by(TreeNode::cmp_tree_order);

        let mut records = Vec::with_capacity(self.children.len());
        for child in &mut self.children {
            match child {
                TreeNode::Directory(directory) => {
                    let oid = directory.serialize_with(store)?;
                    records.push(TreeRecord::new(
                        EntryMode::Directory,
                        directory.name.as_str(),
                        oid,
                    ));
                }
                TreeNode::File(file) => {
                    records.push(TreeRecord::new(file.mode, file.name.as_str(), file.oid));
                }
            }
        }

        let oid = store(self, Tree::new(records))?;
        self.oid = Some(oid);

        Ok(oid)
    }

    /// Write every directory of the hierarchy into `database`, returning the id of this one
    pub fn write(&mut self, database: &Database) -> Result<ObjectId> {
        let root_oid = self.serialize_with(&mut |directory, tree| {
            let records = tree.records().len();
            let oid = database.store(&GitObject::Tree(tree))?;
            trace!(name = %directory.name, oid = %oid, records, "tree serialized");
            Ok(oid)
        })?;
        debug!(oid = %root_oid, "tree written");

        Ok(root_oid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::entry_mode::FileMode;
    use crate::artifacts::index::index_entry::EntryMetadata;
    use crate::artifacts::objects::object_type::ObjectType;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn blob_entry(name: &str, content: &[u8], mode: EntryMode) -> IndexEntry {
        let metadata = EntryMetadata {
            mode,
            ..EntryMetadata::default()
        };
        IndexEntry::new(name, Database::hash(ObjectType::Blob, content), metadata).unwrap()
    }

    fn regular(name: &str, content: &[u8]) -> IndexEntry {
        blob_entry(name, content, EntryMode::File(FileMode::Regular))
    }

    #[fixture]
    fn database() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());
        (dir, database)
    }

    #[test]
    fn nested_paths_become_directories() {
        let entries = [regular("a.txt", b"a\n"), regular("b/c.txt", b"c\n")];
        let root = Directory::build(&entries);

        assert_eq!(root.name, "");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.child_file("a.txt").unwrap().oid, entries[0].oid);

        let b = root.child_directory("b").unwrap();
        assert_eq!(b.children.len(), 1);
        assert_eq!(b.child_file("c.txt").unwrap().oid, entries[1].oid);
    }

    #[test]
    fn child_directories_are_serialized_before_their_parent() {
        let entries = [regular("a.txt", b"a\n"), regular("b/c.txt", b"c\n")];
        let mut root = Directory::build(&entries);

        let mut order = Vec::new();
        let root_oid = root
            .serialize_with(&mut |directory, tree| {
                order.push(directory.name.clone());
                Ok(GitObject::Tree(tree).object_id())
            })
            .unwrap();

        assert_eq!(order, vec!["b".to_string(), String::new()]);
        assert_eq!(root.oid, Some(root_oid));
        assert!(root.child_directory("b").unwrap().oid.is_some());
    }

    #[rstest]
    fn root_id_matches_git(database: (TempDir, Database)) {
        let (_dir, database) = database;
        let entries = [regular("a.txt", b"a\n"), regular("b/c.txt", b"c\n")];

        let mut root = Directory::build(&entries);
        let root_oid = root.write(&database).unwrap();

        assert_eq!(root_oid.to_string(), "c2daa5be1e28bc1bca9f595f0471c39598232e72");
        let b_oid = root.child_directory("b").unwrap().oid.unwrap();
        assert_eq!(b_oid.to_string(), "cf67e9ef3a0fc6d858423fc177f2fbbe985a6f17");
        assert!(database.contains(&root_oid));
        assert!(database.contains(&b_oid));
    }

    #[rstest]
    fn directory_sorts_before_file_sharing_its_prefix(database: (TempDir, Database)) {
        let (_dir, database) = database;
        let entries = [
            regular("a.txt", b"a\n"),
            regular("b.txt", b"x"),
            regular("b/c.txt", b"c\n"),
        ];

        let mut root = Directory::build(&entries);
        let root_oid = root.write(&database).unwrap();

        assert_eq!(root_oid.to_string(), "4f9f40448be503c3787e2767374e44c259a4270b");
        let b_oid = root.child_directory("b").unwrap().oid.unwrap();
        assert_eq!(b_oid.to_string(), "cf67e9ef3a0fc6d858423fc177f2fbbe985a6f17");

        let names = root.children.iter().map(TreeNode::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["a.txt", "b", "b.txt"]);
    }

    #[test]
    fn records_follow_name_order_not_arrival_order() {
        let entries = [regular("b.txt", b"x"), regular("b/c.txt", b"c\n")];
        let mut root = Directory::build(entries.iter().rev());

        let mut root_names = Vec::new();
        root.serialize_with(&mut |directory, tree| {
            if directory.name.is_empty() {
                root_names = tree.records().iter().map(|record| record.name.clone()).collect();
            }
            Ok(GitObject::Tree(tree).object_id())
        })
        .unwrap();

        assert_eq!(root_names, vec!["b".to_string(), "b.txt".to_string()]);
    }

    #[rstest]
    fn executable_and_symlink_modes_reach_the_tree(database: (TempDir, Database)) {
        let (_dir, database) = database;
        let entries = [
            regular("a.txt", b"a\n"),
            regular("b/c.txt", b"c\n"),
            blob_entry("link", b"a.txt", EntryMode::Symlink),
            blob_entry("run.sh", b"#!/bin/sh\n", EntryMode::File(FileMode::Executable)),
        ];

        let root_oid = Directory::build(&entries).write(&database).unwrap();

        assert_eq!(root_oid.to_string(), "53d3161c5894a3115f9caabd8180c9ff625a0aff");
    }

    #[rstest]
    fn build_and_write_are_deterministic(database: (TempDir, Database)) {
        let (_dir, database) = database;
        let entries = [
            regular("src/main.rs", b"fn main() {}\n"),
            regular("src/lib/mod.rs", b"\n"),
            regular("README", b"readme\n"),
        ];

        let first = Directory::build(&entries).write(&database).unwrap();
        let second = Directory::build(entries.iter().rev()).write(&database).unwrap();

        assert_eq!(first, second);
    }

    #[rstest]
    fn empty_index_writes_the_empty_tree(database: (TempDir, Database)) {
        let (_dir, database) = database;

        let root_oid = Directory::build(&[]).write(&database).unwrap();

        assert_eq!(root_oid.to_string(), "4b825dc642cb6eb9a060e54bf8d69288fbee4904");
    }
}
