use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::cmp::Ordering;

/// A node of the in-memory hierarchy built from index entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Directory(Directory),
    File(FileLeaf),
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Directory(directory) => &directory.name,
            TreeNode::File(file) => &file.name,
        }
    }

    pub fn mode(&self) -> EntryMode {
        match self {
            TreeNode::Directory(_) => EntryMode::Directory,
            TreeNode::File(file) => file.mode,
        }
    }

    /// Children of a tree are ordered by the raw bytes of their names
    pub fn cmp_tree_order(&self, other: &Self) -> Ordering {
        self.name().as_bytes().cmp(other.name().as_bytes())
    }
}

/// A directory together with the children staged beneath it
#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct Directory {
    #[new(into)]
    pub name: String,
    #[new(default)]
    pub children: Vec<TreeNode>,
    /// Set once the directory has been written as a tree object
    #[new(default)]
    pub oid: Option<ObjectId>,
}

impl Directory {
    pub fn child_directory(&self, name: &str) -> Option<&Directory> {
        self.children.iter().find_map(|child| match child {
            TreeNode::Directory(directory) if directory.name == name => Some(directory),
            _ => None,
        })
    }

    pub fn child_file(&self, name: &str) -> Option<&FileLeaf> {
        self.children.iter().find_map(|child| match child {
            TreeNode::File(file) if file.name == name => Some(file),
            _ => None,
        })
    }

    /// Place a file under the directories named by `segments`
    ///
    /// Intermediate directories are matched by exact name and created when
    /// missing; the last segment becomes a [`FileLeaf`].
    pub fn insert(&mut self, segments: &[&str], mode: EntryMode, oid: ObjectId) {
        match segments {
            [] => {}
            [name] => self.children.push(TreeNode::File(FileLeaf::new(*name, mode, oid))),
            [dir_name, rest @ ..] => {
                for child in &mut self.children {
                    match child {
                        TreeNode::Directory(directory) if directory.name == *dir_name => {
                            directory.insert(rest, mode, oid);
                            return;
                        }
                        _ => {}
                    }
                }

                let mut directory = Directory::new(*dir_name);
                directory.insert(rest, mode, oid);
                self.children.push(TreeNode::Directory(directory));
            }
        }
    }
}

/// A staged file: the last path segment of an index entry
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct FileLeaf {
    #[new(into)]
    pub name: String,
    pub mode: EntryMode,
    pub oid: ObjectId,
}
