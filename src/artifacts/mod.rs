//! Data structures and algorithms
//!
//! - `index`: Index file format (header, entries, modes)
//! - `objects`: Object types (blob, tree, commit) and the object codec
//! - `tree`: Builds tree objects from index entries

pub mod index;
pub mod objects;
pub mod tree;
