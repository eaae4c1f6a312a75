//! A content-addressable storage engine modeled on git's plumbing layer.
//!
//! - [`areas`]: the object database, index, refs and workspace of a repository
//! - [`artifacts`]: on-disk formats and the tree builder
//! - [`commands`]: plumbing commands run against a [`areas::repository::Repository`]
//! - [`errors`]: library error types

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
