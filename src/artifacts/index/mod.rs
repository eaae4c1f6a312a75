//! Index file format
//!
//! The index (also called staging area or dircache) records what will go
//! into the next tree.
//!
//! ## File Format (Version 2)
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "DIRC" (4 bytes)
//!   - Version: 2 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length, sorted by path bytes):
//!   - 10 x 4-byte stat fields, 20-byte object id, 2-byte flags
//!   - Path name (flags & 0x0FFF bytes)
//!   - 1..=8 NUL bytes so the entry ends on an 8-byte boundary
//! ```
//!
//! All integers are big-endian.

pub mod entry_mode;
pub mod index_entry;
pub mod index_header;

/// Size of the index header in bytes
pub const HEADER_SIZE: usize = 12; // 4 bytes for marker, 4 for version, 4 for entries_count

/// Magic signature identifying index files
pub const SIGNATURE: &[u8; 4] = b"DIRC";

/// Index file format version
pub const VERSION: u32 = 2;

/// Fixed-size part of an entry: 10 stat words, object id, flags
pub const ENTRY_METADATA_SIZE: usize = 62;

/// Entries are padded to a multiple of this many bytes
pub const ENTRY_BLOCK: usize = 8;

/// Largest path name the 12-bit length field can describe
pub const MAX_PATH_SIZE: usize = 0x0FFF;
