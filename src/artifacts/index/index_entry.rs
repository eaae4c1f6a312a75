//! Index entry representation
//!
//! Each entry in the index represents a tracked file with:
//! - File path, relative to the workspace root, `/`-separated
//! - Content hash (object ID)
//! - File metadata (mode, size, timestamps) as captured by `lstat`
//!
//! ## Entry Format
//!
//! ```text
//! ctime-sec ctime-nsec mtime-sec mtime-nsec dev ino mode uid gid size  (10 x u32)
//! object id                                                            (20 bytes)
//! flags: assume-valid | extended | stage (2 bits) | name length (12)   (u16)
//! path name                                                            (name length bytes)
//! NUL padding up to the next 8-byte boundary                           (1..=8 bytes)
//! ```

use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::index::{ENTRY_BLOCK, ENTRY_METADATA_SIZE, MAX_PATH_SIZE};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use bitflags::bitflags;
use byteorder::ByteOrder;
use bytes::Bytes;
use is_executable::IsExecutable;
use std::fs::Metadata;
use std::io::Read;
use std::os::unix::prelude::MetadataExt;
use std::path::Path;

bitflags! {
    /// The 16-bit flag word stored after the object id
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EntryFlags: u16 {
        const ASSUME_VALID = 0x8000;
        const EXTENDED = 0x4000;
        const STAGE = 0x3000;
        const NAME_LENGTH = 0x0FFF;
    }
}

impl EntryFlags {
    pub fn name_length(&self) -> usize {
        (self.bits() & Self::NAME_LENGTH.bits()) as usize
    }

    /// Replace the low 12 bits, keeping the assume-valid, extended and stage bits
    fn with_name_length(self, length: usize) -> Self {
        let length = length.min(MAX_PATH_SIZE) as u16;
        Self::from_bits_retain((self.bits() & !Self::NAME_LENGTH.bits()) | length)
    }
}

/// Index entry representing a tracked file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// File path relative to the workspace root
    pub name: String,
    /// SHA-1 of the blob holding the file content
    pub oid: ObjectId,
    /// File metadata (mode, size, timestamps)
    pub metadata: EntryMetadata,
    flags: EntryFlags,
}

impl IndexEntry {
    pub fn new(name: impl Into<String>, oid: ObjectId, metadata: EntryMetadata) -> Result<Self> {
        let name = name.into();
        if name.len() > MAX_PATH_SIZE {
            return Err(Error::PathTooLong(name));
        }

        let flags = EntryFlags::default().with_name_length(name.len());

        Ok(IndexEntry {
            name,
            oid,
            metadata,
            flags,
        })
    }

    pub fn flags(&self) -> EntryFlags {
        self.flags
    }

    pub fn mode(&self) -> EntryMode {
        self.metadata.mode
    }

    pub fn basename(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Zero bytes written after the name: at least one, up to the next 8-byte boundary
    pub fn padding_size(name_length: usize) -> usize {
        ENTRY_BLOCK - (ENTRY_METADATA_SIZE + name_length) % ENTRY_BLOCK
    }

    /// Total on-disk size of this entry
    pub fn disk_size(&self) -> usize {
        ENTRY_METADATA_SIZE + self.name.len() + Self::padding_size(self.name.len())
    }

    pub fn serialize(&self) -> Bytes {
        let mut metadata = [0u8; ENTRY_METADATA_SIZE];
        let words = [
            self.metadata.ctime,
            self.metadata.ctime_nsec,
            self.metadata.mtime,
            self.metadata.mtime_nsec,
            self.metadata.dev,
            self.metadata.ino,
            self.metadata.mode.as_u32(),
            self.metadata.uid,
            self.metadata.gid,
            self.metadata.size,
        ];
        byteorder::NetworkEndian::write_u32_into(&words, &mut metadata[0..40]);
        metadata[40..60].copy_from_slice(self.oid.as_bytes());
        let flags = self.flags.with_name_length(self.name.len());
        byteorder::NetworkEndian::write_u16(&mut metadata[60..62], flags.bits());

        let mut entry_bytes = Vec::with_capacity(self.disk_size());
        entry_bytes.extend_from_slice(&metadata);
        entry_bytes.extend_from_slice(self.name.as_bytes());
        entry_bytes.resize(self.disk_size(), 0);

        Bytes::from(entry_bytes)
    }

    /// Read one entry, including its padding, from the index stream
    pub fn deserialize(reader: &mut impl Read) -> Result<Self> {
        let mut metadata = [0u8; ENTRY_METADATA_SIZE];
        read_exact_or_truncated(reader, &mut metadata, "entry metadata")?;

        let mut words = [0u32; 10];
        byteorder::NetworkEndian::read_u32_into(&metadata[0..40], &mut words);
        let [
            ctime,
            ctime_nsec,
            mtime,
            mtime_nsec,
            dev,
            ino,
            mode,
            uid,
            gid,
            size,
        ] = words;

        let mut oid_bytes = [0u8; 20];
        oid_bytes.copy_from_slice(&metadata[40..60]);
        let flags =
            EntryFlags::from_bits_retain(byteorder::NetworkEndian::read_u16(&metadata[60..62]));

        let mut name_bytes = vec![0u8; flags.name_length()];
        read_exact_or_truncated(reader, &mut name_bytes, "entry path")?;
        let name = String::from_utf8(name_bytes)
            .map_err(|_| Error::InvalidIndex("entry path is not valid UTF-8".to_string()))?;

        let mut padding = vec![0u8; Self::padding_size(name.len())];
        read_exact_or_truncated(reader, &mut padding, "entry padding")?;

        Ok(IndexEntry {
            name,
            oid: ObjectId::from_bytes(oid_bytes),
            metadata: EntryMetadata {
                ctime,
                ctime_nsec,
                mtime,
                mtime_nsec,
                dev,
                ino,
                mode: EntryMode::try_from(mode)?,
                uid,
                gid,
                size,
            },
            flags,
        })
    }
}

fn read_exact_or_truncated(
    reader: &mut impl Read,
    buffer: &mut [u8],
    section: &'static str,
) -> Result<()> {
    reader.read_exact(buffer).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => Error::TruncatedIndex(section),
        _ => Error::InvalidIndex(e.to_string()),
    })
}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Entries order by the raw bytes of their path
impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.as_bytes().cmp(other.name.as_bytes())
    }
}

/// File metadata stored in index entries
///
/// Field widths are the on-disk ones: every value is truncated to 32 bits
/// the same way git does it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    /// Change time (seconds since Unix epoch)
    pub ctime: u32,
    /// Change time nanoseconds
    pub ctime_nsec: u32,
    /// Modification time (seconds since Unix epoch)
    pub mtime: u32,
    /// Modification time nanoseconds
    pub mtime_nsec: u32,
    /// Device ID
    pub dev: u32,
    /// Inode number
    pub ino: u32,
    /// File mode (object type and permissions)
    pub mode: EntryMode,
    /// User ID of owner
    pub uid: u32,
    /// Group ID of owner
    pub gid: u32,
    /// File size in bytes
    pub size: u32,
}

impl TryFrom<(&Path, &Metadata)> for EntryMetadata {
    type Error = Error;

    fn try_from((file_path, metadata): (&Path, &Metadata)) -> Result<Self> {
        let file_type = metadata.file_type();
        let mode = if file_type.is_symlink() {
            EntryMode::Symlink
        } else if file_type.is_file() {
            match file_path.is_executable() {
                true => EntryMode::File(FileMode::Executable),
                false => EntryMode::File(FileMode::Regular),
            }
        } else {
            return Err(Error::unreadable(
                file_path,
                std::io::Error::other("not a regular file or symbolic link"),
            ));
        };

        Ok(Self {
            ctime: metadata.ctime() as u32,
            ctime_nsec: metadata.ctime_nsec() as u32,
            mtime: metadata.mtime() as u32,
            mtime_nsec: metadata.mtime_nsec() as u32,
            dev: metadata.dev() as u32,
            ino: metadata.ino() as u32,
            mode,
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size() as u32,
        })
    }
}
