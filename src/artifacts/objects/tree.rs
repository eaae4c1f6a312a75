//! Tree object
//!
//! Trees represent directory snapshots. They contain entries for files
//! (blobs) and subdirectories (other trees), along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! Records are serialized in the order they are held; the tree builder is
//! responsible for handing them over sorted.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

/// One `<mode> <name>\0<oid>` record
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeRecord {
    pub mode: EntryMode,
    #[new(into)]
    pub name: String,
    pub oid: ObjectId,
}

impl TreeRecord {
    pub fn write_to(&self, writer: &mut Vec<u8>) {
        writer.extend_from_slice(format!("{:o} {}", self.mode.as_u32(), self.name).as_bytes());
        writer.push(0);
        writer.extend_from_slice(self.oid.as_bytes());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct Tree {
    records: Vec<TreeRecord>,
}

impl Tree {
    pub fn records(&self) -> &[TreeRecord] {
        &self.records
    }

    pub fn serialize(&self) -> Bytes {
        let mut content_bytes = Vec::new();
        for record in &self.records {
            record.write_to(&mut content_bytes);
        }

        Bytes::from(content_bytes)
    }

    pub fn deserialize(payload: Bytes) -> Result<Self> {
        let mut reader = &payload[..];
        let mut records = Vec::new();

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            // Read "mode " (space-delimited)
            let n = reader.read_until(b' ', &mut mode_bytes).map_err(malformed)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(malformed("unexpected end of tree in mode"));
            }
            let mode_str = std::str::from_utf8(&mode_bytes).map_err(malformed)?;
            let mode = EntryMode::from_octal_str(mode_str)?;

            // Read "name\0"
            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes).map_err(malformed)?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(malformed("unexpected end of tree in name"));
            }
            let name = String::from_utf8(name_bytes.clone()).map_err(malformed)?;

            let oid = ObjectId::read_h40_from(&mut reader)
                .map_err(|_| malformed("unexpected end of tree in object id"))?;

            records.push(TreeRecord::new(mode, name, oid));
        }

        Ok(Tree { records })
    }

    /// `<mode> <kind> <oid>\t<name>` lines, as printed by `cat-file -p`
    pub fn display(&self) -> String {
        self.records
            .iter()
            .map(|record| {
                format!(
                    "{:0>6} {} {}\t{}\n",
                    record.mode.as_str(),
                    record.mode.object_kind(),
                    record.oid,
                    record.name
                )
            })
            .collect()
    }
}

fn malformed(reason: impl ToString) -> Error {
    Error::MalformedObject {
        kind: "tree",
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::entry_mode::FileMode;
    use pretty_assertions::assert_eq;

    fn sample_tree() -> Tree {
        Tree::new(vec![
            TreeRecord::new(
                EntryMode::File(FileMode::Regular),
                "a.txt",
                ObjectId::digest(b"blob 1\0x"),
            ),
            TreeRecord::new(EntryMode::Directory, "b", ObjectId::digest(b"tree 0\0")),
        ])
    }

    #[test]
    fn records_are_written_with_raw_ids() {
        let payload = sample_tree().serialize();
        let blob_oid = ObjectId::digest(b"blob 1\0x");

        let mut expected = b"100644 a.txt\0".to_vec();
        expected.extend_from_slice(blob_oid.as_bytes());
        assert_eq!(&payload[..expected.len()], &expected[..]);
        assert_eq!(&payload[expected.len()..expected.len() + 8], b"40000 b\0");
        assert_eq!(payload.len(), expected.len() + 8 + 20);
    }

    #[test]
    fn payload_is_parsed_back_into_records() {
        let tree = sample_tree();
        assert_eq!(Tree::deserialize(tree.serialize()).unwrap(), tree);
    }

    #[test]
    fn empty_payload_is_an_empty_tree() {
        assert_eq!(Tree::deserialize(Bytes::new()).unwrap().records().len(), 0);
    }

    #[test]
    fn truncated_record_is_malformed() {
        let payload = sample_tree().serialize();
        let truncated = payload.slice(..payload.len() - 3);

        assert!(matches!(
            Tree::deserialize(truncated),
            Err(Error::MalformedObject { kind: "tree", .. })
        ));
    }

    #[test]
    fn display_pads_directory_modes() {
        let display = sample_tree().display();
        let lines = display.lines().collect::<Vec<_>>();

        assert!(lines[0].starts_with("100644 blob "));
        assert!(lines[0].ends_with("\ta.txt"));
        assert!(lines[1].starts_with("040000 tree "));
        assert!(lines[1].ends_with("\tb"));
    }
}
