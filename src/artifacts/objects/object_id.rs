//! Object identifier (SHA-1 digest)
//!
//! Object ids are the 20-byte SHA-1 digest of an object's encoded bytes
//! (`<type> <len>\0<payload>`). They are rendered as 40 lowercase hex
//! characters and double as the object's on-disk address:
//! `objects/<first-2-chars>/<remaining-38-chars>`.

use crate::artifacts::objects::{OBJECT_ID_BYTES, OBJECT_ID_LENGTH};
use crate::errors::{Error, Result};
use sha1::{Digest, Sha1};
use std::io;
use std::path::PathBuf;

/// Content address of a stored object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_BYTES]);

impl ObjectId {
    /// Hash already-encoded object bytes
    pub fn digest(encoded: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(encoded);

        Self(hasher.finalize().into())
    }

    pub fn from_bytes(bytes: [u8; OBJECT_ID_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; OBJECT_ID_BYTES] {
        &self.0
    }

    /// Parse and validate an object id from its 40-character hex form
    pub fn try_parse(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref();
        if id.len() != OBJECT_ID_LENGTH {
            return Err(Error::InvalidObjectId(id.to_string()));
        }

        let mut bytes = [0u8; OBJECT_ID_BYTES];
        hex::decode_to_slice(id, &mut bytes).map_err(|_| Error::InvalidObjectId(id.to_string()))?;

        Ok(Self(bytes))
    }

    /// Read 20 raw bytes as an id
    pub fn read_h40_from<R: io::Read + ?Sized>(reader: &mut R) -> io::Result<Self> {
        let mut bytes = [0u8; OBJECT_ID_BYTES];
        reader.read_exact(&mut bytes)?;

        Ok(Self(bytes))
    }

    /// Relative storage path, `ab/cdef...`
    pub fn to_path(&self) -> PathBuf {
        let hex = self.to_string();
        let (dir, file) = hex.split_at(2);
        PathBuf::from(dir).join(file)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl std::str::FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn digest_of_hello_blob_matches_git() {
        let oid = ObjectId::digest(b"blob 6\0hello\n");
        assert_eq!(oid.to_string(), "ce013625030ba8dba906f756967f9e9ca394464a");
    }

    #[test]
    fn hex_form_survives_parsing() {
        let hex = "ce013625030ba8dba906f756967f9e9ca394464a";
        let oid = ObjectId::try_parse(hex).unwrap();

        assert_eq!(oid.to_string(), hex);
        assert_eq!(oid.as_bytes()[0], 0xce);
    }

    #[test]
    fn storage_path_splits_after_two_chars() {
        let oid = ObjectId::try_parse("ce013625030ba8dba906f756967f9e9ca394464a").unwrap();
        assert_eq!(
            oid.to_path(),
            PathBuf::from("ce").join("013625030ba8dba906f756967f9e9ca394464a")
        );
    }

    #[rstest]
    #[case("")]
    #[case("ce01362")]
    #[case("ce013625030ba8dba906f756967f9e9ca394464")]
    #[case("zz013625030ba8dba906f756967f9e9ca394464a")]
    fn rejects_malformed_ids(#[case] id: &str) {
        assert!(matches!(
            ObjectId::try_parse(id),
            Err(Error::InvalidObjectId(_))
        ));
    }

    #[test]
    fn raw_bytes_are_read_back() {
        let oid = ObjectId::digest(b"some object");
        let mut reader = oid.as_bytes().as_slice();

        let parsed = ObjectId::read_h40_from(&mut reader).unwrap();
        assert_eq!(parsed, oid);
        assert!(reader.is_empty());
    }
}
