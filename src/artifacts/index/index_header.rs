use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::errors::{Error, Result};
use byteorder::ByteOrder;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexHeader {
    pub(crate) marker: [u8; 4],
    pub(crate) version: u32,
    pub(crate) entries_count: u32,
}

impl Default for IndexHeader {
    fn default() -> Self {
        IndexHeader::empty()
    }
}

impl IndexHeader {
    pub(crate) fn empty() -> Self {
        IndexHeader {
            marker: *SIGNATURE,
            version: VERSION,
            entries_count: 0,
        }
    }

    pub fn marker(&self) -> &[u8; 4] {
        &self.marker
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn entries_count(&self) -> u32 {
        self.entries_count
    }

    pub(crate) fn serialize(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.marker);
        byteorder::NetworkEndian::write_u32(&mut bytes[4..8], self.version);
        byteorder::NetworkEndian::write_u32(&mut bytes[8..12], self.entries_count);

        bytes
    }

    /// Parse and validate the 12 header bytes
    pub(crate) fn deserialize(bytes: &[u8; HEADER_SIZE]) -> Result<Self> {
        let mut marker = [0u8; 4];
        marker.copy_from_slice(&bytes[0..4]);
        let version = byteorder::NetworkEndian::read_u32(&bytes[4..8]);
        let entries_count = byteorder::NetworkEndian::read_u32(&bytes[8..12]);

        if &marker != SIGNATURE {
            return Err(Error::InvalidIndex(format!(
                "bad signature {:?}",
                String::from_utf8_lossy(&marker)
            )));
        }

        if version != VERSION {
            return Err(Error::InvalidIndex(format!(
                "unsupported version {version}"
            )));
        }

        Ok(IndexHeader {
            marker,
            version,
            entries_count,
        })
    }
}
