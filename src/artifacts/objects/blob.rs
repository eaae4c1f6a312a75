//! Blob object
//!
//! Blobs store file content only; names and modes live in the trees that
//! point at them. Content is kept as raw bytes so binary files hash the same
//! way git hashes them.

use bytes::Bytes;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    #[new(into)]
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn serialize(&self) -> Bytes {
        self.content.clone()
    }

    pub fn deserialize(payload: Bytes) -> Self {
        Blob { content: payload }
    }
}
