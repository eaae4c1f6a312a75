use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::codec;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::Result;
use bytes::Bytes;

/// A parsed object of any kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitObject {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
}

impl GitObject {
    /// Parse a payload according to the type read from its header
    pub fn parse(object_type: ObjectType, payload: Bytes) -> Result<Self> {
        match object_type {
            ObjectType::Blob => Ok(GitObject::Blob(Blob::deserialize(payload))),
            ObjectType::Tree => Ok(GitObject::Tree(Tree::deserialize(payload)?)),
            ObjectType::Commit => Ok(GitObject::Commit(Commit::deserialize(payload)?)),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            GitObject::Blob(_) => ObjectType::Blob,
            GitObject::Tree(_) => ObjectType::Tree,
            GitObject::Commit(_) => ObjectType::Commit,
        }
    }

    /// Payload bytes, without the header
    pub fn serialize(&self) -> Bytes {
        match self {
            GitObject::Blob(blob) => blob.serialize(),
            GitObject::Tree(tree) => tree.serialize(),
            GitObject::Commit(commit) => commit.serialize(),
        }
    }

    /// Header-framed bytes, as hashed and stored
    pub fn encode(&self) -> Bytes {
        codec::encode(self.object_type(), &self.serialize())
    }

    pub fn object_id(&self) -> ObjectId {
        ObjectId::digest(&self.encode())
    }

    /// Human readable rendering used by `cat-file -p`
    pub fn display(&self) -> Bytes {
        match self {
            GitObject::Blob(blob) => blob.content().clone(),
            GitObject::Tree(tree) => Bytes::from(tree.display()),
            GitObject::Commit(commit) => Bytes::from(commit.display()),
        }
    }
}

impl From<Blob> for GitObject {
    fn from(blob: Blob) -> Self {
        GitObject::Blob(blob)
    }
}

impl From<Tree> for GitObject {
    fn from(tree: Tree) -> Self {
        GitObject::Tree(tree)
    }
}

impl From<Commit> for GitObject {
    fn from(commit: Commit) -> Self {
        GitObject::Commit(commit)
    }
}
