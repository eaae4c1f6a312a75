use crate::artifacts::objects::codec;
use crate::artifacts::objects::object::GitObject;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

const TEMP_OBJECT_PREFIX: &str = "tmp-obj-";

/// Loose object database rooted at `.bit/objects`
///
/// Objects live at `<root>/<2 hex>/<38 hex>` as zlib streams of their
/// header-framed bytes.
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

// TODO: implement packfiles for better performance and storage efficiency
impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Id the payload would be stored under, without touching the disk
    pub fn hash(object_type: ObjectType, payload: &[u8]) -> ObjectId {
        ObjectId::digest(&codec::encode(object_type, payload))
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.object_path(object_id).is_file()
    }

    /// Frame, hash, compress and persist a payload
    pub fn write(&self, object_type: ObjectType, payload: &[u8]) -> Result<ObjectId> {
        let object_content = codec::encode(object_type, payload);
        let object_id = ObjectId::digest(&object_content);
        let object_path = self.object_path(&object_id);

        // identical content hashes to the same path, so an existing file is already correct
        if object_path.exists() {
            trace!(oid = %object_id, kind = %object_type, "object already stored");
            return Ok(object_id);
        }

        let object_dir = object_path
            .parent()
            .ok_or_else(|| Error::io(&object_path, std::io::ErrorKind::InvalidInput.into()))?;
        std::fs::create_dir_all(object_dir).map_err(|e| Error::io(object_dir, e))?;

        self.write_object(object_dir, &object_path, &object_content)?;
        debug!(oid = %object_id, kind = %object_type, size = payload.len(), "object written");

        Ok(object_id)
    }

    /// Read back the type and payload stored under `object_id`
    pub fn read(&self, object_id: &ObjectId) -> Result<(ObjectType, Bytes)> {
        let object_path = self.object_path(object_id);

        let compressed = match std::fs::read(&object_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ObjectNotFound(*object_id));
            }
            Err(e) => return Err(Error::io(object_path, e)),
        };

        let object_content = Self::decompress(&compressed).map_err(|e| Error::CorruptObject {
            id: *object_id,
            reason: format!("unable to decompress: {e}"),
        })?;

        codec::decode(&object_content).map_err(|e| Error::CorruptObject {
            id: *object_id,
            reason: e.to_string(),
        })
    }

    pub fn store(&self, object: &GitObject) -> Result<ObjectId> {
        self.write(object.object_type(), &object.serialize())
    }

    pub fn load(&self, object_id: &ObjectId) -> Result<GitObject> {
        let (object_type, payload) = self.read(object_id)?;

        GitObject::parse(object_type, payload)
    }

    pub fn object_type(&self, object_id: &ObjectId) -> Result<ObjectType> {
        let (object_type, _) = self.read(object_id)?;
        Ok(object_type)
    }

    /// Find all objects whose id starts with the given hex prefix.
    ///
    /// Used to resolve abbreviated ids. More than one match means the prefix is
    /// ambiguous; the caller decides what to do with that.
    ///
    /// - For prefixes of 2+ characters, only the matching fan-out directory is read
    /// - Shorter prefixes scan every fan-out directory
    pub fn find_objects_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        let mut matches = Vec::new();

        let dir_names = if prefix.len() >= 2 {
            vec![prefix[..2].to_string()]
        } else {
            (0..=255u8).map(|i| format!("{i:02x}")).collect()
        };

        for dir_name in dir_names {
            let dir_path = self.path.join(&dir_name);
            if !dir_path.is_dir() {
                continue;
            }

            for entry in std::fs::read_dir(&dir_path).map_err(|e| Error::io(&dir_path, e))? {
                let entry = entry.map_err(|e| Error::io(&dir_path, e))?;
                let full_oid = format!("{}{}", dir_name, entry.file_name().to_string_lossy());

                // temp files and other strays fail to parse and are skipped
                if !full_oid.starts_with(&prefix) {
                    continue;
                }
                if let Ok(oid) = ObjectId::try_parse(&full_oid) {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }

    fn object_path(&self, object_id: &ObjectId) -> PathBuf {
        self.path.join(object_id.to_path())
    }

    fn write_object(&self, object_dir: &Path, object_path: &Path, object_content: &[u8]) -> Result<()> {
        let object_content = Self::compress(object_content).map_err(|e| Error::io(object_path, e))?;

        // write to a temp file first and rename it so readers never see a partial object
        super::replace_file(object_dir, TEMP_OBJECT_PREFIX, object_path, &object_content)
    }

    fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
        encoder.write_all(data)?;
        encoder.finish()
    }

    fn decompress(data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder.read_to_end(&mut decompressed_content)?;

        Ok(decompressed_content)
    }
}
