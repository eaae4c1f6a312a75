use crate::areas::database::Database;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::PathBuf;

/// Where `hash-object` takes its content from
#[derive(Debug, Clone)]
pub enum HashSource {
    /// Content already read, e.g. from standard input
    Content(Bytes),
    /// A file path, relative to the current directory
    File(PathBuf),
}

impl HashSource {
    fn read(&self) -> anyhow::Result<Bytes> {
        match self {
            HashSource::Content(content) => Ok(content.clone()),
            HashSource::File(path) => std::fs::read(path)
                .map(Bytes::from)
                .with_context(|| format!("Unable to hash {}", path.display())),
        }
    }
}

/// Print the blob id of every source without touching any repository
pub fn print_blob_ids(sources: &[HashSource], writer: &mut dyn Write) -> anyhow::Result<()> {
    for source in sources {
        let object_id = Database::hash(ObjectType::Blob, &source.read()?);
        writeln!(writer, "{object_id}")?;
    }

    Ok(())
}

impl Repository {
    /// Print the blob id of every source, storing the blobs when `write` is set
    pub fn hash_object(&mut self, sources: &[HashSource], write: bool) -> anyhow::Result<()> {
        if !write {
            return print_blob_ids(sources, &mut *self.writer());
        }

        for source in sources {
            let object_id = self.database().write(ObjectType::Blob, &source.read()?)?;
            writeln!(self.writer(), "{object_id}")?;
        }

        Ok(())
    }
}
