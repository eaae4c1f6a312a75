use crate::areas::repository::Repository;
use crate::artifacts::objects::object::GitObject;
use std::io::Write;

/// What `cat-file` prints about an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatFileMode {
    /// `-t`: the object type
    Type,
    /// `-s`: the payload size in bytes
    Size,
    /// `-p`: the content, pretty-printed by type
    Pretty,
}

impl Repository {
    pub fn cat_file(&mut self, mode: CatFileMode, revision: &str) -> anyhow::Result<()> {
        let object_id = self.resolve_object(revision)?;
        let (object_type, payload) = self.database().read(&object_id)?;

        match mode {
            CatFileMode::Type => writeln!(self.writer(), "{object_type}")?,
            CatFileMode::Size => writeln!(self.writer(), "{}", payload.len())?,
            CatFileMode::Pretty => {
                let object = GitObject::parse(object_type, payload)?;
                self.writer().write_all(&object.display())?;
            }
        }

        Ok(())
    }
}
