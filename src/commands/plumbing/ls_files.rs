use crate::areas::repository::Repository;
use std::io::Write;

/// Which index entries `ls-files` lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LsFilesFilter {
    pub cached: bool,
    pub deleted: bool,
    pub modified: bool,
}

impl LsFilesFilter {
    /// No selection means `--cached`
    fn normalized(self) -> Self {
        match self.cached || self.deleted || self.modified {
            true => self,
            false => LsFilesFilter {
                cached: true,
                ..self
            },
        }
    }
}

impl Repository {
    pub fn ls_files(&mut self, filter: LsFilesFilter) -> anyhow::Result<()> {
        let filter = filter.normalized();
        let index = self.load_index()?;

        for entry in index.entries() {
            if filter.cached {
                writeln!(self.writer(), "{}", entry.name)?;
            }
            if filter.deleted && index.is_deleted(self.workspace(), &entry.name) {
                writeln!(self.writer(), "{}", entry.name)?;
            }
            if filter.modified && index.is_modified(self.workspace(), entry)? {
                writeln!(self.writer(), "{}", entry.name)?;
            }
        }

        Ok(())
    }
}
