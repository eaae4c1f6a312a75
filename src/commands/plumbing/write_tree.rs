use crate::areas::repository::Repository;
use crate::artifacts::tree::Directory;
use std::io::Write;

impl Repository {
    /// Write the index as a hierarchy of trees and print the root tree id
    pub fn write_tree(&mut self) -> anyhow::Result<()> {
        let index = self.load_index()?;

        let mut root = Directory::build(index.entries());
        let tree_id = root.write(self.database())?;

        writeln!(self.writer(), "{tree_id}")?;

        Ok(())
    }
}
