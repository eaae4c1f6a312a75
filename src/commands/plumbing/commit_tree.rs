use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{AUTHOR_ENV_PREFIX, Author, COMMITTER_ENV_PREFIX, Commit};
use crate::artifacts::objects::object::GitObject;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use std::io::Write;

impl Repository {
    /// Store a commit of `tree` on top of `parents` and print its id
    ///
    /// The author comes from `GIT_AUTHOR_*`; the committer from `GIT_COMMITTER_*`
    /// when `GIT_COMMITTER_NAME` is set, otherwise it is the author.
    pub fn commit_tree(
        &mut self,
        tree: &str,
        parents: &[String],
        message: String,
    ) -> anyhow::Result<()> {
        let tree_oid = self.resolve_object_of_type(tree, ObjectType::Tree)?;
        let parents = parents
            .iter()
            .map(|parent| self.resolve_object_of_type(parent, ObjectType::Commit))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let author = Author::load_from_env(AUTHOR_ENV_PREFIX).context("Unable to load author")?;
        let committer = match std::env::var_os(format!("{COMMITTER_ENV_PREFIX}_NAME")) {
            Some(_) => {
                Author::load_from_env(COMMITTER_ENV_PREFIX).context("Unable to load committer")?
            }
            None => author.clone(),
        };

        let commit = Commit::new(parents, tree_oid, author, committer, message);
        let commit_id = self.database().store(&GitObject::Commit(commit))?;

        writeln!(self.writer(), "{commit_id}")?;

        Ok(())
    }
}
