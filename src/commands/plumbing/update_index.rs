use crate::areas::repository::Repository;
use crate::commands::UsageError;
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How `update-index` treats paths that are new to the index or gone from disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateIndexOptions {
    /// Stage paths that are not tracked yet
    pub add: bool,
    /// Drop tracked paths that no longer exist
    pub remove: bool,
}

impl Repository {
    /// Refresh, add, or remove index entries for `paths`, saving the index once at the end
    ///
    /// Paths are resolved against `cwd`.
    pub fn update_index(
        &mut self,
        cwd: &Path,
        paths: &[PathBuf],
        options: UpdateIndexOptions,
    ) -> anyhow::Result<()> {
        let mut index = self.load_index()?;

        for path in paths {
            let name = self.workspace().relative_name(cwd, path)?;
            let tracked = index.is_tracked(&name);

            if !self.workspace().exists(&name) {
                match (tracked, options.remove) {
                    (true, true) => {
                        index.unstage(self.workspace(), &name)?;
                    }
                    (false, true) => debug!(name, "nothing to remove"),
                    (_, false) => return Err(UsageError::MissingRemoveOption(name).into()),
                }
                continue;
            }

            if !tracked && !options.add {
                return Err(UsageError::MissingAddOption(name).into());
            }

            index
                .stage(self.database(), self.workspace(), &name)
                .with_context(|| format!("Unable to process path {name}"))?;
        }

        index.save().context("Unable to write new index file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn repository() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let mut repository = Repository::new(dir.path(), Box::new(std::io::sink())).unwrap();
        repository.init().unwrap();
        (dir, repository)
    }

    fn add() -> UpdateIndexOptions {
        UpdateIndexOptions {
            add: true,
            remove: false,
        }
    }

    fn names(repository: &Repository) -> Vec<String> {
        repository
            .load_index()
            .unwrap()
            .entries()
            .map(|entry| entry.name.clone())
            .collect()
    }

    #[rstest]
    fn add_stages_new_paths(repository: (TempDir, Repository)) {
        let (dir, mut repository) = repository;
        dir.child("b/c.txt").write_str("c\n").unwrap();
        dir.child("a.txt").write_str("a\n").unwrap();
        let root = repository.path().to_path_buf();

        repository
            .update_index(&root, &["b/c.txt".into(), "a.txt".into()], add())
            .unwrap();

        assert_eq!(names(&repository), vec!["a.txt", "b/c.txt"]);
    }

    #[rstest]
    fn paths_resolve_from_a_subdirectory(repository: (TempDir, Repository)) {
        let (dir, mut repository) = repository;
        dir.child("sub/file.txt").write_str("x").unwrap();
        let cwd = repository.path().join("sub");

        repository
            .update_index(&cwd, &["file.txt".into()], add())
            .unwrap();

        assert_eq!(names(&repository), vec!["sub/file.txt"]);
    }

    #[rstest]
    fn untracked_paths_need_add(repository: (TempDir, Repository)) {
        let (dir, mut repository) = repository;
        dir.child("new.txt").write_str("new").unwrap();
        let root = repository.path().to_path_buf();

        let error = repository
            .update_index(&root, &["new.txt".into()], UpdateIndexOptions::default())
            .unwrap_err();

        assert!(matches!(
            error.downcast_ref::<UsageError>(),
            Some(UsageError::MissingAddOption(_))
        ));
        assert!(names(&repository).is_empty());
    }

    #[rstest]
    fn remove_drops_deleted_paths_only(repository: (TempDir, Repository)) {
        let (dir, mut repository) = repository;
        dir.child("keep.txt").write_str("keep").unwrap();
        dir.child("gone.txt").write_str("gone").unwrap();
        let root = repository.path().to_path_buf();
        repository
            .update_index(&root, &["keep.txt".into(), "gone.txt".into()], add())
            .unwrap();
        std::fs::remove_file(dir.path().join("gone.txt")).unwrap();

        let remove = UpdateIndexOptions {
            add: false,
            remove: true,
        };
        repository
            .update_index(&root, &["keep.txt".into(), "gone.txt".into()], remove)
            .unwrap();

        assert_eq!(names(&repository), vec!["keep.txt"]);
    }

    #[rstest]
    fn deleted_paths_need_remove(repository: (TempDir, Repository)) {
        let (dir, mut repository) = repository;
        dir.child("gone.txt").write_str("gone").unwrap();
        let root = repository.path().to_path_buf();
        repository
            .update_index(&root, &["gone.txt".into()], add())
            .unwrap();
        std::fs::remove_file(dir.path().join("gone.txt")).unwrap();

        let error = repository
            .update_index(&root, &["gone.txt".into()], UpdateIndexOptions::default())
            .unwrap_err();

        assert!(matches!(
            error.downcast_ref::<UsageError>(),
            Some(UsageError::MissingRemoveOption(_))
        ));
        assert_eq!(names(&repository), vec!["gone.txt"]);
    }
}
