use crate::areas::refs::{DEFAULT_BRANCH, HEAD_REF_NAME};
use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;
use std::io::Write;

/// Directories created under the repository directory
const REPOSITORY_DIRS: [&str; 4] = ["objects/info", "objects/pack", "refs/heads", "refs/tags"];

impl Repository {
    pub fn init(&mut self) -> anyhow::Result<()> {
        let git_path = self.git_path();
        let existed = git_path.is_dir();

        for dir in REPOSITORY_DIRS {
            let dir_path = git_path.join(dir);
            fs::create_dir_all(&dir_path)
                .with_context(|| format!("Failed to create {}", dir_path.display()))?;
        }

        // an existing HEAD keeps pointing wherever it points
        if !git_path.join(HEAD_REF_NAME).exists() {
            self.refs()
                .set_head(&format!("refs/heads/{DEFAULT_BRANCH}"))
                .context("Failed to create initial HEAD reference")?;
        }

        let status = match existed {
            true => "Reinitialized existing",
            false => "Initialized empty",
        };
        writeln!(
            self.writer(),
            "{status} Git repository in {}",
            git_path.display()
        )?;

        Ok(())
    }
}
