use crate::artifacts::index::index_entry::EntryMetadata;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::os::unix::ffi::OsStrExt;
use std::path::{Component, Path, PathBuf};

/// The working tree: files addressed by `/`-separated names relative to its root
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn absolute_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Content that gets hashed for `name`: the file bytes, or the link target for symlinks
    pub fn read_content(&self, name: &str) -> Result<Bytes> {
        let file_path = self.absolute_path(name);
        let metadata =
            std::fs::symlink_metadata(&file_path).map_err(|e| Error::unreadable(&file_path, e))?;

        if metadata.file_type().is_symlink() {
            let target =
                std::fs::read_link(&file_path).map_err(|e| Error::unreadable(&file_path, e))?;
            return Ok(Bytes::copy_from_slice(target.as_os_str().as_bytes()));
        }

        let content = std::fs::read(&file_path).map_err(|e| Error::unreadable(&file_path, e))?;
        Ok(Bytes::from(content))
    }

    /// `lstat` the file and convert the result into index metadata
    pub fn stat_file(&self, name: &str) -> Result<EntryMetadata> {
        let file_path = self.absolute_path(name);
        let metadata =
            std::fs::symlink_metadata(&file_path).map_err(|e| Error::unreadable(&file_path, e))?;

        EntryMetadata::try_from((file_path.as_path(), &metadata))
    }

    /// Whether anything, including a dangling symlink, sits at `name`
    pub fn exists(&self, name: &str) -> bool {
        std::fs::symlink_metadata(self.absolute_path(name)).is_ok()
    }

    /// Turn a path given on the command line into an index name
    ///
    /// Relative paths are resolved against `cwd`. The result is normalized
    /// lexically so paths of deleted files still resolve.
    pub fn relative_name(&self, cwd: &Path, path: &Path) -> Result<String> {
        let absolute = normalize(&cwd.join(path));
        let relative = absolute.strip_prefix(&self.path).map_err(|_| {
            Error::unreadable(
                path,
                std::io::Error::other(format!("outside repository at {}", self.path.display())),
            )
        })?;

        let segments = relative
            .components()
            .map(|component| {
                component.as_os_str().to_str().ok_or_else(|| {
                    Error::unreadable(path, std::io::Error::other("path is not valid UTF-8"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if segments.is_empty() {
            return Err(Error::unreadable(
                path,
                std::io::Error::other("path names the repository root"),
            ));
        }

        Ok(segments.join("/"))
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
