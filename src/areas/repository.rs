use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::errors::{Error, Result};
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Directory holding the object database, refs and index
pub const REPOSITORY_DIR_NAME: &str = ".bit";

const OBJECTS_DIR_NAME: &str = "objects";
const INDEX_FILE_NAME: &str = "index";

/// Walk up from `start` to the first directory containing a `.bit` directory
pub fn discover_root(start: &Path) -> Result<PathBuf> {
    let start = start
        .canonicalize()
        .map_err(|e| Error::io(start, e))?;

    let root = start
        .ancestors()
        .find(|dir| dir.join(REPOSITORY_DIR_NAME).is_dir())
        .map(Path::to_path_buf);

    root.ok_or(Error::RepositoryNotFound(start))
}

/// A workspace root together with the stores under its `.bit` directory
///
/// Command output goes through `writer` so tests can capture it.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Open the repository whose workspace root is `path`
    ///
    /// The directory is created when missing so `init` can target a fresh path.
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;
        }
        let path = path.canonicalize().map_err(|e| Error::io(path, e))?;
        let git_path = path.join(REPOSITORY_DIR_NAME);

        Ok(Repository {
            database: Database::new(git_path.join(OBJECTS_DIR_NAME).into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            refs: Refs::new(git_path.into_boxed_path()),
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
        })
    }

    /// Open the repository enclosing `start`
    pub fn discover(start: &Path, writer: Box<dyn std::io::Write>) -> Result<Self> {
        Repository::new(&discover_root(start)?, writer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> PathBuf {
        self.path.join(REPOSITORY_DIR_NAME)
    }

    pub fn index_path(&self) -> PathBuf {
        self.git_path().join(INDEX_FILE_NAME)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    /// Read the index from disk, or an empty one if none has been saved yet
    pub fn load_index(&self) -> Result<Index> {
        Index::load(self.index_path().into_boxed_path())
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
