use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, IoResultExt, Result};
use crate::fs::write_atomic;
use crate::hash::ObjectId;
use crate::ignore::{Ignore, STORE_DIR};

const CONFIG_FILE: &str = "config.toml";

/// a pit repository: a working root plus the store directory inside it
///
/// all state (objects, head pointer, config) is reached through this handle,
/// so several repositories can be used from one process.
#[derive(Debug)]
pub struct Repo {
    work_root: PathBuf,
    path: PathBuf,
    config: Config,
    ignore: Ignore,
}

impl Repo {
    /// initialize a new repository in the given working root
    pub fn init(work_root: &Path) -> Result<Self> {
        let path = work_root.join(STORE_DIR);
        if path.exists() {
            return Err(Error::RepoExists(path));
        }

        // create directory structure
        fs::create_dir_all(path.join("objects")).with_path(&path)?;
        fs::create_dir_all(path.join("tmp")).with_path(&path)?;

        let repo = Self::from_parts(work_root, path, Config::default())?;
        repo.config.save(&repo.config_path())?;
        tracing::info!(store = %repo.path.display(), "initialized repository");

        Ok(repo)
    }

    /// open an existing repository in the given working root
    pub fn open(work_root: &Path) -> Result<Self> {
        let path = work_root.join(STORE_DIR);
        if !path.join("objects").is_dir() {
            return Err(Error::NoRepo(path));
        }

        let config = Config::load_or_default(&path.join(CONFIG_FILE))?;

        // stores created without a scratch area still need one for atomic writes
        fs::create_dir_all(path.join("tmp")).with_path(&path)?;

        Self::from_parts(work_root, path, config)
    }

    fn from_parts(work_root: &Path, path: PathBuf, config: Config) -> Result<Self> {
        let ignore = Ignore::new(&config.ignore.patterns)?;
        Ok(Self {
            work_root: work_root.to_path_buf(),
            path,
            config,
            ignore,
        })
    }

    /// store directory path (`<work_root>/.pit`)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// working directory root
    pub fn work_root(&self) -> &Path {
        &self.work_root
    }

    /// repository configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// compiled ignore predicate
    pub fn ignore(&self) -> &Ignore {
        &self.ignore
    }

    /// path to config.toml
    pub fn config_path(&self) -> PathBuf {
        self.path.join(CONFIG_FILE)
    }

    /// path to objects directory
    pub fn objects_path(&self) -> PathBuf {
        self.path.join("objects")
    }

    /// path to tmp directory (for atomic writes and restore staging)
    pub fn tmp_path(&self) -> PathBuf {
        self.path.join("tmp")
    }

    /// path to the head pointer file
    pub fn head_path(&self) -> PathBuf {
        self.path.join("HEAD")
    }

    /// read the head pointer; `None` until the first commit
    pub fn get_head(&self) -> Result<Option<ObjectId>> {
        let head_path = self.head_path();
        match fs::read_to_string(&head_path) {
            Ok(content) => ObjectId::from_hex(content.trim()).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io {
                path: head_path,
                source: e,
            }),
        }
    }

    /// overwrite the head pointer
    pub fn set_head(&self, id: &ObjectId) -> Result<()> {
        write_atomic(&self.tmp_path(), &self.head_path(), format!("{}\n", id).as_bytes())?;
        tracing::info!(head = %id, "moved HEAD");
        Ok(())
    }

    /// resolve `HEAD`/`@` or a full hex id
    pub fn resolve(&self, rev: &str) -> Result<ObjectId> {
        match rev {
            "HEAD" | "@" => self.get_head()?.ok_or(Error::NoCommits),
            _ => ObjectId::from_hex(rev),
        }
    }
}
