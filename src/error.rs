use std::path::PathBuf;

use crate::hash::ObjectId;
use crate::object::ObjectType;

/// error type for pit operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a pit repository (or store missing): {0}")]
    NoRepo(PathBuf),

    #[error("repository already exists at {0}")]
    RepoExists(PathBuf),

    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("object {id} is a {actual}, expected {expected}")]
    TypeMismatch {
        id: ObjectId,
        expected: ObjectType,
        actual: ObjectType,
    },

    #[error("corrupt object: digest mismatch for {0}")]
    CorruptObject(ObjectId),

    #[error("malformed object {0}: missing type separator")]
    MalformedObject(ObjectId),

    #[error("invalid object type: {0}")]
    InvalidObjectType(String),

    #[error("malformed tree line: {0:?}")]
    MalformedTree(String),

    #[error("unknown tree entry type: {0}")]
    UnknownEntryType(String),

    #[error("invalid tree entry name: {0}")]
    InvalidEntryName(String),

    #[error("malformed commit {id}: {message}")]
    MalformedCommit { id: ObjectId, message: String },

    #[error("no commits yet")]
    NoCommits,

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("directory nesting exceeds limit of {limit} at {path}")]
    DepthExceeded { path: PathBuf, limit: usize },

    #[error("cannot restore file over {0}: directory holds ignored content")]
    RestoreBlocked(PathBuf),

    #[error("repository check failed: {corrupt} corrupt, {missing} missing objects")]
    FsckFailed { corrupt: usize, missing: usize },

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("invalid ignore pattern: {0}")]
    IgnorePattern(#[from] glob::PatternError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
