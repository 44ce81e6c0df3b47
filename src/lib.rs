//! pit - a minimal content-addressed version-control core
//!
//! a working directory is snapshotted into an object store as blobs and
//! trees, and snapshots are chained into a linear history of commits.
//!
//! # Core concepts
//!
//! - **Blob**: raw file bytes
//! - **Tree**: a directory listing, one `<type> <id> <name>` line per entry
//! - **Commit**: a tree id, an optional parent commit id and a message
//! - **HEAD**: the id of the most recent commit
//!
//! # Id format
//!
//! id = SHA256(type | 0x00 | payload), written as 64 lowercase hex chars.
//! each object is stored at `.pit/objects/<id>` as `<type>\0<payload>`.
//!
//! # Example usage
//!
//! ```no_run
//! use pit::{ops, Repo};
//! use std::path::Path;
//!
//! // initialize a repository in a working directory
//! let repo = Repo::init(Path::new("/path/to/work")).unwrap();
//!
//! // snapshot the working directory and record it on HEAD
//! let commit = ops::commit(&repo, "initial commit").unwrap();
//!
//! // later, put the working directory back the way it was
//! ops::read_tree(&repo, &commit.to_hex()).unwrap();
//! ```

mod config;
mod error;
mod hash;
mod ignore;
mod repo;

pub mod fs;
pub mod object;
pub mod ops;
pub mod types;

pub use config::{Config, CoreConfig, IgnoreConfig, DEFAULT_MAX_DEPTH};
pub use error::{Error, IoResultExt, Result};
pub use hash::{compute_id, ObjectId};
pub use ignore::{Ignore, STORE_DIR};
pub use object::{
    flatten, get, object_exists, put, read_commit, read_object, read_tree, write_commit,
    write_tree, ObjectType,
};
pub use repo::Repo;
pub use types::{Commit, EntryKind, Tree, TreeEntry};
