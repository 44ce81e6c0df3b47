pub mod commit;
pub mod store;
pub mod tree;

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub use commit::{read_commit, write_commit};
pub use store::{get, list_objects, object_exists, object_path, put, read_object};
pub use tree::{flatten, peel_to_tree, read_tree, write_tree};

/// type tag stored in front of every object payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            other => Err(Error::InvalidObjectType(other.to_string())),
        }
    }
}
