use std::fs;
use std::path::Path;

use crate::error::{IoResultExt, Result};
use crate::hash::ObjectId;
use crate::object::{get, put, read_object, ObjectType};
use crate::repo::Repo;

/// store a file's bytes as a blob
pub fn hash_object(repo: &Repo, path: &Path) -> Result<ObjectId> {
    let content = fs::read(path).with_path(path)?;
    put(repo, &content, ObjectType::Blob)
}

/// payload of the object behind `rev`, optionally asserting its type
pub fn cat_file(repo: &Repo, rev: &str, expected: Option<ObjectType>) -> Result<Vec<u8>> {
    let id = repo.resolve(rev)?;
    get(repo, &id, expected)
}

/// stored type of the object behind `rev`
pub fn object_type(repo: &Repo, rev: &str) -> Result<ObjectType> {
    let id = repo.resolve(rev)?;
    Ok(read_object(repo, &id)?.0)
}
