use crate::error::Result;
use crate::hash::ObjectId;
use crate::object::{get, put, ObjectType};
use crate::repo::Repo;
use crate::types::Commit;

/// write a commit to the object store
pub fn write_commit(repo: &Repo, commit: &Commit) -> Result<ObjectId> {
    put(repo, &commit.encode(), ObjectType::Commit)
}

/// read a commit from the object store
pub fn read_commit(repo: &Repo, id: &ObjectId) -> Result<Commit> {
    let payload = get(repo, id, Some(ObjectType::Commit))?;
    Commit::decode(id, &payload)
}
