use crate::error::Result;
use crate::hash::ObjectId;
use crate::object::write_commit;
use crate::ops::capture::write_tree;
use crate::repo::Repo;
use crate::types::Commit;

/// snapshot the working directory and record it as a new commit on HEAD
///
/// the previous head (if any) becomes the parent. HEAD is moved only after
/// the commit object is safely stored.
pub fn commit(repo: &Repo, message: &str) -> Result<ObjectId> {
    let tree = write_tree(repo)?;
    let parent = repo.get_head()?;

    let commit = Commit::new(tree, parent, message);
    let id = write_commit(repo, &commit)?;
    repo.set_head(&id)?;

    tracing::info!(commit = %id, %tree, "committed");
    Ok(id)
}
