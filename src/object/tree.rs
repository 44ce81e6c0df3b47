use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::hash::ObjectId;
use crate::object::{get, put, read_object, ObjectType};
use crate::repo::Repo;
use crate::types::{Commit, EntryKind, Tree};

/// write a tree to the object store
pub fn write_tree(repo: &Repo, tree: &Tree) -> Result<ObjectId> {
    put(repo, &tree.encode(), ObjectType::Tree)
}

/// read a tree from the object store
pub fn read_tree(repo: &Repo, id: &ObjectId) -> Result<Tree> {
    let payload = get(repo, id, Some(ObjectType::Tree))?;
    Tree::decode(&payload)
}

/// the tree id behind `id`: a tree is itself, a commit yields its root tree
pub fn peel_to_tree(repo: &Repo, id: &ObjectId) -> Result<ObjectId> {
    match read_object(repo, id)? {
        (ObjectType::Tree, _) => Ok(*id),
        (ObjectType::Commit, payload) => Ok(Commit::decode(id, &payload)?.tree),
        (actual, _) => Err(Error::TypeMismatch {
            id: *id,
            expected: ObjectType::Tree,
            actual,
        }),
    }
}

/// expand a tree into a flat map of relative path -> blob id
///
/// nested trees are walked with an explicit stack, bounded by
/// `core.max_depth`. every name is validated while decoding, so no
/// returned path contains `.`/`..` components or escapes the root.
pub fn flatten(repo: &Repo, tree_id: &ObjectId) -> Result<BTreeMap<String, ObjectId>> {
    let max_depth = repo.config().core.max_depth;
    let mut files = BTreeMap::new();
    let mut pending: Vec<(String, ObjectId, usize)> = vec![(String::new(), *tree_id, 0)];

    while let Some((prefix, id, depth)) = pending.pop() {
        if depth > max_depth {
            return Err(Error::DepthExceeded {
                path: PathBuf::from(prefix),
                limit: max_depth,
            });
        }

        let tree = read_tree(repo, &id)?;
        for entry in tree.into_entries() {
            let path = if prefix.is_empty() {
                entry.name
            } else {
                format!("{}/{}", prefix, entry.name)
            };

            match entry.kind {
                EntryKind::Blob => {
                    files.insert(path, entry.id);
                }
                EntryKind::Tree => pending.push((path, entry.id, depth + 1)),
            }
        }
    }

    Ok(files)
}
