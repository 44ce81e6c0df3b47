use std::fmt;

use crate::error::Result;
use crate::hash::ObjectId;
use crate::object::{flatten, peel_to_tree, read_tree};
use crate::repo::Repo;
use crate::types::EntryKind;

/// list tree entry with full path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsTreeEntry {
    pub path: String,
    pub kind: EntryKind,
    pub id: ObjectId,
}

impl fmt::Display for LsTreeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}\t{}", self.kind, self.id, self.path)
    }
}

/// list the tree behind `rev` (a tree, a commit, or HEAD)
///
/// non-recursive listings show the top-level entries, subtrees included.
/// recursive listings show every file path.
pub fn ls_tree(repo: &Repo, rev: &str, recursive: bool) -> Result<Vec<LsTreeEntry>> {
    let id = repo.resolve(rev)?;
    let tree_id = peel_to_tree(repo, &id)?;

    if recursive {
        let files = flatten(repo, &tree_id)?;
        return Ok(files
            .into_iter()
            .map(|(path, id)| LsTreeEntry {
                path,
                kind: EntryKind::Blob,
                id,
            })
            .collect());
    }

    let tree = read_tree(repo, &tree_id)?;
    Ok(tree
        .into_entries()
        .into_iter()
        .map(|entry| LsTreeEntry {
            path: entry.name,
            kind: entry.kind,
            id: entry.id,
        })
        .collect())
}
