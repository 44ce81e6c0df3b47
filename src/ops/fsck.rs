use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::hash::ObjectId;
use crate::object::{list_objects, object_exists, read_commit, read_object, read_tree, ObjectType};
use crate::repo::Repo;
use crate::types::{Commit, Tree};

/// fsck report
#[derive(Debug, Default)]
pub struct FsckReport {
    /// objects checked
    pub objects_checked: usize,
    /// objects that fail to read, verify or decode
    pub corrupt_objects: Vec<CorruptObject>,
    /// objects referenced from HEAD's history but absent from the store
    pub missing_objects: Vec<MissingObject>,
    /// objects not reachable from HEAD
    pub dangling_objects: Vec<ObjectId>,
}

impl FsckReport {
    pub fn is_ok(&self) -> bool {
        self.corrupt_objects.is_empty() && self.missing_objects.is_empty()
    }
}

#[derive(Debug)]
pub struct CorruptObject {
    pub id: ObjectId,
    pub message: String,
}

#[derive(Debug)]
pub struct MissingObject {
    pub id: ObjectId,
    pub object_type: ObjectType,
    pub referenced_by: String,
}

/// verify repository integrity
///
/// every stored object is re-hashed and decoded, then the history behind
/// HEAD is walked to find missing and dangling objects.
pub fn fsck(repo: &Repo) -> Result<FsckReport> {
    let mut report = FsckReport::default();
    let all = list_objects(repo)?;

    for id in &all {
        report.objects_checked += 1;
        if let Err(e) = verify_object(repo, id) {
            tracing::debug!(%id, error = %e, "corrupt object");
            report.corrupt_objects.push(CorruptObject {
                id: *id,
                message: e.to_string(),
            });
        }
    }

    let reachable = walk_reachable(repo, &mut report)?;

    report.dangling_objects = all
        .into_iter()
        .filter(|id| !reachable.contains(id))
        .collect();

    Ok(report)
}

/// read, verify and decode one object
fn verify_object(repo: &Repo, id: &ObjectId) -> Result<()> {
    match read_object(repo, id)? {
        (ObjectType::Blob, _) => {}
        (ObjectType::Tree, payload) => {
            Tree::decode(&payload)?;
        }
        (ObjectType::Commit, payload) => {
            Commit::decode(id, &payload)?;
        }
    }
    Ok(())
}

/// collect everything reachable from HEAD, recording missing references and
/// references to objects of the wrong type
fn walk_reachable(repo: &Repo, report: &mut FsckReport) -> Result<HashSet<ObjectId>> {
    let mut reachable = HashSet::new();
    let mut pending: Vec<(ObjectId, ObjectType, String)> = Vec::new();

    if let Some(head) = repo.get_head()? {
        pending.push((head, ObjectType::Commit, "HEAD".to_string()));
    }

    while let Some((id, expected, referenced_by)) = pending.pop() {
        if !reachable.insert(id) {
            continue;
        }

        if !object_exists(repo, &id) {
            report.missing_objects.push(MissingObject {
                id,
                object_type: expected,
                referenced_by,
            });
            continue;
        }

        let result = match expected {
            ObjectType::Blob => Ok(()),
            ObjectType::Tree => read_tree(repo, &id).map(|tree| {
                let by = format!("tree {}", id);
                for entry in tree.entries() {
                    pending.push((entry.id, entry.kind.object_type(), by.clone()));
                }
            }),
            ObjectType::Commit => read_commit(repo, &id).map(|commit| {
                let by = format!("commit {}", id);
                pending.push((commit.tree, ObjectType::Tree, by.clone()));
                if let Some(parent) = commit.parent {
                    pending.push((parent, ObjectType::Commit, by));
                }
            }),
        };

        match result {
            Ok(()) => {}
            // the object itself is fine, the reference to it is not
            Err(e @ Error::TypeMismatch { .. }) => report.corrupt_objects.push(CorruptObject {
                id,
                message: format!("referenced by {}: {}", referenced_by, e),
            }),
            // already reported by the per-object scan
            Err(_) => {}
        }
    }

    Ok(reachable)
}
