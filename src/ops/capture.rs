use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};

use crate::error::{Error, IoResultExt, Result};
use crate::hash::ObjectId;
use crate::object::{self, put, ObjectType};
use crate::repo::Repo;
use crate::types::{validate_entry_name, Tree, TreeEntry};

/// capture the repository's working directory as a tree
pub fn write_tree(repo: &Repo) -> Result<ObjectId> {
    capture(repo, repo.work_root())
}

/// a directory whose children are still being captured
struct Frame {
    /// entry name in the parent tree (empty for the root)
    name: String,
    /// path relative to the capture root
    rel: PathBuf,
    depth: usize,
    /// children not visited yet, popped in name order
    pending: Vec<DirEntry>,
    entries: Vec<TreeEntry>,
}

impl Frame {
    fn open(dir: &Path, name: String, rel: PathBuf, depth: usize) -> Result<Self> {
        let mut pending: Vec<_> = fs::read_dir(dir)
            .with_path(dir)?
            .collect::<std::io::Result<Vec<_>>>()
            .with_path(dir)?;
        pending.sort_by(|a, b| b.file_name().cmp(&a.file_name()));

        Ok(Self {
            name,
            rel,
            depth,
            pending,
            entries: Vec::new(),
        })
    }
}

/// store a directory as blob and tree objects, returning the root tree id
///
/// directories are walked with an explicit stack: each one becomes a tree
/// once all of its children are stored. ignored paths are neither descended
/// into nor recorded. symlinks and special files are skipped.
pub fn capture(repo: &Repo, root: &Path) -> Result<ObjectId> {
    let max_depth = repo.config().core.max_depth;
    let mut stack = vec![Frame::open(root, String::new(), PathBuf::new(), 0)?];

    while let Some(mut frame) = stack.pop() {
        let Some(child) = frame.pending.pop() else {
            // every child stored, write this directory's tree
            let tree = Tree::new(frame.entries)?;
            let id = object::write_tree(repo, &tree)?;
            tracing::trace!(%id, path = %frame.rel.display(), "captured directory");

            match stack.last_mut() {
                Some(parent) => parent.entries.push(TreeEntry::tree(frame.name, id)),
                None => return Ok(id),
            }
            continue;
        };

        let path = child.path();
        let name = child
            .file_name()
            .into_string()
            .map_err(|os| Error::InvalidEntryName(os.to_string_lossy().into_owned()))?;
        let rel = frame.rel.join(&name);

        if repo.ignore().is_ignored_name(&name) {
            tracing::trace!(path = %rel.display(), "ignored");
            stack.push(frame);
            continue;
        }
        validate_entry_name(&name)?;

        let file_type = child.file_type().with_path(&path)?;
        if file_type.is_dir() {
            let depth = frame.depth + 1;
            if depth > max_depth {
                return Err(Error::DepthExceeded {
                    path: rel,
                    limit: max_depth,
                });
            }
            let sub = Frame::open(&path, name, rel, depth)?;
            stack.push(frame);
            stack.push(sub);
        } else if file_type.is_file() {
            let content = fs::read(&path).with_path(&path)?;
            let id = put(repo, &content, ObjectType::Blob)?;
            frame.entries.push(TreeEntry::blob(name, id));
            stack.push(frame);
        } else {
            tracing::warn!(path = %rel.display(), "skipping symlink or special file");
            stack.push(frame);
        }
    }

    unreachable!("the root frame returns its tree id when it completes")
}
