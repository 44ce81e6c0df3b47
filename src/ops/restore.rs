use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Error, IoResultExt, Result};
use crate::fs::move_into;
use crate::hash::ObjectId;
use crate::object::{flatten, get, peel_to_tree, ObjectType};
use crate::repo::Repo;

/// replace the working directory with the tree behind `rev`
///
/// `rev` may name a tree or a commit; a commit is peeled to its root tree.
/// returns the tree id that was restored.
pub fn read_tree(repo: &Repo, rev: &str) -> Result<ObjectId> {
    let id = repo.resolve(rev)?;
    let tree_id = peel_to_tree(repo, &id)?;
    restore(repo, &tree_id)?;
    Ok(tree_id)
}

/// remove every non-ignored file and directory under the working root
///
/// ignored paths (the store among them) are left alone, and so are the
/// directories that still contain them.
pub fn clear_working_directory(repo: &Repo) -> Result<()> {
    let root = repo.work_root();
    let ignore = repo.ignore();

    let mut files = Vec::new();
    let mut dirs = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| match e.path().strip_prefix(root) {
            Ok(rel) => !ignore.is_ignored(rel),
            Err(_) => false,
        });

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        } else {
            files.push(entry.into_path());
        }
    }

    for file in &files {
        fs::remove_file(file).with_path(file)?;
    }

    // children come after their parents in walk order
    for dir in dirs.iter().rev() {
        if let Err(e) = fs::remove_dir(dir) {
            let still_populated = fs::read_dir(dir)
                .map(|mut entries| entries.next().is_some())
                .unwrap_or(false);
            if !still_populated {
                return Err(Error::Io {
                    path: dir.clone(),
                    source: e,
                });
            }
            tracing::debug!(dir = %dir.display(), "keeping directory with ignored contents");
        }
    }

    tracing::debug!(files = files.len(), dirs = dirs.len(), "cleared working directory");
    Ok(())
}

/// make the working directory mirror a tree
///
/// every blob is first written into a staging directory inside the store.
/// only once the whole snapshot is staged is the working directory cleared
/// and the staged files moved into place, so a missing or corrupt object
/// leaves the working directory untouched. the same holds when a restored
/// file would land on a directory kept for its ignored content.
pub fn restore(repo: &Repo, tree_id: &ObjectId) -> Result<()> {
    let files = flatten(repo, tree_id)?;
    check_kept_dirs(repo, files.keys())?;
    let tmp = repo.tmp_path();

    let staging = tempfile::Builder::new()
        .prefix("restore-")
        .tempdir_in(&tmp)
        .with_path(&tmp)?;

    let mut staged = 0;
    for (path, blob_id) in &files {
        let rel = Path::new(path);
        if repo.ignore().is_ignored(rel) {
            tracing::warn!(path = %path, "not restoring ignored path");
            continue;
        }

        let content = get(repo, blob_id, Some(ObjectType::Blob))?;
        let dest = staging.path().join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
        fs::write(&dest, &content).with_path(&dest)?;
        staged += 1;
    }

    clear_working_directory(repo)?;
    move_into(staging.path(), repo.work_root())?;

    tracing::info!(tree = %tree_id, files = staged, "restored working directory");
    Ok(())
}

/// fail while the working directory is untouched if a restored file would
/// land on a directory that clearing keeps
fn check_kept_dirs<'a>(repo: &Repo, paths: impl Iterator<Item = &'a String>) -> Result<()> {
    for path in paths {
        if repo.ignore().is_ignored(Path::new(path)) {
            continue;
        }

        let dest = repo.work_root().join(path);
        let is_dir = fs::symlink_metadata(&dest)
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if is_dir && holds_ignored(repo, &dest)? {
            return Err(Error::RestoreBlocked(dest));
        }
    }
    Ok(())
}

/// does anything under `dir` hit the ignore predicate
fn holds_ignored(repo: &Repo, dir: &Path) -> Result<bool> {
    let root = repo.work_root();
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if let Ok(rel) = entry.path().strip_prefix(root) {
            if repo.ignore().is_ignored(rel) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn walk_error(root: &Path, e: walkdir::Error) -> Error {
    let path = e.path().unwrap_or(root).to_path_buf();
    Error::Io {
        path,
        source: e.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::hash::compute_id;
    use crate::object::{object_path, put, write_tree};
    use crate::ops::capture::write_tree as capture_work_tree;
    use crate::types::{Tree, TreeEntry};
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        (dir, repo)
    }

    /// relative paths of every regular file under `root`, outside the store
    fn list_files(root: &Path) -> Vec<String> {
        let mut files: Vec<String> = WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| e.file_name() != ".pit")
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                e.path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        files.sort();
        files
    }

    #[test]
    fn test_clear_keeps_store() {
        let (dir, repo) = test_repo();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/b/file"), "x").unwrap();
        fs::write(dir.path().join("top"), "y").unwrap();
        let id = put(&repo, b"keep me", ObjectType::Blob).unwrap();

        clear_working_directory(&repo).unwrap();

        assert!(list_files(dir.path()).is_empty());
        assert!(!dir.path().join("a").exists());
        assert!(repo.objects_path().is_dir());
        assert!(object_path(&repo, &id).exists());
    }

    #[test]
    fn test_clear_keeps_nested_ignored_paths() {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        let mut config = Config::default();
        config.ignore.patterns.push("*.keep".to_string());
        config.save(&repo.config_path()).unwrap();
        let repo = Repo::open(dir.path()).unwrap();

        fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
        fs::write(dir.path().join("sub/notes.keep"), "stay").unwrap();
        fs::write(dir.path().join("sub/deeper/gone"), "go").unwrap();
        fs::write(dir.path().join("gone"), "go").unwrap();

        clear_working_directory(&repo).unwrap();

        assert_eq!(list_files(dir.path()), vec!["sub/notes.keep"]);
        assert!(!dir.path().join("sub/deeper").exists());
    }

    #[test]
    fn test_clear_removes_symlinks_not_targets() {
        let (dir, repo) = test_repo();
        let outside = tempdir().unwrap();
        fs::write(outside.path().join("precious"), "p").unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

        clear_working_directory(&repo).unwrap();

        assert!(fs::symlink_metadata(dir.path().join("link")).is_err());
        assert!(outside.path().join("precious").exists());
    }

    #[test]
    fn test_restore_round_trip() {
        let (dir, repo) = test_repo();
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        fs::write(dir.path().join("README"), "readme").unwrap();
        fs::write(dir.path().join("src/main.c"), "int main;").unwrap();
        fs::write(dir.path().join("src/nested/deep.txt"), "deep").unwrap();

        let tree = capture_work_tree(&repo).unwrap();

        // scramble the working directory
        fs::write(dir.path().join("README"), "changed").unwrap();
        fs::remove_file(dir.path().join("src/main.c")).unwrap();
        fs::write(dir.path().join("extra"), "new").unwrap();

        restore(&repo, &tree).unwrap();

        assert_eq!(
            list_files(dir.path()),
            vec!["README", "src/main.c", "src/nested/deep.txt"]
        );
        assert_eq!(fs::read_to_string(dir.path().join("README")).unwrap(), "readme");
        assert_eq!(
            fs::read_to_string(dir.path().join("src/nested/deep.txt")).unwrap(),
            "deep"
        );
        assert_eq!(capture_work_tree(&repo).unwrap(), tree);
    }

    #[test]
    fn test_restore_empty_tree_clears() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("file"), "x").unwrap();

        let empty = write_tree(&repo, &Tree::empty()).unwrap();
        restore(&repo, &empty).unwrap();

        assert!(list_files(dir.path()).is_empty());
        assert!(repo.path().is_dir());
    }

    #[test]
    fn test_restore_missing_blob_leaves_worktree() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("current"), "untouched").unwrap();

        let present = put(&repo, b"here", ObjectType::Blob).unwrap();
        let missing = compute_id(ObjectType::Blob, b"never stored");
        let tree = write_tree(
            &repo,
            &Tree::new(vec![
                TreeEntry::blob("a", present),
                TreeEntry::blob("b", missing),
            ])
            .unwrap(),
        )
        .unwrap();

        assert!(matches!(
            restore(&repo, &tree),
            Err(Error::ObjectNotFound(_))
        ));
        assert_eq!(list_files(dir.path()), vec!["current"]);
        assert_eq!(fs::read_dir(repo.tmp_path()).unwrap().count(), 0);
    }

    #[test]
    fn test_restore_file_replaces_directory() {
        let (dir, repo) = test_repo();
        fs::create_dir_all(dir.path().join("thing/inner")).unwrap();
        fs::write(dir.path().join("thing/inner/x"), "x").unwrap();

        let blob = put(&repo, b"now a file", ObjectType::Blob).unwrap();
        let tree = write_tree(&repo, &Tree::new(vec![TreeEntry::blob("thing", blob)]).unwrap()).unwrap();

        restore(&repo, &tree).unwrap();

        assert!(dir.path().join("thing").is_file());
        assert_eq!(
            fs::read_to_string(dir.path().join("thing")).unwrap(),
            "now a file"
        );
    }

    #[test]
    fn test_restore_blocked_by_kept_directory_leaves_worktree() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("user_file"), "mine").unwrap();
        fs::create_dir_all(dir.path().join("sub/.pit")).unwrap();
        fs::write(dir.path().join("sub/.pit/HEAD"), "nested").unwrap();

        let one = put(&repo, b"1", ObjectType::Blob).unwrap();
        let two = put(&repo, b"2", ObjectType::Blob).unwrap();
        let tree = write_tree(
            &repo,
            &Tree::new(vec![TreeEntry::blob("a", one), TreeEntry::blob("sub", two)]).unwrap(),
        )
        .unwrap();

        assert!(matches!(
            restore(&repo, &tree),
            Err(Error::RestoreBlocked(p)) if p == dir.path().join("sub")
        ));

        // nothing was removed or restored
        assert_eq!(fs::read_to_string(dir.path().join("user_file")).unwrap(), "mine");
        assert!(!dir.path().join("a").exists());
        assert!(dir.path().join("sub/.pit/HEAD").is_file());
        assert_eq!(fs::read_dir(repo.tmp_path()).unwrap().count(), 0);
    }

    #[test]
    fn test_restore_merges_into_kept_directory() {
        let (dir, repo) = test_repo();
        fs::create_dir_all(dir.path().join("sub/.pit")).unwrap();
        fs::write(dir.path().join("sub/.pit/HEAD"), "nested").unwrap();

        let blob = put(&repo, b"inside", ObjectType::Blob).unwrap();
        let sub = write_tree(&repo, &Tree::new(vec![TreeEntry::blob("file", blob)]).unwrap()).unwrap();
        let tree = write_tree(&repo, &Tree::new(vec![TreeEntry::tree("sub", sub)]).unwrap()).unwrap();

        restore(&repo, &tree).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("sub/file")).unwrap(), "inside");
        assert!(dir.path().join("sub/.pit/HEAD").is_file());
    }

    #[test]
    fn test_restore_never_writes_into_store() {
        let (dir, repo) = test_repo();

        // a tree that smuggles a head file into the store directory
        let head = put(&repo, b"0000\n", ObjectType::Blob).unwrap();
        let store = write_tree(&repo, &Tree::new(vec![TreeEntry::blob("HEAD", head)]).unwrap()).unwrap();
        let keep = put(&repo, b"kept", ObjectType::Blob).unwrap();
        let tree = write_tree(
            &repo,
            &Tree::new(vec![TreeEntry::tree(".pit", store), TreeEntry::blob("a", keep)]).unwrap(),
        )
        .unwrap();

        restore(&repo, &tree).unwrap();

        assert!(!repo.head_path().exists());
        assert_eq!(repo.get_head().unwrap(), None);
        assert!(object_path(&repo, &head).exists());
        assert!(repo.config_path().is_file());
        assert_eq!(list_files(dir.path()), vec!["a"]);
    }

    #[test]
    fn test_read_tree_peels_commit() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("v"), "1").unwrap();
        let commit = crate::ops::commit(&repo, "one").unwrap();

        fs::write(dir.path().join("v"), "2").unwrap();
        let tree = read_tree(&repo, &commit.to_hex()).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("v")).unwrap(), "1");
        assert_eq!(capture_work_tree(&repo).unwrap(), tree);
    }

    #[test]
    fn test_read_tree_rejects_blob() {
        let (_dir, repo) = test_repo();
        let blob = put(&repo, b"data", ObjectType::Blob).unwrap();

        assert!(matches!(
            read_tree(&repo, &blob.to_hex()),
            Err(Error::TypeMismatch { .. })
        ));
    }
}
