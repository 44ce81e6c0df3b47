use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Error, IoResultExt, Result};

/// write a file atomically: temp file in `tmp_dir` -> fsync -> rename
///
/// `tmp_dir` must be on the same filesystem as `dest`. if anything fails
/// before the rename, the temp file is removed when it goes out of scope.
pub fn write_atomic(tmp_dir: &Path, dest: &Path, content: &[u8]) -> Result<()> {
    let mut tmp = NamedTempFile::new_in(tmp_dir).with_path(tmp_dir)?;
    tmp.write_all(content).with_path(tmp.path())?;
    tmp.as_file().sync_all().with_path(tmp.path())?;

    tmp.persist(dest).map_err(|e| Error::Io {
        path: dest.to_path_buf(),
        source: e.error,
    })?;

    if let Some(parent) = dest.parent() {
        fsync_dir(parent)?;
    }

    Ok(())
}

/// sync a directory to disk
pub fn fsync_dir(path: &Path) -> Result<()> {
    let dir = File::open(path).with_path(path)?;
    dir.sync_all().with_path(path)?;
    Ok(())
}

/// move every entry under `src` into `dst` by renaming
///
/// directories that already exist at the destination are merged into
/// rather than replaced. a file that would land on an existing directory
/// is an error, so nothing already present in `dst` is destroyed.
pub fn move_into(src: &Path, dst: &Path) -> Result<()> {
    let mut pending: Vec<(PathBuf, PathBuf)> = vec![(src.to_path_buf(), dst.to_path_buf())];

    while let Some((from_dir, to_dir)) = pending.pop() {
        fs::create_dir_all(&to_dir).with_path(&to_dir)?;

        for entry in fs::read_dir(&from_dir).with_path(&from_dir)? {
            let entry = entry.with_path(&from_dir)?;
            let from = entry.path();
            let to = to_dir.join(entry.file_name());
            let from_is_dir = entry.file_type().with_path(&from)?.is_dir();

            match fs::symlink_metadata(&to) {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    fs::rename(&from, &to).with_path(&to)?;
                }
                Err(e) => return Err(Error::Io { path: to, source: e }),
                Ok(meta) if meta.is_dir() && from_is_dir => pending.push((from, to)),
                Ok(meta) if meta.is_dir() => {
                    return Err(Error::Io {
                        path: to,
                        source: std::io::Error::new(
                            std::io::ErrorKind::AlreadyExists,
                            "a directory is in the way of a restored file",
                        ),
                    });
                }
                Ok(_) => {
                    fs::remove_file(&to).with_path(&to)?;
                    fs::rename(&from, &to).with_path(&to)?;
                }
            }
        }
    }

    Ok(())
}
