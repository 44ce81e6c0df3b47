use std::collections::HashSet;

use crate::error::Result;
use crate::hash::ObjectId;
use crate::object::read_commit;
use crate::repo::Repo;
use crate::types::Commit;

/// commit with its id for log output
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: ObjectId,
    pub commit: Commit,
}

/// walk the parent chain starting at `start` (HEAD when `None`)
///
/// newest first. an empty repository has an empty history.
pub fn log(repo: &Repo, start: Option<ObjectId>, max_count: Option<usize>) -> Result<Vec<LogEntry>> {
    let start = match start {
        Some(id) => Some(id),
        None => repo.get_head()?,
    };

    let mut entries = Vec::new();
    let mut visited = HashSet::new();
    let mut next = start;

    while let Some(id) = next {
        if max_count.is_some_and(|max| entries.len() >= max) {
            break;
        }
        // a parent cycle can only come from a forged object
        if !visited.insert(id) {
            tracing::warn!(commit = %id, "parent chain loops back on itself");
            break;
        }

        let commit = read_commit(repo, &id)?;
        next = commit.parent;
        entries.push(LogEntry { id, commit });
    }

    Ok(entries)
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "commit {}", self.id)?;
        if let Some(parent) = &self.commit.parent {
            writeln!(f, "parent {}", parent)?;
        }

        writeln!(f)?;
        for line in self.commit.message.lines() {
            writeln!(f, "    {}", line)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::commit;
    use std::fs;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_log_empty_repo() {
        let (_dir, repo) = test_repo();
        assert!(log(&repo, None, None).unwrap().is_empty());
    }

    #[test]
    fn test_log_newest_first() {
        let (dir, repo) = test_repo();

        let mut ids = Vec::new();
        for i in 0..3 {
            fs::write(dir.path().join("file"), format!("v{}", i)).unwrap();
            ids.push(commit(&repo, &format!("commit {}", i)).unwrap());
        }

        let entries = log(&repo, None, None).unwrap();
        let logged: Vec<_> = entries.iter().map(|e| e.id).collect();
        ids.reverse();
        assert_eq!(logged, ids);
        assert_eq!(entries[0].commit.message, "commit 2");
        assert!(entries[2].commit.is_root());
    }

    #[test]
    fn test_log_max_count_and_start() {
        let (dir, repo) = test_repo();

        fs::write(dir.path().join("file"), "a").unwrap();
        let first = commit(&repo, "a").unwrap();
        fs::write(dir.path().join("file"), "b").unwrap();
        let second = commit(&repo, "b").unwrap();
        fs::write(dir.path().join("file"), "c").unwrap();
        commit(&repo, "c").unwrap();

        let limited = log(&repo, None, Some(2)).unwrap();
        assert_eq!(limited.len(), 2);

        let from_second = log(&repo, Some(second), None).unwrap();
        let ids: Vec<_> = from_second.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn test_log_entry_display() {
        let (_dir, repo) = test_repo();
        let id = commit(&repo, "subject\n\nbody").unwrap();

        let entries = log(&repo, None, None).unwrap();
        let text = entries[0].to_string();

        assert!(text.starts_with(&format!("commit {}\n", id)));
        assert!(text.contains("    subject\n"));
        assert!(text.contains("    body\n"));
    }
}
