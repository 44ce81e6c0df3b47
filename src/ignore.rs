//! Ignore predicate for capture, clear and restore.
//!
//! Any path with a component equal to the store directory name is always
//! ignored, so the store is never captured into a tree nor removed or
//! overwritten by a restore. Extra glob patterns from `config.toml` are
//! matched against each component the same way.

use std::path::{Component, Path};

use glob::Pattern;

use crate::error::Result;

/// reserved store directory name inside a working root
pub const STORE_DIR: &str = ".pit";

/// compiled ignore rules
#[derive(Debug, Clone, Default)]
pub struct Ignore {
    patterns: Vec<Pattern>,
}

impl Ignore {
    /// compile ignore rules from glob pattern strings
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// is a single entry name ignored
    pub fn is_ignored_name(&self, name: &str) -> bool {
        name == STORE_DIR || self.patterns.iter().any(|p| p.matches(name))
    }

    /// is a path (relative to the working root) ignored
    ///
    /// true when any of its normal components is ignored.
    pub fn is_ignored(&self, rel_path: &Path) -> bool {
        rel_path.components().any(|c| match c {
            Component::Normal(os) => self.is_ignored_name(&os.to_string_lossy()),
            _ => false,
        })
    }
}
