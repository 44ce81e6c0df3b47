use crate::error::{Error, Result};
use crate::hash::ObjectId;

/// a commit record: one tree snapshot, at most one parent, a message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    /// root tree id
    pub tree: ObjectId,
    /// previous commit (none for the first commit)
    pub parent: Option<ObjectId>,
    /// commit message
    pub message: String,
}

impl Commit {
    /// create a new commit
    pub fn new(tree: ObjectId, parent: Option<ObjectId>, message: impl Into<String>) -> Self {
        Self {
            tree,
            parent,
            message: message.into(),
        }
    }

    /// is this an initial commit (no parent)
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// serialize as `tree <id>\n[parent <id>\n]\n<message>\n`
    pub fn encode(&self) -> Vec<u8> {
        let mut out = format!("tree {}\n", self.tree);
        if let Some(parent) = &self.parent {
            out.push_str(&format!("parent {}\n", parent));
        }
        out.push('\n');
        out.push_str(&self.message);
        out.push('\n');
        out.into_bytes()
    }

    /// parse a serialized commit stored under `id`
    pub fn decode(id: &ObjectId, bytes: &[u8]) -> Result<Self> {
        let malformed = |message: &str| Error::MalformedCommit {
            id: *id,
            message: message.to_string(),
        };

        let text = std::str::from_utf8(bytes).map_err(|_| malformed("not utf-8"))?;
        let (headers, body) = text
            .split_once("\n\n")
            .ok_or_else(|| malformed("missing blank line after headers"))?;

        let mut tree = None;
        let mut parent = None;
        for line in headers.lines() {
            let (key, value) = line
                .split_once(' ')
                .ok_or_else(|| malformed("header without value"))?;
            let value = ObjectId::from_hex(value).map_err(|_| malformed("bad id in header"))?;
            let slot = match key {
                "tree" => &mut tree,
                "parent" => &mut parent,
                _ => return Err(malformed("unknown header")),
            };
            if slot.replace(value).is_some() {
                return Err(malformed("repeated header"));
            }
        }

        let tree = tree.ok_or_else(|| malformed("missing tree header"))?;
        let message = body.strip_suffix('\n').unwrap_or(body).to_string();

        Ok(Self {
            tree,
            parent,
            message,
        })
    }
}
