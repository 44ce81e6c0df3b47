use std::cmp::Ordering;
use std::fmt;

use crate::error::{Error, Result};
use crate::hash::ObjectId;
use crate::object::ObjectType;

/// a directory listing, kept in canonical order
///
/// canonical order is byte-wise on `(name, id, kind)`, so a given directory
/// content always serializes to the same bytes regardless of the order the
/// filesystem reported its entries in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// create a new tree, validating and sorting entries
    pub fn new(mut entries: Vec<TreeEntry>) -> Result<Self> {
        for entry in &entries {
            validate_entry_name(&entry.name)?;
        }

        entries.sort_by(TreeEntry::canonical_cmp);

        for window in entries.windows(2) {
            if window[0].name == window[1].name {
                return Err(Error::InvalidEntryName(format!(
                    "duplicate name: {}",
                    window[0].name
                )));
            }
        }

        Ok(Self { entries })
    }

    /// create an empty tree
    pub fn empty() -> Self {
        Self { entries: vec![] }
    }

    /// get entries slice
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// consume and return entries
    pub fn into_entries(self) -> Vec<TreeEntry> {
        self.entries
    }

    /// look up entry by name
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// is tree empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// serialize as one `"<type> <id> <name>\n"` line per entry
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            out.extend_from_slice(entry.to_string().as_bytes());
            out.push(b'\n');
        }
        out
    }

    /// parse a serialized tree
    ///
    /// every line must split into type, id and name on its first two spaces;
    /// names may themselves contain spaces.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| Error::MalformedTree(String::from_utf8_lossy(bytes).into_owned()))?;

        // every line, the last included, ends in a bare '\n'
        let body = match text.strip_suffix('\n') {
            Some(body) => body,
            None if text.is_empty() => return Ok(Self::empty()),
            None => return Err(Error::MalformedTree(text.to_string())),
        };

        let mut entries = Vec::new();
        for line in body.split('\n') {
            if line.ends_with('\r') {
                return Err(Error::MalformedTree(line.to_string()));
            }

            let mut fields = line.splitn(3, ' ');
            let (kind, id, name) = match (fields.next(), fields.next(), fields.next()) {
                (Some(kind), Some(id), Some(name)) => (kind, id, name),
                _ => return Err(Error::MalformedTree(line.to_string())),
            };

            let kind = EntryKind::parse(kind)?;
            let id = ObjectId::from_hex(id).map_err(|_| Error::MalformedTree(line.to_string()))?;
            entries.push(TreeEntry::new(name, id, kind));
        }

        Self::new(entries)
    }
}

/// validate an entry name
pub(crate) fn validate_entry_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidEntryName("empty name".to_string()));
    }
    if name.contains('/') {
        return Err(Error::InvalidEntryName(format!(
            "name contains '/': {}",
            name
        )));
    }
    if name.contains('\0') || name.contains('\n') || name.contains('\r') {
        return Err(Error::InvalidEntryName(format!(
            "name contains a control byte: {:?}",
            name
        )));
    }
    if name == "." || name == ".." {
        return Err(Error::InvalidEntryName(format!("reserved name: {}", name)));
    }
    Ok(())
}

/// a single entry in a tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub id: ObjectId,
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn new(name: impl Into<String>, id: ObjectId, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            id,
            kind,
        }
    }

    /// blob entry
    pub fn blob(name: impl Into<String>, id: ObjectId) -> Self {
        Self::new(name, id, EntryKind::Blob)
    }

    /// subtree entry
    pub fn tree(name: impl Into<String>, id: ObjectId) -> Self {
        Self::new(name, id, EntryKind::Tree)
    }

    fn canonical_cmp(a: &Self, b: &Self) -> Ordering {
        a.name
            .as_bytes()
            .cmp(b.name.as_bytes())
            .then_with(|| a.id.cmp(&b.id))
            .then_with(|| a.kind.as_str().cmp(b.kind.as_str()))
    }
}

impl fmt::Display for TreeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.id, self.name)
    }
}

/// kind of object a tree entry points at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// file content
    Blob,
    /// nested directory
    Tree,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Blob => "blob",
            EntryKind::Tree => "tree",
        }
    }

    /// parse the type field of a tree line
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "blob" => Ok(EntryKind::Blob),
            "tree" => Ok(EntryKind::Tree),
            other => Err(Error::UnknownEntryType(other.to_string())),
        }
    }

    /// object type the referenced id must have
    pub fn object_type(&self) -> ObjectType {
        match self {
            EntryKind::Blob => ObjectType::Blob,
            EntryKind::Tree => ObjectType::Tree,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
