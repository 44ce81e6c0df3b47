mod commit;
mod tree;

pub use commit::Commit;
pub use tree::{EntryKind, Tree, TreeEntry};
pub(crate) use tree::validate_entry_name;
