//! high-level operations on a repository and its working directory

mod capture;
mod commit;
mod fsck;
mod log;
mod ls_tree;
mod object;
mod restore;

pub use capture::{capture, write_tree};
pub use commit::commit;
pub use fsck::{fsck, CorruptObject, FsckReport, MissingObject};
pub use log::{log, LogEntry};
pub use ls_tree::{ls_tree, LsTreeEntry};
pub use object::{cat_file, hash_object, object_type};
pub use restore::{clear_working_directory, read_tree, restore};
