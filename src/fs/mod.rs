pub mod write;

pub use write::{fsync_dir, move_into, write_atomic};
