//! high-level operations on sgit repositories

mod commit;
mod log;
mod write_tree;

pub use commit::commit;
pub use log::{log, LogEntry};
pub use write_tree::write_index_tree;
