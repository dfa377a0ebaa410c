mod commit;
mod tree;

pub use commit::{Commit, Signature};
pub use tree::{FileMode, Tree, TreeEntry};
