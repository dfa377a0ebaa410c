pub mod blob;
pub mod commit;
pub mod store;
pub mod tree;

pub use blob::{blob_id, read_blob, write_blob};
pub use commit::{read_commit, write_commit};
pub use store::{load_object, object_exists, object_path, store_object};
pub use tree::{read_tree, write_tree};
