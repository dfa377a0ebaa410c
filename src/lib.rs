//! sgit - minimal version-control storage engine
//!
//! a content-addressable object store (blobs, trees, commits) plus a
//! mutable staging index and a reference/HEAD layer. staging paths and
//! committing snapshots an immutable, hash-linked history graph under a
//! `.sgit` metadata directory.
//!
//! # Core concepts
//!
//! - **Blob**: raw file content, no name or structure
//! - **Tree**: a directory listing of (mode, name, hash) entries
//! - **Commit**: a snapshot pointer to a tree, with parents and metadata
//! - **Index**: the staging map from working-tree path to blob hash
//! - **HEAD**: the current branch (symbolic) or commit (detached)
//!
//! # Object format
//!
//! every object is addressed by SHA-1 over `"{type} {byte-length}\0{payload}"`
//! and stored zlib-compressed at `objects/<hash[0:2]>/<hash[2:]>`.
//!
//! # Example usage
//!
//! ```no_run
//! use sgit::{ops, Index, Repo};
//! use std::path::Path;
//!
//! // initialize a repository
//! let repo = Repo::init(Path::new("/path/to/project")).unwrap();
//!
//! // stage a file and commit it
//! let mut index = Index::load(&repo).unwrap();
//! index.add(&repo, Path::new("a.txt")).unwrap();
//! index.save(&repo).unwrap();
//! let hash = ops::commit(&repo, "first", None).unwrap();
//! ```

mod codec;
mod config;
mod error;
mod fs;
mod hash;
mod index;
mod repo;

pub mod object;
pub mod ops;
pub mod refs;
pub mod types;

pub use codec::{encode_header, split_header, ObjectType};
pub use config::Config;
pub use error::{Error, Result};
pub use hash::{is_hash_hex, Hash};
pub use index::{AddReport, Index, IndexEntry, StatusReport};
pub use object::{
    blob_id, load_object, object_exists, read_blob, read_commit, read_tree, store_object,
    write_blob, write_commit, write_tree,
};
pub use refs::{
    branch_exists, delete_branch, list_branches, read_branch, read_head, resolve, resolve_head,
    update_head, write_branch, Head,
};
pub use repo::{Repo, DEFAULT_BRANCH, META_DIR};
pub use types::{Commit, FileMode, Signature, Tree, TreeEntry};
