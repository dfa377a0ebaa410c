//! tree builder: converts the flat staging index into a nested tree graph

use std::collections::BTreeSet;

use crate::error::Result;
use crate::hash::Hash;
use crate::index::Index;
use crate::object::write_tree;
use crate::repo::Repo;
use crate::types::{FileMode, Tree, TreeEntry};

/// build and store the tree graph for the staged index, bottom-up
///
/// entries are partitioned by containing directory; each directory
/// becomes one tree whose entries are its direct files plus one
/// directory entry per immediate subdirectory, built post-order so a
/// parent can reference its children's hashes. an empty index produces
/// the canonical empty tree.
pub fn write_index_tree(repo: &Repo, index: &Index) -> Result<Hash> {
    build_dir(repo, index, "")
}

fn build_dir(repo: &Repo, index: &Index, prefix: &str) -> Result<Hash> {
    let mut entries = Vec::new();
    let mut subdirs = BTreeSet::new();

    for (path, entry) in index.entries() {
        let rest = match in_dir(path, prefix) {
            Some(rest) => rest,
            None => continue,
        };

        match rest.split_once('/') {
            Some((subdir, _)) => {
                subdirs.insert(subdir.to_string());
            }
            None => {
                entries.push(TreeEntry::new(
                    FileMode::parse(&entry.mode)?,
                    rest,
                    entry.hash,
                ));
            }
        }
    }

    for subdir in subdirs {
        let child_prefix = if prefix.is_empty() {
            subdir.clone()
        } else {
            format!("{}/{}", prefix, subdir)
        };
        let child_hash = build_dir(repo, index, &child_prefix)?;
        entries.push(TreeEntry::new(FileMode::Directory, subdir, child_hash));
    }

    // Tree::new sorts by name and rejects file/directory name collisions
    let tree = Tree::new(entries)?;
    write_tree(repo, &tree)
}

/// the part of `path` below `prefix`, or None if `path` is elsewhere
fn in_dir<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(path);
    }
    path.strip_prefix(prefix)?.strip_prefix('/')
}
