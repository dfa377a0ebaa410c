//! end-to-end commit: snapshot the staged index into the history graph

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::index::Index;
use crate::object::{read_commit, write_commit};
use crate::ops::write_tree::write_index_tree;
use crate::refs::{read_head, resolve_head, update_head, write_branch, Head};
use crate::repo::Repo;
use crate::types::{Commit, Signature};

/// commit the staged index, returning the new commit hash
///
/// all-or-nothing: every precondition is checked before the commit
/// object is written. on success the current branch advances to the new
/// commit, or HEAD itself when detached.
pub fn commit(repo: &Repo, message: &str, author: Option<&str>) -> Result<Hash> {
    // reject before writing anything, including tree objects
    if message.is_empty() {
        return Err(Error::EmptyMessage);
    }

    let index = Index::load(repo)?;
    if index.is_empty() {
        return Err(Error::NothingToCommit);
    }

    let tree_hash = write_index_tree(repo, &index)?;
    let parent = resolve_head(repo)?;

    // a snapshot identical to the parent's records no change
    if let Some(parent_hash) = parent {
        let parent_commit = read_commit(repo, &parent_hash)?;
        if parent_commit.tree == tree_hash {
            return Err(Error::NothingToCommit);
        }
    }

    let ident = match author {
        Some(ident) => ident.to_string(),
        None => repo.config().identity(),
    };
    let signature = Signature::now(ident);

    let commit = Commit::new(
        tree_hash,
        parent.into_iter().collect(),
        signature.clone(),
        signature,
        message,
    );
    let commit_hash = write_commit(repo, &commit)?;

    match read_head(repo)? {
        Head::Symbolic(branch) => write_branch(repo, &branch, &commit_hash)?,
        Head::Detached(_) => update_head(repo, &commit_hash.to_hex())?,
    }

    Ok(commit_hash)
}
