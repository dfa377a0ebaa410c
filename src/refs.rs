//! branch references and the HEAD state machine
//!
//! a branch is one file under `refs/heads/` holding a commit hash plus
//! newline. HEAD is a single file holding exactly one of two forms:
//! `ref: refs/heads/<branch>` (symbolic) or a raw 40-hex commit hash
//! (detached). anything else is an invalid HEAD state.

use std::fs;
use std::path::PathBuf;

use crate::error::{Error, IoResultExt, Result};
use crate::hash::{is_hash_hex, Hash};
use crate::repo::Repo;

/// resolved HEAD form
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Head {
    /// HEAD points at a branch by name
    Symbolic(String),
    /// HEAD points directly at a commit
    Detached(Hash),
}

impl Head {
    pub fn is_detached(&self) -> bool {
        matches!(self, Head::Detached(_))
    }
}

/// create or update a branch to point at the given commit
pub fn write_branch(repo: &Repo, name: &str, hash: &Hash) -> Result<()> {
    validate_branch_name(name)?;

    let path = branch_path(repo, name);
    crate::fs::write_atomic(
        &repo.tmp_path(),
        &path,
        format!("{}\n", hash.to_hex()).as_bytes(),
    )
}

/// read the commit a branch points to
pub fn read_branch(repo: &Repo, name: &str) -> Result<Hash> {
    let path = branch_path(repo, name);

    let content = fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::RefNotFound(name.to_string())
        } else {
            Error::Io { path, source: e }
        }
    })?;

    Hash::from_hex(content.trim())
}

/// delete a branch
pub fn delete_branch(repo: &Repo, name: &str) -> Result<()> {
    let path = branch_path(repo, name);

    fs::remove_file(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::RefNotFound(name.to_string())
        } else {
            Error::Io { path, source: e }
        }
    })
}

/// check if a branch exists
pub fn branch_exists(repo: &Repo, name: &str) -> bool {
    branch_path(repo, name).exists()
}

/// list all branches with their target commits, sorted by name
pub fn list_branches(repo: &Repo) -> Result<Vec<(String, Hash)>> {
    let heads = repo.heads_path();
    let mut names = Vec::new();
    if heads.exists() {
        collect_branches(&heads, &heads, &mut names)?;
    }
    names.sort();

    let mut branches = Vec::with_capacity(names.len());
    for name in names {
        let hash = read_branch(repo, &name)?;
        branches.push((name, hash));
    }
    Ok(branches)
}

/// read the current HEAD state
pub fn read_head(repo: &Repo) -> Result<Head> {
    let path = repo.head_path();
    let content = fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::InvalidHeadState("HEAD file is missing".to_string())
        } else {
            Error::Io { path, source: e }
        }
    })?;
    let content = content.trim();

    if let Some(target) = content.strip_prefix("ref: ") {
        match target.strip_prefix("refs/heads/") {
            Some(branch) if !branch.is_empty() => Ok(Head::Symbolic(branch.to_string())),
            _ => Err(Error::InvalidHeadState(format!(
                "symbolic HEAD outside refs/heads: {:?}",
                target
            ))),
        }
    } else if is_hash_hex(content) {
        Ok(Head::Detached(Hash::from_hex(content)?))
    } else {
        Err(Error::InvalidHeadState(format!(
            "unrecognized HEAD content: {:?}",
            content
        )))
    }
}

/// point HEAD at a branch or directly at a commit
///
/// an existing branch name (or an explicit `refs/heads/` path) moves HEAD
/// to the symbolic state; anything else must be a full commit hash and
/// detaches HEAD. the commit is not checked for existence here, only that
/// the target parses as a hash.
pub fn update_head(repo: &Repo, target: &str) -> Result<()> {
    let content = if let Some(branch) = target.strip_prefix("refs/heads/") {
        validate_branch_name(branch)?;
        format!("ref: refs/heads/{}\n", branch)
    } else if branch_exists(repo, target) {
        format!("ref: refs/heads/{}\n", target)
    } else {
        let hash = Hash::from_hex(target)?;
        format!("{}\n", hash.to_hex())
    };

    crate::fs::write_atomic(&repo.tmp_path(), &repo.head_path(), content.as_bytes())
}

/// resolve HEAD to a commit hash
///
/// None means HEAD is on a branch with no commits yet (fresh repository):
/// the signal for "first commit, no parent".
pub fn resolve_head(repo: &Repo) -> Result<Option<Hash>> {
    match read_head(repo)? {
        Head::Detached(hash) => Ok(Some(hash)),
        Head::Symbolic(branch) => match read_branch(repo, &branch) {
            Ok(hash) => Ok(Some(hash)),
            Err(Error::RefNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        },
    }
}

/// resolve a revision string: `HEAD`, a branch name, or a full hash
pub fn resolve(repo: &Repo, rev: &str) -> Result<Hash> {
    if rev == "HEAD" {
        return resolve_head(repo)?.ok_or_else(|| Error::RefNotFound(rev.to_string()));
    }
    if branch_exists(repo, rev) {
        return read_branch(repo, rev);
    }
    if is_hash_hex(rev) {
        return Hash::from_hex(rev);
    }
    Err(Error::RefNotFound(rev.to_string()))
}

fn branch_path(repo: &Repo, name: &str) -> PathBuf {
    repo.heads_path().join(name)
}

/// recursively collect branch names relative to the heads directory
fn collect_branches(base: &PathBuf, dir: &PathBuf, names: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir).with_path(dir)? {
        let entry = entry.with_path(dir)?;
        let path = entry.path();

        if path.is_dir() {
            collect_branches(base, &path, names)?;
        } else if path.is_file() {
            if let Ok(rel) = path.strip_prefix(base) {
                names.push(rel.to_string_lossy().to_string());
            }
        }
    }
    Ok(())
}

/// validate a branch name
fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidRef("empty branch name".to_string()));
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err(Error::InvalidRef(format!(
            "branch name cannot start or end with '/': {}",
            name
        )));
    }

    if name.contains("//") {
        return Err(Error::InvalidRef(format!(
            "branch name cannot contain '//': {}",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidRef(format!(
            "branch name cannot contain null byte: {}",
            name
        )));
    }

    for component in name.split('/') {
        if component == "." || component == ".." {
            return Err(Error::InvalidRef(format!(
                "branch name cannot contain '.' or '..': {}",
                name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo_path = dir.path().join("repo");
        let repo = Repo::init(&repo_path).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_write_and_read_branch() {
        let (_dir, repo) = test_repo();

        let hash = Hash::digest(b"commit");
        write_branch(&repo, "feature", &hash).unwrap();

        assert_eq!(read_branch(&repo, "feature").unwrap(), hash);
    }

    #[test]
    fn test_branch_file_format() {
        let (_dir, repo) = test_repo();

        let hash = Hash::digest(b"commit");
        write_branch(&repo, "feature", &hash).unwrap();

        let raw = fs::read_to_string(repo.heads_path().join("feature")).unwrap();
        assert_eq!(raw, format!("{}\n", hash.to_hex()));
    }

    #[test]
    fn test_read_nonexistent_branch() {
        let (_dir, repo) = test_repo();

        let result = read_branch(&repo, "nope");
        assert!(matches!(result, Err(Error::RefNotFound(_))));
    }

    #[test]
    fn test_delete_branch() {
        let (_dir, repo) = test_repo();

        write_branch(&repo, "gone", &Hash::ZERO).unwrap();
        assert!(branch_exists(&repo, "gone"));

        delete_branch(&repo, "gone").unwrap();
        assert!(!branch_exists(&repo, "gone"));

        let result = delete_branch(&repo, "gone");
        assert!(matches!(result, Err(Error::RefNotFound(_))));
    }

    #[test]
    fn test_overwrite_branch() {
        let (_dir, repo) = test_repo();

        let h1 = Hash::digest(b"one");
        let h2 = Hash::digest(b"two");

        write_branch(&repo, "moving", &h1).unwrap();
        write_branch(&repo, "moving", &h2).unwrap();

        assert_eq!(read_branch(&repo, "moving").unwrap(), h2);
    }

    #[test]
    fn test_list_branches() {
        let (_dir, repo) = test_repo();

        write_branch(&repo, "main", &Hash::digest(b"a")).unwrap();
        write_branch(&repo, "feature/x", &Hash::digest(b"b")).unwrap();

        let branches = list_branches(&repo).unwrap();
        let names: Vec<_> = branches.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["feature/x", "main"]);
    }

    #[test]
    fn test_fresh_head_is_symbolic_master() {
        let (_dir, repo) = test_repo();

        let head = read_head(&repo).unwrap();
        assert_eq!(head, Head::Symbolic("master".to_string()));
        assert!(!head.is_detached());
    }

    #[test]
    fn test_resolve_head_fresh_repo_is_none() {
        let (_dir, repo) = test_repo();

        // master has no commits yet: "first commit, no parent" signal
        assert_eq!(resolve_head(&repo).unwrap(), None);
    }

    #[test]
    fn test_update_head_to_existing_branch() {
        let (_dir, repo) = test_repo();

        write_branch(&repo, "feature", &Hash::digest(b"c")).unwrap();
        update_head(&repo, "feature").unwrap();

        let head = read_head(&repo).unwrap();
        assert_eq!(head, Head::Symbolic("feature".to_string()));
    }

    #[test]
    fn test_update_head_detached() {
        let (_dir, repo) = test_repo();

        let hash = Hash::digest(b"commit");
        update_head(&repo, &hash.to_hex()).unwrap();

        let head = read_head(&repo).unwrap();
        assert_eq!(head, Head::Detached(hash));
        assert!(head.is_detached());

        // detached HEAD resolves to its own hash
        assert_eq!(resolve_head(&repo).unwrap(), Some(hash));
    }

    #[test]
    fn test_update_head_garbage_rejected() {
        let (_dir, repo) = test_repo();

        // neither an existing branch nor a hash
        let result = update_head(&repo, "no-such-branch");
        assert!(matches!(result, Err(Error::InvalidHashHex(_))));
    }

    #[test]
    fn test_resolve_head_through_branch() {
        let (_dir, repo) = test_repo();

        let hash = Hash::digest(b"tip");
        write_branch(&repo, "master", &hash).unwrap();

        assert_eq!(resolve_head(&repo).unwrap(), Some(hash));
    }

    #[test]
    fn test_read_head_corrupt() {
        let (_dir, repo) = test_repo();

        fs::write(repo.head_path(), "what is this").unwrap();
        let result = read_head(&repo);
        assert!(matches!(result, Err(Error::InvalidHeadState(_))));
    }

    #[test]
    fn test_resolve_rev() {
        let (_dir, repo) = test_repo();

        let hash = Hash::digest(b"tip");
        write_branch(&repo, "master", &hash).unwrap();

        assert_eq!(resolve(&repo, "HEAD").unwrap(), hash);
        assert_eq!(resolve(&repo, "master").unwrap(), hash);
        assert_eq!(resolve(&repo, &hash.to_hex()).unwrap(), hash);
        assert!(matches!(
            resolve(&repo, "unknown"),
            Err(Error::RefNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_branch_names() {
        assert!(validate_branch_name("").is_err());
        assert!(validate_branch_name("/start").is_err());
        assert!(validate_branch_name("end/").is_err());
        assert!(validate_branch_name("double//slash").is_err());
        assert!(validate_branch_name("with/../dotdot").is_err());
        assert!(validate_branch_name("with\0null").is_err());

        assert!(validate_branch_name("master").is_ok());
        assert!(validate_branch_name("feature/login").is_ok());
    }
}
