use crate::codec::ObjectType;
use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::store::{load_expected, store_object};
use crate::repo::Repo;
use crate::types::Commit;

/// write a commit to the object store
///
/// an empty message is rejected before anything touches disk; a rejected
/// commit never leaves a partial object behind.
pub fn write_commit(repo: &Repo, commit: &Commit) -> Result<Hash> {
    if commit.message.is_empty() {
        return Err(Error::EmptyMessage);
    }
    store_object(repo, ObjectType::Commit, &commit.to_bytes())
}

/// read a commit from the object store
pub fn read_commit(repo: &Repo, hash: &Hash) -> Result<Commit> {
    let payload = load_expected(repo, hash, ObjectType::Commit)?;
    Commit::parse(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Signature;
    use tempfile::tempdir;
    use walkdir::WalkDir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo_path = dir.path().join("repo");
        let repo = Repo::init(&repo_path).unwrap();
        (dir, repo)
    }

    fn sig() -> Signature {
        Signature::new("Alice <alice@example.com>", 1234567890, "+0000")
    }

    fn object_count(repo: &Repo) -> usize {
        WalkDir::new(repo.objects_path())
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .count()
    }

    #[test]
    fn test_write_and_read_commit() {
        let (_dir, repo) = test_repo();

        let commit = Commit::new(Hash::digest(b"tree"), vec![], sig(), sig(), "first commit");
        let hash = write_commit(&repo, &commit).unwrap();

        let read_back = read_commit(&repo, &hash).unwrap();
        assert_eq!(commit, read_back);
    }

    #[test]
    fn test_commit_deduplication() {
        let (_dir, repo) = test_repo();

        let commit = Commit::new(Hash::ZERO, vec![], sig(), sig(), "same");
        let h1 = write_commit(&repo, &commit).unwrap();
        let h2 = write_commit(&repo, &commit).unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_commit_with_parents() {
        let (_dir, repo) = test_repo();

        let p1 = Hash::digest(b"p1");
        let p2 = Hash::digest(b"p2");
        let commit = Commit::new(Hash::ZERO, vec![p1, p2], sig(), sig(), "merge");

        let hash = write_commit(&repo, &commit).unwrap();
        let read_back = read_commit(&repo, &hash).unwrap();
        assert_eq!(read_back.parents, vec![p1, p2]);
    }

    #[test]
    fn test_empty_message_writes_no_objects() {
        let (_dir, repo) = test_repo();

        let before = object_count(&repo);
        let commit = Commit::new(Hash::ZERO, vec![], sig(), sig(), "");
        let result = write_commit(&repo, &commit);

        assert!(matches!(result, Err(Error::EmptyMessage)));
        assert_eq!(object_count(&repo), before);
    }

    #[test]
    fn test_read_nonexistent_commit() {
        let (_dir, repo) = test_repo();

        let result = read_commit(&repo, &Hash::digest(b"missing"));
        assert!(matches!(result, Err(Error::ObjectNotFound(_))));
    }
}
