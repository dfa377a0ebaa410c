use crate::error::Result;
use crate::hash::Hash;
use crate::object::read_commit;
use crate::refs::{resolve, resolve_head};
use crate::repo::Repo;
use crate::types::Commit;

/// commit with its hash for log output
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub hash: Hash,
    pub commit: Commit,
}

/// first-parent history walk, newest first
///
/// `rev` defaults to HEAD; a fresh repository yields an empty log.
pub fn log(repo: &Repo, rev: Option<&str>, max_count: Option<usize>) -> Result<Vec<LogEntry>> {
    let start = match rev {
        Some(rev) => Some(resolve(repo, rev)?),
        None => resolve_head(repo)?,
    };

    let mut entries = Vec::new();
    let mut next = start;

    while let Some(hash) = next {
        if max_count.is_some_and(|max| entries.len() >= max) {
            break;
        }

        let commit = read_commit(repo, &hash)?;
        next = commit.parents.first().copied();
        entries.push(LogEntry { hash, commit });
    }

    Ok(entries)
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "commit {}", self.hash)?;
        writeln!(f, "Author: {}", self.commit.author.ident)?;
        writeln!(
            f,
            "Date:   {} {}",
            self.commit.author.timestamp, self.commit.author.tz
        )?;
        writeln!(f)?;
        for line in self.commit.message.lines() {
            writeln!(f, "    {}", line)?;
        }
        Ok(())
    }
}
