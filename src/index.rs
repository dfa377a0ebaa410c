//! the staging index: a mutable map from working-tree path to the blob
//! hash intended for the next commit
//!
//! persisted as a whole-map JSON snapshot at `<meta>/index`; a missing or
//! unparsable file loads as an empty index.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{Error, IoResultExt, Result};
use crate::hash::Hash;
use crate::object::{blob_id, write_blob};
use crate::repo::{Repo, META_DIR};

/// per-path staging record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub hash: Hash,
    pub mode: String,
    pub size: u64,
    pub mtime: u64,
}

/// outcome of an `add`: per-file failures do not abort the walk
#[derive(Debug, Default)]
pub struct AddReport {
    pub added: Vec<String>,
    pub failed: Vec<(String, Error)>,
}

impl AddReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// staged-vs-disk comparison result
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StatusReport {
    /// tracked paths whose content hash changed or whose file is gone
    pub modified: Vec<String>,
    /// working-tree files with no index entry
    pub untracked: Vec<String>,
}

impl StatusReport {
    pub fn is_clean(&self) -> bool {
        self.modified.is_empty() && self.untracked.is_empty()
    }
}

/// the staging index
#[derive(Debug, Default)]
pub struct Index {
    entries: BTreeMap<String, IndexEntry>,
}

impl Index {
    /// create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// load the index from the repository
    ///
    /// a missing or unparsable index file is an empty index, never an
    /// error.
    pub fn load(repo: &Repo) -> Result<Self> {
        let path = repo.index_path();
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(source) => return Err(Error::Io { path, source }),
        };

        let entries = serde_json::from_slice(&data).unwrap_or_default();
        Ok(Self { entries })
    }

    /// persist the whole map atomically
    pub fn save(&self, repo: &Repo) -> Result<()> {
        let data = serde_json::to_vec_pretty(&self.entries)?;
        crate::fs::write_atomic(&repo.tmp_path(), &repo.index_path(), &data)
    }

    /// staged entries, keyed by repo-root-relative path
    pub fn entries(&self) -> &BTreeMap<String, IndexEntry> {
        &self.entries
    }

    pub fn get(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// unstage a path
    pub fn remove(&mut self, path: &str) -> Option<IndexEntry> {
        self.entries.remove(path)
    }

    /// stage a file or directory
    ///
    /// a file is hashed and recorded (overwriting any previous entry); a
    /// directory is walked recursively, skipping the metadata directory,
    /// and per-file failures are collected while the walk continues.
    pub fn add(&mut self, repo: &Repo, path: &Path) -> Result<AddReport> {
        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            repo.work_dir().join(path)
        };

        if !full.exists() {
            return Err(Error::PathNotFound(path.to_path_buf()));
        }

        let mut report = AddReport::default();

        if full.is_dir() {
            for entry in WalkDir::new(&full)
                .into_iter()
                .filter_entry(|e| e.file_name() != META_DIR)
            {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        let at = e.path().unwrap_or(&full).display().to_string();
                        report.failed.push((at.clone(), walkdir_error(e, &at)));
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }

                let key = rel_key(repo, entry.path())?;
                match self.add_file(repo, entry.path(), &key) {
                    Ok(()) => report.added.push(key),
                    Err(e) => report.failed.push((key, e)),
                }
            }
        } else {
            let key = rel_key(repo, &full)?;
            self.add_file(repo, &full, &key)?;
            report.added.push(key);
        }

        Ok(report)
    }

    /// hash one file as a blob and record its entry
    fn add_file(&mut self, repo: &Repo, full: &Path, key: &str) -> Result<()> {
        let content = fs::read(full).with_path(full)?;
        let hash = write_blob(repo, &content)?;

        let meta = fs::metadata(full).with_path(full)?;
        let mtime = meta
            .modified()
            .with_path(full)?
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        self.entries.insert(
            key.to_string(),
            IndexEntry {
                hash,
                mode: "100644".to_string(),
                size: content.len() as u64,
                mtime,
            },
        );
        Ok(())
    }

    /// compare staged hashes against the working tree
    ///
    /// every tracked path is re-read and re-hashed; there is no mtime
    /// shortcut, so correctness does not depend on filesystem timestamp
    /// granularity. a tracked file that is missing counts as modified.
    pub fn status(&self, repo: &Repo) -> Result<StatusReport> {
        let mut report = StatusReport::default();

        for (path, entry) in &self.entries {
            let full = repo.work_dir().join(path);
            match fs::read(&full) {
                Ok(content) => {
                    if blob_id(&content) != entry.hash {
                        report.modified.push(path.clone());
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    report.modified.push(path.clone());
                }
                Err(source) => return Err(Error::Io { path: full, source }),
            }
        }

        for entry in WalkDir::new(repo.work_dir())
            .into_iter()
            .filter_entry(|e| e.file_name() != META_DIR)
        {
            let entry = entry.map_err(|e| {
                let at = repo.work_dir().to_path_buf();
                walkdir_error(e, &at.display().to_string())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let key = rel_key(repo, entry.path())?;
            if !self.entries.contains_key(&key) {
                report.untracked.push(key);
            }
        }
        report.untracked.sort();

        Ok(report)
    }
}

/// repo-root-relative path key with `/` separators
fn rel_key(repo: &Repo, full: &Path) -> Result<String> {
    let rel = full
        .strip_prefix(repo.work_dir())
        .map_err(|_| Error::PathNotFound(full.to_path_buf()))?;

    let parts: Vec<&str> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();
    Ok(parts.join("/"))
}

fn walkdir_error(e: walkdir::Error, at: &str) -> Error {
    let path = PathBuf::from(at);
    match e.into_io_error() {
        Some(source) => Error::Io { path, source },
        None => Error::PathNotFound(path),
    }
}
