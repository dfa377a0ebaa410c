use crate::codec::{decode_tree_entries, encode_tree_entry};
use crate::error::{Error, Result};
use crate::hash::Hash;

/// mode of a tree entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileMode {
    Regular,
    Directory,
}

impl FileMode {
    /// canonical mode string as it appears in tree bytes
    pub fn as_str(&self) -> &'static str {
        match self {
            FileMode::Regular => "100644",
            FileMode::Directory => "040000",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "100644" => Ok(FileMode::Regular),
            "040000" | "40000" => Ok(FileMode::Directory),
            other => Err(Error::CorruptObject(format!("unknown mode: {}", other))),
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, FileMode::Directory)
    }
}

impl std::fmt::Display for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// a single entry in a tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub name: String,
    pub hash: Hash,
}

impl TreeEntry {
    pub fn new(mode: FileMode, name: impl Into<String>, hash: Hash) -> Self {
        Self {
            mode,
            name: name.into(),
            hash,
        }
    }
}

/// a directory listing - entries sorted by name
///
/// sort order is load-bearing: two trees with the same logical content
/// must encode to identical bytes so their hashes agree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// create a new tree, validating and sorting entries
    pub fn new(mut entries: Vec<TreeEntry>) -> Result<Self> {
        for entry in &entries {
            validate_entry_name(&entry.name)?;
        }

        // sort by name (byte-wise)
        entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));

        // duplicate names are invalid input, not a silent overwrite
        for window in entries.windows(2) {
            if window[0].name == window[1].name {
                return Err(Error::DuplicateEntryName(window[0].name.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// create an empty tree
    pub fn empty() -> Self {
        Self { entries: vec![] }
    }

    /// get entries slice
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// look up entry by name
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries
            .binary_search_by(|e| e.name.as_bytes().cmp(name.as_bytes()))
            .ok()
            .map(|i| &self.entries[i])
    }

    /// number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// is tree empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// canonical byte encoding of this tree's entries
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for entry in &self.entries {
            buf.extend(encode_tree_entry(
                entry.mode.as_str(),
                &entry.name,
                &entry.hash,
            ));
        }
        buf
    }

    /// parse a tree from its canonical payload bytes
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let raw = decode_tree_entries(payload)?;
        let entries = raw
            .into_iter()
            .map(|(mode, name, hash)| Ok(TreeEntry::new(FileMode::parse(&mode)?, name, hash)))
            .collect::<Result<Vec<_>>>()?;
        Tree::new(entries)
    }
}

/// validate an entry name
fn validate_entry_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidEntryName("empty name".to_string()));
    }
    if name.contains('/') {
        return Err(Error::InvalidEntryName(format!(
            "name contains '/': {}",
            name
        )));
    }
    if name.contains('\0') {
        return Err(Error::InvalidEntryName(format!(
            "name contains null byte: {}",
            name
        )));
    }
    if name == "." || name == ".." {
        return Err(Error::InvalidEntryName(format!("reserved name: {}", name)));
    }
    Ok(())
}
