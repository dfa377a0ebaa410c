use crate::error::{Error, Result};
use crate::hash::Hash;

/// author or committer identity with timestamp
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// resolved `"Name <email>"` string
    pub ident: String,
    /// unix timestamp (seconds since epoch)
    pub timestamp: i64,
    /// timezone offset, e.g. `+0000`
    pub tz: String,
}

impl Signature {
    pub fn new(ident: impl Into<String>, timestamp: i64, tz: impl Into<String>) -> Self {
        Self {
            ident: ident.into(),
            timestamp,
            tz: tz.into(),
        }
    }

    /// signature stamped with the current time
    pub fn now(ident: impl Into<String>) -> Self {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Self::new(ident, timestamp, "+0000")
    }

    /// render as `<ident> <timestamp> <tz>`
    fn encode(&self) -> String {
        format!("{} {} {}", self.ident, self.timestamp, self.tz)
    }

    /// parse `<ident> <timestamp> <tz>`; ident may itself contain spaces
    fn parse(s: &str) -> Result<Self> {
        let mut parts = s.rsplitn(3, ' ');
        let tz = parts.next();
        let ts = parts.next();
        let ident = parts.next();

        match (ident, ts, tz) {
            (Some(ident), Some(ts), Some(tz)) => {
                let timestamp = ts.parse().map_err(|_| {
                    Error::CorruptObject(format!("bad timestamp in signature: {:?}", s))
                })?;
                Ok(Self::new(ident, timestamp, tz))
            }
            _ => Err(Error::CorruptObject(format!("malformed signature: {:?}", s))),
        }
    }
}

/// a commit object: snapshot pointer plus metadata and message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    /// root tree hash
    pub tree: Hash,
    /// parent commit hashes, first parent first
    pub parents: Vec<Hash>,
    pub author: Signature,
    pub committer: Signature,
    /// free-form message
    pub message: String,
}

impl Commit {
    pub fn new(
        tree: Hash,
        parents: Vec<Hash>,
        author: Signature,
        committer: Signature,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tree,
            parents,
            author,
            committer,
            message: message.into(),
        }
    }

    /// is this an initial commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// canonical byte layout the commit hash is computed over
    ///
    /// header lines, blank line, message. parent lines keep insertion
    /// order so first-parent semantics survive the round trip.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = String::new();
        out.push_str(&format!("tree {}\n", self.tree.to_hex()));
        for parent in &self.parents {
            out.push_str(&format!("parent {}\n", parent.to_hex()));
        }
        out.push_str(&format!("author {}\n", self.author.encode()));
        out.push_str(&format!("committer {}\n", self.committer.encode()));
        out.push('\n');
        out.push_str(&self.message);
        out.into_bytes()
    }

    /// parse a commit from its canonical payload bytes
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(payload)
            .map_err(|_| Error::CorruptObject("commit is not UTF-8".to_string()))?;

        let (header, message) = text
            .split_once("\n\n")
            .ok_or_else(|| Error::CorruptObject("commit missing blank line".to_string()))?;

        let mut tree = None;
        let mut parents = Vec::new();
        let mut author = None;
        let mut committer = None;

        for line in header.lines() {
            if let Some(hex) = line.strip_prefix("tree ") {
                tree = Some(Hash::from_hex(hex)?);
            } else if let Some(hex) = line.strip_prefix("parent ") {
                parents.push(Hash::from_hex(hex)?);
            } else if let Some(sig) = line.strip_prefix("author ") {
                author = Some(Signature::parse(sig)?);
            } else if let Some(sig) = line.strip_prefix("committer ") {
                committer = Some(Signature::parse(sig)?);
            } else {
                return Err(Error::CorruptObject(format!(
                    "unknown commit header line: {:?}",
                    line
                )));
            }
        }

        let tree = tree.ok_or_else(|| Error::CorruptObject("commit missing tree".to_string()))?;
        let author =
            author.ok_or_else(|| Error::CorruptObject("commit missing author".to_string()))?;
        let committer = committer
            .ok_or_else(|| Error::CorruptObject("commit missing committer".to_string()))?;

        Ok(Self {
            tree,
            parents,
            author,
            committer,
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig() -> Signature {
        Signature::new("Alice <alice@example.com>", 1234567890, "+0000")
    }

    #[test]
    fn test_commit_root() {
        let c = Commit::new(Hash::ZERO, vec![], sig(), sig(), "first");
        assert!(c.is_root());
    }

    #[test]
    fn test_commit_byte_layout() {
        let parent = Hash::digest(b"parent");
        let c = Commit::new(Hash::ZERO, vec![parent], sig(), sig(), "message\nbody");

        let text = String::from_utf8(c.to_bytes()).unwrap();
        let expected = format!(
            "tree {}\nparent {}\nauthor Alice <alice@example.com> 1234567890 +0000\ncommitter Alice <alice@example.com> 1234567890 +0000\n\nmessage\nbody",
            Hash::ZERO.to_hex(),
            parent.to_hex()
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_commit_parse_roundtrip() {
        let p1 = Hash::digest(b"p1");
        let p2 = Hash::digest(b"p2");
        let c = Commit::new(Hash::digest(b"tree"), vec![p1, p2], sig(), sig(), "msg");

        let parsed = Commit::parse(&c.to_bytes()).unwrap();
        assert_eq!(c, parsed);
        // first-parent order preserved
        assert_eq!(parsed.parents, vec![p1, p2]);
    }

    #[test]
    fn test_commit_identical_content_identical_bytes() {
        let a = Commit::new(Hash::ZERO, vec![], sig(), sig(), "same");
        let b = Commit::new(Hash::ZERO, vec![], sig(), sig(), "same");
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn test_commit_parse_missing_blank_line() {
        let result = Commit::parse(b"tree 0000000000000000000000000000000000000000");
        assert!(matches!(result, Err(Error::CorruptObject(_))));
    }

    #[test]
    fn test_commit_parse_missing_tree() {
        let bytes =
            b"author A <a@b> 0 +0000\ncommitter A <a@b> 0 +0000\n\nmsg";
        let result = Commit::parse(bytes);
        assert!(matches!(result, Err(Error::CorruptObject(_))));
    }

    #[test]
    fn test_commit_parse_unknown_header() {
        let bytes = format!(
            "tree {}\nflavor vanilla\nauthor A <a@b> 0 +0000\ncommitter A <a@b> 0 +0000\n\nmsg",
            Hash::ZERO.to_hex()
        );
        let result = Commit::parse(bytes.as_bytes());
        assert!(matches!(result, Err(Error::CorruptObject(_))));
    }

    #[test]
    fn test_signature_ident_with_spaces() {
        let c = Commit::new(
            Hash::ZERO,
            vec![],
            Signature::new("Mary Jane Watson <mj@example.com>", 42, "-0500"),
            sig(),
            "msg",
        );
        let parsed = Commit::parse(&c.to_bytes()).unwrap();
        assert_eq!(parsed.author.ident, "Mary Jane Watson <mj@example.com>");
        assert_eq!(parsed.author.timestamp, 42);
        assert_eq!(parsed.author.tz, "-0500");
    }

    #[test]
    fn test_empty_message_roundtrip() {
        // the commit op rejects empty messages before this layer; the
        // codec itself stays total
        let c = Commit::new(Hash::ZERO, vec![], sig(), sig(), "");
        let parsed = Commit::parse(&c.to_bytes()).unwrap();
        assert_eq!(parsed.message, "");
    }
}
