//! canonical byte encoding for object headers and tree entries
//!
//! every stored object is `"{type} {byte-length}\0"` followed by the payload.
//! tree payloads are a sequence of `"{mode} {name}\0"` + raw 20-byte hash
//! entries; the fixed-width digest makes entry boundaries unambiguous.

use std::fmt;

use crate::error::{Error, Result};
use crate::hash::Hash;

/// logical type tag of a stored object
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            other => Err(Error::CorruptObject(format!(
                "unknown object type: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// encode an object header: `"{type} {length}\0"` in ASCII
///
/// length is the exact payload byte count, not character count,
/// so binary blobs are handled correctly.
pub fn encode_header(kind: ObjectType, length: usize) -> Vec<u8> {
    format!("{} {}\0", kind.as_str(), length).into_bytes()
}

/// split a decompressed object buffer into its type tag and payload
///
/// validates that the declared length matches the actual payload length,
/// as a defense against truncation.
pub fn split_header(data: &[u8]) -> Result<(ObjectType, &[u8])> {
    let nul = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::CorruptObject("missing NUL after header".to_string()))?;

    let header = std::str::from_utf8(&data[..nul])
        .map_err(|_| Error::CorruptObject("header is not ASCII".to_string()))?;

    let (type_str, len_str) = header
        .split_once(' ')
        .ok_or_else(|| Error::CorruptObject(format!("malformed header: {:?}", header)))?;

    let kind = ObjectType::parse(type_str)?;
    let declared: usize = len_str
        .parse()
        .map_err(|_| Error::CorruptObject(format!("bad length in header: {:?}", header)))?;

    let payload = &data[nul + 1..];
    if payload.len() != declared {
        return Err(Error::CorruptObject(format!(
            "length mismatch: header says {}, payload is {}",
            declared,
            payload.len()
        )));
    }

    Ok((kind, payload))
}

/// encode one tree entry: `"{mode} {name}\0"` + raw 20-byte hash
pub fn encode_tree_entry(mode: &str, name: &str, hash: &Hash) -> Vec<u8> {
    let mut buf = format!("{} {}\0", mode, name).into_bytes();
    buf.extend_from_slice(hash.as_bytes());
    buf
}

/// decode a tree payload into (mode, name, hash) triples
///
/// a truncated entry or missing NUL fails the whole decode; partial
/// results are never returned.
pub fn decode_tree_entries(data: &[u8]) -> Result<Vec<(String, String, Hash)>> {
    let mut entries = Vec::new();
    let mut rest = data;

    while !rest.is_empty() {
        let nul = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::CorruptObject("tree entry missing NUL".to_string()))?;

        let prefix = std::str::from_utf8(&rest[..nul])
            .map_err(|_| Error::CorruptObject("tree entry prefix is not UTF-8".to_string()))?;
        let (mode, name) = prefix.split_once(' ').ok_or_else(|| {
            Error::CorruptObject(format!("malformed tree entry: {:?}", prefix))
        })?;

        let hash_start = nul + 1;
        if rest.len() < hash_start + 20 {
            return Err(Error::CorruptObject(format!(
                "truncated tree entry: {:?}",
                name
            )));
        }
        let mut raw = [0u8; 20];
        raw.copy_from_slice(&rest[hash_start..hash_start + 20]);

        entries.push((mode.to_string(), name.to_string(), Hash::from_bytes(raw)));
        rest = &rest[hash_start + 20..];
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_header() {
        assert_eq!(encode_header(ObjectType::Blob, 5), b"blob 5\0");
        assert_eq!(encode_header(ObjectType::Tree, 0), b"tree 0\0");
        assert_eq!(encode_header(ObjectType::Commit, 123), b"commit 123\0");
    }

    #[test]
    fn test_split_header_roundtrip() {
        let mut buf = encode_header(ObjectType::Blob, 5);
        buf.extend_from_slice(b"hello");

        let (kind, payload) = split_header(&buf).unwrap();
        assert_eq!(kind, ObjectType::Blob);
        assert_eq!(payload, b"hello");
    }

    #[test]
    fn test_split_header_binary_payload() {
        let payload = [0u8, 159, 146, 150];
        let mut buf = encode_header(ObjectType::Blob, payload.len());
        buf.extend_from_slice(&payload);

        let (kind, got) = split_header(&buf).unwrap();
        assert_eq!(kind, ObjectType::Blob);
        assert_eq!(got, payload);
    }

    #[test]
    fn test_split_header_missing_nul() {
        let result = split_header(b"blob 5hello");
        assert!(matches!(result, Err(Error::CorruptObject(_))));
    }

    #[test]
    fn test_split_header_length_mismatch() {
        let result = split_header(b"blob 10\0hello");
        assert!(matches!(result, Err(Error::CorruptObject(_))));
    }

    #[test]
    fn test_split_header_unknown_type() {
        let result = split_header(b"widget 5\0hello");
        assert!(matches!(result, Err(Error::CorruptObject(_))));
    }

    #[test]
    fn test_object_type_parse() {
        assert_eq!(ObjectType::parse("blob").unwrap(), ObjectType::Blob);
        assert_eq!(ObjectType::parse("tree").unwrap(), ObjectType::Tree);
        assert_eq!(ObjectType::parse("commit").unwrap(), ObjectType::Commit);
        assert!(ObjectType::parse("BLOB").is_err());
    }

    #[test]
    fn test_tree_entry_roundtrip() {
        let h1 = Hash::digest(b"one");
        let h2 = Hash::digest(b"two");

        let mut buf = encode_tree_entry("100644", "a.txt", &h1);
        buf.extend(encode_tree_entry("040000", "sub", &h2));

        let entries = decode_tree_entries(&buf).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("100644".to_string(), "a.txt".to_string(), h1));
        assert_eq!(entries[1], ("040000".to_string(), "sub".to_string(), h2));
    }

    #[test]
    fn test_tree_entry_truncated() {
        let mut buf = encode_tree_entry("100644", "a.txt", &Hash::ZERO);
        buf.truncate(buf.len() - 1); // chop one byte off the digest

        let result = decode_tree_entries(&buf);
        assert!(matches!(result, Err(Error::CorruptObject(_))));
    }

    #[test]
    fn test_tree_entry_missing_nul() {
        let result = decode_tree_entries(b"100644 a.txt");
        assert!(matches!(result, Err(Error::CorruptObject(_))));
    }

    #[test]
    fn test_decode_empty_tree_payload() {
        let entries = decode_tree_entries(b"").unwrap();
        assert!(entries.is_empty());
    }
}
