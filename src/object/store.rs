//! content-addressed object storage
//!
//! objects live at `objects/<hash[0:2]>/<hash[2:]>`, zlib-compressed over
//! the full header+payload buffer. the name is the SHA-1 of those same
//! bytes, so concurrent writers of one object converge on identical
//! content and a duplicate store is a no-op.

use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::codec::{encode_header, split_header, ObjectType};
use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::repo::Repo;

/// get the filesystem path for an object
pub fn object_path(repo: &Repo, hash: &Hash) -> PathBuf {
    let (dir, file) = hash.to_path_components();
    repo.objects_path().join(dir).join(file)
}

/// check if an object exists in the store
pub fn object_exists(repo: &Repo, hash: &Hash) -> bool {
    object_path(repo, hash).exists()
}

/// store a payload under its content hash, returning the hash
///
/// idempotent: if the object is already present nothing is written and
/// the same hash comes back.
pub fn store_object(repo: &Repo, kind: ObjectType, payload: &[u8]) -> Result<Hash> {
    let mut buf = encode_header(kind, payload.len());
    buf.extend_from_slice(payload);

    let hash = Hash::digest(&buf);
    let path = object_path(repo, &hash);

    if path.exists() {
        return Ok(hash);
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&buf).map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;
    let compressed = encoder.finish().map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;

    crate::fs::write_atomic(&repo.tmp_path(), &path, &compressed)?;

    Ok(hash)
}

/// load an object, returning its type tag and raw payload
pub fn load_object(repo: &Repo, hash: &Hash) -> Result<(ObjectType, Vec<u8>)> {
    let path = object_path(repo, hash);

    let compressed = fs::read(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ObjectNotFound(*hash)
        } else {
            Error::Io { path, source: e }
        }
    })?;

    let mut data = Vec::new();
    ZlibDecoder::new(&compressed[..])
        .read_to_end(&mut data)
        .map_err(|e| Error::CorruptObject(format!("decompression failed for {}: {}", hash, e)))?;

    let (kind, payload) = split_header(&data)?;
    Ok((kind, payload.to_vec()))
}

/// load an object and verify its type tag
pub(crate) fn load_expected(repo: &Repo, hash: &Hash, expected: ObjectType) -> Result<Vec<u8>> {
    let (actual, payload) = load_object(repo, hash)?;
    if actual != expected {
        return Err(Error::UnexpectedType { expected, actual });
    }
    Ok(payload)
}
