use crate::codec::ObjectType;
use crate::error::Result;
use crate::hash::Hash;
use crate::object::store::{load_expected, store_object};
use crate::repo::Repo;

/// write raw file content as a blob, returning its hash
pub fn write_blob(repo: &Repo, content: &[u8]) -> Result<Hash> {
    store_object(repo, ObjectType::Blob, content)
}

/// read blob content
pub fn read_blob(repo: &Repo, hash: &Hash) -> Result<Vec<u8>> {
    load_expected(repo, hash, ObjectType::Blob)
}

/// hash content as a blob would be hashed, without storing it
///
/// used by status to compare working-tree bytes against staged hashes.
pub fn blob_id(content: &[u8]) -> Hash {
    let mut buf = crate::codec::encode_header(ObjectType::Blob, content.len());
    buf.extend_from_slice(content);
    Hash::digest(&buf)
}
