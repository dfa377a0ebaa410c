use crate::codec::ObjectType;
use crate::error::Result;
use crate::hash::Hash;
use crate::object::store::{load_expected, store_object};
use crate::repo::Repo;
use crate::types::Tree;

/// write a tree to the object store
pub fn write_tree(repo: &Repo, tree: &Tree) -> Result<Hash> {
    store_object(repo, ObjectType::Tree, &tree.to_bytes())
}

/// read a tree from the object store
pub fn read_tree(repo: &Repo, hash: &Hash) -> Result<Tree> {
    let payload = load_expected(repo, hash, ObjectType::Tree)?;
    Tree::parse(&payload)
}
