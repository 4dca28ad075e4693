//! SHA-256 Merkle proof verification with sorted-pair hashing.
//!
//! A leaf commits to `(claimant, amount, project id, pool id)`; refund
//! leaves fix the pool id at 0. Interior nodes hash the byte-wise smaller
//! child first, so proofs carry no left/right flags.

use soroban_sdk::{xdr::ToXdr, Address, Bytes, BytesN, Env, Vec};

/// Deterministic leaf hash for claim authorization.
pub fn leaf_hash(
    e: &Env,
    claimant: &Address,
    amount: i128,
    project_id: u64,
    pool_id: u32,
) -> BytesN<32> {
    let mut data: Bytes = claimant.clone().to_xdr(e);
    data.extend_from_array(&amount.to_be_bytes());
    data.extend_from_array(&project_id.to_be_bytes());
    data.extend_from_array(&pool_id.to_be_bytes());
    e.crypto().sha256(&data).to_bytes()
}

/// Parent of two nodes, children ordered byte-wise ascending.
pub fn hash_pair(e: &Env, a: &BytesN<32>, b: &BytesN<32>) -> BytesN<32> {
    let (lo, hi) = if a.to_array() <= b.to_array() {
        (a, b)
    } else {
        (b, a)
    };
    let mut data = Bytes::new(e);
    data.extend_from_array(&lo.to_array());
    data.extend_from_array(&hi.to_array());
    e.crypto().sha256(&data).to_bytes()
}

/// Walk `proof` upward from `leaf` and compare against `root`.
pub fn verify(e: &Env, proof: &Vec<BytesN<32>>, root: &BytesN<32>, leaf: &BytesN<32>) -> bool {
    let mut node = leaf.clone();
    for sibling in proof.iter() {
        node = hash_pair(e, &node, &sibling);
    }
    node == *root
}

/// All-zero root placeholder for pools that have not been finalized yet.
pub fn empty_root(e: &Env) -> BytesN<32> {
    BytesN::from_array(e, &[0_u8; 32])
}
