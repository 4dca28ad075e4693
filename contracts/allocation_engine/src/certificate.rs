//! Client interface for the external certificate primitive.
//!
//! The engine is registered as the certificate contract's operator, so its
//! direct invocations of `mint` and `burn` authenticate as the engine itself.

use soroban_sdk::{contractclient, Address, Env};

#[contractclient(name = "CertificateClient")]
pub trait CertificateInterface {
    /// Mint a new certificate to `to`, returning its id.
    fn mint(env: Env, to: Address) -> u64;

    /// Burn certificate `id`.
    fn burn(env: Env, id: u64);

    /// Current holder, or `None` for burned / never-minted ids.
    fn owner_of(env: Env, id: u64) -> Option<Address>;

    /// Number of certificates ever minted.
    fn total_minted(env: Env) -> u64;
}
