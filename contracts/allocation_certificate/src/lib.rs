//! Allocation Certificate Contract
//!
//! The non-fungible certificate behind every vesting allocation bundle.
//! Certificates are minted when an allocation is claimed or split, burned
//! when an allocation is fully claimed or consumed by a merge, and freely
//! transferable by their holder in between.
//!
//! ## Key design decisions
//!
//! - **Operator-gated mint/burn**: only the allocation engine contract may
//!   create or destroy certificates.
//! - **Total-order ids**: ids are assigned from a monotonic counter starting
//!   at 1; burns never reuse or decrement ids.
//! - **Non-panicking ownership query**: `owner_of` reports `None` for burned
//!   or never-minted ids instead of trapping, so downstream readers can probe
//!   arbitrary ids safely.

#![no_std]

mod errors;
mod types;

use errors::*;
use types::DataKey;

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol};


// ─── Helpers ───────────────────────────────────────────────────────────────

fn require_admin(e: &Env, caller: &Address) {
    caller.require_auth();
    let stored: Address = e
        .storage()
        .instance()
        .get(&DataKey::Admin)
        .unwrap_or_else(|| panic!("{}", ERR_NOT_INITIALIZED));
    if stored != *caller {
        panic!("{}", ERR_UNAUTHORIZED);
    }
}

fn require_operator(e: &Env) {
    let operator: Address = e
        .storage()
        .instance()
        .get(&DataKey::Operator)
        .unwrap_or_else(|| panic!("{}", ERR_OPERATOR_NOT_SET));
    operator.require_auth();
}

// ─── Contract ──────────────────────────────────────────────────────────────

#[contract]
pub struct AllocationCertificate;

#[contractimpl]
impl AllocationCertificate {
    /// One-time initialization. Stores `admin`.
    /// Panics if called again after initialization.
    pub fn initialize(e: Env, admin: Address) {
        if e.storage().instance().has(&DataKey::Admin) {
            panic!("{}", ERR_ALREADY_INITIALIZED);
        }
        e.storage().instance().set(&DataKey::Admin, &admin);
        e.storage().instance().set(&DataKey::TotalMinted, &0_u64);
    }

    /// Set (or replace) the contract allowed to mint and burn certificates.
    pub fn set_operator(e: Env, admin: Address, operator: Address) {
        require_admin(&e, &admin);
        e.storage().instance().set(&DataKey::Operator, &operator);
        e.events()
            .publish((Symbol::new(&e, "operator_set"),), operator);
    }

    /// Mint a new certificate to `to`. Operator only.
    /// Returns the freshly assigned id.
    pub fn mint(e: Env, to: Address) -> u64 {
        require_operator(&e);

        let minted: u64 = e
            .storage()
            .instance()
            .get(&DataKey::TotalMinted)
            .unwrap_or(0);
        let id = minted.checked_add(1).expect(ERR_ID_OVERFLOW);

        e.storage().instance().set(&DataKey::TotalMinted, &id);
        e.storage().persistent().set(&DataKey::Owner(id), &to);

        e.events()
            .publish((Symbol::new(&e, "certificate_minted"), to), id);
        id
    }

    /// Burn certificate `id`. Operator only.
    /// Panics if the certificate does not exist.
    pub fn burn(e: Env, id: u64) {
        require_operator(&e);

        let owner: Address = e
            .storage()
            .persistent()
            .get(&DataKey::Owner(id))
            .unwrap_or_else(|| panic!("{}", ERR_NO_CERTIFICATE));

        e.storage().persistent().remove(&DataKey::Owner(id));

        e.events()
            .publish((Symbol::new(&e, "certificate_burned"), owner), id);
    }

    /// Transfer certificate `id` from `from` to `to`.
    /// Panics if `from` is not the current holder.
    pub fn transfer(e: Env, from: Address, to: Address, id: u64) {
        from.require_auth();

        let owner: Address = e
            .storage()
            .persistent()
            .get(&DataKey::Owner(id))
            .unwrap_or_else(|| panic!("{}", ERR_NO_CERTIFICATE));
        if owner != from {
            panic!("{}", ERR_NOT_CERTIFICATE_OWNER);
        }

        e.storage().persistent().set(&DataKey::Owner(id), &to);

        e.events()
            .publish((Symbol::new(&e, "certificate_transferred"), from), (to, id));
    }

    // ── Queries ────────────────────────────────────────────────────────────

    /// Current holder of `id`, or `None` for burned / never-minted ids.
    pub fn owner_of(e: Env, id: u64) -> Option<Address> {
        e.storage().persistent().get(&DataKey::Owner(id))
    }

    /// Returns `true` if `id` refers to a live (minted, not burned) certificate.
    pub fn exists(e: Env, id: u64) -> bool {
        e.storage().persistent().has(&DataKey::Owner(id))
    }

    /// Number of certificates ever minted. Monotonic; unaffected by burns.
    pub fn total_minted(e: Env) -> u64 {
        e.storage()
            .instance()
            .get(&DataKey::TotalMinted)
            .unwrap_or(0)
    }
}
