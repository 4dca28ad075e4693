//! Allocation & Claim Engine
//!
//! Token-sale and reward-distribution ledger issuing non-fungible allocation
//! certificates that carry linear vesting schedules. Sealed-bid auctions are
//! resolved off-band and settled through Merkle-proof-authorized claims; KOL
//! rewards drain pending-claim sets with O(1) removal; certificates accrue
//! per-second across independent flows and can be split or merged without
//! breaking accrual invariants.
//!
//! ## Key design decisions
//!
//! - **Checks-Effects-Interactions**: storage is updated *before* token
//!   transfers on every settlement path.
//! - **Auth-gated mutations**: `require_auth()` on every caller-supplied
//!   address; admin-only admin ops.
//! - **Atomicity by invocation**: every failure is a panic that aborts the
//!   whole operation; there is no partial state change to recover from.
//! - **One engine, one certificate contract**: the engine is the certificate
//!   contract's operator and the only party that mints or burns.

#![no_std]

mod bidding;
mod certificate;
mod claim;
mod errors;
mod fees;
mod merkle;
mod rewards;
mod split_merge;
mod vesting;
mod whitelist;

pub mod types;

use errors::*;
use types::{Allocation, Bid, BiddingProject, DataKey, FeeConfig, RewardProject, VestingPool, DEFAULT_VESTING_STEP};

use certificate::CertificateClient;
use soroban_sdk::{contract, contractimpl, Address, Bytes, BytesN, Env, Vec};



#[cfg(test)]
mod test_claims;

#[cfg(test)]
mod test_rewards;


// ─── Helpers ───────────────────────────────────────────────────────────────

pub(crate) fn require_admin(e: &Env, caller: &Address) {
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

pub(crate) fn get_treasury(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&DataKey::Treasury)
        .unwrap_or_else(|| panic!("{}", ERR_NOT_INITIALIZED))
}

pub(crate) fn get_certificate(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&DataKey::Certificate)
        .unwrap_or_else(|| panic!("{}", ERR_NOT_INITIALIZED))
}

pub(crate) fn vesting_step(e: &Env) -> u64 {
    e.storage()
        .instance()
        .get(&DataKey::VestingStep)
        .unwrap_or(DEFAULT_VESTING_STEP)
}

pub(crate) fn get_bidding_project(e: &Env, project_id: u64) -> BiddingProject {
    e.storage()
        .persistent()
        .get(&DataKey::Bidding(project_id))
        .unwrap_or_else(|| panic!("{}", ERR_PROJECT_NOT_FOUND))
}

pub(crate) fn put_bidding_project(e: &Env, project_id: u64, project: &BiddingProject) {
    e.storage()
        .persistent()
        .set(&DataKey::Bidding(project_id), project);
}

pub(crate) fn get_reward_project(e: &Env, project_id: u64) -> RewardProject {
    e.storage()
        .persistent()
        .get(&DataKey::Reward(project_id))
        .unwrap_or_else(|| panic!("{}", ERR_PROJECT_NOT_FOUND))
}

pub(crate) fn put_reward_project(e: &Env, project_id: u64, project: &RewardProject) {
    e.storage()
        .persistent()
        .set(&DataKey::Reward(project_id), project);
}

pub(crate) fn get_allocation(e: &Env, certificate_id: u64) -> Allocation {
    e.storage()
        .persistent()
        .get(&DataKey::Allocation(certificate_id))
        .unwrap_or_else(|| panic!("{}", ERR_ALLOCATION_NOT_FOUND))
}

pub(crate) fn put_allocation(e: &Env, certificate_id: u64, allocation: &Allocation) {
    e.storage()
        .persistent()
        .set(&DataKey::Allocation(certificate_id), allocation);
}

pub(crate) fn remove_allocation(e: &Env, certificate_id: u64) {
    e.storage()
        .persistent()
        .remove(&DataKey::Allocation(certificate_id));
}

pub(crate) fn require_certificate_holder(e: &Env, caller: &Address, certificate_id: u64) {
    let client = CertificateClient::new(e, &get_certificate(e));
    match client.owner_of(&certificate_id) {
        Some(owner) if owner == *caller => {}
        _ => panic!("{}", ERR_NOT_CERTIFICATE_HOLDER),
    }
}

// ─── Contract ──────────────────────────────────────────────────────────────

#[contract]
pub struct AllocationEngine;

#[contractimpl]
impl AllocationEngine {
    // ── Admin setup ────────────────────────────────────────────────────────

    /// One-time initialization. Stores `admin`, the fee `treasury` and the
    /// certificate contract address. Panics if called again.
    pub fn initialize(e: Env, admin: Address, treasury: Address, certificate: Address) {
        if e.storage().instance().has(&DataKey::Admin) {
            panic!("{}", ERR_ALREADY_INITIALIZED);
        }
        e.storage().instance().set(&DataKey::Admin, &admin);
        e.storage().instance().set(&DataKey::Treasury, &treasury);
        e.storage().instance().set(&DataKey::Certificate, &certificate);
    }

    /// Set the four fee parameters. Split/merge rates are capped at 2%.
    pub fn set_fee_config(
        e: Env,
        admin: Address,
        bid_fee: i128,
        bid_update_fee: i128,
        split_bps: u32,
        merge_bps: u32,
    ) {
        require_admin(&e, &admin);
        fees::set_config(&e, bid_fee, bid_update_fee, split_bps, merge_bps);
    }

    /// Set the granularity requested vesting lengths must align to.
    /// Defaults to 30 days.
    pub fn set_vesting_step(e: Env, admin: Address, step_secs: u64) {
        require_admin(&e, &admin);
        if step_secs == 0 {
            panic!("{}", ERR_INVALID_VESTING_STEP);
        }
        e.storage().instance().set(&DataKey::VestingStep, &step_secs);
    }

    pub fn add_to_whitelist(e: Env, admin: Address, project_id: u64, addresses: Vec<Address>) {
        require_admin(&e, &admin);
        whitelist::add(&e, project_id, &addresses);
    }

    pub fn remove_from_whitelist(e: Env, admin: Address, project_id: u64, addresses: Vec<Address>) {
        require_admin(&e, &admin);
        whitelist::remove(&e, project_id, &addresses);
    }

    // ── Bidding ────────────────────────────────────────────────────────────

    /// Launch a bidding project. `end_commitment` hides the planned end time
    /// until it is revealed at close.
    pub fn launch_bidding_project(
        e: Env,
        admin: Address,
        sale_token: Address,
        payment_token: Address,
        start_time: u64,
        end_time: u64,
        end_commitment: BytesN<32>,
        claim_window: u64,
        whitelist_enabled: bool,
    ) -> u64 {
        bidding::launch_project(
            &e,
            admin,
            sale_token,
            payment_token,
            start_time,
            end_time,
            end_commitment,
            claim_window,
            whitelist_enabled,
        )
    }

    /// Append a vesting pool (max 10 per project), pulling its sale-token
    /// allocation from the admin.
    pub fn create_pool(
        e: Env,
        admin: Address,
        project_id: u64,
        total_allocation: i128,
        refunds_losers: bool,
    ) -> u32 {
        bidding::create_pool(&e, admin, project_id, total_allocation, refunds_losers)
    }

    /// Place a bid while the project is open. One bid per address; vesting
    /// length must be 0, 1, or a multiple of the vesting step.
    pub fn place_bid(e: Env, bidder: Address, project_id: u64, amount: i128, vesting_secs: u64) {
        bidding::place_bid(&e, bidder, project_id, amount, vesting_secs)
    }

    /// Raise an existing bid; amount and vesting length never decrease.
    pub fn update_bid(
        e: Env,
        bidder: Address,
        project_id: u64,
        new_amount: i128,
        new_vesting_secs: u64,
    ) {
        bidding::update_bid(&e, bidder, project_id, new_amount, new_vesting_secs)
    }

    /// Close the project: reveal the end-time commitment, set one Merkle
    /// root per pool plus the refund root, and start the claim window.
    pub fn finalize_bids(
        e: Env,
        admin: Address,
        project_id: u64,
        revealed_end: u64,
        salt: Bytes,
        pool_roots: Vec<BytesN<32>>,
        refund_root: BytesN<32>,
    ) {
        bidding::finalize_bids(
            &e,
            admin,
            project_id,
            revealed_end,
            salt,
            pool_roots,
            refund_root,
        )
    }

    /// Replace the roots of a closed project (correction path).
    pub fn update_project_allocations(
        e: Env,
        admin: Address,
        project_id: u64,
        pool_roots: Vec<BytesN<32>>,
        refund_root: BytesN<32>,
    ) {
        bidding::update_project_allocations(&e, admin, project_id, pool_roots, refund_root)
    }

    /// Claim a refund authorized by the refund root. Each leaf pays once.
    pub fn claim_refund(
        e: Env,
        claimant: Address,
        project_id: u64,
        amount: i128,
        proof: Vec<BytesN<32>>,
    ) {
        bidding::claim_refund(&e, claimant, project_id, amount, proof)
    }

    /// Claim a winning allocation authorized by a pool root; mints a
    /// certificate with a single flow. Returns the certificate id.
    pub fn claim_nft(
        e: Env,
        claimant: Address,
        project_id: u64,
        pool_id: u32,
        amount: i128,
        proof: Vec<BytesN<32>>,
    ) -> u64 {
        bidding::claim_nft(&e, claimant, project_id, pool_id, amount, proof)
    }

    /// Sweep one expired project's payment balance to the treasury.
    pub fn withdraw_profit(e: Env, admin: Address, project_id: u64) -> i128 {
        bidding::withdraw_profit(&e, admin, project_id)
    }

    /// Sweep a batch of projects; any ineligible project aborts the batch.
    pub fn withdraw_profits(e: Env, admin: Address, project_ids: Vec<u64>) -> i128 {
        bidding::withdraw_profits(&e, admin, project_ids)
    }

    /// Sweep every expired project, skipping those not yet past deadline.
    pub fn withdraw_all_profits(e: Env, admin: Address) -> i128 {
        bidding::withdraw_all_profits(&e, admin)
    }

    // ── Rewards ────────────────────────────────────────────────────────────

    /// Launch a KOL reward project with one shared vesting period.
    pub fn launch_reward_project(
        e: Env,
        admin: Address,
        token: Address,
        stablecoin: Address,
        start_time: u64,
        vesting_secs: u64,
        claim_window: u64,
    ) -> u64 {
        rewards::launch_project(
            &e,
            admin,
            token,
            stablecoin,
            start_time,
            vesting_secs,
            claim_window,
        )
    }

    /// Load the token-reward pending list once; the declared total must
    /// equal the entry sum and is pulled from the admin up front.
    pub fn set_tvs_allocation(
        e: Env,
        admin: Address,
        project_id: u64,
        addresses: Vec<Address>,
        amounts: Vec<i128>,
        total: i128,
    ) {
        rewards::set_tvs_allocation(&e, admin, project_id, addresses, amounts, total)
    }

    /// Load the stablecoin pending list once; same rules as the TVS list.
    pub fn set_stablecoin_allocation(
        e: Env,
        admin: Address,
        project_id: u64,
        addresses: Vec<Address>,
        amounts: Vec<i128>,
        total: i128,
    ) {
        rewards::set_stablecoin_allocation(&e, admin, project_id, addresses, amounts, total)
    }

    /// Claim the caller's TVS reward as a fresh vesting certificate.
    pub fn claim_reward_tvs(e: Env, claimant: Address, project_id: u64) -> u64 {
        rewards::claim_reward_tvs(&e, claimant, project_id)
    }

    /// Claim the caller's stablecoin reward as a direct transfer.
    pub fn claim_stablecoin_allocation(e: Env, claimant: Address, project_id: u64) {
        rewards::claim_stablecoin_allocation(&e, claimant, project_id)
    }

    /// Post-deadline batch distribution of TVS rewards (all-or-nothing).
    pub fn distribute_reward_tvs(e: Env, admin: Address, project_id: u64, addresses: Vec<Address>) {
        rewards::distribute_reward_tvs(&e, admin, project_id, addresses)
    }

    /// Post-deadline batch distribution of stablecoin rewards.
    pub fn distribute_stablecoin_allocation(
        e: Env,
        admin: Address,
        project_id: u64,
        addresses: Vec<Address>,
    ) {
        rewards::distribute_stablecoin_allocation(&e, admin, project_id, addresses)
    }

    /// Drain every unclaimed TVS reward, back to front.
    pub fn distribute_remaining_reward_tvs(e: Env, admin: Address, project_id: u64) {
        rewards::distribute_remaining_reward_tvs(&e, admin, project_id)
    }

    /// Drain every unclaimed stablecoin reward, back to front.
    pub fn distribute_remaining_stablecoin(e: Env, admin: Address, project_id: u64) {
        rewards::distribute_remaining_stablecoin(&e, admin, project_id)
    }

    // ── Claims, split and merge ────────────────────────────────────────────

    /// Claim everything currently accrued across the certificate's flows.
    /// Burns the certificate once every flow is fully claimed.
    pub fn claim_tokens(e: Env, caller: Address, certificate_id: u64) -> i128 {
        claim::claim_tokens(&e, caller, certificate_id)
    }

    /// Split a certificate by a basis-point percentage list summing to
    /// 10,000. Returns the resulting certificate ids, original first.
    pub fn split_certificate(
        e: Env,
        caller: Address,
        certificate_id: u64,
        percentages: Vec<u32>,
    ) -> Vec<u64> {
        split_merge::split_certificate(&e, caller, certificate_id, percentages)
    }

    /// Fold `sources` into `destination`, appending their fee-deducted flows
    /// and burning each source.
    pub fn merge_certificates(e: Env, caller: Address, destination: u64, sources: Vec<u64>) {
        split_merge::merge_certificates(&e, caller, destination, sources)
    }

    // ── Queries ────────────────────────────────────────────────────────────

    /// Allocation payload for a certificate. Read-only surface for the
    /// downstream dividend calculator.
    pub fn get_allocation(e: Env, certificate_id: u64) -> Allocation {
        get_allocation(&e, certificate_id)
    }

    /// Number of certificates ever minted, from the certificate primitive.
    pub fn total_certificates(e: Env) -> u64 {
        CertificateClient::new(&e, &get_certificate(&e)).total_minted()
    }

    /// Bid book entry; `amount == 0` means no bid.
    pub fn get_bid(e: Env, project_id: u64, bidder: Address) -> Bid {
        bidding::get_bid(&e, project_id, &bidder)
    }

    pub fn get_bidding_project(e: Env, project_id: u64) -> BiddingProject {
        get_bidding_project(&e, project_id)
    }

    pub fn get_pool(e: Env, project_id: u64, pool_id: u32) -> VestingPool {
        bidding::get_pool(&e, project_id, pool_id)
    }

    pub fn get_reward_project(e: Env, project_id: u64) -> RewardProject {
        get_reward_project(&e, project_id)
    }

    pub fn get_pending_tvs(e: Env, project_id: u64) -> Vec<Address> {
        rewards::get_pending_tvs(&e, project_id)
    }

    pub fn get_pending_stablecoin(e: Env, project_id: u64) -> Vec<Address> {
        rewards::get_pending_stablecoin(&e, project_id)
    }

    pub fn get_owed_tvs(e: Env, project_id: u64, address: Address) -> i128 {
        rewards::get_owed_tvs(&e, project_id, &address)
    }

    pub fn get_owed_stablecoin(e: Env, project_id: u64, address: Address) -> i128 {
        rewards::get_owed_stablecoin(&e, project_id, &address)
    }

    pub fn get_fee_config(e: Env) -> FeeConfig {
        fees::get_config(&e)
    }

    pub fn get_vesting_step(e: Env) -> u64 {
        vesting_step(&e)
    }

    pub fn is_whitelisted(e: Env, project_id: u64, address: Address) -> bool {
        whitelist::is_whitelisted(&e, project_id, &address)
    }

    /// Deterministic claim leaf, exposed for off-chain root builders.
    pub fn leaf_hash(
        e: Env,
        claimant: Address,
        amount: i128,
        project_id: u64,
        pool_id: u32,
    ) -> BytesN<32> {
        merkle::leaf_hash(&e, &claimant, amount, project_id, pool_id)
    }
}
