//! Bidding subsystem: project lifecycle, bid book, Merkle-authorized
//! settlement and post-deadline profit sweep.
//!
//! Per-project state machine: Pending (before start) → Open (start ≤ now ≤
//! end, not closed) → Closed (roots frozen, claims allowed until the
//! deadline) → Expired (only the profit sweep remains valid).

use soroban_sdk::{token::TokenClient, Address, Bytes, BytesN, Env, Symbol, Vec};

use crate::certificate::CertificateClient;
use crate::errors::*;
use crate::types::{Allocation, Bid, BiddingProject, CertificateSource, DataKey, VestingPool, MAX_POOLS};
use crate::{fees, merkle, whitelist};

// ─── Lifecycle ─────────────────────────────────────────────────────────────

pub fn launch_project(
    e: &Env,
    admin: Address,
    sale_token: Address,
    payment_token: Address,
    start_time: u64,
    end_time: u64,
    end_commitment: BytesN<32>,
    claim_window: u64,
    whitelist_enabled: bool,
) -> u64 {
    crate::require_admin(e, &admin);
    if start_time >= end_time {
        panic!("{}", ERR_INVALID_WINDOW);
    }
    if claim_window == 0 {
        panic!("{}", ERR_INVALID_CLAIM_WINDOW);
    }

    let count: u64 = e
        .storage()
        .instance()
        .get(&DataKey::BiddingCount)
        .unwrap_or(0);
    let id = count.checked_add(1).expect(ERR_OVERFLOW);
    e.storage().instance().set(&DataKey::BiddingCount, &id);

    let project = BiddingProject {
        sale_token,
        payment_token,
        payment_balance: 0,
        pool_count: 0,
        start_time,
        end_time,
        closed: false,
        end_commitment,
        refund_root: merkle::empty_root(e),
        claim_window,
        claim_deadline: 0,
        whitelist_enabled,
    };
    crate::put_bidding_project(e, id, &project);

    e.events().publish(
        (Symbol::new(e, "bidding_launched"), id),
        (start_time, end_time, whitelist_enabled),
    );
    id
}

/// Append a pool to a not-yet-closed project, pulling its sale-token
/// allocation from the admin up front. Returns the 0-based pool id.
pub fn create_pool(
    e: &Env,
    admin: Address,
    project_id: u64,
    total_allocation: i128,
    refunds_losers: bool,
) -> u32 {
    crate::require_admin(e, &admin);
    let mut project = crate::get_bidding_project(e, project_id);
    if project.closed {
        panic!("{}", ERR_BIDDING_CLOSED);
    }
    if total_allocation <= 0 {
        panic!("{}", ERR_INVALID_AMOUNT);
    }
    if project.pool_count >= MAX_POOLS {
        panic!("{}", ERR_POOL_LIMIT);
    }

    let pool_id = project.pool_count;
    project.pool_count += 1;

    let pool = VestingPool {
        root: merkle::empty_root(e),
        refunds_losers,
        total_allocation,
    };
    e.storage()
        .persistent()
        .set(&DataKey::Pool(project_id, pool_id), &pool);
    crate::put_bidding_project(e, project_id, &project);

    TokenClient::new(e, &project.sale_token).transfer_from(
        &e.current_contract_address(),
        &admin,
        &e.current_contract_address(),
        &total_allocation,
    );

    e.events().publish(
        (Symbol::new(e, "pool_created"), project_id),
        (pool_id, total_allocation),
    );
    pool_id
}

// ─── Bid book ──────────────────────────────────────────────────────────────

fn require_open(e: &Env, project: &BiddingProject) {
    let now = e.ledger().timestamp();
    if project.closed || now < project.start_time || now > project.end_time {
        panic!("{}", ERR_BIDDING_NOT_OPEN);
    }
}

fn require_vesting_step(e: &Env, vesting_secs: u64) {
    let step = crate::vesting_step(e);
    if vesting_secs > 1 && vesting_secs % step != 0 {
        panic!("{}", ERR_VESTING_STEP);
    }
}

pub fn place_bid(e: &Env, bidder: Address, project_id: u64, amount: i128, vesting_secs: u64) {
    bidder.require_auth();
    let mut project = crate::get_bidding_project(e, project_id);
    require_open(e, &project);
    if project.whitelist_enabled && !whitelist::is_whitelisted(e, project_id, &bidder) {
        panic!("{}", ERR_NOT_WHITELISTED);
    }
    if amount <= 0 {
        panic!("{}", ERR_INVALID_AMOUNT);
    }
    if get_bid(e, project_id, &bidder).amount != 0 {
        panic!("{}", ERR_BID_EXISTS);
    }
    require_vesting_step(e, vesting_secs);

    let bid = Bid {
        amount,
        vesting_secs,
    };
    e.storage()
        .persistent()
        .set(&DataKey::Bid(project_id, bidder.clone()), &bid);
    project.payment_balance = project
        .payment_balance
        .checked_add(amount)
        .expect(ERR_OVERFLOW);
    crate::put_bidding_project(e, project_id, &project);

    TokenClient::new(e, &project.payment_token).transfer_from(
        &e.current_contract_address(),
        &bidder,
        &e.current_contract_address(),
        &amount,
    );
    let cfg = fees::get_config(e);
    fees::charge_flat_fee(e, &project.payment_token, &bidder, cfg.bid_fee);

    e.events().publish(
        (Symbol::new(e, "bid_placed"), project_id, bidder),
        (amount, vesting_secs),
    );
}

/// Tighten an existing bid. Amount and vesting length may only grow; only
/// the amount delta is pulled from the bidder.
pub fn update_bid(
    e: &Env,
    bidder: Address,
    project_id: u64,
    new_amount: i128,
    new_vesting_secs: u64,
) {
    bidder.require_auth();
    let mut project = crate::get_bidding_project(e, project_id);
    require_open(e, &project);

    let bid = get_bid(e, project_id, &bidder);
    if bid.amount == 0 {
        panic!("{}", ERR_NO_BID);
    }
    if new_amount < bid.amount || new_vesting_secs < bid.vesting_secs {
        panic!("{}", ERR_BID_DECREASE);
    }
    require_vesting_step(e, new_vesting_secs);

    let delta = new_amount - bid.amount;
    let updated = Bid {
        amount: new_amount,
        vesting_secs: new_vesting_secs,
    };
    e.storage()
        .persistent()
        .set(&DataKey::Bid(project_id, bidder.clone()), &updated);
    project.payment_balance = project
        .payment_balance
        .checked_add(delta)
        .expect(ERR_OVERFLOW);
    crate::put_bidding_project(e, project_id, &project);

    if delta > 0 {
        TokenClient::new(e, &project.payment_token).transfer_from(
            &e.current_contract_address(),
            &bidder,
            &e.current_contract_address(),
            &delta,
        );
    }
    let cfg = fees::get_config(e);
    fees::charge_flat_fee(e, &project.payment_token, &bidder, cfg.bid_update_fee);

    e.events().publish(
        (Symbol::new(e, "bid_updated"), project_id, bidder),
        (new_amount, new_vesting_secs),
    );
}

pub fn get_bid(e: &Env, project_id: u64, bidder: &Address) -> Bid {
    e.storage()
        .persistent()
        .get(&DataKey::Bid(project_id, bidder.clone()))
        .unwrap_or(Bid {
            amount: 0,
            vesting_secs: 0,
        })
}

// ─── Close and correction ──────────────────────────────────────────────────

/// Hash binding the planned end time at launch: `sha256(be(end) ‖ salt)`.
pub fn end_commitment_hash(e: &Env, planned_end: u64, salt: &Bytes) -> BytesN<32> {
    let mut data = Bytes::from_array(e, &planned_end.to_be_bytes());
    data.append(salt);
    e.crypto().sha256(&data).to_bytes()
}

/// Close the project: reveal the committed end time, freeze one root per
/// pool plus the refund root, snap the end time to now and start the claim
/// window. Runs at most once.
pub fn finalize_bids(
    e: &Env,
    admin: Address,
    project_id: u64,
    revealed_end: u64,
    salt: Bytes,
    pool_roots: Vec<BytesN<32>>,
    refund_root: BytesN<32>,
) {
    crate::require_admin(e, &admin);
    let mut project = crate::get_bidding_project(e, project_id);
    if project.closed {
        panic!("{}", ERR_BIDDING_CLOSED);
    }
    if pool_roots.len() != project.pool_count {
        panic!("{}", ERR_ROOT_COUNT);
    }
    if end_commitment_hash(e, revealed_end, &salt) != project.end_commitment {
        panic!("{}", ERR_COMMITMENT_MISMATCH);
    }

    set_roots(e, project_id, project.pool_count, &pool_roots);

    let now = e.ledger().timestamp();
    project.closed = true;
    project.end_time = now;
    project.claim_deadline = now.checked_add(project.claim_window).expect(ERR_OVERFLOW);
    project.refund_root = refund_root;
    crate::put_bidding_project(e, project_id, &project);

    e.events().publish(
        (Symbol::new(e, "bidding_closed"), project_id),
        (revealed_end, now, project.claim_deadline),
    );
}

/// Correction path: replace all pool roots and the refund root on an
/// already-closed project without reopening bidding.
pub fn update_project_allocations(
    e: &Env,
    admin: Address,
    project_id: u64,
    pool_roots: Vec<BytesN<32>>,
    refund_root: BytesN<32>,
) {
    crate::require_admin(e, &admin);
    let mut project = crate::get_bidding_project(e, project_id);
    if !project.closed {
        panic!("{}", ERR_BIDDING_NOT_CLOSED);
    }
    if pool_roots.len() != project.pool_count {
        panic!("{}", ERR_ROOT_COUNT);
    }

    set_roots(e, project_id, project.pool_count, &pool_roots);
    project.refund_root = refund_root;
    crate::put_bidding_project(e, project_id, &project);

    e.events()
        .publish((Symbol::new(e, "allocations_updated"), project_id), ());
}

fn set_roots(e: &Env, project_id: u64, pool_count: u32, pool_roots: &Vec<BytesN<32>>) {
    for pool_id in 0..pool_count {
        let mut pool = get_pool(e, project_id, pool_id);
        pool.root = pool_roots.get(pool_id).unwrap();
        e.storage()
            .persistent()
            .set(&DataKey::Pool(project_id, pool_id), &pool);
    }
}

pub fn get_pool(e: &Env, project_id: u64, pool_id: u32) -> VestingPool {
    e.storage()
        .persistent()
        .get(&DataKey::Pool(project_id, pool_id))
        .unwrap_or_else(|| panic!("{}", ERR_POOL_NOT_FOUND))
}

// ─── Settlement ────────────────────────────────────────────────────────────

fn require_claimable_window(e: &Env, project: &BiddingProject) {
    if !project.closed {
        panic!("{}", ERR_BIDDING_NOT_CLOSED);
    }
    if e.ledger().timestamp() > project.claim_deadline {
        panic!("{}", ERR_CLAIM_DEADLINE_PASSED);
    }
}

/// Refund a losing/rejected bid. The leaf fixes the pool id at 0 and is
/// verified against the refund root; each leaf pays out exactly once.
pub fn claim_refund(
    e: &Env,
    claimant: Address,
    project_id: u64,
    amount: i128,
    proof: Vec<BytesN<32>>,
) {
    claimant.require_auth();
    let mut project = crate::get_bidding_project(e, project_id);
    require_claimable_window(e, &project);
    if get_bid(e, project_id, &claimant).amount == 0 {
        panic!("{}", ERR_NO_BID);
    }

    let leaf = merkle::leaf_hash(e, &claimant, amount, project_id, 0);
    let claimed_key = DataKey::RefundLeafClaimed(leaf.clone());
    if e.storage().persistent().has(&claimed_key) {
        panic!("{}", ERR_LEAF_CLAIMED);
    }
    if !merkle::verify(e, &proof, &project.refund_root, &leaf) {
        panic!("{}", ERR_INVALID_PROOF);
    }
    if amount > project.payment_balance {
        panic!("{}", ERR_INSUFFICIENT_BALANCE);
    }

    e.storage().persistent().set(&claimed_key, &true);
    project.payment_balance -= amount;
    crate::put_bidding_project(e, project_id, &project);

    TokenClient::new(e, &project.payment_token).transfer(
        &e.current_contract_address(),
        &claimant,
        &amount,
    );

    e.events().publish(
        (Symbol::new(e, "refund_claimed"), project_id, claimant),
        amount,
    );
}

/// Claim a winning allocation: verify the pool leaf, then mint a one-flow
/// certificate vesting the won amount over the bidder's requested length,
/// starting at the project's close time.
pub fn claim_nft(
    e: &Env,
    claimant: Address,
    project_id: u64,
    pool_id: u32,
    amount: i128,
    proof: Vec<BytesN<32>>,
) -> u64 {
    claimant.require_auth();
    let project = crate::get_bidding_project(e, project_id);
    require_claimable_window(e, &project);
    if pool_id >= project.pool_count {
        panic!("{}", ERR_POOL_NOT_FOUND);
    }
    let bid = get_bid(e, project_id, &claimant);
    if bid.amount == 0 {
        panic!("{}", ERR_NO_BID);
    }

    let leaf = merkle::leaf_hash(e, &claimant, amount, project_id, pool_id);
    let claimed_key = DataKey::PoolLeafClaimed(leaf.clone());
    if e.storage().persistent().has(&claimed_key) {
        panic!("{}", ERR_LEAF_CLAIMED);
    }
    let pool = get_pool(e, project_id, pool_id);
    if !merkle::verify(e, &proof, &pool.root, &leaf) {
        panic!("{}", ERR_INVALID_PROOF);
    }
    e.storage().persistent().set(&claimed_key, &true);

    let certificate = CertificateClient::new(e, &crate::get_certificate(e));
    let certificate_id = certificate.mint(&claimant);

    let allocation = Allocation {
        amounts: Vec::from_array(e, [amount]),
        vesting_periods: Vec::from_array(e, [bid.vesting_secs]),
        vesting_starts: Vec::from_array(e, [project.end_time]),
        claimed_seconds: Vec::from_array(e, [0_u64]),
        claimed_flows: Vec::from_array(e, [false]),
        is_claimed: false,
        token: project.sale_token.clone(),
        pool_id,
        source: CertificateSource::Bidding(project_id),
    };
    crate::put_allocation(e, certificate_id, &allocation);

    e.events().publish(
        (Symbol::new(e, "allocation_won"), project_id, claimant),
        (pool_id, amount, certificate_id),
    );
    certificate_id
}

// ─── Profit sweep ──────────────────────────────────────────────────────────

fn sweep_project(e: &Env, project_id: u64) -> i128 {
    let mut project = crate::get_bidding_project(e, project_id);
    if !project.closed || e.ledger().timestamp() <= project.claim_deadline {
        panic!("{}", ERR_CLAIM_DEADLINE_NOT_PASSED);
    }
    let amount = project.payment_balance;
    if amount == 0 {
        panic!("{}", ERR_NOTHING_TO_SWEEP);
    }
    project.payment_balance = 0;
    crate::put_bidding_project(e, project_id, &project);

    let treasury = crate::get_treasury(e);
    TokenClient::new(e, &project.payment_token).transfer(
        &e.current_contract_address(),
        &treasury,
        &amount,
    );

    e.events()
        .publish((Symbol::new(e, "profit_withdrawn"), project_id), amount);
    amount
}

/// Sweep one expired project's remaining payment balance to the treasury.
pub fn withdraw_profit(e: &Env, admin: Address, project_id: u64) -> i128 {
    crate::require_admin(e, &admin);
    sweep_project(e, project_id)
}

/// Batched sweep. All-or-nothing: one ineligible project aborts the batch.
pub fn withdraw_profits(e: &Env, admin: Address, project_ids: Vec<u64>) -> i128 {
    crate::require_admin(e, &admin);
    let mut total: i128 = 0;
    for project_id in project_ids.iter() {
        total = total
            .checked_add(sweep_project(e, project_id))
            .expect(ERR_OVERFLOW);
    }
    total
}

/// Sweep every expired project, silently skipping projects that are still
/// open, inside their claim window, or already drained.
pub fn withdraw_all_profits(e: &Env, admin: Address) -> i128 {
    crate::require_admin(e, &admin);
    let count: u64 = e
        .storage()
        .instance()
        .get(&DataKey::BiddingCount)
        .unwrap_or(0);
    let now = e.ledger().timestamp();
    let mut total: i128 = 0;
    for project_id in 1..=count {
        let project = crate::get_bidding_project(e, project_id);
        if !project.closed || now <= project.claim_deadline || project.payment_balance == 0 {
            continue;
        }
        total = total
            .checked_add(sweep_project(e, project_id))
            .expect(ERR_OVERFLOW);
    }
    total
}
