//! Reward subsystem: KOL allocation lists with O(1)-removal pending sets.
//!
//! Two parallel registries per project — token rewards (TVS, vested through
//! certificates) and stablecoin rewards (paid out directly). Each registry
//! is an address list plus an address→index side-map maintained under
//! swap-with-last-and-pop removal, so any sequence of claims keeps every
//! remaining index pointing at its exact list position.

use soroban_sdk::{token::TokenClient, Address, Env, Symbol, Vec};

use crate::certificate::CertificateClient;
use crate::errors::*;
use crate::types::{Allocation, CertificateSource, DataKey, RewardProject};

/// Which of the two pending registries an operation targets.
#[derive(Clone, Copy)]
enum Registry {
    Tvs,
    Stablecoin,
}

impl Registry {
    fn pending_key(&self, project_id: u64) -> DataKey {
        match self {
            Registry::Tvs => DataKey::TvsPending(project_id),
            Registry::Stablecoin => DataKey::StablePending(project_id),
        }
    }

    fn index_key(&self, project_id: u64, address: &Address) -> DataKey {
        match self {
            Registry::Tvs => DataKey::TvsIndex(project_id, address.clone()),
            Registry::Stablecoin => DataKey::StableIndex(project_id, address.clone()),
        }
    }

    fn owed_key(&self, project_id: u64, address: &Address) -> DataKey {
        match self {
            Registry::Tvs => DataKey::TvsOwed(project_id, address.clone()),
            Registry::Stablecoin => DataKey::StableOwed(project_id, address.clone()),
        }
    }
}

// ─── Lifecycle ─────────────────────────────────────────────────────────────

pub fn launch_project(
    e: &Env,
    admin: Address,
    token: Address,
    stablecoin: Address,
    start_time: u64,
    vesting_secs: u64,
    claim_window: u64,
) -> u64 {
    crate::require_admin(e, &admin);
    if claim_window == 0 {
        panic!("{}", ERR_INVALID_CLAIM_WINDOW);
    }

    let count: u64 = e
        .storage()
        .instance()
        .get(&DataKey::RewardCount)
        .unwrap_or(0);
    let id = count.checked_add(1).expect(ERR_OVERFLOW);
    e.storage().instance().set(&DataKey::RewardCount, &id);

    let claim_deadline = start_time.checked_add(claim_window).expect(ERR_OVERFLOW);
    let project = RewardProject {
        token,
        stablecoin,
        start_time,
        vesting_secs,
        claim_deadline,
    };
    crate::put_reward_project(e, id, &project);

    e.events().publish(
        (Symbol::new(e, "reward_launched"), id),
        (start_time, vesting_secs, claim_deadline),
    );
    id
}

fn load_allocation_list(
    e: &Env,
    admin: &Address,
    project_id: u64,
    registry: Registry,
    addresses: &Vec<Address>,
    amounts: &Vec<i128>,
    total: i128,
    pull_token: &Address,
) {
    crate::require_admin(e, admin);
    if e.storage().persistent().has(&registry.pending_key(project_id)) {
        panic!("{}", ERR_ALLOCATION_SET);
    }
    if addresses.is_empty() {
        panic!("{}", ERR_EMPTY_BATCH);
    }
    if addresses.len() != amounts.len() {
        panic!("{}", ERR_LENGTH_MISMATCH);
    }

    let mut pending: Vec<Address> = Vec::new(e);
    let mut sum: i128 = 0;
    for i in 0..addresses.len() {
        let address = addresses.get(i).unwrap();
        let amount = amounts.get(i).unwrap();
        if amount <= 0 {
            panic!("{}", ERR_INVALID_AMOUNT);
        }
        let owed_key = registry.owed_key(project_id, &address);
        if e.storage().persistent().has(&owed_key) {
            panic!("{}", ERR_DUPLICATE_ADDRESS);
        }
        sum = sum.checked_add(amount).expect(ERR_OVERFLOW);
        e.storage().persistent().set(&owed_key, &amount);
        e.storage()
            .persistent()
            .set(&registry.index_key(project_id, &address), &i);
        pending.push_back(address);
    }
    if sum != total {
        panic!("{}", ERR_AMOUNTS_SUM);
    }
    e.storage()
        .persistent()
        .set(&registry.pending_key(project_id), &pending);

    TokenClient::new(e, pull_token).transfer_from(
        &e.current_contract_address(),
        admin,
        &e.current_contract_address(),
        &total,
    );
}

/// Bulk-load the token-reward (TVS) pending list. Load-once; the declared
/// total must equal the exact sum of entries and is pulled from the admin
/// up front.
pub fn set_tvs_allocation(
    e: &Env,
    admin: Address,
    project_id: u64,
    addresses: Vec<Address>,
    amounts: Vec<i128>,
    total: i128,
) {
    let project = crate::get_reward_project(e, project_id);
    load_allocation_list(
        e,
        &admin,
        project_id,
        Registry::Tvs,
        &addresses,
        &amounts,
        total,
        &project.token,
    );
    e.events().publish(
        (Symbol::new(e, "tvs_allocation_set"), project_id),
        (addresses.len(), total),
    );
}

/// Bulk-load the stablecoin pending list. Same rules as the TVS list.
pub fn set_stablecoin_allocation(
    e: &Env,
    admin: Address,
    project_id: u64,
    addresses: Vec<Address>,
    amounts: Vec<i128>,
    total: i128,
) {
    let project = crate::get_reward_project(e, project_id);
    load_allocation_list(
        e,
        &admin,
        project_id,
        Registry::Stablecoin,
        &addresses,
        &amounts,
        total,
        &project.stablecoin,
    );
    e.events().publish(
        (Symbol::new(e, "stablecoin_allocation_set"), project_id),
        (addresses.len(), total),
    );
}

// ─── Pending-set maintenance ───────────────────────────────────────────────

/// Zero an address's owed amount and remove it from its pending list via
/// swap-with-last-and-pop, fixing up the moved element's index first.
/// Returns the owed amount. Panics when nothing is owed (already claimed or
/// never allocated).
fn take_allocation(e: &Env, project_id: u64, registry: Registry, address: &Address) -> i128 {
    let owed_key = registry.owed_key(project_id, address);
    let owed: i128 = e.storage().persistent().get(&owed_key).unwrap_or(0);
    if owed == 0 {
        panic!("{}", ERR_NOTHING_TO_CLAIM);
    }
    e.storage().persistent().remove(&owed_key);

    let pending_key = registry.pending_key(project_id);
    let mut pending: Vec<Address> = e
        .storage()
        .persistent()
        .get(&pending_key)
        .unwrap_or_else(|| Vec::new(e));
    let index_key = registry.index_key(project_id, address);
    let index: u32 = e
        .storage()
        .persistent()
        .get(&index_key)
        .unwrap_or_else(|| panic!("{}", ERR_NOTHING_TO_CLAIM));

    let last_index = pending.len() - 1;
    if index != last_index {
        let moved = pending.get(last_index).unwrap();
        pending.set(index, moved.clone());
        e.storage()
            .persistent()
            .set(&registry.index_key(project_id, &moved), &index);
    }
    pending.pop_back();
    e.storage().persistent().remove(&index_key);
    e.storage().persistent().set(&pending_key, &pending);

    owed
}

fn grant_tvs(e: &Env, project: &RewardProject, project_id: u64, claimant: &Address, owed: i128) -> u64 {
    let certificate = CertificateClient::new(e, &crate::get_certificate(e));
    let certificate_id = certificate.mint(claimant);

    let allocation = Allocation {
        amounts: Vec::from_array(e, [owed]),
        vesting_periods: Vec::from_array(e, [project.vesting_secs]),
        vesting_starts: Vec::from_array(e, [project.start_time]),
        claimed_seconds: Vec::from_array(e, [0_u64]),
        claimed_flows: Vec::from_array(e, [false]),
        is_claimed: false,
        token: project.token.clone(),
        pool_id: 0,
        source: CertificateSource::Reward(project_id),
    };
    crate::put_allocation(e, certificate_id, &allocation);

    e.events().publish(
        (Symbol::new(e, "tvs_claimed"), project_id, claimant.clone()),
        (owed, certificate_id),
    );
    certificate_id
}

fn grant_stablecoin(e: &Env, project: &RewardProject, project_id: u64, claimant: &Address, owed: i128) {
    TokenClient::new(e, &project.stablecoin).transfer(
        &e.current_contract_address(),
        claimant,
        &owed,
    );
    e.events().publish(
        (Symbol::new(e, "stablecoin_claimed"), project_id, claimant.clone()),
        owed,
    );
}

// ─── Individual claims (before the deadline) ───────────────────────────────

fn require_before_deadline(e: &Env, project: &RewardProject) {
    if e.ledger().timestamp() > project.claim_deadline {
        panic!("{}", ERR_CLAIM_DEADLINE_PASSED);
    }
}

/// Claim the caller's TVS reward: mints a one-flow certificate vesting over
/// the project's shared period from the project start.
pub fn claim_reward_tvs(e: &Env, claimant: Address, project_id: u64) -> u64 {
    claimant.require_auth();
    let project = crate::get_reward_project(e, project_id);
    require_before_deadline(e, &project);
    let owed = take_allocation(e, project_id, Registry::Tvs, &claimant);
    grant_tvs(e, &project, project_id, &claimant, owed)
}

/// Claim the caller's stablecoin reward: direct transfer, no certificate.
pub fn claim_stablecoin_allocation(e: &Env, claimant: Address, project_id: u64) {
    claimant.require_auth();
    let project = crate::get_reward_project(e, project_id);
    require_before_deadline(e, &project);
    let owed = take_allocation(e, project_id, Registry::Stablecoin, &claimant);
    grant_stablecoin(e, &project, project_id, &claimant, owed);
}

// ─── Owner-driven distribution (after the deadline) ────────────────────────

fn require_after_deadline(e: &Env, project: &RewardProject) {
    if e.ledger().timestamp() <= project.claim_deadline {
        panic!("{}", ERR_CLAIM_DEADLINE_NOT_PASSED);
    }
}

/// Distribute TVS rewards to a batch of not-yet-claimed KOLs.
/// All-or-nothing: one address with nothing owed aborts the batch.
pub fn distribute_reward_tvs(e: &Env, admin: Address, project_id: u64, addresses: Vec<Address>) {
    crate::require_admin(e, &admin);
    let project = crate::get_reward_project(e, project_id);
    require_after_deadline(e, &project);
    for address in addresses.iter() {
        let owed = take_allocation(e, project_id, Registry::Tvs, &address);
        grant_tvs(e, &project, project_id, &address, owed);
    }
}

/// Distribute stablecoin rewards to a batch of not-yet-claimed KOLs.
pub fn distribute_stablecoin_allocation(
    e: &Env,
    admin: Address,
    project_id: u64,
    addresses: Vec<Address>,
) {
    crate::require_admin(e, &admin);
    let project = crate::get_reward_project(e, project_id);
    require_after_deadline(e, &project);
    for address in addresses.iter() {
        let owed = take_allocation(e, project_id, Registry::Stablecoin, &address);
        grant_stablecoin(e, &project, project_id, &address, owed);
    }
}

/// Drain every unclaimed TVS reward. Iterates the pending list from the end
/// backward so swap-remove never invalidates the next position.
pub fn distribute_remaining_reward_tvs(e: &Env, admin: Address, project_id: u64) {
    crate::require_admin(e, &admin);
    let project = crate::get_reward_project(e, project_id);
    require_after_deadline(e, &project);
    loop {
        let pending = get_pending(e, project_id, Registry::Tvs);
        if pending.is_empty() {
            break;
        }
        let address = pending.get(pending.len() - 1).unwrap();
        let owed = take_allocation(e, project_id, Registry::Tvs, &address);
        grant_tvs(e, &project, project_id, &address, owed);
    }
}

/// Drain every unclaimed stablecoin reward, back to front.
pub fn distribute_remaining_stablecoin(e: &Env, admin: Address, project_id: u64) {
    crate::require_admin(e, &admin);
    let project = crate::get_reward_project(e, project_id);
    require_after_deadline(e, &project);
    loop {
        let pending = get_pending(e, project_id, Registry::Stablecoin);
        if pending.is_empty() {
            break;
        }
        let address = pending.get(pending.len() - 1).unwrap();
        let owed = take_allocation(e, project_id, Registry::Stablecoin, &address);
        grant_stablecoin(e, &project, project_id, &address, owed);
    }
}

// ─── Queries ───────────────────────────────────────────────────────────────

fn get_pending(e: &Env, project_id: u64, registry: Registry) -> Vec<Address> {
    e.storage()
        .persistent()
        .get(&registry.pending_key(project_id))
        .unwrap_or_else(|| Vec::new(e))
}

pub fn get_pending_tvs(e: &Env, project_id: u64) -> Vec<Address> {
    get_pending(e, project_id, Registry::Tvs)
}

pub fn get_pending_stablecoin(e: &Env, project_id: u64) -> Vec<Address> {
    get_pending(e, project_id, Registry::Stablecoin)
}

pub fn get_owed_tvs(e: &Env, project_id: u64, address: &Address) -> i128 {
    e.storage()
        .persistent()
        .get(&Registry::Tvs.owed_key(project_id, address))
        .unwrap_or(0)
}

pub fn get_owed_stablecoin(e: &Env, project_id: u64, address: &Address) -> i128 {
    e.storage()
        .persistent()
        .get(&Registry::Stablecoin.owed_key(project_id, address))
        .unwrap_or(0)
}
