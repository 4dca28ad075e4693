//! Tests for the reward subsystem: allocation-list loading, pending-set
//! integrity under claims, and post-deadline distribution.

#![cfg(test)]

use crate::test_helpers::*;
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{Address, Env, Vec};

fn three_kols(e: &Env) -> (Address, Address, Address) {
    (
        Address::generate(e),
        Address::generate(e),
        Address::generate(e),
    )
}

// ═══════════════════════════════════════════════════════════════════
// 1. Launch
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_launch_reward_stores_project() {
    let e = Env::default();
    let t = setup(&e);
    e.ledger().with_mut(|li| li.timestamp = 1_000);

    let id = launch_reward(&e, &t);

    assert_eq!(id, 1);
    let project = t.engine.get_reward_project(&id);
    assert_eq!(project.start_time, 1_000);
    assert_eq!(project.vesting_secs, ONE_MONTH);
    assert_eq!(project.claim_deadline, 1_000 + ONE_MONTH);
    assert_eq!(launch_reward(&e, &t), 2);
}

#[test]
#[should_panic(expected = "claim window must be positive")]
fn test_launch_reward_zero_claim_window_panics() {
    let e = Env::default();
    let t = setup(&e);
    t.engine
        .launch_reward_project(&t.admin, &t.sale_token, &t.stablecoin, &0, &ONE_MONTH, &0);
}

// ═══════════════════════════════════════════════════════════════════
// 2. Allocation-list loading
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_set_tvs_allocation_stores_and_pulls_total() {
    let e = Env::default();
    let t = setup(&e);
    let id = launch_reward(&e, &t);
    let (a, b, c) = three_kols(&e);

    t.engine.set_tvs_allocation(
        &t.admin,
        &id,
        &Vec::from_array(&e, [a.clone(), b.clone(), c.clone()]),
        &Vec::from_array(&e, [100_i128, 200, 300]),
        &600_i128,
    );

    assert_eq!(t.engine.get_pending_tvs(&id).len(), 3);
    assert_eq!(t.engine.get_owed_tvs(&id, &a), 100);
    assert_eq!(t.engine.get_owed_tvs(&id, &b), 200);
    assert_eq!(t.engine.get_owed_tvs(&id, &c), 300);
    assert_eq!(balance(&e, &t.sale_token, &t.engine_id), 600);
}

#[test]
#[should_panic(expected = "amounts do not add up to the declared total")]
fn test_set_tvs_allocation_sum_mismatch_panics() {
    let e = Env::default();
    let t = setup(&e);
    let id = launch_reward(&e, &t);
    let (a, b, _) = three_kols(&e);
    t.engine.set_tvs_allocation(
        &t.admin,
        &id,
        &Vec::from_array(&e, [a, b]),
        &Vec::from_array(&e, [100_i128, 200]),
        &999_i128,
    );
}

#[test]
#[should_panic(expected = "address and amount lists differ in length")]
fn test_set_tvs_allocation_length_mismatch_panics() {
    let e = Env::default();
    let t = setup(&e);
    let id = launch_reward(&e, &t);
    let (a, b, _) = three_kols(&e);
    t.engine.set_tvs_allocation(
        &t.admin,
        &id,
        &Vec::from_array(&e, [a, b]),
        &Vec::from_array(&e, [100_i128]),
        &100_i128,
    );
}

#[test]
#[should_panic(expected = "empty address list")]
fn test_set_tvs_allocation_empty_panics() {
    let e = Env::default();
    let t = setup(&e);
    let id = launch_reward(&e, &t);
    t.engine
        .set_tvs_allocation(&t.admin, &id, &Vec::new(&e), &Vec::new(&e), &0_i128);
}

#[test]
#[should_panic(expected = "duplicate address in allocation list")]
fn test_set_tvs_allocation_duplicate_panics() {
    let e = Env::default();
    let t = setup(&e);
    let id = launch_reward(&e, &t);
    let kol = Address::generate(&e);
    t.engine.set_tvs_allocation(
        &t.admin,
        &id,
        &Vec::from_array(&e, [kol.clone(), kol]),
        &Vec::from_array(&e, [100_i128, 100]),
        &200_i128,
    );
}

#[test]
#[should_panic(expected = "amount must be positive")]
fn test_set_tvs_allocation_zero_amount_panics() {
    let e = Env::default();
    let t = setup(&e);
    let id = launch_reward(&e, &t);
    let kol = Address::generate(&e);
    t.engine.set_tvs_allocation(
        &t.admin,
        &id,
        &Vec::from_array(&e, [kol]),
        &Vec::from_array(&e, [0_i128]),
        &0_i128,
    );
}

#[test]
#[should_panic(expected = "allocation list already set")]
fn test_set_tvs_allocation_twice_panics() {
    let e = Env::default();
    let t = setup(&e);
    let id = launch_reward(&e, &t);
    let kol = Address::generate(&e);
    let addresses = Vec::from_array(&e, [kol]);
    let amounts = Vec::from_array(&e, [100_i128]);
    t.engine
        .set_tvs_allocation(&t.admin, &id, &addresses, &amounts, &100_i128);
    t.engine
        .set_tvs_allocation(&t.admin, &id, &addresses, &amounts, &100_i128);
}

#[test]
fn test_tvs_and_stablecoin_lists_are_independent() {
    let e = Env::default();
    let t = setup(&e);
    let id = launch_reward(&e, &t);
    let kol = Address::generate(&e);
    let addresses = Vec::from_array(&e, [kol.clone()]);

    t.engine.set_tvs_allocation(
        &t.admin,
        &id,
        &addresses,
        &Vec::from_array(&e, [100_i128]),
        &100_i128,
    );
    t.engine.set_stablecoin_allocation(
        &t.admin,
        &id,
        &addresses,
        &Vec::from_array(&e, [250_i128]),
        &250_i128,
    );

    assert_eq!(t.engine.get_owed_tvs(&id, &kol), 100);
    assert_eq!(t.engine.get_owed_stablecoin(&id, &kol), 250);
    assert_eq!(balance(&e, &t.stablecoin, &t.engine_id), 250);
}

// ═══════════════════════════════════════════════════════════════════
// 3. Individual claims and pending-set integrity
// ═══════════════════════════════════════════════════════════════════

/// Reward project with a loaded three-entry TVS list.
fn loaded_project(e: &Env, t: &TestEnv) -> (u64, Address, Address, Address) {
    let id = launch_reward(e, t);
    let (a, b, c) = three_kols(e);
    t.engine.set_tvs_allocation(
        &t.admin,
        &id,
        &Vec::from_array(e, [a.clone(), b.clone(), c.clone()]),
        &Vec::from_array(e, [100_i128, 200, 300]),
        &600_i128,
    );
    (id, a, b, c)
}

#[test]
fn test_claim_reward_tvs_mints_certificate() {
    let e = Env::default();
    let t = setup(&e);
    e.ledger().with_mut(|li| li.timestamp = 1_000);
    let (id, a, _, _) = loaded_project(&e, &t);

    let certificate_id = t.engine.claim_reward_tvs(&a, &id);

    assert_eq!(t.certificate.owner_of(&certificate_id), Some(a.clone()));
    let allocation = t.engine.get_allocation(&certificate_id);
    assert_eq!(allocation.amounts.get(0).unwrap(), 100);
    assert_eq!(allocation.vesting_periods.get(0).unwrap(), ONE_MONTH);
    assert_eq!(allocation.vesting_starts.get(0).unwrap(), 1_000);
    assert_eq!(t.engine.get_owed_tvs(&id, &a), 0);
    assert_eq!(t.engine.get_pending_tvs(&id).len(), 2);
}

#[test]
fn test_middle_claim_keeps_pending_set_consistent() {
    let e = Env::default();
    let t = setup(&e);
    let (id, a, b, c) = loaded_project(&e, &t);

    // Remove the middle entry: the last entry is swapped into its slot.
    t.engine.claim_reward_tvs(&b, &id);
    let pending = t.engine.get_pending_tvs(&id);
    assert_eq!(pending.len(), 2);
    assert!(pending.contains(&a));
    assert!(pending.contains(&c));

    // The swapped-in entry must still claim cleanly afterwards.
    t.engine.claim_reward_tvs(&c, &id);
    t.engine.claim_reward_tvs(&a, &id);
    assert!(t.engine.get_pending_tvs(&id).is_empty());
}

#[test]
#[should_panic(expected = "no allocation to claim")]
fn test_claim_reward_tvs_twice_panics() {
    let e = Env::default();
    let t = setup(&e);
    let (id, a, _, _) = loaded_project(&e, &t);
    t.engine.claim_reward_tvs(&a, &id);
    t.engine.claim_reward_tvs(&a, &id);
}

#[test]
#[should_panic(expected = "no allocation to claim")]
fn test_claim_reward_tvs_unallocated_panics() {
    let e = Env::default();
    let t = setup(&e);
    let (id, _, _, _) = loaded_project(&e, &t);
    let stranger = Address::generate(&e);
    t.engine.claim_reward_tvs(&stranger, &id);
}

#[test]
#[should_panic(expected = "claim deadline has passed")]
fn test_claim_reward_tvs_after_deadline_panics() {
    let e = Env::default();
    let t = setup(&e);
    let (id, a, _, _) = loaded_project(&e, &t);
    e.ledger().with_mut(|li| li.timestamp += 2 * ONE_MONTH);
    t.engine.claim_reward_tvs(&a, &id);
}

#[test]
fn test_claim_stablecoin_transfers_directly() {
    let e = Env::default();
    let t = setup(&e);
    let id = launch_reward(&e, &t);
    let kol = Address::generate(&e);
    t.engine.set_stablecoin_allocation(
        &t.admin,
        &id,
        &Vec::from_array(&e, [kol.clone()]),
        &Vec::from_array(&e, [500_i128]),
        &500_i128,
    );

    t.engine.claim_stablecoin_allocation(&kol, &id);

    assert_eq!(balance(&e, &t.stablecoin, &kol), 500);
    assert_eq!(t.engine.get_owed_stablecoin(&id, &kol), 0);
    assert!(t.engine.get_pending_stablecoin(&id).is_empty());
}

// ═══════════════════════════════════════════════════════════════════
// 4. Post-deadline distribution
// ═══════════════════════════════════════════════════════════════════

#[test]
#[should_panic(expected = "claim deadline has not passed yet")]
fn test_distribute_before_deadline_panics() {
    let e = Env::default();
    let t = setup(&e);
    let (id, a, _, _) = loaded_project(&e, &t);
    t.engine
        .distribute_reward_tvs(&t.admin, &id, &Vec::from_array(&e, [a]));
}

#[test]
fn test_distribute_batch_mints_for_each_address() {
    let e = Env::default();
    let t = setup(&e);
    let (id, a, b, _) = loaded_project(&e, &t);
    e.ledger().with_mut(|li| li.timestamp += 2 * ONE_MONTH);

    t.engine
        .distribute_reward_tvs(&t.admin, &id, &Vec::from_array(&e, [a.clone(), b.clone()]));

    assert_eq!(t.certificate.owner_of(&1), Some(a));
    assert_eq!(t.certificate.owner_of(&2), Some(b));
    assert_eq!(t.engine.get_pending_tvs(&id).len(), 1);
}

#[test]
#[should_panic(expected = "no allocation to claim")]
fn test_distribute_batch_with_claimed_address_aborts() {
    let e = Env::default();
    let t = setup(&e);
    let (id, a, b, _) = loaded_project(&e, &t);
    t.engine.claim_reward_tvs(&a, &id);
    e.ledger().with_mut(|li| li.timestamp += 2 * ONE_MONTH);
    t.engine
        .distribute_reward_tvs(&t.admin, &id, &Vec::from_array(&e, [b, a]));
}

#[test]
fn test_distribute_remaining_drains_pending() {
    let e = Env::default();
    let t = setup(&e);
    let (id, a, b, c) = loaded_project(&e, &t);
    t.engine.claim_reward_tvs(&b, &id);
    e.ledger().with_mut(|li| li.timestamp += 2 * ONE_MONTH);

    t.engine.distribute_remaining_reward_tvs(&t.admin, &id);

    assert!(t.engine.get_pending_tvs(&id).is_empty());
    assert_eq!(t.engine.get_owed_tvs(&id, &a), 0);
    assert_eq!(t.engine.get_owed_tvs(&id, &c), 0);
    assert_eq!(t.engine.total_certificates(), 3);
}

#[test]
fn test_distribute_remaining_stablecoin_pays_everyone() {
    let e = Env::default();
    let t = setup(&e);
    let id = launch_reward(&e, &t);
    let (a, b, _) = three_kols(&e);
    t.engine.set_stablecoin_allocation(
        &t.admin,
        &id,
        &Vec::from_array(&e, [a.clone(), b.clone()]),
        &Vec::from_array(&e, [400_i128, 600]),
        &1_000_i128,
    );
    e.ledger().with_mut(|li| li.timestamp += 2 * ONE_MONTH);

    t.engine.distribute_remaining_stablecoin(&t.admin, &id);

    assert_eq!(balance(&e, &t.stablecoin, &a), 400);
    assert_eq!(balance(&e, &t.stablecoin, &b), 600);
    assert!(t.engine.get_pending_stablecoin(&id).is_empty());
}
