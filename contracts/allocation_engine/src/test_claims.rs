//! Tests for per-second accrual through `claim_tokens`: partial claims,
//! floor rounding, immediate flows and terminal burn.

#![cfg(test)]

use crate::test_helpers::*;
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{Address, Env, Vec};

/// Reward project starting at `start` with a 30-day vesting period and one
/// KOL owed `amount`; returns the KOL's freshly claimed certificate id.
fn vesting_certificate(e: &Env, t: &TestEnv, start: u64, amount: i128) -> (Address, u64) {
    e.ledger().with_mut(|li| li.timestamp = start);
    let project_id = launch_reward(e, t);
    let kol = Address::generate(e);
    t.engine.set_tvs_allocation(
        &t.admin,
        &project_id,
        &Vec::from_array(e, [kol.clone()]),
        &Vec::from_array(e, [amount]),
        &amount,
    );
    let certificate_id = t.engine.claim_reward_tvs(&kol, &project_id);
    (kol, certificate_id)
}

// ═══════════════════════════════════════════════════════════════════
// 1. Linear accrual (30-day certificate, 1,000 tokens)
// ═══════════════════════════════════════════════════════════════════

#[test]
#[should_panic(expected = "no claimable tokens")]
fn test_claim_at_vesting_start_panics() {
    let e = Env::default();
    let t = setup(&e);
    let (kol, certificate_id) = vesting_certificate(&e, &t, 1_000, 1_000);
    t.engine.claim_tokens(&kol, &certificate_id);
}

#[test]
fn test_claim_at_halfway_pays_half() {
    let e = Env::default();
    let t = setup(&e);
    let (kol, certificate_id) = vesting_certificate(&e, &t, 1_000, 1_000);

    e.ledger().with_mut(|li| li.timestamp = 1_000 + ONE_MONTH / 2);
    let paid = t.engine.claim_tokens(&kol, &certificate_id);

    assert_eq!(paid, 500);
    assert_eq!(balance(&e, &t.sale_token, &kol), 500);
    let allocation = t.engine.get_allocation(&certificate_id);
    assert_eq!(allocation.claimed_seconds.get(0).unwrap(), ONE_MONTH / 2);
    assert!(!allocation.is_claimed);
    assert_eq!(t.certificate.owner_of(&certificate_id), Some(kol));
}

#[test]
fn test_reclaim_at_same_timestamp_fails_without_state_change() {
    let e = Env::default();
    let t = setup(&e);
    let (kol, certificate_id) = vesting_certificate(&e, &t, 1_000, 1_000);

    e.ledger().with_mut(|li| li.timestamp = 1_000 + ONE_MONTH / 2);
    assert_eq!(t.engine.claim_tokens(&kol, &certificate_id), 500);

    // Nothing accrued since the claim a moment ago; the retry must fail and
    // leave the flow state exactly where the first claim wrote it.
    assert!(t.engine.try_claim_tokens(&kol, &certificate_id).is_err());
    let allocation = t.engine.get_allocation(&certificate_id);
    assert_eq!(allocation.claimed_seconds.get(0).unwrap(), ONE_MONTH / 2);
    assert!(!allocation.is_claimed);
    assert_eq!(balance(&e, &t.sale_token, &kol), 500);
}

#[test]
fn test_claim_at_expiry_pays_remainder_and_burns() {
    let e = Env::default();
    let t = setup(&e);
    let (kol, certificate_id) = vesting_certificate(&e, &t, 1_000, 1_000);

    e.ledger().with_mut(|li| li.timestamp = 1_000 + ONE_MONTH / 2);
    t.engine.claim_tokens(&kol, &certificate_id);

    // Well past expiry: elapsed time clamps to the period.
    e.ledger().with_mut(|li| li.timestamp = 1_000 + 3 * ONE_MONTH);
    let paid = t.engine.claim_tokens(&kol, &certificate_id);

    assert_eq!(paid, 500);
    assert_eq!(balance(&e, &t.sale_token, &kol), 1_000);
    assert!(t.engine.get_allocation(&certificate_id).is_claimed);
    assert_eq!(t.certificate.owner_of(&certificate_id), None);
}

#[test]
fn test_partial_claims_floor_each_increment() {
    let e = Env::default();
    let t = setup(&e);
    let (kol, certificate_id) = vesting_certificate(&e, &t, 0, 1_000);

    // Thirds do not divide evenly; each claim floors its own increment and
    // the sub-unit remainder stays with the engine.
    let mut total = 0_i128;
    for checkpoint in [ONE_MONTH / 3, 2 * ONE_MONTH / 3, ONE_MONTH] {
        e.ledger().with_mut(|li| li.timestamp = checkpoint);
        total += t.engine.claim_tokens(&kol, &certificate_id);
        assert!(total <= 1_000);
    }
    assert_eq!(total, 999);
    assert_eq!(balance(&e, &t.sale_token, &kol), 999);
    assert!(t.engine.get_allocation(&certificate_id).is_claimed);
}

#[test]
#[should_panic(expected = "no claimable tokens")]
fn test_subsecond_accrual_rounds_down_to_nothing() {
    let e = Env::default();
    let t = setup(&e);
    // 10 tokens over 30 days: the first whole token needs 259,200 seconds.
    let (kol, certificate_id) = vesting_certificate(&e, &t, 0, 10);
    e.ledger().with_mut(|li| li.timestamp = 1_000);
    t.engine.claim_tokens(&kol, &certificate_id);
}

// ═══════════════════════════════════════════════════════════════════
// 2. Immediate flows (auction win with zero vesting)
// ═══════════════════════════════════════════════════════════════════

/// Auction winner holding a zero-vesting certificate for `amount`.
fn immediate_certificate(e: &Env, t: &TestEnv, amount: i128) -> (Address, u64) {
    e.ledger().with_mut(|li| li.timestamp = 100);
    let project_id = launch_bidding(e, t, 100, 100 + ONE_DAY);
    t.engine.create_pool(&t.admin, &project_id, &amount, &false);

    let bidder = Address::generate(e);
    fund(e, t, &t.payment_token, &bidder, amount);
    t.engine.place_bid(&bidder, &project_id, &amount, &0);

    let l = leaf(t, &bidder, amount, project_id, 0);
    let (root, proof) = single_leaf_tree(e, &l);
    finalize(e, t, project_id, Vec::from_array(e, [root]), zero_root(e));

    let certificate_id = t.engine.claim_nft(&bidder, &project_id, &0, &amount, &proof);
    (bidder, certificate_id)
}

#[test]
fn test_immediate_flow_pays_in_full_and_burns() {
    let e = Env::default();
    let t = setup(&e);
    let (bidder, certificate_id) = immediate_certificate(&e, &t, 2_500);

    let paid = t.engine.claim_tokens(&bidder, &certificate_id);

    assert_eq!(paid, 2_500);
    assert_eq!(balance(&e, &t.sale_token, &bidder), 2_500);
    assert_eq!(t.certificate.owner_of(&certificate_id), None);
}

#[test]
#[should_panic(expected = "caller does not hold the certificate")]
fn test_claim_after_burn_panics() {
    let e = Env::default();
    let t = setup(&e);
    let (bidder, certificate_id) = immediate_certificate(&e, &t, 2_500);
    t.engine.claim_tokens(&bidder, &certificate_id);
    t.engine.claim_tokens(&bidder, &certificate_id);
}

// ═══════════════════════════════════════════════════════════════════
// 3. Holder checks
// ═══════════════════════════════════════════════════════════════════

#[test]
#[should_panic(expected = "caller does not hold the certificate")]
fn test_claim_by_non_holder_panics() {
    let e = Env::default();
    let t = setup(&e);
    let (_kol, certificate_id) = vesting_certificate(&e, &t, 0, 1_000);
    e.ledger().with_mut(|li| li.timestamp = ONE_MONTH);
    let stranger = Address::generate(&e);
    t.engine.claim_tokens(&stranger, &certificate_id);
}

#[test]
fn test_claim_follows_certificate_transfer() {
    let e = Env::default();
    let t = setup(&e);
    let (kol, certificate_id) = vesting_certificate(&e, &t, 0, 1_000);
    let buyer = Address::generate(&e);
    t.certificate.transfer(&kol, &buyer, &certificate_id);

    e.ledger().with_mut(|li| li.timestamp = ONE_MONTH);
    let paid = t.engine.claim_tokens(&buyer, &certificate_id);

    assert_eq!(paid, 1_000);
    assert_eq!(balance(&e, &t.sale_token, &buyer), 1_000);
    assert_eq!(balance(&e, &t.sale_token, &kol), 0);
}

#[test]
#[should_panic(expected = "caller does not hold the certificate")]
fn test_seller_cannot_claim_after_transfer() {
    let e = Env::default();
    let t = setup(&e);
    let (kol, certificate_id) = vesting_certificate(&e, &t, 0, 1_000);
    let buyer = Address::generate(&e);
    t.certificate.transfer(&kol, &buyer, &certificate_id);
    e.ledger().with_mut(|li| li.timestamp = ONE_MONTH);
    t.engine.claim_tokens(&kol, &certificate_id);
}
