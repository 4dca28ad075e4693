//! Split/merge subsystem.
//!
//! Split fans one certificate's flow set out into N certificates by a
//! basis-point percentage list; merge folds N certificates into one by
//! appending flows. Both are fee-gated (rate capped at 2%) and preserve each
//! flow's vesting period, start time and claimed-seconds: elapsed time is a
//! wall-clock property of the flow, not a function of principal size.

use soroban_sdk::{Address, Env, Symbol, Vec};

use crate::certificate::CertificateClient;
use crate::errors::*;
use crate::fees;
use crate::types::{Allocation, BPS_DENOMINATOR};

fn scale(e: &Env, amounts: &Vec<i128>, bps: u32) -> Vec<i128> {
    let mut scaled = Vec::new(e);
    for amount in amounts.iter() {
        scaled.push_back(amount * (bps as i128) / (BPS_DENOMINATOR as i128));
    }
    scaled
}

/// Split a certificate by `percentages` (basis points, summing to exactly
/// 10,000). The split fee is deducted from every flow first; the first
/// output reuses the original id and the rest are minted fresh to the
/// caller. Returns all resulting certificate ids, original first.
pub fn split_certificate(
    e: &Env,
    caller: Address,
    certificate_id: u64,
    percentages: Vec<u32>,
) -> Vec<u64> {
    caller.require_auth();
    crate::require_certificate_holder(e, &caller, certificate_id);

    let mut sum: u32 = 0;
    for bps in percentages.iter() {
        if bps == 0 {
            panic!("{}", ERR_PERCENTAGE_ZERO);
        }
        sum = sum.checked_add(bps).expect(ERR_OVERFLOW);
    }
    if sum != BPS_DENOMINATOR {
        panic!("{}", ERR_PERCENTAGES_SUM);
    }

    let mut allocation = crate::get_allocation(e, certificate_id);
    let cfg = fees::get_config(e);
    let (fee_total, post_fee) = fees::apply_rate(e, cfg.split_bps, &allocation.amounts);

    let certificate = CertificateClient::new(e, &crate::get_certificate(e));
    let mut ids: Vec<u64> = Vec::new(e);
    for n in 0..percentages.len() {
        let bps = percentages.get(n).unwrap();
        let amounts = scale(e, &post_fee, bps);
        if n == 0 {
            allocation.amounts = amounts;
            crate::put_allocation(e, certificate_id, &allocation);
            ids.push_back(certificate_id);
        } else {
            let new_id = certificate.mint(&caller);
            let fraction = Allocation {
                amounts,
                vesting_periods: allocation.vesting_periods.clone(),
                vesting_starts: allocation.vesting_starts.clone(),
                claimed_seconds: allocation.claimed_seconds.clone(),
                claimed_flows: allocation.claimed_flows.clone(),
                is_claimed: allocation.is_claimed,
                token: allocation.token.clone(),
                pool_id: allocation.pool_id,
                source: allocation.source.clone(),
            };
            crate::put_allocation(e, new_id, &fraction);
            ids.push_back(new_id);
        }
    }

    fees::pay_fee_to_treasury(e, &allocation.token, fee_total);

    e.events().publish(
        (Symbol::new(e, "certificate_split"), caller),
        (certificate_id, ids.len(), fee_total),
    );
    ids
}

/// Merge `sources` into `destination`. The destination's flows are
/// fee-deducted in place, then each source's fee-deducted flows are appended
/// (never averaged) and the source burned. One treasury transfer at the end.
pub fn merge_certificates(e: &Env, caller: Address, destination: u64, sources: Vec<u64>) {
    caller.require_auth();
    if sources.is_empty() {
        panic!("{}", ERR_NO_SOURCES);
    }
    crate::require_certificate_holder(e, &caller, destination);

    let mut dest = crate::get_allocation(e, destination);
    let cfg = fees::get_config(e);
    let (mut fee_total, post_fee) = fees::apply_rate(e, cfg.merge_bps, &dest.amounts);
    dest.amounts = post_fee;

    let certificate = CertificateClient::new(e, &crate::get_certificate(e));
    for source_id in sources.iter() {
        if source_id == destination {
            panic!("{}", ERR_MERGE_SELF);
        }
        crate::require_certificate_holder(e, &caller, source_id);

        let source = crate::get_allocation(e, source_id);
        if source.token != dest.token {
            panic!("{}", ERR_DIFFERENT_TOKENS);
        }

        let (fee, post_source) = fees::apply_rate(e, cfg.merge_bps, &source.amounts);
        fee_total = fee_total.checked_add(fee).expect(ERR_OVERFLOW);

        for i in 0..post_source.len() {
            dest.amounts.push_back(post_source.get(i).unwrap());
            dest.vesting_periods
                .push_back(source.vesting_periods.get(i).unwrap());
            dest.vesting_starts
                .push_back(source.vesting_starts.get(i).unwrap());
            dest.claimed_seconds
                .push_back(source.claimed_seconds.get(i).unwrap());
            dest.claimed_flows
                .push_back(source.claimed_flows.get(i).unwrap());
        }

        crate::remove_allocation(e, source_id);
        certificate.burn(&source_id);
    }

    crate::put_allocation(e, destination, &dest);
    fees::pay_fee_to_treasury(e, &dest.token, fee_total);

    e.events().publish(
        (Symbol::new(e, "certificates_merged"), caller),
        (destination, sources.len(), fee_total),
    );
}
