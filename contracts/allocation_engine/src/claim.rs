//! Certificate claim orchestration.
//!
//! Runs accrual over every unclaimed flow, writes the flow states and the
//! overall claimed flag back, burns the certificate when the last flow
//! completes, and pays the accumulated total in a single transfer.

use soroban_sdk::{token::TokenClient, Address, Env, Symbol};

use crate::certificate::CertificateClient;
use crate::errors::*;
use crate::vesting;

pub fn claim_tokens(e: &Env, caller: Address, certificate_id: u64) -> i128 {
    caller.require_auth();
    crate::require_certificate_holder(e, &caller, certificate_id);

    let mut allocation = crate::get_allocation(e, certificate_id);
    let now = e.ledger().timestamp();

    let mut total: i128 = 0;
    let mut all_claimed = true;
    for i in 0..allocation.amounts.len() {
        if allocation.claimed_flows.get(i).unwrap() {
            continue;
        }
        let amount = allocation.amounts.get(i).unwrap();
        let period = allocation.vesting_periods.get(i).unwrap();
        let start = allocation.vesting_starts.get(i).unwrap();
        let claimed_secs = allocation.claimed_seconds.get(i).unwrap();

        let (claimable, secs) = vesting::accrued(amount, period, start, claimed_secs, now);
        if claimable == 0 && secs == 0 {
            // No time elapsed on this flow since the last claim.
            all_claimed = false;
            continue;
        }
        // Elapsed seconds are consumed even when floor rounding pays out
        // nothing, so a flow whose remainder is worth less than one unit
        // still completes once its period has fully elapsed.
        total = total.checked_add(claimable).expect(ERR_OVERFLOW);
        let new_claimed = claimed_secs + secs;
        allocation.claimed_seconds.set(i, new_claimed);
        if period == 0 || new_claimed >= period {
            allocation.claimed_flows.set(i, true);
        } else {
            all_claimed = false;
        }
    }

    if total == 0 {
        panic!("{}", ERR_NO_CLAIMABLE);
    }

    if all_claimed {
        allocation.is_claimed = true;
        CertificateClient::new(e, &crate::get_certificate(e)).burn(&certificate_id);
    }
    // CEI: allocation state committed before the payout transfer.
    crate::put_allocation(e, certificate_id, &allocation);

    TokenClient::new(e, &allocation.token).transfer(
        &e.current_contract_address(),
        &caller,
        &total,
    );

    e.events().publish(
        (Symbol::new(e, "tokens_claimed"), caller),
        (certificate_id, total, allocation.is_claimed),
    );
    total
}
