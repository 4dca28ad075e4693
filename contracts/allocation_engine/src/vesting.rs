//! Per-second linear vesting accrual.
//!
//! Pure calculation over a single flow; callers are responsible for writing
//! back claimed-seconds and the claimed flag.

use crate::errors::ERR_OVERFLOW;

/// Claimable amount and seconds for one flow at `now`.
///
/// Elapsed time is clamped to the vesting period, so nothing accrues past
/// the declared length. The claimable amount floors
/// `amount * claimable_secs / period`; sub-unit remainders stay with the
/// engine rather than the claimant.
///
/// A zero-length period marks an immediate flow: the whole amount is
/// claimable in one shot and the caller gates repeat claims with the flow's
/// claimed flag.
pub fn accrued(amount: i128, period: u64, start: u64, claimed_secs: u64, now: u64) -> (i128, u64) {
    if period == 0 {
        return (amount, 0);
    }
    let elapsed = now.saturating_sub(start).min(period);
    if elapsed <= claimed_secs {
        return (0, 0);
    }
    let secs = elapsed - claimed_secs;
    let claimable = amount
        .checked_mul(secs as i128)
        .expect(ERR_OVERFLOW)
        / (period as i128);
    (claimable, secs)
}
