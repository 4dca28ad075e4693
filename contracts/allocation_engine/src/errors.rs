/// All panic messages used by the allocation_engine contract.
///
/// Using string constants avoids typos in `#[should_panic(expected = "...")]` tests.

// ── Setup / authorization ──────────────────────────────────────────────────
pub const ERR_ALREADY_INITIALIZED: &str = "already initialized";
pub const ERR_NOT_INITIALIZED: &str = "not initialized";
pub const ERR_UNAUTHORIZED: &str = "unauthorized";

// ── Validation ─────────────────────────────────────────────────────────────
pub const ERR_INVALID_AMOUNT: &str = "amount must be positive";
pub const ERR_INVALID_WINDOW: &str = "start time must be before end time";
pub const ERR_INVALID_CLAIM_WINDOW: &str = "claim window must be positive";
pub const ERR_INVALID_VESTING_STEP: &str = "vesting step must be positive";
pub const ERR_VESTING_STEP: &str = "vesting length must be 0, 1, or a multiple of the vesting step";
pub const ERR_POOL_LIMIT: &str = "pool limit reached";
pub const ERR_RATE_CAP: &str = "fee rate exceeds the 2% cap";
pub const ERR_LENGTH_MISMATCH: &str = "address and amount lists differ in length";
pub const ERR_EMPTY_BATCH: &str = "empty address list";
pub const ERR_DUPLICATE_ADDRESS: &str = "duplicate address in allocation list";
pub const ERR_PERCENTAGES_SUM: &str = "percentages do not add up to 10000";
pub const ERR_PERCENTAGE_ZERO: &str = "percentage entries must be positive";
pub const ERR_OVERFLOW: &str = "arithmetic overflow";

// ── State / timing ─────────────────────────────────────────────────────────
pub const ERR_PROJECT_NOT_FOUND: &str = "project not found";
pub const ERR_POOL_NOT_FOUND: &str = "pool not found";
pub const ERR_BIDDING_NOT_OPEN: &str = "bidding is not open";
pub const ERR_BIDDING_CLOSED: &str = "bidding already closed";
pub const ERR_BIDDING_NOT_CLOSED: &str = "bidding not closed yet";
pub const ERR_ROOT_COUNT: &str = "exactly one root required per pool";
pub const ERR_CLAIM_DEADLINE_PASSED: &str = "claim deadline has passed";
pub const ERR_CLAIM_DEADLINE_NOT_PASSED: &str = "claim deadline has not passed yet";
pub const ERR_ALLOCATION_SET: &str = "allocation list already set";

// ── Proof ──────────────────────────────────────────────────────────────────
pub const ERR_INVALID_PROOF: &str = "merkle proof verification failed";
pub const ERR_LEAF_CLAIMED: &str = "leaf already claimed";
pub const ERR_COMMITMENT_MISMATCH: &str = "end-time commitment mismatch";

// ── Accounting ─────────────────────────────────────────────────────────────
pub const ERR_NO_BID: &str = "no bid found";
pub const ERR_BID_EXISTS: &str = "bid already placed; use update_bid";
pub const ERR_BID_DECREASE: &str = "bid amount and vesting length may only increase";
pub const ERR_NOT_WHITELISTED: &str = "caller is not whitelisted for this project";
pub const ERR_INSUFFICIENT_BALANCE: &str = "insufficient project payment balance";
pub const ERR_NOTHING_TO_SWEEP: &str = "no profit to withdraw";
pub const ERR_AMOUNTS_SUM: &str = "amounts do not add up to the declared total";
pub const ERR_NOTHING_TO_CLAIM: &str = "no allocation to claim";
pub const ERR_NO_CLAIMABLE: &str = "no claimable tokens";
pub const ERR_ALLOCATION_NOT_FOUND: &str = "no allocation found for certificate";
pub const ERR_NOT_CERTIFICATE_HOLDER: &str = "caller does not hold the certificate";
pub const ERR_DIFFERENT_TOKENS: &str = "certificates have different tokens";
pub const ERR_NO_SOURCES: &str = "at least one source certificate required";
pub const ERR_MERGE_SELF: &str = "cannot merge a certificate into itself";
