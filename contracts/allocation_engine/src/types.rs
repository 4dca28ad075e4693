use soroban_sdk::{contracttype, Address, BytesN, Vec};

// ─── Limits and units ──────────────────────────────────────────────────────

/// Maximum number of vesting pools per bidding project.
pub const MAX_POOLS: u32 = 10;
/// Split/merge fee rates are capped at 2%.
pub const MAX_SPLIT_MERGE_BPS: u32 = 200;
/// Basis-point denominator.
pub const BPS_DENOMINATOR: u32 = 10_000;
/// Default granularity for requested vesting lengths: 30 days in seconds.
pub const DEFAULT_VESTING_STEP: u64 = 2_592_000;

// ─── Bidding ───────────────────────────────────────────────────────────────

/// A sealed-bid token sale. Winner selection happens off-band; the project
/// only verifies Merkle-authorized settlement against the roots frozen at
/// close time.
#[contracttype]
#[derive(Clone, Debug)]
pub struct BiddingProject {
    /// Token being sold (governs the vesting certificates).
    pub sale_token: Address,
    /// Token bids are denominated in.
    pub payment_token: Address,
    /// Accumulated bid payments, decremented by refunds, swept after the
    /// claim deadline.
    pub payment_balance: i128,
    /// Number of pools created so far (pool ids are 0-based).
    pub pool_count: u32,
    /// Bidding opens at this ledger timestamp.
    pub start_time: u64,
    /// Nominal end of the bidding window. Snapped to the actual close time
    /// when the project is finalized.
    pub end_time: u64,
    /// True once `finalize_bids` has run; roots are frozen from then on
    /// except through the explicit correction path.
    pub closed: bool,
    /// Hash commitment to the planned end time, revealed at close.
    pub end_commitment: BytesN<32>,
    /// Root authorizing refund claims (leaf pool id fixed at 0).
    pub refund_root: BytesN<32>,
    /// Length of the post-close claim window in seconds.
    pub claim_window: u64,
    /// Set at close: `end_time + claim_window`. Zero until closed.
    pub claim_deadline: u64,
    /// Whether `place_bid` consults the whitelist gate.
    pub whitelist_enabled: bool,
}

/// One sub-allocation bucket within a bidding project.
#[contracttype]
#[derive(Clone, Debug)]
pub struct VestingPool {
    /// Root authorizing winning-bid claims for this pool. All-zero until
    /// the project is finalized.
    pub root: BytesN<32>,
    /// Whether losing/rejected bids in this pool also receive a refund.
    pub refunds_losers: bool,
    /// Sale-token allocation pulled in when the pool was created.
    pub total_allocation: i128,
}

/// A single bid. One per address per project; `amount == 0` never occurs in
/// storage and is the sentinel for "no bid".
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bid {
    /// Committed payment amount.
    pub amount: i128,
    /// Requested vesting length in seconds (0 = immediate).
    pub vesting_secs: u64,
}

// ─── Rewards ───────────────────────────────────────────────────────────────

/// A KOL reward-distribution project. All token rewards share one vesting
/// period; stablecoin rewards are paid out directly.
#[contracttype]
#[derive(Clone, Debug)]
pub struct RewardProject {
    /// Token vested through certificates (TVS rewards).
    pub token: Address,
    /// Stablecoin paid out directly.
    pub stablecoin: Address,
    /// Vesting start for every TVS certificate minted from this project.
    pub start_time: u64,
    /// Shared vesting period for every TVS allocation.
    pub vesting_secs: u64,
    /// `start_time + claim window`; individual claims stop and owner-driven
    /// distribution starts here.
    pub claim_deadline: u64,
}

// ─── Allocations ───────────────────────────────────────────────────────────

/// Provenance of a certificate's allocation: which project map owns it.
/// Resolved once per operation to pick the governing project record.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CertificateSource {
    Bidding(u64),
    Reward(u64),
}

/// Per-certificate vesting state: five same-length parallel sequences, one
/// entry per independent flow.
#[contracttype]
#[derive(Clone, Debug)]
pub struct Allocation {
    /// Principal of each flow.
    pub amounts: Vec<i128>,
    /// Vesting period of each flow in seconds (0 = immediate).
    pub vesting_periods: Vec<u64>,
    /// Wall-clock vesting start of each flow.
    pub vesting_starts: Vec<u64>,
    /// Seconds of each flow already claimed; never exceeds the period.
    pub claimed_seconds: Vec<u64>,
    /// True once a flow's claimed seconds reach its period (or an immediate
    /// flow has been paid out).
    pub claimed_flows: Vec<bool>,
    /// True iff every flow is claimed; the only trigger for burning the
    /// certificate.
    pub is_claimed: bool,
    /// Token the flows pay out in.
    pub token: Address,
    /// Pool the allocation was won from; meaningful for bidding-sourced
    /// certificates only.
    pub pool_id: u32,
    /// Owning project, tagged by subsystem.
    pub source: CertificateSource,
}

// ─── Fee policy ────────────────────────────────────────────────────────────

/// Four fee parameters. Flat fees are absolute payment-token amounts; rates
/// are basis points capped at [`MAX_SPLIT_MERGE_BPS`].
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeConfig {
    /// Flat fee charged on `place_bid`.
    pub bid_fee: i128,
    /// Flat fee charged on `update_bid`.
    pub bid_update_fee: i128,
    /// Split rate in basis points.
    pub split_bps: u32,
    /// Merge rate in basis points.
    pub merge_bps: u32,
}

// ─── Storage keys ──────────────────────────────────────────────────────────

#[contracttype]
pub enum DataKey {
    /// Contract admin address.
    Admin,
    /// Treasury receiving fees and swept profits.
    Treasury,
    /// Address of the allocation_certificate contract.
    Certificate,
    /// Fee parameters (FeeConfig).
    FeeConfig,
    /// Granularity for requested vesting lengths; defaults to 30 days.
    VestingStep,
    /// Number of bidding projects launched.
    BiddingCount,
    /// Bidding project record by id.
    Bidding(u64),
    /// Vesting pool by (project id, pool id).
    Pool(u64, u32),
    /// Bid book entry by (project id, bidder).
    Bid(u64, Address),
    /// Whitelist membership by (project id, address).
    Whitelisted(u64, Address),
    /// Number of reward projects launched.
    RewardCount,
    /// Reward project record by id.
    Reward(u64),
    /// Pending TVS claimants for a reward project.
    TvsPending(u64),
    /// Position of an address inside the TVS pending list.
    TvsIndex(u64, Address),
    /// TVS amount owed to an address.
    TvsOwed(u64, Address),
    /// Pending stablecoin claimants for a reward project.
    StablePending(u64),
    /// Position of an address inside the stablecoin pending list.
    StableIndex(u64, Address),
    /// Stablecoin amount owed to an address.
    StableOwed(u64, Address),
    /// Refund leaves already claimed (global set).
    RefundLeafClaimed(BytesN<32>),
    /// Winning-bid leaves already claimed (global set, tracked separately
    /// from refunds).
    PoolLeafClaimed(BytesN<32>),
    /// Allocation payload by certificate id.
    Allocation(u64),
}
