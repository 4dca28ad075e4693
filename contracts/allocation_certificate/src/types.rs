use soroban_sdk::contracttype;

// ─── Storage keys ──────────────────────────────────────────────────────────

#[contracttype]
pub enum DataKey {
    /// Contract admin address.
    Admin,
    /// The single contract allowed to mint and burn (the allocation engine).
    Operator,
    /// Current holder of a certificate, keyed by id. Absent once burned.
    Owner(u64),
    /// Monotonic mint counter; burns never decrement it.
    TotalMinted,
}
