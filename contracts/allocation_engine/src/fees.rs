//! Fee policy: flat bid fees plus capped split/merge rates.

use soroban_sdk::{token::TokenClient, Address, Env, Symbol, Vec};

use crate::errors::*;
use crate::types::{DataKey, FeeConfig, MAX_SPLIT_MERGE_BPS};

/// Current fee parameters; everything zero until configured.
pub fn get_config(e: &Env) -> FeeConfig {
    e.storage()
        .instance()
        .get(&DataKey::FeeConfig)
        .unwrap_or(FeeConfig {
            bid_fee: 0,
            bid_update_fee: 0,
            split_bps: 0,
            merge_bps: 0,
        })
}

pub fn set_config(e: &Env, bid_fee: i128, bid_update_fee: i128, split_bps: u32, merge_bps: u32) {
    if bid_fee < 0 || bid_update_fee < 0 {
        panic!("{}", ERR_INVALID_AMOUNT);
    }
    if split_bps > MAX_SPLIT_MERGE_BPS || merge_bps > MAX_SPLIT_MERGE_BPS {
        panic!("{}", ERR_RATE_CAP);
    }
    let cfg = FeeConfig {
        bid_fee,
        bid_update_fee,
        split_bps,
        merge_bps,
    };
    e.storage().instance().set(&DataKey::FeeConfig, &cfg);
    e.events().publish((Symbol::new(e, "fee_config_set"),), cfg);
}

/// Apply a basis-point rate to a list of amounts.
/// Returns `(fee_total, post_fee_amounts)`; each fee floors individually.
pub fn apply_rate(e: &Env, bps: u32, amounts: &Vec<i128>) -> (i128, Vec<i128>) {
    let mut fee_total: i128 = 0;
    let mut post = Vec::new(e);
    for amount in amounts.iter() {
        let fee = amount * (bps as i128) / 10_000_i128;
        fee_total = fee_total.checked_add(fee).expect(ERR_OVERFLOW);
        post.push_back(amount - fee);
    }
    (fee_total, post)
}

/// Pull a flat fee from `payer` straight to the treasury. No-op when zero.
pub fn charge_flat_fee(e: &Env, token: &Address, payer: &Address, fee: i128) {
    if fee > 0 {
        let treasury = crate::get_treasury(e);
        TokenClient::new(e, token).transfer_from(
            &e.current_contract_address(),
            payer,
            &treasury,
            &fee,
        );
    }
}

/// Pay an accumulated rate fee from the engine's inventory to the treasury.
pub fn pay_fee_to_treasury(e: &Env, token: &Address, fee: i128) {
    if fee > 0 {
        let treasury = crate::get_treasury(e);
        TokenClient::new(e, token).transfer(&e.current_contract_address(), &treasury, &fee);
    }
}
