//! Per-project whitelist gate, consulted only by bid placement.

use soroban_sdk::{Address, Env, Symbol, Vec};

use crate::types::DataKey;

pub fn add(e: &Env, project_id: u64, addresses: &Vec<Address>) {
    for address in addresses.iter() {
        e.storage()
            .persistent()
            .set(&DataKey::Whitelisted(project_id, address), &true);
    }
    e.events().publish(
        (Symbol::new(e, "whitelist_added"), project_id),
        addresses.len(),
    );
}

pub fn remove(e: &Env, project_id: u64, addresses: &Vec<Address>) {
    for address in addresses.iter() {
        e.storage()
            .persistent()
            .remove(&DataKey::Whitelisted(project_id, address));
    }
    e.events().publish(
        (Symbol::new(e, "whitelist_removed"), project_id),
        addresses.len(),
    );
}

pub fn is_whitelisted(e: &Env, project_id: u64, address: &Address) -> bool {
    e.storage()
        .persistent()
        .get(&DataKey::Whitelisted(project_id, address.clone()))
        .unwrap_or(false)
}
