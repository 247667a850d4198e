// Royalty Registry - Per-edition royalty assignments

use crate::types::{Address, EditionId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum royalty fee, in basis points (100%)
pub const MAX_ROYALTY_BPS: u16 = 10_000;

/// A royalty assignment for an edition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyEntry {
    recipient: Address,
    fee_bps: u16,
}

impl RoyaltyEntry {
    /// Get the royalty recipient
    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    /// Get the fee in basis points
    pub fn fee_bps(&self) -> u16 {
        self.fee_bps
    }
}

/// Per-edition royalty assignments. Later assignments overwrite earlier
/// ones; an edition with no assignment reports no royalty.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoyaltyRegistry {
    entries: HashMap<EditionId, RoyaltyEntry>,
}

impl RoyaltyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Get the royalty assignment for an edition
    pub fn get(&self, edition_id: EditionId) -> Option<&RoyaltyEntry> {
        self.entries.get(&edition_id)
    }

    /// Compute the royalty owed on a sale price:
    /// `sale_price * fee_bps / 10_000`, rounded down
    pub fn royalty_for(&self, edition_id: EditionId, sale_price: u64) -> Option<(Address, u64)> {
        self.entries.get(&edition_id).map(|entry| {
            let amount = (sale_price as u128 * entry.fee_bps as u128 / MAX_ROYALTY_BPS as u128) as u64;
            (entry.recipient, amount)
        })
    }

    /// Record a royalty assignment. The orchestrator validates the
    /// recipient and fee before calling.
    pub(crate) fn set(&mut self, edition_id: EditionId, recipient: Address, fee_bps: u16) {
        self.entries
            .insert(edition_id, RoyaltyEntry { recipient, fee_bps });
    }
}
