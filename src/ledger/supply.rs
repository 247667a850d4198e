// Edition Ledger - Tracks minted supply and primary-sale stock per edition

use crate::types::EditionId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sale phase of an edition, as seen by the purchase orchestrator.
///
/// An edition with no unsold primary units on the books - never minted,
/// or minted and sold out - requires a fresh voucher to stock it again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SalePhase {
    /// No unsold primary units; the next purchase must present a voucher
    Unstocked,
    /// Minted stock remains available for primary sale
    Stocked { supply_left: u64 },
}

/// Per-edition supply bookkeeping
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct SupplyEntry {
    /// Cumulative units ever minted for this edition; never decreases
    total_minted: u64,
    /// Units of the current batch still available for primary sale
    supply_left: u64,
}

/// Statistics about the edition ledger
#[derive(Clone, Debug)]
pub struct SupplyStats {
    /// Number of editions with a ledger entry
    pub tracked_editions: usize,
    /// Sum of total_minted across all editions
    pub total_minted: u64,
    /// Sum of supply_left across all editions
    pub total_supply_left: u64,
}

/// The edition ledger - total minted amount and remaining primary-sale
/// stock, keyed by edition id. Entries are created lazily on first mint
/// and never deleted.
///
/// Mutators are crate-private and trust the orchestrator to have run all
/// guard checks first; no validation happens here.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EditionLedger {
    entries: HashMap<EditionId, SupplyEntry>,
}

impl EditionLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Total units ever minted for an edition (0 when untracked)
    pub fn total_supply(&self, edition_id: EditionId) -> u64 {
        self.entries
            .get(&edition_id)
            .map(|e| e.total_minted)
            .unwrap_or(0)
    }

    /// Units still available for primary sale (0 when untracked)
    pub fn supply_left(&self, edition_id: EditionId) -> u64 {
        self.entries
            .get(&edition_id)
            .map(|e| e.supply_left)
            .unwrap_or(0)
    }

    /// Sale phase of an edition
    pub fn phase(&self, edition_id: EditionId) -> SalePhase {
        match self.supply_left(edition_id) {
            0 => SalePhase::Unstocked,
            supply_left => SalePhase::Stocked { supply_left },
        }
    }

    /// Number of editions tracked
    pub fn edition_count(&self) -> usize {
        self.entries.len()
    }

    /// Get statistics about the ledger
    pub fn stats(&self) -> SupplyStats {
        SupplyStats {
            tracked_editions: self.entries.len(),
            total_minted: self.entries.values().map(|e| e.total_minted).sum(),
            total_supply_left: self.entries.values().map(|e| e.supply_left).sum(),
        }
    }

    /// Record a voucher mint: `minted` new units printed, `sold` of them
    /// delivered immediately. Only called while the edition is unstocked,
    /// so the previous supply_left is always 0.
    pub(crate) fn record_mint(&mut self, edition_id: EditionId, minted: u64, sold: u64) {
        let entry = self.entries.entry(edition_id).or_default();
        entry.total_minted += minted;
        entry.supply_left = minted - sold;
    }

    /// Record a primary sale drawing down the current batch's stock
    pub(crate) fn record_primary_sale(&mut self, edition_id: EditionId, amount: u64) {
        if let Some(entry) = self.entries.get_mut(&edition_id) {
            entry.supply_left -= amount;
        }
    }
}
