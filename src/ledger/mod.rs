// Ledger module - Supply and replay-protection bookkeeping
// Pure per-edition state; all guard logic lives in the market orchestrator

mod counters;
mod royalty;
mod supply;

pub use counters::UsedCounters;
pub use royalty::{RoyaltyEntry, RoyaltyRegistry, MAX_ROYALTY_BPS};
pub use supply::{EditionLedger, SalePhase, SupplyStats};
