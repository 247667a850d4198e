// Voucher Replay Guard - Consumed one-time counters, per edition

use crate::types::EditionId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Append-only record of consumed voucher counters.
///
/// A given (edition_id, counter) pair is accepted by the orchestrator at
/// most once, ever; entries are never removed. Membership test and insert
/// are O(1).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UsedCounters {
    used: HashMap<EditionId, HashSet<u64>>,
}

impl UsedCounters {
    /// Create an empty guard
    pub fn new() -> Self {
        Self {
            used: HashMap::new(),
        }
    }

    /// Check whether a counter has been consumed for an edition
    pub fn is_used(&self, edition_id: EditionId, counter: u64) -> bool {
        self.used
            .get(&edition_id)
            .map(|set| set.contains(&counter))
            .unwrap_or(false)
    }

    /// Number of counters consumed for an edition
    pub fn used_count(&self, edition_id: EditionId) -> usize {
        self.used.get(&edition_id).map(|set| set.len()).unwrap_or(0)
    }

    /// Mark a counter consumed. Returns false if it was already consumed;
    /// the orchestrator checks `is_used` first, so a false return is a
    /// signal of a caller bug, not a recoverable condition.
    pub(crate) fn mark_used(&mut self, edition_id: EditionId, counter: u64) -> bool {
        self.used.entry(edition_id).or_default().insert(counter)
    }
}
