// OperatorApprovals - Blanket transfer delegation, holder -> operator

use crate::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Approval-for-all grants. A holder grants an operator the right to move
/// any of the holder's balances; the grant stands until revoked.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OperatorApprovals {
    grants: HashMap<Address, HashSet<Address>>,
}

impl OperatorApprovals {
    /// Create an empty approval set
    pub fn new() -> Self {
        Self {
            grants: HashMap::new(),
        }
    }

    /// Grant or revoke an operator's approval for all of a holder's balances
    pub fn set(&mut self, holder: &Address, operator: &Address, approved: bool) {
        if approved {
            self.grants.entry(*holder).or_default().insert(*operator);
        } else if let Some(operators) = self.grants.get_mut(holder) {
            operators.remove(operator);
        }
    }

    /// Check whether an operator holds a standing grant from a holder
    pub fn is_approved(&self, holder: &Address, operator: &Address) -> bool {
        self.grants
            .get(holder)
            .map(|operators| operators.contains(operator))
            .unwrap_or(false)
    }
}
