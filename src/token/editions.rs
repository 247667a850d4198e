// EditionStore - Balances per owner per edition id

use crate::types::{Address, EditionId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during token operations
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Zero address: cannot mint or transfer to the zero address")]
    ZeroAddress,

    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: u64, required: u64 },

    #[error("Balance would overflow")]
    BalanceOverflow,

    #[error("Operator {operator} not approved by holder {holder}")]
    NotApproved { holder: Address, operator: Address },
}

/// Balance map: owner -> edition id -> amount
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EditionStore {
    balances: HashMap<Address, HashMap<EditionId, u64>>,
}

impl EditionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Current balance of an owner for an edition
    pub fn balance_of(&self, owner: &Address, edition_id: EditionId) -> u64 {
        self.balances
            .get(owner)
            .and_then(|per_edition| per_edition.get(&edition_id))
            .copied()
            .unwrap_or(0)
    }

    /// Number of owners holding any balance
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Mint new units to an owner
    pub fn mint(&mut self, to: &Address, edition_id: EditionId, amount: u64) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::ZeroAddress);
        }
        let balance = self.balance_of(to, edition_id);
        let updated = balance.checked_add(amount).ok_or(TokenError::BalanceOverflow)?;
        self.balances
            .entry(*to)
            .or_default()
            .insert(edition_id, updated);
        Ok(())
    }

    /// Move units between owners. All checks run before any mutation, so a
    /// failure leaves both balances untouched. Correct when from == to.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        edition_id: EditionId,
        amount: u64,
    ) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::ZeroAddress);
        }

        let from_balance = self.balance_of(from, edition_id);
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance {
                available: from_balance,
                required: amount,
            });
        }

        if from == to {
            return Ok(());
        }

        let to_balance = self.balance_of(to, edition_id);
        let to_updated = to_balance.checked_add(amount).ok_or(TokenError::BalanceOverflow)?;

        self.balances
            .entry(*from)
            .or_default()
            .insert(edition_id, from_balance - amount);
        self.balances
            .entry(*to)
            .or_default()
            .insert(edition_id, to_updated);
        Ok(())
    }
}
