// TokenLedger - The composed ownership/transfer primitive
//
// Balances, approval-for-all delegation, and metadata behind one surface.
// The market orchestrator calls into this only after its guard checks pass.

use crate::token::{EditionStore, MetadataStore, OperatorApprovals, TokenError};
use crate::types::{Address, EditionId};
use serde::{Deserialize, Serialize};

/// The multi-edition token primitive: balances per owner per edition id,
/// mint and transfer mechanics, delegated transfer approval, and edition
/// metadata URIs.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TokenLedger {
    editions: EditionStore,
    approvals: OperatorApprovals,
    metadata: MetadataStore,
}

impl TokenLedger {
    /// Create an empty ledger with a base metadata URI
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            editions: EditionStore::new(),
            approvals: OperatorApprovals::new(),
            metadata: MetadataStore::new(base_uri),
        }
    }

    /// Current balance of an owner for an edition
    pub fn balance_of(&self, owner: &Address, edition_id: EditionId) -> u64 {
        self.editions.balance_of(owner, edition_id)
    }

    /// Mint new units to an owner
    pub fn mint(&mut self, to: &Address, edition_id: EditionId, amount: u64) -> Result<(), TokenError> {
        self.editions.mint(to, edition_id, amount)
    }

    /// System transfer: moves units without an approval check. Reserved
    /// for the orchestrator's mint-then-deliver and primary-sale paths.
    pub(crate) fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        edition_id: EditionId,
        amount: u64,
    ) -> Result<(), TokenError> {
        self.editions.transfer(from, to, edition_id, amount)
    }

    /// Approval-checked transfer: the operator must be the holder or hold
    /// a standing approval-for-all grant from the holder
    pub fn transfer_from(
        &mut self,
        operator: &Address,
        from: &Address,
        to: &Address,
        edition_id: EditionId,
        amount: u64,
    ) -> Result<(), TokenError> {
        if operator != from && !self.approvals.is_approved(from, operator) {
            return Err(TokenError::NotApproved {
                holder: *from,
                operator: *operator,
            });
        }
        self.editions.transfer(from, to, edition_id, amount)
    }

    /// Grant or revoke blanket transfer approval
    pub fn set_approval_for_all(&mut self, holder: &Address, operator: &Address, approved: bool) {
        self.approvals.set(holder, operator, approved);
    }

    /// Check a standing approval-for-all grant
    pub fn is_approved_for_all(&self, holder: &Address, operator: &Address) -> bool {
        self.approvals.is_approved(holder, operator)
    }

    /// Get the URI for an edition, falling back to the base URI
    pub fn uri(&self, edition_id: EditionId) -> &str {
        self.metadata.uri(edition_id)
    }

    /// Get the base metadata URI
    pub fn base_uri(&self) -> &str {
        self.metadata.base_uri()
    }

    pub(crate) fn set_uri(&mut self, edition_id: EditionId, uri: impl Into<String>) {
        self.metadata.set_uri(edition_id, uri);
    }
}
