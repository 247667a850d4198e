use crate::types::{Address, EditionId};
use crate::voucher::Voucher;
use rand::Rng;
use thiserror::Error;

/// Errors that can occur when building a voucher
#[derive(Error, Debug)]
pub enum VoucherError {
    #[error("Missing contract: marketplace address is required")]
    MissingContract,

    #[error("Missing owner: edition owner address is required")]
    MissingOwner,

    #[error("Missing edition id")]
    MissingEditionId,

    #[error("Missing edition amount")]
    MissingAmount,

    #[error("Invalid amount: edition amount cannot be zero")]
    ZeroAmount,

    #[error("Invalid owner: edition owner cannot be the zero address")]
    ZeroOwner,

    #[error("Invalid contract: marketplace address cannot be the zero address")]
    ZeroContract,
}

/// Builder for creating vouchers
pub struct VoucherBuilder {
    contract: Option<Address>,
    owner: Option<Address>,
    edition_id: Option<EditionId>,
    counter: Option<u64>,
    edition_amount: Option<u64>,
    metadata_uri: String,
}

impl VoucherBuilder {
    /// Create a new VoucherBuilder
    pub fn new() -> Self {
        Self {
            contract: None,
            owner: None,
            edition_id: None,
            counter: None,
            edition_amount: None,
            metadata_uri: String::new(),
        }
    }

    /// Set the marketplace the voucher is bound to (required)
    pub fn contract(mut self, contract: Address) -> Self {
        self.contract = Some(contract);
        self
    }

    /// Set the edition owner (required)
    pub fn owner(mut self, owner: Address) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Set the edition id (required)
    pub fn edition_id(mut self, edition_id: EditionId) -> Self {
        self.edition_id = Some(edition_id);
        self
    }

    /// Set the one-time counter (optional - auto-generated if not provided)
    pub fn counter(mut self, counter: u64) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Set the total mintable amount (required)
    pub fn edition_amount(mut self, amount: u64) -> Self {
        self.edition_amount = Some(amount);
        self
    }

    /// Set the metadata URI (optional - empty means no edition-specific URI)
    pub fn metadata_uri(mut self, uri: impl Into<String>) -> Self {
        self.metadata_uri = uri.into();
        self
    }

    /// Build the voucher
    pub fn build(self) -> Result<Voucher, VoucherError> {
        // Validate required fields
        let contract = self.contract.ok_or(VoucherError::MissingContract)?;
        let owner = self.owner.ok_or(VoucherError::MissingOwner)?;
        let edition_id = self.edition_id.ok_or(VoucherError::MissingEditionId)?;
        let edition_amount = self.edition_amount.ok_or(VoucherError::MissingAmount)?;

        if contract.is_zero() {
            return Err(VoucherError::ZeroContract);
        }
        if owner.is_zero() {
            return Err(VoucherError::ZeroOwner);
        }
        if edition_amount == 0 {
            return Err(VoucherError::ZeroAmount);
        }

        // Generate a counter if not provided
        let counter = self
            .counter
            .unwrap_or_else(|| rand::thread_rng().gen::<u64>());

        Ok(Voucher::new(
            contract,
            owner,
            edition_id,
            counter,
            edition_amount,
            self.metadata_uri,
        ))
    }
}

impl Default for VoucherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
