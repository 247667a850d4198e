use crate::types::{Address, EditionId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Unique identifier for a voucher (SHA256 hash of its canonical bytes).
/// Used for receipts and audit display only; replay protection is keyed
/// by (edition_id, counter), never by this digest.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoucherId([u8; 32]);

impl VoucherId {
    /// Create a VoucherId from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for VoucherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "voucher:{}", hex::encode(&self.0[..8]))
    }
}

/// The voucher - an off-chain-prepared description of an intended sale
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    contract: Address,
    owner: Address,
    edition_id: EditionId,
    counter: u64,
    edition_amount: u64,
    metadata_uri: String,
}

impl Voucher {
    /// Create a new voucher
    pub fn new(
        contract: Address,
        owner: Address,
        edition_id: EditionId,
        counter: u64,
        edition_amount: u64,
        metadata_uri: String,
    ) -> Self {
        Self {
            contract,
            owner,
            edition_id,
            counter,
            edition_amount,
            metadata_uri,
        }
    }

    /// Get the marketplace the voucher is bound to
    pub fn contract(&self) -> &Address {
        &self.contract
    }

    /// Get the edition owner credited with the mint
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Get the edition id
    pub fn edition_id(&self) -> EditionId {
        self.edition_id
    }

    /// Get the one-time-use counter
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Get the total units a single mint of this voucher prints
    pub fn edition_amount(&self) -> u64 {
        self.edition_amount
    }

    /// Get the metadata URI (opaque to the core)
    pub fn metadata_uri(&self) -> &str {
        &self.metadata_uri
    }

    /// Compute the unique ID for this voucher (SHA256 of all fields)
    pub fn id(&self) -> VoucherId {
        let bytes = self.to_canonical_bytes();
        let hash = Sha256::digest(&bytes);
        let mut id = [0u8; 32];
        id.copy_from_slice(&hash);
        VoucherId(id)
    }

    /// Deterministic byte encoding of all fields
    pub fn to_canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        bytes.extend_from_slice(self.contract.as_bytes());
        bytes.extend_from_slice(self.owner.as_bytes());
        bytes.extend_from_slice(&self.edition_id.to_le_bytes());
        bytes.extend_from_slice(&self.counter.to_le_bytes());
        bytes.extend_from_slice(&self.edition_amount.to_le_bytes());
        bytes.extend_from_slice(&(self.metadata_uri.len() as u32).to_le_bytes());
        bytes.extend_from_slice(self.metadata_uri.as_bytes());

        bytes
    }
}
