// Types module - Shared primitive types
// Account addresses and edition identifiers used across the crate

mod address;

pub use address::{Address, AddressError};

/// Identifier of an edition (a fungible-per-id token class)
pub type EditionId = u64;
