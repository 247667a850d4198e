// Capability introspection - Static supported-interface reporting

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 4-byte capability identifier, matched exactly against the fixed set
/// the marketplace supports. Answers are static and available before
/// initialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceId(u32);

impl InterfaceId {
    /// Capability discovery itself
    pub const DISCOVERY: InterfaceId = InterfaceId(0x01ff_c9a7);
    /// Multi-edition balances and transfers
    pub const MULTI_EDITION: InterfaceId = InterfaceId(0xd9b6_7a26);
    /// Royalty reporting
    pub const ROYALTY: InterfaceId = InterfaceId(0x2a55_205a);

    /// Create from a raw id
    pub fn from_u32(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Whether the marketplace supports this capability
    pub fn is_supported(&self) -> bool {
        matches!(*self, Self::DISCOVERY | Self::MULTI_EDITION | Self::ROYALTY)
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
