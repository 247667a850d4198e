// Access control - Init-once gate and single-operator guard

use crate::types::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the access-control guards
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Marketplace is not initialized")]
    NotInitialized,

    #[error("Marketplace is already initialized")]
    AlreadyInitialized,

    #[error("Caller {caller} is not the authorized operator")]
    Unauthorized { caller: Address },
}

/// One-time initialization gate. Flips exactly once; a second attempt
/// fails, and everything behind the gate is unreachable until it flips.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InitGate {
    initialized: bool,
}

impl InitGate {
    /// Create an unflipped gate
    pub fn new() -> Self {
        Self { initialized: false }
    }

    /// Whether setup has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Flip the gate. Fails on the second call.
    pub fn mark_initialized(&mut self) -> Result<(), AccessError> {
        if self.initialized {
            return Err(AccessError::AlreadyInitialized);
        }
        self.initialized = true;
        Ok(())
    }

    /// Require that setup has run
    pub fn require_initialized(&self) -> Result<(), AccessError> {
        if !self.initialized {
            return Err(AccessError::NotInitialized);
        }
        Ok(())
    }
}

/// Single-operator guard installed at initialization
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OperatorGate {
    operator: Address,
}

impl OperatorGate {
    /// Install the authorized operator
    pub fn new(operator: Address) -> Self {
        Self { operator }
    }

    /// Get the authorized operator
    pub fn operator(&self) -> &Address {
        &self.operator
    }

    /// Require that the caller is the operator
    pub fn require(&self, caller: &Address) -> Result<(), AccessError> {
        if caller != &self.operator {
            return Err(AccessError::Unauthorized { caller: *caller });
        }
        Ok(())
    }
}
