// Token module - THE OWNERSHIP PRIMITIVE
// Balances per owner per edition id, transfer mechanics, approval-for-all
// delegation, and per-edition metadata URIs

mod approvals;
mod editions;
mod metadata;
mod store;

pub use approvals::OperatorApprovals;
pub use editions::{EditionStore, TokenError};
pub use metadata::MetadataStore;
pub use store::TokenLedger;
