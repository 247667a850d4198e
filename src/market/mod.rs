// Market module - THE PURCHASE ORCHESTRATOR
// Validates vouchers and purchase parameters, decides mint-vs-transfer,
// and drives the token primitive

mod access;
mod interface;
mod marketplace;

pub use access::{AccessError, InitGate, OperatorGate};
pub use interface::InterfaceId;
pub use marketplace::{
    FulfillmentKind, MarketError, MarketEvent, Marketplace, PurchaseReceipt, PurchaseRequest,
};
