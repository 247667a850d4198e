// lazymint - Lazy-minting marketplace ledger for multi-edition tokens
//
// A single authorized operator fulfills buyer purchases against off-chain
// vouchers: the first sale of an edition mints its full declared supply,
// later sales draw down the minted stock or transfer already-sold units.

pub mod ledger;
pub mod market;
pub mod service;
pub mod storage;
pub mod token;
pub mod types;
pub mod voucher;
