// Voucher module - The off-chain sale permit
// A voucher authorizes one fresh mint of an edition's supply

mod builder;
mod codec;
mod model;

pub use builder::*;
pub use codec::*;
pub use model::*;
