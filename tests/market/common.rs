// Shared fixtures for the marketplace test suite

use lazymint::market::Marketplace;
use lazymint::types::{Address, EditionId};
use lazymint::voucher::{Voucher, VoucherBuilder};

pub fn market_address() -> Address {
    Address::from_low_u64(100)
}

pub fn operator() -> Address {
    Address::from_low_u64(1)
}

/// The edition creator credited with mints
pub fn creator() -> Address {
    Address::from_low_u64(2)
}

pub fn user1() -> Address {
    Address::from_low_u64(3)
}

pub fn user2() -> Address {
    Address::from_low_u64(4)
}

pub fn initialized_market() -> Marketplace {
    let mut market = Marketplace::new(market_address());
    market
        .initialize(operator(), "TEST_URI")
        .expect("Should initialize");
    market
}

/// A valid voucher from the creator, bound to the test marketplace
pub fn voucher(edition_id: EditionId, counter: u64, amount: u64) -> Voucher {
    voucher_from(creator(), edition_id, counter, amount)
}

pub fn voucher_from(owner: Address, edition_id: EditionId, counter: u64, amount: u64) -> Voucher {
    VoucherBuilder::new()
        .contract(market_address())
        .owner(owner)
        .edition_id(edition_id)
        .counter(counter)
        .edition_amount(amount)
        .build()
        .expect("Should build valid voucher")
}
