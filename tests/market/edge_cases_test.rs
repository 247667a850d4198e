use crate::common::*;
use lazymint::market::{FulfillmentKind, MarketError, PurchaseRequest};

// ============================================================================
// EDGE CASE TESTS
// ============================================================================

/// Test: Selling out returns the edition to the voucher-required phase;
/// a fresh counter then mints a second batch
#[test]
fn test_second_batch_after_sellout() {
    let mut market = initialized_market();

    market
        .purchase(&operator(), &voucher(1, 1, 2), &PurchaseRequest::primary(2, user1()))
        .unwrap();
    assert_eq!(market.supply_left(1).unwrap(), 0);

    let receipt = market
        .purchase(&operator(), &voucher(1, 2, 2), &PurchaseRequest::primary(1, user2()))
        .expect("Fresh counter mints a new batch");

    assert_eq!(receipt.kind, FulfillmentKind::VoucherMint);
    assert_eq!(market.total_supply(1).unwrap(), 4);
    assert_eq!(market.supply_left(1).unwrap(), 1);
}

/// Test: After sellout, reusing the old counter is rejected even for a
/// primary request
#[test]
fn test_stale_counter_after_sellout_rejected() {
    let mut market = initialized_market();

    market
        .purchase(&operator(), &voucher(1, 1, 2), &PurchaseRequest::primary(2, user1()))
        .unwrap();

    let err = market
        .purchase(&operator(), &voucher(1, 1, 2), &PurchaseRequest::primary(1, user2()))
        .expect_err("Stale counter rejected");
    assert_eq!(err.code(), "CU");
}

/// Test: A royalty fee above 10000 basis points is rejected before mutation
#[test]
fn test_royalty_fee_cap() {
    let mut market = initialized_market();
    let request = PurchaseRequest::primary(1, user1()).with_royalty(user2(), 10_001);

    let err = market
        .purchase(&operator(), &voucher(1, 1, 10), &request)
        .expect_err("Should reject fee above cap");

    assert!(matches!(err, MarketError::RoyaltyFeeTooHigh { fee_bps: 10_001 }));
    assert_eq!(market.total_supply(1).unwrap(), 0, "No mint happened");
}

/// Test: A fee of exactly 10000 basis points is allowed
#[test]
fn test_royalty_fee_at_cap_allowed() {
    let mut market = initialized_market();
    let request = PurchaseRequest::primary(1, user1()).with_royalty(user2(), 10_000);

    market
        .purchase(&operator(), &voucher(1, 1, 10), &request)
        .expect("Cap value allowed");

    let (_, amount) = market.royalty_for(1, 500).unwrap().unwrap();
    assert_eq!(amount, 500);
}

/// Test: An oversized fee with a zero recipient is ignored, matching the
/// royalty step being skipped entirely
#[test]
fn test_fee_ignored_without_recipient() {
    let mut market = initialized_market();
    let mut request = PurchaseRequest::primary(1, user1());
    request.fee_bps = u16::MAX;

    market
        .purchase(&operator(), &voucher(1, 1, 10), &request)
        .expect("Fee without recipient is ignored");
}

/// Test: Total minted supply cannot overflow across batches
#[test]
fn test_supply_overflow_rejected() {
    let mut market = initialized_market();

    // First batch mints u64::MAX and sells it all to the redeemer
    market
        .purchase(
            &operator(),
            &voucher(1, 1, u64::MAX),
            &PurchaseRequest::primary(u64::MAX, user1()),
        )
        .unwrap();
    assert_eq!(market.supply_left(1).unwrap(), 0);

    // Any further batch would overflow total_minted
    let err = market
        .purchase(&operator(), &voucher(1, 2, 1), &PurchaseRequest::primary(1, user2()))
        .expect_err("Should reject supply overflow");

    assert!(matches!(err, MarketError::SupplyOverflow));
    assert_eq!(market.total_supply(1).unwrap(), u64::MAX);
}

/// Test: Buying the full edition in one purchase
#[test]
fn test_buy_entire_edition_at_once() {
    let mut market = initialized_market();

    market
        .purchase(&operator(), &voucher(1, 1, 10), &PurchaseRequest::primary(10, user1()))
        .unwrap();

    assert_eq!(market.balance_of(&user1(), 1).unwrap(), 10);
    assert_eq!(market.balance_of(&creator(), 1).unwrap(), 0);
    assert_eq!(market.supply_left(1).unwrap(), 0);
}

/// Test: The creator can redeem to themselves on a voucher mint
#[test]
fn test_creator_as_redeemer() {
    let mut market = initialized_market();

    market
        .purchase(&operator(), &voucher(1, 1, 10), &PurchaseRequest::primary(4, creator()))
        .expect("Self-redeem works");

    assert_eq!(market.balance_of(&creator(), 1).unwrap(), 10);
    assert_eq!(market.supply_left(1).unwrap(), 6);
}

/// Test: Editions are independent - counters and supply do not bleed across ids
#[test]
fn test_editions_independent() {
    let mut market = initialized_market();

    market
        .purchase(&operator(), &voucher(1, 1, 10), &PurchaseRequest::primary(1, user1()))
        .unwrap();
    market
        .purchase(&operator(), &voucher(2, 1, 5), &PurchaseRequest::primary(2, user1()))
        .expect("Counter 1 is fresh for edition 2");

    assert_eq!(market.total_supply(1).unwrap(), 10);
    assert_eq!(market.supply_left(1).unwrap(), 9);
    assert_eq!(market.total_supply(2).unwrap(), 5);
    assert_eq!(market.supply_left(2).unwrap(), 3);
}

/// Test: Direct holder transfer through the marketplace surface
#[test]
fn test_direct_holder_transfer() {
    let mut market = initialized_market();

    market
        .purchase(&operator(), &voucher(1, 1, 10), &PurchaseRequest::primary(2, user1()))
        .unwrap();

    market
        .transfer(&user1(), &user1(), &user2(), 1, 1)
        .expect("Holder moves own units");
    assert_eq!(market.balance_of(&user1(), 1).unwrap(), 1);
    assert_eq!(market.balance_of(&user2(), 1).unwrap(), 1);

    let err = market
        .transfer(&user2(), &user1(), &user2(), 1, 1)
        .expect_err("Stranger cannot move a holder's units");
    assert_eq!(err.code(), "TOKEN");
}
