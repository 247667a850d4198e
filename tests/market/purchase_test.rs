use crate::common::*;
use lazymint::market::{FulfillmentKind, MarketEvent, PurchaseRequest};

// ============================================================================
// PURCHASE TESTS - observed marketplace behavior
// ============================================================================

/// Test: The first purchase mints the voucher's full edition amount
#[test]
fn test_first_purchase_mints_full_edition() {
    let mut market = initialized_market();
    let voucher = voucher(1, 1, 10);

    let receipt = market
        .purchase(&operator(), &voucher, &PurchaseRequest::primary(1, user1()))
        .expect("Should fulfill purchase");

    assert_eq!(receipt.kind, FulfillmentKind::VoucherMint);
    assert_eq!(receipt.amount, 1);
    assert_eq!(receipt.minted, 10);
    assert_eq!(market.total_supply(1).unwrap(), 10);
}

/// Test: The first purchase leaves edition_amount - amount on primary sale
#[test]
fn test_first_purchase_decreases_supply() {
    let mut market = initialized_market();
    let voucher = voucher(1, 1, 10);

    market
        .purchase(&operator(), &voucher, &PurchaseRequest::primary(1, user1()))
        .unwrap();

    assert_eq!(market.supply_left(1).unwrap(), 9);
}

/// Test: The redeemer holds the purchased units, the creator the rest
#[test]
fn test_balances_after_first_purchase() {
    let mut market = initialized_market();
    let voucher = voucher(1, 1, 10);

    market
        .purchase(&operator(), &voucher, &PurchaseRequest::primary(3, user1()))
        .unwrap();

    assert_eq!(market.balance_of(&user1(), 1).unwrap(), 3);
    assert_eq!(market.balance_of(&creator(), 1).unwrap(), 7);
}

/// Test: A follow-up primary sale draws down stock without minting
#[test]
fn test_primary_sale_draws_down_stock() {
    let mut market = initialized_market();
    let voucher = voucher(1, 1, 10);

    market
        .purchase(&operator(), &voucher, &PurchaseRequest::primary(1, user1()))
        .unwrap();
    let receipt = market
        .purchase(&operator(), &voucher, &PurchaseRequest::primary(1, user2()))
        .expect("Should fulfill top-up sale");

    assert_eq!(receipt.kind, FulfillmentKind::PrimarySale);
    assert_eq!(receipt.minted, 0);
    assert_eq!(market.total_supply(1).unwrap(), 10);
    assert_eq!(market.supply_left(1).unwrap(), 8);
    assert_eq!(market.balance_of(&user2(), 1).unwrap(), 1);
}

/// Test: A top-up sale with a fresh counter does not consume it
/// (supply math matches the established-edition path)
#[test]
fn test_topup_with_fresh_counter_is_plain_primary_sale() {
    let mut market = initialized_market();

    market
        .purchase(&operator(), &voucher(1, 1, 10), &PurchaseRequest::primary(5, user1()))
        .unwrap();
    market
        .purchase(&operator(), &voucher(1, 2, 10), &PurchaseRequest::primary(3, user1()))
        .expect("Should fulfill with a second counter");

    assert_eq!(market.total_supply(1).unwrap(), 10);
    assert_eq!(market.supply_left(1).unwrap(), 2);
    assert_eq!(market.balance_of(&user1(), 1).unwrap(), 8);
}

/// Test: Secondary sale transfers already-sold units without touching the ledger
#[test]
fn test_secondary_transfer() {
    let mut market = initialized_market();

    market
        .purchase(&operator(), &voucher(1, 1, 10), &PurchaseRequest::primary(1, user1()))
        .unwrap();

    // user1 lets the marketplace move their balance, then resells to user2
    market
        .set_approval_for_all(&user1(), &market_address(), true)
        .unwrap();
    let resale = voucher_from(user1(), 1, 1, 10);
    let receipt = market
        .purchase(&operator(), &resale, &PurchaseRequest::secondary(1, user2()))
        .expect("Should fulfill secondary sale");

    assert_eq!(receipt.kind, FulfillmentKind::SecondaryTransfer);
    assert_eq!(market.balance_of(&user1(), 1).unwrap(), 0);
    assert_eq!(market.balance_of(&user2(), 1).unwrap(), 1);
    // Ledger untouched by the resale
    assert_eq!(market.total_supply(1).unwrap(), 10);
    assert_eq!(market.supply_left(1).unwrap(), 9);
}

/// Test: Secondary sale without a standing approval fails with the token error
#[test]
fn test_secondary_without_approval_rejected() {
    let mut market = initialized_market();

    market
        .purchase(&operator(), &voucher(1, 1, 10), &PurchaseRequest::primary(1, user1()))
        .unwrap();

    let resale = voucher_from(user1(), 1, 1, 10);
    let result = market.purchase(&operator(), &resale, &PurchaseRequest::secondary(1, user2()));

    let err = result.expect_err("Should reject without approval");
    assert_eq!(err.code(), "TOKEN");
    assert_eq!(market.balance_of(&user1(), 1).unwrap(), 1);
}

/// Test: A zero royalty recipient is silently skipped
#[test]
fn test_zero_royalty_recipient_skipped() {
    let mut market = initialized_market();

    market
        .purchase(&operator(), &voucher(1, 1, 10), &PurchaseRequest::primary(1, user1()))
        .expect("Should fulfill without royalty");

    assert!(market.royalty_for(1, 10_000).unwrap().is_none());
}

/// Test: A non-zero royalty recipient is recorded for the edition
#[test]
fn test_royalty_recorded() {
    let mut market = initialized_market();
    let request = PurchaseRequest::primary(1, user1()).with_royalty(user1(), 250);

    market
        .purchase(&operator(), &voucher(1, 1, 10), &request)
        .unwrap();

    let (recipient, amount) = market.royalty_for(1, 10_000).unwrap().unwrap();
    assert_eq!(recipient, user1());
    assert_eq!(amount, 250);
}

/// Test: Events are queued during purchases and drained by polling
#[test]
fn test_events_queued_and_drained() {
    let mut market = initialized_market();
    let request = PurchaseRequest::primary(1, user1()).with_royalty(user2(), 100);

    market
        .purchase(&operator(), &voucher(1, 1, 10), &request)
        .unwrap();

    let events = market.poll_events();
    assert!(events.iter().any(|e| matches!(
        e,
        MarketEvent::EditionMinted { edition_id: 1, minted: 10, .. }
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        MarketEvent::Purchased { edition_id: 1, amount: 1, kind: FulfillmentKind::VoucherMint, .. }
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        MarketEvent::RoyaltySet { edition_id: 1, fee_bps: 100, .. }
    )));

    assert!(market.poll_events().is_empty(), "Polling drains the queue");
}

/// Test: A voucher mint records the voucher's metadata URI for the edition
#[test]
fn test_metadata_uri_recorded_on_mint() {
    let mut market = initialized_market();
    let voucher = lazymint::voucher::VoucherBuilder::new()
        .contract(market_address())
        .owner(creator())
        .edition_id(1)
        .counter(1)
        .edition_amount(10)
        .metadata_uri("ipfs://edition-1")
        .build()
        .unwrap();

    market
        .purchase(&operator(), &voucher, &PurchaseRequest::primary(1, user1()))
        .unwrap();

    assert_eq!(market.uri(1).unwrap(), "ipfs://edition-1");
    assert_eq!(market.uri(2).unwrap(), "TEST_URI");
}

/// Test: Editions never purchased read zero supply
#[test]
fn test_untouched_edition_reads_zero() {
    let market = initialized_market();
    assert_eq!(market.total_supply(99).unwrap(), 0);
    assert_eq!(market.supply_left(99).unwrap(), 0);
}
