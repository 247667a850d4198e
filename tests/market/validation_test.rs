use crate::common::*;
use lazymint::market::{MarketError, PurchaseRequest};
use lazymint::types::Address;
use lazymint::voucher::Voucher;

// ============================================================================
// VALIDATION TESTS - the nine stable error codes, in evaluation order
// ============================================================================

fn raw_voucher(contract: Address, owner: Address, amount: u64) -> Voucher {
    Voucher::new(contract, owner, 1, 1, amount, String::new())
}

/// Test: NOACZ - voucher owner is the zero address
#[test]
fn test_noacz_owner_zero() {
    let mut market = initialized_market();
    let voucher = raw_voucher(market_address(), Address::ZERO, 10);

    let err = market
        .purchase(&operator(), &voucher, &PurchaseRequest::primary(1, user1()))
        .expect_err("Should reject zero owner");

    assert_eq!(err.code(), "NOACZ");
    assert!(matches!(err, MarketError::OwnerAddressZero));
}

/// Test: NACZ - voucher contract is the zero address
#[test]
fn test_nacz_contract_zero() {
    let mut market = initialized_market();
    let voucher = raw_voucher(Address::ZERO, creator(), 10);

    let err = market
        .purchase(&operator(), &voucher, &PurchaseRequest::primary(1, user1()))
        .expect_err("Should reject zero contract");

    assert_eq!(err.code(), "NACZ");
}

/// Test: INA - voucher bound to a different marketplace instance
#[test]
fn test_ina_foreign_voucher() {
    let mut market = initialized_market();
    let voucher = raw_voucher(Address::from_low_u64(999), creator(), 10);

    let err = market
        .purchase(&operator(), &voucher, &PurchaseRequest::primary(1, user1()))
        .expect_err("Should reject foreign voucher");

    assert_eq!(err.code(), "INA");
}

/// Test: RACZ - redeemer is the zero address
#[test]
fn test_racz_redeemer_zero() {
    let mut market = initialized_market();

    let err = market
        .purchase(
            &operator(),
            &voucher(1, 1, 10),
            &PurchaseRequest::primary(1, Address::ZERO),
        )
        .expect_err("Should reject zero redeemer");

    assert_eq!(err.code(), "RACZ");
}

/// Test: AGZ - voucher edition amount is zero
#[test]
fn test_agz_edition_amount_zero() {
    let mut market = initialized_market();
    let voucher = raw_voucher(market_address(), creator(), 0);

    let err = market
        .purchase(&operator(), &voucher, &PurchaseRequest::primary(1, user1()))
        .expect_err("Should reject zero edition amount");

    assert_eq!(err.code(), "AGZ");
}

/// Test: ATSGZ - requested amount is zero
#[test]
fn test_atsgz_requested_amount_zero() {
    let mut market = initialized_market();

    let err = market
        .purchase(&operator(), &voucher(1, 1, 10), &PurchaseRequest::primary(0, user1()))
        .expect_err("Should reject zero request");

    assert_eq!(err.code(), "ATSGZ");
}

/// Test: TSGAB - first mint request exceeds the edition amount
#[test]
fn test_tsgab_exceeds_edition_amount() {
    let mut market = initialized_market();

    let err = market
        .purchase(&operator(), &voucher(1, 1, 10), &PurchaseRequest::primary(11, user1()))
        .expect_err("Should reject oversized first purchase");

    assert_eq!(err.code(), "TSGAB");
    assert_eq!(market.total_supply(1).unwrap(), 0, "No mint happened");
}

/// Test: CU - consumed counter rejected on a fresh mint attempt
#[test]
fn test_cu_counter_already_used() {
    let mut market = initialized_market();

    // Sell out a one-unit edition, returning it to the unstocked phase
    market
        .purchase(&operator(), &voucher(1, 1, 1), &PurchaseRequest::primary(1, user1()))
        .unwrap();
    market
        .set_approval_for_all(&user1(), &market_address(), true)
        .unwrap();

    // Same counter again: the mint branch runs and hits the replay guard
    let resale = voucher_from(user1(), 1, 1, 1);
    let err = market
        .purchase(&operator(), &resale, &PurchaseRequest::secondary(1, user2()))
        .expect_err("Should reject consumed counter");

    assert_eq!(err.code(), "CU");
    assert!(matches!(
        err,
        MarketError::CounterUsed { edition_id: 1, counter: 1 }
    ));
}

/// Test: ANL - request exceeds remaining supply on an established edition
#[test]
fn test_anl_exceeds_remaining_supply() {
    let mut market = initialized_market();

    market
        .purchase(&operator(), &voucher(1, 1, 10), &PurchaseRequest::primary(2, user1()))
        .unwrap();

    let err = market
        .purchase(&operator(), &voucher(1, 1, 10), &PurchaseRequest::primary(9, user1()))
        .expect_err("Should reject oversell");

    assert_eq!(err.code(), "ANL");
    assert!(matches!(
        err,
        MarketError::ExceedsRemainingSupply { requested: 9, available: 8 }
    ));
}

/// Test: The checks short-circuit in order - an all-invalid voucher
/// reports the earliest failure
#[test]
fn test_check_precedence() {
    let mut market = initialized_market();

    // Zero owner AND zero contract AND zero amounts: NOACZ wins
    let voucher = Voucher::new(Address::ZERO, Address::ZERO, 1, 1, 0, String::new());
    let err = market
        .purchase(&operator(), &voucher, &PurchaseRequest::primary(0, Address::ZERO))
        .unwrap_err();
    assert_eq!(err.code(), "NOACZ");

    // Fix the owner: NACZ is next
    let voucher = Voucher::new(Address::ZERO, creator(), 1, 1, 0, String::new());
    let err = market
        .purchase(&operator(), &voucher, &PurchaseRequest::primary(0, Address::ZERO))
        .unwrap_err();
    assert_eq!(err.code(), "NACZ");

    // Fix the contract to a foreign address: INA is next
    let voucher = Voucher::new(Address::from_low_u64(999), creator(), 1, 1, 0, String::new());
    let err = market
        .purchase(&operator(), &voucher, &PurchaseRequest::primary(0, Address::ZERO))
        .unwrap_err();
    assert_eq!(err.code(), "INA");

    // Bind to this marketplace: RACZ is next
    let voucher = Voucher::new(market_address(), creator(), 1, 1, 0, String::new());
    let err = market
        .purchase(&operator(), &voucher, &PurchaseRequest::primary(0, Address::ZERO))
        .unwrap_err();
    assert_eq!(err.code(), "RACZ");

    // Fix the redeemer: AGZ is next
    let err = market
        .purchase(&operator(), &voucher, &PurchaseRequest::primary(0, user1()))
        .unwrap_err();
    assert_eq!(err.code(), "AGZ");

    // Fix the edition amount: ATSGZ is next
    let voucher = Voucher::new(market_address(), creator(), 1, 1, 10, String::new());
    let err = market
        .purchase(&operator(), &voucher, &PurchaseRequest::primary(0, user1()))
        .unwrap_err();
    assert_eq!(err.code(), "ATSGZ");
}

/// Test: Failed validation leaves all state unchanged
#[test]
fn test_failure_leaves_state_unchanged() {
    let mut market = initialized_market();

    market
        .purchase(&operator(), &voucher(1, 1, 10), &PurchaseRequest::primary(2, user1()))
        .unwrap();
    market.poll_events();

    let err = market
        .purchase(&operator(), &voucher(1, 1, 10), &PurchaseRequest::primary(9, user2()))
        .unwrap_err();
    assert_eq!(err.code(), "ANL");

    assert_eq!(market.total_supply(1).unwrap(), 10);
    assert_eq!(market.supply_left(1).unwrap(), 8);
    assert_eq!(market.balance_of(&user2(), 1).unwrap(), 0);
    assert!(market.poll_events().is_empty(), "No events from a failed purchase");
}
