// Marketplace - The purchase orchestrator
//
// Single entry point for voucher-backed purchases. Validates the voucher
// and purchase parameters against the supply ledger and replay guard,
// decides mint-vs-transfer, drives the token primitive, and records
// royalty assignments. All checks run before any mutation, so a failed
// purchase leaves every ledger untouched.

use crate::ledger::{EditionLedger, RoyaltyRegistry, SalePhase, SupplyStats, UsedCounters, MAX_ROYALTY_BPS};
use crate::market::access::{AccessError, InitGate, OperatorGate};
use crate::market::interface::InterfaceId;
use crate::token::{TokenError, TokenLedger};
use crate::types::{Address, EditionId};
use crate::voucher::{Voucher, VoucherId};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors from marketplace operations.
///
/// The nine purchase validation failures carry stable short codes
/// (`NOACZ` .. `ANL`) in evaluation order; `code()` returns the
/// identifier and each Display message leads with it.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("NOACZ: voucher owner address is zero")]
    OwnerAddressZero,

    #[error("NACZ: voucher contract address is zero")]
    ContractAddressZero,

    #[error("INA: voucher is bound to {voucher_contract}, not this marketplace {marketplace}")]
    ForeignVoucher {
        voucher_contract: Address,
        marketplace: Address,
    },

    #[error("RACZ: redeemer address is zero")]
    RedeemerAddressZero,

    #[error("AGZ: edition amount must be greater than zero")]
    EditionAmountZero,

    #[error("ATSGZ: requested amount must be greater than zero")]
    RequestedAmountZero,

    #[error("TSGAB: requested amount {requested} exceeds edition amount {edition_amount}")]
    ExceedsEditionAmount { requested: u64, edition_amount: u64 },

    #[error("CU: counter {counter} already used for edition {edition_id}")]
    CounterUsed { edition_id: EditionId, counter: u64 },

    #[error("ANL: requested amount {requested} exceeds remaining supply {available}")]
    ExceedsRemainingSupply { requested: u64, available: u64 },

    #[error("Royalty fee {fee_bps} exceeds 10000 basis points")]
    RoyaltyFeeTooHigh { fee_bps: u16 },

    #[error("Total minted supply would overflow")]
    SupplyOverflow,

    #[error("Token operation failed: {0}")]
    Token(#[from] TokenError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Failed to decode marketplace snapshot")]
    DeserializationFailed,
}

impl MarketError {
    /// Stable identifier for this error
    pub fn code(&self) -> &'static str {
        match self {
            MarketError::OwnerAddressZero => "NOACZ",
            MarketError::ContractAddressZero => "NACZ",
            MarketError::ForeignVoucher { .. } => "INA",
            MarketError::RedeemerAddressZero => "RACZ",
            MarketError::EditionAmountZero => "AGZ",
            MarketError::RequestedAmountZero => "ATSGZ",
            MarketError::ExceedsEditionAmount { .. } => "TSGAB",
            MarketError::CounterUsed { .. } => "CU",
            MarketError::ExceedsRemainingSupply { .. } => "ANL",
            MarketError::RoyaltyFeeTooHigh { .. } => "ROYALTY_BPS",
            MarketError::SupplyOverflow => "SUPPLY_OVERFLOW",
            MarketError::Token(_) => "TOKEN",
            MarketError::Access(AccessError::NotInitialized) => "NOT_INIT",
            MarketError::Access(AccessError::AlreadyInitialized) => "ALREADY_INIT",
            MarketError::Access(AccessError::Unauthorized { .. }) => "UNAUTHORIZED",
            MarketError::DeserializationFailed => "DECODE",
        }
    }
}

/// Parameters of a purchase, alongside the voucher
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PurchaseRequest {
    /// Units the redeemer is buying
    pub amount: u64,
    /// Royalty fee in basis points; only meaningful with a non-zero recipient
    pub fee_bps: u16,
    /// Royalty recipient; the zero address skips royalty assignment
    pub royalty_recipient: Address,
    /// Account receiving the purchased units
    pub redeemer: Address,
    /// Primary sale (draw down minted stock) vs secondary transfer
    pub primary: bool,
}

impl PurchaseRequest {
    /// A primary-sale request with no royalty assignment
    pub fn primary(amount: u64, redeemer: Address) -> Self {
        Self {
            amount,
            fee_bps: 0,
            royalty_recipient: Address::ZERO,
            redeemer,
            primary: true,
        }
    }

    /// A secondary-sale request with no royalty assignment
    pub fn secondary(amount: u64, redeemer: Address) -> Self {
        Self {
            amount,
            fee_bps: 0,
            royalty_recipient: Address::ZERO,
            redeemer,
            primary: false,
        }
    }

    /// Attach a royalty assignment
    pub fn with_royalty(mut self, recipient: Address, fee_bps: u16) -> Self {
        self.royalty_recipient = recipient;
        self.fee_bps = fee_bps;
        self
    }
}

/// How a purchase was fulfilled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FulfillmentKind {
    /// First touch of an unstocked edition: the voucher's full amount was minted
    VoucherMint,
    /// Units drawn from an established edition's minted stock
    PrimarySale,
    /// Already-sold units moved between holders
    SecondaryTransfer,
}

/// Record of a fulfilled purchase
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub edition_id: EditionId,
    pub voucher_id: VoucherId,
    pub kind: FulfillmentKind,
    /// Units delivered to the redeemer
    pub amount: u64,
    /// Units freshly minted (0 unless kind is VoucherMint)
    pub minted: u64,
    pub owner: Address,
    pub redeemer: Address,
    /// Unix timestamp of fulfillment
    pub timestamp: u64,
}

/// Events emitted by marketplace mutations, drained with `poll_events`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarketEvent {
    EditionMinted {
        edition_id: EditionId,
        owner: Address,
        minted: u64,
        voucher_id: VoucherId,
    },
    Purchased {
        edition_id: EditionId,
        redeemer: Address,
        amount: u64,
        kind: FulfillmentKind,
    },
    RoyaltySet {
        edition_id: EditionId,
        recipient: Address,
        fee_bps: u16,
    },
    ApprovalForAll {
        holder: Address,
        operator: Address,
        approved: bool,
    },
}

/// The lazy-minting marketplace: purchase orchestrator plus the ledgers
/// and token primitive it drives.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Marketplace {
    /// This instance's own identity; vouchers must be bound to it
    address: Address,
    init: InitGate,
    operator: Option<OperatorGate>,
    tokens: TokenLedger,
    supply: EditionLedger,
    counters: UsedCounters,
    royalties: RoyaltyRegistry,
    #[serde(skip)]
    events: Vec<MarketEvent>,
}

impl Marketplace {
    /// Create an uninitialized marketplace with the given identity
    pub fn new(address: Address) -> Self {
        Self {
            address,
            init: InitGate::new(),
            operator: None,
            tokens: TokenLedger::new(""),
            supply: EditionLedger::new(),
            counters: UsedCounters::new(),
            royalties: RoyaltyRegistry::new(),
            events: Vec::new(),
        }
    }

    /// One-time setup: installs the operator and the base metadata URI.
    /// Only the first call succeeds.
    pub fn initialize(
        &mut self,
        operator: Address,
        base_uri: impl Into<String>,
    ) -> Result<(), MarketError> {
        self.init.mark_initialized()?;
        self.operator = Some(OperatorGate::new(operator));
        self.tokens = TokenLedger::new(base_uri);
        Ok(())
    }

    /// This marketplace's identity
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The authorized operator, once initialized
    pub fn operator(&self) -> Option<&Address> {
        self.operator.as_ref().map(|gate| gate.operator())
    }

    /// Whether setup has run
    pub fn is_initialized(&self) -> bool {
        self.init.is_initialized()
    }

    /// Capability introspection; available before initialization
    pub fn supports_interface(&self, interface_id: InterfaceId) -> bool {
        interface_id.is_supported()
    }

    // ========================================================================
    // PURCHASE
    // ========================================================================

    /// Fulfill a purchase against a voucher. Restricted to the operator.
    ///
    /// Validation order is part of the observable contract: the init and
    /// operator gates run first, then the nine guard checks in the fixed
    /// order reflected by their short codes.
    pub fn purchase(
        &mut self,
        caller: &Address,
        voucher: &Voucher,
        request: &PurchaseRequest,
    ) -> Result<PurchaseReceipt, MarketError> {
        self.require_operator(caller)?;

        if voucher.owner().is_zero() {
            return Err(MarketError::OwnerAddressZero);
        }
        if voucher.contract().is_zero() {
            return Err(MarketError::ContractAddressZero);
        }
        if voucher.contract() != &self.address {
            return Err(MarketError::ForeignVoucher {
                voucher_contract: *voucher.contract(),
                marketplace: self.address,
            });
        }
        if request.redeemer.is_zero() {
            return Err(MarketError::RedeemerAddressZero);
        }
        if voucher.edition_amount() == 0 {
            return Err(MarketError::EditionAmountZero);
        }
        if request.amount == 0 {
            return Err(MarketError::RequestedAmountZero);
        }

        let edition_id = voucher.edition_id();
        let receipt = match self.supply.phase(edition_id) {
            SalePhase::Unstocked => self.fulfill_voucher_mint(voucher, request)?,
            SalePhase::Stocked { supply_left } if request.primary => {
                self.fulfill_primary_sale(voucher, request, supply_left)?
            }
            SalePhase::Stocked { .. } => self.fulfill_secondary_transfer(voucher, request)?,
        };

        // Royalty assignment is best-effort metadata, not a purchase
        // precondition; the zero address silently skips it.
        if !request.royalty_recipient.is_zero() {
            self.royalties
                .set(edition_id, request.royalty_recipient, request.fee_bps);
            self.events.push(MarketEvent::RoyaltySet {
                edition_id,
                recipient: request.royalty_recipient,
                fee_bps: request.fee_bps,
            });
        }

        Ok(receipt)
    }

    /// First touch of an unstocked edition: mint the voucher's full amount
    /// to the edition owner and deliver the requested slice to the redeemer.
    fn fulfill_voucher_mint(
        &mut self,
        voucher: &Voucher,
        request: &PurchaseRequest,
    ) -> Result<PurchaseReceipt, MarketError> {
        let edition_id = voucher.edition_id();
        let edition_amount = voucher.edition_amount();

        if request.amount > edition_amount {
            return Err(MarketError::ExceedsEditionAmount {
                requested: request.amount,
                edition_amount,
            });
        }
        if self.counters.is_used(edition_id, voucher.counter()) {
            return Err(MarketError::CounterUsed {
                edition_id,
                counter: voucher.counter(),
            });
        }
        Self::check_royalty(request)?;

        // Overflow prechecks; the mutations below cannot fail once these pass
        self.supply
            .total_supply(edition_id)
            .checked_add(edition_amount)
            .ok_or(MarketError::SupplyOverflow)?;
        self.tokens
            .balance_of(voucher.owner(), edition_id)
            .checked_add(edition_amount)
            .ok_or(TokenError::BalanceOverflow)?;
        if &request.redeemer != voucher.owner() {
            self.tokens
                .balance_of(&request.redeemer, edition_id)
                .checked_add(request.amount)
                .ok_or(TokenError::BalanceOverflow)?;
        }

        self.tokens.mint(voucher.owner(), edition_id, edition_amount)?;
        self.tokens
            .transfer(voucher.owner(), &request.redeemer, edition_id, request.amount)?;
        self.supply.record_mint(edition_id, edition_amount, request.amount);
        self.counters.mark_used(edition_id, voucher.counter());
        if !voucher.metadata_uri().is_empty() {
            self.tokens.set_uri(edition_id, voucher.metadata_uri());
        }

        let voucher_id = voucher.id();
        self.events.push(MarketEvent::EditionMinted {
            edition_id,
            owner: *voucher.owner(),
            minted: edition_amount,
            voucher_id: voucher_id.clone(),
        });
        self.events.push(MarketEvent::Purchased {
            edition_id,
            redeemer: request.redeemer,
            amount: request.amount,
            kind: FulfillmentKind::VoucherMint,
        });

        Ok(PurchaseReceipt {
            edition_id,
            voucher_id,
            kind: FulfillmentKind::VoucherMint,
            amount: request.amount,
            minted: edition_amount,
            owner: *voucher.owner(),
            redeemer: request.redeemer,
            timestamp: unix_now(),
        })
    }

    /// Top-up sale on a stocked edition: move pre-minted stock from the
    /// edition owner to the redeemer. No counter is consumed.
    fn fulfill_primary_sale(
        &mut self,
        voucher: &Voucher,
        request: &PurchaseRequest,
        supply_left: u64,
    ) -> Result<PurchaseReceipt, MarketError> {
        let edition_id = voucher.edition_id();

        if request.amount > supply_left {
            return Err(MarketError::ExceedsRemainingSupply {
                requested: request.amount,
                available: supply_left,
            });
        }
        Self::check_royalty(request)?;

        // The transfer's own checks run before it mutates, so a failure
        // here still leaves all state unchanged.
        self.tokens
            .transfer(voucher.owner(), &request.redeemer, edition_id, request.amount)?;
        self.supply.record_primary_sale(edition_id, request.amount);

        self.events.push(MarketEvent::Purchased {
            edition_id,
            redeemer: request.redeemer,
            amount: request.amount,
            kind: FulfillmentKind::PrimarySale,
        });

        Ok(PurchaseReceipt {
            edition_id,
            voucher_id: voucher.id(),
            kind: FulfillmentKind::PrimarySale,
            amount: request.amount,
            minted: 0,
            owner: *voucher.owner(),
            redeemer: request.redeemer,
            timestamp: unix_now(),
        })
    }

    /// Secondary sale: move already-sold units from the current holder to
    /// the redeemer. The holder must have granted the marketplace a
    /// standing approval-for-all; its absence surfaces as the token
    /// primitive's own error.
    fn fulfill_secondary_transfer(
        &mut self,
        voucher: &Voucher,
        request: &PurchaseRequest,
    ) -> Result<PurchaseReceipt, MarketError> {
        let edition_id = voucher.edition_id();

        Self::check_royalty(request)?;

        let marketplace = self.address;
        self.tokens.transfer_from(
            &marketplace,
            voucher.owner(),
            &request.redeemer,
            edition_id,
            request.amount,
        )?;

        self.events.push(MarketEvent::Purchased {
            edition_id,
            redeemer: request.redeemer,
            amount: request.amount,
            kind: FulfillmentKind::SecondaryTransfer,
        });

        Ok(PurchaseReceipt {
            edition_id,
            voucher_id: voucher.id(),
            kind: FulfillmentKind::SecondaryTransfer,
            amount: request.amount,
            minted: 0,
            owner: *voucher.owner(),
            redeemer: request.redeemer,
            timestamp: unix_now(),
        })
    }

    fn check_royalty(request: &PurchaseRequest) -> Result<(), MarketError> {
        if !request.royalty_recipient.is_zero() && request.fee_bps > MAX_ROYALTY_BPS {
            return Err(MarketError::RoyaltyFeeTooHigh {
                fee_bps: request.fee_bps,
            });
        }
        Ok(())
    }

    fn require_operator(&self, caller: &Address) -> Result<(), MarketError> {
        self.init.require_initialized()?;
        match &self.operator {
            Some(gate) => gate.require(caller)?,
            None => return Err(AccessError::NotInitialized.into()),
        }
        Ok(())
    }

    // ========================================================================
    // HOLDER SURFACE
    // ========================================================================

    /// Grant or revoke the caller's blanket transfer approval for an operator
    pub fn set_approval_for_all(
        &mut self,
        caller: &Address,
        operator: &Address,
        approved: bool,
    ) -> Result<(), MarketError> {
        self.init.require_initialized()?;
        self.tokens.set_approval_for_all(caller, operator, approved);
        self.events.push(MarketEvent::ApprovalForAll {
            holder: *caller,
            operator: *operator,
            approved,
        });
        Ok(())
    }

    /// Direct holder transfer; the caller must be the holder or hold a
    /// standing approval-for-all grant
    pub fn transfer(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        edition_id: EditionId,
        amount: u64,
    ) -> Result<(), MarketError> {
        self.init.require_initialized()?;
        self.tokens.transfer_from(caller, from, to, edition_id, amount)?;
        Ok(())
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Total units ever minted for an edition
    pub fn total_supply(&self, edition_id: EditionId) -> Result<u64, MarketError> {
        self.init.require_initialized()?;
        Ok(self.supply.total_supply(edition_id))
    }

    /// Units of an edition still available for primary sale
    pub fn supply_left(&self, edition_id: EditionId) -> Result<u64, MarketError> {
        self.init.require_initialized()?;
        Ok(self.supply.supply_left(edition_id))
    }

    /// Aggregate supply statistics
    pub fn supply_stats(&self) -> Result<SupplyStats, MarketError> {
        self.init.require_initialized()?;
        Ok(self.supply.stats())
    }

    /// Current balance of an owner for an edition
    pub fn balance_of(&self, owner: &Address, edition_id: EditionId) -> Result<u64, MarketError> {
        self.init.require_initialized()?;
        Ok(self.tokens.balance_of(owner, edition_id))
    }

    /// Metadata URI for an edition, falling back to the base URI
    pub fn uri(&self, edition_id: EditionId) -> Result<&str, MarketError> {
        self.init.require_initialized()?;
        Ok(self.tokens.uri(edition_id))
    }

    /// Check a standing approval-for-all grant
    pub fn is_approved_for_all(
        &self,
        holder: &Address,
        operator: &Address,
    ) -> Result<bool, MarketError> {
        self.init.require_initialized()?;
        Ok(self.tokens.is_approved_for_all(holder, operator))
    }

    /// Royalty recipient and amount owed for a sale of an edition at the
    /// given price; None when the edition has no royalty assignment
    pub fn royalty_for(
        &self,
        edition_id: EditionId,
        sale_price: u64,
    ) -> Result<Option<(Address, u64)>, MarketError> {
        self.init.require_initialized()?;
        Ok(self.royalties.royalty_for(edition_id, sale_price))
    }

    // ========================================================================
    // EVENTS AND SNAPSHOTS
    // ========================================================================

    /// Drain all events queued since the last poll
    pub fn poll_events(&mut self) -> Vec<MarketEvent> {
        std::mem::take(&mut self.events)
    }

    /// Serialize the marketplace state to bytes (events are not included)
    pub fn to_bytes(&self) -> Vec<u8> {
        postcard::to_allocvec(self).unwrap_or_default()
    }

    /// Deserialize marketplace state from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MarketError> {
        postcard::from_bytes(bytes).map_err(|_| MarketError::DeserializationFailed)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
