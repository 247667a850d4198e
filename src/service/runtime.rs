// MarketRuntime - Single-writer actor around the marketplace
//
// The worker task owns the Marketplace; handles send commands over a
// bounded channel and await oneshot replies. Because one task applies
// every command in arrival order, each purchase observes only fully
// applied prior state: the supply check and the mutations it guards are
// atomic together.

use crate::market::{MarketError, MarketEvent, Marketplace, PurchaseReceipt, PurchaseRequest};
use crate::types::{Address, EditionId};
use crate::voucher::Voucher;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

const COMMAND_BUFFER: usize = 64;

/// Errors from the serialized service front
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Marketplace worker is gone")]
    WorkerGone,

    #[error(transparent)]
    Market(#[from] MarketError),
}

enum MarketCommand {
    Initialize {
        operator: Address,
        base_uri: String,
        reply: oneshot::Sender<Result<(), MarketError>>,
    },
    Purchase {
        caller: Address,
        voucher: Box<Voucher>,
        request: PurchaseRequest,
        reply: oneshot::Sender<Result<PurchaseReceipt, MarketError>>,
    },
    SetApprovalForAll {
        caller: Address,
        operator: Address,
        approved: bool,
        reply: oneshot::Sender<Result<(), MarketError>>,
    },
    Transfer {
        caller: Address,
        from: Address,
        to: Address,
        edition_id: EditionId,
        amount: u64,
        reply: oneshot::Sender<Result<(), MarketError>>,
    },
    TotalSupply {
        edition_id: EditionId,
        reply: oneshot::Sender<Result<u64, MarketError>>,
    },
    SupplyLeft {
        edition_id: EditionId,
        reply: oneshot::Sender<Result<u64, MarketError>>,
    },
    BalanceOf {
        owner: Address,
        edition_id: EditionId,
        reply: oneshot::Sender<Result<u64, MarketError>>,
    },
    Uri {
        edition_id: EditionId,
        reply: oneshot::Sender<Result<String, MarketError>>,
    },
    RoyaltyFor {
        edition_id: EditionId,
        sale_price: u64,
        reply: oneshot::Sender<Result<Option<(Address, u64)>, MarketError>>,
    },
    Operator {
        reply: oneshot::Sender<Option<Address>>,
    },
    PollEvents {
        reply: oneshot::Sender<Vec<MarketEvent>>,
    },
    Snapshot {
        reply: oneshot::Sender<Vec<u8>>,
    },
    Shutdown {
        reply: oneshot::Sender<Vec<u8>>,
    },
}

/// Spawns and owns the single worker task
pub struct MarketRuntime;

impl MarketRuntime {
    /// Spawn a worker owning the marketplace and return a handle to it.
    /// The worker runs until every handle is dropped or `shutdown` is called.
    pub fn spawn(marketplace: Marketplace) -> MarketHandle {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        tokio::spawn(run_worker(marketplace, rx));
        MarketHandle { commands: tx }
    }
}

async fn run_worker(mut marketplace: Marketplace, mut rx: mpsc::Receiver<MarketCommand>) {
    tracing::info!(address = %marketplace.address(), "marketplace worker started");

    while let Some(command) = rx.recv().await {
        match command {
            MarketCommand::Initialize {
                operator,
                base_uri,
                reply,
            } => {
                let result = marketplace.initialize(operator, base_uri);
                match &result {
                    Ok(()) => tracing::info!(operator = %operator, "marketplace initialized"),
                    Err(e) => tracing::warn!(code = e.code(), "initialization rejected"),
                }
                let _ = reply.send(result);
            }
            MarketCommand::Purchase {
                caller,
                voucher,
                request,
                reply,
            } => {
                let result = marketplace.purchase(&caller, &voucher, &request);
                match &result {
                    Ok(receipt) => tracing::info!(
                        edition_id = receipt.edition_id,
                        amount = receipt.amount,
                        kind = ?receipt.kind,
                        redeemer = %receipt.redeemer,
                        "purchase fulfilled"
                    ),
                    Err(e) => tracing::warn!(
                        edition_id = voucher.edition_id(),
                        code = e.code(),
                        "purchase rejected"
                    ),
                }
                let _ = reply.send(result);
            }
            MarketCommand::SetApprovalForAll {
                caller,
                operator,
                approved,
                reply,
            } => {
                let result = marketplace.set_approval_for_all(&caller, &operator, approved);
                if result.is_ok() {
                    tracing::debug!(holder = %caller, operator = %operator, approved, "approval updated");
                }
                let _ = reply.send(result);
            }
            MarketCommand::Transfer {
                caller,
                from,
                to,
                edition_id,
                amount,
                reply,
            } => {
                let result = marketplace.transfer(&caller, &from, &to, edition_id, amount);
                let _ = reply.send(result);
            }
            MarketCommand::TotalSupply { edition_id, reply } => {
                let _ = reply.send(marketplace.total_supply(edition_id));
            }
            MarketCommand::SupplyLeft { edition_id, reply } => {
                let _ = reply.send(marketplace.supply_left(edition_id));
            }
            MarketCommand::BalanceOf {
                owner,
                edition_id,
                reply,
            } => {
                let _ = reply.send(marketplace.balance_of(&owner, edition_id));
            }
            MarketCommand::Uri { edition_id, reply } => {
                let _ = reply.send(marketplace.uri(edition_id).map(|uri| uri.to_string()));
            }
            MarketCommand::RoyaltyFor {
                edition_id,
                sale_price,
                reply,
            } => {
                let _ = reply.send(marketplace.royalty_for(edition_id, sale_price));
            }
            MarketCommand::Operator { reply } => {
                let _ = reply.send(marketplace.operator().copied());
            }
            MarketCommand::PollEvents { reply } => {
                let _ = reply.send(marketplace.poll_events());
            }
            MarketCommand::Snapshot { reply } => {
                let _ = reply.send(marketplace.to_bytes());
            }
            MarketCommand::Shutdown { reply } => {
                tracing::info!("marketplace worker shutting down");
                let _ = reply.send(marketplace.to_bytes());
                break;
            }
        }
    }
}

/// Cloneable handle to the marketplace worker
#[derive(Clone)]
pub struct MarketHandle {
    commands: mpsc::Sender<MarketCommand>,
}

impl MarketHandle {
    async fn request<T>(
        &self,
        command: MarketCommand,
        rx: oneshot::Receiver<Result<T, MarketError>>,
    ) -> Result<T, ServiceError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ServiceError::WorkerGone)?;
        let result = rx.await.map_err(|_| ServiceError::WorkerGone)?;
        Ok(result?)
    }

    /// One-time marketplace setup
    pub async fn initialize(
        &self,
        operator: Address,
        base_uri: impl Into<String>,
    ) -> Result<(), ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.request(
            MarketCommand::Initialize {
                operator,
                base_uri: base_uri.into(),
                reply: tx,
            },
            rx,
        )
        .await
    }

    /// Fulfill a purchase against a voucher
    pub async fn purchase(
        &self,
        caller: Address,
        voucher: Voucher,
        request: PurchaseRequest,
    ) -> Result<PurchaseReceipt, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.request(
            MarketCommand::Purchase {
                caller,
                voucher: Box::new(voucher),
                request,
                reply: tx,
            },
            rx,
        )
        .await
    }

    /// Grant or revoke blanket transfer approval for the caller
    pub async fn set_approval_for_all(
        &self,
        caller: Address,
        operator: Address,
        approved: bool,
    ) -> Result<(), ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.request(
            MarketCommand::SetApprovalForAll {
                caller,
                operator,
                approved,
                reply: tx,
            },
            rx,
        )
        .await
    }

    /// Direct holder transfer
    pub async fn transfer(
        &self,
        caller: Address,
        from: Address,
        to: Address,
        edition_id: EditionId,
        amount: u64,
    ) -> Result<(), ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.request(
            MarketCommand::Transfer {
                caller,
                from,
                to,
                edition_id,
                amount,
                reply: tx,
            },
            rx,
        )
        .await
    }

    /// Total units ever minted for an edition
    pub async fn total_supply(&self, edition_id: EditionId) -> Result<u64, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.request(MarketCommand::TotalSupply { edition_id, reply: tx }, rx)
            .await
    }

    /// Units still available for primary sale
    pub async fn supply_left(&self, edition_id: EditionId) -> Result<u64, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.request(MarketCommand::SupplyLeft { edition_id, reply: tx }, rx)
            .await
    }

    /// Balance of an owner for an edition
    pub async fn balance_of(
        &self,
        owner: Address,
        edition_id: EditionId,
    ) -> Result<u64, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.request(
            MarketCommand::BalanceOf {
                owner,
                edition_id,
                reply: tx,
            },
            rx,
        )
        .await
    }

    /// Metadata URI for an edition
    pub async fn uri(&self, edition_id: EditionId) -> Result<String, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.request(MarketCommand::Uri { edition_id, reply: tx }, rx)
            .await
    }

    /// Royalty recipient and amount for a sale price
    pub async fn royalty_for(
        &self,
        edition_id: EditionId,
        sale_price: u64,
    ) -> Result<Option<(Address, u64)>, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.request(
            MarketCommand::RoyaltyFor {
                edition_id,
                sale_price,
                reply: tx,
            },
            rx,
        )
        .await
    }

    /// The authorized operator, once initialized
    pub async fn operator(&self) -> Result<Option<Address>, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(MarketCommand::Operator { reply: tx })
            .await
            .map_err(|_| ServiceError::WorkerGone)?;
        rx.await.map_err(|_| ServiceError::WorkerGone)
    }

    /// Drain all events queued since the last poll
    pub async fn poll_events(&self) -> Result<Vec<MarketEvent>, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(MarketCommand::PollEvents { reply: tx })
            .await
            .map_err(|_| ServiceError::WorkerGone)?;
        rx.await.map_err(|_| ServiceError::WorkerGone)
    }

    /// Serialize the current marketplace state
    pub async fn snapshot(&self) -> Result<Vec<u8>, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(MarketCommand::Snapshot { reply: tx })
            .await
            .map_err(|_| ServiceError::WorkerGone)?;
        rx.await.map_err(|_| ServiceError::WorkerGone)
    }

    /// Stop the worker, returning the final state snapshot
    pub async fn shutdown(&self) -> Result<Vec<u8>, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(MarketCommand::Shutdown { reply: tx })
            .await
            .map_err(|_| ServiceError::WorkerGone)?;
        rx.await.map_err(|_| ServiceError::WorkerGone)
    }
}
