// market - Operator CLI for the lazy-minting marketplace
//
// Loads the marketplace snapshot from the sled store, routes the command
// through the serialized service worker, and persists the updated state.

use clap::{Parser, Subcommand};
use lazymint::market::{Marketplace, PurchaseRequest};
use lazymint::service::{MarketHandle, MarketRuntime};
use lazymint::storage::MarketStore;
use lazymint::types::{Address, EditionId};
use lazymint::voucher::{VoucherBuilder, VoucherCodec};
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "market", version, about = "Lazy-minting marketplace operator tool")]
struct Cli {
    /// Path to the sled database
    #[arg(long, default_value = "./market-db")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create and initialize a marketplace at this store
    Init {
        /// The marketplace's own address; vouchers must be bound to it
        #[arg(long)]
        address: Address,
        /// The single account authorized to fulfill purchases
        #[arg(long)]
        operator: Address,
        /// Base metadata URI for editions without their own
        #[arg(long, default_value = "")]
        base_uri: String,
    },
    /// Build a voucher, store it, and print its wire encodings
    Voucher {
        /// Edition owner credited with the mint
        #[arg(long)]
        owner: Address,
        #[arg(long)]
        edition_id: EditionId,
        /// Total units one mint of this voucher prints
        #[arg(long)]
        amount: u64,
        /// One-time counter (auto-generated when omitted)
        #[arg(long)]
        counter: Option<u64>,
        /// Edition metadata URI
        #[arg(long)]
        uri: Option<String>,
    },
    /// Fulfill a purchase against a hex-encoded voucher
    Purchase {
        /// Hex encoding of the voucher, as printed by `market voucher`
        #[arg(long)]
        voucher: String,
        #[arg(long)]
        amount: u64,
        /// Account receiving the purchased units
        #[arg(long)]
        redeemer: Address,
        /// Secondary sale: transfer already-sold units instead of stock
        #[arg(long)]
        secondary: bool,
        /// Royalty recipient (omit to skip royalty assignment)
        #[arg(long)]
        royalty: Option<Address>,
        /// Royalty fee in basis points
        #[arg(long, default_value_t = 0)]
        fee_bps: u16,
        /// Caller account (defaults to the stored operator)
        #[arg(long)]
        caller: Option<Address>,
    },
    /// Grant or revoke a holder's blanket transfer approval
    Approve {
        #[arg(long)]
        holder: Address,
        #[arg(long)]
        operator: Address,
        #[arg(long)]
        revoke: bool,
    },
    /// Show minted supply and remaining primary-sale stock for an edition
    Supply {
        #[arg(long)]
        edition_id: EditionId,
    },
    /// Show an owner's balance for an edition
    Balance {
        #[arg(long)]
        owner: Address,
        #[arg(long)]
        edition_id: EditionId,
    },
    /// Show the metadata URI for an edition
    Uri {
        #[arg(long)]
        edition_id: EditionId,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let store = MarketStore::open(&cli.store)?;

    match cli.command {
        Command::Init {
            address,
            operator,
            base_uri,
        } => {
            let marketplace = match store.load_marketplace()? {
                Some(existing) => existing,
                None => Marketplace::new(address),
            };
            let handle = MarketRuntime::spawn(marketplace);
            handle.initialize(operator, base_uri).await?;
            persist(&store, &handle).await?;
            println!("marketplace {} initialized, operator {}", address.checksummed(), operator.checksummed());
        }
        Command::Voucher {
            owner,
            edition_id,
            amount,
            counter,
            uri,
        } => {
            let marketplace = load_required(&store)?;
            let mut builder = VoucherBuilder::new()
                .contract(*marketplace.address())
                .owner(owner)
                .edition_id(edition_id)
                .edition_amount(amount);
            if let Some(counter) = counter {
                builder = builder.counter(counter);
            }
            if let Some(uri) = uri {
                builder = builder.metadata_uri(uri);
            }
            let voucher = builder.build()?;
            store.save_voucher(&voucher)?;
            store.flush()?;
            println!("{}", voucher.id());
            println!("hex:    {}", VoucherCodec::encode_hex(&voucher));
            println!("base64: {}", VoucherCodec::encode_base64(&voucher));
        }
        Command::Purchase {
            voucher,
            amount,
            redeemer,
            secondary,
            royalty,
            fee_bps,
            caller,
        } => {
            let voucher = VoucherCodec::decode_hex(&voucher)?;
            let marketplace = load_required(&store)?;
            let caller = match caller.or_else(|| marketplace.operator().copied()) {
                Some(caller) => caller,
                None => return Err("marketplace has no operator installed".into()),
            };

            let mut request = if secondary {
                PurchaseRequest::secondary(amount, redeemer)
            } else {
                PurchaseRequest::primary(amount, redeemer)
            };
            if let Some(recipient) = royalty {
                request = request.with_royalty(recipient, fee_bps);
            }

            let handle = MarketRuntime::spawn(marketplace);
            let receipt = handle.purchase(caller, voucher, request).await?;
            for event in handle.poll_events().await? {
                println!("event: {:?}", event);
            }
            persist(&store, &handle).await?;

            let when = chrono::DateTime::<chrono::Utc>::from_timestamp(receipt.timestamp as i64, 0)
                .map(|t| t.to_rfc3339())
                .unwrap_or_default();
            println!(
                "{:?}: edition {} x{} (minted {}) -> {} at {}",
                receipt.kind,
                receipt.edition_id,
                receipt.amount,
                receipt.minted,
                receipt.redeemer.checksummed(),
                when
            );
        }
        Command::Approve {
            holder,
            operator,
            revoke,
        } => {
            let marketplace = load_required(&store)?;
            let handle = MarketRuntime::spawn(marketplace);
            handle.set_approval_for_all(holder, operator, !revoke).await?;
            persist(&store, &handle).await?;
            println!(
                "{} {} for holder {}",
                if revoke { "revoked" } else { "approved" },
                operator.checksummed(),
                holder.checksummed()
            );
        }
        Command::Supply { edition_id } => {
            let marketplace = load_required(&store)?;
            println!("total_supply: {}", marketplace.total_supply(edition_id)?);
            println!("supply_left:  {}", marketplace.supply_left(edition_id)?);
        }
        Command::Balance { owner, edition_id } => {
            let marketplace = load_required(&store)?;
            println!("{}", marketplace.balance_of(&owner, edition_id)?);
        }
        Command::Uri { edition_id } => {
            let marketplace = load_required(&store)?;
            println!("{}", marketplace.uri(edition_id)?);
        }
    }

    Ok(())
}

fn load_required(store: &MarketStore) -> Result<Marketplace, Box<dyn Error>> {
    match store.load_marketplace()? {
        Some(marketplace) => Ok(marketplace),
        None => Err("no marketplace at this store; run `market init` first".into()),
    }
}

async fn persist(store: &MarketStore, handle: &MarketHandle) -> Result<(), Box<dyn Error>> {
    let snapshot = handle.shutdown().await?;
    let marketplace = Marketplace::from_bytes(&snapshot)?;
    store.save_marketplace(&marketplace)?;
    store.flush()?;
    Ok(())
}
