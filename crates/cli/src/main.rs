//! Vitrina CLI - Browse the catalog and manage the shopping cart.
//!
//! # Usage
//!
//! ```bash
//! # List products from the catalog (VITRINA_CATALOG, default data.json)
//! vitrina products
//!
//! # Add product 3 to the cart, then bump its quantity
//! vitrina add 3
//! vitrina qty 3 1
//!
//! # Decrease (a quantity reaching zero removes the line)
//! vitrina qty 3 -1
//!
//! # Show the cart and finalize the purchase
//! vitrina cart
//! vitrina checkout
//! ```
//!
//! The cart is saved to `VITRINA_STORAGE_PATH` (default
//! `.vitrina/storage.json`) after every change and restored on the next run.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitrina_core::ProductId;
use vitrina_storefront::error::Result;
use vitrina_storefront::{CatalogSource, StorefrontConfig};

mod commands;
mod view;

use commands::Context;

#[derive(Parser)]
#[command(name = "vitrina")]
#[command(author, version, about = "Vitrina storefront CLI")]
struct Cli {
    /// Storage file holding the saved cart (overrides `VITRINA_STORAGE_PATH`)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Catalog URL or file (overrides `VITRINA_CATALOG`)
    #[arg(long, global = true)]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the product catalog
    Products,
    /// Show the details of a product
    Show {
        /// Product ID
        id: ProductId,
    },
    /// Add one unit of a product to the cart
    Add {
        /// Product ID
        id: ProductId,
    },
    /// Change the quantity of a cart line
    Qty {
        /// Product ID
        id: ProductId,
        /// Signed change, e.g. 1 or -1
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Show the cart
    Cart,
    /// Finalize the purchase and empty the cart
    Checkout,
    /// Empty the cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry.dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry
                .environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry.sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vitrina_cli=info,vitrina_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Failed to load configuration: {e}");
            return ExitCode::from(78);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = init_sentry(&config);
    init_tracing();

    let ctx = Context::new(apply_overrides(config, &cli));
    let code = exit_status(run(&ctx, cli.command).await);

    // Dropping the guard flushes queued events before the process exits.
    drop(sentry_guard);
    ExitCode::from(code)
}

/// Report a failed command and map the outcome to a process exit code.
fn exit_status(result: Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            e.capture();
            e.exit_code()
        }
    }
}

fn apply_overrides(mut config: StorefrontConfig, cli: &Cli) -> StorefrontConfig {
    if let Some(path) = &cli.storage {
        config.storage_path.clone_from(path);
    }
    if let Some(location) = &cli.catalog {
        config.catalog = CatalogSource::parse(location);
    }
    config
}

async fn run(ctx: &Context, command: Commands) -> Result<()> {
    let currency = ctx.currency();
    let stdout = std::io::stdout();

    match command {
        Commands::Products => {
            let catalog = ctx.load_catalog().await;
            commands::catalog::products(&catalog, currency, &mut stdout.lock())?;
        }
        Commands::Show { id } => {
            let catalog = ctx.load_catalog().await;
            commands::catalog::show(&catalog, id, currency, &mut stdout.lock())?;
        }
        Commands::Add { id } => {
            let catalog = ctx.load_catalog().await;
            let mut store = ctx.open_cart_with_panel();
            commands::cart::add(&mut store, &catalog, id, &mut stdout.lock())?;
        }
        Commands::Qty { id, delta } => {
            let mut store = ctx.open_cart_with_panel();
            commands::cart::change_quantity(&mut store, id, delta);
        }
        Commands::Remove { id } => {
            let mut store = ctx.open_cart_with_panel();
            commands::cart::remove(&mut store, id);
        }
        Commands::Cart => {
            let store = ctx.open_cart();
            commands::cart::show(&store, currency, &mut stdout.lock())?;
        }
        Commands::Checkout => {
            let mut store = ctx.open_cart();
            commands::cart::checkout(&mut store, currency, &mut stdout.lock())?;
        }
        Commands::Clear => {
            let mut store = ctx.open_cart_with_panel();
            commands::cart::clear(&mut store);
        }
    }

    stdout.lock().flush()?;
    Ok(())
}
