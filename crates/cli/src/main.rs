//! VitaBot CLI - drive the storefront cart, checkout and chat from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Ask VitaBot a single question
//! vitabot chat -m "Do you ship to Namibia?"
//!
//! # Chat interactively (Ctrl-D to leave)
//! vitabot chat
//!
//! # Manage the cart
//! vitabot cart add --id sea-moss --name "Organic Sea Moss" --price 249.99
//! vitabot cart decrease sea-moss
//! vitabot cart show
//!
//! # Check out and place the order
//! vitabot checkout
//! vitabot place-order -f first_name=Thandi -f email=thandi@example.com ... -p card
//! ```
//!
//! The cart persists between runs under `VITABOT_STORAGE_DIR`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitabot_storefront::config::StorefrontConfig;

mod commands;
mod console;
mod error;

use error::CliError;

#[derive(Parser)]
#[command(name = "vitabot")]
#[command(author, version, about = "VitaBot storefront tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Talk to VitaBot
    Chat {
        /// Send one message and exit instead of starting a session
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Show the order summary and proceed to checkout
    Checkout,
    /// Submit the checkout form
    PlaceOrder {
        /// Form value as `name=value`; repeat for each field
        #[arg(short, long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,

        /// Payment method (`card`, `eft`, `cash_on_delivery`)
        #[arg(short, long)]
        payment: Option<String>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add one unit of a product
    Add {
        #[arg(long)]
        id: String,

        #[arg(long)]
        name: String,

        /// Unit price as a decimal number
        #[arg(long)]
        price: String,

        #[arg(long, default_value = "")]
        image: String,
    },
    /// Add one unit to an existing line
    Increase { id: String },
    /// Remove one unit from a line
    Decrease { id: String },
    /// Delete a line
    Remove { id: String },
    /// Print the cart
    Show,
    /// Empty the cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Map tracing levels to Sentry: warnings and errors become events, the
/// rest breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vitabot_storefront=info,vitabot_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config).await {
        if e.is_user_facing() {
            tracing::debug!("Command rejected: {e}");
        } else {
            tracing::error!("Command failed: {e}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), CliError> {
    match cli.command {
        Commands::Chat { message } => match message {
            Some(message) => commands::chat::ask(config, &message).await?,
            None => commands::chat::session(config).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Add {
                id,
                name,
                price,
                image,
            } => commands::cart::add(config, &id, &name, &price, &image)?,
            CartAction::Increase { id } => commands::cart::increase(config, &id)?,
            CartAction::Decrease { id } => commands::cart::decrease(config, &id)?,
            CartAction::Remove { id } => commands::cart::remove(config, &id)?,
            CartAction::Show => commands::cart::show(config)?,
            CartAction::Clear => commands::cart::clear(config)?,
        },
        Commands::Checkout => commands::checkout::proceed(config)?,
        Commands::PlaceOrder { fields, payment } => {
            commands::checkout::place_order(config, &fields, payment.as_deref()).await?;
        }
    }
    Ok(())
}
