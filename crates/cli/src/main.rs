//! IX CLI - Storefront client for the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog and fill the cart
//! ix-cli products list
//! ix-cli products add 1 --qty 2
//!
//! # Edit the cart directly
//! ix-cli cart add --id 7 --name "Shaker" --price 300
//! ix-cli cart update 7 3
//! ix-cli cart show
//!
//! # Log in and check out
//! ix-cli login arjun --password '...'
//! ix-cli checkout
//! ix-cli orders
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and edit the local cart
//! - `products` - Browse the catalog
//! - `login`, `register`, `logout` - Manage the backend session
//! - `checkout` - Place an order for the cart
//! - `orders` - Show order history
//!
//! Configuration comes from `IX_*` environment variables (see
//! `ix_storefront::config`). Logs go to stderr, filtered by `RUST_LOG`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ix_core::{Money, ProductId};
use ix_storefront::config::StorefrontConfig;
use ix_storefront::state::AppState;

mod commands;

#[derive(Parser)]
#[command(name = "ix-cli")]
#[command(author, version, about = "IX storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Log in to the backend
    Login {
        /// Username
        username: String,

        /// Password
        #[arg(short, long, env = "IX_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in
    Register {
        /// Username
        username: String,

        /// Email address
        #[arg(short, long)]
        email: Option<String>,

        /// Password
        #[arg(short, long, env = "IX_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log out and clear the cart
    Logout,
    /// Place an order for the cart
    Checkout {
        /// Password for opening a fresh backend session first
        #[arg(short, long, env = "IX_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Show order history
    Orders {
        /// Password for opening a fresh backend session first
        #[arg(short, long, env = "IX_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add a product by hand
    Add {
        /// Product ID
        #[arg(long)]
        id: ProductId,

        /// Product name
        #[arg(long)]
        name: String,

        /// Unit price
        #[arg(long)]
        price: Money,

        /// Image URL
        #[arg(long)]
        image: Option<String>,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        qty: u32,
    },
    /// Set a line's quantity (values below 1 become 1)
    Update {
        /// Product ID
        id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        qty: i64,
    },
    /// Remove a line
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List all products
    List,
    /// Show one product
    Show {
        /// Product ID
        id: ProductId,
    },
    /// Fetch a product from the catalog and add it to the cart
    Add {
        /// Product ID
        id: ProductId,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        qty: u32,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        if e.needs_login() {
            tracing::error!("Run `ix-cli login <username>` and try again");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> ix_storefront::Result<()> {
    let config = StorefrontConfig::from_env()?;
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state),
            CartAction::Add {
                id,
                name,
                price,
                image,
                qty,
            } => commands::cart::add(&state, id, name, price, image, qty)?,
            CartAction::Update { id, qty } => commands::cart::update(&state, id, qty),
            CartAction::Remove { id } => commands::cart::remove(&state, id),
            CartAction::Clear => commands::cart::clear(&state),
        },
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list(&state).await?,
            ProductsAction::Show { id } => commands::products::show(&state, id).await?,
            ProductsAction::Add { id, qty } => commands::products::add(&state, id, qty).await?,
        },
        Commands::Login { username, password } => {
            commands::account::login(&state, &username, password).await?;
        }
        Commands::Register {
            username,
            email,
            password,
        } => commands::account::register(&state, &username, email.as_deref(), password).await?,
        Commands::Logout => commands::account::logout(&state).await?,
        Commands::Checkout { password } => commands::orders::checkout(&state, password).await?,
        Commands::Orders { password } => commands::orders::history(&state, password).await?,
    }
    Ok(())
}
