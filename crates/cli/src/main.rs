//! Sweetshop CLI - the storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Create an account and log in
//! sweetshop register -u mira -e mira@example.com -p hunter22 -m 9876543210 -a "12 MG Road"
//! sweetshop login -e mira@example.com -p hunter22
//!
//! # Browse and fill the cart
//! sweetshop catalog --category barfi --max-price 300
//! sweetshop cart add 3 --weight 150
//! sweetshop cart show
//!
//! # Pay
//! sweetshop checkout
//! sweetshop history
//! ```
//!
//! # Commands
//!
//! - `login` / `register` / `logout` / `whoami` - session management
//! - `catalog` - browse or search the product listing
//! - `cart` - add/grow/shrink/remove lines, show totals
//! - `checkout` - submit the cart as sequential purchases
//! - `history` - past purchases
//! - `admin` - catalog editing and restocking (server enforces the role)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use sweetshop_client::{ApiClient, ClientConfig, Session, StateStore};

mod commands;

use commands::{CliError, Context};

#[derive(Parser)]
#[command(name = "sweetshop")]
#[command(author, version, about = "Sweetshop storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create a new account
    Register {
        /// Username (3-50 characters)
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (min 6 characters)
        #[arg(short, long)]
        password: String,

        /// Mobile number (10-15 digits)
        #[arg(short, long)]
        mobile: String,

        /// Delivery address
        #[arg(short, long)]
        address: String,
    },
    /// Drop the stored session and any pending cart
    Logout,
    /// Show the logged-in user's profile
    Whoami,
    /// Browse or search the catalog
    Catalog {
        /// Name substring to search for
        #[arg(long)]
        name: Option<String>,

        /// Category to filter by
        #[arg(long)]
        category: Option<String>,

        /// Minimum price per 100g
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Maximum price per 100g
        #[arg(long)]
        max_price: Option<Decimal>,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Submit the cart as one purchase per line
    Checkout,
    /// Show past purchases
    History,
    /// Catalog administration (role enforced server-side)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart and its order summary
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID
        sweet_id: i64,

        /// Weight in grams (multiple of 50, min 100)
        #[arg(short, long, default_value_t = 100)]
        weight: u32,
    },
    /// Grow a cart line by 50g
    Grow {
        /// Line position (from `cart show`)
        index: usize,
    },
    /// Shrink a cart line by 50g (floored at 100g)
    Shrink {
        /// Line position (from `cart show`)
        index: usize,
    },
    /// Remove a cart line
    Remove {
        /// Line position (from `cart show`)
        index: usize,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Add a new sweet to the catalog
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Category label
        #[arg(short, long)]
        category: String,

        /// Price per 100g
        #[arg(short, long)]
        price: Decimal,

        /// Stock in 100g units
        #[arg(short, long)]
        quantity: u32,

        /// Image URL or path
        #[arg(short, long)]
        img: String,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Update an existing sweet (only the given fields change)
    Update {
        /// Product ID
        sweet_id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        price: Option<Decimal>,

        #[arg(long)]
        quantity: Option<u32>,

        #[arg(long)]
        img: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a sweet from the catalog
    Delete {
        /// Product ID
        sweet_id: i64,
    },
    /// Add stock to a sweet
    Restock {
        /// Product ID
        sweet_id: i64,

        /// Units to add
        #[arg(short, long)]
        quantity: u32,
    },
    /// Show the restock history
    RestockHistory,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ClientConfig::from_env()?;
    let store = StateStore::new(&config.state_dir);
    let api = ApiClient::new(&config)?;

    // Attach the stored session token, if any
    if let Some(session) = Session::load(&store)? {
        api.set_token(session.token().clone()).await;
    }

    let ctx = Context { api, store };
    let result = dispatch(&ctx, cli.command).await;

    // An expired token destroys the session; the user logs in again
    if let Err(e) = &result
        && e.is_auth_expired()
    {
        Session::destroy(&ctx.store)?;
        ctx.api.clear_token().await;
    }

    result
}

async fn dispatch(ctx: &Context, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Login { email, password } => commands::auth::login(ctx, &email, &password).await,
        Commands::Register {
            username,
            email,
            password,
            mobile,
            address,
        } => commands::auth::register(ctx, username, email, password, mobile, address).await,
        Commands::Logout => commands::auth::logout(ctx).await,
        Commands::Whoami => commands::auth::whoami(ctx).await,
        Commands::Catalog {
            name,
            category,
            min_price,
            max_price,
        } => commands::catalog::browse(ctx, name, category, min_price, max_price).await,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(ctx),
            CartAction::Add { sweet_id, weight } => {
                commands::cart::add(ctx, sweet_id, weight).await
            }
            CartAction::Grow { index } => commands::cart::grow(ctx, index),
            CartAction::Shrink { index } => commands::cart::shrink(ctx, index),
            CartAction::Remove { index } => commands::cart::remove(ctx, index),
        },
        Commands::Checkout => commands::checkout::run(ctx).await,
        Commands::History => commands::history::purchases(ctx).await,
        Commands::Admin { action } => match action {
            AdminAction::Add {
                name,
                category,
                price,
                quantity,
                img,
                description,
            } => commands::admin::add(ctx, name, category, price, quantity, img, description).await,
            AdminAction::Update {
                sweet_id,
                name,
                category,
                price,
                quantity,
                img,
                description,
            } => {
                commands::admin::update(
                    ctx, sweet_id, name, category, price, quantity, img, description,
                )
                .await
            }
            AdminAction::Delete { sweet_id } => commands::admin::delete(ctx, sweet_id).await,
            AdminAction::Restock { sweet_id, quantity } => {
                commands::admin::restock(ctx, sweet_id, quantity).await
            }
            AdminAction::RestockHistory => commands::admin::restock_history(ctx).await,
        },
    }
}
