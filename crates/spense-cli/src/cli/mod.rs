//! CLI entry and dispatch.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use spense_core::api::ApiClient;
use spense_core::config::Config;
use spense_core::session::{CachedSession, SessionStore};

mod commands;

#[derive(Parser)]
#[command(name = "spense")]
#[command(version = "0.1")]
#[command(about = "Expense tracker client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show connection status for both backend endpoints
    Status,

    /// Log in and cache the session
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Create a new account
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,

        #[arg(long)]
        firstname: String,

        #[arg(long)]
        lastname: String,
    },

    /// Log out and clear the cached session
    Logout,

    /// Show the current user's profile
    Profile,

    /// Run the session validation loop in the foreground
    Watch {
        /// Seconds between validation probes (overrides config)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Manage transactions
    Tx {
        #[command(subcommand)]
        command: TxCommands,
    },

    /// List spending categories
    Categories,

    /// Show the categorized spending summary
    Summary,
}

#[derive(clap::Subcommand)]
enum TxCommands {
    /// Submit a new transaction
    Add {
        #[arg(long)]
        amount: f64,

        /// Category id
        #[arg(long)]
        category: i64,

        #[arg(long, default_value = "")]
        note: String,

        /// ISO-8601 timestamp (defaults to now)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        vendor: Option<String>,

        /// Record as income instead of an expense
        #[arg(long)]
        income: bool,
    },

    /// List recent transactions
    List {
        #[arg(long, default_value_t = 0)]
        skip: i64,

        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;
    let endpoints = config.endpoints().context("resolve endpoints")?;

    let store = SessionStore::new();
    if let Some(cached) = CachedSession::load().context("load cached session")? {
        cached.hydrate(&store);
    }

    let client = ApiClient::new(endpoints.primary, store.clone());

    match cli.command {
        Commands::Status => {
            let secondary = ApiClient::new(endpoints.secondary, store.clone());
            commands::status::run(&client, &secondary).await
        }
        Commands::Login { username, password } => {
            commands::auth::login(&client, &store, &username, &password).await
        }
        Commands::Register {
            username,
            password,
            firstname,
            lastname,
        } => commands::auth::register(&client, &username, &password, &firstname, &lastname).await,
        Commands::Logout => commands::auth::logout(&store),
        Commands::Profile => commands::auth::profile(&client, &store).await,
        Commands::Watch { interval } => {
            let interval = interval
                .map_or_else(|| config.refresh_interval(), Duration::from_secs);
            commands::watch::run(client, store, interval).await
        }
        Commands::Tx { command } => match command {
            TxCommands::Add {
                amount,
                category,
                note,
                date,
                vendor,
                income,
            } => {
                commands::tx::add(&client, &store, amount, category, note, date, vendor, income)
                    .await
            }
            TxCommands::List { skip, limit } => {
                commands::tx::list(&client, &store, skip, limit).await
            }
        },
        Commands::Categories => commands::tx::categories(&client, &store).await,
        Commands::Summary => commands::tx::summary(&client, &store).await,
    }
}
