//! Make-Over CLI - data file maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Create an empty data file (refuses to overwrite without --force)
//! mo-cli data init
//!
//! # Parse the data file and report collection sizes
//! mo-cli data check
//!
//! # Append products from a JSON array
//! mo-cli seed products catalog.json
//!
//! # Hash every plaintext password
//! mo-cli migrate passwords
//!
//! # Create an admin, or promote an existing account
//! mo-cli admin create -e admin@example.com -f Ayesha -l Khan -p 'S3cret!pass'
//! mo-cli admin create -e owner@example.com --promote
//!
//! # Generate a JWT_SECRET
//! mo-cli secret
//! ```
//!
//! The data file comes from `--data-file`, then `MAKEOVER_DATA_FILE`, then
//! `data.json`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use makeover_core::auth::DEFAULT_COST;
use makeover_core::store::DataStore;

mod commands;

#[derive(Parser)]
#[command(name = "mo-cli")]
#[command(author, version, about = "Make-Over CLI tools")]
struct Cli {
    /// Path to the JSON data file
    #[arg(long, global = true, env = "MAKEOVER_DATA_FILE", default_value = "data.json")]
    data_file: PathBuf,

    /// bcrypt cost for any password this run hashes
    #[arg(long, global = true, env = "BCRYPT_COST", default_value_t = DEFAULT_COST)]
    bcrypt_cost: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or verify the data file
    Data {
        #[command(subcommand)]
        action: DataAction,
    },
    /// Import records into the data file
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Rewrite stored records into their current form
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Print a random secret suitable for `JWT_SECRET`
    Secret {
        /// Number of random bytes before base64 encoding
        #[arg(long, default_value_t = commands::secret::DEFAULT_BYTES)]
        bytes: usize,
    },
}

#[derive(Subcommand)]
enum DataAction {
    /// Write an empty data file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Parse the data file and report record counts
    Check,
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Append products from a JSON array file
    Products {
        /// File holding a JSON array of products
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Replace plaintext passwords with bcrypt hashes
    Passwords,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// First name
        #[arg(short, long, default_value = "")]
        first_name: String,

        /// Last name
        #[arg(short, long, default_value = "")]
        last_name: String,

        /// Password (required unless promoting an existing account)
        #[arg(short, long)]
        password: Option<String>,

        /// Give an existing account the admin role instead of failing
        #[arg(long)]
        promote: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "makeover_cli=info,makeover_core=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let store = DataStore::new(&cli.data_file);
    match cli.command {
        Commands::Data { action } => match action {
            DataAction::Init { force } => commands::data::init(&store, force).await?,
            DataAction::Check => commands::data::check(&store).await?,
        },
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => {
                commands::seed::products(&store, &file).await?;
            }
        },
        Commands::Migrate { target } => match target {
            MigrateTarget::Passwords => {
                commands::migrate::passwords(&store, cli.bcrypt_cost).await?;
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                first_name,
                last_name,
                password,
                promote,
            } => {
                let request = commands::admin::CreateAdmin {
                    email,
                    first_name,
                    last_name,
                    password,
                    promote,
                };
                commands::admin::create(&store, request, cli.bcrypt_cost).await?;
            }
        },
        Commands::Secret { bytes } => commands::secret::print(bytes),
    }
    Ok(())
}
