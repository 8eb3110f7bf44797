//! Soundhaus CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! soundhaus migrate storefront
//!
//! # Run admin database migrations
//! soundhaus migrate admin
//!
//! # Run all database migrations
//! soundhaus migrate all
//!
//! # Create an admin user (prints a generated password unless one is given)
//! soundhaus admin create -e admin@soundhaus.shop -n "Store Admin"
//!
//! # Seed the catalog with demo products
//! soundhaus seed
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "soundhaus")]
#[command(author, version, about = "Soundhaus CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the catalog with demo products
    Seed,
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Run storefront database migrations
    Storefront,
    /// Run admin database migrations
    Admin,
    /// Run all database migrations
    All,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Password (a random one is generated and printed if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soundhaus_cli=info,sqlx=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Storefront => commands::migrate::storefront().await,
            MigrateTarget::Admin => commands::migrate::admin().await,
            MigrateTarget::All => commands::migrate::all().await,
        }
        .map_err(Into::into),
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
            } => commands::admin::create(&email, &name, password)
                .await
                .map_err(Into::into),
        },
        Commands::Seed => commands::seed::run().await.map_err(Into::into),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
