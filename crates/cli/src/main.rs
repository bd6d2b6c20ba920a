//! Agenda CLI - Schema initialization and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Initialize the database schema (idempotent, independent of the server)
//! agenda-cli init-db
//!
//! # Provision an account from the command line
//! agenda-cli create-user -n "Alice" -e alice@example.com -p secret123
//! ```
//!
//! # Commands
//!
//! - `init-db` - Create tables and indexes if they don't exist
//! - `create-user` - Register a user account

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "agenda-cli")]
#[command(author, version, about = "Agenda CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema (safe to re-run)
    InitDb,
    /// Create a new user account
    CreateUser {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address (unique)
        #[arg(short, long)]
        email: String,

        /// Plaintext password (hashed before storage)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::InitDb => commands::init_db::run().await?,
        Commands::CreateUser {
            name,
            email,
            password,
        } => {
            commands::create_user::run(&name, &email, &password).await?;
        }
    }
    Ok(())
}
