//! CLI commands

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};

use crate::config::Config;
use crate::db::{AdminRepository, Database};

#[derive(Parser)]
#[command(name = "sukhi-admin")]
#[command(about = "Admin backend for AI agent profiles and their prompts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.sukhi/config.yml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Database path, overrides DATABASE_URL
    #[arg(long, global = true)]
    database: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Interactively create an admin account
    CreateAdmin,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(database) = cli.database {
        config.database_url = database;
    }

    // Create a multi-threaded runtime for CLI operations
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        match cli.command {
            Commands::Serve { host, port } => {
                if let Some(host) = host {
                    config.server.host = host;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }
                crate::server::run(config).await
            }

            Commands::CreateAdmin => create_admin(&config).await,
        }
    })
}

/// Bootstrap an admin directly against storage
async fn create_admin(config: &Config) -> Result<()> {
    if config.database_url.trim().is_empty() {
        anyhow::bail!("DATABASE_URL is not set");
    }

    let db = Database::new(config.resolve_db_path()?)?;
    let admins = AdminRepository::new(db);

    println!("--- Create First Admin User ---");

    let username: String = Input::new()
        .with_prompt("Enter username")
        .interact_text()
        .context("Failed to read username")?;

    if admins.find_by_username(&username).await?.is_some() {
        println!("Admin with username '{}' already exists. Aborting.", username);
        return Ok(());
    }

    let password = Password::new()
        .with_prompt("Enter password")
        .interact()
        .context("Failed to read password")?;
    let password_confirm = Password::new()
        .with_prompt("Confirm password")
        .interact()
        .context("Failed to read password")?;

    if password != password_confirm {
        println!("Passwords do not match. Aborting.");
        return Ok(());
    }

    let admin = admins.create(&username, &password).await?;
    println!("Successfully created admin user: {}", admin.username);
    Ok(())
}
