//! CLI administration tool for urlmap.
//!
//! Lists, creates and resolves short links and checks store connectivity
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List all records
//! cargo run --bin admin -- list
//!
//! # Create a record (prompts for the URL when omitted)
//! cargo run --bin admin -- create https://example.com
//!
//! # Print the destination of a token
//! cargo run --bin admin -- resolve 3f2a9c01b7de
//!
//! # Check store connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see `urlmap::config::Config`.

use urlmap::application::services::Registry;
use urlmap::config;
use urlmap::server::build_registry;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;

/// CLI tool for managing urlmap.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// List all short links
    List,

    /// Create a short link
    Create {
        /// Destination URL (prompted for if omitted)
        url: Option<String>,
    },

    /// Print the destination of a token
    Resolve {
        /// Short token
        token: String,
    },

    /// Store operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Store operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check store connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let registry = build_registry(&config).await?;

    match cli.command {
        Commands::List => list_urls(&registry).await?,
        Commands::Create { url } => create_url(&registry, url).await?,
        Commands::Resolve { token } => resolve_token(&registry, &token).await?,
        Commands::Db { action } => match action {
            DbAction::Check => check_store(&registry).await?,
        },
    }

    Ok(())
}

/// Prints every stored record as a table.
async fn list_urls(registry: &Registry) -> Result<()> {
    println!("{}", "Short links".bright_blue().bold());
    println!();

    let records = registry.list_all().await?;

    if records.is_empty() {
        println!("{}", "  No records found".yellow());
        println!();
        println!(
            "  Create one with: {} admin create <URL>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<14} {:<38} {}",
        "Token".bright_white().bold(),
        "ID".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "-".repeat(90).bright_black());

    for record in &records {
        println!(
            "  {:<14} {:<38} {}",
            record.shortened.cyan(),
            record.id.to_string().bright_black(),
            record.url
        );
    }

    println!();
    println!(
        "  Total: {}",
        records.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Creates a record, prompting for the URL when not given.
async fn create_url(registry: &Registry, url: Option<String>) -> Result<()> {
    println!("{}", "Create short link".bright_blue().bold());
    println!();

    let url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Destination URL")
            .interact_text()?,
    };

    let record = registry.create(url).await?;

    println!("{}", "Created".green().bold());
    println!();
    println!("  ID:    {}", record.id.to_string().bright_black());
    println!("  URL:   {}", record.url);
    println!("  Token: {}", record.shortened.bright_yellow().bold());
    println!();

    Ok(())
}

/// Prints the destination stored under `token`.
async fn resolve_token(registry: &Registry, token: &str) -> Result<()> {
    let record = registry.get_by_token(token).await?;

    println!("  {} -> {}", record.shortened.cyan(), record.url);

    Ok(())
}

/// Verifies the store answers a trivial query.
async fn check_store(registry: &Registry) -> Result<()> {
    println!("{}", "Checking store connection...".bright_blue());

    match registry.ping().await {
        Ok(()) => {
            println!("{}", "Store connection OK".green().bold());
            Ok(())
        }
        Err(e) => {
            println!("{}", "Store connection failed".red().bold());
            Err(e.into())
        }
    }
}
