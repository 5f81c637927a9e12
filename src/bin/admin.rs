//! CLI administration tool for shortify.
//!
//! Inspects links, client quotas and store connectivity directly in Redis,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show where an alias points, its remaining lifetime and access count
//! cargo run --bin admin -- link Ab3_x9
//!
//! # Show a client's remaining quota
//! cargo run --bin admin -- quota 203.0.113.5
//!
//! # Check Redis connectivity for both namespaces
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Reads the same variables as the server (`DB_ADDR`, `DB_PASS`, `DOMAIN`,
//! `API_QUOTA`), optionally from a `.env` file.

use shortify::application::services::{LinkService, RateLimitService};
use shortify::config::{self, Config, mask_connection_string};
use shortify::infrastructure::store::{KeyValueStore, Namespace, RedisStore};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;
use std::time::Duration;

/// CLI tool for inspecting shortify's store.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show a short link
    Link {
        /// Alias to look up
        alias: String,
    },

    /// Show a client's shorten quota
    Quota {
        /// Client IP as seen by the server
        ip: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check Redis connection for both namespaces
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    match cli.command {
        Commands::Link { alias } => handle_link(&config, &alias).await?,
        Commands::Quota { ip } => handle_quota(&config, &ip).await?,
        Commands::Db { action } => handle_db_action(&config, action).await?,
    }

    Ok(())
}

async fn connect(config: &Config, namespace: Namespace) -> Result<Arc<dyn KeyValueStore>> {
    let url = config.redis_url(namespace)?;
    let store = RedisStore::connect(&url, namespace)
        .await
        .with_context(|| format!("Failed to connect to {}", mask_connection_string(&url)))?;
    Ok(Arc::new(store))
}

/// Prints target, remaining TTL and access count of one alias.
async fn handle_link(config: &Config, alias: &str) -> Result<()> {
    println!("{}", "🔗 Short Link".bright_blue().bold());
    println!();

    let service = LinkService::new(
        connect(config, Namespace::Links).await?,
        connect(config, Namespace::Counters).await?,
        config.domain.clone(),
    );

    let Some(details) = service.details(alias).await? else {
        println!("{}", format!("  No live link for '{}'", alias).yellow());
        println!();
        return Ok(());
    };

    println!("  Short:     {}", details.short_url.cyan());
    println!("  Target:    {}", details.url.bright_white());
    println!("  Expires:   {}", format_ttl(details.ttl).bright_white());
    println!(
        "  Accesses:  {}",
        details.access_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Prints the remaining quota of one client.
async fn handle_quota(config: &Config, ip: &str) -> Result<()> {
    println!("{}", "⏱️  Client Quota".bright_blue().bold());
    println!();

    let service = RateLimitService::new(
        connect(config, Namespace::Counters).await?,
        config.api_quota,
    );

    match service.status(ip).await? {
        Some(status) => {
            let remaining = if status.is_exhausted() {
                status.remaining.to_string().red().bold()
            } else {
                status.remaining.to_string().bright_green().bold()
            };

            println!("  Client:     {}", ip.cyan());
            println!("  Remaining:  {} of {}", remaining, service.quota());
            println!(
                "  Resets in:  {} min",
                status.reset_minutes().to_string().bright_white()
            );
        }
        None => {
            println!(
                "{}",
                format!("  No open window for {} (full quota of {})", ip, service.quota())
                    .yellow()
            );
        }
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(config: &Config, action: DbAction) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking Redis connection...".bright_blue());

            for namespace in [Namespace::Links, Namespace::Counters] {
                let store = connect(config, namespace).await?;
                store.ping().await?;

                println!(
                    "  {} {:?} (db {})",
                    "✓".green(),
                    namespace,
                    namespace.index()
                );
            }

            println!("{}", "✅ Redis connection OK".green().bold());
        }
    }

    Ok(())
}

fn format_ttl(ttl: Option<Duration>) -> String {
    match ttl {
        Some(ttl) => {
            let secs = ttl.as_secs();
            format!("in {}h {}m", secs / 3600, (secs % 3600) / 60)
        }
        None => "never".to_string(),
    }
}
