//! CLI administration tool for slug-shortener.
//!
//! Works directly against the PostgreSQL store, without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- shorten https://example.com
//!
//! # Show statistics for a slug
//! cargo run --bin admin -- stats aZ3kP9
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Show database info
//! cargo run --bin admin -- db info
//! ```
//!
//! # Environment Variables
//!
//! Same database settings as the server (`DATABASE_URL` or `DB_*`), plus the
//! slug allocation settings for `shorten`.

use slug_shortener::application::services::{AllocationService, StatsService};
use slug_shortener::config::{self, StoreBackend};
use slug_shortener::domain::repositories::RecordStore;
use slug_shortener::infrastructure::persistence::PgRecordStore;
use slug_shortener::server::connect_pool;
use slug_shortener::utils::slug_generator::{RandomSlugGenerator, SlugGenerator};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing slug-shortener.
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
    /// Allocate a slug for a target URL
    Shorten {
        /// Target URL, stored as given
        target_url: String,
    },

    /// Show statistics for a slug
    Stats {
        /// Slug to inspect
        slug: String,
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
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    if config.store_backend != StoreBackend::Postgres {
        anyhow::bail!("admin requires STORE_BACKEND=postgres");
    }

    let pool = connect_pool(&config).await?;
    let store: Arc<dyn RecordStore> = Arc::new(PgRecordStore::new(Arc::new(pool.clone())));

    match cli.command {
        Commands::Shorten { target_url } => {
            let generator: Arc<dyn SlugGenerator> = Arc::new(RandomSlugGenerator);
            let service = AllocationService::new(store, generator, config.allocation_policy());
            handle_shorten(&service, target_url).await?
        }
        Commands::Stats { slug } => handle_stats(&StatsService::new(store), &slug).await?,
        Commands::Db { action } => handle_db_action(action, &pool, store.as_ref()).await?,
    }

    Ok(())
}

/// Allocates a slug and prints the resulting short path.
async fn handle_shorten(service: &AllocationService, target_url: String) -> Result<()> {
    println!("{}", "🔗 Shorten URL".bright_blue().bold());
    println!();

    let record = service
        .allocate(target_url)
        .await
        .context("Failed to allocate slug")?;

    println!("  Slug:      {}", record.slug.bright_green().bold());
    println!("  Short URL: {}", format!("/{}", record.slug).cyan());
    println!("  Target:    {}", record.target_url.bright_white());
    println!();

    Ok(())
}

/// Prints target, click count and creation time for a slug.
async fn handle_stats(service: &StatsService, slug: &str) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let stats = service
        .stats(slug)
        .await
        .with_context(|| format!("No statistics for '{}'", slug))?;

    println!("  Slug:    {}", slug.cyan());
    println!("  Target:  {}", stats.target_url.bright_white());
    println!(
        "  Clicks:  {}",
        stats.clicks.to_string().bright_green().bold()
    );
    println!(
        "  Created: {}",
        stats
            .created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool, store: &dyn RecordStore) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let records = store
                .count()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to count records: {}", e))?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Records:    {}",
                records.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
