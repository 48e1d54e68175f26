//! CLI administration tool for redirect-gateway.
//!
//! Manages redirect records without going through the HTTP API. Writes go
//! through the same cache-aside service as the server, so cached entries are
//! invalidated exactly as an HTTP update would.
//!
//! # Usage
//!
//! ```bash
//! # List all redirects
//! cargo run --bin admin -- list
//!
//! # Show one redirect
//! cargo run --bin admin -- show 3f2a...
//!
//! # Create a proxied redirect for a host
//! cargo run --bin admin -- create --destination https://internal:8443/app --dns app.example.com --proxy
//!
//! # Remove a redirect
//! cargo run --bin admin -- remove 3f2a... --yes
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`redirect_gateway::config`].

use redirect_gateway::application::services::RedirectService;
use redirect_gateway::config::{self, Config};
use redirect_gateway::domain::entities::Redirect;
use redirect_gateway::infrastructure::cache::{CacheService, NullCache, RedisCache};
use redirect_gateway::infrastructure::persistence::PgRedirectRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing redirect-gateway.
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
    /// List all redirects
    List,

    /// Show a single redirect
    Show {
        /// Redirect id
        id: String,
    },

    /// Create a redirect
    Create {
        /// Absolute destination URL
        #[arg(short, long)]
        destination: String,

        /// Host name matched during implicit resolution
        #[arg(long)]
        dns: Option<String>,

        /// Relay the exchange instead of answering with a 307
        #[arg(short, long)]
        proxy: bool,

        /// Fixed id (generated if omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// Remove a redirect
    Remove {
        /// Redirect id
        id: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
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
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::List => list_redirects(&build_service(&config, pool).await?).await?,
        Commands::Show { id } => show_redirect(&build_service(&config, pool).await?, &id).await?,
        Commands::Create {
            destination,
            dns,
            proxy,
            id,
        } => {
            let service = build_service(&config, pool).await?;
            create_redirect(&service, destination, dns, proxy, id).await?;
        }
        Commands::Remove { id, yes } => {
            remove_redirect(&build_service(&config, pool).await?, &id, yes).await?;
        }
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn build_service(config: &Config, pool: PgPool) -> Result<RedirectService> {
    let cache: Arc<dyn CacheService> = match &config.redis_url {
        Some(url) => match RedisCache::connect(url).await {
            Ok(redis) => Arc::new(redis),
            Err(e) => {
                println!(
                    "{}",
                    format!("⚠️  Redis unavailable ({e}); cached entries will expire by TTL")
                        .yellow()
                );
                Arc::new(NullCache::new())
            }
        },
        None => Arc::new(NullCache::new()),
    };

    let repository = Arc::new(PgRedirectRepository::new(
        Arc::new(pool),
        config.timezone()?,
    ));

    Ok(RedirectService::new(
        repository,
        cache,
        config.cache_key_prefix.clone(),
        config.cache_ttl_seconds,
    ))
}

/// Lists all redirects.
///
/// # Output Format
///
/// ```text
/// 📋 Redirects
///
///   ID                                 DNS                       Mode      Destination
///   ─────────────────────────────────────────────────────────────────────────────────
///   3f2a9c...                          app.example.com           PROXY     https://internal:8443/app
/// ```
async fn list_redirects(service: &RedirectService) -> Result<()> {
    println!("{}", "📋 Redirects".bright_blue().bold());
    println!();

    let redirects = service
        .get_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list redirects: {}", e))?;

    if redirects.is_empty() {
        println!("{}", "  No redirects found".yellow());
        println!();
        println!(
            "  Create one with: {} admin create --destination <url>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<34} {:<25} {:<9} {}",
        "ID".bright_white().bold(),
        "DNS".bright_white().bold(),
        "Mode".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "─".repeat(100).bright_black());

    for redirect in &redirects {
        println!(
            "  {:<34} {:<25} {:<9} {}",
            redirect.id.bright_black(),
            redirect.dns().unwrap_or("-").cyan(),
            mode_label(redirect),
            redirect.destination
        );
    }

    println!();
    println!(
        "  Total: {}",
        redirects.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn show_redirect(service: &RedirectService, id: &str) -> Result<()> {
    let redirect = service
        .get(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load redirect: {}", e))?;

    println!("{}", "🔎 Redirect".bright_blue().bold());
    println!();
    print_details(&redirect);

    Ok(())
}

async fn create_redirect(
    service: &RedirectService,
    destination: String,
    dns: Option<String>,
    proxy: bool,
    id: Option<String>,
) -> Result<()> {
    url::Url::parse(&destination).context("Destination must be an absolute URL")?;

    let mut redirect = Redirect::new(destination, dns, proxy);
    if let Some(id) = id {
        redirect.id = id;
    }

    let saved = service
        .save(redirect)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create redirect: {}", e))?;

    println!("{}", "✅ Redirect saved".green().bold());
    println!();
    print_details(&saved);

    Ok(())
}

/// Removes a redirect, asking for confirmation unless `--yes` is given.
async fn remove_redirect(service: &RedirectService, id: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Remove Redirect".bright_blue().bold());
    println!();

    let redirect = service
        .get(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load redirect: {}", e))?;

    print_details(&redirect);

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Remove this redirect?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .remove(&redirect)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to remove redirect: {}", e))?;

    println!();
    println!("{}", "✅ Redirect removed".green().bold());
    println!();

    Ok(())
}

fn print_details(redirect: &Redirect) {
    println!("  ID:          {}", redirect.id.cyan());
    println!("  DNS:         {}", redirect.dns().unwrap_or("-"));
    println!("  Destination: {}", redirect.destination.bright_white());
    println!("  Mode:        {}", mode_label(redirect));
    if let Some(created_at) = redirect.created_at {
        println!(
            "  Created:     {}",
            created_at.format("%Y-%m-%d %H:%M %:z").to_string().bright_black()
        );
    }
    if let Some(updated_at) = redirect.updated_at {
        println!(
            "  Updated:     {}",
            updated_at.format("%Y-%m-%d %H:%M %:z").to_string().bright_black()
        );
    }
    println!();
}

fn mode_label(redirect: &Redirect) -> ColoredString {
    if redirect.proxy {
        "PROXY".magenta()
    } else {
        "307".green()
    }
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM redirects")
                .fetch_one(pool)
                .await
                .context("Database reachable but the redirects table is missing; start the server once to migrate")?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  Redirects: {}", count.to_string().bright_green().bold());
        }
    }

    Ok(())
}
