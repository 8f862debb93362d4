//! CLI administration tool for rankwire.
//!
//! Provides commands for managing accounts and API tokens, backfilling press
//! release identifiers, viewing statistics, and performing database
//! operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Register an account
//! cargo run --bin admin -- user create alice --name "Alice" --email alice@example.com
//!
//! # Create a new API token for it
//! cargo run --bin admin -- token create --user alice
//!
//! # List all tokens
//! cargo run --bin admin -- token list
//!
//! # Revoke a token
//! cargo run --bin admin -- token revoke "Production API"
//!
//! # Assign identifiers to releases stored without one
//! cargo run --bin admin -- releases backfill-ids --dry-run
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`, or the `DB_*` components the server also accepts
//! - `TOKEN_SIGNING_SECRET` (required for `token create`): must match the server's

use rankwire::application::services::PressReleaseService;
use rankwire::config::DatabaseConfig;
use rankwire::application::services::auth_service::hash_token;
use rankwire::domain::identifier::{PrId, max_identifier};
use rankwire::domain::repositories::{PressReleaseRepository, TokenRepository};
use rankwire::infrastructure::persistence::{
    PgEntityRepository, PgPressReleaseRepository, PgTokenRepository,
};
use rankwire::utils::id_generator::generate_id;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing rankwire.
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
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Press release maintenance
    Releases {
        #[command(subcommand)]
        action: ReleasesAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Account management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Register a new account
    Create {
        /// Account id (generated if omitted)
        id: Option<String>,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Contact email
        #[arg(short, long)]
        email: Option<String>,
    },

    /// List all accounts
    List,
}

/// Token management subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token
    Create {
        /// Account the token authenticates as
        #[arg(short, long)]
        user: String,

        /// Token name (e.g., "Production API", "CMS integration")
        #[arg(short, long)]
        name: Option<String>,

        /// Custom token value (optional, auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

/// Press release maintenance subcommands.
#[derive(Subcommand)]
enum ReleasesAction {
    /// Assign `pr_id` to releases that do not have one, oldest first
    BackfillIds {
        /// Only report what would be assigned
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
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
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database = DatabaseConfig::from_env()?;

    let pool = database
        .pool_options()
        .max_connections(2)
        .connect(&database.url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Releases { action } => handle_releases_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches account commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    match action {
        UserAction::Create { id, name, email } => create_user(pool, id, name, email).await,
        UserAction::List => list_users(pool).await,
    }
}

async fn create_user(
    pool: &PgPool,
    id: Option<String>,
    name: Option<String>,
    email: Option<String>,
) -> Result<()> {
    println!("{}", "👤 Create Account".bright_blue().bold());
    println!();

    let id = id.unwrap_or_else(generate_id);

    sqlx::query("INSERT INTO users (id, name, email) VALUES ($1, $2, $3)")
        .bind(&id)
        .bind(&name)
        .bind(&email)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to create account '{id}'"))?;

    println!("{}", "✅ Account created".green().bold());
    println!("  ID:    {}", id.cyan());
    if let Some(name) = name {
        println!("  Name:  {}", name);
    }
    if let Some(email) = email {
        println!("  Email: {}", email);
    }
    println!();
    println!(
        "  Create a token with: {} admin -- token create --user {}",
        "cargo run --bin".bright_cyan(),
        id
    );

    Ok(())
}

async fn list_users(pool: &PgPool) -> Result<()> {
    println!("{}", "👥 Accounts".bright_blue().bold());
    println!();

    let users: Vec<(String, Option<String>, Option<String>)> =
        sqlx::query_as("SELECT id, name, email FROM users ORDER BY created_at")
            .fetch_all(pool)
            .await?;

    if users.is_empty() {
        println!("{}", "  No accounts found".yellow());
        return Ok(());
    }

    println!(
        "  {:<16} {:<24} {}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Email".bright_white().bold()
    );
    println!("  {}", "─".repeat(70).bright_black());

    for (id, name, email) in &users {
        println!(
            "  {:<16} {:<24} {}",
            id.cyan(),
            name.as_deref().unwrap_or("-"),
            email.as_deref().unwrap_or("-").bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Dispatches token management commands.
async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgTokenRepository::new(Arc::new(pool.clone())));

    match action {
        TokenAction::Create {
            user,
            name,
            token,
            yes,
        } => {
            create_token(repo, user, name, token, yes).await?;
        }
        TokenAction::List => {
            list_tokens(repo).await?;
        }
        TokenAction::Revoke { name_or_id } => {
            revoke_token(repo, name_or_id).await?;
        }
    }

    Ok(())
}

/// Creates a new API token with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for token name (or use provided)
/// 2. Generate random token or use provided value
/// 3. Display token details with warning
/// 4. Confirm creation (unless `--yes` flag)
/// 5. Hash token with HMAC-SHA256 keyed by `TOKEN_SIGNING_SECRET`
/// 6. Store in database
///
/// # Security
///
/// - Only the keyed hash is stored in the database
/// - Raw token is displayed once and cannot be retrieved later
/// - Tokens are 48 characters (alphanumeric) for high entropy
async fn create_token(
    repo: Arc<PgTokenRepository>,
    user_id: String,
    name: Option<String>,
    token: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    let signing_secret = std::env::var("TOKEN_SIGNING_SECRET")
        .ok()
        .filter(|s| !s.is_empty())
        .context("TOKEN_SIGNING_SECRET must be set to the server's value")?;

    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Production API")
            .interact_text()?,
    };

    let token_value = match token {
        Some(t) => {
            println!("{}", "⚠️  Using provided token value".yellow());
            t
        }
        None => {
            let generated = generate_token();
            println!("{}", "✨ Generated new token".green());
            generated
        }
    };

    println!();
    println!("{}", "Token details:".bright_white().bold());
    println!("  User:  {}", user_id.cyan());
    println!("  Name:  {}", token_name.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = hash_token(&signing_secret, &token_value);

    repo.create_token(&user_id, &token_name, &token_hash)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!();
    println!("{}", "✅ Token created successfully!".green().bold());
    println!();
    println!("{}", "Add this to your requests:".bright_white());
    println!(
        "  {}: Bearer {}",
        "Authorization".bright_cyan(),
        token_value.bright_yellow()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/press-releases",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

/// Lists all API tokens with status indicators.
///
/// # Output Format
///
/// ```text
/// 📋 API Tokens
///
///   ID  User             Name                           Created              Status
///   ───────────────────────────────────────────────────────────────────────────────
///   1   alice            Production API                 2024-01-15 10:30     ACTIVE
///   2   alice            CMS integration                2024-01-16 14:20     REVOKED
/// ```
async fn list_tokens(repo: Arc<PgTokenRepository>) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        println!();
        println!(
            "  Create one with: {} admin -- token create --user <id>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<3} {:<16} {:<30} {:<20} {:<10}",
        "ID".bright_white().bold(),
        "User".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(92).bright_black());

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };

        println!(
            "  {:<3} {:<16} {:<30} {:<20} {}",
            token.id.to_string().bright_black(),
            token.user_id,
            token.name.cyan(),
            token
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        tokens.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Revokes a token by name or ID with confirmation prompt.
///
/// Numeric input is looked up by ID, anything else by exact name.
async fn revoke_token(repo: Arc<PgTokenRepository>, name_or_id: String) -> Result<()> {
    println!("{}", "🔒 Revoke API Token".bright_blue().bold());
    println!();

    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo
            .find_by_id(id)
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?,
        Err(_) => repo
            .find_by_name(&name_or_id)
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?,
    };

    let token = token.context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "⚠️  This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  User:  {}", token.user_id);
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!();
    println!("{}", "✅ Token revoked successfully!".green().bold());
    println!();

    Ok(())
}

/// Dispatches press release maintenance commands.
async fn handle_releases_action(action: ReleasesAction, pool: &PgPool) -> Result<()> {
    match action {
        ReleasesAction::BackfillIds { dry_run, yes } => backfill_ids(pool, dry_run, yes).await,
    }
}

/// Assigns identifiers to releases created without one.
///
/// Numbering continues from the numerically largest stored identifier, so
/// `RW99999` is followed by `RW100000`.
async fn backfill_ids(pool: &PgPool, dry_run: bool, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔢 Backfill Press Release Identifiers".bright_blue().bold());
    println!();

    let pool = Arc::new(pool.clone());
    let releases = Arc::new(PgPressReleaseRepository::new(pool.clone()));
    let entities = Arc::new(PgEntityRepository::new(pool));

    let pending = releases
        .list_without_identifier()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list releases: {}", e))?;

    if pending.is_empty() {
        println!("{}", "✅ Every press release already has an identifier".green());
        return Ok(());
    }

    let stored = releases
        .list_identifiers()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list identifiers: {}", e))?;
    let first = match max_identifier(stored.iter().map(String::as_str))? {
        Some(max) => max.successor()?,
        None => PrId::FIRST,
    };

    println!(
        "  Releases without identifier: {}",
        pending.len().to_string().bright_white().bold()
    );
    println!("  Numbering starts at:         {}", first.to_string().cyan());
    println!();

    if dry_run {
        let mut next = first;
        for release in &pending {
            println!(
                "  {} {} {}",
                next.to_string().cyan(),
                release.id.bright_black(),
                release.content.headline
            );
            next = next.successor()?;
        }
        println!();
        println!("{}", "ℹ️  Dry run, nothing was written".yellow());
        return Ok(());
    }

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Assign identifiers now?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let service = PressReleaseService::new(releases, entities);
    let assigned = service
        .backfill_identifiers()
        .await
        .map_err(|e| anyhow::anyhow!("Backfill failed: {}", e))?;

    for (id, pr_id) in &assigned {
        println!("  {} {}", pr_id.cyan(), id.bright_black());
    }

    println!();
    println!(
        "{} {}",
        "✅ Identifiers assigned:".green().bold(),
        assigned.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Displays system statistics.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let entities_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entities")
        .fetch_one(pool)
        .await?;

    let by_status: Vec<(String, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*) FROM press_releases GROUP BY status ORDER BY status",
    )
    .fetch_all(pool)
    .await?;

    let missing_ids: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM press_releases WHERE pr_id IS NULL")
            .fetch_one(pool)
            .await?;

    let tokens_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool)
            .await?;

    println!(
        "  Accounts:       {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Entities:       {}",
        entities_count.to_string().bright_green().bold()
    );
    for (status, count) in &by_status {
        println!(
            "  {:<15} {}",
            format!("Releases ({status}):"),
            count.to_string().bright_green().bold()
        );
    }
    if missing_ids > 0 {
        println!(
            "  Without pr_id:  {}",
            missing_ids.to_string().yellow().bold()
        );
    }
    println!(
        "  Active tokens:  {}",
        tokens_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
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

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

/// Generates a cryptographically random token.
///
/// # Format
///
/// - Length: 48 characters
/// - Character set: A-Z, a-z, 0-9
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
