//! CLI administration tool for qr-manager.
//!
//! Provides commands for managing user accounts, viewing statistics,
//! and performing database operations without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a user (prompts for email and password)
//! cargo run --bin admin -- user create
//!
//! # List users
//! cargo run --bin admin -- user list
//!
//! # Clear a login lockout
//! cargo run --bin admin -- user unlock user@example.com
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
//! - `DATABASE_URL` (required): PostgreSQL connection string

use qr_manager::application::services::auth_service::{MAX_EMAIL_LENGTH, MIN_PASSWORD_LENGTH};
use qr_manager::domain::entities::NewUser;
use qr_manager::domain::repositories::UserRepository;
use qr_manager::infrastructure::persistence::PgUserRepository;
use qr_manager::utils::password::hash_password;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;
use validator::ValidateEmail;

/// CLI tool for managing qr-manager.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a verified user account
    Create {
        /// Account email (prompted if omitted)
        #[arg(short, long)]
        email: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all users
    List,

    /// Clear failed logins and lockout for an account
    Unlock {
        /// Account email
        email: String,
    },
}

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

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgUserRepository::new(Arc::new(pool.clone())));

    match action {
        UserAction::Create { email, yes } => create_user(repo, email, yes).await?,
        UserAction::List => list_users(repo).await?,
        UserAction::Unlock { email } => unlock_user(repo, email).await?,
    }

    Ok(())
}

/// Creates a user with interactive prompts.
///
/// The password is read without echo and confirmed; only its Argon2 hash is
/// stored. Accounts created here are marked verified.
async fn create_user(
    repo: Arc<PgUserRepository>,
    email: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let email = email.trim().to_string();

    if email.chars().count() > MAX_EMAIL_LENGTH || !email.validate_email() {
        anyhow::bail!("Invalid email: '{email}'");
    }

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        anyhow::bail!("Password must be at least {MIN_PASSWORD_LENGTH} characters");
    }

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Create user {email}?"))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    let user = repo
        .create(NewUser {
            email,
            password_hash,
            email_verified: true,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {e}"))?;

    println!();
    println!(
        "{} {}",
        "✅ User created with id".green().bold(),
        user.id.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Lists all users with status indicators.
///
/// ```text
/// 📋 Users
///
///   ID  Email                          Created              Status
///   ───────────────────────────────────────────────────────────────────────────
///   1   alice@example.com              2025-06-01 10:30     ACTIVE
///   2   bob@example.com                2025-06-02 14:20     LOCKED
/// ```
async fn list_users(repo: Arc<PgUserRepository>) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {e}"))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<3} {:<30} {:<20} {:<10}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for user in &users {
        let status = if !user.is_active {
            "INACTIVE".red()
        } else if user.is_locked() {
            "LOCKED".yellow()
        } else {
            "ACTIVE".green()
        };

        println!(
            "  {:<3} {:<30} {:<20} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn unlock_user(repo: Arc<PgUserRepository>, email: String) -> Result<()> {
    let unlocked = repo
        .unlock(email.trim())
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {e}"))?;

    if unlocked {
        println!("{} {}", "🔓 Unlocked".green().bold(), email.cyan());
    } else {
        println!("{} {}", "⚠️  No user with email".yellow(), email.cyan());
    }

    Ok(())
}

/// Displays system statistics.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let qr_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM qr_codes")
        .fetch_one(pool)
        .await?;

    let dynamic_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM qr_codes WHERE is_dynamic")
        .fetch_one(pool)
        .await?;

    let scans_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM qr_scan_logs")
        .fetch_one(pool)
        .await?;

    println!(
        "  Users:         {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  QR codes:      {}",
        qr_count.to_string().bright_green().bold()
    );
    println!(
        "  Dynamic:       {}",
        dynamic_count.to_string().bright_green().bold()
    );
    println!(
        "  Scans:         {}",
        scans_count.to_string().bright_green().bold()
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

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations applied: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
