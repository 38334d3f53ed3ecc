//! Out-of-band admin tooling: seed admin accounts and create indexes.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing::info;

use service::auth::domain::CreateAdminInput;
use service::auth::repo::mongo::MongoAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::auth::TokenService;

#[derive(Parser)]
#[command(name = "admin-cli", version, about = "Admin panel maintenance commands")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Create the collection indexes the server relies on
    Indexes,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create an admin with an argon2-hashed password
    Create {
        #[arg(long)]
        email: String,
        /// Falls back to ADMIN_PASSWORD
        #[arg(long)]
        password: Option<String>,
    },
}

fn load_database() -> anyhow::Result<configs::DatabaseConfig> {
    // a missing file resolves from the environment; a broken one is reported
    let cfg = configs::load_default().context("load config")?.database;
    cfg.validate()?;
    Ok(cfg)
}

async fn create_admin(email: String, password: Option<String>) -> anyhow::Result<()> {
    let password = password
        .or_else(|| std::env::var("ADMIN_PASSWORD").ok())
        .ok_or_else(|| anyhow!("pass --password or set ADMIN_PASSWORD"))?;
    let db = models::db::connect_with_config(&load_database()?).await?;
    // only hashing and storage are used here; the token key is never exercised
    let svc = AuthService::new(
        Arc::new(MongoAuthRepository { db }),
        TokenService::new("admin-cli", 1),
        AuthConfig::default(),
    );
    let admin = svc
        .create_admin(CreateAdminInput { email, password })
        .await
        .context("create admin")?;
    info!(admin_id = %admin.id, email = %admin.email, "admin created");
    println!("{}", admin.id);
    Ok(())
}

async fn create_indexes() -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&load_database()?).await?;
    models::db::ensure_indexes(&db).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_default();
    let cli = Cli::parse();
    match cli.command {
        Command::Admin { action: AdminAction::Create { email, password } } => {
            create_admin(email, password).await
        }
        Command::Indexes => create_indexes().await,
    }
}
