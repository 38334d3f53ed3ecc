use std::time::Duration;

use bson::doc;
use configs::DatabaseConfig;
use mongodb::{
    options::{ClientOptions, IndexOptions},
    Client, Database, IndexModel,
};
use tracing::info;

use crate::{admin, chat_history, customer, service_provider};

/// Open a client from config, select the configured database and ping it.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<Database> {
    let mut opts = ClientOptions::parse(&cfg.uri).await?;
    opts.app_name = Some(cfg.app_name.clone());
    opts.max_pool_size = Some(cfg.max_pool_size);
    opts.min_pool_size = Some(cfg.min_pool_size);
    opts.connect_timeout = Some(Duration::from_secs(cfg.connect_timeout_secs));
    let client = Client::with_options(opts)?;
    let db = client.database(&cfg.name);
    db.run_command(doc! { "ping": 1 }).await?;
    info!(database = %cfg.name, "connected to mongodb");
    Ok(db)
}

fn unique_email() -> IndexModel {
    IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

/// Create the indexes the queries rely on. Safe to run repeatedly.
pub async fn ensure_indexes(db: &Database) -> anyhow::Result<()> {
    admin::collection(db).create_index(unique_email()).await?;
    customer::collection(db).create_index(unique_email()).await?;
    service_provider::collection(db).create_index(unique_email()).await?;

    let chats = chat_history::collection(db);
    chats.create_index(IndexModel::builder().keys(doc! { "customer": 1 }).build()).await?;
    chats.create_index(IndexModel::builder().keys(doc! { "serviceProvider": 1 }).build()).await?;
    info!("indexes ensured");
    Ok(())
}
