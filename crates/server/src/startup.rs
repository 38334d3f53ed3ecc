use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::auth::repo::mongo::MongoAuthRepository;
use service::records::repo::mongo::MongoRecordRepository;

use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(err = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Connect to MongoDB, build the app and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if let Err(e) = models::db::ensure_indexes(&db).await {
        // existing data may violate a unique index; serving reads still works
        warn!(err = %e, "index bootstrap failed");
    }

    let state = ServerState::new(
        Arc::new(MongoAuthRepository { db: db.clone() }),
        Arc::new(MongoRecordRepository::new(db)),
        &cfg.auth,
    );
    let app: Router = routes::build_router(state, build_cors());

    let addr: SocketAddr = cfg.bind_addr().parse()?;
    info!(%addr, database = %cfg.database.name, "starting admin panel server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}
