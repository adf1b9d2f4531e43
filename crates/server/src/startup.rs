use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::types::ServiceKind;
use configs::AppConfig;
use service::product::MongoProductRepository;
use tokio::net::TcpListener;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;

fn load_bind_addr(cfg: &AppConfig, kind: ServiceKind) -> Result<SocketAddr, StartupError> {
    let raw = cfg.bind_addr(kind);
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {raw}: {e}")))
}

/// Connect to the store, build the service's router and serve until Ctrl+C.
///
/// The store is pinged before the listener is bound, so an unreachable
/// store stops the process before it accepts any traffic.
pub async fn run(kind: ServiceKind, cfg: AppConfig) -> Result<(), StartupError> {
    let addr = load_bind_addr(&cfg, kind)?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    let repo = Arc::new(MongoProductRepository::new(&db, cfg.database.op_timeout()));
    let app: Router = routes::build_router(kind, repo);

    let listener = TcpListener::bind(addr).await?;
    info!(service = %kind, %addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(kind))
        .await?;
    Ok(())
}

async fn shutdown_signal(kind: ServiceKind) {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(service = %kind, event = "shutdown_signal", "received Ctrl+C, shutting down");
    }
}
