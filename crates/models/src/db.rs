use configs::DatabaseConfig;
use mongodb::{bson::doc, options::ClientOptions, Client, Database};
use tracing::info;

use crate::errors::ModelError;

/// Connect to the store and verify it answers a ping.
///
/// Runs once at process start; any failure here is fatal to the caller.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> Result<Database, ModelError> {
    let mut opts = ClientOptions::parse(cfg.connection_uri())
        .await
        .map_err(|e| ModelError::Config(e.to_string()))?;
    opts.connect_timeout = Some(cfg.connect_timeout());
    opts.server_selection_timeout = Some(cfg.connect_timeout());
    opts.app_name = Some("products-api".to_string());

    let client = Client::with_options(opts).map_err(|e| ModelError::Connect(e.to_string()))?;
    let db = client.database(&cfg.name);

    match tokio::time::timeout(cfg.ping_timeout(), db.run_command(doc! { "ping": 1 }, None)).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => return Err(ModelError::Connect(format!("cannot ping MongoDB: {e}"))),
        Err(_) => {
            return Err(ModelError::Connect(format!(
                "cannot ping MongoDB: no answer within {:?}",
                cfg.ping_timeout()
            )))
        }
    }
    info!(database = %cfg.name, "mongodb_connected");
    Ok(db)
}
