use std::sync::Arc;

use pet_gateway::{telemetry, GatewayConfig, MemoryStore, MongoStore, PetStore, StoreBackend};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the process environment still applies.
    let _ = dotenvy::dotenv();
    let config = GatewayConfig::from_env()?;
    telemetry::init_tracing(config.log_format);

    let store: Arc<dyn PetStore> = match &config.store {
        StoreBackend::Mongo { uri } => {
            Arc::new(MongoStore::connect(uri, &config.database, &config.collection).await?)
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; records are lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let addr = config.socket_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, database = %config.database, collection = %config.collection, "listening");
    pet_gateway::run(listener, store).await?;
    Ok(())
}
