//! PetBook record gateway.
//!
//! # Overview
//! Exposes create/read/update/delete over one collection of pet records at
//! `/pets`, translating request bodies into store filter and update
//! expressions. The store sits behind the `PetStore` trait: `MongoStore` in
//! production, `MemoryStore` for tests and local runs.

pub mod body;
pub mod config;
pub mod error;
pub mod gateway;
pub mod record;
pub mod routes;
pub mod store;
pub mod telemetry;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, GatewayConfig, LogFormat, StoreBackend};
pub use error::GatewayError;
pub use gateway::PetGateway;
pub use store::{MemoryStore, MongoStore, PetStore, StoreError};

pub fn app(store: Arc<dyn PetStore>) -> Router {
    routes::routes(PetGateway::new(store)).layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener, store: Arc<dyn PetStore>) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}
