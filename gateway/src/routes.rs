//! HTTP surface: one resource path, distinguished by method.

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use petbook_core::{DeleteSummary, Pet};

use crate::body;
use crate::error::GatewayError;
use crate::gateway::PetGateway;

pub fn routes(gateway: PetGateway) -> Router {
    Router::new()
        .route(
            "/pets",
            get(read_pets)
                .post(create_pet)
                .patch(update_pets)
                .delete(delete_pets),
        )
        .with_state(gateway)
}

async fn read_pets(
    State(gateway): State<PetGateway>,
    bytes: Bytes,
) -> Result<Json<Vec<Pet>>, GatewayError> {
    let filter = body::parse_filter(&bytes)?;
    Ok(Json(gateway.read(filter).await?))
}

async fn create_pet(
    State(gateway): State<PetGateway>,
    bytes: Bytes,
) -> Result<Json<Pet>, GatewayError> {
    let pet = body::parse_pet(&bytes)?;
    Ok(Json(gateway.create(pet).await?))
}

async fn update_pets(
    State(gateway): State<PetGateway>,
    bytes: Bytes,
) -> Result<Json<Vec<Pet>>, GatewayError> {
    let (filter, update) = body::parse_update_pair(&bytes)?;
    Ok(Json(gateway.update(filter, update).await?))
}

async fn delete_pets(
    State(gateway): State<PetGateway>,
    bytes: Bytes,
) -> Result<Json<DeleteSummary>, GatewayError> {
    let filter = body::parse_filter(&bytes)?;
    Ok(Json(gateway.delete(filter).await?))
}
