use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::put,
    Json, Router,
};
use common::types::StatusReply;
use models::ProductId;
use serde::Deserialize;
use service::product::{UpdateProductService, UpdateRepository};

use crate::errors::JsonApiError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProductInput {
    pub name: String,
    pub description: String,
}

pub fn router<R: UpdateRepository + 'static>(svc: Arc<UpdateProductService<R>>) -> Router {
    Router::new()
        .route("/products/:id", put(update_product::<R>))
        .route("/products/", put(super::empty_id))
        .with_state(svc)
}

/// `PUT /products/{id}`: id is checked before the body.
pub async fn update_product<R: UpdateRepository + 'static>(
    State(svc): State<Arc<UpdateProductService<R>>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<StatusReply>, JsonApiError> {
    let id = ProductId::parse(&raw_id)?;
    let input: UpdateProductInput = serde_json::from_slice(&body).map_err(|e| JsonApiError::invalid_json(&e))?;
    svc.update_product(&id, &input.name, &input.description)
        .await
        .map_err(|e| JsonApiError::store("Update Failed", "update", &e))?;
    Ok(Json(StatusReply::updated()))
}
