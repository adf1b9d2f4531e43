use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Json, Router};
use models::Product;
use service::product::{CreateProductService, CreateRepository};
use tracing::info;

use crate::errors::JsonApiError;

pub fn router<R: CreateRepository + 'static>(svc: Arc<CreateProductService<R>>) -> Router {
    Router::new().route("/products", post(create_product::<R>)).with_state(svc)
}

/// `POST /products`: 201 with the decoded product echoed back.
///
/// A client-supplied id is dropped; the store assigns its own.
pub async fn create_product<R: CreateRepository + 'static>(
    State(svc): State<Arc<CreateProductService<R>>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Product>), JsonApiError> {
    let mut product: Product = serde_json::from_slice(&body).map_err(|e| JsonApiError::invalid_json(&e))?;
    product.id = None;
    info!(name = %product.name, price = product.price, stock = product.stock, "product_create_request");
    svc.create(&product)
        .await
        .map_err(|e| JsonApiError::store("Create Failed", "create", &e))?;
    Ok((StatusCode::CREATED, Json(product)))
}
