use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use models::Product;
use service::product::{ReadProductService, ReadRepository};
use tracing::info;

use crate::errors::JsonApiError;

pub fn router<R: ReadRepository + 'static>(svc: Arc<ReadProductService<R>>) -> Router {
    Router::new().route("/products", get(list_products::<R>)).with_state(svc)
}

/// `GET /products`: every product, `[]` when there are none.
pub async fn list_products<R: ReadRepository + 'static>(
    State(svc): State<Arc<ReadProductService<R>>>,
) -> Result<Json<Vec<Product>>, JsonApiError> {
    let products = svc
        .get_all()
        .await
        .map_err(|e| JsonApiError::store("List Failed", "read", &e))?;
    info!(count = products.len(), "list products");
    Ok(Json(products))
}
