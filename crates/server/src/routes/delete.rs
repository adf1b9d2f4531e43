use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::delete,
    Json, Router,
};
use common::types::StatusReply;
use models::ProductId;
use service::product::{DeleteProductService, DeleteRepository};

use crate::errors::JsonApiError;

pub fn router<R: DeleteRepository + 'static>(svc: Arc<DeleteProductService<R>>) -> Router {
    Router::new()
        .route("/products/:id", delete(delete_product::<R>))
        .route("/products/", delete(super::empty_id))
        .with_state(svc)
}

/// `DELETE /products/{id}`: succeeds whether or not the product existed.
pub async fn delete_product<R: DeleteRepository + 'static>(
    State(svc): State<Arc<DeleteProductService<R>>>,
    Path(raw_id): Path<String>,
) -> Result<Json<StatusReply>, JsonApiError> {
    let id = ProductId::parse(&raw_id)?;
    svc.delete_product(&id)
        .await
        .map_err(|e| JsonApiError::store("Delete Failed", "delete", &e))?;
    Ok(Json(StatusReply::deleted()))
}
