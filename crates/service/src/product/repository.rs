use async_trait::async_trait;
use models::{Product, ProductId, UpdateFields};

use crate::errors::ServiceError;

/// Result of an update. Zero matches is a successful no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Result of a delete. Zero deletions is a successful no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted: u64,
}

#[async_trait]
pub trait CreateRepository: Send + Sync {
    /// Insert one record. Any `id` on the input is ignored; the store assigns one.
    async fn create(&self, product: &Product) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait ReadRepository: Send + Sync {
    /// Every record, fully materialized. An empty store yields an empty vec.
    async fn find_all(&self) -> Result<Vec<Product>, ServiceError>;
}

#[async_trait]
pub trait UpdateRepository: Send + Sync {
    /// Merge only the fields present in `fields` into the record with `id`.
    async fn update_by_id(&self, id: &ProductId, fields: &UpdateFields) -> Result<UpdateOutcome, ServiceError>;
}

#[async_trait]
pub trait DeleteRepository: Send + Sync {
    /// Remove at most one record with `id`.
    async fn delete_by_id(&self, id: &ProductId) -> Result<DeleteOutcome, ServiceError>;
}

/// A backend able to serve all four services.
pub trait ProductRepository: CreateRepository + ReadRepository + UpdateRepository + DeleteRepository {}

impl<T> ProductRepository for T where T: CreateRepository + ReadRepository + UpdateRepository + DeleteRepository {}
