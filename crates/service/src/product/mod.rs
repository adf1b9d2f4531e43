//! Product CRUD access layer: repository traits, their store-backed and
//! in-memory implementations, and the per-operation services.

pub mod repository;
pub mod repo;
pub mod service;

pub use repo::{memory::InMemoryProductRepository, mongo::MongoProductRepository};
pub use repository::{
    CreateRepository, DeleteOutcome, DeleteRepository, ProductRepository, ReadRepository, UpdateOutcome,
    UpdateRepository,
};
pub use service::{build_update, CreateProductService, DeleteProductService, ReadProductService, UpdateProductService};
