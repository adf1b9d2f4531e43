//! Service layer for the product services.
//! - One orchestration type per operation, each holding only a repository handle.
//! - Repository traits separate the services from MongoDB so tests can swap in memory.
//! - Store errors travel back to the caller unchanged.

pub mod errors;
pub mod product;

pub use errors::ServiceError;
