//! Product entity, its identifier and the partial update field set, plus
//! the MongoDB connection bootstrap shared by every service.

pub mod errors;
pub mod db;
pub mod product;

pub use product::{Product, ProductField, ProductId, UpdateFields};
