use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    Collection, Database,
};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, error};

use models::{Product, ProductId, UpdateFields};

use super::with_timeout;
use crate::errors::ServiceError;
use crate::product::repository::{
    CreateRepository, DeleteOutcome, DeleteRepository, ReadRepository, UpdateOutcome, UpdateRepository,
};

pub const COLLECTION: &str = "products";

/// Stored shape of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    id: Option<ObjectId>,
    #[serde(default)]
    name: String,
    // Some legacy writers stored description as a number.
    #[serde(default, deserialize_with = "text_or_number")]
    description: String,
    #[serde(default)]
    price: f64,
    #[serde(default)]
    stock: i64,
}

fn text_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Bson::deserialize(d)? {
        Bson::String(s) => Ok(s),
        Bson::Int32(n) => Ok(n.to_string()),
        Bson::Int64(n) => Ok(n.to_string()),
        Bson::Double(n) => Ok(n.to_string()),
        Bson::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!("description: unexpected {:?}", other.element_type()))),
    }
}

impl ProductDoc {
    fn for_insert(p: &Product) -> Self {
        Self { id: None, name: p.name.clone(), description: p.description.clone(), price: p.price, stock: p.stock }
    }
}

impl From<ProductDoc> for Product {
    fn from(d: ProductDoc) -> Self {
        Product { id: d.id.map(ProductId::from), name: d.name, description: d.description, price: d.price, stock: d.stock }
    }
}

fn set_document(fields: &UpdateFields) -> Document {
    let mut set = Document::new();
    for (field, value) in fields.iter() {
        set.insert(field.as_str(), value.as_str());
    }
    set
}

/// MongoDB-backed repository over the `products` collection.
///
/// Holds one collection handle for the life of the process; the driver pools
/// connections underneath it. Every call is bounded by `op_timeout`.
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<ProductDoc>,
    op_timeout: Duration,
}

impl MongoProductRepository {
    pub fn new(db: &Database, op_timeout: Duration) -> Self {
        Self { collection: db.collection(COLLECTION), op_timeout }
    }

    fn log_failure(&self, op: &'static str, err: &ServiceError) {
        error!(op, err = %err, "store_call_failed");
    }
}

#[async_trait]
impl CreateRepository for MongoProductRepository {
    async fn create(&self, product: &Product) -> Result<(), ServiceError> {
        let doc = ProductDoc::for_insert(product);
        let res = with_timeout(self.op_timeout, self.collection.insert_one(&doc, None))
            .await
            .inspect_err(|e| self.log_failure("insert_one", e))?;
        debug!(id = ?res.inserted_id, "product_inserted");
        Ok(())
    }
}

#[async_trait]
impl ReadRepository for MongoProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, ServiceError> {
        let collection = &self.collection;
        let docs: Vec<ProductDoc> = with_timeout(self.op_timeout, async move {
            let cursor = collection.find(doc! {}, None).await?;
            Ok::<_, mongodb::error::Error>(cursor.try_collect::<Vec<_>>().await?)
        })
        .await
        .inspect_err(|e| self.log_failure("find", e))?;
        Ok(docs.into_iter().map(Product::from).collect())
    }
}

#[async_trait]
impl UpdateRepository for MongoProductRepository {
    async fn update_by_id(&self, id: &ProductId, fields: &UpdateFields) -> Result<UpdateOutcome, ServiceError> {
        if fields.is_empty() {
            // $set with an empty document is rejected by the server.
            debug!(%id, "empty_update_skipped");
            return Ok(UpdateOutcome::default());
        }
        let filter = doc! { "_id": id.as_object_id() };
        let update = doc! { "$set": set_document(fields) };
        let res = with_timeout(self.op_timeout, self.collection.update_one(filter, update, None))
            .await
            .inspect_err(|e| self.log_failure("update_one", e))?;
        Ok(UpdateOutcome { matched: res.matched_count, modified: res.modified_count })
    }
}

#[async_trait]
impl DeleteRepository for MongoProductRepository {
    async fn delete_by_id(&self, id: &ProductId) -> Result<DeleteOutcome, ServiceError> {
        let filter = doc! { "_id": id.as_object_id() };
        let res = with_timeout(self.op_timeout, self.collection.delete_one(filter, None))
            .await
            .inspect_err(|e| self.log_failure("delete_one", e))?;
        Ok(DeleteOutcome { deleted: res.deleted_count })
    }
}
