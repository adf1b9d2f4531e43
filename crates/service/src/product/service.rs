use std::sync::Arc;

use tracing::{debug, info, instrument};

use models::{Product, ProductField, ProductId, UpdateFields};

use crate::errors::ServiceError;
use crate::product::repository::{CreateRepository, DeleteRepository, ReadRepository, UpdateRepository};

/// Inserts new products.
pub struct CreateProductService<R: CreateRepository> {
    repo: Arc<R>,
}

impl<R: CreateRepository> CreateProductService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// No range checks on price or stock; a store-side rejection comes back verbatim.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create(&self, product: &Product) -> Result<(), ServiceError> {
        self.repo.create(product).await?;
        info!("product_created");
        Ok(())
    }
}

/// Lists every product.
pub struct ReadProductService<R: ReadRepository> {
    repo: Arc<R>,
}

impl<R: ReadRepository> ReadProductService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn get_all(&self) -> Result<Vec<Product>, ServiceError> {
        let products = self.repo.find_all().await?;
        debug!(count = products.len(), "products_listed");
        Ok(products)
    }
}

/// Field set for an update request.
///
/// An empty `name` leaves the name untouched, but an empty `description`
/// clears the description. Existing clients depend on this asymmetry.
pub fn build_update(name: &str, description: &str) -> UpdateFields {
    let mut fields = UpdateFields::new();
    if !name.is_empty() {
        fields.set(ProductField::Name, name);
    }
    fields.set(ProductField::Description, description);
    fields
}

/// Partial updates of name and description.
pub struct UpdateProductService<R: UpdateRepository> {
    repo: Arc<R>,
}

impl<R: UpdateRepository> UpdateProductService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Apply the update to `id`. A missing product is not an error.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use models::Product;
    /// use service::product::{InMemoryProductRepository, UpdateProductService};
    ///
    /// let repo = Arc::new(InMemoryProductRepository::new());
    /// let ids = tokio_test::block_on(repo.seed([Product::new("Laptop", "old", 1500.0, 10)]));
    /// let svc = UpdateProductService::new(repo.clone());
    /// tokio_test::block_on(svc.update_product(&ids[0], "", "new")).unwrap();
    /// let stored = tokio_test::block_on(repo.get(&ids[0])).unwrap();
    /// assert_eq!(stored.name, "Laptop");
    /// assert_eq!(stored.description, "new");
    /// ```
    #[instrument(skip(self, name, description), fields(id = %id))]
    pub async fn update_product(&self, id: &ProductId, name: &str, description: &str) -> Result<(), ServiceError> {
        let fields = build_update(name, description);
        let outcome = self.repo.update_by_id(id, &fields).await?;
        if outcome.matched == 0 {
            debug!("update_matched_nothing");
        } else {
            info!(modified = outcome.modified, "product_updated");
        }
        Ok(())
    }
}

/// Deletes products by id.
pub struct DeleteProductService<R: DeleteRepository> {
    repo: Arc<R>,
}

impl<R: DeleteRepository> DeleteProductService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Idempotent: deleting a missing product succeeds without effect.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ServiceError> {
        let outcome = self.repo.delete_by_id(id).await?;
        if outcome.deleted == 0 {
            debug!("delete_matched_nothing");
        } else {
            info!("product_deleted");
        }
        Ok(())
    }
}
