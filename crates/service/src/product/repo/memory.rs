use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::RwLock;

use models::{Product, ProductId, UpdateFields};

use crate::errors::ServiceError;
use crate::product::repository::{
    CreateRepository, DeleteOutcome, DeleteRepository, ReadRepository, UpdateOutcome, UpdateRepository,
};

/// One recorded repository invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoCall {
    Create(Product),
    FindAll,
    UpdateById(ProductId, UpdateFields),
    DeleteById(ProductId),
}

/// In-memory repository for tests and store-less local runs.
///
/// Records every call and can be told to fail the next calls with a given
/// message, standing in for a lost store connection.
#[derive(Default)]
pub struct InMemoryProductRepository {
    records: RwLock<BTreeMap<ProductId, Product>>,
    failure: Mutex<Option<String>>,
    calls: Mutex<Vec<RepoCall>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate; products without an id get one.
    pub async fn seed(&self, products: impl IntoIterator<Item = Product>) -> Vec<ProductId> {
        let mut records = self.records.write().await;
        products
            .into_iter()
            .map(|mut p| {
                let id = *p.id.get_or_insert_with(ProductId::generate);
                records.insert(id, p);
                id
            })
            .collect()
    }

    /// Fail every following call with `msg` until `recover` is called.
    pub fn fail_with(&self, msg: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(msg.into());
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<RepoCall> {
        self.calls.lock().unwrap().clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn get(&self, id: &ProductId) -> Option<Product> {
        self.records.read().await.get(id).cloned()
    }

    fn enter(&self, call: RepoCall) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().as_ref() {
            Some(msg) => Err(ServiceError::store(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CreateRepository for InMemoryProductRepository {
    async fn create(&self, product: &Product) -> Result<(), ServiceError> {
        self.enter(RepoCall::Create(product.clone()))?;
        let id = ProductId::generate();
        let mut stored = product.clone();
        stored.id = Some(id);
        self.records.write().await.insert(id, stored);
        Ok(())
    }
}

#[async_trait]
impl ReadRepository for InMemoryProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, ServiceError> {
        self.enter(RepoCall::FindAll)?;
        Ok(self.records.read().await.values().cloned().collect())
    }
}

#[async_trait]
impl UpdateRepository for InMemoryProductRepository {
    async fn update_by_id(&self, id: &ProductId, fields: &UpdateFields) -> Result<UpdateOutcome, ServiceError> {
        self.enter(RepoCall::UpdateById(*id, fields.clone()))?;
        let mut records = self.records.write().await;
        let Some(product) = records.get_mut(id) else { return Ok(UpdateOutcome::default()) };
        let before = product.clone();
        product.apply(fields);
        let modified = u64::from(*product != before);
        Ok(UpdateOutcome { matched: 1, modified })
    }
}

#[async_trait]
impl DeleteRepository for InMemoryProductRepository {
    async fn delete_by_id(&self, id: &ProductId) -> Result<DeleteOutcome, ServiceError> {
        self.enter(RepoCall::DeleteById(*id))?;
        let removed = self.records.write().await.remove(id);
        Ok(DeleteOutcome { deleted: u64::from(removed.is_some()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::ProductField;

    #[tokio::test]
    async fn create_assigns_fresh_id() {
        let repo = InMemoryProductRepository::new();
        let given = ProductId::generate();
        repo.create(&Product::new("Laptop", "", 1.0, 1).with_id(given)).await.unwrap();
        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_ne!(all[0].id, Some(given));
    }

    #[tokio::test]
    async fn update_counts_matches() {
        let repo = InMemoryProductRepository::new();
        let ids = repo.seed([Product::new("Laptop", "old", 1.0, 1)]).await;
        let fields = UpdateFields::new().with(ProductField::Description, "old");
        let out = repo.update_by_id(&ids[0], &fields).await.unwrap();
        assert_eq!(out, UpdateOutcome { matched: 1, modified: 0 });
        let out = repo.update_by_id(&ProductId::generate(), &fields).await.unwrap();
        assert_eq!(out, UpdateOutcome::default());
    }

    #[tokio::test]
    async fn injected_failure_blocks_until_recover() {
        let repo = InMemoryProductRepository::new();
        repo.fail_with("error de conexión");
        let err = repo.find_all().await.unwrap_err();
        assert_eq!(err.to_string(), "error de conexión");
        repo.recover();
        assert!(repo.find_all().await.unwrap().is_empty());
        assert_eq!(repo.calls(), vec![RepoCall::FindAll, RepoCall::FindAll]);
    }
}
