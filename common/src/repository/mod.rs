pub mod mongo_repository;
pub mod test_repository;

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};

use crate::error;

pub trait Entity {
    fn id(&self) -> ObjectId;
}

#[async_trait]
pub trait Repository<T>: Send + Sync {
    async fn insert(&self, item: &T) -> error::Result<bool>;
    async fn find(&self, field: &str, value: &Bson) -> error::Result<Option<T>>;
    async fn find_by(&self, filter: Document) -> error::Result<Vec<T>>;
    /// Applies `update` to the first document matching `filter` and returns it
    /// as stored afterwards, `None` when nothing matched.
    async fn update(&self, filter: Document, update: Document) -> error::Result<Option<T>>;
    async fn delete(&self, field: &str, item: &ObjectId) -> error::Result<Option<T>>;
}

pub type RepositoryObject<T> = Arc<dyn Repository<T>>;
