use async_trait::async_trait;
use futures::StreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error;

use super::{Entity, Repository};

pub struct MongoRepository<T> {
    pub collection: mongodb::Collection<T>,
}

impl<T> MongoRepository<T> {
    pub async fn new(mongo_uri: &str, database: &str, collection: &str) -> anyhow::Result<Self> {
        let client = mongodb::Client::with_uri_str(mongo_uri).await?;
        let database = client.database(database);
        // The driver connects lazily, make sure the server answers before serving requests
        database.run_command(doc! {"ping": 1}, None).await?;
        log::info!("Connected to MongoDB database {}", database.name());

        Ok(Self {
            collection: database.collection(collection),
        })
    }
}

#[async_trait]
impl<T> Repository<T> for MongoRepository<T>
where
    T: Entity + Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    async fn insert(&self, item: &T) -> error::Result<bool> {
        let result = self
            .collection
            .find_one(doc! {"_id": item.id()}, None)
            .await?
            .is_none();

        if result {
            self.collection.insert_one(item, None).await?;
        }
        Ok(result)
    }

    async fn find(&self, field: &str, value: &Bson) -> error::Result<Option<T>> {
        let result = self.collection.find_one(doc! {field: value}, None).await?;
        Ok(result)
    }

    async fn find_by(&self, filter: Document) -> error::Result<Vec<T>> {
        let result: Vec<mongodb::error::Result<T>> =
            self.collection.find(filter, None).await?.collect().await;
        Ok(result.into_iter().collect::<mongodb::error::Result<_>>()?)
    }

    async fn update(&self, filter: Document, update: Document) -> error::Result<Option<T>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let result = self
            .collection
            .find_one_and_update(filter, update, options)
            .await?;
        Ok(result)
    }

    async fn delete(&self, field: &str, item: &ObjectId) -> error::Result<Option<T>> {
        let result = self
            .collection
            .find_one_and_delete(doc! {field: item}, None)
            .await?;
        Ok(result)
    }
}
