use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use serde::{de::DeserializeOwned, Serialize};

use crate::error;

use super::{Entity, Repository};

/// In-memory stand-in for a MongoDB collection. Supports equality filters and
/// `$set` updates, which is all the services issue.
pub struct TestRepository<T> {
    _t: std::marker::PhantomData<fn() -> T>,
    pub db: Mutex<Vec<Document>>,
}

impl<T> TestRepository<T> {
    pub fn new() -> Self {
        Self {
            _t: std::marker::PhantomData,
            db: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> error::Result<MutexGuard<'_, Vec<Document>>> {
        self.db
            .lock()
            .map_err(|_| anyhow::anyhow!("Test repository lock poisoned").into())
    }
}

impl<T> Default for TestRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(field, value)| document.get(field) == Some(value))
}

fn apply(document: &mut Document, update: &Document) -> error::Result<()> {
    for (operator, fields) in update {
        match (operator.as_str(), fields) {
            ("$set", Bson::Document(fields)) => {
                for (field, value) in fields {
                    document.insert(field.clone(), value.clone());
                }
            }
            _ => return Err(anyhow::anyhow!("Unsupported update operator {}", operator).into()),
        }
    }
    Ok(())
}

#[async_trait]
impl<T> Repository<T> for TestRepository<T>
where
    T: Entity + Serialize + DeserializeOwned + Send + Sync,
{
    async fn insert(&self, item: &T) -> error::Result<bool> {
        let mut db = self.lock()?;

        let id = Bson::ObjectId(item.id());
        let contains = db.iter().any(|x| x.get("_id") == Some(&id));
        if !contains {
            db.push(bson::to_document(item)?);
        }
        Ok(!contains)
    }

    async fn find(&self, field: &str, value: &Bson) -> error::Result<Option<T>> {
        let db = self.lock()?;
        let result = db.iter().find(|x| x.get(field) == Some(value)).cloned();
        Ok(result.map(bson::from_document).transpose()?)
    }

    async fn find_by(&self, filter: Document) -> error::Result<Vec<T>> {
        let db = self.lock()?;
        Ok(db
            .iter()
            .filter(|x| matches(x, &filter))
            .cloned()
            .map(bson::from_document)
            .collect::<Result<_, _>>()?)
    }

    async fn update(&self, filter: Document, update: Document) -> error::Result<Option<T>> {
        let mut db = self.lock()?;
        let Some(document) = db.iter_mut().find(|x| matches(x, &filter)) else {
            return Ok(None);
        };

        apply(document, &update)?;
        Ok(Some(bson::from_document(document.clone())?))
    }

    async fn delete(&self, field: &str, id: &ObjectId) -> error::Result<Option<T>> {
        let mut db = self.lock()?;
        let id = Bson::ObjectId(*id);
        let Some(pos) = db.iter().position(|x| x.get(field) == Some(&id)) else {
            return Ok(None);
        };

        Ok(Some(bson::from_document(db.remove(pos))?))
    }
}
