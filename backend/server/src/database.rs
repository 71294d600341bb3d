//! # Document store
//!
//! Collections of JSON documents keyed by id.
//!
//! ## Redis layout
//!
//! - One hash per collection: `books`, `tasks`
//! - Hash field is the document id, value is the serialized document
//! - `HSETNX` gives atomic insert-if-absent, which backs the duplicate key check
//! - Removal reads and deletes inside one `MULTI` so the deleted document can be returned
//!
//! ## Memory layout
//!
//! Same shape held in a `RwLock`. Used for local runs and tests, no server needed.
//!
//! ## Commands
//!
//! Inspect a collection.
//! ```sh
//! redis-cli HGETALL books
//! ```
use std::{
    collections::{BTreeMap, HashMap},
    time::Duration,
};

use redis::{
    AsyncCommands, Client, RedisError,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document '{id}' already exists in {collection}")]
    Duplicate { collection: String, id: String },

    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    #[error("Corrupt document: {0}")]
    Serde(#[from] serde_json::Error),
}

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, RedisError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(500));

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    info!("Connected to Redis");

    Ok(connection_manager)
}

type Collections = HashMap<String, BTreeMap<String, String>>;

pub enum Store {
    Redis(ConnectionManager),
    Memory(RwLock<Collections>),
}

impl Store {
    pub fn memory() -> Self {
        Self::Memory(RwLock::new(Collections::new()))
    }

    pub async fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, StoreError> {
        let raw: Vec<String> = match self {
            Self::Redis(manager) => {
                let mut connection = manager.clone();
                let docs: HashMap<String, String> = connection.hgetall(collection).await?;
                docs.into_values().collect()
            }
            Self::Memory(collections) => collections
                .read()
                .await
                .get(collection)
                .map(|docs| docs.values().cloned().collect())
                .unwrap_or_default(),
        };

        raw.iter()
            .map(|doc| serde_json::from_str(doc).map_err(StoreError::from))
            .collect()
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, StoreError> {
        let raw: Option<String> = match self {
            Self::Redis(manager) => {
                let mut connection = manager.clone();
                connection.hget(collection, id).await?
            }
            Self::Memory(collections) => collections
                .read()
                .await
                .get(collection)
                .and_then(|docs| docs.get(id).cloned()),
        };

        raw.map(|doc| serde_json::from_str(&doc))
            .transpose()
            .map_err(StoreError::from)
    }

    pub async fn exists(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        match self {
            Self::Redis(manager) => {
                let mut connection = manager.clone();
                let exists: bool = connection.hexists(collection, id).await?;
                Ok(exists)
            }
            Self::Memory(collections) => Ok(collections
                .read()
                .await
                .get(collection)
                .is_some_and(|docs| docs.contains_key(id))),
        }
    }

    /// Inserts only when `id` is free, otherwise [`StoreError::Duplicate`].
    pub async fn insert_new<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        document: &T,
    ) -> Result<(), StoreError> {
        let doc = serde_json::to_string(document)?;

        let inserted = match self {
            Self::Redis(manager) => {
                let mut connection = manager.clone();
                let inserted: bool = connection.hset_nx(collection, id, doc).await?;
                inserted
            }
            Self::Memory(collections) => {
                let mut collections = collections.write().await;
                let docs = collections.entry(collection.to_string()).or_default();

                if docs.contains_key(id) {
                    false
                } else {
                    docs.insert(id.to_string(), doc);
                    true
                }
            }
        };

        if inserted {
            Ok(())
        } else {
            Err(StoreError::Duplicate {
                collection: collection.to_string(),
                id: id.to_string(),
            })
        }
    }

    pub async fn put<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        document: &T,
    ) -> Result<(), StoreError> {
        let doc = serde_json::to_string(document)?;

        match self {
            Self::Redis(manager) => {
                let mut connection = manager.clone();
                let _: () = connection.hset(collection, id, doc).await?;
            }
            Self::Memory(collections) => {
                collections
                    .write()
                    .await
                    .entry(collection.to_string())
                    .or_default()
                    .insert(id.to_string(), doc);
            }
        }

        Ok(())
    }

    /// Deletes and returns the document, `None` when it was not there.
    pub async fn remove<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, StoreError> {
        let raw: Option<String> = match self {
            Self::Redis(manager) => {
                let mut connection = manager.clone();
                let (doc, _removed): (Option<String>, i64) = redis::pipe()
                    .atomic()
                    .hget(collection, id)
                    .hdel(collection, id)
                    .query_async(&mut connection)
                    .await?;
                doc
            }
            Self::Memory(collections) => collections
                .write()
                .await
                .get_mut(collection)
                .and_then(|docs| docs.remove(id)),
        };

        raw.map(|doc| serde_json::from_str(&doc))
            .transpose()
            .map_err(StoreError::from)
    }

    pub async fn clear(&self, collection: &str) -> Result<(), StoreError> {
        match self {
            Self::Redis(manager) => {
                let mut connection = manager.clone();
                let _: () = connection.del(collection).await?;
            }
            Self::Memory(collections) => {
                collections.write().await.remove(collection);
            }
        }

        Ok(())
    }

    pub async fn count(&self, collection: &str) -> Result<usize, StoreError> {
        match self {
            Self::Redis(manager) => {
                let mut connection = manager.clone();
                let len: usize = connection.hlen(collection).await?;
                Ok(len)
            }
            Self::Memory(collections) => Ok(collections
                .read()
                .await
                .get(collection)
                .map_or(0, BTreeMap::len)),
        }
    }
}
