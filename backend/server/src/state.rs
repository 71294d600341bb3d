use std::sync::Arc;

use anyhow::Result;
use catalog::{BOOKS, TASKS, fixtures};
use chrono::Utc;
use tracing::info;

use super::{
    config::{Config, StoreBackend},
    database::{Store, StoreError, init_redis},
    presence::Presence,
};

pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub presence: Presence,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Arc<Self>> {
        let store = match config.store_backend {
            StoreBackend::Redis => Store::Redis(init_redis(&config.redis_url).await?),
            StoreBackend::Memory => Store::memory(),
        };

        Self::with_store(config, store).await
    }

    pub async fn with_store(config: Config, store: Store) -> Result<Arc<Self>> {
        if config.seed_on_start {
            seed_if_empty(&store).await?;
        }

        Ok(Arc::new(Self {
            config,
            store,
            presence: Presence::new(),
        }))
    }
}

/// Fills collections that have no documents yet. Existing data is never touched.
pub async fn seed_if_empty(store: &Store) -> Result<(), StoreError> {
    let now = Utc::now();

    if store.count(BOOKS).await? == 0 {
        let books = fixtures::sample_books(now);
        for book in &books {
            store.put(BOOKS, &book.id, book).await?;
        }
        info!("Seeded {} books", books.len());
    }

    if store.count(TASKS).await? == 0 {
        let tasks = fixtures::sample_tasks(now);
        for task in &tasks {
            store.put(TASKS, &task.id.to_string(), task).await?;
        }
        info!("Seeded {} tasks", tasks.len());
    }

    Ok(())
}
