use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::SqliteStore;
use crate::errors::AppError;
use crate::services::availability::AvailabilityEngine;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub availability: AvailabilityEngine,
}

impl AppState {
    pub fn new(conn: Connection, config: AppConfig) -> Self {
        let db = Arc::new(Mutex::new(conn));
        let availability = AvailabilityEngine::new(Arc::new(SqliteStore::new(Arc::clone(&db))));
        Self {
            db,
            config,
            availability,
        }
    }

    /// Locks the shared connection. Do not hold the guard across a call into
    /// `availability`: the engine's store takes the same lock.
    pub fn db(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.db
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("database lock poisoned")))
    }
}
