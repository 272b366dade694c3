use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::StoreBackend;
use crate::database::Db;
use crate::store::{MemoryExpenseStore, SharedStore, SqlExpenseStore};

/// Shared state for all request handlers.
///
/// `db` always holds users and visitor stats. Expenses and categories live in
/// `store`, which may or may not be backed by the same database.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub store: SharedStore,
}

impl AppState {
    pub fn new(db: Db, backend: StoreBackend) -> Self {
        let store: SharedStore = match backend {
            StoreBackend::Sqlite => Arc::new(SqlExpenseStore::new(db.clone())),
            StoreBackend::Memory => Arc::new(MemoryExpenseStore::new()),
        };

        Self { db, store }
    }

    pub fn with_store(db: Db, store: SharedStore) -> Self {
        Self { db, store }
    }
}

impl FromRef<AppState> for Db {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for SharedStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}
