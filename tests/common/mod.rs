#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use expense_tracker::config::StoreBackend;
use expense_tracker::database::{Db, init_db};
use expense_tracker::models::Expense;
use expense_tracker::store::{MemoryExpenseStore, SharedStore};
use expense_tracker::{AppState, build_router};
use tempfile::TempDir;
use tower_sessions::cookie::Key;

/// A fresh database in a temporary directory. Keep the `TempDir` alive for
/// as long as the database is used.
pub async fn setup_test_db() -> (Db, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let data_path = temp_dir
        .path()
        .to_str()
        .expect("Failed to convert path to string")
        .to_string();

    let db = init_db(&data_path)
        .await
        .unwrap_or_else(|e| panic!("Failed to initialize database at {}: {}", data_path, e));

    (db, temp_dir)
}

pub fn new_server(state: AppState) -> TestServer {
    let mut server =
        TestServer::try_new(build_router(state, Key::generate())).expect("Could not create test server.");
    server.save_cookies();
    server
}

pub async fn setup_test_server(backend: StoreBackend) -> (TestServer, Db, TempDir) {
    let (db, temp_dir) = setup_test_db().await;
    let server = new_server(AppState::new(db.clone(), backend));
    (server, db, temp_dir)
}

pub async fn setup_server_with_store(store: SharedStore) -> (TestServer, Db, TempDir) {
    let (db, temp_dir) = setup_test_db().await;
    let server = new_server(AppState::with_store(db.clone(), store));
    (server, db, temp_dir)
}

/// The two expenses the service shipped with as demo data, IDs 1 and 2.
pub fn sample_expenses() -> Vec<Expense> {
    vec![
        Expense {
            id: 1,
            name: "Groceries".to_string(),
            amount: 50.0,
            date: 1_700_000_000,
            category_id: None,
        },
        Expense {
            id: 2,
            name: "Electricity Bill".to_string(),
            amount: 75.25,
            date: 1_700_000_100,
            category_id: None,
        },
    ]
}

pub fn seeded_memory_store() -> SharedStore {
    Arc::new(MemoryExpenseStore::with_expenses(sample_expenses()))
}
