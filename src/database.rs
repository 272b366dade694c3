use anyhow::Result;
use libsql::{Builder, Connection};
use std::{path::Path, sync::Arc};
use tokio::sync::RwLock;

use crate::constants::DATABASE_FILE_NAME;

const ENABLE_FOREIGN_KEYS: &str = "PRAGMA foreign_keys = ON;";

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    name           TEXT    UNIQUE NOT NULL,
    password_hash  TEXT    NOT NULL,
    is_admin       INTEGER NOT NULL DEFAULT 0
);
"#;

const CREATE_CATEGORIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT    NOT NULL UNIQUE COLLATE NOCASE
);
"#;

const CREATE_EXPENSES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS expenses (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT    NOT NULL,
    amount       REAL    NOT NULL,
    date         INTEGER NOT NULL,
    category_id  INTEGER REFERENCES categories(id) ON DELETE CASCADE
);
"#;

const CREATE_EXPENSES_CATEGORY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_expenses_category_id ON expenses(category_id);";

const CREATE_VISITOR_STATS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS visitor_stats (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    browser           TEXT    NOT NULL,
    device            TEXT    NOT NULL,
    operating_system  TEXT    NOT NULL,
    is_bot            INTEGER NOT NULL,
    timestamp         INTEGER NOT NULL
);
"#;

pub type Db = Arc<RwLock<Connection>>;

/// Application DB (expenses.db) holding users, categories, expenses and
/// visitor stats.
pub async fn init_db(data_dir: &str) -> Result<Db> {
    tokio::fs::create_dir_all(data_dir).await?;
    let path = Path::new(data_dir).join(DATABASE_FILE_NAME);
    let db = Builder::new_local(path).build().await?;
    let conn = db.connect()?;

    create_tables(&conn).await?;
    Ok(Arc::new(RwLock::new(conn)))
}

pub async fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(ENABLE_FOREIGN_KEYS, ()).await?;
    conn.execute(CREATE_USERS_TABLE, ()).await?;
    conn.execute(CREATE_CATEGORIES_TABLE, ()).await?;
    conn.execute(CREATE_EXPENSES_TABLE, ()).await?;
    conn.execute(CREATE_EXPENSES_CATEGORY_INDEX, ()).await?;
    conn.execute(CREATE_VISITOR_STATS_TABLE, ()).await?;
    Ok(())
}
