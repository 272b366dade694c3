use async_trait::async_trait;
use libsql::{Connection, Row, Value};

use super::{ExpenseStore, duplicate_category, now_timestamp};
use crate::constants::ERR_UNKNOWN_CATEGORY;
use crate::database::Db;
use crate::error::StoreError;
use crate::models::{Category, Expense, ExpenseChanges, NewExpense};

const SELECT_EXPENSES: &str = "SELECT id, name, amount, date, category_id FROM expenses";

/// Persists expenses and categories in the `expenses` and `categories`
/// tables of the application database.
#[derive(Clone)]
pub struct SqlExpenseStore {
    db: Db,
}

impl SqlExpenseStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

pub fn extract_expense_from_row(row: Row) -> Result<Expense, StoreError> {
    let category_id = match row.get_value(4)? {
        Value::Integer(id) => Some(id),
        _ => None,
    };

    Ok(Expense {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
        category_id,
    })
}

pub fn extract_category_from_row(row: Row) -> Result<Category, StoreError> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn category_param(category_id: Option<i64>) -> Value {
    category_id.map(Value::Integer).unwrap_or(Value::Null)
}

async fn query_expenses(
    conn: &Connection,
    sql: &str,
    params: impl libsql::params::IntoParams,
) -> Result<Vec<Expense>, StoreError> {
    let mut rows = conn.query(sql, params).await?;

    let mut expenses = Vec::new();
    while let Some(row) = rows.next().await? {
        expenses.push(extract_expense_from_row(row)?);
    }
    Ok(expenses)
}

async fn find_expense(conn: &Connection, id: i64) -> Result<Expense, StoreError> {
    let mut rows = conn
        .query(&format!("{} WHERE id = ?", SELECT_EXPENSES), [id])
        .await?;

    match rows.next().await? {
        Some(row) => extract_expense_from_row(row),
        None => Err(StoreError::NotFound("Expense")),
    }
}

async fn find_category(conn: &Connection, id: i64) -> Result<Category, StoreError> {
    let mut rows = conn
        .query("SELECT id, name FROM categories WHERE id = ?", [id])
        .await?;

    match rows.next().await? {
        Some(row) => extract_category_from_row(row),
        None => Err(StoreError::NotFound("Category")),
    }
}

async fn validate_category_exists(
    conn: &Connection,
    category_id: Option<i64>,
) -> Result<(), StoreError> {
    let Some(id) = category_id else {
        return Ok(());
    };

    match find_category(conn, id).await {
        Err(StoreError::NotFound(_)) => {
            Err(StoreError::Validation(ERR_UNKNOWN_CATEGORY.to_string()))
        }
        other => other.map(|_| ()),
    }
}

/// Case-insensitive check for another category called `name`.
async fn validate_category_name_free(
    conn: &Connection,
    name: &str,
    except: Option<i64>,
) -> Result<(), StoreError> {
    let mut rows = conn
        .query(
            "SELECT id FROM categories WHERE LOWER(name) = LOWER(?) AND id != ?",
            (name, except.unwrap_or(0)),
        )
        .await?;

    if rows.next().await?.is_some() {
        return Err(duplicate_category(name));
    }
    Ok(())
}

#[async_trait]
impl ExpenseStore for SqlExpenseStore {
    async fn list_expenses(&self) -> Result<Vec<Expense>, StoreError> {
        let conn = self.db.read().await;
        query_expenses(&conn, &format!("{} ORDER BY id ASC", SELECT_EXPENSES), ()).await
    }

    async fn create_expense(&self, expense: NewExpense) -> Result<Expense, StoreError> {
        let conn = self.db.write().await;
        validate_category_exists(&conn, expense.category_id).await?;

        let date = now_timestamp();
        conn.execute(
            "INSERT INTO expenses (name, amount, date, category_id) VALUES (?, ?, ?, ?)",
            (
                expense.name.as_str(),
                expense.amount,
                date,
                category_param(expense.category_id),
            ),
        )
        .await?;

        Ok(Expense {
            id: conn.last_insert_rowid(),
            name: expense.name,
            amount: expense.amount,
            date,
            category_id: expense.category_id,
        })
    }

    async fn get_expense(&self, id: i64) -> Result<Expense, StoreError> {
        let conn = self.db.read().await;
        find_expense(&conn, id).await
    }

    async fn update_expense(
        &self,
        id: i64,
        changes: ExpenseChanges,
    ) -> Result<Expense, StoreError> {
        let conn = self.db.write().await;
        let mut expense = find_expense(&conn, id).await?;
        validate_category_exists(&conn, changes.category_id.flatten()).await?;

        changes.apply_to(&mut expense);
        conn.execute(
            "UPDATE expenses SET name = ?, amount = ?, category_id = ? WHERE id = ?",
            (
                expense.name.as_str(),
                expense.amount,
                category_param(expense.category_id),
                id,
            ),
        )
        .await?;

        Ok(expense)
    }

    async fn delete_expense(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.db.write().await;
        let affected_rows = conn
            .execute("DELETE FROM expenses WHERE id = ?", [id])
            .await?;

        if affected_rows == 0 {
            return Err(StoreError::NotFound("Expense"));
        }
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let conn = self.db.read().await;
        let mut rows = conn
            .query("SELECT id, name FROM categories ORDER BY id ASC", ())
            .await?;

        let mut categories = Vec::new();
        while let Some(row) = rows.next().await? {
            categories.push(extract_category_from_row(row)?);
        }
        Ok(categories)
    }

    async fn create_category(&self, name: String) -> Result<Category, StoreError> {
        let conn = self.db.write().await;
        validate_category_name_free(&conn, &name, None).await?;

        conn.execute("INSERT INTO categories (name) VALUES (?)", [name.as_str()])
            .await?;

        Ok(Category {
            id: conn.last_insert_rowid(),
            name,
        })
    }

    async fn get_category(&self, id: i64) -> Result<Category, StoreError> {
        let conn = self.db.read().await;
        find_category(&conn, id).await
    }

    async fn rename_category(&self, id: i64, name: String) -> Result<Category, StoreError> {
        let conn = self.db.write().await;
        find_category(&conn, id).await?;
        validate_category_name_free(&conn, &name, Some(id)).await?;

        conn.execute(
            "UPDATE categories SET name = ? WHERE id = ?",
            (name.as_str(), id),
        )
        .await?;

        Ok(Category { id, name })
    }

    async fn delete_category(&self, id: i64) -> Result<u64, StoreError> {
        let conn = self.db.write().await;
        find_category(&conn, id).await?;

        // Expenses are removed explicitly so the cascade does not depend on
        // the foreign_keys pragma being enabled for this connection.
        let tx = conn.transaction().await?;
        let removed = tx
            .execute("DELETE FROM expenses WHERE category_id = ?", [id])
            .await?;
        tx.execute("DELETE FROM categories WHERE id = ?", [id])
            .await?;
        tx.commit().await?;

        Ok(removed)
    }

    async fn list_category_expenses(&self, id: i64) -> Result<Vec<Expense>, StoreError> {
        let conn = self.db.read().await;
        find_category(&conn, id).await?;

        query_expenses(
            &conn,
            &format!("{} WHERE category_id = ? ORDER BY id ASC", SELECT_EXPENSES),
            [id],
        )
        .await
    }
}
