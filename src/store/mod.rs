//! The expense store: the authoritative set of expense and category records.
//!
//! Two backends implement [ExpenseStore]:
//! - [MemoryExpenseStore] keeps records in memory behind a lock,
//! - [SqlExpenseStore] persists them in the `categories` and `expenses` tables.

mod memory;
mod sql;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Category, Expense, ExpenseChanges, NewExpense};

pub use memory::MemoryExpenseStore;
pub use sql::SqlExpenseStore;

pub type SharedStore = Arc<dyn ExpenseStore>;

/// Creates, retrieves, updates and deletes expenses and their categories.
///
/// Identifiers are assigned by the store and never reused, even after the
/// record holding the highest ID is deleted.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// All expenses in insertion order.
    async fn list_expenses(&self) -> Result<Vec<Expense>, StoreError>;

    /// Add an expense dated now.
    ///
    /// # Errors
    /// [StoreError::Validation] if `category_id` does not refer to a category.
    async fn create_expense(&self, expense: NewExpense) -> Result<Expense, StoreError>;

    async fn get_expense(&self, id: i64) -> Result<Expense, StoreError>;

    /// Overwrite the fields set in `changes`, leaving the rest untouched.
    ///
    /// # Errors
    /// [StoreError::NotFound] if there is no expense with `id`,
    /// [StoreError::Validation] if `changes` names an unknown category.
    async fn update_expense(
        &self,
        id: i64,
        changes: ExpenseChanges,
    ) -> Result<Expense, StoreError>;

    async fn delete_expense(&self, id: i64) -> Result<(), StoreError>;

    /// All categories ordered by ID.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// # Errors
    /// [StoreError::Conflict] if a category with the same name (ignoring
    /// case) already exists.
    async fn create_category(&self, name: String) -> Result<Category, StoreError>;

    async fn get_category(&self, id: i64) -> Result<Category, StoreError>;

    async fn rename_category(&self, id: i64, name: String) -> Result<Category, StoreError>;

    /// Remove a category together with every expense that references it.
    /// Returns the number of expenses removed.
    async fn delete_category(&self, id: i64) -> Result<u64, StoreError>;

    async fn list_category_expenses(&self, id: i64) -> Result<Vec<Expense>, StoreError>;
}

pub(crate) fn now_timestamp() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

pub(crate) fn duplicate_category(name: &str) -> StoreError {
    StoreError::Conflict(format!("Category \"{}\" already exists", name))
}
