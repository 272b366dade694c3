use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ExpenseStore, duplicate_category, now_timestamp};
use crate::constants::ERR_UNKNOWN_CATEGORY;
use crate::error::StoreError;
use crate::models::{Category, Expense, ExpenseChanges, NewExpense};

#[derive(Debug)]
struct MemoryState {
    expenses: Vec<Expense>,
    categories: Vec<Category>,
    next_expense_id: i64,
    next_category_id: i64,
}

impl MemoryState {
    fn has_category(&self, id: i64) -> bool {
        self.categories.iter().any(|category| category.id == id)
    }

    fn check_category(&self, category_id: Option<i64>) -> Result<(), StoreError> {
        match category_id {
            Some(id) if !self.has_category(id) => {
                Err(StoreError::Validation(ERR_UNKNOWN_CATEGORY.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.categories
            .iter()
            .any(|category| Some(category.id) != except && category.name.eq_ignore_ascii_case(name))
    }
}

/// Keeps expenses and categories in insertion order in memory.
///
/// All operations run under one lock, so the store can be shared between
/// concurrently executing requests. Nothing survives a restart.
#[derive(Debug)]
pub struct MemoryExpenseStore {
    state: RwLock<MemoryState>,
}

impl Default for MemoryExpenseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryExpenseStore {
    pub fn new() -> Self {
        Self::with_expenses(Vec::new())
    }

    /// Start with `expenses` already in the store. New IDs continue from the
    /// largest existing ID. Category references are not checked.
    pub fn with_expenses(expenses: Vec<Expense>) -> Self {
        let next_expense_id = expenses.iter().map(|expense| expense.id).max().unwrap_or(0) + 1;

        Self {
            state: RwLock::new(MemoryState {
                expenses,
                categories: Vec::new(),
                next_expense_id,
                next_category_id: 1,
            }),
        }
    }
}

#[async_trait]
impl ExpenseStore for MemoryExpenseStore {
    async fn list_expenses(&self) -> Result<Vec<Expense>, StoreError> {
        Ok(self.state.read().await.expenses.clone())
    }

    async fn create_expense(&self, expense: NewExpense) -> Result<Expense, StoreError> {
        let mut state = self.state.write().await;
        state.check_category(expense.category_id)?;

        let expense = Expense {
            id: state.next_expense_id,
            name: expense.name,
            amount: expense.amount,
            date: now_timestamp(),
            category_id: expense.category_id,
        };
        state.next_expense_id += 1;
        state.expenses.push(expense.clone());

        Ok(expense)
    }

    async fn get_expense(&self, id: i64) -> Result<Expense, StoreError> {
        self.state
            .read()
            .await
            .expenses
            .iter()
            .find(|expense| expense.id == id)
            .cloned()
            .ok_or(StoreError::NotFound("Expense"))
    }

    async fn update_expense(
        &self,
        id: i64,
        changes: ExpenseChanges,
    ) -> Result<Expense, StoreError> {
        let mut state = self.state.write().await;
        let index = state
            .expenses
            .iter()
            .position(|expense| expense.id == id)
            .ok_or(StoreError::NotFound("Expense"))?;
        state.check_category(changes.category_id.flatten())?;

        let expense = &mut state.expenses[index];
        changes.apply_to(expense);

        Ok(expense.clone())
    }

    async fn delete_expense(&self, id: i64) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let index = state
            .expenses
            .iter()
            .position(|expense| expense.id == id)
            .ok_or(StoreError::NotFound("Expense"))?;

        state.expenses.remove(index);
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.state.read().await.categories.clone())
    }

    async fn create_category(&self, name: String) -> Result<Category, StoreError> {
        let mut state = self.state.write().await;
        if state.name_taken(&name, None) {
            return Err(duplicate_category(&name));
        }

        let category = Category {
            id: state.next_category_id,
            name,
        };
        state.next_category_id += 1;
        state.categories.push(category.clone());

        Ok(category)
    }

    async fn get_category(&self, id: i64) -> Result<Category, StoreError> {
        self.state
            .read()
            .await
            .categories
            .iter()
            .find(|category| category.id == id)
            .cloned()
            .ok_or(StoreError::NotFound("Category"))
    }

    async fn rename_category(&self, id: i64, name: String) -> Result<Category, StoreError> {
        let mut state = self.state.write().await;
        let index = state
            .categories
            .iter()
            .position(|category| category.id == id)
            .ok_or(StoreError::NotFound("Category"))?;
        if state.name_taken(&name, Some(id)) {
            return Err(duplicate_category(&name));
        }

        let category = &mut state.categories[index];
        category.name = name;

        Ok(category.clone())
    }

    async fn delete_category(&self, id: i64) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        let index = state
            .categories
            .iter()
            .position(|category| category.id == id)
            .ok_or(StoreError::NotFound("Category"))?;

        state.categories.remove(index);
        let before = state.expenses.len();
        state
            .expenses
            .retain(|expense| expense.category_id != Some(id));

        Ok((before - state.expenses.len()) as u64)
    }

    async fn list_category_expenses(&self, id: i64) -> Result<Vec<Expense>, StoreError> {
        let state = self.state.read().await;
        if !state.has_category(id) {
            return Err(StoreError::NotFound("Category"));
        }

        Ok(state
            .expenses
            .iter()
            .filter(|expense| expense.category_id == Some(id))
            .cloned()
            .collect())
    }
}
