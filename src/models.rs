use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::*;
use crate::error::StoreError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    /// Creation time as a unix timestamp (UTC seconds).
    pub date: i64,
    pub category_id: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Body of `POST /api/expenses`. Fields are optional here so that a missing
/// `name` or `amount` is reported with a message rather than a serde error.
#[derive(Deserialize, Debug, Default)]
pub struct CreateExpensePayload {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub category_id: Option<i64>,
}

/// Body of `PUT /api/expenses/{id}`.
///
/// `category_id` is `None` when the field is absent and `Some(None)` when it
/// is sent as `null`, which removes the expense from its category.
#[derive(Deserialize, Debug, Default)]
pub struct UpdateExpensePayload {
    pub name: Option<String>,
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "present_field")]
    pub category_id: Option<Option<i64>>,
}

/// Maps a present field, including `null`, to `Some`. Absent fields fall
/// back to `#[serde(default)]`.
fn present_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A validated request to create an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub name: String,
    pub amount: f64,
    pub category_id: Option<i64>,
}

/// A validated partial update. `None` fields keep their stored value;
/// `category_id: Some(None)` clears the category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseChanges {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub category_id: Option<Option<i64>>,
}

impl ExpenseChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.amount.is_none() && self.category_id.is_none()
    }

    pub fn apply_to(&self, expense: &mut Expense) {
        if let Some(name) = &self.name {
            expense.name = name.clone();
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(category_id) = self.category_id {
            expense.category_id = category_id;
        }
    }
}

fn validate_expense_name(name: &str) -> Result<String, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::Validation(
            "Expense name cannot be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_EXPENSE_NAME_LENGTH {
        return Err(StoreError::Validation(format!(
            "Expense name must be less than {} characters",
            MAX_EXPENSE_NAME_LENGTH
        )));
    }
    Ok(name.to_string())
}

fn validate_expense_amount(amount: f64) -> Result<f64, StoreError> {
    if !amount.is_finite() {
        return Err(StoreError::Validation(
            "Expense amount must be a finite number".to_string(),
        ));
    }
    Ok(amount)
}

impl TryFrom<CreateExpensePayload> for NewExpense {
    type Error = StoreError;

    fn try_from(payload: CreateExpensePayload) -> Result<Self, Self::Error> {
        let (Some(name), Some(amount)) = (payload.name, payload.amount) else {
            return Err(StoreError::Validation(
                ERR_MISSING_EXPENSE_FIELDS.to_string(),
            ));
        };

        Ok(NewExpense {
            name: validate_expense_name(&name)?,
            amount: validate_expense_amount(amount)?,
            category_id: payload.category_id,
        })
    }
}

impl TryFrom<UpdateExpensePayload> for ExpenseChanges {
    type Error = StoreError;

    fn try_from(payload: UpdateExpensePayload) -> Result<Self, Self::Error> {
        let changes = ExpenseChanges {
            name: payload
                .name
                .as_deref()
                .map(validate_expense_name)
                .transpose()?,
            amount: payload.amount.map(validate_expense_amount).transpose()?,
            category_id: payload.category_id,
        };

        if changes.is_empty() {
            return Err(StoreError::Validation(ERR_MISSING_JSON.to_string()));
        }
        Ok(changes)
    }
}

#[derive(Deserialize, Debug)]
pub struct CategoryPayload {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterPayload {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VisitorStat {
    pub id: i64,
    pub browser: String,
    pub device: String,
    pub operating_system: String,
    pub is_bot: bool,
    pub timestamp: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VisitorSummary {
    pub total: u32,
    pub bots: u32,
    pub humans: u32,
}

#[derive(Deserialize, Debug, Default)]
pub struct PageQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
