use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::constants::MSG_EXPENSE_DELETED;
use crate::error::ApiError;
use crate::models::{
    CreateExpensePayload, Expense, ExpenseChanges, MessageResponse, NewExpense,
    UpdateExpensePayload,
};
use crate::store::SharedStore;

/// Validate a create request body into a [NewExpense].
pub fn validate_new_expense(payload: CreateExpensePayload) -> Result<NewExpense, ApiError> {
    Ok(NewExpense::try_from(payload)?)
}

/// Validate an update request body. At least one field must be present.
pub fn validate_expense_changes(payload: UpdateExpensePayload) -> Result<ExpenseChanges, ApiError> {
    Ok(ExpenseChanges::try_from(payload)?)
}

pub async fn list_expenses(
    State(store): State<SharedStore>,
) -> Result<(StatusCode, Json<Vec<Expense>>), ApiError> {
    let expenses = store.list_expenses().await?;
    Ok((StatusCode::OK, Json(expenses)))
}

pub async fn create_expense(
    State(store): State<SharedStore>,
    payload: Result<Json<CreateExpensePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let Json(payload) = payload?;
    let new_expense = validate_new_expense(payload)?;

    let expense = store.create_expense(new_expense).await?;
    tracing::info!(id = expense.id, "created expense");

    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn get_expense(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let expense = store.get_expense(id).await?;
    Ok((StatusCode::OK, Json(expense)))
}

pub async fn update_expense(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateExpensePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    // A missing expense is reported before a bad body.
    store.get_expense(id).await?;

    let Json(payload) = payload?;
    let changes = validate_expense_changes(payload)?;

    let expense = store.update_expense(id, changes).await?;
    Ok((StatusCode::OK, Json(expense)))
}

pub async fn delete_expense(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    store.delete_expense(id).await?;
    tracing::info!(id, "deleted expense");

    Ok((StatusCode::OK, Json(MessageResponse::new(MSG_EXPENSE_DELETED))))
}
