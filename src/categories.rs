use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::constants::{MAX_CATEGORY_NAME_LENGTH, MSG_CATEGORY_DELETED};
use crate::error::ApiError;
use crate::models::{Category, CategoryPayload, Expense, MessageResponse};
use crate::store::SharedStore;
use crate::utils::validate_string_length;

/// Check the name and return it trimmed.
pub fn validate_category_name(name: &str) -> Result<String, ApiError> {
    validate_string_length(name, "Category name", MAX_CATEGORY_NAME_LENGTH)?;
    Ok(name.trim().to_string())
}

pub async fn list_categories(
    State(store): State<SharedStore>,
) -> Result<(StatusCode, Json<Vec<Category>>), ApiError> {
    let categories = store.list_categories().await?;
    Ok((StatusCode::OK, Json(categories)))
}

pub async fn create_category(
    State(store): State<SharedStore>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let Json(payload) = payload?;
    let name = validate_category_name(&payload.name)?;

    let category = store.create_category(name).await?;
    tracing::info!(id = category.id, "created category");

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_category(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = store.get_category(id).await?;
    Ok((StatusCode::OK, Json(category)))
}

pub async fn rename_category(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    store.get_category(id).await?;

    let Json(payload) = payload?;
    let name = validate_category_name(&payload.name)?;

    let category = store.rename_category(id, name).await?;
    Ok((StatusCode::OK, Json(category)))
}

pub async fn delete_category(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let removed = store.delete_category(id).await?;
    tracing::info!(id, removed_expenses = removed, "deleted category");

    Ok((StatusCode::OK, Json(MessageResponse::new(MSG_CATEGORY_DELETED))))
}

pub async fn list_category_expenses(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<Vec<Expense>>), ApiError> {
    let expenses = store.list_category_expenses(id).await?;
    Ok((StatusCode::OK, Json(expenses)))
}
