use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tower_sessions::Session;

use crate::analytics::{recent_visits, visitor_summary};
use crate::auth::require_admin;
use crate::database::Db;
use crate::error::ApiError;
use crate::models::{PageQuery, VisitorStat, VisitorSummary};
use crate::utils::{validate_offset, validate_visitors_limit};

pub async fn list_visitors(
    State(db): State<Db>,
    session: Session,
    Query(query): Query<PageQuery>,
) -> Result<(StatusCode, Json<Vec<VisitorStat>>), ApiError> {
    require_admin(&session).await?;

    let limit = validate_visitors_limit(query.limit)?;
    let offset = validate_offset(query.offset)?;

    let visits = recent_visits(&db, limit, offset).await?;
    Ok((StatusCode::OK, Json(visits)))
}

pub async fn summarize_visitors(
    State(db): State<Db>,
    session: Session,
) -> Result<(StatusCode, Json<VisitorSummary>), ApiError> {
    require_admin(&session).await?;

    let summary = visitor_summary(&db).await?;
    Ok((StatusCode::OK, Json(summary)))
}
