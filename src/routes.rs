use axum::{
    Router,
    extract::State,
    http::{HeaderValue, header::CACHE_CONTROL},
    middleware,
    response::Html,
    routing::{get, post},
};
use time::Duration;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::Key};

use crate::constants::*;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::SharedStore;
use crate::{admin, analytics, auth, categories, expenses};

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/expenses",
            get(expenses::list_expenses).post(expenses::create_expense),
        )
        .route(
            "/expenses/{id}",
            get(expenses::get_expense)
                .put(expenses::update_expense)
                .delete(expenses::delete_expense),
        )
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .put(categories::rename_category)
                .delete(categories::delete_category),
        )
        .route(
            "/categories/{id}/expenses",
            get(categories::list_category_expenses),
        )
}

/// Assemble the application with its middleware stack.
///
/// `session_key` signs the session cookie.
pub fn build_router(state: AppState, session_key: Key) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_name(SESSION_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::days(SESSION_EXPIRY_DAYS)))
        .with_signed(session_key);

    Router::new()
        .route("/", get(home))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/admin/visitors", get(admin::list_visitors))
        .route("/admin/visitors/summary", get(admin::summarize_visitors))
        .nest("/api", api_routes())
        .layer(middleware::from_fn_with_state(
            state.db.clone(),
            analytics::track_visitor,
        ))
        .layer(session_layer)
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(NO_CACHE),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home(State(store): State<SharedStore>) -> Result<Html<String>, ApiError> {
    let expenses = store.list_expenses().await?;
    let total: f64 = expenses.iter().map(|expense| expense.amount).sum();

    Ok(Html(format!(
        "<h1>Expense Tracker</h1><p>{} expenses, {:.2} in total.</p>",
        expenses.len(),
        total
    )))
}
