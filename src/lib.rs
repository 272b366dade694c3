pub mod admin;
pub mod analytics;
pub mod auth;
pub mod categories;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod expenses;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;

pub use routes::build_router;
pub use state::AppState;
