// Server configuration
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_DATA_PATH: &str = "data";
pub const DEFAULT_STORE_BACKEND: &str = "sqlite";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DATABASE_FILE_NAME: &str = "expenses.db";

// Session configuration
pub const SESSION_NAME: &str = "axum_session";
pub const SESSION_EXPIRY_DAYS: i64 = 7;
pub const MIN_SESSION_SECRET_LENGTH: usize = 64;

// Response headers
pub const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

// Database limits and defaults
pub const DEFAULT_VISITORS_LIMIT: u32 = 100;
pub const MAX_LIMIT: u32 = 1000;
pub const MAX_OFFSET: u32 = 1_000_000;

// Validation limits
pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;
pub const MAX_EXPENSE_NAME_LENGTH: usize = 255;
pub const MAX_USERNAME_LENGTH: usize = 50;
pub const MIN_USERNAME_LENGTH: usize = 4;
pub const MIN_PASSWORD_LENGTH: usize = 6;

// Error messages
pub const ERR_DATABASE_OPERATION: &str = "Database operation failed";
pub const ERR_UNAUTHORIZED: &str = "Not logged in";
pub const ERR_FORBIDDEN: &str = "Admin access required";
pub const ERR_INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const ERR_MISSING_EXPENSE_FIELDS: &str = "Missing 'name' or 'amount' in request";
pub const ERR_MISSING_JSON: &str = "Missing JSON data";
pub const ERR_UNKNOWN_CATEGORY: &str = "Category does not exist";

// Success messages
pub const MSG_EXPENSE_DELETED: &str = "Expense deleted";
pub const MSG_CATEGORY_DELETED: &str = "Category deleted";
