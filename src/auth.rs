use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tower_sessions::Session;

use crate::constants::*;
use crate::database::Db;
use crate::error::ApiError;
use crate::models::{LoginPayload, PublicUser, RegisterPayload, User};

const SESSION_USER_ID: &str = "user_id";
const SESSION_USERNAME: &str = "username";
const SESSION_IS_ADMIN: &str = "is_admin";

fn session_error(error: impl std::fmt::Display) -> ApiError {
    ApiError::Internal(format!("session error: {}", error))
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn validate_credentials(username: &str, password: &str) -> Result<(), ApiError> {
    if username.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Username cannot be empty".to_string(),
        ));
    }
    let username_length = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&username_length) {
        return Err(ApiError::BadRequest(format!(
            "Username must be between {} and {} characters",
            MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
        )));
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ApiError::BadRequest(
            "Username can only contain alphanumeric characters, underscores, and hyphens"
                .to_string(),
        ));
    }
    Ok(())
}

/// Insert a user. Fails with [ApiError::Conflict] when the name is taken.
pub async fn create_user(
    db: &Db,
    username: &str,
    password: &str,
    is_admin: bool,
) -> Result<PublicUser, ApiError> {
    let hash = hash_password(password).map_err(|e| ApiError::Internal(e.to_string()))?;
    let conn = db.write().await;

    let mut existing = conn
        .query("SELECT id FROM users WHERE name = ?", [username])
        .await?;
    if existing.next().await?.is_some() {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }

    conn.execute(
        "INSERT INTO users (name, password_hash, is_admin) VALUES (?, ?, ?)",
        (username, hash.as_str(), is_admin as i64),
    )
    .await?;

    Ok(PublicUser {
        id: conn.last_insert_rowid(),
        username: username.to_string(),
        is_admin,
    })
}

/// Used by the `create-admin` command.
pub async fn create_admin_user(
    db: &Db,
    username: &str,
    password: &str,
) -> Result<PublicUser, ApiError> {
    validate_credentials(username, password)?;
    let user = create_user(db, username, password, true).await?;
    tracing::info!(id = user.id, username = %user.username, "created admin user");
    Ok(user)
}

pub async fn register(
    State(db): State<Db>,
    payload: Result<Json<RegisterPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let Json(payload) = payload?;
    validate_credentials(&payload.username, &payload.password)?;

    let user = create_user(&db, &payload.username, &payload.password, false).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user_by_username(db: &Db, username: &str) -> Result<Option<User>, ApiError> {
    let conn = db.read().await;
    let mut rows = conn
        .query(
            "SELECT id, name, password_hash, is_admin FROM users WHERE name = ?",
            [username],
        )
        .await?;

    if let Some(row) = rows.next().await? {
        let id: i64 = row.get(0)?;
        let username: String = row.get(1)?;
        let password_hash: String = row.get(2)?;
        let is_admin: i64 = row.get(3)?;
        Ok(Some(User {
            id,
            username,
            password_hash,
            is_admin: is_admin != 0,
        }))
    } else {
        Ok(None)
    }
}

pub async fn login(
    State(db): State<Db>,
    session: Session,
    payload: Result<Json<LoginPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let Json(payload) = payload?;

    if payload.username.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Username cannot be empty".to_string(),
        ));
    }
    if payload.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Password cannot be empty".to_string(),
        ));
    }

    let user = get_user_by_username(&db, &payload.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(ERR_INVALID_CREDENTIALS.to_string()))?;

    let is_valid = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    if !is_valid {
        return Err(ApiError::Unauthorized(ERR_INVALID_CREDENTIALS.to_string()));
    }

    session.cycle_id().await.map_err(session_error)?;
    session
        .insert(SESSION_USER_ID, user.id)
        .await
        .map_err(session_error)?;
    session
        .insert(SESSION_USERNAME, &user.username)
        .await
        .map_err(session_error)?;
    session
        .insert(SESSION_IS_ADMIN, user.is_admin)
        .await
        .map_err(session_error)?;

    tracing::info!(id = user.id, "user logged in");

    Ok((
        StatusCode::OK,
        Json(PublicUser {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        }),
    ))
}

pub async fn get_current_user(session: &Session) -> Result<PublicUser, ApiError> {
    let user_id: Option<i64> = session.get(SESSION_USER_ID).await.map_err(session_error)?;
    let username: Option<String> = session.get(SESSION_USERNAME).await.map_err(session_error)?;
    let is_admin: Option<bool> = session.get(SESSION_IS_ADMIN).await.map_err(session_error)?;

    match (user_id, username) {
        (Some(id), Some(username)) => Ok(PublicUser {
            id,
            username,
            is_admin: is_admin.unwrap_or(false),
        }),
        _ => Err(ApiError::Unauthorized(ERR_UNAUTHORIZED.to_string())),
    }
}

/// The logged in user, if they are an admin.
pub async fn require_admin(session: &Session) -> Result<PublicUser, ApiError> {
    let user = get_current_user(session).await?;
    if !user.is_admin {
        return Err(ApiError::Forbidden(ERR_FORBIDDEN.to_string()));
    }
    Ok(user)
}

pub async fn me(session: Session) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let user = get_current_user(&session).await?;
    Ok((StatusCode::OK, Json(user)))
}

pub async fn logout(session: Session) -> Result<StatusCode, ApiError> {
    session.flush().await.map_err(session_error)?;

    Ok(StatusCode::NO_CONTENT)
}
