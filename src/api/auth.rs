use anyhow::Context;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task;

use super::{ApiError, ApiResponse, AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub username: String,
    pub api_key: String,
}

// ============================================================================
// Credentials
// ============================================================================

/// Hash a password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Note: runs on the blocking pool, Argon2 verification is CPU-intensive.
pub async fn verify_password(password_hash: &str, password: &str) -> anyhow::Result<bool> {
    let password_hash = password_hash.to_string();
    let password = password.to_string();

    task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

        Ok::<bool, anyhow::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
        )
    })
    .await
    .context("Password verification task panicked")?
}

/// Generate a random API key (64 character hex string)
#[must_use]
pub fn generate_api_key() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

// ============================================================================
// Middleware
// ============================================================================

/// Admin routes accept the configured key from either
/// 1. `X-Api-Key` header
/// 2. `Authorization: Bearer <api_key>` header
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let expected = &state.config().admin.api_key;

    match extract_api_key(&headers) {
        Some(key) if !expected.is_empty() && key == *expected => next.run(request).await,
        _ => {
            tracing::debug!("Rejected admin request without a valid API key");
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::error("Unauthorized")),
            )
                .into_response()
        }
    }
}

fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.to_string());
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /admin/login
/// Check the admin credentials and hand back the API key for the back office
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let admin = &state.config().admin;
    if admin.password_hash.is_empty() {
        return Err(ApiError::Unauthorized(
            "Admin login is not configured".to_string(),
        ));
    }

    let is_valid = payload.username == admin.username
        && verify_password(&admin.password_hash, &payload.password)
            .await
            .map_err(|e| ApiError::internal(format!("Authentication error: {e}")))?;

    if !is_valid {
        tracing::warn!(username = %payload.username, "Failed admin login");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    tracing::info!("Admin logged in: {}", admin.username);

    Ok(Json(ApiResponse::success(LoginResponse {
        username: admin.username.clone(),
        api_key: admin.api_key.clone(),
    })))
}
