//! Auth Routes
//!
//! - POST /api/signup - Register a user (201, 409 on duplicate email)
//! - POST /api/login - Check credentials (200, 401 on mismatch)
//!
//! Password hashing is CPU-bound and runs on the blocking pool.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{AuthResponse, LoginRequest, SignupRequest, UserDto};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::auth::validation::{self, ValidationErrors};
use crate::auth::{CredentialResult, UserRecord};

/// POST /api/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    validation::validate_signup(&req.email, &req.password, &req.password)
        .map_err(validation_error)?;

    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }

    let credentials = state.credentials.clone();
    let record = blocking(move || credentials.register(&req.name, &req.email, &req.password))
        .await?;

    tracing::info!(email = %record.email, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            status: "success".to_string(),
            message: "User registered successfully".to_string(),
            user: public_user(record),
        }),
    ))
}

/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    validation::validate_login(&req.email).map_err(validation_error)?;

    let credentials = state.credentials.clone();
    let record = blocking(move || credentials.verify(&req.email, &req.password)).await?;

    tracing::info!(email = %record.email, "User logged in");

    Ok(Json(AuthResponse {
        status: "success".to_string(),
        message: "Login successful".to_string(),
        user: public_user(record),
    }))
}

async fn blocking<F>(f: F) -> ApiResult<UserRecord>
where
    F: FnOnce() -> CredentialResult<UserRecord> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("Auth task failed: {}", e)))?;
    Ok(result?)
}

fn public_user(record: UserRecord) -> UserDto {
    UserDto {
        email: record.email,
        name: Some(record.name),
    }
}

fn validation_error(errors: ValidationErrors) -> ApiError {
    ApiError::Validation(errors.to_string())
}
