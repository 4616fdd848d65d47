//! Signup and login

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extract::Json;
use crate::AppState;
use sarthi_common::{
    auth::{hash_password, verify_password},
    db::models::{Role, User},
    errors::{AppError, Result},
};

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    #[serde(default)]
    pub email: String,

    #[validate(length(min = 1, max = 200))]
    #[serde(default)]
    pub name: String,

    #[validate(length(min = 8, max = 128))]
    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub department: Option<String>,

    #[serde(default)]
    pub designation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Create a faculty account and sign it in
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    request.validate()?;

    let mut user = User::new_account(
        &request.email,
        &request.name,
        Role::Faculty,
        request.department.as_deref().unwrap_or(""),
    );
    if let Some(designation) = request.designation.filter(|d| !d.is_empty()) {
        user.designation = designation;
    }
    user.password_hash = hash_password(&request.password)?;

    let user = state.store.insert_user(user).await?;
    let token = state.jwt.generate_token(user.id, Role::Faculty, &user.email)?;

    tracing::info!(user_id = %user.id, email = %user.email, "Faculty account created");

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }

    let email = request.email.trim().to_lowercase();
    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .filter(|user| verify_password(&request.password, &user.password_hash))
        .ok_or(AppError::InvalidCredentials)?;

    if !user.is_active {
        return Err(AppError::Forbidden {
            message: "account is disabled".to_string(),
        });
    }

    let token = state.jwt.generate_token(user.id, user.user_role(), &user.email)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse { token, user }))
}
