//! User administration
//!
//! Admin-only. Role and presence checks run before the store is touched.

use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::{Json, Query};
use crate::AppState;
use sarthi_common::{
    auth::{generate_password, hash_password, AuthContext},
    db::models::{Role, User},
    errors::{AppError, Result},
};

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub employee_id: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub success: bool,
    pub user_id: Uuid,
    pub email: String,
    pub temporary_password: String,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub user_id: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserQuery {
    pub user_id: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub total: usize,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// 400 naming every blank or absent field
pub(crate) fn missing_fields(fields: &[(&'static str, &Option<String>)]) -> AppError {
    AppError::missing_fields(
        fields
            .iter()
            .filter(|(_, value)| present(value).is_none())
            .map(|(name, _)| *name)
            .collect(),
    )
}

fn parse_role(role: &str) -> Result<Role> {
    role.parse().map_err(|_| AppError::InvalidRole {
        role: role.to_string(),
    })
}

fn parse_user_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::UserNotFound { id: id.to_string() })
}

pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<UserListResponse>> {
    auth.require_admin()?;

    let users = state.store.list_users().await?;
    Ok(Json(UserListResponse {
        total: users.len(),
        users,
    }))
}

/// Create an account with any role
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>> {
    auth.require_admin()?;

    let (Some(email), Some(name), Some(role), Some(department)) = (
        present(&request.email),
        present(&request.name),
        present(&request.role),
        present(&request.department),
    ) else {
        return Err(missing_fields(&[
            ("email", &request.email),
            ("name", &request.name),
            ("role", &request.role),
            ("department", &request.department),
        ]));
    };
    let role = parse_role(role)?;

    let password = present(&request.password)
        .map(str::to_string)
        .unwrap_or_else(generate_password);

    let mut user = User::new_account(email, name, role, department);
    if let Some(designation) = present(&request.designation) {
        user.designation = designation.to_string();
    }
    user.employee_id = present(&request.employee_id).unwrap_or_default().to_string();
    user.phone = present(&request.phone).unwrap_or_default().to_string();
    user.password_hash = hash_password(&password)?;

    let user = state.store.insert_user(user).await?;

    tracing::info!(
        user_id = %user.id,
        role = %role,
        created_by = %auth.user_id,
        "User account created"
    );

    let label = if role == Role::Hod { "HOD" } else { "User" };
    Ok(Json(CreateUserResponse {
        success: true,
        user_id: user.id,
        email: user.email,
        temporary_password: password,
        message: format!("{} account created successfully", label),
    }))
}

/// Change role, and optionally department and designation
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<MessageResponse>> {
    auth.require_admin()?;

    let (Some(user_id), Some(role)) = (present(&request.user_id), present(&request.role)) else {
        return Err(missing_fields(&[("userId", &request.user_id), ("role", &request.role)]));
    };
    let role = parse_role(role)?;
    let user_id = parse_user_id(user_id)?;

    let mut user = state
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::UserNotFound {
            id: user_id.to_string(),
        })?;

    user.role = role.as_str().to_string();
    if let Some(department) = present(&request.department) {
        user.department = department.to_string();
    }
    if let Some(designation) = present(&request.designation) {
        user.designation = designation.to_string();
    }
    user.updated_at = chrono::Utc::now().into();

    state.store.update_user(user).await?;

    tracing::info!(user_id = %user_id, role = %role, updated_by = %auth.user_id, "User updated");

    Ok(Json(MessageResponse {
        success: true,
        message: "User updated successfully".to_string(),
    }))
}

/// Remove the account and everything it owns
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<DeleteUserQuery>,
) -> Result<Json<MessageResponse>> {
    auth.require_admin()?;

    let user_id = present(&query.user_id).ok_or_else(|| AppError::validation("Missing userId parameter"))?;
    let user_id = parse_user_id(user_id)?;

    if !state.store.delete_user(user_id).await? {
        return Err(AppError::UserNotFound {
            id: user_id.to_string(),
        });
    }

    tracing::info!(user_id = %user_id, deleted_by = %auth.user_id, "User deleted");

    Ok(Json(MessageResponse {
        success: true,
        message: "User deleted successfully".to_string(),
    }))
}
