//! Profile document and per-section form storage

use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::{Json, Path};
use crate::AppState;
use sarthi_common::{
    auth::AuthContext,
    db::models::{FormPart, User},
    errors::{AppError, Result},
    reconcile::{self, Reconciliation},
};

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub employee_id: Option<String>,
    pub phone: Option<String>,
    pub form_header: Option<Value>,
}

#[derive(Serialize)]
pub struct SectionResponse {
    pub part: FormPart,
    pub section: String,
    pub data: Value,
}

#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    #[serde(default)]
    pub cache: Value,
    /// Store the merged section
    #[serde(default)]
    pub apply: bool,
}

#[derive(Serialize)]
pub struct ReconcileResponse {
    pub reconciliation: Reconciliation,
    pub suggestion_count: usize,
    pub applied: bool,
}

async fn load_caller(state: &AppState, auth: &AuthContext) -> Result<User> {
    state
        .store
        .find_user(auth.user_id)
        .await?
        .ok_or_else(|| AppError::UserNotFound {
            id: auth.user_id.to_string(),
        })
}

fn parse_section(part: &str, section: &str) -> Result<FormPart> {
    let part: FormPart = part
        .parse()
        .map_err(|_| AppError::validation(format!("Unknown form part: {}", part)))?;
    if !part.has_section(section) {
        return Err(AppError::validation(format!(
            "Unknown section {} in {}",
            section, part
        )));
    }
    Ok(part)
}

pub async fn get_profile(State(state): State<AppState>, auth: AuthContext) -> Result<Json<User>> {
    Ok(Json(load_caller(&state, &auth).await?))
}

/// Identity fields and the form header. Absent fields are left alone.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<User>> {
    if matches!(&request.form_header, Some(header) if !header.is_object()) {
        return Err(AppError::validation("form_header must be an object"));
    }

    let mut user = load_caller(&state, &auth).await?;

    if let Some(name) = request.name.filter(|n| !n.trim().is_empty()) {
        user.name = name.trim().to_string();
    }
    if let Some(department) = request.department {
        user.department = department;
    }
    if let Some(designation) = request.designation {
        user.designation = designation;
    }
    if let Some(employee_id) = request.employee_id {
        user.employee_id = employee_id;
    }
    if let Some(phone) = request.phone {
        user.phone = phone;
    }
    if let Some(header) = request.form_header {
        user.form_header = header;
    }
    user.updated_at = chrono::Utc::now().into();

    let user = state.store.update_user(user).await?;

    tracing::info!(user_id = %user.id, "Profile updated");

    Ok(Json(user))
}

pub async fn get_section(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((part, section)): Path<(String, String)>,
) -> Result<Json<SectionResponse>> {
    let form_part = parse_section(&part, &section)?;
    let user = load_caller(&state, &auth).await?;

    Ok(Json(SectionResponse {
        part: form_part,
        data: user.section(form_part, &section),
        section,
    }))
}

/// Replace one section and return the updated document
pub async fn put_section(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((part, section)): Path<(String, String)>,
    Json(data): Json<Value>,
) -> Result<Json<User>> {
    let form_part = parse_section(&part, &section)?;
    if !(data.is_object() || data.is_array()) {
        return Err(AppError::validation("section must be an object or an array"));
    }

    let mut user = load_caller(&state, &auth).await?;
    user.set_section(form_part, &section, data);
    user.updated_at = chrono::Utc::now().into();

    let user = state.store.update_user(user).await?;

    tracing::info!(user_id = %user.id, part = %form_part, section = %section, "Form section saved");

    Ok(Json(user))
}

/// Compare the stored section with a client-side cache, optionally storing the merge.
/// Cache keys outside the section's own fields are ignored.
pub async fn reconcile_section(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((part, section)): Path<(String, String)>,
    Json(request): Json<ReconcileRequest>,
) -> Result<Json<ReconcileResponse>> {
    let form_part = parse_section(&part, &section)?;
    let mut user = load_caller(&state, &auth).await?;

    let stored = user.section(form_part, &section);
    let cache = reconcile::scope(&request.cache, form_part.section_fields(&section));
    let reconciliation = reconcile::reconcile(&stored, &cache)?;
    let suggestion_count = reconciliation.suggestion_count();

    if request.apply {
        user.set_section(form_part, &section, reconciliation.merged());
        user.updated_at = chrono::Utc::now().into();
        state.store.update_user(user).await?;

        tracing::info!(
            user_id = %auth.user_id,
            part = %form_part,
            section = %section,
            suggestions = suggestion_count,
            "Cached suggestions applied"
        );
    }

    Ok(Json(ReconcileResponse {
        reconciliation,
        suggestion_count,
        applied: request.apply,
    }))
}
