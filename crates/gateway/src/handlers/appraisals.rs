//! Appraisal lifecycle and reviewer comments

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::extract::{Json, Path, Query};
use crate::{handlers::email::notify, AppState};
use sarthi_common::{
    auth::AuthContext,
    db::{
        models::{AdminComment, Appraisal, AppraisalStatus, CommentType},
        AppraisalFilter,
    },
    errors::{AppError, Result},
    mail::NotificationType,
    metrics,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListAppraisalsQuery {
    pub status: Option<String>,
    pub academic_year: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateAppraisalRequest {
    pub title: Option<String>,
    pub academic_year: Option<String>,
    pub self_assessment: Option<Value>,
    pub teaching_activities: Option<Value>,
    pub research_activities: Option<Value>,
    pub service_activities: Option<Value>,
    pub professional_development: Option<Value>,
    pub goals_achievements: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub comment: Option<String>,
    pub comment_type: Option<String>,
}

#[derive(Serialize)]
pub struct AppraisalListResponse {
    pub appraisals: Vec<Appraisal>,
}

#[derive(Serialize)]
pub struct AppraisalResponse {
    pub appraisal: Appraisal,
}

#[derive(Serialize)]
pub struct AppraisalDetailResponse {
    pub appraisal: Appraisal,
    pub comments: Vec<AdminComment>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResponse {
    pub appraisal: Appraisal,
    pub email_sent: bool,
}

#[derive(Serialize)]
pub struct CommentResponse {
    pub comment: AdminComment,
}

#[derive(Serialize)]
pub struct CommentListResponse {
    pub comments: Vec<AdminComment>,
}

/// Fetch an appraisal the caller may see
pub(crate) async fn load_visible(
    state: &AppState,
    auth: &AuthContext,
    id: Uuid,
) -> Result<Appraisal> {
    let appraisal = state
        .store
        .find_appraisal(id)
        .await?
        .ok_or_else(|| AppError::AppraisalNotFound { id: id.to_string() })?;

    if !auth.can_access(appraisal.faculty_id) {
        return Err(AppError::Forbidden {
            message: "not your appraisal".to_string(),
        });
    }
    Ok(appraisal)
}

async fn notify_owner(state: &AppState, appraisal: &Appraisal, kind: NotificationType) -> bool {
    match state.store.find_user(appraisal.faculty_id).await {
        Ok(Some(owner)) => notify(state, &owner, kind, &HashMap::new()).await,
        Ok(None) => false,
        Err(e) => {
            tracing::warn!(appraisal_id = %appraisal.id, error = %e, "Owner lookup failed");
            false
        }
    }
}

/// Reviewers see every appraisal, everyone else only their own
pub async fn list_appraisals(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListAppraisalsQuery>,
) -> Result<Json<AppraisalListResponse>> {
    let filter = AppraisalFilter {
        faculty_id: (!auth.can_review()).then_some(auth.user_id),
        status: query.status.filter(|s| !s.is_empty()),
        academic_year: query.academic_year.filter(|y| !y.is_empty()),
    };

    let appraisals = state.store.list_appraisals(&filter).await?;
    Ok(Json(AppraisalListResponse { appraisals }))
}

/// Create a draft owned by the caller
pub async fn create_appraisal(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateAppraisalRequest>,
) -> Result<(StatusCode, Json<AppraisalResponse>)> {
    let academic_year = request
        .academic_year
        .map(|y| y.trim().to_string())
        .filter(|y| !y.is_empty())
        .ok_or_else(|| AppError::validation("academic_year is required"))?;

    let block = |value: Option<Value>| value.filter(Value::is_object).unwrap_or_else(|| json!({}));
    let now = chrono::Utc::now().into();

    let appraisal = Appraisal {
        id: Uuid::new_v4(),
        faculty_id: auth.user_id,
        title: request
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Faculty Appraisal {}", academic_year)),
        academic_year,
        status: AppraisalStatus::Draft.as_str().to_string(),
        self_assessment: block(request.self_assessment),
        teaching_activities: block(request.teaching_activities),
        research_activities: block(request.research_activities),
        service_activities: block(request.service_activities),
        professional_development: block(request.professional_development),
        goals_achievements: block(request.goals_achievements),
        llm_analysis: None,
        submitted_at: None,
        reviewed_at: None,
        approved_at: None,
        created_at: now,
        updated_at: now,
    };

    let appraisal = state.store.insert_appraisal(appraisal).await?;

    tracing::info!(
        appraisal_id = %appraisal.id,
        faculty_id = %auth.user_id,
        academic_year = %appraisal.academic_year,
        "Appraisal created"
    );

    Ok((StatusCode::CREATED, Json(AppraisalResponse { appraisal })))
}

pub async fn get_appraisal(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<AppraisalDetailResponse>> {
    let appraisal = load_visible(&state, &auth, id).await?;
    let comments = state.store.list_comments(id).await?;

    Ok(Json(AppraisalDetailResponse {
        appraisal,
        comments,
    }))
}

/// Owner submits a draft, or resubmits after rejection
pub async fn submit_appraisal(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<TransitionResponse>> {
    let mut appraisal = state
        .store
        .find_appraisal(id)
        .await?
        .ok_or_else(|| AppError::AppraisalNotFound { id: id.to_string() })?;

    if appraisal.faculty_id != auth.user_id {
        return Err(AppError::Forbidden {
            message: "only the owner can submit an appraisal".to_string(),
        });
    }

    let current = appraisal.appraisal_status();
    if !current.can_submit() {
        return Err(AppError::InvalidTransition {
            from: current.to_string(),
            to: AppraisalStatus::Submitted.to_string(),
        });
    }

    let now = chrono::Utc::now().into();
    appraisal.status = AppraisalStatus::Submitted.as_str().to_string();
    appraisal.submitted_at = Some(now);
    appraisal.updated_at = now;

    let appraisal = state.store.update_appraisal(appraisal).await?;
    metrics::record_transition(AppraisalStatus::Submitted.as_str());

    tracing::info!(appraisal_id = %id, from = %current, "Appraisal submitted");

    let email_sent = notify_owner(&state, &appraisal, NotificationType::FormSubmitted).await;

    Ok(Json(TransitionResponse {
        appraisal,
        email_sent,
    }))
}

/// Reviewer sets any of the five statuses
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<TransitionResponse>> {
    auth.require_reviewer()?;

    let requested = request.status.unwrap_or_default();
    let status: AppraisalStatus = requested
        .parse()
        .map_err(|_| AppError::InvalidStatus { status: requested.clone() })?;

    let mut appraisal = state
        .store
        .find_appraisal(id)
        .await?
        .ok_or_else(|| AppError::AppraisalNotFound { id: id.to_string() })?;

    let previous = appraisal.appraisal_status();
    let now = chrono::Utc::now().into();
    appraisal.status = status.as_str().to_string();
    appraisal.updated_at = now;
    match status {
        AppraisalStatus::UnderReview => appraisal.reviewed_at = Some(now),
        AppraisalStatus::Approved => appraisal.approved_at = Some(now),
        _ => {}
    }

    let appraisal = state.store.update_appraisal(appraisal).await?;
    metrics::record_transition(status.as_str());

    tracing::info!(
        appraisal_id = %id,
        from = %previous,
        to = %status,
        reviewer_id = %auth.user_id,
        "Appraisal status updated"
    );

    let notification = match status {
        AppraisalStatus::Approved => Some(NotificationType::FormApproved),
        AppraisalStatus::Rejected => Some(NotificationType::FormRejected),
        _ => None,
    };
    let email_sent = match notification {
        Some(kind) => notify_owner(&state, &appraisal, kind).await,
        None => false,
    };

    Ok(Json(TransitionResponse {
        appraisal,
        email_sent,
    }))
}

pub async fn list_comments(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<CommentListResponse>> {
    load_visible(&state, &auth, id).await?;
    let comments = state.store.list_comments(id).await?;
    Ok(Json(CommentListResponse { comments }))
}

/// Append a reviewer comment
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<AddCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>)> {
    auth.require_reviewer()?;

    let comment = request
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::validation("comment is required"))?;

    let comment_type = match request.comment_type.as_deref().filter(|t| !t.is_empty()) {
        Some(raw) => raw
            .parse::<CommentType>()
            .map_err(|_| AppError::validation(format!("Invalid comment_type: {}", raw)))?,
        None => CommentType::default(),
    };

    if state.store.find_appraisal(id).await?.is_none() {
        return Err(AppError::AppraisalNotFound { id: id.to_string() });
    }

    let comment = state
        .store
        .insert_comment(AdminComment {
            id: Uuid::new_v4(),
            appraisal_id: id,
            admin_id: auth.user_id,
            comment,
            comment_type: comment_type.as_str().to_string(),
            created_at: chrono::Utc::now().into(),
        })
        .await?;

    tracing::info!(
        appraisal_id = %id,
        comment_id = %comment.id,
        comment_type = %comment_type,
        "Reviewer comment added"
    );

    Ok((StatusCode::CREATED, Json(CommentResponse { comment })))
}
