//! Printable HTML reports

use axum::{extract::State, response::Html};
use serde::Deserialize;
use uuid::Uuid;

use crate::extract::{Path, Query};
use crate::{handlers::appraisals::load_visible, AppState};
use sarthi_common::{
    auth::AuthContext,
    db::{AppraisalFilter, PublicationFilter},
    errors::{AppError, Result},
    report::{self, SummaryStats},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbasReportQuery {
    /// Defaults to the caller
    pub user_id: Option<Uuid>,
}

/// One appraisal with its owner's publications
pub async fn appraisal_report(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Html<String>> {
    let appraisal = load_visible(&state, &auth, id).await?;

    let faculty = state
        .store
        .find_user(appraisal.faculty_id)
        .await?
        .ok_or_else(|| AppError::UserNotFound {
            id: appraisal.faculty_id.to_string(),
        })?;

    let publications = state
        .store
        .list_publications(&PublicationFilter {
            faculty_id: Some(faculty.id),
            ..Default::default()
        })
        .await?;

    tracing::info!(appraisal_id = %id, publications = publications.len(), "Appraisal report rendered");

    Ok(Html(report::render_appraisal(
        &faculty,
        &appraisal,
        &publications,
        chrono::Utc::now(),
    )))
}

/// Institution-wide totals
pub async fn summary_report(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Html<String>> {
    auth.require_reviewer()?;

    let appraisals = state.store.list_appraisals(&AppraisalFilter::default()).await?;
    let stats = SummaryStats::from_appraisals(&appraisals);

    tracing::info!(total = stats.total_appraisals, "Summary report rendered");

    Ok(Html(report::render_summary(&stats, chrono::Utc::now())))
}

/// Filled PBAS form for the caller, or for `userId` when the caller reviews
pub async fn pbas_report(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<PbasReportQuery>,
) -> Result<Html<String>> {
    let user_id = query.user_id.unwrap_or(auth.user_id);
    if !auth.can_access(user_id) {
        return Err(AppError::Forbidden {
            message: "cannot export another user's form".to_string(),
        });
    }

    let user = state
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::UserNotFound {
            id: user_id.to_string(),
        })?;

    tracing::info!(user_id = %user.id, requested_by = %auth.user_id, "PBAS form rendered");

    Ok(Html(report::render_pbas_form(&user, chrono::Utc::now())))
}
