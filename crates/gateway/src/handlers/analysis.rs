//! Simulated LLM analysis of an appraisal

use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::Json;
use crate::{handlers::appraisals::load_visible, AppState};
use sarthi_common::{
    analysis::{self, Analysis},
    auth::AuthContext,
    errors::{AppError, Result},
    metrics,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub appraisal_id: Option<String>,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: Analysis,
    pub message: String,
}

/// Generate a simulated analysis and store it on the appraisal
pub async fn analyze(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>> {
    let raw_id = request
        .appraisal_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::validation("Appraisal ID is required"))?;
    let id = Uuid::parse_str(&raw_id).map_err(|_| AppError::AppraisalNotFound { id: raw_id.clone() })?;

    let mut appraisal = load_visible(&state, &auth, id).await?;

    analysis::simulated_delay(state.config.simulation.analysis_delay()).await;
    let result = analysis::simulate(&mut rand::thread_rng());

    appraisal.llm_analysis = Some(serde_json::to_value(&result)?);
    appraisal.updated_at = chrono::Utc::now().into();
    state.store.update_appraisal(appraisal).await?;
    metrics::record_analysis();

    tracing::info!(
        appraisal_id = %id,
        overall_score = result.overall_score,
        "Appraisal analysis stored"
    );

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis: result,
        message: "LLM analysis completed successfully".to_string(),
    }))
}
