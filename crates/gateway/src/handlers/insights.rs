//! Rule-based PBAS insights

use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::extract::Json;
use crate::AppState;
use sarthi_common::{
    auth::AuthContext,
    errors::{AppError, Result},
    insights::{self, InsightReport},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsRequest {
    /// `{part_a, part_b}` or a bare `part_b`; defaults to the caller's profile
    pub profile_data: Option<Value>,
    pub analysis_type: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<String>,
    pub data: InsightReport,
}

pub async fn pbas_insights(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<InsightsRequest>,
) -> Result<Json<InsightsResponse>> {
    let profile = match request.profile_data.filter(|p| !p.is_null()) {
        Some(data) => data,
        None => {
            let user = state
                .store
                .find_user(auth.user_id)
                .await?
                .ok_or_else(|| AppError::UserNotFound {
                    id: auth.user_id.to_string(),
                })?;
            json!({ "part_a": user.part_a, "part_b": user.part_b })
        }
    };

    let report = insights::analyze(&profile);

    tracing::info!(
        user_id = %auth.user_id,
        insights = report.insights.len(),
        estimated_api_score = report.estimated_api_score,
        "PBAS insights generated"
    );

    Ok(Json(InsightsResponse {
        success: true,
        analysis_type: request.analysis_type,
        data: report,
    }))
}

/// Usage description
pub async fn describe() -> Json<Value> {
    Json(json!({
        "message": "PBAS AI Analysis API",
        "description": "Generate rule-based insights for faculty PBAS data",
        "usage": {
            "method": "POST",
            "body": {
                "profileData": "Faculty profile data object containing part_a and part_b",
                "analysisType": "Optional: summary | recommendations | comparison | forecast"
            }
        },
        "model": insights::MODEL_NAME,
    }))
}
