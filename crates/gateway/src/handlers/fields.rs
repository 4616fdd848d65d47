//! Free-text form filling

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::extract::Json;
use crate::AppState;
use sarthi_common::{
    auth::AuthContext,
    errors::{AppError, Result},
    fields::{FieldMapping, FIELD_SCHEMA},
    metrics,
};

#[derive(Debug, Default, Deserialize)]
pub struct MapFieldsRequest {
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct MapFieldsResponse {
    pub mappings: Vec<FieldMapping>,
}

pub async fn map_fields(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<MapFieldsRequest>,
) -> Result<Json<MapFieldsResponse>> {
    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::validation("Message is required."))?;

    let mappings = state.mapper.map_fields(&message).await?;
    metrics::record_mapping(state.mapper.name(), mappings.len());

    tracing::info!(
        user_id = %auth.user_id,
        mapper = state.mapper.name(),
        matched = mappings.len(),
        catalogue = FIELD_SCHEMA.len(),
        "Fields mapped"
    );

    Ok(Json(MapFieldsResponse { mappings }))
}
