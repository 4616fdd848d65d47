//! Publication listing and manual entry

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::extract::{Json, Query};
use crate::AppState;
use sarthi_common::{
    auth::AuthContext,
    db::{
        models::{Publication, PublicationSource},
        PublicationFilter,
    },
    errors::{AppError, Result},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPublicationsQuery {
    pub faculty_id: Option<Uuid>,
    pub source: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePublicationRequest {
    #[validate(length(min = 1, max = 1000))]
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub authors: Vec<String>,

    pub venue: Option<String>,

    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,

    #[validate(range(min = 0))]
    #[serde(default)]
    pub citations: i32,

    pub url: Option<String>,

    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,

    pub source: Option<String>,

    #[serde(default)]
    pub metadata: Value,
}

#[derive(Serialize)]
pub struct PublicationListResponse {
    pub publications: Vec<Publication>,
}

#[derive(Serialize)]
pub struct PublicationResponse {
    pub publication: Publication,
}

/// Newest year first, with any combination of filters
pub async fn list_publications(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(query): Query<ListPublicationsQuery>,
) -> Result<Json<PublicationListResponse>> {
    let filter = PublicationFilter {
        faculty_id: query.faculty_id,
        source: query.source.filter(|s| !s.is_empty()),
        year: query.year,
    };

    let publications = state.store.list_publications(&filter).await?;
    Ok(Json(PublicationListResponse { publications }))
}

/// Record a publication for the caller
pub async fn create_publication(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreatePublicationRequest>,
) -> Result<(StatusCode, Json<PublicationResponse>)> {
    request.validate()?;

    let source = match request.source.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => raw
            .parse::<PublicationSource>()
            .map_err(|_| AppError::validation(format!("Invalid source: {}", raw)))?,
        None => PublicationSource::Manual,
    };

    let publication = Publication {
        id: Uuid::new_v4(),
        faculty_id: auth.user_id,
        title: request.title.trim().to_string(),
        authors: json!(request.authors),
        venue: request.venue,
        year: request.year,
        citations: request.citations,
        url: request.url,
        abstract_text: request.abstract_text,
        source: source.as_str().to_string(),
        metadata: if request.metadata.is_object() {
            request.metadata
        } else {
            json!({})
        },
        created_at: chrono::Utc::now().into(),
    };

    let mut created = state.store.insert_publications(vec![publication]).await?;
    let publication = created
        .pop()
        .ok_or_else(|| AppError::Internal {
            message: "publication insert returned no rows".to_string(),
        })?;

    tracing::info!(
        publication_id = %publication.id,
        faculty_id = %auth.user_id,
        source = %source,
        "Publication created"
    );

    Ok((StatusCode::CREATED, Json(PublicationResponse { publication })))
}
