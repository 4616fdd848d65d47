//! Simulated Google Scholar and IEEE Xplore imports

use axum::extract::State;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use uuid::Uuid;

use crate::extract::Json;
use crate::AppState;
use sarthi_common::{
    analysis::simulated_delay,
    auth::AuthContext,
    db::models::{Publication, PublicationSource},
    errors::{AppError, Result},
    metrics,
    scholar::{self, ScrapedPublication},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub query: Option<String>,
    pub faculty_id: Option<String>,
}

#[derive(Serialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub publications: Vec<Publication>,
    pub message: String,
}

pub async fn google_scholar(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>> {
    let delay = state.config.simulation.scholar_delay();
    scrape(state, auth, request, PublicationSource::GoogleScholar, delay).await
}

pub async fn ieee(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>> {
    let delay = state.config.simulation.ieee_delay();
    scrape(state, auth, request, PublicationSource::IeeeXplore, delay).await
}

async fn scrape(
    state: AppState,
    auth: AuthContext,
    request: ScrapeRequest,
    source: PublicationSource,
    delay: RangeInclusive<u64>,
) -> Result<Json<ScrapeResponse>> {
    let present = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let (Some(query), Some(faculty_id)) = (present(request.query), present(request.faculty_id)) else {
        return Err(AppError::validation("Query and facultyId are required"));
    };
    let faculty_id = Uuid::parse_str(&faculty_id)
        .map_err(|_| AppError::validation("facultyId must be a UUID"))?;

    if !auth.can_access(faculty_id) {
        return Err(AppError::Forbidden {
            message: "cannot import publications for another faculty member".to_string(),
        });
    }
    if state.store.find_user(faculty_id).await?.is_none() {
        return Err(AppError::UserNotFound {
            id: faculty_id.to_string(),
        });
    }

    simulated_delay(delay).await;

    let scraped: Vec<ScrapedPublication> = match source {
        PublicationSource::IeeeXplore => scholar::ieee(&mut rand::thread_rng(), &query),
        _ => scholar::google_scholar(&mut rand::thread_rng(), &query),
    };
    let found = scraped.len();

    let publications = state
        .store
        .insert_publications(
            scraped
                .into_iter()
                .map(|p| p.into_publication(faculty_id, source))
                .collect(),
        )
        .await?;
    metrics::record_scrape(source.as_str(), found);

    tracing::info!(
        faculty_id = %faculty_id,
        source = %source,
        count = found,
        "Scraped publications stored"
    );

    let label = match source {
        PublicationSource::IeeeXplore => "IEEE Xplore",
        _ => "Google Scholar",
    };

    Ok(Json(ScrapeResponse {
        success: true,
        publications,
        message: format!("Found {} publications from {}", found, label),
    }))
}
