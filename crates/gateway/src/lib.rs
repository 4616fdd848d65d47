//! Shikshak Sarthi API Gateway
//!
//! Router and handlers for the appraisal service. Handles:
//! - Authentication and authorization
//! - Rate limiting
//! - Request routing
//! - Observability (logging, metrics)

pub mod extract;
pub mod handlers;
pub mod middleware;

use axum::{
    extract::FromRef,
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sarthi_common::{
    auth::JwtManager,
    config::AppConfig,
    db::Store,
    fields::{self, FieldMapper},
    mail::{self, Mailer},
    Result,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub jwt: Arc<JwtManager>,
    pub mailer: Arc<dyn Mailer>,
    pub mapper: Arc<dyn FieldMapper>,
    /// Set when the Prometheus recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state with the mailer and mapper the config selects
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Result<Self> {
        let mailer = mail::from_config(&config.mail)?;
        let mapper = fields::from_config(&config.mapping)?;
        Ok(Self::with_services(config, store, mailer, mapper))
    }

    pub fn with_services(
        config: AppConfig,
        store: Arc<dyn Store>,
        mailer: Arc<dyn Mailer>,
        mapper: Arc<dyn FieldMapper>,
    ) -> Self {
        let jwt = Arc::new(JwtManager::new(
            &config.auth.jwt_secret,
            config.auth.jwt_expiration_secs,
        ));

        Self {
            config: Arc::new(config),
            store,
            jwt,
            mailer,
            mapper,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl FromRef<AppState> for Arc<JwtManager> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

impl FromRef<AppState> for Arc<dyn Store> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let api_routes = Router::new()
        // Authentication (no token)
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))

        // User administration
        .route(
            "/admin/users",
            get(handlers::users::list_users)
                .post(handlers::users::create_user)
                .patch(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )

        // Profile documents
        .route(
            "/profile",
            get(handlers::profile::get_profile).put(handlers::profile::update_profile),
        )
        .route(
            "/profile/{part}/{section}",
            get(handlers::profile::get_section).put(handlers::profile::put_section),
        )
        .route(
            "/profile/{part}/{section}/reconcile",
            post(handlers::profile::reconcile_section),
        )

        // Appraisals
        .route(
            "/appraisals",
            get(handlers::appraisals::list_appraisals).post(handlers::appraisals::create_appraisal),
        )
        .route("/appraisals/{id}", get(handlers::appraisals::get_appraisal))
        .route("/appraisals/{id}/submit", post(handlers::appraisals::submit_appraisal))
        .route("/appraisals/{id}/status", patch(handlers::appraisals::update_status))
        .route(
            "/appraisals/{id}/comments",
            get(handlers::appraisals::list_comments).post(handlers::appraisals::add_comment),
        )

        // Publications
        .route(
            "/publications",
            get(handlers::publications::list_publications)
                .post(handlers::publications::create_publication),
        )

        // Simulated analysis and scraping
        .route("/llm/analyze", post(handlers::analysis::analyze))
        .route("/scrape/google-scholar", post(handlers::scrape::google_scholar))
        .route("/scrape/ieee", post(handlers::scrape::ieee))

        // Rule-based PBAS insights
        .route(
            "/ai/pbas-insights",
            get(handlers::insights::describe).post(handlers::insights::pbas_insights),
        )

        // Email
        .route("/email/send-notification", post(handlers::email::send_notification))
        .route("/email/password-reset", post(handlers::email::password_reset))

        // Field mapping
        .route("/map-fields", post(handlers::fields::map_fields))

        // Printable reports
        .route("/reports/appraisals/{id}", get(handlers::reports::appraisal_report))
        .route("/reports/summary", get(handlers::reports::summary_report))
        .route("/reports/pbas", get(handlers::reports::pbas_report));

    let mut app = Router::new()
        // Health endpoints (no auth)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .route("/metrics", get(handlers::health::metrics))
        .nest("/api", api_routes)
        .layer(axum::middleware::from_fn(middleware::metrics::track_requests));

    if config.rate_limit.enabled {
        let limiter = middleware::rate_limit::create_rate_limiter(
            config.rate_limit.requests_per_second,
            config.rate_limit.burst,
        );
        app = app.layer(axum::middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit::rate_limit,
        ));
    }

    // Compose the app
    app.layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(ConcurrencyLimitLayer::new(config.server.max_concurrent_requests.max(1)))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}
