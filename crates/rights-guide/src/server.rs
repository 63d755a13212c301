//! JSON HTTP API over the flat artifact.
//!
//! The flat projection is loaded once at startup and shared read-only
//! across handlers, the same way the presentation layer holds it in memory.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/categories` | Distinct category names in flat order |
//! | `GET`  | `/topics?q=&category=` | Category filter then text search |
//! | `GET`  | `/topics/{slug}` | One topic by slug |
//! | `GET`  | `/scenarios` | Configured scenarios |
//! | `GET`  | `/scenarios/{id}/topics` | Topics a scenario resolves to |
//! | `POST` | `/visit` | Record a hashed identifier visit |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "topic not found: overtime" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so a static front end on
//! another origin can call the API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use rights_guide_core::models::{self, MatchMode, TopicRow};
use rights_guide_core::search::{apply_query, distinct_categories, find_by_slug, resolve_scenario};

use crate::analytics::{create_sink, hash_uid, track, AnalyticsEvent, AnalyticsSink};
use crate::artifacts::load_flat;
use crate::config::{Config, ScenarioConfig, Urgency};

/// Shared state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    topics: Arc<Vec<TopicRow>>,
    scenarios: Arc<Vec<ScenarioConfig>>,
    sink: Arc<dyn AnalyticsSink>,
}

impl AppState {
    pub fn new(
        topics: Vec<TopicRow>,
        scenarios: Vec<ScenarioConfig>,
        sink: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            topics: Arc::new(topics),
            scenarios: Arc::new(scenarios),
            sink,
        }
    }
}

/// Build the router with all routes and the CORS layer.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/categories", get(handle_categories))
        .route("/topics", get(handle_topics))
        .route("/topics/{slug}", get(handle_topic))
        .route("/scenarios", get(handle_scenarios))
        .route("/scenarios/{id}/topics", get(handle_scenario_topics))
        .route("/visit", post(handle_visit))
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP server on `[server].bind`. Runs until the process is
/// terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let topics = load_flat(config)?;
    let sink = create_sink(&config.analytics)?;
    let bind_addr = config.server.bind.clone();

    info!(
        topics = topics.len(),
        scenarios = config.scenarios.len(),
        sink = sink.name(),
        "loaded flat artifact"
    );

    let app = router(AppState::new(topics, config.scenarios.clone(), sink));

    println!("Rights Guide server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Error type that converts into a JSON error response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /categories ============

#[derive(Serialize)]
struct CategoriesResponse {
    categories: Vec<String>,
}

async fn handle_categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    let categories = distinct_categories(state.topics.as_slice())
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(CategoriesResponse { categories })
}

// ============ GET /topics ============

#[derive(Deserialize)]
struct TopicsParams {
    #[serde(default)]
    q: String,
    /// Empty means no active category.
    #[serde(default)]
    category: Option<String>,
}

#[derive(Serialize)]
struct TopicsResponse {
    count: usize,
    topics: Vec<TopicRow>,
}

impl TopicsResponse {
    fn from_refs(rows: Vec<&TopicRow>) -> Self {
        Self {
            count: rows.len(),
            topics: rows.into_iter().cloned().collect(),
        }
    }
}

async fn handle_topics(
    State(state): State<AppState>,
    Query(params): Query<TopicsParams>,
) -> Json<TopicsResponse> {
    let category = params.category.as_deref().filter(|c| !c.is_empty());
    let query = models::Query::new(params.q, category);
    let results = apply_query(state.topics.as_slice(), &query);

    if !query.text.trim().is_empty() {
        track(
            state.sink.clone(),
            AnalyticsEvent::search(&query.text, results.len()),
        );
    }

    Json(TopicsResponse::from_refs(results))
}

// ============ GET /topics/{slug} ============

async fn handle_topic(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<TopicRow>, AppError> {
    let row = find_by_slug(state.topics.as_slice(), &slug)
        .ok_or_else(|| not_found(format!("topic not found: {}", slug)))?;

    track(
        state.sink.clone(),
        AnalyticsEvent::TopicView {
            slug: row.slug.clone(),
        },
    );

    Ok(Json(row.clone()))
}

// ============ GET /scenarios ============

/// A configured scenario with its match mode resolved.
#[derive(Serialize)]
struct ScenarioInfo {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    urgency: Option<Urgency>,
    mode: MatchMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    keywords: Vec<String>,
}

impl From<&ScenarioConfig> for ScenarioInfo {
    fn from(s: &ScenarioConfig) -> Self {
        Self {
            id: s.id.clone(),
            title: s.title.clone(),
            description: s.description.clone(),
            urgency: s.urgency,
            mode: s.match_mode(),
            category: s.category.clone(),
            keywords: s.keywords.clone(),
        }
    }
}

#[derive(Serialize)]
struct ScenariosResponse {
    scenarios: Vec<ScenarioInfo>,
}

async fn handle_scenarios(State(state): State<AppState>) -> Json<ScenariosResponse> {
    Json(ScenariosResponse {
        scenarios: state.scenarios.iter().map(ScenarioInfo::from).collect(),
    })
}

// ============ GET /scenarios/{id}/topics ============

async fn handle_scenario_topics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TopicsResponse>, AppError> {
    let entry = state
        .scenarios
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| not_found(format!("scenario not found: {}", id)))?;

    let results = resolve_scenario(state.topics.as_slice(), &entry.to_scenario());
    Ok(Json(TopicsResponse::from_refs(results)))
}

// ============ POST /visit ============

#[derive(Deserialize)]
struct VisitRequest {
    uid: String,
}

async fn handle_visit(
    State(state): State<AppState>,
    Json(req): Json<VisitRequest>,
) -> Result<StatusCode, AppError> {
    if req.uid.trim().is_empty() {
        return Err(bad_request("uid must not be empty"));
    }

    // Hashed exactly as received.
    track(
        state.sink.clone(),
        AnalyticsEvent::UidVisit {
            uid_hash: hash_uid(&req.uid),
        },
    );

    Ok(StatusCode::NO_CONTENT)
}
