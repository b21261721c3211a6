// Talent Tables - Web Server
// REST API over the join resolver, the dispatcher and the activity writer

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use talent_tables::{Config, DataOptions, DataService, StoreError};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{fmt, EnvFilter};

/// Shared application state
#[derive(Clone)]
struct AppState {
    service: Arc<DataService>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Query for GET /api/activities
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityQuery {
    candidate_id: Option<String>,
    job_id: Option<String>,
}

fn status_for(error: &StoreError) -> StatusCode {
    match error {
        StoreError::UnknownEntity(_) | StoreError::MissingOption { .. } => StatusCode::BAD_REQUEST,
        StoreError::TableNotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Wrap a library result; referential misses are `data: null`, not errors
fn respond<T: Serialize>(result: talent_tables::Result<T>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "request failed");
            (status_for(&e), Json(ApiResponse::<()>::err(e.to_string()))).into_response()
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/jobs
async fn list_jobs(State(state): State<AppState>) -> Response {
    respond(state.service.resolver().list_jobs())
}

/// GET /api/jobs/:id
async fn get_job(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(state.service.resolver().job_by_id(&id))
}

/// GET /api/companies
async fn list_companies(State(state): State<AppState>) -> Response {
    respond(state.service.resolver().list_companies())
}

/// GET /api/companies/:id
async fn get_company(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(state.service.resolver().company_by_id(&id))
}

/// GET /api/companies/:id/bundle - company, jobs, KPIs, talent map
async fn get_company_bundle(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(state.service.resolver().company_bundle(&id))
}

/// GET /api/companies/:id/jobs
async fn get_company_jobs(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(state.service.resolver().jobs_by_company(&id))
}

/// GET /api/call-lists
async fn list_call_lists(State(state): State<AppState>) -> Response {
    respond(state.service.resolver().list_call_lists())
}

/// GET /api/call-lists/:id
async fn get_call_list(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(state.service.resolver().call_list_by_id(&id))
}

/// GET /api/call-lists/:id/bundle
async fn get_call_list_bundle(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(state.service.resolver().call_list_bundle(&id))
}

/// GET /api/call-lists/:id/candidates
async fn get_call_list_candidates(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(state.service.resolver().candidates_for_call_list(&id))
}

/// GET /api/call-lists/:id/job - {job, company}
async fn get_call_list_job(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(state.service.resolver().job_and_company_for_call_list(&id))
}

/// GET /api/call-lists/:id/items
async fn get_call_list_items(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(state.service.resolver().call_list_items(&id))
}

/// GET /api/candidates/:id
async fn get_candidate(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(state.service.resolver().candidate_by_id(&id))
}

/// GET /api/activities?candidateId=..&jobId=..
async fn get_activities(State(state): State<AppState>, Query(query): Query<ActivityQuery>) -> Response {
    respond(state.service.resolver().activities_for_context(
        query.candidate_id.as_deref().unwrap_or(""),
        query.job_id.as_deref().unwrap_or(""),
    ))
}

/// POST /api/activities - body is a flat field map
async fn post_activity(
    State(state): State<AppState>,
    Json(fields): Json<HashMap<String, String>>,
) -> Response {
    respond(state.service.save_activity(&fields))
}

/// GET /api/data/:entity - generic dispatcher
async fn get_data(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Query(options): Query<DataOptions>,
) -> Response {
    respond(state.service.get_data_by_name(&entity, &options))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    let store = config.open_store().context("Failed to open store")?;
    tracing::info!(backend = ?config.backend, "store ready");

    // Create shared state
    let state = AppState {
        service: Arc::new(DataService::new(store, config.activity_defaults())),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/jobs", get(list_jobs))
        .route("/jobs/:id", get(get_job))
        .route("/companies", get(list_companies))
        .route("/companies/:id", get(get_company))
        .route("/companies/:id/bundle", get(get_company_bundle))
        .route("/companies/:id/jobs", get(get_company_jobs))
        .route("/call-lists", get(list_call_lists))
        .route("/call-lists/:id", get(get_call_list))
        .route("/call-lists/:id/bundle", get(get_call_list_bundle))
        .route("/call-lists/:id/candidates", get(get_call_list_candidates))
        .route("/call-lists/:id/job", get(get_call_list_job))
        .route("/call-lists/:id/items", get(get_call_list_items))
        .route("/candidates/:id", get(get_candidate))
        .route("/activities", get(get_activities).post(post_activity))
        .route("/data/:entity", get(get_data))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("server running on http://localhost:3000/api");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
