use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tokio::sync::Mutex;

use talentsync_api::errors::AppError;
use talentsync_api::llm_client::LlmClient;

use crate::models::{CandidateDetails, EmployeeRecord, SyncStatus};
use crate::service::{run_cycle, SyncReport};
use crate::store;
use crate::zoho::ZohoClient;

#[derive(Clone)]
pub struct SyncState {
    pub db: PgPool,
    pub zoho: ZohoClient,
    pub llm: LlmClient,
    pub interval_minutes: i64,
    /// Serializes manual triggers against the periodic loop so two cycles
    /// never interleave.
    pub sync_lock: Arc<Mutex<()>>,
}

pub fn build_router(state: SyncState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/sync", post(handle_trigger_sync))
        .route("/sync/status", get(handle_sync_status))
        .route("/employees", get(handle_list_employees))
        .route("/candidates", get(handle_list_candidates))
        .route("/candidates/:employee_id", get(handle_get_candidate))
        .with_state(state)
}

/// GET /health
async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "talentsync-sync"
    }))
}

/// POST /sync — runs one cycle immediately.
async fn handle_trigger_sync(
    State(state): State<SyncState>,
) -> Result<Json<SyncReport>, AppError> {
    let _guard = state.sync_lock.lock().await;
    let report = run_cycle(&state.db, &state.zoho, &state.llm, state.interval_minutes).await?;
    Ok(Json(report))
}

/// GET /sync/status
async fn handle_sync_status(State(state): State<SyncState>) -> Result<Json<SyncStatus>, AppError> {
    let status = store::get_sync_status(&state.db).await?;
    status
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No sync cycle has completed yet".to_string()))
}

/// GET /employees
async fn handle_list_employees(
    State(state): State<SyncState>,
) -> Result<Json<Vec<EmployeeRecord>>, AppError> {
    let employees = store::list_employees(&state.db).await?;
    Ok(Json(employees))
}

/// GET /candidates
async fn handle_list_candidates(
    State(state): State<SyncState>,
) -> Result<Json<Vec<CandidateDetails>>, AppError> {
    let details = store::list_candidate_details(&state.db).await?;
    Ok(Json(details))
}

/// GET /candidates/:employee_id
async fn handle_get_candidate(
    State(state): State<SyncState>,
    Path(employee_id): Path<String>,
) -> Result<Json<CandidateDetails>, AppError> {
    let details = store::get_candidate_details(&state.db, &employee_id).await?;
    details.map(Json).ok_or_else(|| {
        AppError::NotFound(format!(
            "Candidate details for employee {employee_id} not found"
        ))
    })
}
