use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::candidates::store as candidate_store;
use crate::errors::AppError;
use crate::extract::extract_job;
use crate::ingest::{audit, multipart::read_file_field, parsing};
use crate::jobs::store;
use crate::matching::rank_candidates;
use crate::models::candidate::CandidateMatch;
use crate::models::job::{JobPosting, JobPostingCreate, JobPostingUpdate};
use crate::state::AppState;

/// GET /api/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    let jobs = store::list_jobs(&state.db).await?;
    Ok(Json(jobs))
}

/// POST /api/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<JobPostingCreate>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    let job = store::create_job(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// POST /api/jobs/upload
///
/// Creates a job posting from an uploaded description document. The
/// pipeline is parse, extract, persist; structured-field extraction needs
/// a configured LLM and fails the request with 503 when there is none.
pub async fn handle_upload_job(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    let upload = read_file_field(&mut multipart).await?;

    if !parsing::is_supported_document(&upload.file_name) {
        return Err(AppError::Validation(format!(
            "Unsupported file type: {}. Supported types: PDF, TXT",
            upload.file_name
        )));
    }
    if upload.bytes.len() > parsing::MAX_UPLOAD_BYTES {
        return Err(AppError::PayloadTooLarge(format!(
            "File exceeds the {} byte upload limit",
            parsing::MAX_UPLOAD_BYTES
        )));
    }

    let text = parsing::extract_text(&upload.bytes, &upload.file_name)
        .map_err(|e| AppError::Validation(format!("Failed to extract text: {e}")))?;
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "Uploaded file contains no extractable text".to_string(),
        ));
    }

    let llm = state.require_llm()?;
    let extracted = extract_job(llm, &text).await?;
    let job = store::create_job_from_extraction(&state.db, extracted).await?;

    audit::record_raw_upload(&state.db, &upload.file_name, &upload.content_hash(), &text).await;

    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobPosting>, AppError> {
    let job = store::get_job(&state.db, &id).await?;
    Ok(Json(job))
}

/// PUT /api/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<JobPostingUpdate>,
) -> Result<Json<JobPosting>, AppError> {
    let job = store::update_job(&state.db, &id, req).await?;
    Ok(Json(job))
}

/// DELETE /api/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    store::delete_job(&state.db, &id).await?;
    Ok(Json(json!({ "message": "Job posting deleted successfully" })))
}

/// GET /api/jobs/:id/candidates
///
/// Ranks stored candidates against the job's skill list. A job with no
/// skills matches nobody.
pub async fn handle_matching_candidates(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CandidateMatch>>, AppError> {
    let job = store::get_job(&state.db, &id).await?;
    let job_skills = job.skills.unwrap_or_default();
    let candidates = candidate_store::list_candidates_for_matching(&state.db).await?;
    Ok(Json(rank_candidates(&job_skills, candidates)))
}
