use axum::{
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{header, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::candidates::prompts::{profile_summary_prompt, PROFILE_SUMMARY_SYSTEM};
use crate::candidates::store::{self, NewCandidate};
use crate::documents::store as document_store;
use crate::errors::AppError;
use crate::extract::extract_candidate;
use crate::ingest::multipart::{read_file_field, UploadedFile};
use crate::ingest::{audit, parsing, storage};
use crate::models::candidate::{Candidate, CandidateCreate, CandidateUpdate};
use crate::models::document::FileType;
use crate::render::render_profile_pdf;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

/// GET /api/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    let skip = params.skip.max(0);
    let limit = params.limit.clamp(1, 1000);
    let candidates = store::list_candidates(&state.db, skip, limit).await?;
    Ok(Json(candidates))
}

/// GET /api/candidates/search
pub async fn handle_search_candidates(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    if params.q.trim().is_empty() {
        return Err(AppError::Validation(
            "Search query must not be empty".to_string(),
        ));
    }
    let candidates = store::search_candidates(&state.db, &params.q).await?;
    Ok(Json(candidates))
}

/// POST /api/candidates
///
/// Accepts either a JSON body or a multipart form. The multipart form may
/// carry a resume file alongside the text fields; the file is stored as the
/// candidate's document without running extraction, since the fields were
/// supplied directly.
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    req: Request,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let (fields, file) = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(req, &state)
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?;
        read_candidate_form(multipart).await?
    } else {
        let Json(create) = Json::<CandidateCreate>::from_request(req, &state)
            .await
            .map_err(|e| AppError::Validation(format!("Invalid JSON payload: {e}")))?;
        (create, None)
    };

    if let Some(email) = fields.email.as_deref().filter(|e| !e.trim().is_empty()) {
        if store::find_by_email(&state.db, email).await?.is_some() {
            return Err(AppError::Validation(format!(
                "Candidate with email {email} already exists"
            )));
        }
    }

    let candidate = store::insert_candidate(
        &state.db,
        NewCandidate {
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            skills: fields.skills,
            experience: fields.experience,
            education: fields.education,
            location: fields.location,
            summary: fields.summary,
            ..Default::default()
        },
    )
    .await?;

    let mut document_id = None;
    if let Some((file_name, bytes)) = file {
        if parsing::is_supported_document(&file_name) && !bytes.is_empty() {
            let content_text = parsing::extract_text(&bytes, &file_name).unwrap_or_default();
            let document =
                attach_document(&state, candidate.id, &file_name, &bytes, &content_text).await?;
            document_id = Some(document.id);
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": candidate.id,
            "document_id": document_id,
            "message": "Candidate created successfully"
        })),
    ))
}

/// GET /api/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Candidate>, AppError> {
    let candidate = store::get_candidate(&state.db, id).await?;
    Ok(Json(candidate))
}

/// PUT /api/candidates/:id
pub async fn handle_update_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CandidateUpdate>,
) -> Result<Json<Candidate>, AppError> {
    let candidate = store::update_candidate(&state.db, id, req).await?;
    Ok(Json(candidate))
}

/// DELETE /api/candidates/:id
///
/// Removes the candidate's document first so a failure there leaves the
/// candidate intact and the operation retryable.
pub async fn handle_delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let candidate = store::get_candidate(&state.db, id).await?;
    if let Some(document_id) = candidate.document_id {
        document_store::delete_document(&state.db, document_id).await?;
    }
    store::delete_candidate(&state.db, id).await?;
    Ok(Json(json!({ "message": "Candidate deleted successfully" })))
}

/// POST /api/candidates/upload
///
/// Resume ingestion. De-duplication by content hash happens before any
/// parsing or LLM work; extraction problems degrade the response rather
/// than failing it, so the uploaded bytes are never lost.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), AppError> {
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

    let file_hash = upload.content_hash();
    if let Some(existing) = store::find_by_file_hash(&state.db, &file_hash).await? {
        return Ok((
            StatusCode::OK,
            Json(json!({
                "duplicate": true,
                "id": existing.id,
                "document_id": existing.document_id,
                "message": "This resume was already uploaded"
            })),
        ));
    }

    let (text, parse_note) = match parsing::extract_text(&upload.bytes, &upload.file_name) {
        Ok(text) => (text, None),
        Err(e) => (String::new(), Some(format!("Text extraction failed: {e}"))),
    };

    let mut extraction_note = None;
    let mut new = NewCandidate {
        raw_text: (!text.is_empty()).then(|| text.clone()),
        file_hash: Some(file_hash.clone()),
        ..Default::default()
    };
    if !text.trim().is_empty() {
        match &state.llm {
            Some(llm) => match extract_candidate(llm, &text).await {
                Ok(extracted) => {
                    new.name = extracted.name;
                    new.email = extracted.email;
                    new.phone = extracted.phone;
                    new.skills = extracted.skills;
                    new.experience = extracted.experience;
                    new.education = extracted.education;
                    new.location = extracted.location;
                    new.summary = extracted.summary;
                }
                Err(e) => {
                    extraction_note =
                        Some(format!("Structured extraction failed, raw text kept: {e}"));
                }
            },
            None => {
                extraction_note = Some(
                    "LLM is not configured; candidate stored with raw text only".to_string(),
                );
            }
        }
    }

    let candidate = store::insert_candidate(&state.db, new).await?;
    let document = attach_document(&state, candidate.id, &upload.file_name, &upload.bytes, &text)
        .await?;
    audit::record_raw_upload(&state.db, &upload.file_name, &file_hash, &text).await;

    Ok(resume_upload_response(
        &candidate,
        document.id,
        parse_note.or(extraction_note),
    ))
}

/// Shapes the resume-upload response. A degraded pipeline (parse failure,
/// extraction failure, no LLM) answers 200 with an explanatory message;
/// only the clean path answers 201.
fn resume_upload_response(
    candidate: &Candidate,
    document_id: Uuid,
    degradation: Option<String>,
) -> (StatusCode, Json<Value>) {
    let raw_text = candidate.raw_text.clone().filter(|_| {
        // Echo the raw text back only when the caller must finish the
        // profile by hand.
        candidate.name.is_none() && candidate.email.is_none()
    });
    let (status, message) = match degradation {
        Some(message) => (StatusCode::OK, message),
        None => (
            StatusCode::CREATED,
            "Resume processed successfully".to_string(),
        ),
    };
    (
        status,
        Json(json!({
            "duplicate": false,
            "id": candidate.id,
            "document_id": document_id,
            "message": message,
            "raw_text": raw_text
        })),
    )
}

/// POST /api/candidates/:id/extra-details
pub async fn handle_add_extra_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    store::get_candidate(&state.db, id).await?;

    let upload = read_file_field(&mut multipart).await?;
    validate_extra_detail_upload(&upload)?;

    let text = parsing::extract_text(&upload.bytes, &upload.file_name)
        .map_err(|e| AppError::TextExtraction(e.to_string()))?;
    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "File contains no extractable text".to_string(),
        ));
    }

    let detail_type = classify_detail_type(&upload.file_name);
    let detail = store::insert_extra_detail(&state.db, id, &text, detail_type).await?;
    Ok(Json(serde_json::to_value(detail).map_err(anyhow::Error::from)?))
}

/// GET /api/candidates/:id/extra-details
pub async fn handle_list_extra_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    store::get_candidate(&state.db, id).await?;
    let details = store::list_extra_details(&state.db, id).await?;
    Ok(Json(json!({ "candidate_id": id, "details": details })))
}

/// POST /api/candidates/:id/profile-summary
///
/// Generates a one-page PDF profile summary from everything on record.
pub async fn handle_profile_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let candidate = store::get_candidate(&state.db, id).await?;
    let llm = state.require_llm()?;

    let details = store::list_extra_details(&state.db, id).await?;
    let prompt = profile_summary_prompt(&candidate, &details);
    let body = llm
        .complete(&prompt, PROFILE_SUMMARY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Profile summary generation failed: {e}")))?;

    let name = candidate.name.as_deref().unwrap_or("Candidate");
    let pdf = render_profile_pdf(name, &body);

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"profile_summary_{id}.pdf\""),
        ),
    ];
    Ok((headers, pdf))
}

/// Stores uploaded bytes and links the resulting document to the candidate.
async fn attach_document(
    state: &AppState,
    candidate_id: Uuid,
    file_name: &str,
    bytes: &[u8],
    content_text: &str,
) -> Result<crate::models::document::Document, AppError> {
    let file_type = FileType::from_file_name(file_name)
        .map(FileType::as_str)
        .unwrap_or("TXT");
    let path = storage::save_upload(
        &state.config.upload_dir,
        &candidate_id.to_string(),
        file_name,
        bytes,
    )
    .await?;
    let document = document_store::insert_document(
        &state.db,
        candidate_id,
        file_name,
        file_type,
        content_text,
        &path.to_string_lossy(),
    )
    .await?;
    store::set_document(&state.db, candidate_id, document.id).await?;
    Ok(document)
}

/// Multipart form variant of candidate creation: text fields plus an
/// optional `file` part.
async fn read_candidate_form(
    mut multipart: Multipart,
) -> Result<(CandidateCreate, Option<(String, Vec<u8>)>), AppError> {
    let mut fields = CandidateCreate::default();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == "file" {
            let file_name = field.file_name().unwrap_or("resume.bin").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;
            file = Some((file_name, bytes.to_vec()));
            continue;
        }
        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid form field {name}: {e}")))?;
        let value = value.trim().to_string();
        if value.is_empty() {
            continue;
        }
        match name.as_str() {
            "name" => fields.name = Some(value),
            "email" => fields.email = Some(value),
            "phone" => fields.phone = Some(value),
            "skills" => {
                fields.skills = Some(value.split(',').map(|s| s.trim().to_string()).collect())
            }
            "experience" => fields.experience = Some(value),
            "education" => fields.education = Some(value),
            "location" => fields.location = Some(value),
            "summary" => fields.summary = Some(value),
            _ => {}
        }
    }

    Ok((fields, file))
}

/// Validation gate for extra-details uploads. Check order is part of the
/// contract: media type before emptiness before size.
fn validate_extra_detail_upload(upload: &UploadedFile) -> Result<(), AppError> {
    if !parsing::is_supported_extra_detail(&upload.file_name) {
        return Err(AppError::UnsupportedMediaType(format!(
            "Unsupported file type: {}. Supported types: PDF, TXT",
            upload.file_name
        )));
    }
    if upload.bytes.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Uploaded file is empty".to_string(),
        ));
    }
    if upload.bytes.len() > parsing::MAX_UPLOAD_BYTES {
        return Err(AppError::PayloadTooLarge(format!(
            "File exceeds the {} byte upload limit",
            parsing::MAX_UPLOAD_BYTES
        )));
    }
    Ok(())
}

/// Best-effort classification of an extra-details upload from its filename.
fn classify_detail_type(file_name: &str) -> Option<&'static str> {
    let lower = file_name.to_lowercase();
    if lower.contains("feedback") || lower.contains("interview") {
        Some("feedback")
    } else if lower.contains("skill") {
        Some("skills")
    } else if lower.contains("summary") || lower.contains("resume") {
        Some("summary")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::DefaultBodyLimit, routing::post, Router};
    use chrono::Utc;
    use tower::ServiceExt;

    use crate::ingest::multipart::multipart_request;
    use crate::ingest::parsing::MAX_UPLOAD_BYTES;
    use crate::routes::REQUEST_BODY_LIMIT;

    /// Exercises the extra-details validation gate exactly as the handler
    /// does, minus the database lookup.
    async fn detail_gate(mut multipart: Multipart) -> Result<StatusCode, AppError> {
        let upload = read_file_field(&mut multipart).await?;
        validate_extra_detail_upload(&upload)?;
        Ok(StatusCode::OK)
    }

    fn gate_router() -> Router {
        Router::new()
            .route("/details", post(detail_gate))
            .layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT))
    }

    #[tokio::test]
    async fn unsupported_extra_detail_type_is_415() {
        let response = gate_router()
            .oneshot(multipart_request("/details", "notes.docx", b"content"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn empty_extra_detail_file_is_422() {
        let response = gate_router()
            .oneshot(multipart_request("/details", "notes.txt", b""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn over_limit_extra_detail_file_is_413() {
        let payload = vec![b'a'; MAX_UPLOAD_BYTES + 1];
        let response = gate_router()
            .oneshot(multipart_request("/details", "notes.txt", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn three_mebibyte_upload_passes_the_gate() {
        // Well past axum's default body cap, below the contract ceiling.
        let payload = vec![b'a'; 3 * 1024 * 1024];
        let response = gate_router()
            .oneshot(multipart_request("/details", "notes.txt", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    fn stored_candidate(name: Option<&str>) -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            name: name.map(str::to_string),
            email: None,
            phone: None,
            skills: None,
            experience: None,
            education: None,
            location: None,
            summary: None,
            raw_text: Some("raw resume text".to_string()),
            file_hash: Some("abc".to_string()),
            document_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn degraded_resume_upload_answers_200_with_raw_text() {
        let candidate = stored_candidate(None);
        let (status, Json(body)) = resume_upload_response(
            &candidate,
            Uuid::new_v4(),
            Some("LLM is not configured; candidate stored with raw text only".to_string()),
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["raw_text"], "raw resume text");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("LLM is not configured"));
    }

    #[test]
    fn clean_resume_upload_answers_201_without_raw_text() {
        let candidate = stored_candidate(Some("Jane Doe"));
        let (status, Json(body)) = resume_upload_response(&candidate, Uuid::new_v4(), None);
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Resume processed successfully");
        assert!(body["raw_text"].is_null());
    }

    #[test]
    fn detail_type_from_filename() {
        assert_eq!(classify_detail_type("Interview_Feedback.pdf"), Some("feedback"));
        assert_eq!(classify_detail_type("round2_interview.txt"), Some("feedback"));
        assert_eq!(classify_detail_type("skill_matrix.txt"), Some("skills"));
        assert_eq!(classify_detail_type("updated_resume.pdf"), Some("summary"));
        assert_eq!(classify_detail_type("notes.txt"), None);
    }

    #[test]
    fn feedback_wins_over_skills_when_both_match() {
        assert_eq!(
            classify_detail_type("interview_skills_notes.txt"),
            Some("feedback")
        );
    }
}
