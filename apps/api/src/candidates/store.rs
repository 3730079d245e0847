//! Persistence for candidate profiles and their extra details.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{
    normalize_skills, Candidate, CandidateExtraDetail, CandidateUpdate,
};

/// Cap applied when pulling the candidate pool for matching; ranking is
/// in-process, so the pool must stay bounded.
const MATCHING_POOL_LIMIT: i64 = 1000;

/// Insertable candidate row. Everything is optional; rows created from
/// noisy extraction may carry nothing but raw text.
#[derive(Debug, Default)]
pub struct NewCandidate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub raw_text: Option<String>,
    pub file_hash: Option<String>,
}

pub async fn list_candidates(
    db: &PgPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<Candidate>, AppError> {
    let candidates =
        sqlx::query_as("SELECT * FROM candidates ORDER BY created_at DESC OFFSET $1 LIMIT $2")
            .bind(skip)
            .bind(limit)
            .fetch_all(db)
            .await?;
    Ok(candidates)
}

pub async fn list_candidates_for_matching(db: &PgPool) -> Result<Vec<Candidate>, AppError> {
    let candidates =
        sqlx::query_as("SELECT * FROM candidates ORDER BY created_at DESC LIMIT $1")
            .bind(MATCHING_POOL_LIMIT)
            .fetch_all(db)
            .await?;
    Ok(candidates)
}

pub async fn get_candidate(db: &PgPool, id: Uuid) -> Result<Candidate, AppError> {
    let candidate: Option<Candidate> = sqlx::query_as("SELECT * FROM candidates WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    candidate.ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))
}

pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<Candidate>, AppError> {
    let candidate = sqlx::query_as("SELECT * FROM candidates WHERE email = $1 LIMIT 1")
        .bind(email)
        .fetch_optional(db)
        .await?;
    Ok(candidate)
}

pub async fn find_by_file_hash(db: &PgPool, file_hash: &str) -> Result<Option<Candidate>, AppError> {
    let candidate = sqlx::query_as(
        "SELECT * FROM candidates WHERE file_hash = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(file_hash)
    .fetch_optional(db)
    .await?;
    Ok(candidate)
}

pub async fn insert_candidate(db: &PgPool, new: NewCandidate) -> Result<Candidate, AppError> {
    let candidate = sqlx::query_as(
        r#"
        INSERT INTO candidates
            (name, email, phone, skills, experience, education, location, summary, raw_text, file_hash)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(new.name)
    .bind(new.email)
    .bind(new.phone)
    .bind(normalize_skills(new.skills))
    .bind(new.experience)
    .bind(new.education)
    .bind(new.location)
    .bind(new.summary)
    .bind(new.raw_text)
    .bind(new.file_hash)
    .fetch_one(db)
    .await?;
    Ok(candidate)
}

/// Partial update. Omitted fields keep their stored values; `updated_at`
/// is refreshed even when no field changed.
pub async fn update_candidate(
    db: &PgPool,
    id: Uuid,
    req: CandidateUpdate,
) -> Result<Candidate, AppError> {
    let candidate: Option<Candidate> = sqlx::query_as(
        r#"
        UPDATE candidates SET
            name = COALESCE($2, name),
            email = COALESCE($3, email),
            phone = COALESCE($4, phone),
            skills = COALESCE($5, skills),
            experience = COALESCE($6, experience),
            education = COALESCE($7, education),
            location = COALESCE($8, location),
            summary = COALESCE($9, summary),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(req.name)
    .bind(req.email)
    .bind(req.phone)
    .bind(normalize_skills(req.skills))
    .bind(req.experience)
    .bind(req.education)
    .bind(req.location)
    .bind(req.summary)
    .fetch_optional(db)
    .await?;
    candidate.ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))
}

pub async fn set_document(db: &PgPool, id: Uuid, document_id: Uuid) -> Result<(), AppError> {
    sqlx::query("UPDATE candidates SET document_id = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(document_id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn delete_candidate(db: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM candidates WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Candidate {id} not found")));
    }
    Ok(())
}

/// Case-insensitive substring search over name, email, and skills.
pub async fn search_candidates(db: &PgPool, query: &str) -> Result<Vec<Candidate>, AppError> {
    let pattern = format!("%{}%", query.trim());
    let candidates = sqlx::query_as(
        r#"
        SELECT * FROM candidates
        WHERE name ILIKE $1
           OR email ILIKE $1
           OR EXISTS (SELECT 1 FROM unnest(skills) AS skill WHERE skill ILIKE $1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(pattern)
    .fetch_all(db)
    .await?;
    Ok(candidates)
}

pub async fn insert_extra_detail(
    db: &PgPool,
    candidate_id: Uuid,
    text_content: &str,
    detail_type: Option<&str>,
) -> Result<CandidateExtraDetail, AppError> {
    let detail = sqlx::query_as(
        r#"
        INSERT INTO candidate_extra_details (candidate_id, text_content, detail_type)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(candidate_id)
    .bind(text_content)
    .bind(detail_type)
    .fetch_one(db)
    .await?;
    Ok(detail)
}

pub async fn list_extra_details(
    db: &PgPool,
    candidate_id: Uuid,
) -> Result<Vec<CandidateExtraDetail>, AppError> {
    let details = sqlx::query_as(
        "SELECT * FROM candidate_extra_details WHERE candidate_id = $1 ORDER BY created_at DESC",
    )
    .bind(candidate_id)
    .fetch_all(db)
    .await?;
    Ok(details)
}
