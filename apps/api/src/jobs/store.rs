//! Persistence for job postings.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::ExtractedJob;
use crate::models::candidate::normalize_skills;
use crate::models::job::{JobPosting, JobPostingCreate, JobPostingUpdate};

pub async fn list_jobs(db: &PgPool) -> Result<Vec<JobPosting>, AppError> {
    let jobs = sqlx::query_as("SELECT * FROM job_postings ORDER BY created_at DESC")
        .fetch_all(db)
        .await?;
    Ok(jobs)
}

pub async fn get_job(db: &PgPool, id: &str) -> Result<JobPosting, AppError> {
    let job: Option<JobPosting> = sqlx::query_as("SELECT * FROM job_postings WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    job.ok_or_else(|| AppError::NotFound(format!("Job posting {id} not found")))
}

/// Explicit-form creation: every field is caller-supplied and required.
pub async fn create_job(db: &PgPool, req: JobPostingCreate) -> Result<JobPosting, AppError> {
    let job = sqlx::query_as(
        r#"
        INSERT INTO job_postings (id, title, description, skills, experience_level, department, location)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(req.title)
    .bind(req.description)
    .bind(normalize_skills(Some(req.skills)))
    .bind(req.experience_level)
    .bind(req.department)
    .bind(req.location)
    .fetch_one(db)
    .await?;
    Ok(job)
}

/// Extraction-driven creation: only what the source text explicitly stated
/// gets a value, everything else stays null.
pub async fn create_job_from_extraction(
    db: &PgPool,
    extracted: ExtractedJob,
) -> Result<JobPosting, AppError> {
    let job = sqlx::query_as(
        r#"
        INSERT INTO job_postings (id, title, description, skills, experience_level, department, location)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(extracted.title)
    .bind(extracted.description)
    .bind(extracted.skills)
    .bind(extracted.experience_level)
    .bind(extracted.department)
    .bind(extracted.location)
    .fetch_one(db)
    .await?;
    Ok(job)
}

/// Partial update. Omitted fields keep their stored values; `updated_at`
/// is refreshed even when no field changed.
pub async fn update_job(
    db: &PgPool,
    id: &str,
    req: JobPostingUpdate,
) -> Result<JobPosting, AppError> {
    let job: Option<JobPosting> = sqlx::query_as(
        r#"
        UPDATE job_postings SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            skills = COALESCE($4, skills),
            experience_level = COALESCE($5, experience_level),
            department = COALESCE($6, department),
            location = COALESCE($7, location),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(req.title)
    .bind(req.description)
    .bind(normalize_skills(req.skills))
    .bind(req.experience_level)
    .bind(req.department)
    .bind(req.location)
    .fetch_optional(db)
    .await?;
    job.ok_or_else(|| AppError::NotFound(format!("Job posting {id} not found")))
}

pub async fn delete_job(db: &PgPool, id: &str) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM job_postings WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Job posting {id} not found")));
    }
    Ok(())
}
