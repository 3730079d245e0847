//! Persistence for mirrored employees, generated candidate details, and
//! the sync-status singleton.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::{CandidateDetails, EmployeeRecord, SyncStatus};
use crate::zoho::ZohoEmployee;

pub async fn upsert_employee(db: &PgPool, employee: &ZohoEmployee) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO employees (employee_id, name, job_title, department, contact_info, payload)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (employee_id) DO UPDATE SET
            name = EXCLUDED.name,
            job_title = EXCLUDED.job_title,
            department = EXCLUDED.department,
            contact_info = EXCLUDED.contact_info,
            payload = EXCLUDED.payload,
            updated_at = now()
        "#,
    )
    .bind(&employee.employee_id)
    .bind(&employee.name)
    .bind(&employee.job_title)
    .bind(&employee.department)
    .bind(&employee.contact_info)
    .bind(&employee.payload)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn list_employees(db: &PgPool) -> Result<Vec<EmployeeRecord>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM employees ORDER BY employee_id")
        .fetch_all(db)
        .await
}

pub async fn candidate_details_exist(db: &PgPool, employee_id: &str) -> Result<bool, sqlx::Error> {
    let exists: Option<(i32,)> =
        sqlx::query_as("SELECT 1 FROM candidate_details WHERE employee_id = $1")
            .bind(employee_id)
            .fetch_optional(db)
            .await?;
    Ok(exists.is_some())
}

/// Write-once insert. The conflict guard covers the race between the
/// periodic loop and a manual trigger.
pub async fn insert_candidate_details(
    db: &PgPool,
    employee_id: &str,
    profile: &str,
    skills: &[String],
    experience: &str,
    summary: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO candidate_details (employee_id, profile, skills, experience, summary)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (employee_id) DO NOTHING
        "#,
    )
    .bind(employee_id)
    .bind(profile)
    .bind(skills)
    .bind(experience)
    .bind(summary)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_candidate_details(db: &PgPool) -> Result<Vec<CandidateDetails>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM candidate_details ORDER BY employee_id")
        .fetch_all(db)
        .await
}

pub async fn get_candidate_details(
    db: &PgPool,
    employee_id: &str,
) -> Result<Option<CandidateDetails>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM candidate_details WHERE employee_id = $1")
        .bind(employee_id)
        .fetch_optional(db)
        .await
}

pub async fn get_sync_status(db: &PgPool) -> Result<Option<SyncStatus>, sqlx::Error> {
    sqlx::query_as(
        "SELECT last_sync_time, sync_interval_minutes, processed_employee_ids, last_error \
         FROM sync_status",
    )
    .fetch_optional(db)
    .await
}

/// Upserts the singleton status row after a cycle.
pub async fn update_sync_status(
    db: &PgPool,
    last_sync_time: DateTime<Utc>,
    sync_interval_minutes: i64,
    processed_employee_ids: &[String],
    last_error: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO sync_status
            (singleton, last_sync_time, sync_interval_minutes, processed_employee_ids, last_error)
        VALUES (TRUE, $1, $2, $3, $4)
        ON CONFLICT (singleton) DO UPDATE SET
            last_sync_time = EXCLUDED.last_sync_time,
            sync_interval_minutes = EXCLUDED.sync_interval_minutes,
            processed_employee_ids = EXCLUDED.processed_employee_ids,
            last_error = EXCLUDED.last_error
        "#,
    )
    .bind(last_sync_time)
    .bind(sync_interval_minutes)
    .bind(processed_employee_ids)
    .bind(last_error)
    .execute(db)
    .await?;
    Ok(())
}
