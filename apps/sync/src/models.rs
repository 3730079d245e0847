use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// An employee mirrored from Zoho People. `payload` keeps the raw upstream
/// record so later field mapping changes need no re-fetch.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EmployeeRecord {
    pub id: Uuid,
    pub employee_id: String,
    pub name: String,
    pub job_title: String,
    pub department: String,
    pub contact_info: serde_json::Value,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Generated internal-mobility profile for one employee. Written once per
/// employee; re-syncs never regenerate it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CandidateDetails {
    pub id: Uuid,
    pub employee_id: String,
    pub profile: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub summary: String,
    pub generated_at: DateTime<Utc>,
}

/// Singleton row describing the most recent sync cycle.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SyncStatus {
    pub last_sync_time: DateTime<Utc>,
    pub sync_interval_minutes: i64,
    pub processed_employee_ids: Vec<String>,
    pub last_error: Option<String>,
}
