use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A job posting. Every content field is nullable because LLM-derived
/// creation is an accepted path: only what the source text explicitly
/// states gets a value.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPosting {
    /// Opaque unique id, immutable after creation.
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Order-preserving; duplicates are kept as supplied.
    pub skills: Option<Vec<String>>,
    pub experience_level: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Explicit-form creation payload: all fields required.
#[derive(Debug, Deserialize)]
pub struct JobPostingCreate {
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    pub experience_level: String,
    pub department: String,
    pub location: String,
}

/// Partial update: omitted fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct JobPostingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience_level: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
}
