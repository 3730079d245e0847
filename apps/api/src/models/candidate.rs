use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A candidate profile. Field validation is intentionally relaxed — records
/// frequently originate from noisy LLM extraction and get completed by hand.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    /// Full extracted document text, retained for downstream summarization.
    pub raw_text: Option<String>,
    /// Content hash of the originating upload, used for de-duplication.
    pub file_hash: Option<String>,
    /// Weak reference — the candidate does not own the document's lifecycle.
    pub document_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// JSON/form creation payload.
#[derive(Debug, Default, Deserialize)]
pub struct CandidateCreate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
}

/// Partial update: omitted fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct CandidateUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
}

/// A candidate annotated with match results for one specific job query.
/// `match_percentage` and `matched_skills` are transient — they are never
/// persisted and are meaningless outside that query.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateMatch {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub match_percentage: f64,
    pub matched_skills: Vec<String>,
}

/// Supplementary free-text note attached to a candidate after creation.
/// Append-only from the consumer's perspective.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateExtraDetail {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub text_content: String,
    /// Best-effort classification inferred from the upload filename.
    #[serde(rename = "type")]
    pub detail_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Trims each skill, drops blanks, and normalizes an empty list to null.
pub fn normalize_skills(skills: Option<Vec<String>>) -> Option<Vec<String>> {
    let cleaned: Vec<String> = skills?
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
