//! Structured-field extraction: prompt construction, one LLM round-trip,
//! and coercion of the free-form response into a fixed schema.

pub mod coerce;
pub mod prompts;

pub use coerce::{coerce_candidate, coerce_job, json_slice, ExtractedCandidate, ExtractedJob};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::extract::prompts::{
    CANDIDATE_EXTRACTION_PROMPT_TEMPLATE, CANDIDATE_EXTRACTION_SYSTEM,
    JOB_EXTRACTION_PROMPT_TEMPLATE, JOB_EXTRACTION_SYSTEM,
};

/// Extracts structured job fields from raw text. The LLM call itself may
/// fail (network, rate limits); parsing its response never does — see
/// [`coerce_job`].
pub async fn extract_job(llm: &LlmClient, text: &str) -> Result<ExtractedJob, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "Empty text content provided for extraction".to_string(),
        ));
    }
    let prompt = JOB_EXTRACTION_PROMPT_TEMPLATE.replace("{text}", text);
    let raw = llm
        .complete(&prompt, JOB_EXTRACTION_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("LLM extraction failed: {e}")))?;
    Ok(coerce_job(&raw, text))
}

/// Extracts structured candidate fields from resume text.
pub async fn extract_candidate(
    llm: &LlmClient,
    text: &str,
) -> Result<ExtractedCandidate, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "Empty text content provided for extraction".to_string(),
        ));
    }
    let prompt = CANDIDATE_EXTRACTION_PROMPT_TEMPLATE.replace("{text}", text);
    let raw = llm
        .complete(&prompt, CANDIDATE_EXTRACTION_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("LLM extraction failed: {e}")))?;
    Ok(coerce_candidate(&raw, text))
}
