//! Prompt construction for candidate profile summaries.

use crate::models::candidate::{Candidate, CandidateExtraDetail};

/// System prompt for profile-summary generation.
pub const PROFILE_SUMMARY_SYSTEM: &str =
    "You are a recruiting assistant that writes concise, factual candidate profile summaries. \
     Use only the information provided. Do not invent qualifications, employers, or dates.";

/// Builds the profile-summary prompt from the candidate's structured fields
/// plus every extra detail on record. Absent fields are listed as
/// "Not provided" so the model does not fill gaps.
pub fn profile_summary_prompt(candidate: &Candidate, details: &[CandidateExtraDetail]) -> String {
    let mut prompt = String::from(
        "Write a professional profile summary for the following candidate in markdown. \
         Structure it with these sections: Overview, Key Skills, Experience, Education. \
         Keep it under 400 words.\n\nCandidate information:\n",
    );

    let field = |label: &str, value: &Option<String>| {
        format!(
            "{label}: {}\n",
            value.as_deref().unwrap_or("Not provided")
        )
    };
    prompt.push_str(&field("Name", &candidate.name));
    prompt.push_str(&field("Email", &candidate.email));
    prompt.push_str(&field("Phone", &candidate.phone));
    prompt.push_str(&format!(
        "Skills: {}\n",
        candidate
            .skills
            .as_ref()
            .map(|s| s.join(", "))
            .unwrap_or_else(|| "Not provided".to_string())
    ));
    prompt.push_str(&field("Experience", &candidate.experience));
    prompt.push_str(&field("Education", &candidate.education));
    prompt.push_str(&field("Location", &candidate.location));
    prompt.push_str(&field("Summary", &candidate.summary));

    if !details.is_empty() {
        prompt.push_str("\nAdditional details on record:\n");
        for detail in details {
            let label = detail.detail_type.as_deref().unwrap_or("note");
            prompt.push_str(&format!("[{label}] {}\n", detail.text_content));
        }
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn candidate() -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            name: Some("Jane Doe".to_string()),
            email: None,
            phone: None,
            skills: Some(vec!["Rust".to_string(), "SQL".to_string()]),
            experience: None,
            education: None,
            location: None,
            summary: None,
            raw_text: None,
            file_hash: None,
            document_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn prompt_carries_fields_and_marks_gaps() {
        let prompt = profile_summary_prompt(&candidate(), &[]);
        assert!(prompt.contains("Name: Jane Doe"));
        assert!(prompt.contains("Skills: Rust, SQL"));
        assert!(prompt.contains("Email: Not provided"));
        assert!(!prompt.contains("Additional details"));
    }

    #[test]
    fn prompt_includes_extra_details_with_type_labels() {
        let detail = CandidateExtraDetail {
            id: Uuid::new_v4(),
            candidate_id: Uuid::new_v4(),
            text_content: "Strong system design round".to_string(),
            detail_type: Some("feedback".to_string()),
            created_at: Utc::now(),
        };
        let prompt = profile_summary_prompt(&candidate(), &[detail]);
        assert!(prompt.contains("[feedback] Strong system design round"));
    }
}
