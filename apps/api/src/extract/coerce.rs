//! Coercion of free-form LLM output into fixed extraction schemas.
//!
//! Three explicit outcomes per response: clean JSON, JSON recoverable by
//! stripping markdown fences and slicing the outermost braces, or
//! unrecoverable. The unrecoverable case never raises — it produces an
//! all-null record whose description/summary carries a truncated prefix of
//! the *source* text so a human reviewer has something to work from.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Length of the source-text prefix kept when the model response is unusable.
const FALLBACK_PREFIX_CHARS: usize = 200;

/// Structured fields extracted from a job description. All independently
/// nullable: the model is instructed to emit null for anything not
/// explicitly present in the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedJob {
    pub title: Option<String>,
    pub description: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience_level: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
}

/// Structured fields extracted from a resume/CV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedCandidate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
}

/// Locates the JSON object inside a raw model response: trims, strips
/// ```json / ``` fences, then slices from the first `{` to the last `}` to
/// tolerate leading/trailing commentary. Returns `None` when no braces exist.
pub fn json_slice(raw: &str) -> Option<&str> {
    let text = strip_fences(raw.trim());
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").map(str::trim).unwrap_or(rest.trim())
}

fn parse_object(raw: &str) -> Option<Value> {
    let slice = json_slice(raw)?;
    match serde_json::from_str::<Value>(slice) {
        Ok(v @ Value::Object(_)) => Some(v),
        _ => None,
    }
}

/// Empty and whitespace-only strings normalize to null — the model
/// sometimes emits `""` where it was told to emit null.
fn string_field(obj: &Value, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// List fields: non-string entries are dropped, each entry is trimmed,
/// blank entries are dropped, and an empty list normalizes to null so a
/// degenerate `"skills": []` is never mistaken for a confident
/// zero-skills extraction.
fn list_field(obj: &Value, key: &str) -> Option<Vec<String>> {
    let items: Vec<String> = obj
        .get(key)?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn source_prefix(source_text: &str) -> Option<String> {
    let trimmed = source_text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(FALLBACK_PREFIX_CHARS).collect())
}

/// Coerces a raw model response into an `ExtractedJob`. Never fails: an
/// unparseable response yields a null record with the description fallback.
pub fn coerce_job(raw: &str, source_text: &str) -> ExtractedJob {
    match parse_object(raw) {
        Some(obj) => ExtractedJob {
            title: string_field(&obj, "title"),
            description: string_field(&obj, "description"),
            skills: list_field(&obj, "skills"),
            experience_level: string_field(&obj, "experience_level"),
            department: string_field(&obj, "department"),
            location: string_field(&obj, "location"),
        },
        None => {
            tracing::warn!("Failed to parse JSON from LLM job response; falling back to nulls");
            ExtractedJob {
                description: source_prefix(source_text),
                ..Default::default()
            }
        }
    }
}

/// Coerces a raw model response into an `ExtractedCandidate`. Never fails:
/// an unparseable response yields a null record with the summary fallback.
pub fn coerce_candidate(raw: &str, source_text: &str) -> ExtractedCandidate {
    match parse_object(raw) {
        Some(obj) => ExtractedCandidate {
            name: string_field(&obj, "name"),
            email: string_field(&obj, "email"),
            phone: string_field(&obj, "phone"),
            skills: list_field(&obj, "skills"),
            experience: string_field(&obj, "experience"),
            education: string_field(&obj, "education"),
            location: string_field(&obj, "location"),
            summary: string_field(&obj, "summary"),
        },
        None => {
            tracing::warn!(
                "Failed to parse JSON from LLM candidate response; falling back to nulls"
            );
            ExtractedCandidate {
                summary: source_prefix(source_text),
                ..Default::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANDIDATE_JSON: &str = r#"{
        "name": "Jane Doe",
        "email": "jane@example.com",
        "phone": null,
        "skills": ["Python", "FastAPI", "MongoDB"],
        "experience": "5 years backend development",
        "education": "BSc Computer Science",
        "location": "Berlin",
        "summary": "Backend engineer"
    }"#;

    #[test]
    fn clean_json_parses_directly() {
        let parsed = coerce_candidate(CANDIDATE_JSON, "source");
        assert_eq!(parsed.name.as_deref(), Some("Jane Doe"));
        assert_eq!(parsed.phone, None);
        assert_eq!(
            parsed.skills.as_deref(),
            Some(&["Python".to_string(), "FastAPI".to_string(), "MongoDB".to_string()][..])
        );
    }

    #[test]
    fn fenced_json_equals_unfenced() {
        let fenced = format!("```json\n{CANDIDATE_JSON}\n```");
        assert_eq!(
            coerce_candidate(&fenced, "source"),
            coerce_candidate(CANDIDATE_JSON, "source")
        );
    }

    #[test]
    fn fence_without_language_tag() {
        let fenced = format!("```\n{CANDIDATE_JSON}\n```");
        assert_eq!(
            coerce_candidate(&fenced, "source"),
            coerce_candidate(CANDIDATE_JSON, "source")
        );
    }

    #[test]
    fn surrounding_commentary_is_tolerated() {
        let noisy = format!("Here is the extraction you asked for:\n{CANDIDATE_JSON}\nHope that helps!");
        assert_eq!(
            coerce_candidate(&noisy, "source"),
            coerce_candidate(CANDIDATE_JSON, "source")
        );
    }

    #[test]
    fn unparseable_response_falls_back_to_source_prefix() {
        let parsed = coerce_candidate("I cannot produce JSON, sorry.", "raw resume text here");
        assert_eq!(parsed.name, None);
        assert_eq!(parsed.email, None);
        assert_eq!(parsed.skills, None);
        assert_eq!(parsed.summary.as_deref(), Some("raw resume text here"));
    }

    #[test]
    fn fallback_prefix_is_bounded() {
        let long_source = "x".repeat(10_000);
        let parsed = coerce_candidate("not json", &long_source);
        assert_eq!(parsed.summary.unwrap().chars().count(), 200);
    }

    #[test]
    fn job_fallback_uses_description() {
        let parsed = coerce_job("```json\nnot even close\n```", "job description text");
        assert_eq!(parsed.title, None);
        assert_eq!(parsed.description.as_deref(), Some("job description text"));
    }

    #[test]
    fn empty_strings_normalize_to_null() {
        let raw = r#"{"title": "", "description": "   ", "skills": ["Rust"], "experience_level": null, "department": "Eng", "location": ""}"#;
        let parsed = coerce_job(raw, "src");
        assert_eq!(parsed.title, None);
        assert_eq!(parsed.description, None);
        assert_eq!(parsed.location, None);
        assert_eq!(parsed.department.as_deref(), Some("Eng"));
    }

    #[test]
    fn empty_list_normalizes_to_null() {
        let raw = r#"{"title": "Engineer", "skills": []}"#;
        let parsed = coerce_job(raw, "src");
        assert_eq!(parsed.skills, None);
        assert_eq!(parsed.title.as_deref(), Some("Engineer"));
    }

    #[test]
    fn missing_keys_default_to_null() {
        let raw = r#"{"title": "Engineer"}"#;
        let parsed = coerce_job(raw, "src");
        assert_eq!(parsed.description, None);
        assert_eq!(parsed.experience_level, None);
    }

    #[test]
    fn skill_entries_are_trimmed_and_blanks_dropped() {
        let raw = r#"{"skills": ["  Rust  ", "", "   ", "Go"]}"#;
        let parsed = coerce_candidate(raw, "src");
        assert_eq!(
            parsed.skills.as_deref(),
            Some(&["Rust".to_string(), "Go".to_string()][..])
        );
    }

    #[test]
    fn json_slice_rejects_braceless_text() {
        assert_eq!(json_slice("no json at all"), None);
        assert_eq!(json_slice(""), None);
    }

    #[test]
    fn non_object_json_falls_back() {
        let parsed = coerce_job(r#"["a", "list"]"#, "source text");
        assert_eq!(parsed.title, None);
        assert_eq!(parsed.description.as_deref(), Some("source text"));
    }

    #[test]
    fn empty_source_means_no_fallback_text() {
        let parsed = coerce_candidate("not json", "   ");
        assert_eq!(parsed.summary, None);
    }
}
