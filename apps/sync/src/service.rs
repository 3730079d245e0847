//! The sync cycle: fetch employees from Zoho People, mirror them locally,
//! and generate an internal-mobility profile once per employee.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{info, warn};

use talentsync_api::extract::json_slice;
use talentsync_api::llm_client::LlmClient;

use crate::store;
use crate::zoho::{ZohoClient, ZohoEmployee};

const PROFILE_SYSTEM: &str =
    "You are an HR assistant generating internal-mobility candidate profiles. \
     Respond with a JSON object only, no prose.";

/// Outcome of one sync cycle. Per-employee failures are collected here
/// rather than aborting the cycle.
#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub timestamp: DateTime<Utc>,
    pub employees_fetched: usize,
    pub employees_processed: usize,
    pub candidates_created: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedProfile {
    pub profile: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub summary: String,
}

/// Runs one full cycle. Errors returned from here are fetch-level and mean
/// nothing was processed; everything past the fetch degrades per employee.
pub async fn run_cycle(
    db: &PgPool,
    zoho: &ZohoClient,
    llm: &LlmClient,
    interval_minutes: i64,
) -> Result<SyncReport> {
    let employees = zoho.fetch_employees().await?;
    let employees_fetched = employees.len();
    info!("Sync cycle started: {employees_fetched} employees fetched");

    let mut processed_ids = Vec::new();
    let mut candidates_created = 0;
    let mut errors = Vec::new();

    for employee in &employees {
        if let Err(e) = store::upsert_employee(db, employee).await {
            errors.push(format!("employee {}: upsert failed: {e}", employee.employee_id));
            continue;
        }

        match store::candidate_details_exist(db, &employee.employee_id).await {
            Ok(true) => {} // write-once: never regenerate
            Ok(false) => {
                let profile = generate_profile(llm, employee).await;
                match store::insert_candidate_details(
                    db,
                    &employee.employee_id,
                    &profile.profile,
                    &profile.skills,
                    &profile.experience,
                    &profile.summary,
                )
                .await
                {
                    Ok(true) => candidates_created += 1,
                    Ok(false) => {} // lost the race to another cycle
                    Err(e) => errors.push(format!(
                        "employee {}: details insert failed: {e}",
                        employee.employee_id
                    )),
                }
            }
            Err(e) => {
                errors.push(format!(
                    "employee {}: details lookup failed: {e}",
                    employee.employee_id
                ));
                continue;
            }
        }

        processed_ids.push(employee.employee_id.clone());
    }

    let timestamp = Utc::now();
    let last_error = if errors.is_empty() {
        None
    } else {
        Some(errors.join("; "))
    };
    if let Err(e) = store::update_sync_status(
        db,
        timestamp,
        interval_minutes,
        &processed_ids,
        last_error.as_deref(),
    )
    .await
    {
        warn!("Failed to persist sync status: {e}");
    }

    info!(
        "Sync cycle finished: processed={}, created={}, errors={}",
        processed_ids.len(),
        candidates_created,
        errors.len()
    );

    Ok(SyncReport {
        timestamp,
        employees_fetched,
        employees_processed: processed_ids.len(),
        candidates_created,
        errors,
    })
}

/// Generates a profile for one employee. LLM or parse failures fall back
/// to a deterministic profile built from the mirrored fields.
async fn generate_profile(llm: &LlmClient, employee: &ZohoEmployee) -> GeneratedProfile {
    let prompt = profile_prompt(employee);
    match llm.complete(&prompt, PROFILE_SYSTEM).await {
        Ok(raw) => parse_profile(&raw).unwrap_or_else(|| {
            warn!(
                "Unparseable profile response for employee {}, using fallback",
                employee.employee_id
            );
            fallback_profile(employee)
        }),
        Err(e) => {
            warn!(
                "Profile generation failed for employee {}: {e}, using fallback",
                employee.employee_id
            );
            fallback_profile(employee)
        }
    }
}

fn profile_prompt(employee: &ZohoEmployee) -> String {
    format!(
        "Generate an internal-mobility candidate profile for this employee and return it as a \
         JSON object with these fields:\n\
         - profile: one paragraph describing the employee's role\n\
         - skills: list of skills likely for this role\n\
         - experience: a short experience description\n\
         - summary: a two-sentence summary\n\n\
         Employee:\n\
         Name: {}\n\
         Job title: {}\n\
         Department: {}\n\n\
         Return ONLY the JSON object.",
        employee.name, employee.job_title, employee.department
    )
}

/// Lenient parse of the model's response: fences and surrounding prose are
/// tolerated, missing fields default to empty.
fn parse_profile(raw: &str) -> Option<GeneratedProfile> {
    let slice = json_slice(raw)?;
    let value: Value = serde_json::from_str(slice).ok()?;
    let obj = value.as_object()?;

    let string_field = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    };
    let skills = obj
        .get("skills")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(GeneratedProfile {
        profile: string_field("profile"),
        skills,
        experience: string_field("experience"),
        summary: string_field("summary"),
    })
}

fn fallback_profile(employee: &ZohoEmployee) -> GeneratedProfile {
    let role = if employee.job_title.is_empty() {
        "employee".to_string()
    } else {
        employee.job_title.clone()
    };
    let department = if employee.department.is_empty() {
        "the organization".to_string()
    } else {
        employee.department.clone()
    };
    GeneratedProfile {
        profile: format!("{} works as {role} in {department}.", employee.name),
        skills: Vec::new(),
        experience: role.clone(),
        summary: format!("{role} in {department}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn employee() -> ZohoEmployee {
        ZohoEmployee {
            employee_id: "E1".to_string(),
            name: "Ada Lovelace".to_string(),
            job_title: "Engineer".to_string(),
            department: "R&D".to_string(),
            contact_info: json!({}),
            payload: json!({}),
        }
    }

    #[test]
    fn parses_fenced_profile_response() {
        let raw = "```json\n{\"profile\": \"P\", \"skills\": [\"Rust\"], \
                   \"experience\": \"E\", \"summary\": \"S\"}\n```";
        let profile = parse_profile(raw).unwrap();
        assert_eq!(profile.profile, "P");
        assert_eq!(profile.skills, vec!["Rust".to_string()]);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let profile = parse_profile("{\"profile\": \"P\"}").unwrap();
        assert!(profile.skills.is_empty());
        assert!(profile.summary.is_empty());
    }

    #[test]
    fn commentary_without_json_is_unparseable() {
        assert!(parse_profile("I cannot generate that profile.").is_none());
    }

    #[test]
    fn fallback_uses_role_and_department() {
        let profile = fallback_profile(&employee());
        assert_eq!(profile.profile, "Ada Lovelace works as Engineer in R&D.");
        assert_eq!(profile.summary, "Engineer in R&D.");
        assert!(profile.skills.is_empty());
    }

    #[test]
    fn fallback_tolerates_empty_fields() {
        let mut e = employee();
        e.job_title.clear();
        e.department.clear();
        let profile = fallback_profile(&e);
        assert_eq!(profile.summary, "employee in the organization.");
    }
}
