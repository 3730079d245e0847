//! Zoho People API client.
//!
//! Upstream responses are loosely typed: depending on API version and view
//! configuration the employee list arrives under different wrapper keys.
//! Everything here is written to tolerate that instead of pinning one shape.

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Upper bound on employees taken from one fetch.
const FETCH_LIMIT: usize = 50;

/// Wrapper keys under which Zoho nests the record list.
const WRAPPER_KEYS: [&str; 4] = ["response", "result", "data", "list"];

/// A Zoho employee record reduced to the fields the sync pipeline needs,
/// plus the untouched source record.
#[derive(Debug, Clone)]
pub struct ZohoEmployee {
    pub employee_id: String,
    pub name: String,
    pub job_title: String,
    pub department: String,
    pub contact_info: Value,
    pub payload: Value,
}

#[derive(Clone)]
pub struct ZohoClient {
    client: Client,
    base: String,
    token: String,
}

impl ZohoClient {
    pub fn new(base: String, token: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base,
            token,
        }
    }

    /// Fetches up to [`FETCH_LIMIT`] employees from the employee view.
    /// Records with no usable employee id are dropped.
    pub async fn fetch_employees(&self) -> Result<Vec<ZohoEmployee>> {
        let url = format!("{}/forms/P_EmployeeView/records", self.base);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Zoho-oauthtoken {}", self.token))
            .query(&[
                ("sIndex", "1".to_string()),
                ("limit", FETCH_LIMIT.to_string()),
            ])
            .send()
            .await
            .context("Zoho People request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Zoho People API returned {status}: {body}");
        }

        let body: Value = response
            .json()
            .await
            .context("Zoho People response was not JSON")?;
        let records = unwrap_records(body);
        debug!("Zoho fetch returned {} raw records", records.len());

        Ok(records
            .into_iter()
            .filter_map(|r| parse_employee(&r))
            .take(FETCH_LIMIT)
            .collect())
    }
}

/// Peels wrapper objects off a Zoho response until a record list surfaces.
/// A bare list passes through; an unrecognized shape yields nothing.
pub fn unwrap_records(value: Value) -> Vec<Value> {
    match value {
        Value::Array(records) => records,
        Value::Object(mut map) => {
            for key in WRAPPER_KEYS {
                if let Some(inner) = map.remove(key) {
                    return unwrap_records(inner);
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// Maps a raw Zoho record to a [`ZohoEmployee`]. Key names vary between
/// API versions, so each field tries several candidates.
pub fn parse_employee(record: &Value) -> Option<ZohoEmployee> {
    let employee_id = first_string(record, &["EmployeeID", "Employee ID", "employee_id", "recordId"])?;

    let name = match (
        first_string(record, &["FirstName", "First Name", "first_name"]),
        first_string(record, &["LastName", "Last Name", "last_name"]),
    ) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        (Some(first), None) => first,
        (None, Some(last)) => last,
        (None, None) => first_string(record, &["Name", "name"]).unwrap_or_default(),
    };

    let contact_info = serde_json::json!({
        "email": first_string(record, &["EmailID", "Email ID", "email"]),
        "phone": first_string(record, &["Mobile", "Phone", "phone"]),
    });

    Some(ZohoEmployee {
        employee_id,
        name,
        job_title: first_string(record, &["Designation", "Job Title", "job_title"])
            .unwrap_or_default(),
        department: first_string(record, &["Department", "department"]).unwrap_or_default(),
        contact_info,
        payload: record.clone(),
    })
}

fn first_string(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwraps_nested_response_result() {
        let body = json!({"response": {"result": [{"EmployeeID": "E1"}]}});
        assert_eq!(unwrap_records(body).len(), 1);
    }

    #[test]
    fn unwraps_bare_list_and_data_wrapper() {
        assert_eq!(unwrap_records(json!([{"a": 1}, {"b": 2}])).len(), 2);
        assert_eq!(unwrap_records(json!({"data": [{"a": 1}]})).len(), 1);
    }

    #[test]
    fn unknown_shape_yields_nothing() {
        assert!(unwrap_records(json!({"unexpected": 1})).is_empty());
        assert!(unwrap_records(json!("just a string")).is_empty());
    }

    #[test]
    fn parses_employee_with_alternate_keys() {
        let record = json!({
            "EmployeeID": "E42",
            "FirstName": "Ada",
            "LastName": "Lovelace",
            "Designation": "Engineer",
            "Department": "R&D",
            "EmailID": "ada@example.com"
        });
        let employee = parse_employee(&record).unwrap();
        assert_eq!(employee.employee_id, "E42");
        assert_eq!(employee.name, "Ada Lovelace");
        assert_eq!(employee.job_title, "Engineer");
        assert_eq!(employee.contact_info["email"], "ada@example.com");
    }

    #[test]
    fn record_without_employee_id_is_dropped() {
        assert!(parse_employee(&json!({"FirstName": "Ghost"})).is_none());
    }

    #[test]
    fn blank_employee_id_is_dropped() {
        assert!(parse_employee(&json!({"EmployeeID": "  "})).is_none());
    }
}
