use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::domain::{parse_calendar_date, EmploymentStatus, StaffRecord};
use super::NormalizeError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWorker {
    person: RawPerson,
    #[serde(default)]
    worker_status: Option<RawWorkerStatus>,
    #[serde(default)]
    worker_dates: Option<RawWorkerDates>,
    #[serde(default)]
    work_assignments: Option<Vec<RawWorkAssignment>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPerson {
    legal_name: RawLegalName,
    #[serde(default)]
    preferred_name: Option<RawPreferredName>,
    #[serde(default)]
    legal_address: Option<RawAddress>,
    #[serde(default)]
    birth_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLegalName {
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    middle_name: Option<String>,
    #[serde(default)]
    family_name1: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPreferredName {
    #[serde(default)]
    given_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAddress {
    #[serde(default)]
    line_one: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWorkerStatus {
    #[serde(default)]
    status_code: Option<RawCode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCode {
    #[serde(default)]
    code_value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWorkerDates {
    #[serde(default)]
    original_hire_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWorkAssignment {
    #[serde(default)]
    primary_indicator: Option<bool>,
    #[serde(default)]
    reports_to: Option<Vec<RawReportsTo>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReportsTo {
    #[serde(default)]
    reports_to_worker_name: Option<RawFormattedName>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFormattedName {
    #[serde(default)]
    formatted_name: Option<String>,
}

/// First work assignment flagged primary, if any. A null or absent flag is not primary.
fn primary_assignment(assignments: &[RawWorkAssignment]) -> Option<&RawWorkAssignment> {
    assignments
        .iter()
        .find(|assignment| assignment.primary_indicator == Some(true))
}

fn normalize_worker(index: usize, raw: &Value) -> Result<StaffRecord, NormalizeError> {
    let worker = RawWorker::deserialize(raw).map_err(|source| NormalizeError::Malformed {
        kind: "worker",
        index,
        source,
    })?;

    let legal = worker.person.legal_name;
    let forename = legal.given_name.clone().unwrap_or_default();
    let surname = legal.family_name1.unwrap_or_default();

    let assignments = worker.work_assignments.as_deref().unwrap_or_default();
    let assignment = primary_assignment(assignments).ok_or_else(|| {
        NormalizeError::MissingPrimaryAssignment {
            index,
            worker: format!("{forename} {surname}").trim().to_string(),
        }
    })?;

    let manager = assignment
        .reports_to
        .iter()
        .flatten()
        .next()
        .and_then(|reports_to| reports_to.reports_to_worker_name.as_ref())
        .and_then(|name| name.formatted_name.clone());

    let status = worker
        .worker_status
        .and_then(|status| status.status_code)
        .and_then(|code| code.code_value)
        .map(|code| EmploymentStatus::from_code(&code))
        .unwrap_or_else(|| EmploymentStatus::Other(String::new()));

    let hire_date = worker
        .worker_dates
        .and_then(|dates| dates.original_hire_date)
        .as_deref()
        .and_then(parse_calendar_date);

    Ok(StaffRecord {
        forename,
        middle_name: legal.middle_name,
        given_name: legal.given_name,
        preferred_name: worker
            .person
            .preferred_name
            .and_then(|preferred| preferred.given_name),
        surname,
        status,
        birth_date: worker.person.birth_date,
        hire_date,
        address: worker.person.legal_address.and_then(|address| address.line_one),
        manager,
    })
}

/// Map raw workers into canonical staff, keeping only Active and Inactive workers.
///
/// Every worker must carry a primary work assignment; the first one without aborts the batch.
pub fn normalize_staff(raw: &[Value]) -> Result<Vec<StaffRecord>, NormalizeError> {
    let mut staff = Vec::with_capacity(raw.len());
    for (index, worker) in raw.iter().enumerate() {
        staff.push(normalize_worker(index, worker)?);
    }

    let before = staff.len();
    staff.retain(|record| record.status.is_employment_relevant());
    info!(
        normalized = before,
        retained = staff.len(),
        "normalized staff records"
    );

    Ok(staff)
}
