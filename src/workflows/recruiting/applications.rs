use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::corrections::{given_first, NameCorrections};
use super::domain::{parse_calendar_date, ApplicationRecord, ApplicationStatus, MatchFlag};
use super::NormalizeError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawJobApplication {
    applicant: RawApplicant,
    #[serde(default)]
    application_status_code: Option<RawStatusCode>,
    #[serde(default)]
    job_requisition_reference: Option<RawRequisitionReference>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawApplicant {
    person: RawApplicantPerson,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawApplicantPerson {
    #[serde(default)]
    person_name: Option<RawPersonName>,
    #[serde(default)]
    birth_date: Option<String>,
    #[serde(default)]
    address: Option<RawAddress>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPersonName {
    #[serde(default)]
    formatted_name: Option<String>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    family_name1: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAddress {
    #[serde(default)]
    line_one: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStatusCode {
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    effective_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRequisitionReference {
    #[serde(default, rename = "requisitionID")]
    requisition_id: Option<String>,
    #[serde(default)]
    requisition_title: Option<String>,
    #[serde(default)]
    hiring_manager: Option<RawNamedPerson>,
    #[serde(default)]
    recruiter: Option<RawNamedPerson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNamedPerson {
    #[serde(default)]
    person_name: Option<RawPersonName>,
}

impl RawNamedPerson {
    fn formatted_name(self) -> Option<String> {
        self.person_name.and_then(|name| name.formatted_name)
    }
}

/// Canonical recruiter name: a roster correction when one applies, otherwise given-first order.
fn canonical_recruiter(raw: Option<&str>, corrections: &NameCorrections) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    match corrections.recruiter(raw) {
        Some(canonical) => canonical.to_string(),
        None => given_first(raw),
    }
}

fn normalize_application(
    index: usize,
    raw: &Value,
    corrections: &NameCorrections,
) -> Result<ApplicationRecord, NormalizeError> {
    let application =
        RawJobApplication::deserialize(raw).map_err(|source| NormalizeError::Malformed {
            kind: "job application",
            index,
            source,
        })?;

    let person = application.applicant.person;
    let name = person.person_name.unwrap_or_default();
    let status_code = application.application_status_code;
    let (status, start_date) = match status_code {
        Some(code) => (
            ApplicationStatus::from_raw(code.short_name.as_deref()),
            code.effective_date.as_deref().and_then(parse_calendar_date),
        ),
        None => (ApplicationStatus::Unknown, None),
    };

    let (requisition_id, job_title, hiring_manager_raw, recruiter_raw) =
        match application.job_requisition_reference {
            Some(reference) => (
                reference.requisition_id,
                reference.requisition_title,
                reference.hiring_manager.and_then(RawNamedPerson::formatted_name),
                reference.recruiter.and_then(RawNamedPerson::formatted_name),
            ),
            None => (None, None, None, None),
        };

    let hiring_manager = hiring_manager_raw
        .as_deref()
        .map(given_first)
        .unwrap_or_default();
    let line_manager = corrections.line_manager(&hiring_manager).to_string();
    let recruiter = canonical_recruiter(recruiter_raw.as_deref(), corrections);

    Ok(ApplicationRecord {
        candidate_name: name.formatted_name.unwrap_or_default(),
        forename: name.given_name.unwrap_or_default(),
        surname: name.family_name1.unwrap_or_default(),
        birth_date: person.birth_date,
        status,
        job_title,
        hiring_manager,
        line_manager,
        recruiter,
        requisition_id,
        start_date,
        address: person.address.and_then(|address| address.line_one),
        match_flag: MatchFlag::Unset,
    })
}

/// Map raw job applications into canonical applicants with corrected manager and recruiter names.
pub fn normalize_applications(
    raw: &[Value],
    corrections: &NameCorrections,
) -> Result<Vec<ApplicationRecord>, NormalizeError> {
    let applications = raw
        .iter()
        .enumerate()
        .map(|(index, application)| normalize_application(index, application, corrections))
        .collect::<Result<Vec<_>, _>>()?;

    info!(count = applications.len(), "normalized job applications");
    Ok(applications)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn application(hiring_manager: &str, recruiter: &str) -> Value {
        json!({
            "applicant": {
                "person": {
                    "personName": {
                        "formattedName": "Jane Doe",
                        "givenName": "Jane",
                        "familyName1": "Doe"
                    },
                    "birthDate": "1990-01-01",
                    "address": { "lineOne": "1 Main St" }
                }
            },
            "applicationStatusCode": { "shortName": "Offer Accepted", "effectiveDate": "2024-01-10" },
            "jobRequisitionReference": {
                "requisitionID": "REQ-1",
                "requisitionTitle": "Support Worker",
                "hiringManager": { "personName": { "formattedName": hiring_manager } },
                "recruiter": { "personName": { "formattedName": recruiter } }
            }
        })
    }

    #[test]
    fn extracts_candidate_and_requisition_fields() {
        let corrections = NameCorrections::default();
        let records = normalize_applications(&[application("Lee, Sam", "Khan, Ali")], &corrections)
            .expect("normalizes");

        let record = &records[0];
        assert_eq!(record.candidate_name, "Jane Doe");
        assert_eq!(record.forename, "Jane");
        assert_eq!(record.surname, "Doe");
        assert_eq!(record.birth_date.as_deref(), Some("1990-01-01"));
        assert_eq!(record.status, ApplicationStatus::Code("Offer Accepted".to_string()));
        assert_eq!(record.job_title.as_deref(), Some("Support Worker"));
        assert_eq!(record.requisition_id.as_deref(), Some("REQ-1"));
        assert_eq!(
            record.start_date,
            Some(NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date"))
        );
        assert_eq!(record.address.as_deref(), Some("1 Main St"));
        assert_eq!(record.hiring_manager, "Sam Lee");
        assert_eq!(record.line_manager, "Sam Lee");
        assert_eq!(record.recruiter, "Ali Khan");
        assert_eq!(record.match_flag, MatchFlag::Unset);
    }

    #[test]
    fn manager_without_comma_reformats_to_empty() {
        let corrections = NameCorrections::default();
        let records =
            normalize_applications(&[application("John Smith", "Khan, Ali")], &corrections)
                .expect("normalizes");
        assert_eq!(records[0].hiring_manager, "");
        assert_eq!(records[0].line_manager, "");
    }

    #[test]
    fn applies_line_manager_typo_fix_and_recruiter_roster() {
        let corrections = NameCorrections::default();
        let records = normalize_applications(
            &[application("Byam, Zacri", "Guerrero-Diaz, Rob")],
            &corrections,
        )
        .expect("normalizes");

        assert_eq!(records[0].hiring_manager, "Zacri Byam");
        assert_eq!(records[0].line_manager, "Zac Byam");
        assert_eq!(records[0].recruiter, "Robinson Guerrero");
    }

    #[test]
    fn missing_requisition_reference_leaves_fields_empty() {
        let corrections = NameCorrections::default();
        let raw = json!({
            "applicant": { "person": { "personName": { "formattedName": "Solo Applicant" } } }
        });
        let records = normalize_applications(&[raw], &corrections).expect("normalizes");

        assert_eq!(records[0].status, ApplicationStatus::Unknown);
        assert_eq!(records[0].recruiter, "");
        assert_eq!(records[0].requisition_id, None);
        assert_eq!(records[0].start_date, None);
    }
}
