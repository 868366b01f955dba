use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use crate::workflows::recruiting::{
    ApplicationRecord, ApplicationStatus, EmploymentStatus, MatchFlag, RequisitionRecord,
    RequisitionType, Stage, StageRecordError, StageRecorder, StaffRecord,
};

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Fixed run timestamp well after the fixture start dates.
pub(crate) fn run_clock() -> NaiveDateTime {
    date(2024, 6, 1).and_hms_opt(9, 0, 0).expect("valid time")
}

pub(crate) fn applicant(candidate_name: &str, status: &str) -> ApplicationRecord {
    ApplicationRecord {
        candidate_name: candidate_name.to_string(),
        forename: "jane".to_string(),
        surname: "doe".to_string(),
        birth_date: Some("1990-01-01".to_string()),
        status: ApplicationStatus::Code(status.to_string()),
        job_title: Some("Support Worker".to_string()),
        hiring_manager: "Sam Lee".to_string(),
        line_manager: "Sam Lee".to_string(),
        recruiter: "Dana Schwartz".to_string(),
        requisition_id: Some("REQ-1".to_string()),
        start_date: Some(date(2024, 1, 10)),
        address: Some("1 Main St".to_string()),
        match_flag: MatchFlag::Unset,
    }
}

pub(crate) fn staff_member() -> StaffRecord {
    StaffRecord {
        forename: "Jane".to_string(),
        middle_name: None,
        given_name: Some("Jane".to_string()),
        preferred_name: None,
        surname: "Doe".to_string(),
        status: EmploymentStatus::Active,
        birth_date: Some("1990-01-01".to_string()),
        hire_date: Some(date(2024, 1, 12)),
        address: Some("1 Main St".to_string()),
        manager: Some("Sam Lee".to_string()),
    }
}

pub(crate) fn requisition(
    requisition_id: &str,
    posted_date: Option<&str>,
    requisition_type: RequisitionType,
) -> RequisitionRecord {
    RequisitionRecord {
        requisition_id: requisition_id.to_string(),
        posted_date: posted_date.map(str::to_string),
        requisition_type,
    }
}

pub(crate) fn raw_worker(given: &str, family: &str, status: &str, hired: &str, manager: &str) -> Value {
    json!({
        "person": {
            "legalName": { "givenName": given, "familyName1": family },
            "legalAddress": { "lineOne": "1 Main St" },
            "birthDate": "1990-01-01"
        },
        "workerStatus": { "statusCode": { "codeValue": status } },
        "workerDates": { "originalHireDate": hired },
        "workAssignments": [
            { "primaryIndicator": true, "reportsTo": [ { "reportsToWorkerName": { "formattedName": manager } } ] }
        ]
    })
}

pub(crate) fn raw_application(
    formatted: &str,
    given: &str,
    family: &str,
    status: &str,
    start: &str,
    requisition_id: &str,
) -> Value {
    json!({
        "applicant": {
            "person": {
                "personName": { "formattedName": formatted, "givenName": given, "familyName1": family },
                "birthDate": "1990-01-01",
                "address": { "lineOne": "1 Main St" }
            }
        },
        "applicationStatusCode": { "shortName": status, "effectiveDate": start },
        "jobRequisitionReference": {
            "requisitionID": requisition_id,
            "requisitionTitle": "Support Worker",
            "hiringManager": { "personName": { "formattedName": "Lee, Sam" } },
            "recruiter": { "personName": { "formattedName": "Halliday, Robyn" } }
        }
    })
}

pub(crate) fn raw_requisition(item_id: &str, posted: &str, backfill: bool) -> Value {
    json!({
        "itemID": item_id,
        "postingInstructions": [ { "postDate": posted } ],
        "backfillWorkerPositions": if backfill { json!([{ "positionID": "P-1" }]) } else { json!([]) },
        "openingsNewPositionQuantity": 1
    })
}

/// Keeps every recorded stage in memory.
#[derive(Default)]
pub(crate) struct MemoryRecorder {
    pub(crate) stages: RefCell<HashMap<Stage, Value>>,
}

impl StageRecorder for MemoryRecorder {
    fn record(&self, stage: Stage, payload: &Value) -> Result<(), StageRecordError> {
        self.stages.borrow_mut().insert(stage, payload.clone());
        Ok(())
    }
}
