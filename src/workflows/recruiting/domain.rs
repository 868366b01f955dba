use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Employment status reported for a worker. Only `Active` and `Inactive` survive normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentStatus {
    Active,
    Inactive,
    Other(String),
}

impl EmploymentStatus {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "Active" => Self::Active,
            "Inactive" => Self::Inactive,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_employment_relevant(&self) -> bool {
        matches!(self, Self::Active | Self::Inactive)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Other(code) => code,
        }
    }
}

/// Canonical worker shape used as the reconciliation population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRecord {
    pub forename: String,
    pub middle_name: Option<String>,
    pub given_name: Option<String>,
    pub preferred_name: Option<String>,
    pub surname: String,
    pub status: EmploymentStatus,
    pub birth_date: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub manager: Option<String>,
}

impl StaffRecord {
    /// Every name the worker could plausibly apply under.
    pub fn known_forenames(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.forename.as_str())
            .chain(self.middle_name.as_deref())
            .chain(self.given_name.as_deref())
            .chain(self.preferred_name.as_deref())
    }
}

/// Free-text application status code. Upstream codes are not fully enumerable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ApplicationStatus {
    Code(String),
    Unknown,
}

impl ApplicationStatus {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(code) if !code.is_empty() => Self::Code(code.to_string()),
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Code(code) => code,
            Self::Unknown => "",
        }
    }

    pub fn is_hired(&self) -> bool {
        self.as_str() == "Hired"
    }
}

impl From<Option<String>> for ApplicationStatus {
    fn from(value: Option<String>) -> Self {
        Self::from_raw(value.as_deref())
    }
}

impl From<ApplicationStatus> for Option<String> {
    fn from(value: ApplicationStatus) -> Self {
        match value {
            ApplicationStatus::Code(code) => Some(code),
            ApplicationStatus::Unknown => None,
        }
    }
}

/// Outcome of reconciling an applicant against the staff population.
///
/// `Unset` until the matcher has run; the matcher assigns exactly one of the other two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFlag {
    #[default]
    Unset,
    Matched,
    Unmatched,
}

impl MatchFlag {
    pub fn is_matched(self) -> bool {
        matches!(self, Self::Matched)
    }
}

/// Canonical applicant shape. Only `match_flag` changes after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub candidate_name: String,
    pub forename: String,
    pub surname: String,
    pub birth_date: Option<String>,
    pub status: ApplicationStatus,
    pub job_title: Option<String>,
    pub hiring_manager: String,
    pub line_manager: String,
    pub recruiter: String,
    pub requisition_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub match_flag: MatchFlag,
}

/// Why a requisition was opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequisitionType {
    Backfill,
    #[serde(rename = "New Role")]
    NewRole,
    #[default]
    Unknown,
}

impl RequisitionType {
    pub const fn label(self) -> &'static str {
        match self {
            RequisitionType::Backfill => "Backfill",
            RequisitionType::NewRole => "New Role",
            RequisitionType::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequisitionRecord {
    pub requisition_id: String,
    /// Posting timestamp as delivered upstream; only its date prefix is used.
    pub posted_date: Option<String>,
    pub requisition_type: RequisitionType,
}

impl RequisitionRecord {
    pub fn posted_on(&self) -> Option<NaiveDate> {
        self.posted_date.as_deref().and_then(parse_calendar_date)
    }
}

/// Flattened row published to the reporting table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(rename = "CandidateName")]
    pub candidate_name: String,
    #[serde(rename = "ApplicationStatus")]
    pub application_status: ApplicationStatus,
    #[serde(rename = "JobTitle")]
    pub job_title: Option<String>,
    #[serde(rename = "HiringManager")]
    pub hiring_manager: String,
    #[serde(rename = "Recruiter")]
    pub recruiter: String,
    #[serde(rename = "RequisitionCreateDate")]
    pub requisition_posted: Option<NaiveDate>,
    #[serde(rename = "DateofHire")]
    pub hire_date: Option<NaiveDate>,
    #[serde(rename = "DaystoHire")]
    pub days_to_hire: u32,
    #[serde(rename = "StillEmployed")]
    pub still_employed: bool,
    #[serde(rename = "ReqType")]
    pub requisition_type: RequisitionType,
}

/// Parse the calendar date at the head of an upstream date or timestamp string.
///
/// Only the leading `YYYY-MM-DD` is read; whatever follows it is ignored. Anything that
/// does not start with a valid date is treated as absent.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    trimmed
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_calendar_date_accepts_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        assert_eq!(parse_calendar_date("2024-01-01"), Some(expected));
        assert_eq!(parse_calendar_date("2024-01-01T00:00:00"), Some(expected));
        assert_eq!(parse_calendar_date("2024-01-01T09:30:00Z"), Some(expected));
        assert_eq!(parse_calendar_date("2024-01-01 08:30:00"), Some(expected));
        assert_eq!(parse_calendar_date("2024-01-01Z"), Some(expected));
        assert_eq!(parse_calendar_date("2024-01-0"), None);
        assert_eq!(parse_calendar_date(" "), None);
        assert_eq!(parse_calendar_date("01/02/2024"), None);
        assert_eq!(parse_calendar_date("2024-13-01"), None);
    }

    #[test]
    fn application_status_treats_blank_codes_as_unknown() {
        assert_eq!(ApplicationStatus::from_raw(Some("  ")), ApplicationStatus::Unknown);
        assert_eq!(ApplicationStatus::from_raw(None), ApplicationStatus::Unknown);
        assert!(ApplicationStatus::from_raw(Some("Hired")).is_hired());
        assert!(!ApplicationStatus::from_raw(Some("Hired - Pending")).is_hired());
    }

    #[test]
    fn application_status_serializes_as_plain_string() {
        let json = serde_json::to_string(&ApplicationStatus::Code("Offer".to_string()))
            .expect("serialize");
        assert_eq!(json, "\"Offer\"");
        let unknown = serde_json::to_string(&ApplicationStatus::Unknown).expect("serialize");
        assert_eq!(unknown, "null");
    }

    #[test]
    fn requisition_type_uses_display_labels_on_the_wire() {
        let json = serde_json::to_string(&RequisitionType::NewRole).expect("serialize");
        assert_eq!(json, "\"New Role\"");
        assert_eq!(RequisitionType::Backfill.label(), "Backfill");
    }

    #[test]
    fn employment_status_keeps_only_active_and_inactive() {
        assert!(EmploymentStatus::from_code("Active").is_employment_relevant());
        assert!(EmploymentStatus::from_code("Inactive").is_employment_relevant());
        assert!(!EmploymentStatus::from_code("Terminated").is_employment_relevant());
    }
}
