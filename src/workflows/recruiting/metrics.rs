use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{ApplicationRecord, OutputRecord, RequisitionRecord, RequisitionType};

/// Hires starting within this many days of the run are assumed to still be employed.
pub const RECENT_HIRE_DAYS: i64 = 21;

/// What requisition type an application gets when no requisition carries its identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JoinMissPolicy {
    /// Report the type as unknown.
    #[default]
    Unknown,
    /// Reuse the type of the last requisition the joiner matched. Reproduces the legacy table.
    CarryOver,
}

impl JoinMissPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unknown" => Some(Self::Unknown),
            "carry-over" | "carryover" | "legacy" => Some(Self::CarryOver),
            _ => None,
        }
    }
}

/// First requisition with the given identifier.
pub fn find_requisition<'a>(
    requisitions: &'a [RequisitionRecord],
    requisition_id: Option<&str>,
) -> Option<&'a RequisitionRecord> {
    let requisition_id = requisition_id?;
    requisitions
        .iter()
        .find(|requisition| requisition.requisition_id == requisition_id)
}

/// Whole days from posting to start, floored at zero. Zero when either date is unusable.
pub fn days_to_hire(requisition: &RequisitionRecord, application: &ApplicationRecord) -> u32 {
    match (requisition.posted_on(), application.start_date) {
        (Some(posted), Some(start)) => (start - posted).num_days().max(0) as u32,
        _ => 0,
    }
}

/// Starters on or after `now` minus the recency window.
pub fn is_recent_hire(application: &ApplicationRecord, now: NaiveDateTime) -> bool {
    let threshold = now - Duration::days(RECENT_HIRE_DAYS);
    application
        .start_date
        .and_then(|start| start.and_hms_opt(0, 0, 0))
        .is_some_and(|start| start >= threshold)
}

/// Join filtered applications to their requisitions and compute hire timing.
pub fn build_output(
    applications: &[ApplicationRecord],
    requisitions: &[RequisitionRecord],
    policy: JoinMissPolicy,
    now: NaiveDateTime,
) -> Vec<OutputRecord> {
    let mut last_seen_type = RequisitionType::Unknown;
    let mut misses = 0usize;
    let mut output = Vec::with_capacity(applications.len());

    for application in applications {
        let requisition = find_requisition(requisitions, application.requisition_id.as_deref());

        let (requisition_posted, days, requisition_type) = match requisition {
            Some(requisition) => {
                last_seen_type = requisition.requisition_type;
                (
                    requisition.posted_on(),
                    days_to_hire(requisition, application),
                    requisition.requisition_type,
                )
            }
            None => {
                misses += 1;
                let requisition_type = match policy {
                    JoinMissPolicy::Unknown => RequisitionType::Unknown,
                    JoinMissPolicy::CarryOver => last_seen_type,
                };
                debug!(
                    candidate = %application.candidate_name,
                    requisition_id = application.requisition_id.as_deref().unwrap_or(""),
                    requisition_type = requisition_type.label(),
                    "no requisition for application"
                );
                (None, 0, requisition_type)
            }
        };

        output.push(OutputRecord {
            candidate_name: application.candidate_name.clone(),
            application_status: application.status.clone(),
            job_title: application.job_title.clone(),
            hiring_manager: application.hiring_manager.clone(),
            recruiter: application.recruiter.clone(),
            requisition_posted,
            hire_date: application.start_date,
            days_to_hire: days,
            still_employed: application.match_flag.is_matched()
                || is_recent_hire(application, now),
            requisition_type,
        });
    }

    info!(rows = output.len(), misses, "built output table");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::recruiting::domain::MatchFlag;
    use crate::workflows::recruiting::tests::common::{applicant, date, requisition, run_clock};

    #[test]
    fn days_to_hire_counts_from_posting_date_prefix() {
        let mut application = applicant("Jane Doe", "Hired");
        application.start_date = Some(date(2024, 1, 15));
        let posting = requisition("REQ-1", Some("2024-01-01T00:00:00"), RequisitionType::NewRole);

        assert_eq!(days_to_hire(&posting, &application), 14);
    }

    #[test]
    fn days_to_hire_never_goes_negative() {
        let mut application = applicant("Jane Doe", "Hired");
        application.start_date = Some(date(2023, 12, 1));
        let posting = requisition("REQ-1", Some("2024-01-01T00:00:00"), RequisitionType::NewRole);

        assert_eq!(days_to_hire(&posting, &application), 0);
    }

    #[test]
    fn unparseable_dates_fall_back_to_zero() {
        let mut application = applicant("Jane Doe", "Hired");
        application.start_date = None;
        let posting = requisition("REQ-1", Some("2024-01-01T00:00:00"), RequisitionType::NewRole);
        assert_eq!(days_to_hire(&posting, &application), 0);

        let application = applicant("Jane Doe", "Hired");
        let posting = requisition("REQ-1", Some("last tuesday"), RequisitionType::NewRole);
        assert_eq!(days_to_hire(&posting, &application), 0);
    }

    #[test]
    fn joins_on_first_requisition_with_matching_identifier() {
        let application = applicant("Jane Doe", "Hired");
        let requisitions = vec![
            requisition("REQ-0", Some("2023-06-01"), RequisitionType::Backfill),
            requisition("REQ-1", Some("2024-01-01T00:00:00"), RequisitionType::NewRole),
            requisition("REQ-1", Some("2023-01-01T00:00:00"), RequisitionType::Backfill),
        ];

        let rows = build_output(&[application], &requisitions, JoinMissPolicy::Unknown, run_clock());

        assert_eq!(rows[0].requisition_posted, Some(date(2024, 1, 1)));
        assert_eq!(rows[0].days_to_hire, 9);
        assert_eq!(rows[0].requisition_type, RequisitionType::NewRole);
    }

    #[test]
    fn join_miss_reports_unknown_type_by_default() {
        let mut first = applicant("Ann", "Hired");
        first.requisition_id = Some("REQ-B".to_string());
        let mut second = applicant("Bob", "Hired");
        second.requisition_id = Some("REQ-MISSING".to_string());
        let requisitions = vec![requisition("REQ-B", Some("2024-01-01"), RequisitionType::Backfill)];

        let rows = build_output(&[first, second], &requisitions, JoinMissPolicy::Unknown, run_clock());

        assert_eq!(rows[1].requisition_type, RequisitionType::Unknown);
        assert_eq!(rows[1].requisition_posted, None);
        assert_eq!(rows[1].days_to_hire, 0);
    }

    #[test]
    fn carry_over_policy_reuses_last_matched_type() {
        let mut orphan = applicant("Aaron", "Hired");
        orphan.requisition_id = None;
        let mut first = applicant("Ann", "Hired");
        first.requisition_id = Some("REQ-B".to_string());
        let mut second = applicant("Bob", "Hired");
        second.requisition_id = Some("REQ-MISSING".to_string());
        let requisitions = vec![requisition("REQ-B", Some("2024-01-01"), RequisitionType::Backfill)];

        let rows = build_output(
            &[orphan, first, second],
            &requisitions,
            JoinMissPolicy::CarryOver,
            run_clock(),
        );

        assert_eq!(rows[0].requisition_type, RequisitionType::Unknown);
        assert_eq!(rows[1].requisition_type, RequisitionType::Backfill);
        assert_eq!(rows[2].requisition_type, RequisitionType::Backfill);
        assert_eq!(rows[2].days_to_hire, 0);
        assert_eq!(rows[2].requisition_posted, None);
    }

    #[test]
    fn recent_hire_forces_still_employed() {
        let now = run_clock();
        let mut recent = applicant("Ann", "Hired");
        recent.match_flag = MatchFlag::Unmatched;
        recent.start_date = Some(now.date() - Duration::days(20));
        let mut old = applicant("Bob", "Hired");
        old.match_flag = MatchFlag::Unmatched;
        old.start_date = Some(now.date() - Duration::days(60));
        let mut matched = old.clone();
        matched.candidate_name = "Cal".to_string();
        matched.match_flag = MatchFlag::Matched;

        let rows = build_output(&[recent, old, matched], &[], JoinMissPolicy::Unknown, now);

        assert!(rows[0].still_employed);
        assert!(!rows[1].still_employed);
        assert!(rows[2].still_employed);
    }

    #[test]
    fn recency_window_compares_against_the_run_timestamp() {
        let now = date(2024, 1, 31).and_hms_opt(10, 0, 0).expect("valid time");
        let mut boundary = applicant("Ann", "Hired");
        boundary.start_date = Some(date(2024, 1, 10));
        assert!(!is_recent_hire(&boundary, now));

        boundary.start_date = Some(date(2024, 1, 11));
        assert!(is_recent_hire(&boundary, now));

        boundary.start_date = Some(date(2024, 3, 1));
        assert!(is_recent_hire(&boundary, now));

        boundary.start_date = None;
        assert!(!is_recent_hire(&boundary, now));
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!(JoinMissPolicy::parse("Unknown"), Some(JoinMissPolicy::Unknown));
        assert_eq!(JoinMissPolicy::parse("carry-over"), Some(JoinMissPolicy::CarryOver));
        assert_eq!(JoinMissPolicy::parse("sometimes"), None);
    }
}
