use serde::Serialize;
use tracing::debug;

use super::domain::{ApplicationRecord, MatchFlag, StaffRecord};

/// Points required before an applicant is considered already on payroll.
pub const MATCH_THRESHOLD: u8 = 3;

/// Maximum distance, in calendar days, between proposed start and recorded hire.
pub const START_WINDOW_DAYS: i64 = 5;

/// Independent signals that an applicant and a worker are the same person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchCriterion {
    Forename,
    Surname,
    LineManager,
    StartWindow,
    BirthDate,
}

/// Criteria an applicant/worker pair agreed on. Each criterion is worth one point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchScore {
    pub criteria: Vec<MatchCriterion>,
}

impl MatchScore {
    pub fn total(&self) -> u8 {
        self.criteria.len() as u8
    }

    pub fn meets_threshold(&self) -> bool {
        self.total() >= MATCH_THRESHOLD
    }
}

/// A worker that qualified as the applicant's counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffMatch<'a> {
    pub position: usize,
    pub staff: &'a StaffRecord,
    pub score: MatchScore,
}

fn same_ignoring_case(left: &str, right: &str) -> bool {
    !left.is_empty() && left.to_lowercase() == right.to_lowercase()
}

pub fn score_pair(applicant: &ApplicationRecord, staff: &StaffRecord) -> MatchScore {
    let mut criteria = Vec::with_capacity(5);

    if staff
        .known_forenames()
        .any(|name| same_ignoring_case(&applicant.forename, name))
    {
        criteria.push(MatchCriterion::Forename);
    }

    if same_ignoring_case(&applicant.surname, &staff.surname) {
        criteria.push(MatchCriterion::Surname);
    }

    if !applicant.line_manager.is_empty()
        && staff.manager.as_deref() == Some(applicant.line_manager.as_str())
    {
        criteria.push(MatchCriterion::LineManager);
    }

    if let (Some(start), Some(hired)) = (applicant.start_date, staff.hire_date) {
        if (start - hired).num_days().abs() <= START_WINDOW_DAYS {
            criteria.push(MatchCriterion::StartWindow);
        }
    }

    if let (Some(applicant_dob), Some(staff_dob)) = (&applicant.birth_date, &staff.birth_date) {
        if applicant_dob == staff_dob {
            criteria.push(MatchCriterion::BirthDate);
        }
    }

    MatchScore { criteria }
}

/// The first worker, in population order, who reaches the threshold with a relevant status.
pub fn find_first_match<'a>(
    applicant: &ApplicationRecord,
    staff: &'a [StaffRecord],
) -> Option<StaffMatch<'a>> {
    staff.iter().enumerate().find_map(|(position, record)| {
        let score = score_pair(applicant, record);
        (score.meets_threshold() && record.status.is_employment_relevant()).then_some(
            StaffMatch {
                position,
                staff: record,
                score,
            },
        )
    })
}

/// Set each applicant's match flag against the staff population. Returns the number matched.
pub fn reconcile(applications: &mut [ApplicationRecord], staff: &[StaffRecord]) -> usize {
    let mut matched = 0;
    for applicant in applications.iter_mut() {
        let flag = match find_first_match(applicant, staff) {
            Some(found) => {
                debug!(
                    candidate = %applicant.candidate_name,
                    staff_position = found.position,
                    score = found.score.total(),
                    "applicant already on payroll"
                );
                matched += 1;
                MatchFlag::Matched
            }
            None => MatchFlag::Unmatched,
        };
        applicant.match_flag = flag;
    }
    matched
}
