use std::collections::BTreeMap;

use tracing::info;

use super::domain::{ApplicationRecord, ApplicationStatus};

/// Status fragments marking an application as in process or hired.
pub const INCLUDE_KEYWORDS: &[&str] = &["Offer", "Screening", "Hire"];

/// Status fragments that disqualify an application outright. Checked before inclusion.
pub const EXCLUDE_KEYWORDS: &[&str] = &["Deleted", "Declined"];

pub fn is_tracked_status(status: &ApplicationStatus) -> bool {
    let code = status.as_str();
    if EXCLUDE_KEYWORDS.iter().any(|keyword| code.contains(keyword)) {
        return false;
    }
    INCLUDE_KEYWORDS.iter().any(|keyword| code.contains(keyword))
}

/// Keep tracked statuses and collapse each candidate to a single application.
///
/// Records are stably sorted by (candidate name, status). Within a candidate the last record
/// wins, except that a record with status exactly `Hired` is never displaced once kept.
/// The result is in sorted candidate order.
pub fn filter_and_deduplicate(applications: Vec<ApplicationRecord>) -> Vec<ApplicationRecord> {
    let received = applications.len();
    let mut tracked: Vec<ApplicationRecord> = applications
        .into_iter()
        .filter(|application| is_tracked_status(&application.status))
        .collect();
    let kept_by_status = tracked.len();

    tracked.sort_by(|left, right| {
        (left.candidate_name.as_str(), left.status.as_str())
            .cmp(&(right.candidate_name.as_str(), right.status.as_str()))
    });

    let mut by_candidate: BTreeMap<String, ApplicationRecord> = BTreeMap::new();
    for application in tracked {
        match by_candidate.get(&application.candidate_name) {
            Some(kept) if kept.status.is_hired() => {}
            _ => {
                by_candidate.insert(application.candidate_name.clone(), application);
            }
        }
    }

    let deduplicated: Vec<ApplicationRecord> = by_candidate.into_values().collect();
    info!(
        received,
        kept_by_status,
        candidates = deduplicated.len(),
        "filtered job applications"
    );
    deduplicated
}
