//! Applicant to staff reconciliation and hire metrics derivation.
//!
//! Raw worker, job application, and job requisition records are normalized into canonical
//! shapes, applicants are matched against existing staff, applications are filtered down to
//! one per candidate, and the survivors are joined to requisitions to produce the published
//! table.

mod applications;
mod corrections;
mod domain;
mod filter;
mod matcher;
mod metrics;
mod paginator;
mod pipeline;
mod requisitions;
mod staff;

#[cfg(test)]
mod tests;

pub use applications::normalize_applications;
pub use corrections::{given_first, NameCorrections, NameFix, RecruiterAlias};
pub use domain::{
    parse_calendar_date, ApplicationRecord, ApplicationStatus, EmploymentStatus, MatchFlag,
    OutputRecord, RequisitionRecord, RequisitionType, StaffRecord,
};
pub use filter::{filter_and_deduplicate, is_tracked_status, EXCLUDE_KEYWORDS, INCLUDE_KEYWORDS};
pub use matcher::{
    find_first_match, reconcile, score_pair, MatchCriterion, MatchScore, StaffMatch,
    MATCH_THRESHOLD, START_WINDOW_DAYS,
};
pub use metrics::{
    build_output, days_to_hire, find_requisition, is_recent_hire, JoinMissPolicy,
    RECENT_HIRE_DAYS,
};
pub use paginator::{
    page_plan_total, PageFetch, PageFetchError, PagedSource, Paginator, SourceError,
};
pub use pipeline::{
    DiscardStages, PipelineError, PipelineOutput, PipelineSummary, RawRecordSets,
    RecruitingPipeline, Stage, StageRecordError, StageRecorder,
};
pub use requisitions::{classify, normalize_requisitions};
pub use staff::normalize_staff;

/// A raw record that could not be turned into its canonical shape.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("worker {index} ({worker}) has no work assignment flagged primary")]
    MissingPrimaryAssignment { index: usize, worker: String },
    #[error("{kind} record {index} is malformed: {source}")]
    Malformed {
        kind: &'static str,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}
