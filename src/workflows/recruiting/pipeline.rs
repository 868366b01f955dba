use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::applications::normalize_applications;
use super::corrections::NameCorrections;
use super::domain::OutputRecord;
use super::filter::filter_and_deduplicate;
use super::matcher::reconcile;
use super::metrics::{build_output, JoinMissPolicy};
use super::requisitions::normalize_requisitions;
use super::staff::normalize_staff;
use super::NormalizeError;

/// Checkpoints whose output can be captured for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    RawStaff,
    Staff,
    RawApplications,
    ReconciledApplications,
    FilteredApplications,
    RawRequisitions,
    Requisitions,
    Output,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::RawStaff,
        Stage::Staff,
        Stage::RawApplications,
        Stage::ReconciledApplications,
        Stage::FilteredApplications,
        Stage::RawRequisitions,
        Stage::Requisitions,
        Stage::Output,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Stage::RawStaff => "raw staff",
            Stage::Staff => "staff",
            Stage::RawApplications => "raw applications",
            Stage::ReconciledApplications => "reconciled applications",
            Stage::FilteredApplications => "filtered applications",
            Stage::RawRequisitions => "raw requisitions",
            Stage::Requisitions => "requisitions",
            Stage::Output => "output",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sink for intermediate stage output.
pub trait StageRecorder {
    fn record(&self, stage: Stage, payload: &Value) -> Result<(), StageRecordError>;
}

/// Recorder used when intermediate output is not wanted.
pub struct DiscardStages;

impl StageRecorder for DiscardStages {
    fn record(&self, _stage: Stage, _payload: &Value) -> Result<(), StageRecordError> {
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{detail}")]
pub struct StageRecordError {
    pub detail: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error("failed to serialize {stage} stage: {source}")]
    Serialize {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to record {stage} stage: {source}")]
    Record {
        stage: Stage,
        #[source]
        source: StageRecordError,
    },
}

/// The three raw record sets pulled from the source system.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecordSets {
    pub staff: Vec<Value>,
    pub applications: Vec<Value>,
    pub requisitions: Vec<Value>,
}

/// Counts gathered while a run progresses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    pub staff: usize,
    pub applications: usize,
    pub matched: usize,
    pub filtered: usize,
    pub requisitions: usize,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub rows: Vec<OutputRecord>,
    pub summary: PipelineSummary,
}

/// Reconciliation and metrics derivation over one pull of raw records.
pub struct RecruitingPipeline<'a> {
    corrections: &'a NameCorrections,
    join_miss: JoinMissPolicy,
    recorder: &'a dyn StageRecorder,
}

impl<'a> RecruitingPipeline<'a> {
    pub fn new(corrections: &'a NameCorrections, join_miss: JoinMissPolicy) -> Self {
        Self {
            corrections,
            join_miss,
            recorder: &DiscardStages,
        }
    }

    pub fn with_recorder(mut self, recorder: &'a dyn StageRecorder) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn run(
        &self,
        raw: &RawRecordSets,
        now: NaiveDateTime,
    ) -> Result<PipelineOutput, PipelineError> {
        self.capture(Stage::RawStaff, &raw.staff)?;
        let staff = normalize_staff(&raw.staff)?;
        self.capture(Stage::Staff, &staff)?;

        self.capture(Stage::RawApplications, &raw.applications)?;
        let mut applications = normalize_applications(&raw.applications, self.corrections)?;
        let matched = reconcile(&mut applications, &staff);
        info!(
            applications = applications.len(),
            matched, "reconciled applicants against staff"
        );
        self.capture(Stage::ReconciledApplications, &applications)?;

        let application_count = applications.len();
        let filtered = filter_and_deduplicate(applications);
        self.capture(Stage::FilteredApplications, &filtered)?;

        self.capture(Stage::RawRequisitions, &raw.requisitions)?;
        let requisitions = normalize_requisitions(&raw.requisitions)?;
        self.capture(Stage::Requisitions, &requisitions)?;

        let rows = build_output(&filtered, &requisitions, self.join_miss, now);
        self.capture(Stage::Output, &rows)?;

        let summary = PipelineSummary {
            staff: staff.len(),
            applications: application_count,
            matched,
            filtered: filtered.len(),
            requisitions: requisitions.len(),
            rows: rows.len(),
        };

        Ok(PipelineOutput { rows, summary })
    }

    fn capture<T: Serialize + ?Sized>(&self, stage: Stage, payload: &T) -> Result<(), PipelineError> {
        let value = serde_json::to_value(payload)
            .map_err(|source| PipelineError::Serialize { stage, source })?;
        self.recorder
            .record(stage, &value)
            .map_err(|source| PipelineError::Record { stage, source })
    }
}
