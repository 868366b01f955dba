//! One sync run: pull or replay the raw record sets, reconcile, and republish the table.

use chrono::NaiveDateTime;
use tracing::info;

use crate::config::ReconciliationConfig;
use crate::error::AppError;
use crate::infra::{CsvTableSink, SnapshotStore, TableSink};
use crate::workflows::recruiting::{
    PagedSource, Paginator, PipelineSummary, RawRecordSets, RecruitingPipeline, SourceError,
};

/// Walk the three sources in order, staff first.
pub fn pull_records(
    staff: &dyn PagedSource,
    applications: &dyn PagedSource,
    requisitions: &dyn PagedSource,
) -> Result<RawRecordSets, SourceError> {
    Ok(RawRecordSets {
        staff: pull(staff)?,
        applications: pull(applications)?,
        requisitions: pull(requisitions)?,
    })
}

fn pull(source: &dyn PagedSource) -> Result<Vec<serde_json::Value>, SourceError> {
    info!(source = source.name(), "retrieving records");
    let records = Paginator::new(source)?.collect_records();
    info!(source = source.name(), count = records.len(), "retrieved records");
    Ok(records)
}

/// Run the pipeline over `raw` and replace the table behind `sink` with the result.
///
/// With an export store every stage is written to disk, plus a CSV copy of the output.
pub fn publish(
    raw: &RawRecordSets,
    reconciliation: &ReconciliationConfig,
    export: Option<&SnapshotStore>,
    sink: &mut dyn TableSink,
    now: NaiveDateTime,
) -> Result<PipelineSummary, AppError> {
    let pipeline = RecruitingPipeline::new(&reconciliation.corrections, reconciliation.join_miss);
    let output = match export {
        Some(store) => pipeline.with_recorder(store).run(raw, now)?,
        None => pipeline.run(raw, now)?,
    };

    if let Some(store) = export {
        CsvTableSink::new(store.schema_path()).replace_all(&output.rows)?;
    }

    sink.replace_all(&output.rows)?;

    let summary = output.summary;
    info!(
        staff = summary.staff,
        applications = summary.applications,
        matched = summary.matched,
        filtered = summary.filtered,
        requisitions = summary.requisitions,
        rows = summary.rows,
        "sync complete"
    );
    Ok(summary)
}
