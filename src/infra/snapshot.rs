use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info};

use crate::workflows::recruiting::{RawRecordSets, Stage, StageRecordError, StageRecorder};

/// File the published table schema is exported to alongside the stage snapshots.
pub const SCHEMA_FILE_NAME: &str = "005 - main schema.csv";

pub const fn snapshot_file_name(stage: Stage) -> &'static str {
    match stage {
        Stage::RawStaff => "001a - Raw Staff.json",
        Stage::Staff => "001b - Reordered + Filtered Staff.json",
        Stage::RawApplications => "002a - Raw Applications.json",
        Stage::ReconciledApplications => "002b - New Applications.json",
        Stage::FilteredApplications => "002c - Filtered Applications.json",
        Stage::RawRequisitions => "003a - Raw Requisitions.json",
        Stage::Requisitions => "003 - Requisitions.json",
        Stage::Output => "004 - Export.json",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot io failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot {} is not valid JSON: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("snapshot {} does not hold a list of records", path.display())]
    NotAList { path: PathBuf },
}

/// Directory of pretty-printed JSON stage snapshots, used for export and replay.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, stage: Stage) -> PathBuf {
        self.dir.join(snapshot_file_name(stage))
    }

    pub fn schema_path(&self) -> PathBuf {
        self.dir.join(SCHEMA_FILE_NAME)
    }

    pub fn write(&self, stage: Stage, payload: &Value) -> Result<(), SnapshotError> {
        fs::create_dir_all(&self.dir).map_err(|source| SnapshotError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(stage);
        let io_error = |source| SnapshotError::Io {
            path: path.clone(),
            source,
        };
        let mut writer = BufWriter::new(File::create(&path).map_err(io_error)?);
        serde_json::to_writer_pretty(&mut writer, payload).map_err(|source| {
            SnapshotError::Format {
                path: path.clone(),
                source,
            }
        })?;
        writer.flush().map_err(io_error)?;

        debug!(stage = %stage, path = %path.display(), "wrote stage snapshot");
        Ok(())
    }

    pub fn read(&self, stage: Stage) -> Result<Vec<Value>, SnapshotError> {
        let path = self.path_for(stage);
        let file = File::open(&path).map_err(|source| SnapshotError::Io {
            path: path.clone(),
            source,
        })?;
        let value: Value =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                SnapshotError::Format {
                    path: path.clone(),
                    source,
                }
            })?;

        match value {
            Value::Array(records) => Ok(records),
            _ => Err(SnapshotError::NotAList { path }),
        }
    }

    /// Raw record sets saved by an earlier exporting run.
    pub fn load_raw(&self) -> Result<RawRecordSets, SnapshotError> {
        let raw = RawRecordSets {
            staff: self.read(Stage::RawStaff)?,
            applications: self.read(Stage::RawApplications)?,
            requisitions: self.read(Stage::RawRequisitions)?,
        };
        info!(
            dir = %self.dir.display(),
            staff = raw.staff.len(),
            applications = raw.applications.len(),
            requisitions = raw.requisitions.len(),
            "loaded raw snapshots for replay"
        );
        Ok(raw)
    }
}

impl StageRecorder for SnapshotStore {
    fn record(&self, stage: Stage, payload: &Value) -> Result<(), StageRecordError> {
        self.write(stage, payload).map_err(|err| StageRecordError {
            detail: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}
