use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::workflows::recruiting::OutputRecord;

/// Column order of the published table.
pub const TABLE_COLUMNS: [&str; 10] = [
    "CandidateName",
    "ApplicationStatus",
    "JobTitle",
    "HiringManager",
    "Recruiter",
    "RequisitionCreateDate",
    "DateofHire",
    "DaystoHire",
    "StillEmployed",
    "ReqType",
];

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("unable to prepare {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write table {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Destination for the output table. Every publish replaces the previous contents.
pub trait TableSink {
    fn replace_all(&mut self, rows: &[OutputRecord]) -> Result<(), TableError>;
}

/// Table stored as a CSV file with a header row.
#[derive(Debug, Clone)]
pub struct CsvTableSink {
    path: PathBuf,
}

impl CsvTableSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn csv_error(&self, source: csv::Error) -> TableError {
        TableError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

impl TableSink for CsvTableSink {
    fn replace_all(&mut self, rows: &[OutputRecord]) -> Result<(), TableError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| TableError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .map_err(|err| self.csv_error(err))?;

        writer
            .write_record(TABLE_COLUMNS)
            .map_err(|err| self.csv_error(err))?;
        for row in rows {
            writer.serialize(row).map_err(|err| self.csv_error(err))?;
        }
        writer.flush().map_err(|source| TableError::Io {
            path: self.path.clone(),
            source,
        })?;

        info!(path = %self.path.display(), rows = rows.len(), "replaced table contents");
        Ok(())
    }
}
