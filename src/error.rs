use crate::config::ConfigError;
use crate::infra::{SnapshotError, TableError, TransportError};
use crate::telemetry::TelemetryError;
use crate::workflows::recruiting::{PipelineError, SourceError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Transport(TransportError),
    Source(SourceError),
    Pipeline(PipelineError),
    Snapshot(SnapshotError),
    Table(TableError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Transport(err) => write!(f, "transport error: {}", err),
            AppError::Source(err) => write!(f, "source error: {}", err),
            AppError::Pipeline(err) => write!(f, "pipeline error: {}", err),
            AppError::Snapshot(err) => write!(f, "snapshot error: {}", err),
            AppError::Table(err) => write!(f, "table error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Transport(err) => Some(err),
            AppError::Source(err) => Some(err),
            AppError::Pipeline(err) => Some(err),
            AppError::Snapshot(err) => Some(err),
            AppError::Table(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<TransportError> for AppError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

impl From<SourceError> for AppError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}

impl From<PipelineError> for AppError {
    fn from(value: PipelineError) -> Self {
        Self::Pipeline(value)
    }
}

impl From<SnapshotError> for AppError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

impl From<TableError> for AppError {
    fn from(value: TableError) -> Self {
        Self::Table(value)
    }
}
