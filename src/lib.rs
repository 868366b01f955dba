pub mod config;
pub mod error;
pub mod infra;
pub mod sync;
pub mod telemetry;
pub mod workflows;
