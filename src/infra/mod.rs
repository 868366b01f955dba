//! Collaborators around the recruiting core: the upstream HR API, the on-disk stage
//! snapshots, and the published table.

pub mod adp;
pub mod snapshot;
pub mod table;

pub use adp::{AdpClient, AdpEndpoint, AdpRecordSource, TransportError};
pub use snapshot::{snapshot_file_name, SnapshotError, SnapshotStore, SCHEMA_FILE_NAME};
pub use table::{CsvTableSink, TableError, TableSink, TABLE_COLUMNS};
