use chrono::Local;
use clap::Parser;
use recruit_sync::config::AppConfig;
use recruit_sync::error::AppError;
use recruit_sync::infra::{AdpClient, AdpEndpoint, CsvTableSink, SnapshotStore};
use recruit_sync::sync::{publish, pull_records};
use recruit_sync::telemetry;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "recruit-sync",
    about = "Reconcile recruiting data against staff records and republish hire metrics",
    version
)]
struct Cli {
    /// Read the raw snapshots from the data directory instead of calling the HR API
    #[arg(long)]
    replay: bool,
    /// Write every stage's output to the data directory for inspection
    #[arg(long)]
    export: bool,
    /// Override the configured snapshot directory
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Override the configured output table path
    #[arg(long)]
    table: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }
    if let Some(table) = cli.table {
        config.storage.table_path = table;
    }

    telemetry::init(&config.telemetry)?;
    info!(
        ?config.environment,
        replay = cli.replay,
        export = cli.export,
        "starting recruiting sync"
    );

    let store = SnapshotStore::new(&config.storage.data_dir);
    let raw = if cli.replay {
        store.load_raw()?
    } else {
        let credentials = config.adp.credentials()?;
        let client = AdpClient::connect(&config.adp, &credentials)?;
        pull_records(
            &client.source(AdpEndpoint::Workers),
            &client.source(AdpEndpoint::JobApplications),
            &client.source(AdpEndpoint::JobRequisitions),
        )?
    };

    let mut sink = CsvTableSink::new(&config.storage.table_path);
    publish(
        &raw,
        &config.reconciliation,
        cli.export.then_some(&store),
        &mut sink,
        Local::now().naive_local(),
    )?;

    Ok(())
}
