//! Switch inventory collector
//!
//! Reads a JSON device roster, collects serial number, model and port status
//! from every switch over SSH and writes one CSV file per device family.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use env_logger::Env;
use log::Log;

use switch_inventory::session::HostKeyPolicy;
use switch_inventory::{
    BatchDriver, CollectorConfig, CsvExportSink, DeviceCollector, DialectRegistry, ExportSink,
    Inventory, Logger, SessionConfig, SshConnector,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Collect switch port inventory over SSH", long_about = None)]
struct Args {
    /// Path to the JSON config (credentials and device roster)
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Directory the CSV exports are written to
    #[arg(short, long, default_value = "exports")]
    output_dir: PathBuf,

    /// Number of devices collected at the same time
    #[arg(long, default_value = "1")]
    concurrency: usize,

    /// Pause after each successfully collected device, in seconds
    #[arg(long, default_value = "5")]
    pacing_secs: u64,

    /// SSH connect and authentication timeout, in seconds
    #[arg(long, default_value = "30")]
    connect_timeout_secs: u64,

    /// Per-command timeout, in seconds
    #[arg(long, default_value = "30")]
    command_timeout_secs: u64,

    /// SSH port
    #[arg(short, long, default_value = "22")]
    port: u16,

    /// Verify host keys against this known_hosts file
    #[arg(long)]
    known_hosts: Option<PathBuf>,
}

impl Args {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            port: self.port,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            command_timeout: Duration::from_secs(self.command_timeout_secs),
            host_key_policy: match &self.known_hosts {
                Some(path) => HostKeyPolicy::KnownHosts(Some(path.clone())),
                None => HostKeyPolicy::AcceptAny,
            },
            ..SessionConfig::default()
        }
    }
}

fn init_logger() -> Logger {
    let logger = env_logger::Builder::from_env(Env::default().default_filter_or("info")).build();
    log::set_max_level(logger.filter());
    Logger::new(Arc::new(logger))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log = init_logger();

    log::info!(logger: log, "new inventory run");

    let inventory = match Inventory::load(&args.config) {
        Ok(inventory) => inventory,
        Err(e) => {
            log::error!(logger: log, "{}", e);
            log.flush();
            return ExitCode::FAILURE;
        }
    };

    let connector = SshConnector::new(args.session_config(), log.clone());
    let collector = DeviceCollector::new(
        connector,
        CollectorConfig {
            pacing: Duration::from_secs(args.pacing_secs),
        },
        log.clone(),
    );
    let driver = BatchDriver::new(collector, DialectRegistry::with_builtins(), log.clone())
        .with_concurrency(args.concurrency);

    let result = match driver.run(&inventory).await {
        Ok(result) => result,
        Err(e) => {
            log::error!(logger: log, "{}", e);
            log.flush();
            return ExitCode::FAILURE;
        }
    };

    if result.is_empty() {
        log::warn!(logger: log, "no data to export");
    } else {
        let sink = CsvExportSink::new(&args.output_dir, log.clone());
        if let Err(e) = sink.export(&result) {
            log::error!(logger: log, "export failed: {}", e);
            log.flush();
            return ExitCode::FAILURE;
        }
    }

    log::info!(logger: log, "all actions finished");
    log.flush();
    ExitCode::SUCCESS
}
