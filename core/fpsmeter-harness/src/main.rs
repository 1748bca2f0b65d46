//! fpsmeter-harness: headless host harness for the overlay component.
//!
//! Stands in for a real windowing host during development and soak testing.
//! Mounts the component against a tracing-backed surface host and forwards
//! line commands from stdin as host events:
//!
//! - `start` / `stop`: the host control surface
//! - `sleep` / `wake`: power-state transitions
//! - `insets <px>`: screen layout change with a new top inset
//! - `status`: log the current lifecycle state
//! - `quit`: tear down and exit

mod host;
mod logging;

use clap::Parser;
use fpsmeter_core::{load_config, FpsMeter, PowerSignalHub};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "fpsmeter-harness")]
#[command(about = "Headless host harness for the fpsmeter overlay component")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.fpsmeter/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the sample resource path
    #[arg(long)]
    sample: Option<PathBuf>,

    /// Override the sampling period in milliseconds
    #[arg(long)]
    period_ms: Option<u64>,
}

fn main() {
    let _logging_guard = logging::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!(error = %err, "fpsmeter-harness failed");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> fpsmeter_core::Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => fpsmeter_core::config::default_config_path()?,
    };
    let mut config = load_config(&config_path)?;
    if let Some(sample) = cli.sample {
        config.sample_path = sample;
    }
    if let Some(period_ms) = cli.period_ms {
        config.period_ms = period_ms;
    }

    let host = Arc::new(host::LogSurfaceHost::new());
    let hub = Arc::new(PowerSignalHub::new());
    let meter_host: Arc<dyn fpsmeter_core::SurfaceHost> = host.clone();
    let meter_hub: Arc<dyn fpsmeter_core::PowerStateNotifier> = hub.clone();
    let mut meter = FpsMeter::new(config, meter_host, meter_hub)?;

    meter.start_reading();
    info!("Harness ready; commands: start stop sleep wake insets <px> status quit");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("start"), None) => meter.start_reading(),
            (Some("stop"), None) => meter.stop_reading(),
            (Some("sleep"), None) => hub.signal_sleep(),
            (Some("wake"), None) => hub.signal_wake(),
            (Some("insets"), Some(px)) => match px.parse::<i32>() {
                Ok(px) => {
                    host.set_inset(px);
                    meter.configuration_changed();
                }
                Err(_) => warn!(value = px, "insets takes an integer pixel offset"),
            },
            (Some("status"), None) => info!(
                reading = meter.is_reading(),
                observers = hub.observer_count(),
                inset = host.inset(),
                "Status"
            ),
            (Some("quit"), None) => break,
            (None, _) => {}
            (Some(other), _) => warn!(command = other, "Unknown command"),
        }
    }

    meter.shutdown();
    Ok(())
}
