//! CLI tool to replay a recorded telemetry trace through the GPWS
//! engine and report the alert transitions it produces.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gpws_cli::{read_trace, EventRecord};
use gpws_core::{AlertKind, Gpws, GpwsConfig};

/// Replay a JSONL telemetry trace through the warning engine
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Telemetry trace file (one FlightSample JSON object per line)
    trace: PathBuf,

    /// Engine configuration JSON; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the alert-event log as JSON to this file
    #[arg(long)]
    events_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gpws_core=debug".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<GpwsConfig>(&raw).context("decoding config")?
        }
        None => GpwsConfig::default(),
    };
    config.clamp();

    let samples = read_trace(&args.trace)
        .with_context(|| format!("reading trace {}", args.trace.display()))?;
    tracing::info!(samples = samples.len(), "trace loaded");

    let mut gpws = Gpws::new(config);
    let mut records = Vec::new();
    let mut alert_ticks = 0u32;

    for sample in samples {
        let time = sample.time;
        let report = gpws.update(sample);
        if let Some(intensity) = report.stall_intensity {
            tracing::info!(time, intensity, "stall shake");
        }
        for event in report.events {
            match event.kind {
                AlertKind::None => tracing::info!(time = event.time, "alert cleared"),
                AlertKind::Unavailable => {
                    tracing::info!(time = event.time, "system unavailable")
                }
                kind => {
                    alert_ticks += 1;
                    tracing::warn!(
                        time = event.time,
                        ?kind,
                        detail = event.detail.as_deref(),
                        "ALERT"
                    );
                }
            }
            records.push(EventRecord::new(event));
        }
    }

    println!(
        "Replay complete: {} transitions, {} audible alerts.",
        records.len(),
        alert_ticks
    );

    if let Some(path) = args.events_out {
        let json = serde_json::to_string_pretty(&records)?;
        fs::write(&path, json)
            .with_context(|| format!("writing events to {}", path.display()))?;
        println!("Event log written to {}", path.display());
    }

    Ok(())
}
