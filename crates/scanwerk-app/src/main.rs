// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk — replay a recorded recognition session through the scan-session
// coordinator.
//
// Entry point. Initialises logging, loads the scan configuration and the
// event script, drives one session until the script runs dry, and prints the
// accepted results as JSON.

mod observer;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use scanwerk_bridge::ReplayProvider;
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::human_errors::humanize_error;
use scanwerk_core::{ScanConfig, ScanResult};
use scanwerk_session::{EventOutcome, ScanSessionController};

use observer::LogObserver;

#[derive(Debug, Parser)]
#[command(name = "scanwerk", version, about)]
struct Cli {
    /// Built-in scan configuration: `iban` or `container`.
    #[arg(long, conflicts_with = "config", required_unless_present = "config")]
    preset: Option<String>,

    /// Scan configuration file (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recorded provider events (JSON array).
    #[arg(long)]
    events: PathBuf,

    /// Directory trained-data assets are resolved against.
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Dismiss each accepted result and keep scanning.
    #[arg(long)]
    auto_dismiss: bool,

    /// Delay between replayed frames, in milliseconds.
    #[arg(long, default_value_t = 0)]
    frame_ms: u64,

    /// Give up after this long without provider events, in milliseconds.
    #[arg(long, default_value_t = 500)]
    idle_ms: u64,
}

fn load_config(cli: &Cli) -> Result<ScanConfig> {
    match (&cli.preset, &cli.config) {
        (_, Some(path)) => ScanConfig::from_json_file(path),
        (Some(name), None) => ScanConfig::preset(name)
            .ok_or_else(|| ScanError::InvalidConfig(format!("unknown preset `{name}`"))),
        (None, None) => Err(ScanError::InvalidConfig(
            "either --preset or --config is required".into(),
        )),
    }
}

async fn run(cli: Cli) -> Result<Vec<ScanResult>> {
    let config = load_config(&cli)?;
    let provider = ReplayProvider::from_json_file(&cli.events)?
        .with_asset_root(&cli.assets)
        .with_frame_interval(Duration::from_millis(cli.frame_ms));

    let mut controller = ScanSessionController::new(provider, config, LogObserver::default())?;
    tracing::info!(session = %controller.id(), "scan session starting");
    controller.start().await?;

    let idle = Duration::from_millis(cli.idle_ms);
    let mut results = Vec::new();
    loop {
        let outcome = match tokio::time::timeout(idle, controller.next_event()).await {
            Ok(Some(outcome)) => outcome,
            Ok(None) => break,
            Err(_) => {
                tracing::debug!("no provider events within idle timeout");
                break;
            }
        };

        if let EventOutcome::ValidResult(result) = outcome {
            results.push(result);
            if !cli.auto_dismiss {
                break;
            }
            controller.dismiss_result().await?;
        }
    }

    controller.teardown().await;
    tracing::info!(results = results.len(), "scan session finished");
    Ok(results)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(results) => match serde_json::to_string_pretty(&results) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to encode results");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            let human = humanize_error(&err);
            tracing::error!(error = %err, "scan failed");
            eprintln!("{}\n{}", human.message, human.suggestion);
            if err.is_fatal() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
