mod config;
mod geodesy;
mod pipeline;
mod snapshot;
mod trajectory;
mod weather;
mod web;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::Config;
use crate::pipeline::{read_points, write_points, Runner};
use crate::snapshot::{fetch_all, DirSnapshotSource, HttpSnapshotSource};
use crate::trajectory::reconstruct;
use crate::weather::OpenWeatherClient;

#[derive(Parser)]
#[command(name = "balloon-track")]
#[command(about = "Balloon trajectory reconstruction with weather enrichment")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch snapshots, reconstruct, enrich and save
    Run {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Reconstruct trajectories from local snapshot files
    Reconstruct {
        #[arg(long)]
        dir: PathBuf,
        /// Time the snapshots were taken relative to (RFC 3339), defaults to now
        #[arg(long)]
        reference: Option<DateTime<Utc>>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Serve a saved trajectory document over HTTP
    Serve {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => run(config.as_deref(), output).await,
        Commands::Reconstruct {
            dir,
            reference,
            output,
        } => reconstruct_dir(dir, reference, output).await,
        Commands::Serve { config, data } => serve(config.as_deref(), data).await,
    }
}

fn load_config(path: Option<&Path>) -> Option<Config> {
    match Config::load(path) {
        Ok(config) => Some(config),
        Err(e) => {
            error!("Failed to load config: {}", e);
            None
        }
    }
}

async fn run(config_path: Option<&Path>, output: Option<PathBuf>) -> ExitCode {
    let Some(mut config) = load_config(config_path) else {
        return ExitCode::FAILURE;
    };
    if let Some(output) = output {
        config.output.path = output;
    }

    let snapshots = match HttpSnapshotSource::new(&config.source.base_url, config.source.timeout) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to build snapshot client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let forecasts = match config.weather.credential() {
        Some(key) => match OpenWeatherClient::new(
            &config.weather.base_url,
            key,
            config.weather.timeout,
        ) {
            Ok(client) => Some(client),
            Err(e) => {
                error!("Failed to build forecast client: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let runner = Runner {
        config,
        snapshots,
        forecasts,
    };

    match runner.run(Utc::now()).await {
        Ok(report) => {
            info!(
                "Done: {} snapshot(s) fetched, {} failed, {} point(s), {} with weather ({} call(s)), saved to {}",
                report.snapshots_fetched,
                report.snapshots_failed,
                report.points,
                report.weather_attached,
                report.weather_calls,
                report.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn reconstruct_dir(
    dir: PathBuf,
    reference: Option<DateTime<Utc>>,
    output: Option<PathBuf>,
) -> ExitCode {
    let source = DirSnapshotSource::new(dir);
    let labels = match source.labels() {
        Ok(labels) => labels,
        Err(e) => {
            error!("Failed to list snapshots: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let fetched = fetch_all(&source, &labels).await;
    let reference = reference.unwrap_or_else(Utc::now);
    let points = reconstruct(&fetched.snapshots, reference);
    if points.is_empty() {
        error!("No trajectory point could be reconstructed");
        return ExitCode::FAILURE;
    }

    let output = output.unwrap_or_else(|| Config::default().output.path);
    match write_points(&output, &points) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to save points: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve(config_path: Option<&Path>, data: Option<PathBuf>) -> ExitCode {
    let Some(config) = load_config(config_path) else {
        return ExitCode::FAILURE;
    };

    let data = data.unwrap_or_else(|| config.output.path.clone());
    let points = match read_points(&data) {
        Ok(points) => points,
        Err(e) => {
            error!("Failed to read {}: {}", data.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match web::run_server(config.web, points).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
