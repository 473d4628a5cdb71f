use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::info;

use crate::config::Config;
use crate::pipeline::{
    enrich, log_preview, write_points, EnrichLimits, PipelineError, PipelineResult,
};
use crate::snapshot::{fetch_all, SnapshotSource};
use crate::trajectory::reconstruct;
use crate::weather::ForecastSource;

/// Fetch, reconstruct, enrich and save one batch of balloon data.
pub struct Runner<S, F> {
    pub config: Config,
    pub snapshots: S,
    /// `None` when no forecast credential is configured.
    pub forecasts: Option<F>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub snapshots_fetched: usize,
    pub snapshots_failed: usize,
    pub points: usize,
    pub weather_calls: usize,
    pub weather_attached: usize,
    pub output: PathBuf,
}

impl<S: SnapshotSource, F: ForecastSource> Runner<S, F> {
    pub async fn run(&self, reference: DateTime<Utc>) -> PipelineResult<RunReport> {
        let labels = self.config.source.labels();
        let fetched = fetch_all(&self.snapshots, &labels).await;
        if fetched.snapshots.is_empty() {
            return Err(PipelineError::NoSnapshots);
        }

        info!(
            "Reconstructing trajectories relative to {}",
            reference.to_rfc3339()
        );
        let mut points = reconstruct(&fetched.snapshots, reference);
        if points.is_empty() {
            return Err(PipelineError::NoPoints);
        }
        info!("Reconstructed {} trajectory point(s)", points.len());

        let limits = EnrichLimits {
            max_calls: self.config.weather.max_calls,
            delay: self.config.weather.delay,
        };
        let enriched = enrich(&mut points, self.forecasts.as_ref(), &limits).await;

        log_preview(&points, self.config.output.preview);
        write_points(&self.config.output.path, &points)?;

        Ok(RunReport {
            snapshots_fetched: fetched.succeeded,
            snapshots_failed: fetched.failed,
            points: points.len(),
            weather_calls: enriched.calls,
            weather_attached: enriched.attached,
            output: self.config.output.path.clone(),
        })
    }
}
