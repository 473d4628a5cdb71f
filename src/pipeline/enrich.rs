use std::time::Duration;

use log::{info, warn};

use crate::trajectory::TrajectoryPoint;
use crate::weather::{select_closest_forecast, ForecastSource};

#[derive(Debug, Clone, Copy)]
pub struct EnrichLimits {
    pub max_calls: usize,
    /// Pause between two consecutive provider calls.
    pub delay: Duration,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnrichSummary {
    pub calls: usize,
    pub attached: usize,
}

/// Attach the closest forecast to the first `max_calls` points.
///
/// Without a source nothing is requested and every point keeps `weather:
/// None`. A failed lookup leaves that point without weather and moves on.
pub async fn enrich<F: ForecastSource>(
    points: &mut [TrajectoryPoint],
    source: Option<&F>,
    limits: &EnrichLimits,
) -> EnrichSummary {
    let mut summary = EnrichSummary::default();

    let Some(source) = source else {
        warn!("No forecast API key configured, skipping weather enrichment");
        return summary;
    };

    let total = points.len();
    for (i, point) in points.iter_mut().take(limits.max_calls).enumerate() {
        if i > 0 && !limits.delay.is_zero() {
            tokio::time::sleep(limits.delay).await;
        }

        info!(
            "Fetching weather for point {}/{} (lat: {:.2}, lon: {:.2}, time: {})",
            i + 1,
            total,
            point.latitude,
            point.longitude,
            point.timestamp_utc.to_rfc3339()
        );

        point.weather = match source.fetch_forecasts(point.latitude, point.longitude).await {
            Ok(forecasts) => select_closest_forecast(point.timestamp_utc, &forecasts),
            Err(e) => {
                warn!(
                    "Weather lookup failed for ({}, {}): {}",
                    point.latitude, point.longitude, e
                );
                None
            }
        };
        summary.calls += 1;

        match &point.weather {
            Some(w) => {
                summary.attached += 1;
                info!(
                    "  -> Wind: {:?} m/s at {:?} deg (data for {})",
                    w.wind_speed_mps,
                    w.wind_direction_deg,
                    w.data_timestamp_utc.to_rfc3339()
                );
            }
            None => info!("  -> No weather data retrieved for this point"),
        }
    }

    info!("Weather enrichment attempted for {} point(s)", summary.calls);
    summary
}
