use chrono::{DateTime, TimeDelta, Utc};

use crate::weather::{ForecastEntry, WeatherSummary};

/// Pick the forecast closest in time to `target`.
///
/// Entries without a usable instant are ignored; on a tie the first entry
/// seen wins.
pub fn select_closest_forecast(
    target: DateTime<Utc>,
    forecasts: &[ForecastEntry],
) -> Option<WeatherSummary> {
    let mut closest: Option<(&ForecastEntry, DateTime<Utc>, TimeDelta)> = None;

    for entry in forecasts {
        let Some(instant) = entry.instant() else {
            continue;
        };
        let diff = (target - instant).abs();
        let nearer = match closest {
            Some((_, _, best)) => diff < best,
            None => true,
        };
        if nearer {
            closest = Some((entry, instant, diff));
        }
    }

    closest.map(|(entry, instant, diff)| summarize(entry, instant, diff))
}

fn summarize(entry: &ForecastEntry, instant: DateTime<Utc>, diff: TimeDelta) -> WeatherSummary {
    let wind = entry.wind.clone().unwrap_or_default();
    let main = entry.main.clone().unwrap_or_default();

    WeatherSummary {
        wind_speed_mps: wind.speed,
        wind_direction_deg: wind.deg,
        wind_gust_mps: wind.gust,
        weather_description: entry.weather.first().and_then(|c| c.description.clone()),
        temperature_celsius: main.temp,
        pressure_hpa: main.pressure,
        data_timestamp_utc: instant,
        time_diff_to_actual_seconds: (diff.num_milliseconds() as f64 / 1000.0).round() as i64,
    }
}
