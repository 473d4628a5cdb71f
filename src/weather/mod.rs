mod align;
pub mod client;
mod error;
pub mod types;

pub use align::select_closest_forecast;
pub use client::{ForecastSource, OpenWeatherClient};
pub use error::WeatherError;
pub use types::{ForecastEntry, WeatherSummary};
