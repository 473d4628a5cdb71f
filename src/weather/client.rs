use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::weather::types::null_as_empty;
use crate::weather::{ForecastEntry, WeatherError};

/// Where forecasts for a coordinate come from.
pub trait ForecastSource {
    async fn fetch_forecasts(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<ForecastEntry>, WeatherError>;
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    cod: serde_json::Value,
    #[serde(default)]
    message: serde_json::Value,
    #[serde(default, deserialize_with = "null_as_empty")]
    list: Vec<ForecastEntry>,
}

impl ForecastResponse {
    // the provider sends `cod` as a string on success and a number on some errors
    fn is_ok(&self) -> bool {
        match &self.cod {
            serde_json::Value::String(s) => s == "200",
            serde_json::Value::Number(n) => n.as_u64() == Some(200),
            _ => false,
        }
    }
}

/// Client for the OpenWeatherMap 5 day / 3 hour forecast endpoint.
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }
}

impl ForecastSource for OpenWeatherClient {
    async fn fetch_forecasts(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<ForecastEntry>, WeatherError> {
        debug!("Requesting forecast for ({}, {})", latitude, longitude);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: ForecastResponse = response.json().await?;
        if !body.is_ok() {
            let message = match body.message {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            return Err(WeatherError::Api(message));
        }

        Ok(body.list)
    }
}
