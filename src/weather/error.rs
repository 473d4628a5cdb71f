use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider error: {0}")]
    Api(String),
}
