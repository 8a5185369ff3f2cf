//! This module provides a client to connect to the weather forecast service

use async_trait::async_trait;
use once_cell::sync::Lazy;
use url::Url;

use super::ForecastResponse;
use crate::errors::{Error, Result};

/// The environment variable holding the service API key
pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";

static DEFAULT_ENDPOINT: Lazy<Url> = Lazy::new(|| {
    Url::parse("https://api.openweathermap.org/data/2.5/").expect("cannot parse the default endpoint URL")
});

/// Anything that can answer a forecast request for a city.
///
/// The one real implementation is [`WeatherClient`]; tests substitute their
/// own sources.
#[async_trait]
pub trait ForecastSource {
    async fn fetch_forecast(&self, city: &str) -> Result<ForecastResponse>;
}

/// A [`ForecastSource`] that queries the OpenWeatherMap `/forecast` endpoint
pub struct WeatherClient {
    endpoint: Url,
    api_key: String,
    http: reqwest::Client,
}

impl WeatherClient {
    /// Create a client. This does not issue any request.
    pub fn new<S: ToString>(api_key: S) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.clone(),
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Create a client with the API key from the [`API_KEY_VAR`] environment
    /// variable
    pub fn from_env() -> Result<Self> {
        match std::env::var(API_KEY_VAR) {
            Ok(api_key) => Ok(Self::new(api_key)),
            Err(_) => Err(Error::WeatherUnavailable(format!("{} is not set", API_KEY_VAR))),
        }
    }

    /// Override the service endpoint (e.g. to point at a test server)
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }
}

#[async_trait]
impl ForecastSource for WeatherClient {
    /// `GET {endpoint}/forecast?q={city}&units=metric&APPID={key}`
    ///
    /// Every failure mode (network, non-success status, unparseable body)
    /// collapses into [`Error::WeatherUnavailable`]: the caller shows no
    /// forecast, nothing more.
    async fn fetch_forecast(&self, city: &str) -> Result<ForecastResponse> {
        let url = self
            .endpoint
            .join("forecast")
            .map_err(|err| Error::WeatherUnavailable(err.to_string()))?;

        let response = self
            .http
            .get(url)
            .query(&[("q", city), ("units", "metric"), ("APPID", self.api_key.as_str())])
            .send()
            .await
            .map_err(|err| Error::WeatherUnavailable(err.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::WeatherUnavailable(format!(
                "the server answered with status {}",
                response.status()
            )));
        }

        response
            .json::<ForecastResponse>()
            .await
            .map_err(|err| Error::WeatherUnavailable(err.to_string()))
    }
}
