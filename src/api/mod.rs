//! OpenWeatherMap API access
//!
//! URL construction and error mapping live here; the HTTP transport sits
//! behind the [`HttpFetch`] trait so the refresh logic in [`WeatherService`]
//! can run against canned responses.

mod client;
mod service;

pub use client::{FetchError, HttpFetch, HttpResponse, ReqwestFetcher};
pub use service::{CitySearch, RefreshOutcome, WeatherService};

use reqwest::Url;
use thiserror::Error;

use crate::data::ParseError;

/// Base URL of the OpenWeatherMap 2.5 API
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Response body could not be parsed
    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] ParseError),

    /// The API knows no such city (404 or an empty result set)
    #[error("City not found")]
    CityNotFound,

    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    Network(#[from] FetchError),

    /// HTTP 401
    #[error("Invalid API key")]
    InvalidApiKey,

    /// HTTP 429
    #[error("Too many requests, try again later")]
    TooManyRequests,

    /// Any other non-200 status
    #[error("HTTP error: status {0}")]
    Http(u16),

    /// Coordinates are needed but none are known
    #[error("Location unavailable")]
    LocationUnavailable,

    /// No city has been selected yet
    #[error("No city selected")]
    NoCitySelected,

    #[error("No API key configured")]
    MissingApiKey,

    /// Running without network access
    #[error("Offline mode, no requests are made")]
    Offline,

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// API endpoints the client uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Current weather
    Weather,
    /// 5-day / 3-hour forecast
    Forecast,
    /// Current UV index
    UvIndex,
    /// City search by name
    Find,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Forecast => "forecast",
            Self::UvIndex => "uvi",
            Self::Find => "find",
        }
    }
}

/// What a request is about
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    CityId(i64),
    Coordinates { latitude: f64, longitude: f64 },
    /// Free-text city name, e.g. `London,GB`
    Name(String),
}

/// Connection settings for the API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    /// Language code for condition descriptions
    pub language: String,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: "en".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Full request URL for `endpoint` and `location`
    pub fn url(&self, endpoint: Endpoint, location: &Location) -> Result<Url, WeatherError> {
        if self.api_key.trim().is_empty() {
            return Err(WeatherError::MissingApiKey);
        }

        let mut params: Vec<(&str, String)> = match location {
            Location::CityId(id) => vec![("id", id.to_string())],
            Location::Coordinates {
                latitude,
                longitude,
            } => vec![("lat", latitude.to_string()), ("lon", longitude.to_string())],
            Location::Name(name) => vec![("q", name.clone())],
        };
        params.push(("lang", self.language.clone()));
        params.push(("mode", "json".to_string()));
        params.push(("appid", self.api_key.clone()));

        let base = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint.path());
        Url::parse_with_params(&base, &params)
            .map_err(|e| WeatherError::InvalidBaseUrl(format!("{}: {}", self.base_url, e)))
    }
}

/// Source of the device's last known position
pub trait LocationProvider: Send + Sync {
    /// Latitude and longitude, if known
    fn last_known_location(&self) -> Option<(f64, f64)>;
}

/// A location provider that always reports the same position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationProvider for FixedLocation {
    fn last_known_location(&self) -> Option<(f64, f64)> {
        Some((self.latitude, self.longitude))
    }
}
