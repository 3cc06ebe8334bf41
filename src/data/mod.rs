//! Core weather data models
//!
//! This module contains the parsed weather snapshot type shared by the cache,
//! the formatters and the API client, plus the pure data logic around it:
//! unit conversion, wind direction quantization, response parsing and
//! forecast bucketing.

pub mod forecast;
pub mod parser;
pub mod units;
pub mod wind;

pub use forecast::{partition, ForecastPartition};
pub use parser::{
    parse_city_lookup, parse_city_search, parse_forecast, parse_observation, parse_uv_index,
    CitySearchResult, ParseError,
};
pub use units::{
    beaufort, uv_risk_level, LengthUnit, PressureUnit, TemperatureUnit, UvRiskLevel,
    WindSpeedUnit,
};
pub use wind::{DirectionResolution, WindDirection};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point-in-time observation or forecast slot
///
/// Built only by the parser and never mutated afterwards; a newer fetch
/// produces a new record. Fields the API did not supply are `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Time the observation or forecast slot refers to
    pub observed_at: Option<DateTime<Utc>>,
    /// Temperature in Kelvin
    pub temperature_kelvin: Option<f64>,
    /// Pressure in hPa
    pub pressure_hpa: Option<f64>,
    /// Relative humidity (0-100)
    pub humidity_percent: Option<u8>,
    /// Wind speed in m/s
    pub wind_speed_mps: Option<f64>,
    /// Compass bearing the wind blows from
    pub wind_direction_degrees: Option<f64>,
    /// Precipitation (rain, else snow) in mm
    pub rain_mm: f64,
    /// Probability of precipitation (0-1)
    pub chance_of_precipitation: f64,
    /// OpenWeatherMap condition id (e.g. 800 for clear sky)
    pub condition_code: Option<u32>,
    /// Condition description with an uppercase first letter
    pub description: String,
    pub city_id: Option<i64>,
    pub city_name: String,
    pub country_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub uv_index: Option<f64>,
    /// When the payload this record came from was fetched
    pub last_updated: Option<DateTime<Utc>>,
}

impl WeatherRecord {
    /// Wind direction at the given resolution, if the API reported a bearing
    pub fn wind_direction(&self, resolution: DirectionResolution) -> Option<WindDirection> {
        self.wind_direction_degrees
            .map(|degrees| WindDirection::from_degrees(degrees, resolution))
    }

    /// Whether `now` falls between sunrise and sunset
    ///
    /// Without both sunrise and sunset this is always day.
    pub fn is_day_at(&self, now: DateTime<Utc>) -> bool {
        match (self.sunrise, self.sunset) {
            (Some(sunrise), Some(sunset)) => now > sunrise && now < sunset,
            _ => true,
        }
    }

    /// Copy of this record carrying a UV index from a separate response
    pub fn with_uv_index(mut self, uv_index: Option<f64>) -> Self {
        self.uv_index = uv_index;
        self
    }
}

/// A city returned by search or reverse geocoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCandidate {
    pub id: i64,
    pub name: String,
    pub country_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
