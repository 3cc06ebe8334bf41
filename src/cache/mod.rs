//! Cached weather state on top of the key-value store
//!
//! `WeatherCache` stores the raw API payloads exactly as fetched and parses
//! them lazily on read, so a payload that no longer parses only yields `None`
//! and never damages what is stored. It also tracks the active city, the
//! last successful update and the coordinates of the last observation, and
//! decides whether a refresh is due.
//!
//! The `repository` submodule layers change notification on top.

mod display;
pub mod repository;

pub use display::{DisplayPreferences, NotificationStyle, WindDirectionFormat};
pub use repository::{Subscription, WeatherPresentation, WeatherRepository};

use chrono::{DateTime, TimeZone, Utc};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

use crate::data::{self, WeatherRecord};
use crate::store::KeyValueStore;

/// Store keys, shared with earlier releases of the preference file
pub mod keys {
    pub const LAST_OBSERVATION: &str = "lastToday";
    pub const LAST_FORECAST: &str = "lastLongterm";
    pub const LAST_UV_INDEX: &str = "lastUVIToday";
    pub const CITY_ID: &str = "cityId";
    pub const PREVIOUS_CITY_ID: &str = "previousCityId";
    pub const LAST_UPDATE: &str = "lastUpdate";
    pub const CITY_CHANGED: &str = "cityChanged";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";

    pub const TEMPERATURE_UNIT: &str = "unit";
    pub const PRESSURE_UNIT: &str = "pressureUnit";
    pub const SPEED_UNIT: &str = "speedUnit";
    pub const WIND_DIRECTION_FORMAT: &str = "windDirectionFormat";
    pub const ROUND_TEMPERATURE: &str = "temperatureInteger";
    pub const LENGTH_UNIT: &str = "lengthUnit";
    pub const SHOW_TEMPERATURE_IN_STATUS_BAR: &str = "showTemperatureInStatusBar";
    pub const NOTIFICATION_TYPE: &str = "notificationType";

    /// Every display preference key
    pub const DISPLAY: [&str; 8] = [
        TEMPERATURE_UNIT,
        PRESSURE_UNIT,
        SPEED_UNIT,
        WIND_DIRECTION_FORMAT,
        ROUND_TEMPERATURE,
        LENGTH_UNIT,
        SHOW_TEMPERATURE_IN_STATUS_BAR,
        NOTIFICATION_TYPE,
    ];
}

/// Minimum age of the last update before a refresh is due
pub const REFRESH_THRESHOLD: Duration = Duration::from_secs(5 * 60);

/// Whether cached data should be refetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

/// Typed access to cached weather data
pub struct WeatherCache {
    store: Arc<dyn KeyValueStore>,
    /// Serializes updates of the active and previous city ids
    city_lock: Mutex<()>,
}

impl WeatherCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            city_lock: Mutex::new(()),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Stores a current-weather payload as fetched
    pub fn set_last_observation(&self, raw_json: &str) {
        self.store.set_string(keys::LAST_OBSERVATION, raw_json);
    }

    /// Last stored observation, or `None` if absent or unreadable
    pub fn last_observation(&self) -> Option<WeatherRecord> {
        let raw = self.store.get_string(keys::LAST_OBSERVATION)?;
        match data::parse_observation(&raw, self.last_update_time()) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Cached observation is unreadable: {}", e);
                None
            }
        }
    }

    pub fn set_last_forecast(&self, raw_json: &str) {
        self.store.set_string(keys::LAST_FORECAST, raw_json);
    }

    pub fn last_forecast(&self) -> Option<Vec<WeatherRecord>> {
        let raw = self.store.get_string(keys::LAST_FORECAST)?;
        match data::parse_forecast(&raw, self.last_update_time()) {
            Ok(records) => Some(records),
            Err(e) => {
                warn!("Cached forecast is unreadable: {}", e);
                None
            }
        }
    }

    pub fn set_last_uv_index(&self, raw_json: &str) {
        self.store.set_string(keys::LAST_UV_INDEX, raw_json);
    }

    pub fn last_uv_index(&self) -> Option<f64> {
        let raw = self.store.get_string(keys::LAST_UV_INDEX)?;
        match data::parse_uv_index(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Cached UV index is unreadable: {}", e);
                None
            }
        }
    }

    /// Raw payload stored under `key`, unparsed
    pub fn raw(&self, key: &str) -> Option<String> {
        self.store.get_string(key)
    }

    pub fn active_city_id(&self) -> Option<i64> {
        self.store.get_i64(keys::CITY_ID)
    }

    /// Makes `id` the active city and remembers the one it replaces
    ///
    /// The replaced id is kept in the store, so a later run can still
    /// restore it. Re-selecting the active city keeps the remembered one.
    pub fn set_active_city_id(&self, id: i64) {
        let _guard = self.city_lock.lock().unwrap_or_else(PoisonError::into_inner);
        match self.active_city_id() {
            Some(current) if current == id => return,
            Some(current) => self
                .store
                .set_string(keys::PREVIOUS_CITY_ID, &current.to_string()),
            None => self.store.remove(keys::PREVIOUS_CITY_ID),
        }
        self.store.set_string(keys::CITY_ID, &id.to_string());
    }

    /// Makes `id` the active city and marks the cached weather as stale
    pub fn select_city(&self, id: i64) {
        self.set_active_city_id(id);
        self.set_city_changed(true);
    }

    /// Reinstates the city that was active before the last change
    ///
    /// Returns the restored id, or `None` if there was nothing to restore.
    pub fn restore_previous_city_id(&self) -> Option<i64> {
        let _guard = self.city_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = self.store.get_i64(keys::PREVIOUS_CITY_ID)?;
        self.store.remove(keys::PREVIOUS_CITY_ID);
        debug!("Restoring previous city {}", previous);
        self.store.set_string(keys::CITY_ID, &previous.to_string());
        Some(previous)
    }

    /// Time of the last successful refresh
    pub fn last_update_time(&self) -> Option<DateTime<Utc>> {
        self.store
            .get_i64(keys::LAST_UPDATE)
            .filter(|millis| *millis >= 0)
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
    }

    pub fn set_last_update_time(&self, at: DateTime<Utc>) {
        self.store.set_i64(keys::LAST_UPDATE, at.timestamp_millis());
    }

    /// Whether the city changed since the last full refresh
    pub fn city_changed(&self) -> bool {
        self.store.get_bool(keys::CITY_CHANGED).unwrap_or(false)
    }

    pub fn set_city_changed(&self, changed: bool) {
        self.store.set_bool(keys::CITY_CHANGED, changed);
    }

    pub fn latitude(&self) -> Option<f64> {
        self.store.get_f64(keys::LATITUDE)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.store.get_f64(keys::LONGITUDE)
    }

    /// Both coordinates, if both have been stored
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude()?, self.longitude()?))
    }

    pub fn set_coordinates(&self, latitude: f64, longitude: f64) {
        self.store.set_f64(keys::LATITUDE, latitude);
        self.store.set_f64(keys::LONGITUDE, longitude);
    }

    /// Decides whether the cached data needs a refresh at `now`
    pub fn freshness(&self, now: DateTime<Utc>) -> Freshness {
        if self.city_changed() {
            return Freshness::Stale;
        }
        let Some(last_update) = self.last_update_time() else {
            return Freshness::Stale;
        };
        let age_millis = now.timestamp_millis() - last_update.timestamp_millis();
        if age_millis > REFRESH_THRESHOLD.as_millis() as i64 {
            Freshness::Stale
        } else {
            Freshness::Fresh
        }
    }

    pub fn display_preferences(&self) -> DisplayPreferences {
        DisplayPreferences::from_store(self.store.as_ref())
    }
}
