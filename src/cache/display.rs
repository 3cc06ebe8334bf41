//! User display preferences read from the key-value store

use serde::Serialize;
use tracing::warn;

use super::keys;
use crate::store::KeyValueStore;

/// How wind direction is shown next to the speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WindDirectionFormat {
    /// Eight-way arrow glyph
    Arrow,
    /// Sixteen-point abbreviation such as `NNE`
    Abbreviation,
    /// Speed only
    None,
}

impl WindDirectionFormat {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "arrow" => Some(Self::Arrow),
            "abbr" | "abbreviation" => Some(Self::Abbreviation),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Arrow => "arrow",
            Self::Abbreviation => "abbr",
            Self::None => "none",
        }
    }
}

/// Which notification layout to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationStyle {
    /// Temperature, description and icon
    Default,
    /// Adds wind, pressure and humidity
    Simple,
}

impl NotificationStyle {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "default" => Some(Self::Default),
            "simple" => Some(Self::Simple),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Simple => "simple",
        }
    }
}

/// Snapshot of every display preference
///
/// Unit preferences stay as their stored keys; the converters treat an
/// unknown key as "leave the value unchanged".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayPreferences {
    pub temperature_unit: String,
    pub pressure_unit: String,
    pub wind_speed_unit: String,
    pub wind_direction_format: WindDirectionFormat,
    /// Show temperatures as whole numbers
    pub round_temperature: bool,
    /// Precipitation unit (`mm` or inches)
    pub length_unit: String,
    pub show_temperature_in_status_bar: bool,
    pub notification_style: NotificationStyle,
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self {
            temperature_unit: "°C".to_string(),
            pressure_unit: "hPa/mBar".to_string(),
            wind_speed_unit: "m/s".to_string(),
            wind_direction_format: WindDirectionFormat::Arrow,
            round_temperature: false,
            length_unit: "mm".to_string(),
            show_temperature_in_status_bar: true,
            notification_style: NotificationStyle::Default,
        }
    }
}

impl DisplayPreferences {
    /// Reads all preferences, falling back to defaults for missing keys
    pub fn from_store(store: &dyn KeyValueStore) -> Self {
        let mut prefs = Self::default();
        for key in keys::DISPLAY {
            prefs.reload_key(store, key);
        }
        prefs
    }

    /// Re-reads the single preference stored under `key`
    ///
    /// Returns `false` if `key` is not a display preference.
    pub fn reload_key(&mut self, store: &dyn KeyValueStore, key: &str) -> bool {
        let defaults = Self::default();
        match key {
            keys::TEMPERATURE_UNIT => {
                self.temperature_unit = store
                    .get_string(key)
                    .unwrap_or(defaults.temperature_unit);
            }
            keys::PRESSURE_UNIT => {
                self.pressure_unit = store.get_string(key).unwrap_or(defaults.pressure_unit);
            }
            keys::SPEED_UNIT => {
                self.wind_speed_unit = store.get_string(key).unwrap_or(defaults.wind_speed_unit);
            }
            keys::WIND_DIRECTION_FORMAT => {
                self.wind_direction_format = store
                    .get_string(key)
                    .map(|value| {
                        WindDirectionFormat::from_key(&value).unwrap_or_else(|| {
                            warn!("Unknown wind direction format {:?}, using arrows", value);
                            defaults.wind_direction_format
                        })
                    })
                    .unwrap_or(defaults.wind_direction_format);
            }
            keys::ROUND_TEMPERATURE => {
                self.round_temperature = store
                    .get_bool(key)
                    .unwrap_or(defaults.round_temperature);
            }
            keys::LENGTH_UNIT => {
                self.length_unit = store.get_string(key).unwrap_or(defaults.length_unit);
            }
            keys::SHOW_TEMPERATURE_IN_STATUS_BAR => {
                self.show_temperature_in_status_bar = store
                    .get_bool(key)
                    .unwrap_or(defaults.show_temperature_in_status_bar);
            }
            keys::NOTIFICATION_TYPE => {
                self.notification_style = store
                    .get_string(key)
                    .map(|value| {
                        NotificationStyle::from_key(&value).unwrap_or_else(|| {
                            warn!("Unknown notification type {:?}, using default", value);
                            defaults.notification_style
                        })
                    })
                    .unwrap_or(defaults.notification_style);
            }
            _ => return false,
        }
        true
    }

    /// Writes every preference back to the store
    pub fn save(&self, store: &dyn KeyValueStore) {
        store.set_string(keys::TEMPERATURE_UNIT, &self.temperature_unit);
        store.set_string(keys::PRESSURE_UNIT, &self.pressure_unit);
        store.set_string(keys::SPEED_UNIT, &self.wind_speed_unit);
        store.set_string(keys::WIND_DIRECTION_FORMAT, self.wind_direction_format.key());
        store.set_bool(keys::ROUND_TEMPERATURE, self.round_temperature);
        store.set_string(keys::LENGTH_UNIT, &self.length_unit);
        store.set_bool(
            keys::SHOW_TEMPERATURE_IN_STATUS_BAR,
            self.show_temperature_in_status_bar,
        );
        store.set_string(keys::NOTIFICATION_TYPE, self.notification_style.key());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PreferenceStore;

    #[test]
    fn test_defaults_for_empty_store() {
        let store = PreferenceStore::in_memory();
        let prefs = DisplayPreferences::from_store(&store);
        assert_eq!(prefs, DisplayPreferences::default());
        assert_eq!(prefs.temperature_unit, "°C");
        assert_eq!(prefs.wind_direction_format, WindDirectionFormat::Arrow);
        assert!(prefs.show_temperature_in_status_bar);
    }

    #[test]
    fn test_save_then_load() {
        let store = PreferenceStore::in_memory();
        let prefs = DisplayPreferences {
            temperature_unit: "°F".to_string(),
            pressure_unit: "in Hg".to_string(),
            wind_speed_unit: "bft".to_string(),
            wind_direction_format: WindDirectionFormat::Abbreviation,
            round_temperature: true,
            length_unit: "in".to_string(),
            show_temperature_in_status_bar: false,
            notification_style: NotificationStyle::Simple,
        };
        prefs.save(&store);
        assert_eq!(DisplayPreferences::from_store(&store), prefs);
    }

    #[test]
    fn test_unknown_enum_values_fall_back() {
        let store = PreferenceStore::in_memory();
        store.set_string(keys::WIND_DIRECTION_FORMAT, "compass-rose");
        store.set_string(keys::NOTIFICATION_TYPE, "fancy");
        let prefs = DisplayPreferences::from_store(&store);
        assert_eq!(prefs.wind_direction_format, WindDirectionFormat::Arrow);
        assert_eq!(prefs.notification_style, NotificationStyle::Default);
    }

    #[test]
    fn test_reload_key_touches_one_field() {
        let store = PreferenceStore::in_memory();
        let mut prefs = DisplayPreferences::default();
        store.set_string(keys::SPEED_UNIT, "kn");
        store.set_string(keys::TEMPERATURE_UNIT, "K");

        assert!(prefs.reload_key(&store, keys::SPEED_UNIT));
        assert_eq!(prefs.wind_speed_unit, "kn");
        assert_eq!(prefs.temperature_unit, "°C");

        assert!(!prefs.reload_key(&store, keys::LAST_OBSERVATION));
    }
}
