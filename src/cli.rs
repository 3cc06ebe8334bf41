//! Command-line interface parsing for owmcast
//!
//! Global flags select where preferences live and how output is printed;
//! each subcommand maps onto one operation of the weather service or the
//! display preferences.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

use crate::cache::{DisplayPreferences, NotificationStyle, WindDirectionFormat};
use crate::data::{LengthUnit, PressureUnit, TemperatureUnit, WindSpeedUnit};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid temperature unit: '{0}'. Valid units: C, F, K")]
    InvalidTemperatureUnit(String),

    #[error("Invalid pressure unit: '{0}'. Valid units: hPa, kPa, mmHg, inHg")]
    InvalidPressureUnit(String),

    #[error("Invalid wind speed unit: '{0}'. Valid units: m/s, kph, mph, kn, bft")]
    InvalidSpeedUnit(String),

    #[error("Invalid wind direction format: '{0}'. Valid formats: arrow, abbr, none")]
    InvalidDirectionFormat(String),

    #[error("Invalid length unit: '{0}'. Valid units: mm, in")]
    InvalidLengthUnit(String),

    #[error("Invalid notification type: '{0}'. Valid types: default, simple")]
    InvalidNotificationStyle(String),
}

/// owmcast - current weather and forecasts from OpenWeatherMap
#[derive(Parser, Debug)]
#[command(name = "owmcast")]
#[command(about = "Current weather and 5-day forecasts from OpenWeatherMap")]
#[command(version)]
pub struct Cli {
    /// OpenWeatherMap API key
    #[arg(long, env = "OWM_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Directory holding preferences.json (defaults to the platform data dir)
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Never contact the API; show cached data only
    #[arg(long, global = true)]
    pub offline: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Language code for condition descriptions
    #[arg(long, value_name = "CODE", default_value = "en", global = true)]
    pub lang: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show current weather for the selected city
    Current,

    /// Show the 5-day forecast grouped into today, tomorrow and later
    Forecast,

    /// Search a city by name, e.g. "London,GB"
    Search {
        /// City name, optionally followed by a country code
        name: String,
    },

    /// Select the city closest to the given coordinates
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Select a city by its OpenWeatherMap id
    SetCity {
        id: i64,
    },

    /// Show or change display preferences
    Prefs(PrefsArgs),

    /// Keep the weather fresh and print every change
    Watch {
        /// Seconds between freshness checks
        #[arg(long, default_value_t = 300)]
        interval: u64,
    },
}

/// Display preference changes; omitted flags keep their stored value
#[derive(Args, Debug, Default, Clone)]
pub struct PrefsArgs {
    /// Temperature unit: C, F or K
    #[arg(long, value_parser = parse_temperature_unit)]
    pub unit: Option<TemperatureUnit>,

    /// Pressure unit: hPa, kPa, mmHg or inHg
    #[arg(long, value_parser = parse_pressure_unit)]
    pub pressure_unit: Option<PressureUnit>,

    /// Wind speed unit: m/s, kph, mph, kn or bft
    #[arg(long, value_parser = parse_speed_unit)]
    pub speed_unit: Option<WindSpeedUnit>,

    /// Wind direction format: arrow, abbr or none
    #[arg(long, value_parser = parse_direction_format)]
    pub wind_direction: Option<WindDirectionFormat>,

    /// Show temperatures as whole numbers
    #[arg(long)]
    pub round: Option<bool>,

    /// Precipitation unit: mm or in
    #[arg(long, value_parser = parse_length_unit)]
    pub length_unit: Option<LengthUnit>,

    /// Show the temperature in the status bar
    #[arg(long)]
    pub status_bar: Option<bool>,

    /// Notification layout: default or simple
    #[arg(long, value_parser = parse_notification_style)]
    pub notification_type: Option<NotificationStyle>,
}

impl PrefsArgs {
    /// Applies the given flags to `prefs`
    ///
    /// Returns whether anything was requested.
    pub fn apply(&self, prefs: &mut DisplayPreferences) -> bool {
        let mut changed = false;
        if let Some(unit) = self.unit {
            prefs.temperature_unit = unit.key().to_string();
            changed = true;
        }
        if let Some(unit) = self.pressure_unit {
            prefs.pressure_unit = unit.key().to_string();
            changed = true;
        }
        if let Some(unit) = self.speed_unit {
            prefs.wind_speed_unit = unit.key().to_string();
            changed = true;
        }
        if let Some(format) = self.wind_direction {
            prefs.wind_direction_format = format;
            changed = true;
        }
        if let Some(round) = self.round {
            prefs.round_temperature = round;
            changed = true;
        }
        if let Some(unit) = self.length_unit {
            prefs.length_unit = unit.key().to_string();
            changed = true;
        }
        if let Some(show) = self.status_bar {
            prefs.show_temperature_in_status_bar = show;
            changed = true;
        }
        if let Some(style) = self.notification_type {
            prefs.notification_style = style;
            changed = true;
        }
        changed
    }
}

pub fn parse_temperature_unit(s: &str) -> Result<TemperatureUnit, CliError> {
    TemperatureUnit::from_alias(s).ok_or_else(|| CliError::InvalidTemperatureUnit(s.to_string()))
}

pub fn parse_pressure_unit(s: &str) -> Result<PressureUnit, CliError> {
    PressureUnit::from_alias(s).ok_or_else(|| CliError::InvalidPressureUnit(s.to_string()))
}

pub fn parse_speed_unit(s: &str) -> Result<WindSpeedUnit, CliError> {
    WindSpeedUnit::from_alias(s).ok_or_else(|| CliError::InvalidSpeedUnit(s.to_string()))
}

pub fn parse_direction_format(s: &str) -> Result<WindDirectionFormat, CliError> {
    WindDirectionFormat::from_key(s).ok_or_else(|| CliError::InvalidDirectionFormat(s.to_string()))
}

/// Strict counterpart of [`LengthUnit::from_key`], which maps anything
/// other than `mm` to inches
pub fn parse_length_unit(s: &str) -> Result<LengthUnit, CliError> {
    match s.trim() {
        "mm" => Ok(LengthUnit::Millimeters),
        "in" | "inch" | "inches" => Ok(LengthUnit::Inches),
        _ => Err(CliError::InvalidLengthUnit(s.to_string())),
    }
}

pub fn parse_notification_style(s: &str) -> Result<NotificationStyle, CliError> {
    NotificationStyle::from_key(s).ok_or_else(|| CliError::InvalidNotificationStyle(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_temperature_unit_aliases() {
        assert_eq!(parse_temperature_unit("C").unwrap(), TemperatureUnit::Celsius);
        assert_eq!(parse_temperature_unit("°F").unwrap(), TemperatureUnit::Fahrenheit);
        assert_eq!(parse_temperature_unit("kelvin").unwrap(), TemperatureUnit::Kelvin);
    }

    #[test]
    fn test_parse_temperature_unit_invalid() {
        let result = parse_temperature_unit("rankine");
        assert!(matches!(result, Err(CliError::InvalidTemperatureUnit(_))));
    }

    #[test]
    fn test_parse_pressure_and_speed_units() {
        assert_eq!(
            parse_pressure_unit("mmHg").unwrap(),
            PressureUnit::MillimetersOfMercury
        );
        assert_eq!(parse_speed_unit("bft").unwrap(), WindSpeedUnit::Beaufort);
        assert!(parse_speed_unit("furlongs").is_err());
    }

    #[test]
    fn test_parse_length_unit_is_strict() {
        assert_eq!(parse_length_unit("mm").unwrap(), LengthUnit::Millimeters);
        assert_eq!(parse_length_unit("in").unwrap(), LengthUnit::Inches);
        assert!(matches!(
            parse_length_unit("cm"),
            Err(CliError::InvalidLengthUnit(_))
        ));
    }

    #[test]
    fn test_cli_error_display() {
        let err = CliError::InvalidDirectionFormat("sideways".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("sideways"));
        assert!(msg.contains("arrow"));
    }

    #[test]
    fn test_apply_without_flags_changes_nothing() {
        let mut prefs = DisplayPreferences::default();
        assert!(!PrefsArgs::default().apply(&mut prefs));
        assert_eq!(prefs, DisplayPreferences::default());
    }

    #[test]
    fn test_apply_stores_canonical_keys() {
        let args = PrefsArgs {
            unit: Some(TemperatureUnit::Fahrenheit),
            pressure_unit: Some(PressureUnit::InchesOfMercury),
            speed_unit: Some(WindSpeedUnit::Knots),
            length_unit: Some(LengthUnit::Inches),
            round: Some(true),
            ..Default::default()
        };
        let mut prefs = DisplayPreferences::default();
        assert!(args.apply(&mut prefs));

        assert_eq!(prefs.temperature_unit, "°F");
        assert_eq!(prefs.pressure_unit, "in Hg");
        assert_eq!(prefs.wind_speed_unit, "kn");
        assert_eq!(prefs.length_unit, "in");
        assert!(prefs.round_temperature);
        assert_eq!(prefs.wind_direction_format, WindDirectionFormat::Arrow);
    }
}
