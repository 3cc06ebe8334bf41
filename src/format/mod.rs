//! Turning weather records into display strings
//!
//! A [`WeatherFormatter`] combines a [`WeatherRecord`] with the user's
//! [`DisplayPreferences`] and a set of [`DisplayStrings`]. Each formatter
//! decides how much data it needs; when a record falls short, rendering
//! yields a "no data" presentation instead of partial output.

mod icon;
mod strings;

pub use icon::WeatherIcon;
pub use strings::DisplayStrings;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt;
use tracing::warn;

use crate::cache::{DisplayPreferences, NotificationStyle, WindDirectionFormat};
use crate::data::{
    units, uv_risk_level, DirectionResolution, LengthUnit, PressureUnit, WeatherRecord,
    WindSpeedUnit,
};

/// Rendered output of a formatter
///
/// Fields a formatter does not produce are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderedWeather {
    pub temperature: String,
    pub wind: String,
    pub pressure: String,
    pub humidity: String,
    pub description: String,
    pub icon: Option<WeatherIcon>,
}

impl RenderedWeather {
    /// What is shown when there is not enough valid data
    pub fn no_data(strings: &DisplayStrings) -> Self {
        Self {
            description: strings.no_data.clone(),
            ..Default::default()
        }
    }

    pub fn icon_key(&self) -> Option<&'static str> {
        self.icon.map(|icon| icon.key())
    }
}

/// Converts a weather record into display strings
pub trait WeatherFormatter: Send + Sync {
    /// Whether `record` holds every value this formatter displays
    fn is_enough_valid_data(&self, record: &WeatherRecord) -> bool;

    fn temperature(&self, record: &WeatherRecord, prefs: &DisplayPreferences) -> String {
        format_temperature(record, &prefs.temperature_unit, prefs.round_temperature)
    }

    fn description(&self, record: &WeatherRecord) -> String {
        record.description.clone()
    }

    fn wind(
        &self,
        _record: &WeatherRecord,
        _prefs: &DisplayPreferences,
        _strings: &DisplayStrings,
    ) -> String {
        String::new()
    }

    fn pressure(
        &self,
        _record: &WeatherRecord,
        _prefs: &DisplayPreferences,
        _strings: &DisplayStrings,
    ) -> String {
        String::new()
    }

    fn humidity(&self, _record: &WeatherRecord, _strings: &DisplayStrings) -> String {
        String::new()
    }

    fn icon(&self, record: &WeatherRecord, now: DateTime<Utc>) -> Option<WeatherIcon> {
        let code = record.condition_code?;
        WeatherIcon::for_condition(code, record.is_day_at(now))
    }

    fn render(
        &self,
        record: &WeatherRecord,
        prefs: &DisplayPreferences,
        strings: &DisplayStrings,
        now: DateTime<Utc>,
    ) -> RenderedWeather {
        if !self.is_enough_valid_data(record) {
            return RenderedWeather::no_data(strings);
        }
        RenderedWeather {
            temperature: self.temperature(record, prefs),
            wind: self.wind(record, prefs, strings),
            pressure: self.pressure(record, prefs, strings),
            humidity: self.humidity(record, strings),
            description: self.description(record),
            icon: self.icon(record, now),
        }
    }
}

/// Title, short text and icon only
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNotificationFormatter;

impl WeatherFormatter for DefaultNotificationFormatter {
    fn is_enough_valid_data(&self, record: &WeatherRecord) -> bool {
        record.temperature_kelvin.is_some()
            && !record.description.is_empty()
            && record.condition_code.is_some()
    }
}

/// Adds wind, pressure and humidity lines
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleNotificationFormatter;

impl SimpleNotificationFormatter {
    /// Whether the headline (the temperature) can be shown
    pub fn is_enough_valid_main_data(&self, record: &WeatherRecord) -> bool {
        record.temperature_kelvin.is_some()
    }
}

impl WeatherFormatter for SimpleNotificationFormatter {
    fn is_enough_valid_data(&self, record: &WeatherRecord) -> bool {
        DefaultNotificationFormatter.is_enough_valid_data(record)
            && record.wind_speed_mps.is_some()
            && record.wind_direction_degrees.is_some()
            && record.pressure_hpa.is_some()
            && record.humidity_percent.is_some()
    }

    fn wind(
        &self,
        record: &WeatherRecord,
        prefs: &DisplayPreferences,
        strings: &DisplayStrings,
    ) -> String {
        format_wind(record, prefs, strings)
    }

    fn pressure(
        &self,
        record: &WeatherRecord,
        prefs: &DisplayPreferences,
        strings: &DisplayStrings,
    ) -> String {
        format_pressure(record, &prefs.pressure_unit, strings)
    }

    fn humidity(&self, record: &WeatherRecord, strings: &DisplayStrings) -> String {
        format_humidity(record, strings)
    }
}

/// Formatter for the configured notification style
pub fn formatter_for(style: NotificationStyle) -> Box<dyn WeatherFormatter> {
    match style {
        NotificationStyle::Default => Box::new(DefaultNotificationFormatter),
        NotificationStyle::Simple => Box::new(SimpleNotificationFormatter),
    }
}

/// Temperature followed by its unit, e.g. `15.3K` or `12°C`
///
/// Unrounded values keep at most one decimal. Empty without a temperature.
pub fn format_temperature(record: &WeatherRecord, unit: &str, rounded: bool) -> String {
    let Some(kelvin) = record.temperature_kelvin else {
        return String::new();
    };
    let value = units::temperature(kelvin, unit);
    let number = if rounded {
        format!("{}", value.round() as i64)
    } else {
        format_one_decimal(value)
    };
    format!("{}{}", number, unit)
}

/// `Wind: 4.2 m/s NNE`, or the Beaufort force name for `bft`
///
/// Empty when there is no wind speed or the unit is not recognised.
pub fn format_wind(
    record: &WeatherRecord,
    prefs: &DisplayPreferences,
    strings: &DisplayStrings,
) -> String {
    let Some(mps) = record.wind_speed_mps else {
        return String::new();
    };
    let Some(unit) = WindSpeedUnit::from_key(&prefs.wind_speed_unit) else {
        warn!("Unknown wind speed unit {:?}", prefs.wind_speed_unit);
        return String::new();
    };

    let speed = match strings.speed_unit(unit) {
        Some(label) => format!("{:.1} {}", unit.convert(mps), label),
        None => strings.beaufort_name(units::beaufort(mps)).to_string(),
    };
    let mut text = format!("{}: {}", strings.wind, speed);

    let direction = match prefs.wind_direction_format {
        WindDirectionFormat::Abbreviation => record
            .wind_direction(DirectionResolution::Sixteen)
            .map(|d| strings.direction(d)),
        WindDirectionFormat::Arrow => record
            .wind_direction(DirectionResolution::Eight)
            .map(|d| strings.arrow(d)),
        WindDirectionFormat::None => None,
    };
    if let Some(direction) = direction.filter(|d| !d.is_empty()) {
        text.push(' ');
        text.push_str(direction);
    }
    text
}

/// `Pressure: 1013.0 hPa`; empty without pressure or for an unknown unit
pub fn format_pressure(record: &WeatherRecord, unit: &str, strings: &DisplayStrings) -> String {
    let Some(hpa) = record.pressure_hpa else {
        return String::new();
    };
    let Some(unit) = PressureUnit::from_key(unit) else {
        warn!("Unknown pressure unit {:?}", unit);
        return String::new();
    };
    format!(
        "{}: {:.1} {}",
        strings.pressure,
        unit.convert(hpa),
        strings.pressure_unit(unit)
    )
}

/// `Humidity: 70 %`; empty without humidity
pub fn format_humidity(record: &WeatherRecord, strings: &DisplayStrings) -> String {
    match record.humidity_percent {
        Some(humidity) => format!("{}: {} %", strings.humidity, humidity),
        None => String::new(),
    }
}

/// Precipitation in parentheses, e.g. `(1.5 mm, 40%)` or `(<0.1 mm)`
///
/// Empty when there is no precipitation.
pub fn rain_summary(rain_mm: f64, chance_of_precipitation: f64, length_unit: &str) -> String {
    if rain_mm <= 0.0 {
        return String::new();
    }
    let unit = LengthUnit::from_key(length_unit);
    let amount = unit.convert(rain_mm);
    let mut text = match unit {
        LengthUnit::Millimeters if amount < 0.1 => format!("(<0.1 {}", unit.key()),
        LengthUnit::Millimeters => format!("({:.1} {}", amount, unit.key()),
        LengthUnit::Inches if amount < 0.01 => format!("(<0.01 {}", unit.key()),
        LengthUnit::Inches => format!("({:.2} {}", amount, unit.key()),
    };
    if chance_of_precipitation > 0.0 {
        text.push_str(&format!(", {}%", (chance_of_precipitation * 100.0) as i64));
    }
    text.push(')');
    text
}

/// UV index with its risk level, e.g. `7.3 (High)`
pub fn uv_summary(uv_index: Option<f64>, strings: &DisplayStrings) -> String {
    match uv_index {
        Some(value) => format!("{:.1} ({})", value, strings.uv_level(uv_risk_level(value))),
        None => strings.uv_level(crate::data::UvRiskLevel::NoInfo).to_string(),
    }
}

/// Whole-degree temperature for a status bar icon, e.g. `12°`
pub fn status_bar_temperature(record: &WeatherRecord, prefs: &DisplayPreferences) -> Option<String> {
    if !prefs.show_temperature_in_status_bar {
        return None;
    }
    let kelvin = record.temperature_kelvin?;
    let value = units::temperature(kelvin, &prefs.temperature_unit);
    Some(format!("{}°", value.round() as i64))
}

/// `HH:MM` when `at` falls on the same local day as `now`, else `Ddd HH:MM`
pub fn last_update_label<Tz>(at: DateTime<Utc>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let local = at.with_timezone(&now.timezone());
    if local.date_naive() == now.date_naive() {
        local.format("%H:%M").to_string()
    } else {
        local.format("%a %H:%M").to_string()
    }
}

/// At most one decimal, trailing zero dropped (`15.3`, `12`)
fn format_one_decimal(value: f64) -> String {
    let text = format!("{:.1}", value);
    match text.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn full_record() -> WeatherRecord {
        WeatherRecord {
            temperature_kelvin: Some(290.5),
            pressure_hpa: Some(1013.0),
            humidity_percent: Some(70),
            wind_speed_mps: Some(4.2),
            wind_direction_degrees: Some(22.5),
            condition_code: Some(800),
            description: "Clear sky".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_temperature_formatting() {
        let record = full_record();
        assert_eq!(format_temperature(&record, "°C", false), "17.4°C");
        assert_eq!(format_temperature(&record, "°C", true), "17°C");
        assert_eq!(format_temperature(&record, "K", false), "290.5K");

        let whole = WeatherRecord {
            temperature_kelvin: Some(285.15),
            ..Default::default()
        };
        assert_eq!(format_temperature(&whole, "°C", false), "12°C");
        assert_eq!(format_temperature(&WeatherRecord::default(), "°C", false), "");
    }

    #[test]
    fn test_wind_with_abbreviation_and_arrow() {
        let record = full_record();
        let strings = DisplayStrings::default();
        let mut prefs = DisplayPreferences {
            wind_direction_format: WindDirectionFormat::Abbreviation,
            ..Default::default()
        };
        assert_eq!(format_wind(&record, &prefs, &strings), "Wind: 4.2 m/s NNE");

        prefs.wind_direction_format = WindDirectionFormat::Arrow;
        assert_eq!(format_wind(&record, &prefs, &strings), "Wind: 4.2 m/s ↙");

        prefs.wind_direction_format = WindDirectionFormat::None;
        assert_eq!(format_wind(&record, &prefs, &strings), "Wind: 4.2 m/s");
    }

    #[test]
    fn test_wind_in_beaufort_uses_force_name() {
        let prefs = DisplayPreferences {
            wind_speed_unit: "bft".to_string(),
            wind_direction_format: WindDirectionFormat::None,
            ..Default::default()
        };
        let record = WeatherRecord {
            wind_speed_mps: Some(5.5),
            ..Default::default()
        };
        assert_eq!(
            format_wind(&record, &prefs, &DisplayStrings::default()),
            "Wind: Moderate breeze"
        );
    }

    #[test]
    fn test_wind_without_data_or_with_unknown_unit_is_empty() {
        let strings = DisplayStrings::default();
        let prefs = DisplayPreferences::default();
        assert_eq!(format_wind(&WeatherRecord::default(), &prefs, &strings), "");

        let odd = DisplayPreferences {
            wind_speed_unit: "furlongs/fortnight".to_string(),
            ..Default::default()
        };
        assert_eq!(format_wind(&full_record(), &odd, &strings), "");
    }

    #[test]
    fn test_wind_without_direction_shows_speed_only() {
        let record = WeatherRecord {
            wind_speed_mps: Some(10.0),
            ..Default::default()
        };
        let prefs = DisplayPreferences {
            wind_speed_unit: "kph".to_string(),
            ..Default::default()
        };
        assert_eq!(
            format_wind(&record, &prefs, &DisplayStrings::default()),
            "Wind: 36.0 kph"
        );
    }

    #[test]
    fn test_pressure_and_humidity() {
        let record = full_record();
        let strings = DisplayStrings::default();
        assert_eq!(format_pressure(&record, "hPa/mBar", &strings), "Pressure: 1013.0 hPa");
        assert_eq!(format_pressure(&record, "kPa", &strings), "Pressure: 101.3 kPa");
        assert_eq!(format_pressure(&record, "bar", &strings), "");
        assert_eq!(format_humidity(&record, &strings), "Humidity: 70 %");
        assert_eq!(format_humidity(&WeatherRecord::default(), &strings), "");
    }

    #[test]
    fn test_default_formatter_renders_headline_only() {
        let rendered = DefaultNotificationFormatter.render(
            &full_record(),
            &DisplayPreferences::default(),
            &DisplayStrings::default(),
            Utc::now(),
        );
        assert_eq!(rendered.temperature, "17.4°C");
        assert_eq!(rendered.description, "Clear sky");
        assert!(rendered.wind.is_empty());
        assert!(rendered.pressure.is_empty());
        // No sunrise/sunset means day
        assert_eq!(rendered.icon_key(), Some("weather_day_sunny"));
    }

    #[test]
    fn test_simple_formatter_needs_wind_and_pressure() {
        let formatter = SimpleNotificationFormatter;
        let record = full_record();
        assert!(formatter.is_enough_valid_data(&record));

        let no_direction = WeatherRecord {
            wind_direction_degrees: None,
            ..record.clone()
        };
        assert!(!formatter.is_enough_valid_data(&no_direction));
        assert!(formatter.is_enough_valid_main_data(&no_direction));
        assert!(DefaultNotificationFormatter.is_enough_valid_data(&no_direction));

        let rendered = formatter.render(
            &no_direction,
            &DisplayPreferences::default(),
            &DisplayStrings::default(),
            Utc::now(),
        );
        assert_eq!(rendered, RenderedWeather::no_data(&DisplayStrings::default()));
    }

    #[test]
    fn test_simple_formatter_renders_every_line() {
        let rendered = SimpleNotificationFormatter.render(
            &full_record(),
            &DisplayPreferences::default(),
            &DisplayStrings::default(),
            Utc::now(),
        );
        assert_eq!(rendered.wind, "Wind: 4.2 m/s ↙");
        assert_eq!(rendered.pressure, "Pressure: 1013.0 hPa");
        assert_eq!(rendered.humidity, "Humidity: 70 %");
    }

    #[test]
    fn test_empty_record_renders_no_data() {
        let strings = DisplayStrings::default();
        let rendered = formatter_for(NotificationStyle::Default).render(
            &WeatherRecord::default(),
            &DisplayPreferences::default(),
            &strings,
            Utc::now(),
        );
        assert_eq!(rendered.description, "No data");
        assert!(rendered.temperature.is_empty());
        assert!(rendered.icon.is_none());
    }

    #[test]
    fn test_night_icon_outside_daylight() {
        let record = WeatherRecord {
            sunrise: Some(Utc::now() + chrono::Duration::hours(2)),
            sunset: Some(Utc::now() + chrono::Duration::hours(14)),
            ..full_record()
        };
        assert_eq!(
            DefaultNotificationFormatter.icon(&record, Utc::now()),
            Some(WeatherIcon::NightClear)
        );
    }

    #[test]
    fn test_rain_summary() {
        assert_eq!(rain_summary(0.0, 0.5, "mm"), "");
        assert_eq!(rain_summary(0.05, 0.0, "mm"), "(<0.1 mm)");
        assert_eq!(rain_summary(1.5, 0.4, "mm"), "(1.5 mm, 40%)");
        assert_eq!(rain_summary(1.5, 0.0, "in"), "(0.06 in)");
        assert_eq!(rain_summary(0.1, 0.0, "in"), "(<0.01 in)");
    }

    #[test]
    fn test_uv_summary() {
        let strings = DisplayStrings::default();
        assert_eq!(uv_summary(Some(7.3), &strings), "7.3 (High)");
        assert_eq!(uv_summary(Some(1.0), &strings), "1.0 (Low)");
        assert_eq!(uv_summary(None, &strings), "No info");
    }

    #[test]
    fn test_status_bar_temperature() {
        let record = full_record();
        let prefs = DisplayPreferences::default();
        assert_eq!(status_bar_temperature(&record, &prefs).as_deref(), Some("17°"));

        let hidden = DisplayPreferences {
            show_temperature_in_status_bar: false,
            ..Default::default()
        };
        assert!(status_bar_temperature(&record, &hidden).is_none());
        assert!(status_bar_temperature(&WeatherRecord::default(), &prefs).is_none());
    }

    #[test]
    fn test_last_update_label_includes_day_when_not_today() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let now = tz.with_ymd_and_hms(2024, 7, 15, 18, 0, 0).unwrap();

        let earlier_today = tz
            .with_ymd_and_hms(2024, 7, 15, 9, 5, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(last_update_label(earlier_today, &now), "09:05");

        let yesterday = tz
            .with_ymd_and_hms(2024, 7, 14, 23, 45, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(last_update_label(yesterday, &now), "Sun 23:45");
    }

    #[test]
    fn test_one_decimal_formatting() {
        assert_eq!(format_one_decimal(15.34), "15.3");
        assert_eq!(format_one_decimal(12.0), "12");
        assert_eq!(format_one_decimal(-3.96), "-4");
    }
}
