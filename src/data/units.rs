//! Unit conversion between OpenWeatherMap's canonical units and display units
//!
//! The API reports temperature in Kelvin, pressure in hPa, wind speed in m/s and
//! precipitation in mm. Display units are identified by the same string keys the
//! preference store holds (e.g. `"°C"`, `"mm Hg"`, `"kn"`). Every conversion is
//! total: an unknown unit key leaves the value unchanged.

use serde::{Deserialize, Serialize};

/// Temperature display units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    /// Parses a stored preference key; nothing else is recognised
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "°C" => Some(Self::Celsius),
            "°F" => Some(Self::Fahrenheit),
            "K" => Some(Self::Kelvin),
            _ => None,
        }
    }

    /// Parses a preference key or a user-friendly alias such as `celsius`
    pub fn from_alias(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::from_key(name).or_else(|| match name.to_ascii_lowercase().as_str() {
            "c" | "celsius" => Some(Self::Celsius),
            "f" | "fahrenheit" => Some(Self::Fahrenheit),
            "k" | "kelvin" => Some(Self::Kelvin),
            _ => None,
        })
    }

    /// Preference key, also used as the displayed unit suffix
    pub fn key(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
            Self::Kelvin => "K",
        }
    }

    pub fn convert(&self, kelvin: f64) -> f64 {
        match self {
            Self::Celsius => kelvin - 273.15,
            Self::Fahrenheit => (kelvin - 273.15) * 1.8 + 32.0,
            Self::Kelvin => kelvin,
        }
    }
}

/// Pressure display units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureUnit {
    HectoPascal,
    KiloPascal,
    MillimetersOfMercury,
    InchesOfMercury,
}

impl PressureUnit {
    /// Parses a stored preference key; nothing else is recognised
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "hPa" | "hPa/mBar" => Some(Self::HectoPascal),
            "kPa" => Some(Self::KiloPascal),
            "mm Hg" => Some(Self::MillimetersOfMercury),
            "in Hg" => Some(Self::InchesOfMercury),
            _ => None,
        }
    }

    /// Parses a preference key or an alias such as `mmHg`
    pub fn from_alias(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::from_key(name).or_else(|| match name.to_ascii_lowercase().as_str() {
            "hpa" | "mbar" => Some(Self::HectoPascal),
            "kpa" => Some(Self::KiloPascal),
            "mmhg" => Some(Self::MillimetersOfMercury),
            "inhg" => Some(Self::InchesOfMercury),
            _ => None,
        })
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::HectoPascal => "hPa/mBar",
            Self::KiloPascal => "kPa",
            Self::MillimetersOfMercury => "mm Hg",
            Self::InchesOfMercury => "in Hg",
        }
    }

    pub fn convert(&self, hpa: f64) -> f64 {
        match self {
            Self::HectoPascal => hpa,
            Self::KiloPascal => hpa / 10.0,
            Self::MillimetersOfMercury => hpa * 0.750061561303,
            Self::InchesOfMercury => hpa * 0.0295299830714,
        }
    }
}

/// Wind speed display units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindSpeedUnit {
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,
    Knots,
    Beaufort,
}

impl WindSpeedUnit {
    /// Parses a stored preference key; nothing else is recognised
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "m/s" => Some(Self::MetersPerSecond),
            "kph" => Some(Self::KilometersPerHour),
            "mph" => Some(Self::MilesPerHour),
            "kn" => Some(Self::Knots),
            "bft" => Some(Self::Beaufort),
            _ => None,
        }
    }

    /// Parses a preference key or an alias such as `km/h`
    pub fn from_alias(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::from_key(name).or_else(|| match name.to_ascii_lowercase().as_str() {
            "mps" => Some(Self::MetersPerSecond),
            "km/h" => Some(Self::KilometersPerHour),
            "knots" => Some(Self::Knots),
            "beaufort" => Some(Self::Beaufort),
            _ => None,
        })
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::MetersPerSecond => "m/s",
            Self::KilometersPerHour => "kph",
            Self::MilesPerHour => "mph",
            Self::Knots => "kn",
            Self::Beaufort => "bft",
        }
    }

    pub fn convert(&self, mps: f64) -> f64 {
        match self {
            Self::MetersPerSecond => mps,
            Self::KilometersPerHour => mps * 3.6,
            Self::MilesPerHour => mps * 2.23693629205,
            Self::Knots => mps * 1.943844,
            Self::Beaufort => f64::from(beaufort(mps)),
        }
    }
}

/// Precipitation display units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    Millimeters,
    Inches,
}

impl LengthUnit {
    /// Anything other than `"mm"` is treated as inches
    pub fn from_key(key: &str) -> Self {
        if key == "mm" {
            Self::Millimeters
        } else {
            Self::Inches
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Millimeters => "mm",
            Self::Inches => "in",
        }
    }

    pub fn convert(&self, mm: f64) -> f64 {
        match self {
            Self::Millimeters => mm,
            Self::Inches => mm / 25.4,
        }
    }
}

/// Converts Kelvin into the unit named by `unit`
pub fn temperature(kelvin: f64, unit: &str) -> f64 {
    TemperatureUnit::from_key(unit).map_or(kelvin, |u| u.convert(kelvin))
}

/// Converts hPa into the unit named by `unit`
pub fn pressure(hpa: f64, unit: &str) -> f64 {
    PressureUnit::from_key(unit).map_or(hpa, |u| u.convert(hpa))
}

/// Converts m/s into the unit named by `unit`; `"bft"` yields the Beaufort index
pub fn wind_speed(mps: f64, unit: &str) -> f64 {
    WindSpeedUnit::from_key(unit).map_or(mps, |u| u.convert(mps))
}

/// Converts mm into inches for any unit other than `"mm"`
pub fn rain(mm: f64, unit: &str) -> f64 {
    LengthUnit::from_key(unit).convert(mm)
}

/// Upper bounds (exclusive) of Beaufort forces 0 through 11, in m/s
const BEAUFORT_LIMITS: [f64; 12] = [
    0.3, 1.5, 3.3, 5.5, 7.9, 10.7, 13.8, 17.1, 20.7, 24.4, 28.4, 32.6,
];

/// Maps wind speed in m/s onto the 0-12 Beaufort scale
pub fn beaufort(mps: f64) -> u8 {
    BEAUFORT_LIMITS
        .iter()
        .position(|limit| mps < *limit)
        .unwrap_or(BEAUFORT_LIMITS.len()) as u8
}

/// UV exposure risk categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UvRiskLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
    NoInfo,
}

/// Classifies a UV index value; negative or NaN input has no risk level
pub fn uv_risk_level(value: f64) -> UvRiskLevel {
    match value {
        v if (0.0..3.0).contains(&v) => UvRiskLevel::Low,
        v if (3.0..6.0).contains(&v) => UvRiskLevel::Moderate,
        v if (6.0..8.0).contains(&v) => UvRiskLevel::High,
        v if (8.0..11.0).contains(&v) => UvRiskLevel::VeryHigh,
        v if v >= 11.0 => UvRiskLevel::Extreme,
        _ => UvRiskLevel::NoInfo,
    }
}
