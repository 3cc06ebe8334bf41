//! Weather icon selection from OpenWeatherMap condition codes

use serde::Serialize;

/// Glyphs of the weather icon font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeatherIcon {
    Lightning,
    Thunderstorm,
    Rain,
    RainMix,
    Showers,
    Sprinkle,
    StormShowers,
    Sleet,
    Snow,
    Smoke,
    DayHaze,
    Dust,
    Sandstorm,
    CloudyGusts,
    Tornado,
    Fog,
    DaySunny,
    NightClear,
    DayCloudy,
    NightAltCloudy,
    Cloudy,
    Hurricane,
    SnowflakeCold,
    Hot,
    Windy,
    Hail,
    StrongWind,
}

impl WeatherIcon {
    /// Picks the glyph for a condition code; codes outside the known groups have none
    pub fn for_condition(code: u32, is_day: bool) -> Option<Self> {
        use WeatherIcon::*;

        let icon = match code / 100 {
            // Thunderstorm
            2 => match code {
                210 | 211 | 212 | 221 => Lightning,
                _ => Thunderstorm,
            },
            // Drizzle
            3 => match code {
                302 | 311 | 312 | 314 => Rain,
                310 => RainMix,
                313 => Showers,
                _ => Sprinkle,
            },
            // Rain
            5 => match code {
                500 => Sprinkle,
                511 => RainMix,
                520..=522 => Showers,
                531 => StormShowers,
                _ => Rain,
            },
            // Snow
            6 => match code {
                611 => Sleet,
                612 | 613 | 615 | 616 | 620 => RainMix,
                _ => Snow,
            },
            // Atmosphere
            7 => match code {
                711 => Smoke,
                721 => DayHaze,
                731 | 761 | 762 => Dust,
                751 => Sandstorm,
                771 => CloudyGusts,
                781 => Tornado,
                _ => Fog,
            },
            // Clear and clouds
            8 => match code {
                800 if is_day => DaySunny,
                800 => NightClear,
                801 | 802 if is_day => DayCloudy,
                801 | 802 => NightAltCloudy,
                _ => Cloudy,
            },
            // Extreme
            9 => match code {
                900 => Tornado,
                901 => StormShowers,
                902 => Hurricane,
                903 => SnowflakeCold,
                904 => Hot,
                905 => Windy,
                906 => Hail,
                _ => StrongWind,
            },
            _ => return None,
        };
        Some(icon)
    }

    /// Stable identifier for a renderer's glyph lookup
    pub fn key(&self) -> &'static str {
        match self {
            Self::Lightning => "weather_lightning",
            Self::Thunderstorm => "weather_thunderstorm",
            Self::Rain => "weather_rain",
            Self::RainMix => "weather_rain_mix",
            Self::Showers => "weather_showers",
            Self::Sprinkle => "weather_sprinkle",
            Self::StormShowers => "weather_storm_showers",
            Self::Sleet => "weather_sleet",
            Self::Snow => "weather_snow",
            Self::Smoke => "weather_smoke",
            Self::DayHaze => "weather_day_haze",
            Self::Dust => "weather_dust",
            Self::Sandstorm => "weather_sandstorm",
            Self::CloudyGusts => "weather_cloudy_gusts",
            Self::Tornado => "weather_tornado",
            Self::Fog => "weather_fog",
            Self::DaySunny => "weather_day_sunny",
            Self::NightClear => "weather_night_clear",
            Self::DayCloudy => "weather_day_cloudy",
            Self::NightAltCloudy => "weather_night_alt_cloudy",
            Self::Cloudy => "weather_cloudy",
            Self::Hurricane => "weather_hurricane",
            Self::SnowflakeCold => "weather_snowflake_cold",
            Self::Hot => "weather_hot",
            Self::Windy => "weather_windy",
            Self::Hail => "weather_hail",
            Self::StrongWind => "weather_strong_wind",
        }
    }
}
