//! OpenWeatherMap JSON response parsing
//!
//! Converts raw response bodies (current weather, 5-day forecast, UV index,
//! city search) into [`WeatherRecord`]s. Parsing is deliberately forgiving:
//! a numeric field that is missing or has the wrong type becomes `None`
//! instead of failing the whole response. Only text that is not JSON, or an
//! entry lacking the `main` object or the first `weather` element, is an error.
//! Unknown fields are ignored.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::{CityCandidate, WeatherRecord};

/// Fallback textual timestamp format for sunrise/sunset
const SUN_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors that make a response unusable
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body is not valid JSON, or a structural element has the wrong shape
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// A mandatory object or array element is absent
    #[error("Missing expected field in response: {0}")]
    MissingField(&'static str),
}

/// Outcome of a city search or reverse-geocoding lookup
#[derive(Debug, Clone, PartialEq)]
pub enum CitySearchResult {
    /// No city matched
    NotFound,
    /// Exactly one city matched
    Found(CityCandidate),
    /// Several cities matched; the caller has to pick one
    Ambiguous(Vec<CityCandidate>),
}

/// Parses a current-weather (`/weather`) response
///
/// `fetched_at` becomes the record's `last_updated`.
pub fn parse_observation(
    raw: &str,
    fetched_at: Option<DateTime<Utc>>,
) -> Result<WeatherRecord, ParseError> {
    let entry: RawEntry = serde_json::from_str(raw)?;

    let mut record = entry_to_record(&entry, fetched_at)?;
    record.city_id = entry.id;
    record.city_name = entry.name.clone().unwrap_or_default();
    if let Some(sys) = &entry.sys {
        record.country_code = sys.country.clone().unwrap_or_default();
        record.sunrise = sys.sunrise.as_ref().and_then(|v| parse_sun_time(v, "sunrise"));
        record.sunset = sys.sunset.as_ref().and_then(|v| parse_sun_time(v, "sunset"));
    }
    if let Some(coord) = &entry.coord {
        record.latitude = coord.lat;
        record.longitude = coord.lon;
    }
    Ok(record)
}

/// Parses a 5-day / 3-hour forecast (`/forecast`) response
///
/// City information from the top-level `city` object is copied into every
/// entry. Entry order is preserved.
pub fn parse_forecast(
    raw: &str,
    fetched_at: Option<DateTime<Utc>>,
) -> Result<Vec<WeatherRecord>, ParseError> {
    let forecast: RawForecast = serde_json::from_str(raw)?;
    let list = forecast.list.ok_or(ParseError::MissingField("list"))?;
    let city = forecast.city.unwrap_or_default();

    let sunrise = city.sunrise.as_ref().and_then(|v| parse_sun_time(v, "sunrise"));
    let sunset = city.sunset.as_ref().and_then(|v| parse_sun_time(v, "sunset"));
    let coord = city.coord.unwrap_or_default();

    list.iter()
        .map(|entry| {
            let mut record = entry_to_record(entry, fetched_at)?;
            record.chance_of_precipitation = entry.pop.unwrap_or(0.0);
            record.city_id = city.id;
            record.city_name = city.name.clone().unwrap_or_default();
            record.country_code = city.country.clone().unwrap_or_default();
            record.latitude = coord.lat;
            record.longitude = coord.lon;
            record.sunrise = sunrise;
            record.sunset = sunset;
            Ok(record)
        })
        .collect()
}

/// Parses a UV index (`/uvi`) response
pub fn parse_uv_index(raw: &str) -> Result<f64, ParseError> {
    let uvi: RawUvIndex = serde_json::from_str(raw)?;
    uvi.value.ok_or(ParseError::MissingField("value"))
}

/// Parses a city search (`/find`) response
pub fn parse_city_search(raw: &str) -> Result<CitySearchResult, ParseError> {
    let find: RawFind = serde_json::from_str(raw)?;
    if find.count == Some(0) || find.list.is_empty() {
        debug!("City search returned no matches");
        return Ok(CitySearchResult::NotFound);
    }

    let mut candidates = find
        .list
        .iter()
        .map(entry_to_city)
        .collect::<Result<Vec<_>, _>>()?;

    if candidates.len() == 1 {
        Ok(CitySearchResult::Found(candidates.remove(0)))
    } else {
        Ok(CitySearchResult::Ambiguous(candidates))
    }
}

/// Parses a current-weather response used to resolve coordinates to a city
///
/// The API signals an unknown location with `"cod": "404"`.
pub fn parse_city_lookup(raw: &str) -> Result<CitySearchResult, ParseError> {
    let entry: RawEntry = serde_json::from_str(raw)?;
    if entry.cod.as_deref() == Some("404") {
        debug!("Reverse geocoding found no city");
        return Ok(CitySearchResult::NotFound);
    }
    Ok(CitySearchResult::Found(entry_to_city(&entry)?))
}

fn entry_to_record(
    entry: &RawEntry,
    fetched_at: Option<DateTime<Utc>>,
) -> Result<WeatherRecord, ParseError> {
    let main = entry.main.as_ref().ok_or(ParseError::MissingField("main"))?;
    let condition = entry
        .weather
        .first()
        .ok_or(ParseError::MissingField("weather"))?;

    let (wind_speed_mps, wind_direction_degrees) = match &entry.wind {
        Some(wind) => {
            if wind.deg.is_none() {
                debug!("No wind direction available");
            }
            (wind.speed, wind.deg)
        }
        None => (None, None),
    };

    Ok(WeatherRecord {
        observed_at: entry.dt.and_then(|dt| Utc.timestamp_opt(dt, 0).single()),
        temperature_kelvin: main.temp,
        pressure_hpa: main.pressure,
        humidity_percent: main
            .humidity
            .filter(|h| (0..=100).contains(h))
            .and_then(|h| u8::try_from(h).ok()),
        wind_speed_mps,
        wind_direction_degrees,
        rain_mm: precipitation(entry.rain.as_ref(), entry.snow.as_ref()),
        chance_of_precipitation: 0.0,
        condition_code: condition.id.and_then(|id| u32::try_from(id).ok()),
        description: capitalize(condition.description.as_deref().unwrap_or_default()),
        last_updated: fetched_at,
        ..Default::default()
    })
}

fn entry_to_city(entry: &RawEntry) -> Result<CityCandidate, ParseError> {
    let id = entry.id.ok_or(ParseError::MissingField("id"))?;
    let coord = entry.coord.clone().unwrap_or_default();
    Ok(CityCandidate {
        id,
        name: entry.name.clone().unwrap_or_default(),
        country_code: entry
            .sys
            .as_ref()
            .and_then(|sys| sys.country.clone())
            .unwrap_or_default(),
        latitude: coord.lat,
        longitude: coord.lon,
    })
}

/// Rain amount, falling back to snow, falling back to zero
fn precipitation(rain: Option<&RawPrecipitation>, snow: Option<&RawPrecipitation>) -> f64 {
    rain.and_then(RawPrecipitation::amount)
        .or_else(|| snow.and_then(RawPrecipitation::amount))
        .unwrap_or(0.0)
}

/// Reads a sunrise/sunset value given as Unix seconds (number or numeric
/// string) or as a `yyyy-MM-dd HH:mm:ss` local timestamp
fn parse_sun_time(value: &Value, field: &str) -> Option<DateTime<Utc>> {
    let seconds = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    if let Some(seconds) = seconds {
        if seconds < 0 {
            return None;
        }
        return Utc.timestamp_opt(seconds, 0).single();
    }

    let parsed = value
        .as_str()
        .and_then(|s| NaiveDateTime::parse_from_str(s.trim(), SUN_TIME_FORMAT).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc));
    if parsed.is_none() {
        warn!("Unparseable {} value {}, treating as absent", field, value);
    }
    parsed
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(value_as_f64))
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(value_as_i64))
}

fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A single observation, forecast slot or search hit
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default, deserialize_with = "lenient_i64")]
    dt: Option<i64>,
    main: Option<RawMain>,
    #[serde(default)]
    weather: Vec<RawCondition>,
    wind: Option<RawWind>,
    rain: Option<RawPrecipitation>,
    snow: Option<RawPrecipitation>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pop: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    cod: Option<String>,
    sys: Option<RawSys>,
    coord: Option<RawCoord>,
}

#[derive(Debug, Deserialize)]
struct RawMain {
    #[serde(default, deserialize_with = "lenient_f64")]
    temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pressure: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    humidity: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    #[serde(default, deserialize_with = "lenient_i64")]
    id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawWind {
    #[serde(default, deserialize_with = "lenient_f64")]
    speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawPrecipitation {
    #[serde(rename = "3h", default, deserialize_with = "lenient_f64")]
    three_hours: Option<f64>,
    #[serde(rename = "1h", default, deserialize_with = "lenient_f64")]
    one_hour: Option<f64>,
}

impl RawPrecipitation {
    fn amount(&self) -> Option<f64> {
        self.three_hours.or(self.one_hour)
    }
}

#[derive(Debug, Deserialize)]
struct RawSys {
    #[serde(default, deserialize_with = "lenient_string")]
    country: Option<String>,
    sunrise: Option<Value>,
    sunset: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawCoord {
    #[serde(default, deserialize_with = "lenient_f64")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    lon: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCity {
    #[serde(default, deserialize_with = "lenient_i64")]
    id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    country: Option<String>,
    coord: Option<RawCoord>,
    sunrise: Option<Value>,
    sunset: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    list: Option<Vec<RawEntry>>,
    city: Option<RawCity>,
}

#[derive(Debug, Deserialize)]
struct RawUvIndex {
    #[serde(default, deserialize_with = "lenient_f64")]
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawFind {
    #[serde(default, deserialize_with = "lenient_i64")]
    count: Option<i64>,
    #[serde(default)]
    list: Vec<RawEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sample current-weather response for Sofia
    const OBSERVATION: &str = r#"{
        "coord": {"lon": 23.32, "lat": 42.7},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "base": "stations",
        "main": {"temp": 285.42, "feels_like": 284.8, "pressure": 1012, "humidity": 81},
        "visibility": 10000,
        "wind": {"speed": 3.6, "deg": 250},
        "rain": {"1h": 0.42},
        "clouds": {"all": 75},
        "dt": 1700000000,
        "sys": {"type": 1, "id": 6394, "country": "BG", "sunrise": 1699937510, "sunset": 1699972871},
        "timezone": 7200,
        "id": 727011,
        "name": "Sofia",
        "cod": 200
    }"#;

    #[test]
    fn test_parse_full_observation() {
        let fetched = Utc.timestamp_opt(1_700_000_100, 0).unwrap();
        let record = parse_observation(OBSERVATION, Some(fetched)).expect("Failed to parse");

        assert_eq!(record.observed_at, Utc.timestamp_opt(1_700_000_000, 0).single());
        assert!((record.temperature_kelvin.unwrap() - 285.42).abs() < 1e-9);
        assert_eq!(record.pressure_hpa, Some(1012.0));
        assert_eq!(record.humidity_percent, Some(81));
        assert_eq!(record.wind_speed_mps, Some(3.6));
        assert_eq!(record.wind_direction_degrees, Some(250.0));
        assert!((record.rain_mm - 0.42).abs() < 1e-9);
        assert_eq!(record.condition_code, Some(500));
        assert_eq!(record.description, "Light rain");
        assert_eq!(record.city_id, Some(727011));
        assert_eq!(record.city_name, "Sofia");
        assert_eq!(record.country_code, "BG");
        assert_eq!(record.latitude, Some(42.7));
        assert_eq!(record.longitude, Some(23.32));
        assert_eq!(record.sunrise, Utc.timestamp_opt(1_699_937_510, 0).single());
        assert_eq!(record.sunset, Utc.timestamp_opt(1_699_972_871, 0).single());
        assert_eq!(record.last_updated, Some(fetched));
        assert!(record.uv_index.is_none());
    }

    #[test]
    fn test_parse_minimal_observation_uses_absent_values() {
        let json = r#"{
            "main": {"temp": 290.5, "pressure": 1013, "humidity": 70},
            "weather": [{"id": 800, "description": "clear sky"}]
        }"#;
        let record = parse_observation(json, None).expect("Failed to parse");

        assert!(record.wind_speed_mps.is_none());
        assert!(record.wind_direction_degrees.is_none());
        assert_eq!(record.rain_mm, 0.0);
        assert_eq!(record.description, "Clear sky");
        assert_eq!(record.condition_code, Some(800));
        assert_eq!(record.temperature_kelvin, Some(290.5));
        assert!(record.sunrise.is_none());
        assert!(record.sunset.is_none());
        assert!(record.country_code.is_empty());
    }

    #[test]
    fn test_missing_main_is_malformed() {
        let json = r#"{"weather": [{"id": 800, "description": "clear sky"}]}"#;
        match parse_observation(json, None) {
            Err(ParseError::MissingField(field)) => assert_eq!(field, "main"),
            other => panic!("Expected MissingField(main), got {:?}", other),
        }
    }

    #[test]
    fn test_missing_weather_element_is_malformed() {
        let json = r#"{"main": {"temp": 280.0}, "weather": []}"#;
        match parse_observation(json, None) {
            Err(ParseError::MissingField(field)) => assert_eq!(field, "weather"),
            other => panic!("Expected MissingField(weather), got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        assert!(matches!(
            parse_observation("{not valid json", None),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn test_wrongly_typed_numbers_fall_back_to_absent() {
        let json = r#"{
            "main": {"temp": "warm", "pressure": null, "humidity": 250},
            "weather": [{"id": 801, "description": ""}],
            "wind": {"speed": "fast"}
        }"#;
        let record = parse_observation(json, None).expect("Failed to parse");
        assert!(record.temperature_kelvin.is_none());
        assert!(record.pressure_hpa.is_none());
        assert!(record.humidity_percent.is_none());
        assert!(record.wind_speed_mps.is_none());
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let json = r#"{
            "main": {"temp": "280.25", "humidity": "55"},
            "weather": [{"id": "300", "description": "drizzle"}]
        }"#;
        let record = parse_observation(json, None).expect("Failed to parse");
        assert_eq!(record.temperature_kelvin, Some(280.25));
        assert_eq!(record.humidity_percent, Some(55));
        assert_eq!(record.condition_code, Some(300));
    }

    #[test]
    fn test_wind_without_direction() {
        let json = r#"{
            "main": {"temp": 280.0},
            "weather": [{"id": 800, "description": "clear sky"}],
            "wind": {"speed": 2.0}
        }"#;
        let record = parse_observation(json, None).unwrap();
        assert_eq!(record.wind_speed_mps, Some(2.0));
        assert!(record.wind_direction_degrees.is_none());
    }

    #[test]
    fn test_precipitation_fallback_order() {
        let three_hour = r#"{"main": {}, "weather": [{}], "rain": {"3h": 1.5, "1h": 0.5}}"#;
        assert_eq!(parse_observation(three_hour, None).unwrap().rain_mm, 1.5);

        let one_hour = r#"{"main": {}, "weather": [{}], "rain": {"1h": 0.5}}"#;
        assert_eq!(parse_observation(one_hour, None).unwrap().rain_mm, 0.5);

        let snow = r#"{"main": {}, "weather": [{}], "snow": {"3h": 2.25}}"#;
        assert_eq!(parse_observation(snow, None).unwrap().rain_mm, 2.25);

        let empty_rain = r#"{"main": {}, "weather": [{}], "rain": {}, "snow": {"1h": 0.75}}"#;
        assert_eq!(parse_observation(empty_rain, None).unwrap().rain_mm, 0.75);

        let both = r#"{"main": {}, "weather": [{}], "rain": {"1h": 0.1}, "snow": {"1h": 9.0}}"#;
        assert_eq!(parse_observation(both, None).unwrap().rain_mm, 0.1);
    }

    #[test]
    fn test_sun_times_accept_text_format() {
        let json = r#"{
            "main": {}, "weather": [{}],
            "sys": {"sunrise": "2024-07-15 05:30:00", "sunset": "1721073600"}
        }"#;
        let record = parse_observation(json, None).unwrap();

        let expected_sunrise = Local
            .from_local_datetime(
                &NaiveDateTime::parse_from_str("2024-07-15 05:30:00", SUN_TIME_FORMAT).unwrap(),
            )
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(record.sunrise, Some(expected_sunrise));
        assert_eq!(record.sunset, Utc.timestamp_opt(1_721_073_600, 0).single());
    }

    #[test]
    fn test_unparseable_sun_times_are_absent() {
        let json = r#"{
            "main": {}, "weather": [{}],
            "sys": {"sunrise": "dawn", "sunset": -5}
        }"#;
        let record = parse_observation(json, None).unwrap();
        assert!(record.sunrise.is_none());
        assert!(record.sunset.is_none());
    }

    #[test]
    fn test_capitalize_only_first_letter() {
        assert_eq!(capitalize("overcast clouds"), "Overcast clouds");
        assert_eq!(capitalize("éclaircies"), "Éclaircies");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_parse_forecast_copies_city_into_entries() {
        let json = r#"{
            "cod": "200",
            "cnt": 2,
            "list": [
                {"dt": 1700006400, "main": {"temp": 280.1, "pressure": 1010, "humidity": 60},
                 "weather": [{"id": 803, "description": "broken clouds"}],
                 "wind": {"speed": 4.1, "deg": 180}, "pop": 0.2},
                {"dt": 1700017200, "main": {"temp": 279.4, "pressure": 1011, "humidity": 65},
                 "weather": [{"id": 500, "description": "light rain"}],
                 "rain": {"3h": 0.8}, "pop": 0.64}
            ],
            "city": {"id": 2643743, "name": "London", "country": "GB",
                     "coord": {"lat": 51.5085, "lon": -0.1257},
                     "sunrise": 1699947000, "sunset": 1699979000}
        }"#;
        let records = parse_forecast(json, None).expect("Failed to parse forecast");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].city_name, "London");
        assert_eq!(records[1].country_code, "GB");
        assert_eq!(records[1].city_id, Some(2643743));
        assert_eq!(records[0].chance_of_precipitation, 0.2);
        assert_eq!(records[1].chance_of_precipitation, 0.64);
        assert_eq!(records[1].rain_mm, 0.8);
        assert_eq!(records[0].latitude, Some(51.5085));
        assert_eq!(records[1].sunrise, Utc.timestamp_opt(1_699_947_000, 0).single());
        assert!(records[0].observed_at < records[1].observed_at);
    }

    #[test]
    fn test_parse_forecast_without_list_is_malformed() {
        let json = r#"{"city": {"id": 1}}"#;
        match parse_forecast(json, None) {
            Err(ParseError::MissingField(field)) => assert_eq!(field, "list"),
            other => panic!("Expected MissingField(list), got {:?}", other),
        }
    }

    #[test]
    fn test_parse_uv_index() {
        assert_eq!(
            parse_uv_index(r#"{"lat": 42.7, "lon": 23.32, "date_iso": "2024-07-15T12:00:00Z", "value": 7.25}"#)
                .unwrap(),
            7.25
        );
        assert!(matches!(
            parse_uv_index(r#"{"lat": 1.0}"#),
            Err(ParseError::MissingField("value"))
        ));
    }

    #[test]
    fn test_city_search_results() {
        let none = r#"{"message": "like", "cod": "200", "count": 0, "list": []}"#;
        assert_eq!(parse_city_search(none).unwrap(), CitySearchResult::NotFound);

        let one = r#"{"count": 1, "list": [
            {"id": 2643743, "name": "London", "coord": {"lat": 51.5, "lon": -0.12},
             "main": {"temp": 280.0}, "sys": {"country": "GB"}, "weather": []}
        ]}"#;
        match parse_city_search(one).unwrap() {
            CitySearchResult::Found(city) => {
                assert_eq!(city.id, 2643743);
                assert_eq!(city.country_code, "GB");
                assert_eq!(city.latitude, Some(51.5));
            }
            other => panic!("Expected a single city, got {:?}", other),
        }

        let many = r#"{"count": 2, "list": [
            {"id": 2643743, "name": "London", "sys": {"country": "GB"}},
            {"id": 6058560, "name": "London", "sys": {"country": "CA"}}
        ]}"#;
        match parse_city_search(many).unwrap() {
            CitySearchResult::Ambiguous(cities) => {
                assert_eq!(cities.len(), 2);
                assert_eq!(cities[1].country_code, "CA");
            }
            other => panic!("Expected ambiguous result, got {:?}", other),
        }
    }

    #[test]
    fn test_city_lookup_not_found_code() {
        let json = r#"{"cod": "404", "message": "city not found"}"#;
        assert_eq!(parse_city_lookup(json).unwrap(), CitySearchResult::NotFound);

        match parse_city_lookup(OBSERVATION).unwrap() {
            CitySearchResult::Found(city) => assert_eq!(city.name, "Sofia"),
            other => panic!("Expected Sofia, got {:?}", other),
        }
    }
}
