//! Splitting a forecast list into today / tomorrow / later

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use super::WeatherRecord;

/// Forecast entries grouped by local calendar day
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastPartition {
    /// Entries before tomorrow's local midnight
    pub today: Vec<WeatherRecord>,
    /// Entries between tomorrow's and the day after's local midnight
    pub tomorrow: Vec<WeatherRecord>,
    /// Everything else, including entries without a timestamp
    pub later: Vec<WeatherRecord>,
}

impl ForecastPartition {
    pub fn len(&self) -> usize {
        self.today.len() + self.tomorrow.len() + self.later.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partitions `records` using the local midnights that follow `now`
///
/// The day boundaries are taken in `now`'s time zone. Order within each group
/// follows the input order.
pub fn partition<Tz: TimeZone>(records: &[WeatherRecord], now: &DateTime<Tz>) -> ForecastPartition {
    let tz = now.timezone();
    let today = now.date_naive();
    let tomorrow_start = local_midnight(&tz, today + Duration::days(1))
        .unwrap_or_else(|| now.with_timezone(&Utc) + Duration::days(1));
    let later_start = local_midnight(&tz, today + Duration::days(2))
        .unwrap_or_else(|| tomorrow_start + Duration::days(1));

    let mut result = ForecastPartition::default();
    for record in records {
        match record.observed_at {
            Some(at) if at < tomorrow_start => result.today.push(record.clone()),
            Some(at) if at < later_start => result.tomorrow.push(record.clone()),
            _ => result.later.push(record.clone()),
        }
    }
    result
}

/// Start of `date` in `tz`; skips forward an hour when midnight falls in a DST gap
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}
