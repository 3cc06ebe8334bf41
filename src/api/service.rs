//! Fetch-parse-store orchestration
//!
//! `WeatherService` issues API requests through an [`HttpFetch`], parses the
//! responses and, only once a payload has parsed, stores it in the
//! [`WeatherCache`]. A failed fetch or parse therefore never replaces good
//! cached data.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{ApiConfig, Endpoint, HttpFetch, Location, LocationProvider, WeatherError};
use crate::cache::{Freshness, WeatherCache};
use crate::data::{
    parse_city_lookup, parse_city_search, parse_forecast, parse_observation, parse_uv_index,
    CityCandidate, CitySearchResult, WeatherRecord,
};

/// Result of searching for a city by name
#[derive(Debug, Clone, PartialEq)]
pub enum CitySearch {
    /// A single match, now the active city
    Selected(CityCandidate),
    /// Several matches; nothing was changed
    Ambiguous(Vec<CityCandidate>),
}

/// Everything fetched by a full refresh
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshOutcome {
    /// Current weather, with the UV index if it could be fetched
    pub observation: WeatherRecord,
    pub forecast: Vec<WeatherRecord>,
    pub uv_index: Option<f64>,
}

/// Fetches weather for the active city and keeps the cache up to date
pub struct WeatherService<F> {
    fetcher: F,
    config: ApiConfig,
    cache: Arc<WeatherCache>,
}

impl<F: HttpFetch> WeatherService<F> {
    pub fn new(fetcher: F, config: ApiConfig, cache: Arc<WeatherCache>) -> Self {
        Self {
            fetcher,
            config,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<WeatherCache> {
        &self.cache
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetches current weather for the active city
    ///
    /// On success the raw payload, the city's coordinates and the update time
    /// are stored. A 404 reinstates the previously active city.
    pub async fn refresh_observation(&self) -> Result<WeatherRecord, WeatherError> {
        let location = self.active_city()?;
        let body = self
            .get(Endpoint::Weather, &location)
            .await
            .map_err(|e| self.restore_city_on_not_found(e))?;

        let fetched_at = Utc::now();
        let record = parse_observation(&body, Some(fetched_at))?;

        if let (Some(latitude), Some(longitude)) = (record.latitude, record.longitude) {
            self.cache.set_coordinates(latitude, longitude);
        }
        self.cache.set_last_observation(&body);
        self.cache.set_last_update_time(fetched_at);
        debug!("Stored observation for {}", record.city_name);
        Ok(record)
    }

    /// Fetches the 5-day forecast for the active city
    pub async fn refresh_forecast(&self) -> Result<Vec<WeatherRecord>, WeatherError> {
        let location = self.active_city()?;
        let body = self
            .get(Endpoint::Forecast, &location)
            .await
            .map_err(|e| self.restore_city_on_not_found(e))?;

        let records = parse_forecast(&body, Some(Utc::now()))?;
        self.cache.set_last_forecast(&body);
        debug!("Stored forecast with {} entries", records.len());
        Ok(records)
    }

    /// Fetches the UV index at the coordinates of the last observation
    pub async fn refresh_uv_index(&self) -> Result<f64, WeatherError> {
        let (latitude, longitude) = self
            .cache
            .coordinates()
            .ok_or(WeatherError::LocationUnavailable)?;
        let body = self
            .get(
                Endpoint::UvIndex,
                &Location::Coordinates {
                    latitude,
                    longitude,
                },
            )
            .await?;

        let value = parse_uv_index(&body)?;
        self.cache.set_last_uv_index(&body);
        Ok(value)
    }

    /// Refreshes observation, then forecast and UV index concurrently
    ///
    /// The observation goes first because the UV request needs its
    /// coordinates. A failed UV request is logged and does not fail the
    /// refresh. On success the city-changed flag is cleared.
    pub async fn refresh_all(&self) -> Result<RefreshOutcome, WeatherError> {
        let observation = self.refresh_observation().await?;

        let uv_index = async {
            match self.refresh_uv_index().await {
                Ok(value) => Ok::<_, WeatherError>(Some(value)),
                Err(e) => {
                    warn!("UV index unavailable: {}", e);
                    Ok(None)
                }
            }
        };
        let (forecast, uv_index) = futures::try_join!(self.refresh_forecast(), uv_index)?;

        self.cache.set_city_changed(false);
        info!(
            "Refreshed weather for {} ({} forecast entries)",
            observation.city_name,
            forecast.len()
        );
        Ok(RefreshOutcome {
            observation: observation.with_uv_index(uv_index),
            forecast,
            uv_index,
        })
    }

    /// Runs [`refresh_all`](Self::refresh_all) only if the cache is stale at `now`
    pub async fn refresh_if_stale(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshOutcome>, WeatherError> {
        match self.cache.freshness(now) {
            Freshness::Fresh => {
                debug!("Cached weather is fresh, skipping refresh");
                Ok(None)
            }
            Freshness::Stale => self.refresh_all().await.map(Some),
        }
    }

    /// Searches for a city by name
    ///
    /// A single match becomes the active city. Several matches are returned
    /// for the caller to choose from with [`select_city`](Self::select_city).
    /// No match reinstates the previously active city.
    pub async fn search_city(&self, name: &str) -> Result<CitySearch, WeatherError> {
        let body = self
            .get(Endpoint::Find, &Location::Name(name.to_string()))
            .await?;

        match parse_city_search(&body)? {
            CitySearchResult::NotFound => {
                Err(self.restore_city_on_not_found(WeatherError::CityNotFound))
            }
            CitySearchResult::Found(city) => {
                self.select_candidate(&city);
                Ok(CitySearch::Selected(city))
            }
            CitySearchResult::Ambiguous(cities) => {
                info!("{} cities match {:?}", cities.len(), name);
                Ok(CitySearch::Ambiguous(cities))
            }
        }
    }

    /// Resolves coordinates to a city and makes it the active one
    pub async fn locate(&self, latitude: f64, longitude: f64) -> Result<CityCandidate, WeatherError> {
        let body = self
            .get(
                Endpoint::Weather,
                &Location::Coordinates {
                    latitude,
                    longitude,
                },
            )
            .await?;

        match parse_city_lookup(&body)? {
            CitySearchResult::Found(mut city) => {
                city.latitude = city.latitude.or(Some(latitude));
                city.longitude = city.longitude.or(Some(longitude));
                self.select_candidate(&city);
                Ok(city)
            }
            _ => Err(self.restore_city_on_not_found(WeatherError::CityNotFound)),
        }
    }

    /// Locates the city at the provider's last known position
    pub async fn locate_device(
        &self,
        provider: &impl LocationProvider,
    ) -> Result<CityCandidate, WeatherError> {
        let (latitude, longitude) = provider
            .last_known_location()
            .ok_or(WeatherError::LocationUnavailable)?;
        self.locate(latitude, longitude).await
    }

    /// Makes `id` the active city; the next freshness check is stale
    pub fn select_city(&self, id: i64) {
        info!("Selected city {}", id);
        self.cache.select_city(id);
    }

    fn select_candidate(&self, city: &CityCandidate) {
        self.select_city(city.id);
        if let (Some(latitude), Some(longitude)) = (city.latitude, city.longitude) {
            self.cache.set_coordinates(latitude, longitude);
        }
    }

    fn active_city(&self) -> Result<Location, WeatherError> {
        self.cache
            .active_city_id()
            .map(Location::CityId)
            .ok_or(WeatherError::NoCitySelected)
    }

    fn restore_city_on_not_found(&self, error: WeatherError) -> WeatherError {
        if matches!(error, WeatherError::CityNotFound) {
            if let Some(previous) = self.cache.restore_previous_city_id() {
                warn!("City not found, restored previous city {}", previous);
            }
        }
        error
    }

    /// Issues a GET and maps the HTTP status
    async fn get(&self, endpoint: Endpoint, location: &Location) -> Result<String, WeatherError> {
        let url = self.config.url(endpoint, location)?;
        let response = self.fetcher.fetch(url.as_str()).await?;
        match response.status {
            200 => Ok(response.body),
            401 => Err(WeatherError::InvalidApiKey),
            404 => Err(WeatherError::CityNotFound),
            429 => Err(WeatherError::TooManyRequests),
            status => {
                warn!("{} request failed with status {}", endpoint.path(), status);
                Err(WeatherError::Http(status))
            }
        }
    }
}
