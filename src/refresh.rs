//! Background weather refresh
//!
//! Periodically checks whether the cached weather is stale and refreshes it
//! through a [`WeatherService`], reporting progress over a tokio channel.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{HttpFetch, RefreshOutcome, WeatherService};

/// Messages sent from the background refresh task
#[derive(Debug, Clone)]
pub enum RefreshMessage {
    /// A refresh cycle started
    RefreshStarted,
    /// New weather was fetched and stored
    Refreshed(Box<RefreshOutcome>),
    /// The cache was still fresh; nothing was fetched
    Skipped,
    /// The refresh failed; cached data is unchanged
    RefreshError(String),
    /// A refresh cycle finished
    RefreshCompleted,
}

/// Configuration for the refresh loop
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// How often to check freshness
    pub interval: Duration,
    /// Whether auto-refresh is enabled
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300), // 5 minutes
            enabled: true,
        }
    }
}

/// Handle for controlling the background refresh task
pub struct RefreshHandle {
    /// Channel for receiving refresh messages
    pub receiver: mpsc::Receiver<RefreshMessage>,
    /// Requests a refresh regardless of freshness
    refresh_tx: mpsc::Sender<()>,
    /// Signals shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Spawns the refresh task
    ///
    /// The first freshness check runs immediately, then once per
    /// `config.interval`. With refresh disabled only explicit requests refresh.
    pub fn spawn<F>(service: Arc<WeatherService<F>>, config: RefreshConfig) -> Self
    where
        F: HttpFetch + 'static,
    {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (refresh_tx, mut refresh_rx) = mpsc::channel::<()>(1);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(config.interval);

            loop {
                let forced = tokio::select! {
                    _ = interval.tick(), if config.enabled => false,
                    request = refresh_rx.recv() => match request {
                        Some(()) => true,
                        None => break,
                    },
                    _ = shutdown_rx.recv() => break,
                };

                let _ = msg_tx.send(RefreshMessage::RefreshStarted).await;
                let result = if forced {
                    service.refresh_all().await.map(Some)
                } else {
                    service.refresh_if_stale(Utc::now()).await
                };
                let message = match result {
                    Ok(Some(outcome)) => RefreshMessage::Refreshed(Box::new(outcome)),
                    Ok(None) => RefreshMessage::Skipped,
                    Err(e) => {
                        warn!("Background refresh failed: {}", e);
                        RefreshMessage::RefreshError(e.to_string())
                    }
                };
                let _ = msg_tx.send(message).await;
                let _ = msg_tx.send(RefreshMessage::RefreshCompleted).await;
            }
            debug!("Refresh task stopped");
        });

        Self {
            receiver: msg_rx,
            refresh_tx,
            shutdown_tx,
        }
    }

    /// Requests an immediate refresh, even if the cache is fresh
    pub async fn request_refresh(&self) {
        let _ = self.refresh_tx.send(()).await;
    }

    /// Shuts down the background refresh task
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiConfig, FetchError, HttpResponse};
    use crate::cache::WeatherCache;
    use crate::store::{KeyValueStore, PreferenceStore};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::timeout;

    /// Answers every request with a fixed status and counts calls
    struct CountingFetcher {
        calls: AtomicUsize,
        status: u16,
    }

    impl HttpFetch for CountingFetcher {
        async fn fetch(&self, _url: &str) -> Result<HttpResponse, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(HttpResponse::new(self.status, ""))
        }
    }

    fn create_service(status: u16) -> Arc<WeatherService<CountingFetcher>> {
        let store: Arc<dyn KeyValueStore> = Arc::new(PreferenceStore::in_memory());
        let cache = Arc::new(WeatherCache::new(store));
        Arc::new(WeatherService::new(
            CountingFetcher {
                calls: AtomicUsize::new(0),
                status,
            },
            ApiConfig::new("k").with_base_url("http://owm.test"),
            cache,
        ))
    }

    async fn next(handle: &mut RefreshHandle) -> RefreshMessage {
        timeout(Duration::from_secs(2), handle.receiver.recv())
            .await
            .expect("Timed out waiting for refresh message")
            .expect("Refresh channel closed")
    }

    #[test]
    fn test_refresh_config_default() {
        let config = RefreshConfig::default();
        assert_eq!(config.interval, Duration::from_secs(300));
        assert!(config.enabled);
    }

    #[tokio::test]
    async fn test_refresh_handle_spawn_disabled() {
        let config = RefreshConfig {
            enabled: false,
            ..Default::default()
        };
        let mut handle = RefreshHandle::spawn(create_service(200), config);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(handle.receiver.try_recv().is_err());
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_fresh_cache_is_skipped() {
        let service = create_service(200);
        service.cache().set_active_city_id(1);
        service.cache().set_last_update_time(Utc::now());

        let mut handle = RefreshHandle::spawn(service.clone(), RefreshConfig::default());
        assert!(matches!(next(&mut handle).await, RefreshMessage::RefreshStarted));
        assert!(matches!(next(&mut handle).await, RefreshMessage::Skipped));
        assert!(matches!(next(&mut handle).await, RefreshMessage::RefreshCompleted));
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_requested_refresh_reports_errors() {
        let service = create_service(500);
        service.cache().set_active_city_id(1);
        service.cache().set_last_update_time(Utc::now());

        let config = RefreshConfig {
            enabled: false,
            ..Default::default()
        };
        let mut handle = RefreshHandle::spawn(service, config);
        handle.request_refresh().await;

        assert!(matches!(next(&mut handle).await, RefreshMessage::RefreshStarted));
        match next(&mut handle).await {
            RefreshMessage::RefreshError(message) => assert!(message.contains("500")),
            other => panic!("Expected error, got {:?}", other),
        }
        handle.shutdown().await;
    }
}
