//! Change notification for cached weather and display preferences
//!
//! A `WeatherRepository` keeps one derived [`WeatherPresentation`] and pushes
//! a fresh immutable snapshot to every live [`Subscription`] whenever a
//! tracked store key changes. While at least one subscription exists the
//! repository listens to the store; when the last one is dropped the
//! listener is detached.
//!
//! The store listener only forwards the changed key into a channel. A single
//! tokio task drains that channel in delivery order and recomputes the one
//! field the key affects. Publishing compares the presentation version seen
//! before the recomputation with the current one; if another update landed
//! in between, the stale result is discarded.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::mpsc;
use tracing::debug;

use super::{keys, DisplayPreferences, WeatherCache};
use crate::data::WeatherRecord;
use crate::store::ListenerId;

/// Everything a weather surface needs to render itself
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherPresentation {
    /// Last observation with the cached UV index applied
    pub observation: Option<WeatherRecord>,
    /// Time of the last successful refresh
    pub last_update: Option<DateTime<Utc>>,
    pub preferences: DisplayPreferences,
}

impl WeatherPresentation {
    /// Builds the presentation from scratch
    pub fn load(cache: &WeatherCache) -> Self {
        Self {
            observation: load_observation(cache),
            last_update: cache.last_update_time(),
            preferences: cache.display_preferences(),
        }
    }

    /// Copy with only the field affected by `key` recomputed
    ///
    /// Returns `None` for keys the presentation does not depend on.
    pub fn with_change(&self, cache: &WeatherCache, key: &str) -> Option<Self> {
        let mut updated = self.clone();
        match key {
            keys::LAST_OBSERVATION | keys::LAST_UV_INDEX => {
                updated.observation = load_observation(cache);
            }
            keys::LAST_UPDATE => {
                updated.last_update = cache.last_update_time();
                updated.observation = load_observation(cache);
            }
            _ => {
                if !updated
                    .preferences
                    .reload_key(cache.store().as_ref(), key)
                {
                    return None;
                }
            }
        }
        Some(updated)
    }
}

fn load_observation(cache: &WeatherCache) -> Option<WeatherRecord> {
    cache
        .last_observation()
        .map(|record| record.with_uv_index(cache.last_uv_index()))
}

type Sender = mpsc::UnboundedSender<Arc<WeatherPresentation>>;

/// Mutable repository state, guarded by one lock
struct State {
    /// Bumped on every publish
    version: u64,
    presentation: Arc<WeatherPresentation>,
    subscribers: HashMap<u64, Sender>,
    /// Store listener, present while anyone is subscribed
    listener: Option<ListenerId>,
}

struct Shared {
    cache: Arc<WeatherCache>,
    state: Mutex<State>,
    next_subscriber_id: AtomicU64,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn process_change(&self, key: &str) {
        let (version, current) = {
            let state = self.lock();
            (state.version, state.presentation.clone())
        };
        if let Some(updated) = current.with_change(&self.cache, key) {
            self.publish(version, updated);
        }
    }

    /// Installs `presentation` if the version is still `expected_version`
    fn publish(&self, expected_version: u64, presentation: WeatherPresentation) -> bool {
        let mut state = self.lock();
        if state.version != expected_version {
            debug!(
                "Discarding superseded presentation (version {} is now {})",
                expected_version, state.version
            );
            return false;
        }
        state.version += 1;
        let snapshot = Arc::new(presentation);
        state.presentation = snapshot.clone();
        state
            .subscribers
            .retain(|_, tx| tx.send(snapshot.clone()).is_ok());
        if state.subscribers.is_empty() {
            self.detach(&mut state);
        }
        true
    }

    fn remove_subscriber(&self, id: u64) {
        let mut state = self.lock();
        state.subscribers.remove(&id);
        if state.subscribers.is_empty() {
            self.detach(&mut state);
        }
    }

    fn detach(&self, state: &mut State) {
        if let Some(listener) = state.listener.take() {
            self.cache.store().remove_listener(listener);
            debug!("Detached weather store listener");
        }
    }
}

/// Observable view over a [`WeatherCache`]
#[derive(Clone)]
pub struct WeatherRepository {
    shared: Arc<Shared>,
}

impl WeatherRepository {
    pub fn new(cache: Arc<WeatherCache>) -> Self {
        Self {
            shared: Arc::new(Shared {
                cache,
                state: Mutex::new(State {
                    version: 0,
                    presentation: Arc::new(WeatherPresentation::default()),
                    subscribers: HashMap::new(),
                    listener: None,
                }),
                next_subscriber_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn cache(&self) -> &Arc<WeatherCache> {
        &self.shared.cache
    }

    /// Registers a subscriber
    ///
    /// The current presentation is queued on the returned subscription
    /// straight away. Must be called from within a tokio runtime.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.shared.next_subscriber_id.fetch_add(1, Ordering::Relaxed);

        let mut state = self.shared.lock();
        if state.listener.is_none() {
            state.version += 1;
            state.presentation = Arc::new(WeatherPresentation::load(&self.shared.cache));
            state.listener = Some(self.attach_listener());
        }
        // The receiver is alive, so this cannot fail
        let _ = tx.send(state.presentation.clone());
        state.subscribers.insert(id, tx);

        Subscription {
            id,
            receiver: rx,
            shared: self.shared.clone(),
        }
    }

    /// Latest presentation
    ///
    /// Without subscribers nothing keeps the presentation current, so it is
    /// rebuilt from the store.
    pub fn current(&self) -> Arc<WeatherPresentation> {
        let state = self.shared.lock();
        if state.listener.is_some() {
            state.presentation.clone()
        } else {
            Arc::new(WeatherPresentation::load(&self.shared.cache))
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.lock().subscribers.len()
    }

    fn attach_listener(&self) -> ListenerId {
        let (key_tx, mut key_rx) = mpsc::unbounded_channel::<String>();
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);

        tokio::spawn(async move {
            while let Some(key) = key_rx.recv().await {
                let Some(shared) = shared.upgrade() else {
                    break;
                };
                shared.process_change(&key);
            }
            debug!("Weather change worker stopped");
        });

        debug!("Attached weather store listener");
        self.shared.cache.store().add_listener(Arc::new(move |key: &str| {
            let _ = key_tx.send(key.to_string());
        }))
    }
}

/// A live subscription; dropping it unsubscribes
pub struct Subscription {
    id: u64,
    receiver: mpsc::UnboundedReceiver<Arc<WeatherPresentation>>,
    shared: Arc<Shared>,
}

impl Subscription {
    /// Waits for the next presentation
    pub async fn recv(&mut self) -> Option<Arc<WeatherPresentation>> {
        self.receiver.recv().await
    }

    /// Next queued presentation, if any
    pub fn try_recv(&mut self) -> Option<Arc<WeatherPresentation>> {
        self.receiver.try_recv().ok()
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.shared.remove_subscriber(self.id);
    }
}
