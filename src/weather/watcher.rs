//! Debounced forecast lookups.
//!
//! The reminder form re-fires a lookup on every keystroke in the city, date
//! or time inputs. The watcher waits out a quiet period before issuing any
//! request, and tags every lookup with a generation number so that a
//! superseded request is cancelled before it hits the network, and a stale
//! response can never overwrite the result of a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use tokio::task::JoinHandle;

use super::client::ForecastSource;
use super::Forecast;

/// How long the inputs must stay unchanged before a request goes out
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// One stabilized set of lookup inputs
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastRequest {
    pub city: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Debounces forecast lookups against a [`ForecastSource`] and keeps the
/// most recently applied forecast.
pub struct ForecastWatcher<S> {
    source: Arc<S>,
    /// Bumped on every input change; a lookup only proceeds while its own
    /// generation is still the latest one
    generation: Arc<AtomicU64>,
    applied: Arc<Mutex<Option<Forecast>>>,
}

impl<S: ForecastSource + Send + Sync + 'static> ForecastWatcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            generation: Arc::new(AtomicU64::new(0)),
            applied: Arc::new(Mutex::new(None)),
        }
    }

    /// Report a change of the lookup inputs.
    ///
    /// Schedules a lookup for after the quiet period and returns its handle.
    /// The handle resolves to the forecast this lookup applied, or `None`
    /// when the lookup was superseded by a newer change, the city was blank,
    /// the service failed, or no entry fell on the requested day. Awaiting
    /// the handle is optional; [`current`](Self::current) always holds the
    /// freshest applied forecast.
    pub fn input_changed(&self, request: ForecastRequest) -> JoinHandle<Option<Forecast>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = Arc::clone(&self.generation);
        let source = Arc::clone(&self.source);
        let applied = Arc::clone(&self.applied);

        tokio::spawn(async move {
            tokio::time::sleep(DEBOUNCE_DELAY).await;
            if latest.load(Ordering::SeqCst) != generation {
                // a newer change arrived within the quiet period: no request
                return None;
            }
            if request.city.trim().is_empty() {
                return None;
            }

            let response = match source.fetch_forecast(&request.city).await {
                Ok(response) => response,
                Err(err) => {
                    log::debug!("No forecast for {:?}: {}", request.city, err);
                    return None;
                }
            };
            let forecast = response.closest_to(request.date, request.time)?;

            let mut slot = match applied.lock() {
                Ok(slot) => slot,
                Err(err) => {
                    log::warn!("Forecast slot is poisoned: {}", err);
                    return None;
                }
            };
            if latest.load(Ordering::SeqCst) != generation {
                // a newer lookup already resolved; this result is stale
                return None;
            }
            *slot = Some(forecast.clone());
            Some(forecast)
        })
    }

    /// The most recently applied forecast, if any
    pub fn current(&self) -> Option<Forecast> {
        self.applied.lock().ok().and_then(|slot| slot.clone())
    }
}
