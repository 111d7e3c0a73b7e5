// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scheduled refresh of cached views.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::ApiError;
use crate::types::LiveEvent;
use crate::AppState;

/// Store a freshly fetched view and announce it.
///
/// On failure the cached value is left untouched and a `stale` event goes out
/// instead; the error is returned to the caller.
pub async fn store_view<T: Serialize>(
    state: &AppState,
    view: &str,
    result: Result<T, ApiError>,
) -> Result<T, ApiError> {
    match result {
        Ok(value) => {
            let fetched_at = state.cache.set(view, &value).await?;
            state.publish(LiveEvent::Refreshed {
                view: view.to_string(),
                fetched_at: fetched_at.timestamp_millis(),
            });
            Ok(value)
        }
        Err(e) => {
            tracing::warn!(view = %view, error = %e, "Refresh failed, keeping cached value");
            state.publish(LiveEvent::Stale {
                view: view.to_string(),
                message: e.to_string(),
            });
            Err(e)
        }
    }
}

/// Run `job` every `interval` and cache its result under `view`.
///
/// The first run happens immediately. Ticks missed while the runtime was busy
/// are skipped rather than bunched up. Each run is its own task, so runs may
/// overlap when the backend is slower than the interval.
pub fn spawn_poller<F, Fut, T>(
    state: AppState,
    view: &'static str,
    interval: Duration,
    job: F,
) -> JoinHandle<()>
where
    F: Fn(AppState) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    T: Serialize + Send + Sync + 'static,
{
    let job = Arc::new(job);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(view = view, interval_secs = interval.as_secs(), "Poller started");

        loop {
            ticker.tick().await;
            let state = state.clone();
            let job = Arc::clone(&job);
            tokio::spawn(async move {
                let result = job(state.clone()).await;
                // Failure already logged and published
                let _ = store_view(&state, view, result).await;
            });
        }
    })
}
