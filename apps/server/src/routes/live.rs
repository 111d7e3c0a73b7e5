// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server-Sent Events feed of cache refreshes.

use std::convert::Infallible;

use async_stream::stream;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use tokio::sync::broadcast::error::RecvError;

use crate::AppState;

/// GET /api/v1/live - One `data:` frame per [`LiveEvent`](crate::types::LiveEvent).
pub async fn stream(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.live.subscribe();
    tracing::debug!(subscribers = state.live.receiver_count(), "Live subscriber connected");

    let events = stream! {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => {
                        tracing::trace!(view = event.view(), "Forwarding live event");
                        yield Ok(Event::default().data(json));
                    }
                    Err(e) => tracing::error!(error = %e, "Failed to encode live event"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Live subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(events).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockBackend;
    use crate::types::LiveEvent;
    use futures::StreamExt;
    use std::time::Duration;

    #[tokio::test]
    async fn test_live_stream_forwards_events() {
        let mock = MockBackend::spawn(vec![]).await;
        let state = mock.app_state();

        let response = axum::response::IntoResponse::into_response(stream(State(state.clone())).await);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "text/event-stream"
        );

        let mut body = response.into_body().into_data_stream();
        state.publish(LiveEvent::Invalidated {
            table: "ar_rooms".into(),
        });

        let chunk = tokio::time::timeout(Duration::from_secs(2), body.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let text = String::from_utf8(chunk.to_vec()).unwrap();
        assert!(text.starts_with("data: "));
        assert!(text.contains(r#""type":"invalidated""#));
        assert!(text.contains(r#""table":"ar_rooms""#));
    }
}
