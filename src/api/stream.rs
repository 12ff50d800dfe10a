//! Live collection snapshots as Server-Sent Events

use std::convert::Infallible;

use axum::response::sse::{Event, KeepAlive, Sse};
use serde::Serialize;
use tokio_stream::{wrappers::WatchStream, Stream, StreamExt};

use crate::{
    repository::{Collection, Document},
    store::Subscription,
};

/// Name of the event carrying a full collection snapshot
pub const SNAPSHOT_EVENT: &str = "snapshot";

/// Send the decoded collection on connect and after every change.
///
/// `arrange` filters or orders each snapshot before it is sent.
pub fn snapshot_events<T, F>(
    subscription: Subscription,
    arrange: F,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    T: Document + Serialize,
    F: Fn(Vec<T>) -> Vec<T> + Send + 'static,
{
    let stream = WatchStream::new(subscription).map(move |snapshot| {
        let items = arrange(Collection::<T>::decode_all(&snapshot));
        let event = Event::default()
            .event(SNAPSHOT_EVENT)
            .json_data(&items)
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to encode {} snapshot: {}", T::COLLECTION, e);
                Event::default().event("error").data("snapshot encoding failed")
            });
        Ok(event)
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
