//! HTTP handler for the change-notification feed
//!
//! Exposes the in-process change notifier as a server-sent-events stream per
//! collection. Events are payload-less signals; clients re-read the
//! collection on every event.

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::AppState;
use shared::types::Collection;

/// Subscribe to change signals for one collection
pub async fn subscribe_changes(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(collection): Path<String>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let collection: Collection = collection
        .parse()
        .map_err(|_| AppError::NotFound("Collection".to_string()))?;

    let rx = state.notifier.subscribe(collection);

    // A lagged receiver also maps to a change event: re-reading once more is
    // always safe for a payload-less signal.
    let stream = BroadcastStream::new(rx)
        .map(move |_| Ok(Event::default().event("change").data(collection.as_str())));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
