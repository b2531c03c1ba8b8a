use crate::state::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures_util::{Stream, StreamExt};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/events", get(stream_events))
}

/// GET /v1/events
/// Every interaction event from every session, as it is emitted
pub async fn stream_events(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(record) => match Event::default().event(record.event.name()).json_data(&record) {
                Ok(event) => Some(Ok(event)),
                Err(err) => {
                    warn!("Failed to encode event {}: {}", record.id, err);
                    None
                }
            },
            Err(err) => {
                warn!("Event subscriber lagged: {}", err);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
