//! Server-Sent Events (SSE) stream for real-time updates.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use knxbell_app::ports::{BusTransport, HistoryLog};
use knxbell_domain::event::{AccessoryEvent, EventKind};
use knxbell_domain::id::{AccessoryId, EventId};
use knxbell_domain::time::Timestamp;

use crate::state::AppState;

/// One `data:` frame of the event stream.
///
/// `value` is the characteristic value the event stands for: the
/// programmable-switch value of a press, or the contact-sensor value of a
/// contact write.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventFrame {
    pub id: EventId,
    pub accessory_id: AccessoryId,
    #[serde(flatten)]
    pub kind: EventKind,
    pub value: u8,
    pub timestamp: Timestamp,
}

impl From<AccessoryEvent> for EventFrame {
    fn from(event: AccessoryEvent) -> Self {
        let value = match event.kind {
            EventKind::Pressed { press } => press.switch_event_value(),
            EventKind::ContactChanged { state } => state.sensor_value(),
        };
        Self {
            id: event.id,
            accessory_id: event.accessory_id,
            kind: event.kind,
            value,
            timestamp: event.timestamp,
        }
    }
}

/// `GET /api/events/stream`: SSE stream of accessory events.
///
/// Each press and each contact write is sent as a JSON [`EventFrame`] whose
/// SSE id is the event id. The stream continues until the client
/// disconnects or the event bus is closed.
pub async fn stream<H, B>(
    State(state): State<AppState<H, B>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    H: HistoryLog + Send + Sync + 'static,
    B: BusTransport + Send + Sync + 'static,
{
    let event_rx = state.event_bus.subscribe();
    let event_stream = BroadcastStream::new(event_rx).filter_map(|result| match result {
        Ok(event) => {
            let id = event.id.to_string();
            match serde_json::to_string(&EventFrame::from(event)) {
                Ok(json) => Some(Ok(Event::default().id(id).data(json))),
                Err(err) => {
                    tracing::warn!(%err, "failed to serialize event to JSON for SSE stream");
                    None
                }
            }
        }
        Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(
                skipped = n,
                "SSE subscriber lagged, some events were dropped"
            );
            None
        }
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}
