//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod accessories;
#[allow(clippy::missing_errors_doc)]
pub mod bus;
pub mod characteristics;
pub mod sse;

use axum::Router;
use axum::routing::{get, post};

use knxbell_app::ports::{BusTransport, HistoryLog};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<H, B>() -> Router<AppState<H, B>>
where
    H: HistoryLog + Send + Sync + 'static,
    B: BusTransport + Send + Sync + 'static,
{
    Router::new()
        .route("/characteristics", get(characteristics::list))
        // Accessories
        .route("/accessories", get(accessories::list::<H, B>))
        .route("/accessories/{id}", get(accessories::get::<H, B>))
        .route(
            "/accessories/{id}/statistics",
            get(accessories::statistics::<H, B>),
        )
        .route(
            "/accessories/{id}/history",
            get(accessories::history::<H, B>),
        )
        .route(
            "/accessories/{id}/contact",
            get(accessories::get_contact::<H, B>).put(accessories::put_contact::<H, B>),
        )
        // Bus
        .route("/bus/write", post(bus::write::<H, B>))
        // Events
        .route("/events/stream", get(sse::stream::<H, B>))
}
