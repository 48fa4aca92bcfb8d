//! Group writes on the bus.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use knxbell_app::ports::{BusTransport, HistoryLog};
use knxbell_domain::group_address::GroupAddress;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for a group write.
#[derive(Deserialize)]
pub struct WriteRequest {
    pub address: String,
    pub value: bool,
}

/// Possible responses from the write endpoint.
pub enum WriteResponse {
    Accepted,
}

impl IntoResponse for WriteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted => StatusCode::ACCEPTED.into_response(),
        }
    }
}

/// `POST /api/bus/write`
pub async fn write<H, B>(
    State(state): State<AppState<H, B>>,
    Json(req): Json<WriteRequest>,
) -> Result<WriteResponse, ApiError>
where
    H: HistoryLog + Send + Sync + 'static,
    B: BusTransport + Send + Sync + 'static,
{
    let address: GroupAddress = req.address.parse()?;
    tracing::debug!(%address, value = req.value, "group write requested");
    state.bus.write(address, req.value).await?;
    Ok(WriteResponse::Accepted)
}
