//! JSON REST handlers for doorbell accessories.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use knxbell_app::ports::{BusTransport, EventPublisher, HistoryLog};
use knxbell_app::services::DoorbellService;
use knxbell_domain::accessory::{AccessoryInformation, BinarySignal};
use knxbell_domain::characteristic::{CUSTOM_CHARACTERISTICS, Unit};
use knxbell_domain::contact::ContactState;
use knxbell_domain::error::ValidationError;
use knxbell_domain::history::HistorySnapshot;
use knxbell_domain::id::AccessoryId;
use knxbell_domain::statistics::ContactStatistics;

use crate::error::ApiError;
use crate::state::AppState;

/// What the list endpoint reports per accessory.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessorySummary {
    pub id: AccessoryId,
    pub information: AccessoryInformation,
    pub signals: Vec<BinarySignal>,
    pub contact: ContactBody,
}

/// Live contact state with its contact-sensor value.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactBody {
    pub state: ContactState,
    pub value: u8,
}

impl From<ContactState> for ContactBody {
    fn from(state: ContactState) -> Self {
        Self {
            state,
            value: state.sensor_value(),
        }
    }
}

/// One published characteristic value.
#[derive(Debug, Serialize, Deserialize)]
pub struct CharacteristicValue {
    pub name: String,
    pub uuid: String,
    pub value: u32,
    pub unit: Option<Unit>,
}

/// Raw statistics plus their characteristic encoding.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatisticsBody {
    #[serde(flatten)]
    pub statistics: ContactStatistics,
    pub characteristics: Vec<CharacteristicValue>,
}

impl From<ContactStatistics> for StatisticsBody {
    fn from(statistics: ContactStatistics) -> Self {
        let characteristics = CUSTOM_CHARACTERISTICS
            .iter()
            .map(|descriptor| CharacteristicValue {
                name: descriptor.name.to_string(),
                uuid: descriptor.uuid.to_string(),
                value: descriptor.value(&statistics),
                unit: descriptor.unit,
            })
            .collect();
        Self {
            statistics,
            characteristics,
        }
    }
}

/// An accessory with its current statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessoryDetail {
    #[serde(flatten)]
    pub summary: AccessorySummary,
    pub statistics: StatisticsBody,
}

/// Request body for overwriting the contact state.
#[derive(Deserialize)]
pub struct UpdateContactRequest {
    pub state: ContactState,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<AccessorySummary>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<AccessoryDetail>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the statistics endpoint.
pub enum StatisticsResponse {
    Ok(Json<StatisticsBody>),
}

impl IntoResponse for StatisticsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the history endpoint.
pub enum HistoryResponse {
    Ok(Json<HistorySnapshot>),
}

impl IntoResponse for HistoryResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the contact endpoints.
pub enum ContactResponse {
    Ok(Json<ContactBody>),
}

impl IntoResponse for ContactResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

fn parse_id(id: &str) -> Result<AccessoryId, ApiError> {
    AccessoryId::from_str(id)
        .map_err(|_| ApiError::from(ValidationError::InvalidAccessoryId(id.to_string())))
}

fn summarize<H, P>(service: &DoorbellService<H, P>) -> AccessorySummary
where
    H: HistoryLog,
    P: EventPublisher,
{
    let doorbell = service.doorbell();
    AccessorySummary {
        id: doorbell.id,
        information: doorbell.information.clone(),
        signals: doorbell.signals.clone(),
        contact: service.contact_state().into(),
    }
}

/// `GET /api/accessories`
pub async fn list<H, B>(State(state): State<AppState<H, B>>) -> ListResponse
where
    H: HistoryLog + Send + Sync + 'static,
    B: BusTransport + Send + Sync + 'static,
{
    let accessories = state.registry.list().iter().map(summarize).collect();
    ListResponse::Ok(Json(accessories))
}

/// `GET /api/accessories/:id`
pub async fn get<H, B>(
    State(state): State<AppState<H, B>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    H: HistoryLog + Send + Sync + 'static,
    B: BusTransport + Send + Sync + 'static,
{
    let service = state.registry.get(parse_id(&id)?)?;
    let statistics = service.statistics().await?;
    Ok(GetResponse::Ok(Json(AccessoryDetail {
        summary: summarize(service),
        statistics: statistics.into(),
    })))
}

/// `GET /api/accessories/:id/statistics`
pub async fn statistics<H, B>(
    State(state): State<AppState<H, B>>,
    Path(id): Path<String>,
) -> Result<StatisticsResponse, ApiError>
where
    H: HistoryLog + Send + Sync + 'static,
    B: BusTransport + Send + Sync + 'static,
{
    let service = state.registry.get(parse_id(&id)?)?;
    let statistics = service.statistics().await?;
    Ok(StatisticsResponse::Ok(Json(statistics.into())))
}

/// `GET /api/accessories/:id/history`
pub async fn history<H, B>(
    State(state): State<AppState<H, B>>,
    Path(id): Path<String>,
) -> Result<HistoryResponse, ApiError>
where
    H: HistoryLog + Send + Sync + 'static,
    B: BusTransport + Send + Sync + 'static,
{
    let service = state.registry.get(parse_id(&id)?)?;
    let snapshot = service.history().await?;
    Ok(HistoryResponse::Ok(Json(snapshot)))
}

/// `GET /api/accessories/:id/contact`
pub async fn get_contact<H, B>(
    State(state): State<AppState<H, B>>,
    Path(id): Path<String>,
) -> Result<ContactResponse, ApiError>
where
    H: HistoryLog + Send + Sync + 'static,
    B: BusTransport + Send + Sync + 'static,
{
    let service = state.registry.get(parse_id(&id)?)?;
    Ok(ContactResponse::Ok(Json(service.contact_state().into())))
}

/// `PUT /api/accessories/:id/contact`
pub async fn put_contact<H, B>(
    State(state): State<AppState<H, B>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateContactRequest>,
) -> Result<ContactResponse, ApiError>
where
    H: HistoryLog + Send + Sync + 'static,
    B: BusTransport + Send + Sync + 'static,
{
    let service = state.registry.get(parse_id(&id)?)?;
    service.set_contact_state(req.state).await;
    Ok(ContactResponse::Ok(Json(service.contact_state().into())))
}
