//! Custom characteristic descriptors.

use axum::Json;

use knxbell_domain::characteristic::{CUSTOM_CHARACTERISTICS, CharacteristicDescriptor};

/// `GET /api/characteristics`
pub async fn list() -> Json<Vec<CharacteristicDescriptor>> {
    Json(CUSTOM_CHARACTERISTICS.to_vec())
}
