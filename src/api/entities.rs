//! Entity listings straight from the backend.

use super::ApiState;
use crate::auth::authorize;
use crate::entity::{Entity, EntityKind};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, warn};

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

/// GET /devices
pub async fn list_devices(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Entity>>, ApiError> {
    list_entities(&state, &headers, EntityKind::Device).await
}

/// GET /scenes
pub async fn list_scenes(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Entity>>, ApiError> {
    list_entities(&state, &headers, EntityKind::Scene).await
}

/// GET /rooms
pub async fn list_rooms(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Entity>>, ApiError> {
    list_entities(&state, &headers, EntityKind::Room).await
}

async fn list_entities(
    state: &ApiState,
    headers: &HeaderMap,
    kind: EntityKind,
) -> Result<Json<Vec<Entity>>, ApiError> {
    authorize(headers, state.auth_token.as_deref()).map_err(|e| {
        warn!(kind = %kind, error = %e, "Rejected entity listing");
        ApiError::Unauthorized
    })?;

    let entities = state.skill.backend().list_entities(kind).await.map_err(|e| {
        error!(kind = %kind, error = %format!("{:#}", e), "Entity listing failed");
        ApiError::Backend(format!("Failed to list {}", kind.collection()))
    })?;

    Ok(Json(entities))
}

pub enum ApiError {
    Unauthorized,
    Backend(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::Backend(msg) => (StatusCode::BAD_GATEWAY, msg),
        };
        (status, Json(MessageResponse { message })).into_response()
    }
}
