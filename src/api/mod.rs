//! HTTP API.
//!
//! - `POST /skill`: voice-platform webhook
//! - `GET /devices`, `GET /scenes`, `GET /rooms`: entity listings (token protected)
//! - `GET /health`

pub mod entities;
pub mod envelope;
mod webhook;

use crate::skill::Skill;
use axum::{
    http::{header, Method},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared state for the API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub skill: Arc<Skill>,
    /// Token required by the entity listings; `None` leaves them open.
    pub auth_token: Option<String>,
}

pub fn create_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .route("/skill", post(webhook::post_skill))
        .route("/devices", get(entities::list_devices))
        .route("/scenes", get(entities::list_scenes))
        .route("/rooms", get(entities::list_rooms))
        .route("/health", get(health))
        .layer(cors)
        .with_state(Arc::new(state))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
