use super::envelope::{
    RequestEnvelope, ResponseEnvelope, INTENT_REQUEST, LAUNCH_REQUEST, SESSION_ENDED_REQUEST,
};
use super::ApiState;
use axum::{extract::State, response::Json};
use std::sync::Arc;
use tracing::{debug, info};

/// POST /skill - Answer one voice-platform request
///
/// Always answers 200 with speech; failures inside the skill are spoken.
pub async fn post_skill(
    State(state): State<Arc<ApiState>>,
    Json(envelope): Json<RequestEnvelope>,
) -> Json<ResponseEnvelope> {
    let request = envelope.request;
    debug!(
        request_type = %request.request_type,
        request_id = request.request_id.as_deref().unwrap_or("-"),
        "Skill request received"
    );

    let locale = request.locale.as_deref();
    let response = match request.request_type.as_str() {
        LAUNCH_REQUEST => ResponseEnvelope::speak(state.skill.welcome(locale).speech),
        INTENT_REQUEST => match request.to_intent_request() {
            Some(intent) => ResponseEnvelope::speak(state.skill.dispatch(&intent).await.speech),
            None => ResponseEnvelope::speak(state.skill.fallback(locale).speech),
        },
        SESSION_ENDED_REQUEST => ResponseEnvelope::empty(),
        other => {
            info!(request_type = %other, "Unsupported request type");
            ResponseEnvelope::speak(state.skill.fallback(locale).speech)
        }
    };

    Json(response)
}
