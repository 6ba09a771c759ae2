//! Voice-platform request and response envelopes.
//!
//! Only the fields the skill reads are modelled; anything else in the
//! platform's JSON is ignored.

use crate::intent::IntentRequest;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const LAUNCH_REQUEST: &str = "LaunchRequest";
pub const INTENT_REQUEST: &str = "IntentRequest";
pub const SESSION_ENDED_REQUEST: &str = "SessionEndedRequest";

/// Body of `POST /skill`.
#[derive(Debug, Deserialize)]
pub struct RequestEnvelope {
    pub request: PlatformRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformRequest {
    #[serde(rename = "type")]
    pub request_type: String,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub intent: Option<PlatformIntent>,
}

#[derive(Debug, Deserialize)]
pub struct PlatformIntent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, PlatformSlot>,
}

#[derive(Debug, Deserialize)]
pub struct PlatformSlot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl PlatformRequest {
    /// Intent carried by an `IntentRequest`, with unfilled slots dropped.
    pub fn to_intent_request(&self) -> Option<IntentRequest> {
        let intent = self.intent.as_ref()?;
        let slots = intent
            .slots
            .iter()
            .filter_map(|(key, slot)| {
                let value = slot.value.clone()?;
                let name = slot.name.clone().unwrap_or_else(|| key.clone());
                Some((name, value))
            })
            .collect();
        Some(IntentRequest {
            intent_name: intent.name.clone(),
            slots,
            locale: self.locale.clone(),
        })
    }
}

/// Body answered by `POST /skill`.
#[derive(Debug, Serialize)]
pub struct ResponseEnvelope {
    pub version: &'static str,
    pub response: ResponseBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    pub should_end_session: bool,
}

#[derive(Debug, Serialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: &'static str,
    pub text: String,
}

impl ResponseEnvelope {
    /// Plain-text speech that ends the session.
    pub fn speak(text: String) -> Self {
        Self {
            version: "1.0",
            response: ResponseBody {
                output_speech: Some(OutputSpeech {
                    speech_type: "PlainText",
                    text,
                }),
                should_end_session: true,
            },
        }
    }

    /// No speech; used to acknowledge a session end.
    pub fn empty() -> Self {
        Self {
            version: "1.0",
            response: ResponseBody {
                output_speech: None,
                should_end_session: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_intent_request_conversion() {
        let envelope: RequestEnvelope = serde_json::from_value(json!({
            "version": "1.0",
            "session": {"new": true},
            "request": {
                "type": "IntentRequest",
                "requestId": "req-1",
                "locale": "en-US",
                "intent": {
                    "name": "TurnDeviceOffIntent",
                    "slots": {
                        "Device": {"name": "Device", "value": "Lamp"},
                        "Unused": {"name": "Unused"}
                    }
                }
            }
        }))
        .unwrap();

        assert_eq!(envelope.request.request_id.as_deref(), Some("req-1"));
        let request = envelope.request.to_intent_request().unwrap();
        assert_eq!(request.intent_name, "TurnDeviceOffIntent");
        assert_eq!(request.slot("Device"), Some("Lamp"));
        assert_eq!(request.slots.len(), 1);
        assert_eq!(request.locale.as_deref(), Some("en-US"));
    }

    #[test]
    fn test_launch_request_has_no_intent() {
        let envelope: RequestEnvelope = serde_json::from_value(json!({
            "request": {"type": "LaunchRequest"}
        }))
        .unwrap();
        assert_eq!(envelope.request.request_type, LAUNCH_REQUEST);
        assert!(envelope.request.to_intent_request().is_none());
    }

    #[test]
    fn test_speak_serialization() {
        let value = serde_json::to_value(ResponseEnvelope::speak("The Lamp is now off.".to_string()))
            .unwrap();
        assert_eq!(
            value,
            json!({
                "version": "1.0",
                "response": {
                    "outputSpeech": {"type": "PlainText", "text": "The Lamp is now off."},
                    "shouldEndSession": true
                }
            })
        );
    }

    #[test]
    fn test_empty_serialization() {
        let value = serde_json::to_value(ResponseEnvelope::empty()).unwrap();
        assert_eq!(
            value,
            json!({"version": "1.0", "response": {"shouldEndSession": true}})
        );
    }
}
