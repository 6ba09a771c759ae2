//! Intent handlers.
//!
//! All three voice intents follow one template: read a slot, resolve it to
//! an entity, run the kind's mutation, speak the outcome. [`IntentHandler`]
//! is that template; the constructors below are its three instances.

use crate::backend::Backend;
use crate::entity::EntityKind;
use crate::i18n::{Locale, Translator};
use crate::resolver::EntityResolver;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{info, warn};


pub const TURN_DEVICE_OFF_INTENT: &str = "TurnDeviceOffIntent";
pub const ACTIVATE_SCENE_INTENT: &str = "ActivateSceneIntent";
pub const SET_ROOM_INTENT: &str = "SetRoomIntent";

/// A single intent as delivered by the voice platform.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IntentRequest {
    pub intent_name: String,
    #[serde(default)]
    pub slots: HashMap<String, String>,
    #[serde(default)]
    pub locale: Option<String>,
}

impl IntentRequest {
    pub fn new(intent_name: &str) -> Self {
        Self {
            intent_name: intent_name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_slot(mut self, name: &str, value: &str) -> Self {
        self.slots.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = Some(locale.to_string());
        self
    }

    /// Slot value, treating an empty value as absent.
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// The three phrases an intent can answer with.
///
/// `success` and `failure` contain a `{<placeholder>}` for the slot text;
/// `unrecognized` is spoken as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    pub success: &'static str,
    pub failure: &'static str,
    pub unrecognized: &'static str,
}

/// How a handled intent ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Entity resolved and the backend reported success.
    Performed,
    /// Entity resolved but the backend reported failure.
    Failed,
    /// No entity matched the slot text.
    Unrecognized,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Performed => "performed",
            Outcome::Failed => "failed",
            Outcome::Unrecognized => "unrecognized",
        }
    }
}

/// Spoken answer plus how the intent ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandledIntent {
    pub speech: String,
    pub outcome: Outcome,
}

/// Errors that prevent an intent from producing its own answer.
#[derive(Debug)]
pub enum HandleError {
    /// The request lacks the handler's slot.
    MissingSlot(String),
    /// Reading from or writing to the backend failed.
    Backend(anyhow::Error),
}

impl fmt::Display for HandleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleError::MissingSlot(slot) => write!(f, "missing slot '{}'", slot),
            HandleError::Backend(e) => write!(f, "backend failure: {:#}", e),
        }
    }
}

impl std::error::Error for HandleError {}

impl From<anyhow::Error> for HandleError {
    fn from(e: anyhow::Error) -> Self {
        HandleError::Backend(e)
    }
}

/// One intent: slot → entity → mutation → phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentHandler {
    intent_name: &'static str,
    slot_name: &'static str,
    placeholder: &'static str,
    kind: EntityKind,
    messages: Messages,
}

impl IntentHandler {
    pub fn new(
        intent_name: &'static str,
        slot_name: &'static str,
        placeholder: &'static str,
        kind: EntityKind,
        messages: Messages,
    ) -> Self {
        Self {
            intent_name,
            slot_name,
            placeholder,
            kind,
            messages,
        }
    }

    /// "Turn off the lamp."
    pub fn turn_device_off() -> Self {
        Self::new(
            TURN_DEVICE_OFF_INTENT,
            "Device",
            "device_name",
            EntityKind::Device,
            Messages {
                success: "The {device_name} is now off.",
                failure: "I am sorry, but I was unable to turn the {device_name} off. Please try again later.",
                unrecognized: "I am sorry, but I do not recognize that device name. Please try again with a different device name.",
            },
        )
    }

    /// "Activate the movie scene."
    pub fn activate_scene() -> Self {
        Self::new(
            ACTIVATE_SCENE_INTENT,
            "Scene",
            "scene_name",
            EntityKind::Scene,
            Messages {
                success: "The {scene_name} scene has been activated.",
                failure: "I am sorry, but I was unable to activate the {scene_name} scene. Please try again later.",
                unrecognized: "I am sorry, but I do not recognize that scene name. Please try again with a different scene name.",
            },
        )
    }

    /// "Set the room to kitchen."
    pub fn set_room() -> Self {
        Self::new(
            SET_ROOM_INTENT,
            "Room",
            "room_name",
            EntityKind::Room,
            Messages {
                success: "The {room_name} room has been set.",
                failure: "I am sorry, but I was unable to set the {room_name} room. Please try again later.",
                unrecognized: "I am sorry, but I do not recognize that room name. Please try again with a different room name.",
            },
        )
    }

    /// The handlers the skill ships with.
    pub fn builtin() -> Vec<IntentHandler> {
        vec![
            Self::turn_device_off(),
            Self::activate_scene(),
            Self::set_room(),
        ]
    }

    pub fn intent_name(&self) -> &'static str {
        self.intent_name
    }

    pub fn slot_name(&self) -> &'static str {
        self.slot_name
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn can_handle(&self, request: &IntentRequest) -> bool {
        request.intent_name == self.intent_name
    }

    /// Handles `request` in `locale`, phrasing the answer with `translator`.
    ///
    /// Issues exactly one mutation when the slot resolves and none when it
    /// does not. A backend `success == false` is answered with the failure
    /// phrase, not returned as an error.
    pub async fn handle(
        &self,
        request: &IntentRequest,
        locale: &Locale,
        backend: &dyn Backend,
        translator: &Translator<'_>,
    ) -> Result<HandledIntent, HandleError> {
        let slot_value = request
            .slot(self.slot_name)
            .ok_or_else(|| HandleError::MissingSlot(self.slot_name.to_string()))?;

        let resolver = EntityResolver::new(backend);
        let Some(entity) = resolver.resolve(self.kind, slot_value, locale).await? else {
            info!(intent = %self.intent_name, label = %slot_value, "No entity matches label");
            return Ok(HandledIntent {
                speech: translator.translate(self.messages.unrecognized).to_string(),
                outcome: Outcome::Unrecognized,
            });
        };

        let result = backend.mutate(self.kind, &entity.id).await?;
        let args = [(self.placeholder, slot_value)];
        let handled = if result.success {
            HandledIntent {
                speech: translator.format(self.messages.success, &args),
                outcome: Outcome::Performed,
            }
        } else {
            warn!(
                intent = %self.intent_name,
                entity_id = %entity.id,
                mutation = %self.kind.mutation(),
                "Backend reported mutation failure"
            );
            HandledIntent {
                speech: translator.format(self.messages.failure, &args),
                outcome: Outcome::Failed,
            }
        };

        info!(
            intent = %self.intent_name,
            entity_id = %entity.id,
            outcome = handled.outcome.as_str(),
            "Intent handled"
        );
        Ok(handled)
    }
}
