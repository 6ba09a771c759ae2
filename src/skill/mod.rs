//! Skill dispatcher.
//!
//! Wraps every request in the same steps: derive the locale, select the
//! catalog for this request only, route to the first matching handler, and
//! turn anything that went wrong into a spoken sentence. Callers always get
//! speech back, never an error.

use crate::backend::Backend;
use crate::i18n::{CatalogStore, Locale, Translator};
use crate::intent::{HandleError, IntentHandler, IntentRequest, Outcome};
use std::sync::Arc;
use tracing::{error, info, warn};

#[cfg(test)]
mod tests;

pub const WELCOME_MESSAGE: &str =
    "Welcome. You can ask me to turn off a device, activate a scene or set a room.";
pub const FALLBACK_MESSAGE: &str = "Sorry, I don't know how to help with that.";
pub const GENERIC_ERROR_MESSAGE: &str = "I am sorry, something went wrong. Please try again later.";

/// Speech produced for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillResponse {
    pub speech: String,
    /// Language of the catalog the speech was phrased with.
    pub language: String,
    /// `None` when no handler ran to completion.
    pub outcome: Option<Outcome>,
}

/// Routes intents to handlers.
///
/// Holds no per-request state, so one instance can serve concurrent
/// requests.
pub struct Skill {
    handlers: Vec<IntentHandler>,
    backend: Arc<dyn Backend>,
    catalogs: Arc<CatalogStore>,
    default_locale: Locale,
}

impl Skill {
    /// Skill with the built-in handlers.
    pub fn new(backend: Arc<dyn Backend>, catalogs: Arc<CatalogStore>, default_locale: Locale) -> Self {
        Self::with_handlers(IntentHandler::builtin(), backend, catalogs, default_locale)
    }

    pub fn with_handlers(
        handlers: Vec<IntentHandler>,
        backend: Arc<dyn Backend>,
        catalogs: Arc<CatalogStore>,
        default_locale: Locale,
    ) -> Self {
        Self {
            handlers,
            backend,
            catalogs,
            default_locale,
        }
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn handlers(&self) -> &[IntentHandler] {
        &self.handlers
    }

    /// Effective locale for a request.
    pub fn locale_for(&self, requested: Option<&str>) -> Locale {
        Locale::from_request(requested, &self.default_locale)
    }

    /// Catalog for a request locale, falling back to the default language.
    pub fn translator_for(&self, locale: &Locale) -> Translator<'_> {
        self.catalogs.select(locale)
    }

    /// Answers a launch without an intent.
    pub fn welcome(&self, requested_locale: Option<&str>) -> SkillResponse {
        self.speak(requested_locale, WELCOME_MESSAGE)
    }

    /// Answers a request no handler can take.
    pub fn fallback(&self, requested_locale: Option<&str>) -> SkillResponse {
        self.speak(requested_locale, FALLBACK_MESSAGE)
    }

    fn speak(&self, requested_locale: Option<&str>, msgid: &'static str) -> SkillResponse {
        let locale = self.locale_for(requested_locale);
        let translator = self.translator_for(&locale);
        SkillResponse {
            speech: translator.translate(msgid).to_string(),
            language: translator.language().to_string(),
            outcome: None,
        }
    }

    /// Handles one intent request.
    pub async fn dispatch(&self, request: &IntentRequest) -> SkillResponse {
        let locale = self.locale_for(request.locale.as_deref());
        let translator = self.translator_for(&locale);

        let Some(handler) = self.handlers.iter().find(|h| h.can_handle(request)) else {
            info!(intent = %request.intent_name, "No handler for intent");
            return SkillResponse {
                speech: translator.translate(FALLBACK_MESSAGE).to_string(),
                language: translator.language().to_string(),
                outcome: None,
            };
        };

        info!(
            intent = %request.intent_name,
            locale = %locale,
            catalog = %translator.language(),
            "Dispatching intent"
        );

        match handler
            .handle(request, &locale, self.backend.as_ref(), &translator)
            .await
        {
            Ok(handled) => SkillResponse {
                speech: handled.speech,
                language: translator.language().to_string(),
                outcome: Some(handled.outcome),
            },
            Err(e) => {
                match &e {
                    HandleError::MissingSlot(_) => {
                        warn!(intent = %request.intent_name, error = %e, "Intent arrived without its slot")
                    }
                    HandleError::Backend(_) => {
                        error!(intent = %request.intent_name, error = %e, "Backend call failed")
                    }
                }
                SkillResponse {
                    speech: translator.translate(GENERIC_ERROR_MESSAGE).to_string(),
                    language: translator.language().to_string(),
                    outcome: None,
                }
            }
        }
    }
}
