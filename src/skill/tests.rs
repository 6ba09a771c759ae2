use super::*;
use crate::backend::InMemoryBackend;
use crate::entity::{Entity, EntityKind, Label};
use crate::i18n::Catalog;

fn skill_with(backend: InMemoryBackend, catalogs: CatalogStore) -> (Skill, Arc<InMemoryBackend>) {
    let backend = Arc::new(backend);
    let skill = Skill::new(backend.clone(), Arc::new(catalogs), Locale::default());
    (skill, backend)
}

fn lamp_backend() -> InMemoryBackend {
    InMemoryBackend::new().with_entities(
        EntityKind::Device,
        vec![
            Entity::new("dev-1", vec![Label::tagged("Lamp", "en-US")]),
            Entity::new("dev-2", vec![Label::tagged("Lampe", "de-DE")]),
        ],
    )
}

fn german_catalogs() -> CatalogStore {
    let mut store = CatalogStore::new();
    store.insert(Catalog::with_messages(
        "de",
        [
            ("The {device_name} is now off.", "{device_name} ist jetzt aus."),
            (
                "I am sorry, something went wrong. Please try again later.",
                "Entschuldigung, da ist etwas schiefgelaufen. Bitte versuche es später noch einmal.",
            ),
        ],
    ));
    store
}

#[tokio::test]
async fn test_dispatch_turn_device_off() {
    let (skill, backend) = skill_with(lamp_backend(), CatalogStore::new());
    let request = IntentRequest::new("TurnDeviceOffIntent")
        .with_slot("Device", "Lamp")
        .with_locale("en-US");

    let response = skill.dispatch(&request).await;

    assert_eq!(response.speech, "The Lamp is now off.");
    assert_eq!(response.language, "en");
    assert_eq!(response.outcome, Some(Outcome::Performed));
    assert_eq!(backend.mutations(), vec![(EntityKind::Device, "dev-1".to_string())]);
}

#[tokio::test]
async fn test_dispatch_without_locale_uses_default() {
    let (skill, _backend) = skill_with(lamp_backend(), CatalogStore::new());
    let request = IntentRequest::new("TurnDeviceOffIntent").with_slot("Device", "Lamp");

    let response = skill.dispatch(&request).await;

    // "Lamp" is tagged "en-US", which only matches because the default en-US applied.
    assert_eq!(response.speech, "The Lamp is now off.");
}

#[tokio::test]
async fn test_dispatch_unknown_locale_falls_back_to_english() {
    let (skill, _backend) = skill_with(lamp_backend(), german_catalogs());
    let request = IntentRequest::new("TurnDeviceOffIntent")
        .with_slot("Device", "Lamp")
        .with_locale("fr-FR");

    let response = skill.dispatch(&request).await;

    assert_eq!(response.language, "en");
    // Tagged "en" does not match fr-FR.
    assert_eq!(response.outcome, Some(Outcome::Unrecognized));
}

#[tokio::test]
async fn test_catalog_is_request_scoped() {
    let (skill, _backend) = skill_with(lamp_backend(), german_catalogs());

    let german = IntentRequest::new("TurnDeviceOffIntent")
        .with_slot("Device", "Lampe")
        .with_locale("de-DE");
    let english = IntentRequest::new("TurnDeviceOffIntent")
        .with_slot("Device", "Lamp")
        .with_locale("en-US");

    let (de, en) = tokio::join!(skill.dispatch(&german), skill.dispatch(&english));

    assert_eq!(de.speech, "Lampe ist jetzt aus.");
    assert_eq!(de.language, "de");
    assert_eq!(en.speech, "The Lamp is now off.");
    assert_eq!(en.language, "en");
}

#[tokio::test]
async fn test_dispatch_unknown_intent() {
    let (skill, backend) = skill_with(lamp_backend(), CatalogStore::new());
    let request = IntentRequest::new("OrderPizzaIntent");

    let response = skill.dispatch(&request).await;

    assert_eq!(response.speech, FALLBACK_MESSAGE);
    assert_eq!(response.outcome, None);
    assert_eq!(backend.list_calls(), 0);
}

#[tokio::test]
async fn test_dispatch_only_routes_registered_handlers() {
    let backend = Arc::new(lamp_backend());
    let skill = Skill::with_handlers(
        vec![IntentHandler::activate_scene()],
        backend.clone(),
        Arc::new(CatalogStore::new()),
        Locale::default(),
    );
    assert_eq!(skill.handlers().len(), 1);
    assert_eq!(skill.handlers()[0].intent_name(), "ActivateSceneIntent");

    let request = IntentRequest::new("TurnDeviceOffIntent").with_slot("Device", "Lamp");
    let response = skill.dispatch(&request).await;

    assert_eq!(response.speech, FALLBACK_MESSAGE);
    assert!(backend.mutations().is_empty());
}

#[tokio::test]
async fn test_dispatch_mutation_failure_speaks_generic_error() {
    let (skill, backend) = skill_with(lamp_backend().with_failing_mutations(), CatalogStore::new());
    let request = IntentRequest::new("TurnDeviceOffIntent")
        .with_slot("Device", "Lamp")
        .with_locale("en-US");

    let response = skill.dispatch(&request).await;

    assert_eq!(response.speech, GENERIC_ERROR_MESSAGE);
    assert_eq!(response.outcome, None);
    assert_eq!(backend.list_calls(), 1);
}

#[tokio::test]
async fn test_dispatch_backend_down_speaks_generic_error() {
    let (skill, _backend) = skill_with(lamp_backend().unavailable(), german_catalogs());
    let request = IntentRequest::new("TurnDeviceOffIntent")
        .with_slot("Device", "Lampe")
        .with_locale("de-DE");

    let response = skill.dispatch(&request).await;

    assert_eq!(
        response.speech,
        "Entschuldigung, da ist etwas schiefgelaufen. Bitte versuche es später noch einmal."
    );
    assert_eq!(response.outcome, None);
}

#[tokio::test]
async fn test_dispatch_missing_slot_speaks_generic_error() {
    let (skill, backend) = skill_with(lamp_backend(), CatalogStore::new());
    let request = IntentRequest::new("SetRoomIntent");

    let response = skill.dispatch(&request).await;

    assert_eq!(response.speech, GENERIC_ERROR_MESSAGE);
    assert!(backend.mutations().is_empty());
}

#[test]
fn test_welcome_and_fallback() {
    let (skill, _backend) = skill_with(InMemoryBackend::new(), CatalogStore::new());
    assert_eq!(skill.welcome(None).speech, WELCOME_MESSAGE);
    assert_eq!(skill.fallback(Some("de-DE")).speech, FALLBACK_MESSAGE);
    assert_eq!(skill.fallback(Some("de-DE")).language, "en");
}

#[test]
fn test_locale_for() {
    let (skill, _backend) = skill_with(InMemoryBackend::new(), CatalogStore::new());
    assert_eq!(skill.locale_for(None).tag(), "en-US");
    assert_eq!(skill.locale_for(Some("de_DE.UTF-8")).tag(), "de-DE");
}
