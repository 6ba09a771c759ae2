//! Label → entity resolution.
//!
//! Every call re-fetches the full list for the kind and scans it in backend
//! order. No index, no cache: a home has few enough devices that the scan
//! is negligible next to the round trip.

use crate::backend::Backend;
use crate::entity::{Entity, EntityKind};
use crate::i18n::Locale;
use anyhow::{Context, Result};
use tracing::debug;

/// Resolves slot text to backend entities.
pub struct EntityResolver<'a> {
    backend: &'a dyn Backend,
}

impl<'a> EntityResolver<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    /// First entity of `kind` whose label matches `label` in `locale`.
    ///
    /// `Ok(None)` means nothing matched; backend failures are `Err` and are
    /// not retried.
    pub async fn resolve(
        &self,
        kind: EntityKind,
        label: &str,
        locale: &Locale,
    ) -> Result<Option<Entity>> {
        let entities = self
            .backend
            .list_entities(kind)
            .await
            .with_context(|| format!("Failed to list {}", kind.collection()))?;
        let found = find_by_label(&entities, label, locale).cloned();
        debug!(
            kind = %kind,
            label = %label,
            locale = %locale,
            candidates = entities.len(),
            entity_id = found.as_ref().map(|e| e.id.as_str()).unwrap_or("-"),
            "Label resolved"
        );
        Ok(found)
    }
}

/// Scans `entities` for the first label match.
pub fn find_by_label<'e>(entities: &'e [Entity], label: &str, locale: &Locale) -> Option<&'e Entity> {
    entities.iter().find(|e| e.matches(label, locale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::entity::Label;

    fn en_us() -> Locale {
        Locale::parse("en-US").unwrap()
    }

    fn devices() -> Vec<Entity> {
        vec![
            Entity::new("dev-1", vec![Label::tagged("Lamp", "en-US")]),
            Entity::new("dev-2", vec![Label::tagged("Lampe", "de-DE")]),
            Entity::new("dev-3", vec![Label::new("Fan")]),
            Entity::new("dev-4", vec![Label::new("Lamp")]),
        ]
    }

    fn backend() -> InMemoryBackend {
        InMemoryBackend::new().with_entities(EntityKind::Device, devices())
    }

    #[tokio::test]
    async fn test_resolve_tagged_label() {
        let backend = backend();
        let resolver = EntityResolver::new(&backend);
        let entity = resolver
            .resolve(EntityKind::Device, "Lamp", &en_us())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entity.id, "dev-1");
    }

    #[tokio::test]
    async fn test_resolve_first_match_in_backend_order() {
        let backend = backend();
        let resolver = EntityResolver::new(&backend);
        // dev-1 is tagged "en-US" and does not match German; dev-4 is untagged.
        let entity = resolver
            .resolve(EntityKind::Device, "Lamp", &Locale::parse("de-DE").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entity.id, "dev-4");
    }

    #[test]
    fn test_language_only_tag_yields_to_untagged_label() {
        let entities = vec![
            Entity::new("dev-1", vec![Label::tagged("Lamp", "en")]),
            Entity::new("dev-4", vec![Label::new("Lamp")]),
        ];
        let found = find_by_label(&entities, "Lamp", &en_us());
        assert_eq!(found.map(|e| e.id.as_str()), Some("dev-4"));
    }

    #[test]
    fn test_regional_tag_does_not_match_language_only_locale() {
        let entities = vec![Entity::new("dev-9", vec![Label::tagged("Lamp", "en-US")])];
        assert!(find_by_label(&entities, "Lamp", &Locale::parse("en").unwrap()).is_none());
        assert!(find_by_label(&entities, "Lamp", &Locale::parse("en_US").unwrap()).is_some());
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let backend = backend();
        let resolver = EntityResolver::new(&backend);
        let found = resolver
            .resolve(EntityKind::Device, "Heater", &en_us())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_resolve_is_case_sensitive() {
        let backend = backend();
        let resolver = EntityResolver::new(&backend);
        let found = resolver
            .resolve(EntityKind::Device, "fan", &en_us())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_resolve_only_scans_requested_kind() {
        let backend = backend();
        let resolver = EntityResolver::new(&backend);
        let found = resolver
            .resolve(EntityKind::Scene, "Lamp", &en_us())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_resolve_refetches_and_is_deterministic() {
        let backend = backend();
        let resolver = EntityResolver::new(&backend);
        let first = resolver
            .resolve(EntityKind::Device, "Fan", &en_us())
            .await
            .unwrap();
        let second = resolver
            .resolve(EntityKind::Device, "Fan", &en_us())
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.unwrap().id, "dev-3");
        assert_eq!(backend.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_resolve_propagates_backend_failure() {
        let backend = backend().unavailable();
        let resolver = EntityResolver::new(&backend);
        let err = resolver
            .resolve(EntityKind::Device, "Lamp", &en_us())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to list devices"));
    }

    #[test]
    fn test_find_by_label() {
        let entities = devices();
        let found = find_by_label(&entities, "Lampe", &Locale::parse("de-DE").unwrap());
        assert_eq!(found.map(|e| e.id.as_str()), Some("dev-2"));
        assert!(find_by_label(&entities, "Lampe", &Locale::parse("de-AT").unwrap()).is_none());
        assert!(find_by_label(&entities, "Lampe", &en_us()).is_none());
        assert!(find_by_label(&[], "Lamp", &en_us()).is_none());
    }
}
