use crate::i18n::Locale;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;


/// The kinds of backend entity a voice intent can address.
///
/// Each kind knows its GraphQL vocabulary: the root query field that lists
/// it, and the mutation (with its id argument) that acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Device,
    Scene,
    Room,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Device, EntityKind::Scene, EntityKind::Room];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Device => "device",
            EntityKind::Scene => "scene",
            EntityKind::Room => "room",
        }
    }

    /// Root query field listing every entity of this kind.
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Device => "devices",
            EntityKind::Scene => "scenes",
            EntityKind::Room => "rooms",
        }
    }

    /// Mutation field acting on one entity of this kind.
    pub fn mutation(self) -> &'static str {
        match self {
            EntityKind::Device => "turnDeviceOff",
            EntityKind::Scene => "activateScene",
            EntityKind::Room => "setRoom",
        }
    }

    /// Name of the id argument taken by [`EntityKind::mutation`].
    pub fn id_argument(self) -> &'static str {
        match self {
            EntityKind::Device => "deviceId",
            EntityKind::Scene => "sceneId",
            EntityKind::Room => "roomId",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable name of an entity, optionally tagged with a language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl Label {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            lang: None,
        }
    }

    pub fn tagged(text: &str, lang: &str) -> Self {
        Self {
            text: text.to_string(),
            lang: Some(lang.to_string()),
        }
    }

    /// Exact, case-sensitive text match. A label without a language tag
    /// matches any locale; a tagged label only matches the exact request
    /// locale (see [`Locale::matches_tag`]).
    pub fn matches(&self, text: &str, locale: &Locale) -> bool {
        if self.text != text {
            return false;
        }
        match self.lang.as_deref() {
            None | Some("") => true,
            Some(lang) => locale.matches_tag(lang),
        }
    }
}

/// A device, scene or room as listed by the backend.
///
/// Owned by the backend; the skill only reads it and refers to it by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    /// Accepts either a single label object or a list of them.
    #[serde(default, deserialize_with = "one_or_many")]
    pub label: Vec<Label>,
}

impl Entity {
    pub fn new(id: &str, label: Vec<Label>) -> Self {
        Self {
            id: id.to_string(),
            label,
        }
    }

    /// True when any of the entity's labels matches.
    pub fn matches(&self, text: &str, locale: &Locale) -> bool {
        self.label.iter().any(|l| l.matches(text, locale))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Label),
    Many(Vec<Label>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<Label>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(label)) => vec![label],
        Some(OneOrMany::Many(labels)) => labels,
        None => Vec::new(),
    })
}
