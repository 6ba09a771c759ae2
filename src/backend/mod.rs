//! Backend interface: the read and write calls the skill makes against the
//! home-automation system.
//!
//! ```text
//! IntentHandler ──► EntityResolver ──► Backend::list_entities   (read)
//!       │
//!       └────────────────────────────► Backend::mutate          (write)
//! ```
//!
//! [`GraphQlClient`] talks to the real BCO GraphQL endpoint;
//! [`InMemoryBackend`] serves fixed entity lists for tests and local runs.

mod graphql;
mod memory;
pub mod query;

pub use graphql::{GraphQlClient, DEFAULT_ENDPOINT};
pub use memory::InMemoryBackend;

use crate::entity::{Entity, EntityKind};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of a mutation as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResult {
    pub success: bool,
}

/// Home-automation backend.
///
/// Implementations are stateless from the skill's point of view: every call
/// goes to the backend, nothing is cached.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Lists every entity of `kind` in backend order.
    ///
    /// # Errors
    /// Transport failures, non-2xx responses, GraphQL errors and responses
    /// missing the expected field.
    async fn list_entities(&self, kind: EntityKind) -> Result<Vec<Entity>>;

    /// Runs the kind's mutation against `entity_id`.
    ///
    /// `success == false` is a normal result, not an error.
    async fn mutate(&self, kind: EntityKind, entity_id: &str) -> Result<MutationResult>;
}
