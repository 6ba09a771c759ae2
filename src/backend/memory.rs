use super::{Backend, MutationResult};
use crate::entity::{Entity, EntityKind};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Backend serving fixed entity lists from memory.
///
/// Records every call so callers can check how many reads and which
/// mutations a request produced.
#[derive(Default)]
pub struct InMemoryBackend {
    entities: HashMap<EntityKind, Vec<Entity>>,
    mutation_success: bool,
    unavailable: bool,
    failing_mutations: bool,
    list_calls: AtomicUsize,
    mutations: Mutex<Vec<(EntityKind, String)>>,
}

impl InMemoryBackend {
    /// Empty backend whose mutations succeed.
    pub fn new() -> Self {
        Self {
            mutation_success: true,
            ..Self::default()
        }
    }

    pub fn with_entities(mut self, kind: EntityKind, entities: Vec<Entity>) -> Self {
        self.entities.insert(kind, entities);
        self
    }

    /// Value every mutation reports as `success`.
    pub fn with_mutation_success(mut self, success: bool) -> Self {
        self.mutation_success = success;
        self
    }

    /// Makes every call fail as if the backend were unreachable.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Lists still succeed but every mutation fails in transport.
    pub fn with_failing_mutations(mut self) -> Self {
        self.failing_mutations = true;
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Mutations issued so far, in order.
    pub fn mutations(&self) -> Vec<(EntityKind, String)> {
        self.mutations
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn list_entities(&self, kind: EntityKind) -> Result<Vec<Entity>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(anyhow!("Failed to send {} request", kind.collection()));
        }
        Ok(self.entities.get(&kind).cloned().unwrap_or_default())
    }

    async fn mutate(&self, kind: EntityKind, entity_id: &str) -> Result<MutationResult> {
        if self.unavailable || self.failing_mutations {
            return Err(anyhow!("Failed to send {} request", kind.mutation()));
        }
        self.mutations
            .lock()
            .map_err(|_| anyhow!("mutation log poisoned"))?
            .push((kind, entity_id.to_string()));
        Ok(MutationResult {
            success: self.mutation_success,
        })
    }
}
