use dashmap::DashMap;
use std::sync::Arc;

use crate::services::directory::Entity;

/// Concurrent map from a lookup key to the entities it resolved to.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct EntityGroupCache {
    groups: Arc<DashMap<String, Vec<Entity>>>,
}

impl EntityGroupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<Entity>> {
        self.groups.get(key).map(|group| group.value().clone())
    }

    /// The single entity stored under `key`. A group holding more than one
    /// entity is logged and treated as absent.
    pub fn get_only(&self, key: &str) -> Option<Entity> {
        let group = self.groups.get(key)?;
        match group.value().as_slice() {
            [entity] => Some(entity.clone()),
            [] => None,
            many => {
                tracing::error!(
                    "Expected 1 entity in cache for key {} but found {}",
                    key,
                    many.len()
                );
                None
            }
        }
    }

    pub fn set(&self, key: impl Into<String>, entities: Vec<Entity>) {
        self.groups.insert(key.into(), entities);
    }

    pub fn set_group<I>(&self, groups: I)
    where
        I: IntoIterator<Item = (String, Vec<Entity>)>,
    {
        for (key, entities) in groups {
            self.groups.insert(key, entities);
        }
    }

    pub fn delete(&self, key: &str) {
        self.groups.remove(key);
    }

    pub fn clear(&self) {
        self.groups.clear();
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
