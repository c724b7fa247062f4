//! The entity/component store.
//!
//! Entities are opaque ids allocated monotonically and never reused within
//! a run. Components live in per-type stores keyed by entity; stores use
//! BTreeMap so iteration — and therefore query output — is deterministic.
//!
//! Access discipline: a store must be registered before any add/get/remove
//! against it. Unregistered access is a wiring bug and always surfaces as
//! `SimError::UnregisteredStore`, never as silently-empty data. An absent
//! component in a registered store is the normal case and reads as
//! `Ok(None)`.

use crate::error::{SimError, SimResult};
use crate::types::Entity;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};

type Store = BTreeMap<Entity, Box<dyn Any>>;

#[derive(Default)]
pub struct World {
    next_entity: u64,
    stores: HashMap<String, Store>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_entity(&mut self) -> Entity {
        let id = self.next_entity;
        self.next_entity += 1;
        Entity(id)
    }

    /// How many entities have been allocated so far.
    pub fn entity_count(&self) -> u64 {
        self.next_entity
    }

    /// Declare a component store. Registering the same name twice is a
    /// no-op — existing data survives.
    pub fn register_component(&mut self, type_name: &str) {
        self.stores.entry(type_name.to_string()).or_default();
    }

    pub fn has_store(&self, type_name: &str) -> bool {
        self.stores.contains_key(type_name)
    }

    /// Insert or overwrite the entity's component of this type.
    pub fn add_component<T: 'static>(
        &mut self,
        entity: Entity,
        type_name: &str,
        component: T,
    ) -> SimResult<()> {
        let store = self.store_mut(type_name)?;
        store.insert(entity, Box::new(component));
        Ok(())
    }

    /// The component, or `Ok(None)` when the entity simply doesn't have one.
    pub fn get_component<T: 'static>(
        &self,
        entity: Entity,
        type_name: &str,
    ) -> SimResult<Option<&T>> {
        let store = self.store(type_name)?;
        match store.get(&entity) {
            None => Ok(None),
            Some(boxed) => boxed
                .downcast_ref::<T>()
                .map(Some)
                .ok_or_else(|| SimError::ComponentTypeMismatch {
                    store: type_name.to_string(),
                }),
        }
    }

    pub fn get_component_mut<T: 'static>(
        &mut self,
        entity: Entity,
        type_name: &str,
    ) -> SimResult<Option<&mut T>> {
        let store = self.store_mut(type_name)?;
        match store.get_mut(&entity) {
            None => Ok(None),
            Some(boxed) => boxed
                .downcast_mut::<T>()
                .map(Some)
                .ok_or_else(|| SimError::ComponentTypeMismatch {
                    store: type_name.to_string(),
                }),
        }
    }

    /// Remove the entity's component. Returns whether one was present.
    /// Removing all components is how an entity is logically destroyed.
    pub fn remove_component(&mut self, entity: Entity, type_name: &str) -> SimResult<bool> {
        let store = self.store_mut(type_name)?;
        Ok(store.remove(&entity).is_some())
    }

    pub fn component_count(&self, type_name: &str) -> SimResult<usize> {
        Ok(self.store(type_name)?.len())
    }

    /// All entities that hold **every** listed component type.
    ///
    /// Iterates the smallest store and probes the rest, so cost scales
    /// with the most selective type. Results come out in entity-id order;
    /// callers must treat the ordering as unspecified.
    pub fn query(&self, type_names: &[&str]) -> SimResult<Vec<Entity>> {
        if type_names.is_empty() {
            return Ok(Vec::new());
        }
        let mut stores = Vec::with_capacity(type_names.len());
        for name in type_names {
            stores.push(self.store(name)?);
        }
        let (pivot, smallest) = stores
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| s.len())
            .expect("at least one store");
        let hits = smallest
            .keys()
            .filter(|e| {
                stores
                    .iter()
                    .enumerate()
                    .all(|(i, s)| i == pivot || s.contains_key(*e))
            })
            .copied()
            .collect();
        Ok(hits)
    }

    fn store(&self, type_name: &str) -> SimResult<&Store> {
        self.stores
            .get(type_name)
            .ok_or_else(|| SimError::UnregisteredStore(type_name.to_string()))
    }

    fn store_mut(&mut self, type_name: &str) -> SimResult<&mut Store> {
        self.stores
            .get_mut(type_name)
            .ok_or_else(|| SimError::UnregisteredStore(type_name.to_string()))
    }
}
