//! Capability container
//!
//! An entity is an id plus at most one component of each kind. What an
//! entity *is* follows from the components it carries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::component::{Component, ComponentKind, ComponentSlot};

/// Stable entity identifier, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// A keyed set of typed components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    components: BTreeMap<ComponentKind, ComponentSlot>,
}

impl Entity {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            components: BTreeMap::new(),
        }
    }

    /// Builder form of `add_component`
    pub fn with<C: Component>(mut self, component: C) -> Self {
        self.add_component(component);
        self
    }

    /// Attach a component, replacing any existing one of the same type
    pub fn add_component<C: Component>(&mut self, component: C) {
        self.components.insert(C::KIND, component.into_slot());
    }

    pub fn get_component<C: Component>(&self) -> Option<&C> {
        self.components.get(&C::KIND).and_then(C::from_slot)
    }

    pub fn get_component_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components.get_mut(&C::KIND).and_then(C::from_slot_mut)
    }

    pub fn has_component<C: Component>(&self) -> bool {
        self.components.contains_key(&C::KIND)
    }

    pub fn remove_component<C: Component>(&mut self) -> Option<C> {
        self.components.remove(&C::KIND).and_then(C::take_slot)
    }

    /// Kinds currently attached, in a stable order
    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.components.keys().copied()
    }
}
