use std::collections::HashMap;

use rw_core::{Angle12, ComponentId};
use serde::{Deserialize, Serialize};

/// Auxiliary turret attached to an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Turret {
    /// Bearing the actor's yaw is pulled toward while attraction is active.
    pub aim: Angle12,
}

/// Owner of every auxiliary component.
///
/// Records only hold [`ComponentId`]s. A component can be removed while a
/// record still refers to it; lookups then return `None` and the dependent
/// work is skipped.
#[derive(Debug, Default)]
pub struct ComponentStore {
    turrets: HashMap<ComponentId, Turret>,
}

impl ComponentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a turret and return its handle.
    pub fn insert(&mut self, turret: Turret) -> ComponentId {
        let id = ComponentId::new();
        self.turrets.insert(id, turret);
        id
    }

    /// Look up a live turret.
    pub fn get(&self, id: ComponentId) -> Option<&Turret> {
        self.turrets.get(&id)
    }

    /// Look up a live turret mutably.
    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut Turret> {
        self.turrets.get_mut(&id)
    }

    /// Remove a turret. Handles still pointing at it go dead.
    pub fn remove(&mut self, id: ComponentId) -> Option<Turret> {
        self.turrets.remove(&id)
    }

    /// Return the number of live components.
    pub fn len(&self) -> usize {
        self.turrets.len()
    }

    /// Return `true` if the store holds no components.
    pub fn is_empty(&self) -> bool {
        self.turrets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut store = ComponentStore::new();
        let id = store.insert(Turret { aim: Angle12::new(512) });
        assert_eq!(store.get(id).map(|t| t.aim.raw()), Some(512));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn removed_handle_goes_dead() {
        let mut store = ComponentStore::new();
        let id = store.insert(Turret::default());
        assert!(store.remove(id).is_some());
        assert!(store.get(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_handle_is_none() {
        let store = ComponentStore::new();
        assert!(store.get(ComponentId::new()).is_none());
    }
}
