//! Explicit contact interest between groups of bodies.
//!
//! Physics reports every contact; scenes only care about a few pairs. A
//! listener names two groups and a kind, and [`ContactListeners::dispatch`]
//! filters the drained physics events down to the ones that match.

use std::collections::{BTreeMap, HashSet};

use crate::physics::PhysicsEvent;
use crate::world::EntityId;

/// Which physics events a listener wants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactKind {
    /// Solid bodies touching.
    Collide,
    /// A body entering a sensor.
    Overlap,
}

/// Handle returned by [`ContactListeners::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u32);

struct Listener {
    kind: ContactKind,
    first: HashSet<EntityId>,
    second: HashSet<EntityId>,
}

impl Listener {
    fn matches(&self, a: EntityId, b: EntityId) -> Option<(EntityId, EntityId)> {
        if self.first.contains(&a) && self.second.contains(&b) {
            Some((a, b))
        } else if self.first.contains(&b) && self.second.contains(&a) {
            Some((b, a))
        } else {
            None
        }
    }
}

/// A matched contact, with the members ordered as the listener declared them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contact {
    pub listener: ListenerId,
    pub first: EntityId,
    pub second: EntityId,
}

/// Registered listeners for the active scene.
#[derive(Default)]
pub struct ContactListeners {
    next_id: u32,
    listeners: BTreeMap<ListenerId, Listener>,
}

impl ContactListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for `kind` contacts between any member of `first` and any member of `second`.
    pub fn register(
        &mut self,
        kind: ContactKind,
        first: impl IntoIterator<Item = EntityId>,
        second: impl IntoIterator<Item = EntityId>,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(
            id,
            Listener {
                kind,
                first: first.into_iter().collect(),
                second: second.into_iter().collect(),
            },
        );
        id
    }

    pub fn unregister(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Drop an entity from every listener group.
    pub fn remove_entity(&mut self, entity: EntityId) {
        for listener in self.listeners.values_mut() {
            listener.first.remove(&entity);
            listener.second.remove(&entity);
        }
    }

    /// Match drained physics events against the listeners.
    ///
    /// Only enter events count; exits are ignored.
    pub fn dispatch(&self, events: &[PhysicsEvent]) -> Vec<Contact> {
        let mut contacts = Vec::new();
        for event in events {
            let (kind, a, b) = match *event {
                PhysicsEvent::CollisionEnter { a, b } => (ContactKind::Collide, a, b),
                PhysicsEvent::TriggerEnter { a, b } => (ContactKind::Overlap, a, b),
                PhysicsEvent::CollisionExit { .. } | PhysicsEvent::TriggerExit { .. } => continue,
            };
            for (&id, listener) in &self.listeners {
                if listener.kind != kind {
                    continue;
                }
                if let Some((first, second)) = listener.matches(a, b) {
                    log::trace!("contact {:?}: {:?} <-> {:?}", kind, first, second);
                    contacts.push(Contact {
                        listener: id,
                        first,
                        second,
                    });
                }
            }
        }
        contacts
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
