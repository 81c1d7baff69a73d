//! Gameplay layer - objects, components, controllers, and the World
//!
//! Ownership flows one way: the [`World`] owns game objects, game objects
//! own their components, and components own their scene nodes structurally
//! through the graph arena. Every back-reference (component owner, scene
//! parent, possession links) is a non-owning slot map key, never a lifetime
//! owner.

mod controller;
mod game_state;
mod object;
mod world;

pub use controller::{Brain, Controller, ControllerKind, InputRouter};
pub use game_state::GameState;
pub use object::{Behavior, Component, ComponentBehavior, GameObject};
pub use world::{TimeState, World};

use slotmap::new_key_type;
use uuid::Uuid;

new_key_type! {
    /// Stable, non-owning handle to a spawned game object
    pub struct ObjectKey;

    /// Stable, non-owning handle to a registered controller
    pub struct ControllerKey;
}

/// Process-unique identity of a gameplay object
///
/// An opaque 128-bit identifier assigned exactly once by the World when a
/// game object, component, or controller is created, and never reassigned.
/// No two live objects in a World share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniqueId(Uuid);

impl UniqueId {
    /// Mint a fresh identifier; only creation paths inside the engine do this
    pub(crate) fn fresh() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for UniqueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
