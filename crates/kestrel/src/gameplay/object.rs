//! Game objects, components, and the behavior traits they dispatch to

use std::any::Any;

use crate::gameplay::{ControllerKey, InputRouter, ObjectKey, UniqueId, World};
use crate::scene::NodeKey;

/// Per-object game logic
///
/// A behavior is the scripted half of a game object: the World calls its
/// hooks at well-defined points of the frame and hands it `&mut World` so it
/// can spawn, destroy, and rearrange freely. During a hook the behavior is
/// temporarily detached from its object, so looking up `me` mid-hook yields
/// an object whose behavior slot is empty; everything else about it is live.
///
/// All hooks default to no-ops, so implementors override only what they use.
pub trait Behavior: Any {
    /// Runs once when the object enters play, before its first update
    fn on_begin_play(&mut self, _world: &mut World, _me: ObjectKey) {}

    /// Runs once per rendered frame with a variable delta
    fn update(&mut self, _world: &mut World, _me: ObjectKey) {}

    /// Runs zero or more times per frame on the fixed timestep
    fn fixed_update(&mut self, _world: &mut World, _me: ObjectKey) {}

    /// Runs when the object is destroyed, before it leaves the registry
    fn on_destroy(&mut self, _world: &mut World, _me: ObjectKey) {}

    /// A controller took possession of this object
    fn on_possess(&mut self) {}

    /// The possessing controller released this object
    fn on_unpossess(&mut self) {}

    /// Register input bindings on the possessing player controller's router
    ///
    /// Called once when a player controller possesses this object. The
    /// router is cleared again on unpossession, so bindings never outlive
    /// the possession that created them.
    fn setup_player_input(&mut self, _input: &mut InputRouter) {}

    /// Concrete-type access for input routing and tests
    fn as_any(&self) -> &dyn Any;

    /// Mutable concrete-type access for input routing and tests
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Per-component game logic, ticked right after the owning object
pub trait ComponentBehavior: Any {
    /// Runs once per rendered frame, after the owner's own update
    fn update(&mut self, _world: &mut World, _owner: ObjectKey) {}

    /// Runs on the fixed timestep, after the owner's own fixed update
    fn fixed_update(&mut self, _world: &mut World, _owner: ObjectKey) {}

    /// Mutable concrete-type access
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A capability attached to a game object
///
/// Plain components carry logic only. Scene components additionally own a
/// node in the scene graph, giving them a spatial transform; the node is
/// removed with the component's owner.
pub struct Component {
    id: UniqueId,
    owner: ObjectKey,
    node: Option<NodeKey>,
    pub(crate) behavior: Option<Box<dyn ComponentBehavior>>,
}

impl Component {
    pub(crate) fn new(
        id: UniqueId,
        owner: ObjectKey,
        node: Option<NodeKey>,
        behavior: Option<Box<dyn ComponentBehavior>>,
    ) -> Self {
        Self {
            id,
            owner,
            node,
            behavior,
        }
    }

    /// Process-unique identity, assigned at creation
    pub fn id(&self) -> UniqueId {
        self.id
    }

    /// The object this component belongs to
    pub fn owner(&self) -> ObjectKey {
        self.owner
    }

    /// The scene node backing this component, if it is a scene component
    pub fn node(&self) -> Option<NodeKey> {
        self.node
    }
}

/// An entity living in a [`World`]
///
/// A game object is a plain record: identity, an optional display name,
/// owned components, an optional root scene node, the possessing controller
/// if any, and an optional boxed [`Behavior`] holding its logic.
pub struct GameObject {
    id: UniqueId,
    name: Option<String>,
    parent: Option<ObjectKey>,
    pub(crate) root: Option<NodeKey>,
    pub(crate) controller: Option<ControllerKey>,
    pub(crate) components: Vec<Component>,
    pub(crate) behavior: Option<Box<dyn Behavior>>,
}

impl GameObject {
    pub(crate) fn new(id: UniqueId, name: Option<String>, behavior: Option<Box<dyn Behavior>>) -> Self {
        Self {
            id,
            name,
            parent: None,
            root: None,
            controller: None,
            components: Vec::new(),
            behavior,
        }
    }

    /// Process-unique identity, assigned once at spawn
    pub fn id(&self) -> UniqueId {
        self.id
    }

    /// Display name; not unique and not used for lookup
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set or clear the display name
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Logical parent object, used as a transform fallback when this object
    /// has no root component of its own
    pub fn parent(&self) -> Option<ObjectKey> {
        self.parent
    }

    /// Set or clear the logical parent
    pub fn set_parent(&mut self, parent: Option<ObjectKey>) {
        self.parent = parent;
    }

    /// The scene node anchoring this object spatially, if any
    pub fn root(&self) -> Option<NodeKey> {
        self.root
    }

    /// The controller currently possessing this object, if any
    pub fn controller(&self) -> Option<ControllerKey> {
        self.controller
    }

    /// All components owned by this object, in creation order
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Append a component created for this object; returns its index
    pub fn add_component(&mut self, component: Component) -> usize {
        self.components.push(component);
        self.components.len() - 1
    }

    /// The object's behavior as its concrete type, if present and matching
    pub fn behavior_as<B: Behavior>(&self) -> Option<&B> {
        self.behavior.as_deref().and_then(|b| b.as_any().downcast_ref())
    }

    /// Mutable variant of [`Self::behavior_as`]
    pub fn behavior_as_mut<B: Behavior>(&mut self) -> Option<&mut B> {
        self.behavior
            .as_deref_mut()
            .and_then(|b| b.as_any_mut().downcast_mut())
    }
}
