//! Controllers and the input router that connects them to possessed pawns

use std::collections::HashMap;

use crate::gameplay::{Behavior, ControllerKey, ObjectKey, UniqueId, World};
use crate::input::ActionEvent;

/// Decision logic for an AI controller, ticked once per variable frame
pub trait Brain {
    /// Drive the possessed pawn; the controller is looked up through `me`
    fn update(&mut self, world: &mut World, me: ControllerKey);
}

/// Placeholder brain parked in the slot while the real one is dispatched
pub(crate) struct InertBrain;

impl Brain for InertBrain {
    fn update(&mut self, _world: &mut World, _me: ControllerKey) {}
}

type ActionFn = Box<dyn FnMut(&mut dyn Behavior)>;
type AxisFn = Box<dyn FnMut(&mut dyn Behavior, f32)>;

#[derive(Default)]
pub(crate) struct ActionSlots {
    pub(crate) pressed: Option<ActionFn>,
    pub(crate) released: Option<ActionFn>,
}

/// Maps named actions and axes to callbacks on the possessed pawn
///
/// A player controller owns one router. The possessed pawn fills it in
/// [`Behavior::setup_player_input`]; unpossession clears it wholesale, so a
/// callback can never fire against a pawn the controller no longer holds.
///
/// Callbacks are registered against a concrete behavior type and silently
/// skip pawns of any other type.
#[derive(Default)]
pub struct InputRouter {
    pub(crate) actions: HashMap<String, ActionSlots>,
    pub(crate) axes: HashMap<String, AxisFn>,
}

impl InputRouter {
    /// Bind a callback to one edge of a named action
    ///
    /// Rebinding the same name and event replaces the previous callback;
    /// the opposite edge is untouched.
    pub fn bind_action<P, F>(&mut self, name: &str, event: ActionEvent, mut callback: F)
    where
        P: Behavior,
        F: FnMut(&mut P) + 'static,
    {
        let slot = self.actions.entry(name.to_string()).or_default();
        let boxed: ActionFn = Box::new(move |pawn| {
            if let Some(pawn) = pawn.as_any_mut().downcast_mut::<P>() {
                callback(pawn);
            }
        });
        match event {
            ActionEvent::Pressed => slot.pressed = Some(boxed),
            ActionEvent::Released => slot.released = Some(boxed),
        }
    }

    /// Bind a callback to a named axis, invoked every frame with its value
    pub fn bind_axis<P, F>(&mut self, name: &str, mut callback: F)
    where
        P: Behavior,
        F: FnMut(&mut P, f32) + 'static,
    {
        let boxed: AxisFn = Box::new(move |pawn, value| {
            if let Some(pawn) = pawn.as_any_mut().downcast_mut::<P>() {
                callback(pawn, value);
            }
        });
        self.axes.insert(name.to_string(), boxed);
    }

    /// Drop every binding
    pub fn clear(&mut self) {
        self.actions.clear();
        self.axes.clear();
    }

    /// Number of actions with at least one bound edge
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Number of bound axes
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }
}

/// What drives a controller's pawn
pub enum ControllerKind {
    /// A human player; input reaches the pawn through the router
    Player(InputRouter),
    /// An AI-driven controller with its own decision logic
    Ai(Box<dyn Brain>),
}

/// A possessor of game objects
///
/// Controllers live outside the scene and persist across the pawns they
/// drive. At most one controller possesses a given object, and a controller
/// holds at most one pawn; [`World::possess`] maintains both sides.
pub struct Controller {
    id: UniqueId,
    pub(crate) pawn: Option<ObjectKey>,
    pub(crate) kind: ControllerKind,
}

impl Controller {
    pub(crate) fn new(id: UniqueId, kind: ControllerKind) -> Self {
        Self {
            id,
            pawn: None,
            kind,
        }
    }

    /// Process-unique identity, assigned at creation
    pub fn id(&self) -> UniqueId {
        self.id
    }

    /// The currently possessed object, if any
    pub fn pawn(&self) -> Option<ObjectKey> {
        self.pawn
    }

    /// Whether this controller represents a human player
    pub fn is_player(&self) -> bool {
        matches!(self.kind, ControllerKind::Player(_))
    }

    /// The input router, for player controllers
    pub fn router(&self) -> Option<&InputRouter> {
        match &self.kind {
            ControllerKind::Player(router) => Some(router),
            ControllerKind::Ai(_) => None,
        }
    }

    /// Mutable access to the input router, for player controllers
    pub fn router_mut(&mut self) -> Option<&mut InputRouter> {
        match &mut self.kind {
            ControllerKind::Player(router) => Some(router),
            ControllerKind::Ai(_) => None,
        }
    }
}
