//! The World: object registry, controller registry, and frame dispatch

use log::{debug, warn};
use slotmap::SlotMap;

use crate::assets::{AssetError, AssetManager, StaticMesh};
use crate::foundation::math::{Mat4, Transform};
use crate::gameplay::controller::InertBrain;
use crate::gameplay::{
    Behavior, Brain, Component, ComponentBehavior, Controller, ControllerKey, ControllerKind,
    GameObject, GameState, InputRouter, ObjectKey, UniqueId,
};
use crate::input::InputManager;
use crate::scene::{NodeKey, NodePayload, Projection, SceneGraph};

/// Frame timing as seen by gameplay code
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeState {
    /// Seconds covered by the current variable update
    pub delta: f32,
    /// Seconds covered by one fixed step
    pub fixed_delta: f32,
    /// Seconds since the world started running
    pub runtime: f32,
}

type StateFactory = Box<dyn FnOnce(&mut World) -> Box<dyn GameState>>;

/// The single root of a running game
///
/// The World owns every game object, controller, the scene graph, loaded
/// assets, and the input manager, and drives all gameplay dispatch. Hooks
/// receive `&mut World` explicitly; nothing in the engine reaches the world
/// through ambient state.
///
/// Dispatch hands out `&mut World` to code owned by the world itself, so
/// the boxed behavior is taken out of its slot for the duration of the call
/// and restored afterwards if the object still exists.
pub struct World {
    objects: SlotMap<ObjectKey, GameObject>,
    controllers: SlotMap<ControllerKey, Controller>,
    game_state: Option<Box<dyn GameState>>,
    state_dispatching: bool,
    pending_state: Option<StateFactory>,
    scene: SceneGraph,
    assets: AssetManager,
    input: InputManager,
    local_player: Option<ControllerKey>,
    time: TimeState,
    shutdown_requested: bool,
}

impl World {
    /// Create an empty world around a loaded asset manager
    pub fn new(assets: AssetManager) -> Self {
        Self {
            objects: SlotMap::with_key(),
            controllers: SlotMap::with_key(),
            game_state: None,
            state_dispatching: false,
            pending_state: None,
            scene: SceneGraph::new(),
            assets,
            input: InputManager::new(),
            local_player: None,
            time: TimeState::default(),
            shutdown_requested: false,
        }
    }

    /// The scene graph
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Mutable access to the scene graph
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    /// The asset manager
    pub fn assets(&self) -> &AssetManager {
        &self.assets
    }

    /// Mutable access to the asset manager
    pub fn assets_mut(&mut self) -> &mut AssetManager {
        &mut self.assets
    }

    /// The input manager
    pub fn input(&self) -> &InputManager {
        &self.input
    }

    /// Mutable access to the input manager
    pub fn input_mut(&mut self) -> &mut InputManager {
        &mut self.input
    }

    /// Current frame timing
    pub fn time(&self) -> TimeState {
        self.time
    }

    pub(crate) fn time_mut(&mut self) -> &mut TimeState {
        &mut self.time
    }

    /// Ask the host loop to stop after the current frame
    pub fn request_shutdown(&mut self) {
        self.shutdown_requested = true;
    }

    /// Whether shutdown has been requested
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    // ----- objects ---------------------------------------------------------

    /// Spawn an object with the given behavior; no lifecycle hook fires yet
    pub fn spawn<B: Behavior>(&mut self, behavior: B) -> ObjectKey {
        self.spawn_inner(None, Some(Box::new(behavior)))
    }

    /// Spawn a named object with the given behavior
    pub fn spawn_named<B: Behavior>(&mut self, name: &str, behavior: B) -> ObjectKey {
        self.spawn_inner(Some(name.to_string()), Some(Box::new(behavior)))
    }

    /// Spawn an object with no behavior, e.g. a static scenery holder
    pub fn spawn_empty(&mut self, name: &str) -> ObjectKey {
        self.spawn_inner(Some(name.to_string()), None)
    }

    fn spawn_inner(&mut self, name: Option<String>, behavior: Option<Box<dyn Behavior>>) -> ObjectKey {
        let id = UniqueId::fresh();
        let key = self.objects.insert(GameObject::new(id, name, behavior));
        debug!("spawned object {id}");
        key
    }

    /// Fire the object's begin-play hook
    ///
    /// Spawning and entering play are separate steps so callers can finish
    /// wiring components before the first hook sees the object.
    pub fn begin_play(&mut self, object: ObjectKey) {
        if let Some(mut behavior) = self.objects.get_mut(object).and_then(|o| o.behavior.take()) {
            behavior.on_begin_play(self, object);
            if let Some(obj) = self.objects.get_mut(object) {
                obj.behavior = Some(behavior);
            }
        }
    }

    /// Look up an object; `None` if it was destroyed
    pub fn object(&self, key: ObjectKey) -> Option<&GameObject> {
        self.objects.get(key)
    }

    /// Mutable object lookup
    pub fn object_mut(&mut self, key: ObjectKey) -> Option<&mut GameObject> {
        self.objects.get_mut(key)
    }

    /// Whether the key still names a live object
    pub fn contains_object(&self, key: ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    /// Number of live objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Iterate live objects in registry order
    pub fn objects(&self) -> impl Iterator<Item = (ObjectKey, &GameObject)> {
        self.objects.iter()
    }

    /// Destroy an object: its destroy hook runs, then its scene subtree and
    /// all component nodes are removed, then it leaves the registry
    ///
    /// Destroying an already-destroyed key is a no-op. A possessing
    /// controller keeps running with no pawn; it can possess again later.
    pub fn destroy_object(&mut self, object: ObjectKey) {
        if !self.objects.contains_key(object) {
            return;
        }
        if let Some(mut behavior) = self.objects.get_mut(object).and_then(|o| o.behavior.take()) {
            behavior.on_destroy(self, object);
            if let Some(obj) = self.objects.get_mut(object) {
                obj.behavior = Some(behavior);
            }
        }
        let Some(obj) = self.objects.remove(object) else {
            return;
        };
        if let Some(controller) = obj.controller {
            if let Some(ctrl) = self.controllers.get_mut(controller) {
                ctrl.pawn = None;
                if let ControllerKind::Player(router) = &mut ctrl.kind {
                    router.clear();
                }
            }
        }
        if let Some(root) = obj.root {
            self.scene.remove_subtree(root);
        }
        for component in &obj.components {
            if let Some(node) = component.node() {
                // nodes under the removed root are already gone
                if self.scene.contains(node) {
                    self.scene.remove_subtree(node);
                }
            }
        }
        debug!("destroyed object {}", obj.id());
    }

    // ----- components ------------------------------------------------------

    /// Create a plain component for an object
    ///
    /// Creation and registration are separate steps: the returned component
    /// carries its identity and owner, and the caller appends it with
    /// [`GameObject::add_component`] once any extra wiring is done.
    pub fn create_component(&mut self, owner: ObjectKey) -> Option<Component> {
        self.build_component(owner, None, None)
    }

    /// Create a plain component carrying the given logic
    pub fn create_component_with<C: ComponentBehavior>(
        &mut self,
        owner: ObjectKey,
        behavior: C,
    ) -> Option<Component> {
        self.build_component(owner, None, Some(Box::new(behavior)))
    }

    /// Create a scene component backed by a fresh, detached scene node
    ///
    /// The node starts outside the attached tree; make it the object's root
    /// with [`Self::set_root_component`] or attach it under another node.
    /// Registration is the caller's step, as with [`Self::create_component`].
    pub fn create_scene_component(
        &mut self,
        owner: ObjectKey,
        transform: Transform,
    ) -> Option<Component> {
        if !self.objects.contains_key(owner) {
            return None;
        }
        let node = self.scene.insert(transform);
        self.build_component(owner, Some(node), None)
    }

    /// Create a scene component whose node carries a camera payload
    pub fn create_camera_component(
        &mut self,
        owner: ObjectKey,
        transform: Transform,
        projection: Projection,
    ) -> Option<Component> {
        if !self.objects.contains_key(owner) {
            return None;
        }
        let node = self
            .scene
            .insert_with_payload(transform, NodePayload::Camera(projection));
        self.build_component(owner, Some(node), None)
    }

    /// Create a scene component whose node draws a named mesh asset
    ///
    /// A name absent from the manifest is a hard error, not a placeholder.
    pub fn create_static_mesh_component(
        &mut self,
        owner: ObjectKey,
        transform: Transform,
        mesh_name: &str,
    ) -> Result<Option<Component>, AssetError> {
        if !self.objects.contains_key(owner) {
            return Ok(None);
        }
        let handle = self.assets.load::<StaticMesh>(mesh_name)?;
        let node = self
            .scene
            .insert_with_payload(transform, NodePayload::Mesh(handle));
        Ok(self.build_component(owner, Some(node), None))
    }

    fn build_component(
        &mut self,
        owner: ObjectKey,
        node: Option<NodeKey>,
        behavior: Option<Box<dyn ComponentBehavior>>,
    ) -> Option<Component> {
        if !self.objects.contains_key(owner) {
            return None;
        }
        Some(Component::new(UniqueId::fresh(), owner, node, behavior))
    }

    /// Make the component node the object's spatial anchor
    ///
    /// The new root takes over the old root's place in the scene graph; an
    /// object gaining its first root is attached under the scene root. The
    /// old root stays in the graph but is left detached.
    pub fn set_root_component(&mut self, object: ObjectKey, node: NodeKey) {
        let Some(obj) = self.objects.get_mut(object) else {
            return;
        };
        let old = obj.root.replace(node);
        let anchor = match old {
            Some(old_root) => {
                let parent = self.scene.parent_of(old_root).unwrap_or_else(|| self.scene.root());
                self.scene.detach_child(parent, old_root);
                parent
            }
            None => self.scene.root(),
        };
        if let Err(err) = self.scene.attach_child(anchor, node) {
            warn!("failed to anchor root component: {err}");
        }
    }

    /// World-space transform of an object
    ///
    /// Resolves through the root component; an object without one inherits
    /// its parent object's transform, and with no parent either it sits at
    /// the origin.
    pub fn object_world_matrix(&self, object: ObjectKey) -> Mat4 {
        let Some(obj) = self.objects.get(object) else {
            return Mat4::identity();
        };
        if let Some(root) = obj.root() {
            return self.scene.world_matrix(root);
        }
        if let Some(parent) = obj.parent() {
            return self.object_world_matrix(parent);
        }
        Mat4::identity()
    }

    // ----- controllers -----------------------------------------------------

    /// Register a player controller with an empty input router
    ///
    /// The first player controller registered while the local slot is empty
    /// becomes the local player.
    pub fn create_player_controller(&mut self) -> ControllerKey {
        let id = UniqueId::fresh();
        let key = self
            .controllers
            .insert(Controller::new(id, ControllerKind::Player(InputRouter::default())));
        if self.local_player.is_none() {
            self.local_player = Some(key);
            debug!("local player controller is {id}");
        }
        key
    }

    /// Register an AI controller around the given brain
    pub fn create_ai_controller(&mut self, brain: Box<dyn Brain>) -> ControllerKey {
        let id = UniqueId::fresh();
        self.controllers
            .insert(Controller::new(id, ControllerKind::Ai(brain)))
    }

    /// Look up a controller
    pub fn controller(&self, key: ControllerKey) -> Option<&Controller> {
        self.controllers.get(key)
    }

    /// Mutable controller lookup
    pub fn controller_mut(&mut self, key: ControllerKey) -> Option<&mut Controller> {
        self.controllers.get_mut(key)
    }

    /// Number of registered controllers
    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    /// The local player's controller, if it is still registered
    pub fn local_player(&self) -> Option<ControllerKey> {
        self.local_player.filter(|&key| self.controllers.contains_key(key))
    }

    /// Give a controller possession of a pawn
    ///
    /// Possession is exclusive on both sides: the controller's previous
    /// pawn and the pawn's previous controller are released first, with
    /// their unpossession hooks. Possessing an already-held pawn again is a
    /// no-op, so hooks never fire twice for one possession. For player
    /// controllers the pawn then registers its input bindings.
    pub fn possess(&mut self, controller: ControllerKey, pawn: ObjectKey) {
        if !self.controllers.contains_key(controller) || !self.objects.contains_key(pawn) {
            return;
        }
        if self.controllers[controller].pawn == Some(pawn) {
            return;
        }
        self.unpossess(controller);
        if let Some(previous) = self.objects.get(pawn).and_then(GameObject::controller) {
            self.unpossess(previous);
        }
        if let Some(ctrl) = self.controllers.get_mut(controller) {
            ctrl.pawn = Some(pawn);
        }
        if let Some(obj) = self.objects.get_mut(pawn) {
            obj.controller = Some(controller);
            if let Some(behavior) = obj.behavior.as_deref_mut() {
                behavior.on_possess();
            }
        }
        if let Some(ctrl) = self.controllers.get_mut(controller) {
            if let ControllerKind::Player(router) = &mut ctrl.kind {
                if let Some(behavior) = self.objects.get_mut(pawn).and_then(|o| o.behavior.as_deref_mut()) {
                    behavior.setup_player_input(router);
                }
            }
        }
    }

    /// Release a controller's pawn, if it holds one
    ///
    /// Clears the input router on player controllers so no stale binding
    /// can fire, then runs the pawn's unpossession hook. Idempotent.
    pub fn unpossess(&mut self, controller: ControllerKey) {
        let Some(ctrl) = self.controllers.get_mut(controller) else {
            return;
        };
        let Some(pawn) = ctrl.pawn.take() else {
            return;
        };
        if let ControllerKind::Player(router) = &mut ctrl.kind {
            router.clear();
        }
        if let Some(obj) = self.objects.get_mut(pawn) {
            obj.controller = None;
            if let Some(behavior) = obj.behavior.as_deref_mut() {
                behavior.on_unpossess();
            }
        }
    }

    // ----- game state ------------------------------------------------------

    /// Install a new game state, tearing the current world contents down
    ///
    /// Order: the old state's stop hook, then removal of every controller
    /// and object, then the factory runs against the emptied world, then
    /// the new state's start hook, then exactly one synthesized local
    /// player connection.
    ///
    /// A state may request a switch from its own update hooks; the switch
    /// is applied right after the hook returns, so the outgoing state's
    /// stop hook still fires. Requests from start or stop hooks are
    /// undefined.
    pub fn set_game_state_with<F>(&mut self, factory: F)
    where
        F: FnOnce(&mut World) -> Box<dyn GameState> + 'static,
    {
        if self.state_dispatching {
            // the requesting state is out of its slot mid-hook
            self.pending_state = Some(Box::new(factory));
            return;
        }
        self.switch_game_state(Box::new(factory));
    }

    fn switch_game_state(&mut self, factory: StateFactory) {
        if let Some(mut old) = self.game_state.take() {
            old.on_stop(self);
        }
        self.clear_world();
        let mut state = factory(self);
        state.on_start(self);
        let controller = state.create_player_controller(self);
        state.on_player_connected(self, controller);
        self.game_state = Some(state);
    }

    /// Install a default-constructed game state
    pub fn set_game_state<S: GameState + Default + 'static>(&mut self) {
        self.set_game_state_with(|_| Box::new(S::default()));
    }

    /// Whether a game state is currently installed
    pub fn has_game_state(&self) -> bool {
        self.game_state.is_some()
    }

    fn clear_world(&mut self) {
        let controllers: Vec<ControllerKey> = self.controllers.keys().collect();
        for key in controllers {
            self.unpossess(key);
        }
        self.controllers.clear();
        // the cache would otherwise dangle into the cleared registry
        self.local_player = None;
        let objects: Vec<ObjectKey> = self.objects.keys().collect();
        for key in objects {
            self.destroy_object(key);
        }
    }

    // ----- dispatch --------------------------------------------------------

    /// Run one variable update across the world
    ///
    /// Order: game state first, then every controller, then every object
    /// immediately followed by its own components. The object and
    /// controller sets are snapshotted up front, so spawns and destroys
    /// during the pass take effect next frame.
    pub fn on_update(&mut self) {
        self.dispatch_game_state(false);
        let controllers: Vec<ControllerKey> = self.controllers.keys().collect();
        for key in controllers {
            self.update_controller(key);
        }
        let objects: Vec<ObjectKey> = self.objects.keys().collect();
        for key in objects {
            self.update_object(key);
        }
    }

    /// Run one fixed step across the world; controllers do not take part
    pub fn on_fixed_update(&mut self) {
        self.dispatch_game_state(true);
        let objects: Vec<ObjectKey> = self.objects.keys().collect();
        for key in objects {
            self.fixed_update_object(key);
        }
    }

    /// Tick the installed state, then apply any switch it requested
    ///
    /// The state is taken out of its slot for the duration of the hook so
    /// it can receive `&mut World`; a switch requested mid-hook is parked
    /// and applied here, once the outgoing state is back in its slot and
    /// can receive its stop hook.
    fn dispatch_game_state(&mut self, fixed: bool) {
        if let Some(mut state) = self.game_state.take() {
            self.state_dispatching = true;
            if fixed {
                state.fixed_update(self);
            } else {
                state.update(self);
            }
            self.state_dispatching = false;
            self.game_state = Some(state);
        }
        if let Some(factory) = self.pending_state.take() {
            self.switch_game_state(factory);
        }
    }

    fn update_controller(&mut self, key: ControllerKey) {
        enum Taken {
            Player(InputRouter),
            Ai(Box<dyn Brain>),
        }
        let Some(ctrl) = self.controllers.get_mut(key) else {
            return;
        };
        let pawn = ctrl.pawn;
        let taken = match &mut ctrl.kind {
            ControllerKind::Player(router) => Taken::Player(std::mem::take(router)),
            ControllerKind::Ai(brain) => Taken::Ai(std::mem::replace(brain, Box::new(InertBrain))),
        };
        match taken {
            Taken::Player(mut router) => {
                let mut behavior = pawn
                    .and_then(|p| self.objects.get_mut(p))
                    .and_then(|o| o.behavior.take());
                if let Some(b) = behavior.as_deref_mut() {
                    for (name, slots) in &mut router.actions {
                        if self.input.is_just_pressed(name) {
                            if let Some(callback) = slots.pressed.as_mut() {
                                callback(&mut *b);
                            }
                        } else if self.input.is_just_released(name) {
                            if let Some(callback) = slots.released.as_mut() {
                                callback(&mut *b);
                            }
                        }
                    }
                    for (name, callback) in &mut router.axes {
                        callback(&mut *b, self.input.axis_value(name));
                    }
                }
                if let (Some(p), Some(b)) = (pawn, behavior) {
                    if let Some(obj) = self.objects.get_mut(p) {
                        obj.behavior = Some(b);
                    }
                }
                if let Some(ctrl) = self.controllers.get_mut(key) {
                    if let ControllerKind::Player(slot) = &mut ctrl.kind {
                        *slot = router;
                    }
                }
            }
            Taken::Ai(mut brain) => {
                brain.update(self, key);
                if let Some(ctrl) = self.controllers.get_mut(key) {
                    if let ControllerKind::Ai(slot) = &mut ctrl.kind {
                        *slot = brain;
                    }
                }
            }
        }
    }

    fn update_object(&mut self, key: ObjectKey) {
        if let Some(mut behavior) = self.objects.get_mut(key).and_then(|o| o.behavior.take()) {
            behavior.update(self, key);
            if let Some(obj) = self.objects.get_mut(key) {
                obj.behavior = Some(behavior);
            }
        }
        self.tick_components(key, false);
    }

    fn fixed_update_object(&mut self, key: ObjectKey) {
        if let Some(mut behavior) = self.objects.get_mut(key).and_then(|o| o.behavior.take()) {
            behavior.fixed_update(self, key);
            if let Some(obj) = self.objects.get_mut(key) {
                obj.behavior = Some(behavior);
            }
        }
        self.tick_components(key, true);
    }

    fn tick_components(&mut self, key: ObjectKey, fixed: bool) {
        let mut index = 0;
        loop {
            let Some(obj) = self.objects.get_mut(key) else {
                return;
            };
            if index >= obj.components.len() {
                return;
            }
            if let Some(mut behavior) = obj.components[index].behavior.take() {
                if fixed {
                    behavior.fixed_update(self, key);
                } else {
                    behavior.update(self, key);
                }
                if let Some(obj) = self.objects.get_mut(key) {
                    if let Some(component) = obj.components.get_mut(index) {
                        component.behavior = Some(behavior);
                    }
                }
            }
            index += 1;
        }
    }
}
