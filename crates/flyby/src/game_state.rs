//! The demo's single game state: scenery plus one flying pawn per player

use kestrel::prelude::*;
use log::{info, warn};

use crate::pawn::FlyingPawn;

/// Scenery meshes placed at startup, by manifest name
const SCENERY: &[(&str, [f32; 3])] = &[
    ("terrain", [0.0, -2.0, 0.0]),
    ("tower", [8.0, 0.0, 12.0]),
    ("tower", [-10.0, 0.0, 20.0]),
    ("hangar", [0.0, 0.0, 35.0]),
];

/// Free-flight mode: static scenery and a possessable flying pawn
#[derive(Default)]
pub struct FlybyState;

impl FlybyState {
    fn spawn_scenery(world: &mut World) {
        for (mesh, position) in SCENERY {
            let transform = Transform::from_position(Vec3::new(position[0], position[1], position[2]));
            let key = world.spawn_empty(mesh);
            let component = match world.create_static_mesh_component(key, transform.clone(), mesh) {
                Ok(component) => component,
                Err(err) => {
                    // missing manifest entries degrade to empty anchors
                    warn!("scenery mesh {mesh} unavailable: {err}");
                    world.create_scene_component(key, transform)
                }
            };
            if let Some(component) = component {
                let node = component.node();
                if let Some(object) = world.object_mut(key) {
                    object.add_component(component);
                }
                if let Some(node) = node {
                    world.set_root_component(key, node);
                }
            }
        }
    }
}

impl GameState for FlybyState {
    fn on_start(&mut self, world: &mut World) {
        Self::spawn_scenery(world);
        info!("flyby state started with {} objects", world.object_count());
    }

    fn on_player_connected(&mut self, world: &mut World, controller: ControllerKey) {
        let pawn = world.spawn_named("player", FlyingPawn::default());
        let body = world.create_scene_component(pawn, Transform::from_position(Vec3::new(0.0, 2.0, -10.0)));
        if let Some(body) = body {
            let root = body.node();
            if let Some(object) = world.object_mut(pawn) {
                object.add_component(body);
            }
            if let Some(root) = root {
                world.set_root_component(pawn, root);
                // chase camera sits slightly above and behind the pawn
                let camera = world.create_camera_component(
                    pawn,
                    Transform::from_position(Vec3::new(0.0, 0.5, -2.0)),
                    Projection::default(),
                );
                if let Some(camera) = camera {
                    let camera_node = camera.node();
                    if let Some(object) = world.object_mut(pawn) {
                        object.add_component(camera);
                    }
                    if let Some(camera_node) = camera_node {
                        if let Err(err) = world.scene_mut().attach_child(root, camera_node) {
                            warn!("camera attach failed: {err}");
                        }
                    }
                }
            }
        }
        world.begin_play(pawn);
        world.possess(controller, pawn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel::assets::{AssetManager, AssetManifest};

    fn empty_world() -> World {
        World::new(AssetManager::with_manifest(AssetManifest::default(), Vec::new()))
    }

    #[test]
    fn state_install_spawns_scenery_and_a_possessed_pawn() {
        let mut world = empty_world();
        world.set_game_state::<FlybyState>();

        // scenery objects plus the player's pawn
        assert_eq!(world.object_count(), SCENERY.len() + 1);

        let controller = world.local_player().expect("local player installed");
        let pawn = world
            .controller(controller)
            .and_then(Controller::pawn)
            .expect("pawn possessed");
        assert_eq!(world.object(pawn).and_then(GameObject::controller), Some(controller));
        assert!(world.object(pawn).and_then(GameObject::root).is_some());
    }

    #[test]
    fn missing_meshes_still_anchor_scenery_in_the_scene() {
        let mut world = empty_world();
        world.set_game_state::<FlybyState>();
        for (key, object) in world.objects() {
            if object.name() == Some("player") {
                continue;
            }
            let root = object.root().expect("scenery has a root node");
            assert!(world.scene().is_attached(root));
            let _ = key;
        }
    }

    #[test]
    fn pawn_camera_rides_under_the_pawn_root() {
        let mut world = empty_world();
        world.set_game_state::<FlybyState>();
        let (_, projection, _) = world
            .scene()
            .active_camera()
            .expect("the pawn carries the active camera");
        assert!(projection.fov_y > 0.0);
    }
}
