//! Game module: default bindings and game state installation

use kestrel::prelude::*;
use log::info;

use crate::game_state::FlybyState;

/// Axis and action names used throughout the demo
pub mod bindings {
    /// Forward/backward movement axis
    pub const MOVE_FORWARD: &str = "MoveForward";
    /// Strafe axis
    pub const MOVE_RIGHT: &str = "MoveRight";
    /// Vertical movement axis
    pub const MOVE_UP: &str = "MoveUp";
    /// Horizontal look axis
    pub const LOOK_X: &str = "LookX";
    /// Vertical look axis
    pub const LOOK_Y: &str = "LookY";
    /// Speed boost while held
    pub const BOOST: &str = "Boost";
    /// Quit the demo
    pub const QUIT: &str = "Quit";
}

/// The flyby demo game
#[derive(Default)]
pub struct FlybyGame;

impl GameModule for FlybyGame {
    fn name(&self) -> &str {
        "Flyby"
    }

    fn on_game_start(&mut self, world: &mut World) {
        register_default_bindings(world.input_mut());
        world.set_game_state::<FlybyState>();
        info!("flyby started");
    }

    fn update(&mut self, world: &mut World) {
        if world.input().is_just_pressed(bindings::QUIT) {
            world.request_shutdown();
        }
    }
}

/// Install the default keyboard and mouse layout
///
/// Overwritten by a binding profile when the engine config names one.
pub fn register_default_bindings(input: &mut InputManager) {
    // opposing keys append to one binding; registering twice would replace it
    input.set_axis_trigger(bindings::MOVE_FORWARD, Input::KeyW, 1.0, None);
    input.set_axis_trigger(bindings::MOVE_FORWARD, Input::KeyS, -1.0, None);
    input.set_axis_trigger(bindings::MOVE_RIGHT, Input::KeyD, 1.0, None);
    input.set_axis_trigger(bindings::MOVE_RIGHT, Input::KeyA, -1.0, None);
    input.set_axis_trigger(bindings::MOVE_UP, Input::KeySpace, 1.0, None);
    input.set_axis_trigger(bindings::MOVE_UP, Input::KeyLeftCtrl, -1.0, None);
    input.register_axis_binding(bindings::LOOK_X, Input::MouseAxisX, 1.0);
    input.register_axis_binding(bindings::LOOK_Y, Input::MouseAxisY, 1.0);
    input.register_action_binding(bindings::BOOST, &[Input::KeyLeftShift]);
    input.register_action_binding(bindings::QUIT, &[Input::KeyEscape]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paired_keys_drive_both_directions_of_each_axis() {
        let mut input = InputManager::new();
        register_default_bindings(&mut input);

        let pairs = [
            (bindings::MOVE_FORWARD, Input::KeyW, Input::KeyS),
            (bindings::MOVE_RIGHT, Input::KeyD, Input::KeyA),
            (bindings::MOVE_UP, Input::KeySpace, Input::KeyLeftCtrl),
        ];
        for (axis, positive, negative) in pairs {
            input.state_mut().set_action(positive, true);
            assert!((input.axis_value(axis) - 1.0).abs() < f32::EPSILON);
            input.state_mut().set_action(positive, false);

            input.state_mut().set_action(negative, true);
            assert!((input.axis_value(axis) + 1.0).abs() < f32::EPSILON);
            input.state_mut().set_action(negative, false);
        }
    }

    #[test]
    fn opposed_keys_resolve_by_magnitude_not_sum() {
        let mut input = InputManager::new();
        register_default_bindings(&mut input);
        input.state_mut().set_action(Input::KeyW, true);
        input.state_mut().set_action(Input::KeyS, true);
        assert!(input.axis_value(bindings::MOVE_FORWARD).abs() > 0.5);
    }

    #[test]
    fn mouse_look_passes_raw_deltas_through() {
        let mut input = InputManager::new();
        register_default_bindings(&mut input);
        input.state_mut().set_axis(Input::MouseAxisX, -3.5);
        assert!((input.axis_value(bindings::LOOK_X) + 3.5).abs() < f32::EPSILON);
    }
}
