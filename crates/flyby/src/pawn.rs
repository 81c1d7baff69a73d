//! The player-flown pawn

use kestrel::prelude::*;

use crate::module::bindings;

const BASE_SPEED: f32 = 12.0;
const BOOST_MULTIPLIER: f32 = 3.0;
const LOOK_SENSITIVITY: f32 = 0.002;
const PITCH_LIMIT: f32 = 1.5;

/// A free-flying camera pawn driven entirely by input bindings
///
/// Axis callbacks store the frame's input; the variable update applies it
/// to the root scene node using the frame delta.
#[derive(Default)]
pub struct FlyingPawn {
    move_input: Vec3,
    look_input: [f32; 2],
    yaw: f32,
    pitch: f32,
    boosting: bool,
}

impl FlyingPawn {
    /// Orientation from accumulated yaw and pitch
    fn orientation(&self) -> Quat {
        Quat::from_euler_angles(self.pitch, self.yaw, 0.0)
    }
}

/// World-space movement for one frame of input
pub fn movement_delta(orientation: &Quat, move_input: Vec3, speed: f32, delta_time: f32) -> Vec3 {
    if move_input == Vec3::zeros() {
        return Vec3::zeros();
    }
    let local = move_input.normalize() * speed * delta_time;
    orientation * local
}

/// Yaw and pitch after one frame of mouse movement, pitch clamped
pub fn integrate_look(yaw: f32, pitch: f32, look: [f32; 2]) -> (f32, f32) {
    let yaw = yaw + look[0] * LOOK_SENSITIVITY;
    let pitch = (pitch + look[1] * LOOK_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    (yaw, pitch)
}

impl Behavior for FlyingPawn {
    fn update(&mut self, world: &mut World, me: ObjectKey) {
        let delta_time = world.time().delta;
        let (yaw, pitch) = integrate_look(self.yaw, self.pitch, self.look_input);
        self.yaw = yaw;
        self.pitch = pitch;
        self.look_input = [0.0, 0.0];

        let speed = if self.boosting {
            BASE_SPEED * BOOST_MULTIPLIER
        } else {
            BASE_SPEED
        };
        let orientation = self.orientation();
        let offset = movement_delta(&orientation, self.move_input, speed, delta_time);

        let Some(root) = world.object(me).and_then(GameObject::root) else {
            return;
        };
        if let Some(transform) = world.scene_mut().transform_mut(root) {
            transform.rotation = orientation;
            transform.translate(offset);
        }
    }

    fn setup_player_input(&mut self, input: &mut InputRouter) {
        input.bind_axis::<Self, _>(bindings::MOVE_FORWARD, |p, v| p.move_input.z = v);
        input.bind_axis::<Self, _>(bindings::MOVE_RIGHT, |p, v| p.move_input.x = v);
        input.bind_axis::<Self, _>(bindings::MOVE_UP, |p, v| p.move_input.y = v);
        input.bind_axis::<Self, _>(bindings::LOOK_X, |p, v| p.look_input[0] = v);
        input.bind_axis::<Self, _>(bindings::LOOK_Y, |p, v| p.look_input[1] = v);
        input.bind_action::<Self, _>(bindings::BOOST, ActionEvent::Pressed, |p| p.boosting = true);
        input.bind_action::<Self, _>(bindings::BOOST, ActionEvent::Released, |p| {
            p.boosting = false;
        });
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
