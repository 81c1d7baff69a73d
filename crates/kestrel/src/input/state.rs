//! Raw input state snapshot

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A physical input trigger: keys, mouse buttons, and analog axes
///
/// The set is deliberately small; it covers what the runtime and its sample
/// game exercise. Extending it is additive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Input {
    /// Placeholder for unbound trigger slots
    Unknown,
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,
    KeySpace,
    KeyLeftCtrl,
    KeyLeftShift,
    KeyEscape,
    MouseLeft,
    MouseRight,
    MouseMiddle,
    /// Horizontal mouse movement delta for the current frame
    MouseAxisX,
    /// Vertical mouse movement delta for the current frame
    MouseAxisY,
    /// Scroll wheel delta for the current frame
    MouseWheel,
}

/// Per-frame device snapshot with a previous-frame copy
///
/// Digital action states persist across frames (a held key produces no
/// repeat events), while analog axis values are per-frame deltas and clear
/// on rollover.
#[derive(Debug, Default)]
pub struct InputState {
    actions: HashMap<Input, bool>,
    last_actions: HashMap<Input, bool>,
    axes: HashMap<Input, f32>,
    last_axes: HashMap<Input, f32>,
}

impl InputState {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a digital press or release from the platform layer
    pub fn set_action(&mut self, input: Input, pressed: bool) {
        if input == Input::Unknown {
            return;
        }
        self.actions.insert(input, pressed);
    }

    /// Record an analog axis value from the platform layer
    pub fn set_axis(&mut self, input: Input, value: f32) {
        if input == Input::Unknown {
            return;
        }
        self.axes.insert(input, value);
    }

    /// Read a trigger as a boolean action
    ///
    /// Analog triggers count as "pressed" past half deflection.
    pub fn action(&self, input: Input) -> bool {
        if self.actions.get(&input).copied().unwrap_or(false) {
            return true;
        }
        self.axes.get(&input).copied().unwrap_or(0.0).abs() > 0.5
    }

    /// Read a trigger's action state as of the end of last frame
    pub fn last_action(&self, input: Input) -> bool {
        if self.last_actions.get(&input).copied().unwrap_or(false) {
            return true;
        }
        self.last_axes.get(&input).copied().unwrap_or(0.0).abs() > 0.5
    }

    /// Read a trigger as a scalar axis
    ///
    /// Digital triggers read as 1.0 while held.
    pub fn axis(&self, input: Input) -> f32 {
        if let Some(&value) = self.axes.get(&input) {
            return value;
        }
        if self.actions.get(&input).copied().unwrap_or(false) {
            1.0
        } else {
            0.0
        }
    }

    /// Roll current state into the last-frame snapshot
    ///
    /// Called once per frame after all gameplay logic has run. Action states
    /// are kept (held keys stay held); axis deltas are cleared.
    pub fn post_frame(&mut self) {
        self.last_actions = self.actions.clone();
        self.last_axes = std::mem::take(&mut self.axes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_persists_across_frames() {
        let mut state = InputState::new();
        state.set_action(Input::KeyW, true);
        state.post_frame();
        // No repeat event arrives for a held key; it must still read pressed.
        assert!(state.action(Input::KeyW));
        assert!(state.last_action(Input::KeyW));
    }

    #[test]
    fn test_axis_clears_on_rollover() {
        let mut state = InputState::new();
        state.set_axis(Input::MouseAxisX, 4.5);
        assert_eq!(state.axis(Input::MouseAxisX), 4.5);
        state.post_frame();
        assert_eq!(state.axis(Input::MouseAxisX), 0.0);
        assert_eq!(state.last_axes.get(&Input::MouseAxisX), Some(&4.5));
    }

    #[test]
    fn test_digital_reads_as_unit_axis() {
        let mut state = InputState::new();
        state.set_action(Input::KeySpace, true);
        assert_eq!(state.axis(Input::KeySpace), 1.0);
        state.set_action(Input::KeySpace, false);
        assert_eq!(state.axis(Input::KeySpace), 0.0);
    }

    #[test]
    fn test_unknown_trigger_is_ignored() {
        let mut state = InputState::new();
        state.set_action(Input::Unknown, true);
        state.set_axis(Input::Unknown, 1.0);
        assert!(!state.action(Input::Unknown));
        assert_eq!(state.axis(Input::Unknown), 0.0);
    }
}
