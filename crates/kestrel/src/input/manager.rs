//! The go-between for gameplay-level binding queries and raw input state

use super::bindings::{
    ActionBinding, AxisBinding, AxisTrigger, BindingProfile, BindingProfileError,
};
use super::state::{Input, InputState};
use std::collections::HashMap;
use std::path::Path;

/// Wraps input binding tables around the raw device snapshot
///
/// Controllers poll this once per frame by binding name. Queries against
/// names that were never registered return the inert defaults.
#[derive(Debug, Default)]
pub struct InputManager {
    state: InputState,
    actions: HashMap<String, ActionBinding>,
    axes: HashMap<String, AxisBinding>,
}

impl InputManager {
    /// Create an input manager with empty binding tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive access to the raw snapshot, for the platform layer
    pub fn state_mut(&mut self) -> &mut InputState {
        &mut self.state
    }

    /// Shared access to the raw snapshot
    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Roll frame state; call once per frame after all gameplay logic
    pub fn post_frame(&mut self) {
        self.state.post_frame();
    }

    // Binding management

    /// Register an action binding, replacing any existing one of that name
    pub fn register_action_binding(&mut self, name: &str, triggers: &[Input]) {
        self.actions.insert(
            name.to_string(),
            ActionBinding {
                name: name.to_string(),
                triggers: triggers.to_vec(),
            },
        );
    }

    /// Register an axis binding with a single trigger, replacing any
    /// existing one of that name
    pub fn register_axis_binding(&mut self, name: &str, trigger: Input, multiplier: f32) {
        self.axes.insert(
            name.to_string(),
            AxisBinding {
                name: name.to_string(),
                triggers: vec![AxisTrigger {
                    trigger,
                    multiplier,
                }],
            },
        );
    }

    /// Add a trigger to an action binding, creating the binding if needed
    ///
    /// `index` of `None` appends; an index past the end pads the list with
    /// `Input::Unknown`; an index inside the list overwrites.
    pub fn set_action_trigger(&mut self, name: &str, trigger: Input, index: Option<usize>) {
        let binding = self
            .actions
            .entry(name.to_string())
            .or_insert_with(|| ActionBinding::new(name));
        match index {
            None => binding.triggers.push(trigger),
            Some(i) if i >= binding.triggers.len() => {
                binding.triggers.resize(i, Input::Unknown);
                binding.triggers.push(trigger);
            }
            Some(i) => binding.triggers[i] = trigger,
        }
    }

    /// Add a trigger to an axis binding, creating the binding if needed
    ///
    /// Index semantics match [`InputManager::set_action_trigger`]; padding
    /// entries use `Input::Unknown` with unit multiplier.
    pub fn set_axis_trigger(
        &mut self,
        name: &str,
        trigger: Input,
        multiplier: f32,
        index: Option<usize>,
    ) {
        let new = AxisTrigger {
            trigger,
            multiplier,
        };
        let binding = self
            .axes
            .entry(name.to_string())
            .or_insert_with(|| AxisBinding::new(name));
        match index {
            None => binding.triggers.push(new),
            Some(i) if i >= binding.triggers.len() => {
                binding.triggers.resize(
                    i,
                    AxisTrigger {
                        trigger: Input::Unknown,
                        multiplier: 1.0,
                    },
                );
                binding.triggers.push(new);
            }
            Some(i) => binding.triggers[i] = new,
        }
    }

    // State checks

    /// Whether any of the named action's triggers is currently pressed
    pub fn is_pressed(&self, name: &str) -> bool {
        self.actions.get(name).is_some_and(|binding| {
            binding.triggers.iter().any(|&t| self.state.action(t))
        })
    }

    /// Whether the action is pressed this frame and was not last frame
    pub fn is_just_pressed(&self, name: &str) -> bool {
        self.actions.get(name).is_some_and(|binding| {
            binding
                .triggers
                .iter()
                .any(|&t| self.state.action(t) && !self.state.last_action(t))
        })
    }

    /// Whether the action is released this frame and was pressed last frame
    pub fn is_just_released(&self, name: &str) -> bool {
        self.actions.get(name).is_some_and(|binding| {
            binding
                .triggers
                .iter()
                .any(|&t| !self.state.action(t) && self.state.last_action(t))
        })
    }

    /// Resolve the named axis's current scalar value
    ///
    /// The value is the multiplier-scaled trigger reading of largest
    /// absolute magnitude among the binding's triggers, not the sum. This
    /// lets opposing signed keys drive one logical axis without cancelling
    /// each other when both are down in the same frame. Unknown names
    /// resolve to 0.0.
    pub fn axis_value(&self, name: &str) -> f32 {
        let Some(binding) = self.axes.get(name) else {
            return 0.0;
        };
        let mut max = 0.0_f32;
        for axis_trigger in &binding.triggers {
            let reading = self.state.axis(axis_trigger.trigger) * axis_trigger.multiplier;
            if reading.abs() > max.abs() {
                max = reading;
            }
        }
        max
    }

    // Save/load

    /// Snapshot the binding tables into a serializable profile
    pub fn to_profile(&self) -> BindingProfile {
        BindingProfile {
            actions: self.actions.values().cloned().collect(),
            axes: self.axes.values().cloned().collect(),
        }
    }

    /// Replace the binding tables from a profile
    pub fn apply_profile(&mut self, profile: BindingProfile) {
        self.actions = profile
            .actions
            .into_iter()
            .map(|b| (b.name.clone(), b))
            .collect();
        self.axes = profile
            .axes
            .into_iter()
            .map(|b| (b.name.clone(), b))
            .collect();
    }

    /// Load bindings from a profile file, keeping defaults if it is absent
    pub fn load_bindings(&mut self, path: &Path) -> Result<(), BindingProfileError> {
        if let Some(profile) = BindingProfile::load(path)? {
            log::info!("Loaded input bindings from {}", path.display());
            self.apply_profile(profile);
        }
        Ok(())
    }

    /// Save the current bindings to a profile file
    pub fn save_bindings(&self, path: &Path) -> Result<(), BindingProfileError> {
        self.to_profile().save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with_move_axis() -> InputManager {
        let mut input = InputManager::new();
        input.set_axis_trigger("MoveForward", Input::KeyW, 1.0, None);
        input.set_axis_trigger("MoveForward", Input::KeyS, -1.0, None);
        input
    }

    #[test]
    fn test_axis_resolution_single_key() {
        let mut input = manager_with_move_axis();
        input.state_mut().set_action(Input::KeyW, true);
        assert_eq!(input.axis_value("MoveForward"), 1.0);
    }

    #[test]
    fn test_axis_resolution_picks_max_absolute_value() {
        let mut input = manager_with_move_axis();
        // Feed the opposing keys as analog readings so exactly one wins
        // deterministically: S reads stronger than W this frame.
        input.state_mut().set_axis(Input::KeyW, 0.6);
        input.state_mut().set_axis(Input::KeyS, 0.9);
        assert_eq!(input.axis_value("MoveForward"), -0.9);

        // Flip the magnitudes and the winner flips too; values never sum.
        input.state_mut().set_axis(Input::KeyW, 1.0);
        input.state_mut().set_axis(Input::KeyS, 0.2);
        assert_eq!(input.axis_value("MoveForward"), 1.0);
    }

    #[test]
    fn test_unknown_binding_names_resolve_inert() {
        let input = InputManager::new();
        assert!(!input.is_pressed("Never"));
        assert!(!input.is_just_pressed("Never"));
        assert!(!input.is_just_released("Never"));
        assert_eq!(input.axis_value("Never"), 0.0);
    }

    #[test]
    fn test_just_pressed_and_released_edges() {
        let mut input = InputManager::new();
        input.register_action_binding("Jump", &[Input::KeySpace]);

        input.state_mut().set_action(Input::KeySpace, true);
        assert!(input.is_just_pressed("Jump"));
        assert!(!input.is_just_released("Jump"));

        input.post_frame();
        // Still held: pressed, but no longer an edge.
        assert!(input.is_pressed("Jump"));
        assert!(!input.is_just_pressed("Jump"));

        input.state_mut().set_action(Input::KeySpace, false);
        assert!(input.is_just_released("Jump"));
    }

    #[test]
    fn test_trigger_index_padding() {
        let mut input = InputManager::new();
        input.set_action_trigger("Fire", Input::MouseLeft, Some(2));
        let binding = input.actions.get("Fire").expect("binding exists");
        assert_eq!(
            binding.triggers,
            vec![Input::Unknown, Input::Unknown, Input::MouseLeft]
        );
    }

    #[test]
    fn test_profile_apply_replaces_tables() {
        let mut input = manager_with_move_axis();
        input.register_action_binding("Jump", &[Input::KeySpace]);

        let profile = input.to_profile();
        let mut fresh = InputManager::new();
        fresh.apply_profile(profile);
        fresh.state_mut().set_action(Input::KeyW, true);
        assert_eq!(fresh.axis_value("MoveForward"), 1.0);
    }
}
