//! Named binding tables and their on-disk profile format

use super::state::Input;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// A named binary binding: keyboard keys, mouse buttons, and the like
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionBinding {
    /// The binding's logical name
    pub name: String,

    /// Triggers that can fire the action; any one suffices
    pub triggers: Vec<Input>,
}

impl ActionBinding {
    /// Create an empty action binding
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triggers: Vec::new(),
        }
    }
}

/// One trigger of an axis binding, scaled by a multiplier
///
/// Opposing signed keys share an axis this way: W maps to +1.0 and S to
/// -1.0 on the same "MoveForward" binding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AxisTrigger {
    /// The device trigger to read
    pub trigger: Input,

    /// Multiplier applied to the trigger's reading
    pub multiplier: f32,
}

/// A named scalar binding: joystick axes, mouse movement, opposing keys
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisBinding {
    /// The binding's logical name
    pub name: String,

    /// The binding's triggers
    pub triggers: Vec<AxisTrigger>,
}

impl AxisBinding {
    /// Create an empty axis binding
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triggers: Vec::new(),
        }
    }
}

/// Errors from loading or saving a binding profile
#[derive(Debug, Error)]
pub enum BindingProfileError {
    /// Profile file IO failure
    #[error("binding profile IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Profile file exists but could not be parsed
    #[error("binding profile parse error: {0}")]
    Parse(String),

    /// Profile could not be serialized
    #[error("binding profile serialize error: {0}")]
    Serialize(String),
}

/// Serializable snapshot of all registered bindings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BindingProfile {
    /// All action bindings
    pub actions: Vec<ActionBinding>,

    /// All axis bindings
    pub axes: Vec<AxisBinding>,
}

impl BindingProfile {
    /// Load a profile from a RON file
    ///
    /// A missing file is not an error; it returns `None` so callers keep
    /// their defaults. A malformed file is an error.
    pub fn load(path: &Path) -> Result<Option<Self>, BindingProfileError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)?;
        ron::from_str(&contents)
            .map(Some)
            .map_err(|e| BindingProfileError::Parse(e.to_string()))
    }

    /// Save the profile to a RON file
    pub fn save(&self, path: &Path) -> Result<(), BindingProfileError> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| BindingProfileError::Serialize(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
