//! Input management system
//!
//! Two layers, mirroring the split between device polling and gameplay:
//!
//! - [`InputState`] is the raw per-frame device snapshot. The host platform
//!   layer feeds it from OS callbacks; it keeps a previous-frame copy so
//!   edge transitions can be detected without repeat events.
//! - [`InputManager`] maps logical binding names ("Jump", "MoveForward") to
//!   device triggers and answers the queries controllers make every frame.
//!
//! Unknown binding names always resolve to the inert defaults (false / 0.0);
//! an unconfigured binding is an expected state and must never crash
//! gameplay polling.

mod bindings;
mod manager;
mod state;

pub use bindings::{ActionBinding, AxisBinding, AxisTrigger, BindingProfile, BindingProfileError};
pub use manager::InputManager;
pub use state::{Input, InputState};

/// Which action edge a gameplay callback is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEvent {
    /// Fire on the frame the action becomes pressed
    Pressed,

    /// Fire on the frame the action becomes released
    Released,
}
