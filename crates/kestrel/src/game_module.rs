//! The trait a game implements to plug into the engine loop

use crate::gameplay::World;

/// Entry point of a game built on the engine
///
/// The engine owns the loop; the module gets called at the seams. The usual
/// pattern is a thin module that registers input bindings and installs a
/// game state in [`on_game_start`](Self::on_game_start), then lets the
/// state and behaviors do the per-frame work.
pub trait GameModule {
    /// Human-readable game name, used for logging
    fn name(&self) -> &str;

    /// Runs once before the first frame, against a fresh world
    fn on_game_start(&mut self, world: &mut World);

    /// Runs once per frame, before world dispatch
    fn update(&mut self, _world: &mut World) {}

    /// Runs on every fixed step, before world dispatch
    fn fixed_update(&mut self, _world: &mut World) {}

    /// Runs once after the loop ends, before the world is dropped
    fn on_game_shutdown(&mut self, _world: &mut World) {}
}
