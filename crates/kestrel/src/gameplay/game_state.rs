//! The per-mode game state slot

use crate::gameplay::{ControllerKey, World};

/// The rules object for one mode of play
///
/// Exactly zero or one game state is installed in a [`World`] at a time.
/// Installing a new one tears the world down first: the old state's
/// [`on_stop`](Self::on_stop) runs, every controller and object is removed,
/// and only then is the new state constructed and started. After
/// [`on_start`](Self::on_start), the World synthesizes a single local
/// player connection by asking the state for a player controller and
/// reporting it through [`on_player_connected`](Self::on_player_connected).
pub trait GameState {
    /// The world has been cleared and this state is now active
    fn on_start(&mut self, _world: &mut World) {}

    /// This state is about to be replaced; the world is still intact
    fn on_stop(&mut self, _world: &mut World) {}

    /// Runs once per rendered frame, before any object updates
    fn update(&mut self, _world: &mut World) {}

    /// Runs on the fixed timestep, before any object fixed updates
    fn fixed_update(&mut self, _world: &mut World) {}

    /// Produce the controller for a newly connected player
    ///
    /// The default hands out a plain player controller; states with custom
    /// controller setup override this.
    fn create_player_controller(&mut self, world: &mut World) -> ControllerKey {
        world.create_player_controller()
    }

    /// A player controller was created for a new connection
    ///
    /// The usual place to spawn and possess that player's pawn.
    fn on_player_connected(&mut self, _world: &mut World, _controller: ControllerKey) {}
}
