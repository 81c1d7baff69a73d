//! # Kestrel Engine
//!
//! The runtime core of a small real-time 3D game engine: a fixed/variable
//! rate game loop driving a hierarchical scene graph of spawned objects,
//! each composed of attachable components and controlled indirectly through
//! possession-based controllers.
//!
//! ## Architecture
//!
//! - **World**: aggregate owner of all live game objects, controllers, and
//!   the active game state; dispatches per-frame and fixed-tick updates in a
//!   fixed order.
//! - **Scene graph**: arena-backed transform tree with re-parenting, world
//!   matrix composition, and drawable extraction.
//! - **Possession**: exclusive binding of a controller to a pawn, routing
//!   named input bindings into gameplay callables.
//!
//! Rendering, windowing, and device polling live outside this crate; the
//! host feeds input snapshots in and walks the scene graph for drawables.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kestrel::prelude::*;
//!
//! struct MyGame;
//!
//! impl GameModule for MyGame {
//!     fn name(&self) -> &str {
//!         "My Game"
//!     }
//!
//!     fn on_game_start(&mut self, world: &mut World) {
//!         world.input_mut().register_axis_binding("MoveForward", Input::KeyW, 1.0);
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let mut game = MyGame;
//!     Engine::run(config, &mut game)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod scene;
pub mod assets;
pub mod input;
pub mod gameplay;

mod config;
mod engine;
mod game_module;

pub use config::{Config, ConfigError};
pub use engine::{Engine, EngineConfig, EngineError};
pub use game_module::GameModule;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Config, ConfigError,
        Engine, EngineConfig, EngineError,
        GameModule,
        foundation::{
            math::{Mat4, Quat, Transform, Vec3},
            time::{FixedTimestep, Timer},
        },
        scene::{DrawableInstance, NodeKey, NodePayload, Projection, SceneGraph},
        assets::{Asset, AssetError, AssetHandle, AssetManager, StaticMesh},
        input::{ActionEvent, Input, InputManager},
        gameplay::{
            Behavior, Brain, Component, ComponentBehavior, Controller, ControllerKey,
            GameObject, GameState, InputRouter, ObjectKey, UniqueId, World,
        },
    };
}
