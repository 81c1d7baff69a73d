//! Engine shell: owns the world and drives the frame loop

use std::path::PathBuf;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::{AssetConfig, AssetManager};
use crate::config::Config;
use crate::foundation::time::{FixedTimestep, Timer};
use crate::game_module::GameModule;
use crate::gameplay::World;

/// Top-level engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fixed simulation rate in steps per second
    pub fixed_rate_hz: f32,

    /// Asset loading configuration
    pub assets: AssetConfig,

    /// Input binding profile applied at startup, if the file exists
    pub bindings_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_rate_hz: 60.0,
            assets: AssetConfig::default(),
            bindings_path: None,
        }
    }
}

impl Config for EngineConfig {}

/// Errors raised while bringing the engine up or running it
#[derive(Debug, Error)]
pub enum EngineError {
    /// A subsystem failed to initialize
    #[error("engine initialization failed: {0}")]
    InitializationFailed(String),

    /// The engine configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// An asset operation failed during startup
    #[error("asset error: {0}")]
    Asset(#[from] crate::assets::AssetError),
}

/// The engine: a [`World`] plus the loop that drives it
///
/// Each frame runs in a fixed order: the host feeds input into the world,
/// zero or more fixed steps fire, exactly one variable update follows, and
/// the input manager rolls its frame over. Rendering is the host's job,
/// fed from the scene graph's drawable extraction.
pub struct Engine {
    world: World,
    timer: Timer,
    fixed: FixedTimestep,
    running: bool,
}

impl Engine {
    /// Bring up the engine subsystems from a configuration
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        info!("initializing engine");
        let assets = AssetManager::new(&config.assets)?;
        let mut world = World::new(assets);
        let fixed = FixedTimestep::from_rate(config.fixed_rate_hz);
        world.time_mut().fixed_delta = fixed.step();
        if let Some(path) = &config.bindings_path {
            world
                .input_mut()
                .load_bindings(path)
                .map_err(|e| EngineError::InitializationFailed(format!("input bindings: {e}")))?;
        }
        Ok(Self {
            world,
            timer: Timer::new(),
            fixed,
            running: true,
        })
    }

    /// Run the main loop until the world requests shutdown
    pub fn run<M: GameModule>(config: EngineConfig, module: &mut M) -> Result<(), EngineError> {
        let mut engine = Self::new(&config)?;
        info!("starting {}", module.name());
        module.on_game_start(&mut engine.world);
        while engine.running {
            engine.frame(module);
        }
        module.on_game_shutdown(&mut engine.world);
        info!("engine shutdown complete");
        Ok(())
    }

    /// Advance one frame using measured wall-clock time
    ///
    /// Hosts embedding the engine in their own loop call this after feeding
    /// the frame's input and before rendering.
    pub fn frame<M: GameModule>(&mut self, module: &mut M) {
        self.timer.update();
        self.step(self.timer.delta_time(), module);
    }

    fn step<M: GameModule>(&mut self, delta_time: f32, module: &mut M) {
        {
            let time = self.world.time_mut();
            time.delta = delta_time;
            time.runtime += delta_time;
        }
        let steps = self.fixed.advance(delta_time);
        for _ in 0..steps {
            module.fixed_update(&mut self.world);
            self.world.on_fixed_update();
        }
        module.update(&mut self.world);
        self.world.on_update();
        self.world.input_mut().post_frame();
        if self.world.shutdown_requested() {
            self.running = false;
        }
    }

    /// Whether the loop will run another frame
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Input;

    #[derive(Default)]
    struct CountingModule {
        updates: u32,
        fixed_updates: u32,
    }

    impl GameModule for CountingModule {
        fn name(&self) -> &str {
            "counting"
        }

        fn on_game_start(&mut self, _world: &mut World) {}

        fn update(&mut self, _world: &mut World) {
            self.updates += 1;
        }

        fn fixed_update(&mut self, _world: &mut World) {
            self.fixed_updates += 1;
        }
    }

    fn test_engine() -> Engine {
        let config = EngineConfig {
            fixed_rate_hz: 60.0,
            assets: AssetConfig {
                manifest_path: None,
                search_paths: Vec::new(),
            },
            bindings_path: None,
        };
        Engine::new(&config).unwrap()
    }

    #[test]
    fn test_slow_frame_runs_capped_fixed_steps_and_one_update() {
        let mut engine = test_engine();
        let mut module = CountingModule::default();
        engine.step(10.0 / 60.0, &mut module);
        assert_eq!(module.fixed_updates, 3);
        assert_eq!(module.updates, 1);
    }

    #[test]
    fn test_short_frame_skips_fixed_but_still_updates() {
        let mut engine = test_engine();
        let mut module = CountingModule::default();
        engine.step(0.5 / 60.0, &mut module);
        assert_eq!(module.fixed_updates, 0);
        assert_eq!(module.updates, 1);
    }

    #[test]
    fn test_input_rolls_over_at_end_of_frame() {
        let mut engine = test_engine();
        let mut module = CountingModule::default();
        engine
            .world_mut()
            .input_mut()
            .register_action_binding("Fire", &[Input::MouseLeft]);
        engine
            .world_mut()
            .input_mut()
            .state_mut()
            .set_action(Input::MouseLeft, true);
        assert!(engine.world().input().is_just_pressed("Fire"));
        engine.step(1.0 / 60.0, &mut module);
        // the held button is no longer a press edge next frame
        assert!(engine.world().input().is_pressed("Fire"));
        assert!(!engine.world().input().is_just_pressed("Fire"));
    }

    #[test]
    fn test_world_sees_the_configured_fixed_delta() {
        let engine = test_engine();
        assert!((engine.world().time().fixed_delta - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_shutdown_request_stops_the_loop() {
        let mut engine = test_engine();
        let mut module = CountingModule::default();
        engine.world_mut().request_shutdown();
        engine.step(1.0 / 60.0, &mut module);
        assert!(!engine.is_running());
    }
}
