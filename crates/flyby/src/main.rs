//! Flyby: a free-flight camera demo for the Kestrel engine

mod game_state;
mod module;
mod pawn;

use std::path::Path;

use kestrel::prelude::*;
use log::warn;

use crate::module::FlybyGame;

const CONFIG_PATH: &str = "flyby.toml";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    kestrel::foundation::logging::init();

    let config = match EngineConfig::load_from_file(Path::new(CONFIG_PATH)) {
        Ok(config) => config,
        Err(err) => {
            warn!("no usable {CONFIG_PATH}, using defaults: {err}");
            EngineConfig::default()
        }
    };

    let mut game = FlybyGame::default();
    Engine::run(config, &mut game)?;
    Ok(())
}
