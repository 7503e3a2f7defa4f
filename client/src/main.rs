use std::{
    env,
    process::exit,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
    thread,
};

use anyhow::anyhow;
use config::Config;
use libgame::PlayField;
use log::{error, info};
use presets::PresetLibrary;
use ticker::TickerHost;

mod cli;
mod config;
mod input;
mod presets;
mod renderer;
mod report;
mod ticker;

pub struct State {
    play_field: PlayField,
    ticker: Option<TickerHost>,
    presets: PresetLibrary,
}

impl State {
    pub fn new(play_field: PlayField, presets: PresetLibrary) -> Self {
        Self {
            play_field,
            ticker: None,
            presets,
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Stops a running game, returns whether it was running.
    pub fn pause(&mut self) -> bool {
        match self.ticker.take() {
            Some(ticker) => {
                ticker.stop();
                info!("Paused at generation {}", self.play_field.generation());
                true
            }
            None => false,
        }
    }
}

pub fn read_state(state_arc: &RwLock<State>) -> anyhow::Result<RwLockReadGuard<'_, State>> {
    state_arc
        .read()
        .map_err(|_| anyhow!("State lock is poisoned"))
}

pub fn write_state(state_arc: &RwLock<State>) -> anyhow::Result<RwLockWriteGuard<'_, State>> {
    state_arc
        .write()
        .map_err(|_| anyhow!("State lock is poisoned"))
}

fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()
        .unwrap_or_else(|e| eprintln!("Couldn't initialize logging: {e}"));

    if let Err(e) = run() {
        error!("{e:?}");
        exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = match env::args().nth(1) {
        Some(config_path) => Config::load(config_path)?,
        None => Config::default(),
    };

    let mut play_field = PlayField::with_config(config.play_field);
    play_field.living_cells();

    let presets = PresetLibrary::open(&config.preset_dir)?;
    info!(
        "{} presets available in {}",
        presets.names().count(),
        presets.dir().display()
    );

    let state_arc = Arc::new(RwLock::new(State::new(play_field, presets)));

    let cli_state_arc = state_arc.clone();
    thread::spawn(move || cli::run_cli(cli_state_arc));

    renderer::run(state_arc, config.window)
}
