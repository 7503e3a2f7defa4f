use std::{mem, time::Duration};

use analysis::Analysis;
use board::{GameBoard, TileState};
use history::History;
use log::{debug, info, trace};
use pos::Position;
use rand::Rng;
use rule::{NeighborCounts, Rule};
use serde::{Deserialize, Deserializer, Serialize};

pub use error::{GameError, GameResult};

pub mod analysis;
pub mod board;
pub mod error;
pub mod history;
pub mod pos;
pub mod preset;
pub mod rule;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayFieldConfig {
    pub width: usize,
    pub height: usize,

    /// Seconds per generation while the game is running.
    #[serde(deserialize_with = "deserialize_game_speed")]
    pub game_speed: f32,

    pub rule: Rule,

    /// How many of the most recent generations are cached for rewinding. Anything older
    /// is recomputed from generation zero.
    pub history_depth: usize,
}

impl Default for PlayFieldConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 30,
            game_speed: 1.0,
            rule: Rule::default(),
            history_depth: History::DEFAULT_DEPTH,
        }
    }
}

fn deserialize_game_speed<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let game_speed = f32::deserialize(deserializer)?;

    if !(PlayField::MIN_GAME_SPEED..=PlayField::MAX_GAME_SPEED).contains(&game_speed) {
        return Err(serde::de::Error::custom(format!(
            "game speed {game_speed} is out of range ({} to {} seconds)",
            PlayField::MIN_GAME_SPEED,
            PlayField::MAX_GAME_SPEED
        )));
    }

    Ok(game_speed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced,

    /// The next generation would be identical, nothing will ever change again on its own.
    Stable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayField {
    board: GameBoard,
    rule: Rule,
    generation: usize,
    game_speed: f32,
    history: History,
    analysis: Analysis,
}

impl PlayField {
    /// The shortest tick interval a running game may use.
    pub const MIN_GAME_SPEED: f32 = 0.001;

    /// The longest tick interval, a day per generation.
    pub const MAX_GAME_SPEED: f32 = 86_400.0;

    pub fn new(width: usize, height: usize) -> Self {
        Self::with_config(PlayFieldConfig {
            width,
            height,
            ..Default::default()
        })
    }

    pub fn with_config(config: PlayFieldConfig) -> Self {
        let board = GameBoard::new(config.width, config.height);

        Self {
            history: History::new(board.clone(), config.history_depth),
            board,
            rule: config.rule,
            generation: 0,
            game_speed: config.game_speed,
            analysis: Analysis::new(),
        }
    }

    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    pub fn width(&self) -> usize {
        self.board.width()
    }

    pub fn height(&self) -> usize {
        self.board.height()
    }

    pub fn cell(&self, x: usize, y: usize) -> GameResult<bool> {
        self.board.cell(x, y)
    }

    /// Edits the current generation. Edits of generation zero also change what the play
    /// field rewinds to.
    pub fn set_cell(&mut self, x: usize, y: usize, alive: bool) -> GameResult<()> {
        self.board.set_cell(x, y, alive)?;

        if self.generation == 0 {
            self.history.origin_mut().set_cell(x, y, alive)?;
        }

        Ok(())
    }

    /// Flips a cell and returns whether it's alive now.
    pub fn toggle_cell(&mut self, x: usize, y: usize) -> GameResult<bool> {
        let alive = !self.cell(x, y)?;
        self.set_cell(x, y, alive)?;
        Ok(alive)
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Makes the current board the new generation zero.
    pub fn reset_generation(&mut self) {
        self.generation = 0;
        self.history.reset(self.board.clone());
        self.analysis.clear();
    }

    pub fn game_speed(&self) -> f32 {
        self.game_speed
    }

    pub fn set_game_speed(&mut self, seconds_per_generation: f32) {
        self.game_speed = seconds_per_generation;
    }

    /// The game speed clamped to `MIN_GAME_SPEED..=MAX_GAME_SPEED`, NaN counts as the minimum.
    pub fn tick_interval(&self) -> Duration {
        let seconds = if self.game_speed.is_nan() {
            Self::MIN_GAME_SPEED
        } else {
            self.game_speed
                .clamp(Self::MIN_GAME_SPEED, Self::MAX_GAME_SPEED)
        };

        Duration::from_secs_f32(seconds)
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Cached generations were computed with the old rule, so they're dropped. Rewinding
    /// afterwards always replays from generation zero with the new rule.
    pub fn set_rule(&mut self, rule: Rule) {
        if rule == self.rule {
            return;
        }

        debug!("Rule changed from {} to {rule}", self.rule);
        self.rule = rule;
        self.history.clear_cache();
    }

    pub fn reanimate_rule(&self) -> NeighborCounts {
        self.rule.reanimate
    }

    pub fn keep_alive_rule(&self) -> NeighborCounts {
        self.rule.keep_alive
    }

    pub fn set_reanimate_rule<C>(&mut self, counts: C)
    where
        C: Into<NeighborCounts>,
    {
        let mut rule = self.rule;
        rule.set_reanimate_rule(counts);
        self.set_rule(rule);
    }

    pub fn set_keep_alive_rule<C>(&mut self, counts: C)
    where
        C: Into<NeighborCounts>,
    {
        let mut rule = self.rule;
        rule.set_keep_alive_rule(counts);
        self.set_rule(rule);
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    /// Counts the living cells and records the count of the current generation for the analysis.
    pub fn living_cells(&mut self) -> usize {
        let living_cells = self.board.count_alive();
        self.analysis.record(self.generation, living_cells);
        living_cells
    }

    /// Replaces the board with an empty one of the given size and starts over at generation zero.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.load(GameBoard::new(width, height));
    }

    pub fn reset(&mut self) {
        self.set_size(self.width(), self.height());
    }

    /// Installs `board` as the new generation zero.
    pub fn load(&mut self, board: GameBoard) {
        info!(
            "Loading a {}x{} board with {} living cells",
            board.width(),
            board.height(),
            board.count_alive()
        );

        self.board = board;
        self.reset_generation();
    }

    /// Loads a preset, the play field stays untouched if the preset is invalid.
    pub fn load_csv(&mut self, text: &str) -> GameResult<()> {
        let board = preset::from_csv(text)?;
        self.load(board);
        Ok(())
    }

    pub fn to_csv(&self) -> String {
        preset::to_csv(&self.board)
    }

    pub fn place_randomly(&mut self) {
        self.place_randomly_with(&mut rand::rng());
    }

    /// Starts over with 30% to 50% of the board alive.
    pub fn place_randomly_with<R>(&mut self, rng: &mut R)
    where
        R: Rng,
    {
        let mut board = GameBoard::new(self.width(), self.height());

        let area = board.area();
        let alive_cells = rng.random_range(area * 3 / 10..=area / 2);
        board.scatter_alive(alive_cells, rng);

        self.load(board);
    }

    /// Advances a single generation, unless the board wouldn't change anymore.
    pub fn step(&mut self) -> StepOutcome {
        let next_board = next_generation(&self.board, &self.rule);

        if next_board == self.board {
            debug!("Generation {} is stable", self.generation);
            return StepOutcome::Stable;
        }

        let previous_board = mem::replace(&mut self.board, next_board);
        self.history.record(self.generation, previous_board);
        self.generation += 1;

        trace!("Stepped to generation {}", self.generation);
        StepOutcome::Advanced
    }

    /// Moves to the `target` generation, in either direction. Going forward stops early
    /// once the board is stable. Returns whether the generation changed.
    pub fn step_to(&mut self, target: usize) -> bool {
        let start = self.generation;

        if target < start {
            self.rewind(target);
        } else {
            for _ in start..target {
                if self.step() == StepOutcome::Stable {
                    break;
                }
            }
        }

        let changed = self.generation != start;
        if changed {
            self.analysis.truncate(self.generation);
            debug!("Moved from generation {start} to {}", self.generation);
        }

        changed
    }

    fn rewind(&mut self, target: usize) {
        self.board = match self.history.restore(target) {
            Some(board) => board,
            None => {
                debug!("Generation {target} isn't cached anymore, replaying from generation 0");

                let mut board = self.history.origin().clone();
                for generation in 0..target {
                    let next_board = next_generation(&board, &self.rule);
                    self.history
                        .record(generation, mem::replace(&mut board, next_board));
                }
                board
            }
        };

        self.generation = target;
    }
}

fn next_generation(board: &GameBoard, rule: &Rule) -> GameBoard {
    let next_tiles = board
        .enumerate_tiles()
        .map(|(tile_pos, tile)| next_tile(board, rule, tile_pos, *tile))
        .collect();

    GameBoard::with_tiles(board.width(), board.height(), next_tiles)
}

fn next_tile(board: &GameBoard, rule: &Rule, tile_pos: Position, tile: TileState) -> TileState {
    let alive_neighbor_count = board.alive_neighbor_count(tile_pos);
    TileState::from(rule.next_alive(tile.is_alive(), alive_neighbor_count))
}
