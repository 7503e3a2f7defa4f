use itertools::Itertools;
use rand::Rng;

use crate::{
    error::{GameError, GameResult},
    pos::Position,
};

/// A rectangular play field, stored row-major (`y` outer, `x` inner).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameBoard {
    width: usize,
    height: usize,
    tiles: Vec<TileState>,
}

impl GameBoard {
    pub fn new(width: usize, height: usize) -> Self {
        // A board without rows has no meaningful row length.
        let width = if height == 0 { 0 } else { width };

        let tiles = vec![TileState::default(); width * height];
        Self::with_tiles(width, height, tiles)
    }

    pub(crate) fn with_tiles(width: usize, height: usize, tiles: Vec<TileState>) -> Self {
        debug_assert_eq!(tiles.len(), width * height);

        Self {
            width,
            height,
            tiles,
        }
    }

    /// Builds a board from a row matrix, every row must have the length of the first one.
    pub fn from_rows<I, R>(rows: I) -> GameResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = bool>,
    {
        let mut width = None;
        let mut height = 0;
        let mut tiles = Vec::new();

        for (y, row) in rows.into_iter().enumerate() {
            let row_start = tiles.len();
            tiles.extend(row.into_iter().map(TileState::from));
            let row_len = tiles.len() - row_start;

            let expected_len = *width.get_or_insert(row_len);
            if row_len != expected_len {
                return Err(GameError::InvalidPresetFormat {
                    line: Some(y),
                    reason: format!("row has {row_len} cells, expected {expected_len}"),
                });
            }

            height += 1;
        }

        Ok(Self::with_tiles(width.unwrap_or(0), height, tiles))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn area(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile<P>(&self, pos: P) -> Option<&TileState>
    where
        P: Into<Position>,
    {
        let index = self.pos_to_index(pos)?;
        self.tiles.get(index)
    }

    pub fn tile_mut<P>(&mut self, pos: P) -> Option<&mut TileState>
    where
        P: Into<Position>,
    {
        let index = self.pos_to_index(pos)?;
        self.tiles.get_mut(index)
    }

    pub fn cell(&self, x: usize, y: usize) -> GameResult<bool> {
        self.tile([x, y])
            .map(|tile| tile.is_alive())
            .ok_or_else(|| self.out_of_range(x, y))
    }

    pub fn set_cell(&mut self, x: usize, y: usize, alive: bool) -> GameResult<()> {
        let error = self.out_of_range(x, y);
        let tile = self.tile_mut([x, y]).ok_or(error)?;

        *tile = TileState::from(alive);
        Ok(())
    }

    pub fn enumerate_tiles(&self) -> impl Iterator<Item = (Position, &TileState)> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(index, tile)| (self.index_to_pos(index), tile))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[TileState]> {
        (0..self.height).map(|y| &self.tiles[y * self.width..(y + 1) * self.width])
    }

    pub fn count_cells(&self, state: TileState) -> usize {
        self.tiles.iter().filter(|tile| **tile == state).count()
    }

    pub fn count_alive(&self) -> usize {
        self.count_cells(TileState::Alive)
    }

    /// Counts the living cells around `pos`, positions outside of the board don't count.
    pub fn alive_neighbor_count(&self, pos: Position) -> usize {
        pos.neighbors()
            .filter_map(|neighbor| self.tile(neighbor))
            .filter(|tile| tile.is_alive())
            .count()
    }

    /// Brings `alive_cells` distinct dead cells to life, chosen uniformly at random.
    /// Returns how many cells were actually placed, which is less than requested
    /// when the board runs out of dead cells.
    pub fn scatter_alive<R>(&mut self, alive_cells: usize, rng: &mut R) -> usize
    where
        R: Rng,
    {
        let mut available_board_positions = (0..self.height)
            .cartesian_product(0..self.width)
            .map(|(y, x)| Position { x, y })
            .filter(|pos| self.tile(*pos).is_some_and(|tile| !tile.is_alive()))
            .collect_vec();

        let mut placed = 0;
        while placed < alive_cells && !available_board_positions.is_empty() {
            let chosen_position_index = rng.random_range(0..available_board_positions.len());
            let chosen_position = available_board_positions.swap_remove(chosen_position_index);

            if let Some(tile) = self.tile_mut(chosen_position) {
                *tile = TileState::Alive;
                placed += 1;
            }
        }

        placed
    }

    fn out_of_range(&self, x: usize, y: usize) -> GameError {
        GameError::OutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    fn pos_to_index<P>(&self, pos: P) -> Option<usize>
    where
        P: Into<Position>,
    {
        let Position { x, y } = pos.into();

        if x >= self.width {
            return None;
        }

        if y >= self.height {
            return None;
        }

        Some(x + (y * self.width))
    }

    fn index_to_pos(&self, index: usize) -> Position {
        let y = index / self.width;
        let x = index % self.width;
        Position { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileState {
    Alive,

    #[default]
    Dead,
}

impl TileState {
    pub fn is_alive(self) -> bool {
        self == TileState::Alive
    }

    pub fn toggled(self) -> Self {
        match self {
            TileState::Alive => TileState::Dead,
            TileState::Dead => TileState::Alive,
        }
    }
}

impl From<bool> for TileState {
    fn from(alive: bool) -> Self {
        if alive {
            TileState::Alive
        } else {
            TileState::Dead
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    /// Builds a board from a `0`/`1` matrix, like the ones found in the preset files.
    pub(crate) fn board_from_bits<const W: usize>(rows: &[[u8; W]]) -> GameBoard {
        GameBoard::from_rows(rows.iter().map(|row| row.iter().map(|bit| *bit == 1)))
            .expect("fixture rows are rectangular")
    }

    #[test]
    fn dimensions() {
        let board = GameBoard::new(15, 16);
        assert_eq!(board.width(), 15);
        assert_eq!(board.height(), 16);
        assert_eq!(board.count_alive(), 0);

        let board = GameBoard::new(7, 0);
        assert_eq!(board.width(), 0);
        assert_eq!(board.height(), 0);
    }

    #[test]
    fn get_cell() {
        let board = board_from_bits(&[[0, 0, 1, 0], [0, 0, 0, 0], [1, 0, 0, 0], [0, 1, 0, 0]]);

        assert_eq!(board.cell(0, 0), Ok(false));
        assert_eq!(board.cell(2, 0), Ok(true));
        assert_eq!(board.cell(2, 1), Ok(false));
        assert_eq!(board.cell(0, 2), Ok(true));
        assert_eq!(board.cell(1, 3), Ok(true));
        assert_eq!(board.count_alive(), 3);
    }

    #[test]
    fn set_cell_out_of_range() {
        let mut board = GameBoard::new(15, 16);

        board.set_cell(14, 8, true).unwrap();
        assert_eq!(board.tile([14, 8]), Some(&TileState::Alive));

        assert_eq!(
            board.set_cell(15, 8, true),
            Err(GameError::OutOfRange {
                x: 15,
                y: 8,
                width: 15,
                height: 16
            })
        );
        assert!(matches!(
            board.set_cell(8, 16, true),
            Err(GameError::OutOfRange { .. })
        ));
        assert!(board.cell(8, 16).is_err());
        assert_eq!(board.count_alive(), 1);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let result = GameBoard::from_rows(vec![vec![true, false, false], vec![false, false]]);

        assert!(matches!(
            result,
            Err(GameError::InvalidPresetFormat { line: Some(1), .. })
        ));
    }

    #[test]
    fn rows_follow_row_major_order() {
        let board = board_from_bits(&[[1, 0, 0], [0, 1, 1]]);
        let rows = board
            .rows()
            .map(|row| row.iter().map(|tile| tile.is_alive()).collect_vec())
            .collect_vec();

        assert_eq!(rows, vec![vec![true, false, false], vec![false, true, true]]);
    }

    #[test]
    fn neighbor_count_is_clipped_at_edges() {
        let board = board_from_bits(&[[1, 1, 1], [1, 1, 1], [1, 1, 1]]);

        assert_eq!(board.alive_neighbor_count(Position { x: 0, y: 0 }), 3);
        assert_eq!(board.alive_neighbor_count(Position { x: 1, y: 0 }), 5);
        assert_eq!(board.alive_neighbor_count(Position { x: 1, y: 1 }), 8);
    }

    #[test]
    fn scatter_alive_stops_when_full() {
        let mut board = GameBoard::new(3, 3);
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(board.scatter_alive(4, &mut rng), 4);
        assert_eq!(board.count_alive(), 4);

        assert_eq!(board.scatter_alive(100, &mut rng), 5);
        assert_eq!(board.count_alive(), 9);
    }
}
