use std::collections::VecDeque;

use crate::board::GameBoard;

/// Boards of earlier generations, so a play field can be rewound.
///
/// The generation zero board ("origin") is always kept. On top of that up to `depth`
/// of the most recent generations are cached, older ones get evicted and have to be
/// recomputed from the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    depth: usize,
    origin: GameBoard,

    /// Consecutive generations, oldest at the front.
    entries: VecDeque<(usize, GameBoard)>,
}

impl History {
    pub const DEFAULT_DEPTH: usize = 1024;

    pub fn new(origin: GameBoard, depth: usize) -> Self {
        Self {
            depth,
            origin,
            entries: VecDeque::with_capacity(depth.min(Self::DEFAULT_DEPTH)),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn origin(&self) -> &GameBoard {
        &self.origin
    }

    pub fn origin_mut(&mut self) -> &mut GameBoard {
        &mut self.origin
    }

    /// Forgets every cached generation and starts over from a new origin.
    pub fn reset(&mut self, origin: GameBoard) {
        self.origin = origin;
        self.entries.clear();
    }

    /// Forgets every cached generation, only the origin stays.
    pub fn clear_cache(&mut self) {
        self.entries.clear();
    }

    /// Archives the board of `generation`, which must directly follow the last recorded one.
    pub fn record(&mut self, generation: usize, board: GameBoard) {
        if self.depth == 0 {
            return;
        }

        if let Some((last_generation, _)) = self.entries.back() {
            if *last_generation + 1 != generation {
                // Out of sequence, the cache can't be trusted to be contiguous anymore.
                self.entries.clear();
            }
        }

        if self.entries.len() == self.depth {
            self.entries.pop_front();
        }

        self.entries.push_back((generation, board));
    }

    pub fn oldest_cached(&self) -> Option<usize> {
        self.entries.front().map(|(generation, _)| *generation)
    }

    pub fn newest_cached(&self) -> Option<usize> {
        self.entries.back().map(|(generation, _)| *generation)
    }

    pub fn contains(&self, generation: usize) -> bool {
        self.index_of(generation).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Takes the board of `generation` out of the cache. Every cached generation from
    /// `generation` onwards is dropped, whether or not the board was still cached.
    pub fn restore(&mut self, generation: usize) -> Option<GameBoard> {
        match self.index_of(generation) {
            Some(index) => {
                self.entries.truncate(index + 1);
                self.entries.pop_back().map(|(_, board)| board)
            }
            None => {
                self.entries
                    .retain(|(cached_generation, _)| *cached_generation < generation);
                None
            }
        }
    }

    fn index_of(&self, generation: usize) -> Option<usize> {
        let oldest = self.oldest_cached()?;
        let index = generation.checked_sub(oldest)?;

        (index < self.entries.len()).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_marker(marker: usize) -> GameBoard {
        let mut board = GameBoard::new(16, 1);
        board.set_cell(marker % 16, 0, true).unwrap();
        board
    }

    #[test]
    fn restore_drops_later_generations() {
        let mut history = History::new(GameBoard::new(16, 1), 8);
        for generation in 0..5 {
            history.record(generation, board_with_marker(generation));
        }

        assert_eq!(history.restore(2), Some(board_with_marker(2)));
        assert_eq!(history.newest_cached(), Some(1));
        assert!(!history.contains(3));
        assert_eq!(history.restore(4), None);
    }

    #[test]
    fn evicts_oldest_beyond_depth() {
        let mut history = History::new(GameBoard::new(16, 1), 3);
        for generation in 0..10 {
            history.record(generation, board_with_marker(generation));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.oldest_cached(), Some(7));
        assert_eq!(history.newest_cached(), Some(9));

        assert_eq!(history.restore(5), None);
        assert!(history.is_empty());
    }

    #[test]
    fn zero_depth_only_keeps_origin() {
        let origin = board_with_marker(3);
        let mut history = History::new(origin.clone(), 0);
        history.record(0, board_with_marker(1));

        assert!(history.is_empty());
        assert_eq!(history.origin(), &origin);
    }

    #[test]
    fn out_of_sequence_record_clears_cache() {
        let mut history = History::new(GameBoard::new(16, 1), 8);
        history.record(0, board_with_marker(0));
        history.record(1, board_with_marker(1));
        history.record(5, board_with_marker(5));

        assert_eq!(history.oldest_cached(), Some(5));
        assert_eq!(history.len(), 1);
    }
}
