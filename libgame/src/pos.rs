use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    const NEIGHBOR_RELATIVE_POSITIONS: [[isize; 2]; 8] = [
        [-1, -1],
        [-1, 0],
        [-1, 1],
        [0, -1],
        [0, 1],
        [1, -1],
        [1, 0],
        [1, 1],
    ];

    /// The surrounding positions that don't underflow. Positions past the far edges are still
    /// yielded, it's up to the board to reject those.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        Self::NEIGHBOR_RELATIVE_POSITIONS
            .into_iter()
            .filter_map(move |[rel_x, rel_y]| {
                Some(Position {
                    x: self.x.checked_add_signed(rel_x)?,
                    y: self.y.checked_add_signed(rel_y)?,
                })
            })
    }
}

impl From<[usize; 2]> for Position {
    fn from(value: [usize; 2]) -> Self {
        Self {
            x: value[0],
            y: value[1],
        }
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl From<Position> for [usize; 2] {
    fn from(value: Position) -> Self {
        [value.x, value.y]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
