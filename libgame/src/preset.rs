//! The preset row format: one line per row, cells written as `0`/`1` separated by commas.

use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

use crate::{
    board::GameBoard,
    error::{GameError, GameResult},
};

static PRESET_LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01],)*[01]$").expect("preset line pattern is valid"));

#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

pub fn to_csv(board: &GameBoard) -> String {
    board
        .rows()
        .map(|row| {
            let line = row
                .iter()
                .map(|tile| if tile.is_alive() { "1" } else { "0" })
                .join(",");

            line + LINE_SEPARATOR
        })
        .collect()
}

/// Parses a whole preset file. Both `\n` and `\r\n` line endings are accepted.
pub fn from_csv(text: &str) -> GameResult<GameBoard> {
    from_lines(text.lines())
}

pub fn from_lines<I, S>(lines: I) -> GameResult<GameBoard>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let rows = lines
        .into_iter()
        .enumerate()
        .map(|(y, line)| parse_line(y, line.as_ref()))
        .collect::<GameResult<Vec<_>>>()?;

    if rows.is_empty() {
        return Err(GameError::InvalidPresetFormat {
            line: None,
            reason: "preset contains no rows".to_owned(),
        });
    }

    GameBoard::from_rows(rows)
}

fn parse_line(y: usize, line: &str) -> GameResult<Vec<bool>> {
    if !PRESET_LINE_PATTERN.is_match(line) {
        return Err(GameError::InvalidPresetFormat {
            line: Some(y),
            reason: format!("\"{line}\" is not a comma separated list of 0s and 1s"),
        });
    }

    Ok(line.split(',').map(|cell| cell == "1").collect())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::board::tests::board_from_bits;

    #[test]
    fn writes_rows_top_to_bottom() {
        let board = board_from_bits(&[[1, 0, 0], [0, 1, 1]]);

        assert_eq!(
            to_csv(&board),
            format!("1,0,0{LINE_SEPARATOR}0,1,1{LINE_SEPARATOR}")
        );
    }

    #[test]
    fn reads_rows() {
        let board = from_csv("0,0,1\n1,1,0\n").unwrap();
        assert_eq!(board, board_from_bits(&[[0, 0, 1], [1, 1, 0]]));

        let board = from_csv("0,1\r\n1,0").unwrap();
        assert_eq!(board, board_from_bits(&[[0, 1], [1, 0]]));
    }

    #[test]
    fn ragged_preset_is_rejected() {
        let result = from_lines(["1,0,0,0", "0,0,0", "0,0,0"]);

        assert!(matches!(
            result,
            Err(GameError::InvalidPresetFormat { line: Some(1), .. })
        ));
    }

    #[test]
    fn malformed_presets_are_rejected() {
        assert!(matches!(
            from_lines(Vec::<String>::new()),
            Err(GameError::InvalidPresetFormat { line: None, .. })
        ));
        assert!(from_csv("").is_err());

        for invalid in ["1,0,2", "1,,0", "1,0,", " 1,0", "10", "1;0", ""] {
            assert!(
                matches!(
                    from_lines(["1,1,1", invalid]),
                    Err(GameError::InvalidPresetFormat { line: Some(1), .. })
                ),
                "{invalid:?} should be rejected"
            );
        }
    }

    proptest! {
        #[test]
        fn csv_round_trip(rows in (1..12_usize).prop_flat_map(|width| {
            prop::collection::vec(prop::collection::vec(any::<bool>(), width), 1..12)
        })) {
            let board = GameBoard::from_rows(rows).unwrap();
            let parsed = from_csv(&to_csv(&board)).unwrap();

            prop_assert_eq!(parsed, board);
        }
    }
}
