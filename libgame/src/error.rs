use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cell ({x}, {y}) is outside of the {width}x{height} play field")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// `line` is zero based, `None` when the preset as a whole is unusable (e.g. empty).
    #[error("invalid preset{}: {reason}", line.map(|line| format!(" (line {})", line + 1)).unwrap_or_default())]
    InvalidPresetFormat {
        line: Option<usize>,
        reason: String,
    },

    #[error(
        "invalid rule \"{0}\", expected one or more neighbor counts from 0 to 8 separated by commas (e.g. \"2,3\")"
    )]
    InvalidRuleText(String),
}

pub type GameResult<T> = Result<T, GameError>;
