//! Validation of text typed into the console. Anything rejected here never reaches the play field.

use std::sync::LazyLock;

use anyhow::{Context, bail};
use libgame::{PlayField, rule::NeighborCounts};
use regex::Regex;

static INTEGER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("integer pattern is valid"));

static GAME_SPEED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[1-9]\d*(?:\.\d*)?|\d*\.\d{0,2}[1-9]0*)$").expect("game speed pattern is valid")
});

pub fn parse_integer(text: &str, what: &str) -> anyhow::Result<usize> {
    if !INTEGER_PATTERN.is_match(text) {
        bail!("The {what} (\"{text}\") is not valid! Only integers are allowed.");
    }

    text.parse()
        .with_context(|| format!("The {what} (\"{text}\") is too large."))
}

/// Seconds per generation, from 0.001 up to a day.
pub fn parse_game_speed(text: &str) -> anyhow::Result<f32> {
    if !GAME_SPEED_PATTERN.is_match(text) {
        bail!(
            "The game speed (\"{text}\") is not valid! Only integers or floating point values are allowed. \
             Values below 1 may have at most 3 decimal places. The values are interpreted in seconds, \
             the minimum value is 0.001."
        );
    }

    let game_speed: f32 = text.parse()?;
    if !game_speed.is_finite() || game_speed > PlayField::MAX_GAME_SPEED {
        bail!(
            "The game speed (\"{text}\") is too slow! The maximum value is {} seconds.",
            PlayField::MAX_GAME_SPEED
        );
    }

    Ok(game_speed)
}

pub fn parse_rule(text: &str, what: &str) -> anyhow::Result<NeighborCounts> {
    text.parse::<NeighborCounts>()
        .with_context(|| format!("The {what} rule is not valid!"))
}
