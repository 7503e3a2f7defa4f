use std::{cmp::Ordering, fmt::Write};

use colored::{ColoredString, Colorize};
use libgame::{PlayField, analysis::Analysis, board::GameBoard};

pub fn status(play_field: &PlayField, running: bool) -> String {
    format!(
        "{}x{} | gen {} | B{}/S{} | {}s per gen | {}",
        play_field.width(),
        play_field.height(),
        play_field.generation(),
        play_field.reanimate_rule(),
        play_field.keep_alive_rule(),
        play_field.game_speed(),
        if running { "running".green() } else { "paused".yellow() },
    )
}

/// The summary of every recorded generation, followed by the `recent` latest samples.
pub fn stats(analysis: &Analysis, recent: usize) -> String {
    let Some(summary) = analysis.summary() else {
        return "No generations recorded".to_owned();
    };

    let mut report = String::new();

    let _ = writeln!(report, "Generations      {}", summary.generations);
    let _ = writeln!(report, "Min cells        {}", summary.min_cells);
    let _ = writeln!(report, "Max cells        {}", summary.max_cells);
    let _ = writeln!(report, "Average cells    {:.2}", summary.average_cells);
    let _ = writeln!(report, "Average change   {:.2}", summary.average_change);
    let _ = writeln!(report, "Average change % {:.2}", summary.average_percent_change);

    let samples = analysis.samples().rev().take(recent).collect::<Vec<_>>();
    for (generation, sample) in samples.into_iter().rev() {
        let _ = writeln!(
            report,
            "gen {generation:7}: {:6} | {} | {}",
            sample.living_cells,
            change_colored(sample.change, 0.0, |change| format!("{change:+6}")),
            change_colored(sample.percent_change, 0.0, |percent| format!(
                "{percent:+8.2}%"
            )),
        );
    }

    report
}

pub fn board(board: &GameBoard) -> String {
    board
        .rows()
        .map(|row| {
            row.iter()
                .map(|tile| if tile.is_alive() { '#' } else { '.' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn change_colored<T>(new: T, old: T, fmt_fn: fn(T) -> String) -> ColoredString
where
    T: PartialOrd,
{
    match new.partial_cmp(&old) {
        Some(Ordering::Equal) | None => fmt_fn(new).white(),
        Some(Ordering::Greater) => fmt_fn(new).bright_green(),
        Some(Ordering::Less) => fmt_fn(new).bright_red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_lists_summary_and_latest_samples() {
        colored::control::set_override(false);

        let mut analysis = Analysis::new();
        analysis.record(0, 10);
        analysis.record(1, 15);
        analysis.record(2, 6);

        let report = stats(&analysis, 2);
        let lines = report.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "Generations      2");
        assert_eq!(lines[1], "Min cells        6");
        assert_eq!(lines[2], "Max cells        15");
        assert_eq!(lines[3], "Average cells    10.33");
        assert_eq!(lines[4], "Average change   8.00");
        assert_eq!(lines[6], "gen       1:     15 |     +5 |   +50.00%");
        assert_eq!(lines[7], "gen       2:      6 |     -9 |   -60.00%");
    }

    #[test]
    fn board_uses_one_line_per_row() {
        let board = GameBoard::from_rows([[true, false], [false, false], [false, true]]).unwrap();
        assert_eq!(super::board(&board), "#.\n..\n.#");
    }
}
