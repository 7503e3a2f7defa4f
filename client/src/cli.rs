use std::{
    io,
    path::PathBuf,
    process::exit,
    sync::{Arc, RwLock},
};

use anyhow::{Context, bail};
use libgame::StepOutcome;
use log::error;
use strum::{EnumIter, EnumMessage, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{State, input, read_state, report, ticker::TickerHost, write_state};

const RECENT_SAMPLES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, EnumMessage, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
enum Command {
    #[strum(message = "[n]  advance n generations (default 1)")]
    Step,
    #[strum(message = "go back one generation")]
    Back,
    #[strum(message = "<generation>  jump to a generation, forwards or backwards")]
    Goto,
    #[strum(message = "go back to generation 0")]
    Restart,
    #[strum(message = "step automatically at the game speed")]
    Run,
    #[strum(message = "pause a running game")]
    Stop,
    #[strum(message = "<seconds>  seconds per generation while running")]
    Speed,
    #[strum(message = "[<reanimate> <keep_alive>]  show or change the rules, e.g. \"rules 3 2,3\"")]
    Rules,
    #[strum(message = "<x> <y>  replace the board with an empty one")]
    Resize,
    #[strum(message = "kill every cell and start over")]
    Reset,
    #[strum(message = "start over with 30% to 50% of the cells alive")]
    Random,
    #[strum(message = "<x> <y>  flip a single cell")]
    Toggle,
    #[strum(message = "list the presets in the preset directory")]
    Presets,
    #[strum(message = "<name|path>  load a preset")]
    Load,
    #[strum(message = "[path]  save the board as a preset")]
    Save,
    #[strum(message = "living cell statistics")]
    Stats,
    #[strum(message = "print the board")]
    Show,
    #[strum(message = "size, generation, rules and speed")]
    Status,
    #[strum(message = "list the commands")]
    Help,
    #[strum(message = "quit")]
    Exit,
}

pub fn run_cli(state_arc: Arc<RwLock<State>>) {
    for line_res in io::stdin().lines() {
        let line = match line_res {
            Ok(line) => line,
            Err(e) => {
                error!("Couldn't read from stdin: {e}");
                break;
            }
        };

        let mut args = line.split_whitespace().peekable();
        if args.peek().is_none() {
            continue;
        }

        match handle_cmd(state_arc.clone(), args) {
            Ok(Some(reply)) => println!("{reply}"),
            Ok(None) => println!("OK"),
            Err(e) => eprintln!("! {e:?}"),
        }
    }
}

fn handle_cmd<'a, I>(state_arc: Arc<RwLock<State>>, mut args: I) -> anyhow::Result<Option<String>>
where
    I: Iterator<Item = &'a str>,
{
    let command = args
        .next()
        .context("No command")?
        .parse::<Command>()
        .context("Unknown command, try \"help\"")?;

    let reply = match command {
        Command::Step => {
            let times = match args.next() {
                Some(times) => input::parse_integer(times, "number of generations")?,
                None => 1,
            };

            let mut state = write_state(&state_arc)?;
            let play_field = &mut state.play_field;

            let mut stable = false;
            for _ in 0..times {
                if play_field.step() == StepOutcome::Stable {
                    stable = true;
                    break;
                }
                play_field.living_cells();
            }

            stable.then(|| format!("Generation {} is stable", play_field.generation()))
        }

        Command::Back => {
            let mut state = write_state(&state_arc)?;
            state.pause();

            let generation = state.play_field.generation();
            if generation > 0 {
                state.play_field.step_to(generation - 1);
                state.play_field.living_cells();
            }

            None
        }

        Command::Goto => {
            let target = input::parse_integer(
                args.next().context("Missing generation")?,
                "generation",
            )?;

            let mut state = write_state(&state_arc)?;
            state.pause();

            state.play_field.step_to(target);
            state.play_field.living_cells();

            let generation = state.play_field.generation();
            (generation != target).then(|| format!("Stopped at stable generation {generation}"))
        }

        Command::Restart => {
            let mut state = write_state(&state_arc)?;
            state.pause();

            state.play_field.step_to(0);
            state.play_field.living_cells();

            None
        }

        Command::Run => {
            let mut state = write_state(&state_arc)?;
            if state.is_running() {
                bail!("The game is already running");
            }

            let interval = state.play_field.tick_interval();
            state.ticker = Some(TickerHost::start(state_arc.clone(), interval));

            None
        }

        Command::Stop => {
            let mut state = write_state(&state_arc)?;
            if !state.pause() {
                bail!("The game isn't running");
            }

            None
        }

        Command::Speed => {
            let game_speed = input::parse_game_speed(args.next().context("Missing game speed")?)?;

            let mut state = write_state(&state_arc)?;
            state.play_field.set_game_speed(game_speed);

            let interval = state.play_field.tick_interval();
            if let Some(ticker) = &state.ticker {
                ticker.set_interval(interval);
            }

            None
        }

        Command::Rules => {
            let mut state = write_state(&state_arc)?;

            match (args.next(), args.next()) {
                (None, None) => Some(format!(
                    "reanimate: {} | keep alive: {}",
                    state.play_field.reanimate_rule(),
                    state.play_field.keep_alive_rule()
                )),
                (Some(reanimate), Some(keep_alive)) => {
                    let reanimate = input::parse_rule(reanimate, "reanimate")?;
                    let keep_alive = input::parse_rule(keep_alive, "keep alive")?;

                    state.play_field.set_reanimate_rule(reanimate);
                    state.play_field.set_keep_alive_rule(keep_alive);
                    None
                }
                _ => bail!("Expected both a reanimate and a keep alive rule, e.g. \"rules 3 2,3\""),
            }
        }

        Command::Resize => {
            let width = input::parse_integer(args.next().context("Missing X dimension")?, "X dimension")?;
            let height = input::parse_integer(args.next().context("Missing Y dimension")?, "Y dimension")?;

            let mut state = write_state(&state_arc)?;
            state.pause();

            state.play_field.set_size(width, height);
            state.play_field.living_cells();

            None
        }

        Command::Reset => {
            let mut state = write_state(&state_arc)?;
            state.pause();

            state.play_field.reset();
            state.play_field.living_cells();

            None
        }

        Command::Random => {
            let mut state = write_state(&state_arc)?;
            state.pause();

            state.play_field.place_randomly();
            let living_cells = state.play_field.living_cells();

            Some(format!("{living_cells} cells alive"))
        }

        Command::Toggle => {
            let x = input::parse_integer(args.next().context("Missing x")?, "x coordinate")?;
            let y = input::parse_integer(args.next().context("Missing y")?, "y coordinate")?;

            let mut state = write_state(&state_arc)?;
            let alive = state.play_field.toggle_cell(x, y)?;
            state.play_field.living_cells();

            Some(if alive { "alive" } else { "dead" }.to_owned())
        }

        Command::Presets => {
            let mut state = write_state(&state_arc)?;
            state.presets.refresh()?;

            let names = state.presets.names().collect::<Vec<_>>();
            Some(if names.is_empty() {
                format!("No presets in {}", state.presets.dir().display())
            } else {
                names.join("\n")
            })
        }

        Command::Load => {
            let name = args.next().context("Missing preset name or path")?;

            let mut state = write_state(&state_arc)?;
            let board = state.presets.load(name)?;

            state.pause();
            state.play_field.load(board);
            state.play_field.living_cells();

            None
        }

        Command::Save => {
            let path = args.next().map(PathBuf::from);

            let mut state = write_state(&state_arc)?;
            let State {
                play_field,
                presets,
                ..
            } = &mut *state;
            let path = presets.save(play_field.board(), path)?;

            Some(format!("Saved to {}", path.display()))
        }

        Command::Stats => {
            let state = read_state(&state_arc)?;
            Some(report::stats(state.play_field.analysis(), RECENT_SAMPLES))
        }

        Command::Show => {
            let state = read_state(&state_arc)?;
            Some(report::board(state.play_field.board()))
        }

        Command::Status => {
            let state = read_state(&state_arc)?;
            Some(report::status(&state.play_field, state.is_running()))
        }

        Command::Help => Some(help()),

        Command::Exit => exit(0),
    };

    Ok(reply)
}

fn help() -> String {
    Command::iter()
        .map(|command| {
            let name: &'static str = command.into();
            format!("{name:8} {}", command.get_message().unwrap_or_default())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use std::{env, process, time::Duration};

    use libgame::{PlayField, PlayFieldConfig};

    use super::*;
    use crate::presets::PresetLibrary;

    fn state_arc(width: usize, height: usize) -> Arc<RwLock<State>> {
        let presets_dir = env::temp_dir().join(format!("lifesim_cli_{}", process::id()));
        let presets = PresetLibrary::open(presets_dir).unwrap();

        let play_field = PlayField::with_config(PlayFieldConfig {
            width,
            height,
            ..Default::default()
        });

        Arc::new(RwLock::new(State::new(play_field, presets)))
    }

    fn cmd(state_arc: &Arc<RwLock<State>>, line: &str) -> anyhow::Result<Option<String>> {
        handle_cmd(state_arc.clone(), line.split_whitespace())
    }

    #[test]
    fn commands_parse_in_snake_case() {
        assert_eq!("step".parse::<Command>(), Ok(Command::Step));
        assert_eq!("goto".parse::<Command>(), Ok(Command::Goto));
        assert!("Step".parse::<Command>().is_err());
        assert!(help().lines().any(|line| line.starts_with("presets ")));
    }

    #[test]
    fn blinker_steps_and_rewinds() {
        let state_arc = state_arc(5, 5);
        for (x, y) in [(1, 2), (2, 2), (3, 2)] {
            assert_eq!(cmd(&state_arc, &format!("toggle {x} {y}")).unwrap(), Some("alive".to_owned()));
        }

        cmd(&state_arc, "step 3").unwrap();
        {
            let state = state_arc.read().unwrap();
            assert_eq!(state.play_field.generation(), 3);
            assert_eq!(state.play_field.cell(2, 1), Ok(true));
            assert_eq!(state.play_field.cell(1, 2), Ok(false));
            assert_eq!(state.play_field.analysis().len(), 4);
        }

        cmd(&state_arc, "back").unwrap();
        {
            let state = state_arc.read().unwrap();
            assert_eq!(state.play_field.generation(), 2);
            assert_eq!(state.play_field.cell(1, 2), Ok(true));
            assert_eq!(state.play_field.analysis().len(), 3);
        }

        cmd(&state_arc, "goto 5").unwrap();
        assert_eq!(state_arc.read().unwrap().play_field.generation(), 5);

        cmd(&state_arc, "restart").unwrap();
        let state = state_arc.read().unwrap();
        assert_eq!(state.play_field.generation(), 0);
        assert_eq!(state.play_field.analysis().len(), 1);
    }

    #[test]
    fn stable_boards_are_reported() {
        let state_arc = state_arc(4, 4);
        for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
            cmd(&state_arc, &format!("toggle {x} {y}")).unwrap();
        }

        assert_eq!(
            cmd(&state_arc, "step 10").unwrap(),
            Some("Generation 0 is stable".to_owned())
        );
        assert_eq!(
            cmd(&state_arc, "goto 3").unwrap(),
            Some("Stopped at stable generation 0".to_owned())
        );
    }

    #[test]
    fn invalid_input_keeps_previous_values() {
        let state_arc = state_arc(6, 4);

        assert!(cmd(&state_arc, "resize 3 x").is_err());
        assert!(cmd(&state_arc, "resize 3").is_err());
        assert!(cmd(&state_arc, "speed 0").is_err());
        assert!(cmd(&state_arc, "rules 3,9 2,3").is_err());
        assert!(cmd(&state_arc, "rules 3").is_err());
        assert!(cmd(&state_arc, "toggle 6 0").is_err());
        assert!(cmd(&state_arc, "fly").is_err());
        assert!(cmd(&state_arc, "").is_err());

        let state = state_arc.read().unwrap();
        assert_eq!(state.play_field.width(), 6);
        assert_eq!(state.play_field.height(), 4);
        assert_eq!(state.play_field.game_speed(), 1.0);
        assert_eq!(state.play_field.reanimate_rule().to_string(), "3");
        assert_eq!(state.play_field.keep_alive_rule().to_string(), "2,3");
    }

    #[test]
    fn settings_are_applied() {
        let state_arc = state_arc(6, 4);

        cmd(&state_arc, "resize 3 2").unwrap();
        cmd(&state_arc, "speed 0.25").unwrap();
        cmd(&state_arc, "rules 3,6 2,3").unwrap();

        assert_eq!(
            cmd(&state_arc, "rules").unwrap(),
            Some("reanimate: 3,6 | keep alive: 2,3".to_owned())
        );

        let state = state_arc.read().unwrap();
        assert_eq!(state.play_field.width(), 3);
        assert_eq!(state.play_field.height(), 2);
        assert_eq!(state.play_field.tick_interval(), Duration::from_secs_f32(0.25));
    }

    #[test]
    fn run_and_stop() {
        let state_arc = state_arc(5, 5);
        cmd(&state_arc, "speed 60").unwrap();

        cmd(&state_arc, "run").unwrap();
        assert!(state_arc.read().unwrap().is_running());
        assert!(cmd(&state_arc, "run").is_err());

        cmd(&state_arc, "stop").unwrap();
        assert!(!state_arc.read().unwrap().is_running());
        assert!(cmd(&state_arc, "stop").is_err());

        cmd(&state_arc, "run").unwrap();
        cmd(&state_arc, "reset").unwrap();
        assert!(!state_arc.read().unwrap().is_running());
    }
}
