use std::{fs, path::{Path, PathBuf}};

use anyhow::Context;
use libgame::PlayFieldConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Board size, rules and speed to start with.
    pub play_field: PlayFieldConfig,

    /// Directory the preset names are looked up in.
    pub preset_dir: PathBuf,

    pub window: WindowConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            play_field: PlayFieldConfig::default(),
            preset_dir: PathBuf::from("presets"),
            window: WindowConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();

        let config_serialized = fs::read(path)
            .with_context(|| format!("Couldn't read config {}", path.display()))?;
        let config = serde_json::from_slice(&config_serialized)
            .with_context(|| format!("Couldn't deserialize config {}", path.display()))?;

        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
    pub target_fps: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "lifesim".to_owned(),
            width: 600,
            height: 600,
            target_fps: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "play_field": {
                    "width": 12,
                    "rule": { "reanimate": [3, 6], "keep_alive": [2, 3] }
                },
                "window": { "target_fps": 60 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.play_field.width, 12);
        assert_eq!(config.play_field.height, PlayFieldConfig::default().height);
        assert_eq!(config.play_field.rule.reanimate.to_string(), "3,6");
        assert_eq!(config.preset_dir, PathBuf::from("presets"));
        assert_eq!(config.window.target_fps, 60);
        assert_eq!(config.window.title, "lifesim");
    }

    #[test]
    fn rule_counts_above_eight_are_rejected() {
        let result = serde_json::from_str::<Config>(
            r#"{ "play_field": { "rule": { "reanimate": [9], "keep_alive": [2] } } }"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn game_speeds_out_of_range_are_rejected() {
        for game_speed in ["1e20", "1e40", "0", "-1"] {
            let result = serde_json::from_str::<Config>(&format!(
                r#"{{ "play_field": {{ "game_speed": {game_speed} }} }}"#
            ));
            assert!(result.is_err(), "{game_speed}");
        }

        let config: Config =
            serde_json::from_str(r#"{ "play_field": { "game_speed": 0.5 } }"#).unwrap();
        assert_eq!(config.play_field.game_speed, 0.5);
    }
}
