use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use libgame::{board::GameBoard, preset};
use log::{debug, info};

pub const PRESET_EXTENSION: &str = "csv";

/// The preset files found in a directory, by file name without the `.csv` extension.
#[derive(Debug, Clone)]
pub struct PresetLibrary {
    dir: PathBuf,
    presets: BTreeMap<String, PathBuf>,
}

impl PresetLibrary {
    /// A missing directory just means there are no presets yet.
    pub fn open<P>(dir: P) -> anyhow::Result<Self>
    where
        P: Into<PathBuf>,
    {
        let mut library = Self {
            dir: dir.into(),
            presets: BTreeMap::new(),
        };

        library.refresh()?;
        Ok(library)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn refresh(&mut self) -> anyhow::Result<()> {
        self.presets.clear();

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Preset directory {} doesn't exist", self.dir.display());
                return Ok(());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Couldn't read preset directory {}", self.dir.display())
                });
            }
        };

        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            if let Some(name) = preset_name(&path) {
                self.presets.insert(name, path);
            }
        }

        debug!("Found {} presets in {}", self.presets.len(), self.dir.display());
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn path(&self, name: &str) -> Option<&Path> {
        self.presets.get(name).map(PathBuf::as_path)
    }

    /// Loads a preset by its name, anything that isn't a known name is treated as a file path.
    pub fn load(&self, name_or_path: &str) -> anyhow::Result<GameBoard> {
        let path = self
            .path(name_or_path)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(name_or_path));

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Couldn't read preset {}", path.display()))?;
        let board = preset::from_csv(&text)
            .with_context(|| format!("Couldn't load preset {}", path.display()))?;

        Ok(board)
    }

    /// Writes `board` to `path`, or to a timestamped file in the preset directory.
    /// Returns where the preset ended up.
    pub fn save(&mut self, board: &GameBoard, path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
        let path = match path {
            Some(path) => path,
            None => {
                fs::create_dir_all(&self.dir).with_context(|| {
                    format!("Couldn't create preset directory {}", self.dir.display())
                })?;

                let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
                self.dir
                    .join(format!("preset_{timestamp}.{PRESET_EXTENSION}"))
            }
        };

        fs::write(&path, preset::to_csv(board))
            .with_context(|| format!("Couldn't write preset {}", path.display()))?;
        info!("Saved preset to {}", path.display());

        self.refresh()?;
        Ok(path)
    }
}

fn preset_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;

    let name = file_name
        .strip_suffix(PRESET_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .unwrap_or(file_name);

    Some(name.to_owned())
}
