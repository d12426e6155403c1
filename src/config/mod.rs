pub mod range_types;

use crate::game_logic::errors::{MazeError, MazeResult};
use crate::resources::GameConfig;
use bevy::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

pub fn get_config_path() -> MazeResult<PathBuf> {
    let mut path = dirs::config_dir().ok_or(MazeError::ConfigDirNotFound)?;
    path.push("mazerun");
    fs::create_dir_all(&path)?;
    path.push("config.toml");
    Ok(path)
}

/// Parse and validate a TOML config. Missing fields take their defaults.
pub fn parse_config(contents: &str) -> MazeResult<GameConfig> {
    let config = toml::from_str::<GameConfig>(contents)?;
    config.check()?;
    Ok(config)
}

pub fn load_config() -> MazeResult<GameConfig> {
    load_config_from(&get_config_path()?)
}

pub fn load_config_from(path: &Path) -> MazeResult<GameConfig> {
    if !path.exists() {
        return Err(MazeError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn load_config_or_default() -> GameConfig {
    match load_config() {
        Ok(config) => {
            info!("Loaded config");
            config
        }
        Err(MazeError::ConfigFileNotFound { path }) => {
            info!("No config at {}, using defaults", path.display());
            GameConfig::default()
        }
        Err(err) => {
            warn!("Failed to load config, using defaults: {err}");
            GameConfig::default()
        }
    }
}

pub fn save_config(config: &GameConfig) -> MazeResult<()> {
    save_config_to(config, &get_config_path()?)
}

pub fn save_config_to(config: &GameConfig, path: &Path) -> MazeResult<()> {
    config.check()?;
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}
