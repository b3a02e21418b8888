/// Tunables loaded once at startup from an optional TOML file.
///
/// Every field has a default, so a missing file (or a file that only sets a
/// couple of keys) is fine.  A file that exists but doesn't parse is an error.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GameError, GameResult};

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "AMOR_FATI_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "amor_fati.toml";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Target frame length of the host loop.
    pub frame_ms: u64,
    pub dialogue_interval_ms: f64,
    /// Soundtrack tempo, used to retime Norman's gait from level 2 on.
    pub bpm: f64,
    pub log_file: PathBuf,
    /// Replaces the embedded sprite table when set.
    pub sprites: Option<PathBuf>,
    pub stage: StageConfig,
    pub canvas: CanvasConfig,
    pub cell: CellConfig,
    pub player: PlayerConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct StageConfig {
    pub width: f64,
    pub ceiling: f64,
}

/// Logical drawing surface in pixels.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: i32,
    pub height: i32,
}

/// Pixels covered by one terminal character cell.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CellConfig {
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub hp: i32,
    pub max_casts: u32,
    pub cast_recharge_ms: f64,
    pub ability_cooldown_ms: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            frame_ms: 33,
            dialogue_interval_ms: 4000.0,
            bpm: 120.0,
            log_file: PathBuf::from("amor_fati.log"),
            sprites: None,
            stage: StageConfig::default(),
            canvas: CanvasConfig::default(),
            cell: CellConfig::default(),
            player: PlayerConfig::default(),
        }
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        StageConfig { width: 400.0, ceiling: 130.0 }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig { width: 400, height: 240 }
    }
}

impl Default for CellConfig {
    fn default() -> Self {
        CellConfig { width: 4, height: 8 }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            hp: 3,
            max_casts: 3,
            cast_recharge_ms: 1000.0,
            ability_cooldown_ms: 10_000.0,
        }
    }
}

impl Config {
    /// Parse a config from TOML text.  `path` is only used for the error.
    pub fn from_toml(text: &str, path: &Path) -> GameResult<Config> {
        toml::from_str(text).map_err(|source| GameError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> GameResult<Config> {
        match std::fs::read_to_string(path) {
            Ok(text) => Config::from_toml(&text, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Config path chosen by the environment, or the default next to the binary.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}
