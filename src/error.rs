/// Startup and I/O failures.  The frame loop itself never returns errors;
/// it skips what it can't draw or apply.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid sprite table: {0}")]
    Sprites(#[source] toml::de::Error),
}

pub type GameResult<T> = Result<T, GameError>;
