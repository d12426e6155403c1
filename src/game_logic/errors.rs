use thiserror::Error;
use std::path::PathBuf;

#[derive(Error, Debug)]
pub enum MazeError {
    // Config-related errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("Config I/O failed: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    #[error("Config file not found at path: {path}")]
    ConfigFileNotFound { path: PathBuf },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    // Maze-related errors
    #[error("Failed to build maze collider: {reason}")]
    ColliderBuildFailed { reason: String },
}

/// Result type alias for all operations
pub type MazeResult<T> = Result<T, MazeError>;
