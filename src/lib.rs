pub mod components;
pub mod config;
pub mod game_logic;
pub mod maze;
pub mod plugins;
pub mod resources;

// Selective re-exports for external consumers

// Plugins - main.rs needs all plugins
pub use plugins::*;

// Game logic - binaries need errors
pub use game_logic::errors::{MazeError, MazeResult};
