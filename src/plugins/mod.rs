pub mod maze;
pub mod player;
pub mod scene;
pub mod triggers;
pub mod ui;
pub mod ui_common;

pub use maze::*;
pub use player::*;
pub use scene::*;
pub use triggers::*;
pub use ui::*;
