pub mod errors;
pub mod movement;
pub mod session;

pub use errors::*;
pub use movement::*;
pub use session::*;
