mod constants;
mod game;

pub use constants::*;
pub use game::*;
