pub mod board;
pub mod history;
pub mod location;
pub mod rules;
pub mod zobrist;

pub use crate::board::*;
pub use crate::history::*;
pub use crate::location::*;
pub use crate::rules::*;
pub use crate::zobrist::*;
