pub mod config;
pub mod hash;
pub mod rng;

pub use config::*;
pub use hash::*;
pub use rng::*;
