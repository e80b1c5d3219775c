pub mod fill_row;
pub mod input_params;
pub mod inputs_version;
pub mod nn_hash;
pub mod score_value;
pub mod scoring;
pub mod symmetry;

pub use fill_row::*;
pub use input_params::*;
pub use inputs_version::*;
pub use score_value::*;
pub use symmetry::*;
