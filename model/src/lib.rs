pub mod conv_input_builder;
pub mod input_value;
pub mod nn_output;
pub mod nn_pos;

pub use conv_input_builder::*;
pub use input_value::*;
pub use nn_output::*;
pub use nn_pos::*;
