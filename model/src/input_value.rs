use half::f16;
use std::fmt::Debug;

/// Element type of a network input buffer.
pub trait InputValue: Copy + PartialEq + Debug {
    const ZERO: Self;
    const ONE: Self;

    fn from_f32(value: f32) -> Self;
    fn to_f32(self) -> f32;
}

impl InputValue for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn from_f32(value: f32) -> Self {
        value
    }

    fn to_f32(self) -> f32 {
        self
    }
}

impl InputValue for f16 {
    const ZERO: Self = f16::ZERO;
    const ONE: Self = f16::ONE;

    fn from_f32(value: f32) -> Self {
        f16::from_f32(value)
    }

    fn to_f32(self) -> f32 {
        f16::to_f32(self)
    }
}
