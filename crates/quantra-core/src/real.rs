//! Storage precision for quantity values

use num_traits::Float;
use std::fmt::{Debug, Display};
use std::str::FromStr;

/// Floating-point type a scalar, vector or matrix stores its SI values in.
///
/// Unit conversion always happens in `f64`; single-precision families round the
/// converted SI value once when it is stored.
pub trait Real:
    Float + Debug + Display + Default + FromStr + Send + Sync + 'static
{
    fn of_f64(value: f64) -> Self;
    fn as_f64(self) -> f64;
}

impl Real for f64 {
    #[inline]
    fn of_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}

impl Real for f32 {
    #[inline]
    fn of_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}
