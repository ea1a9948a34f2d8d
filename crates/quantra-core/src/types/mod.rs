//! Value types for quantra: quantities, units and evaluator results

pub mod quantity;
pub mod unit;
mod value;

pub use quantity::{Quantity, GENERIC_QUANTITY};
pub use unit::{Scale, Unit, UnitSpec};
pub use value::{format_number, Value};
