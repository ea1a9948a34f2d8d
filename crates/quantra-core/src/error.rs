//! Error types for quantity arithmetic and unit registration

use thiserror::Error;

use crate::dimension::DimensionVector;
use crate::storage::Shape;

/// Errors raised while constructing, parsing, converting or combining quantities.
///
/// All of these are local and synchronous: the caller corrects the input and retries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantityError {
    /// Malformed or empty text, or an unparseable dimension string
    #[error("cannot parse '{text}': {reason}")]
    Parse { text: String, reason: String },

    /// The abbreviation is not registered for the quantity
    #[error("unknown unit '{abbreviation}' for quantity {quantity}")]
    UnknownUnit {
        abbreviation: String,
        quantity: String,
    },

    /// No quantity with this name is registered
    #[error("unknown quantity '{0}'")]
    UnknownQuantity(String),

    /// A required argument was not supplied
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// A generic SI value does not have the dimension of the target unit
    #[error("dimension mismatch: {source_unit} [{source_dimension}] cannot be cast to {target_unit} [{target_dimension}]")]
    DimensionMismatch {
        source_unit: String,
        source_dimension: DimensionVector,
        target_unit: String,
        target_dimension: DimensionVector,
    },

    /// Operands belong to different quantities
    #[error("quantity mismatch: {left} and {right} cannot be combined")]
    QuantityMismatch { left: String, right: String },

    /// A relative unit was used where an absolute one is required, or vice versa
    #[error("unit {unit} of quantity {quantity} cannot be used for an {expected} value")]
    KindMismatch {
        unit: String,
        quantity: String,
        expected: &'static str,
    },

    /// A product, quotient or power drives a dimension exponent past the `i8` range
    #[error("dimension exponent out of range: {0}")]
    ExponentOverflow(String),

    /// Element-wise operation on containers of different shape
    #[error("shape mismatch: {left} vs {right}")]
    ShapeMismatch { left: Shape, right: Shape },

    /// Element access outside the container
    #[error("index {index} out of bounds for shape {shape}")]
    IndexOutOfBounds { index: String, shape: Shape },
}

impl QuantityError {
    pub(crate) fn parse(text: &str, reason: impl Into<String>) -> Self {
        QuantityError::Parse {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

/// Configuration errors raised while populating a [`crate::UnitRegistry`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("quantity '{0}' is already registered")]
    DuplicateQuantity(String),

    #[error("abbreviation '{abbreviation}' is already registered for quantity {quantity}")]
    DuplicateAbbreviation {
        quantity: String,
        abbreviation: String,
    },

    #[error("unit '{abbreviation}' has an invalid scale (factor {factor}, offset {offset})")]
    InvalidScale {
        abbreviation: String,
        factor: f64,
        offset: f64,
    },

    #[error("unknown quantity '{0}'")]
    UnknownQuantity(String),

    #[error("unknown unit '{abbreviation}' for quantity {quantity}")]
    UnknownUnit {
        quantity: String,
        abbreviation: String,
    },

    /// An absolute quantity must share the dimension of its relative counterpart
    #[error("quantity {absolute} [{absolute_dimension}] does not match relative quantity {relative} [{relative_dimension}]")]
    DimensionConflict {
        absolute: String,
        absolute_dimension: DimensionVector,
        relative: String,
        relative_dimension: DimensionVector,
    },
}
