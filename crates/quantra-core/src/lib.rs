//! quantra-core: dimensional algebra for unit-tagged values
//!
//! Scalars, vectors and matrices store their values in SI and carry a display
//! unit. Arithmetic composes dimension vectors; results that match a registered
//! quantity are named through the [`UnitRegistry`], everything else stays a
//! generic SI value that can be cast back with a runtime dimension check.
//!
//! # Example
//!
//! ```
//! use quantra_core::{RelScalar, UnitRegistry};
//!
//! let registry = UnitRegistry::global();
//! let distance = RelScalar::<f64>::parse("5 m", "Length", registry).unwrap();
//! let time = RelScalar::<f64>::parse("2 s", "Duration", registry).unwrap();
//!
//! let speed = distance.divided_by(&time, registry).into_named().unwrap();
//! assert_eq!(speed.quantity().name(), "Speed");
//! assert_eq!(speed.si(), 2.5);
//!
//! // Calculator lines
//! let mut engine = quantra_core::Engine::new();
//! let result = engine.eval("36 km/h in m/s");
//! assert_eq!(result.to_string(), "10 m/s");
//! ```

#[macro_use]
mod macros;

pub mod catalog;
pub mod dimension;
pub mod error;
pub mod eval;
pub mod generic;
pub mod matrix;
pub mod parser;
pub mod real;
pub mod registry;
pub mod scalar;
pub mod storage;
pub mod types;
pub mod vector;

use std::collections::HashMap;
use std::sync::Arc;

pub use catalog::{UnitsFile, UnitsFileError};
pub use dimension::DimensionVector;
pub use error::{QuantityError, RegistryError};
pub use eval::EvalContext;
pub use generic::{Classified, ClassifiedMatrix, ClassifiedScalar, ClassifiedVector, SiMatrix, SiScalar, SiVector};
pub use matrix::{AbsMatrix, FloatAbsMatrix, FloatRelMatrix, Matrix, RelMatrix, SparseEntry};
pub use parser::{parse_line, Ast, BinaryOp, Expr};
pub use real::Real;
pub use registry::{QuantitySpec, UnitRegistry};
pub use scalar::{AbsScalar, Absolute, FloatAbsScalar, FloatRelScalar, Kind, RelScalar, Relative, Scalar};
pub use storage::{Shape, Storage, StorageType};
pub use types::{format_number, Quantity, Scale, Unit, UnitSpec, Value, GENERIC_QUANTITY};
pub use vector::{AbsVector, FloatAbsVector, FloatRelVector, RelVector, Vector};

/// Main engine for evaluating calculator lines
pub struct Engine {
    context: EvalContext,
    lines: Vec<LineResult>,
}

/// Result of evaluating a single line
#[derive(Debug, Clone)]
pub struct LineResult {
    pub input: String,
    pub value: Value,
}

impl Engine {
    /// Create an engine over a freshly bootstrapped registry
    pub fn new() -> Self {
        Self::with_registry(Arc::new(UnitRegistry::with_defaults()))
    }

    /// Create an engine sharing an existing registry
    pub fn with_registry(registry: Arc<UnitRegistry>) -> Self {
        Self {
            context: EvalContext::with_registry(registry),
            lines: Vec::new(),
        }
    }

    /// Evaluate a single line and store the result
    pub fn eval(&mut self, input: &str) -> Value {
        let result = match parse_line(input) {
            Ok(ast) => eval::evaluate(&ast, &mut self.context),
            Err(e) => Value::Error(e),
        };
        if result.is_error() {
            tracing::debug!(input, %result, "line failed");
        }

        self.lines.push(LineResult {
            input: input.to_string(),
            value: result.clone(),
        });

        result
    }

    /// Evaluate without storing the result (for previews)
    pub fn eval_preview(&self, input: &str) -> Value {
        let mut ctx = self.context.clone();
        match parse_line(input) {
            Ok(ast) => eval::evaluate(&ast, &mut ctx),
            Err(e) => Value::Error(e),
        }
    }

    /// Get all line results
    pub fn lines(&self) -> &[LineResult] {
        &self.lines
    }

    pub fn variables(&self) -> &HashMap<String, Value> {
        &self.context.variables
    }

    pub fn registry(&self) -> &Arc<UnitRegistry> {
        self.context.registry()
    }

    /// Clear all lines and variables
    pub fn clear(&mut self) {
        self.lines.clear();
        self.context.clear_variables();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_basic() {
        let mut engine = Engine::new();
        let result = engine.eval("10 + 20");
        assert_eq!(result.as_f64(), Some(30.0));
    }

    #[test]
    fn test_engine_variables() {
        let mut engine = Engine::new();
        engine.eval("d = 100 m");
        let result = engine.eval("d / 20 s");
        assert_eq!(result.quantity().as_deref(), Some("Speed"));
        assert_eq!(result.as_si(), Some(5.0));
        assert!(engine.variables().contains_key("d"));
    }

    #[test]
    fn test_engine_preview_does_not_store() {
        let mut engine = Engine::new();
        engine.eval("x = 2 kg");
        assert_eq!(engine.eval_preview("y = x * 3").as_si(), Some(6.0));
        assert!(!engine.variables().contains_key("y"));
        assert_eq!(engine.lines().len(), 1);
    }

    #[test]
    fn test_engine_clear() {
        let mut engine = Engine::new();
        engine.eval("x = 1 m");
        engine.eval("x + 1 m");
        engine.clear();
        assert!(engine.lines().is_empty());
        assert!(engine.eval("x").is_error());
    }

    #[test]
    fn test_shared_registry() {
        let registry = Arc::new(UnitRegistry::with_defaults());
        let engine = Engine::with_registry(Arc::clone(&registry));
        assert!(Arc::ptr_eq(engine.registry(), &registry));
    }
}
