//! Evaluator result representation

use crate::generic::SiScalar;
use crate::scalar::RelScalar;

/// A computed value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Plain (dimensionless) number
    Number(f64),
    /// Value of a named quantity
    Scalar(RelScalar),
    /// Value whose dimension no named quantity claims
    Generic(SiScalar),
    /// No value (empty line)
    Empty,
    /// Error during evaluation
    Error(String),
}

impl Value {
    /// The numeric value in the display unit, ignoring units
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Scalar(s) => Some(s.value()),
            Value::Generic(g) => Some(g.si()),
            Value::Empty | Value::Error(_) => None,
        }
    }

    /// The value in SI, ignoring units
    pub fn as_si(&self) -> Option<f64> {
        match self {
            Value::Scalar(s) => Some(s.si()),
            other => other.as_f64(),
        }
    }

    /// Abbreviation of the display unit, if the value carries one
    pub fn unit(&self) -> Option<String> {
        match self {
            Value::Scalar(s) => Some(s.unit().abbreviation().to_string()),
            Value::Generic(g) => Some(g.dimension().to_string()),
            _ => None,
        }
    }

    /// Name of the quantity, `SI` for unclassified values
    pub fn quantity(&self) -> Option<String> {
        match self {
            Value::Scalar(s) => Some(s.quantity().name().to_string()),
            Value::Generic(_) => Some(crate::types::GENERIC_QUANTITY.to_string()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Scalar(s) => {
                let abbreviation = s.unit().abbreviation();
                if abbreviation.is_empty() {
                    f.write_str(&format_number(s.value()))
                } else {
                    write!(f, "{} {}", format_number(s.value()), abbreviation)
                }
            }
            Value::Generic(g) => write!(f, "{} {}", format_number(g.si()), g.dimension()),
            Value::Empty => Ok(()),
            Value::Error(msg) => write!(f, "Error: {msg}"),
        }
    }
}

/// Format a number for display: rounding noise below nine decimals is dropped,
/// very large or very small magnitudes use scientific notation.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let magnitude = n.abs();
    if magnitude != 0.0 && !(1e-6..1e15).contains(&magnitude) {
        return format!("{n:e}");
    }
    let rounded = (n * 1e9).round() / 1e9;
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 {
        format!("{}", rounded.trunc())
    } else {
        let text = format!("{rounded:.9}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(3.14), "3.14");
        assert_eq!(format_number(10.000000000000002), "10");
        assert_eq!(format_number(-0.5), "-0.5");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1.5e20), "1.5e20");
        assert_eq!(format_number(2.5e-9), "2.5e-9");
    }

    #[test]
    fn test_value_predicates() {
        assert!(Value::Empty.is_empty());
        assert!(Value::Error("boom".to_string()).is_error());
        assert_eq!(Value::Number(2.0).as_f64(), Some(2.0));
        assert_eq!(Value::Empty.as_f64(), None);
        assert_eq!(Value::Error("x".to_string()).to_string(), "Error: x");
    }
}
