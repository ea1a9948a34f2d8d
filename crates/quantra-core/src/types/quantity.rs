//! Quantities: named families of units sharing one dimension vector

use std::fmt;
use std::sync::Arc;

use super::unit::{Unit, UnitSpec};
use crate::dimension::DimensionVector;

/// Name given to the descriptors of synthesized, unclassified SI units
pub const GENERIC_QUANTITY: &str = "SI";

/// Immutable descriptor of a quantity family (e.g. "Speed").
///
/// Absolute quantities (a point in time, an absolute temperature) hold their paired
/// relative quantity: the difference of two absolute values is a relative value.
#[derive(Debug)]
pub struct Quantity {
    name: String,
    dimension: DimensionVector,
    standard: Arc<UnitSpec>,
    relative: Option<Arc<Quantity>>,
}

impl Quantity {
    pub fn relative(name: impl Into<String>, dimension: DimensionVector, standard: UnitSpec) -> Self {
        Self {
            name: name.into(),
            dimension,
            standard: Arc::new(standard),
            relative: None,
        }
    }

    /// An absolute quantity shares the dimension of its relative counterpart
    pub fn absolute(name: impl Into<String>, relative: Arc<Quantity>, standard: UnitSpec) -> Self {
        Self {
            name: name.into(),
            dimension: relative.dimension,
            standard: Arc::new(standard),
            relative: Some(relative),
        }
    }

    /// Descriptor for values that no named quantity claims
    pub fn generic(dimension: DimensionVector) -> Self {
        let abbreviation = dimension.to_string();
        Self {
            name: GENERIC_QUANTITY.to_string(),
            dimension,
            standard: Arc::new(UnitSpec::linear(abbreviation.clone(), abbreviation, 1.0)),
            relative: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimension(&self) -> DimensionVector {
        self.dimension
    }

    pub fn is_absolute(&self) -> bool {
        self.relative.is_some()
    }

    pub fn is_generic(&self) -> bool {
        self.name == GENERIC_QUANTITY
    }

    pub fn relative_quantity(&self) -> Option<&Arc<Quantity>> {
        self.relative.as_ref()
    }

    pub fn standard_spec(&self) -> &Arc<UnitSpec> {
        &self.standard
    }

    /// Handle for the standard unit, not registered anywhere
    pub fn standard_unit(self: &Arc<Self>) -> Unit {
        Unit::standard_of(self)
    }

    pub fn kind_name(&self) -> &'static str {
        if self.is_absolute() {
            "absolute"
        } else {
            "relative"
        }
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.dimension == other.dimension
            && self.is_absolute() == other.is_absolute()
    }
}

impl Eq for Quantity {}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_generic() {
            write!(f, "{}[{}]", self.name, self.dimension)
        } else {
            f.write_str(&self.name)
        }
    }
}
