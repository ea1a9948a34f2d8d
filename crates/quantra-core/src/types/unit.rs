//! Units: scaled (and possibly offset) representations of a quantity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::quantity::Quantity;
use crate::dimension::DimensionVector;

/// Conversion between a unit and its quantity's standard (SI) unit.
///
/// `to_standard(v) = v * factor + offset` and `from_standard(v) = (v - offset) / factor`.
/// Only absolute scales such as Celsius or Fahrenheit carry an offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    Linear(f64),
    Affine { factor: f64, offset: f64 },
}

impl Scale {
    pub const IDENTITY: Scale = Scale::Linear(1.0);

    pub fn factor(&self) -> f64 {
        match *self {
            Scale::Linear(factor) | Scale::Affine { factor, .. } => factor,
        }
    }

    pub fn offset(&self) -> f64 {
        match *self {
            Scale::Linear(_) => 0.0,
            Scale::Affine { offset, .. } => offset,
        }
    }

    #[inline]
    pub fn to_standard(&self, value: f64) -> f64 {
        match *self {
            Scale::Linear(factor) => value * factor,
            Scale::Affine { factor, offset } => value * factor + offset,
        }
    }

    #[inline]
    pub fn from_standard(&self, value: f64) -> f64 {
        match *self {
            Scale::Linear(factor) => value / factor,
            Scale::Affine { factor, offset } => (value - offset) / factor,
        }
    }

    /// Factor must be finite and non-zero, offset finite
    pub fn is_valid(&self) -> bool {
        let factor = self.factor();
        factor.is_finite() && factor != 0.0 && self.offset().is_finite()
    }

    pub fn is_identity(&self) -> bool {
        self.factor() == 1.0 && self.offset() == 0.0
    }
}

/// Owned definition of a unit, before it is bound to a quantity by the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSpec {
    /// Display abbreviation (e.g. "km/h")
    pub abbreviation: String,
    /// Long name (e.g. "kilometer per hour")
    pub name: String,
    /// Additional accepted abbreviations for parsing (e.g. "kph")
    pub aliases: Vec<String>,
    /// Localized abbreviations as (language tag, abbreviation)
    pub localized: Vec<(String, String)>,
    pub scale: Scale,
    /// For units of absolute quantities: abbreviation of the paired relative unit.
    /// Defaults to the unit's own abbreviation.
    pub relative: Option<String>,
}

impl UnitSpec {
    pub fn linear(abbreviation: impl Into<String>, name: impl Into<String>, factor: f64) -> Self {
        Self {
            abbreviation: abbreviation.into(),
            name: name.into(),
            aliases: Vec::new(),
            localized: Vec::new(),
            scale: Scale::Linear(factor),
            relative: None,
        }
    }

    pub fn affine(
        abbreviation: impl Into<String>,
        name: impl Into<String>,
        factor: f64,
        offset: f64,
    ) -> Self {
        Self {
            scale: Scale::Affine { factor, offset },
            ..Self::linear(abbreviation, name, factor)
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn with_localized(mut self, language: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        self.localized.push((language.into(), abbreviation.into()));
        self
    }

    pub fn with_relative(mut self, abbreviation: impl Into<String>) -> Self {
        self.relative = Some(abbreviation.into());
        self
    }

    /// Every text this unit answers to: abbreviation, aliases, localized variants
    pub fn abbreviations(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.abbreviation.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .chain(self.localized.iter().map(|(_, a)| a.as_str()))
    }
}

/// A unit bound to its quantity. Cheap to clone; immutable.
#[derive(Clone)]
pub struct Unit(Arc<UnitInner>);

struct UnitInner {
    spec: Arc<UnitSpec>,
    quantity: Arc<Quantity>,
    relative: Option<Unit>,
}

impl Unit {
    pub(crate) fn new(spec: Arc<UnitSpec>, quantity: Arc<Quantity>, relative: Option<Unit>) -> Self {
        Unit(Arc::new(UnitInner {
            spec,
            quantity,
            relative,
        }))
    }

    /// The standard (SI) unit of a quantity
    pub fn standard_of(quantity: &Arc<Quantity>) -> Self {
        let relative = quantity.relative_quantity().map(Unit::standard_of);
        Unit::new(quantity.standard_spec().clone(), quantity.clone(), relative)
    }

    pub fn abbreviation(&self) -> &str {
        &self.0.spec.abbreviation
    }

    pub fn name(&self) -> &str {
        &self.0.spec.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.0.spec.aliases
    }

    /// Abbreviation for a language tag, falling back to the display abbreviation
    pub fn localized_abbreviation(&self, language: &str) -> &str {
        self.0
            .spec
            .localized
            .iter()
            .find(|(lang, _)| lang.eq_ignore_ascii_case(language))
            .map(|(_, abbreviation)| abbreviation.as_str())
            .unwrap_or_else(|| self.abbreviation())
    }

    pub fn spec(&self) -> &UnitSpec {
        &self.0.spec
    }

    pub fn scale(&self) -> Scale {
        self.0.spec.scale
    }

    pub fn quantity(&self) -> &Arc<Quantity> {
        &self.0.quantity
    }

    pub fn dimension(&self) -> DimensionVector {
        self.0.quantity.dimension()
    }

    pub fn is_absolute(&self) -> bool {
        self.0.quantity.is_absolute()
    }

    /// For a unit of an absolute quantity, the matching unit of the relative quantity
    pub fn relative_unit(&self) -> Option<&Unit> {
        self.0.relative.as_ref()
    }

    pub fn is_standard(&self) -> bool {
        self.0.spec.scale.is_identity()
    }

    #[inline]
    pub fn to_standard(&self, value: f64) -> f64 {
        self.0.spec.scale.to_standard(value)
    }

    #[inline]
    pub fn from_standard(&self, value: f64) -> f64 {
        self.0.spec.scale.from_standard(value)
    }

    /// True when both handles point at the same registered unit
    pub fn same(&self, other: &Unit) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Whether the text is this unit's abbreviation, an alias or a localized variant
    pub fn answers_to(&self, text: &str) -> bool {
        self.0.spec.abbreviations().any(|a| a == text)
    }

    /// Both units belong to the same quantity
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.quantity() == other.quantity()
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
            || (self.quantity() == other.quantity() && self.abbreviation() == other.abbreviation())
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.quantity().name().hash(state);
        self.dimension().hash(state);
        self.abbreviation().hash(state);
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unit({} of {})", self.abbreviation(), self.quantity().name())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn length() -> Arc<Quantity> {
        Arc::new(Quantity::relative(
            "Length",
            DimensionVector::LENGTH,
            UnitSpec::linear("m", "meter", 1.0),
        ))
    }

    #[test]
    fn test_linear_conversion() {
        let km = Unit::new(
            Arc::new(UnitSpec::linear("km", "kilometer", 1000.0)),
            length(),
            None,
        );
        assert_eq!(km.to_standard(1.0), 1000.0);
        assert_eq!(km.from_standard(2500.0), 2.5);
    }

    #[test]
    fn test_affine_conversion() {
        let fahrenheit = Scale::Affine {
            factor: 5.0 / 9.0,
            offset: 459.67 * 5.0 / 9.0,
        };
        assert_relative_eq!(fahrenheit.to_standard(32.0), 273.15, epsilon = 1e-9);
        assert_relative_eq!(fahrenheit.from_standard(373.15), 212.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_scales() {
        assert!(!Scale::Linear(0.0).is_valid());
        assert!(!Scale::Linear(f64::NAN).is_valid());
        assert!(!Scale::Affine {
            factor: 1.0,
            offset: f64::INFINITY
        }
        .is_valid());
        assert!(Scale::IDENTITY.is_valid());
    }

    #[test]
    fn test_equality_is_by_quantity_and_abbreviation() {
        let q = length();
        let a = Unit::standard_of(&q);
        let b = Unit::standard_of(&q);
        assert_eq!(a, b);
        assert!(!a.same(&b));
        assert!(a.same(&a.clone()));
    }

    #[test]
    fn test_localized_abbreviation() {
        let spec = UnitSpec::linear("h", "hour", 3600.0)
            .with_alias("hr")
            .with_localized("nl", "u");
        let hour = Unit::new(
            Arc::new(spec),
            Arc::new(Quantity::relative(
                "Duration",
                DimensionVector::TIME,
                UnitSpec::linear("s", "second", 1.0),
            )),
            None,
        );
        assert_eq!(hour.localized_abbreviation("nl"), "u");
        assert_eq!(hour.localized_abbreviation("fr"), "h");
        assert!(hour.answers_to("hr"));
        assert!(hour.answers_to("u"));
        assert!(!hour.answers_to("hours"));
    }
}
