//! Unit-tagged scalar values
//!
//! A [`Scalar`] stores its value in the quantity's standard (SI) unit and carries a
//! display unit that only affects presentation. The kind parameter separates
//! relative values (a length, a duration) from absolute ones (a position, a point in
//! time): two absolute values can be subtracted but never added.

mod ops;

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::dimension::DimensionVector;
use crate::error::QuantityError;
use crate::generic::SiScalar;
use crate::parser::split_scalar_text;
use crate::real::Real;
use crate::registry::UnitRegistry;
use crate::types::{Quantity, Unit};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Relative {}
    impl Sealed for super::Absolute {}
}

/// Kind marker: [`Relative`] or [`Absolute`]
pub trait Kind: sealed::Sealed + Copy + fmt::Debug + Send + Sync + 'static {
    const ABSOLUTE: bool;
    const NAME: &'static str;
}

/// Differences and magnitudes: durations, lengths, temperature differences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relative {}

/// Points on a scale: instants, positions, absolute temperatures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absolute {}

impl Kind for Relative {
    const ABSOLUTE: bool = false;
    const NAME: &'static str = "relative";
}

impl Kind for Absolute {
    const ABSOLUTE: bool = true;
    const NAME: &'static str = "absolute";
}

/// A value of a named quantity, stored in SI
#[derive(Clone)]
pub struct Scalar<K: Kind = Relative, T: Real = f64> {
    si: T,
    unit: Unit,
    kind: PhantomData<K>,
}

pub type RelScalar<T = f64> = Scalar<Relative, T>;
pub type AbsScalar<T = f64> = Scalar<Absolute, T>;
pub type FloatRelScalar = Scalar<Relative, f32>;
pub type FloatAbsScalar = Scalar<Absolute, f32>;

/// The unit must belong to a quantity of kind `K`
pub(crate) fn check_kind<K: Kind>(unit: &Unit) -> Result<(), QuantityError> {
    if unit.is_absolute() == K::ABSOLUTE {
        Ok(())
    } else {
        Err(QuantityError::KindMismatch {
            unit: unit.abbreviation().to_string(),
            quantity: unit.quantity().name().to_string(),
            expected: K::NAME,
        })
    }
}

/// Both units must belong to the same quantity
pub(crate) fn check_quantity(left: &Unit, right: &Unit) -> Result<(), QuantityError> {
    if left.quantity() == right.quantity() {
        Ok(())
    } else {
        Err(quantity_mismatch(left, right))
    }
}

pub(crate) fn quantity_mismatch(left: &Unit, right: &Unit) -> QuantityError {
    QuantityError::QuantityMismatch {
        left: format!("{} [{}]", left.quantity(), left),
        right: format!("{} [{}]", right.quantity(), right),
    }
}

/// Unit of the relative quantity paired with an absolute unit
pub(crate) fn paired_relative(unit: &Unit) -> Result<Unit, QuantityError> {
    unit.relative_unit()
        .cloned()
        .ok_or_else(|| QuantityError::KindMismatch {
            unit: unit.abbreviation().to_string(),
            quantity: unit.quantity().name().to_string(),
            expected: "absolute",
        })
}

/// The relative operand must belong to the absolute operand's paired quantity
pub(crate) fn check_pairing(absolute: &Unit, relative: &Unit) -> Result<(), QuantityError> {
    match absolute.quantity().relative_quantity() {
        Some(paired) if paired == relative.quantity() => Ok(()),
        _ => Err(quantity_mismatch(absolute, relative)),
    }
}

impl<K: Kind, T: Real> Scalar<K, T> {
    /// Value expressed in `unit`; stored as `unit.to_standard(value)`
    pub fn new(value: T, unit: &Unit) -> Result<Self, QuantityError> {
        check_kind::<K>(unit)?;
        Ok(Self::with_si(T::of_f64(unit.to_standard(value.as_f64())), unit.clone()))
    }

    /// SI value, displayed in `unit`
    pub fn from_si(si: T, unit: &Unit) -> Result<Self, QuantityError> {
        check_kind::<K>(unit)?;
        Ok(Self::with_si(si, unit.clone()))
    }

    /// SI value, displayed in the quantity's standard unit
    pub fn of_si(si: T, quantity: &Arc<Quantity>) -> Result<Self, QuantityError> {
        Self::from_si(si, &Unit::standard_of(quantity))
    }

    /// Parse `"<number><optional whitespace><abbreviation>"` for a named quantity
    pub fn parse(text: &str, quantity: &str, registry: &UnitRegistry) -> Result<Self, QuantityError> {
        let (value, abbreviation) = split_scalar_text(text)?;
        let unit = registry
            .unit(quantity, abbreviation)
            .map_err(|err| match err {
                QuantityError::UnknownUnit { .. } if abbreviation.is_empty() => {
                    QuantityError::parse(text, format!("missing unit abbreviation for {quantity}"))
                }
                other => other,
            })?;
        Self::new(T::of_f64(value), &unit)
    }

    /// Value in the unit registered under `abbreviation` for a named quantity
    pub fn of(
        value: T,
        abbreviation: &str,
        quantity: &str,
        registry: &UnitRegistry,
    ) -> Result<Self, QuantityError> {
        Self::new(value, &registry.unit(quantity, abbreviation)?)
    }

    pub(crate) fn with_si(si: T, unit: Unit) -> Self {
        Self {
            si,
            unit,
            kind: PhantomData,
        }
    }

    /// Value in the standard unit
    #[inline]
    pub fn si(&self) -> T {
        self.si
    }

    /// Value in the display unit
    pub fn value(&self) -> T {
        T::of_f64(self.unit.from_standard(self.si.as_f64()))
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn quantity(&self) -> &Arc<Quantity> {
        self.unit.quantity()
    }

    pub fn dimension(&self) -> DimensionVector {
        self.unit.dimension()
    }

    /// Value expressed in another unit of the same quantity
    pub fn in_unit(&self, unit: &Unit) -> Result<T, QuantityError> {
        check_quantity(&self.unit, unit)?;
        Ok(T::of_f64(unit.from_standard(self.si.as_f64())))
    }

    /// Same SI value displayed in another unit
    pub fn to_unit(&self, unit: &Unit) -> Result<Self, QuantityError> {
        check_quantity(&self.unit, unit)?;
        Ok(Self::with_si(self.si, unit.clone()))
    }

    /// Rebind the display unit; the SI value is untouched
    pub fn set_unit(&mut self, unit: &Unit) -> Result<(), QuantityError> {
        check_quantity(&self.unit, unit)?;
        self.unit = unit.clone();
        Ok(())
    }

    /// The smaller of two values; ties and incomparable values return `a`
    pub fn min<'a>(a: &'a Self, b: &'a Self) -> &'a Self {
        if b < a {
            b
        } else {
            a
        }
    }

    /// The larger of two values; ties and incomparable values return `a`
    pub fn max<'a>(a: &'a Self, b: &'a Self) -> &'a Self {
        if b > a {
            b
        } else {
            a
        }
    }

    /// The smallest value, the first one on ties; `None` for no values
    pub fn min_of<'a>(values: impl IntoIterator<Item = &'a Self>) -> Option<&'a Self> {
        values.into_iter().reduce(Self::min)
    }

    /// The largest value, the first one on ties; `None` for no values
    pub fn max_of<'a>(values: impl IntoIterator<Item = &'a Self>) -> Option<&'a Self> {
        values.into_iter().reduce(Self::max)
    }

    /// Linear interpolation in `zero`'s display unit.
    ///
    /// `ratio` is not clamped: values outside `[0, 1]` extrapolate.
    pub fn interpolate(zero: &Self, one: &Self, ratio: T) -> Result<Self, QuantityError> {
        let start = zero.value();
        let end = one.in_unit(&zero.unit)?;
        Self::new(start * (T::one() - ratio) + end * ratio, &zero.unit)
    }

    /// The SI value tagged with its dimension only
    pub fn to_generic(&self) -> SiScalar<T> {
        SiScalar::new(self.si, self.dimension())
    }
}

impl<T: Real> Scalar<Relative, T> {
    pub fn abs(&self) -> Self {
        Self::with_si(self.si.abs(), self.unit.clone())
    }

    /// `1 / si` with the negated dimension
    pub fn reciprocal(&self) -> SiScalar<T> {
        self.to_generic().reciprocal()
    }

    /// Product, classified through the registry
    pub fn times(
        &self,
        other: &Self,
        registry: &UnitRegistry,
    ) -> crate::generic::ClassifiedScalar<T> {
        (self * other).classify(registry)
    }

    /// Quotient, classified through the registry
    pub fn divided_by(
        &self,
        other: &Self,
        registry: &UnitRegistry,
    ) -> crate::generic::ClassifiedScalar<T> {
        (self / other).classify(registry)
    }
}

impl<K: Kind, T: Real> PartialEq for Scalar<K, T> {
    /// Equal SI values of the same quantity; the display unit is ignored
    fn eq(&self, other: &Self) -> bool {
        self.quantity() == other.quantity() && self.si == other.si
    }
}

impl<K: Kind, T: Real> PartialOrd for Scalar<K, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.quantity() != other.quantity() {
            return None;
        }
        self.si.partial_cmp(&other.si)
    }
}

impl<K: Kind, T: Real> fmt::Display for Scalar<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abbreviation = self.unit.abbreviation();
        if abbreviation.is_empty() {
            write!(f, "{}", self.value())
        } else {
            write!(f, "{} {}", self.value(), abbreviation)
        }
    }
}

impl<K: Kind, T: Real> fmt::Debug for Scalar<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scalar")
            .field("kind", &K::NAME)
            .field("si", &self.si)
            .field("unit", &self.unit)
            .finish()
    }
}
