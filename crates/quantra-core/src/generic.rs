//! Unclassified SI values tagged only by their dimension
//!
//! Multiplication and division produce these; [`SiScalar::classify`] looks the
//! dimension up in a registry and [`SiScalar::as_unit`] casts to a named quantity,
//! checking that the dimensions agree.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use crate::dimension::DimensionVector;
use crate::error::QuantityError;
use crate::matrix::Matrix;
use crate::parser::split_scalar_text;
use crate::real::Real;
use crate::registry::UnitRegistry;
use crate::scalar::{check_kind, Kind, Relative, Scalar};
use crate::storage::{Shape, Storage};
use crate::types::Unit;
use crate::vector::Vector;

/// Result of looking up a dimension in the registry
#[derive(Debug, Clone, PartialEq)]
pub enum Classified<N, G> {
    /// A named quantity claims the dimension
    Named(N),
    /// No named quantity has this dimension
    Unclassified(G),
}

pub type ClassifiedScalar<T = f64> = Classified<Scalar<Relative, T>, SiScalar<T>>;
pub type ClassifiedVector<T = f64> = Classified<Vector<Relative, T>, SiVector<T>>;
pub type ClassifiedMatrix<T = f64> = Classified<Matrix<Relative, T>, SiMatrix<T>>;

impl<N, G> Classified<N, G> {
    pub fn is_named(&self) -> bool {
        matches!(self, Classified::Named(_))
    }

    pub fn named(&self) -> Option<&N> {
        match self {
            Classified::Named(named) => Some(named),
            Classified::Unclassified(_) => None,
        }
    }

    pub fn into_named(self) -> Option<N> {
        match self {
            Classified::Named(named) => Some(named),
            Classified::Unclassified(_) => None,
        }
    }

    pub fn into_unclassified(self) -> Option<G> {
        match self {
            Classified::Named(_) => None,
            Classified::Unclassified(generic) => Some(generic),
        }
    }
}

/// Standard unit of the named relative quantity that claims `dimension`
fn claiming_unit(dimension: DimensionVector, registry: &UnitRegistry) -> Option<Unit> {
    let quantity = registry.quantity_by_dimension(dimension)?;
    let unit = registry.standard_unit(quantity.name()).ok();
    tracing::trace!(%dimension, quantity = %quantity.name(), "classified");
    unit
}

fn check_dimension(
    dimension: DimensionVector,
    unit: &Unit,
) -> Result<(), QuantityError> {
    if unit.dimension() == dimension {
        Ok(())
    } else {
        Err(QuantityError::DimensionMismatch {
            source_unit: dimension.to_string(),
            source_dimension: dimension,
            target_unit: format!("{} ({})", unit, unit.quantity()),
            target_dimension: unit.dimension(),
        })
    }
}

fn dimension_mismatch(left: DimensionVector, right: DimensionVector) -> QuantityError {
    QuantityError::DimensionMismatch {
        source_unit: left.to_string(),
        source_dimension: left,
        target_unit: right.to_string(),
        target_dimension: right,
    }
}

/// An SI value with a dimension but no named quantity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiScalar<T: Real = f64> {
    si: T,
    dimension: DimensionVector,
}

impl<T: Real> SiScalar<T> {
    pub fn new(si: T, dimension: DimensionVector) -> Self {
        Self { si, dimension }
    }

    /// A plain number
    pub fn dimensionless(value: T) -> Self {
        Self::new(value, DimensionVector::DIMENSIONLESS)
    }

    #[inline]
    pub fn si(&self) -> T {
        self.si
    }

    pub fn dimension(&self) -> DimensionVector {
        self.dimension
    }

    pub fn reciprocal(&self) -> Self {
        Self::new(T::one() / self.si, -self.dimension)
    }

    pub fn abs(&self) -> Self {
        Self::new(self.si.abs(), self.dimension)
    }

    pub fn powi(&self, exponent: i8) -> Self {
        Self::new(self.si.powi(exponent as i32), self.dimension.pow(exponent))
    }

    /// Product that fails instead of saturating a dimension exponent
    pub fn checked_mul(&self, rhs: &Self) -> Result<Self, QuantityError> {
        let dimension = self.dimension.checked_add(rhs.dimension)?;
        Ok(Self::new(self.si * rhs.si, dimension))
    }

    /// Quotient that fails instead of saturating a dimension exponent
    pub fn checked_div(&self, rhs: &Self) -> Result<Self, QuantityError> {
        let dimension = self.dimension.checked_sub(rhs.dimension)?;
        Ok(Self::new(self.si / rhs.si, dimension))
    }

    pub fn checked_reciprocal(&self) -> Result<Self, QuantityError> {
        Ok(Self::new(T::one() / self.si, self.dimension.checked_neg()?))
    }

    pub fn checked_powi(&self, exponent: i8) -> Result<Self, QuantityError> {
        let dimension = self.dimension.checked_pow(exponent)?;
        Ok(Self::new(self.si.powi(exponent as i32), dimension))
    }

    /// The synthesized SI unit for this dimension, registered on first use
    pub fn unit(&self, registry: &UnitRegistry) -> Unit {
        registry.si_unit(self.dimension)
    }

    /// Cast to a named quantity, displayed in `unit`.
    ///
    /// Fails with [`QuantityError::DimensionMismatch`] naming both sides when the
    /// unit's quantity has another dimension.
    pub fn as_unit<K: Kind>(&self, unit: &Unit) -> Result<Scalar<K, T>, QuantityError> {
        check_dimension(self.dimension, unit)?;
        check_kind::<K>(unit)?;
        Ok(Scalar::with_si(self.si, unit.clone()))
    }

    /// Named relative scalar in the standard unit of the quantity claiming this
    /// dimension, or the value itself when no quantity does
    pub fn classify(&self, registry: &UnitRegistry) -> ClassifiedScalar<T> {
        match claiming_unit(self.dimension, registry) {
            Some(unit) => Classified::Named(Scalar::with_si(self.si, unit)),
            None => Classified::Unclassified(*self),
        }
    }
}

impl<T: Real> PartialOrd for SiScalar<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.dimension != other.dimension {
            return None;
        }
        self.si.partial_cmp(&other.si)
    }
}

impl<T: Real> fmt::Display for SiScalar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dimension.is_dimensionless() {
            write!(f, "{}", self.si)
        } else {
            write!(f, "{} {}", self.si, self.dimension)
        }
    }
}

impl<T: Real> FromStr for SiScalar<T> {
    type Err = QuantityError;

    /// Parse `"9.81 kg.m/s2"`; a bare number is dimensionless
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (value, unit_text) = split_scalar_text(text)?;
        let dimension = if unit_text.is_empty() {
            DimensionVector::DIMENSIONLESS
        } else {
            unit_text.parse()?
        };
        Ok(Self::new(T::of_f64(value), dimension))
    }
}

/// Dimension exponents saturate; [`SiScalar::checked_mul`] reports overflow.
impl<T: Real> Mul for SiScalar<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.si * rhs.si, self.dimension + rhs.dimension)
    }
}

/// Dimension exponents saturate; [`SiScalar::checked_div`] reports overflow.
impl<T: Real> Div for SiScalar<T> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::new(self.si / rhs.si, self.dimension - rhs.dimension)
    }
}

impl<T: Real> Mul<T> for SiScalar<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Self::new(self.si * rhs, self.dimension)
    }
}

impl<T: Real> Div<T> for SiScalar<T> {
    type Output = Self;

    fn div(self, rhs: T) -> Self {
        Self::new(self.si / rhs, self.dimension)
    }
}

impl<T: Real> Add for SiScalar<T> {
    type Output = Result<Self, QuantityError>;

    fn add(self, rhs: Self) -> Self::Output {
        if self.dimension != rhs.dimension {
            return Err(dimension_mismatch(self.dimension, rhs.dimension));
        }
        Ok(Self::new(self.si + rhs.si, self.dimension))
    }
}

impl<T: Real> Sub for SiScalar<T> {
    type Output = Result<Self, QuantityError>;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.dimension != rhs.dimension {
            return Err(dimension_mismatch(self.dimension, rhs.dimension));
        }
        Ok(Self::new(self.si - rhs.si, self.dimension))
    }
}

impl<T: Real> Neg for SiScalar<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.si, self.dimension)
    }
}

/// Element-wise SI values with one dimension
#[derive(Debug, Clone, PartialEq)]
pub struct SiVector<T: Real = f64> {
    storage: Storage<T>,
    dimension: DimensionVector,
}

impl<T: Real> SiVector<T> {
    pub fn new(storage: Storage<T>, dimension: DimensionVector) -> Self {
        Self { storage, dimension }
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn dimension(&self) -> DimensionVector {
        self.dimension
    }

    pub fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    pub fn get(&self, index: usize) -> Result<SiScalar<T>, QuantityError> {
        self.storage
            .get(index)
            .map(|si| SiScalar::new(si, self.dimension))
            .ok_or_else(|| QuantityError::IndexOutOfBounds {
                index: index.to_string(),
                shape: Shape::Vector(self.len()),
            })
    }

    pub fn values_si(&self) -> Vec<T> {
        self.storage.to_vec()
    }

    pub fn as_unit<K: Kind>(&self, unit: &Unit) -> Result<Vector<K, T>, QuantityError> {
        check_dimension(self.dimension, unit)?;
        check_kind::<K>(unit)?;
        Ok(Vector::with_storage(self.storage.clone(), unit.clone()))
    }

    pub fn classify(&self, registry: &UnitRegistry) -> ClassifiedVector<T> {
        match claiming_unit(self.dimension, registry) {
            Some(unit) => Classified::Named(Vector::with_storage(self.storage.clone(), unit)),
            None => Classified::Unclassified(self.clone()),
        }
    }
}

/// Element-wise SI values of a row-major matrix with one dimension
#[derive(Debug, Clone, PartialEq)]
pub struct SiMatrix<T: Real = f64> {
    rows: usize,
    cols: usize,
    storage: Storage<T>,
    dimension: DimensionVector,
}

impl<T: Real> SiMatrix<T> {
    pub fn new(rows: usize, cols: usize, storage: Storage<T>, dimension: DimensionVector) -> Self {
        Self {
            rows,
            cols,
            storage,
            dimension,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dimension(&self) -> DimensionVector {
        self.dimension
    }

    pub fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    pub fn get(&self, row: usize, col: usize) -> Result<SiScalar<T>, QuantityError> {
        if row >= self.rows || col >= self.cols {
            return Err(QuantityError::IndexOutOfBounds {
                index: format!("({row}, {col})"),
                shape: Shape::Matrix {
                    rows: self.rows,
                    cols: self.cols,
                },
            });
        }
        let si = self.storage.get(row * self.cols + col).unwrap_or_else(T::zero);
        Ok(SiScalar::new(si, self.dimension))
    }

    pub fn as_unit<K: Kind>(&self, unit: &Unit) -> Result<Matrix<K, T>, QuantityError> {
        check_dimension(self.dimension, unit)?;
        check_kind::<K>(unit)?;
        Ok(Matrix::with_storage(
            self.rows,
            self.cols,
            self.storage.clone(),
            unit.clone(),
        ))
    }

    pub fn classify(&self, registry: &UnitRegistry) -> ClassifiedMatrix<T> {
        match claiming_unit(self.dimension, registry) {
            Some(unit) => Classified::Named(Matrix::with_storage(
                self.rows,
                self.cols,
                self.storage.clone(),
                unit,
            )),
            None => Classified::Unclassified(self.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::{AbsScalar, RelScalar};
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    fn registry() -> &'static UnitRegistry {
        UnitRegistry::global()
    }

    fn energy_like() -> SiScalar {
        SiScalar::new(12.0, DimensionVector::new(1, 2, -2, 0, 0, 0, 0))
    }

    #[test]
    fn test_cast_to_matching_dimension() {
        let joule = registry().unit("Energy", "kJ").unwrap();
        let energy: RelScalar = energy_like().as_unit(&joule).unwrap();
        assert_eq!(energy.si(), 12.0);
        assert_relative_eq!(energy.value(), 0.012);
        assert_eq!(energy.unit().abbreviation(), "kJ");
    }

    #[test]
    fn test_checked_arithmetic_reports_exponent_overflow() {
        let huge = SiScalar::new(2.0, DimensionVector::new(0, 120, 0, 0, 0, 0, 0));
        let area = SiScalar::new(3.0, DimensionVector::LENGTH.pow(2));
        assert_eq!(huge.checked_mul(&area).unwrap().si(), 6.0);
        assert!(matches!(
            huge.checked_mul(&huge),
            Err(QuantityError::ExponentOverflow(_))
        ));
        assert!(matches!(
            area.reciprocal().checked_div(&huge),
            Ok(v) if v.dimension() == DimensionVector::new(0, -122, 0, 0, 0, 0, 0)
        ));
        assert!(matches!(
            huge.checked_powi(2),
            Err(QuantityError::ExponentOverflow(_))
        ));
        let tiny = SiScalar::new(4.0, DimensionVector::new(0, 0, -128, 0, 0, 0, 0));
        assert!(tiny.checked_reciprocal().is_err());
        assert_eq!(area.checked_reciprocal().unwrap(), area.reciprocal());
    }

    #[test]
    fn test_cast_to_other_dimension_names_both_sides() {
        let newton = registry().unit("Force", "N").unwrap();
        let err = energy_like().as_unit::<Relative>(&newton).unwrap_err();
        assert_eq!(
            err,
            QuantityError::DimensionMismatch {
                source_unit: "kg.m2/s2".to_string(),
                source_dimension: DimensionVector::new(1, 2, -2, 0, 0, 0, 0),
                target_unit: "N (Force)".to_string(),
                target_dimension: DimensionVector::new(1, 1, -2, 0, 0, 0, 0),
            }
        );
        assert!(err.to_string().contains("kg.m2/s2"));
        assert!(err.to_string().contains("Force"));
    }

    #[test]
    fn test_cast_checks_kind() {
        let kelvin = registry().unit("AbsoluteTemperature", "K").unwrap();
        let generic = SiScalar::new(300.0, DimensionVector::TEMPERATURE);
        assert!(generic.as_unit::<Relative>(&kelvin).is_err());
        let absolute: AbsScalar = generic.as_unit(&kelvin).unwrap();
        assert_eq!(absolute.si(), 300.0);
    }

    #[test]
    fn test_classify() {
        let named = energy_like().classify(registry());
        assert_eq!(named.named().unwrap().quantity().name(), "Energy");

        let odd = SiScalar::new(1.0, DimensionVector::new(2, 0, 0, 0, 0, 0, 3));
        let unclassified = odd.classify(registry());
        assert!(!unclassified.is_named());
        assert_eq!(unclassified.into_unclassified(), Some(odd));
    }

    #[test]
    fn test_reciprocal_twice() {
        let value = SiScalar::new(4.0, DimensionVector::TIME);
        let back = value.reciprocal().reciprocal();
        assert_eq!(back, value);
        assert_eq!(value.reciprocal().to_string(), "0.25 1/s");
    }

    #[test]
    fn test_add_requires_same_dimension() {
        let a = SiScalar::new(1.0, DimensionVector::LENGTH);
        let b = SiScalar::new(2.0, DimensionVector::LENGTH);
        assert_eq!((a + b).unwrap().si(), 3.0);
        assert!(matches!(
            a + SiScalar::new(1.0, DimensionVector::TIME),
            Err(QuantityError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_from_str() {
        let value: SiScalar = "9.81 kg.m/s2".parse().unwrap();
        assert_eq!(value.si(), 9.81);
        assert_eq!(value.dimension(), DimensionVector::new(1, 1, -2, 0, 0, 0, 0));
        let plain: SiScalar = "2".parse().unwrap();
        assert!(plain.dimension().is_dimensionless());
        assert!("9.81 furlong".parse::<SiScalar>().is_err());
    }

    #[test]
    fn test_powi() {
        let side = SiScalar::new(3.0, DimensionVector::LENGTH);
        let volume = side.powi(3);
        assert_eq!(volume.si(), 27.0);
        assert_eq!(volume.dimension().to_string(), "m3");
    }
}
