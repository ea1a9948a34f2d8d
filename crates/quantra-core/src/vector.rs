//! Vectors of values of one quantity sharing a display unit

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Neg, Sub};
use std::sync::Arc;

use crate::dimension::DimensionVector;
use crate::error::QuantityError;
use crate::generic::{ClassifiedVector, SiVector};
use crate::real::Real;
use crate::registry::UnitRegistry;
use crate::scalar::{
    check_kind, check_pairing, check_quantity, paired_relative, Absolute, Kind, Relative, Scalar,
};
use crate::storage::{zip_checked, Shape, Storage, StorageType};
use crate::types::{Quantity, Unit};

/// Ordered SI values of one quantity, dense or sparse
#[derive(Clone)]
pub struct Vector<K: Kind = Relative, T: Real = f64> {
    storage: Storage<T>,
    unit: Unit,
    kind: PhantomData<K>,
}

pub type RelVector<T = f64> = Vector<Relative, T>;
pub type AbsVector<T = f64> = Vector<Absolute, T>;
pub type FloatRelVector = Vector<Relative, f32>;
pub type FloatAbsVector = Vector<Absolute, f32>;

fn to_standard<T: Real>(value: T, unit: &Unit) -> T {
    T::of_f64(unit.to_standard(value.as_f64()))
}

fn from_standard<T: Real>(si: T, unit: &Unit) -> T {
    T::of_f64(unit.from_standard(si.as_f64()))
}

impl<K: Kind, T: Real> Vector<K, T> {
    /// Values expressed in `unit`, each converted with `to_standard`
    pub fn new(values: &[T], unit: &Unit, storage_type: StorageType) -> Result<Self, QuantityError> {
        check_kind::<K>(unit)?;
        let si = values.iter().map(|&v| to_standard(v, unit)).collect();
        Ok(Self::with_storage(Storage::from_values(si, storage_type), unit.clone()))
    }

    /// SI values, displayed in `unit`
    pub fn from_si(values: &[T], unit: &Unit, storage_type: StorageType) -> Result<Self, QuantityError> {
        check_kind::<K>(unit)?;
        Ok(Self::with_storage(
            Storage::from_values(values.to_vec(), storage_type),
            unit.clone(),
        ))
    }

    /// Values taken from scalars' SI values.
    ///
    /// `unit` only sets the display unit and defaults to the first scalar's unit;
    /// it is required when `scalars` is empty.
    pub fn from_scalars(
        scalars: &[Scalar<K, T>],
        unit: Option<&Unit>,
        storage_type: StorageType,
    ) -> Result<Self, QuantityError> {
        let unit = match (unit, scalars.first()) {
            (Some(unit), _) => unit,
            (None, Some(first)) => first.unit(),
            (None, None) => return Err(QuantityError::MissingArgument("unit")),
        };
        check_kind::<K>(unit)?;
        for scalar in scalars {
            check_quantity(unit, scalar.unit())?;
        }
        let si = scalars.iter().map(Scalar::si).collect();
        Ok(Self::with_storage(Storage::from_values(si, storage_type), unit.clone()))
    }

    /// Sparse vector from `(index, value)` pairs expressed in `unit`; every other
    /// element is zero
    pub fn from_sparse(len: usize, entries: &[(usize, T)], unit: &Unit) -> Result<Self, QuantityError> {
        check_kind::<K>(unit)?;
        let storage = Storage::sparse(
            len,
            entries.iter().map(|&(i, v)| (i, to_standard(v, unit))),
        )?;
        Ok(Self::with_storage(storage, unit.clone()))
    }

    pub(crate) fn with_storage(storage: Storage<T>, unit: Unit) -> Self {
        Self {
            storage,
            unit,
            kind: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn shape(&self) -> Shape {
        Shape::Vector(self.len())
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

    pub fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    pub fn storage_type(&self) -> StorageType {
        self.storage.storage_type()
    }

    /// Number of non-zero elements
    pub fn cardinality(&self) -> usize {
        self.storage.cardinality()
    }

    pub fn get_si(&self, index: usize) -> Result<T, QuantityError> {
        self.storage
            .get(index)
            .ok_or_else(|| QuantityError::IndexOutOfBounds {
                index: index.to_string(),
                shape: self.shape(),
            })
    }

    pub fn get(&self, index: usize) -> Result<Scalar<K, T>, QuantityError> {
        Ok(Scalar::with_si(self.get_si(index)?, self.unit.clone()))
    }

    pub fn values_si(&self) -> Vec<T> {
        self.storage.to_vec()
    }

    /// Values in the display unit
    pub fn values(&self) -> Vec<T> {
        self.storage.iter().map(|si| from_standard(si, &self.unit)).collect()
    }

    pub fn values_in_unit(&self, unit: &Unit) -> Result<Vec<T>, QuantityError> {
        check_quantity(&self.unit, unit)?;
        Ok(self.storage.iter().map(|si| from_standard(si, unit)).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = Scalar<K, T>> + '_ {
        self.storage
            .iter()
            .map(move |si| Scalar::with_si(si, self.unit.clone()))
    }

    pub fn to_dense(&self) -> Self {
        Self::with_storage(self.storage.clone().into_dense(), self.unit.clone())
    }

    pub fn to_sparse(&self) -> Self {
        Self::with_storage(self.storage.clone().into_sparse(), self.unit.clone())
    }

    /// Same SI values displayed in another unit of the quantity
    pub fn to_unit(&self, unit: &Unit) -> Result<Self, QuantityError> {
        check_quantity(&self.unit, unit)?;
        Ok(Self::with_storage(self.storage.clone(), unit.clone()))
    }

    pub fn set_unit(&mut self, unit: &Unit) -> Result<(), QuantityError> {
        check_quantity(&self.unit, unit)?;
        self.unit = unit.clone();
        Ok(())
    }

    pub fn to_generic(&self) -> SiVector<T> {
        SiVector::new(self.storage.clone(), self.dimension())
    }

    fn zip(
        &self,
        other: &Self,
        f: impl Fn(T, T) -> T,
    ) -> Result<Storage<T>, QuantityError> {
        zip_checked((&self.storage, self.shape()), (&other.storage, other.shape()), f)
    }
}

impl<T: Real> Vector<Relative, T> {
    pub fn sum(&self) -> Scalar<Relative, T> {
        Scalar::with_si(self.storage.sum(), self.unit.clone())
    }

    /// Every element multiplied by a plain number
    pub fn scaled(&self, factor: T) -> Self {
        Self::with_storage(self.storage.map(|v| v * factor), self.unit.clone())
    }

    pub fn abs(&self) -> Self {
        Self::with_storage(self.storage.map(|v| v.abs()), self.unit.clone())
    }

    /// Element-wise product; dimensions add
    pub fn times_elements(&self, other: &Self) -> Result<SiVector<T>, QuantityError> {
        let storage = self.zip(other, |l, r| l * r)?;
        Ok(SiVector::new(storage, self.dimension() + other.dimension()))
    }

    /// Element-wise quotient; dimensions subtract
    pub fn divide_elements(&self, other: &Self) -> Result<SiVector<T>, QuantityError> {
        let storage = self.zip(other, |l, r| l / r)?;
        Ok(SiVector::new(storage, self.dimension() - other.dimension()))
    }

    /// Every element multiplied by a scalar; dimensions add
    pub fn times_scalar(&self, scalar: &Scalar<Relative, T>) -> SiVector<T> {
        let factor = scalar.si();
        SiVector::new(
            self.storage.map(|v| v * factor),
            self.dimension() + scalar.dimension(),
        )
    }

    /// Element-wise product, classified through the registry
    pub fn times(&self, other: &Self, registry: &UnitRegistry) -> Result<ClassifiedVector<T>, QuantityError> {
        Ok(self.times_elements(other)?.classify(registry))
    }

    /// Element-wise quotient, classified through the registry
    pub fn divided_by(&self, other: &Self, registry: &UnitRegistry) -> Result<ClassifiedVector<T>, QuantityError> {
        Ok(self.divide_elements(other)?.classify(registry))
    }
}

impl<K: Kind, T: Real> PartialEq for Vector<K, T> {
    /// Same quantity and equal SI values; display unit and storage type are ignored
    fn eq(&self, other: &Self) -> bool {
        self.quantity() == other.quantity()
            && self.len() == other.len()
            && self.storage.iter().eq(other.storage.iter())
    }
}

impl<K: Kind, T: Real> fmt::Display for Vector<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.values().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "] {}", self.unit)
    }
}

impl<K: Kind, T: Real> fmt::Debug for Vector<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("kind", &K::NAME)
            .field("storage", &self.storage)
            .field("unit", &self.unit)
            .finish()
    }
}

impl<'a, 'b, T: Real> Add<&'b Vector<Relative, T>> for &'a Vector<Relative, T> {
    type Output = Result<Vector<Relative, T>, QuantityError>;

    fn add(self, rhs: &'b Vector<Relative, T>) -> Self::Output {
        check_quantity(&self.unit, &rhs.unit)?;
        Ok(Vector::with_storage(self.zip(rhs, |l, r| l + r)?, self.unit.clone()))
    }
}

impl<'a, 'b, T: Real> Sub<&'b Vector<Relative, T>> for &'a Vector<Relative, T> {
    type Output = Result<Vector<Relative, T>, QuantityError>;

    fn sub(self, rhs: &'b Vector<Relative, T>) -> Self::Output {
        check_quantity(&self.unit, &rhs.unit)?;
        Ok(Vector::with_storage(self.zip(rhs, |l, r| l - r)?, self.unit.clone()))
    }
}

impl<'a, 'b, T: Real> Sub<&'b Vector<Absolute, T>> for &'a Vector<Absolute, T> {
    type Output = Result<Vector<Relative, T>, QuantityError>;

    fn sub(self, rhs: &'b Vector<Absolute, T>) -> Self::Output {
        check_quantity(&self.unit, &rhs.unit)?;
        let unit = paired_relative(&self.unit)?;
        Ok(Vector::with_storage(self.zip(rhs, |l, r| l - r)?, unit))
    }
}

impl<'a, 'b, T: Real> Add<&'b Vector<Relative, T>> for &'a Vector<Absolute, T> {
    type Output = Result<Vector<Absolute, T>, QuantityError>;

    fn add(self, rhs: &'b Vector<Relative, T>) -> Self::Output {
        check_pairing(&self.unit, &rhs.unit)?;
        let storage = zip_checked((&self.storage, self.shape()), (&rhs.storage, rhs.shape()), |l, r| l + r)?;
        Ok(Vector::with_storage(storage, self.unit.clone()))
    }
}

impl<'a, 'b, T: Real> Sub<&'b Vector<Relative, T>> for &'a Vector<Absolute, T> {
    type Output = Result<Vector<Absolute, T>, QuantityError>;

    fn sub(self, rhs: &'b Vector<Relative, T>) -> Self::Output {
        check_pairing(&self.unit, &rhs.unit)?;
        let storage = zip_checked((&self.storage, self.shape()), (&rhs.storage, rhs.shape()), |l, r| l - r)?;
        Ok(Vector::with_storage(storage, self.unit.clone()))
    }
}

forward_binop!(impl Add, add for Vector<Relative, T>, Vector<Relative, T> => Result<Vector<Relative, T>, QuantityError>);
forward_binop!(impl Sub, sub for Vector<Relative, T>, Vector<Relative, T> => Result<Vector<Relative, T>, QuantityError>);
forward_binop!(impl Sub, sub for Vector<Absolute, T>, Vector<Absolute, T> => Result<Vector<Relative, T>, QuantityError>);
forward_binop!(impl Add, add for Vector<Absolute, T>, Vector<Relative, T> => Result<Vector<Absolute, T>, QuantityError>);
forward_binop!(impl Sub, sub for Vector<Absolute, T>, Vector<Relative, T> => Result<Vector<Absolute, T>, QuantityError>);

impl<'a, T: Real> Neg for &'a Vector<Relative, T> {
    type Output = Vector<Relative, T>;

    fn neg(self) -> Self::Output {
        Vector::with_storage(self.storage.map(|v| -v), self.unit.clone())
    }
}

impl<T: Real> Neg for Vector<Relative, T> {
    type Output = Vector<Relative, T>;

    fn neg(self) -> Self::Output {
        -&self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::RelScalar;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    fn registry() -> &'static UnitRegistry {
        UnitRegistry::global()
    }

    fn unit(quantity: &str, abbreviation: &str) -> Unit {
        registry().unit(quantity, abbreviation).unwrap()
    }

    #[test]
    fn test_new_converts_each_element() {
        let km = unit("Length", "km");
        let v = RelVector::new(&[1.0, 2.5, 0.0], &km, StorageType::Dense).unwrap();
        assert_eq!(v.values_si(), vec![1000.0, 2500.0, 0.0]);
        assert_eq!(v.values(), vec![1.0, 2.5, 0.0]);
        assert_eq!(v.cardinality(), 2);
        assert_eq!(v.to_string(), "[1, 2.5, 0] km");
    }

    #[test]
    fn test_from_scalars_uses_si_values() {
        let registry = registry();
        let scalars = [
            RelScalar::of(1.0, "km", "Length", registry).unwrap(),
            RelScalar::of(20.0, "m", "Length", registry).unwrap(),
        ];
        let mm = unit("Length", "mm");
        let v = RelVector::from_scalars(&scalars, Some(&mm), StorageType::Sparse).unwrap();
        assert_eq!(v.values_si(), vec![1000.0, 20.0]);
        assert_eq!(v.unit().abbreviation(), "mm");
        assert_eq!(v.storage_type(), StorageType::Sparse);

        let default_unit = RelVector::from_scalars(&scalars, None, StorageType::Dense).unwrap();
        assert_eq!(default_unit.unit().abbreviation(), "km");
    }

    #[test]
    fn test_from_scalars_without_unit_or_values() {
        let err = RelVector::<f64>::from_scalars(&[], None, StorageType::Dense).unwrap_err();
        assert_eq!(err, QuantityError::MissingArgument("unit"));
    }

    #[test]
    fn test_from_scalars_rejects_mixed_quantities() {
        let registry = registry();
        let scalars = [
            RelScalar::of(1.0, "km", "Length", registry).unwrap(),
            RelScalar::of(1.0, "s", "Duration", registry).unwrap(),
        ];
        assert!(matches!(
            RelVector::from_scalars(&scalars, None, StorageType::Dense),
            Err(QuantityError::QuantityMismatch { .. })
        ));
    }

    #[test]
    fn test_sparse_vector() {
        let v = RelVector::from_sparse(6, &[(1, 2.0), (4, 3.0)], &unit("Length", "km")).unwrap();
        assert_eq!(v.get_si(0).unwrap(), 0.0);
        assert_eq!(v.get(4).unwrap().value(), 3.0);
        assert_eq!(v.sum().si(), 5000.0);
        assert!(matches!(
            v.get(6),
            Err(QuantityError::IndexOutOfBounds { .. })
        ));
        assert_eq!(v.to_dense().values_si(), v.values_si());
    }

    #[test]
    fn test_elementwise_addition() {
        let m = unit("Length", "m");
        let a = RelVector::new(&[1.0, 2.0], &m, StorageType::Dense).unwrap();
        let b = RelVector::new(&[0.5, 0.5], &unit("Length", "km"), StorageType::Dense).unwrap();
        let sum = (&a + &b).unwrap();
        assert_eq!(sum.values(), vec![501.0, 502.0]);
        let c = RelVector::new(&[1.0, 2.0, 3.0], &m, StorageType::Dense).unwrap();
        assert_eq!(
            (&a + &c).unwrap_err(),
            QuantityError::ShapeMismatch {
                left: Shape::Vector(2),
                right: Shape::Vector(3),
            }
        );
        assert_eq!((-a).values(), vec![-1.0, -2.0]);
    }

    #[test]
    fn test_absolute_vectors() {
        let celsius = unit("AbsoluteTemperature", "degC");
        let a = AbsVector::new(&[20.0, 30.0], &celsius, StorageType::Dense).unwrap();
        let b = AbsVector::new(&[10.0, 10.0], &celsius, StorageType::Dense).unwrap();
        let difference = (&a - &b).unwrap();
        assert_eq!(difference.quantity().name(), "Temperature");
        let values = difference.values();
        assert_relative_eq!(values[0], 10.0, epsilon = 1e-9);
        assert_relative_eq!(values[1], 20.0, epsilon = 1e-9);
        let back = (&b + &difference).unwrap();
        assert_relative_eq!(back.values()[1], 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_divide_elements_classifies() {
        let distance = RelVector::new(&[10.0, 20.0], &unit("Length", "m"), StorageType::Dense).unwrap();
        let time = RelVector::new(&[2.0, 4.0], &unit("Duration", "s"), StorageType::Dense).unwrap();
        let speed = distance.divided_by(&time, registry()).unwrap().into_named().unwrap();
        assert_eq!(speed.quantity().name(), "Speed");
        assert_eq!(speed.values_si(), vec![5.0, 5.0]);
    }
}
