//! Operator implementations for scalars
//!
//! Addition and subtraction check quantities at run time and return `Result`.
//! Multiplication and division compose dimensions and always succeed, producing
//! an unclassified [`SiScalar`]. `Absolute + Absolute` has no implementation.

use std::ops::{Add, Div, Mul, Neg, Sub};

use super::{check_pairing, check_quantity, paired_relative, Absolute, Relative, Scalar};
use crate::error::QuantityError;
use crate::generic::SiScalar;
use crate::real::Real;

// relative ± relative

impl<'a, 'b, T: Real> Add<&'b Scalar<Relative, T>> for &'a Scalar<Relative, T> {
    type Output = Result<Scalar<Relative, T>, QuantityError>;

    fn add(self, rhs: &'b Scalar<Relative, T>) -> Self::Output {
        check_quantity(&self.unit, &rhs.unit)?;
        Ok(Scalar::with_si(self.si + rhs.si, self.unit.clone()))
    }
}

impl<'a, 'b, T: Real> Sub<&'b Scalar<Relative, T>> for &'a Scalar<Relative, T> {
    type Output = Result<Scalar<Relative, T>, QuantityError>;

    fn sub(self, rhs: &'b Scalar<Relative, T>) -> Self::Output {
        check_quantity(&self.unit, &rhs.unit)?;
        Ok(Scalar::with_si(self.si - rhs.si, self.unit.clone()))
    }
}

forward_binop!(impl Add, add for Scalar<Relative, T>, Scalar<Relative, T> => Result<Scalar<Relative, T>, QuantityError>);
forward_binop!(impl Sub, sub for Scalar<Relative, T>, Scalar<Relative, T> => Result<Scalar<Relative, T>, QuantityError>);

// absolute - absolute = relative

impl<'a, 'b, T: Real> Sub<&'b Scalar<Absolute, T>> for &'a Scalar<Absolute, T> {
    type Output = Result<Scalar<Relative, T>, QuantityError>;

    /// The difference is displayed in the relative unit paired with the left operand's unit
    fn sub(self, rhs: &'b Scalar<Absolute, T>) -> Self::Output {
        check_quantity(&self.unit, &rhs.unit)?;
        let unit = paired_relative(&self.unit)?;
        Ok(Scalar::with_si(self.si - rhs.si, unit))
    }
}

forward_binop!(impl Sub, sub for Scalar<Absolute, T>, Scalar<Absolute, T> => Result<Scalar<Relative, T>, QuantityError>);

// absolute ± relative = absolute

impl<'a, 'b, T: Real> Add<&'b Scalar<Relative, T>> for &'a Scalar<Absolute, T> {
    type Output = Result<Scalar<Absolute, T>, QuantityError>;

    fn add(self, rhs: &'b Scalar<Relative, T>) -> Self::Output {
        check_pairing(&self.unit, &rhs.unit)?;
        Ok(Scalar::with_si(self.si + rhs.si, self.unit.clone()))
    }
}

impl<'a, 'b, T: Real> Sub<&'b Scalar<Relative, T>> for &'a Scalar<Absolute, T> {
    type Output = Result<Scalar<Absolute, T>, QuantityError>;

    fn sub(self, rhs: &'b Scalar<Relative, T>) -> Self::Output {
        check_pairing(&self.unit, &rhs.unit)?;
        Ok(Scalar::with_si(self.si - rhs.si, self.unit.clone()))
    }
}

impl<'a, 'b, T: Real> Add<&'b Scalar<Absolute, T>> for &'a Scalar<Relative, T> {
    type Output = Result<Scalar<Absolute, T>, QuantityError>;

    fn add(self, rhs: &'b Scalar<Absolute, T>) -> Self::Output {
        rhs + self
    }
}

forward_binop!(impl Add, add for Scalar<Absolute, T>, Scalar<Relative, T> => Result<Scalar<Absolute, T>, QuantityError>);
forward_binop!(impl Sub, sub for Scalar<Absolute, T>, Scalar<Relative, T> => Result<Scalar<Absolute, T>, QuantityError>);
forward_binop!(impl Add, add for Scalar<Relative, T>, Scalar<Absolute, T> => Result<Scalar<Absolute, T>, QuantityError>);

impl<'a, T: Real> Neg for &'a Scalar<Relative, T> {
    type Output = Scalar<Relative, T>;

    fn neg(self) -> Self::Output {
        Scalar::with_si(-self.si, self.unit.clone())
    }
}

impl<T: Real> Neg for Scalar<Relative, T> {
    type Output = Scalar<Relative, T>;

    fn neg(self) -> Self::Output {
        -&self
    }
}

// scaling by a plain number keeps quantity and display unit

impl<'a, T: Real> Mul<T> for &'a Scalar<Relative, T> {
    type Output = Scalar<Relative, T>;

    fn mul(self, rhs: T) -> Self::Output {
        Scalar::with_si(self.si * rhs, self.unit.clone())
    }
}

impl<'a, T: Real> Div<T> for &'a Scalar<Relative, T> {
    type Output = Scalar<Relative, T>;

    fn div(self, rhs: T) -> Self::Output {
        Scalar::with_si(self.si / rhs, self.unit.clone())
    }
}

impl<T: Real> Mul<T> for Scalar<Relative, T> {
    type Output = Scalar<Relative, T>;

    fn mul(self, rhs: T) -> Self::Output {
        &self * rhs
    }
}

impl<T: Real> Div<T> for Scalar<Relative, T> {
    type Output = Scalar<Relative, T>;

    fn div(self, rhs: T) -> Self::Output {
        &self / rhs
    }
}

macro_rules! number_times_scalar {
    ($($t:ty),*) => {$(
        impl<'a> Mul<&'a Scalar<Relative, $t>> for $t {
            type Output = Scalar<Relative, $t>;

            fn mul(self, rhs: &'a Scalar<Relative, $t>) -> Self::Output {
                rhs * self
            }
        }

        impl Mul<Scalar<Relative, $t>> for $t {
            type Output = Scalar<Relative, $t>;

            fn mul(self, rhs: Scalar<Relative, $t>) -> Self::Output {
                &rhs * self
            }
        }
    )*};
}

number_times_scalar!(f32, f64);

// multiplication and division compose dimensions

impl<'a, 'b, T: Real> Mul<&'b Scalar<Relative, T>> for &'a Scalar<Relative, T> {
    type Output = SiScalar<T>;

    fn mul(self, rhs: &'b Scalar<Relative, T>) -> SiScalar<T> {
        self.to_generic() * rhs.to_generic()
    }
}

impl<'a, 'b, T: Real> Div<&'b Scalar<Relative, T>> for &'a Scalar<Relative, T> {
    type Output = SiScalar<T>;

    fn div(self, rhs: &'b Scalar<Relative, T>) -> SiScalar<T> {
        self.to_generic() / rhs.to_generic()
    }
}

impl<'a, 'b, T: Real> Mul<&'b SiScalar<T>> for &'a Scalar<Relative, T> {
    type Output = SiScalar<T>;

    fn mul(self, rhs: &'b SiScalar<T>) -> SiScalar<T> {
        self.to_generic() * *rhs
    }
}

impl<'a, 'b, T: Real> Div<&'b SiScalar<T>> for &'a Scalar<Relative, T> {
    type Output = SiScalar<T>;

    fn div(self, rhs: &'b SiScalar<T>) -> SiScalar<T> {
        self.to_generic() / *rhs
    }
}

impl<'a, 'b, T: Real> Mul<&'b Scalar<Relative, T>> for &'a SiScalar<T> {
    type Output = SiScalar<T>;

    fn mul(self, rhs: &'b Scalar<Relative, T>) -> SiScalar<T> {
        *self * rhs.to_generic()
    }
}

impl<'a, 'b, T: Real> Div<&'b Scalar<Relative, T>> for &'a SiScalar<T> {
    type Output = SiScalar<T>;

    fn div(self, rhs: &'b Scalar<Relative, T>) -> SiScalar<T> {
        *self / rhs.to_generic()
    }
}

forward_binop!(impl Mul, mul for Scalar<Relative, T>, Scalar<Relative, T> => SiScalar<T>);
forward_binop!(impl Div, div for Scalar<Relative, T>, Scalar<Relative, T> => SiScalar<T>);
forward_binop!(impl Mul, mul for Scalar<Relative, T>, SiScalar<T> => SiScalar<T>);
forward_binop!(impl Div, div for Scalar<Relative, T>, SiScalar<T> => SiScalar<T>);
forward_binop!(impl Mul, mul for SiScalar<T>, Scalar<Relative, T> => SiScalar<T>);
forward_binop!(impl Div, div for SiScalar<T>, Scalar<Relative, T> => SiScalar<T>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::DimensionVector;
    use crate::registry::UnitRegistry;
    use crate::scalar::{AbsScalar, RelScalar};
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    fn registry() -> &'static UnitRegistry {
        UnitRegistry::global()
    }

    fn rel(value: f64, abbreviation: &str, quantity: &str) -> RelScalar {
        RelScalar::of(value, abbreviation, quantity, registry()).unwrap()
    }

    fn abs(value: f64, abbreviation: &str, quantity: &str) -> AbsScalar {
        AbsScalar::of(value, abbreviation, quantity, registry()).unwrap()
    }

    #[test]
    fn test_add_keeps_left_unit() {
        let sum = (rel(1.0, "km", "Length") + rel(500.0, "m", "Length")).unwrap();
        assert_eq!(sum.si(), 1500.0);
        assert_eq!(sum.unit().abbreviation(), "km");
        assert_eq!(sum.value(), 1.5);
    }

    #[test]
    fn test_add_rejects_other_quantity() {
        let err = (rel(1.0, "m", "Length") + rel(1.0, "s", "Duration")).unwrap_err();
        let QuantityError::QuantityMismatch { left, right } = err else {
            panic!("expected quantity mismatch");
        };
        assert_eq!(left, "Length [m]");
        assert_eq!(right, "Duration [s]");
    }

    #[test]
    fn test_reference_and_owned_forms_agree() {
        let a = rel(3.0, "m", "Length");
        let b = rel(2.0, "m", "Length");
        let by_ref = (&a - &b).unwrap();
        let mixed = (&a - b.clone()).unwrap();
        let owned = (a.clone() - &b).unwrap();
        assert_eq!(by_ref, mixed);
        assert_eq!(mixed, owned);
        assert_eq!((-&a).si(), -3.0);
    }

    #[test]
    fn test_absolute_difference_is_relative() {
        let warm = abs(20.0, "degC", "AbsoluteTemperature");
        let cold = abs(10.0, "degC", "AbsoluteTemperature");
        let difference: RelScalar = (&warm - &cold).unwrap();
        assert_eq!(difference.quantity().name(), "Temperature");
        assert_eq!(difference.unit().abbreviation(), "degC");
        assert_relative_eq!(difference.value(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_absolute_plus_relative() {
        let start = abs(20.0, "degC", "AbsoluteTemperature");
        let delta = rel(9.0, "degF", "Temperature");
        let later = (&start + &delta).unwrap();
        assert_eq!(later.unit().abbreviation(), "degC");
        assert_relative_eq!(later.value(), 25.0, epsilon = 1e-9);
        let earlier = (&start - &delta).unwrap();
        assert_relative_eq!(earlier.value(), 15.0, epsilon = 1e-9);
        let commuted = (&delta + &start).unwrap();
        assert_eq!(commuted, later);
    }

    #[test]
    fn test_absolute_plus_unpaired_relative_fails() {
        let start = abs(20.0, "degC", "AbsoluteTemperature");
        let length = rel(1.0, "m", "Length");
        assert!(matches!(
            &start + &length,
            Err(QuantityError::QuantityMismatch { .. })
        ));
    }

    #[test]
    fn test_scaling_by_number() {
        let speed = rel(36.0, "km/h", "Speed");
        let doubled = &speed * 2.0;
        assert_eq!(doubled.unit().abbreviation(), "km/h");
        assert_relative_eq!(doubled.value(), 72.0, epsilon = 1e-9);
        assert_relative_eq!((2.0 * &speed).si(), 20.0, epsilon = 1e-9);
        assert_relative_eq!((speed / 4.0).si(), 2.5, epsilon = 1e-9);
    }

    #[test]
    fn test_division_composes_dimensions() {
        let speed = rel(5.0, "m/s", "Speed");
        let time = rel(2.0, "s", "Duration");
        let result = &speed / &time;
        assert_eq!(result.si(), 2.5);
        assert_eq!(result.dimension(), "m/s2".parse::<DimensionVector>().unwrap());
        let acceleration = result.classify(registry()).into_named().unwrap();
        assert_eq!(acceleration.quantity().name(), "Acceleration");
    }

    #[test]
    fn test_chained_multiplication_through_generic() {
        let force = rel(10.0, "N", "Force");
        let distance = rel(2.0, "m", "Length");
        let time = rel(4.0, "s", "Duration");
        let power = (&force * &distance) / &time;
        assert_eq!(power.si(), 5.0);
        let named = power.classify(registry()).into_named().unwrap();
        assert_eq!(named.quantity().name(), "Power");
    }
}
