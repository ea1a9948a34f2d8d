//! Dimension vectors: exponents over the SI base dimensions
//!
//! A [`DimensionVector`] is the identity key of a quantity family. Multiplying two
//! quantities adds their exponents, dividing subtracts them, and taking a reciprocal
//! negates them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use crate::error::QuantityError;

/// Slot indices into [`DimensionVector::exponents`]
pub const MASS: usize = 0;
pub const LENGTH: usize = 1;
pub const TIME: usize = 2;
pub const CURRENT: usize = 3;
pub const TEMPERATURE: usize = 4;
pub const AMOUNT: usize = 5;
pub const LUMINOUS_INTENSITY: usize = 6;
pub const MONEY: usize = 7;

/// Number of dimension slots (seven SI base dimensions plus money)
pub const SLOTS: usize = 8;

/// Base-unit abbreviations in display order, paired with their slot.
pub const BASE_UNITS: [(&str, usize); SLOTS] = [
    ("kg", MASS),
    ("m", LENGTH),
    ("s", TIME),
    ("A", CURRENT),
    ("K", TEMPERATURE),
    ("mol", AMOUNT),
    ("cd", LUMINOUS_INTENSITY),
    ("$", MONEY),
];

/// Exponents over mass, length, time, current, temperature, amount,
/// luminous intensity and money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DimensionVector {
    exponents: [i8; SLOTS],
}

impl DimensionVector {
    pub const DIMENSIONLESS: Self = Self::new(0, 0, 0, 0, 0, 0, 0);
    pub const MASS: Self = Self::new(1, 0, 0, 0, 0, 0, 0);
    pub const LENGTH: Self = Self::new(0, 1, 0, 0, 0, 0, 0);
    pub const TIME: Self = Self::new(0, 0, 1, 0, 0, 0, 0);
    pub const CURRENT: Self = Self::new(0, 0, 0, 1, 0, 0, 0);
    pub const TEMPERATURE: Self = Self::new(0, 0, 0, 0, 1, 0, 0);
    pub const AMOUNT: Self = Self::new(0, 0, 0, 0, 0, 1, 0);
    pub const LUMINOUS_INTENSITY: Self = Self::new(0, 0, 0, 0, 0, 0, 1);
    pub const MONEY: Self = Self::new(0, 0, 0, 0, 0, 0, 0).with_money(1);

    /// Build from the seven SI exponents, in the order
    /// mass, length, time, current, temperature, amount, luminous intensity.
    pub const fn new(
        mass: i8,
        length: i8,
        time: i8,
        current: i8,
        temperature: i8,
        amount: i8,
        luminous_intensity: i8,
    ) -> Self {
        Self {
            exponents: [
                mass,
                length,
                time,
                current,
                temperature,
                amount,
                luminous_intensity,
                0,
            ],
        }
    }

    /// Copy of this vector with the money exponent set
    pub const fn with_money(self, money: i8) -> Self {
        let mut exponents = self.exponents;
        exponents[MONEY] = money;
        Self { exponents }
    }

    pub const fn from_exponents(exponents: [i8; SLOTS]) -> Self {
        Self { exponents }
    }

    pub const fn exponents(&self) -> [i8; SLOTS] {
        self.exponents
    }

    /// Exponent of a single slot (see the slot constants in this module),
    /// or `None` past the last slot
    pub fn exponent(&self, slot: usize) -> Option<i8> {
        self.exponents.get(slot).copied()
    }

    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// Raise to an integer power (multiply every exponent).
    ///
    /// Exponents saturate at the `i8` bounds; see [`DimensionVector::checked_pow`].
    pub fn pow(self, power: i8) -> Self {
        self.zip_with(Self::DIMENSIONLESS, |a, _| a.saturating_mul(power))
    }

    /// Dimension of a product, failing when an exponent leaves the `i8` range
    pub fn checked_add(self, rhs: Self) -> Result<Self, QuantityError> {
        self.try_zip_with(rhs, i8::checked_add, "*")
    }

    /// Dimension of a quotient, failing when an exponent leaves the `i8` range
    pub fn checked_sub(self, rhs: Self) -> Result<Self, QuantityError> {
        self.try_zip_with(rhs, i8::checked_sub, "/")
    }

    pub fn checked_neg(self) -> Result<Self, QuantityError> {
        Self::DIMENSIONLESS.checked_sub(self)
    }

    pub fn checked_pow(self, power: i8) -> Result<Self, QuantityError> {
        let mut exponents = [0i8; SLOTS];
        for (slot, exponent) in exponents.iter_mut().enumerate() {
            *exponent = self.exponents[slot]
                .checked_mul(power)
                .ok_or_else(|| QuantityError::ExponentOverflow(format!("({self})^{power}")))?;
        }
        Ok(Self { exponents })
    }

    fn zip_with(self, other: Self, f: impl Fn(i8, i8) -> i8) -> Self {
        let mut exponents = [0i8; SLOTS];
        for (i, slot) in exponents.iter_mut().enumerate() {
            *slot = f(self.exponents[i], other.exponents[i]);
        }
        Self { exponents }
    }

    fn try_zip_with(
        self,
        other: Self,
        f: impl Fn(i8, i8) -> Option<i8>,
        op: &str,
    ) -> Result<Self, QuantityError> {
        let mut exponents = [0i8; SLOTS];
        for (i, slot) in exponents.iter_mut().enumerate() {
            *slot = f(self.exponents[i], other.exponents[i])
                .ok_or_else(|| QuantityError::ExponentOverflow(format!("({self}) {op} ({other})")))?;
        }
        Ok(Self { exponents })
    }
}

/// Exponents sum: the dimension of a product. Saturates at the `i8` bounds;
/// [`DimensionVector::checked_add`] reports overflow instead.
impl Add for DimensionVector {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.zip_with(rhs, i8::saturating_add)
    }
}

/// Exponents subtract: the dimension of a quotient. Saturates at the `i8` bounds;
/// [`DimensionVector::checked_sub`] reports overflow instead.
impl Sub for DimensionVector {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.zip_with(rhs, i8::saturating_sub)
    }
}

/// Exponents negate: the dimension of a reciprocal. `-128` saturates to `127`.
impl Neg for DimensionVector {
    type Output = Self;
    fn neg(self) -> Self {
        self.pow(-1)
    }
}

fn write_factors<'a>(
    f: &mut fmt::Formatter<'_>,
    factors: impl Iterator<Item = (&'a str, i16)>,
) -> fmt::Result {
    for (i, (base, exp)) in factors.enumerate() {
        if i > 0 {
            f.write_str(".")?;
        }
        f.write_str(base)?;
        if exp != 1 {
            write!(f, "{exp}")?;
        }
    }
    Ok(())
}

/// Renders the textual unit syntax, e.g. `kg.m/s2`, `1/s`, or `1` when dimensionless.
impl fmt::Display for DimensionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numerator = BASE_UNITS
            .iter()
            .map(|&(base, slot)| (base, i16::from(self.exponents[slot])))
            .filter(|&(_, e)| e > 0);
        let denominator = BASE_UNITS
            .iter()
            .map(|&(base, slot)| (base, -i16::from(self.exponents[slot])))
            .filter(|&(_, e)| e > 0);

        let has_numerator = self.exponents.iter().any(|&e| e > 0);
        let has_denominator = self.exponents.iter().any(|&e| e < 0);

        if has_numerator {
            write_factors(f, numerator)?;
        } else {
            f.write_str("1")?;
        }
        if has_denominator {
            f.write_str("/")?;
            write_factors(f, denominator)?;
        }
        Ok(())
    }
}

impl FromStr for DimensionVector {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse_dimension(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SPEED: DimensionVector = DimensionVector::new(0, 1, -1, 0, 0, 0, 0);
    const FORCE: DimensionVector = DimensionVector::new(1, 1, -2, 0, 0, 0, 0);

    #[test]
    fn test_add_sub_neg() {
        assert_eq!(
            DimensionVector::LENGTH - DimensionVector::TIME,
            SPEED,
            "length / time is a speed"
        );
        assert_eq!(SPEED + DimensionVector::TIME, DimensionVector::LENGTH);
        assert_eq!(
            -DimensionVector::TIME,
            DimensionVector::new(0, 0, -1, 0, 0, 0, 0)
        );
        assert_eq!(-(-FORCE), FORCE);
    }

    #[test]
    fn test_display() {
        assert_eq!(FORCE.to_string(), "kg.m/s2");
        assert_eq!(SPEED.to_string(), "m/s");
        assert_eq!((-DimensionVector::TIME).to_string(), "1/s");
        assert_eq!(DimensionVector::DIMENSIONLESS.to_string(), "1");
        assert_eq!(DimensionVector::LENGTH.pow(3).to_string(), "m3");
        assert_eq!(
            (DimensionVector::MONEY - DimensionVector::MASS).to_string(),
            "$/kg"
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("kg.m/s2".parse::<DimensionVector>().unwrap(), FORCE);
        assert_eq!("m.s-1".parse::<DimensionVector>().unwrap(), SPEED);
        assert_eq!("1/s".parse::<DimensionVector>().unwrap(), -DimensionVector::TIME);
        assert_eq!("1".parse::<DimensionVector>().unwrap(), DimensionVector::DIMENSIONLESS);
        assert_eq!(
            "m.m".parse::<DimensionVector>().unwrap(),
            DimensionVector::LENGTH.pow(2)
        );
        assert_eq!(
            "mol/m3".parse::<DimensionVector>().unwrap(),
            DimensionVector::new(0, -3, 0, 0, 0, 1, 0)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<DimensionVector>().is_err());
        assert!("furlong".parse::<DimensionVector>().is_err());
        assert!("kg..m".parse::<DimensionVector>().is_err());
        assert!("m/s/s".parse::<DimensionVector>().is_err());
    }

    #[test]
    fn test_exponent_accessor() {
        assert_eq!(FORCE.exponent(TIME), Some(-2));
        assert_eq!(DimensionVector::MONEY.exponent(MONEY), Some(1));
        assert_eq!(FORCE.exponent(SLOTS), None);
    }

    #[test]
    fn test_checked_arithmetic() {
        let heavy = DimensionVector::new(127, 0, 0, 0, 0, 0, 0);
        let light = DimensionVector::new(-128, 0, 0, 0, 0, 0, 0);
        assert_eq!(FORCE.checked_add(SPEED).unwrap(), FORCE + SPEED);
        assert_eq!(FORCE.checked_sub(SPEED).unwrap(), FORCE - SPEED);
        assert_eq!(FORCE.checked_neg().unwrap(), -FORCE);
        assert_eq!(FORCE.checked_pow(3).unwrap(), FORCE.pow(3));

        assert!(matches!(
            heavy.checked_add(DimensionVector::MASS),
            Err(QuantityError::ExponentOverflow(_))
        ));
        assert!(matches!(
            light.checked_sub(DimensionVector::MASS),
            Err(QuantityError::ExponentOverflow(_))
        ));
        assert!(matches!(light.checked_neg(), Err(QuantityError::ExponentOverflow(_))));
        assert!(matches!(
            DimensionVector::LENGTH.pow(64).checked_pow(2),
            Err(QuantityError::ExponentOverflow(_))
        ));
        assert_eq!(heavy.checked_neg().unwrap().exponent(MASS), Some(-127));
    }

    #[test]
    fn test_operators_saturate() {
        let heavy = DimensionVector::new(127, 0, 0, 0, 0, 0, 0);
        let light = DimensionVector::new(-128, 0, 0, 0, 0, 0, 0);
        assert_eq!(heavy + DimensionVector::MASS, heavy);
        assert_eq!(light - DimensionVector::MASS, light);
        assert_eq!(-light, heavy);
        assert_eq!(DimensionVector::LENGTH.pow(100).pow(2).exponent(LENGTH), Some(127));
    }

    #[test]
    fn test_display_extreme_exponents() {
        let light = DimensionVector::new(-128, 0, 0, 0, 0, 0, 0);
        assert_eq!(light.to_string(), "1/kg128");
        let heavy = DimensionVector::new(0, 127, 0, 0, 0, 0, 0);
        assert_eq!(heavy.to_string(), "m127");
        assert_eq!(heavy.to_string().parse::<DimensionVector>().unwrap(), heavy);
    }

    #[test]
    fn test_display_parses_back() {
        for dim in [FORCE, SPEED, -FORCE, DimensionVector::MONEY, DimensionVector::DIMENSIONLESS] {
            assert_eq!(dim.to_string().parse::<DimensionVector>().unwrap(), dim);
        }
    }
}
