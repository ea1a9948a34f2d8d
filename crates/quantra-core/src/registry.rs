//! Unit and quantity registry
//!
//! The registry maps quantity names to their units, abbreviations to units within a
//! quantity, and dimension vectors back to the named quantity that claims them.
//! Lookups take a shared read lock, so concurrent arithmetic never contends;
//! registrations and SI-unit synthesis take the write lock.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::catalog;
use crate::dimension::DimensionVector;
use crate::error::{QuantityError, RegistryError};
use crate::generic::SiScalar;
use crate::parser::split_scalar_text;
use crate::real::Real;
use crate::types::{Quantity, Unit, UnitSpec, GENERIC_QUANTITY};

/// Definition of a quantity to register.
///
/// The standard unit is registered together with the quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantitySpec {
    pub name: String,
    pub dimension: DimensionVector,
    pub standard: UnitSpec,
    /// Name of the paired relative quantity; `Some` makes this an absolute quantity
    pub relative: Option<String>,
}

impl QuantitySpec {
    pub fn relative(name: impl Into<String>, dimension: DimensionVector, standard: UnitSpec) -> Self {
        Self {
            name: name.into(),
            dimension,
            standard,
            relative: None,
        }
    }

    pub fn absolute(
        name: impl Into<String>,
        relative: impl Into<String>,
        dimension: DimensionVector,
        standard: UnitSpec,
    ) -> Self {
        Self {
            name: name.into(),
            dimension,
            standard,
            relative: Some(relative.into()),
        }
    }
}

struct QuantityEntry {
    quantity: Arc<Quantity>,
    units: Vec<Unit>,
    by_abbreviation: HashMap<String, usize>,
}

impl QuantityEntry {
    fn find(&self, abbreviation: &str) -> Option<&Unit> {
        self.by_abbreviation
            .get(abbreviation)
            .map(|&index| &self.units[index])
    }
}

#[derive(Default)]
struct Tables {
    quantities: Vec<QuantityEntry>,
    by_name: HashMap<String, usize>,
    by_dimension: HashMap<DimensionVector, usize>,
    si_units: HashMap<DimensionVector, Unit>,
}

impl Tables {
    fn entry(&self, name: &str) -> Option<&QuantityEntry> {
        self.by_name.get(name).map(|&index| &self.quantities[index])
    }

    /// Resolve the paired relative unit for a unit of an absolute quantity
    fn relative_unit_for(
        &self,
        quantity: &Quantity,
        spec: &UnitSpec,
    ) -> Result<Option<Unit>, RegistryError> {
        let Some(relative) = quantity.relative_quantity() else {
            return Ok(None);
        };
        let abbreviation = spec.relative.as_deref().unwrap_or(&spec.abbreviation);
        let unit = self
            .entry(relative.name())
            .and_then(|entry| entry.find(abbreviation))
            .cloned()
            .ok_or_else(|| RegistryError::UnknownUnit {
                quantity: relative.name().to_string(),
                abbreviation: abbreviation.to_string(),
            })?;
        Ok(Some(unit))
    }
}

fn check_spec(quantity: &str, spec: &UnitSpec) -> Result<(), RegistryError> {
    if !spec.scale.is_valid() {
        return Err(RegistryError::InvalidScale {
            abbreviation: spec.abbreviation.clone(),
            factor: spec.scale.factor(),
            offset: spec.scale.offset(),
        });
    }
    let mut seen = HashSet::new();
    for abbreviation in spec.abbreviations() {
        if !seen.insert(abbreviation) {
            return Err(RegistryError::DuplicateAbbreviation {
                quantity: quantity.to_string(),
                abbreviation: abbreviation.to_string(),
            });
        }
    }
    Ok(())
}

/// Process-wide store of quantities and units.
///
/// Create an empty registry with [`UnitRegistry::new`], or one holding the built-in
/// catalog with [`UnitRegistry::with_defaults`]. [`UnitRegistry::global`] is a
/// lazily bootstrapped shared instance.
pub struct UnitRegistry {
    tables: RwLock<Tables>,
}

impl UnitRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Registry populated with the built-in catalog
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry
            .bootstrap()
            .expect("built-in unit catalog must register cleanly");
        registry
    }

    /// Shared registry holding the built-in catalog
    pub fn global() -> &'static UnitRegistry {
        static GLOBAL: OnceLock<UnitRegistry> = OnceLock::new();
        GLOBAL.get_or_init(UnitRegistry::with_defaults)
    }

    /// Register the built-in catalog. Fails if any of it is already registered.
    pub fn bootstrap(&self) -> Result<(), RegistryError> {
        catalog::install(self)
    }

    /// Register a quantity and its standard unit.
    ///
    /// The first relative quantity registered for a dimension claims that dimension
    /// for [`UnitRegistry::quantity_by_dimension`].
    pub fn register_quantity(&self, spec: QuantitySpec) -> Result<Arc<Quantity>, RegistryError> {
        check_spec(&spec.name, &spec.standard)?;
        let mut tables = self.tables.write();
        if spec.name == GENERIC_QUANTITY || tables.by_name.contains_key(&spec.name) {
            return Err(RegistryError::DuplicateQuantity(spec.name));
        }

        let quantity = match &spec.relative {
            None => Quantity::relative(spec.name.clone(), spec.dimension, spec.standard.clone()),
            Some(relative_name) => {
                let relative = tables
                    .entry(relative_name)
                    .map(|entry| entry.quantity.clone())
                    .filter(|q| !q.is_absolute())
                    .ok_or_else(|| RegistryError::UnknownQuantity(relative_name.clone()))?;
                if relative.dimension() != spec.dimension {
                    return Err(RegistryError::DimensionConflict {
                        absolute: spec.name.clone(),
                        absolute_dimension: spec.dimension,
                        relative: relative.name().to_string(),
                        relative_dimension: relative.dimension(),
                    });
                }
                Quantity::absolute(spec.name.clone(), relative, spec.standard.clone())
            }
        };
        let quantity = Arc::new(quantity);
        let relative_unit = tables.relative_unit_for(&quantity, &spec.standard)?;
        let standard = Unit::new(
            quantity.standard_spec().clone(),
            quantity.clone(),
            relative_unit,
        );

        let by_abbreviation = spec
            .standard
            .abbreviations()
            .map(|a| (a.to_string(), 0))
            .collect();
        let index = tables.quantities.len();
        tables.quantities.push(QuantityEntry {
            quantity: quantity.clone(),
            units: vec![standard],
            by_abbreviation,
        });
        tables.by_name.insert(spec.name.clone(), index);
        if !quantity.is_absolute() {
            tables.by_dimension.entry(spec.dimension).or_insert(index);
        }

        tracing::debug!(
            quantity = %quantity.name(),
            dimension = %quantity.dimension(),
            kind = quantity.kind_name(),
            "registered quantity"
        );
        Ok(quantity)
    }

    /// Register an additional unit for a quantity.
    ///
    /// Every abbreviation, alias and localized variant must be new within the quantity.
    pub fn register_unit(&self, quantity: &str, spec: UnitSpec) -> Result<Unit, RegistryError> {
        check_spec(quantity, &spec)?;
        let mut tables = self.tables.write();
        let index = *tables
            .by_name
            .get(quantity)
            .ok_or_else(|| RegistryError::UnknownQuantity(quantity.to_string()))?;

        let entry = &tables.quantities[index];
        if let Some(taken) = spec
            .abbreviations()
            .find(|a| entry.by_abbreviation.contains_key(*a))
        {
            return Err(RegistryError::DuplicateAbbreviation {
                quantity: quantity.to_string(),
                abbreviation: taken.to_string(),
            });
        }
        let owner = entry.quantity.clone();
        let relative_unit = tables.relative_unit_for(&owner, &spec)?;

        let abbreviations: Vec<String> = spec.abbreviations().map(str::to_string).collect();
        let unit = Unit::new(Arc::new(spec), owner, relative_unit);

        let entry = &mut tables.quantities[index];
        let position = entry.units.len();
        entry.units.push(unit.clone());
        for abbreviation in abbreviations {
            entry.by_abbreviation.insert(abbreviation, position);
        }

        tracing::debug!(quantity = %quantity, unit = %unit.abbreviation(), "registered unit");
        Ok(unit)
    }

    pub fn quantity(&self, name: &str) -> Option<Arc<Quantity>> {
        self.tables
            .read()
            .entry(name)
            .map(|entry| entry.quantity.clone())
    }

    /// All named quantities in registration order
    pub fn quantities(&self) -> Vec<Arc<Quantity>> {
        self.tables
            .read()
            .quantities
            .iter()
            .map(|entry| entry.quantity.clone())
            .collect()
    }

    /// Units of a quantity, standard unit first
    pub fn units(&self, quantity: &str) -> Result<Vec<Unit>, QuantityError> {
        self.tables
            .read()
            .entry(quantity)
            .map(|entry| entry.units.clone())
            .ok_or_else(|| QuantityError::UnknownQuantity(quantity.to_string()))
    }

    pub fn standard_unit(&self, quantity: &str) -> Result<Unit, QuantityError> {
        self.tables
            .read()
            .entry(quantity)
            .map(|entry| entry.units[0].clone())
            .ok_or_else(|| QuantityError::UnknownQuantity(quantity.to_string()))
    }

    /// Look up a unit by abbreviation, alias or localized variant within a quantity
    pub fn unit_by_abbreviation(&self, quantity: &str, abbreviation: &str) -> Option<Unit> {
        self.tables
            .read()
            .entry(quantity)
            .and_then(|entry| entry.find(abbreviation))
            .cloned()
    }

    /// Like [`UnitRegistry::unit_by_abbreviation`] but with a descriptive error
    pub fn unit(&self, quantity: &str, abbreviation: &str) -> Result<Unit, QuantityError> {
        let tables = self.tables.read();
        let entry = tables
            .entry(quantity)
            .ok_or_else(|| QuantityError::UnknownQuantity(quantity.to_string()))?;
        entry
            .find(abbreviation)
            .cloned()
            .ok_or_else(|| QuantityError::UnknownUnit {
                abbreviation: abbreviation.to_string(),
                quantity: quantity.to_string(),
            })
    }

    /// The named relative quantity that claims a dimension, if any
    pub fn quantity_by_dimension(&self, dimension: DimensionVector) -> Option<Arc<Quantity>> {
        let tables = self.tables.read();
        tables
            .by_dimension
            .get(&dimension)
            .map(|&index| tables.quantities[index].quantity.clone())
    }

    /// Find a unit by abbreviation across all quantities.
    ///
    /// Relative quantities are searched first, in registration order, then absolute
    /// ones; text that parses as a dimension string yields the synthesized SI unit.
    pub fn resolve_unit(&self, abbreviation: &str) -> Option<Unit> {
        {
            let tables = self.tables.read();
            let relative_first = tables
                .quantities
                .iter()
                .filter(|entry| !entry.quantity.is_absolute())
                .chain(
                    tables
                        .quantities
                        .iter()
                        .filter(|entry| entry.quantity.is_absolute()),
                );
            for entry in relative_first {
                if let Some(unit) = entry.find(abbreviation) {
                    return Some(unit.clone());
                }
            }
        }
        abbreviation
            .parse::<DimensionVector>()
            .ok()
            .map(|dimension| self.si_unit(dimension))
    }

    /// Find a unit with the given abbreviation among quantities of one dimension,
    /// falling back to the synthesized SI unit when the text is that dimension string.
    pub fn resolve_unit_for_dimension(
        &self,
        abbreviation: &str,
        dimension: DimensionVector,
    ) -> Option<Unit> {
        {
            let tables = self.tables.read();
            let found = tables
                .quantities
                .iter()
                .filter(|entry| {
                    !entry.quantity.is_absolute() && entry.quantity.dimension() == dimension
                })
                .find_map(|entry| entry.find(abbreviation));
            if let Some(unit) = found {
                return Some(unit.clone());
            }
        }
        match abbreviation.parse::<DimensionVector>() {
            Ok(parsed) if parsed == dimension => Some(self.si_unit(dimension)),
            _ => None,
        }
    }

    /// The synthesized SI unit for a dimension, created on first use.
    ///
    /// Racing callers receive the same handle.
    pub fn si_unit(&self, dimension: DimensionVector) -> Unit {
        if let Some(unit) = self.tables.read().si_units.get(&dimension) {
            return unit.clone();
        }
        let mut tables = self.tables.write();
        tables
            .si_units
            .entry(dimension)
            .or_insert_with(|| {
                tracing::debug!(%dimension, "synthesized SI unit");
                Unit::standard_of(&Arc::new(Quantity::generic(dimension)))
            })
            .clone()
    }

    /// Parse text such as `"9.81 kg.m/s2"` into an unclassified SI scalar,
    /// registering the synthesized unit for its dimension.
    pub fn parse_si<T: Real>(&self, text: &str) -> Result<SiScalar<T>, QuantityError> {
        let (value, unit_text) = split_scalar_text(text)?;
        let dimension = if unit_text.is_empty() {
            DimensionVector::DIMENSIONLESS
        } else {
            unit_text.parse::<DimensionVector>().map_err(|_| {
                QuantityError::parse(text, format!("'{unit_text}' is not a dimension string"))
            })?
        };
        self.si_unit(dimension);
        Ok(SiScalar::new(T::of_f64(value), dimension))
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn empty_with_length() -> UnitRegistry {
        let registry = UnitRegistry::new();
        registry
            .register_quantity(QuantitySpec::relative(
                "Length",
                DimensionVector::LENGTH,
                UnitSpec::linear("m", "meter", 1.0),
            ))
            .unwrap();
        registry
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = empty_with_length();
        let km = registry
            .register_unit("Length", UnitSpec::linear("km", "kilometer", 1000.0).with_alias("kms"))
            .unwrap();
        assert_eq!(registry.unit("Length", "km").unwrap(), km);
        assert_eq!(registry.unit_by_abbreviation("Length", "kms"), Some(km));
        assert_eq!(registry.unit_by_abbreviation("Length", "furlong"), None);
        assert_eq!(registry.standard_unit("Length").unwrap().abbreviation(), "m");
        assert_eq!(registry.units("Length").unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_abbreviation_rejected() {
        let registry = empty_with_length();
        registry
            .register_unit("Length", UnitSpec::linear("km", "kilometer", 1000.0))
            .unwrap();
        let err = registry
            .register_unit("Length", UnitSpec::linear("mm", "millimeter", 0.001).with_alias("km"))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateAbbreviation {
                quantity: "Length".to_string(),
                abbreviation: "km".to_string(),
            }
        );
        // nothing of the rejected unit was registered
        assert_eq!(registry.unit_by_abbreviation("Length", "mm"), None);
    }

    #[test]
    fn test_duplicate_quantity_rejected() {
        let registry = empty_with_length();
        let err = registry
            .register_quantity(QuantitySpec::relative(
                "Length",
                DimensionVector::LENGTH,
                UnitSpec::linear("m", "meter", 1.0),
            ))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateQuantity("Length".to_string()));
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let registry = empty_with_length();
        let err = registry
            .register_unit("Length", UnitSpec::linear("zero", "nothing", 0.0))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidScale { .. }));
    }

    #[test]
    fn test_absolute_requires_matching_relative() {
        let registry = empty_with_length();
        let err = registry
            .register_quantity(QuantitySpec::absolute(
                "Instant",
                "Length",
                DimensionVector::TIME,
                UnitSpec::linear("s", "second", 1.0),
            ))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DimensionConflict { .. }));

        let err = registry
            .register_quantity(QuantitySpec::absolute(
                "Position",
                "Distance",
                DimensionVector::LENGTH,
                UnitSpec::linear("m", "meter", 1.0),
            ))
            .unwrap_err();
        assert_eq!(err, RegistryError::UnknownQuantity("Distance".to_string()));
    }

    #[test]
    fn test_absolute_units_pair_with_relative() {
        let registry = empty_with_length();
        registry
            .register_unit("Length", UnitSpec::linear("km", "kilometer", 1000.0))
            .unwrap();
        registry
            .register_quantity(QuantitySpec::absolute(
                "Position",
                "Length",
                DimensionVector::LENGTH,
                UnitSpec::linear("m", "meter", 1.0),
            ))
            .unwrap();
        let km = registry
            .register_unit("Position", UnitSpec::linear("km", "kilometer", 1000.0))
            .unwrap();
        assert!(km.is_absolute());
        assert_eq!(km.relative_unit(), registry.unit_by_abbreviation("Length", "km").as_ref());

        let err = registry
            .register_unit("Position", UnitSpec::linear("mi", "mile", 1609.344))
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownUnit { .. }));
    }

    #[test]
    fn test_quantity_by_dimension_ignores_absolute() {
        let registry = UnitRegistry::with_defaults();
        let q = registry.quantity_by_dimension(DimensionVector::TEMPERATURE).unwrap();
        assert_eq!(q.name(), "Temperature");
        assert!(registry
            .quantity_by_dimension(DimensionVector::new(3, 0, 0, 0, 0, 0, 0))
            .is_none());
    }

    #[test]
    fn test_si_unit_is_shared() {
        let registry = UnitRegistry::new();
        let dim: DimensionVector = "kg3/s".parse().unwrap();
        let a = registry.si_unit(dim);
        let b = registry.si_unit(dim);
        assert!(a.same(&b));
        assert_eq!(a.abbreviation(), "kg3/s");
        assert!(a.quantity().is_generic());
    }

    #[test]
    fn test_si_unit_race() {
        let registry = UnitRegistry::new();
        let dim: DimensionVector = "kg.mol/cd2".parse().unwrap();
        let units: Vec<Unit> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| registry.si_unit(dim)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for unit in &units[1..] {
            assert!(unit.same(&units[0]));
        }
    }

    #[test]
    fn test_resolve_unit() {
        let registry = UnitRegistry::with_defaults();
        assert_eq!(registry.resolve_unit("km/h").unwrap().quantity().name(), "Speed");
        // relative quantities win over absolute ones sharing an abbreviation
        assert_eq!(registry.resolve_unit("degC").unwrap().quantity().name(), "Temperature");
        let generic = registry.resolve_unit("kg.m3/s").unwrap();
        assert!(generic.quantity().is_generic());
        assert!(registry.resolve_unit("furlong").is_none());
    }

    #[test]
    fn test_resolve_unit_for_dimension() {
        let registry = UnitRegistry::with_defaults();
        let energy: DimensionVector = "kg.m2/s2".parse().unwrap();
        let unit = registry.resolve_unit_for_dimension("N.m", energy).unwrap();
        assert_eq!(unit.quantity().name(), "Torque");
        assert!(registry
            .resolve_unit_for_dimension("km", energy)
            .is_none());
    }

    #[test]
    fn test_parse_si() {
        let registry = UnitRegistry::new();
        let value: SiScalar<f64> = registry.parse_si("9.81 kg.m/s2").unwrap();
        assert_eq!(value.si(), 9.81);
        assert_eq!(value.dimension().to_string(), "kg.m/s2");
        assert!(registry.parse_si::<f64>("9.81 furlongs").is_err());
        assert!(registry.parse_si::<f64>("").is_err());
    }
}
