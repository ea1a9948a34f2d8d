//! User-supplied quantities and units in JSON
//!
//! ```json
//! {
//!   "quantities": [
//!     { "name": "Jerk", "dimension": "m/s3",
//!       "standard": { "abbreviation": "m/s3", "name": "meter per second cubed" } }
//!   ],
//!   "units": [
//!     { "quantity": "Length", "abbreviation": "fur", "name": "furlong",
//!       "factor": 201.168, "aliases": ["furlong"] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::dimension::DimensionVector;
use crate::error::{QuantityError, RegistryError};
use crate::registry::{QuantitySpec, UnitRegistry};
use crate::types::UnitSpec;

#[derive(Debug, Error)]
pub enum UnitsFileError {
    #[error("invalid units file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("quantity '{quantity}': {source}")]
    Dimension {
        quantity: String,
        source: QuantityError,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Contents of a units file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitsFile {
    #[serde(default)]
    pub quantities: Vec<QuantityEntry>,
    #[serde(default)]
    pub units: Vec<ExtraUnit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuantityEntry {
    pub name: String,
    /// Dimension in unit syntax, e.g. `kg.m/s2`
    pub dimension: String,
    /// Paired relative quantity; makes this an absolute quantity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative: Option<String>,
    pub standard: UnitEntry,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<UnitEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitEntry {
    pub abbreviation: String,
    pub name: String,
    #[serde(default = "default_factor")]
    pub factor: f64,
    #[serde(default)]
    pub offset: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Language tag to abbreviation
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub localized: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative: Option<String>,
}

/// A unit added to an already registered quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraUnit {
    pub quantity: String,
    #[serde(flatten)]
    pub unit: UnitEntry,
}

fn default_factor() -> f64 {
    1.0
}

impl UnitEntry {
    pub fn to_spec(&self) -> UnitSpec {
        let mut spec = if self.offset == 0.0 {
            UnitSpec::linear(&self.abbreviation, &self.name, self.factor)
        } else {
            UnitSpec::affine(&self.abbreviation, &self.name, self.factor, self.offset)
        };
        spec.aliases = self.aliases.clone();
        spec.localized = self
            .localized
            .iter()
            .map(|(language, abbreviation)| (language.clone(), abbreviation.clone()))
            .collect();
        spec.relative = self.relative.clone();
        spec
    }
}

impl UnitsFile {
    pub fn from_json(text: &str) -> Result<Self, UnitsFileError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Register the file's quantities, then its extra units.
    ///
    /// Returns the number of units registered. Stops at the first error; entries
    /// before it stay registered.
    pub fn apply(&self, registry: &UnitRegistry) -> Result<usize, UnitsFileError> {
        let mut count = 0;
        for entry in &self.quantities {
            let dimension: DimensionVector =
                entry
                    .dimension
                    .parse()
                    .map_err(|source| UnitsFileError::Dimension {
                        quantity: entry.name.clone(),
                        source,
                    })?;
            let standard = entry.standard.to_spec();
            let spec = match &entry.relative {
                None => QuantitySpec::relative(&entry.name, dimension, standard),
                Some(relative) => QuantitySpec::absolute(&entry.name, relative, dimension, standard),
            };
            registry.register_quantity(spec)?;
            count += 1;
            for unit in &entry.units {
                registry.register_unit(&entry.name, unit.to_spec())?;
                count += 1;
            }
        }
        for extra in &self.units {
            registry.register_unit(&extra.quantity, extra.unit.to_spec())?;
            count += 1;
        }
        tracing::debug!(units = count, "applied units file");
        Ok(count)
    }
}
