//! Built-in quantities and units
//!
//! To add a unit, add a row to the quantity's `units` slice in [`QUANTITIES`].
//! Parsing, lookup and the CLI listing pick it up automatically.
//!
//! Quantities are registered in table order. For dimensions shared by several
//! quantities (Energy and Torque) the first one listed claims the dimension when
//! unclassified results are looked up.

pub mod units_file;

pub use units_file::{UnitsFile, UnitsFileError};

use crate::dimension::DimensionVector;
use crate::error::RegistryError;
use crate::registry::{QuantitySpec, UnitRegistry};
use crate::types::UnitSpec;

/// One row of the unit table
#[derive(Debug, Clone, Copy)]
pub struct UnitDef {
    /// Display abbreviation (e.g. "km/h")
    pub abbreviation: &'static str,
    pub name: &'static str,
    /// Multiplier to the quantity's standard unit
    pub factor: f64,
    /// Added after scaling; non-zero only for absolute scales
    pub offset: f64,
    /// Other accepted abbreviations
    pub aliases: &'static [&'static str],
    /// (language tag, abbreviation)
    pub localized: &'static [(&'static str, &'static str)],
}

impl UnitDef {
    const fn with_aliases(self, aliases: &'static [&'static str]) -> Self {
        UnitDef { aliases, ..self }
    }

    const fn with_offset(self, offset: f64) -> Self {
        UnitDef { offset, ..self }
    }

    const fn with_localized(self, localized: &'static [(&'static str, &'static str)]) -> Self {
        UnitDef { localized, ..self }
    }

    pub fn to_spec(&self) -> UnitSpec {
        let mut spec = if self.offset == 0.0 {
            UnitSpec::linear(self.abbreviation, self.name, self.factor)
        } else {
            UnitSpec::affine(self.abbreviation, self.name, self.factor, self.offset)
        };
        for alias in self.aliases {
            spec = spec.with_alias(*alias);
        }
        for (language, abbreviation) in self.localized {
            spec = spec.with_localized(*language, *abbreviation);
        }
        spec
    }
}

const fn unit(abbreviation: &'static str, name: &'static str, factor: f64) -> UnitDef {
    UnitDef {
        abbreviation,
        name,
        factor,
        offset: 0.0,
        aliases: &[],
        localized: &[],
    }
}

/// One quantity of the built-in catalog
#[derive(Debug, Clone, Copy)]
pub struct QuantityDef {
    pub name: &'static str,
    pub dimension: DimensionVector,
    /// Paired relative quantity, for absolute quantities
    pub relative: Option<&'static str>,
    pub standard: UnitDef,
    pub units: &'static [UnitDef],
}

const fn dim(mass: i8, length: i8, time: i8, current: i8) -> DimensionVector {
    DimensionVector::new(mass, length, time, current, 0, 0, 0)
}

const FAHRENHEIT: f64 = 5.0 / 9.0;

/// The built-in catalog, in registration order
pub static QUANTITIES: &[QuantityDef] = &[
    QuantityDef {
        name: "Dimensionless",
        dimension: DimensionVector::DIMENSIONLESS,
        relative: None,
        standard: unit("", "unit", 1.0),
        units: &[
            unit("%", "percent", 0.01),
            unit("ppm", "parts per million", 1e-6),
        ],
    },
    QuantityDef {
        name: "Length",
        dimension: DimensionVector::LENGTH,
        relative: None,
        standard: unit("m", "meter", 1.0).with_aliases(&["meter", "metre"]),
        units: &[
            unit("km", "kilometer", 1000.0),
            unit("dm", "decimeter", 0.1),
            unit("cm", "centimeter", 0.01),
            unit("mm", "millimeter", 0.001),
            unit("µm", "micrometer", 1e-6).with_aliases(&["um"]),
            unit("nm", "nanometer", 1e-9),
            unit("mi", "mile", 1609.344)
                .with_aliases(&["mile", "miles"])
                .with_localized(&[("nl", "mijl")]),
            unit("yd", "yard", 0.9144),
            unit("ft", "foot", 0.3048).with_aliases(&["foot", "feet"]),
            unit("inch", "inch", 0.0254).with_aliases(&["inches"]),
            unit("NM", "nautical mile", 1852.0).with_aliases(&["nmi"]),
            unit("AU", "astronomical unit", 149_597_870_700.0).with_aliases(&["au"]),
            unit("ly", "light year", 9.460_730_472_580_8e15),
            unit("pc", "parsec", 3.085_677_581_491_367_3e16),
        ],
    },
    QuantityDef {
        name: "Mass",
        dimension: DimensionVector::MASS,
        relative: None,
        standard: unit("kg", "kilogram", 1.0),
        units: &[
            unit("g", "gram", 0.001),
            unit("mg", "milligram", 1e-6),
            unit("µg", "microgram", 1e-9).with_aliases(&["ug"]),
            unit("t", "tonne", 1000.0).with_aliases(&["tonne"]),
            unit("lb", "pound", 0.453_592_37)
                .with_aliases(&["lbs", "pound"])
                .with_localized(&[("nl", "pond")]),
            unit("oz", "ounce", 0.028_349_523_125),
            unit("st", "stone", 6.350_293_18),
            unit("Da", "dalton", 1.660_539_066_60e-27),
        ],
    },
    QuantityDef {
        name: "Duration",
        dimension: DimensionVector::TIME,
        relative: None,
        standard: unit("s", "second", 1.0).with_aliases(&["sec"]),
        units: &[
            unit("ms", "millisecond", 1e-3),
            unit("µs", "microsecond", 1e-6).with_aliases(&["us"]),
            unit("ns", "nanosecond", 1e-9),
            unit("min", "minute", 60.0),
            unit("h", "hour", 3600.0)
                .with_aliases(&["hr"])
                .with_localized(&[("nl", "u")]),
            unit("day", "day", 86_400.0)
                .with_aliases(&["d", "days"])
                .with_localized(&[("nl", "dag")]),
            unit("wk", "week", 604_800.0).with_aliases(&["week"]),
            unit("yr", "julian year", 31_557_600.0)
                .with_aliases(&["year"])
                .with_localized(&[("nl", "jaar")]),
        ],
    },
    QuantityDef {
        name: "ElectricalCurrent",
        dimension: DimensionVector::CURRENT,
        relative: None,
        standard: unit("A", "ampere", 1.0),
        units: &[
            unit("mA", "milliampere", 1e-3),
            unit("µA", "microampere", 1e-6).with_aliases(&["uA"]),
            unit("kA", "kiloampere", 1e3),
        ],
    },
    QuantityDef {
        name: "Temperature",
        dimension: DimensionVector::TEMPERATURE,
        relative: None,
        standard: unit("K", "kelvin", 1.0),
        units: &[
            unit("degC", "degree Celsius", 1.0).with_aliases(&["°C"]),
            unit("degF", "degree Fahrenheit", FAHRENHEIT).with_aliases(&["°F"]),
            unit("degR", "degree Rankine", FAHRENHEIT).with_aliases(&["°R"]),
        ],
    },
    QuantityDef {
        name: "AmountOfSubstance",
        dimension: DimensionVector::AMOUNT,
        relative: None,
        standard: unit("mol", "mole", 1.0),
        units: &[
            unit("mmol", "millimole", 1e-3),
            unit("µmol", "micromole", 1e-6).with_aliases(&["umol"]),
            unit("kmol", "kilomole", 1e3),
        ],
    },
    QuantityDef {
        name: "LuminousIntensity",
        dimension: DimensionVector::LUMINOUS_INTENSITY,
        relative: None,
        standard: unit("cd", "candela", 1.0),
        units: &[unit("mcd", "millicandela", 1e-3)],
    },
    QuantityDef {
        name: "Position",
        dimension: DimensionVector::LENGTH,
        relative: Some("Length"),
        standard: unit("m", "meter", 1.0),
        units: &[
            unit("km", "kilometer", 1000.0),
            unit("cm", "centimeter", 0.01),
            unit("mm", "millimeter", 0.001),
            unit("mi", "mile", 1609.344),
            unit("ft", "foot", 0.3048),
            unit("inch", "inch", 0.0254),
        ],
    },
    QuantityDef {
        name: "Time",
        dimension: DimensionVector::TIME,
        relative: Some("Duration"),
        standard: unit("s", "second", 1.0),
        units: &[
            unit("ms", "millisecond", 1e-3),
            unit("min", "minute", 60.0),
            unit("h", "hour", 3600.0),
            unit("day", "day", 86_400.0),
        ],
    },
    QuantityDef {
        name: "AbsoluteTemperature",
        dimension: DimensionVector::TEMPERATURE,
        relative: Some("Temperature"),
        standard: unit("K", "kelvin", 1.0),
        units: &[
            unit("degC", "degree Celsius", 1.0)
                .with_offset(273.15)
                .with_aliases(&["°C"]),
            unit("degF", "degree Fahrenheit", FAHRENHEIT)
                .with_offset(459.67 * FAHRENHEIT)
                .with_aliases(&["°F"]),
            unit("degR", "degree Rankine", FAHRENHEIT).with_aliases(&["°R"]),
        ],
    },
    QuantityDef {
        name: "Area",
        dimension: dim(0, 2, 0, 0),
        relative: None,
        standard: unit("m2", "square meter", 1.0).with_aliases(&["m²"]),
        units: &[
            unit("km2", "square kilometer", 1e6).with_aliases(&["km²"]),
            unit("cm2", "square centimeter", 1e-4).with_aliases(&["cm²"]),
            unit("mm2", "square millimeter", 1e-6).with_aliases(&["mm²"]),
            unit("ha", "hectare", 1e4),
            unit("a", "are", 100.0),
            unit("ac", "acre", 4_046.856_422_4).with_aliases(&["acre"]),
            unit("ft2", "square foot", 0.092_903_04),
            unit("in2", "square inch", 6.4516e-4),
            unit("mi2", "square mile", 2_589_988.110_336),
        ],
    },
    QuantityDef {
        name: "Volume",
        dimension: dim(0, 3, 0, 0),
        relative: None,
        standard: unit("m3", "cubic meter", 1.0).with_aliases(&["m³"]),
        units: &[
            unit("L", "liter", 1e-3).with_aliases(&["l", "dm3"]),
            unit("mL", "milliliter", 1e-6).with_aliases(&["ml", "cm3"]),
            unit("km3", "cubic kilometer", 1e9),
            unit("gal", "US gallon", 3.785_411_784e-3),
            unit("qt", "US quart", 9.463_529_46e-4),
            unit("pt", "US pint", 4.731_764_73e-4),
            unit("ft3", "cubic foot", 0.028_316_846_592),
            unit("in3", "cubic inch", 1.638_706_4e-5),
        ],
    },
    QuantityDef {
        name: "Speed",
        dimension: dim(0, 1, -1, 0),
        relative: None,
        standard: unit("m/s", "meter per second", 1.0).with_aliases(&["mps"]),
        units: &[
            unit("km/h", "kilometer per hour", 1.0 / 3.6).with_aliases(&["kph", "kmh"]),
            unit("mi/h", "mile per hour", 0.447_04).with_aliases(&["mph"]),
            unit("kn", "knot", 1852.0 / 3600.0).with_aliases(&["kt", "knot"]),
            unit("ft/s", "foot per second", 0.3048).with_aliases(&["fps"]),
        ],
    },
    QuantityDef {
        name: "Acceleration",
        dimension: dim(0, 1, -2, 0),
        relative: None,
        standard: unit("m/s2", "meter per second squared", 1.0),
        units: &[
            unit("ft/s2", "foot per second squared", 0.3048),
            unit("g0", "standard gravity", 9.806_65).with_aliases(&["gn"]),
            unit("Gal", "gal", 0.01),
        ],
    },
    QuantityDef {
        name: "Force",
        dimension: dim(1, 1, -2, 0),
        relative: None,
        standard: unit("N", "newton", 1.0),
        units: &[
            unit("mN", "millinewton", 1e-3),
            unit("kN", "kilonewton", 1e3),
            unit("MN", "meganewton", 1e6),
            unit("dyn", "dyne", 1e-5),
            unit("lbf", "pound force", 4.448_221_615_260_5),
            unit("kgf", "kilogram force", 9.806_65),
        ],
    },
    QuantityDef {
        name: "Energy",
        dimension: dim(1, 2, -2, 0),
        relative: None,
        standard: unit("J", "joule", 1.0),
        units: &[
            unit("mJ", "millijoule", 1e-3),
            unit("kJ", "kilojoule", 1e3),
            unit("MJ", "megajoule", 1e6),
            unit("GJ", "gigajoule", 1e9),
            unit("Wh", "watt hour", 3600.0),
            unit("kWh", "kilowatt hour", 3.6e6),
            unit("MWh", "megawatt hour", 3.6e9),
            unit("cal", "calorie", 4.184),
            unit("kcal", "kilocalorie", 4184.0).with_aliases(&["Cal"]),
            unit("eV", "electronvolt", 1.602_176_634e-19),
            unit("BTU", "british thermal unit", 1_055.055_852_62),
            unit("erg", "erg", 1e-7),
        ],
    },
    QuantityDef {
        name: "Torque",
        dimension: dim(1, 2, -2, 0),
        relative: None,
        standard: unit("N.m", "newton meter", 1.0).with_aliases(&["Nm"]),
        units: &[
            unit("kN.m", "kilonewton meter", 1e3),
            unit("lbf.ft", "pound force foot", 1.355_817_948_331_400_4),
            unit("lbf.in", "pound force inch", 0.112_984_829_027_616_7),
        ],
    },
    QuantityDef {
        name: "Power",
        dimension: dim(1, 2, -3, 0),
        relative: None,
        standard: unit("W", "watt", 1.0),
        units: &[
            unit("mW", "milliwatt", 1e-3),
            unit("kW", "kilowatt", 1e3),
            unit("MW", "megawatt", 1e6),
            unit("GW", "gigawatt", 1e9),
            unit("hp", "horsepower", 745.699_871_582_270_2).with_aliases(&["HP"]),
            unit("BTU/h", "british thermal unit per hour", 0.293_071_070_172_22),
        ],
    },
    QuantityDef {
        name: "Pressure",
        dimension: dim(1, -1, -2, 0),
        relative: None,
        standard: unit("Pa", "pascal", 1.0),
        units: &[
            unit("hPa", "hectopascal", 100.0),
            unit("kPa", "kilopascal", 1e3),
            unit("MPa", "megapascal", 1e6),
            unit("bar", "bar", 1e5),
            unit("mbar", "millibar", 100.0),
            unit("atm", "standard atmosphere", 101_325.0),
            unit("psi", "pound per square inch", 6_894.757_293_168_361),
            unit("mmHg", "millimeter of mercury", 133.322_387_415),
            unit("torr", "torr", 101_325.0 / 760.0),
        ],
    },
    QuantityDef {
        name: "Frequency",
        dimension: dim(0, 0, -1, 0),
        relative: None,
        standard: unit("Hz", "hertz", 1.0),
        units: &[
            unit("kHz", "kilohertz", 1e3),
            unit("MHz", "megahertz", 1e6),
            unit("GHz", "gigahertz", 1e9),
            unit("rpm", "revolutions per minute", 1.0 / 60.0),
        ],
    },
    QuantityDef {
        name: "Density",
        dimension: dim(1, -3, 0, 0),
        relative: None,
        standard: unit("kg/m3", "kilogram per cubic meter", 1.0),
        units: &[
            unit("g/cm3", "gram per cubic centimeter", 1e3),
            unit("g/L", "gram per liter", 1.0),
            unit("kg/L", "kilogram per liter", 1e3),
            unit("lb/ft3", "pound per cubic foot", 16.018_463_373_960_138),
        ],
    },
    QuantityDef {
        name: "FlowVolume",
        dimension: dim(0, 3, -1, 0),
        relative: None,
        standard: unit("m3/s", "cubic meter per second", 1.0),
        units: &[
            unit("m3/h", "cubic meter per hour", 1.0 / 3600.0),
            unit("L/s", "liter per second", 1e-3),
            unit("L/min", "liter per minute", 1e-3 / 60.0),
            unit("gal/min", "US gallon per minute", 6.309_019_64e-5).with_aliases(&["gpm"]),
        ],
    },
    QuantityDef {
        name: "ElectricalCharge",
        dimension: dim(0, 0, 1, 1),
        relative: None,
        standard: unit("C", "coulomb", 1.0),
        units: &[
            unit("mC", "millicoulomb", 1e-3),
            unit("µC", "microcoulomb", 1e-6).with_aliases(&["uC"]),
            unit("Ah", "ampere hour", 3600.0),
            unit("mAh", "milliampere hour", 3.6),
        ],
    },
    QuantityDef {
        name: "ElectricalPotential",
        dimension: dim(1, 2, -3, -1),
        relative: None,
        standard: unit("V", "volt", 1.0),
        units: &[
            unit("mV", "millivolt", 1e-3),
            unit("kV", "kilovolt", 1e3),
            unit("MV", "megavolt", 1e6),
        ],
    },
    QuantityDef {
        name: "ElectricalResistance",
        dimension: dim(1, 2, -3, -2),
        relative: None,
        standard: unit("Ohm", "ohm", 1.0).with_aliases(&["Ω"]),
        units: &[
            unit("mOhm", "milliohm", 1e-3).with_aliases(&["mΩ"]),
            unit("kOhm", "kiloohm", 1e3).with_aliases(&["kΩ"]),
            unit("MOhm", "megaohm", 1e6).with_aliases(&["MΩ"]),
        ],
    },
];

/// Register every quantity and unit of [`QUANTITIES`]
pub fn install(registry: &UnitRegistry) -> Result<(), RegistryError> {
    for def in QUANTITIES {
        let spec = match def.relative {
            None => QuantitySpec::relative(def.name, def.dimension, def.standard.to_spec()),
            Some(relative) => {
                QuantitySpec::absolute(def.name, relative, def.dimension, def.standard.to_spec())
            }
        };
        registry.register_quantity(spec)?;
        for unit in def.units {
            registry.register_unit(def.name, unit.to_spec())?;
        }
    }
    tracing::debug!(quantities = QUANTITIES.len(), "installed built-in catalog");
    Ok(())
}
