//! Property tests for conversion and arithmetic laws

use approx::relative_eq;
use proptest::prelude::*;
use quantra_core::{DimensionVector, RelScalar, SiScalar, Unit, UnitRegistry};

fn registry() -> &'static UnitRegistry {
    UnitRegistry::global()
}

fn all_units() -> Vec<Unit> {
    registry()
        .quantities()
        .iter()
        .flat_map(|q| registry().units(q.name()).unwrap())
        .collect()
}

fn length(si: f64) -> RelScalar {
    RelScalar::from_si(si, &registry().standard_unit("Length").unwrap()).unwrap()
}

fn dimension() -> impl Strategy<Value = DimensionVector> {
    prop::array::uniform7(-3i8..=3)
        .prop_map(|[m, l, t, a, k, n, c]| DimensionVector::new(m, l, t, a, k, n, c))
}

proptest! {
    #[test]
    fn unit_round_trip(unit in prop::sample::select(all_units()), value in -1e6f64..1e6) {
        let back = unit.from_standard(unit.to_standard(value));
        prop_assert!(
            relative_eq!(back, value, epsilon = 1e-9, max_relative = 1e-9),
            "{} -> {}", value, back
        );
    }

    #[test]
    fn exactly_one_ordering_holds(a in -1e9f64..1e9, b in -1e9f64..1e9) {
        let (a, b) = (length(a), length(b));
        let holds = [a < b, a == b, a > b].iter().filter(|&&x| x).count();
        prop_assert_eq!(holds, 1);
    }

    #[test]
    fn product_multiplies_si_and_adds_dimensions(
        a in -1e6f64..1e6,
        b in -1e6f64..1e6,
        da in dimension(),
        db in dimension(),
    ) {
        let product = SiScalar::new(a, da) * SiScalar::new(b, db);
        prop_assert_eq!(product.si(), a * b);
        prop_assert_eq!(product.dimension(), da + db);
    }

    #[test]
    fn reciprocal_twice_is_identity(value in 1e-6f64..1e6, d in dimension()) {
        let original = SiScalar::new(value, d);
        let back = original.reciprocal().reciprocal();
        prop_assert_eq!(back.dimension(), d);
        prop_assert!(relative_eq!(back.si(), value, max_relative = 1e-12));
    }

    #[test]
    fn interpolation_hits_both_ends(a in -1e6f64..1e6, b in -1e6f64..1e6) {
        let (zero, one) = (length(a), length(b));
        let start = RelScalar::interpolate(&zero, &one, 0.0).unwrap();
        let end = RelScalar::interpolate(&zero, &one, 1.0).unwrap();
        prop_assert!(relative_eq!(start.si(), a, epsilon = 1e-6));
        prop_assert!(relative_eq!(end.si(), b, epsilon = 1e-6));
    }

    #[test]
    fn min_and_max_come_from_the_set(values in prop::collection::vec(-1e9f64..1e9, 1..20)) {
        let scalars: Vec<RelScalar> = values.iter().map(|&v| length(v)).collect();
        let min = RelScalar::min_of(&scalars).unwrap();
        let max = RelScalar::max_of(&scalars).unwrap();
        prop_assert!(scalars.iter().any(|s| std::ptr::eq(s, min)));
        prop_assert!(scalars.iter().any(|s| std::ptr::eq(s, max)));
        prop_assert!(scalars.iter().all(|s| s >= min && s <= max));
    }

    #[test]
    fn display_then_parse_keeps_si(value in -1e6f64..1e6, abbreviation in prop::sample::select(vec!["m", "km", "mm", "mi", "ft"])) {
        let unit = registry().unit("Length", abbreviation).unwrap();
        let scalar = RelScalar::new(value, &unit).unwrap();
        let parsed: RelScalar = RelScalar::parse(&scalar.to_string(), "Length", registry()).unwrap();
        prop_assert!(relative_eq!(parsed.si(), scalar.si(), epsilon = 1e-9, max_relative = 1e-12));
    }
}
