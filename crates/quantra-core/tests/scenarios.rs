//! End-to-end behaviour of the dimensional algebra

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use quantra_core::{
    AbsScalar, DimensionVector, Engine, QuantityError, RelMatrix, RelScalar, SiScalar,
    SparseEntry, UnitRegistry, Value,
};

fn registry() -> &'static UnitRegistry {
    UnitRegistry::global()
}

#[test]
fn test_kilometer_is_stored_in_meters() {
    let distance = RelScalar::of(1.0, "km", "Length", registry()).unwrap();
    assert_eq!(distance.si(), 1000.0);
    assert_eq!(distance.value(), 1.0);
    assert_eq!(distance.to_string(), "1 km");

    let meters = registry().unit("Length", "m").unwrap();
    assert_eq!(distance.to_unit(&meters).unwrap().to_string(), "1000 m");
}

#[test]
fn test_speed_over_duration_is_acceleration() {
    let speed = RelScalar::of(5.0, "m/s", "Speed", registry()).unwrap();
    let duration = RelScalar::of(2.0, "s", "Duration", registry()).unwrap();

    let generic = &speed / &duration;
    assert_eq!(generic.dimension(), DimensionVector::new(0, 1, -2, 0, 0, 0, 0));

    let acceleration = speed.divided_by(&duration, registry()).into_named().unwrap();
    assert_eq!(acceleration.quantity().name(), "Acceleration");
    assert_eq!(acceleration.si(), 2.5);
}

#[test]
fn test_kilometers_per_hour_to_meters_per_second() {
    let speed = RelScalar::of(36.0, "km/h", "Speed", registry()).unwrap();
    let mps = registry().unit("Speed", "m/s").unwrap();
    assert_relative_eq!(speed.in_unit(&mps).unwrap(), 10.0, epsilon = 1e-12);

    let mut engine = Engine::new();
    assert_eq!(engine.eval("36 km/h in m/s").to_string(), "10 m/s");
}

#[test]
fn test_energy_cannot_become_force() {
    let energy: SiScalar = "12 kg.m2/s2".parse().unwrap();

    let newton = registry().unit("Force", "N").unwrap();
    let err = energy.as_unit::<quantra_core::Relative>(&newton).unwrap_err();
    let QuantityError::DimensionMismatch {
        source_dimension,
        target_dimension,
        ..
    } = &err
    else {
        panic!("expected a dimension mismatch, got {err:?}");
    };
    assert_eq!(*source_dimension, energy.dimension());
    assert_eq!(*target_dimension, newton.dimension());

    let joule = registry().unit("Energy", "J").unwrap();
    let cast: RelScalar = energy.as_unit(&joule).unwrap();
    assert_eq!(cast.si(), 12.0);
}

#[test]
fn test_celsius_difference_is_relative() {
    let warm = AbsScalar::of(20.0, "degC", "AbsoluteTemperature", registry()).unwrap();
    let cool = AbsScalar::of(10.0, "degC", "AbsoluteTemperature", registry()).unwrap();

    let difference = (&warm - &cool).unwrap();
    assert_eq!(difference.quantity().name(), "Temperature");
    assert_eq!(difference.unit().abbreviation(), "degC");
    assert_relative_eq!(difference.value(), 10.0, epsilon = 1e-9);

    let back = (&cool + &difference).unwrap();
    assert_relative_eq!(back.si(), warm.si(), epsilon = 1e-9);
}

#[test]
fn test_sparse_matrix_unlisted_cell() {
    let meter = |v| RelScalar::of(v, "m", "Length", registry()).unwrap();
    let entries = [
        SparseEntry::new(0, 1, meter(1.5)),
        SparseEntry::new(1, 0, meter(-2.0)),
        SparseEntry::new(2, 2, meter(4.0)),
    ];
    let matrix = RelMatrix::from_sparse(3, 3, &entries, None).unwrap();
    assert_eq!(matrix.get_si(0, 0).unwrap(), 0.0);
    assert_eq!(matrix.get_si(1, 0).unwrap(), -2.0);
    assert_eq!(matrix.to_dense().get_si(2, 1).unwrap(), 0.0);
}

#[test]
fn test_engine_session() {
    let mut engine = Engine::new();
    engine.eval("force = 3 N");
    engine.eval("arm = 2 m");
    let torque = engine.eval("force * arm in N.m");
    assert_eq!(torque.quantity().as_deref(), Some("Torque"));
    assert_eq!(torque.to_string(), "6 N.m");

    let energy = engine.eval("force * arm");
    assert_eq!(energy.quantity().as_deref(), Some("Energy"));

    assert!(matches!(engine.eval("force + arm"), Value::Error(_)));
    assert_eq!(engine.lines().len(), 4);
}
