use super::{config, config_json, init_logger, GEO_STATE, LEO_STATE, START};
use multiprop::io::{ConfigError, ConfigRepr, Configurable, ForceModelConfig, PropagationConfig};
use multiprop::parallel::{build_propagator, build_propagators, PropagatorSetup};
use multiprop::propagators::IntegratorMethod;
use multiprop::time::{Epoch, Unit};
use multiprop::State;
use rstest::*;

#[fixture]
fn leo() -> PropagationConfig {
    config(START, LEO_STATE, "[]")
}

#[rstest]
fn builds_one_setup_per_config(leo: PropagationConfig) {
    init_logger();
    let geo = config("2019-05-01T06:00:00Z", GEO_STATE, "[]");
    let setups = build_propagators(&[leo.clone(), geo, leo]).unwrap();
    assert_eq!(setups.len(), 3);

    let sc = setups[0].initial_state;
    assert_eq!(sc.orbit.to_cartesian_vec().as_slice(), &LEO_STATE);
    assert_eq!(sc.mass_kg, 500.0);
    assert_eq!(sc.srp.area_m2, 2.0);
    assert_eq!(sc.srp.cr, 1.3);
    assert_eq!(sc.drag.cd, 2.2);
    assert_eq!(sc.epoch(), Epoch::from_gregorian_utc_hms(2019, 5, 1, 0, 0, 0));

    assert_eq!(
        setups[1].initial_state.epoch(),
        Epoch::from_gregorian_utc_hms(2019, 5, 1, 6, 0, 0)
    );
    assert_eq!(setups[2].initial_state, setups[0].initial_state);
}

#[rstest]
fn step_bounds_and_initial_step(mut leo: PropagationConfig) {
    let setup = build_propagator(&leo).unwrap();
    let opts = &setup.propagator.opts;
    assert_eq!(opts.min_step, 1e-3 * Unit::Second);
    assert_eq!(opts.max_step, 300.0 * Unit::Second);
    assert_eq!(opts.init_step, 60.0 * Unit::Second);
    assert_eq!(opts.abs_tol, 1e-8);
    assert_eq!(opts.rel_tol, 1e-12);

    // The initial step is clamped into the step bounds
    leo.integration.initial_step = Some(1200.0);
    let setup = build_propagator(&leo).unwrap();
    assert_eq!(setup.propagator.opts.init_step, 300.0 * Unit::Second);

    leo.integration.max_time_step = 30.0;
    leo.integration.initial_step = None;
    let setup = build_propagator(&leo).unwrap();
    assert_eq!(setup.propagator.opts.init_step, 30.0 * Unit::Second);
}

#[rstest]
fn short_state_vector(mut leo: PropagationConfig) {
    leo.propagation.initial_state.truncate(5);
    let err = build_propagator(&leo).unwrap_err();
    assert!(
        matches!(err, ConfigError::StateVectorLength { len: 5, .. }),
        "{err}"
    );
    assert_eq!(err.field(), Some("InitialState"));
}

#[rstest]
fn inverted_step_bounds(mut leo: PropagationConfig) {
    leo.integration.min_time_step = 600.0;
    leo.integration.max_time_step = 60.0;
    let err = build_propagator(&leo).unwrap_err();
    assert!(matches!(err, ConfigError::InvertedStepBounds { .. }), "{err}");
}

#[rstest]
fn bad_start_epoch(mut leo: PropagationConfig) {
    leo.propagation.start = "the first of May".to_string();
    let err = build_propagator(&leo).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEpoch { .. }), "{err}");
    assert_eq!(err.field(), Some("Start"));
}

#[rstest]
#[case::mass("Mass")]
#[case::area("Area")]
#[case::cd("Cd")]
#[case::min_step("MinTimeStep")]
#[case::abs_tol("AbsTolerance")]
#[case::rel_tol("RelTolerance")]
fn non_positive_values(mut leo: PropagationConfig, #[case] field: &str) {
    match field {
        "Mass" => leo.space_object.mass = 0.0,
        "Area" => leo.space_object.area = -1.0,
        "Cd" => leo.space_object.cd = 0.0,
        "MinTimeStep" => leo.integration.min_time_step = 0.0,
        "AbsTolerance" => leo.integration.abs_tolerance = -1e-8,
        "RelTolerance" => leo.integration.rel_tolerance = 0.0,
        _ => unreachable!(),
    }
    let err = build_propagator(&leo).unwrap_err();
    assert!(matches!(err, ConfigError::NonPositive { .. }), "{err}");
    assert_eq!(err.field(), Some(field));
}

#[rstest]
fn non_finite_state(mut leo: PropagationConfig) {
    leo.propagation.initial_state[3] = f64::INFINITY;
    let err = build_propagator(&leo).unwrap_err();
    assert!(matches!(err, ConfigError::NonFinite { .. }), "{err}");
    assert_eq!(err.field(), Some("InitialState"));
}

#[rstest]
fn batch_reports_the_faulty_index(leo: PropagationConfig) {
    let mut bad = leo.clone();
    bad.integration.min_time_step = 1000.0;

    let err = build_propagators(&[leo.clone(), leo, bad]).unwrap_err();
    assert_eq!(err.index(), Some(2));
    assert_eq!(err.field(), Some("MinTimeStep"));
    match err {
        ConfigError::Object { source, .. } => {
            assert!(matches!(*source, ConfigError::InvertedStepBounds { .. }))
        }
        _ => panic!("expected the error of object #2, got {err}"),
    }
}

#[test]
fn force_models() {
    let cfg = config(
        START,
        LEO_STATE,
        r#"[
            {"Model": "SolarPressure", "Shadow": false},
            {"Model": "ThirdBody", "Bodies": ["Sun"]},
            {"Model": "Harmonics", "Degree": 4},
            {"Model": "ConstantDrag", "Rho": 1e-12},
            {"Model": "ThirdBody", "Bodies": ["Moon"]}
        ]"#,
    );
    assert_eq!(cfg.forces.len(), 5);
    assert_eq!(
        cfg.forces[0],
        ForceModelConfig::SolarPressure { shadow: false }
    );
    assert_eq!(cfg.forces[2], ForceModelConfig::Harmonics { degree: 4 });

    // Accelerations and forces are split in two lists, each in the configured order
    let setup = build_propagator(&cfg).unwrap();
    let accels: Vec<String> = setup
        .propagator
        .dynamics
        .orbital_dyn
        .accel_models
        .iter()
        .map(|model| format!("{model:?}"))
        .collect();
    assert_eq!(accels.len(), 3);
    assert!(accels[0].starts_with("PointMasses") && accels[0].contains("Sun"));
    assert!(accels[1].starts_with("Harmonics"));
    assert!(accels[2].starts_with("PointMasses") && accels[2].contains("Moon"));

    let forces: Vec<String> = setup
        .propagator
        .dynamics
        .force_models
        .iter()
        .map(|model| format!("{model:?}"))
        .collect();
    assert_eq!(forces.len(), 2);
    assert!(forces[0].starts_with("SolarPressure"));
    assert!(forces[1].starts_with("Drag"));

    // The whole setup is printable, e.g. in assertion failures
    assert!(format!("{setup:?}").contains("PropagatorSetup"));

    let unknown = config_json(START, LEO_STATE, r#"[{"Model": "Relativity"}]"#);
    let err = PropagationConfig::loads_json(&unknown).unwrap_err();
    assert!(matches!(err, ConfigError::JsonError { .. }), "{err}");

    let too_high = config(START, LEO_STATE, r#"[{"Model": "Harmonics", "Degree": 9}]"#);
    let err = build_propagator(&too_high).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidForceModel { .. }), "{err}");
    assert_eq!(err.field(), Some("Forces"));
}

#[rstest]
#[case::sub_nanosecond(1e-12)]
#[case::tiny(5e-10)]
fn min_step_below_time_resolution(mut leo: PropagationConfig, #[case] min_step: f64) {
    leo.integration.min_time_step = min_step;
    let err = build_propagator(&leo).unwrap_err();
    assert!(
        matches!(err, ConfigError::BelowTimeResolution { .. }),
        "{err}"
    );
    assert_eq!(err.field(), Some("MinTimeStep"));

    // One nanosecond is resolved
    leo.integration.min_time_step = 1e-9;
    assert!(build_propagator(&leo).is_ok());
}

#[test]
fn method_selection() {
    let json = config_json(START, LEO_STATE, "[]").replace(
        r#""RelTolerance": 1e-12"#,
        r#""RelTolerance": 1e-12, "Method": "Verner56""#,
    );
    let cfg = PropagationConfig::loads_json(&json).unwrap();
    assert_eq!(cfg.integration.method, IntegratorMethod::Verner56);
    assert!(build_propagator(&cfg).is_ok());

    let json = config_json(START, LEO_STATE, "[]").replace(
        r#""RelTolerance": 1e-12"#,
        r#""RelTolerance": 1e-12, "Method": "Fehlberg78""#,
    );
    let cfg = PropagationConfig::loads_json(&json).unwrap();
    assert_eq!(cfg.integration.method, IntegratorMethod::Fehlberg78);
    assert!(build_propagator(&cfg).is_ok());

    let json = config_json(START, LEO_STATE, "[]").replace(
        r#""RelTolerance": 1e-12"#,
        r#""RelTolerance": 1e-12, "Method": "Euler""#,
    );
    assert!(PropagationConfig::loads_json(&json).is_err());
}

#[rstest]
fn load_from_files(leo: PropagationConfig) {
    let dir = std::env::temp_dir().join(format!("multiprop-cfg-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    // A single object
    let single = dir.join("leo.json");
    std::fs::write(&single, serde_json::to_string(&leo).unwrap()).unwrap();
    let cfgs = PropagationConfig::load_many(&single).unwrap();
    assert_eq!(cfgs, vec![leo.clone()]);

    let setup = PropagatorSetup::from_file(&single).unwrap();
    assert_eq!(setup.to_config().unwrap(), leo);

    // A sequence, in YAML
    let geo = config(START, GEO_STATE, "[]");
    let many = dir.join("batch.yaml");
    std::fs::write(
        &many,
        serde_yaml::to_string(&vec![leo.clone(), geo.clone()]).unwrap(),
    )
    .unwrap();
    let cfgs = PropagationConfig::load_many(&many).unwrap();
    assert_eq!(cfgs, vec![leo, geo]);

    // Same batches from text
    let json = serde_json::to_string(&cfgs).unwrap();
    assert_eq!(PropagationConfig::loads_json_many(&json).unwrap(), cfgs);
    let yaml = serde_yaml::to_string(&cfgs).unwrap();
    assert_eq!(PropagationConfig::loads_many(&yaml).unwrap(), cfgs);

    let err = PropagationConfig::load(dir.join("missing.json")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadError { .. }), "{err}");

    std::fs::remove_dir_all(&dir).unwrap();
}
