use super::{config, init_logger, GEO_STATE, LEO_STATE, START};
use approx::assert_abs_diff_eq;
use multiprop::cosmic::{Bodies, Orbit, Spacecraft, EME2000};
use multiprop::dynamics::{
    AtmDensity, Drag, Harmonics, OrbitalDynamics, PointMasses, SpacecraftDynamics,
};
use multiprop::parallel::build_propagator;
use multiprop::propagators::{
    IntegratorMethod, IntegratorOptions, PropagationError, Propagator, ScaledRms,
};
use multiprop::time::{Epoch, Unit};
use multiprop::State;
use rstest::*;

#[fixture]
fn leo() -> Spacecraft {
    let epoch = Epoch::from_gregorian_utc_hms(2019, 5, 1, 0, 0, 0);
    let x = LEO_STATE;
    Spacecraft::from_orbit(
        Orbit::cartesian(x[0], x[1], x[2], x[3], x[4], x[5], epoch, EME2000),
        500.0,
    )
    .with_drag(2.0, 2.2)
}

fn tight_opts() -> IntegratorOptions<ScaledRms> {
    IntegratorOptions::with_adaptive_step_s(1e-3, 300.0, 1e-10, 1e-13, ScaledRms)
}

#[rstest]
#[case::dp45(IntegratorMethod::DormandPrince45)]
#[case::rkf45(IntegratorMethod::Fehlberg45)]
#[case::verner56(IntegratorMethod::Verner56)]
#[case::rkf78(IntegratorMethod::Fehlberg78)]
fn two_body_period(leo: Spacecraft, #[case] method: IntegratorMethod) {
    init_logger();
    let dynamics = SpacecraftDynamics::new(OrbitalDynamics::two_body());
    let prop = Propagator::from_method(method, dynamics, tight_opts());

    let period = leo.orbit.period();
    let rslt = prop.with(leo).for_duration(period).unwrap();
    assert_eq!(rslt.epoch(), leo.epoch() + period);

    let (err_r, err_v) = rslt.rss(&leo);
    println!("[{method}] after one period: {err_r:.3e} m\t{err_v:.3e} m/s");
    assert!(err_r < 1.0, "{method}: {err_r} m");
    assert!(err_v < 1e-3, "{method}: {err_v} m/s");
    assert_abs_diff_eq!(
        rslt.orbit.energy_m2_s2(),
        leo.orbit.energy_m2_s2(),
        epsilon = 1.0
    );
}

#[rstest]
fn backward_returns_home(leo: Spacecraft) {
    let dynamics = SpacecraftDynamics::new(OrbitalDynamics::two_body());
    let prop = Propagator::dp45(dynamics, tight_opts());

    let mut instance = prop.with(leo);
    let there = instance.for_duration(3 * Unit::Hour).unwrap();
    assert_eq!(there.epoch(), leo.epoch() + 3 * Unit::Hour);
    let back = instance.until_epoch(leo.epoch()).unwrap();
    assert_eq!(back.epoch(), leo.epoch());

    let (err_r, err_v) = back.rss(&leo);
    assert!(err_r < 0.1, "{err_r} m");
    assert!(err_v < 1e-4, "{err_v} m/s");
}

#[rstest]
fn drag_decays_the_orbit(leo: Spacecraft) {
    let dynamics =
        SpacecraftDynamics::from_model(OrbitalDynamics::two_body(), Drag::new(AtmDensity::Constant(1e-9)));
    let prop = Propagator::default(dynamics);

    let rslt = prop.with(leo).for_duration(1 * Unit::Hour).unwrap();
    let delta_e = rslt.orbit.energy_m2_s2() - leo.orbit.energy_m2_s2();
    println!("energy change with drag: {delta_e:.3} m^2/s^2");
    // About 1.6 m^2/s^3 of loss at this velocity
    assert!(delta_e < -1e3, "{delta_e}");
    assert!(rslt.orbit.sma_m() < leo.orbit.sma_m());
    // Mass is untouched
    assert_eq!(rslt.mass_kg, leo.mass_kg);
}

#[rstest]
fn perturbations_move_the_orbit(leo: Spacecraft) {
    let two_body = Propagator::default(SpacecraftDynamics::new(OrbitalDynamics::two_body()));
    let mut orbital = OrbitalDynamics::from_model(Harmonics::j2());
    orbital.add_model(PointMasses::new(vec![Bodies::Sun, Bodies::Moon]));
    let perturbed = Propagator::default(SpacecraftDynamics::new(orbital));

    let rslt_2b = two_body.with(leo).for_duration(2 * Unit::Hour).unwrap();
    let rslt_pert = perturbed.with(leo).for_duration(2 * Unit::Hour).unwrap();
    assert!(rslt_pert.orbit.is_finite());

    let (err_r, _) = rslt_pert.rss(&rslt_2b);
    println!("J2 and third bodies moved the LEO by {err_r:.3} m in 2 hours");
    assert!(err_r > 1_000.0, "{err_r} m");
}

#[test]
fn full_force_model_from_config() {
    init_logger();
    let cfg = config(
        START,
        GEO_STATE,
        r#"[
            {"Model": "Harmonics", "Degree": 6},
            {"Model": "ThirdBody", "Bodies": ["Sun", "Moon"]},
            {"Model": "SolarPressure"},
            {"Model": "ExponentialDrag"}
        ]"#,
    );
    let setup = build_propagator(&cfg).unwrap();
    let rslt = setup.instance().for_duration(1 * Unit::Day).unwrap();
    assert!(rslt.is_finite());
    assert_eq!(rslt.epoch(), setup.initial_state.epoch() + 1 * Unit::Day);
    // Still a GEO
    assert_abs_diff_eq!(rslt.orbit.rmag_m(), 42_164_000.0, epsilon = 100_000.0);
}

#[rstest]
fn propose_then_commit(leo: Spacecraft) {
    let prop = Propagator::default(SpacecraftDynamics::new(OrbitalDynamics::two_body()));
    let mut reference = prop.with(leo);
    let mut instance = prop.with(leo);

    // The proposal does not move the state
    let proposed = instance.propose_step(1 * Unit::Hour).unwrap();
    assert!(proposed > 0 * Unit::Second && proposed <= 60 * Unit::Second);
    assert_eq!(instance.state, leo);

    // Committing the proposal is the same as a single step
    let committed = instance.commit_step(proposed).unwrap();
    let single = reference.single_step(false).unwrap();
    assert_eq!(committed, single);

    // A shorter commit than the proposal is a fixed step
    let proposed = instance.propose_step(1 * Unit::Hour).unwrap();
    let half = proposed * 0.5;
    let rslt = instance.commit_step(half).unwrap();
    assert_eq!(rslt.epoch(), single.epoch() + half);

    // The remaining duration caps the proposal, and its sign gives the direction
    instance.set_step(-30 * Unit::Second);
    assert_eq!(instance.next_step(), 30 * Unit::Second);
    let proposed = instance.propose_step(-1 * Unit::Second).unwrap();
    assert_eq!(proposed, -1 * Unit::Second);
    let details = instance.latest_details();
    assert_eq!(details.step, -1 * Unit::Second);
    assert_eq!(details.attempts, 1);
    assert!(details.error <= 1.0);
    // A window closing step does not change the adapted step
    assert_eq!(instance.next_step(), 30 * Unit::Second);
}

#[rstest]
fn step_underflow(leo: Spacecraft) {
    let opts = IntegratorOptions::with_adaptive_step_s(600.0, 600.0, 1e-15, 1e-15, ScaledRms);
    let prop = Propagator::dp45(SpacecraftDynamics::new(OrbitalDynamics::two_body()), opts);
    let err = prop.with(leo).for_duration(1 * Unit::Hour).unwrap_err();
    assert!(
        matches!(err, PropagationError::StepSizeUnderflow { .. }),
        "{err}"
    );
}

#[rstest]
fn zero_step_does_not_stall(leo: Spacecraft) {
    // A minimum step below the nanosecond resolution is a zero duration
    let opts = IntegratorOptions::with_adaptive_step_s(1e-12, 300.0, 1e-10, 1e-13, ScaledRms);
    let prop = Propagator::dp45(SpacecraftDynamics::new(OrbitalDynamics::two_body()), opts);
    let mut instance = prop.with(leo);
    instance.set_step(0 * Unit::Second);

    let err = instance.until_epoch(leo.epoch() + 1 * Unit::Minute).unwrap_err();
    assert!(
        matches!(err, PropagationError::StepSizeUnderflow { .. }),
        "{err}"
    );
    assert_eq!(instance.state.epoch(), leo.epoch());
}
