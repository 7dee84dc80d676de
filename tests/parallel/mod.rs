use super::{config, config_json, config_json_with, init_logger, GEO_STATE, LEO_STATE, START};
use multiprop::io::{ConfigError, ConfigRepr, PropagationConfig};
use multiprop::parallel::{
    build_propagators, propagate, ParallelPropagation, StepRecorder, SyncStep,
};
use multiprop::propagators::PropagationError;
use multiprop::time::{Epoch, Unit};
use multiprop::{MultiPropError, Spacecraft, State};
use rstest::*;

#[fixture]
fn start() -> Epoch {
    Epoch::from_gregorian_utc_hms(2019, 5, 1, 0, 0, 0)
}

#[fixture]
fn pair() -> Vec<PropagationConfig> {
    vec![
        config(START, LEO_STATE, "[]"),
        config(START, GEO_STATE, r#"[{"Model": "ThirdBody", "Bodies": ["Sun", "Moon"]}]"#),
    ]
}

/// Checks that every step holds all the states, all at the epoch of the step, and that only the last one is flagged.
fn check_lockstep(recorder: &StepRecorder<Spacecraft>, num: usize, end: Epoch) {
    let last = recorder.last().expect("no step reported");
    assert!(last.is_last);
    assert_eq!(last.epoch, end);
    assert!(recorder.finished);
    assert_eq!(recorder.target, Some(end));

    for (i, step) in recorder.steps.iter().enumerate() {
        assert_eq!(step.len(), num, "partial report at step {i}");
        for sc in step.iter() {
            assert_eq!(sc.epoch(), step.epoch, "state out of sync at step {i}");
        }
        assert_eq!(step.is_last, i == recorder.steps.len() - 1);
    }
}

#[rstest]
fn zero_window(start: Epoch, pair: Vec<PropagationConfig>) {
    init_logger();
    let setups = build_propagators(&pair).unwrap();
    let mut driver = ParallelPropagation::from_setups(&setups);
    let mut recorder = StepRecorder::new();
    driver.propagate(start, start, &mut recorder).unwrap();

    assert_eq!(recorder.steps.len(), 1);
    let step = &recorder.steps[0];
    assert!(step.is_last);
    assert_eq!(step.epoch, start);
    assert_eq!(step.states[0], setups[0].initial_state);
    assert_eq!(step.states[1], setups[1].initial_state);
    assert_eq!(recorder.initial, step.states);
    assert!(recorder.finished);
}

#[rstest]
fn lockstep_forward(start: Epoch, pair: Vec<PropagationConfig>) {
    init_logger();
    let end = start + 2 * Unit::Hour;
    let setups = build_propagators(&pair).unwrap();
    let mut driver = ParallelPropagation::from_setups(&setups);
    let mut recorder = StepRecorder::new();
    driver.propagate(start, end, &mut recorder).unwrap();

    check_lockstep(&recorder, 2, end);
    assert!(recorder.steps.len() > 1);
    let mut prev = start;
    for step in &recorder.steps {
        assert!(step.epoch > prev);
        assert!(step.epoch - prev <= 300 * Unit::Second);
        prev = step.epoch;
    }

    // The driver keeps the final states
    assert_eq!(driver.states(), recorder.last().unwrap().states);
    assert_eq!(recorder.history(1).count(), recorder.steps.len());
}

#[rstest]
fn lockstep_backward(start: Epoch, pair: Vec<PropagationConfig>) {
    let end = start - 90 * Unit::Minute;
    let setups = build_propagators(&pair).unwrap();
    let mut driver = ParallelPropagation::from_setups(&setups);
    let mut recorder = StepRecorder::new();
    driver.propagate(start, end, &mut recorder).unwrap();

    check_lockstep(&recorder, 2, end);
    let mut prev = start;
    for step in &recorder.steps {
        assert!(step.epoch < prev);
        prev = step.epoch;
    }
}

#[rstest]
fn forward_then_backward(start: Epoch) {
    init_logger();
    let cfgs = [
        PropagationConfig::loads_json(&config_json_with(
            START, LEO_STATE, "[]", 1e-3, 300.0, 1e-10, 1e-13,
        ))
        .unwrap(),
        PropagationConfig::loads_json(&config_json_with(
            START, GEO_STATE, "[]", 1e-3, 300.0, 1e-10, 1e-13,
        ))
        .unwrap(),
    ];
    let setups = build_propagators(&cfgs).unwrap();
    let mut driver = ParallelPropagation::from_setups(&setups);

    let end = start + 3 * Unit::Hour;
    let mut recorder = StepRecorder::new();
    driver.propagate(start, end, &mut recorder).unwrap();
    driver.propagate(end, start, &mut recorder).unwrap();
    check_lockstep(&recorder, 2, start);

    for (setup, sc) in setups.iter().zip(driver.states()) {
        let (err_r, err_v) = sc.rss(&setup.initial_state);
        println!("round trip error: {err_r:.3e} m\t{err_v:.3e} m/s");
        assert!(err_r < 0.1, "{err_r} m");
        assert!(err_v < 1e-4, "{err_v} m/s");
    }
}

#[rstest]
fn initial_epochs_are_aligned(start: Epoch) {
    let cfgs = [
        config("2019-04-30T23:00:00Z", LEO_STATE, "[]"),
        config("2019-05-01T00:30:00Z", GEO_STATE, "[]"),
        config(START, LEO_STATE, "[]"),
    ];
    let setups = build_propagators(&cfgs).unwrap();
    let mut driver = ParallelPropagation::from_setups(&setups);
    let end = start + 30 * Unit::Minute;
    let mut recorder = StepRecorder::new();
    driver.propagate(start, end, &mut recorder).unwrap();

    assert_eq!(recorder.initial.len(), 3);
    for sc in &recorder.initial {
        assert_eq!(sc.epoch(), start);
    }
    // The first object was moved away from its initial state without any report
    assert_ne!(recorder.initial[0].orbit, setups[0].initial_state.orbit);
    assert_eq!(recorder.initial[2], setups[2].initial_state);
    check_lockstep(&recorder, 3, end);
}

#[rstest]
fn pairing_does_not_change_the_result(start: Epoch, pair: Vec<PropagationConfig>) {
    let end = start + 6 * Unit::Hour;

    let alone = build_propagators(&pair[..1]).unwrap();
    let mut recorder = StepRecorder::new();
    ParallelPropagation::from_setups(&alone)
        .propagate(start, end, &mut recorder)
        .unwrap();
    let single = recorder.last().unwrap().states[0];

    let both = build_propagators(&pair).unwrap();
    let mut paired_steps = 0;
    let mut paired = None;
    let mut handler = |step: &SyncStep<Spacecraft>| {
        paired_steps += 1;
        if step.is_last {
            paired = step.state(0).copied();
        }
    };
    ParallelPropagation::from_setups(&both)
        .propagate(start, end, &mut handler)
        .unwrap();

    assert!(paired_steps > 1);
    let (err_r, err_v) = paired.unwrap().rss(&single);
    assert!(err_r < 1.0, "{err_r} m");
    assert!(err_v < 1e-3, "{err_v} m/s");
}

#[rstest]
#[case::second(1, 1)]
#[case::both(0, 0)]
fn failing_member_aborts(start: Epoch, #[case] bad_index: usize, #[case] expected: usize) {
    init_logger();
    let good = config_json(START, LEO_STATE, "[]");
    let bad = config_json_with(START, LEO_STATE, "[]", 600.0, 600.0, 1e-15, 1e-15);
    let cfgs: Vec<PropagationConfig> = (0..2)
        .map(|i| {
            let json = if i >= bad_index { &bad } else { &good };
            PropagationConfig::loads_json(json).unwrap()
        })
        .collect();

    let setups = build_propagators(&cfgs).unwrap();
    let mut driver = ParallelPropagation::from_setups(&setups);
    let mut recorder = StepRecorder::new();
    let err = driver
        .propagate(start, start + 1 * Unit::Hour, &mut recorder)
        .unwrap_err();

    assert_eq!(err.member_index(), Some(expected));
    match err {
        PropagationError::Member { source, .. } => assert!(
            matches!(*source, PropagationError::StepSizeUnderflow { .. }),
            "{source}"
        ),
        _ => panic!("expected a member error, got {err}"),
    }
    assert!(recorder.steps.is_empty());
    assert!(!recorder.finished);
}

#[test]
fn json_entry_point() {
    init_logger();
    let leo = config_json(START, LEO_STATE, "[]");
    let geo = config_json(START, GEO_STATE, r#"[{"Model": "SolarPressure"}]"#);

    let mut recorder = StepRecorder::new();
    propagate(
        &[leo.as_str(), geo.as_str(), leo.as_str()],
        "2019-05-01T00:00:00Z",
        "2019-05-01T01:00:00Z",
        &mut recorder,
    )
    .unwrap();
    check_lockstep(
        &recorder,
        3,
        Epoch::from_gregorian_utc_hms(2019, 5, 1, 1, 0, 0),
    );
    // Same configuration, same trajectory
    let last = recorder.last().unwrap();
    assert_eq!(last.states[0], last.states[2]);
}

#[test]
fn json_entry_point_errors() {
    let leo = config_json(START, LEO_STATE, "[]");
    let mut count = 0;
    let mut handler = |_: &SyncStep<Spacecraft>| count += 1;

    let err = propagate(
        &[leo.as_str(), "{\"Propagation\": 12}"],
        START,
        "2019-05-01T01:00:00Z",
        &mut handler,
    )
    .unwrap_err();
    assert_eq!(err.index(), Some(1));
    assert!(matches!(err, MultiPropError::Config { .. }), "{err}");

    let err = propagate(&[leo.as_str()], START, "tomorrow", &mut handler).unwrap_err();
    match err {
        MultiPropError::Config { ref source } => {
            assert!(matches!(source, ConfigError::InvalidEpoch { .. }));
            assert_eq!(source.field(), Some("PropagationEnd"));
        }
        _ => panic!("expected a configuration error, got {err}"),
    }
    assert_eq!(err.index(), None);
    assert_eq!(count, 0);
}
