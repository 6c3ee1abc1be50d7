//! Recorded squat session (8 reps at 100 Hz)
//!
//! The recording is not bundled. Place it at
//! `tests/data/15_08_2025_squat.csv` and run with `cargo test -- --ignored`.
//! Column 1 holds the time (s), columns 3 and 2 the x and y bar position (cm).

use barpath_physics::{calculate, ApproximationOrder, Hyperparameters, RawTimeSeries, RepSplit, Vec2};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/15_08_2025_squat.csv")
}

fn load_squat() -> RawTimeSeries {
    let mut reader = csv::Reader::from_path(fixture_path()).expect("squat recording present");
    let mut time = Vec::new();
    let mut position = Vec::new();
    for record in reader.records() {
        let record = record.unwrap();
        let field = |i: usize| -> f64 { record[i].trim().parse().unwrap() };
        time.push(field(1));
        position.push(Vec2::new(field(3) / 100.0, field(2) / 100.0));
    }
    RawTimeSeries::new(time, position)
}

fn squat_params(order: ApproximationOrder) -> Hyperparameters {
    Hyperparameters {
        min_num_samples: 10,
        time_delta_eps: 1e-2,
        near_zero_filter: 0.1,
        noise_filter: 3,
        smoothing_weights: [0.5, 0.5, 1.0, 0.5, 0.5],
        ..Hyperparameters::with_order(order)
    }
}

/// Rep boundaries of the recording, identical under both orders
const EXPECTED_SPLITS: [(usize, usize); 8] = [
    (311, 379),
    (437, 501),
    (548, 613),
    (655, 728),
    (784, 850),
    (911, 977),
    (1039, 1106),
    (1170, 1237),
];

fn check_splits(order: ApproximationOrder) {
    let series = load_squat();
    let physics = calculate(&series, &squat_params(order), 1.0, 8).unwrap();

    let expected: Vec<RepSplit> = EXPECTED_SPLITS
        .iter()
        .map(|&(start, end)| RepSplit::new(start, end))
        .collect();
    assert_eq!(physics.splits, expected);
    assert_eq!(physics.reps.len(), 8);
}

#[test]
#[ignore = "needs tests/data/15_08_2025_squat.csv"]
fn squat_splits_second_order() {
    check_splits(ApproximationOrder::SecondOrder);
}

#[test]
#[ignore = "needs tests/data/15_08_2025_squat.csv"]
fn squat_splits_fourth_order() {
    check_splits(ApproximationOrder::FourthOrder);
}
