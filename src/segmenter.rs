//! Repetition segmentation
//!
//! Splits a set's vertical velocity into repetitions:
//! 1. Smooth the signal with the 5-tap kernel from the hyperparameters
//! 2. Zero everything inside the near-zero dead zone
//! 3. Collapse the signed signal into movement phases, dropping chatter shorter
//!    than the noise filter
//! 4. Pair each phase in the opening direction with the opposite phase that
//!    follows it
//!
//! The opening direction is the one the lifter starts from rest with (the
//! descent of a squat, the pull of a deadlift), found by comparing how much
//! dead time precedes the phases of each sign.

use crate::hyperparams::Hyperparameters;
use crate::types::{RepSplit, Vec2};
use tracing::debug;

/// Samples at each end of the signal not covered by the full kernel
const SMOOTHING_EDGE_GAP: usize = 2;

/// A run of samples moving in one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Phase {
    sign: i8,
    start: usize,
    end: usize,
}

/// Segment a set into repetitions using the vertical velocity component.
///
/// `expected_reps` bounds the result: when more reps are found than expected
/// the ones with the largest velocity swing are kept. A value of 0 disables
/// the bound. Finding fewer reps than expected is not an error.
pub fn segment(velocity: &[Vec2], params: &Hyperparameters, expected_reps: u32) -> Vec<RepSplit> {
    let vertical: Vec<f64> = velocity.iter().map(|v| v.y).collect();
    segment_signal(&vertical, params, expected_reps)
}

/// Segment an arbitrary signed signal. See [`segment`].
pub fn segment_signal(signal: &[f64], params: &Hyperparameters, expected_reps: u32) -> Vec<RepSplit> {
    if signal.is_empty() {
        return Vec::new();
    }

    let smoothed = smooth(signal, &params.smoothing_weights);
    let signs = dead_zone(&smoothed, params.near_zero_filter);
    let min_len = params.noise_filter.max(1) as usize;

    let halves = half_cycles(&signs, min_len);
    let mut splits = pair_half_cycles(&halves);

    let expected = expected_reps as usize;
    if expected > 0 && splits.len() > expected {
        splits = keep_largest_swings(splits, &smoothed, expected);
    }
    if expected > 0 && splits.len() != expected {
        debug!(
            detected = splits.len(),
            expected, "Rep count differs from the expected count"
        );
    }
    splits
}

/// Centered weighted moving average. The two samples at each end copy the
/// nearest fully smoothed value. Signals shorter than the kernel, or kernels
/// whose weights sum to zero, are returned unchanged.
pub fn smooth(signal: &[f64], weights: &[f64; 5]) -> Vec<f64> {
    let n = signal.len();
    let total: f64 = weights.iter().sum();
    if n < weights.len() || total == 0.0 {
        return signal.to_vec();
    }

    let mut out = vec![0.0; n];
    for (i, window) in signal.windows(weights.len()).enumerate() {
        let sum: f64 = window.iter().zip(weights).map(|(s, w)| s * w).sum();
        out[i + SMOOTHING_EDGE_GAP] = sum / total;
    }

    let head = out[SMOOTHING_EDGE_GAP];
    let tail = out[n - SMOOTHING_EDGE_GAP - 1];
    out[..SMOOTHING_EDGE_GAP].fill(head);
    out[n - SMOOTHING_EDGE_GAP..].fill(tail);
    out
}

/// Sign of each sample, with everything within `half_width` of zero mapped
/// to 0
pub fn dead_zone(signal: &[f64], half_width: f64) -> Vec<i8> {
    signal
        .iter()
        .map(|&s| {
            if s.abs() <= half_width {
                0
            } else if s > 0.0 {
                1
            } else {
                -1
            }
        })
        .collect()
}

/// Maximal runs of one sign, ignoring runs shorter than `min_len`
fn phases(signs: &[i8], min_len: usize) -> Vec<Phase> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < signs.len() {
        let sign = signs[i];
        let start = i;
        while i < signs.len() && signs[i] == sign {
            i += 1;
        }
        if sign != 0 && i - start >= min_len {
            out.push(Phase {
                sign,
                start,
                end: i - 1,
            });
        }
    }
    out
}

/// Merge consecutive phases of the same sign into one half of a rep cycle
fn half_cycles(signs: &[i8], min_len: usize) -> Vec<Phase> {
    let mut out: Vec<Phase> = Vec::new();
    for phase in phases(signs, min_len) {
        match out.last_mut() {
            Some(last) if last.sign == phase.sign => last.end = phase.end,
            _ => out.push(phase),
        }
    }
    out
}

/// The direction whose phases are preceded by the most dead time
fn opening_sign(halves: &[Phase]) -> Option<i8> {
    let first = halves.first()?;
    let mut rest_before = [0usize; 2];
    let mut prev_end: Option<usize> = None;
    for half in halves {
        let rest = match prev_end {
            Some(end) => half.start - end - 1,
            None => half.start,
        };
        rest_before[usize::from(half.sign > 0)] += rest;
        prev_end = Some(half.end);
    }

    Some(match rest_before[1].cmp(&rest_before[0]) {
        std::cmp::Ordering::Greater => 1,
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => first.sign,
    })
}

fn pair_half_cycles(halves: &[Phase]) -> Vec<RepSplit> {
    let Some(opening) = opening_sign(halves) else {
        return Vec::new();
    };

    let mut splits = Vec::new();
    let mut open: Option<Phase> = None;
    for half in halves {
        if half.sign == opening {
            open = Some(*half);
        } else if let Some(opener) = open.take() {
            splits.push(RepSplit::new(opener.start, half.end));
        }
    }
    splits
}

/// Keep the `count` splits with the largest peak-to-peak swing, in index order
fn keep_largest_swings(splits: Vec<RepSplit>, signal: &[f64], count: usize) -> Vec<RepSplit> {
    let mut ranked: Vec<(f64, RepSplit)> = splits
        .into_iter()
        .map(|split| {
            let window = &signal[split.start_idx..=split.end_idx];
            let max = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = window.iter().copied().fold(f64::INFINITY, f64::min);
            (max - min, split)
        })
        .collect();

    // Stable sort keeps earlier reps first on ties
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.truncate(count);

    let mut kept: Vec<RepSplit> = ranked.into_iter().map(|(_, split)| split).collect();
    kept.sort_by_key(|split| split.start_idx);
    kept
}
