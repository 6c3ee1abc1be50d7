//! Per-repetition reduction
//!
//! Each split is scanned once. Vector quantities are reduced on the vertical
//! axis, ties keep the first occurrence.

use crate::types::{PhysicsProfile, RepSplit, RepStat, RepStats, Second};

#[derive(Debug, Clone, Copy)]
struct Extrema {
    min: RepStat,
    max: RepStat,
}

impl Extrema {
    fn seed(time: Second, value: f64) -> Self {
        let stat = RepStat { time, value };
        Self {
            min: stat,
            max: stat,
        }
    }

    fn update(&mut self, time: Second, value: f64) {
        if value < self.min.value {
            self.min = RepStat { time, value };
        }
        if value > self.max.value {
            self.max = RepStat { time, value };
        }
    }
}

/// Reduce every split of a profile to its extrema and averages.
///
/// Splits that are inverted or reach past the end of the profile produce no
/// entry; the `rep` field of each entry still refers to the split's position
/// in `splits`.
pub fn aggregate(time: &[Second], profile: &PhysicsProfile, splits: &[RepSplit]) -> Vec<RepStats> {
    let n = time.len().min(profile.len());
    splits
        .iter()
        .enumerate()
        .filter(|(_, split)| !split.is_empty() && split.end_idx < n)
        .map(|(rep, split)| reduce(rep, *split, time, profile))
        .collect()
}

fn reduce(rep: usize, split: RepSplit, time: &[Second], profile: &PhysicsProfile) -> RepStats {
    let first = split.start_idx;
    let t0 = time[first];
    let mut vel = Extrema::seed(t0, profile.velocity[first].y);
    let mut acc = Extrema::seed(t0, profile.acceleration[first].y);
    let mut force = Extrema::seed(t0, profile.force[first].y);
    let mut impulse = Extrema::seed(t0, profile.impulse[first].y);
    let mut work = Extrema::seed(t0, profile.work[first]);
    let mut power = Extrema::seed(t0, profile.power[first]);
    let mut work_sum = 0.0;
    let mut power_sum = 0.0;

    for i in split.start_idx..=split.end_idx {
        let t = time[i];
        vel.update(t, profile.velocity[i].y);
        acc.update(t, profile.acceleration[i].y);
        force.update(t, profile.force[i].y);
        impulse.update(t, profile.impulse[i].y);
        work.update(t, profile.work[i]);
        power.update(t, profile.power[i]);
        work_sum += profile.work[i];
        power_sum += profile.power[i];
    }

    let samples = split.len() as f64;
    RepStats {
        rep,
        split,
        min_vel: vel.min,
        max_vel: vel.max,
        min_acc: acc.min,
        max_acc: acc.max,
        min_force: force.min,
        max_force: force.max,
        min_impulse: impulse.min,
        max_impulse: impulse.max,
        min_work: work.min,
        max_work: work.max,
        avg_work: work_sum / samples,
        min_power: power.min,
        max_power: power.max,
        avg_power: power_sum / samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vec2;

    fn profile_from_vertical(values: &[f64]) -> (Vec<Second>, PhysicsProfile) {
        let time: Vec<Second> = (0..values.len()).map(|i| i as f64 * 0.1).collect();
        let mut profile = PhysicsProfile::with_len(values.len());
        for (i, &v) in values.iter().enumerate() {
            profile.velocity[i] = Vec2::new(100.0, v);
            profile.acceleration[i] = Vec2::new(0.0, 2.0 * v);
            profile.force[i] = Vec2::new(0.0, 3.0 * v);
            profile.impulse[i] = Vec2::new(0.0, -v);
            profile.work[i] = v * v;
            profile.power[i] = v;
        }
        (time, profile)
    }

    #[test]
    fn test_extrema_with_time() {
        let (time, profile) = profile_from_vertical(&[0.0, -1.0, 2.0, 0.5, -3.0, 1.0]);
        let stats = aggregate(&time, &profile, &[RepSplit::new(1, 3)]);

        assert_eq!(stats.len(), 1);
        let rep = &stats[0];
        assert_eq!(rep.rep, 0);
        assert_eq!(rep.min_vel, RepStat { time: 0.1, value: -1.0 });
        assert_eq!(rep.max_vel, RepStat { time: 0.2, value: 2.0 });
        assert_eq!(rep.max_acc.value, 4.0);
        assert_eq!(rep.min_force.value, -3.0);
        // Impulse is mirrored, so its extrema swap positions
        assert_eq!(rep.min_impulse, RepStat { time: 0.2, value: -2.0 });
        assert_eq!(rep.max_impulse, RepStat { time: 0.1, value: 1.0 });
        assert_eq!(rep.min_work, RepStat { time: time[3], value: 0.25 });
        assert_eq!(rep.max_work, RepStat { time: 0.2, value: 4.0 });
        assert!((rep.avg_work - (1.0 + 4.0 + 0.25) / 3.0).abs() < 1e-12);
        assert!((rep.avg_power - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let (time, profile) = profile_from_vertical(&[1.0, 5.0, 5.0, -2.0, -2.0]);
        let stats = aggregate(&time, &profile, &[RepSplit::new(0, 4)]);

        assert_eq!(stats[0].max_vel.time, time[1]);
        assert_eq!(stats[0].min_vel.time, time[3]);
    }

    #[test]
    fn test_single_sample_split() {
        let (time, profile) = profile_from_vertical(&[1.0, 2.0, 3.0]);
        let stats = aggregate(&time, &profile, &[RepSplit::new(2, 2)]);

        assert_eq!(stats[0].min_vel, stats[0].max_vel);
        assert!((stats[0].avg_power - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_splits_are_skipped() {
        let (time, profile) = profile_from_vertical(&[1.0, 2.0, 3.0, 4.0]);
        let splits = [
            RepSplit::new(2, 1),
            RepSplit::new(0, 1),
            RepSplit::new(3, 10),
            RepSplit::new(2, 3),
        ];
        let stats = aggregate(&time, &profile, &splits);

        let reps: Vec<usize> = stats.iter().map(|s| s.rep).collect();
        assert_eq!(reps, vec![1, 3]);
    }

    #[test]
    fn test_no_splits() {
        let (time, profile) = profile_from_vertical(&[1.0, 2.0]);
        assert!(aggregate(&time, &profile, &[]).is_empty());
    }
}
