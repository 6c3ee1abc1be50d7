//! Numerical differentiation of the bar path
//!
//! Velocity, acceleration and jerk are computed from position with central
//! finite differences. Every derivative is taken from position directly so
//! error does not accumulate between orders.
//!
//! Samples within the edge gap at either end cannot use the full stencil and
//! copy the nearest interior value instead of switching to one-sided
//! formulas.

use crate::error::DataError;
use crate::types::{ApproximationOrder, Vec2};
use serde::{Deserialize, Serialize};

/// A central difference stencil: `(offset, coefficient)` pairs over the
/// position samples, divided by `scale * h^power`
struct Stencil {
    taps: &'static [(isize, f64)],
    scale: f64,
    power: i32,
}

impl Stencil {
    fn denominator(&self, h: f64) -> f64 {
        self.scale * h.powi(self.power)
    }

    fn apply(&self, position: &[Vec2], center: usize, denominator: f64) -> Vec2 {
        let mut x = 0.0;
        let mut y = 0.0;
        for &(offset, coeff) in self.taps {
            let p = position[center.wrapping_add_signed(offset)];
            x += coeff * p.x;
            y += coeff * p.y;
        }
        Vec2::new(x / denominator, y / denominator)
    }
}

const SECOND_ORDER_VELOCITY: Stencil = Stencil {
    taps: &[(-1, -1.0), (1, 1.0)],
    scale: 2.0,
    power: 1,
};
const SECOND_ORDER_ACCELERATION: Stencil = Stencil {
    taps: &[(-1, 1.0), (0, -2.0), (1, 1.0)],
    scale: 1.0,
    power: 2,
};
const SECOND_ORDER_JERK: Stencil = Stencil {
    taps: &[(-2, -1.0), (-1, 2.0), (1, -2.0), (2, 1.0)],
    scale: 2.0,
    power: 3,
};

const FOURTH_ORDER_VELOCITY: Stencil = Stencil {
    taps: &[(-2, 1.0), (-1, -8.0), (1, 8.0), (2, -1.0)],
    scale: 12.0,
    power: 1,
};
const FOURTH_ORDER_ACCELERATION: Stencil = Stencil {
    taps: &[(-2, -1.0), (-1, 16.0), (0, -30.0), (1, 16.0), (2, -1.0)],
    scale: 12.0,
    power: 2,
};
const FOURTH_ORDER_JERK: Stencil = Stencil {
    taps: &[
        (-3, 1.0),
        (-2, -8.0),
        (-1, 13.0),
        (1, -13.0),
        (2, 8.0),
        (3, -1.0),
    ],
    scale: 8.0,
    power: 3,
};

fn stencils(order: ApproximationOrder) -> [&'static Stencil; 3] {
    match order {
        ApproximationOrder::SecondOrder => [
            &SECOND_ORDER_VELOCITY,
            &SECOND_ORDER_ACCELERATION,
            &SECOND_ORDER_JERK,
        ],
        ApproximationOrder::FourthOrder => [
            &FOURTH_ORDER_VELOCITY,
            &FOURTH_ORDER_ACCELERATION,
            &FOURTH_ORDER_JERK,
        ],
    }
}

/// First three derivatives of a position trace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub velocity: Vec<Vec2>,
    pub acceleration: Vec<Vec2>,
    pub jerk: Vec<Vec2>,
}

/// Smallest series the stencils of `order` can differentiate
pub fn min_samples(order: ApproximationOrder) -> usize {
    2 * order.edge_gap() + 1
}

/// Differentiate `position` (uniform step `h`) into freshly allocated buffers
pub fn derivatives(
    position: &[Vec2],
    h: f64,
    order: ApproximationOrder,
) -> Result<Kinematics, DataError> {
    let n = position.len();
    let mut out = Kinematics {
        velocity: vec![Vec2::ZERO; n],
        acceleration: vec![Vec2::ZERO; n],
        jerk: vec![Vec2::ZERO; n],
    };
    differentiate(
        position,
        h,
        order,
        &mut out.velocity,
        &mut out.acceleration,
        &mut out.jerk,
    )?;
    Ok(out)
}

/// Differentiate `position` (uniform step `h`) into caller owned buffers,
/// each of which must be as long as `position`. Nothing is written on error.
pub fn differentiate(
    position: &[Vec2],
    h: f64,
    order: ApproximationOrder,
    velocity: &mut [Vec2],
    acceleration: &mut [Vec2],
    jerk: &mut [Vec2],
) -> Result<(), DataError> {
    let n = position.len();
    for (field, actual) in [
        ("velocity", velocity.len()),
        ("acceleration", acceleration.len()),
        ("jerk", jerk.len()),
    ] {
        if actual != n {
            return Err(DataError::LengthMismatch {
                field,
                expected: n,
                actual,
            });
        }
    }
    let required = min_samples(order);
    if n < required {
        return Err(DataError::TooFewSamples {
            required,
            actual: n,
        });
    }

    let gap = order.edge_gap();
    let outputs: [&mut [Vec2]; 3] = [velocity, acceleration, jerk];
    for (stencil, out) in stencils(order).into_iter().zip(outputs) {
        let denominator = stencil.denominator(h);
        for i in gap..n - gap {
            out[i] = stencil.apply(position, i, denominator);
        }
        clamp_edges(out, gap);
    }
    Ok(())
}

/// Copy the first and last interior values over the edge gap
fn clamp_edges(out: &mut [Vec2], gap: usize) {
    let n = out.len();
    let head = out[gap];
    let tail = out[n - gap - 1];
    out[..gap].fill(head);
    out[n - gap..].fill(tail);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polynomial(samples: usize, k: i32) -> Vec<Vec2> {
        (0..samples)
            .map(|i| {
                let v = (i as f64).powi(k);
                Vec2::new(v, v)
            })
            .collect()
    }

    fn assert_close(expected: f64, actual: Vec2) {
        assert!(
            (expected - actual.x).abs() < 1e-6 && (expected - actual.y).abs() < 1e-6,
            "expected {expected}, got {actual:?}"
        );
    }

    #[test]
    fn test_second_order_quadratic() {
        let n = 100;
        let k = derivatives(&polynomial(n, 2), 1.0, ApproximationOrder::SecondOrder).unwrap();

        for i in 2..n - 2 {
            let t = i as f64;
            assert_close(2.0 * t, k.velocity[i]);
            assert_close(2.0, k.acceleration[i]);
            assert_close(0.0, k.jerk[i]);
        }
    }

    #[test]
    fn test_fourth_order_quartic() {
        let n = 100;
        let k = derivatives(&polynomial(n, 4), 1.0, ApproximationOrder::FourthOrder).unwrap();

        for i in 3..n - 3 {
            let t = i as f64;
            assert_close(4.0 * t.powi(3), k.velocity[i]);
            assert_close(12.0 * t.powi(2), k.acceleration[i]);
            assert_close(24.0 * t, k.jerk[i]);
        }
    }

    #[test]
    fn test_cubic_jerk_is_positive_constant() {
        let n = 30;
        for order in [
            ApproximationOrder::SecondOrder,
            ApproximationOrder::FourthOrder,
        ] {
            let gap = order.edge_gap();
            let k = derivatives(&polynomial(n, 3), 1.0, order).unwrap();
            for i in gap..n - gap {
                assert_close(6.0, k.jerk[i]);
            }
        }
    }

    #[test]
    fn test_edges_copy_nearest_interior_value() {
        let n = 20;
        for order in [
            ApproximationOrder::SecondOrder,
            ApproximationOrder::FourthOrder,
        ] {
            let gap = order.edge_gap();
            let k = derivatives(&polynomial(n, 2), 1.0, order).unwrap();

            for i in 0..gap {
                assert_eq!(k.velocity[i], k.velocity[gap]);
                assert_eq!(k.acceleration[i], k.acceleration[gap]);
                assert_eq!(k.jerk[i], k.jerk[gap]);
            }
            for i in n - gap..n {
                assert_eq!(k.velocity[i], k.velocity[n - gap - 1]);
                assert_eq!(k.acceleration[i], k.acceleration[n - gap - 1]);
                assert_eq!(k.jerk[i], k.jerk[n - gap - 1]);
            }
            assert_close(2.0 * gap as f64, k.velocity[0]);
            assert_close(2.0 * (n - gap - 1) as f64, k.velocity[n - 1]);
        }
    }

    #[test]
    fn test_step_size_scaling() {
        // x(t) = t² sampled every 0.01s
        let h = 0.01;
        let position: Vec<Vec2> = (0..50)
            .map(|i| {
                let t = i as f64 * h;
                Vec2::new(0.0, t * t)
            })
            .collect();
        let k = derivatives(&position, h, ApproximationOrder::SecondOrder).unwrap();

        let t = 25.0 * h;
        assert!((k.velocity[25].y - 2.0 * t).abs() < 1e-9);
        assert!((k.acceleration[25].y - 2.0).abs() < 1e-6);
        assert!(k.velocity[25].x.abs() < 1e-12);
    }

    #[test]
    fn test_fourth_order_more_accurate_on_smooth_signal() {
        let h = 0.05;
        let position: Vec<Vec2> = (0..60)
            .map(|i| Vec2::new(0.0, (i as f64 * h).sin()))
            .collect();
        let second = derivatives(&position, h, ApproximationOrder::SecondOrder).unwrap();
        let fourth = derivatives(&position, h, ApproximationOrder::FourthOrder).unwrap();

        let t = 30.0 * h;
        let second_err = (second.velocity[30].y - t.cos()).abs();
        let fourth_err = (fourth.velocity[30].y - t.cos()).abs();
        assert!(fourth_err < second_err);
    }

    #[test]
    fn test_too_short_for_stencil() {
        let err = derivatives(&polynomial(6, 2), 1.0, ApproximationOrder::FourthOrder).unwrap_err();
        assert_eq!(
            err,
            DataError::TooFewSamples {
                required: 7,
                actual: 6
            }
        );
        assert!(derivatives(&polynomial(5, 2), 1.0, ApproximationOrder::SecondOrder).is_ok());
    }

    #[test]
    fn test_mismatched_output_untouched() {
        let position = polynomial(10, 2);
        let mut velocity = vec![Vec2::new(9.0, 9.0); 10];
        let mut acceleration = vec![Vec2::ZERO; 10];
        let mut jerk = vec![Vec2::ZERO; 9];

        let err = differentiate(
            &position,
            1.0,
            ApproximationOrder::SecondOrder,
            &mut velocity,
            &mut acceleration,
            &mut jerk,
        )
        .unwrap_err();

        assert!(matches!(err, DataError::LengthMismatch { field: "jerk", .. }));
        assert!(velocity.iter().all(|v| *v == Vec2::new(9.0, 9.0)));
    }
}
