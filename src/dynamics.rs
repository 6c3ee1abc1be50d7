//! Dynamics derived from kinematics and bar mass
//!
//! Everything here is algebraic and per sample:
//! - force = m·a
//! - impulse = m·v (instantaneous momentum)
//! - work = ½·m·|v|² (instantaneous kinetic energy)
//! - power = F·v

use crate::error::DataError;
use crate::types::{Joule, Kilogram, Vec2, Watt};

/// Output buffers for [`derive`]
pub struct DynamicsOut<'a> {
    pub force: &'a mut [Vec2],
    pub impulse: &'a mut [Vec2],
    pub work: &'a mut [Joule],
    pub power: &'a mut [Watt],
}

/// Derive force, impulse, work and power for every sample. All buffers must
/// have the same length as `velocity`; nothing is written on error.
pub fn derive(
    mass: Kilogram,
    velocity: &[Vec2],
    acceleration: &[Vec2],
    out: DynamicsOut<'_>,
) -> Result<(), DataError> {
    let n = velocity.len();
    for (field, actual) in [
        ("acceleration", acceleration.len()),
        ("force", out.force.len()),
        ("impulse", out.impulse.len()),
        ("work", out.work.len()),
        ("power", out.power.len()),
    ] {
        if actual != n {
            return Err(DataError::LengthMismatch {
                field,
                expected: n,
                actual,
            });
        }
    }

    for i in 0..n {
        let force = acceleration[i] * mass;
        out.force[i] = force;
        out.impulse[i] = velocity[i] * mass;
        out.work[i] = 0.5 * mass * velocity[i].norm_squared();
        out.power[i] = force.dot(velocity[i]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffers(n: usize) -> (Vec<Vec2>, Vec<Vec2>, Vec<f64>, Vec<f64>) {
        (
            vec![Vec2::ZERO; n],
            vec![Vec2::ZERO; n],
            vec![0.0; n],
            vec![0.0; n],
        )
    }

    #[test]
    fn test_unit_mass_identities() {
        let velocity = vec![Vec2::new(1.0, 2.0), Vec2::new(-0.5, 0.25)];
        let acceleration = vec![Vec2::new(3.0, -1.0), Vec2::new(0.0, 9.81)];
        let (mut force, mut impulse, mut work, mut power) = buffers(2);

        derive(
            1.0,
            &velocity,
            &acceleration,
            DynamicsOut {
                force: &mut force,
                impulse: &mut impulse,
                work: &mut work,
                power: &mut power,
            },
        )
        .unwrap();

        assert_eq!(force, acceleration);
        assert_eq!(impulse, velocity);
        assert!((work[0] - 2.5).abs() < 1e-12);
        assert!((power[0] - (3.0 - 2.0)).abs() < 1e-12);
        assert!((power[1] - 9.81 * 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_mass_scaling() {
        let velocity = vec![Vec2::new(0.0, 1.5)];
        let acceleration = vec![Vec2::new(0.0, 2.0)];
        let (mut force, mut impulse, mut work, mut power) = buffers(1);

        derive(
            100.0,
            &velocity,
            &acceleration,
            DynamicsOut {
                force: &mut force,
                impulse: &mut impulse,
                work: &mut work,
                power: &mut power,
            },
        )
        .unwrap();

        assert_eq!(force[0], Vec2::new(0.0, 200.0));
        assert_eq!(impulse[0], Vec2::new(0.0, 150.0));
        // ½ · 100 · 1.5²
        assert!((work[0] - 112.5).abs() < 1e-9);
        assert!((power[0] - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_length_mismatch() {
        let velocity = vec![Vec2::ZERO; 3];
        let acceleration = vec![Vec2::ZERO; 3];
        let (mut force, mut impulse, mut work, _) = buffers(3);
        let mut power = vec![0.0; 2];

        let err = derive(
            1.0,
            &velocity,
            &acceleration,
            DynamicsOut {
                force: &mut force,
                impulse: &mut impulse,
                work: &mut work,
                power: &mut power,
            },
        )
        .unwrap_err();

        assert!(matches!(err, DataError::LengthMismatch { field: "power", .. }));
    }
}
