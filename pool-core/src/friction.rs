//! Friction between ball and cloth.
//!
//! Both evaluation strategies (the fixed-step integrator and the closed-form
//! trajectory) use the rates defined here:
//!
//! - **Sliding**: the contact point slips, Coulomb friction `μs·m·g` acts
//!   against the slip direction at the contact point.
//! - **Rolling**: no slip, a much smaller rolling resistance `μr·m·g` acts
//!   against the velocity.
//!
//! ## Sliding Friction
//!
//! The friction force `f = -μs·m·g·û` acts at `r = -R·n` (the contact
//! point), so it both slows the ball and torques it:
//!
//! ```text
//!   dv/dt = -μs·g·û
//!   dω/dt = (5·μs·g / 2R)·(n × û)
//!   du/dt = dv/dt + R·n × dω/dt = -(7/2)·μs·g·û
//! ```
//!
//! The slip `u` shrinks along a fixed direction and vanishes after
//! `2|u|/(7·μs·g)`, at which point the ball rolls.

use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;
use crate::types::{constants, ClothProperties, Vec3};

/// Friction law for a ball on a given cloth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrictionModel {
    /// Coulomb coefficient while sliding
    pub sliding_friction: f64,
    /// Rolling resistance coefficient
    pub rolling_friction: f64,
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
}

impl Default for FrictionModel {
    fn default() -> Self {
        let cloth = ClothProperties::default();
        Self {
            sliding_friction: cloth.sliding_friction,
            rolling_friction: cloth.rolling_friction,
            gravity: constants::GRAVITY,
        }
    }
}

impl FrictionModel {
    /// Build the friction law for a cloth, rejecting coefficients that would
    /// make the phase durations infinite or negative.
    pub fn from_cloth(cloth: &ClothProperties) -> Result<Self, PhysicsError> {
        let model = Self {
            sliding_friction: cloth.sliding_friction,
            rolling_friction: cloth.rolling_friction,
            gravity: constants::GRAVITY,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn validate(&self) -> Result<(), PhysicsError> {
        for mu in [self.sliding_friction, self.rolling_friction, self.gravity] {
            if !(mu.is_finite() && mu > 0.0) {
                return Err(PhysicsError::InvalidFriction(mu));
            }
        }
        Ok(())
    }

    /// Linear deceleration while sliding: μs·g
    pub fn sliding_deceleration(&self) -> f64 {
        self.sliding_friction * self.gravity
    }

    /// Rate at which the slip shrinks: (7/2)·μs·g
    pub fn slip_deceleration(&self) -> f64 {
        3.5 * self.sliding_friction * self.gravity
    }

    /// Angular acceleration while sliding: 5·μs·g / (2R)
    pub fn spin_acceleration(&self, radius: f64) -> f64 {
        (5.0 * self.sliding_friction * self.gravity) / (2.0 * radius)
    }

    /// Linear deceleration while rolling: μr·g
    pub fn rolling_deceleration(&self) -> f64 {
        self.rolling_friction * self.gravity
    }

    /// Time until the slip vanishes: 2|u| / (7·μs·g)
    pub fn sliding_duration(&self, slip: &Vec3) -> f64 {
        (2.0 * slip.magnitude()) / (7.0 * self.sliding_friction * self.gravity)
    }

    /// Time until a rolling ball stops: |v| / (μr·g)
    pub fn rolling_duration(&self, vel: &Vec3) -> f64 {
        vel.magnitude() / self.rolling_deceleration()
    }
}

/// Velocity of the contact point relative to the cloth: v + R·n × ω
pub fn contact_velocity(vel: &Vec3, spin: &Vec3, radius: f64) -> Vec3 {
    *vel + (constants::TABLE_NORMAL * radius).cross(spin)
}

/// Spin of a ball rolling without slip at `vel`: ω = n × v / R
///
/// The result lies in the table plane, perpendicular to `vel`, with
/// `|ω|·R = |v|`. Side spin about the normal is not part of it.
pub fn rolling_spin(vel: &Vec3, radius: f64) -> Vec3 {
    constants::TABLE_NORMAL.cross(&vel.horizontal()) / radius
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const R: f64 = 0.028575;

    #[test]
    fn test_default_rates() {
        let friction = FrictionModel::default();
        assert!((friction.sliding_deceleration() - 0.2 * 9.81).abs() < 1e-12);
        assert!((friction.slip_deceleration() - 3.5 * 0.2 * 9.81).abs() < 1e-12);
        assert!((friction.rolling_deceleration() - 0.015 * 9.81).abs() < 1e-12);
    }

    #[test]
    fn test_sliding_duration() {
        let friction = FrictionModel::default();
        let slip = Vec3::new(0.0, -1.4, 0.0);
        let expected = 2.0 * 1.4 / (7.0 * 0.2 * 9.81);
        assert!((friction.sliding_duration(&slip) - expected).abs() < 1e-12);
        assert_eq!(friction.sliding_duration(&Vec3::ZERO), 0.0);
    }

    #[test]
    fn test_rolling_spin_removes_slip() {
        let vel = Vec3::new(0.7, -1.1, 0.0);
        let spin = rolling_spin(&vel, R);
        let slip = contact_velocity(&vel, &spin, R);

        assert!(slip.magnitude() < 1e-12, "Rolling ball should not slip: {:?}", slip);
        assert!((spin.magnitude() * R - vel.magnitude()).abs() < 1e-12);
        assert!(spin.dot(&vel).abs() < 1e-12, "Rolling spin is perpendicular to velocity");
    }

    #[test]
    fn test_contact_velocity_of_stun_ball() {
        // No spin: the contact point moves with the centre
        let vel = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(contact_velocity(&vel, &Vec3::ZERO, R), vel);
    }

    #[test]
    fn test_side_spin_does_not_slip() {
        // Spin about the table normal turns the contact point in place
        let spin = Vec3::new(0.0, 0.0, 50.0);
        assert_eq!(contact_velocity(&Vec3::ZERO, &spin, R), Vec3::ZERO);
    }

    #[test]
    fn test_slip_rate_matches_velocity_and_spin_rates() {
        // du/dt = dv/dt + R·n × dω/dt must equal -(7/2)·μs·g·û
        let friction = FrictionModel::default();
        let slip_dir = Vec3::new(0.6, -0.8, 0.0);

        let dv = slip_dir * (-friction.sliding_deceleration());
        let dw = constants::TABLE_NORMAL.cross(&slip_dir) * friction.spin_acceleration(R);
        let du = contact_velocity(&dv, &dw, R);

        let expected = slip_dir * (-friction.slip_deceleration());
        assert!((du - expected).magnitude() < 1e-12);
    }

    #[test]
    fn test_rejects_zero_friction() {
        let cloth = ClothProperties {
            rolling_friction: 0.0,
            ..ClothProperties::default()
        };
        assert_eq!(
            FrictionModel::from_cloth(&cloth),
            Err(PhysicsError::InvalidFriction(0.0))
        );
    }
}
