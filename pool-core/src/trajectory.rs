//! Closed-form ball trajectories.
//!
//! A `Trajectory` is a snapshot of the ball at some instant (the strike, or
//! the last cushion contact) together with the times at which it will stop
//! sliding and stop rolling. Any later instant is evaluated directly:
//!
//! ```text
//! sliding (s < τ):   v = v0 − μs·g·s·û
//!                    x = x0 + v0·s − ½·μs·g·s²·û
//!
//! rolling (s ≥ τ):   v = vτ − μr·g·r·v̂τ            r = min(s − τ, |vτ| / μr·g)
//!                    x = xτ + vτ·r − ½·μr·g·r²·v̂τ
//! ```
//!
//! where `û` is the (fixed) slip direction and `τ = 2|u0| / (7·μs·g)`.

use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;
use crate::friction::{rolling_spin, FrictionModel};
use crate::types::{constants, BallState, MotionPhase, Vec3};

/// Analytic motion of one ball from a snapshot until it comes to rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    start_time: f64,
    origin: BallState,
    radius: f64,
    friction: FrictionModel,
    sliding_duration: f64,
    rolling_duration: f64,
    /// State at the sliding -> rolling transition
    transition: BallState,
}

impl Trajectory {
    /// Snapshot `origin`, taken at `start_time`.
    pub fn new(start_time: f64, origin: BallState, radius: f64, friction: FrictionModel) -> Self {
        let sliding_duration = match origin.phase {
            MotionPhase::Sliding => friction.sliding_duration(&origin.slip),
            _ => 0.0,
        };

        let transition = match origin.phase {
            MotionPhase::Still => origin,
            _ => {
                let end = slide(&origin, radius, &friction, sliding_duration);
                BallState {
                    spin: rolling_spin(&end.vel, radius),
                    slip: Vec3::ZERO,
                    phase: MotionPhase::Rolling,
                    ..end
                }
            }
        };

        let rolling_duration = match origin.phase {
            MotionPhase::Still => 0.0,
            _ => friction.rolling_duration(&transition.vel),
        };

        Self {
            start_time,
            origin,
            radius,
            friction,
            sliding_duration,
            rolling_duration,
            transition,
        }
    }

    /// Ball at rest, never moving.
    pub fn at_rest(start_time: f64, pos: Vec3, radius: f64, friction: FrictionModel) -> Self {
        Self::new(start_time, BallState::at_rest(pos), radius, friction)
    }

    /// Time the snapshot was taken.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// The snapshot itself.
    pub fn origin(&self) -> &BallState {
        &self.origin
    }

    /// Length of the sliding phase from the snapshot (s).
    pub fn sliding_duration(&self) -> f64 {
        self.sliding_duration
    }

    /// Length of the rolling phase (s).
    pub fn rolling_duration(&self) -> f64 {
        self.rolling_duration
    }

    /// Absolute time at which the ball stops slipping.
    pub fn sliding_end_time(&self) -> f64 {
        self.start_time + self.sliding_duration
    }

    /// Absolute time at which the ball comes to rest.
    pub fn rest_time(&self) -> f64 {
        self.start_time + self.sliding_duration + self.rolling_duration
    }

    /// Where the ball starts rolling.
    pub fn sliding_end_position(&self) -> Vec3 {
        self.transition.pos
    }

    /// Where the ball comes to rest.
    pub fn rest_position(&self) -> Vec3 {
        match self.origin.phase {
            MotionPhase::Still => self.origin.pos,
            _ => {
                let duration = self.rolling_duration;
                roll(&self.transition, self.radius, &self.friction, duration, duration).pos
            }
        }
    }

    /// Full ball state at absolute time `time`.
    ///
    /// # Errors
    /// `InvalidQueryTime` if `time` is negative, NaN, or earlier than the snapshot.
    pub fn state_at(&self, time: f64) -> Result<BallState, PhysicsError> {
        if !(time >= 0.0 && time >= self.start_time) {
            return Err(PhysicsError::InvalidQueryTime {
                time,
                earliest: self.start_time,
            });
        }

        if self.origin.phase == MotionPhase::Still {
            return Ok(self.origin);
        }

        let s = time - self.start_time;
        if s < self.sliding_duration {
            return Ok(slide(&self.origin, self.radius, &self.friction, s));
        }

        let rolled = if s >= self.sliding_duration + self.rolling_duration {
            self.rolling_duration
        } else {
            (s - self.sliding_duration).min(self.rolling_duration)
        };
        Ok(roll(
            &self.transition,
            self.radius,
            &self.friction,
            rolled,
            self.rolling_duration,
        ))
    }

    pub fn velocity_at(&self, time: f64) -> Result<Vec3, PhysicsError> {
        Ok(self.state_at(time)?.vel)
    }

    pub fn angular_velocity_at(&self, time: f64) -> Result<Vec3, PhysicsError> {
        Ok(self.state_at(time)?.spin)
    }

    pub fn relative_velocity_at(&self, time: f64) -> Result<Vec3, PhysicsError> {
        Ok(self.state_at(time)?.slip)
    }

    pub fn position_at(&self, time: f64) -> Result<Vec3, PhysicsError> {
        Ok(self.state_at(time)?.pos)
    }

    pub fn phase_at(&self, time: f64) -> Result<MotionPhase, PhysicsError> {
        Ok(self.state_at(time)?.phase)
    }
}

/// Sliding-phase state `s` seconds after `origin`.
fn slide(origin: &BallState, radius: f64, friction: &FrictionModel, s: f64) -> BallState {
    let slip_dir = origin.slip.normalized();
    let decel = friction.sliding_deceleration();

    BallState {
        pos: origin.pos + origin.vel * s - slip_dir * (0.5 * decel * s * s),
        vel: origin.vel - slip_dir * (decel * s),
        spin: origin.spin
            - slip_dir.cross(&constants::TABLE_NORMAL) * (friction.spin_acceleration(radius) * s),
        slip: origin.slip - slip_dir * (friction.slip_deceleration() * s),
        phase: MotionPhase::Sliding,
    }
}

/// Rolling-phase state `r` seconds after `from`; at rest once `r` reaches `duration`.
fn roll(from: &BallState, radius: f64, friction: &FrictionModel, r: f64, duration: f64) -> BallState {
    let dir = from.vel.normalized();
    let decel = friction.rolling_deceleration();
    let stopped = r >= duration;

    let vel = if stopped {
        Vec3::ZERO
    } else {
        from.vel - dir * (decel * r)
    };

    BallState {
        pos: from.pos + from.vel * r - dir * (0.5 * decel * r * r),
        vel,
        spin: rolling_spin(&vel, radius),
        slip: Vec3::ZERO,
        phase: if stopped {
            MotionPhase::Still
        } else {
            MotionPhase::Rolling
        },
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BallProperties;

    const R: f64 = 0.028575;

    fn stun_trajectory(speed: f64) -> Trajectory {
        let vel = Vec3::new(speed, 0.0, 0.0);
        let origin = BallState {
            pos: Vec3::ZERO,
            vel,
            spin: Vec3::ZERO,
            slip: vel,
            phase: MotionPhase::Sliding,
        };
        Trajectory::new(0.0, origin, R, FrictionModel::default())
    }

    #[test]
    fn test_phase_boundaries() {
        let traj = stun_trajectory(2.0);
        let friction = FrictionModel::default();
        let slide = 4.0 / (7.0 * friction.sliding_deceleration());
        let roll = (2.0 * 5.0 / 7.0) / friction.rolling_deceleration();

        assert!((traj.sliding_duration() - slide).abs() < 1e-12);
        assert!((traj.rolling_duration() - roll).abs() < 1e-9);

        assert_eq!(traj.phase_at(0.0).unwrap(), MotionPhase::Sliding);
        assert_eq!(traj.phase_at(slide * 0.5).unwrap(), MotionPhase::Sliding);
        assert_eq!(traj.phase_at(slide + 0.01).unwrap(), MotionPhase::Rolling);
        assert_eq!(traj.phase_at(traj.rest_time()).unwrap(), MotionPhase::Still);
        assert_eq!(traj.phase_at(traj.rest_time() + 10.0).unwrap(), MotionPhase::Still);
    }

    #[test]
    fn test_sliding_end_position() {
        // x(τ) = v0·τ − ½·μs·g·τ²
        let traj = stun_trajectory(2.0);
        let friction = FrictionModel::default();
        let tau = traj.sliding_duration();
        let expected = 2.0 * tau - 0.5 * friction.sliding_deceleration() * tau * tau;
        assert!((traj.sliding_end_position().x - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rest_position_is_final_position() {
        let traj = stun_trajectory(1.2);
        let late = traj.position_at(traj.rest_time() + 5.0).unwrap();
        assert!((late - traj.rest_position()).magnitude() < 1e-12);
        assert_eq!(traj.velocity_at(traj.rest_time() + 5.0).unwrap(), Vec3::ZERO);
    }

    #[test]
    fn test_rolling_keeps_contact_point_still() {
        let traj = stun_trajectory(2.0);
        let t = traj.sliding_end_time() + 1.0;
        let state = traj.state_at(t).unwrap();

        assert_eq!(state.phase, MotionPhase::Rolling);
        assert_eq!(state.slip, Vec3::ZERO);
        assert!((state.spin.magnitude() * R - state.vel.magnitude()).abs() < 1e-12);
    }

    #[test]
    fn test_velocity_continuous_at_transition() {
        let traj = stun_trajectory(2.0);
        let tau = traj.sliding_end_time();
        let before = traj.velocity_at(tau - 1e-9).unwrap();
        let after = traj.velocity_at(tau + 1e-9).unwrap();
        assert!((before - after).magnitude() < 1e-6);
    }

    #[test]
    fn test_rejects_negative_time() {
        let traj = stun_trajectory(1.0);
        assert_eq!(
            traj.state_at(-0.5),
            Err(PhysicsError::InvalidQueryTime {
                time: -0.5,
                earliest: 0.0
            })
        );
        assert!(traj.state_at(f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_time_before_snapshot() {
        let origin = BallState {
            vel: Vec3::new(1.0, 0.0, 0.0),
            spin: rolling_spin(&Vec3::new(1.0, 0.0, 0.0), R),
            phase: MotionPhase::Rolling,
            ..BallState::default()
        };
        let traj = Trajectory::new(2.0, origin, R, FrictionModel::default());
        assert!(traj.state_at(1.0).is_err());
        assert!(traj.state_at(2.0).is_ok());
    }

    #[test]
    fn test_rolling_snapshot_skips_sliding() {
        let vel = Vec3::new(0.0, 1.0, 0.0);
        let origin = BallState {
            vel,
            spin: rolling_spin(&vel, R),
            phase: MotionPhase::Rolling,
            ..BallState::default()
        };
        let traj = Trajectory::new(0.0, origin, R, FrictionModel::default());

        assert_eq!(traj.sliding_duration(), 0.0);
        assert_eq!(traj.phase_at(0.0).unwrap(), MotionPhase::Rolling);
        let expected_stop = 1.0 / (2.0 * FrictionModel::default().rolling_deceleration());
        assert!((traj.rest_position().y - expected_stop).abs() < 1e-12);
    }

    #[test]
    fn test_still_snapshot_never_moves() {
        let pos = Vec3::new(0.5, -0.2, 0.0);
        let traj = Trajectory::at_rest(0.0, pos, R, FrictionModel::default());
        assert_eq!(traj.position_at(100.0).unwrap(), pos);
        assert_eq!(traj.phase_at(0.0).unwrap(), MotionPhase::Still);
        assert_eq!(traj.rest_time(), 0.0);
    }

    #[test]
    fn test_energy_lost_to_friction() {
        let props = BallProperties::regulation();
        let traj = Trajectory::new(
            0.0,
            BallState {
                vel: Vec3::new(2.0, 0.0, 0.0),
                slip: Vec3::new(2.0, 0.0, 0.0),
                phase: MotionPhase::Sliding,
                ..BallState::default()
            },
            props.radius,
            FrictionModel::default(),
        );

        let mut last = f64::INFINITY;
        for i in 0..200 {
            let e = traj.state_at(i as f64 * 0.05).unwrap().kinetic_energy(&props);
            assert!(e <= last + 1e-12, "Energy rose at step {}", i);
            last = e;
        }
    }
}
