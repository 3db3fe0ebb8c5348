//! Fixed-step integration of a ball across the cloth.
//!
//! Within a phase the accelerations are constant, so each tick is advanced
//! with the tick-averaged velocity:
//!
//! ```text
//! v_new = v + a·h
//! x_new = x + 0.5·(v + v_new)·h
//! ```
//!
//! A tick that crosses a phase boundary is split at the boundary: the
//! sliding part runs only for the remaining sliding time, the rest of the
//! tick is spent rolling, and a rolling ball that would reverse stops
//! instead. This keeps the stepped ball on the same path the closed-form
//! trajectory predicts, whatever the timestep.

use crate::friction::{rolling_spin, FrictionModel};
use crate::types::{constants, BallProperties, BallState, MotionPhase, Vec3};

/// Result of an integration step, containing the new state and metadata.
#[derive(Debug, Clone, Copy)]
pub struct IntegrationResult {
    pub state: BallState,
    /// Part of the step spent sliding (s)
    pub sliding_time: f64,
    /// Part of the step spent rolling (s)
    pub rolling_time: f64,
}

/// Friction integrator for the sliding and rolling phases.
pub struct FrictionIntegrator;

impl FrictionIntegrator {
    /// Advance the ball state by one time step.
    ///
    /// # Arguments
    /// * `state` - Current ball state (position, velocity, spin, slip, phase)
    /// * `props` - Ball physical properties (radius is used)
    /// * `friction` - Friction law of the cloth
    /// * `dt` - Time step in seconds
    ///
    /// # Returns
    /// New ball state after the time step. A `Still` ball is returned unchanged.
    pub fn step(
        state: &BallState,
        props: &BallProperties,
        friction: &FrictionModel,
        dt: f64,
    ) -> IntegrationResult {
        let mut next = *state;
        let mut remaining = dt;
        let mut sliding_time = 0.0;
        let mut rolling_time = 0.0;

        if next.phase == MotionPhase::Sliding {
            let slip_dir = next.slip.normalized();
            let slide_left = friction.sliding_duration(&next.slip);
            let h = slide_left.min(remaining);

            let vel = next.vel - slip_dir * (friction.sliding_deceleration() * h);
            next.pos += (next.vel + vel) * (0.5 * h);
            next.vel = vel;
            next.spin -= slip_dir.cross(&constants::TABLE_NORMAL)
                * (friction.spin_acceleration(props.radius) * h);
            next.slip -= slip_dir * (friction.slip_deceleration() * h);

            sliding_time = h;
            remaining -= h;

            if slide_left <= dt {
                next.phase = MotionPhase::Rolling;
                next.slip = Vec3::ZERO;
                next.spin = rolling_spin(&next.vel, props.radius);
            }
        }

        if next.phase == MotionPhase::Rolling {
            let dir = next.vel.normalized();
            let stop_in = friction.rolling_duration(&next.vel);
            let h = stop_in.min(remaining);

            let vel = next.vel - dir * (friction.rolling_deceleration() * h);
            next.pos += (next.vel + vel) * (0.5 * h);

            if stop_in <= remaining {
                next.vel = Vec3::ZERO;
                next.phase = MotionPhase::Still;
            } else {
                next.vel = vel;
            }
            next.spin = rolling_spin(&next.vel, props.radius);
            rolling_time = h;
        }

        IntegrationResult {
            state: next,
            sliding_time,
            rolling_time,
        }
    }

    /// Advance the ball state by multiple steps of `dt`.
    ///
    /// Total time advanced is `steps * dt`.
    pub fn step_n(
        state: &BallState,
        props: &BallProperties,
        friction: &FrictionModel,
        dt: f64,
        steps: usize,
    ) -> IntegrationResult {
        let mut current = IntegrationResult {
            state: *state,
            sliding_time: 0.0,
            rolling_time: 0.0,
        };

        for _ in 0..steps {
            let result = Self::step(&current.state, props, friction, dt);
            current = IntegrationResult {
                state: result.state,
                sliding_time: current.sliding_time + result.sliding_time,
                rolling_time: current.rolling_time + result.rolling_time,
            };
        }

        current
    }
}

// =============================================================================
// Tests
// =============================================================================
