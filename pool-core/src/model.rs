//! Motion model of a single ball.
//!
//! `BallMotionModel` owns one ball's state machine:
//!
//! ```text
//!   strike          slip reaches 0         speed reaches 0
//! ─────────▶ Sliding ──────────────▶ Rolling ──────────────▶ Still
//! ```
//!
//! and offers two ways to move it forward:
//!
//! - **Discrete**: [`BallMotionModel::step`] advances the live state one
//!   fixed tick with [`FrictionIntegrator`] (or, in
//!   [`EvaluationMode::Analytic`], re-evaluates the closed form at the new
//!   elapsed time).
//! - **Closed form**: the `*_at` queries evaluate the current
//!   [`Trajectory`] at any elapsed time without touching the live state.
//!
//! Both run in the table frame. The strike is solved in the shot frame and
//! rotated by the forward angle once, when it is applied.

use serde::{Deserialize, Serialize};

use crate::collision::ContactResolver;
use crate::error::PhysicsError;
use crate::friction::FrictionModel;
use crate::integrator::FrictionIntegrator;
use crate::strike::{StrikeInput, StrikeOutcome, StrikeSolver};
use crate::trajectory::Trajectory;
use crate::types::{BallProperties, BallState, MotionPhase, Vec3};

/// How [`BallMotionModel::step`] produces the next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    /// Integrate the friction law tick by tick.
    #[default]
    Integrated,
    /// Evaluate the closed-form trajectory at the new elapsed time.
    Analytic,
}

/// One ball on the cloth.
#[derive(Debug, Clone)]
pub struct BallMotionModel {
    props: BallProperties,
    friction: FrictionModel,
    mode: EvaluationMode,
    state: BallState,
    /// Snapshot taken at the strike or at the last cushion contact
    trajectory: Trajectory,
    forward_angle: f64,
    /// Time since the last strike (s)
    elapsed: f64,
}

impl BallMotionModel {
    /// Ball at rest at `position`.
    ///
    /// # Errors
    /// `InvalidMass`, `InvalidRadius` or `InvalidFriction` for bad parameters.
    pub fn new(
        props: BallProperties,
        friction: FrictionModel,
        position: Vec3,
    ) -> Result<Self, PhysicsError> {
        props.validate()?;
        friction.validate()?;

        let position = position.horizontal();
        Ok(Self {
            trajectory: Trajectory::at_rest(0.0, position, props.radius, friction),
            props,
            friction,
            mode: EvaluationMode::default(),
            state: BallState::at_rest(position),
            forward_angle: 0.0,
            elapsed: 0.0,
        })
    }

    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Stop the ball where it is and clear the elapsed time.
    pub fn reset(&mut self) {
        self.place(self.state.pos);
    }

    /// Put the ball at rest at `position`.
    pub fn place(&mut self, position: Vec3) {
        let position = position.horizontal();
        self.state = BallState::at_rest(position);
        self.trajectory = Trajectory::at_rest(0.0, position, self.props.radius, self.friction);
        self.elapsed = 0.0;
    }

    /// Strike the ball with the cue.
    ///
    /// Any previous motion is discarded. Returns the solved strike in the
    /// shot frame.
    pub fn strike(&mut self, input: &StrikeInput) -> Result<StrikeOutcome, PhysicsError> {
        let outcome = StrikeSolver::solve(&self.props, &self.friction, input)?;
        let table = outcome.to_table(input.forward_angle);

        self.forward_angle = input.forward_angle;
        self.elapsed = 0.0;
        self.state = BallState {
            pos: self.state.pos,
            vel: table.velocity,
            spin: table.angular_velocity,
            slip: table.relative_velocity,
            phase: MotionPhase::Sliding,
        };
        self.trajectory = Trajectory::new(0.0, self.state, self.props.radius, self.friction);

        tracing::debug!(
            forward_angle = input.forward_angle,
            vel = ?self.state.vel,
            sliding_duration = outcome.sliding_duration,
            "ball struck"
        );

        Ok(outcome)
    }

    /// Advance the ball by one fixed tick of `dt` seconds.
    ///
    /// A still ball is left untouched. Returns the phase after the tick.
    ///
    /// # Errors
    /// `InvalidTimeStep` if `dt` is not positive and finite.
    pub fn step(&mut self, dt: f64) -> Result<MotionPhase, PhysicsError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PhysicsError::InvalidTimeStep(dt));
        }
        if self.state.phase == MotionPhase::Still {
            return Ok(MotionPhase::Still);
        }

        let before = self.state.phase;
        self.elapsed += dt;
        self.state = match self.mode {
            EvaluationMode::Integrated => {
                FrictionIntegrator::step(&self.state, &self.props, &self.friction, dt).state
            }
            EvaluationMode::Analytic => self.trajectory.state_at(self.elapsed)?,
        };

        if self.state.phase != before {
            tracing::debug!(
                from = ?before,
                to = ?self.state.phase,
                elapsed = self.elapsed,
                pos = ?self.state.pos,
                "phase transition"
            );
        }
        tracing::trace!(
            elapsed = self.elapsed,
            pos = ?self.state.pos,
            vel = ?self.state.vel,
            "tick"
        );

        Ok(self.state.phase)
    }

    /// Bounce off a wall through `wall_point` whose normal faces the ball.
    ///
    /// The ball is pushed clear of the wall and, if it was heading into it,
    /// its velocity is reflected. The closed-form snapshot is re-taken at
    /// the current elapsed time, so earlier `*_at` queries are no longer
    /// answerable. Returns whether the velocity was reflected.
    pub fn collide_wall(&mut self, wall_point: &Vec3, wall_normal: &Vec3) -> bool {
        let resolution = ContactResolver::resolve_cushion(
            &self.state,
            self.props.radius,
            wall_point,
            wall_normal,
        );

        if resolution.state != self.state {
            self.state = resolution.state;
            self.trajectory =
                Trajectory::new(self.elapsed, self.state, self.props.radius, self.friction);
        }

        if resolution.reflected {
            tracing::debug!(
                elapsed = self.elapsed,
                pos = ?self.state.pos,
                vel = ?self.state.vel,
                "wall contact"
            );
        }
        resolution.reflected
    }

    /// Contact with another ball. Reported only; the state is unchanged.
    pub fn collide_ball(
        &self,
        other_position: &Vec3,
        collision_normal: &Vec3,
        other_velocity: &Vec3,
        other_angular_velocity: &Vec3,
    ) {
        tracing::debug!(
            pos = ?self.state.pos,
            other_pos = ?other_position,
            normal = ?collision_normal,
            other_vel = ?other_velocity,
            other_spin = ?other_angular_velocity,
            "ball-ball contact left unresolved"
        );
    }

    // =========================================================================
    // Closed-form queries (elapsed time since the strike)
    // =========================================================================

    pub fn state_at(&self, time: f64) -> Result<BallState, PhysicsError> {
        self.trajectory.state_at(time)
    }

    pub fn velocity_at(&self, time: f64) -> Result<Vec3, PhysicsError> {
        self.trajectory.velocity_at(time)
    }

    pub fn angular_velocity_at(&self, time: f64) -> Result<Vec3, PhysicsError> {
        self.trajectory.angular_velocity_at(time)
    }

    pub fn relative_velocity_at(&self, time: f64) -> Result<Vec3, PhysicsError> {
        self.trajectory.relative_velocity_at(time)
    }

    pub fn position_at(&self, time: f64) -> Result<Vec3, PhysicsError> {
        self.trajectory.position_at(time)
    }

    pub fn phase_at(&self, time: f64) -> Result<MotionPhase, PhysicsError> {
        self.trajectory.phase_at(time)
    }

    /// Elapsed time at which the ball stops slipping.
    pub fn sliding_end_time(&self) -> f64 {
        self.trajectory.sliding_end_time()
    }

    /// Elapsed time at which the ball comes to rest, barring contacts.
    pub fn time_to_rest(&self) -> f64 {
        self.trajectory.rest_time()
    }

    pub fn sliding_end_position(&self) -> Vec3 {
        self.trajectory.sliding_end_position()
    }

    /// Where the ball will stop, barring contacts.
    pub fn rest_position(&self) -> Vec3 {
        self.trajectory.rest_position()
    }

    // =========================================================================
    // Live state
    // =========================================================================

    pub fn state(&self) -> &BallState {
        &self.state
    }

    pub fn phase(&self) -> MotionPhase {
        self.state.phase
    }

    pub fn is_still(&self) -> bool {
        self.state.phase == MotionPhase::Still
    }

    pub fn position(&self) -> Vec3 {
        self.state.pos
    }

    pub fn velocity(&self) -> Vec3 {
        self.state.vel
    }

    pub fn angular_velocity(&self) -> Vec3 {
        self.state.spin
    }

    pub fn relative_velocity(&self) -> Vec3 {
        self.state.slip
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.state.kinetic_energy(&self.props)
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Sliding time of the current snapshot.
    pub fn sliding_duration(&self) -> f64 {
        self.trajectory.sliding_duration()
    }

    pub fn forward_angle(&self) -> f64 {
        self.forward_angle
    }

    pub fn first_position(&self) -> Vec3 {
        self.trajectory.origin().pos
    }

    pub fn first_velocity(&self) -> Vec3 {
        self.trajectory.origin().vel
    }

    pub fn first_angular_velocity(&self) -> Vec3 {
        self.trajectory.origin().spin
    }

    pub fn first_relative_velocity(&self) -> Vec3 {
        self.trajectory.origin().slip
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn props(&self) -> &BallProperties {
        &self.props
    }

    pub fn friction(&self) -> &FrictionModel {
        &self.friction
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }
}

// =============================================================================
// Tests
// =============================================================================
