//! Cue strike: impulse, initial velocity and spin of the struck ball.
//!
//! The cue hits the ball face at offset `(a, b)` from its centre (`a`
//! lateral, `b` vertical) while inclined `θ` above the table. Treating the
//! strike as an instantaneous impulse between cue and ball gives the impulse
//! magnitude:
//!
//! ```text
//!                         2·M·V
//! F = ──────────────────────────────────────────────
//!     1 + m/M + 5/(2R²)·(a² + (b·cosθ − c·sinθ)²)
//!
//! with c = sqrt(R² − a² − b²), M/V the cue mass and speed, m/R the ball's.
//! ```
//!
//! Results are expressed in the shot frame: `x` lateral, `y` along the cue
//! (the ball leaves towards `-y`), `z` the table normal. The vertical part of
//! the impulse is taken up by the slate, so only the in-plane velocity
//! survives into the free motion.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;
use crate::friction::{contact_velocity, FrictionModel};
use crate::types::{BallProperties, CueProperties, Vec3};

/// Shallowest cue elevation the aiming layer allows (radians).
pub const MIN_ELEVATION: f64 = 0.01;
/// Steepest cue elevation the aiming layer allows (radians).
pub const MAX_ELEVATION: f64 = FRAC_PI_4;

/// Relative slack on the ball face boundary, absorbing rounding at the rim.
const RIM_TOLERANCE: f64 = 1e-9;

/// Description of a single cue strike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeInput {
    /// Lateral contact offset from the ball centre (m)
    pub a: f64,
    /// Vertical contact offset from the ball centre (m)
    pub b: f64,
    /// Cue elevation above the table plane (rad)
    pub elevation: f64,
    /// Direction of the cue around the ball in the table plane (rad).
    /// The ball travels the opposite way.
    pub forward_angle: f64,
    pub cue_mass: f64,
    pub cue_speed: f64,
}

impl Default for StrikeInput {
    fn default() -> Self {
        Self {
            a: 0.0,
            b: 0.0,
            elevation: 0.0,
            forward_angle: 0.0,
            cue_mass: CueProperties::default().mass,
            cue_speed: 0.5,
        }
    }
}

impl StrikeInput {
    /// Centre-ball strike with a level cue.
    pub fn new(forward_angle: f64, cue_speed: f64) -> Self {
        Self {
            forward_angle,
            cue_speed,
            ..Self::default()
        }
    }

    pub fn with_offset(mut self, a: f64, b: f64) -> Self {
        self.a = a;
        self.b = b;
        self
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn with_cue(mut self, cue: &CueProperties) -> Self {
        self.cue_mass = cue.mass;
        self
    }

    pub fn with_cue_mass(mut self, cue_mass: f64) -> Self {
        self.cue_mass = cue_mass;
        self
    }

    /// Pull the elevation into `[MIN_ELEVATION, MAX_ELEVATION]` and the
    /// contact point onto the face of a ball of `radius`.
    pub fn clamped(mut self, radius: f64) -> Self {
        self.elevation = self.elevation.clamp(MIN_ELEVATION, MAX_ELEVATION);
        let offset = (self.a * self.a + self.b * self.b).sqrt();
        if offset > radius {
            let scale = radius / offset;
            self.a *= scale;
            self.b *= scale;
        }
        self
    }
}

/// Initial conditions produced by a strike, in the shot frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeOutcome {
    /// Impulse magnitude transferred by the cue (N·s)
    pub force: f64,
    /// Full velocity impulse, including the part pressed into the slate
    pub impulse_velocity: Vec3,
    /// In-plane velocity the ball leaves with
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Contact-point velocity relative to the cloth
    pub relative_velocity: Vec3,
    /// Time until the ball stops slipping (s)
    pub sliding_duration: f64,
}

impl StrikeOutcome {
    /// Rotate the outcome from the shot frame into the table frame.
    pub fn to_table(&self, forward_angle: f64) -> Self {
        Self {
            impulse_velocity: shot_to_table(&self.impulse_velocity, forward_angle),
            velocity: shot_to_table(&self.velocity, forward_angle),
            angular_velocity: shot_to_table(&self.angular_velocity, forward_angle),
            relative_velocity: shot_to_table(&self.relative_velocity, forward_angle),
            ..*self
        }
    }
}

/// Map a shot-frame vector into the table frame.
///
/// The shot frame's `+y` axis (towards the cue) lands on
/// `(cos forward_angle, sin forward_angle)`.
pub fn shot_to_table(v: &Vec3, forward_angle: f64) -> Vec3 {
    v.rotate_z(forward_angle - FRAC_PI_2)
}

/// Closed-form cue strike solver.
pub struct StrikeSolver;

impl StrikeSolver {
    /// Solve a strike on a ball at rest.
    ///
    /// # Errors
    /// - `InvalidStrikeGeometry` if `a² + b² > R²` or any angle/offset is not finite
    /// - `InvalidMass` / `InvalidRadius` for bad ball or cue properties
    /// - `InvalidStrikeSpeed` for a negative or non-finite cue speed
    pub fn solve(
        ball: &BallProperties,
        friction: &FrictionModel,
        input: &StrikeInput,
    ) -> Result<StrikeOutcome, PhysicsError> {
        ball.validate()?;
        if !(input.cue_mass.is_finite() && input.cue_mass > 0.0) {
            return Err(PhysicsError::InvalidMass(input.cue_mass));
        }
        if !(input.cue_speed.is_finite() && input.cue_speed >= 0.0) {
            return Err(PhysicsError::InvalidStrikeSpeed(input.cue_speed));
        }

        let radius = ball.radius;
        let (a, b) = (input.a, input.b);
        let a_sq = a * a;
        let b_sq = b * b;
        let radius_sq = radius * radius;

        let geometry_finite =
            a.is_finite() && b.is_finite() && input.elevation.is_finite() && input.forward_angle.is_finite();
        if !geometry_finite || a_sq + b_sq > radius_sq * (1.0 + RIM_TOLERANCE) {
            return Err(PhysicsError::InvalidStrikeGeometry { a, b, radius });
        }

        let c = (radius_sq - a_sq - b_sq).max(0.0).sqrt().abs();
        let (sin, cos) = input.elevation.sin_cos();

        // a² + b²cos²θ + c²sin²θ − 2bc·cosθ·sinθ
        // Scaled by 5/(2R²) as in Leckie & Greenspan, not 5/(2R)
        let offset_term = a_sq + b_sq * cos * cos + c * c * sin * sin - 2.0 * b * c * cos * sin;
        let force = 2.0 * input.cue_mass * input.cue_speed
            / (1.0 + ball.mass / input.cue_mass + (5.0 / (2.0 * radius_sq)) * offset_term);

        let angular_impulse = Vec3::new(
            -c * force * sin + b * force * cos,
            a * force * sin,
            -a * force * cos,
        );
        let angular_velocity = angular_impulse / ball.moment_of_inertia();

        let speed = force / ball.mass;
        let impulse_velocity = Vec3::new(0.0, -speed * cos, -speed * sin);
        let velocity = impulse_velocity.horizontal();

        let relative_velocity = contact_velocity(&velocity, &angular_velocity, radius);
        let sliding_duration = friction.sliding_duration(&relative_velocity);

        tracing::debug!(
            force,
            ?velocity,
            ?angular_velocity,
            sliding_duration,
            "cue strike solved"
        );

        Ok(StrikeOutcome {
            force,
            impulse_velocity,
            velocity,
            angular_velocity,
            relative_velocity,
            sliding_duration,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
