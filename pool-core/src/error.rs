//! Error types for the motion model.

use std::fmt;

/// Errors raised by strikes, stepping and trajectory queries.
///
/// All of these are caller errors. The model is deterministic, so nothing is
/// worth retrying.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// The cue contact point `(a, b)` lies outside the ball face.
    InvalidStrikeGeometry { a: f64, b: f64, radius: f64 },
    /// Cue speed must be finite and non-negative.
    InvalidStrikeSpeed(f64),
    /// Mass must be positive and finite.
    InvalidMass(f64),
    /// Radius must be positive and finite.
    InvalidRadius(f64),
    /// Friction coefficients must be positive and finite.
    InvalidFriction(f64),
    /// Timestep must be positive and finite.
    InvalidTimeStep(f64),
    /// A trajectory was queried before its snapshot was taken.
    InvalidQueryTime { time: f64, earliest: f64 },
    /// Ball index is out of bounds.
    BallOutOfBounds { index: usize, count: usize },
    /// The cushions leave no room for a ball between them.
    InvalidTable { length: f64, width: f64, diameter: f64 },
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::InvalidStrikeGeometry { a, b, radius } => write!(
                f,
                "cue contact ({}, {}) lies outside a ball of radius {}",
                a, b, radius
            ),
            PhysicsError::InvalidStrikeSpeed(v) => {
                write!(f, "cue speed must be finite and non-negative, got {}", v)
            }
            PhysicsError::InvalidMass(m) => write!(f, "mass must be positive and finite, got {}", m),
            PhysicsError::InvalidRadius(r) => {
                write!(f, "radius must be positive and finite, got {}", r)
            }
            PhysicsError::InvalidFriction(mu) => {
                write!(f, "friction coefficient must be positive and finite, got {}", mu)
            }
            PhysicsError::InvalidTimeStep(dt) => {
                write!(f, "timestep must be positive and finite, got {}", dt)
            }
            PhysicsError::InvalidQueryTime { time, earliest } => write!(
                f,
                "trajectory queried at t={} but it starts at t={}",
                time, earliest
            ),
            PhysicsError::BallOutOfBounds { index, count } => {
                write!(f, "ball index {} out of bounds (count: {})", index, count)
            }
            PhysicsError::InvalidTable {
                length,
                width,
                diameter,
            } => write!(
                f,
                "table {} x {} has no room for a ball of diameter {}",
                length, width, diameter
            ),
        }
    }
}

impl std::error::Error for PhysicsError {}
