//! # Pool Core
//!
//! Analytic motion model for billiard balls on a cloth table.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (Vec3, ball state, material properties)
//! - `strike`: Cue strike impulse, initial velocity and spin
//! - `friction`: Sliding and rolling friction law
//! - `integrator`: Fixed-step integration of the friction law
//! - `trajectory`: Closed-form evaluation at any time
//! - `model`: Per-ball state machine (Sliding -> Rolling -> Still)
//! - `collision`: Cushion and ball contact detection and resolution
//! - `materials`: YAML-based material configuration loader
//! - `simulation`: Fixed-step driver for a table of balls
//!
//! ## Example
//!
//! ```
//! use pool_core::model::BallMotionModel;
//! use pool_core::strike::StrikeInput;
//! use pool_core::friction::FrictionModel;
//! use pool_core::types::{BallProperties, Vec3};
//!
//! let mut ball = BallMotionModel::new(
//!     BallProperties::regulation(),
//!     FrictionModel::default(),
//!     Vec3::ZERO,
//! )?;
//! ball.strike(&StrikeInput::new(0.0, 0.4).with_offset(0.0, 0.01))?;
//!
//! let stop = ball.rest_position();
//! while !ball.is_still() {
//!     ball.step(1.0 / 120.0)?;
//! }
//! assert!((ball.position() - stop).magnitude() < 1e-9);
//! # Ok::<(), pool_core::error::PhysicsError>(())
//! ```

pub mod collision;
pub mod error;
pub mod friction;
pub mod integrator;
pub mod materials;
pub mod model;
pub mod simulation;
pub mod strike;
pub mod time;
pub mod trajectory;
pub mod types;

pub use error::PhysicsError;
pub use model::{BallMotionModel, EvaluationMode};
pub use simulation::{Simulation, SimulationConfig};
pub use strike::{StrikeInput, StrikeOutcome, StrikeSolver};
pub use types::{BallState, MotionPhase, Vec3};
