//! Contact resolution.
//!
//! Computes the post-contact ball state for:
//! - Cushions: perfectly elastic reflection of the velocity about the
//!   cushion normal, with the centre pushed back onto the cloth
//! - Other balls: not resolved, the contact is only reported
//!
//! ## Model Assumptions
//!
//! - **Rigid, frictionless cushion**: only the normal velocity component
//!   flips; the tangential component and the spin are untouched.
//! - **No phase regression**: a sliding ball keeps sliding with its slip
//!   re-derived from the reflected velocity, and a rolling ball keeps
//!   rolling with its spin re-aligned to the new direction.
//!
//! ```text
//! Incoming ball reaching the right cushion:
//!
//!        ●──→  ║
//!              ║  normal ←
//!        ●←──  ║
//! ```

use crate::friction::{contact_velocity, rolling_spin};
use crate::types::{constants, BallState, ContactInfo, ContactTarget, MotionPhase, Vec3};

/// Reflect `vel` about the plane with unit normal `normal`.
///
/// Only a velocity moving into the plane (`vel · n < 0`) is reflected;
/// anything else is returned unchanged.
pub fn reflect_velocity(vel: &Vec3, normal: &Vec3) -> Vec3 {
    if vel.dot(normal) < 0.0 {
        vel.reflect(normal)
    } else {
        *vel
    }
}

/// Result of resolving a contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub state: BallState,
    /// Whether the velocity was reflected
    pub reflected: bool,
}

/// Contact resolver for balls on the cloth.
pub struct ContactResolver;

impl ContactResolver {
    /// Resolve a detected contact and return the new ball state.
    pub fn resolve(ball: &BallState, radius: f64, contact: &ContactInfo) -> Resolution {
        match contact.target {
            ContactTarget::Cushion(_) => {
                Self::resolve_cushion(ball, radius, &contact.point, &contact.normal)
            }
            ContactTarget::Ball(index) => {
                tracing::debug!(
                    other = index,
                    penetration = contact.penetration,
                    "ball-ball contact left unresolved"
                );
                Resolution {
                    state: *ball,
                    reflected: false,
                }
            }
        }
    }

    /// Resolve contact with a flat wall through `point` with normal `normal`.
    ///
    /// The normal is normalised first and is expected to point from the wall
    /// towards the ball. A zero normal leaves the ball untouched. A still
    /// ball is only pushed clear of the wall.
    pub fn resolve_cushion(
        ball: &BallState,
        radius: f64,
        point: &Vec3,
        normal: &Vec3,
    ) -> Resolution {
        let normal = normal.horizontal().normalized();
        if normal.magnitude_squared() < constants::EPSILON {
            tracing::warn!("wall contact with zero normal ignored");
            return Resolution {
                state: *ball,
                reflected: false,
            };
        }

        let mut next = *ball;

        let clearance = (ball.pos - *point).dot(&normal);
        if clearance < radius {
            next.pos += normal * (radius - clearance);
        }

        let reflected = ball.phase != MotionPhase::Still && ball.vel.dot(&normal) < 0.0;
        if !reflected {
            return Resolution {
                state: next,
                reflected,
            };
        }

        next.vel = reflect_velocity(&ball.vel, &normal);
        match next.phase {
            MotionPhase::Sliding => {
                next.slip = contact_velocity(&next.vel, &next.spin, radius);
            }
            MotionPhase::Rolling => {
                next.spin = rolling_spin(&next.vel, radius);
            }
            MotionPhase::Still => {}
        }

        tracing::trace!(?normal, vel = ?next.vel, "cushion reflection");

        Resolution {
            state: next,
            reflected,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
