//! Core types for the motion model.
//!
//! All units are SI:
//! - Position: meters (m)
//! - Velocity: meters per second (m/s)
//! - Angular velocity (spin): radians per second (rad/s)
//! - Mass: kilograms (kg)
//! - Impulse: Newton seconds (N·s)

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use crate::error::PhysicsError;

// =============================================================================
// Vec3 - 3D Vector
// =============================================================================

/// A 3D vector used for positions, velocities and spin.
///
/// Coordinate system (table frame):
/// - X: along the table length
/// - Y: along the table width
/// - Z: table normal (positive upward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared magnitude (avoids sqrt for comparisons)
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Magnitude (length) of the vector
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a unit vector in the same direction, or zero if magnitude is zero.
    ///
    /// Every friction direction in the model goes through here, so a ball
    /// that has just stopped slipping or rolling never produces NaN.
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < constants::EPSILON {
            Self::ZERO
        } else {
            *self / mag
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Reflect vector around a normal
    pub fn reflect(&self, normal: &Self) -> Self {
        *self - *normal * 2.0 * self.dot(normal)
    }

    /// Rotate about the Z axis (the table normal) by `angle` radians.
    pub fn rotate_z(&self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
            z: self.z,
        }
    }

    /// Component lying in the table plane.
    pub fn horizontal(&self) -> Self {
        Self::new(self.x, self.y, 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// Operator overloads for Vec3
impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

// =============================================================================
// Motion Phase
// =============================================================================

/// Kinematic phase of a ball on the cloth.
///
/// Phases only ever advance `Sliding -> Rolling -> Still`. A new strike is the
/// only way back to `Sliding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MotionPhase {
    /// At rest.
    #[default]
    Still,
    /// The contact point slips over the cloth (Coulomb friction).
    Sliding,
    /// The contact point is at rest relative to the cloth (rolling resistance).
    Rolling,
}

impl MotionPhase {
    /// Position in the `Sliding -> Rolling -> Still` order.
    pub fn order(self) -> u8 {
        match self {
            MotionPhase::Sliding => 0,
            MotionPhase::Rolling => 1,
            MotionPhase::Still => 2,
        }
    }
}

// =============================================================================
// Ball State
// =============================================================================

/// Complete kinematic state of a ball at a given instant.
///
/// `slip` is the velocity of the contact point relative to the cloth,
/// `vel + radius * n × spin`. It is carried alongside `vel` and `spin` because
/// the sliding phase is driven by its direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub pos: Vec3,
    pub vel: Vec3,
    pub spin: Vec3,
    pub slip: Vec3,
    pub phase: MotionPhase,
}

impl BallState {
    /// Ball at rest at a given position
    pub fn at_rest(pos: Vec3) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
            spin: Vec3::ZERO,
            slip: Vec3::ZERO,
            phase: MotionPhase::Still,
        }
    }

    /// Kinetic energy (translational + rotational)
    pub fn kinetic_energy(&self, ball_props: &BallProperties) -> f64 {
        let translational = 0.5 * ball_props.mass * self.vel.magnitude_squared();
        let rotational = 0.5 * ball_props.moment_of_inertia() * self.spin.magnitude_squared();
        translational + rotational
    }
}

impl Default for BallState {
    fn default() -> Self {
        Self::at_rest(Vec3::ZERO)
    }
}

// =============================================================================
// Table Bounds
// =============================================================================

/// The playing area, bounded by the four cushion noses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl TableBounds {
    /// Table centred on the origin with the given half extents.
    pub fn centered(half_length: f64, half_width: f64) -> Self {
        Self {
            min_x: -half_length,
            max_x: half_length,
            min_y: -half_width,
            max_y: half_width,
        }
    }

    /// Nine-foot table: 2.54m x 1.27m between the cushion noses.
    pub fn nine_foot() -> Self {
        Self::centered(1.27, 0.635)
    }

    /// Check if a point (x, y) is within the cushions
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Both extents must be finite and wider than a ball of `radius`.
    pub fn validate(&self, radius: f64) -> Result<(), PhysicsError> {
        let length = self.max_x - self.min_x;
        let width = self.max_y - self.min_y;
        let diameter = 2.0 * radius;
        if !(length.is_finite() && width.is_finite() && length > diameter && width > diameter) {
            return Err(PhysicsError::InvalidTable {
                length,
                width,
                diameter,
            });
        }
        Ok(())
    }
}

impl Default for TableBounds {
    fn default() -> Self {
        Self::nine_foot()
    }
}

// =============================================================================
// Material Properties
// =============================================================================

/// Physical properties of a ball.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallProperties {
    pub name: String,
    pub mass: f64,
    pub radius: f64,
}

impl BallProperties {
    /// Regulation pool ball: 57.15mm diameter, 170g.
    pub fn regulation() -> Self {
        Self {
            name: "Regulation pool ball".to_string(),
            mass: 0.17,
            radius: 0.028575,
        }
    }

    /// Solid sphere: I = (2/5) * m * r^2
    pub fn moment_of_inertia(&self) -> f64 {
        0.4 * self.mass * self.radius * self.radius
    }

    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(PhysicsError::InvalidMass(self.mass));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(PhysicsError::InvalidRadius(self.radius));
        }
        Ok(())
    }
}

impl Default for BallProperties {
    fn default() -> Self {
        Self::regulation()
    }
}

/// Friction properties of the cloth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothProperties {
    pub name: String,
    /// Coulomb coefficient between ball and cloth while sliding.
    pub sliding_friction: f64,
    /// Rolling resistance coefficient.
    pub rolling_friction: f64,
}

impl ClothProperties {
    pub fn standard() -> Self {
        Self {
            name: "Standard napped cloth".to_string(),
            sliding_friction: 0.2,
            rolling_friction: 0.015,
        }
    }
}

impl Default for ClothProperties {
    fn default() -> Self {
        Self::standard()
    }
}

/// Properties of a cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueProperties {
    pub name: String,
    pub mass: f64,
}

impl CueProperties {
    /// 21 ounce house cue.
    pub fn house() -> Self {
        Self {
            name: "House cue 21oz".to_string(),
            mass: 0.59,
        }
    }
}

impl Default for CueProperties {
    fn default() -> Self {
        Self::house()
    }
}

// =============================================================================
// Contact Types
// =============================================================================

/// One of the four cushions of a rectangular table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cushion {
    /// At `min_x`
    Left,
    /// At `max_x`
    Right,
    /// At `min_y`
    Bottom,
    /// At `max_y`
    Top,
}

/// What a ball touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactTarget {
    Cushion(Cushion),
    /// Another ball, by index in the simulation
    Ball(usize),
}

/// Detailed contact information.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub target: ContactTarget,
    /// Point on the cushion nose (or between the two balls)
    pub point: Vec3,
    /// Unit normal pointing from the obstacle towards the ball
    pub normal: Vec3,
    pub penetration: f64,
}

// =============================================================================
// Physical Constants
// =============================================================================

/// Physical constants used in the simulation.
pub mod constants {
    use super::Vec3;

    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f64 = 9.81;

    /// Table normal, pointing away from the slate
    pub const TABLE_NORMAL: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    /// Small value for floating-point comparisons
    pub const EPSILON: f64 = 1e-10;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a - b, Vec3::new(-3.0, -3.0, -3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(a.dot(&b), 32.0); // 1*4 + 2*5 + 3*6 = 32
    }

    #[test]
    fn test_vec3_cross_product() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        let z = x.cross(&y);
        assert!((z.x).abs() < 1e-10);
        assert!((z.y).abs() < 1e-10);
        assert!((z.z - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_vec3_normalized() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        let n = v.normalized();
        assert!((n.magnitude() - 1.0).abs() < 1e-10);
        assert!((n.x - 0.6).abs() < 1e-10);
        assert!((n.y - 0.8).abs() < 1e-10);
    }

    #[test]
    fn test_normalized_zero_is_zero() {
        let n = Vec3::ZERO.normalized();
        assert_eq!(n, Vec3::ZERO);
        assert!(n.is_finite());
    }

    #[test]
    fn test_reflect_along_normal() {
        let v = Vec3::new(3.0, 0.0, 0.0);
        let r = v.reflect(&Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(r, Vec3::new(-3.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotate_z_quarter_turn() {
        let v = Vec3::new(1.0, 0.0, 0.5);
        let r = v.rotate_z(std::f64::consts::FRAC_PI_2);
        assert!(r.x.abs() < 1e-12);
        assert!((r.y - 1.0).abs() < 1e-12);
        assert_eq!(r.z, 0.5);
    }

    #[test]
    fn test_table_bounds() {
        let table = TableBounds::nine_foot();
        assert!(table.contains(0.0, 0.0));
        assert!(table.contains(1.0, 0.5));
        assert!(!table.contains(1.5, 0.0)); // beyond the foot cushion
    }

    #[test]
    fn test_table_validation() {
        let radius = BallProperties::regulation().radius;
        assert!(TableBounds::nine_foot().validate(radius).is_ok());

        let inverted = TableBounds {
            min_x: 1.0,
            max_x: -1.0,
            ..TableBounds::nine_foot()
        };
        assert!(matches!(
            inverted.validate(radius),
            Err(PhysicsError::InvalidTable { .. })
        ));

        // Narrower than one ball
        let narrow = TableBounds::centered(1.0, 0.9 * radius);
        assert!(narrow.validate(radius).is_err());

        let unbounded = TableBounds::centered(f64::INFINITY, 0.5);
        assert!(unbounded.validate(radius).is_err());
    }

    #[test]
    fn test_moment_of_inertia() {
        let ball = BallProperties {
            name: "unit".to_string(),
            mass: 1.0,
            radius: 2.0,
        };
        assert!((ball.moment_of_inertia() - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_ball_validation() {
        assert!(BallProperties::regulation().validate().is_ok());
        let heavy_nothing = BallProperties {
            mass: 0.0,
            ..BallProperties::regulation()
        };
        assert_eq!(heavy_nothing.validate(), Err(PhysicsError::InvalidMass(0.0)));
    }

    #[test]
    fn test_ball_kinetic_energy() {
        let ball_props = BallProperties::regulation();
        let state = BallState {
            vel: Vec3::new(2.0, 0.0, 0.0),
            ..BallState::default()
        };
        // KE = 0.5 * 0.17 * 4 = 0.34 J (translational only)
        assert!((state.kinetic_energy(&ball_props) - 0.34).abs() < 1e-12);
    }

    #[test]
    fn test_phase_order() {
        assert!(MotionPhase::Sliding.order() < MotionPhase::Rolling.order());
        assert!(MotionPhase::Rolling.order() < MotionPhase::Still.order());
    }
}
