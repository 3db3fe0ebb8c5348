//! Contact detection on a rectangular table.
//!
//! Detection is positional: a ball is in contact with a cushion once its
//! centre comes within one radius of the cushion nose, and with another
//! ball once the centres are closer than the sum of the radii. Contacts
//! are reported for the tick in which they happen, after all balls moved.

use crate::types::{constants, ContactInfo, ContactTarget, Cushion, TableBounds, Vec3};

/// Contact detector for a set of balls on one table.
pub struct ContactDetector;

impl ContactDetector {
    /// Cushions the ball is touching or pressing into.
    ///
    /// A ball in a corner touches two cushions; both are reported. The
    /// normal of each contact points back onto the cloth.
    pub fn cushion_contacts(pos: &Vec3, radius: f64, table: &TableBounds) -> Vec<ContactInfo> {
        let mut contacts = Vec::new();

        let left = pos.x - radius - table.min_x;
        if left < 0.0 {
            contacts.push(Self::cushion(
                Cushion::Left,
                Vec3::new(table.min_x, pos.y, pos.z),
                Vec3::new(1.0, 0.0, 0.0),
                -left,
            ));
        }

        let right = table.max_x - (pos.x + radius);
        if right < 0.0 {
            contacts.push(Self::cushion(
                Cushion::Right,
                Vec3::new(table.max_x, pos.y, pos.z),
                Vec3::new(-1.0, 0.0, 0.0),
                -right,
            ));
        }

        let bottom = pos.y - radius - table.min_y;
        if bottom < 0.0 {
            contacts.push(Self::cushion(
                Cushion::Bottom,
                Vec3::new(pos.x, table.min_y, pos.z),
                Vec3::new(0.0, 1.0, 0.0),
                -bottom,
            ));
        }

        let top = table.max_y - (pos.y + radius);
        if top < 0.0 {
            contacts.push(Self::cushion(
                Cushion::Top,
                Vec3::new(pos.x, table.max_y, pos.z),
                Vec3::new(0.0, -1.0, 0.0),
                -top,
            ));
        }

        contacts
    }

    /// Contact between ball `a` and ball `b`, if they overlap.
    ///
    /// The reported normal points from `b` towards `a`, so it can be handed
    /// to ball `a` as the surface normal of the obstacle it hit.
    pub fn ball_contact(
        pos_a: &Vec3,
        radius_a: f64,
        pos_b: &Vec3,
        radius_b: f64,
        index_b: usize,
    ) -> Option<ContactInfo> {
        let offset = (*pos_a - *pos_b).horizontal();
        let distance = offset.magnitude();
        let reach = radius_a + radius_b;

        if distance >= reach {
            return None;
        }

        // Concentric balls have no meaningful normal
        if distance < constants::EPSILON {
            return None;
        }

        let normal = offset / distance;
        Some(ContactInfo {
            target: ContactTarget::Ball(index_b),
            point: *pos_b + normal * radius_b,
            normal,
            penetration: reach - distance,
        })
    }

    fn cushion(cushion: Cushion, point: Vec3, normal: Vec3, penetration: f64) -> ContactInfo {
        ContactInfo {
            target: ContactTarget::Cushion(cushion),
            point,
            normal,
            penetration,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const RADIUS: f64 = 0.028575;

    fn table() -> TableBounds {
        TableBounds::nine_foot()
    }

    #[test]
    fn test_centre_of_table_has_no_contacts() {
        let contacts = ContactDetector::cushion_contacts(&Vec3::ZERO, RADIUS, &table());
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_right_cushion_contact() {
        let table = table();
        let pos = Vec3::new(table.max_x - RADIUS + 0.002, 0.1, 0.0);

        let contacts = ContactDetector::cushion_contacts(&pos, RADIUS, &table);

        assert_eq!(contacts.len(), 1);
        let contact = contacts[0];
        assert_eq!(contact.target, ContactTarget::Cushion(Cushion::Right));
        assert_eq!(contact.normal, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(contact.point.x, table.max_x);
        assert!((contact.penetration - 0.002).abs() < 1e-12);
    }

    #[test]
    fn test_ball_just_clear_of_cushion() {
        let table = table();
        let pos = Vec3::new(0.0, table.min_y + RADIUS + 1e-6, 0.0);
        assert!(ContactDetector::cushion_contacts(&pos, RADIUS, &table).is_empty());
    }

    #[test]
    fn test_corner_reports_both_cushions() {
        let table = table();
        let pos = Vec3::new(table.min_x + 0.01, table.max_y - 0.01, 0.0);

        let contacts = ContactDetector::cushion_contacts(&pos, RADIUS, &table);
        let targets: Vec<_> = contacts.iter().map(|c| c.target).collect();

        assert_eq!(
            targets,
            vec![
                ContactTarget::Cushion(Cushion::Left),
                ContactTarget::Cushion(Cushion::Top),
            ]
        );
    }

    #[test]
    fn test_touching_balls() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(0.05, 0.0, 0.0);

        let contact = ContactDetector::ball_contact(&a, RADIUS, &b, RADIUS, 3)
            .expect("balls 5cm apart should touch");

        assert_eq!(contact.target, ContactTarget::Ball(3));
        assert_eq!(contact.normal, Vec3::new(-1.0, 0.0, 0.0));
        assert!((contact.penetration - (2.0 * RADIUS - 0.05)).abs() < 1e-12);
    }

    #[test]
    fn test_separated_balls() {
        let a = Vec3::ZERO;
        let b = Vec3::new(0.0, 0.2, 0.0);
        assert!(ContactDetector::ball_contact(&a, RADIUS, &b, RADIUS, 1).is_none());
    }

    #[test]
    fn test_concentric_balls_are_ignored() {
        let a = Vec3::new(0.3, 0.3, 0.0);
        assert!(ContactDetector::ball_contact(&a, RADIUS, &a, RADIUS, 1).is_none());
    }
}
