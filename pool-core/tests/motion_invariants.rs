//! Physical invariants of the motion model over random strikes.

use std::f64::consts::PI;

use pool_core::friction::{contact_velocity, FrictionModel};
use pool_core::model::{BallMotionModel, EvaluationMode};
use pool_core::strike::{StrikeInput, MAX_ELEVATION, MIN_ELEVATION};
use pool_core::types::{BallProperties, MotionPhase, Vec3};
use proptest::prelude::*;

const MAX_TICKS: usize = 200_000;

fn ball() -> BallMotionModel {
    BallMotionModel::new(
        BallProperties::regulation(),
        FrictionModel::default(),
        Vec3::ZERO,
    )
    .unwrap()
}

/// Any strike the aiming layer can produce.
fn strike() -> impl Strategy<Value = StrikeInput> {
    (
        0.0f64..0.95,
        0.0f64..2.0 * PI,
        MIN_ELEVATION..MAX_ELEVATION,
        -PI..PI,
        0.05f64..0.6,
    )
        .prop_map(|(reach, around, elevation, forward_angle, cue_speed)| {
            let radius = BallProperties::regulation().radius;
            StrikeInput::new(forward_angle, cue_speed)
                .with_offset(reach * radius * around.cos(), reach * radius * around.sin())
                .with_elevation(elevation)
        })
}

/// Level strikes on the vertical centre line below the natural roll height.
fn level_strike() -> impl Strategy<Value = StrikeInput> {
    (-0.95f64..0.4, -PI..PI, 0.05f64..0.6).prop_map(|(height, forward_angle, cue_speed)| {
        let radius = BallProperties::regulation().radius;
        StrikeInput::new(forward_angle, cue_speed).with_offset(0.0, height * radius)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn kinetic_energy_never_increases(input in strike()) {
        let mut model = ball();
        model.strike(&input).unwrap();

        let mut energy = model.kinetic_energy();
        let mut ticks = 0;
        while !model.is_still() {
            model.step(1.0 / 120.0).unwrap();
            let next = model.kinetic_energy();
            prop_assert!(
                next <= energy * (1.0 + 1e-12) + 1e-15,
                "energy rose from {} to {} at t={}",
                energy,
                next,
                model.elapsed()
            );
            energy = next;
            ticks += 1;
            prop_assert!(ticks < MAX_TICKS);
        }
        prop_assert_eq!(energy, 0.0);
    }

    #[test]
    fn speed_never_increases_below_natural_roll(input in level_strike()) {
        let mut model = ball();
        model.strike(&input).unwrap();

        let mut speed = model.velocity().magnitude();
        while !model.is_still() {
            model.step(1.0 / 120.0).unwrap();
            let next = model.velocity().magnitude();
            prop_assert!(next <= speed + 1e-12, "speed rose from {} to {}", speed, next);
            speed = next;
        }
    }

    #[test]
    fn phase_only_moves_forward(input in strike(), dt in 0.001f64..0.05) {
        let mut model = ball();
        model.strike(&input).unwrap();

        let mut order = model.phase().order();
        let mut ticks = 0;
        while !model.is_still() {
            let phase = model.step(dt).unwrap();
            prop_assert!(phase.order() >= order, "phase went back to {:?}", phase);
            order = phase.order();
            ticks += 1;
            prop_assert!(ticks < MAX_TICKS);
        }
        prop_assert_eq!(model.velocity(), Vec3::ZERO);
    }

    #[test]
    fn stepping_agrees_with_closed_form(
        input in strike(),
        dt in prop::sample::select(vec![1.0 / 30.0, 1.0 / 60.0, 1.0 / 120.0, 1.0 / 480.0])
    ) {
        let mut model = ball();
        model.strike(&input).unwrap();

        while !model.is_still() {
            model.step(dt).unwrap();
            let t = model.elapsed();
            let expected = model.state_at(t).unwrap();

            prop_assert!((model.position() - expected.pos).magnitude() < 1e-9);
            prop_assert!((model.velocity() - expected.vel).magnitude() < 1e-9);
        }
        prop_assert!((model.position() - model.rest_position()).magnitude() < 1e-9);
    }

    #[test]
    fn rolling_ball_satisfies_rolling_condition(input in strike()) {
        let mut model = ball();
        let radius = model.props().radius;
        model.strike(&input).unwrap();

        let mut spin_dir: Option<Vec3> = None;
        while !model.is_still() {
            model.step(1.0 / 120.0).unwrap();
            if model.phase() != MotionPhase::Rolling {
                continue;
            }

            let vel = model.velocity();
            let spin = model.angular_velocity();
            prop_assert!((spin.magnitude() * radius - vel.magnitude()).abs() < 1e-9);
            prop_assert!(spin.dot(&vel).abs() < 1e-9);
            prop_assert_eq!(spin.z, 0.0);
            prop_assert!(contact_velocity(&vel, &spin, radius).magnitude() < 1e-9);

            if vel.magnitude() < 1e-6 {
                continue;
            }
            let dir = spin.normalized();
            match spin_dir {
                Some(first) => prop_assert!((dir - first).magnitude() < 1e-9),
                None => spin_dir = Some(dir),
            }
        }
    }

    #[test]
    fn analytic_mode_tracks_integrated_mode(input in strike()) {
        let mut integrated = ball();
        let mut analytic = ball().with_mode(EvaluationMode::Analytic);
        integrated.strike(&input).unwrap();
        analytic.strike(&input).unwrap();

        for _ in 0..600 {
            integrated.step(1.0 / 120.0).unwrap();
            analytic.step(1.0 / 120.0).unwrap();
            prop_assert!((integrated.position() - analytic.position()).magnitude() < 1e-9);
        }
    }
}
