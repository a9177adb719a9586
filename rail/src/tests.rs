//! Tests for rail building, riding and the rider state machine

use super::*;
use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

// ============================================================================
// Fixtures
// ============================================================================

/// Link payloads into a single chain in list order
fn chain(payloads: Vec<RailPayload>) -> Vec<RailNode> {
    let n = payloads.len();
    payloads
        .into_iter()
        .enumerate()
        .map(|(i, payload)| RailNode {
            next: (i + 1 < n).then(|| (i + 1) as u16),
            payload,
        })
        .collect()
}

/// Keyframe nodes first (node index = list index), then eleven points along +X, 10 units apart
fn straight_rail(keyframes: Vec<KeyframeDescriptor>) -> Rail {
    let mut payloads: Vec<RailPayload> = keyframes.into_iter().map(RailPayload::Keyframe).collect();
    payloads.extend((0..=10).map(|i| RailPayload::Point(Vec3::new(10.0 * i as f32, 0.0, 0.0))));
    let mut rails = build_rails(&chain(payloads));
    assert_eq!(rails.len(), 1);
    rails.remove(0)
}

/// Lead-in from -Z into a 20-unit square loop that closes on its first corner
fn looping_rail() -> Rail {
    let nodes = vec![
        RailNode::point(Vec3::new(0.0, 0.0, -20.0), Some(1)),
        RailNode::point(Vec3::new(0.0, 0.0, 0.0), Some(2)),
        RailNode::point(Vec3::new(20.0, 0.0, 0.0), Some(3)),
        RailNode::point(Vec3::new(20.0, 0.0, 20.0), Some(4)),
        RailNode::point(Vec3::new(0.0, 0.0, 20.0), Some(1)),
    ];
    let mut rails = build_rails(&nodes);
    assert_eq!(rails.len(), 1);
    rails.remove(0)
}

fn kf(t: f32) -> KeyframeDescriptor {
    KeyframeDescriptor {
        t,
        ..KeyframeDescriptor::default()
    }
}

// ============================================================================
// Building
// ============================================================================

#[test]
fn test_loop_detected_from_repeated_point() {
    let rail = looping_rail();
    assert_eq!(rail.points.len(), 6);
    assert_eq!(rail.points[5], rail.points[1]);
    assert!((rail.loop_start - 0.2).abs() < 1e-6);
    assert!(rail.is_looping());
}

#[test]
fn test_open_rail_loop_start_is_one() {
    let rail = straight_rail(vec![]);
    assert_eq!(rail.loop_start, 1.0);
    assert!(!rail.is_looping());
}

#[test]
fn test_missing_next_truncates_rail() {
    let nodes = vec![
        RailNode::point(Vec3::ZERO, Some(1)),
        RailNode::point(Vec3::X, Some(9)),
        RailNode::point(Vec3::Y, None),
    ];
    let rails = build_rails(&nodes);
    // Node 2 is unreferenced, so it starts its own single-point rail.
    assert_eq!(rails.len(), 2);
    assert_eq!(rails[0].points, vec![Vec3::ZERO, Vec3::X]);
    assert_eq!(rails[1].points, vec![Vec3::Y]);
}

#[test]
fn test_pure_cycle_is_built_once() {
    let nodes = vec![
        RailNode::point(Vec3::ZERO, Some(1)),
        RailNode::point(Vec3::X, Some(2)),
        RailNode::point(Vec3::Z, Some(0)),
    ];
    let set = RailSet::build(&nodes);
    assert_eq!(set.len(), 1);
    let rail = set.get(0).unwrap();
    assert_eq!(rail.points, vec![Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::ZERO]);
    assert_eq!(rail.loop_start, 0.0);
}

#[test]
fn test_keyframes_sorted_and_lerps_resolved() {
    let rail = straight_rail(vec![
        KeyframeDescriptor {
            lerp_pair: Some(2),
            ..kf(0.8)
        },
        KeyframeDescriptor {
            lerp_pair: Some(40),
            ..kf(0.9)
        },
        kf(0.2),
    ]);
    let ts: Vec<f32> = rail.keyframes.iter().map(|k| k.t()).collect();
    assert_eq!(ts, vec![0.2, 0.8, 0.9]);
    // The dangling pair to node 40 is skipped.
    assert_eq!(rail.lerps, vec![LerpRange { start: 0, end: 1 }]);
}

#[test]
fn test_distance_to_end_accumulates_backward() {
    let rail = straight_rail(vec![kf(0.5), kf(0.9)]);
    assert!((rail.keyframes[1].dist_to_end - 10.0).abs() < 0.05);
    assert!((rail.keyframes[0].dist_to_end - 50.0).abs() < 0.05);
}

// ============================================================================
// Path evaluation
// ============================================================================

#[test]
fn test_position_hits_control_points() {
    let rail = straight_rail(vec![]);
    assert!(rail.position(0.0).distance(Vec3::ZERO) < 1e-4);
    assert!(rail.position(0.5).distance(Vec3::new(50.0, 0.0, 0.0)) < 1e-3);
    assert!(rail.position(1.0).distance(Vec3::new(100.0, 0.0, 0.0)) < 1e-4);
}

#[test]
fn test_ride_forward_then_back_returns() {
    let rail = straight_rail(vec![]);
    let params = RideParams::default();
    let start = 0.3;
    let ahead = rail.ride(start, 20.0, &params);
    let moved = rail.position(ahead).x - rail.position(start).x;
    assert!(moved > 20.0 - params.tolerance && moved <= 20.0, "moved {moved}");

    let back = rail.ride(ahead, -20.0, &params);
    assert!(rail.position(back).distance(rail.position(start)) < 2.0 * params.tolerance + 0.05);
}

#[test]
fn test_open_rail_stops_at_ends() {
    let rail = straight_rail(vec![]);
    let params = RideParams::default();
    assert_eq!(rail.ride(0.95, 50.0, &params), 1.0);
    assert_eq!(rail.ride(0.0, -5.0, &params), 0.0);
    assert_eq!(rail.ride(0.4, 0.0, &params), 0.4);
}

#[test]
fn test_looping_rail_is_continuous_across_seam() {
    let rail = looping_rail();
    let end = rail.position(1.0);
    assert!(end.distance(rail.position(rail.loop_start)) < 1e-3);
    assert!(end.distance(rail.position(1.0 + 1e-4)) < 0.05);
}

#[test]
fn test_riding_past_seam_wraps() {
    let rail = looping_rail();
    let t = rail.ride(0.98, 10.0, &RideParams::default());
    assert!(t > rail.loop_start && t < 0.4, "t = {t}");
}

#[test]
fn test_riding_backward_past_seam_wraps_to_end() {
    let rail = looping_rail();
    let params = RideParams::default();
    let start = 0.3;
    let back = rail.ride(start, -20.0, &params);
    assert!(back > 0.8 && back < 1.0, "t = {back}");

    let again = rail.ride(back, 20.0, &params);
    assert!((again - start).abs() < 0.01, "t = {again}");
    assert!(rail.position(again).distance(rail.position(start)) < 0.5);
}

#[test]
fn test_heading_follows_travel() {
    let rail = straight_rail(vec![]);
    let params = RideParams::default();
    let (yaw, pitch) = rail.heading(0.5, 1.0, &params).unwrap();
    assert!((yaw - FRAC_PI_2).abs() < 1e-4);
    assert!(pitch.abs() < 1e-4);

    let (back_yaw, _) = rail.heading(0.5, -1.0, &params).unwrap();
    assert!((back_yaw + FRAC_PI_2).abs() < 1e-4);

    let climb = build_rails(&chain(
        (0..=4)
            .map(|i| RailPayload::Point(Vec3::new(0.0, 10.0 * i as f32, 10.0 * i as f32)))
            .collect(),
    ))
    .remove(0);
    let (_, pitch) = climb.heading(0.5, 1.0, &params).unwrap();
    assert!((pitch + std::f32::consts::FRAC_PI_4).abs() < 1e-3);
}

#[test]
fn test_heading_is_none_at_open_rail_end() {
    let rail = straight_rail(vec![]);
    let params = RideParams::default();
    assert!(rail.heading(1.0, 1.0, &params).is_none());
    assert!(rail.heading(0.0, -1.0, &params).is_none());
    assert!(rail.heading(1.0, -1.0, &params).is_some());
}

// ============================================================================
// Rider
// ============================================================================

#[test]
fn test_rider_waits_on_keyframe() {
    let rail = straight_rail(vec![KeyframeDescriptor {
        wait: Some(2.0),
        anim_mode: Some(3),
        ..kf(0.5)
    }]);
    let params = RideParams::default();
    let mut rider = RailRider::new(&rail, 0.4, 20.0);

    let passed = rider.update(&rail, 1.0, &params);
    assert_eq!(passed.as_slice(), &[0]);
    assert_eq!(rider.t(), 0.5);
    assert_eq!(rider.state(), RiderState::Waiting { remaining: 2.0 });
    assert_eq!(rider.anim_mode(), Some(3));
    assert!(rider.position().distance(Vec3::new(50.0, 0.0, 0.0)) < 1e-3);

    assert!(rider.update(&rail, 1.0, &params).is_empty());
    assert_eq!(rider.t(), 0.5);

    rider.update(&rail, 1.5, &params);
    assert_eq!(rider.state(), RiderState::Moving);
    assert!(rider.t() > 0.75);
}

#[test]
fn test_rider_reverses_on_keyframe() {
    let rail = straight_rail(vec![KeyframeDescriptor {
        direction: Some(TravelDirection::Backward),
        ..kf(0.6)
    }]);
    let params = RideParams::default();
    let mut rider = RailRider::new(&rail, 0.55, 10.0);

    rider.update(&rail, 1.0, &params);
    assert_eq!(rider.direction(), -1.0);
    let turned_at = rider.t();
    assert!(turned_at > 0.6);

    rider.update(&rail, 1.0, &params);
    assert!(rider.t() < turned_at);
}

#[test]
fn test_rider_interpolates_speed_and_yaw_in_lerp_range() {
    let rail = straight_rail(vec![
        KeyframeDescriptor {
            speed: Some(10.0),
            yaw: Some(0.0),
            yaw_mode: HeadingMode::Interpolated,
            ..kf(0.2)
        },
        KeyframeDescriptor {
            speed: Some(30.0),
            yaw: Some(1.0),
            lerp_pair: Some(0),
            ..kf(0.8)
        },
    ]);
    let mut rider = RailRider::new(&rail, 0.45, 10.0);
    rider.update(&rail, 0.5, &RideParams::default());

    let f = (rider.t() - 0.2) / 0.6;
    assert!((rider.speed() - (10.0 + 20.0 * f)).abs() < 1e-3);
    assert!((rider.yaw() - f).abs() < 1e-3);
    assert!((rider.t() - 0.5).abs() < 0.01);
}

#[test]
fn test_rider_rail_heading_and_model_matrix() {
    let rail = straight_rail(vec![KeyframeDescriptor {
        yaw_mode: HeadingMode::Rail,
        pitch_mode: HeadingMode::Rail,
        face_player: true,
        ..kf(0.1)
    }]);
    let mut rider = RailRider::new(&rail, 0.05, 10.0);
    rider.update(&rail, 1.0, &RideParams::default());

    assert!(rider.face_player());
    assert!((rider.yaw() - FRAC_PI_2).abs() < 1e-4);
    let m = rider.model_matrix();
    assert!(m.w_axis.truncate().distance(rider.position()) < 1e-6);
    // Local +Z faces down the rail
    assert!(m.transform_vector3(Vec3::Z).distance(Vec3::X) < 1e-4);
}

#[test]
fn test_rider_keeps_rail_heading_at_open_end() {
    let rail = straight_rail(vec![KeyframeDescriptor {
        yaw_mode: HeadingMode::Rail,
        pitch_mode: HeadingMode::Rail,
        ..kf(0.9)
    }]);
    let params = RideParams::default();
    let mut rider = RailRider::new(&rail, 0.85, 100.0);

    rider.update(&rail, 0.1, &params);
    assert!(rider.t() > 0.9 && rider.t() < 1.0);
    assert!((rider.yaw() - FRAC_PI_2).abs() < 1e-4);

    for _ in 0..3 {
        rider.update(&rail, 1.0, &params);
    }
    assert_eq!(rider.t(), 1.0);
    assert!((rider.yaw() - FRAC_PI_2).abs() < 1e-4, "yaw = {}", rider.yaw());
    assert!(rider.pitch().abs() < 1e-4);
}
