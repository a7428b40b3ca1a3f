//! End-to-end tests of the tracking pipeline


use test_helpers::{byte_at, face_update, frame_with_tip, set_depth, tracking, BODY_ID, HEIGHT, WIDTH};
use tongue_tracking::config::TrackingConfig;
use tongue_tracking::depth::{DepthFrame, DepthMapping};
use tongue_tracking::direction::Direction;
use tongue_tracking::region::{pixel_of_index, MouthRegion};
use tongue_tracking::scanner::scan_into;
use tongue_tracking::stabilizer::TrackingPhase;
use tongue_tracking::tracker::{BodyUpdate, DetectionResult};

const REGION: MouthRegion = MouthRegion::new(100, 50, 40, 20);

fn immediate() -> TrackingConfig {
    TrackingConfig {
        update_interval_frames: 0,
        ..TrackingConfig::default()
    }
}

#[test]
fn test_reference_frame() {
    let mut frame = DepthFrame::filled(WIDTH, HEIGHT, 2000, 500, 4000).unwrap();
    set_depth(&mut frame, (110, 55), 500);
    let mapping = DepthMapping::new(8000, 500, 4000).unwrap();
    let mut pixels = vec![0u8; WIDTH * HEIGHT];

    let candidate = scan_into(&frame, &REGION, &mapping, &mut pixels).unwrap().unwrap();

    assert_eq!((candidate.x, candidate.y), (110, 55));
    assert_eq!(candidate.depth, 500);
    assert_eq!(candidate.position, (0.25, 0.25));

    assert_eq!(byte_at(&pixels, (110, 55)), 0);
    assert_eq!(byte_at(&pixels, (120, 60)), 255);
    assert_eq!(byte_at(&pixels, (10, 10)), 64);
    // Region borders are outside the strict interior
    assert_eq!(byte_at(&pixels, (100, 60)), 64);
    assert_eq!(byte_at(&pixels, (120, 50)), 64);
    assert_eq!(byte_at(&pixels, (140, 60)), 64);
    assert_eq!(byte_at(&pixels, (120, 70)), 64);

    let inside = pixels.iter().filter(|&&b| b == 255).count();
    assert_eq!(inside, 39 * 19 - 1);
}

#[test]
fn test_region_interior_follows_buffer_order() {
    let frame = DepthFrame::filled(WIDTH, HEIGHT, 2000, 500, 4000).unwrap();
    let mapping = DepthMapping::new(8000, 500, 4000).unwrap();
    let mut pixels = vec![0u8; WIDTH * HEIGHT];
    scan_into(&frame, &REGION, &mapping, &mut pixels).unwrap().unwrap();

    for (index, &byte) in pixels.iter().enumerate() {
        let (x, y) = pixel_of_index(index, WIDTH);
        let interior = x > 100 && x < 140 && y > 50 && y < 70;
        if interior {
            assert!(byte == 255 || byte == 0, "index {index}");
        } else {
            assert_eq!(byte, 64, "index {index}");
        }
    }
}

#[test]
fn test_tracker_reports_direction_of_reference_frame() {
    let mut tracker = tracking(REGION, DetectionResult::Yes, &immediate()).unwrap();
    let frame = frame_with_tip(2000, (110, 55), 500).unwrap();

    let output = tracker.process_depth(&frame).unwrap();
    assert_eq!(output.direction, Some(Direction::NorthWest));
    assert_eq!(output.phase, Some(TrackingPhase::Tracking));
    assert!(output.changed);
    assert_eq!(byte_at(output.pixels, (110, 55)), 0);
}

#[test]
fn test_direction_follows_tip_around_grid() {
    let mut tracker = tracking(REGION, DetectionResult::Yes, &immediate()).unwrap();
    let cases = [
        ((104, 52), Direction::NorthWest),
        ((104, 60), Direction::West),
        ((104, 68), Direction::SouthWest),
        ((120, 52), Direction::North),
        ((120, 60), Direction::Center),
        ((120, 68), Direction::South),
        ((136, 52), Direction::NorthEast),
        ((136, 60), Direction::East),
        ((136, 68), Direction::SouthEast),
    ];

    for (tip, expected) in cases {
        let frame = frame_with_tip(2000, tip, 700).unwrap();
        let output = tracker.process_depth(&frame).unwrap();
        assert_eq!(output.direction, Some(expected), "tip {tip:?}");
    }
}

#[test]
fn test_default_rate_limit_and_closed_debounce() {
    let mut tracker = tracking(REGION, DetectionResult::Yes, &TrackingConfig::default()).unwrap();
    let frame = frame_with_tip(2000, (136, 60), 700).unwrap();

    for _ in 0..4 {
        let output = tracker.process_depth(&frame).unwrap();
        assert_eq!(output.direction, None);
        assert_eq!(output.phase, Some(TrackingPhase::Waiting));
    }
    assert_eq!(tracker.process_depth(&frame).unwrap().direction, Some(Direction::East));

    tracker.update_face(&face_update(REGION, DetectionResult::No));
    for _ in 0..4 {
        assert_eq!(tracker.process_depth(&frame).unwrap().direction, Some(Direction::East));
    }
    let output = tracker.process_depth(&frame).unwrap();
    assert_eq!(output.direction, Some(Direction::Closed));
    assert_eq!(output.phase, Some(TrackingPhase::Closed));
    assert_eq!(output.direction.map(Direction::glyph), Some("X"));
}

#[test]
fn test_maybe_counts_as_closed_by_default() {
    let mut tracker = tracking(REGION, DetectionResult::Maybe, &immediate()).unwrap();
    let frame = frame_with_tip(2000, (120, 60), 700).unwrap();
    for _ in 0..5 {
        tracker.process_depth(&frame).unwrap();
    }
    assert_eq!(tracker.direction(), Some(Direction::Closed));

    let config = TrackingConfig {
        treat_maybe_as_open: true,
        ..immediate()
    };
    let mut tracker = tracking(REGION, DetectionResult::Maybe, &config).unwrap();
    assert_eq!(tracker.process_depth(&frame).unwrap().direction, Some(Direction::Center));
}

#[test]
fn test_body_change_switches_face_source() {
    let mut tracker = tracking(REGION, DetectionResult::Yes, &immediate()).unwrap();

    tracker.update_body(&BodyUpdate { tracked_ids: vec![7] });
    assert_eq!(tracker.state().tracking_id, Some(7));
    // Region survives the switch until the new body's face arrives
    assert_eq!(tracker.state().region, REGION);

    let stale = face_update(MouthRegion::new(200, 100, 40, 20), DetectionResult::Yes);
    assert!(!tracker.update_face(&stale));
    assert_eq!(tracker.state().region, REGION);

    let mut fresh = face_update(MouthRegion::new(200, 100, 40, 20), DetectionResult::Yes);
    fresh.tracking_id = 7;
    assert!(tracker.update_face(&fresh));
    assert_eq!(tracker.state().region, MouthRegion::new(200, 100, 40, 20));
    assert_ne!(tracker.state().tracking_id, Some(BODY_ID));
}
