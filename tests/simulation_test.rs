//! Tracker driven by the simulated sensor

use std::sync::mpsc;
use tongue_tracking::app::{DirectionLog, SensorEvent, TrackingApp};
use tongue_tracking::config::{Config, SimulationConfig};
use tongue_tracking::direction::Direction;
use tongue_tracking::simulation::{SimulatedSensor, SIMULATED_BODY_ID};
use tongue_tracking::tracker::TongueTracker;

fn drive(config: &Config, frames: u64) -> (TongueTracker, Vec<Direction>) {
    let sensor = SimulatedSensor::new(&config.sensor, config.simulation.clone()).unwrap();
    let mut tracker = TongueTracker::from_config(config).unwrap();
    let mut shown = Vec::new();

    for frame_no in 0..frames {
        for event in sensor.events(frame_no).unwrap() {
            match event {
                SensorEvent::Body(update) => tracker.update_body(&update),
                SensorEvent::Face(update) => {
                    tracker.update_face(&update);
                }
                SensorEvent::Depth(frame) => {
                    let output = tracker.process_depth(&frame).unwrap();
                    if output.changed {
                        shown.extend(output.direction);
                    }
                }
                SensorEvent::Availability(_) => {}
            }
        }
    }
    (tracker, shown)
}

#[test]
fn test_simulated_orbit_visits_outer_directions() {
    let config = Config::default();
    let (tracker, shown) = drive(&config, 100);

    assert_eq!(tracker.state().tracking_id, Some(SIMULATED_BODY_ID));
    assert!(!shown.contains(&Direction::Closed));
    for direction in [Direction::East, Direction::South, Direction::West, Direction::North] {
        assert!(shown.contains(&direction), "{direction:?} missing from {shown:?}");
    }
}

#[test]
fn test_simulated_mouth_closing_shows_closed_symbol() {
    let config = Config::default();
    let (tracker, shown) = drive(&config, 120);

    assert_eq!(shown.last(), Some(&Direction::Closed));
    assert_eq!(tracker.direction(), Some(Direction::Closed));
    assert_eq!(shown.iter().filter(|&&d| d == Direction::Closed).count(), 1);
}

#[test]
fn test_simulated_reopening_resumes_tracking() {
    let config = Config::default();
    let (tracker, shown) = drive(&config, 140);

    let closed_at = shown.iter().position(|&d| d == Direction::Closed).unwrap();
    assert!(shown[closed_at + 1..].iter().all(|d| d.is_open()));
    assert!(tracker.direction().is_some_and(Direction::is_open));
}

#[test]
fn test_threaded_run_accounts_for_every_frame() {
    let config = Config {
        simulation: SimulationConfig {
            frames: 60,
            ..SimulationConfig::default()
        },
        ..Config::default()
    };
    let sensor = SimulatedSensor::new(&config.sensor, config.simulation.clone()).unwrap();
    let tracker = TongueTracker::from_config(&config).unwrap();

    let (tx, rx) = mpsc::sync_channel(4);
    let producers = sensor.spawn(tx);
    let mut app = TrackingApp::new(tracker, rx);
    let stats = app.run(&mut DirectionLog::default()).unwrap();
    for producer in producers {
        producer.join().unwrap();
    }

    assert_eq!(stats.frames_received, 60);
    assert_eq!(stats.frames_processed + stats.frames_dropped, 60);
    assert_eq!(stats.frames_rejected, 0);
    assert_eq!(stats.face_updates, 30);
    assert_eq!(stats.body_updates, 2);
    assert_eq!(app.tracker().frames_processed(), stats.frames_processed);
    assert_eq!(app.stats(), stats);
}
