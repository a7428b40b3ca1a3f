//! Synthetic depth sensor for demos and tests.
//!
//! Renders a flat face in front of a background with the tongue tip
//! circling inside the mouth. The mouth closes for part of each cycle, in
//! which case no tongue is drawn and face updates report it closed.

use crate::app::SensorEvent;
use crate::config::{SensorConfig, SimulationConfig};
use crate::depth::DepthFrame;
use crate::region::{index_of_pixel, pixel_of_index, MouthRegion, Point2};
use crate::tracker::{BodyUpdate, DetectionResult, FaceUpdate};
use crate::utils::frame_interval;
use crate::utils::safe_cast::{i32_to_f32, i32_to_usize, usize_to_i32};
use crate::{Error, Result};
use log::{debug, info};
use std::f32::consts::TAU;
use std::sync::mpsc::SyncSender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Body id reported for the simulated user
pub const SIMULATED_BODY_ID: u64 = 72_057_594_037_927_936;

/// Radius of the tongue orbit, relative to the mouth size
const ORBIT_RADIUS: f32 = 0.35;

/// Margin of face around the mouth, in pixels
const FACE_MARGIN: i32 = 24;

/// Depth added to the pixels around the tongue tip
const TONGUE_FALLOFF: u16 = 15;

/// Frames between repeated body updates
const BODY_UPDATE_EVERY: u64 = 30;

/// Deterministic synthetic sensor
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    width: usize,
    height: usize,
    fps: u32,
    config: SimulationConfig,
    left_corner: Point2,
    right_corner: Point2,
    region: MouthRegion,
}

impl SimulatedSensor {
    /// Create a sensor for the given geometry
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is too small to hold a mouth.
    pub fn new(sensor: &SensorConfig, config: SimulationConfig) -> Result<Self> {
        let width = usize_to_i32(sensor.frame_width)?;
        let height = usize_to_i32(sensor.frame_height)?;
        if width < 64 || height < 64 {
            return Err(Error::InvalidInput(format!(
                "Simulated frame {width}x{height} is too small, need at least 64x64"
            )));
        }

        let half_mouth = width / 10;
        let center_x = width / 2;
        let center_y = height * 3 / 5;
        let left_corner = Point2::new(i32_to_f32(center_x - half_mouth), i32_to_f32(center_y));
        let right_corner = Point2::new(i32_to_f32(center_x + half_mouth), i32_to_f32(center_y));
        let region = MouthRegion::from_corners(left_corner, right_corner);

        Ok(Self {
            width: sensor.frame_width,
            height: sensor.frame_height,
            fps: sensor.fps,
            config,
            left_corner,
            right_corner,
            region,
        })
    }

    /// Region the tracker will derive from this sensor's face updates
    #[must_use]
    pub const fn mouth_region(&self) -> MouthRegion {
        self.region
    }

    /// Whether the mouth is open on frame `frame_no`
    #[must_use]
    pub fn mouth_open_at(&self, frame_no: u64) -> bool {
        let cycle = u64::from(self.config.mouth_cycle_frames.max(1));
        let closed = u64::from(self.config.mouth_closed_frames);
        frame_no % cycle < cycle.saturating_sub(closed)
    }

    /// Intended tongue position relative to the mouth on frame `frame_no`
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Orbit phase only needs coarse precision
    pub fn tongue_target(&self, frame_no: u64) -> (f32, f32) {
        let orbit = u64::from(self.config.orbit_frames.max(1));
        let angle = TAU * (frame_no % orbit) as f32 / orbit as f32;
        (0.5 + ORBIT_RADIUS * angle.cos(), 0.5 + ORBIT_RADIUS * angle.sin())
    }

    /// Pixel holding the tongue tip on frame `frame_no`
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Targets stay inside the mouth
    pub fn tongue_pixel(&self, frame_no: u64) -> (i32, i32) {
        let (nx, ny) = self.tongue_target(frame_no);
        let x = self.region.left + (nx * i32_to_f32(self.region.width)) as i32;
        let y = self.region.top + (ny * i32_to_f32(self.region.height)) as i32;
        (x, y)
    }

    /// Render depth frame `frame_no`
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be constructed.
    pub fn depth_frame(&self, frame_no: u64) -> Result<DepthFrame> {
        let config = &self.config;
        let mut frame = DepthFrame::filled(
            self.width,
            self.height,
            config.background_depth,
            config.min_reliable_depth,
            config.max_reliable_depth,
        )?;

        let region = self.region;
        let face_left = i64::from(region.left - FACE_MARGIN);
        let face_right = i64::from(region.left + region.width + FACE_MARGIN);
        let face_top = i64::from(region.top - FACE_MARGIN * 2);
        let face_bottom = i64::from(region.top + region.height + FACE_MARGIN);

        for (index, sample) in frame.samples_mut().iter_mut().enumerate() {
            let (x, y) = pixel_of_index(index, self.width);
            let (x, y) = (to_i64(x), to_i64(y));
            if x >= face_left && x <= face_right && y >= face_top && y <= face_bottom {
                *sample = config.face_depth;
            }
        }

        if self.mouth_open_at(frame_no) {
            let (x, y) = self.tongue_pixel(frame_no);
            let edge = config.tongue_depth.saturating_add(TONGUE_FALLOFF);
            for (dx, dy, depth) in [
                (0, 0, config.tongue_depth),
                (-1, 0, edge),
                (1, 0, edge),
                (0, -1, edge),
                (0, 1, edge),
            ] {
                self.set_pixel(&mut frame, x + dx, y + dy, depth);
            }
        }

        Ok(frame)
    }

    fn set_pixel(&self, frame: &mut DepthFrame, x: i32, y: i32, depth: u16) {
        let (Some(x), Some(y)) = (i32_to_usize(x), i32_to_usize(y)) else {
            return;
        };
        let Some(index) = index_of_pixel(x, y, self.width) else {
            return;
        };
        if let Some(sample) = frame.samples_mut().get_mut(index) {
            *sample = depth;
        }
    }

    /// Face landmarks for frame `frame_no`
    #[must_use]
    pub fn face_update(&self, frame_no: u64) -> FaceUpdate {
        FaceUpdate {
            tracking_id: SIMULATED_BODY_ID,
            left_corner: self.left_corner,
            right_corner: self.right_corner,
            mouth_open: if self.mouth_open_at(frame_no) {
                DetectionResult::Yes
            } else {
                DetectionResult::No
            },
        }
    }

    /// Tracked bodies
    #[must_use]
    pub fn body_update(&self) -> BodyUpdate {
        BodyUpdate {
            tracked_ids: vec![SIMULATED_BODY_ID],
        }
    }

    /// Events delivered on tick `frame_no`, in arrival order
    ///
    /// # Errors
    ///
    /// Returns an error if the depth frame cannot be rendered.
    pub fn events(&self, frame_no: u64) -> Result<Vec<SensorEvent>> {
        let mut events = Vec::with_capacity(3);
        if frame_no % BODY_UPDATE_EVERY == 0 {
            events.push(SensorEvent::Body(self.body_update()));
        }
        if frame_no % u64::from(self.config.face_update_every.max(1)) == 0 {
            events.push(SensorEvent::Face(self.face_update(frame_no)));
        }
        events.push(SensorEvent::Depth(self.depth_frame(frame_no)?));
        Ok(events)
    }

    /// Start producing events into `sender`.
    ///
    /// In realtime mode depth frames and landmarks come from two threads,
    /// each paced at the sensor frame rate. Otherwise one thread sends every
    /// tick's events back to back. Producers stop after the configured frame
    /// count, or when the receiver goes away.
    #[must_use]
    pub fn spawn(self, sender: SyncSender<SensorEvent>) -> Vec<JoinHandle<()>> {
        let interval = frame_interval(self.fps);
        if !self.config.realtime {
            return vec![thread::spawn(move || self.produce_all(&sender))];
        }

        let landmarks = self.clone();
        let landmark_sender = sender.clone();
        vec![
            thread::spawn(move || self.produce_depth(&sender, interval)),
            thread::spawn(move || landmarks.produce_landmarks(&landmark_sender, interval)),
        ]
    }

    fn ticks(&self) -> impl Iterator<Item = u64> {
        let frames = self.config.frames;
        (0..).take_while(move |&n| frames == 0 || n < frames)
    }

    fn produce_all(&self, sender: &SyncSender<SensorEvent>) {
        let _ = sender.send(SensorEvent::Availability(true));
        for frame_no in self.ticks() {
            let events = match self.events(frame_no) {
                Ok(events) => events,
                Err(e) => {
                    info!("Simulated sensor stopped: {e}");
                    return;
                }
            };
            for event in events {
                if sender.send(event).is_err() {
                    debug!("Receiver gone, stopping simulated sensor");
                    return;
                }
            }
        }
        let _ = sender.send(SensorEvent::Availability(false));
    }

    fn produce_depth(&self, sender: &SyncSender<SensorEvent>, interval: Duration) {
        let _ = sender.send(SensorEvent::Availability(true));
        for frame_no in self.ticks() {
            let frame = match self.depth_frame(frame_no) {
                Ok(frame) => frame,
                Err(e) => {
                    info!("Simulated depth stream stopped: {e}");
                    return;
                }
            };
            if sender.send(SensorEvent::Depth(frame)).is_err() {
                debug!("Receiver gone, stopping depth stream");
                return;
            }
            thread::sleep(interval);
        }
        let _ = sender.send(SensorEvent::Availability(false));
    }

    fn produce_landmarks(&self, sender: &SyncSender<SensorEvent>, interval: Duration) {
        let every = u64::from(self.config.face_update_every.max(1));
        for frame_no in self.ticks() {
            if frame_no % BODY_UPDATE_EVERY == 0 && sender.send(SensorEvent::Body(self.body_update())).is_err() {
                return;
            }
            if frame_no % every == 0 && sender.send(SensorEvent::Face(self.face_update(frame_no))).is_err() {
                debug!("Receiver gone, stopping landmark stream");
                return;
            }
            thread::sleep(interval);
        }
    }
}

#[allow(clippy::cast_possible_wrap)] // Frame coordinates are far below i64::MAX
const fn to_i64(value: usize) -> i64 {
    value as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::TongueTipScanner;
    use std::sync::mpsc;

    fn sensor() -> SimulatedSensor {
        SimulatedSensor::new(&SensorConfig::default(), SimulationConfig::default()).unwrap()
    }

    #[test]
    fn test_mouth_region_geometry() {
        let region = sensor().mouth_region();
        // 512x424 sensor: corners at x = 256 -/+ 51, y = 254
        assert_eq!(region, MouthRegion::new(205, 229, 102, 51));
    }

    #[test]
    fn test_mouth_cycle() {
        let sensor = sensor();
        assert!(sensor.mouth_open_at(0));
        assert!(sensor.mouth_open_at(99));
        assert!(!sensor.mouth_open_at(100));
        assert!(!sensor.mouth_open_at(119));
        assert!(sensor.mouth_open_at(120));
    }

    #[test]
    fn test_scanner_finds_simulated_tongue() {
        let sensor = sensor();
        let region = sensor.mouth_region();
        let mut scanner = TongueTipScanner::new(8000, true, 512 * 424).unwrap();

        for frame_no in [0, 11, 22, 45, 67] {
            let frame = sensor.depth_frame(frame_no).unwrap();
            let candidate = scanner.scan(&frame, &region).unwrap();
            assert_eq!((candidate.x, candidate.y), sensor.tongue_pixel(frame_no), "frame {frame_no}");
            assert_eq!(candidate.depth, SimulationConfig::default().tongue_depth);
        }
    }

    #[test]
    fn test_closed_mouth_has_no_tongue() {
        let sensor = sensor();
        let frame = sensor.depth_frame(105).unwrap();
        let region = sensor.mouth_region();
        let mut scanner = TongueTipScanner::new(8000, true, frame.len()).unwrap();
        let candidate = scanner.scan(&frame, &region).unwrap();
        assert_eq!(candidate.depth, SimulationConfig::default().face_depth);
        assert_eq!(sensor.face_update(105).mouth_open, DetectionResult::No);
    }

    #[test]
    fn test_tongue_near_depth_limit_saturates() {
        let config = SimulationConfig {
            tongue_depth: 65530,
            face_depth: u16::MAX,
            background_depth: u16::MAX,
            ..SimulationConfig::default()
        };
        let sensor = SimulatedSensor::new(&SensorConfig::default(), config).unwrap();
        let frame = sensor.depth_frame(0).unwrap();

        let (x, y) = sensor.tongue_pixel(0);
        let (x, y) = (i32_to_usize(x).unwrap(), i32_to_usize(y).unwrap());
        let samples = frame.samples();
        assert_eq!(samples[index_of_pixel(x, y, 512).unwrap()], 65530);
        assert_eq!(samples[index_of_pixel(x + 1, y, 512).unwrap()], u16::MAX);
    }

    #[test]
    fn test_events_cadence() {
        let sensor = sensor();
        let first = sensor.events(0).unwrap();
        assert!(matches!(first[0], SensorEvent::Body(_)));
        assert!(matches!(first[1], SensorEvent::Face(_)));
        assert!(matches!(first[2], SensorEvent::Depth(_)));

        let odd = sensor.events(1).unwrap();
        assert_eq!(odd.len(), 1);
        assert!(matches!(odd[0], SensorEvent::Depth(_)));
    }

    #[test]
    fn test_rejects_tiny_frames() {
        let sensor = SensorConfig {
            frame_width: 32,
            frame_height: 32,
            fps: 30,
        };
        assert!(SimulatedSensor::new(&sensor, SimulationConfig::default()).is_err());
    }

    #[test]
    fn test_spawn_stops_after_frame_count() {
        let config = SimulationConfig {
            frames: 3,
            ..SimulationConfig::default()
        };
        let sensor = SimulatedSensor::new(&SensorConfig::default(), config).unwrap();
        let (tx, rx) = mpsc::sync_channel(16);
        for handle in sensor.spawn(tx) {
            handle.join().unwrap();
        }

        let depth_frames = rx.iter().filter(|e| matches!(e, SensorEvent::Depth(_))).count();
        assert_eq!(depth_frames, 3);
    }
}
