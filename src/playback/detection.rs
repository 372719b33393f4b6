// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Periodic pose detection.
//!
//! A background thread wakes on a fixed interval, grabs the video frame at
//! the current playback time, runs it through a pose estimator, and
//! publishes the resulting poses to a [`LatestValue`] cell for the UI to
//! pick up. Capture or detection failures are logged and skipped; the last
//! published poses stay on screen until a later tick succeeds.

use crate::models::{DetectedPerson, PersonPose};
use crate::playback::clock::PlaybackClock;
use crate::util::LatestValue;
use anyhow::Result;
use image::RgbaImage;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Default time between detection passes.
pub const DEFAULT_DETECTION_INTERVAL: Duration = Duration::from_millis(200);

/// Grabs a decoded video frame at a playback time.
pub trait FrameSource: Send {
    fn frame_at(&mut self, t: f64) -> Result<RgbaImage>;
}

/// Detects people in a frame. Joint coordinates are normalized with y up.
pub trait PoseEstimator: Send {
    fn detect(&mut self, frame: &RgbaImage) -> Result<Vec<DetectedPerson>>;
}

/// Settings for a [`DetectionLoop`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionSettings {
    pub interval: Duration,
    pub min_confidence: f32,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_DETECTION_INTERVAL,
            min_confidence: crate::models::pose::DEFAULT_MIN_CONFIDENCE,
        }
    }
}

/// The pieces the worker thread owns while running.
struct Worker {
    source: Box<dyn FrameSource>,
    estimator: Box<dyn PoseEstimator>,
}

impl Worker {
    /// One detection pass. `None` means the tick failed and should be skipped.
    fn detect_at(&mut self, t: f64, min_confidence: f32) -> Option<Vec<PersonPose>> {
        let frame = match self.source.frame_at(t) {
            Ok(frame) => frame,
            Err(e) => {
                log::debug!("Skipping detection at {:.3}s, frame capture failed: {}", t, e);
                return None;
            }
        };
        let people = match self.estimator.detect(&frame) {
            Ok(people) => people,
            Err(e) => {
                log::debug!("Skipping detection at {:.3}s, pose detection failed: {}", t, e);
                return None;
            }
        };
        Some(
            people
                .iter()
                .map(|person| PersonPose::from_observations(person, min_confidence))
                .collect(),
        )
    }

    /// [`detect_at`](Worker::detect_at), treating a panicking source or
    /// estimator as a failed tick so the thread keeps running.
    fn detect_guarded(&mut self, t: f64, min_confidence: f32) -> Option<Vec<PersonPose>> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.detect_at(t, min_confidence))) {
            Ok(poses) => poses,
            Err(_) => {
                log::error!("Pose detection panicked at {:.3}s, skipping tick", t);
                None
            }
        }
    }
}

struct Running {
    stop: Sender<()>,
    handle: JoinHandle<Worker>,
}

/// Owns the detection thread. Start and stop are idempotent.
pub struct DetectionLoop {
    clock: Arc<dyn PlaybackClock>,
    settings: DetectionSettings,
    output: LatestValue<Vec<PersonPose>>,
    idle: Option<Worker>,
    running: Option<Running>,
}

impl DetectionLoop {
    pub fn new(
        clock: Arc<dyn PlaybackClock>,
        source: Box<dyn FrameSource>,
        estimator: Box<dyn PoseEstimator>,
        settings: DetectionSettings,
    ) -> Self {
        Self {
            clock,
            settings,
            output: LatestValue::new(),
            idle: Some(Worker { source, estimator }),
            running: None,
        }
    }

    /// Cell the worker publishes successful detections to.
    pub fn output(&self) -> LatestValue<Vec<PersonPose>> {
        self.output.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Start the worker thread, restarting it if already running.
    pub fn start(&mut self) {
        self.stop();
        let Some(mut worker) = self.idle.take() else {
            log::warn!("Pose detection cannot start: worker was lost");
            return;
        };

        let (stop, stop_rx) = channel::<()>();
        let clock = Arc::clone(&self.clock);
        let output = self.output.clone();
        let settings = self.settings;

        let spawned = std::thread::Builder::new()
            .name("pose-detection".to_string())
            .spawn(move || {
                // Fixed cadence from the start time. Ticks missed during a
                // slow detection are skipped.
                let mut next = Instant::now() + settings.interval;
                loop {
                    let wait = next.saturating_duration_since(Instant::now());
                    match stop_rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                    let t = clock.current_time();
                    if let Some(poses) = worker.detect_guarded(t, settings.min_confidence) {
                        output.publish(poses);
                    }
                    next += settings.interval;
                    let now = Instant::now();
                    while next <= now {
                        next += settings.interval;
                    }
                }
                worker
            });

        match spawned {
            Ok(handle) => {
                log::info!("Pose detection started ({} ms interval)", settings.interval.as_millis());
                self.running = Some(Running { stop, handle });
            }
            Err(e) => log::error!("Failed to spawn pose detection thread: {}", e),
        }
    }

    /// Stop the worker thread and wait for it. No publishes happen after
    /// this returns.
    pub fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        let _ = running.stop.send(());
        match running.handle.join() {
            Ok(worker) => {
                self.idle = Some(worker);
                log::info!("Pose detection stopped");
            }
            Err(_) => log::error!("Pose detection thread panicked"),
        }
    }
}

impl Drop for DetectionLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Joint, JointObservation, Point};
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedClock(f64);

    impl PlaybackClock for FixedClock {
        fn current_time(&self) -> f64 {
            self.0
        }
    }

    /// Fails every other capture, as happens while seeking.
    struct FlakySource {
        calls: Arc<AtomicUsize>,
    }

    impl FrameSource for FlakySource {
        fn frame_at(&mut self, _t: f64) -> Result<RgbaImage> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n % 2 == 1 {
                Err(anyhow!("seek in progress"))
            } else {
                Ok(RgbaImage::new(4, 4))
            }
        }
    }

    struct OneNeck;

    impl PoseEstimator for OneNeck {
        fn detect(&mut self, _frame: &RgbaImage) -> Result<Vec<DetectedPerson>> {
            let mut person: DetectedPerson = [None; Joint::COUNT];
            person[Joint::Neck.index()] = Some(JointObservation::new(0.5, 0.8, 0.9));
            Ok(vec![person])
        }
    }

    struct AlwaysFails;

    impl PoseEstimator for AlwaysFails {
        fn detect(&mut self, _frame: &RgbaImage) -> Result<Vec<DetectedPerson>> {
            Err(anyhow!("no model"))
        }
    }

    fn settings() -> DetectionSettings {
        DetectionSettings {
            interval: Duration::from_millis(5),
            ..DetectionSettings::default()
        }
    }

    #[test]
    fn test_worker_converts_detections() {
        let mut worker = Worker {
            source: Box::new(FlakySource {
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            estimator: Box::new(OneNeck),
        };
        let poses = worker.detect_at(1.0, 0.1).unwrap();
        assert_eq!(poses.len(), 1);
        assert_eq!(poses[0].get(Joint::Neck).x, 0.5);
        assert!((poses[0].get(Joint::Neck).y - 0.2).abs() < 1e-9);
        assert_eq!(poses[0].get(Joint::Nose), Point::ZERO);

        // Second capture fails and is swallowed.
        assert!(worker.detect_at(1.2, 0.1).is_none());
    }

    #[test]
    fn test_loop_publishes_and_stops() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut detection = DetectionLoop::new(
            Arc::new(FixedClock(2.0)),
            Box::new(FlakySource { calls: calls.clone() }),
            Box::new(OneNeck),
            settings(),
        );
        let output = detection.output();

        detection.start();
        assert!(detection.is_running());
        let mut received = None;
        for _ in 0..200 {
            if let Some(poses) = output.take() {
                received = Some(poses);
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        detection.stop();
        assert!(!detection.is_running());
        assert_eq!(received.map(|p| p.len()), Some(1));

        // Nothing runs after stop.
        let after_stop = calls.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(calls.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn test_failures_publish_nothing() {
        let mut detection = DetectionLoop::new(
            Arc::new(FixedClock(0.0)),
            Box::new(FlakySource {
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            Box::new(AlwaysFails),
            settings(),
        );
        let output = detection.output();
        detection.start();
        std::thread::sleep(Duration::from_millis(40));
        detection.stop();
        assert!(output.take().is_none());
    }

    #[test]
    fn test_restart_is_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut detection = DetectionLoop::new(
            Arc::new(FixedClock(0.0)),
            Box::new(FlakySource { calls: calls.clone() }),
            Box::new(OneNeck),
            settings(),
        );
        detection.stop();
        detection.start();
        detection.start();
        detection.stop();
        detection.stop();
        detection.start();
        assert!(detection.is_running());
        drop(detection);
    }

    /// Takes `delay` per detection and counts calls.
    struct SlowEstimator {
        delay: Duration,
        calls: Arc<AtomicUsize>,
    }

    impl PoseEstimator for SlowEstimator {
        fn detect(&mut self, _frame: &RgbaImage) -> Result<Vec<DetectedPerson>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            Ok(Vec::new())
        }
    }

    /// Panics on its first call, then succeeds.
    struct PanicsOnce {
        calls: usize,
    }

    impl PoseEstimator for PanicsOnce {
        fn detect(&mut self, frame: &RgbaImage) -> Result<Vec<DetectedPerson>> {
            self.calls += 1;
            if self.calls == 1 {
                panic!("estimator bug");
            }
            OneNeck.detect(frame)
        }
    }

    struct StillFrame;

    impl FrameSource for StillFrame {
        fn frame_at(&mut self, _t: f64) -> Result<RgbaImage> {
            Ok(RgbaImage::new(2, 2))
        }
    }

    #[test]
    fn test_slow_detection_keeps_cadence() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut detection = DetectionLoop::new(
            Arc::new(FixedClock(0.0)),
            Box::new(StillFrame),
            Box::new(SlowEstimator {
                delay: Duration::from_millis(25),
                calls: calls.clone(),
            }),
            DetectionSettings {
                interval: Duration::from_millis(50),
                ..DetectionSettings::default()
            },
        );
        detection.start();
        std::thread::sleep(Duration::from_millis(520));
        detection.stop();

        // A fixed 50 ms cadence gives ~10 passes; interval-after-work gives ~7.
        let passes = calls.load(Ordering::SeqCst);
        assert!(passes >= 8, "only {} detection passes", passes);
    }

    #[test]
    fn test_estimator_panic_skips_tick() {
        let mut detection = DetectionLoop::new(
            Arc::new(FixedClock(0.0)),
            Box::new(StillFrame),
            Box::new(PanicsOnce { calls: 0 }),
            settings(),
        );
        let output = detection.output();
        detection.start();

        let mut received = None;
        for _ in 0..200 {
            if let Some(poses) = output.take() {
                received = Some(poses);
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        detection.stop();
        assert_eq!(received.map(|p| p.len()), Some(1));

        // The worker survived and can be restarted.
        detection.start();
        assert!(detection.is_running());
    }
}
