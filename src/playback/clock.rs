// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback clock and the redraw-rate observer that follows it.
//!
//! The video player is an external component; all the overlay needs from
//! it is the current playback time. [`SimulatedClock`] provides a
//! wall-clock driven stand-in with play/pause/seek for running without a
//! video backend.

use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Source of the current playback position, in seconds.
pub trait PlaybackClock: Send + Sync {
    fn current_time(&self) -> f64;
}

#[derive(Debug)]
struct ClockState {
    /// Position at the moment playback last started or was seeked.
    position: f64,
    /// Set while playing.
    started_at: Option<Instant>,
    duration: Option<f64>,
}

impl ClockState {
    fn now(&self) -> f64 {
        let elapsed = self
            .started_at
            .map_or(0.0, |start| start.elapsed().as_secs_f64());
        let t = self.position + elapsed;
        match self.duration {
            Some(end) => t.min(end),
            None => t,
        }
    }
}

/// A clock that advances with wall time while playing.
#[derive(Debug)]
pub struct SimulatedClock {
    state: Mutex<ClockState>,
}

impl Default for SimulatedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedClock {
    /// A paused clock at zero with no end.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ClockState {
                position: 0.0,
                started_at: None,
                duration: None,
            }),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut ClockState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    pub fn play(&self) {
        self.with_state(|s| {
            if s.started_at.is_none() {
                s.started_at = Some(Instant::now());
            }
        });
    }

    pub fn pause(&self) {
        self.with_state(|s| {
            s.position = s.now();
            s.started_at = None;
        });
    }

    /// Jump to `t`, clamped to `[0, duration]`. Keeps playing if playing.
    pub fn seek(&self, t: f64) {
        self.with_state(|s| {
            let mut target = t.max(0.0);
            if let Some(end) = s.duration {
                target = target.min(end);
            }
            s.position = target;
            if s.started_at.is_some() {
                s.started_at = Some(Instant::now());
            }
        });
    }

    pub fn is_playing(&self) -> bool {
        self.with_state(|s| s.started_at.is_some())
    }

    /// Limit playback to `duration` seconds, or remove the limit.
    pub fn set_duration(&self, duration: Option<f64>) {
        self.with_state(|s| {
            s.position = s.now();
            if s.started_at.is_some() {
                s.started_at = Some(Instant::now());
            }
            s.duration = duration;
            if let Some(end) = duration {
                s.position = s.position.min(end);
            }
        });
    }

    pub fn duration(&self) -> Option<f64> {
        self.with_state(|s| s.duration)
    }

    /// True once a bounded clock has reached its end.
    pub fn is_finished(&self) -> bool {
        self.with_state(|s| s.duration.map_or(false, |end| s.now() >= end))
    }
}

impl PlaybackClock for SimulatedClock {
    fn current_time(&self) -> f64 {
        self.with_state(|s| s.now())
    }
}

/// Follows a clock on every redraw tick.
///
/// While attached, [`tick`](ClockObserver::tick) samples the clock and
/// returns the new time. Detached observers return `None` and never touch
/// the clock. `start` and `stop` may be called any number of times.
#[derive(Default)]
pub struct ClockObserver {
    clock: Option<Arc<dyn PlaybackClock>>,
    current_time: f64,
}

impl ClockObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach to `clock`, replacing any previous attachment.
    pub fn start(&mut self, clock: Arc<dyn PlaybackClock>) {
        self.stop();
        self.clock = Some(clock);
    }

    pub fn stop(&mut self) {
        self.clock = None;
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_some()
    }

    /// Sample the clock. Returns the observed time while attached.
    pub fn tick(&mut self) -> Option<f64> {
        let clock = self.clock.as_ref()?;
        self.current_time = clock.current_time();
        Some(self.current_time)
    }

    /// The most recently observed time.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingClock {
        reads: AtomicUsize,
    }

    impl PlaybackClock for CountingClock {
        fn current_time(&self) -> f64 {
            self.reads.fetch_add(1, Ordering::SeqCst) as f64
        }
    }

    #[test]
    fn test_paused_clock_holds_position() {
        let clock = SimulatedClock::new();
        clock.seek(3.5);
        assert_eq!(clock.current_time(), 3.5);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(clock.current_time(), 3.5);
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_playing_clock_advances() {
        let clock = SimulatedClock::new();
        clock.play();
        std::thread::sleep(Duration::from_millis(20));
        clock.pause();
        let t = clock.current_time();
        assert!(t >= 0.02, "clock only reached {}", t);
    }

    #[test]
    fn test_seek_clamps() {
        let clock = SimulatedClock::new();
        clock.set_duration(Some(10.0));
        clock.seek(-4.0);
        assert_eq!(clock.current_time(), 0.0);
        clock.seek(25.0);
        assert_eq!(clock.current_time(), 10.0);
        assert!(clock.is_finished());
    }

    #[test]
    fn test_observer_start_stop_idempotent() {
        let clock = Arc::new(CountingClock {
            reads: AtomicUsize::new(0),
        });
        let mut observer = ClockObserver::new();
        assert_eq!(observer.tick(), None);

        observer.start(clock.clone());
        observer.start(clock.clone());
        assert_eq!(observer.tick(), Some(0.0));
        assert_eq!(observer.tick(), Some(1.0));

        observer.stop();
        observer.stop();
        assert_eq!(observer.tick(), None);
        assert_eq!(clock.reads.load(Ordering::SeqCst), 2);
        assert_eq!(observer.current_time(), 1.0);

        observer.start(clock.clone());
        assert!(observer.is_running());
        assert_eq!(observer.tick(), Some(2.0));
    }
}
