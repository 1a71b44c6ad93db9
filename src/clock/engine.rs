// Clock engine - Transport state machine for the elapsed-time clock
// Elapsed time is recomputed from a wall-clock anchor on every tick rather
// than accumulated per tick, so display refresh jitter never drifts the clock

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use log::{debug, info};

use crate::clock::media::MediaSource;
use crate::clock::timecode::{self, MAX_TIME_SECONDS};

/// Source of monotonic wall-clock readings, in seconds.
///
/// Only deltas between readings are meaningful. Production code uses
/// [`SystemClock`]; tests drive the engine with a [`ManualClock`].
pub trait WallClock {
    fn now(&self) -> f64;
}

/// Wall clock backed by `std::time::Instant`
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Manually advanced clock for tests and simulations.
///
/// Clones share one reading, so a test can hand a clone to the engine and
/// keep advancing time through its own handle.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the reading forward
    pub fn advance(&self, seconds: f64) {
        self.time.set(self.time.get() + seconds);
    }

    /// Pin the reading to an absolute value
    pub fn set(&self, seconds: f64) {
        self.time.set(seconds);
    }
}

impl WallClock for ManualClock {
    fn now(&self) -> f64 {
        self.time.get()
    }
}

/// Clock run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockState {
    #[default]
    Stopped,
    Paused,
    Running,
}

impl ClockState {
    pub fn is_running(&self) -> bool {
        matches!(self, ClockState::Running)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, ClockState::Paused)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, ClockState::Stopped)
    }
}

/// The elapsed-time engine.
///
/// Holds the logical clock state: run state, elapsed offset, wall-clock
/// anchor and speed multiplier. The embedding event loop calls [`tick`]
/// periodically to refresh the display; every transport operation keeps
/// the displayed reading continuous at the moment it is applied.
///
/// While an attached [`MediaSource`] reports itself playing, ticks read
/// the media position directly instead of integrating wall-clock deltas,
/// and the effective time ceiling becomes the media duration.
///
/// [`tick`]: ClockEngine::tick
pub struct ClockEngine {
    wall: Box<dyn WallClock>,
    media: Option<Box<dyn MediaSource>>,

    state: ClockState,
    /// Elapsed seconds at the moment the anchor was taken
    elapsed_offset: f64,
    /// Wall-clock reading the offset is measured from; set iff running
    anchor: Option<f64>,
    /// Scalar applied to wall-clock deltas: 1 = play, negative = rewind,
    /// other positive values = fast-forward
    speed: f64,
    /// Last reading pushed to the display; survives a stop
    displayed: f64,
    /// Pinned note timestamp while the freeze latch is set
    frozen: Option<f64>,
}

impl ClockEngine {
    /// Create an engine on the system wall clock
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock::new()))
    }

    /// Create an engine on a caller-supplied wall clock
    pub fn with_clock(wall: Box<dyn WallClock>) -> Self {
        Self {
            wall,
            media: None,
            state: ClockState::Stopped,
            elapsed_offset: 0.0,
            anchor: None,
            speed: 1.0,
            displayed: 0.0,
            frozen: None,
        }
    }

    /// Current run state
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Current speed multiplier
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Last displayed reading in seconds
    pub fn display(&self) -> f64 {
        self.displayed
    }

    /// Last displayed reading as a padded `HH:MM:SS.cc` string
    pub fn display_text(&self) -> String {
        timecode::format_elapsed(self.displayed)
    }

    /// Effective time ceiling: the attached media duration caps the hard
    /// limit while a source is present
    pub fn max_time(&self) -> f64 {
        match &self.media {
            Some(media) => media.duration().min(MAX_TIME_SECONDS),
            None => MAX_TIME_SECONDS,
        }
    }

    /// Attach a media source; the clock slaves to it while it plays
    pub fn attach_media(&mut self, media: Box<dyn MediaSource>) {
        self.media = Some(media);
    }

    /// Detach the media source, reverting to pure wall-clock timing
    pub fn detach_media(&mut self) -> Option<Box<dyn MediaSource>> {
        self.media.take()
    }

    pub fn has_media(&self) -> bool {
        self.media.is_some()
    }

    /// Start recording from the currently displayed time.
    ///
    /// The displayed reading becomes the elapsed offset, which is what
    /// makes a manually edited starting time stick.
    pub fn record(&mut self) {
        let start = self.displayed.min(self.max_time());
        self.elapsed_offset = start;
        self.anchor = Some(self.wall.now());
        self.speed = 1.0;
        self.state = ClockState::Running;
        if let Some(media) = self.media.as_mut() {
            media.seek(start);
            media.play();
        }
        info!("recording started at {}", timecode::format_elapsed(start));
    }

    /// Resume running from a pause, preserving the speed multiplier.
    ///
    /// From a stop this picks up the last displayed reading, like record.
    pub fn play(&mut self) {
        if self.state.is_running() {
            return;
        }
        if self.state.is_stopped() {
            self.elapsed_offset = self.displayed.min(self.max_time());
        }
        self.anchor = Some(self.wall.now());
        self.state = ClockState::Running;
        if let Some(media) = self.media.as_mut() {
            media.play();
        }
        info!("clock running at speed {}", self.speed);
    }

    /// Freeze the displayed time and pause an attached media source
    pub fn pause(&mut self) {
        if !self.state.is_running() {
            return;
        }
        let now = self.wall.now();
        let elapsed = self.elapsed_now(now).clamp(0.0, self.max_time());
        self.elapsed_offset = elapsed;
        self.displayed = elapsed;
        self.anchor = None;
        self.state = ClockState::Paused;
        if let Some(media) = self.media.as_mut() {
            media.pause();
        }
        info!("clock paused at {}", timecode::format_elapsed(elapsed));
    }

    /// Reset all timing state to defaults.
    ///
    /// The last displayed reading stays visible until the next record.
    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
        self.elapsed_offset = 0.0;
        self.anchor = None;
        self.speed = 1.0;
        self.frozen = None;
        if let Some(media) = self.media.as_mut() {
            media.pause();
        }
        info!("clock stopped");
    }

    /// Change the speed multiplier without disturbing the displayed time.
    ///
    /// Re-anchors the wall-clock reference so the reading immediately
    /// before and after the change is identical.
    pub fn set_speed(&mut self, multiplier: f64) {
        if self.state.is_running() {
            let now = self.wall.now();
            self.elapsed_offset = self.elapsed_now(now);
            self.anchor = Some(now);
        }
        self.speed = multiplier;
        debug!("speed multiplier set to {multiplier}");
    }

    /// Continuous rewind at the given positive speed
    pub fn rewind(&mut self, speed: f64) {
        self.set_speed(-speed.abs());
    }

    /// Continuous fast-forward at the given speed
    pub fn fast_forward(&mut self, speed: f64) {
        self.set_speed(speed.abs());
    }

    /// Recompute the elapsed time and refresh the display.
    ///
    /// Reaching the ceiling behaves like an automatic stop press, with the
    /// display clamped to the ceiling. Rewinding through zero pins the
    /// clock at the origin without leaving the running state.
    pub fn tick(&mut self) -> f64 {
        if !self.state.is_running() {
            return self.displayed;
        }

        let now = self.wall.now();
        let mut elapsed = self.elapsed_now(now);
        let ceiling = self.max_time();

        if elapsed >= ceiling {
            info!("elapsed time reached the {ceiling:.2}s ceiling, stopping");
            self.stop();
            self.displayed = ceiling;
            return self.displayed;
        }
        if elapsed < 0.0 {
            elapsed = 0.0;
            self.elapsed_offset = 0.0;
            self.anchor = Some(now);
        }

        self.displayed = elapsed;
        self.displayed
    }

    /// Jump the clock by `delta` seconds, clamped to `[0, max_time]`.
    ///
    /// Returns the delta actually applied, which may be smaller in
    /// magnitude than requested, so the caller can report the true jump.
    /// An attached media source is seeked to the new position.
    pub fn adjust(&mut self, delta: f64) -> f64 {
        let now = self.wall.now();
        let current = if self.state.is_running() {
            self.elapsed_now(now)
        } else {
            self.displayed
        };
        let current = current.clamp(0.0, self.max_time());
        let target = (current + delta).clamp(0.0, self.max_time());
        let applied = target - current;

        self.displayed = target;
        if !self.state.is_stopped() {
            self.elapsed_offset = target;
        }
        if self.state.is_running() {
            self.anchor = Some(now);
        }
        if let Some(media) = self.media.as_mut() {
            media.seek(target);
        }

        debug!("adjusted by {applied:+.2}s of {delta:+.2}s requested");
        applied
    }

    /// Pin the displayed time to an absolute reading, clamped to the ceiling
    pub fn set_time(&mut self, seconds: f64) {
        let target = seconds.clamp(0.0, self.max_time());
        self.displayed = target;
        if !self.state.is_stopped() {
            self.elapsed_offset = target;
        }
        if self.state.is_running() {
            self.anchor = Some(self.wall.now());
        }
        if let Some(media) = self.media.as_mut() {
            media.seek(target);
        }
    }

    /// Latch or release the note timestamp.
    ///
    /// While latched, [`current_timestamp`] keeps returning the reading
    /// captured at freeze time; releasing resynchronizes it with the live
    /// clock. Independent of the run state.
    ///
    /// [`current_timestamp`]: ClockEngine::current_timestamp
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = if frozen { Some(self.displayed) } else { None };
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    /// Timestamp to attach to a note written right now
    pub fn current_timestamp(&self) -> f64 {
        self.frozen.unwrap_or(self.displayed)
    }

    /// Elapsed time at the given wall-clock reading.
    ///
    /// Slaved to the media position while an attached source is playing;
    /// otherwise integrated from the anchor.
    fn elapsed_now(&self, now: f64) -> f64 {
        if let Some(media) = &self.media {
            if media.is_playing() {
                return media.position();
            }
        }
        match self.anchor {
            Some(anchor) => self.elapsed_offset + (now - anchor) * self.speed,
            None => self.elapsed_offset,
        }
    }
}

impl Default for ClockEngine {
    fn default() -> Self {
        Self::new()
    }
}
