// Media source contract for clock slaving
// The engine never depends on a concrete playback library; anything that
// can report a position and duration can drive the clock

use std::cell::RefCell;
use std::rc::Rc;

/// Playback source the clock can be slaved to.
///
/// While an attached source reports `is_playing()`, the engine reads its
/// `position()` on every tick instead of integrating wall-clock deltas,
/// which keeps the displayed time locked to actual decode progress.
pub trait MediaSource {
    /// Current playback position in seconds
    fn position(&self) -> f64;

    /// Move the playback position
    fn seek(&mut self, seconds: f64);

    /// Total duration in seconds
    fn duration(&self) -> f64;

    /// True while the source is actively advancing
    fn is_playing(&self) -> bool;

    /// Start or resume playback
    fn play(&mut self);

    /// Pause playback, keeping the current position
    fn pause(&mut self);
}

#[derive(Debug, Default)]
struct ScriptedState {
    position: f64,
    duration: f64,
    playing: bool,
}

/// Scripted media source with settable state.
///
/// Stands in for a real player in tests and simulations. Clones share one
/// underlying state, so a test can hand a clone to the engine and keep
/// driving the position through its own handle.
#[derive(Debug, Clone, Default)]
pub struct ScriptedMedia {
    state: Rc<RefCell<ScriptedState>>,
}

impl ScriptedMedia {
    /// Create a stopped source of the given duration
    pub fn new(duration: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(ScriptedState {
                position: 0.0,
                duration,
                playing: false,
            })),
        }
    }

    /// Simulate decode progress
    pub fn advance(&self, seconds: f64) {
        let mut state = self.state.borrow_mut();
        state.position = (state.position + seconds).clamp(0.0, state.duration);
    }

    /// Pin the playback position directly
    pub fn set_position(&self, seconds: f64) {
        let mut state = self.state.borrow_mut();
        state.position = seconds.clamp(0.0, state.duration);
    }
}

impl MediaSource for ScriptedMedia {
    fn position(&self) -> f64 {
        self.state.borrow().position
    }

    fn seek(&mut self, seconds: f64) {
        let mut state = self.state.borrow_mut();
        state.position = seconds.clamp(0.0, state.duration);
    }

    fn duration(&self) -> f64 {
        self.state.borrow().duration
    }

    fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    fn play(&mut self) {
        self.state.borrow_mut().playing = true;
    }

    fn pause(&mut self) {
        self.state.borrow_mut().playing = false;
    }
}
