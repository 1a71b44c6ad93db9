// Hold timer - Debounce for press-and-hold transport gestures
// A held rewind/fast-forward button becomes continuous adjustment after a
// short delay; releasing earlier cancels into a single discrete jump

/// Default debounce before a held button commits to continuous mode
pub const DEFAULT_HOLD_DELAY: f64 = 0.25;

/// One-shot debounce timer for a press-and-hold gesture.
///
/// Exactly one of two outcomes occurs per armed gesture: either
/// [`poll`] fires once (the hold committed to continuous adjustment), or
/// [`cancel`] returns true (the press was released early and should be a
/// discrete jump). Time is an explicit parameter, so the timer works with
/// any event loop and can be driven by a simulated clock.
///
/// [`poll`]: HoldTimer::poll
/// [`cancel`]: HoldTimer::cancel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HoldTimer {
    deadline: Option<f64>,
    fired: bool,
}

impl HoldTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer at the current wall-clock reading.
    ///
    /// Re-arming an armed timer restarts the debounce window.
    pub fn arm(&mut self, now: f64, delay: f64) {
        self.deadline = Some(now + delay);
        self.fired = false;
    }

    /// True between arm and fire/cancel
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some() && !self.fired
    }

    /// True once the gesture has committed to continuous mode
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Fire the timer if its deadline has passed.
    ///
    /// Returns true at most once per armed gesture.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if !self.fired && now >= deadline => {
                self.fired = true;
                true
            }
            _ => false,
        }
    }

    /// Release the gesture.
    ///
    /// Returns true when the release happened before the timer fired, in
    /// which case the caller performs the discrete jump. Returns false
    /// when the timer already fired (the caller ends continuous mode
    /// instead) or was never armed. Either way the timer is disarmed.
    pub fn cancel(&mut self) -> bool {
        let jump = self.deadline.is_some() && !self.fired;
        self.deadline = None;
        self.fired = false;
        jump
    }
}
