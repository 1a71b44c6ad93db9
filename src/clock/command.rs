// Clock commands - Button-equivalent events as a tagged enum
// One dispatch entry point instead of a callback table per widget

use serde::{Deserialize, Serialize};

use crate::clock::engine::{ClockEngine, ClockState};

/// Transport command issued by the embedding layer.
///
/// Speeds are positive magnitudes; `Rewind` applies its own sign. Deltas
/// and absolute times are in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClockCommand {
    Record,
    Play,
    Pause,
    Stop,
    Rewind(f64),
    FastForward(f64),
    Jump(f64),
    SetTime(f64),
    Freeze(bool),
}

/// What a dispatched command did.
///
/// Clock operations are total, so dispatch always produces an outcome;
/// `Adjusted` reports the clamped delta so the caller can tell the user
/// how far the clock actually moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandOutcome {
    Transitioned(ClockState),
    SpeedChanged(f64),
    Adjusted { requested: f64, applied: f64 },
    TimeSet(f64),
    Frozen(bool),
}

impl ClockEngine {
    /// Apply a transport command to the engine
    pub fn apply(&mut self, command: ClockCommand) -> CommandOutcome {
        match command {
            ClockCommand::Record => {
                self.record();
                CommandOutcome::Transitioned(self.state())
            }
            ClockCommand::Play => {
                self.play();
                CommandOutcome::Transitioned(self.state())
            }
            ClockCommand::Pause => {
                self.pause();
                CommandOutcome::Transitioned(self.state())
            }
            ClockCommand::Stop => {
                self.stop();
                CommandOutcome::Transitioned(self.state())
            }
            ClockCommand::Rewind(speed) => {
                self.rewind(speed);
                CommandOutcome::SpeedChanged(self.speed())
            }
            ClockCommand::FastForward(speed) => {
                self.fast_forward(speed);
                CommandOutcome::SpeedChanged(self.speed())
            }
            ClockCommand::Jump(delta) => {
                let applied = self.adjust(delta);
                CommandOutcome::Adjusted {
                    requested: delta,
                    applied,
                }
            }
            ClockCommand::SetTime(seconds) => {
                self.set_time(seconds);
                CommandOutcome::TimeSet(self.display())
            }
            ClockCommand::Freeze(frozen) => {
                self.set_frozen(frozen);
                CommandOutcome::Frozen(frozen)
            }
        }
    }
}
