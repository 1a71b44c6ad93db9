// Chrononote - Library exports for tests and embedding layers

pub mod clock;
pub mod notes;

// Re-export commonly used types for convenience
pub use clock::command::{ClockCommand, CommandOutcome};
pub use clock::engine::{ClockEngine, ClockState, ManualClock, SystemClock, WallClock};
pub use clock::hold::{HoldTimer, DEFAULT_HOLD_DELAY};
pub use clock::media::{MediaSource, ScriptedMedia};
pub use clock::timecode::{StampParts, TimeFields, MAX_TIME_SECONDS};
pub use notes::merge::{MergeError, StampPrecision};
pub use notes::note::{MarkerConfig, Note};
