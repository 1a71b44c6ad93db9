// Clock module
// Elapsed-time engine, timecode conversions, and transport glue

pub mod command;
pub mod engine;
pub mod hold;
pub mod media;
pub mod timecode;

pub use command::{ClockCommand, CommandOutcome};
pub use engine::{ClockEngine, ClockState, ManualClock, SystemClock, WallClock};
pub use hold::{HoldTimer, DEFAULT_HOLD_DELAY};
pub use media::{MediaSource, ScriptedMedia};
pub use timecode::{StampParts, TimeFields, MAX_TIME_SECONDS};
