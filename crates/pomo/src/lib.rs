//! pomo - Pomodoro timer in the terminal
//!
//! Runs a session of work intervals separated by breaks, with every
//! `long_break_freq`th break extended, according to a named mode. Each fully
//! completed work interval is counted against the current day, and the last
//! eight days can be drawn as an ASCII bar chart.
//!
//! - [`mode`]: timing profiles and the JSON mode registry
//! - [`session`]: the interval state machine
//! - [`runner`]: the one-second tick loop around it
//! - [`stats`]: per-day completion counts
//! - [`graph`]: the weekly histogram

pub mod display;
pub mod error;
pub mod graph;
pub mod mode;
pub mod runner;
pub mod session;
pub mod stats;

pub use error::PomoError;
pub use mode::{Mode, ModeRegistry, ModeUpdate};
pub use runner::{Clock, DisplaySink, SessionOutcome, SessionRunner, SystemClock};
pub use session::{Interval, IntervalKind, Session, SessionEngine, SessionEvent, SessionState};
pub use stats::{CompletionRecorder, StatsRecord, StatsStore};
