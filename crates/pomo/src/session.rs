//! Session engine
//!
//! A session is N work intervals with N-1 breaks between them. The engine is
//! a pure state machine: `start` and `tick` advance it and return the events
//! produced. It never sleeps, reads the clock, or touches storage; the runner
//! does that.

use serde::{Deserialize, Serialize};

use crate::error::PomoError;
use crate::mode::Mode;

/// Largest number of work intervals a session may hold
pub const MAX_SESSION_SIZE: u32 = 20;

/// Kind of interval within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    Work,
    Break,
    LongBreak,
}

impl IntervalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalKind::Work => "work",
            IntervalKind::Break => "break",
            IntervalKind::LongBreak => "long_break",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, IntervalKind::Work)
    }
}

/// One work or break span, derived from session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    /// 1-based index of the work interval this belongs to (a break shares
    /// the index of the work interval before it)
    pub index: u32,
    pub kind: IntervalKind,
    pub duration_secs: u64,
}

/// Kind of break that follows completed work interval `index`.
///
/// Every `long_break_freq`th break is long.
pub fn break_kind_of(mode: &Mode, index: u32) -> IntervalKind {
    if mode.long_break_freq > 0 && index % mode.long_break_freq == 0 {
        IntervalKind::LongBreak
    } else {
        IntervalKind::Break
    }
}

/// Length in seconds of an interval of `kind`
pub fn duration_secs(mode: &Mode, kind: IntervalKind) -> u64 {
    let minutes = match kind {
        IntervalKind::Work => mode.work_time,
        IntervalKind::Break => mode.break_time,
        IntervalKind::LongBreak => mode.long_break_time,
    };
    u64::from(minutes) * 60
}

/// Parameters of one session run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub mode_name: String,
    pub mode: Mode,
    /// Number of work intervals
    pub size: u32,
    pub work_label: String,
    pub break_label: String,
}

impl Session {
    pub fn new(
        mode_name: impl Into<String>,
        mode: Mode,
        size: u32,
        work_label: impl Into<String>,
        break_label: impl Into<String>,
    ) -> Self {
        Self {
            mode_name: mode_name.into(),
            mode,
            size,
            work_label: work_label.into(),
            break_label: break_label.into(),
        }
    }

    /// Check mode timings and size before any interval runs
    pub fn validate(&self) -> Result<(), PomoError> {
        self.mode.validate()?;
        if self.size == 0 || self.size > MAX_SESSION_SIZE {
            return Err(PomoError::InvalidSessionSize(self.size));
        }
        Ok(())
    }

    /// The full interval sequence, in order
    pub fn plan(&self) -> Vec<Interval> {
        let mut intervals = Vec::with_capacity((self.size * 2) as usize);
        for index in 1..=self.size {
            intervals.push(self.interval(index, IntervalKind::Work));
            if index < self.size {
                intervals.push(self.interval(index, break_kind_of(&self.mode, index)));
            }
        }
        intervals
    }

    /// Total session length in seconds
    pub fn total_secs(&self) -> u64 {
        self.plan().iter().map(|i| i.duration_secs).sum()
    }

    fn interval(&self, index: u32, kind: IntervalKind) -> Interval {
        Interval {
            index,
            kind,
            duration_secs: duration_secs(&self.mode, kind),
        }
    }

    /// Label announced when an interval of `kind` begins
    pub fn label_for(&self, kind: IntervalKind) -> &str {
        if kind.is_break() {
            &self.break_label
        } else {
            &self.work_label
        }
    }
}

/// Where the engine is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running {
        index: u32,
        kind: IntervalKind,
        elapsed: u64,
    },
    Completed,
}

/// Something the engine wants the outside world to know
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    IntervalStarted { interval: Interval, label: String },
    Tick { interval: Interval, elapsed: u64, display: String },
    /// A work interval ran to its end and must be counted exactly once
    WorkCompleted { index: u32 },
    SessionCompleted { work_intervals: u32 },
}

/// Drives a session through its intervals one tick at a time
#[derive(Debug, Clone)]
pub struct SessionEngine {
    session: Session,
    state: SessionState,
    completed_work: u32,
}

impl SessionEngine {
    pub fn new(session: Session) -> Result<Self, PomoError> {
        session.validate()?;
        Ok(Self {
            session,
            state: SessionState::Idle,
            completed_work: 0,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// Work intervals that ran to completion so far
    pub fn completed_work(&self) -> u32 {
        self.completed_work
    }

    /// The interval currently running, if any
    pub fn current_interval(&self) -> Option<Interval> {
        match self.state {
            SessionState::Running { index, kind, .. } => Some(self.session.interval(index, kind)),
            _ => None,
        }
    }

    /// Enter the first work interval. Does nothing unless idle.
    pub fn start(&mut self) -> Vec<SessionEvent> {
        if self.state != SessionState::Idle {
            return Vec::new();
        }
        self.enter(1, IntervalKind::Work)
    }

    /// Advance one second
    pub fn tick(&mut self) -> Vec<SessionEvent> {
        let (index, kind, elapsed) = match self.state {
            SessionState::Running { index, kind, elapsed } => (index, kind, elapsed + 1),
            SessionState::Idle | SessionState::Completed => return Vec::new(),
        };

        let interval = self.session.interval(index, kind);
        self.state = SessionState::Running { index, kind, elapsed };

        let mut events = vec![SessionEvent::Tick {
            interval,
            elapsed,
            display: pomo_core::format::clock(elapsed),
        }];

        if elapsed < interval.duration_secs {
            return events;
        }

        match kind {
            IntervalKind::Work => {
                self.completed_work += 1;
                events.push(SessionEvent::WorkCompleted { index });

                if index == self.session.size {
                    self.state = SessionState::Completed;
                    events.push(SessionEvent::SessionCompleted {
                        work_intervals: self.completed_work,
                    });
                } else {
                    events.extend(self.enter(index, break_kind_of(&self.session.mode, index)));
                }
            }
            IntervalKind::Break | IntervalKind::LongBreak => {
                events.extend(self.enter(index + 1, IntervalKind::Work));
            }
        }

        events
    }

    fn enter(&mut self, index: u32, kind: IntervalKind) -> Vec<SessionEvent> {
        self.state = SessionState::Running {
            index,
            kind,
            elapsed: 0,
        };
        vec![SessionEvent::IntervalStarted {
            interval: self.session.interval(index, kind),
            label: self.session.label_for(kind).to_string(),
        }]
    }
}
