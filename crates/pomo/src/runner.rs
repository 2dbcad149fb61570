//! Session runner
//!
//! Owns the wall-clock loop around a [`SessionEngine`]: sleeps one second per
//! tick, forwards events to the display and notification sinks, and records
//! each completed work interval. A shared cancel flag (set from a signal
//! handler) stops the loop between ticks; the interval in progress is then
//! dropped without being recorded.

use chrono::{DateTime, Local};
use pomo_notify::NotificationSink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::warn;

use crate::error::PomoError;
use crate::session::{IntervalKind, SessionEngine, SessionEvent};
use crate::stats::CompletionRecorder;

/// Time between ticks
pub const TICK: Duration = Duration::from_secs(1);

/// Source of time for the runner
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
    fn sleep(&mut self, duration: Duration);
}

/// The real wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Receives every engine event, in order
pub trait DisplaySink {
    fn show(&mut self, event: &SessionEvent);

    /// Called once if the session is cut short
    fn interrupted(&mut self, _completed_work: u32) {}
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed { work_intervals: u32 },
    Interrupted { work_intervals: u32 },
}

impl SessionOutcome {
    pub fn work_intervals(&self) -> u32 {
        match self {
            SessionOutcome::Completed { work_intervals }
            | SessionOutcome::Interrupted { work_intervals } => *work_intervals,
        }
    }
}

/// Runs one session against injected collaborators
pub struct SessionRunner<'a> {
    engine: SessionEngine,
    clock: &'a mut dyn Clock,
    display: &'a mut dyn DisplaySink,
    notifier: &'a dyn NotificationSink,
    recorder: &'a mut dyn CompletionRecorder,
    cancel: Arc<AtomicBool>,
}

impl<'a> SessionRunner<'a> {
    pub fn new(
        engine: SessionEngine,
        clock: &'a mut dyn Clock,
        display: &'a mut dyn DisplaySink,
        notifier: &'a dyn NotificationSink,
        recorder: &'a mut dyn CompletionRecorder,
    ) -> Self {
        Self {
            engine,
            clock,
            display,
            notifier,
            recorder,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a flag that stops the run when set
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Drive the engine until it completes or the cancel flag is raised
    pub fn run(&mut self) -> SessionOutcome {
        let events = self.engine.start();
        self.dispatch(&events);

        while !self.engine.is_completed() {
            if self.cancelled() {
                return self.interrupt();
            }

            self.clock.sleep(TICK);

            // A signal during the sleep must not let the tick through
            if self.cancelled() {
                return self.interrupt();
            }

            let events = self.engine.tick();
            self.dispatch(&events);
        }

        SessionOutcome::Completed {
            work_intervals: self.engine.completed_work(),
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    fn interrupt(&mut self) -> SessionOutcome {
        let work_intervals = self.engine.completed_work();
        self.display.interrupted(work_intervals);
        SessionOutcome::Interrupted { work_intervals }
    }

    fn dispatch(&mut self, events: &[SessionEvent]) {
        for event in events {
            match event {
                SessionEvent::WorkCompleted { index } => {
                    if let Err(e) = self.recorder.record_completion(self.clock.now()) {
                        warn!("Could not record work interval {}: {:#}", index, e);
                    }
                }
                SessionEvent::IntervalStarted { interval, label } => {
                    let title = match interval.kind {
                        IntervalKind::Work => format!(
                            "Pomodoro {}/{}",
                            interval.index,
                            self.engine.session().size
                        ),
                        IntervalKind::Break => "Break".to_string(),
                        IntervalKind::LongBreak => "Long break".to_string(),
                    };
                    self.notify(&title, label);
                }
                SessionEvent::SessionCompleted { work_intervals } => {
                    let body = format!("Session complete: {} pomodoros done", work_intervals);
                    self.notify(pomo_notify::APP_NAME, &body);
                }
                SessionEvent::Tick { .. } => {}
            }
            self.display.show(event);
        }
    }

    fn notify(&self, title: &str, body: &str) {
        if let Err(e) = self.notifier.notify(title, body) {
            warn!("{}", PomoError::Notification(e.to_string()));
        }
    }
}
