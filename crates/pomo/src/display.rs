//! Terminal output for a running session

use std::io::{self, IsTerminal, Write};

use crate::runner::DisplaySink;
use crate::session::{IntervalKind, SessionEvent};

// ANSI color codes
const GREEN: &str = "\x1b[0;32m";
const RED: &str = "\x1b[0;31m";
const CYAN: &str = "\x1b[0;36m";
const YELLOW: &str = "\x1b[0;33m";
const BOLD: &str = "\x1b[1m";
const NC: &str = "\x1b[0m";

/// Width of the rule printed before each work interval
const RULE_WIDTH: usize = 30;

/// Check if stdout is a TTY and colors should be used
pub fn use_colors() -> bool {
    io::stdout().is_terminal()
}

/// Wrap text in a color code when enabled
pub fn paint(enabled: bool, code: &str, text: &str) -> String {
    if enabled {
        format!("{}{}{}", code, text, NC)
    } else {
        text.to_string()
    }
}

/// Writes session progress to a terminal: line-oriented labels and a
/// carriage-return clock
pub struct TerminalDisplay<W: Write> {
    out: W,
    colors: bool,
    size: u32,
}

impl TerminalDisplay<io::Stdout> {
    pub fn stdout(size: u32) -> Self {
        Self::new(io::stdout(), use_colors(), size)
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, colors: bool, size: u32) -> Self {
        Self { out, colors, size }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, code: &str, text: &str) -> String {
        paint(self.colors, code, text)
    }

    fn render(&self, event: &SessionEvent) -> Option<String> {
        match event {
            SessionEvent::IntervalStarted { interval, label } => Some(match interval.kind {
                IntervalKind::Work => format!(
                    "\n{}\n{}\n{}\n",
                    "#".repeat(RULE_WIDTH),
                    self.paint(
                        GREEN,
                        &format!("Pomodoro {}/{} started!", interval.index, self.size)
                    ),
                    self.paint(GREEN, label)
                ),
                IntervalKind::Break => format!("\n{}\n", self.paint(RED, label)),
                IntervalKind::LongBreak => {
                    format!("\n{} {}\n", self.paint(YELLOW, "[long]"), self.paint(RED, label))
                }
            }),
            SessionEvent::Tick { display, .. } => Some(format!("\r{}", display)),
            SessionEvent::WorkCompleted { .. } => None,
            SessionEvent::SessionCompleted { work_intervals } => Some(format!(
                "\n\n{} {} pomodoros completed\n{}\n",
                self.paint(GREEN, "[ok]"),
                work_intervals,
                self.paint(BOLD, "Thank you for using pomo! :)")
            )),
        }
    }
}

impl<W: Write> DisplaySink for TerminalDisplay<W> {
    fn show(&mut self, event: &SessionEvent) {
        if let Some(text) = self.render(event) {
            let _ = self.out.write_all(text.as_bytes());
            let _ = self.out.flush();
        }
    }

    fn interrupted(&mut self, completed_work: u32) {
        let text = format!(
            "\n\n{} Session interrupted; {} completed pomodoros recorded\n",
            self.paint(CYAN, "[info]"),
            completed_work
        );
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Interval;

    fn display() -> TerminalDisplay<Vec<u8>> {
        TerminalDisplay::new(Vec::new(), false, 5)
    }

    fn output(display: TerminalDisplay<Vec<u8>>) -> String {
        String::from_utf8(display.into_inner()).unwrap()
    }

    #[test]
    fn test_paint() {
        assert_eq!(paint(false, GREEN, "ok"), "ok");
        assert_eq!(paint(true, GREEN, "ok"), "\x1b[0;32mok\x1b[0m");
    }

    #[test]
    fn test_work_start_banner() {
        let mut d = display();
        d.show(&SessionEvent::IntervalStarted {
            interval: Interval {
                index: 2,
                kind: IntervalKind::Work,
                duration_secs: 1500,
            },
            label: "Focus".to_string(),
        });
        let out = output(d);
        assert!(out.contains(&"#".repeat(RULE_WIDTH)));
        assert!(out.contains("Pomodoro 2/5 started!"));
        assert!(out.contains("Focus"));
    }

    #[test]
    fn test_tick_overwrites_line() {
        let mut d = display();
        let interval = Interval {
            index: 1,
            kind: IntervalKind::Work,
            duration_secs: 60,
        };
        for elapsed in [1, 2] {
            d.show(&SessionEvent::Tick {
                interval,
                elapsed,
                display: pomo_core::format::clock(elapsed),
            });
        }
        assert_eq!(output(d), "\r00:01\r00:02");
    }

    #[test]
    fn test_long_break_marked() {
        let mut d = display();
        d.show(&SessionEvent::IntervalStarted {
            interval: Interval {
                index: 4,
                kind: IntervalKind::LongBreak,
                duration_secs: 900,
            },
            label: "Rest".to_string(),
        });
        assert_eq!(output(d), "\n[long] Rest\n");
    }

    #[test]
    fn test_interrupted_message() {
        let mut d = display();
        d.interrupted(2);
        assert!(output(d).contains("2 completed pomodoros recorded"));
    }
}
