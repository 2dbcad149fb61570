//! Weekly ASCII histogram of completed work intervals
//!
//! Covers the 8 calendar days from a week ago through today, oldest on the
//! left:
//!
//! ```text
//! 3 |         #
//! 2 |     #   #                   #
//! 1 |     #   #   #               #
//!   +--------------------------------
//!     11  12  13  14  15  16  17  18
//!    11.10.2026 - 18.10.2026
//! ```

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};

use crate::stats::StatsRecord;
use pomo_core::format::date_key;

/// Days shown, today included
pub const WINDOW_DAYS: usize = 8;

/// Characters per day column
const COLUMN_WIDTH: usize = 4;

const MARKER: &str = "#";

/// The dates covered by the graph, oldest first
pub fn window(today: NaiveDate) -> Vec<NaiveDate> {
    (0..WINDOW_DAYS as i64)
        .rev()
        .map(|back| today - Duration::days(back))
        .collect()
}

/// Render the graph for the week ending on the day of `now`
pub fn render<Tz: TimeZone>(record: &StatsRecord, now: &DateTime<Tz>) -> String {
    render_for(record, now.date_naive())
}

/// Render the graph for the week ending on `today`
pub fn render_for(record: &StatsRecord, today: NaiveDate) -> String {
    let dates = window(today);
    let counts: Vec<u32> = dates.iter().map(|d| record.count_on(*d)).collect();
    let height = counts.iter().copied().max().unwrap_or(0);
    let label_width = height.to_string().len();

    let mut lines = Vec::with_capacity(height as usize + 3);

    for row in (1..=height).rev() {
        let cells: String = counts
            .iter()
            .map(|&count| {
                let mark = if count >= row { MARKER } else { " " };
                format!("{:^width$}", mark, width = COLUMN_WIDTH)
            })
            .collect();
        let line = format!("{:>lw$} |{}", row, cells, lw = label_width);
        lines.push(line.trim_end().to_string());
    }

    lines.push(format!(
        "{:>lw$} +{}",
        "",
        "-".repeat(WINDOW_DAYS * COLUMN_WIDTH),
        lw = label_width
    ));

    let days: String = dates
        .iter()
        .map(|d| format!("{:^width$}", format!("{:02}", d.day()), width = COLUMN_WIDTH))
        .collect();
    lines.push(format!("{:>lw$}  {}", "", days.trim_end(), lw = label_width));

    lines.push(format!(
        "{:>lw$}  {} - {}",
        "",
        date_key(dates[0]),
        date_key(dates[WINDOW_DAYS - 1]),
        lw = label_width
    ));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(entries: &[(&str, u32)]) -> StatsRecord {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_window_spans_eight_days() {
        let dates = window(day(2024, 3, 2));
        assert_eq!(dates.len(), 8);
        assert_eq!(dates[0], day(2024, 2, 24));
        assert_eq!(dates[7], day(2024, 3, 2));
    }

    #[test]
    fn test_empty_record() {
        let out = render_for(&StatsRecord::new(), day(2026, 10, 18));
        assert!(!out.contains('#'));
        assert_eq!(
            out,
            concat!(
                "  +--------------------------------\n",
                "    11  12  13  14  15  16  17  18\n",
                "   11.10.2026 - 18.10.2026\n",
            )
        );
    }

    #[test]
    fn test_bars() {
        let rec = record(&[
            ("12.10.2026", 2),
            ("13.10.2026", 3),
            ("14.10.2026", 1),
            ("18.10.2026", 2),
            ("01.01.2020", 9),
        ]);
        let out = render_for(&rec, day(2026, 10, 18));
        assert_eq!(
            out,
            concat!(
                "3 |         #\n",
                "2 |     #   #                   #\n",
                "1 |     #   #   #               #\n",
                "  +--------------------------------\n",
                "    11  12  13  14  15  16  17  18\n",
                "   11.10.2026 - 18.10.2026\n",
            )
        );
    }

    #[test]
    fn test_wide_labels_stay_aligned() {
        let rec = record(&[("18.10.2026", 10)]);
        let out = render_for(&rec, day(2026, 10, 18));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "10 |                             #");
        assert_eq!(lines[9], " 1 |                             #");
        assert_eq!(lines[10], "   +--------------------------------");
        assert!(lines[11].ends_with("18"));
        assert_eq!(lines[11].find("11"), Some(5));
        assert_eq!(lines[0].find('#'), Some(lines[11].rfind("18").unwrap()));
    }

    #[test]
    fn test_window_crosses_month() {
        let out = render_for(&record(&[("28.02.2024", 1)]), day(2024, 3, 2));
        assert!(out.contains("    24  25  26  27  28  29  01  02"));
        assert!(out.ends_with("24.02.2024 - 02.03.2024\n"));
    }

    #[test]
    fn test_pure_and_repeatable() {
        let rec = record(&[("17.10.2026", 4), ("18.10.2026", 1)]);
        let before = rec.clone();
        let now = Local::now();

        let first = render(&rec, &now);
        let second = render(&rec, &now);
        assert_eq!(first, second);
        assert_eq!(rec, before);
    }
}
