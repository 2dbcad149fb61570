//! Formatting utilities

use chrono::NaiveDate;

/// Day-first date format used for stats keys and the graph footer
pub const DATE_KEY_FORMAT: &str = "%d.%m.%Y";

/// Format elapsed seconds as a `MM:SS` clock.
///
/// Minutes are not wrapped into hours, so 100 minutes reads `100:00`.
pub fn clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format a calendar date as a `DD.MM.YYYY` stats key
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a `DD.MM.YYYY` stats key back into a date
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()
}

/// Format a duration in minutes as "Xh Ym" or "Ym"
pub fn minutes(total: u32) -> String {
    let hours = total / 60;
    let mins = total % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_known_values() {
        assert_eq!(clock(0), "00:00");
        assert_eq!(clock(65), "01:05");
        assert_eq!(clock(599), "09:59");
        assert_eq!(clock(3600), "60:00");
        assert_eq!(clock(6000), "100:00");
    }

    #[test]
    fn test_clock_matches_div_mod() {
        for s in 0..6000u64 {
            let out = clock(s);
            let (mm, ss) = out.split_once(':').unwrap();
            assert_eq!(mm.len(), 2);
            assert_eq!(ss.len(), 2);
            assert_eq!(mm.parse::<u64>().unwrap(), s / 60);
            assert_eq!(ss.parse::<u64>().unwrap(), s % 60);
        }
    }

    #[test]
    fn test_date_key() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(date_key(date), "07.03.2024");
        assert_eq!(parse_date_key("07.03.2024"), Some(date));
        assert_eq!(parse_date_key("2024-03-07"), None);
    }

    #[test]
    fn test_minutes() {
        assert_eq!(minutes(25), "25m");
        assert_eq!(minutes(90), "1h 30m");
    }
}
