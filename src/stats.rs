use crate::session::Session;
use chrono::{DateTime, Datelike, Duration, Local, NaiveTime};

/// First day of the week used for the "this week" window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum WeekStart {
    Sunday,
    Monday,
}

impl WeekStart {
    /// Parse a configured name, falling back to Sunday (the original
    /// week-zero policy) for anything unrecognized.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "monday" => WeekStart::Monday,
            _ => WeekStart::Sunday,
        }
    }
}

/// Aggregate over the sessions falling inside one calendar window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowStats {
    pub count: usize,
    pub total_ms: u64,
    /// `total_ms / count`, or 0 when the window is empty
    pub average_ms: u64,
}

/// Count/total/average for sessions with `timestamp >= window_start`.
pub fn summarize(sessions: &[Session], window_start: DateTime<Local>) -> WindowStats {
    let (count, total_ms) = sessions
        .iter()
        .filter(|s| s.timestamp >= window_start)
        .fold((0usize, 0u64), |(n, total), s| (n + 1, total + s.duration));

    let average_ms = if count > 0 { total_ms / count as u64 } else { 0 };

    WindowStats {
        count,
        total_ms,
        average_ms,
    }
}

/// Local midnight of the current day.
pub fn start_of_day(now: DateTime<Local>) -> DateTime<Local> {
    now.date_naive()
        .and_time(NaiveTime::MIN)
        .and_local_timezone(Local)
        .earliest()
        .unwrap_or(now)
}

/// Local midnight of the most recent week-start day.
pub fn start_of_week(now: DateTime<Local>, week_start: WeekStart) -> DateTime<Local> {
    let days_back = match week_start {
        WeekStart::Sunday => now.weekday().num_days_from_sunday(),
        WeekStart::Monday => now.weekday().num_days_from_monday(),
    };
    start_of_day(now - Duration::days(days_back as i64))
}

/// Local midnight of the first day of the current month.
pub fn start_of_month(now: DateTime<Local>) -> DateTime<Local> {
    let first = now.date_naive().with_day(1).unwrap_or(now.date_naive());
    first
        .and_time(NaiveTime::MIN)
        .and_local_timezone(Local)
        .earliest()
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::format_duration;
    use chrono::{Timelike, Weekday};

    fn session_at(timestamp: DateTime<Local>, duration: u64) -> Session {
        Session {
            timestamp,
            duration,
            display_duration: format_duration(duration),
            laps: vec![],
        }
    }

    #[test]
    fn test_summarize_empty_is_all_zero() {
        let stats = summarize(&[], start_of_day(Local::now()));
        assert_eq!(stats, WindowStats::default());
        assert_eq!(stats.average_ms, 0);
    }

    #[test]
    fn test_summarize_filters_on_window_start() {
        let now = Local::now();
        let sessions = vec![
            session_at(now - Duration::minutes(5), 60_000),
            session_at(now - Duration::minutes(1), 30_000),
            session_at(now - Duration::days(40), 999_000),
        ];

        let stats = summarize(&sessions, now - Duration::hours(1));
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total_ms, 90_000);
        assert_eq!(stats.average_ms, 45_000);
    }

    #[test]
    fn test_summarize_truncates_average() {
        let now = Local::now();
        let sessions = vec![
            session_at(now, 10_000),
            session_at(now, 10_000),
            session_at(now, 10_001),
        ];
        let stats = summarize(&sessions, now - Duration::hours(1));
        assert_eq!(stats.average_ms, 10_000);
    }

    #[test]
    fn test_start_of_day_is_midnight_today() {
        let now = Local::now();
        let start = start_of_day(now);
        assert_eq!(start.date_naive(), now.date_naive());
        assert_eq!(start.hour(), 0);
        assert_eq!(start.minute(), 0);
        assert_eq!(start.second(), 0);
        assert!(start <= now);
    }

    #[test]
    fn test_start_of_week_lands_on_configured_day() {
        let now = Local::now();

        let sunday = start_of_week(now, WeekStart::Sunday);
        assert_eq!(sunday.weekday(), Weekday::Sun);
        assert!(sunday <= now);
        assert!(now - sunday < Duration::days(7));

        let monday = start_of_week(now, WeekStart::Monday);
        assert_eq!(monday.weekday(), Weekday::Mon);
        assert!(monday <= now);
        assert!(now - monday < Duration::days(7));
    }

    #[test]
    fn test_start_of_month_is_the_first() {
        let now = Local::now();
        let start = start_of_month(now);
        assert_eq!(start.day(), 1);
        assert_eq!(start.month(), now.month());
        assert!(start <= now);
    }

    #[test]
    fn test_week_start_from_name() {
        assert_eq!(WeekStart::from_name("monday"), WeekStart::Monday);
        assert_eq!(WeekStart::from_name("Sunday"), WeekStart::Sunday);
        assert_eq!(WeekStart::from_name("whatever"), WeekStart::Sunday);
    }
}
