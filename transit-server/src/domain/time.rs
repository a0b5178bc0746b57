//! Time of day handling for line schedules.
//!
//! Schedules give departure times as "hh:mm" strings. Searches add transit
//! durations to those times and compare the results, so this module wraps a
//! chrono `NaiveTime` with second-based arithmetic that wraps at midnight.

use chrono::{Duration, NaiveTime, Timelike};
use std::fmt;

/// Number of seconds in one day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Error returned when parsing or building an invalid time of day.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day with second precision.
///
/// Adding a duration wraps past midnight, so `23:59:30 + 45s` is `00:00:15`.
/// Use [`TimeOfDay::add_seconds_with_days`] when the caller needs to know how
/// many midnights were crossed.
///
/// # Examples
///
/// ```
/// use transit_server::domain::TimeOfDay;
///
/// let t = TimeOfDay::parse("08:15").unwrap();
/// assert_eq!(t.to_string(), "08:15:00");
/// assert_eq!(t.add_seconds(3_600).to_string(), "09:15:00");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// 00:00:00.
    pub fn midnight() -> Self {
        Self(NaiveTime::MIN)
    }

    /// Build a time from its components.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Result<Self, TimeError> {
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        if second > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }
        NaiveTime::from_hms_opt(hour, minute, second)
            .map(Self)
            .ok_or_else(|| TimeError::new("invalid time"))
    }

    /// Build a time from seconds since midnight, wrapping whole days.
    pub fn from_seconds(seconds: u32) -> Self {
        Self::midnight().add_seconds(seconds)
    }

    /// Parse "hh:mm" or "hh:mm:ss".
    ///
    /// Each field is one or two ASCII digits.
    ///
    /// ```
    /// use transit_server::domain::TimeOfDay;
    ///
    /// assert!(TimeOfDay::parse("7:05").is_ok());
    /// assert!(TimeOfDay::parse("23:59:59").is_ok());
    /// assert!(TimeOfDay::parse("24:00").is_err());
    /// assert!(TimeOfDay::parse("0715").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let fields: Vec<&str> = s.trim().split(':').collect();
        let (h, m, sec) = match fields.as_slice() {
            [h, m] => (*h, *m, "0"),
            [h, m, sec] => (*h, *m, *sec),
            _ => return Err(TimeError::new("expected hh:mm or hh:mm:ss")),
        };

        let hour = parse_field(h).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute = parse_field(m).ok_or_else(|| TimeError::new("invalid minute digits"))?;
        let second = parse_field(sec).ok_or_else(|| TimeError::new("invalid second digits"))?;

        Self::from_hms(hour, minute, second)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    /// Seconds elapsed since midnight (0..86 400).
    pub fn seconds_from_midnight(&self) -> u32 {
        self.0.num_seconds_from_midnight()
    }

    /// Add a number of seconds, wrapping past midnight.
    pub fn add_seconds(&self, seconds: u32) -> Self {
        self.add_seconds_with_days(seconds).0
    }

    /// Add a number of seconds and report how many midnights were crossed.
    ///
    /// ```
    /// use transit_server::domain::TimeOfDay;
    ///
    /// let late = TimeOfDay::parse("23:00").unwrap();
    /// let (t, days) = late.add_seconds_with_days(2 * 3_600);
    /// assert_eq!(t.to_string(), "01:00:00");
    /// assert_eq!(days, 1);
    /// ```
    pub fn add_seconds_with_days(&self, seconds: u32) -> (Self, u32) {
        let (time, overflow) = self
            .0
            .overflowing_add_signed(Duration::seconds(i64::from(seconds)));
        let days = (overflow / i64::from(SECONDS_PER_DAY)) as u32;
        (Self(time), days)
    }
}

impl Default for TimeOfDay {
    fn default() -> Self {
        Self::midnight()
    }
}

impl fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeOfDay({self})")
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

/// Parse a one- or two-digit ASCII field.
fn parse_field(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    #[test]
    fn parse_valid_times() {
        assert_eq!(t("00:00"), TimeOfDay::midnight());
        assert_eq!(t("14:30").hour(), 14);
        assert_eq!(t("14:30").minute(), 30);
        assert_eq!(t("14:30:15").second(), 15);
        assert_eq!(t("7:05"), t("07:05"));
        assert_eq!(t(" 09:10 "), t("09:10"));
    }

    #[test]
    fn parse_invalid_format() {
        assert!(TimeOfDay::parse("").is_err());
        assert!(TimeOfDay::parse("1430").is_err());
        assert!(TimeOfDay::parse("14:").is_err());
        assert!(TimeOfDay::parse("14:300").is_err());
        assert!(TimeOfDay::parse("1a:30").is_err());
        assert!(TimeOfDay::parse("14:30:00:00").is_err());
    }

    #[test]
    fn parse_invalid_values() {
        assert!(TimeOfDay::parse("24:00").is_err());
        assert!(TimeOfDay::parse("12:60").is_err());
        assert!(TimeOfDay::parse("12:00:60").is_err());
    }

    #[test]
    fn display_format() {
        assert_eq!(t("9:05").to_string(), "09:05:00");
        assert_eq!(format!("{:?}", t("23:59:59")), "TimeOfDay(23:59:59)");
    }

    #[test]
    fn add_within_hour() {
        assert_eq!(t("10:00").add_seconds(150), t("10:02:30"));
    }

    #[test]
    fn add_crosses_hour() {
        assert_eq!(t("10:59:50").add_seconds(20), t("11:00:10"));
    }

    #[test]
    fn add_crosses_midnight() {
        let (time, days) = t("23:59:30").add_seconds_with_days(45);
        assert_eq!(time, t("00:00:15"));
        assert_eq!(days, 1);
    }

    #[test]
    fn add_several_days() {
        let (time, days) = t("12:00").add_seconds_with_days(3 * SECONDS_PER_DAY + 60);
        assert_eq!(time, t("12:01"));
        assert_eq!(days, 3);
    }

    #[test]
    fn from_seconds_wraps() {
        assert_eq!(TimeOfDay::from_seconds(3_661), t("01:01:01"));
        assert_eq!(TimeOfDay::from_seconds(SECONDS_PER_DAY + 60), t("00:01"));
    }

    #[test]
    fn ordering() {
        assert!(t("08:00") < t("08:00:01"));
        assert!(t("23:59") > t("00:00"));
        let mut times = vec![t("12:00"), t("06:30"), t("18:45")];
        times.sort();
        assert_eq!(times, vec![t("06:30"), t("12:00"), t("18:45")]);
    }
}
