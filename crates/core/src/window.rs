use std::fmt;

use crate::gateway::Timespan;

pub const MINUTE_SECS: u64 = 60;
pub const HOUR_SECS: u64 = 60 * MINUTE_SECS;
pub const DAY_SECS: u64 = 24 * HOUR_SECS;
pub const WEEK_SECS: u64 = 7 * DAY_SECS;
pub const MONTH_SECS: u64 = 30 * DAY_SECS;

/// Traffic statistics are only available between these bounds (inclusive).
pub const TRAFFIC_MIN_SECS: u64 = 2 * HOUR_SECS;
pub const TRAFFIC_MAX_SECS: u64 = MONTH_SECS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

impl TimeUnit {
    /// Accepts singular and plural unit names, any case.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        let singular = normalized.strip_suffix('s').unwrap_or(&normalized);
        match singular {
            "minute" | "min" => Some(Self::Minute),
            "hour" | "h" => Some(Self::Hour),
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }

    pub fn seconds(&self) -> u64 {
        match self {
            Self::Minute => MINUTE_SECS,
            Self::Hour => HOUR_SECS,
            Self::Day => DAY_SECS,
            Self::Week => WEEK_SECS,
            Self::Month => MONTH_SECS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeWindow {
    pub amount: f64,
    pub unit: TimeUnit,
}

impl TimeWindow {
    /// `None` when the amount is not a positive number or the unit is unknown.
    pub fn parse(amount: &str, unit: &str) -> Option<Self> {
        let amount = amount.trim().parse::<f64>().ok().filter(|value| value.is_finite() && *value > 0.0)?;
        let unit = TimeUnit::parse(unit)?;
        Some(Self { amount, unit })
    }

    pub fn total_seconds(&self) -> u64 {
        (self.amount * self.unit.seconds() as f64).round() as u64
    }

    pub fn timespan(&self) -> Timespan {
        Timespan { seconds: self.total_seconds() }
    }

    pub fn within_traffic_range(&self) -> bool {
        (TRAFFIC_MIN_SECS..=TRAFFIC_MAX_SECS).contains(&self.total_seconds())
    }
}

impl fmt::Display for TimeWindow {
    /// Rendered as the conversation phrases it, e.g. `1 day` or `3 hours`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.amount == 1.0 { "" } else { "s" };
        write!(f, "{} {}{plural}", self.amount, self.unit.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{TimeUnit, TimeWindow, MONTH_SECS, TRAFFIC_MAX_SECS, TRAFFIC_MIN_SECS};

    #[test]
    fn unit_parse_accepts_plurals() {
        assert_eq!(TimeUnit::parse("Hours"), Some(TimeUnit::Hour));
        assert_eq!(TimeUnit::parse("day"), Some(TimeUnit::Day));
        assert_eq!(TimeUnit::parse("fortnight"), None);
        assert_eq!(TimeUnit::Month.seconds(), MONTH_SECS);
    }

    #[test]
    fn traffic_range_is_inclusive_at_both_bounds() {
        let lower = TimeWindow::parse("2", "hour").expect("window");
        let upper = TimeWindow::parse("1", "month").expect("window");
        let upper_in_days = TimeWindow::parse("30", "day").expect("window");
        assert_eq!(lower.total_seconds(), TRAFFIC_MIN_SECS);
        assert_eq!(upper.total_seconds(), TRAFFIC_MAX_SECS);
        assert!(lower.within_traffic_range());
        assert!(upper.within_traffic_range());
        assert!(upper_in_days.within_traffic_range());
    }

    #[test]
    fn traffic_range_rejects_just_outside_bounds() {
        let short = TimeWindow::parse("119", "minute").expect("window");
        let long = TimeWindow::parse("43201", "minute").expect("window");
        assert!(!short.within_traffic_range());
        assert!(!long.within_traffic_range());
        assert!(!TimeWindow::parse("1", "hour").expect("window").within_traffic_range());
        assert!(!TimeWindow::parse("5", "week").expect("window").within_traffic_range());
    }

    #[test]
    fn invalid_amounts_do_not_parse() {
        assert!(TimeWindow::parse("soon", "hour").is_none());
        assert!(TimeWindow::parse("-3", "hour").is_none());
        assert!(TimeWindow::parse("0", "day").is_none());
        assert!(TimeWindow::parse("2", "").is_none());
    }

    #[test]
    fn display_pluralises_naturally() {
        assert_eq!(TimeWindow::parse("1", "day").expect("window").to_string(), "1 day");
        assert_eq!(TimeWindow::parse("30", "minutes").expect("window").to_string(), "30 minutes");
        assert_eq!(TimeWindow::parse("1.5", "hour").expect("window").to_string(), "1.5 hours");
    }
}
