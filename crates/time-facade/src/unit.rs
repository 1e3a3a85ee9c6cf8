//! Calendar and clock units accepted by arithmetic, boundary and diff
//! operations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A unit of time, from years down to milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 9] = [
        TimeUnit::Year,
        TimeUnit::Quarter,
        TimeUnit::Month,
        TimeUnit::Week,
        TimeUnit::Day,
        TimeUnit::Hour,
        TimeUnit::Minute,
        TimeUnit::Second,
        TimeUnit::Millisecond,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Year => "year",
            TimeUnit::Quarter => "quarter",
            TimeUnit::Month => "month",
            TimeUnit::Week => "week",
            TimeUnit::Day => "day",
            TimeUnit::Hour => "hour",
            TimeUnit::Minute => "minute",
            TimeUnit::Second => "second",
            TimeUnit::Millisecond => "millisecond",
        }
    }

    /// Fixed length in milliseconds for units that measure elapsed time.
    ///
    /// Calendar units (year, quarter, month) have no fixed length and return
    /// `None`. Days and weeks report their nominal length.
    pub fn fixed_millis(&self) -> Option<i64> {
        match self {
            TimeUnit::Week => Some(7 * 86_400_000),
            TimeUnit::Day => Some(86_400_000),
            TimeUnit::Hour => Some(3_600_000),
            TimeUnit::Minute => Some(60_000),
            TimeUnit::Second => Some(1_000),
            TimeUnit::Millisecond => Some(1),
            TimeUnit::Year | TimeUnit::Quarter | TimeUnit::Month => None,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = UnitParseError;

    /// Accepts singular, plural and short forms (`"day"`, `"days"`, `"d"`).
    /// `"M"` is month and `"m"` is minute, so short forms are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => return Ok(TimeUnit::Month),
            "m" => return Ok(TimeUnit::Minute),
            "Q" => return Ok(TimeUnit::Quarter),
            _ => {}
        }
        match s.to_lowercase().as_str() {
            "year" | "years" | "y" => Ok(TimeUnit::Year),
            "quarter" | "quarters" | "q" => Ok(TimeUnit::Quarter),
            "month" | "months" => Ok(TimeUnit::Month),
            "week" | "weeks" | "w" => Ok(TimeUnit::Week),
            "day" | "days" | "d" | "date" => Ok(TimeUnit::Day),
            "hour" | "hours" | "h" => Ok(TimeUnit::Hour),
            "minute" | "minutes" => Ok(TimeUnit::Minute),
            "second" | "seconds" | "s" => Ok(TimeUnit::Second),
            "millisecond" | "milliseconds" | "ms" => Ok(TimeUnit::Millisecond),
            _ => Err(UnitParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown unit name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "invalid time unit '{0}', valid values: year, quarter, month, week, day, hour, minute, second, millisecond"
)]
pub struct UnitParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unit_forms() {
        assert_eq!("day".parse::<TimeUnit>().unwrap(), TimeUnit::Day);
        assert_eq!("Days".parse::<TimeUnit>().unwrap(), TimeUnit::Day);
        assert_eq!("ms".parse::<TimeUnit>().unwrap(), TimeUnit::Millisecond);
        assert_eq!("M".parse::<TimeUnit>().unwrap(), TimeUnit::Month);
        assert_eq!("m".parse::<TimeUnit>().unwrap(), TimeUnit::Minute);
        assert_eq!("quarters".parse::<TimeUnit>().unwrap(), TimeUnit::Quarter);
    }

    #[test]
    fn test_parse_unknown_unit() {
        let err = "fortnight".parse::<TimeUnit>().unwrap_err();
        assert_eq!(err, UnitParseError("fortnight".to_string()));
        assert!(
            err.to_string().starts_with("invalid time unit 'fortnight', valid values: year"),
            "got: {err}"
        );
        let source: &dyn std::error::Error = &err;
        assert!(source.source().is_none());
    }

    #[test]
    fn test_display_round_trips() {
        for unit in TimeUnit::ALL {
            assert_eq!(unit.to_string().parse::<TimeUnit>().unwrap(), unit);
        }
    }

    #[test]
    fn test_fixed_millis() {
        assert_eq!(TimeUnit::Hour.fixed_millis(), Some(3_600_000));
        assert_eq!(TimeUnit::Month.fixed_millis(), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&TimeUnit::Quarter).unwrap();
        assert_eq!(json, "\"quarter\"");
    }
}
