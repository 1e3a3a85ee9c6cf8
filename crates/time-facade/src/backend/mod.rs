//! The capability contract every date engine implements, and the closed set
//! of engines.
//!
//! Required methods are the operations an engine performs natively:
//! construction, formatting, field access and calendar arithmetic. Provided
//! methods derive comparisons, differences, zone-adjusted timestamps and
//! locale data from those, so every engine applies the rules in
//! [`normalize`](crate::normalize) the same way.
//!
//! Methods never fail. An invalid input value produces an invalid output
//! value, `None`, `false` or `NaN` depending on the return type.

pub mod chrono_backend;
pub mod jiff_backend;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::SharedSettings;
use crate::error::TimeError;
use crate::format::ISO_PATTERN;
use crate::locale::{self, LocaleData};
use crate::normalize;
use crate::unit::TimeUnit;
use crate::value::{TimeInput, TimeValue};

pub use chrono_backend::ChronoBackend;
pub use jiff_backend::JiffBackend;

/// Tag of a date engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// `chrono` with the `chrono-tz` zone database.
    #[default]
    Chrono,
    /// `jiff` with its bundled zone database.
    Jiff,
}

impl BackendKind {
    pub const ALL: [BackendKind; 2] = [BackendKind::Chrono, BackendKind::Jiff];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Chrono => "chrono",
            BackendKind::Jiff => "jiff",
        }
    }

    /// Construct a fresh engine of this kind reading `settings`.
    pub fn instantiate(self, settings: SharedSettings) -> Arc<dyn TimeBackend> {
        match self {
            BackendKind::Chrono => Arc::new(ChronoBackend::new(settings)),
            BackendKind::Jiff => Arc::new(JiffBackend::new(settings)),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chrono" => Ok(BackendKind::Chrono),
            "jiff" => Ok(BackendKind::Jiff),
            _ => Err(TimeError::UnsupportedBackend(s.to_string())),
        }
    }
}

/// Operations a date engine provides over [`TimeValue`]s.
///
/// Months are 0-based everywhere in this trait. Zone arguments are IANA
/// names; `None` means the value's own zone for reads and the personal zone
/// for construction. An unknown zone name yields an invalid value or `None`.
pub trait TimeBackend: Send + Sync + fmt::Debug {
    fn kind(&self) -> BackendKind;

    /// Zone configuration and global locale this engine reads.
    fn settings(&self) -> &SharedSettings;

    // ── construction ──

    /// Build a value. `format` applies to [`TimeInput::Text`] only.
    fn create(&self, input: TimeInput, format: Option<&str>, zone: Option<&str>) -> TimeValue;

    fn parse(&self, text: &str, format: Option<&str>, zone: Option<&str>) -> TimeValue {
        self.create(TimeInput::Text(text.to_string()), format, zone)
    }

    fn now(&self, zone: Option<&str>) -> TimeValue {
        self.create(TimeInput::Now, None, zone)
    }

    /// The same instant viewed in `zone`.
    fn to_timezone(&self, t: &TimeValue, zone: &str) -> TimeValue;

    /// The same instant viewed at UTC.
    fn create_utc(&self, t: &TimeValue) -> TimeValue {
        self.to_timezone(t, "UTC")
    }

    /// An independent copy owned by this engine.
    fn clone_value(&self, t: &TimeValue) -> TimeValue {
        self.create(TimeInput::Value(t.clone()), None, None)
    }

    /// A copy carrying a per-value locale override. Unknown tags leave the
    /// copy without a new override.
    fn with_locale(&self, t: &TimeValue, tag: &str) -> TimeValue {
        let mut copy = self.clone_value(t);
        match locale::canonical_tag(tag) {
            Some(canonical) if copy.backend_kind().is_some() => copy.locale = Some(canonical),
            Some(_) => {}
            None => warn!(locale = tag, "unknown locale, override ignored"),
        }
        copy
    }

    // ── output ──

    fn format(&self, t: &TimeValue, pattern: Option<&str>, zone: Option<&str>) -> String;

    /// UTC rendering in the form `2025-07-24T07:30:45.000Z`.
    fn to_iso_string(&self, t: &TimeValue) -> String {
        self.format(&self.create_utc(t), Some(ISO_PATTERN), None)
    }

    // ── instant ──

    /// Epoch milliseconds.
    fn value_of(&self, t: &TimeValue) -> Option<i64>;

    /// Epoch milliseconds, optionally shifted into the tenant zone's frame.
    fn get_time(&self, t: &TimeValue, adjust: bool) -> Option<i64> {
        let millis = self.value_of(t)?;
        if !adjust {
            return Some(millis);
        }
        let zones = self.settings().read().zones.clone();
        let personal = self.get_utc_offset(&self.to_timezone(t, &zones.personal_zone))?;
        let tenant = self.get_utc_offset(&self.to_timezone(t, &zones.tenant_zone))?;
        normalize::zone_adjusted(millis, personal, tenant)
    }

    /// Whole epoch seconds, floored.
    fn unix(&self, t: &TimeValue) -> Option<i64> {
        self.value_of(t).map(|ms| ms.div_euclid(1000))
    }

    /// Minutes east of UTC.
    fn get_utc_offset(&self, t: &TimeValue) -> Option<i32>;

    fn is_valid(&self, t: &TimeValue) -> bool {
        self.value_of(t).is_some()
    }

    // ── fields ──

    fn year(&self, t: &TimeValue, zone: Option<&str>) -> Option<i32>;
    /// 0 = January.
    fn month(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32>;
    /// Day of the month, from 1.
    fn date(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32>;
    /// Day of the week, 0 = Sunday.
    fn day(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32>;
    /// Week of the year, see [`normalize::week_of_year`].
    fn week(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32>;
    fn hour(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32>;
    fn minute(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32>;
    fn second(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32>;
    fn millisecond(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32>;

    // ── setters ──
    //
    // Year and month clamp the day of month. The remaining setters roll
    // out-of-range values into the neighbouring unit.

    fn set_year(&self, t: &TimeValue, year: i32) -> TimeValue;
    fn set_month(&self, t: &TimeValue, month: i64) -> TimeValue;
    fn set_date(&self, t: &TimeValue, date: i64) -> TimeValue;
    fn set_hour(&self, t: &TimeValue, hour: i64) -> TimeValue;
    fn set_minute(&self, t: &TimeValue, minute: i64) -> TimeValue;
    fn set_second(&self, t: &TimeValue, second: i64) -> TimeValue;
    fn set_millisecond(&self, t: &TimeValue, millisecond: i64) -> TimeValue;

    // ── arithmetic ──

    /// Calendar units keep the wall clock; clock units add exact durations.
    fn add(&self, t: &TimeValue, amount: i64, unit: TimeUnit) -> TimeValue;

    fn subtract(&self, t: &TimeValue, amount: i64, unit: TimeUnit) -> TimeValue {
        match amount.checked_neg() {
            Some(negated) => self.add(t, negated, unit),
            None => TimeValue::invalid(),
        }
    }

    // ── boundaries ──

    /// First instant of the containing `unit`.
    fn start_of(&self, t: &TimeValue, unit: TimeUnit) -> TimeValue;

    /// Last millisecond of the containing `unit`.
    fn end_of(&self, t: &TimeValue, unit: TimeUnit) -> TimeValue;

    fn start_of_day(&self, t: &TimeValue) -> TimeValue {
        self.start_of(t, TimeUnit::Day)
    }

    fn start_of_week(&self, t: &TimeValue) -> TimeValue {
        self.start_of(t, TimeUnit::Week)
    }

    fn start_of_month(&self, t: &TimeValue) -> TimeValue {
        self.start_of(t, TimeUnit::Month)
    }

    fn start_of_quarter(&self, t: &TimeValue) -> TimeValue {
        self.start_of(t, TimeUnit::Quarter)
    }

    fn start_of_year(&self, t: &TimeValue) -> TimeValue {
        self.start_of(t, TimeUnit::Year)
    }

    fn end_of_day(&self, t: &TimeValue) -> TimeValue {
        self.end_of(t, TimeUnit::Day)
    }

    fn end_of_week(&self, t: &TimeValue) -> TimeValue {
        self.end_of(t, TimeUnit::Week)
    }

    fn end_of_month(&self, t: &TimeValue) -> TimeValue {
        self.end_of(t, TimeUnit::Month)
    }

    // ── calendar queries ──

    fn days_in_month(&self, t: &TimeValue) -> Option<u32>;

    fn is_leap_year(&self, t: &TimeValue) -> bool {
        self.year(t, None).is_some_and(normalize::is_leap_year)
    }

    /// Whether `t` falls on today's date in its own zone.
    fn is_today(&self, t: &TimeValue) -> bool {
        let Some(zone) = t.portable().map(|p| p.zone) else {
            return false;
        };
        let zone = Some(zone.as_str());
        let now = self.now(zone);
        let ymd = |v: &TimeValue| {
            Some((
                self.year(v, zone)?,
                self.month(v, zone)?,
                self.date(v, zone)?,
            ))
        };
        matches!((ymd(t), ymd(&now)), (Some(a), Some(b)) if a == b)
    }

    // ── comparison ──

    /// Order by instant. `None` when either value is invalid.
    fn compare(&self, t: &TimeValue, u: &TimeValue) -> Option<Ordering> {
        Some(self.value_of(t)?.cmp(&self.value_of(u)?))
    }

    fn is_before(&self, t: &TimeValue, u: &TimeValue) -> bool {
        self.compare(t, u) == Some(Ordering::Less)
    }

    fn is_after(&self, t: &TimeValue, u: &TimeValue) -> bool {
        self.compare(t, u) == Some(Ordering::Greater)
    }

    fn is_same(&self, t: &TimeValue, u: &TimeValue) -> bool {
        self.compare(t, u) == Some(Ordering::Equal)
    }

    /// `t - u` in `unit` (milliseconds when `None`). Truncated toward zero
    /// unless `precise`. `NaN` when either value is invalid.
    fn diff(&self, t: &TimeValue, u: &TimeValue, unit: Option<TimeUnit>, precise: bool) -> f64 {
        normalize::diff(
            self,
            t,
            u,
            unit.unwrap_or(TimeUnit::Millisecond),
            precise,
        )
    }

    // ── locale ──

    /// Read the global locale, or set it when `tag` is given. Unknown tags
    /// leave it unchanged. Returns the locale in effect afterwards.
    fn locale(&self, tag: Option<&str>) -> String {
        let Some(tag) = tag else {
            return self.settings().read().locale.to_string();
        };
        match locale::canonical_tag(tag) {
            Some(canonical) => {
                self.settings().write().locale = canonical;
                canonical.to_string()
            }
            None => {
                let current = self.settings().read().locale;
                warn!(locale = tag, current, "unknown locale, keeping current");
                current.to_string()
            }
        }
    }

    /// Locale data for `t`'s override, or the global locale.
    fn locale_data(&self, t: Option<&TimeValue>) -> &'static LocaleData {
        let tag = t
            .and_then(TimeValue::locale_override)
            .unwrap_or_else(|| self.settings().read().locale);
        locale::data(tag)
    }

    fn weekdays(&self, local_order: bool) -> Vec<String> {
        self.locale_data(None).weekdays(local_order)
    }

    fn weekdays_short(&self, local_order: bool) -> Vec<String> {
        self.locale_data(None).weekdays_short(local_order)
    }

    fn weekdays_min(&self, local_order: bool) -> Vec<String> {
        self.locale_data(None).weekdays_min(local_order)
    }

    fn months(&self) -> Vec<String> {
        self.locale_data(None).months()
    }

    fn months_short(&self) -> Vec<String> {
        self.locale_data(None).months_short()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("chrono".parse::<BackendKind>().unwrap(), BackendKind::Chrono);
        assert_eq!("JIFF".parse::<BackendKind>().unwrap(), BackendKind::Jiff);
        let err = "moment".parse::<BackendKind>().unwrap_err();
        assert_eq!(err, TimeError::UnsupportedBackend("moment".to_string()));
        assert_eq!(err.to_string(), "Unsupported time library type: moment");
    }

    #[test]
    fn test_kind_display() {
        for kind in BackendKind::ALL {
            assert_eq!(kind.to_string().parse::<BackendKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_default_kind() {
        assert_eq!(BackendKind::default(), BackendKind::Chrono);
    }

    #[test]
    fn test_instantiate_reports_kind() {
        let settings = crate::config::shared(Default::default());
        for kind in BackendKind::ALL {
            assert_eq!(kind.instantiate(settings.clone()).kind(), kind);
        }
    }
}
