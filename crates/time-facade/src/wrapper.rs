//! Chainable wrapper over a [`TimeValue`].
//!
//! A [`Time`] pairs a value with the engine that produced it. Every method
//! takes `&self` and returns a new `Time`, so a chain never changes the
//! wrapper it started from:
//!
//! ```
//! use time_facade::{Time, TimeUnit};
//!
//! let start = Time::parse("2025-01-31 10:00:00", None, None).unwrap();
//! let next = start.add(1, TimeUnit::Month).start_of_day();
//! assert_eq!(next.format(Some("YYYY-MM-DD HH:mm"), None), "2025-02-28 00:00");
//! assert_eq!(start.format(Some("YYYY-MM-DD"), None), "2025-01-31");
//! ```
//!
//! A wrapper keeps its engine after the active backend is switched.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::backend::{BackendKind, TimeBackend};
use crate::error::Result;
use crate::service;
use crate::unit::TimeUnit;
use crate::value::{TimeInput, TimeValue};

#[derive(Debug, Clone)]
pub struct Time {
    backend: Arc<dyn TimeBackend>,
    value: TimeValue,
}

impl Time {
    pub(crate) fn from_parts(backend: Arc<dyn TimeBackend>, value: TimeValue) -> Self {
        Self { backend, value }
    }

    fn derive(&self, value: TimeValue) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            value,
        }
    }

    // ── construction ──

    /// Create a value with the process-wide service.
    pub fn create(
        input: impl Into<TimeInput>,
        format: Option<&str>,
        zone: Option<&str>,
    ) -> Result<Self> {
        service::global().create(input, format, zone)
    }

    pub fn parse(text: &str, format: Option<&str>, zone: Option<&str>) -> Result<Self> {
        service::global().parse(text, format, zone)
    }

    pub fn now(zone: Option<&str>) -> Result<Self> {
        service::global().now(zone)
    }

    /// The engine this wrapper dispatches to.
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// The raw value, for use with the free functions.
    pub fn to_object(&self) -> TimeValue {
        self.value.clone()
    }

    // ── output ──

    pub fn format(&self, pattern: Option<&str>, zone: Option<&str>) -> String {
        self.backend.format(&self.value, pattern, zone)
    }

    pub fn to_iso_string(&self) -> String {
        self.backend.to_iso_string(&self.value)
    }

    /// Epoch milliseconds, shifted into the tenant zone's frame when
    /// `adjust` is set.
    pub fn value_of(&self, adjust: bool) -> Option<i64> {
        self.backend.get_time(&self.value, adjust)
    }

    pub fn unix(&self) -> Option<i64> {
        self.backend.unix(&self.value)
    }

    pub fn get_utc_offset(&self) -> Option<i32> {
        self.backend.get_utc_offset(&self.value)
    }

    pub fn is_valid(&self) -> bool {
        self.backend.is_valid(&self.value)
    }

    pub fn is_leap_year(&self) -> bool {
        self.backend.is_leap_year(&self.value)
    }

    pub fn is_today(&self) -> bool {
        self.backend.is_today(&self.value)
    }

    pub fn days_in_month(&self) -> Option<u32> {
        self.backend.days_in_month(&self.value)
    }

    // ── fields ──

    pub fn year(&self, zone: Option<&str>) -> Option<i32> {
        self.backend.year(&self.value, zone)
    }

    /// 0 = January.
    pub fn month(&self, zone: Option<&str>) -> Option<u32> {
        self.backend.month(&self.value, zone)
    }

    pub fn date(&self, zone: Option<&str>) -> Option<u32> {
        self.backend.date(&self.value, zone)
    }

    /// 0 = Sunday.
    pub fn day(&self, zone: Option<&str>) -> Option<u32> {
        self.backend.day(&self.value, zone)
    }

    pub fn week(&self, zone: Option<&str>) -> Option<u32> {
        self.backend.week(&self.value, zone)
    }

    pub fn hour(&self, zone: Option<&str>) -> Option<u32> {
        self.backend.hour(&self.value, zone)
    }

    pub fn minute(&self, zone: Option<&str>) -> Option<u32> {
        self.backend.minute(&self.value, zone)
    }

    pub fn second(&self, zone: Option<&str>) -> Option<u32> {
        self.backend.second(&self.value, zone)
    }

    pub fn millisecond(&self, zone: Option<&str>) -> Option<u32> {
        self.backend.millisecond(&self.value, zone)
    }

    // ── setters ──

    pub fn set_year(&self, year: i32) -> Self {
        self.derive(self.backend.set_year(&self.value, year))
    }

    pub fn set_month(&self, month: i64) -> Self {
        self.derive(self.backend.set_month(&self.value, month))
    }

    pub fn set_date(&self, date: i64) -> Self {
        self.derive(self.backend.set_date(&self.value, date))
    }

    pub fn set_hour(&self, hour: i64) -> Self {
        self.derive(self.backend.set_hour(&self.value, hour))
    }

    pub fn set_minute(&self, minute: i64) -> Self {
        self.derive(self.backend.set_minute(&self.value, minute))
    }

    pub fn set_second(&self, second: i64) -> Self {
        self.derive(self.backend.set_second(&self.value, second))
    }

    pub fn set_millisecond(&self, millisecond: i64) -> Self {
        self.derive(self.backend.set_millisecond(&self.value, millisecond))
    }

    // ── arithmetic ──

    pub fn add(&self, amount: i64, unit: TimeUnit) -> Self {
        self.derive(self.backend.add(&self.value, amount, unit))
    }

    pub fn subtract(&self, amount: i64, unit: TimeUnit) -> Self {
        self.derive(self.backend.subtract(&self.value, amount, unit))
    }

    // ── boundaries ──

    pub fn start_of(&self, unit: TimeUnit) -> Self {
        self.derive(self.backend.start_of(&self.value, unit))
    }

    pub fn end_of(&self, unit: TimeUnit) -> Self {
        self.derive(self.backend.end_of(&self.value, unit))
    }

    pub fn start_of_day(&self) -> Self {
        self.start_of(TimeUnit::Day)
    }

    pub fn start_of_week(&self) -> Self {
        self.start_of(TimeUnit::Week)
    }

    pub fn start_of_month(&self) -> Self {
        self.start_of(TimeUnit::Month)
    }

    pub fn start_of_quarter(&self) -> Self {
        self.start_of(TimeUnit::Quarter)
    }

    pub fn start_of_year(&self) -> Self {
        self.start_of(TimeUnit::Year)
    }

    pub fn end_of_day(&self) -> Self {
        self.end_of(TimeUnit::Day)
    }

    pub fn end_of_week(&self) -> Self {
        self.end_of(TimeUnit::Week)
    }

    pub fn end_of_month(&self) -> Self {
        self.end_of(TimeUnit::Month)
    }

    // ── zones ──

    pub fn to_timezone(&self, zone: &str) -> Self {
        self.derive(self.backend.to_timezone(&self.value, zone))
    }

    /// The same instant viewed at UTC.
    pub fn utc(&self) -> Self {
        self.derive(self.backend.create_utc(&self.value))
    }

    // ── comparison ──

    pub fn compare(&self, other: impl AsRef<TimeValue>) -> Option<Ordering> {
        self.backend.compare(&self.value, other.as_ref())
    }

    pub fn is_before(&self, other: impl AsRef<TimeValue>) -> bool {
        self.backend.is_before(&self.value, other.as_ref())
    }

    pub fn is_after(&self, other: impl AsRef<TimeValue>) -> bool {
        self.backend.is_after(&self.value, other.as_ref())
    }

    pub fn is_same(&self, other: impl AsRef<TimeValue>) -> bool {
        self.backend.is_same(&self.value, other.as_ref())
    }

    /// `self - other` in `unit`, see [`TimeBackend::diff`].
    pub fn diff(&self, other: impl AsRef<TimeValue>, unit: Option<TimeUnit>, precise: bool) -> f64 {
        self.backend.diff(&self.value, other.as_ref(), unit, precise)
    }

    // ── locale ──

    /// A copy that formats with `tag` without touching the global locale.
    pub fn with_locale(&self, tag: &str) -> Self {
        self.derive(self.backend.with_locale(&self.value, tag))
    }

    /// The locale this wrapper formats with.
    pub fn locale(&self) -> String {
        self.backend.locale_data(Some(&self.value)).tag.to_string()
    }

    pub fn weekdays(&self, local_order: bool) -> Vec<String> {
        self.backend.locale_data(Some(&self.value)).weekdays(local_order)
    }

    pub fn weekdays_short(&self, local_order: bool) -> Vec<String> {
        self.backend
            .locale_data(Some(&self.value))
            .weekdays_short(local_order)
    }

    pub fn weekdays_min(&self, local_order: bool) -> Vec<String> {
        self.backend
            .locale_data(Some(&self.value))
            .weekdays_min(local_order)
    }

    pub fn months(&self) -> Vec<String> {
        self.backend.locale_data(Some(&self.value)).months()
    }

    pub fn months_short(&self) -> Vec<String> {
        self.backend.locale_data(Some(&self.value)).months_short()
    }
}

impl AsRef<TimeValue> for Time {
    fn as_ref(&self) -> &TimeValue {
        &self.value
    }
}

impl From<Time> for TimeValue {
    fn from(time: Time) -> Self {
        time.value
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(None, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::TimeService;

    fn services() -> Vec<TimeService> {
        BackendKind::ALL.into_iter().map(TimeService::new).collect()
    }

    // ── chaining tests ──

    #[test]
    fn test_chain_leaves_source_untouched() {
        for service in services() {
            let t = service.parse("2025-07-24 15:30:45", None, None).unwrap();
            let shifted = t.add(1, TimeUnit::Day).set_hour(0).start_of_month();
            assert_eq!(t.to_string(), "2025-07-24 15:30:45");
            assert_eq!(shifted.to_string(), "2025-07-01 00:00:00");
        }
    }

    #[test]
    fn test_quarter_start_scenario() {
        for service in services() {
            let t = service.parse("2025-10-15", None, None).unwrap();
            assert_eq!(
                t.start_of_quarter().format(Some("YYYY-MM-DD HH:mm:ss.SSS"), None),
                "2025-10-01 00:00:00.000"
            );
        }
    }

    #[test]
    fn test_utc_offset_after_utc() {
        for service in services() {
            let t = service.parse("2025-07-24 15:30:45", None, None).unwrap();
            assert_eq!(t.utc().get_utc_offset(), Some(0));
            assert_eq!(t.get_utc_offset(), Some(480));
            assert!(t.utc().is_same(&t));
        }
    }

    // ── comparison tests ──

    #[test]
    fn test_diff_truncation_scenario() {
        for service in services() {
            let noon = service.parse("2023-01-01 12:00:00", None, None).unwrap();
            let midnight = service.parse("2023-01-01 00:00:00", None, None).unwrap();
            assert_eq!(noon.diff(&midnight, Some(TimeUnit::Day), false), 0.0);
            assert_eq!(noon.diff(&midnight, Some(TimeUnit::Day), true), 0.5);
            assert_eq!(midnight.diff(&noon, None, false), -43_200_000.0);
            assert_eq!(noon.compare(&midnight), Some(Ordering::Greater));
            assert!(midnight.is_before(&noon));
            assert!(noon.is_after(midnight.to_object()));
        }
    }

    #[test]
    fn test_month_diff() {
        for service in services() {
            let a = service.parse("2025-03-31", None, None).unwrap();
            let b = service.parse("2025-01-31", None, None).unwrap();
            assert_eq!(a.diff(&b, Some(TimeUnit::Month), false), 2.0);
            assert_eq!(b.diff(&a, Some(TimeUnit::Month), false), -2.0);
            let c = service.parse("2026-01-15", None, None).unwrap();
            assert_eq!(c.diff(&b, Some(TimeUnit::Year), false), 0.0);
            assert_eq!(c.diff(&b, Some(TimeUnit::Quarter), false), 3.0);
        }
    }

    #[test]
    fn test_invalid_propagates() {
        for service in services() {
            let bad = service.parse("2023-02-30", None, None).unwrap();
            let good = service.parse("2023-02-28", None, None).unwrap();
            assert!(!bad.is_valid());
            assert!(!bad.add(1, TimeUnit::Day).is_valid());
            assert_eq!(bad.to_string(), "Invalid Date");
            assert_eq!(bad.month(None), None);
            assert_eq!(bad.value_of(false), None);
            assert_eq!(good.compare(&bad), None);
            assert!(!good.is_before(&bad) && !good.is_after(&bad) && !good.is_same(&bad));
            assert!(good.diff(&bad, None, false).is_nan());
            assert!(!bad.is_leap_year());
        }
    }

    // ── locale tests ──

    #[test]
    fn test_locale_override_is_local() {
        for service in services() {
            let t = service.parse("2025-07-24", None, None).unwrap();
            let zh = t.with_locale("zh-CN");
            assert_eq!(zh.locale(), "zh-cn");
            assert_eq!(t.locale(), "en");
            assert_eq!(service.locale(None).unwrap(), "en");
            assert_eq!(zh.format(Some("MMMM"), None), "七月");
            assert_eq!(zh.add(1, TimeUnit::Month).format(Some("MMMM"), None), "八月");
            assert_eq!(t.format(Some("MMMM"), None), "July");
        }
    }

    #[test]
    fn test_wrapper_keeps_its_backend() {
        let service = TimeService::new(BackendKind::Chrono);
        let t = service.parse("2025-07-24", None, None).unwrap();
        service.set_type(BackendKind::Jiff);
        assert_eq!(t.backend_kind(), BackendKind::Chrono);
        assert_eq!(t.add(1, TimeUnit::Day).backend_kind(), BackendKind::Chrono);
        let adopted = service.wrap(t.to_object()).unwrap();
        assert_eq!(adopted.backend_kind(), BackendKind::Jiff);
        assert_eq!(adopted.add(1, TimeUnit::Day).to_string(), "2025-07-25 00:00:00");
    }
}
