//! Free functions over the process-wide service.
//!
//! Each function asks [`service::global`] for the active engine and
//! delegates one call to it. The only error is
//! [`TimeError::NotInitialized`](crate::TimeError::NotInitialized) (and
//! validation errors from the configuration setters); bad date input shows
//! up as an invalid [`TimeValue`] instead.
//!
//! ```
//! use time_facade::facade;
//!
//! let t = facade::create("2025-07-24", None, None).unwrap();
//! assert_eq!(facade::month(&t, None).unwrap(), Some(6));
//! ```

use std::cmp::Ordering;
use std::sync::Arc;

use crate::backend::{BackendKind, TimeBackend};
use crate::config::ZoneConfig;
use crate::error::Result;
use crate::service;
use crate::unit::TimeUnit;
use crate::value::{TimeInput, TimeValue};

fn backend() -> Result<Arc<dyn TimeBackend>> {
    service::global().backend()
}

// ── backend selection ───────────────────────────────────────────────────────

/// Switch the process-wide engine. Zones and locale carry over.
pub fn set_time_library(kind: BackendKind) {
    service::global().set_type(kind);
}

/// Select the engine by tag, e.g. `"jiff"`.
///
/// # Errors
///
/// [`TimeError::UnsupportedBackend`](crate::TimeError::UnsupportedBackend)
/// for an unknown tag; the active engine is kept.
pub fn set_time_library_tag(tag: &str) -> Result<()> {
    service::global().set_type_tag(tag)
}

/// The active engine, or `None` before one is chosen.
pub fn get_current_time_library() -> Option<BackendKind> {
    service::global().current_type()
}

// ── zone configuration ──────────────────────────────────────────────────────

/// A snapshot of the personal and tenant zones.
pub fn zones() -> ZoneConfig {
    service::global().zones()
}

/// Set the personal zone. Names match IANA zones ignoring case and are
/// stored in canonical spelling.
pub fn set_default_timezone(zone: &str) -> Result<()> {
    service::global().set_default_timezone(zone)
}

/// Set the tenant zone used by zone-adjusted timestamps.
pub fn set_system_timezone(zone: &str) -> Result<()> {
    service::global().set_system_timezone(zone)
}

// ── construction ────────────────────────────────────────────────────────────

/// Build a value from text, epoch millis, a `SystemTime` or another value.
///
/// Text without an offset is wall-clock time in `zone` (the personal zone
/// when `None`). Unparseable input gives an invalid value, not an error.
pub fn create(
    input: impl Into<TimeInput>,
    format: Option<&str>,
    zone: Option<&str>,
) -> Result<TimeValue> {
    Ok(backend()?.create(input.into(), format, zone))
}

/// [`create`] for text input.
pub fn parse(text: &str, format: Option<&str>, zone: Option<&str>) -> Result<TimeValue> {
    Ok(backend()?.parse(text, format, zone))
}

/// The current instant, viewed in `zone` or the personal zone.
pub fn now(zone: Option<&str>) -> Result<TimeValue> {
    Ok(backend()?.now(zone))
}

/// A copy owned by the active engine.
pub fn clone_value(t: &TimeValue) -> Result<TimeValue> {
    Ok(backend()?.clone_value(t))
}

/// The same instant viewed in `zone`. An unknown zone gives an invalid value.
pub fn to_timezone(t: &TimeValue, zone: &str) -> Result<TimeValue> {
    Ok(backend()?.to_timezone(t, zone))
}

/// The same instant viewed in UTC.
pub fn create_utc(t: &TimeValue) -> Result<TimeValue> {
    Ok(backend()?.create_utc(t))
}

// ── output ──────────────────────────────────────────────────────────────────

/// Render with a canonical token pattern (`YYYY-MM-DD HH:mm:ss` when `None`).
/// Invalid values render as `"Invalid Date"`.
pub fn format(t: &TimeValue, pattern: Option<&str>, zone: Option<&str>) -> Result<String> {
    Ok(backend()?.format(t, pattern, zone))
}

/// UTC ISO-8601 with milliseconds, e.g. `2025-07-24T07:30:45.500Z`.
pub fn to_iso_string(t: &TimeValue) -> Result<String> {
    Ok(backend()?.to_iso_string(t))
}

// ── instant ─────────────────────────────────────────────────────────────────

/// Epoch milliseconds, shifted by `(tenant offset - personal offset)` minutes
/// when `adjust` is set.
pub fn get_time(t: &TimeValue, adjust: bool) -> Result<Option<i64>> {
    Ok(backend()?.get_time(t, adjust))
}

/// [`get_time`] of the current instant.
pub fn get_current_timestamp(adjust: bool) -> Result<Option<i64>> {
    let backend = backend()?;
    Ok(backend.get_time(&backend.now(None), adjust))
}

/// Epoch milliseconds.
pub fn value_of(t: &TimeValue) -> Result<Option<i64>> {
    Ok(backend()?.value_of(t))
}

/// Whole epoch seconds.
pub fn unix(t: &TimeValue) -> Result<Option<i64>> {
    Ok(backend()?.unix(t))
}

/// Minutes east of UTC.
pub fn get_utc_offset(t: &TimeValue) -> Result<Option<i32>> {
    Ok(backend()?.get_utc_offset(t))
}

/// Whether `t` holds a real instant.
pub fn is_valid(t: &TimeValue) -> Result<bool> {
    Ok(backend()?.is_valid(t))
}

// ── fields ──────────────────────────────────────────────────────────────────

/// Calendar year in `zone`, or in the value's own zone when `None`.
pub fn year(t: &TimeValue, zone: Option<&str>) -> Result<Option<i32>> {
    Ok(backend()?.year(t, zone))
}

/// Month of the year, 0-based (0 = January).
pub fn month(t: &TimeValue, zone: Option<&str>) -> Result<Option<u32>> {
    Ok(backend()?.month(t, zone))
}

/// Day of the month, 1-based.
pub fn date(t: &TimeValue, zone: Option<&str>) -> Result<Option<u32>> {
    Ok(backend()?.date(t, zone))
}

/// Day of the week, 0 = Sunday.
pub fn day(t: &TimeValue, zone: Option<&str>) -> Result<Option<u32>> {
    Ok(backend()?.day(t, zone))
}

/// Week of the year; weeks start on Sunday and week 1 holds January 1.
pub fn week(t: &TimeValue, zone: Option<&str>) -> Result<Option<u32>> {
    Ok(backend()?.week(t, zone))
}

/// Hour of the day, 0-23.
pub fn hour(t: &TimeValue, zone: Option<&str>) -> Result<Option<u32>> {
    Ok(backend()?.hour(t, zone))
}

/// Minute of the hour.
pub fn minute(t: &TimeValue, zone: Option<&str>) -> Result<Option<u32>> {
    Ok(backend()?.minute(t, zone))
}

/// Second of the minute.
pub fn second(t: &TimeValue, zone: Option<&str>) -> Result<Option<u32>> {
    Ok(backend()?.second(t, zone))
}

/// Millisecond of the second.
pub fn millisecond(t: &TimeValue, zone: Option<&str>) -> Result<Option<u32>> {
    Ok(backend()?.millisecond(t, zone))
}

// ── setters ─────────────────────────────────────────────────────────────────

/// Change the year, clamping Feb 29 to Feb 28 in common years.
pub fn set_year(t: &TimeValue, year: i32) -> Result<TimeValue> {
    Ok(backend()?.set_year(t, year))
}

/// Change the month (0-based). Values outside 0..=11 roll into neighbouring
/// years; the day is clamped to the new month's length.
pub fn set_month(t: &TimeValue, month: i64) -> Result<TimeValue> {
    Ok(backend()?.set_month(t, month))
}

/// Change the day of the month. 0 is the last day of the previous month and
/// values past the month's end roll forward.
pub fn set_date(t: &TimeValue, date: i64) -> Result<TimeValue> {
    Ok(backend()?.set_date(t, date))
}

/// Change the hour. Out-of-range values roll into neighbouring days, as
/// do the minute, second and millisecond setters.
pub fn set_hour(t: &TimeValue, hour: i64) -> Result<TimeValue> {
    Ok(backend()?.set_hour(t, hour))
}

/// Change the minute.
pub fn set_minute(t: &TimeValue, minute: i64) -> Result<TimeValue> {
    Ok(backend()?.set_minute(t, minute))
}

/// Change the second.
pub fn set_second(t: &TimeValue, second: i64) -> Result<TimeValue> {
    Ok(backend()?.set_second(t, second))
}

/// Change the millisecond.
pub fn set_millisecond(t: &TimeValue, millisecond: i64) -> Result<TimeValue> {
    Ok(backend()?.set_millisecond(t, millisecond))
}

// ── arithmetic ──────────────────────────────────────────────────────────────

/// Move by `amount` units. Month, quarter and year steps clamp to the end of
/// the month; day and week steps keep the wall clock; clock units move the
/// instant.
pub fn add(t: &TimeValue, amount: i64, unit: TimeUnit) -> Result<TimeValue> {
    Ok(backend()?.add(t, amount, unit))
}

/// `add(t, -amount, unit)`.
pub fn subtract(t: &TimeValue, amount: i64, unit: TimeUnit) -> Result<TimeValue> {
    Ok(backend()?.subtract(t, amount, unit))
}

// ── boundaries ──────────────────────────────────────────────────────────────

/// First millisecond of the `unit` containing `t`. Weeks start on Sunday.
pub fn start_of(t: &TimeValue, unit: TimeUnit) -> Result<TimeValue> {
    Ok(backend()?.start_of(t, unit))
}

/// Last millisecond of the `unit` containing `t`.
pub fn end_of(t: &TimeValue, unit: TimeUnit) -> Result<TimeValue> {
    Ok(backend()?.end_of(t, unit))
}

/// Midnight of `t`'s day.
pub fn start_of_day(t: &TimeValue) -> Result<TimeValue> {
    Ok(backend()?.start_of_day(t))
}

/// Sunday 00:00:00.000 of `t`'s week.
pub fn start_of_week(t: &TimeValue) -> Result<TimeValue> {
    Ok(backend()?.start_of_week(t))
}

/// The first of `t`'s month at midnight.
pub fn start_of_month(t: &TimeValue) -> Result<TimeValue> {
    Ok(backend()?.start_of_month(t))
}

/// Midnight on the first day of `t`'s quarter.
pub fn start_of_quarter(t: &TimeValue) -> Result<TimeValue> {
    Ok(backend()?.start_of_quarter(t))
}

/// January 1 at midnight.
pub fn start_of_year(t: &TimeValue) -> Result<TimeValue> {
    Ok(backend()?.start_of_year(t))
}

/// 23:59:59.999 of `t`'s day.
pub fn end_of_day(t: &TimeValue) -> Result<TimeValue> {
    Ok(backend()?.end_of_day(t))
}

/// Saturday 23:59:59.999 of `t`'s week.
pub fn end_of_week(t: &TimeValue) -> Result<TimeValue> {
    Ok(backend()?.end_of_week(t))
}

/// The last millisecond of `t`'s month.
pub fn end_of_month(t: &TimeValue) -> Result<TimeValue> {
    Ok(backend()?.end_of_month(t))
}

// ── calendar queries ────────────────────────────────────────────────────────

/// Length of `t`'s month in days.
pub fn days_in_month(t: &TimeValue) -> Result<Option<u32>> {
    Ok(backend()?.days_in_month(t))
}

/// Gregorian leap-year test on `t`'s year.
pub fn is_leap_year(t: &TimeValue) -> Result<bool> {
    Ok(backend()?.is_leap_year(t))
}

/// Whether `t` falls on today's date in `t`'s own zone.
pub fn is_today(t: &TimeValue) -> Result<bool> {
    Ok(backend()?.is_today(t))
}

// ── comparison ──────────────────────────────────────────────────────────────

/// Instant order, `None` when either value is invalid.
pub fn compare(t: &TimeValue, u: &TimeValue) -> Result<Option<Ordering>> {
    Ok(backend()?.compare(t, u))
}

/// `t` is strictly earlier than `u`. False when either is invalid.
pub fn is_before(t: &TimeValue, u: &TimeValue) -> Result<bool> {
    Ok(backend()?.is_before(t, u))
}

/// `t` is strictly later than `u`. False when either is invalid.
pub fn is_after(t: &TimeValue, u: &TimeValue) -> Result<bool> {
    Ok(backend()?.is_after(t, u))
}

/// Same instant, regardless of zone.
pub fn is_same(t: &TimeValue, u: &TimeValue) -> Result<bool> {
    Ok(backend()?.is_same(t, u))
}

/// `t - u` in `unit` (milliseconds when `None`), truncated toward zero unless
/// `precise`.
pub fn diff(t: &TimeValue, u: &TimeValue, unit: Option<TimeUnit>, precise: bool) -> Result<f64> {
    Ok(backend()?.diff(t, u, unit, precise))
}

// ── locale ──────────────────────────────────────────────────────────────────

/// Read the global locale, or set it when `tag` is given. Unknown tags keep
/// the current locale.
pub fn locale(tag: Option<&str>) -> Result<String> {
    service::global().locale(tag)
}

/// A copy of `t` that formats with `tag` regardless of the global locale.
/// The override survives arithmetic on the copy. Unknown tags leave `t`
/// unchanged.
pub fn with_locale(t: &TimeValue, tag: &str) -> Result<TimeValue> {
    Ok(backend()?.with_locale(t, tag))
}

/// Weekday names of the global locale. Sunday comes first unless
/// `local_order` is set, which starts at the locale's first day of the week.
pub fn weekdays(local_order: bool) -> Result<Vec<String>> {
    Ok(backend()?.weekdays(local_order))
}

/// Abbreviated weekday names, ordered as in [`weekdays`].
pub fn weekdays_short(local_order: bool) -> Result<Vec<String>> {
    Ok(backend()?.weekdays_short(local_order))
}

/// Minimal weekday names, ordered as in [`weekdays`].
pub fn weekdays_min(local_order: bool) -> Result<Vec<String>> {
    Ok(backend()?.weekdays_min(local_order))
}

/// Month names of the global locale, January first.
pub fn months() -> Result<Vec<String>> {
    Ok(backend()?.months())
}

/// Abbreviated month names.
pub fn months_short() -> Result<Vec<String>> {
    Ok(backend()?.months_short())
}
