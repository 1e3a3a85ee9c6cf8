//! Normalization rules every backend honors.
//!
//! Engines disagree natively on month indexing, what a "day" of difference
//! means across a DST change, and how fractional differences are reported.
//! The functions here pin those decisions down once. Backends do the
//! calendar work natively and route the results through these rules.
//!
//! # Rules
//!
//! - Months are 0-based (0-11) at the API boundary.
//! - Weeks run Sunday 00:00:00.000 to Saturday 23:59:59.999 for every locale.
//! - Quarters start on Jan 1, Apr 1, Jul 1 and Oct 1.
//! - Month, quarter and year arithmetic clamps to the last day of the target
//!   month.
//! - Non-precise differences truncate toward zero.
//! - UTC offsets are minutes east of UTC.
//! - A zone-adjusted timestamp is shifted by
//!   `(tenant offset - personal offset) * 60000` ms.

use crate::backend::TimeBackend;
use crate::unit::TimeUnit;
use crate::value::TimeValue;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Proleptic Gregorian leap year rule.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// First month (0-based) of the quarter containing `month0`.
pub fn quarter_start_month0(month0: u32) -> u32 {
    month0 / 3 * 3
}

/// Resolve a 0-based month that may lie outside 0-11 into `(year, month0)`.
///
/// Month 12 of 2025 is January 2026; month -1 is December of the previous
/// year.
pub fn roll_month(year: i32, month0: i64) -> Option<(i32, u32)> {
    let years = i32::try_from(month0.div_euclid(12)).ok()?;
    let month = u32::try_from(month0.rem_euclid(12)).ok()?;
    Some((year.checked_add(years)?, month))
}

/// Number of calendar months `amount` units of `unit` span, for the
/// calendar units (year, quarter, month).
pub fn calendar_months(amount: i64, unit: TimeUnit) -> Option<i64> {
    match unit {
        TimeUnit::Year => amount.checked_mul(12),
        TimeUnit::Quarter => amount.checked_mul(3),
        TimeUnit::Month => Some(amount),
        _ => None,
    }
}

/// Number of calendar days `amount` weeks or days span.
pub fn calendar_days(amount: i64, unit: TimeUnit) -> Option<i64> {
    match unit {
        TimeUnit::Week => amount.checked_mul(7),
        TimeUnit::Day => Some(amount),
        _ => None,
    }
}

/// Exact milliseconds `amount` clock units span.
pub fn clock_millis(amount: i64, unit: TimeUnit) -> Option<i64> {
    match unit {
        TimeUnit::Hour | TimeUnit::Minute | TimeUnit::Second | TimeUnit::Millisecond => {
            amount.checked_mul(unit.fixed_millis()?)
        }
        _ => None,
    }
}

/// Week of the year. Weeks start on Sunday and week 1 is the week that
/// contains January 1, so the last days of December can belong to week 1 of
/// the following year.
///
/// `ordinal` is the 1-based day of the year, `weekday` is 0 for Sunday.
pub fn week_of_year(year: i32, ordinal: u32, weekday: u32) -> u32 {
    let saturday = ordinal + (6 - weekday.min(6));
    let year_len = if is_leap_year(year) { 366 } else { 365 };
    if saturday > year_len {
        1
    } else {
        (saturday - 1) / 7 + 1
    }
}

/// Shift epoch milliseconds from the personal zone's frame to the tenant
/// zone's frame.
pub fn zone_adjusted(millis: i64, personal_offset: i32, tenant_offset: i32) -> Option<i64> {
    let delta = i64::from(tenant_offset) - i64::from(personal_offset);
    millis.checked_add(delta.checked_mul(MILLIS_PER_MINUTE)?)
}

/// Apply the truncation rule and collapse negative zero.
pub fn finish_diff(raw: f64, precise: bool) -> f64 {
    let value = if precise { raw } else { raw.trunc() };
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

// ── diff ─────────────────────────────────────────────────────────────────────

/// `t - u` in `unit`, using the backend that owns both values.
///
/// `u` is viewed in the zone of `t` first. Returns `NaN` when either value
/// is invalid.
pub(crate) fn diff<B: TimeBackend + ?Sized>(
    backend: &B,
    t: &TimeValue,
    u: &TimeValue,
    unit: TimeUnit,
    precise: bool,
) -> f64 {
    let Some(zone) = t.portable().map(|p| p.zone) else {
        return f64::NAN;
    };
    let u = backend.to_timezone(u, &zone);
    let (Some(t_ms), Some(u_ms)) = (backend.value_of(t), backend.value_of(&u)) else {
        return f64::NAN;
    };

    let raw = match unit {
        TimeUnit::Year => month_diff(backend, t, &u) / 12.0,
        TimeUnit::Quarter => month_diff(backend, t, &u) / 3.0,
        TimeUnit::Month => month_diff(backend, t, &u),
        TimeUnit::Week | TimeUnit::Day => {
            let (Some(t_off), Some(u_off)) = (backend.get_utc_offset(t), backend.get_utc_offset(&u))
            else {
                return f64::NAN;
            };
            // A calendar day across a DST change is 23 or 25 hours long.
            let zone_delta = i64::from(u_off - t_off) * MILLIS_PER_MINUTE;
            let length = unit.fixed_millis().unwrap_or(1) as f64;
            (t_ms - u_ms - zone_delta) as f64 / length
        }
        _ => {
            let length = unit.fixed_millis().unwrap_or(1) as f64;
            (t_ms - u_ms) as f64 / length
        }
    };
    finish_diff(raw, precise)
}

/// Calendar months from `b` to `a`, anchored on the later day-of-month.
///
/// The whole-month part counts month boundaries; the fraction measures the
/// remainder against the length of the month it falls in.
fn month_diff<B: TimeBackend + ?Sized>(backend: &B, a: &TimeValue, b: &TimeValue) -> f64 {
    let (Some(a_date), Some(b_date)) = (backend.date(a, None), backend.date(b, None)) else {
        return f64::NAN;
    };
    if a_date < b_date {
        return -month_diff(backend, b, a);
    }
    let (Some(a_year), Some(a_month), Some(b_year), Some(b_month)) = (
        backend.year(a, None),
        backend.month(a, None),
        backend.year(b, None),
        backend.month(b, None),
    ) else {
        return f64::NAN;
    };

    let whole = i64::from(b_year - a_year) * 12 + i64::from(b_month) - i64::from(a_month);
    let millis = |months: i64| backend.value_of(&backend.add(a, months, TimeUnit::Month));
    let (Some(anchor), Some(b_ms)) = (millis(whole), backend.value_of(b)) else {
        return f64::NAN;
    };

    let adjust = if b_ms < anchor {
        let Some(previous) = millis(whole - 1) else {
            return f64::NAN;
        };
        (b_ms - anchor) as f64 / (anchor - previous) as f64
    } else {
        let Some(next) = millis(whole + 1) else {
            return f64::NAN;
        };
        (b_ms - anchor) as f64 / (next - anchor) as f64
    };
    finish_diff(-(whole as f64 + adjust), true)
}
