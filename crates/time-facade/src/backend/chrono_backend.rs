//! Engine backed by `chrono` and the `chrono-tz` database.
//!
//! Values are `DateTime<Tz>` at millisecond precision. chrono exposes a
//! 0-based month accessor (`month0`), which is used directly; its 1-based
//! constructors are only reached through [`CivilFields`] and the setters.
//! Wall-clock times that fall in a DST gap take the offset in effect before
//! the gap. Repeated ones keep the value's own offset when it still applies
//! and resolve to the earlier instant otherwise.

use std::fmt::Write as _;

use chrono::{
    DateTime, Datelike, Days, FixedOffset, LocalResult, Months, NaiveDate, NaiveDateTime, Offset,
    TimeDelta, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use tracing::trace;

use super::{BackendKind, TimeBackend};
use crate::config::{parse_timezone, SharedSettings};
use crate::format::{self, RenderContext, Token, DEFAULT_PATTERN, INVALID_DATE};
use crate::locale;
use crate::normalize;
use crate::unit::TimeUnit;
use crate::value::{Repr, TimeInput, TimeValue};

#[derive(Debug)]
pub struct ChronoBackend {
    settings: SharedSettings,
}

impl ChronoBackend {
    pub fn new(settings: SharedSettings) -> Self {
        Self { settings }
    }

    /// The named zone, or the personal zone when `zone` is `None`.
    fn zone(&self, zone: Option<&str>) -> Option<Tz> {
        match zone {
            Some(name) => parse_timezone(name).ok(),
            None => parse_timezone(&self.settings.read().zones.personal_zone).ok(),
        }
    }

    /// The native datetime of `t`, adopting values built by another engine.
    fn native(&self, t: &TimeValue) -> Option<DateTime<Tz>> {
        match &t.repr {
            Repr::Chrono(dt) => Some(*dt),
            Repr::Invalid => None,
            _ => {
                let portable = t.portable()?;
                let tz = parse_timezone(&portable.zone).ok()?;
                from_millis(portable.millis, &tz)
            }
        }
    }

    /// The native datetime viewed in `zone`, or in its own zone.
    fn view(&self, t: &TimeValue, zone: Option<&str>) -> Option<DateTime<Tz>> {
        let dt = self.native(t)?;
        match zone {
            Some(name) => Some(dt.with_timezone(&parse_timezone(name).ok()?)),
            None => Some(dt),
        }
    }

    /// Rewrite the wall clock of `t` and resolve it in the same zone.
    fn rebuild(
        &self,
        t: &TimeValue,
        change: impl FnOnce(NaiveDateTime) -> Option<NaiveDateTime>,
    ) -> TimeValue {
        let dt = self.native(t).and_then(|dt| {
            localize(&dt.timezone(), change(dt.naive_local())?, Some(dt.offset().fix()))
        });
        derive(t, dt)
    }

    fn parse_text(&self, text: &str, pattern: Option<&str>, tz: &Tz) -> Option<DateTime<Tz>> {
        let names = locale::data(self.settings.read().locale);
        let parsed = match pattern {
            Some(pattern) => format::parse_with_pattern(text, pattern, names),
            None => format::parse_default(text),
        };
        let Some(fields) = parsed else {
            trace!(input = text, ?pattern, "unparseable date string");
            return None;
        };
        if let Some(millis) = fields.epoch_millis {
            return from_millis(millis, tz);
        }

        let today = Utc::now().with_timezone(tz).date_naive();
        let (civil, day_of_year) = fields.resolve((today.year(), today.month(), today.day()))?;
        let date = match day_of_year {
            Some(ordinal) => NaiveDate::from_yo_opt(civil.year, ordinal)?,
            None => NaiveDate::from_ymd_opt(civil.year, civil.month, civil.day)?,
        };
        let naive =
            date.and_hms_milli_opt(civil.hour, civil.minute, civil.second, civil.millisecond)?;

        match fields.offset_minutes {
            Some(minutes) => {
                let offset = FixedOffset::east_opt(minutes * 60)?;
                let instant = offset.from_local_datetime(&naive).single()?;
                Some(instant.with_timezone(tz))
            }
            None => localize(tz, naive, None),
        }
    }
}

fn from_millis(millis: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|utc| utc.with_timezone(tz))
}

/// Resolve a wall-clock time in `tz`.
///
/// A repeated time keeps `prefer` when it is one of the two candidates and
/// takes the earlier instant otherwise. A time inside a gap is read with the
/// offset in effect just before the gap, which lands it past the gap by the
/// gap's length.
fn localize(tz: &Tz, naive: NaiveDateTime, prefer: Option<FixedOffset>) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earlier, later) => {
            if prefer == Some(later.offset().fix()) {
                Some(later)
            } else {
                Some(earlier)
            }
        }
        LocalResult::None => {
            // A day before the wall time is before the transition in every zone.
            let day_before = naive.checked_sub_signed(TimeDelta::try_days(1)?)?;
            let before = tz.offset_from_utc_datetime(&day_before).fix();
            let utc = naive.checked_sub_signed(TimeDelta::try_seconds(i64::from(
                before.local_minus_utc(),
            ))?)?;
            Some(tz.from_utc_datetime(&utc))
        }
    }
}

fn fresh(dt: Option<DateTime<Tz>>) -> TimeValue {
    match dt {
        Some(dt) => TimeValue::new(Repr::Chrono(dt), None),
        None => TimeValue::invalid(),
    }
}

fn derive(t: &TimeValue, dt: Option<DateTime<Tz>>) -> TimeValue {
    match dt {
        Some(dt) => t.derive(Repr::Chrono(dt)),
        None => TimeValue::invalid(),
    }
}

fn millis_of(naive: &NaiveDateTime) -> u32 {
    (naive.nanosecond() / 1_000_000).min(999)
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(first.checked_add_months(Months::new(1))?.pred_opt()?.day())
}

/// `year`-`month`-`day` with the day clamped to the month's length.
fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.min(last_day_of_month(year, month)?))
}

fn shift_months(naive: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let span = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        naive.checked_add_months(span)
    } else {
        naive.checked_sub_months(span)
    }
}

/// First day of the calendar `unit` containing `date`.
fn period_start_date(date: NaiveDate, unit: TimeUnit) -> Option<NaiveDate> {
    match unit {
        TimeUnit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
        TimeUnit::Quarter => NaiveDate::from_ymd_opt(
            date.year(),
            normalize::quarter_start_month0(date.month0()) + 1,
            1,
        ),
        TimeUnit::Month => date.with_day(1),
        TimeUnit::Week => {
            date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_sunday())))
        }
        _ => Some(date),
    }
}

/// Last day of the calendar `unit` containing `date`.
fn period_end_date(date: NaiveDate, unit: TimeUnit) -> Option<NaiveDate> {
    let start = period_start_date(date, unit)?;
    match unit {
        TimeUnit::Year => NaiveDate::from_ymd_opt(date.year(), 12, 31),
        TimeUnit::Quarter => start.checked_add_months(Months::new(3))?.pred_opt(),
        TimeUnit::Month => start.checked_add_months(Months::new(1))?.pred_opt(),
        TimeUnit::Week => start.checked_add_days(Days::new(6)),
        _ => Some(date),
    }
}

fn period_start(naive: NaiveDateTime, unit: TimeUnit) -> Option<NaiveDateTime> {
    let date = naive.date();
    match unit {
        TimeUnit::Hour => date.and_hms_milli_opt(naive.hour(), 0, 0, 0),
        TimeUnit::Minute => date.and_hms_milli_opt(naive.hour(), naive.minute(), 0, 0),
        TimeUnit::Second => {
            date.and_hms_milli_opt(naive.hour(), naive.minute(), naive.second(), 0)
        }
        TimeUnit::Millisecond => Some(naive),
        _ => period_start_date(date, unit)?.and_hms_milli_opt(0, 0, 0, 0),
    }
}

fn period_end(naive: NaiveDateTime, unit: TimeUnit) -> Option<NaiveDateTime> {
    let date = naive.date();
    match unit {
        TimeUnit::Hour => date.and_hms_milli_opt(naive.hour(), 59, 59, 999),
        TimeUnit::Minute => date.and_hms_milli_opt(naive.hour(), naive.minute(), 59, 999),
        TimeUnit::Second => {
            date.and_hms_milli_opt(naive.hour(), naive.minute(), naive.second(), 999)
        }
        TimeUnit::Millisecond => Some(naive),
        _ => period_end_date(date, unit)?.and_hms_milli_opt(23, 59, 59, 999),
    }
}

/// chrono strftime directive for a canonical token.
fn strftime_directive(token: &Token) -> Option<&'static str> {
    Some(match token {
        Token::Year4 => "%Y",
        Token::Year2 => "%y",
        Token::Month => "%-m",
        Token::MonthPadded => "%m",
        Token::Day => "%-d",
        Token::DayPadded => "%d",
        Token::DayOfYear => "%-j",
        Token::DayOfYearPadded => "%j",
        Token::Hour24 => "%-H",
        Token::Hour24Padded => "%H",
        Token::Hour12 => "%-I",
        Token::Hour12Padded => "%I",
        Token::Minute => "%-M",
        Token::MinutePadded => "%M",
        Token::Second => "%-S",
        Token::SecondPadded => "%S",
        Token::Fraction(3) => "%3f",
        Token::OffsetColon => "%:z",
        Token::OffsetCompact => "%z",
        Token::UnixSeconds => "%s",
        _ => return None,
    })
}

impl TimeBackend for ChronoBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Chrono
    }

    fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    fn create(&self, input: TimeInput, format: Option<&str>, zone: Option<&str>) -> TimeValue {
        let Some(tz) = self.zone(zone) else {
            return TimeValue::invalid();
        };
        match input {
            TimeInput::Now => fresh(from_millis(Utc::now().timestamp_millis(), &tz)),
            TimeInput::Millis(millis) => fresh(from_millis(millis, &tz)),
            TimeInput::System(system) => {
                fresh(from_millis(DateTime::<Utc>::from(system).timestamp_millis(), &tz))
            }
            TimeInput::Text(text) => fresh(self.parse_text(&text, format, &tz)),
            TimeInput::Value(value) => {
                let dt = self.native(&value);
                let dt = match zone {
                    Some(_) => dt.map(|dt| dt.with_timezone(&tz)),
                    None => dt,
                };
                derive(&value, dt)
            }
        }
    }

    fn to_timezone(&self, t: &TimeValue, zone: &str) -> TimeValue {
        derive(t, self.view(t, Some(zone)))
    }

    fn format(&self, t: &TimeValue, pattern: Option<&str>, zone: Option<&str>) -> String {
        let Some(dt) = self.view(t, zone) else {
            return INVALID_DATE.to_string();
        };
        let tokens = format::tokenize(pattern.unwrap_or(DEFAULT_PATTERN));
        let ctx = RenderContext {
            locale: self.locale_data(Some(t)),
            month0: dt.month0(),
            weekday: dt.weekday().num_days_from_sunday(),
            hour: dt.hour(),
            millisecond: dt.timestamp_subsec_millis().min(999),
            epoch_millis: dt.timestamp_millis(),
        };
        let native = format::translate(&tokens, &ctx, strftime_directive);
        let mut out = String::new();
        match write!(out, "{}", dt.format(&native)) {
            Ok(()) => out,
            Err(_) => INVALID_DATE.to_string(),
        }
    }

    fn value_of(&self, t: &TimeValue) -> Option<i64> {
        self.native(t).map(|dt| dt.timestamp_millis())
    }

    fn get_utc_offset(&self, t: &TimeValue) -> Option<i32> {
        self.native(t)
            .map(|dt| dt.offset().fix().local_minus_utc() / 60)
    }

    fn year(&self, t: &TimeValue, zone: Option<&str>) -> Option<i32> {
        self.view(t, zone).map(|dt| dt.year())
    }

    fn month(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32> {
        self.view(t, zone).map(|dt| dt.month0())
    }

    fn date(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32> {
        self.view(t, zone).map(|dt| dt.day())
    }

    fn day(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32> {
        self.view(t, zone)
            .map(|dt| dt.weekday().num_days_from_sunday())
    }

    fn week(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32> {
        self.view(t, zone).map(|dt| {
            normalize::week_of_year(
                dt.year(),
                dt.ordinal(),
                dt.weekday().num_days_from_sunday(),
            )
        })
    }

    fn hour(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32> {
        self.view(t, zone).map(|dt| dt.hour())
    }

    fn minute(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32> {
        self.view(t, zone).map(|dt| dt.minute())
    }

    fn second(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32> {
        self.view(t, zone).map(|dt| dt.second())
    }

    fn millisecond(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32> {
        self.view(t, zone)
            .map(|dt| dt.timestamp_subsec_millis().min(999))
    }

    fn set_year(&self, t: &TimeValue, year: i32) -> TimeValue {
        self.rebuild(t, |naive| {
            Some(clamped_date(year, naive.month(), naive.day())?.and_time(naive.time()))
        })
    }

    fn set_month(&self, t: &TimeValue, month: i64) -> TimeValue {
        self.rebuild(t, |naive| {
            let (year, month0) = normalize::roll_month(naive.year(), month)?;
            Some(clamped_date(year, month0 + 1, naive.day())?.and_time(naive.time()))
        })
    }

    fn set_date(&self, t: &TimeValue, date: i64) -> TimeValue {
        self.rebuild(t, |naive| {
            let first = naive.date().with_day(1)?;
            let day = first.checked_add_signed(TimeDelta::try_days(date.checked_sub(1)?)?)?;
            Some(day.and_time(naive.time()))
        })
    }

    fn set_hour(&self, t: &TimeValue, hour: i64) -> TimeValue {
        self.rebuild(t, |naive| {
            let base = naive.date().and_hms_milli_opt(
                0,
                naive.minute(),
                naive.second(),
                millis_of(&naive),
            )?;
            base.checked_add_signed(TimeDelta::try_hours(hour)?)
        })
    }

    fn set_minute(&self, t: &TimeValue, minute: i64) -> TimeValue {
        self.rebuild(t, |naive| {
            let base = naive.date().and_hms_milli_opt(
                naive.hour(),
                0,
                naive.second(),
                millis_of(&naive),
            )?;
            base.checked_add_signed(TimeDelta::try_minutes(minute)?)
        })
    }

    fn set_second(&self, t: &TimeValue, second: i64) -> TimeValue {
        self.rebuild(t, |naive| {
            let base = naive.date().and_hms_milli_opt(
                naive.hour(),
                naive.minute(),
                0,
                millis_of(&naive),
            )?;
            base.checked_add_signed(TimeDelta::try_seconds(second)?)
        })
    }

    fn set_millisecond(&self, t: &TimeValue, millisecond: i64) -> TimeValue {
        self.rebuild(t, |naive| {
            let base = naive.date().and_hms_milli_opt(
                naive.hour(),
                naive.minute(),
                naive.second(),
                0,
            )?;
            base.checked_add_signed(TimeDelta::try_milliseconds(millisecond)?)
        })
    }

    fn add(&self, t: &TimeValue, amount: i64, unit: TimeUnit) -> TimeValue {
        let Some(dt) = self.native(t) else {
            return TimeValue::invalid();
        };
        let keep = Some(dt.offset().fix());
        let moved = if let Some(months) = normalize::calendar_months(amount, unit) {
            shift_months(dt.naive_local(), months).and_then(|n| localize(&dt.timezone(), n, keep))
        } else if let Some(days) = normalize::calendar_days(amount, unit) {
            TimeDelta::try_days(days)
                .and_then(|delta| dt.naive_local().checked_add_signed(delta))
                .and_then(|n| localize(&dt.timezone(), n, keep))
        } else {
            normalize::clock_millis(amount, unit)
                .and_then(TimeDelta::try_milliseconds)
                .and_then(|delta| dt.checked_add_signed(delta))
        };
        derive(t, moved)
    }

    fn start_of(&self, t: &TimeValue, unit: TimeUnit) -> TimeValue {
        self.rebuild(t, |naive| period_start(naive, unit))
    }

    fn end_of(&self, t: &TimeValue, unit: TimeUnit) -> TimeValue {
        self.rebuild(t, |naive| period_end(naive, unit))
    }

    fn days_in_month(&self, t: &TimeValue) -> Option<u32> {
        let dt = self.native(t)?;
        last_day_of_month(dt.year(), dt.month())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{shared, Settings, ZoneConfig};

    fn backend() -> ChronoBackend {
        ChronoBackend::new(shared(Settings::default()))
    }

    fn fmt_ms(b: &ChronoBackend, t: &TimeValue) -> String {
        b.format(t, Some("YYYY-MM-DD HH:mm:ss.SSS"), None)
    }

    // ── construction tests ───────────────────────────────────────────────

    #[test]
    fn test_create_from_string_in_personal_zone() {
        let b = backend();
        let t = b.parse("2025-07-24 15:30:45", None, None);
        assert!(b.is_valid(&t));
        assert_eq!(b.get_utc_offset(&t), Some(480));
        assert_eq!(b.format(&t, None, None), "2025-07-24 15:30:45");
    }

    #[test]
    fn test_create_with_explicit_offset_converts() {
        let b = backend();
        let t = b.parse("2023-01-01T10:00:00Z", None, Some("Asia/Tokyo"));
        assert_eq!(b.format(&t, None, None), "2023-01-01 19:00:00");
    }

    #[test]
    fn test_create_from_millis() {
        let b = backend();
        let t = b.create(TimeInput::Millis(0), None, Some("UTC"));
        assert_eq!(b.format(&t, None, None), "1970-01-01 00:00:00");
    }

    #[test]
    fn test_invalid_inputs() {
        let b = backend();
        for text in ["invalid-date", "2023-02-30", "2023-13-01", "2023-01-01 25:00:00"] {
            let t = b.parse(text, None, None);
            assert!(!b.is_valid(&t), "{text} should be invalid");
            assert_eq!(b.format(&t, None, None), INVALID_DATE);
        }
        assert!(!b.is_valid(&b.now(Some("Mars/Olympus"))));
    }

    #[test]
    fn test_parse_with_pattern() {
        let b = backend();
        let t = b.parse("24/07/2025", Some("DD/MM/YYYY"), None);
        assert_eq!(b.format(&t, Some("YYYY-MM-DD"), None), "2025-07-24");
    }

    #[test]
    fn test_parse_day_of_year() {
        let b = backend();
        let t = b.parse("2025-205", Some("YYYY-DDDD"), None);
        assert_eq!(b.format(&t, Some("YYYY-MM-DD"), None), "2025-07-24");
        let t = b.parse("2024-1", Some("YYYY-DDD"), None);
        assert_eq!(b.format(&t, Some("YYYY-MM-DD"), None), "2024-01-01");
        assert!(!b.is_valid(&b.parse("2025-366", Some("YYYY-DDDD"), None)));
    }

    // ── field tests ──────────────────────────────────────────────────────

    #[test]
    fn test_month_is_zero_based() {
        let b = backend();
        let t = b.parse("2025-07-24", None, None);
        assert_eq!(b.month(&t, None), Some(6));
        assert_eq!(b.day(&t, None), Some(4));
    }

    #[test]
    fn test_getter_zone_override() {
        let b = backend();
        let t = b.parse("2025-07-24 02:00:00", None, Some("Asia/Shanghai"));
        assert_eq!(b.date(&t, Some("UTC")), Some(23));
        assert_eq!(b.hour(&t, Some("UTC")), Some(18));
        assert_eq!(b.hour(&t, Some("Nowhere/Land")), None);
    }

    // ── arithmetic tests ─────────────────────────────────────────────────

    #[test]
    fn test_month_end_clamping() {
        let b = backend();
        let t = b.add(&b.parse("2025-01-31", None, None), 1, TimeUnit::Month);
        assert_eq!(b.format(&t, Some("YYYY-MM-DD"), None), "2025-02-28");
        let t = b.add(&b.parse("2024-01-31", None, None), 1, TimeUnit::Month);
        assert_eq!(b.format(&t, Some("YYYY-MM-DD"), None), "2024-02-29");
    }

    #[test]
    fn test_setters_roll_and_clamp() {
        let b = backend();
        let t = b.parse("2024-01-31 10:00:00", None, None);
        let feb = b.set_month(&t, 1);
        assert_eq!(b.format(&feb, Some("YYYY-MM-DD"), None), "2024-02-29");
        let rolled = b.set_date(&t, 32);
        assert_eq!(b.format(&rolled, Some("YYYY-MM-DD"), None), "2024-02-01");
        let back = b.set_date(&t, 0);
        assert_eq!(b.format(&back, Some("YYYY-MM-DD"), None), "2023-12-31");
        let next = b.set_hour(&t, 25);
        assert_eq!(b.format(&next, None, None), "2024-02-01 01:00:00");
        let leap = b.set_year(&b.parse("2024-02-29", None, None), 2025);
        assert_eq!(b.format(&leap, Some("YYYY-MM-DD"), None), "2025-02-28");
    }

    #[test]
    fn test_boundaries() {
        let b = backend();
        let t = b.parse("2025-07-24 15:30:45.123", None, None);
        assert_eq!(fmt_ms(&b, &b.start_of_week(&t)), "2025-07-20 00:00:00.000");
        assert_eq!(fmt_ms(&b, &b.end_of_week(&t)), "2025-07-26 23:59:59.999");
        assert_eq!(fmt_ms(&b, &b.end_of_month(&t)), "2025-07-31 23:59:59.999");
        assert_eq!(fmt_ms(&b, &b.start_of_quarter(&t)), "2025-07-01 00:00:00.000");
        assert_eq!(fmt_ms(&b, &b.end_of(&t, TimeUnit::Year)), "2025-12-31 23:59:59.999");
        assert_eq!(fmt_ms(&b, &b.start_of(&t, TimeUnit::Hour)), "2025-07-24 15:00:00.000");
    }

    #[test]
    fn test_days_in_month() {
        let b = backend();
        assert_eq!(b.days_in_month(&b.parse("2024-02-10", None, None)), Some(29));
        assert_eq!(b.days_in_month(&b.parse("2023-02-10", None, None)), Some(28));
    }

    // ── format tests ─────────────────────────────────────────────────────

    #[test]
    fn test_format_names_follow_locale() {
        let b = backend();
        let t = b.parse("2025-07-24 15:30:45", None, None);
        assert_eq!(b.format(&t, Some("dddd, MMMM D"), None), "Thursday, July 24");
        let zh = b.with_locale(&t, "zh-cn");
        assert_eq!(b.format(&zh, Some("dddd MMMM"), None), "星期四 七月");
        assert_eq!(b.format(&zh, Some("h:mm A"), None), "3:30 下午");
    }

    #[test]
    fn test_format_offsets_and_iso() {
        let b = backend();
        let t = b.parse("2025-07-24 15:30:45.007", None, None);
        assert_eq!(b.format(&t, Some("Z ZZ"), None), "+08:00 +0800");
        assert_eq!(b.to_iso_string(&t), "2025-07-24T07:30:45.007Z");
    }

    #[test]
    fn test_literal_percent_is_escaped() {
        let b = backend();
        let t = b.parse("2025-07-24", None, None);
        assert_eq!(b.format(&t, Some("[100%] YYYY"), None), "100% 2025");
    }

    // ── zone tests ───────────────────────────────────────────────────────

    #[test]
    fn test_zone_adjusted_time() {
        let settings = shared(Settings {
            zones: ZoneConfig::new("Asia/Bangkok", "Asia/Shanghai").unwrap(),
            ..Settings::default()
        });
        let b = ChronoBackend::new(settings);
        let t = b.parse("2025-07-24 15:30:45", None, None);
        let plain = b.get_time(&t, false).unwrap();
        let adjusted = b.get_time(&t, true).unwrap();
        assert_eq!(adjusted - plain, 3_600_000);
    }

    #[test]
    fn test_dst_gap_moves_forward() {
        let b = backend();
        // 2025-03-09 02:30 does not exist in New York.
        let t = b.parse("2025-03-09 02:30:00", None, Some("America/New_York"));
        assert_eq!(b.format(&t, None, None), "2025-03-09 03:30:00");
    }

    #[test]
    fn test_dst_gap_uses_offset_before_gap() {
        let b = backend();
        // Troll jumps from +00 to +02 at 01:00 UTC.
        let t = b.parse("2025-03-30 01:30:00", None, Some("Antarctica/Troll"));
        assert!(b.is_valid(&t));
        assert_eq!(b.format(&t, None, None), "2025-03-30 03:30:00");
        // Lord Howe skips half an hour.
        let t = b.parse("2025-10-05 02:15:00", None, Some("Australia/Lord_Howe"));
        assert_eq!(b.format(&t, Some("HH:mm Z"), None), "02:45 +11:00");
    }

    #[test]
    fn test_repeated_hour_keeps_own_offset() {
        let b = backend();
        // 01:30 GMT, the second 01:30 of the night in London.
        let t = b.create(TimeInput::Millis(1_761_442_200_000), None, Some("Europe/London"));
        assert_eq!(b.format(&t, Some("HH:mm Z"), None), "01:30 +00:00");
        for moved in [
            b.add(&t, 0, TimeUnit::Year),
            b.add(&t, 0, TimeUnit::Day),
            b.set_millisecond(&t, 0),
            b.start_of(&t, TimeUnit::Minute),
        ] {
            assert_eq!(b.value_of(&moved), Some(1_761_442_200_000));
        }
        // Fresh wall times take the first occurrence.
        let parsed = b.parse("2025-10-26 01:30:00", None, Some("Europe/London"));
        assert_eq!(b.value_of(&parsed), Some(1_761_438_600_000));
        // The offset is kept only while it applies.
        let next_day = b.add(&t, 1, TimeUnit::Day);
        assert_eq!(
            b.format(&next_day, Some("YYYY-MM-DD HH:mm Z"), None),
            "2025-10-27 01:30 +00:00"
        );
    }

    #[test]
    fn test_day_diff_across_dst() {
        let b = backend();
        let before = b.parse("2025-03-08 12:00:00", None, Some("America/New_York"));
        let after = b.add(&before, 1, TimeUnit::Day);
        assert_eq!(b.format(&after, None, None), "2025-03-09 12:00:00");
        assert_eq!(b.diff(&after, &before, Some(TimeUnit::Day), true), 1.0);
        assert_eq!(b.diff(&after, &before, Some(TimeUnit::Hour), false), 23.0);
    }
}
