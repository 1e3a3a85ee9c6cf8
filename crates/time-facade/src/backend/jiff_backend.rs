//! Engine backed by `jiff` and its bundled zone database.
//!
//! Values are `Zoned` at millisecond precision. jiff months run 1-12 and
//! its small integer fields are `i8`/`i16`, so every getter and setter
//! translates at the boundary. Wall-clock times are resolved from jiff's
//! ambiguous offsets: a time in a DST gap moves forward by the length of the
//! gap, and a repeated one keeps the value's own offset or else takes the
//! earlier instant.

use jiff::civil::{self, Date};
use jiff::fmt::strtime;
use jiff::tz::{AmbiguousOffset, Offset, TimeZone};
use jiff::{Span, Timestamp, Zoned};
use tracing::trace;

use super::{BackendKind, TimeBackend};
use crate::config::{canonical_zone, SharedSettings};
use crate::format::{self, RenderContext, Token, DEFAULT_PATTERN, INVALID_DATE};
use crate::locale;
use crate::normalize;
use crate::unit::TimeUnit;
use crate::value::{Repr, TimeInput, TimeValue};

const NANOS_PER_MILLI: i32 = 1_000_000;

#[derive(Debug)]
pub struct JiffBackend {
    settings: SharedSettings,
}

impl JiffBackend {
    pub fn new(settings: SharedSettings) -> Self {
        Self { settings }
    }

    fn zone(&self, zone: Option<&str>) -> Option<TimeZone> {
        match zone {
            Some(name) => time_zone(name),
            None => time_zone(&self.settings.read().zones.personal_zone),
        }
    }

    fn native(&self, t: &TimeValue) -> Option<Zoned> {
        match &t.repr {
            Repr::Jiff(zoned) => Some(zoned.clone()),
            Repr::Invalid => None,
            _ => {
                let portable = t.portable()?;
                from_millis(portable.millis, time_zone(&portable.zone)?)
            }
        }
    }

    fn view(&self, t: &TimeValue, zone: Option<&str>) -> Option<Zoned> {
        let zoned = self.native(t)?;
        match zone {
            Some(name) => Some(zoned.with_time_zone(time_zone(name)?)),
            None => Some(zoned),
        }
    }

    fn rebuild(
        &self,
        t: &TimeValue,
        change: impl FnOnce(civil::DateTime) -> Option<civil::DateTime>,
    ) -> TimeValue {
        let zoned = self.native(t).and_then(|z| {
            localize(z.time_zone().clone(), change(z.datetime())?, Some(z.offset()))
        });
        derive(t, zoned)
    }

    fn parse_text(&self, text: &str, pattern: Option<&str>, tz: TimeZone) -> Option<Zoned> {
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

        let today = Timestamp::now().to_zoned(tz.clone()).date();
        let (civil, day_of_year) = fields.resolve((
            i32::from(today.year()),
            today.month() as u32,
            today.day() as u32,
        ))?;
        let year = i16::try_from(civil.year).ok()?;
        let date = match day_of_year {
            Some(ordinal) => Date::new(year, 1, 1)
                .ok()?
                .with()
                .day_of_year(i16::try_from(ordinal).ok()?)
                .build()
                .ok()?,
            // jiff months are 1-based, as are the parsed fields.
            None => Date::new(
                year,
                i8::try_from(civil.month).ok()?,
                i8::try_from(civil.day).ok()?,
            )
            .ok()?,
        };
        let time = civil::Time::new(
            civil.hour as i8,
            civil.minute as i8,
            civil.second as i8,
            civil.millisecond as i32 * NANOS_PER_MILLI,
        )
        .ok()?;
        let datetime = date.to_datetime(time);

        match fields.offset_minutes {
            Some(minutes) => {
                let offset = Offset::from_seconds(minutes * 60).ok()?;
                let instant = offset.to_timestamp(datetime).ok()?;
                Some(instant.to_zoned(tz))
            }
            None => localize(tz, datetime, None),
        }
    }
}

fn from_millis(millis: i64, tz: TimeZone) -> Option<Zoned> {
    Timestamp::from_millisecond(millis)
        .ok()
        .map(|ts| ts.to_zoned(tz))
}

/// Look up a zone by name, spelled the way the chrono engine accepts it.
fn time_zone(name: &str) -> Option<TimeZone> {
    TimeZone::get(canonical_zone(name).ok()?).ok()
}

fn localize(tz: TimeZone, datetime: civil::DateTime, prefer: Option<Offset>) -> Option<Zoned> {
    let offset = match tz.to_ambiguous_timestamp(datetime).offset() {
        AmbiguousOffset::Unambiguous { offset } => offset,
        AmbiguousOffset::Gap { before, .. } => before,
        AmbiguousOffset::Fold { before, after } => {
            if prefer == Some(after) {
                after
            } else {
                before
            }
        }
    };
    Some(offset.to_timestamp(datetime).ok()?.to_zoned(tz))
}

fn fresh(zoned: Option<Zoned>) -> TimeValue {
    match zoned {
        Some(zoned) => TimeValue::new(Repr::Jiff(zoned), None),
        None => TimeValue::invalid(),
    }
}

fn derive(t: &TimeValue, zoned: Option<Zoned>) -> TimeValue {
    match zoned {
        Some(zoned) => t.derive(Repr::Jiff(zoned)),
        None => TimeValue::invalid(),
    }
}

fn weekday_of(date: Date) -> u32 {
    date.weekday().to_sunday_zero_offset() as u32
}

/// `year`-`month`-`day` (1-based month) with the day clamped to the month.
fn clamped_date(year: i32, month: u32, day: i8) -> Option<Date> {
    let year = i16::try_from(year).ok()?;
    let month = i8::try_from(month).ok()?;
    let first = Date::new(year, month, 1).ok()?;
    Date::new(year, month, day.min(first.days_in_month())).ok()
}

fn clock(hour: i8, minute: i8, second: i8, millisecond: i16) -> Option<civil::Time> {
    civil::Time::new(hour, minute, second, i32::from(millisecond) * NANOS_PER_MILLI).ok()
}

fn period_start_date(date: Date, unit: TimeUnit) -> Option<Date> {
    match unit {
        TimeUnit::Year => Date::new(date.year(), 1, 1).ok(),
        TimeUnit::Quarter => {
            let month0 = (date.month() - 1) as u32;
            let start = normalize::quarter_start_month0(month0) + 1;
            Date::new(date.year(), start as i8, 1).ok()
        }
        TimeUnit::Month => Some(date.first_of_month()),
        TimeUnit::Week => {
            let back = Span::new().try_days(i64::from(weekday_of(date))).ok()?;
            date.checked_sub(back).ok()
        }
        _ => Some(date),
    }
}

fn period_end_date(date: Date, unit: TimeUnit) -> Option<Date> {
    let start = period_start_date(date, unit)?;
    match unit {
        TimeUnit::Year => Date::new(date.year(), 12, 31).ok(),
        TimeUnit::Quarter => {
            let last_month = Date::new(start.year(), start.month() + 2, 1).ok()?;
            Some(last_month.last_of_month())
        }
        TimeUnit::Month => Some(date.last_of_month()),
        TimeUnit::Week => start.checked_add(Span::new().days(6)).ok(),
        _ => Some(date),
    }
}

fn period_start(dt: civil::DateTime, unit: TimeUnit) -> Option<civil::DateTime> {
    let (date, time) = (dt.date(), dt.time());
    let time = match unit {
        TimeUnit::Hour => clock(time.hour(), 0, 0, 0)?,
        TimeUnit::Minute => clock(time.hour(), time.minute(), 0, 0)?,
        TimeUnit::Second => clock(time.hour(), time.minute(), time.second(), 0)?,
        TimeUnit::Millisecond => time,
        _ => return Some(period_start_date(date, unit)?.to_datetime(civil::Time::midnight())),
    };
    Some(date.to_datetime(time))
}

fn period_end(dt: civil::DateTime, unit: TimeUnit) -> Option<civil::DateTime> {
    let (date, time) = (dt.date(), dt.time());
    let time = match unit {
        TimeUnit::Hour => clock(time.hour(), 59, 59, 999)?,
        TimeUnit::Minute => clock(time.hour(), time.minute(), 59, 999)?,
        TimeUnit::Second => clock(time.hour(), time.minute(), time.second(), 999)?,
        TimeUnit::Millisecond => time,
        _ => {
            let last = period_end_date(date, unit)?;
            return Some(last.to_datetime(clock(23, 59, 59, 999)?));
        }
    };
    Some(date.to_datetime(time))
}

/// jiff strtime directive for a canonical token. Fractions and epoch
/// values are rendered as literals from the field values instead.
fn strtime_directive(token: &Token) -> Option<&'static str> {
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
        Token::OffsetColon => "%:z",
        Token::OffsetCompact => "%z",
        _ => return None,
    })
}

impl TimeBackend for JiffBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Jiff
    }

    fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    fn create(&self, input: TimeInput, format: Option<&str>, zone: Option<&str>) -> TimeValue {
        let Some(tz) = self.zone(zone) else {
            return TimeValue::invalid();
        };
        match input {
            TimeInput::Now => fresh(from_millis(Timestamp::now().as_millisecond(), tz)),
            TimeInput::Millis(millis) => fresh(from_millis(millis, tz)),
            TimeInput::System(system) => fresh(
                Timestamp::try_from(system)
                    .ok()
                    .and_then(|ts| from_millis(ts.as_millisecond(), tz)),
            ),
            TimeInput::Text(text) => fresh(self.parse_text(&text, format, tz)),
            TimeInput::Value(value) => {
                let zoned = self.native(&value);
                let zoned = match zone {
                    Some(_) => zoned.map(|z| z.with_time_zone(tz)),
                    None => zoned,
                };
                derive(&value, zoned)
            }
        }
    }

    fn to_timezone(&self, t: &TimeValue, zone: &str) -> TimeValue {
        derive(t, self.view(t, Some(zone)))
    }

    fn format(&self, t: &TimeValue, pattern: Option<&str>, zone: Option<&str>) -> String {
        let Some(zoned) = self.view(t, zone) else {
            return INVALID_DATE.to_string();
        };
        let tokens = format::tokenize(pattern.unwrap_or(DEFAULT_PATTERN));
        let ctx = RenderContext {
            locale: self.locale_data(Some(t)),
            month0: (zoned.month() - 1) as u32,
            weekday: weekday_of(zoned.date()),
            hour: zoned.hour() as u32,
            millisecond: zoned.millisecond() as u32,
            epoch_millis: zoned.timestamp().as_millisecond(),
        };
        let native = format::translate(&tokens, &ctx, strtime_directive);
        strtime::format(&native, &zoned).unwrap_or_else(|_| INVALID_DATE.to_string())
    }

    fn value_of(&self, t: &TimeValue) -> Option<i64> {
        self.native(t).map(|z| z.timestamp().as_millisecond())
    }

    fn get_utc_offset(&self, t: &TimeValue) -> Option<i32> {
        self.native(t).map(|z| z.offset().seconds() / 60)
    }

    fn year(&self, t: &TimeValue, zone: Option<&str>) -> Option<i32> {
        self.view(t, zone).map(|z| i32::from(z.year()))
    }

    fn month(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32> {
        self.view(t, zone).map(|z| (z.month() - 1) as u32)
    }

    fn date(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32> {
        self.view(t, zone).map(|z| z.day() as u32)
    }

    fn day(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32> {
        self.view(t, zone).map(|z| weekday_of(z.date()))
    }

    fn week(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32> {
        self.view(t, zone).map(|z| {
            let date = z.date();
            normalize::week_of_year(
                i32::from(date.year()),
                date.day_of_year() as u32,
                weekday_of(date),
            )
        })
    }

    fn hour(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32> {
        self.view(t, zone).map(|z| z.hour() as u32)
    }

    fn minute(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32> {
        self.view(t, zone).map(|z| z.minute() as u32)
    }

    fn second(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32> {
        self.view(t, zone).map(|z| z.second() as u32)
    }

    fn millisecond(&self, t: &TimeValue, zone: Option<&str>) -> Option<u32> {
        self.view(t, zone).map(|z| z.millisecond() as u32)
    }

    fn set_year(&self, t: &TimeValue, year: i32) -> TimeValue {
        self.rebuild(t, |dt| {
            let date = clamped_date(year, dt.month() as u32, dt.day())?;
            Some(date.to_datetime(dt.time()))
        })
    }

    fn set_month(&self, t: &TimeValue, month: i64) -> TimeValue {
        self.rebuild(t, |dt| {
            let (year, month0) = normalize::roll_month(i32::from(dt.year()), month)?;
            let date = clamped_date(year, month0 + 1, dt.day())?;
            Some(date.to_datetime(dt.time()))
        })
    }

    fn set_date(&self, t: &TimeValue, date: i64) -> TimeValue {
        self.rebuild(t, |dt| {
            let offset = Span::new().try_days(date.checked_sub(1)?).ok()?;
            let day = dt.date().first_of_month().checked_add(offset).ok()?;
            Some(day.to_datetime(dt.time()))
        })
    }

    fn set_hour(&self, t: &TimeValue, hour: i64) -> TimeValue {
        self.rebuild(t, |dt| {
            let base = dt
                .date()
                .to_datetime(clock(0, dt.minute(), dt.second(), dt.millisecond())?);
            base.checked_add(Span::new().try_hours(hour).ok()?).ok()
        })
    }

    fn set_minute(&self, t: &TimeValue, minute: i64) -> TimeValue {
        self.rebuild(t, |dt| {
            let base = dt
                .date()
                .to_datetime(clock(dt.hour(), 0, dt.second(), dt.millisecond())?);
            base.checked_add(Span::new().try_minutes(minute).ok()?).ok()
        })
    }

    fn set_second(&self, t: &TimeValue, second: i64) -> TimeValue {
        self.rebuild(t, |dt| {
            let base = dt
                .date()
                .to_datetime(clock(dt.hour(), dt.minute(), 0, dt.millisecond())?);
            base.checked_add(Span::new().try_seconds(second).ok()?).ok()
        })
    }

    fn set_millisecond(&self, t: &TimeValue, millisecond: i64) -> TimeValue {
        self.rebuild(t, |dt| {
            let base = dt
                .date()
                .to_datetime(clock(dt.hour(), dt.minute(), dt.second(), 0)?);
            base.checked_add(Span::new().try_milliseconds(millisecond).ok()?)
                .ok()
        })
    }

    fn add(&self, t: &TimeValue, amount: i64, unit: TimeUnit) -> TimeValue {
        let Some(zoned) = self.native(t) else {
            return TimeValue::invalid();
        };
        // Calendar units move the wall clock, clock units move the instant.
        let calendar = if let Some(months) = normalize::calendar_months(amount, unit) {
            Some(Span::new().try_months(months).ok())
        } else {
            normalize::calendar_days(amount, unit).map(|days| Span::new().try_days(days).ok())
        };
        let moved = match calendar {
            Some(span) => span
                .and_then(|span| zoned.datetime().checked_add(span).ok())
                .and_then(|dt| localize(zoned.time_zone().clone(), dt, Some(zoned.offset()))),
            None => normalize::clock_millis(amount, unit)
                .and_then(|millis| Span::new().try_milliseconds(millis).ok())
                .and_then(|span| zoned.checked_add(span).ok()),
        };
        derive(t, moved)
    }

    fn start_of(&self, t: &TimeValue, unit: TimeUnit) -> TimeValue {
        self.rebuild(t, |dt| period_start(dt, unit))
    }

    fn end_of(&self, t: &TimeValue, unit: TimeUnit) -> TimeValue {
        self.rebuild(t, |dt| period_end(dt, unit))
    }

    fn days_in_month(&self, t: &TimeValue) -> Option<u32> {
        self.native(t).map(|z| z.date().days_in_month() as u32)
    }
}
