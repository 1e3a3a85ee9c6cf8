//! The canonical pattern vocabulary shared by every backend.
//!
//! Patterns are tokenized once here. Backends then translate the tokens into
//! their native strftime dialect with [`translate`], supplying the directive
//! for each token they can render natively; everything else (names from
//! locale data, literals, fields the engine lacks) is emitted as escaped
//! literal text. Parsing is backend-neutral: both the pattern-driven parser
//! and the default grammar produce [`ParsedFields`], which the backend turns
//! into a native value with its own calendar validation.
//!
//! # Tokens
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `YYYY` `yyyy` | four-digit year |
//! | `YY` `yy` | two-digit year |
//! | `Q` | quarter 1-4 |
//! | `M` `MM` `MMM` `MMMM` | month number, padded, short name, long name |
//! | `D` `DD` | day of month |
//! | `DDD` `DDDD` | day of year |
//! | `d` `dd` `ddd` `dddd` | weekday number (0 = Sunday), min, short, long name |
//! | `H` `HH` `h` `hh` | 24-hour and 12-hour clock |
//! | `m` `mm` `s` `ss` | minute, second |
//! | `S` `SS` `SSS` | tenths, hundredths, milliseconds |
//! | `A` `a` | meridiem |
//! | `Z` `ZZ` | offset as `+08:00` and `+0800` |
//! | `X` `x` | epoch seconds, epoch milliseconds |
//! | `[...]` | literal text |

use crate::locale::LocaleData;

/// Pattern used when a caller does not pass one.
pub const DEFAULT_PATTERN: &str = "YYYY-MM-DD HH:mm:ss";

/// Pattern of [`to_iso_string`](crate::facade::to_iso_string), applied to the UTC view.
pub const ISO_PATTERN: &str = "YYYY-MM-DD[T]HH:mm:ss.SSS[Z]";

/// Rendered in place of an invalid value.
pub const INVALID_DATE: &str = "Invalid Date";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Year4,
    Year2,
    Quarter,
    Month,
    MonthPadded,
    MonthShort,
    MonthLong,
    Day,
    DayPadded,
    DayOfYear,
    DayOfYearPadded,
    Weekday,
    WeekdayMin,
    WeekdayShort,
    WeekdayLong,
    Hour24,
    Hour24Padded,
    Hour12,
    Hour12Padded,
    Minute,
    MinutePadded,
    Second,
    SecondPadded,
    /// Fractional seconds with 1 to 3 digits.
    Fraction(u8),
    MeridiemUpper,
    MeridiemLower,
    OffsetColon,
    OffsetCompact,
    UnixSeconds,
    UnixMillis,
}

// Longest first so that `YYYY` wins over `YY`.
const VOCABULARY: &[(&str, Token)] = &[
    ("YYYY", Token::Year4),
    ("yyyy", Token::Year4),
    ("MMMM", Token::MonthLong),
    ("DDDD", Token::DayOfYearPadded),
    ("dddd", Token::WeekdayLong),
    ("MMM", Token::MonthShort),
    ("DDD", Token::DayOfYear),
    ("ddd", Token::WeekdayShort),
    ("SSS", Token::Fraction(3)),
    ("YY", Token::Year2),
    ("yy", Token::Year2),
    ("MM", Token::MonthPadded),
    ("DD", Token::DayPadded),
    ("dd", Token::WeekdayMin),
    ("HH", Token::Hour24Padded),
    ("hh", Token::Hour12Padded),
    ("mm", Token::MinutePadded),
    ("ss", Token::SecondPadded),
    ("SS", Token::Fraction(2)),
    ("ZZ", Token::OffsetCompact),
    ("Q", Token::Quarter),
    ("M", Token::Month),
    ("D", Token::Day),
    ("d", Token::Weekday),
    ("H", Token::Hour24),
    ("h", Token::Hour12),
    ("m", Token::Minute),
    ("s", Token::Second),
    ("S", Token::Fraction(1)),
    ("A", Token::MeridiemUpper),
    ("a", Token::MeridiemLower),
    ("Z", Token::OffsetColon),
    ("X", Token::UnixSeconds),
    ("x", Token::UnixMillis),
];

/// Split a pattern into tokens. Adjacent literal characters are merged and
/// an unterminated `[` is taken literally.
pub fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = pattern;

    'outer: while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('[') {
            if let Some(close) = after.find(']') {
                literal.push_str(&after[..close]);
                rest = &after[close + 1..];
                continue;
            }
        }
        for (text, token) in VOCABULARY {
            if let Some(after) = rest.strip_prefix(*text) {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(token.clone());
                rest = after;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            literal.push(c);
        }
        rest = chars.as_str();
    }
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

// ── Rendering ────────────────────────────────────────────────────────────────

/// Field values a backend exposes so that tokens without a native directive
/// can be rendered as literal text.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub locale: &'static LocaleData,
    /// 0-based month.
    pub month0: u32,
    /// 0 = Sunday.
    pub weekday: u32,
    pub hour: u32,
    pub millisecond: u32,
    pub epoch_millis: i64,
}

/// Translate tokens into a native strftime-style format string.
///
/// `native` returns the backend's directive for a token, or `None` when the
/// token should be rendered here from `ctx`. Literal text has `%` doubled.
pub fn translate(
    tokens: &[Token],
    ctx: &RenderContext,
    native: impl Fn(&Token) -> Option<&'static str>,
) -> String {
    let mut out = String::new();
    for token in tokens {
        if let Token::Literal(text) = token {
            push_escaped(&mut out, text);
            continue;
        }
        if let Some(directive) = native(token) {
            out.push_str(directive);
            continue;
        }
        push_escaped(&mut out, &render_literal(token, ctx));
    }
    out
}

fn push_escaped(out: &mut String, text: &str) {
    out.push_str(&text.replace('%', "%%"));
}

fn render_literal(token: &Token, ctx: &RenderContext) -> String {
    let month = ctx.month0 as usize % 12;
    let weekday = ctx.weekday as usize % 7;
    match token {
        Token::Quarter => (ctx.month0 / 3 + 1).to_string(),
        Token::MonthShort => ctx.locale.months_short[month].to_string(),
        Token::MonthLong => ctx.locale.months[month].to_string(),
        Token::WeekdayMin => ctx.locale.weekdays_min[weekday].to_string(),
        Token::WeekdayShort => ctx.locale.weekdays_short[weekday].to_string(),
        Token::WeekdayLong => ctx.locale.weekdays[weekday].to_string(),
        Token::Weekday => ctx.weekday.to_string(),
        Token::MeridiemUpper => ctx.locale.meridiem(ctx.hour).to_string(),
        Token::MeridiemLower => ctx.locale.meridiem(ctx.hour).to_lowercase(),
        Token::Fraction(3) => format!("{:03}", ctx.millisecond),
        Token::Fraction(2) => format!("{:02}", ctx.millisecond / 10),
        Token::Fraction(_) => (ctx.millisecond / 100).to_string(),
        Token::UnixSeconds => ctx.epoch_millis.div_euclid(1000).to_string(),
        Token::UnixMillis => ctx.epoch_millis.to_string(),
        Token::Literal(text) => text.clone(),
        // Every backend renders the remaining numeric tokens natively.
        _ => String::new(),
    }
}

// ── Parsing ──────────────────────────────────────────────────────────────────

/// Raw fields extracted from a string. Month is 1-based here; range checks
/// beyond digit counts are left to the backend's calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFields {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub day_of_year: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    pub millisecond: Option<u32>,
    pub pm: Option<bool>,
    /// Explicit UTC offset in minutes.
    pub offset_minutes: Option<i32>,
    /// An epoch instant (`X` / `x`), which overrides every other field.
    pub epoch_millis: Option<i64>,
}

/// Fully resolved wall-clock fields, month 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl ParsedFields {
    fn has_date(&self) -> bool {
        self.year.is_some()
            || self.month.is_some()
            || self.day.is_some()
            || self.day_of_year.is_some()
    }

    /// Fill defaults and check clock ranges. `today` is `(year, month, day)`
    /// in the target zone. Returns `None` when a clock field is out of range.
    ///
    /// Day-of-year is resolved by the backend, so it is reported separately.
    pub fn resolve(&self, today: (i32, u32, u32)) -> Option<(CivilFields, Option<u32>)> {
        let (year, month, day) = if self.has_date() {
            (
                self.year.unwrap_or(today.0),
                self.month.unwrap_or(1),
                self.day.unwrap_or(1),
            )
        } else {
            today
        };
        let mut hour = self.hour.unwrap_or(0);
        if let Some(pm) = self.pm {
            if !(1..=12).contains(&hour) {
                return None;
            }
            hour = match (pm, hour) {
                (false, 12) => 0,
                (true, 12) => 12,
                (true, h) => h + 12,
                (false, h) => h,
            };
        }
        let minute = self.minute.unwrap_or(0);
        let second = self.second.unwrap_or(0);
        let millisecond = self.millisecond.unwrap_or(0);
        if hour > 23 || minute > 59 || second > 59 || millisecond > 999 {
            return None;
        }
        let fields = CivilFields {
            year,
            month,
            day,
            hour,
            minute,
            second,
            millisecond,
        };
        let day_of_year = if self.month.is_none() && self.day.is_none() {
            self.day_of_year
        } else {
            None
        };
        Some((fields, day_of_year))
    }
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn digits(&mut self, min: usize, max: usize) -> Option<u32> {
        let count = self
            .rest
            .bytes()
            .take(max)
            .take_while(u8::is_ascii_digit)
            .count();
        if count < min {
            return None;
        }
        let (digits, rest) = self.rest.split_at(count);
        self.rest = rest;
        digits.parse().ok()
    }

    fn signed_digits(&mut self) -> Option<i64> {
        let negative = self.eat("-");
        let count = self.rest.bytes().take_while(u8::is_ascii_digit).count();
        if count == 0 {
            return None;
        }
        let (digits, rest) = self.rest.split_at(count);
        self.rest = rest;
        let value: i64 = digits.parse().ok()?;
        Some(if negative { -value } else { value })
    }

    fn eat(&mut self, text: &str) -> bool {
        match self.rest.strip_prefix(text) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    /// Consume the longest name in `names` that prefixes the input,
    /// ignoring ASCII case. Returns its index.
    fn name(&mut self, names: &[&str]) -> Option<usize> {
        let lower = self.rest.to_lowercase();
        let (index, len) = names
            .iter()
            .enumerate()
            .filter(|(_, n)| lower.starts_with(&n.to_lowercase()))
            .max_by_key(|(_, n)| n.len())
            .map(|(i, n)| (i, n.len()))?;
        // Lowercasing can change byte lengths outside ASCII.
        if !self.rest.is_char_boundary(len) {
            return None;
        }
        self.rest = &self.rest[len..];
        Some(index)
    }

    /// `Z`, `+hh:mm`, `+hhmm` or `+hh`.
    fn offset(&mut self) -> Option<i32> {
        if self.eat("Z") || self.eat("z") {
            return Some(0);
        }
        let sign = if self.eat("+") {
            1
        } else if self.eat("-") {
            -1
        } else {
            return None;
        };
        let hours = self.digits(2, 2)? as i32;
        self.eat(":");
        let minutes = self.digits(0, 2).unwrap_or(0) as i32;
        if hours > 23 || minutes > 59 {
            return None;
        }
        Some(sign * (hours * 60 + minutes))
    }
}

/// Parse `input` strictly against `pattern`.
///
/// Literal text must match exactly and the whole input must be consumed.
/// Padded numeric tokens take exactly two digits, unpadded ones one or two.
pub fn parse_with_pattern(
    input: &str,
    pattern: &str,
    locale: &LocaleData,
) -> Option<ParsedFields> {
    let mut cur = Cursor { rest: input };
    let mut fields = ParsedFields::default();

    for token in tokenize(pattern) {
        match token {
            Token::Literal(text) => {
                if !cur.eat(&text) {
                    return None;
                }
            }
            Token::Year4 => fields.year = Some(cur.digits(4, 4)? as i32),
            Token::Year2 => {
                let yy = cur.digits(2, 2)? as i32;
                fields.year = Some(if yy > 68 { 1900 + yy } else { 2000 + yy });
            }
            Token::Quarter => {
                let q = cur.digits(1, 1)?;
                if !(1..=4).contains(&q) {
                    return None;
                }
                fields.month.get_or_insert((q - 1) * 3 + 1);
            }
            Token::Month => fields.month = Some(cur.digits(1, 2)?),
            Token::MonthPadded => fields.month = Some(cur.digits(2, 2)?),
            Token::MonthShort => fields.month = Some(cur.name(&locale.months_short)? as u32 + 1),
            Token::MonthLong => fields.month = Some(cur.name(&locale.months)? as u32 + 1),
            Token::Day => fields.day = Some(cur.digits(1, 2)?),
            Token::DayPadded => fields.day = Some(cur.digits(2, 2)?),
            Token::DayOfYear => fields.day_of_year = Some(cur.digits(1, 3)?),
            Token::DayOfYearPadded => fields.day_of_year = Some(cur.digits(3, 3)?),
            Token::Weekday => {
                cur.digits(1, 1)?;
            }
            Token::WeekdayMin => {
                cur.name(&locale.weekdays_min)?;
            }
            Token::WeekdayShort => {
                cur.name(&locale.weekdays_short)?;
            }
            Token::WeekdayLong => {
                cur.name(&locale.weekdays)?;
            }
            Token::Hour24 | Token::Hour12 => fields.hour = Some(cur.digits(1, 2)?),
            Token::Hour24Padded | Token::Hour12Padded => fields.hour = Some(cur.digits(2, 2)?),
            Token::Minute => fields.minute = Some(cur.digits(1, 2)?),
            Token::MinutePadded => fields.minute = Some(cur.digits(2, 2)?),
            Token::Second => fields.second = Some(cur.digits(1, 2)?),
            Token::SecondPadded => fields.second = Some(cur.digits(2, 2)?),
            Token::Fraction(n) => {
                let n = usize::from(n);
                let value = cur.digits(n, n)?;
                fields.millisecond = Some(value * 10u32.pow(3 - n as u32));
            }
            Token::MeridiemUpper | Token::MeridiemLower => {
                fields.pm = Some(cur.name(&locale.meridiem)? == 1);
            }
            Token::OffsetColon | Token::OffsetCompact => {
                fields.offset_minutes = Some(cur.offset()?);
            }
            Token::UnixSeconds => {
                fields.epoch_millis = Some(cur.signed_digits()?.checked_mul(1000)?);
            }
            Token::UnixMillis => fields.epoch_millis = Some(cur.signed_digits()?),
        }
    }
    cur.rest.is_empty().then_some(fields)
}

/// Parse the default grammar:
/// `YYYY[-/]M[-/]D` then optionally `T` or spaces and `H[:m[:s[.fff]]]`,
/// then an optional `Z` / `±hh:mm` offset. Year-only and year-month
/// strings are accepted.
pub fn parse_default(input: &str) -> Option<ParsedFields> {
    let mut cur = Cursor {
        rest: input.trim(),
    };
    let mut fields = ParsedFields {
        year: Some(cur.digits(4, 4)? as i32),
        ..ParsedFields::default()
    };

    if cur.eat("-") || cur.eat("/") {
        fields.month = Some(cur.digits(1, 2)?);
        if cur.eat("-") || cur.eat("/") {
            fields.day = Some(cur.digits(1, 2)?);
        }
    }

    let before_time = cur.rest;
    let separated = cur.eat("T") || cur.eat("t") || {
        let trimmed = cur.rest.trim_start();
        let moved = trimmed.len() != cur.rest.len();
        cur.rest = trimmed;
        moved
    };
    if separated && fields.day.is_some() && !cur.rest.is_empty() {
        if let Some(hour) = cur.digits(1, 2) {
            fields.hour = Some(hour);
            if cur.eat(":") {
                fields.minute = Some(cur.digits(1, 2)?);
                if cur.eat(":") {
                    fields.second = Some(cur.digits(1, 2)?);
                    if cur.eat(".") || cur.eat(",") {
                        let count = cur.rest.bytes().take_while(u8::is_ascii_digit).count();
                        if count == 0 {
                            return None;
                        }
                        let (digits, rest) = cur.rest.split_at(count);
                        cur.rest = rest;
                        let ms: String = digits.chars().chain("00".chars()).take(3).collect();
                        fields.millisecond = Some(ms.parse().ok()?);
                    }
                }
            }
        } else {
            cur.rest = before_time;
        }
    }

    let tail = cur.rest.trim_start();
    cur.rest = tail;
    if !cur.rest.is_empty() {
        fields.offset_minutes = Some(cur.offset()?);
    }
    cur.rest.trim().is_empty().then_some(fields)
}
