//! The opaque time value handed out by backends, and creation input.

use std::time::SystemTime;

use crate::backend::BackendKind;

/// An instant with a zone and an optional locale override, in the native
/// representation of the backend that produced it.
///
/// Callers treat it as a token: pass it back to the facade or wrap it in a
/// [`Time`](crate::Time). Values that failed to parse, or whose arithmetic
/// left the supported range, are invalid; every operation on them yields
/// another invalid value.
#[derive(Debug, Clone)]
pub struct TimeValue {
    pub(crate) repr: Repr,
    pub(crate) locale: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub(crate) enum Repr {
    Chrono(chrono::DateTime<chrono_tz::Tz>),
    Jiff(jiff::Zoned),
    Invalid,
}

/// Backend-neutral description of a valid value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Portable {
    pub millis: i64,
    pub zone: String,
}

impl TimeValue {
    pub(crate) fn new(repr: Repr, locale: Option<&'static str>) -> Self {
        Self { repr, locale }
    }

    pub(crate) fn invalid() -> Self {
        Self {
            repr: Repr::Invalid,
            locale: None,
        }
    }

    /// Keep this value's locale override on a value derived from it.
    pub(crate) fn derive(&self, repr: Repr) -> Self {
        Self {
            repr,
            locale: self.locale,
        }
    }

    /// The backend that owns the native representation, or `None` for an
    /// invalid value.
    pub fn backend_kind(&self) -> Option<BackendKind> {
        match self.repr {
            Repr::Chrono(_) => Some(BackendKind::Chrono),
            Repr::Jiff(_) => Some(BackendKind::Jiff),
            Repr::Invalid => None,
        }
    }

    /// Per-value locale override, if one was set.
    pub fn locale_override(&self) -> Option<&'static str> {
        self.locale
    }

    /// The epoch milliseconds and zone name, as reported by the owning
    /// representation. Used when a different backend has to adopt the value.
    pub(crate) fn portable(&self) -> Option<Portable> {
        match &self.repr {
            Repr::Chrono(dt) => Some(Portable {
                millis: dt.timestamp_millis(),
                zone: dt.timezone().name().to_string(),
            }),
            Repr::Jiff(zoned) => Some(Portable {
                millis: zoned.timestamp().as_millisecond(),
                zone: zoned.time_zone().iana_name().unwrap_or("UTC").to_string(),
            }),
            Repr::Invalid => None,
        }
    }
}

impl AsRef<TimeValue> for TimeValue {
    fn as_ref(&self) -> &TimeValue {
        self
    }
}

/// What to build a value from.
#[derive(Debug, Clone, Default)]
pub enum TimeInput {
    /// The current instant.
    #[default]
    Now,
    /// Epoch milliseconds.
    Millis(i64),
    /// A date string, parsed with the default grammar or an explicit pattern.
    Text(String),
    /// A native system timestamp.
    System(SystemTime),
    /// An existing value, cloned or converted.
    Value(TimeValue),
}

impl From<i64> for TimeInput {
    fn from(ms: i64) -> Self {
        TimeInput::Millis(ms)
    }
}

impl From<&str> for TimeInput {
    fn from(s: &str) -> Self {
        TimeInput::Text(s.to_string())
    }
}

impl From<String> for TimeInput {
    fn from(s: String) -> Self {
        TimeInput::Text(s)
    }
}

impl From<SystemTime> for TimeInput {
    fn from(t: SystemTime) -> Self {
        TimeInput::System(t)
    }
}

impl From<TimeValue> for TimeInput {
    fn from(v: TimeValue) -> Self {
        TimeInput::Value(v)
    }
}

impl From<&TimeValue> for TimeInput {
    fn from(v: &TimeValue) -> Self {
        TimeInput::Value(v.clone())
    }
}
