use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard};

use time_facade::{facade, BackendKind, Time, TimeError, TimeUnit, ZoneConfig};

// The facade shares one process-wide service, so tests that touch it run
// one at a time and put back what they change.
static GLOBAL_LOCK: Mutex<()> = Mutex::new(());

fn lock() -> MutexGuard<'static, ()> {
    GLOBAL_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct Restore {
    kind: Option<BackendKind>,
    zones: ZoneConfig,
    locale: String,
}

impl Restore {
    fn capture() -> Self {
        Self {
            kind: facade::get_current_time_library(),
            zones: facade::zones(),
            locale: facade::locale(None).unwrap(),
        }
    }
}

impl Drop for Restore {
    fn drop(&mut self) {
        if let Some(kind) = self.kind {
            facade::set_time_library(kind);
        }
        let _ = facade::set_default_timezone(&self.zones.personal_zone);
        let _ = facade::set_system_timezone(&self.zones.tenant_zone);
        let _ = facade::locale(Some(&self.locale));
    }
}

// ── backend selection tests ─────────────────────────────────────────────────

#[test]
fn test_default_backend_is_active() {
    let _guard = lock();
    assert!(facade::get_current_time_library().is_some());
    assert!(facade::now(None).is_ok());
}

#[test]
fn test_failed_switch_is_atomic() {
    let _guard = lock();
    let _restore = Restore::capture();
    facade::set_time_library(BackendKind::Jiff);
    let err = facade::set_time_library_tag("bogus").unwrap_err();
    assert_eq!(err, TimeError::UnsupportedBackend("bogus".to_string()));
    assert_eq!(err.to_string(), "Unsupported time library type: bogus");
    assert_eq!(facade::get_current_time_library(), Some(BackendKind::Jiff));
    let t = facade::create("2025-07-24", None, None).unwrap();
    assert_eq!(facade::month(&t, None).unwrap(), Some(6));
}

#[test]
fn test_switch_by_tag() {
    let _guard = lock();
    let _restore = Restore::capture();
    facade::set_time_library_tag("Jiff").unwrap();
    assert_eq!(facade::get_current_time_library(), Some(BackendKind::Jiff));
    facade::set_time_library_tag("chrono").unwrap();
    assert_eq!(facade::get_current_time_library(), Some(BackendKind::Chrono));
}

#[test]
fn test_values_survive_a_switch() {
    let _guard = lock();
    let _restore = Restore::capture();
    facade::set_time_library(BackendKind::Chrono);
    let t = facade::create("2025-07-24 15:30:45", None, None).unwrap();
    let wrapped = Time::parse("2025-07-24 15:30:45", None, None).unwrap();
    facade::set_time_library(BackendKind::Jiff);
    let next = facade::add(&t, 1, TimeUnit::Day).unwrap();
    assert_eq!(next.backend_kind(), Some(BackendKind::Jiff));
    assert_eq!(facade::format(&next, None, None).unwrap(), "2025-07-25 15:30:45");
    assert_eq!(wrapped.backend_kind(), BackendKind::Chrono);
}

// ── zone tests ──────────────────────────────────────────────────────────────

#[test]
fn test_zone_adjusted_timestamp() {
    let _guard = lock();
    let _restore = Restore::capture();
    facade::set_default_timezone("Asia/Bangkok").unwrap();
    facade::set_system_timezone("Asia/Shanghai").unwrap();
    for kind in BackendKind::ALL {
        facade::set_time_library(kind);
        let t = facade::create("2025-07-24 15:30:45", None, None).unwrap();
        let adjusted = facade::get_time(&t, true).unwrap().unwrap();
        let raw = facade::get_time(&t, false).unwrap().unwrap();
        assert_eq!(adjusted - raw, 3_600_000, "{kind}");
        assert_eq!(facade::get_utc_offset(&t).unwrap(), Some(420));
    }
}

#[test]
fn test_invalid_zone_is_rejected() {
    let _guard = lock();
    let before = facade::zones();
    let err = facade::set_default_timezone("Not/AZone").unwrap_err();
    assert_eq!(err, TimeError::InvalidTimezone("Not/AZone".to_string()));
    assert_eq!(facade::zones(), before);
}

#[test]
fn test_current_timestamp() {
    let _guard = lock();
    let before = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64;
    let now = facade::get_current_timestamp(false).unwrap().unwrap();
    assert!(now >= before && now - before < 60_000);
    assert!(facade::is_today(&facade::now(None).unwrap()).unwrap());
}

// ── locale tests ────────────────────────────────────────────────────────────

#[test]
fn test_global_locale() {
    let _guard = lock();
    let _restore = Restore::capture();
    assert_eq!(facade::locale(Some("zh-CN")).unwrap(), "zh-cn");
    assert_eq!(facade::locale(None).unwrap(), "zh-cn");
    assert_eq!(facade::months().unwrap()[0], "一月");
    assert_eq!(facade::weekdays_min(true).unwrap()[0], "一");
    assert_eq!(facade::weekdays_min(false).unwrap()[0], "日");
    // Unknown tags keep the current locale.
    assert_eq!(facade::locale(Some("tlh")).unwrap(), "zh-cn");
    let t = facade::create("2025-07-24 15:00:00", None, None).unwrap();
    assert_eq!(facade::format(&t, Some("A h"), None).unwrap(), "下午 3");
    let en = facade::with_locale(&t, "en-US").unwrap();
    assert_eq!(facade::format(&en, Some("A h"), None).unwrap(), "PM 3");
}

// ── operation tests ─────────────────────────────────────────────────────────

#[test]
fn test_free_functions_match_the_contract() {
    let _guard = lock();
    let _restore = Restore::capture();
    for kind in BackendKind::ALL {
        facade::set_time_library(kind);
        let t = facade::create("2025-07-24 15:30:45.500", None, None).unwrap();
        let u = facade::subtract(&t, 90, TimeUnit::Minute).unwrap();

        assert_eq!(facade::year(&t, None).unwrap(), Some(2025));
        assert_eq!(facade::date(&t, None).unwrap(), Some(24));
        assert_eq!(facade::day(&t, None).unwrap(), Some(4));
        assert_eq!(facade::hour(&u, None).unwrap(), Some(14));
        assert_eq!(facade::minute(&u, None).unwrap(), Some(0));
        assert_eq!(facade::second(&t, None).unwrap(), Some(45));
        assert_eq!(facade::millisecond(&t, None).unwrap(), Some(500));
        assert_eq!(facade::compare(&t, &u).unwrap(), Some(Ordering::Greater));
        assert_eq!(facade::diff(&t, &u, Some(TimeUnit::Hour), false).unwrap(), 1.0);
        assert_eq!(facade::diff(&t, &u, Some(TimeUnit::Hour), true).unwrap(), 1.5);
        assert_eq!(facade::unix(&t).unwrap(), Some(1_753_342_245));
        assert_eq!(
            facade::to_iso_string(&t).unwrap(),
            "2025-07-24T07:30:45.500Z"
        );

        let end = facade::end_of_month(&t).unwrap();
        assert_eq!(
            facade::format(&end, Some("YYYY-MM-DD HH:mm:ss.SSS"), None).unwrap(),
            "2025-07-31 23:59:59.999"
        );
        let start = facade::start_of_year(&t).unwrap();
        assert_eq!(facade::format(&start, None, None).unwrap(), "2025-01-01 00:00:00");

        let feb = facade::set_month(&facade::set_date(&t, 31).unwrap(), 1).unwrap();
        assert_eq!(facade::format(&feb, Some("YYYY-MM-DD"), None).unwrap(), "2025-02-28");
        assert_eq!(facade::days_in_month(&feb).unwrap(), Some(28));
        assert!(!facade::is_leap_year(&feb).unwrap());

        let bad = facade::parse("2025-13-01", None, None).unwrap();
        assert!(!facade::is_valid(&bad).unwrap());
        assert_eq!(facade::format(&bad, None, None).unwrap(), "Invalid Date");
    }
}
