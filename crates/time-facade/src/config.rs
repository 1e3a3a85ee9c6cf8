//! Zone configuration and service settings.
//!
//! A [`ZoneConfig`] holds the two zones every service knows about: the
//! personal zone used for display and default creation, and the tenant zone
//! that zone-adjusted timestamps are expressed in. [`ServiceConfig`] bundles
//! it with the initial backend and locale and can be loaded from JSON.

use std::sync::Arc;

use chrono_tz::{Tz, TZ_VARIANTS};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;
use crate::error::{Result, TimeError};
use crate::locale;

pub const DEFAULT_PERSONAL_ZONE: &str = "Asia/Shanghai";
pub const DEFAULT_TENANT_ZONE: &str = "Asia/Seoul";
pub const DEFAULT_LOCALE: &str = "en";

/// The personal ("default") zone and the tenant ("system") zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    pub personal_zone: String,
    pub tenant_zone: String,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            personal_zone: DEFAULT_PERSONAL_ZONE.to_string(),
            tenant_zone: DEFAULT_TENANT_ZONE.to_string(),
        }
    }
}

impl ZoneConfig {
    /// Build a configuration, rejecting names that are not IANA zones.
    /// Names are stored in their canonical spelling.
    pub fn new(personal_zone: &str, tenant_zone: &str) -> Result<Self> {
        Ok(Self {
            personal_zone: canonical_zone(personal_zone)?.to_string(),
            tenant_zone: canonical_zone(tenant_zone)?.to_string(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        validate_zone(&self.personal_zone)?;
        validate_zone(&self.tenant_zone)
    }
}

/// Everything needed to stand up a [`TimeService`](crate::TimeService).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub backend: BackendKind,
    pub zones: ZoneConfig,
    pub locale: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            zones: ZoneConfig::default(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// Missing fields take their defaults, so `{}` is a valid document.
    ///
    /// # Errors
    ///
    /// - [`TimeError::InvalidConfig`] for malformed JSON or an unknown backend tag
    /// - [`TimeError::InvalidTimezone`] for a zone that is not an IANA name
    /// - [`TimeError::InvalidLocale`] for a locale with no built-in data
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ServiceConfig =
            serde_json::from_str(json).map_err(|e| TimeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.zones.validate()?;
        if locale::canonical_tag(&self.locale).is_none() {
            return Err(TimeError::InvalidLocale(self.locale.clone()));
        }
        Ok(())
    }
}

/// Mutable runtime state shared by a service and the backends it builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub zones: ZoneConfig,
    pub locale: &'static str,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            zones: ZoneConfig::default(),
            locale: DEFAULT_LOCALE,
        }
    }
}

pub type SharedSettings = Arc<RwLock<Settings>>;

pub(crate) fn shared(settings: Settings) -> SharedSettings {
    Arc::new(RwLock::new(settings))
}

/// Parse an IANA timezone name, ignoring ASCII case.
///
/// Every engine resolves zone names through here, so a name is either
/// valid everywhere or nowhere.
pub(crate) fn parse_timezone(tz_str: &str) -> Result<Tz> {
    tz_str
        .parse::<Tz>()
        .ok()
        .or_else(|| {
            TZ_VARIANTS
                .iter()
                .copied()
                .find(|tz| tz.name().eq_ignore_ascii_case(tz_str))
        })
        .ok_or_else(|| TimeError::InvalidTimezone(tz_str.to_string()))
}

/// The canonical spelling of a zone name (`asia/tokyo` -> `Asia/Tokyo`).
pub fn canonical_zone(tz_str: &str) -> Result<&'static str> {
    parse_timezone(tz_str).map(|tz| tz.name())
}

pub fn validate_zone(tz_str: &str) -> Result<()> {
    parse_timezone(tz_str).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_defaults() {
        let zones = ZoneConfig::default();
        assert_eq!(zones.personal_zone, "Asia/Shanghai");
        assert_eq!(zones.tenant_zone, "Asia/Seoul");
    }

    #[test]
    fn test_zone_config_rejects_unknown_zone() {
        let err = ZoneConfig::new("Mars/Olympus", "UTC").unwrap_err();
        assert!(err.to_string().contains("Invalid timezone"), "got: {err}");
    }

    #[test]
    fn test_zone_names_ignore_case() {
        assert!(validate_zone("asia/tokyo").is_ok());
        assert_eq!(canonical_zone("EUROPE/london").unwrap(), "Europe/London");
        let zones = ZoneConfig::new("america/new_york", "utc").unwrap();
        assert_eq!(zones.personal_zone, "America/New_York");
        assert_eq!(zones.tenant_zone, "UTC");
        assert!(validate_zone("asia/nowhere").is_err());
    }

    #[test]
    fn test_service_config_empty_json_uses_defaults() {
        let config = ServiceConfig::from_json("{}").unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_service_config_full_json() {
        let config = ServiceConfig::from_json(
            r#"{"backend":"jiff","zones":{"personal_zone":"Asia/Bangkok","tenant_zone":"UTC"},"locale":"zh-cn"}"#,
        )
        .unwrap();
        assert_eq!(config.backend, BackendKind::Jiff);
        assert_eq!(config.zones.personal_zone, "Asia/Bangkok");
        assert_eq!(config.locale, "zh-cn");
    }

    #[test]
    fn test_service_config_malformed_json() {
        let err = ServiceConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, TimeError::InvalidConfig(_)), "got: {err}");
    }

    #[test]
    fn test_service_config_unknown_backend() {
        let err = ServiceConfig::from_json(r#"{"backend":"moment"}"#).unwrap_err();
        assert!(matches!(err, TimeError::InvalidConfig(_)), "got: {err}");
    }

    #[test]
    fn test_service_config_unknown_locale() {
        let err = ServiceConfig::from_json(r#"{"locale":"tlh"}"#).unwrap_err();
        assert_eq!(err, TimeError::InvalidLocale("tlh".to_string()));
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = ServiceConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"backend\":\"chrono\""), "got: {json}");
        assert_eq!(ServiceConfig::from_json(&json).unwrap(), config);
    }
}
