//! An injectable handle bundling a backend registry with its settings.
//!
//! Each [`TimeService`] owns its own zone configuration, global locale and
//! active engine, so independent services can coexist in one process. The
//! free functions in [`facade`](crate::facade) run against the process-wide
//! [`global`] service.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use tracing::debug;

use crate::backend::{BackendKind, TimeBackend};
use crate::config::{self, ServiceConfig, Settings, SharedSettings, ZoneConfig};
use crate::error::{Result, TimeError};
use crate::locale;
use crate::registry::BackendRegistry;
use crate::value::{TimeInput, TimeValue};
use crate::wrapper::Time;

static GLOBAL: LazyLock<TimeService> = LazyLock::new(TimeService::default);

/// The process-wide service behind the free function facade.
pub fn global() -> &'static TimeService {
    &GLOBAL
}

#[derive(Debug)]
pub struct TimeService {
    registry: RwLock<BackendRegistry>,
    settings: SharedSettings,
}

impl Default for TimeService {
    fn default() -> Self {
        Self::new(BackendKind::default())
    }
}

impl TimeService {
    /// A service with default zones and locale running `kind`.
    pub fn new(kind: BackendKind) -> Self {
        Self::with_settings(kind, Settings::default())
    }

    /// A service with no active engine. Every operation returns
    /// [`TimeError::NotInitialized`] until a backend is selected.
    pub fn uninitialized() -> Self {
        let settings = config::shared(Settings::default());
        Self {
            registry: RwLock::new(BackendRegistry::new(Arc::clone(&settings))),
            settings,
        }
    }

    /// Build a service from a validated configuration.
    ///
    /// # Errors
    ///
    /// The validation errors of [`ServiceConfig::validate`].
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;
        let locale = locale::canonical_tag(&config.locale)
            .ok_or_else(|| TimeError::InvalidLocale(config.locale.clone()))?;
        let settings = Settings {
            zones: config.zones.clone(),
            locale,
        };
        Ok(Self::with_settings(config.backend, settings))
    }

    fn with_settings(kind: BackendKind, settings: Settings) -> Self {
        let settings = config::shared(settings);
        let registry = BackendRegistry::with_backend(kind, Arc::clone(&settings));
        Self {
            registry: RwLock::new(registry),
            settings,
        }
    }

    // ── backend selection ──

    /// The active engine.
    ///
    /// # Errors
    ///
    /// [`TimeError::NotInitialized`] when no engine has been selected.
    pub fn backend(&self) -> Result<Arc<dyn TimeBackend>> {
        self.registry.read().get_instance()
    }

    pub fn current_type(&self) -> Option<BackendKind> {
        self.registry.read().current_type()
    }

    pub fn set_type(&self, kind: BackendKind) {
        self.registry.write().set_type(kind);
    }

    /// Select an engine by tag.
    ///
    /// # Errors
    ///
    /// [`TimeError::UnsupportedBackend`] for an unknown tag, leaving the
    /// active engine unchanged.
    pub fn set_type_tag(&self, tag: &str) -> Result<()> {
        self.registry.write().set_type_tag(tag)
    }

    // ── zones ──

    pub fn zones(&self) -> ZoneConfig {
        self.settings.read().zones.clone()
    }

    /// Replace both zones at once.
    ///
    /// # Errors
    ///
    /// [`TimeError::InvalidTimezone`] if either name is unknown. Nothing is
    /// changed in that case.
    pub fn set_zones(&self, zones: ZoneConfig) -> Result<()> {
        zones.validate()?;
        debug!(
            personal = %zones.personal_zone,
            tenant = %zones.tenant_zone,
            "zone configuration replaced"
        );
        self.settings.write().zones = zones;
        Ok(())
    }

    /// Set the personal zone used for display and default creation.
    ///
    /// # Errors
    ///
    /// [`TimeError::InvalidTimezone`] for an unknown name.
    pub fn set_default_timezone(&self, zone: &str) -> Result<()> {
        let zone = config::canonical_zone(zone)?;
        debug!(zone, "personal zone changed");
        self.settings.write().zones.personal_zone = zone.to_string();
        Ok(())
    }

    /// Set the tenant zone that adjusted timestamps are expressed in.
    ///
    /// # Errors
    ///
    /// [`TimeError::InvalidTimezone`] for an unknown name.
    pub fn set_system_timezone(&self, zone: &str) -> Result<()> {
        let zone = config::canonical_zone(zone)?;
        debug!(zone, "tenant zone changed");
        self.settings.write().zones.tenant_zone = zone.to_string();
        Ok(())
    }

    // ── locale ──

    /// Read the global locale, or set it when `tag` is given.
    pub fn locale(&self, tag: Option<&str>) -> Result<String> {
        Ok(self.backend()?.locale(tag))
    }

    // ── wrappers ──

    pub fn create(
        &self,
        input: impl Into<TimeInput>,
        format: Option<&str>,
        zone: Option<&str>,
    ) -> Result<Time> {
        let backend = self.backend()?;
        let value = backend.create(input.into(), format, zone);
        Ok(Time::from_parts(backend, value))
    }

    pub fn parse(&self, text: &str, format: Option<&str>, zone: Option<&str>) -> Result<Time> {
        self.create(text, format, zone)
    }

    pub fn now(&self, zone: Option<&str>) -> Result<Time> {
        self.create(TimeInput::Now, None, zone)
    }

    /// Wrap an existing value with the active engine.
    pub fn wrap(&self, value: TimeValue) -> Result<Time> {
        Ok(Time::from_parts(self.backend()?, value))
    }
}
