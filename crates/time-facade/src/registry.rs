//! Which engine is active.
//!
//! The registry owns at most one engine instance. Switching builds a fresh
//! instance of the requested kind; values created by the previous engine
//! stay readable because every engine can adopt the others' values.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::backend::{BackendKind, TimeBackend};
use crate::config::SharedSettings;
use crate::error::{Result, TimeError};

#[derive(Debug, Clone)]
enum RegistryState {
    Uninitialized,
    Active {
        kind: BackendKind,
        instance: Arc<dyn TimeBackend>,
    },
}

#[derive(Debug, Clone)]
pub struct BackendRegistry {
    state: RegistryState,
    settings: SharedSettings,
}

impl BackendRegistry {
    /// A registry with no active engine. [`get_instance`](Self::get_instance)
    /// fails until [`set_type`](Self::set_type) is called.
    pub fn new(settings: SharedSettings) -> Self {
        Self {
            state: RegistryState::Uninitialized,
            settings,
        }
    }

    pub fn with_backend(kind: BackendKind, settings: SharedSettings) -> Self {
        let mut registry = Self::new(settings);
        registry.set_type(kind);
        registry
    }

    /// The active engine.
    ///
    /// # Errors
    ///
    /// [`TimeError::NotInitialized`] when no engine has been selected.
    pub fn get_instance(&self) -> Result<Arc<dyn TimeBackend>> {
        match &self.state {
            RegistryState::Active { instance, .. } => Ok(Arc::clone(instance)),
            RegistryState::Uninitialized => Err(TimeError::NotInitialized),
        }
    }

    pub fn current_type(&self) -> Option<BackendKind> {
        match &self.state {
            RegistryState::Active { kind, .. } => Some(*kind),
            RegistryState::Uninitialized => None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.current_type().is_some()
    }

    /// Make `kind` the active engine. Selecting the engine that is already
    /// active keeps the existing instance.
    pub fn set_type(&mut self, kind: BackendKind) {
        if self.current_type() == Some(kind) {
            debug!(backend = %kind, "backend already active");
            return;
        }
        let previous = self.current_type();
        self.state = RegistryState::Active {
            kind,
            instance: kind.instantiate(Arc::clone(&self.settings)),
        };
        info!(backend = %kind, ?previous, "switched time backend");
    }

    /// [`set_type`](Self::set_type) from a textual tag.
    ///
    /// # Errors
    ///
    /// [`TimeError::UnsupportedBackend`] for an unknown tag. The active engine
    /// is left as it was.
    pub fn set_type_tag(&mut self, tag: &str) -> Result<()> {
        let kind = tag.parse::<BackendKind>().inspect_err(|_| {
            warn!(tag, current = ?self.current_type(), "unsupported time backend requested");
        })?;
        self.set_type(kind);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{shared, Settings};

    fn registry() -> BackendRegistry {
        BackendRegistry::new(shared(Settings::default()))
    }

    #[test]
    fn test_uninitialized_registry() {
        let r = registry();
        assert!(!r.is_initialized());
        assert_eq!(r.current_type(), None);
        assert_eq!(r.get_instance().unwrap_err(), TimeError::NotInitialized);
    }

    #[test]
    fn test_set_type_activates() {
        let mut r = registry();
        r.set_type(BackendKind::Jiff);
        assert_eq!(r.current_type(), Some(BackendKind::Jiff));
        assert_eq!(r.get_instance().unwrap().kind(), BackendKind::Jiff);
    }

    #[test]
    fn test_same_type_keeps_instance() {
        let mut r = BackendRegistry::with_backend(BackendKind::Chrono, shared(Settings::default()));
        let before = r.get_instance().unwrap();
        r.set_type(BackendKind::Chrono);
        assert!(Arc::ptr_eq(&before, &r.get_instance().unwrap()));
    }

    #[test]
    fn test_switch_replaces_instance() {
        let mut r = BackendRegistry::with_backend(BackendKind::Chrono, shared(Settings::default()));
        let before = r.get_instance().unwrap();
        r.set_type(BackendKind::Jiff);
        r.set_type(BackendKind::Chrono);
        assert!(!Arc::ptr_eq(&before, &r.get_instance().unwrap()));
        assert_eq!(r.current_type(), Some(BackendKind::Chrono));
    }

    #[test]
    fn test_unknown_tag_leaves_state() {
        let mut r = BackendRegistry::with_backend(BackendKind::Jiff, shared(Settings::default()));
        let err = r.set_type_tag("luxon").unwrap_err();
        assert_eq!(err, TimeError::UnsupportedBackend("luxon".to_string()));
        assert_eq!(r.current_type(), Some(BackendKind::Jiff));

        let mut empty = registry();
        assert!(empty.set_type_tag("luxon").is_err());
        assert!(!empty.is_initialized());
    }

    #[test]
    fn test_tag_selects_backend() {
        let mut r = registry();
        r.set_type_tag("chrono").unwrap();
        assert_eq!(r.current_type(), Some(BackendKind::Chrono));
    }
}
