//! # time-facade
//!
//! One date/time API over interchangeable engines.
//!
//! Callers create, format, compare and do calendar arithmetic on opaque
//! [`TimeValue`]s without naming the engine that does the work. The active
//! engine is chosen at runtime and can be switched without touching call
//! sites. Every engine honors the same normalization rules: 0-based months,
//! Sunday-based weeks, end-of-month clamping, truncating differences and
//! zone-adjusted timestamps.
//!
//! ## Modules
//!
//! - [`backend`] — `TimeBackend` capability contract, `BackendKind`, the chrono and jiff engines
//! - [`registry`] — Holds the single active engine, switches it on request
//! - [`service`] — `TimeService` context handle and the process-wide default
//! - [`facade`] — Free functions delegating to the process-wide service
//! - [`wrapper`] — Chainable, immutable `Time` wrapper
//! - [`value`] — Opaque `TimeValue` and the `TimeInput` creation argument
//! - [`normalize`] — Cross-engine rules: month indexing, weeks, quarters, diff truncation, zone adjustment
//! - [`format`] — Canonical pattern tokens, translation to native dialects, pattern parsing
//! - [`locale`] — Built-in weekday, month and meridiem names
//! - [`config`] — Zone configuration and JSON service configuration
//! - [`unit`] — Calendar and clock units
//! - [`error`] — Error types

pub mod backend;
pub mod config;
pub mod error;
pub mod facade;
pub mod format;
pub mod locale;
pub mod normalize;
pub mod registry;
pub mod service;
pub mod unit;
pub mod value;
pub mod wrapper;

pub use backend::{BackendKind, ChronoBackend, JiffBackend, TimeBackend};
pub use config::{ServiceConfig, ZoneConfig};
pub use error::{Result, TimeError};
pub use locale::LocaleData;
pub use registry::BackendRegistry;
pub use service::{global, TimeService};
pub use unit::{TimeUnit, UnitParseError};
pub use value::{TimeInput, TimeValue};
pub use wrapper::Time;
