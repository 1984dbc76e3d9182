//! Plankit Settings Crate
//!
//! User preferences read by the plan: units, grid and furniture display,
//! wall patterns, colors and default text styles, with TOML/JSON persistence.

pub mod config;
pub mod error;
pub mod manager;

pub use config::{PlanSettings, PointerType, Preferences, TextSettings, UnitSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
pub use manager::PreferencesManager;
