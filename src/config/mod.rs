//! Configuration management for Skiff.
//!
//! Provides XDG-compliant configuration storage and application settings.

mod settings;

pub use settings::{AppSettings, Paths};
