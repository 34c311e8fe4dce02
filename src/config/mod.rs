//! Configuration module for vid2blog
//!
//! Handles loading application settings from a TOML file plus environment
//! overrides. Settings are read once at startup and passed by reference.

mod settings;

pub use settings::Settings;
