//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time so the module always has a
//! complete configuration, even when no config.toml is present.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    binding: BindingDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct BindingDefaults {
    release_lock: bool,
    games: Vec<String>,
    max_decode_depth: usize,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// Binding
pub fn release_lock() -> bool {
    DEFAULTS.binding.release_lock
}
pub fn games() -> &'static [String] {
    &DEFAULTS.binding.games
}
pub fn max_decode_depth() -> usize {
    DEFAULTS.binding.max_decode_depth
}
