//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_release_lock() -> bool {
    defaults::release_lock()
}
fn d_games() -> Vec<String> {
    defaults::games().to_vec()
}
fn d_max_decode_depth() -> usize {
    defaults::max_decode_depth()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub binding: BindingConfig,
}

/// Settings shared by every component
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    /// Filter used when RUST_LOG is unset (e.g. "info", "engine_python=debug")
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// Behaviour of the host extension module
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BindingConfig {
    /// Release the interpreter lock around expensive game operations
    #[serde(default = "d_release_lock")]
    pub release_lock: bool,
    /// env_ids to expose; empty exposes every registered game
    #[serde(default = "d_games")]
    pub games: Vec<String>,
    /// Deepest nesting accepted when decoding host values
    #[serde(default = "d_max_decode_depth")]
    pub max_decode_depth: usize,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            release_lock: defaults::release_lock(),
            games: defaults::games().to_vec(),
            max_decode_depth: defaults::max_decode_depth(),
        }
    }
}

impl BindingConfig {
    /// Whether a registered game should be exposed
    pub fn is_enabled(&self, env_id: &str) -> bool {
        self.games.is_empty() || self.games.iter().any(|g| g == env_id)
    }
}
