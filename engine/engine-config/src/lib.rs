//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic used by
//! the host extension module.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`GAMEBIND_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! GAMEBIND_<SECTION>_<KEY>=value
//!
//! Examples:
//!     GAMEBIND_COMMON_LOG_LEVEL=debug
//!     GAMEBIND_BINDING_RELEASE_LOCK=false
//!     GAMEBIND_BINDING_GAMES=connect4,tictactoe
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;
