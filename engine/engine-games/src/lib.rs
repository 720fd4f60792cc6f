//! Game registration for the binding layer
//!
//! This crate provides a single initialization point for registering all
//! bundled games with the engine-core registry.
//!
//! # Usage
//!
//! ```rust
//! use engine_games::register_all_games;
//!
//! // Call once at startup - safe to call multiple times
//! register_all_games();
//! assert!(engine_core::is_registered("connect4"));
//! ```

use std::sync::Once;

use engine_core::RegistryError;
use tracing::{debug, warn};

static INIT: Once = Once::new();

/// Register all available games with the engine-core registry.
///
/// This function uses `std::sync::Once` to ensure registration only
/// happens once, even if called multiple times. Safe to call from
/// multiple threads.
///
/// Currently registers:
/// - TicTacToe (`"tictactoe"`)
/// - Connect 4 (`"connect4"`)
pub fn register_all_games() {
    INIT.call_once(|| {
        let results: [(&str, Result<(), RegistryError>); 2] = [
            ("tictactoe", games_tictactoe::register_tictactoe()),
            ("connect4", games_connect4::register_connect4()),
        ];
        for (env_id, result) in results {
            match result {
                Ok(()) => debug!(env_id, "Game registered"),
                // Registered directly beforehand
                Err(RegistryError::AlreadyRegistered(_)) => {
                    debug!(env_id, "Game already registered")
                }
                Err(e) => warn!(env_id, error = %e, "Failed to register game"),
            }
        }
    });
}

// Re-export individual registration functions for advanced use cases
pub use games_connect4::register_connect4;
pub use games_tictactoe::register_tictactoe;
