//! Static game registry
//!
//! This module provides a thread-safe registry that maps env_id to the
//! metadata of every game compiled into the process. Bindings consult it to
//! decide which games to expose and to answer metadata queries.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::metadata::GameMetadata;

/// Thread-safe registry mapping env_id to game metadata
static REGISTRY: Lazy<Mutex<BTreeMap<String, GameMetadata>>> =
    Lazy::new(|| Mutex::new(BTreeMap::new()));

/// Error type for registration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("Game already registered: {0}")]
    AlreadyRegistered(String),
    #[error("Game metadata has an empty env_id")]
    EmptyEnvId,
}

/// Register a game with the global registry
///
/// Registration happens once per env_id; a second attempt is rejected and
/// the first registration stays in place.
///
/// # Example
///
/// ```rust
/// # use engine_core::registry::*;
/// # use engine_core::GameMetadata;
/// register_game(GameMetadata::new("my_game", "My Game")).unwrap();
/// assert!(is_registered("my_game"));
/// assert!(register_game(GameMetadata::new("my_game", "Again")).is_err());
/// ```
pub fn register_game(metadata: GameMetadata) -> Result<(), RegistryError> {
    if metadata.env_id.is_empty() {
        return Err(RegistryError::EmptyEnvId);
    }
    let mut registry = REGISTRY.lock().unwrap();
    if registry.contains_key(&metadata.env_id) {
        warn!(env_id = %metadata.env_id, "Ignoring duplicate game registration");
        return Err(RegistryError::AlreadyRegistered(metadata.env_id));
    }
    debug!(env_id = %metadata.env_id, "Registered game");
    registry.insert(metadata.env_id.clone(), metadata);
    Ok(())
}

/// Look up the metadata of a registered game
pub fn game_metadata(env_id: &str) -> Option<GameMetadata> {
    let registry = REGISTRY.lock().unwrap();
    registry.get(env_id).cloned()
}

/// Get the env_ids of all registered games, sorted
pub fn list_registered_games() -> Vec<String> {
    let registry = REGISTRY.lock().unwrap();
    registry.keys().cloned().collect()
}

/// Check if a game is registered
pub fn is_registered(env_id: &str) -> bool {
    let registry = REGISTRY.lock().unwrap();
    registry.contains_key(env_id)
}

/// Clear all registered games (mainly for testing)
pub fn clear_registry() {
    let mut registry = REGISTRY.lock().unwrap();
    registry.clear();
}

/// Register a game type by its metadata
///
/// # Example
///
/// ```ignore
/// register_game!(Connect4)?;
/// ```
#[macro_export]
macro_rules! register_game {
    ($game_type:ty) => {
        $crate::registry::register_game(<$game_type as $crate::typed::Game>::metadata())
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::REGISTRY_TEST_MUTEX;

    #[test]
    fn test_register_and_lookup_game() {
        let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
        clear_registry();

        register_game(GameMetadata::new("test_game", "Test Game").with_actions(4)).unwrap();

        let meta = game_metadata("test_game").expect("registered game should be found");
        assert_eq!(meta.display_name, "Test Game");
        assert_eq!(meta.num_actions, 4);
    }

    #[test]
    fn test_lookup_nonexistent_game() {
        let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
        clear_registry();

        assert!(game_metadata("nonexistent").is_none());
    }

    #[test]
    fn test_list_registered_games_sorted() {
        let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
        clear_registry();

        register_game(GameMetadata::new("game2", "Two")).unwrap();
        register_game(GameMetadata::new("game1", "One")).unwrap();

        assert_eq!(
            list_registered_games(),
            vec!["game1".to_string(), "game2".to_string()]
        );
    }

    #[test]
    fn test_is_registered() {
        let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
        clear_registry();

        assert!(!is_registered("registered_game"));
        register_game(GameMetadata::new("registered_game", "Registered")).unwrap();
        assert!(is_registered("registered_game"));
        assert!(!is_registered("unregistered_game"));
    }

    #[test]
    fn test_clear_registry() {
        let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
        clear_registry();

        register_game(GameMetadata::new("temp_game", "Temp")).unwrap();
        assert!(is_registered("temp_game"));

        clear_registry();
        assert!(!is_registered("temp_game"));
        assert!(list_registered_games().is_empty());
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
        clear_registry();

        register_game(GameMetadata::new("dup_env", "First")).unwrap();
        let err = register_game(GameMetadata::new("dup_env", "Second")).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyRegistered("dup_env".to_string()));

        let meta = game_metadata("dup_env").unwrap();
        assert_eq!(meta.display_name, "First");
        assert_eq!(list_registered_games(), vec!["dup_env".to_string()]);
    }

    #[test]
    fn test_empty_env_id_rejected() {
        let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
        clear_registry();

        assert_eq!(
            register_game(GameMetadata::new("", "Nameless")),
            Err(RegistryError::EmptyEnvId)
        );
        assert!(list_registered_games().is_empty());
    }
}
