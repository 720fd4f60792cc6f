//! Python bindings for native games
//!
//! Builds the `game._core` extension module. Each registered game is exposed
//! as a pair of immutable classes, `<Name>State` and `<Name>Action`:
//!
//! ```python
//! from game._core import Connect4State
//!
//! state = Connect4State.sample_initial_state()
//! while not state.has_ended:
//!     state = state.actions[0].sample_next_state()
//! print(state.winner, state.reward)
//! ```
//!
//! - `handle`: Ownership of native values behind Python objects
//! - `exchange`: JSON-like values to and from Python objects
//! - `tensor`: Tensors to and from numpy arrays
//! - `ops`: Generic method bodies shared by every game
//! - `unlock`: Interpreter lock release and panic translation
//! - `registrar`: `bind_game!` and class attachment

pub mod errors;
pub mod exchange;
pub mod games;
pub mod handle;
pub mod ops;
pub mod registrar;
pub mod settings;
pub mod tensor;
pub mod unlock;

// Used by `bind_game!` expansions in other crates
pub use engine_core;

pub use errors::{
    ArgumentError, BindingError, ConstructionError, DecodeError, NativeComputationError,
    ShapeMismatchError,
};
pub use handle::{ActionHandle, StateHandle};
pub use registrar::attach_game;

use pyo3::prelude::*;
use tracing::{debug, info, warn};

use crate::exchange::to_host;
use crate::settings::{init_tracing, settings};

/// env_ids of every registered game
#[pyfunction]
fn registered_games() -> Vec<String> {
    engine_core::list_registered_games()
}

/// Metadata of a registered game as a dict
#[pyfunction]
fn game_metadata(py: Python<'_>, env_id: &str) -> PyResult<PyObject> {
    let metadata = engine_core::game_metadata(env_id)
        .ok_or_else(|| BindingError::Argument(format!("unknown game: {env_id}")))?;
    let value = metadata
        .to_exchange()
        .map_err(|e| BindingError::Computation(e.to_string()))?;
    to_host(py, &value)
}

#[pymodule]
#[pyo3(name = "_core")]
pub fn core_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    let config = settings();
    init_tracing(&config.common);
    engine_games::register_all_games();

    m.add("ConstructionError", py.get_type_bound::<ConstructionError>())?;
    m.add(
        "NativeComputationError",
        py.get_type_bound::<NativeComputationError>(),
    )?;
    m.add("DecodeError", py.get_type_bound::<DecodeError>())?;
    m.add("ShapeMismatchError", py.get_type_bound::<ShapeMismatchError>())?;
    m.add("ArgumentError", py.get_type_bound::<ArgumentError>())?;

    m.add_function(wrap_pyfunction!(registered_games, m)?)?;
    m.add_function(wrap_pyfunction!(game_metadata, m)?)?;

    let mut attached = Vec::new();
    for binding in games::BINDINGS {
        if !config.binding.is_enabled(binding.env_id) {
            debug!(env_id = binding.env_id, "Game disabled by configuration");
            continue;
        }
        if !engine_core::is_registered(binding.env_id) {
            warn!(env_id = binding.env_id, "Game has classes but is not registered");
            continue;
        }
        (binding.attach)(m, binding.env_id)?;
        attached.push(binding.env_id);
    }

    info!(games = ?attached, "game._core initialized");
    Ok(())
}
