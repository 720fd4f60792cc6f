//! Error taxonomy of the binding and its translation to Python exceptions.
//!
//! Every failure that reaches the host goes through [`BindingError`], which
//! maps one-to-one onto the exception classes exported by the module.

use engine_core::{GameError, ShapeError};
use pyo3::create_exception;
use pyo3::exceptions::{PyRuntimeError, PyTypeError, PyValueError};
use pyo3::PyErr;
use tracing::debug;

create_exception!(
    _core,
    ConstructionError,
    PyRuntimeError,
    "A handle could not be created, or was instantiated directly."
);
create_exception!(
    _core,
    NativeComputationError,
    PyRuntimeError,
    "A game operation failed inside native code."
);
create_exception!(
    _core,
    DecodeError,
    PyValueError,
    "A host value does not match the shape the game expects."
);
create_exception!(
    _core,
    ShapeMismatchError,
    PyValueError,
    "An array has the wrong element type, layout or shape."
);
create_exception!(
    _core,
    ArgumentError,
    PyTypeError,
    "An argument is not accepted by the game."
);

/// Errors raised at the host boundary
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("{0}")]
    Construction(String),
    #[error("internal error: {0}")]
    Computation(String),
    #[error(transparent)]
    Decode(#[from] engine_core::DecodeError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error("{0}")]
    Argument(String),
    /// An exception raised by the interpreter itself, passed through as is
    #[error(transparent)]
    Host(#[from] PyErr),
}

impl From<GameError> for BindingError {
    fn from(err: GameError) -> Self {
        match err {
            e @ (GameError::UnsupportedMode(_) | GameError::InvalidArgument(_)) => {
                BindingError::Argument(e.to_string())
            }
            GameError::Decode(e) => BindingError::Decode(e),
            GameError::Shape(e) => BindingError::Shape(e),
            other => BindingError::Computation(other.to_string()),
        }
    }
}

impl From<BindingError> for PyErr {
    fn from(err: BindingError) -> PyErr {
        let message = err.to_string();
        debug!(error = %message, "Raising into host");
        match err {
            BindingError::Construction(_) => ConstructionError::new_err(message),
            BindingError::Computation(_) => NativeComputationError::new_err(message),
            BindingError::Decode(_) => DecodeError::new_err(message),
            BindingError::Shape(_) => ShapeMismatchError::new_err(message),
            BindingError::Argument(_) => ArgumentError::new_err(message),
            BindingError::Host(e) => e,
        }
    }
}

/// Error for a handle class called directly from Python
pub fn construction_rejected(class: &str) -> PyErr {
    BindingError::Construction(format!(
        "{class} cannot be instantiated directly; use sample_initial_state, from_json or from_tensors"
    ))
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_error_mapping() {
        assert!(matches!(
            BindingError::from(GameError::UnsupportedMode("rgb".into())),
            BindingError::Argument(_)
        ));
        assert!(matches!(
            BindingError::from(GameError::InvalidArgument("x".into())),
            BindingError::Argument(_)
        ));
        assert!(matches!(
            BindingError::from(GameError::Decode(engine_core::DecodeError::MissingField(
                "grid".into()
            ))),
            BindingError::Decode(_)
        ));
        assert!(matches!(
            BindingError::from(GameError::Shape(ShapeError::NotContiguous)),
            BindingError::Shape(_)
        ));
        assert!(matches!(
            BindingError::from(GameError::InvalidAction("full".into())),
            BindingError::Computation(_)
        ));
    }

    #[test]
    fn test_computation_message_prefix() {
        let err = BindingError::from(GameError::InvalidState("bad".into()));
        assert_eq!(err.to_string(), "internal error: Invalid state: bad");
    }

    #[test]
    fn test_decode_message_is_transparent() {
        let err = BindingError::from(engine_core::DecodeError::MissingField("grid".into()));
        assert_eq!(
            err.to_string(),
            engine_core::DecodeError::MissingField("grid".into()).to_string()
        );
    }
}
