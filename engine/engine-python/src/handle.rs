//! Python-visible handles around native game values.
//!
//! A state handle exclusively owns one `G::State`. An action handle owns one
//! `G::Action` and a strong reference to the state handle it was enumerated
//! from, so the state outlives every action derived from it. Handle classes
//! are frozen: once built, the wrapped value never changes.
//!
//! Concrete classes are generated by [`bind_game!`](crate::bind_game); the
//! traits below are what the generic operations in [`crate::ops`] see.

use engine_core::Game;
use pyo3::prelude::*;
use pyo3::pyclass::boolean_struct::True;
use pyo3::{PyClass, PyClassInitializer};

use crate::errors::BindingError;

pub type StateOf<S> = <<S as StateHandle>::Game as Game>::State;
pub type ActionOf<A> = <<<A as ActionHandle>::Owner as StateHandle>::Game as Game>::Action;

/// A frozen Python class owning one game state
pub trait StateHandle:
    PyClass<Frozen = True> + Into<PyClassInitializer<Self>> + Sync + Sized
{
    type Game: Game;

    fn wrap(value: StateOf<Self>) -> Self;

    fn value(&self) -> &StateOf<Self>;
}

/// A frozen Python class owning one action and a reference to its state
pub trait ActionHandle:
    PyClass<Frozen = True> + Into<PyClassInitializer<Self>> + Sync + Sized
{
    type Owner: StateHandle;

    fn wrap(owner: Py<Self::Owner>, value: ActionOf<Self>) -> Self;

    fn owner(&self) -> &Py<Self::Owner>;

    fn value(&self) -> &ActionOf<Self>;
}

/// Allocate a state handle owning `value`
pub fn create_state_handle<S: StateHandle>(
    py: Python<'_>,
    value: StateOf<S>,
) -> Result<Py<S>, BindingError> {
    Py::new(py, S::wrap(value)).map_err(|e| BindingError::Construction(e.to_string()))
}

/// Allocate an action handle owning `value` and a new reference to `owner`.
///
/// If allocation fails the initializer is dropped, which releases the owner
/// reference taken here.
pub fn create_action_handle<A: ActionHandle>(
    py: Python<'_>,
    owner: &Py<A::Owner>,
    value: ActionOf<A>,
) -> Result<Py<A>, BindingError> {
    let owner = owner.clone_ref(py);
    Py::new(py, A::wrap(owner, value)).map_err(|e| BindingError::Construction(e.to_string()))
}
