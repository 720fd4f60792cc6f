//! Per-game Python classes.
//!
//! PyO3 cannot expose a generic class, so [`bind_game!`](crate::bind_game)
//! stamps out one state class and one action class for a concrete game type.
//! All method bodies live in [`crate::ops`].

use pyo3::prelude::*;
use pyo3::PyTypeInfo;
use tracing::debug;

use crate::handle::{ActionHandle, StateHandle};

/// Generate the state and action classes of a game.
///
/// ```ignore
/// bind_game!(games_connect4::Connect4, Connect4State, Connect4Action);
/// ```
///
/// The state class gets `sample_initial_state`, `from_json`, `from_tensors`,
/// the `has_ended` / `player` / `winner` / `reward` / `actions` getters,
/// `get_tensors`, `to_json` and an `Action` class attribute. The action class
/// gets `sample_next_state`, `state`, `to_json` and `from_json(state, obj)`.
/// Both compare, hash and print by value and refuse direct instantiation.
///
/// Game-specific methods can be added to either class with trailing
/// `state { ... }` and `action { ... }` blocks. Their items are placed in the
/// generated `#[pymethods]` impl and may use `self.value` (and `self.owner`
/// on actions):
///
/// ```ignore
/// bind_game!(games_connect4::Connect4, Connect4State, Connect4Action,
///     action {
///         #[getter]
///         fn column(&self) -> u8 {
///             self.value.column()
///         }
///     }
/// );
/// ```
#[macro_export]
macro_rules! bind_game {
    (
        $game:ty, $state:ident, $action:ident
        $(, state { $($state_extra:tt)* })?
        $(, action { $($action_extra:tt)* })?
        $(,)?
    ) => {
        #[::pyo3::pyclass(frozen, module = "game._core")]
        pub struct $state {
            value: <$game as $crate::engine_core::Game>::State,
        }

        #[::pyo3::pyclass(frozen, module = "game._core")]
        pub struct $action {
            owner: ::pyo3::Py<$state>,
            value: <$game as $crate::engine_core::Game>::Action,
        }

        impl $crate::handle::StateHandle for $state {
            type Game = $game;

            fn wrap(value: <$game as $crate::engine_core::Game>::State) -> Self {
                Self { value }
            }

            fn value(&self) -> &<$game as $crate::engine_core::Game>::State {
                &self.value
            }
        }

        impl $crate::handle::ActionHandle for $action {
            type Owner = $state;

            fn wrap(
                owner: ::pyo3::Py<$state>,
                value: <$game as $crate::engine_core::Game>::Action,
            ) -> Self {
                Self { owner, value }
            }

            fn owner(&self) -> &::pyo3::Py<$state> {
                &self.owner
            }

            fn value(&self) -> &<$game as $crate::engine_core::Game>::Action {
                &self.value
            }
        }

        #[::pyo3::pymethods]
        impl $state {
            #[new]
            #[pyo3(signature = (*_args, **_kwargs))]
            fn __new__(
                _args: &::pyo3::Bound<'_, ::pyo3::types::PyTuple>,
                _kwargs: ::std::option::Option<&::pyo3::Bound<'_, ::pyo3::types::PyDict>>,
            ) -> ::pyo3::PyResult<Self> {
                ::std::result::Result::Err($crate::errors::construction_rejected(
                    ::std::stringify!($state),
                ))
            }

            #[classmethod]
            fn sample_initial_state(
                cls: &::pyo3::Bound<'_, ::pyo3::types::PyType>,
            ) -> ::pyo3::PyResult<::pyo3::Py<Self>> {
                ::std::result::Result::Ok($crate::ops::sample_initial_state::<Self>(cls.py())?)
            }

            #[classmethod]
            fn from_json(
                _cls: &::pyo3::Bound<'_, ::pyo3::types::PyType>,
                obj: &::pyo3::Bound<'_, ::pyo3::PyAny>,
            ) -> ::pyo3::PyResult<::pyo3::Py<Self>> {
                ::std::result::Result::Ok($crate::ops::state_from_json::<Self>(obj)?)
            }

            #[classmethod]
            fn from_tensors(
                _cls: &::pyo3::Bound<'_, ::pyo3::types::PyType>,
                arrays: &::pyo3::Bound<'_, ::pyo3::PyAny>,
            ) -> ::pyo3::PyResult<::pyo3::Py<Self>> {
                ::std::result::Result::Ok($crate::ops::state_from_tensors::<Self>(arrays)?)
            }

            #[classattr]
            #[pyo3(name = "Action")]
            fn action_class(py: ::pyo3::Python<'_>) -> ::pyo3::Py<::pyo3::types::PyType> {
                py.get_type_bound::<$action>().unbind()
            }

            #[getter]
            fn has_ended(&self) -> ::pyo3::PyResult<bool> {
                ::std::result::Result::Ok($crate::ops::has_ended(self)?)
            }

            #[getter]
            fn player(&self) -> ::pyo3::PyResult<::std::option::Option<u8>> {
                ::std::result::Result::Ok($crate::ops::player(self)?)
            }

            #[getter]
            fn winner(&self) -> ::pyo3::PyResult<::std::option::Option<u8>> {
                ::std::result::Result::Ok($crate::ops::winner(self)?)
            }

            #[getter]
            fn reward(
                &self,
                py: ::pyo3::Python<'_>,
            ) -> ::pyo3::PyResult<::pyo3::Py<::pyo3::types::PyTuple>> {
                ::std::result::Result::Ok($crate::ops::reward(py, self)?)
            }

            #[getter]
            fn actions(
                slf: &::pyo3::Bound<'_, Self>,
            ) -> ::pyo3::PyResult<::pyo3::Py<::pyo3::types::PyTuple>> {
                ::std::result::Result::Ok($crate::ops::actions::<Self, $action>(slf)?)
            }

            #[pyo3(signature = (mode = None))]
            fn get_tensors(
                &self,
                py: ::pyo3::Python<'_>,
                mode: ::std::option::Option<&::pyo3::Bound<'_, ::pyo3::PyAny>>,
            ) -> ::pyo3::PyResult<::pyo3::Py<::pyo3::types::PyTuple>> {
                ::std::result::Result::Ok($crate::ops::get_tensors(py, self, mode)?)
            }

            fn to_json(&self, py: ::pyo3::Python<'_>) -> ::pyo3::PyResult<::pyo3::PyObject> {
                ::std::result::Result::Ok($crate::ops::state_to_json(py, self)?)
            }

            fn __richcmp__(
                &self,
                other: &::pyo3::Bound<'_, ::pyo3::PyAny>,
                op: ::pyo3::pyclass::CompareOp,
            ) -> ::pyo3::PyResult<::pyo3::PyObject> {
                ::std::result::Result::Ok($crate::ops::state_richcmp(self, other, op)?)
            }

            fn __hash__(&self) -> ::pyo3::PyResult<isize> {
                ::std::result::Result::Ok($crate::ops::state_hash(self)?)
            }

            fn __repr__(&self) -> ::pyo3::PyResult<::std::string::String> {
                ::std::result::Result::Ok($crate::ops::state_repr(self)?)
            }

            $($($state_extra)*)?
        }

        #[::pyo3::pymethods]
        impl $action {
            #[new]
            #[pyo3(signature = (*_args, **_kwargs))]
            fn __new__(
                _args: &::pyo3::Bound<'_, ::pyo3::types::PyTuple>,
                _kwargs: ::std::option::Option<&::pyo3::Bound<'_, ::pyo3::types::PyDict>>,
            ) -> ::pyo3::PyResult<Self> {
                ::std::result::Result::Err($crate::errors::construction_rejected(
                    ::std::stringify!($action),
                ))
            }

            #[classmethod]
            fn from_json(
                _cls: &::pyo3::Bound<'_, ::pyo3::types::PyType>,
                state: &::pyo3::Bound<'_, ::pyo3::PyAny>,
                obj: &::pyo3::Bound<'_, ::pyo3::PyAny>,
            ) -> ::pyo3::PyResult<::pyo3::Py<Self>> {
                ::std::result::Result::Ok($crate::ops::action_from_json::<Self>(state, obj)?)
            }

            #[getter]
            fn state(&self, py: ::pyo3::Python<'_>) -> ::pyo3::Py<$state> {
                self.owner.clone_ref(py)
            }

            fn sample_next_state(
                &self,
                py: ::pyo3::Python<'_>,
            ) -> ::pyo3::PyResult<::pyo3::Py<$state>> {
                ::std::result::Result::Ok($crate::ops::sample_next_state(py, self)?)
            }

            fn to_json(&self, py: ::pyo3::Python<'_>) -> ::pyo3::PyResult<::pyo3::PyObject> {
                ::std::result::Result::Ok($crate::ops::action_to_json(py, self)?)
            }

            fn __richcmp__(
                &self,
                other: &::pyo3::Bound<'_, ::pyo3::PyAny>,
                op: ::pyo3::pyclass::CompareOp,
            ) -> ::pyo3::PyResult<::pyo3::PyObject> {
                ::std::result::Result::Ok($crate::ops::action_richcmp(self, other, op)?)
            }

            fn __hash__(&self) -> ::pyo3::PyResult<isize> {
                ::std::result::Result::Ok($crate::ops::action_hash(self)?)
            }

            fn __repr__(&self) -> ::pyo3::PyResult<::std::string::String> {
                ::std::result::Result::Ok($crate::ops::action_repr(self)?)
            }

            $($($action_extra)*)?

            fn __traverse__(
                &self,
                visit: ::pyo3::PyVisit<'_>,
            ) -> ::std::result::Result<(), ::pyo3::PyTraverseError> {
                visit.call(&self.owner)
            }
        }
    };
}

/// Add a game's two classes to `module`
pub fn attach_game<S, A>(module: &Bound<'_, PyModule>, env_id: &str) -> PyResult<()>
where
    S: StateHandle,
    A: ActionHandle<Owner = S>,
{
    module.add_class::<S>()?;
    module.add_class::<A>()?;
    debug!(
        env_id,
        state = <S as PyTypeInfo>::NAME,
        action = <A as PyTypeInfo>::NAME,
        "Attached game classes"
    );
    Ok(())
}
