//! Generic bodies of every handle method.
//!
//! The classes produced by [`bind_game!`](crate::bind_game) forward here, so
//! the binding logic exists once for all games. Rule evaluation that may take
//! unbounded time runs through [`run_unlocked`]; accessors, comparison,
//! hashing and serialization keep the lock.

use engine_core::{project_hash, ExchangeValue, Game, Relation, TensorValue};
use numpy::PyUntypedArray;
use pyo3::prelude::*;
use pyo3::pyclass::CompareOp;
use pyo3::types::PyTuple;
use pyo3::PyTypeInfo;

use crate::errors::BindingError;
use crate::exchange::{from_host, to_host};
use crate::handle::{create_action_handle, create_state_handle, ActionHandle, StateHandle};
use crate::tensor::{from_tensor_value, tensor_value_from_array};
use crate::unlock::{run_locked, run_unlocked};

/// Game of an action handle
type GameOf<A> = <<A as ActionHandle>::Owner as StateHandle>::Game;

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

pub fn sample_initial_state<S: StateHandle>(py: Python<'_>) -> Result<Py<S>, BindingError> {
    let value = run_unlocked(py, || {
        let mut state = <S::Game as Game>::State::default();
        <S::Game as Game>::initialize(&mut state)?;
        Ok(state)
    })?;
    create_state_handle(py, value)
}

pub fn has_ended<S: StateHandle>(state: &S) -> Result<bool, BindingError> {
    run_locked(|| Ok(<S::Game as Game>::has_ended(state.value())))
}

pub fn player<S: StateHandle>(state: &S) -> Result<Option<u8>, BindingError> {
    run_locked(|| Ok(<S::Game as Game>::player(state.value())))
}

pub fn winner<S: StateHandle>(state: &S) -> Result<Option<u8>, BindingError> {
    run_locked(|| Ok(<S::Game as Game>::winner(state.value())))
}

pub fn reward<S: StateHandle>(py: Python<'_>, state: &S) -> Result<Py<PyTuple>, BindingError> {
    let reward = run_locked(|| Ok(<S::Game as Game>::reward(state.value())))?;
    Ok(PyTuple::new_bound(py, reward).unbind())
}

/// Legal actions as a tuple of handles, each holding a reference to `state`
pub fn actions<S, A>(state: &Bound<'_, S>) -> Result<Py<PyTuple>, BindingError>
where
    S: StateHandle,
    A: ActionHandle<Owner = S>,
{
    let py = state.py();
    let value = state.get().value();
    let values = run_unlocked(py, || {
        let mut out = Vec::new();
        <S::Game as Game>::actions(value, &mut out)?;
        Ok(out)
    })?;

    let owner = state.clone().unbind();
    let handles = values
        .into_iter()
        .map(|action| create_action_handle::<A>(py, &owner, action))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PyTuple::new_bound(py, handles).unbind())
}

/// Tensors of `state` in `mode`, which must be a string or None
pub fn get_tensors<S: StateHandle>(
    py: Python<'_>,
    state: &S,
    mode: Option<&Bound<'_, PyAny>>,
) -> Result<Py<PyTuple>, BindingError> {
    let mode = match mode {
        Some(mode) if !mode.is_none() => Some(mode.extract::<String>().map_err(|_| {
            BindingError::Argument(format!("mode must be a string, not {}", type_name(mode)))
        })?),
        _ => None,
    };
    let value = state.value();
    let tensors = run_unlocked(py, || {
        Ok(<S::Game as Game>::tensors(value, mode.as_deref())?)
    })?;

    let arrays = tensors
        .iter()
        .map(|tensor| from_tensor_value(py, tensor))
        .collect::<PyResult<Vec<_>>>()?;
    Ok(PyTuple::new_bound(py, arrays).unbind())
}

/// Build a state from a sequence of arrays, or from a single array
pub fn state_from_tensors<S: StateHandle>(
    arrays: &Bound<'_, PyAny>,
) -> Result<Py<S>, BindingError> {
    let py = arrays.py();
    let tensors = if arrays.downcast::<PyUntypedArray>().is_ok() {
        vec![tensor_value_from_array(arrays)?]
    } else {
        arrays
            .iter()
            .map_err(|_| {
                BindingError::Argument(format!(
                    "expected an array or a sequence of arrays, not {}",
                    type_name(arrays)
                ))
            })?
            .map(|item| -> Result<TensorValue, BindingError> {
                Ok(tensor_value_from_array(&item?)?)
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    let value = run_unlocked(py, || {
        let mut state = <S::Game as Game>::State::default();
        <S::Game as Game>::state_from_tensors(&mut state, &tensors)?;
        Ok(state)
    })?;
    create_state_handle(py, value)
}

pub fn state_to_json<S: StateHandle>(py: Python<'_>, state: &S) -> Result<PyObject, BindingError> {
    let value = run_locked(|| Ok(<S::Game as Game>::state_to_json(state.value())?))?;
    Ok(to_host(py, &value)?)
}

pub fn state_from_json<S: StateHandle>(obj: &Bound<'_, PyAny>) -> Result<Py<S>, BindingError> {
    let value = from_host(obj)?;
    let state = run_locked(|| {
        let mut state = <S::Game as Game>::State::default();
        <S::Game as Game>::state_from_json(&mut state, &value)?;
        Ok(state)
    })?;
    create_state_handle(obj.py(), state)
}

pub fn state_richcmp<S: StateHandle>(
    state: &S,
    other: &Bound<'_, PyAny>,
    op: CompareOp,
) -> Result<PyObject, BindingError> {
    let py = other.py();
    let Ok(other) = other.downcast::<S>() else {
        return Ok(py.NotImplemented());
    };
    let ordering = run_locked(|| {
        Ok(<S::Game as Game>::compare_states(
            state.value(),
            other.get().value(),
        ))
    })?;
    Ok(relation(op).holds(ordering).into_py(py))
}

pub fn state_hash<S: StateHandle>(state: &S) -> Result<isize, BindingError> {
    run_locked(|| Ok(project_hash(<S::Game as Game>::hash_state(state.value()))))
}

pub fn state_repr<S: StateHandle>(state: &S) -> Result<String, BindingError> {
    let body = run_locked(|| {
        Ok(<S::Game as Game>::state_to_json(state.value())
            .ok()
            .and_then(|value| value.to_json_string().ok())
            .unwrap_or_else(|| format!("{:?}", state.value())))
    })?;
    Ok(format!("{}({body})", <S as PyTypeInfo>::NAME))
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Apply `action` to a copy of its owning state
pub fn sample_next_state<A: ActionHandle>(
    py: Python<'_>,
    action: &A,
) -> Result<Py<A::Owner>, BindingError> {
    let owner = action.owner().get().value();
    let value = action.value();
    let next = run_unlocked(py, || {
        let mut next = owner.clone();
        <GameOf<A> as Game>::apply(&mut next, value)?;
        Ok(next)
    })?;
    create_state_handle(py, next)
}

pub fn action_to_json<A: ActionHandle>(
    py: Python<'_>,
    action: &A,
) -> Result<PyObject, BindingError> {
    let value = run_locked(|| {
        Ok(<GameOf<A> as Game>::action_to_json(
            action.owner().get().value(),
            action.value(),
        )?)
    })?;
    Ok(to_host(py, &value)?)
}

/// Decode an action relative to `state`, which becomes its owner
pub fn action_from_json<A: ActionHandle>(
    state: &Bound<'_, PyAny>,
    obj: &Bound<'_, PyAny>,
) -> Result<Py<A>, BindingError> {
    let state = state.downcast::<A::Owner>().map_err(|_| {
        BindingError::Argument(format!(
            "expected a {} but got {}",
            <A::Owner as PyTypeInfo>::NAME,
            type_name(state)
        ))
    })?;
    let exchange: ExchangeValue = from_host(obj)?;
    action_from_exchange::<A>(state, &exchange)
}

/// Decode an already converted action value relative to `state`
pub fn action_from_exchange<A: ActionHandle>(
    state: &Bound<'_, A::Owner>,
    exchange: &ExchangeValue,
) -> Result<Py<A>, BindingError> {
    let owner = state.get().value();
    let value = run_locked(|| {
        let mut action = <GameOf<A> as Game>::Action::default();
        <GameOf<A> as Game>::action_from_json(owner, &mut action, exchange)?;
        Ok(action)
    })?;
    create_action_handle::<A>(state.py(), &state.clone().unbind(), value)
}

pub fn action_richcmp<A: ActionHandle>(
    action: &A,
    other: &Bound<'_, PyAny>,
    op: CompareOp,
) -> Result<PyObject, BindingError> {
    let py = other.py();
    let Ok(other) = other.downcast::<A>() else {
        return Ok(py.NotImplemented());
    };
    let other = other.get();
    let ordering = run_locked(|| {
        Ok(<GameOf<A> as Game>::compare_actions(
            action.owner().get().value(),
            action.value(),
            other.owner().get().value(),
            other.value(),
        ))
    })?;
    Ok(relation(op).holds(ordering).into_py(py))
}

pub fn action_hash<A: ActionHandle>(action: &A) -> Result<isize, BindingError> {
    run_locked(|| {
        Ok(project_hash(<GameOf<A> as Game>::hash_action(
            action.owner().get().value(),
            action.value(),
        )))
    })
}

pub fn action_repr<A: ActionHandle>(action: &A) -> Result<String, BindingError> {
    let body = run_locked(|| {
        Ok(
            <GameOf<A> as Game>::action_to_json(action.owner().get().value(), action.value())
                .ok()
                .and_then(|value| value.to_json_string().ok())
                .unwrap_or_else(|| format!("{:?}", action.value())),
        )
    })?;
    Ok(format!("{}({body})", <A as PyTypeInfo>::NAME))
}

fn type_name(obj: &Bound<'_, PyAny>) -> String {
    obj.get_type()
        .name()
        .map(|name| name.to_string())
        .unwrap_or_else(|_| "object".to_string())
}

fn relation(op: CompareOp) -> Relation {
    match op {
        CompareOp::Lt => Relation::Lt,
        CompareOp::Le => Relation::Le,
        CompareOp::Eq => Relation::Eq,
        CompareOp::Ne => Relation::Ne,
        CompareOp::Gt => Relation::Gt,
        CompareOp::Ge => Relation::Ge,
    }
}
