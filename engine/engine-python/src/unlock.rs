//! Running native game code with the interpreter lock released.
//!
//! `allow_threads` reacquires the lock on every exit path, including unwinds.
//! Panics are caught inside that scope and surface as
//! [`BindingError::Computation`] so no unwind reaches the interpreter.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use pyo3::Python;

use crate::errors::BindingError;
use crate::settings::settings;

/// Run `f` without holding the interpreter lock.
///
/// The release is skipped when `binding.release_lock` is off.
pub fn run_unlocked<T, F>(py: Python<'_>, f: F) -> Result<T, BindingError>
where
    F: FnOnce() -> Result<T, BindingError> + Send,
    T: Send,
{
    if settings().binding.release_lock {
        py.allow_threads(|| catch_panic(f))
    } else {
        catch_panic(f)
    }
}

/// Run `f` while holding the lock, still translating panics
pub fn run_locked<T, F>(f: F) -> Result<T, BindingError>
where
    F: FnOnce() -> Result<T, BindingError>,
{
    catch_panic(f)
}

fn catch_panic<T, F>(f: F) -> Result<T, BindingError>
where
    F: FnOnce() -> Result<T, BindingError>,
{
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(BindingError::Computation(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "native code panicked".to_string()
    }
}
