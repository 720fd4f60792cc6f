#![allow(dead_code)]

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyModule};

/// The `_core` module, initialized once per process
pub fn core_module(py: Python<'_>) -> Bound<'_, PyModule> {
    pyo3::wrap_pymodule!(engine_python::core_module)(py).into_bound(py)
}

/// Globals with `core` bound to the module and each exported name at top level
pub fn globals<'py>(py: Python<'py>, module: &Bound<'py, PyModule>) -> Bound<'py, PyDict> {
    let globals = PyDict::new_bound(py);
    globals.set_item("core", module).unwrap();
    for (name, value) in module.dict().iter() {
        globals.set_item(name, value).unwrap();
    }
    globals
}

/// Run an indented block of Python, panicking with the traceback on error
pub fn run(py: Python<'_>, globals: &Bound<'_, PyDict>, code: &str) {
    let code = dedent(code);
    if let Err(e) = py.run_bound(&code, Some(globals), None) {
        e.print(py);
        panic!("python block failed:\n{code}");
    }
}

/// Whether numpy can be imported in this interpreter
pub fn has_numpy(py: Python<'_>) -> bool {
    let available = py.import_bound("numpy").is_ok();
    if !available {
        eprintln!("numpy is not importable; skipping");
    }
    available
}

fn dedent(code: &str) -> String {
    let indent = code
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    code.lines()
        .map(|line| line.get(indent..).unwrap_or("").trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}
