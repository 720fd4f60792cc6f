//! Conversion between [`ExchangeValue`] and plain Python objects.
//!
//! | ExchangeValue | Python |
//! |---|---|
//! | `Null` | `None` |
//! | `Bool` | `bool` |
//! | `Int` / `UInt` | `int` |
//! | `Float` | `float` |
//! | `String` | `str` |
//! | `Array` | `list` (decoding also takes `tuple`) |
//! | `Object` | `dict` with `str` keys |

use engine_core::{DecodeError, ExchangeMap, ExchangeValue};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyInt, PyList, PyString, PyTuple};

use crate::errors::BindingError;
use crate::settings::settings;

/// Build the Python object for an exchange value
pub fn to_host(py: Python<'_>, value: &ExchangeValue) -> PyResult<PyObject> {
    Ok(match value {
        ExchangeValue::Null => py.None(),
        ExchangeValue::Bool(b) => b.to_object(py),
        ExchangeValue::Int(i) => i.to_object(py),
        ExchangeValue::UInt(u) => u.to_object(py),
        ExchangeValue::Float(f) => f.to_object(py),
        ExchangeValue::String(s) => s.to_object(py),
        ExchangeValue::Array(items) => {
            let list = PyList::empty_bound(py);
            for item in items {
                list.append(to_host(py, item)?)?;
            }
            list.into_any().unbind()
        }
        ExchangeValue::Object(map) => {
            let dict = PyDict::new_bound(py);
            for (key, item) in map.iter() {
                dict.set_item(key, to_host(py, item)?)?;
            }
            dict.into_any().unbind()
        }
    })
}

/// Read a Python object into an exchange value
pub fn from_host(obj: &Bound<'_, PyAny>) -> Result<ExchangeValue, BindingError> {
    let max_depth = settings().binding.max_decode_depth;
    Ok(decode(obj, max_depth)?)
}

/// A container whose children are still being decoded
enum Frame<'py> {
    Array {
        items: std::vec::IntoIter<Bound<'py, PyAny>>,
        out: Vec<ExchangeValue>,
    },
    Object {
        entries: std::vec::IntoIter<(String, Bound<'py, PyAny>)>,
        key: String,
        out: ExchangeMap,
    },
}

impl<'py> Frame<'py> {
    fn next_child(&mut self) -> Option<Bound<'py, PyAny>> {
        match self {
            Frame::Array { items, .. } => items.next(),
            Frame::Object { entries, key, .. } => {
                let (next_key, item) = entries.next()?;
                *key = next_key;
                Some(item)
            }
        }
    }

    fn push(&mut self, value: ExchangeValue) -> Result<(), DecodeError> {
        match self {
            Frame::Array { out, .. } => {
                out.push(value);
                Ok(())
            }
            Frame::Object { key, out, .. } => out.insert_unique(std::mem::take(key), value),
        }
    }

    /// Prefix `err` with the position of the child being decoded
    fn locate(&self, err: DecodeError) -> DecodeError {
        match self {
            Frame::Array { out, .. } => err.at_index(out.len()),
            Frame::Object { key, .. } => err.at_field(key),
        }
    }

    fn finish(self) -> ExchangeValue {
        match self {
            Frame::Array { out, .. } => ExchangeValue::Array(out),
            Frame::Object { out, .. } => ExchangeValue::Object(out),
        }
    }
}

enum Node<'py> {
    Leaf(ExchangeValue),
    Container(Frame<'py>),
}

/// Decode with an explicit stack of open containers; native stack use does
/// not grow with nesting.
fn decode(root: &Bound<'_, PyAny>, max_depth: usize) -> Result<ExchangeValue, DecodeError> {
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut next = root.clone();
    loop {
        let mut value = match open(&next, stack.len(), max_depth) {
            Ok(Node::Leaf(value)) => value,
            Ok(Node::Container(mut frame)) => match frame.next_child() {
                Some(child) => {
                    stack.push(frame);
                    next = child;
                    continue;
                }
                None => frame.finish(),
            },
            Err(e) => return Err(locate(e, &stack)),
        };

        // Hand the value up, closing every container it completes
        loop {
            let Some(mut parent) = stack.pop() else {
                return Ok(value);
            };
            if let Err(e) = parent.push(value) {
                return Err(locate(e, &stack));
            }
            match parent.next_child() {
                Some(child) => {
                    stack.push(parent);
                    next = child;
                    break;
                }
                None => value = parent.finish(),
            }
        }
    }
}

fn locate(err: DecodeError, stack: &[Frame<'_>]) -> DecodeError {
    stack.iter().rev().fold(err, |err, frame| frame.locate(err))
}

/// Classify one object found at nesting `level`
fn open<'py>(
    obj: &Bound<'py, PyAny>,
    level: usize,
    max_depth: usize,
) -> Result<Node<'py>, DecodeError> {
    if obj.is_none() {
        return Ok(Node::Leaf(ExchangeValue::Null));
    }
    // bool is a subclass of int
    if let Ok(b) = obj.downcast::<PyBool>() {
        return Ok(Node::Leaf(ExchangeValue::Bool(b.is_true())));
    }
    if obj.is_instance_of::<PyInt>() {
        if let Ok(i) = obj.extract::<i64>() {
            return Ok(Node::Leaf(ExchangeValue::Int(i)));
        }
        if let Ok(u) = obj.extract::<u64>() {
            return Ok(Node::Leaf(ExchangeValue::UInt(u)));
        }
        return Err(DecodeError::OutOfRange {
            value: obj.to_string(),
            target: "64-bit integer",
        });
    }
    if let Ok(f) = obj.downcast::<PyFloat>() {
        return Ok(Node::Leaf(ExchangeValue::Float(f.value())));
    }
    if let Ok(s) = obj.downcast::<PyString>() {
        return s
            .to_str()
            .map(|s| Node::Leaf(ExchangeValue::String(s.to_owned())))
            .map_err(|_| DecodeError::InvalidValue("string is not valid UTF-8".to_string()));
    }

    let is_container = obj.is_instance_of::<PyList>()
        || obj.is_instance_of::<PyTuple>()
        || obj.is_instance_of::<PyDict>();
    if is_container && level >= max_depth {
        return Err(DecodeError::InvalidValue(format!(
            "nesting deeper than {max_depth} levels"
        )));
    }

    if let Ok(list) = obj.downcast::<PyList>() {
        return Ok(array_frame(list.iter().collect()));
    }
    if let Ok(tuple) = obj.downcast::<PyTuple>() {
        return Ok(array_frame(tuple.iter().collect()));
    }
    if let Ok(dict) = obj.downcast::<PyDict>() {
        let entries = dict
            .iter()
            .map(|(key, item)| {
                let key = key
                    .downcast::<PyString>()
                    .map_err(|_| DecodeError::InvalidKey(key.to_string()))?
                    .to_str()
                    .map_err(|_| DecodeError::InvalidKey("key is not valid UTF-8".to_string()))?
                    .to_owned();
                Ok((key, item))
            })
            .collect::<Result<Vec<_>, DecodeError>>()?;
        return Ok(Node::Container(Frame::Object {
            out: ExchangeMap::with_capacity(entries.len()),
            entries: entries.into_iter(),
            key: String::new(),
        }));
    }

    let found = obj
        .get_type()
        .name()
        .map(|name| name.to_string())
        .unwrap_or_else(|_| "object".to_string());
    Err(DecodeError::TypeMismatch {
        expected: "None, bool, int, float, str, list or dict",
        found,
    })
}

fn array_frame(items: Vec<Bound<'_, PyAny>>) -> Node<'_> {
    Node::Container(Frame::Array {
        out: Vec::with_capacity(items.len()),
        items: items.into_iter(),
    })
}
