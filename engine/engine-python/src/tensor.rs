//! Copying tensors to and from numpy arrays.
//!
//! Arrays never alias native buffers: every conversion allocates and copies.

use engine_core::{Element, ShapeError, ShapeSpec, Tensor, TensorValue};
use numpy::{
    dtype_bound, Element as NumpyElement, PyArrayDescrMethods, PyArrayDyn, PyArrayMethods,
    PyUntypedArray, PyUntypedArrayMethods, ToPyArray,
};
use pyo3::prelude::*;

/// Copy a native tensor into a new numpy array of the same dtype and shape
pub fn from_tensor<'py, T>(py: Python<'py>, tensor: &Tensor<T>) -> PyResult<Bound<'py, PyAny>>
where
    T: Element + NumpyElement,
{
    Ok(tensor.array().to_pyarray_bound(py).into_any())
}

pub fn from_tensor_value<'py>(py: Python<'py>, value: &TensorValue) -> PyResult<Bound<'py, PyAny>> {
    match value {
        TensorValue::I8(t) => from_tensor(py, t),
        TensorValue::I16(t) => from_tensor(py, t),
        TensorValue::I32(t) => from_tensor(py, t),
        TensorValue::I64(t) => from_tensor(py, t),
        TensorValue::U8(t) => from_tensor(py, t),
        TensorValue::U16(t) => from_tensor(py, t),
        TensorValue::U32(t) => from_tensor(py, t),
        TensorValue::U64(t) => from_tensor(py, t),
        TensorValue::F32(t) => from_tensor(py, t),
        TensorValue::F64(t) => from_tensor(py, t),
    }
}

/// Copy a numpy array into a native tensor.
///
/// The array must hold `T` elements, be C-contiguous and satisfy `spec`.
pub fn to_tensor<T>(array: &Bound<'_, PyAny>, spec: &ShapeSpec) -> Result<Tensor<T>, ShapeError>
where
    T: Element + NumpyElement,
{
    let untyped = as_untyped(array)?;
    let typed = array
        .downcast::<PyArrayDyn<T>>()
        .map_err(|_| ShapeError::DTypeMismatch {
            expected: T::DTYPE.to_string(),
            found: untyped.dtype().to_string(),
        })?;
    if !typed.is_c_contiguous() {
        return Err(ShapeError::NotContiguous);
    }

    spec.check(typed.shape())?;
    let readonly = typed
        .try_readonly()
        .map_err(|e| ShapeError::Unreadable(e.to_string()))?;
    Ok(Tensor::from_array(readonly.as_array().to_owned()))
}

/// Copy a numpy array of any supported dtype, keeping its shape
pub fn tensor_value_from_array(array: &Bound<'_, PyAny>) -> Result<TensorValue, ShapeError> {
    let untyped = as_untyped(array)?;
    let py = array.py();
    let dtype = untyped.dtype();
    let spec = ShapeSpec::rank(untyped.ndim());

    macro_rules! dispatch {
        ($($t:ty),*) => {
            $(
                if dtype.is_equiv_to(&dtype_bound::<$t>(py)) {
                    return to_tensor::<$t>(array, &spec).map(TensorValue::from);
                }
            )*
        };
    }
    dispatch!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

    Err(ShapeError::DTypeMismatch {
        expected: "a numeric dtype".to_string(),
        found: dtype.to_string(),
    })
}

fn as_untyped<'a, 'py>(
    array: &'a Bound<'py, PyAny>,
) -> Result<&'a Bound<'py, PyUntypedArray>, ShapeError> {
    array
        .downcast::<PyUntypedArray>()
        .map_err(|_| ShapeError::DTypeMismatch {
            expected: "numpy.ndarray".to_string(),
            found: array
                .get_type()
                .name()
                .map(|name| name.to_string())
                .unwrap_or_else(|_| "object".to_string()),
        })
}
