//! Dense row-major tensors with a fixed element table
//!
//! Games describe observations as a tuple of tensors. Each tensor owns a
//! contiguous buffer of one of the supported element types and a shape whose
//! product equals the buffer length.

use std::fmt;

use ndarray::{ArrayD, IxDyn};

/// Element types a tensor may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl DType {
    /// Conventional array-library name for the element type
    pub fn name(self) -> &'static str {
        match self {
            DType::I8 => "int8",
            DType::I16 => "int16",
            DType::I32 => "int32",
            DType::I64 => "int64",
            DType::U8 => "uint8",
            DType::U16 => "uint16",
            DType::U32 => "uint32",
            DType::U64 => "uint64",
            DType::F32 => "float32",
            DType::F64 => "float64",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error type for shape and element-type validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    #[error("Buffer length {actual} does not match shape {shape:?} (expected {expected})")]
    LengthMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    #[error("Rank mismatch: expected {expected} dimensions but got {actual}")]
    RankMismatch { expected: usize, actual: usize },
    #[error("Extent mismatch on axis {axis}: expected {expected} but got {actual}")]
    ExtentMismatch {
        axis: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Element type mismatch: expected {expected} but got {found}")]
    DTypeMismatch { expected: String, found: String },
    #[error("Array is not C-contiguous")]
    NotContiguous,
    #[error("Array cannot be read: {0}")]
    Unreadable(String),
    #[error("Expected {expected} tensors but got {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

mod sealed {
    pub trait Sealed {}
}

/// Scalar types that may be stored in a [`Tensor`]
///
/// Sealed: the element table is fixed.
pub trait Element:
    sealed::Sealed + Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static
{
    const DTYPE: DType;

    fn into_value(tensor: Tensor<Self>) -> TensorValue;

    fn from_value(value: &TensorValue) -> Option<&Tensor<Self>>;
}

/// Owned dense tensor in row-major order
///
/// Always held in standard layout, so iteration order is row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T: Element> {
    array: ArrayD<T>,
}

impl<T: Element> Tensor<T> {
    /// Wrap a buffer, checking that its length matches the shape
    pub fn new(shape: Vec<usize>, data: Vec<T>) -> Result<Self, ShapeError> {
        let actual = data.len();
        ArrayD::from_shape_vec(IxDyn(&shape), data)
            .map(|array| Self { array })
            .map_err(|_| ShapeError::LengthMismatch {
                expected: shape.iter().product(),
                shape,
                actual,
            })
    }

    pub fn zeros(shape: Vec<usize>) -> Self {
        Self {
            array: ArrayD::from_elem(IxDyn(&shape), T::default()),
        }
    }

    /// Take ownership of an array, copying it into standard layout if needed
    pub fn from_array(array: ArrayD<T>) -> Self {
        let array = if array.is_standard_layout() {
            array
        } else {
            array.as_standard_layout().into_owned()
        };
        Self { array }
    }

    pub fn shape(&self) -> &[usize] {
        self.array.shape()
    }

    pub fn ndim(&self) -> usize {
        self.array.ndim()
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    pub fn array(&self) -> &ArrayD<T> {
        &self.array
    }

    pub fn array_mut(&mut self) -> &mut ArrayD<T> {
        &mut self.array
    }

    pub fn into_array(self) -> ArrayD<T> {
        self.array
    }

    pub fn get(&self, index: &[usize]) -> Option<T> {
        self.array.get(index).copied()
    }

    /// Elements in row-major order
    pub fn to_vec(&self) -> Vec<T> {
        self.array.iter().copied().collect()
    }
}

impl<T: Element> From<ArrayD<T>> for Tensor<T> {
    fn from(array: ArrayD<T>) -> Self {
        Self::from_array(array)
    }
}

/// A tensor of any supported element type
#[derive(Debug, Clone, PartialEq)]
pub enum TensorValue {
    I8(Tensor<i8>),
    I16(Tensor<i16>),
    I32(Tensor<i32>),
    I64(Tensor<i64>),
    U8(Tensor<u8>),
    U16(Tensor<u16>),
    U32(Tensor<u32>),
    U64(Tensor<u64>),
    F32(Tensor<f32>),
    F64(Tensor<f64>),
}

macro_rules! element_table {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl Element for $t {
                const DTYPE: DType = DType::$variant;

                fn into_value(tensor: Tensor<Self>) -> TensorValue {
                    TensorValue::$variant(tensor)
                }

                fn from_value(value: &TensorValue) -> Option<&Tensor<Self>> {
                    match value {
                        TensorValue::$variant(t) => Some(t),
                        _ => None,
                    }
                }
            }
        )*

        impl TensorValue {
            pub fn dtype(&self) -> DType {
                match self {
                    $(TensorValue::$variant(_) => DType::$variant,)*
                }
            }

            pub fn shape(&self) -> &[usize] {
                match self {
                    $(TensorValue::$variant(t) => t.shape(),)*
                }
            }
        }
    };
}

element_table! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl TensorValue {
    /// Borrow the tensor if it holds elements of type `T`
    pub fn as_tensor<T: Element>(&self) -> Option<&Tensor<T>> {
        T::from_value(self)
    }

    /// Borrow the tensor as `T`, checking element type and shape
    pub fn expect_tensor<T: Element>(&self, spec: &ShapeSpec) -> Result<&Tensor<T>, ShapeError> {
        let tensor = self
            .as_tensor::<T>()
            .ok_or_else(|| ShapeError::DTypeMismatch {
                expected: T::DTYPE.to_string(),
                found: self.dtype().to_string(),
            })?;
        spec.check(tensor.shape())?;
        Ok(tensor)
    }
}

impl<T: Element> From<Tensor<T>> for TensorValue {
    fn from(tensor: Tensor<T>) -> Self {
        T::into_value(tensor)
    }
}

/// Extent constraint for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dim {
    Fixed(usize),
    Any,
}

/// Static shape constraints of a tensor target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeSpec {
    dims: Vec<Dim>,
}

impl ShapeSpec {
    pub fn new(dims: Vec<Dim>) -> Self {
        Self { dims }
    }

    /// Every extent fixed
    pub fn fixed(extents: &[usize]) -> Self {
        Self::new(extents.iter().map(|&n| Dim::Fixed(n)).collect())
    }

    /// Rank fixed, extents free
    pub fn rank(rank: usize) -> Self {
        Self::new(vec![Dim::Any; rank])
    }

    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    pub fn check(&self, shape: &[usize]) -> Result<(), ShapeError> {
        if shape.len() != self.dims.len() {
            return Err(ShapeError::RankMismatch {
                expected: self.dims.len(),
                actual: shape.len(),
            });
        }
        for (axis, (dim, &actual)) in self.dims.iter().zip(shape).enumerate() {
            if let Dim::Fixed(expected) = *dim {
                if expected != actual {
                    return Err(ShapeError::ExtentMismatch {
                        axis,
                        expected,
                        actual,
                    });
                }
            }
        }
        Ok(())
    }
}
