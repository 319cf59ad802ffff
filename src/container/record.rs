//! Typed records
//!
//! Element types stored in container arrays and the materialized record
//! returned by a single-record read.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Element type of a named array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DType {
    U8,
    I32,
    I64,
    F32,
    F64,
}

impl DType {
    /// Size of one element in bytes
    pub fn size(&self) -> usize {
        match self {
            DType::U8 => 1,
            DType::I32 | DType::F32 => 4,
            DType::I64 | DType::F64 => 8,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DType::U8 => "u8",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::F32 => "f32",
            DType::F64 => "f64",
        }
    }
}

/// A scalar type that can be stored in a container array (little-endian)
pub trait Element: Copy + Sized {
    const DTYPE: DType;

    fn write_le(&self, out: &mut Vec<u8>);

    /// `bytes.len()` must equal `DTYPE.size()`
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_element {
    ($ty:ty, $dtype:expr) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            fn write_le(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                <$ty>::from_le_bytes(raw)
            }
        }
    };
}

impl_element!(u8, DType::U8);
impl_element!(i32, DType::I32);
impl_element!(i64, DType::I64);
impl_element!(f32, DType::F32);
impl_element!(f64, DType::F64);

/// One record read from a named array, fully materialized in memory
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    dtype: DType,
    shape: Vec<usize>,
    data: Bytes,
}

impl Record {
    pub(crate) fn new(dtype: DType, shape: Vec<usize>, data: Bytes) -> Self {
        debug_assert_eq!(data.len(), dtype.size() * shape.iter().product::<usize>());
        Self { dtype, shape, data }
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Per-record shape; empty for scalar records
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of elements in the record
    pub fn len(&self) -> usize {
        self.data.len() / self.dtype.size()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw little-endian bytes
    pub fn as_bytes(&self) -> &Bytes {
        &self.data
    }

    /// Decode the elements, or None if `T` does not match the stored dtype
    pub fn to_vec<T: Element>(&self) -> Option<Vec<T>> {
        if T::DTYPE != self.dtype {
            return None;
        }
        Some(
            self.data
                .chunks_exact(self.dtype.size())
                .map(T::read_le)
                .collect(),
        )
    }

    /// First element of a scalar record
    pub fn scalar<T: Element>(&self) -> Option<T> {
        if T::DTYPE != self.dtype || self.data.len() < self.dtype.size() {
            return None;
        }
        Some(T::read_le(&self.data[..self.dtype.size()]))
    }
}
