//! Tensor storage with explicit element kinds.

use half::{bf16, f16};

/// Element kind of a tensor, as a closed set.
///
/// Only the three float kinds are eligible for the smoothstep transform;
/// anything else is carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    F32,
    F16,
    BF16,
    Other,
}

impl ElementKind {
    /// Whether tensors of this kind can be transformed.
    pub fn is_transformable(&self) -> bool {
        matches!(self, ElementKind::F32 | ElementKind::F16 | ElementKind::BF16)
    }
}

/// Tensor storage, one variant per element kind.
///
/// The `Other` arm keeps raw little-endian bytes so non-float tensors
/// survive a load/transform/save round trip byte-identically.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    F32(Vec<f32>),
    F16(Vec<f16>),
    BF16(Vec<bf16>),
    Other { kind: String, bytes: Vec<u8> },
}

impl TensorData {
    pub fn kind(&self) -> ElementKind {
        match self {
            TensorData::F32(_) => ElementKind::F32,
            TensorData::F16(_) => ElementKind::F16,
            TensorData::BF16(_) => ElementKind::BF16,
            TensorData::Other { .. } => ElementKind::Other,
        }
    }

    /// Number of stored elements, if the kind has a known element layout.
    fn len(&self) -> Option<usize> {
        match self {
            TensorData::F32(v) => Some(v.len()),
            TensorData::F16(v) => Some(v.len()),
            TensorData::BF16(v) => Some(v.len()),
            TensorData::Other { .. } => None,
        }
    }
}

/// Multi-dimensional weight tensor with a fixed shape and element kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: TensorData,
}

impl Tensor {
    /// Create a tensor from shape and storage.
    ///
    /// # Panics
    /// Panics if the storage length doesn't match the shape's element count
    /// (not checked for `Other` storage, whose element size is opaque).
    pub fn new(shape: Vec<usize>, data: TensorData) -> Self {
        if let Some(len) = data.len() {
            let expected: usize = shape.iter().product();
            assert_eq!(
                len, expected,
                "Storage length mismatch: shape {:?} needs {} elements, got {}",
                shape, expected, len
            );
        }
        Self { shape, data }
    }

    /// Convenience constructor for f32 tensors.
    pub fn from_f32(shape: Vec<usize>, values: Vec<f32>) -> Self {
        Self::new(shape, TensorData::F32(values))
    }

    /// Convenience constructor for f16 tensors.
    pub fn from_f16(shape: Vec<usize>, values: Vec<f16>) -> Self {
        Self::new(shape, TensorData::F16(values))
    }

    /// Convenience constructor for bf16 tensors.
    pub fn from_bf16(shape: Vec<usize>, values: Vec<bf16>) -> Self {
        Self::new(shape, TensorData::BF16(values))
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn element_count(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    pub fn data(&self) -> &TensorData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut TensorData {
        &mut self.data
    }

    /// Widen float storage to f32 values. Returns `None` for `Other` kinds.
    pub fn to_f32_vec(&self) -> Option<Vec<f32>> {
        match &self.data {
            TensorData::F32(v) => Some(v.clone()),
            TensorData::F16(v) => Some(v.iter().map(|x| x.to_f32()).collect()),
            TensorData::BF16(v) => Some(v.iter().map(|x| x.to_f32()).collect()),
            TensorData::Other { .. } => None,
        }
    }
}
