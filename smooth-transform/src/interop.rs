//! Candle tensor interop for host applications.
//!
//! Hosts that run inference with candle can hand weights in and out through
//! these conversions. Only the three transformable float kinds cross the
//! seam; opaque passthrough tensors are rejected.

use candle_core::{DType, Device, Result, Tensor as CandleTensor};
use half::{bf16, f16};

use crate::tensor::{Tensor, TensorData};

impl Tensor {
    /// Convert to a candle tensor on the given device, preserving kind.
    pub fn to_candle(&self, device: &Device) -> Result<CandleTensor> {
        let shape = self.shape().to_vec();
        match self.data() {
            TensorData::F32(values) => CandleTensor::from_vec(values.clone(), shape, device),
            TensorData::F16(values) => CandleTensor::from_vec(values.clone(), shape, device),
            TensorData::BF16(values) => CandleTensor::from_vec(values.clone(), shape, device),
            TensorData::Other { kind, .. } => {
                candle_core::bail!("unsupported element kind for candle export: {kind}")
            }
        }
    }

    /// Build a tensor from a candle tensor (f32/f16/bf16 only).
    pub fn from_candle(tensor: &CandleTensor) -> Result<Self> {
        let shape = tensor.dims().to_vec();
        let flat = tensor.flatten_all()?;
        let data = match tensor.dtype() {
            DType::F32 => TensorData::F32(flat.to_vec1::<f32>()?),
            DType::F16 => TensorData::F16(flat.to_vec1::<f16>()?),
            DType::BF16 => TensorData::BF16(flat.to_vec1::<bf16>()?),
            other => candle_core::bail!("unsupported candle dtype: {other:?}"),
        };
        Ok(Tensor::new(shape, data))
    }
}
