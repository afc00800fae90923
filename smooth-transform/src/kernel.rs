//! Per-tensor smoothstep kernel.
//!
//! All arithmetic runs in f32; half-precision tensors are widened to an f32
//! scratch buffer and narrowed back to their native kind afterwards, so the
//! cubic term never executes in reduced precision.

use half::{bf16, f16};

use crate::tensor::{Tensor, TensorData};
use crate::transformer::TransformParams;

/// Added to the normalization span so the divide stays finite; makes the map
/// not perfectly invertible at the maximum, which is accepted.
pub(crate) const NORM_EPSILON: f32 = 1e-7;

/// What the kernel did with one tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelOutcome {
    /// Values were rewritten in place.
    Transformed,
    /// Constant or empty tensor; normalization is undefined, left unchanged.
    Degenerate,
    /// Non-float element kind, left unchanged.
    SkippedKind,
}

/// Smoothstep curve on [0, 1].
#[inline]
pub fn smooth_step(x: f32) -> f32 {
    3.0 * x * x - 2.0 * x * x * x
}

/// Transform one tensor in place.
///
/// Pure function of the tensor's values and the two scalar parameters;
/// shape and element kind are never changed.
pub fn transform_tensor(tensor: &mut Tensor, params: &TransformParams) -> KernelOutcome {
    match tensor.data_mut() {
        TensorData::F32(values) => transform_values(values, params),
        TensorData::F16(values) => {
            transform_widened(values, params, |v| v.to_f32(), f16::from_f32)
        }
        TensorData::BF16(values) => {
            transform_widened(values, params, |v| v.to_f32(), bf16::from_f32)
        }
        TensorData::Other { .. } => KernelOutcome::SkippedKind,
    }
}

/// Core f32 kernel: normalize, apply the curve, mix by strength, scale the
/// delta by effect_scale.
fn transform_values(values: &mut [f32], params: &TransformParams) -> KernelOutcome {
    let mut min_val = f32::INFINITY;
    let mut max_val = f32::NEG_INFINITY;
    for &v in values.iter() {
        min_val = min_val.min(v);
        max_val = max_val.max(v);
    }
    // Covers empty slices too: min stays +inf, max stays -inf
    if min_val >= max_val {
        return KernelOutcome::Degenerate;
    }

    let range = max_val - min_val;
    let span = range + NORM_EPSILON;
    let strength = params.strength;
    let effect_scale = params.effect_scale;

    for v in values.iter_mut() {
        let x = *v;
        let normalized = (x - min_val) / span;
        let adjusted = min_val + smooth_step(normalized) * range;
        // Extrapolated blend: strength outside [0, 1] overshoots or inverts
        let mixed = x * (1.0 - strength) + adjusted * strength;
        *v = x + (mixed - x) * effect_scale;
    }

    KernelOutcome::Transformed
}

/// Widen to f32, run the core kernel, narrow back if anything changed.
fn transform_widened<T: Copy>(
    values: &mut [T],
    params: &TransformParams,
    widen: impl Fn(T) -> f32,
    narrow: impl Fn(f32) -> T,
) -> KernelOutcome {
    let mut scratch: Vec<f32> = values.iter().map(|&v| widen(v)).collect();
    let outcome = transform_values(&mut scratch, params);
    if outcome == KernelOutcome::Transformed {
        for (dst, src) in values.iter_mut().zip(scratch) {
            *dst = narrow(src);
        }
    }
    outcome
}
