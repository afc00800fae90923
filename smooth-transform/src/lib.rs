//! Smooth Transform - smoothstep weight smoothing for diffusion checkpoints.
//!
//! Applies a deterministic, per-tensor smoothstep curve to selected weight
//! layers of an in-memory checkpoint, leaving every other tensor untouched.
//! Layers are selected by name-fragment keywords; the defaults target the
//! diffusion backbone (UNet encoder, bottleneck, and decoder blocks) and
//! leave VAE and text-encoder weights alone.
//!
//! # Usage
//! ```ignore
//! use std::sync::Arc;
//! use smooth_transform::{Model, Silent, SmoothStep, TransformParams};
//!
//! let model = Arc::new(Model::new(weights));
//! let transformer = SmoothStep::new(TransformParams::new(0.5, 1.0));
//! let smoothed = transformer.apply(&model, &Silent, &Silent);
//! ```
//!
//! The original model is never mutated; the transform deep-copies the weight
//! store before touching it. With identity parameters (`strength = 0`,
//! `effect_scale = 1`) the input handle is returned as-is without copying.

pub mod kernel;
pub mod progress;
pub mod selector;
pub mod store;
pub mod tensor;
pub mod transformer;

mod interop;


// Re-exports
pub use kernel::{smooth_step, transform_tensor, KernelOutcome};
pub use progress::{Diagnostics, Progress, Silent};
pub use selector::{LayerSelector, DEFAULT_TARGET_KEYWORDS};
pub use store::{Model, WeightStore};
pub use tensor::{ElementKind, Tensor, TensorData};
pub use transformer::{ApplyStats, SmoothStep, TransformParams};
