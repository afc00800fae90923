//! Orchestration: clone the model, select layers, transform, report.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::kernel::{transform_tensor, KernelOutcome};
use crate::progress::{Diagnostics, Progress};
use crate::selector::LayerSelector;
use crate::store::Model;

/// Scalar parameters of the transform.
///
/// Both are expected in [-10, 10]; range enforcement is the caller's job
/// (the core only assumes finite values). `strength` blends toward the
/// curve and extrapolates or inverts outside [0, 1]; `effect_scale` scales
/// the resulting delta before it is added back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformParams {
    pub strength: f32,
    pub effect_scale: f32,
}

impl TransformParams {
    pub fn new(strength: f32, effect_scale: f32) -> Self {
        Self { strength, effect_scale }
    }

    /// True when the configuration is a guaranteed no-op.
    pub fn is_identity(&self) -> bool {
        self.strength == 0.0 && self.effect_scale == 1.0
    }
}

impl Default for TransformParams {
    fn default() -> Self {
        Self { strength: 0.0, effect_scale: 1.0 }
    }
}

/// Per-run counters: one increment per selected tensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    pub selected: usize,
    pub transformed: usize,
    pub degenerate: usize,
    pub skipped_kind: usize,
}

/// The layer transformer: selects tensors by name and pushes their values
/// toward a smoothstep curve.
#[derive(Debug, Clone, Default)]
pub struct SmoothStep {
    selector: LayerSelector,
    params: TransformParams,
}

impl SmoothStep {
    /// Transformer with the default diffusion-backbone selector.
    pub fn new(params: TransformParams) -> Self {
        Self { selector: LayerSelector::default(), params }
    }

    pub fn with_selector(params: TransformParams, selector: LayerSelector) -> Self {
        Self { selector, params }
    }

    pub fn selector(&self) -> &LayerSelector {
        &self.selector
    }

    pub fn params(&self) -> TransformParams {
        self.params
    }

    /// Apply the transform, returning a new model handle.
    ///
    /// The input model is never mutated. With identity parameters the input
    /// handle is returned as-is, without a deep copy.
    pub fn apply(
        &self,
        model: &Arc<Model>,
        progress: &dyn Progress,
        diagnostics: &dyn Diagnostics,
    ) -> Arc<Model> {
        self.apply_with_stats(model, progress, diagnostics).0
    }

    /// Same as [`SmoothStep::apply`], also returning per-outcome counters.
    pub fn apply_with_stats(
        &self,
        model: &Arc<Model>,
        progress: &dyn Progress,
        diagnostics: &dyn Diagnostics,
    ) -> (Arc<Model>, ApplyStats) {
        if self.params.is_identity() {
            return (Arc::clone(model), ApplyStats::default());
        }

        let mut cloned = model.as_ref().clone();

        let selected = cloned
            .weights()
            .names()
            .filter(|name| self.selector.matches(name))
            .count();

        if selected == 0 {
            diagnostics.line(&format!(
                "Warning: no layers matched keywords {:?}; passing model through unchanged",
                self.selector.keywords()
            ));
            return (Arc::new(cloned), ApplyStats::default());
        }

        diagnostics.line(&format!("Applying smooth step to {} layers...", selected));
        progress.begin(selected);

        let transformed = AtomicUsize::new(0);
        let degenerate = AtomicUsize::new(0);
        let skipped_kind = AtomicUsize::new(0);

        // Tensors are independent; each worker owns exactly one entry slot
        cloned
            .weights_mut()
            .entries_mut()
            .par_iter_mut()
            .filter(|entry| self.selector.matches(&entry.0))
            .for_each(|entry| {
                let counter = match transform_tensor(&mut entry.1, &self.params) {
                    KernelOutcome::Transformed => &transformed,
                    KernelOutcome::Degenerate => &degenerate,
                    KernelOutcome::SkippedKind => &skipped_kind,
                };
                counter.fetch_add(1, Ordering::Relaxed);
                progress.advance(1);
            });

        diagnostics.line("Finished applying smooth step.");

        let stats = ApplyStats {
            selected,
            transformed: transformed.into_inner(),
            degenerate: degenerate.into_inner(),
            skipped_kind: skipped_kind.into_inner(),
        };
        (Arc::new(cloned), stats)
    }
}
