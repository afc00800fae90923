//! Apply subcommand - run the transform over a checkpoint file.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use smooth_transform::{ApplyStats, Diagnostics, Progress, SmoothStep, TransformParams};

use crate::common;
use crate::config;

/// Console progress: one line per processed tensor, completion order.
struct ConsoleProgress {
    total: AtomicUsize,
    done: AtomicUsize,
}

impl ConsoleProgress {
    fn new() -> Self {
        Self { total: AtomicUsize::new(0), done: AtomicUsize::new(0) }
    }
}

impl Progress for ConsoleProgress {
    fn begin(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
    }

    fn advance(&self, by: usize) {
        let done = self.done.fetch_add(by, Ordering::Relaxed) + by;
        println!("[{}/{}] tensors processed", done, self.total.load(Ordering::Relaxed));
    }
}

struct ConsoleDiagnostics;

impl Diagnostics for ConsoleDiagnostics {
    fn line(&self, message: &str) {
        println!("{}", message);
    }
}

pub fn run(
    model_path: &str,
    output_path: &str,
    strength: Option<f32>,
    effect_scale: Option<f32>,
    config_path: Option<&str>,
) -> Result<()> {
    let (params, selector) = config::resolve(strength, effect_scale, config_path)?;

    println!("Loading checkpoint: {}", model_path);
    let model = Arc::new(common::load_checkpoint(model_path)?);
    println!("Loaded {} tensors", model.weights().len());
    println!(
        "strength = {}, effect_scale = {}, keywords = {:?}",
        params.strength,
        params.effect_scale,
        selector.keywords()
    );

    let transformer = SmoothStep::with_selector(params, selector);
    let progress = ConsoleProgress::new();
    let (result, stats) = transformer.apply_with_stats(&model, &progress, &ConsoleDiagnostics);

    common::save_checkpoint(&result, output_path)
        .with_context(|| format!("Failed to save checkpoint: {}", output_path))?;
    write_report(output_path, &transformer, &stats)?;

    println!(
        "\n=== Smooth Step Complete: {}/{} selected tensors transformed ===",
        stats.transformed, stats.selected
    );
    println!("Output: {}", output_path);
    Ok(())
}

/// Sidecar JSON describing what was done, next to the output checkpoint.
fn write_report(output_path: &str, transformer: &SmoothStep, stats: &ApplyStats) -> Result<()> {
    let params: TransformParams = transformer.params();
    let report = serde_json::json!({
        "strength": params.strength,
        "effect_scale": params.effect_scale,
        "keywords": transformer.selector().keywords(),
        "selected": stats.selected,
        "transformed": stats.transformed,
        "degenerate": stats.degenerate,
        "skipped_kind": stats.skipped_kind,
        "created_at": chrono::Utc::now().to_rfc3339(),
    });

    let report_path = format!("{}.report.json", output_path);
    fs::write(&report_path, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("Failed to write report: {}", report_path))?;
    Ok(())
}
