//! Scan subcommand - dry-run listing of the tensors the selector would touch.

use anyhow::Result;

use crate::common;
use crate::config;

pub fn run(model_path: &str, config_path: Option<&str>) -> Result<()> {
    let (_, selector) = config::resolve(None, None, config_path)?;
    let model = common::load_checkpoint(model_path)?;

    println!("Keywords: {:?}", selector.keywords());

    let mut selected = 0usize;
    let mut eligible = 0usize;
    for (name, tensor) in model.weights().iter() {
        if !selector.matches(name) {
            continue;
        }
        selected += 1;
        let kind = tensor.kind();
        let tag = if kind.is_transformable() {
            eligible += 1;
            "eligible"
        } else {
            "passthrough"
        };
        println!("  - {} (shape: {:?}, kind: {:?}, {})", name, tensor.shape(), kind, tag);
    }

    println!(
        "\n{} of {} tensors selected ({} eligible)",
        selected,
        model.weights().len(),
        eligible
    );
    if selected == 0 {
        println!("Warning: no tensors matched; check the keyword configuration.");
    }
    Ok(())
}
