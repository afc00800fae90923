//! Run configuration for the smoothstep CLI.
//!
//! The config file is optional; CLI flags take precedence over config
//! values, which take precedence over the built-in defaults. Range
//! enforcement for the two scalars happens here, before the core sees them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use smooth_transform::{LayerSelector, TransformParams};
use std::fs;

/// Bounds for both scalar parameters; values outside are clamped.
pub const PARAM_MIN: f32 = -10.0;
pub const PARAM_MAX: f32 = 10.0;

/// JSON run configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Name fragments selecting which tensors to transform.
    /// Empty means the built-in diffusion-backbone defaults.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Curve blend factor.
    #[serde(default)]
    pub strength: Option<f32>,

    /// Scale applied to the resulting delta.
    #[serde(default)]
    pub effect_scale: Option<f32>,
}

impl RunConfig {
    pub fn load(path: &str) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path))?;
        serde_json::from_str(&json).with_context(|| format!("Failed to parse config: {}", path))
    }
}

/// Clamp a parameter into the supported range.
pub fn clamp_param(value: f32) -> f32 {
    value.clamp(PARAM_MIN, PARAM_MAX)
}

/// Resolve CLI flags against an optional config file into the params and
/// selector the core expects.
pub fn resolve(
    cli_strength: Option<f32>,
    cli_effect_scale: Option<f32>,
    config_path: Option<&str>,
) -> Result<(TransformParams, LayerSelector)> {
    let config = match config_path {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };

    let strength = clamp_param(cli_strength.or(config.strength).unwrap_or(0.0));
    let effect_scale = clamp_param(cli_effect_scale.or(config.effect_scale).unwrap_or(1.0));

    let selector = if config.keywords.is_empty() {
        LayerSelector::default()
    } else {
        LayerSelector::new(config.keywords)
    };

    Ok((TransformParams::new(strength, effect_scale), selector))
}
