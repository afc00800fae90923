//! Smoothstep CLI - apply a smoothstep curve to diffusion checkpoint weights.

use clap::{Parser, Subcommand};

mod apply;
mod common;
mod config;
mod scan;

#[derive(Parser)]
#[command(name = "smoothstep")]
#[command(about = "Apply a smoothstep curve to selected weight layers of a diffusion checkpoint")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the transform and write a modified checkpoint
    Apply {
        /// Path to the input .safetensors checkpoint
        #[arg(short, long)]
        model: String,

        /// Output path for the modified checkpoint
        #[arg(short, long)]
        output: String,

        /// Curve blend factor, clamped to [-10, 10] (default 0)
        #[arg(short, long)]
        strength: Option<f32>,

        /// Scale applied to the resulting delta, clamped to [-10, 10] (default 1)
        #[arg(short, long)]
        effect_scale: Option<f32>,

        /// Path to run config JSON (optional)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// List the tensors the keyword selector would touch, without writing anything
    Scan {
        /// Path to the input .safetensors checkpoint
        #[arg(short, long)]
        model: String,

        /// Path to run config JSON (optional)
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            model,
            output,
            strength,
            effect_scale,
            config,
        } => {
            apply::run(&model, &output, strength, effect_scale, config.as_deref())?;
        }
        Commands::Scan { model, config } => {
            scan::run(&model, config.as_deref())?;
        }
    }

    Ok(())
}
