pub mod animate;
pub mod config;
pub mod simulate;

use std::path::{Path, PathBuf};

use clap::Args;
use normlab_core::{ConfigError, DEFAULT_SAVE_PATH, Preset, RunConfig};

/// Run parameters shared by every subcommand.
///
/// Precedence: preset, then the JSON config file, then individual flags.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Parameter preset: script (2000 samples, 300 ms) or notebook (1500 samples, 400 ms)
    #[arg(long, default_value = "script", value_parser = ["script", "notebook", "nb"])]
    pub preset: String,

    /// JSON config file; fields it sets override the preset
    #[arg(long)]
    pub config: Option<String>,

    /// Mean of the target normal distribution
    #[arg(long, allow_hyphen_values = true)]
    pub mean: Option<f64>,

    /// Standard deviation of the target normal distribution (0 allowed)
    #[arg(long)]
    pub std_dev: Option<f64>,

    /// Samples drawn before the first tick
    #[arg(long)]
    pub initial: Option<usize>,

    /// Final sample count
    #[arg(long)]
    pub max: Option<usize>,

    /// Samples appended per tick
    #[arg(long)]
    pub batch: Option<usize>,

    /// PRNG seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Milliseconds between ticks in the live dashboard
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Save the animation as a GIF (default path: normlab_animation.gif)
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_SAVE_PATH)]
    pub save: Option<String>,
}

/// Build the run configuration from preset, config file and flags.
pub fn resolve_config(args: &RunArgs) -> Result<RunConfig, ConfigError> {
    let preset: Preset = if args.preset.is_empty() {
        Preset::default()
    } else {
        args.preset.parse()?
    };
    let mut cfg = preset.config();
    if let Some(path) = &args.config {
        cfg = cfg.load_over(Path::new(path))?;
    }
    if let Some(v) = args.mean {
        cfg.mean = v;
    }
    if let Some(v) = args.std_dev {
        cfg.std_dev = v;
    }
    if let Some(v) = args.initial {
        cfg.initial_count = v;
    }
    if let Some(v) = args.max {
        cfg.max_count = v;
    }
    if let Some(v) = args.batch {
        cfg.batch_size = v;
    }
    if let Some(v) = args.seed {
        cfg.seed = v;
    }
    if let Some(v) = args.interval_ms {
        cfg.interval_ms = v;
    }
    if let Some(path) = &args.save {
        cfg.save_animation = true;
        cfg.save_path = PathBuf::from(path);
    }
    cfg.validate()?;
    Ok(cfg)
}

/// [`resolve_config`], exiting with status 1 on failure.
pub fn config_or_exit(args: &RunArgs) -> RunConfig {
    match resolve_config(args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    }
}
