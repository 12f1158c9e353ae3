//! # normlab-core
//!
//! **Watch the law of large numbers happen.**
//!
//! `normlab-core` grows a sequence of normal variates in fixed-size batches and,
//! after every batch, recomputes how far the sample has come toward the
//! distribution it was drawn from: moments, a Kolmogorov-Smirnov fit, a
//! confidence interval for the mean, and the data behind four chart panels
//! (density histogram, time series, Q-Q plot, CDF comparison).
//!
//! ## Quick Start
//!
//! ```no_run
//! use normlab_core::{RunConfig, Simulation, Tick};
//!
//! let mut sim = Simulation::new(RunConfig::default()).unwrap();
//! while let Tick::Advanced(report) = sim.advance().unwrap() {
//!     println!("n={} D={:.4}", report.len, report.stats.ks_statistic);
//! }
//! ```
//!
//! ## Architecture
//!
//! Sampler → Simulation (append batch) → StatisticsSnapshot + ChartSet → host
//!
//! The host is whatever drives [`Simulation::advance`]: the live terminal
//! dashboard, the headless runner, or a test. Rendered frames can be handed to
//! a [`FrameRecorder`], which writes an animated GIF and never lets an export
//! failure interrupt the run.

pub mod charts;
pub mod config;
pub mod export;
pub mod milestone;
pub mod report;
pub mod sampler;
pub mod simulation;
pub mod snapshot;

pub use charts::{
    BinRule, CdfChart, ChartSet, HistogramBin, HistogramChart, QqChart, TimeSeriesChart,
    density_histogram, smoothed_density,
};
pub use config::{ConfigError, DEFAULT_SAVE_PATH, Preset, RunConfig};
pub use export::{
    ExportError, ExportOutcome, Frame, FrameRecorder, FrameSink, GifExporter, render_frame,
};
pub use milestone::{Milestone, MilestoneTracker};
pub use sampler::Sampler;
pub use simulation::{Simulation, SimulationError, Tick, TickReport};
pub use snapshot::{Assessment, CONFIDENCE_LEVEL, FIT_P_THRESHOLD, Grade, StatisticsSnapshot};

pub use normlab_stats::{Convergence, TargetNormal};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
