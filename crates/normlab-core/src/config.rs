//! Run configuration.
//!
//! A [`RunConfig`] is fixed for the lifetime of one run. It can come from a
//! [`Preset`], a JSON file, or be assembled field by field by the CLI; every
//! path ends in [`RunConfig::validate`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use normlab_stats::TargetNormal;

use crate::charts::BinRule;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default file name for the animated export.
pub const DEFAULT_SAVE_PATH: &str = "normlab_animation.gif";

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("batch_size must be at least 1")]
    ZeroBatch,
    #[error("initial_count must be at least 2 (got {0}); the sample variance needs two points")]
    TooFewInitial(usize),
    #[error("initial_count ({initial}) exceeds max_count ({max})")]
    InitialExceedsMax { initial: usize, max: usize },
    #[error("mean must be finite (got {0})")]
    InvalidMean(f64),
    #[error("std_dev must be finite and non-negative (got {0})")]
    InvalidStdDev(f64),
    #[error("frame size must be non-zero (got {0}x{1})")]
    InvalidFrameSize(u32, u32),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown preset '{0}' (expected script or notebook)")]
    UnknownPreset(String),
}

/// Named parameter sets matching the two classroom variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// 2000 samples, 300 ms per tick, `n / 10` histogram bins.
    #[default]
    Script,
    /// 1500 samples, 400 ms per tick, `n / 20` histogram bins.
    Notebook,
}

impl Preset {
    pub fn config(self) -> RunConfig {
        let base = RunConfig {
            mean: 0.0,
            std_dev: 1.0,
            initial_count: 50,
            max_count: 2000,
            batch_size: 25,
            seed: 42,
            interval_ms: 300,
            save_animation: false,
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            frame_width: 960,
            frame_height: 720,
            bin_rule: BinRule::Tenth,
        };
        match self {
            Self::Script => base,
            Self::Notebook => RunConfig {
                max_count: 1500,
                interval_ms: 400,
                bin_rule: BinRule::Twentieth,
                ..base
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Script => write!(f, "script"),
            Self::Notebook => write!(f, "notebook"),
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "script" => Ok(Self::Script),
            "notebook" | "nb" => Ok(Self::Notebook),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }
}

/// Parameters of one sampling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Mean of the target normal distribution.
    pub mean: f64,
    /// Standard deviation of the target normal distribution. 0 is allowed.
    pub std_dev: f64,
    pub initial_count: usize,
    pub max_count: usize,
    /// Samples appended per tick (the last tick may append fewer).
    pub batch_size: usize,
    pub seed: u64,
    /// Wall-clock time between ticks in the live dashboard.
    pub interval_ms: u64,
    /// Write the frame sequence to `save_path` as an animated GIF.
    pub save_animation: bool,
    pub save_path: PathBuf,
    pub frame_width: u32,
    pub frame_height: u32,
    pub bin_rule: BinRule,
}

impl Default for RunConfig {
    fn default() -> Self {
        Preset::default().config()
    }
}

impl RunConfig {
    /// Parse a JSON document. Missing fields fall back to the default preset.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Apply the fields present in a JSON object on top of `self`.
    pub fn overlay_json(&self, s: &str) -> Result<Self, ConfigError> {
        let overlay: serde_json::Value = serde_json::from_str(s)?;
        let serde_json::Value::Object(fields) = overlay else {
            // Not an object: let the typed parse produce the error message.
            return Self::from_json_str(s);
        };
        let mut base = serde_json::to_value(self)?;
        if let Some(obj) = base.as_object_mut() {
            obj.extend(fields);
        }
        Ok(serde_json::from_value(base)?)
    }

    /// Read a JSON config file and apply it on top of `self`.
    pub fn load_over(&self, path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.overlay_json(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatch);
        }
        if self.initial_count < 2 {
            return Err(ConfigError::TooFewInitial(self.initial_count));
        }
        if self.initial_count > self.max_count {
            return Err(ConfigError::InitialExceedsMax {
                initial: self.initial_count,
                max: self.max_count,
            });
        }
        if !self.mean.is_finite() {
            return Err(ConfigError::InvalidMean(self.mean));
        }
        if !self.std_dev.is_finite() || self.std_dev < 0.0 {
            return Err(ConfigError::InvalidStdDev(self.std_dev));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(ConfigError::InvalidFrameSize(
                self.frame_width,
                self.frame_height,
            ));
        }
        Ok(())
    }

    /// The target distribution described by `mean` and `std_dev`.
    pub fn target(&self) -> Result<TargetNormal, ConfigError> {
        TargetNormal::new(self.mean, self.std_dev).map_err(|_| {
            if self.mean.is_finite() {
                ConfigError::InvalidStdDev(self.std_dev)
            } else {
                ConfigError::InvalidMean(self.mean)
            }
        })
    }

    /// Number of sampling ticks needed to grow from `initial_count` to
    /// `max_count`: `ceil((max - initial) / batch)`.
    pub fn tick_count(&self) -> u64 {
        if self.batch_size == 0 {
            return 0;
        }
        let growth = self.max_count.saturating_sub(self.initial_count);
        growth.div_ceil(self.batch_size) as u64
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Wall-clock length of the live animation.
    pub fn estimated_duration(&self) -> Duration {
        Duration::from_millis(self.interval_ms.saturating_mul(self.tick_count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_script_preset() {
        let c = RunConfig::default();
        assert_eq!(c, Preset::Script.config());
        assert_eq!(c.max_count, 2000);
        assert_eq!(c.interval_ms, 300);
        assert_eq!(c.seed, 42);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn notebook_preset_differs_in_length_pace_and_bins() {
        let s = Preset::Script.config();
        let n = Preset::Notebook.config();
        assert_eq!(n.max_count, 1500);
        assert_eq!(n.interval_ms, 400);
        assert_eq!(n.batch_size, s.batch_size);
        assert_eq!(n.initial_count, s.initial_count);
        assert_eq!(s.bin_rule, BinRule::Tenth);
        assert_eq!(n.bin_rule, BinRule::Twentieth);
    }

    #[test]
    fn preset_parse_and_display() {
        assert_eq!("script".parse::<Preset>().unwrap(), Preset::Script);
        assert_eq!("notebook".parse::<Preset>().unwrap(), Preset::Notebook);
        assert_eq!("nb".parse::<Preset>().unwrap(), Preset::Notebook);
        assert!("jupyter".parse::<Preset>().is_err());
        assert_eq!(Preset::Notebook.to_string(), "notebook");
    }

    #[test]
    fn tick_count_rounds_up() {
        let mut c = RunConfig {
            initial_count: 50,
            max_count: 200,
            batch_size: 25,
            ..RunConfig::default()
        };
        assert_eq!(c.tick_count(), 6);
        c.max_count = 210;
        assert_eq!(c.tick_count(), 7);
        c.max_count = 50;
        assert_eq!(c.tick_count(), 0);
    }

    #[test]
    fn script_preset_tick_count_and_duration() {
        let c = Preset::Script.config();
        // (2000 - 50) / 25 = 78
        assert_eq!(c.tick_count(), 78);
        assert_eq!(c.estimated_duration(), Duration::from_millis(78 * 300));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let base = RunConfig::default();
        assert!(matches!(
            RunConfig { batch_size: 0, ..base.clone() }.validate(),
            Err(ConfigError::ZeroBatch)
        ));
        assert!(matches!(
            RunConfig { initial_count: 1, ..base.clone() }.validate(),
            Err(ConfigError::TooFewInitial(1))
        ));
        assert!(matches!(
            RunConfig { initial_count: 300, max_count: 200, ..base.clone() }.validate(),
            Err(ConfigError::InitialExceedsMax { initial: 300, max: 200 })
        ));
        assert!(matches!(
            RunConfig { std_dev: -1.0, ..base.clone() }.validate(),
            Err(ConfigError::InvalidStdDev(_))
        ));
        assert!(matches!(
            RunConfig { mean: f64::NAN, ..base.clone() }.validate(),
            Err(ConfigError::InvalidMean(_))
        ));
        assert!(matches!(
            RunConfig { frame_width: 0, ..base }.validate(),
            Err(ConfigError::InvalidFrameSize(0, 720))
        ));
    }

    #[test]
    fn zero_std_dev_is_valid() {
        let c = RunConfig {
            std_dev: 0.0,
            ..RunConfig::default()
        };
        assert!(c.validate().is_ok());
        assert!(c.target().unwrap().is_degenerate());
    }

    #[test]
    fn json_partial_overrides_defaults() {
        let c = RunConfig::from_json_str(r#"{"max_count": 500, "seed": 7}"#).unwrap();
        assert_eq!(c.max_count, 500);
        assert_eq!(c.seed, 7);
        assert_eq!(c.batch_size, 25);
        assert_eq!(c.mean, 0.0);
    }

    #[test]
    fn overlay_keeps_base_fields() {
        let base = Preset::Notebook.config();
        let c = base.overlay_json(r#"{"seed": 3, "std_dev": 2.5}"#).unwrap();
        assert_eq!(c.seed, 3);
        assert_eq!(c.std_dev, 2.5);
        assert_eq!(c.max_count, 1500);
        assert_eq!(c.interval_ms, 400);
    }

    #[test]
    fn overlay_rejects_non_object() {
        assert!(matches!(
            RunConfig::default().overlay_json("[1, 2]"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_over_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{"batch_size": 10}"#).unwrap();
        let c = Preset::Notebook.config().load_over(&path).unwrap();
        assert_eq!(c.batch_size, 10);
        assert_eq!(c.max_count, 1500);
    }

    #[test]
    fn json_rejects_unknown_keys() {
        let err = RunConfig::from_json_str(r#"{"max": 300}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("max"));
        assert!(matches!(
            Preset::Notebook.config().overlay_json(r#"{"seed": 1, "sead": 2}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn json_selects_bin_rule() {
        let c = RunConfig::from_json_str(r#"{"bin_rule": "twentieth"}"#).unwrap();
        assert_eq!(c.bin_rule, BinRule::Twentieth);
    }

    #[test]
    fn json_rejects_garbage() {
        assert!(matches!(
            RunConfig::from_json_str("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = RunConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn json_roundtrip_of_defaults() {
        let c = RunConfig::default();
        let s = serde_json::to_string(&c).unwrap();
        assert_eq!(RunConfig::from_json_str(&s).unwrap(), c);
    }
}
