//! Per-tick statistics snapshot.

use normlab_stats::{
    ConfidenceInterval, Convergence, StatsError, TargetNormal, describe, ks_test,
    mean_confidence_interval, papr_db, snr_db,
};
use serde::Serialize;

/// Confidence level reported for the sample mean.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// KS p-value above which the sample is taken as consistent with the target.
pub const FIT_P_THRESHOLD: f64 = 0.05;

/// Everything the statistics readout shows for one tick.
///
/// A pure function of the sample sequence and the target; it carries no state
/// of its own and is rebuilt from scratch each tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSnapshot {
    pub n: usize,
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub theoretical_mean: f64,
    pub theoretical_variance: f64,
    pub mean_error: f64,
    pub variance_error: f64,
    pub ks_statistic: f64,
    pub ks_p_value: f64,
    pub snr_db: f64,
    pub papr_db: f64,
    pub confidence: Option<ConfidenceInterval>,
    pub convergence: Convergence,
}

impl StatisticsSnapshot {
    pub fn compute(samples: &[f64], target: &TargetNormal) -> Result<Self, StatsError> {
        let d = describe(samples)?;
        let ks = ks_test(samples, target)?;
        Ok(Self {
            n: d.n,
            mean: d.mean,
            variance: d.variance,
            std_dev: d.std_dev,
            theoretical_mean: target.mean(),
            theoretical_variance: target.variance(),
            mean_error: (d.mean - target.mean()).abs(),
            variance_error: (d.variance - target.variance()).abs(),
            ks_statistic: ks.statistic,
            ks_p_value: ks.p_value,
            snr_db: snr_db(d.mean, d.std_dev),
            papr_db: papr_db(d.peak_square, d.mean_square),
            confidence: mean_confidence_interval(&d, CONFIDENCE_LEVEL).ok(),
            convergence: Convergence::from_ks_statistic(ks.statistic),
        })
    }

    /// End-of-run verdicts on fit and parameter convergence.
    pub fn assess(&self) -> Assessment {
        Assessment {
            fits_target: self.ks_p_value > FIT_P_THRESHOLD,
            mean: Grade::from_error(self.mean_error),
            variance: Grade::from_error(self.variance_error),
        }
    }
}

/// How close an estimate landed to its theoretical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    Excellent,
    Good,
    Poor,
}

impl Grade {
    pub fn from_error(err: f64) -> Self {
        if err < 0.1 {
            Self::Excellent
        } else if err < 0.2 {
            Self::Good
        } else {
            Self::Poor
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "EXCELLENT"),
            Self::Good => write!(f, "GOOD"),
            Self::Poor => write!(f, "POOR"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub fits_target: bool,
    pub mean: Grade,
    pub variance: Grade,
}
