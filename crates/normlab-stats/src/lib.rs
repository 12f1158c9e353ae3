//! Statistics primitives for normal-distribution sampling.
//!
//! Everything here is a pure function of a sample slice and, where relevant, a
//! [`TargetNormal`]. The sampling loop in `normlab-core` recomputes these every
//! tick; nothing in this crate holds state between calls.

use serde::Serialize;
use statrs::distribution::{Continuous, ContinuousCDF, Normal, StudentsT};
use statrs::statistics::Statistics;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from the statistics layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("invalid normal parameters: mean={mean}, std_dev={std_dev}")]
    InvalidNormal { mean: f64, std_dev: f64 },
    #[error("insufficient data: need {needed}, got {got}")]
    Insufficient { needed: usize, got: usize },
    #[error("confidence level must lie in (0, 1), got {0}")]
    InvalidLevel(f64),
}

/// Reasons a kernel density estimate cannot be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KdeError {
    #[error("kernel density needs at least 2 samples, got {0}")]
    TooFewSamples(usize),
    #[error("samples have zero spread, bandwidth is singular")]
    SingularBandwidth,
    #[error("sample set contains a non-finite value")]
    NonFinite,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Target distribution
// ═══════════════════════════════════════════════════════════════════════════════

/// The theoretical normal distribution samples are compared against.
///
/// A standard deviation of exactly 0 is accepted and treated as a point mass at
/// the mean: the CDF becomes a unit step and every quantile is the mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetNormal {
    mean: f64,
    std_dev: f64,
}

impl TargetNormal {
    pub fn new(mean: f64, std_dev: f64) -> Result<Self, StatsError> {
        if !mean.is_finite() || !std_dev.is_finite() || std_dev < 0.0 {
            return Err(StatsError::InvalidNormal { mean, std_dev });
        }
        Ok(Self { mean, std_dev })
    }

    /// N(0, 1).
    pub fn standard() -> Self {
        Self {
            mean: 0.0,
            std_dev: 1.0,
        }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }

    pub fn is_degenerate(&self) -> bool {
        self.std_dev == 0.0
    }

    fn normal(&self) -> Option<Normal> {
        Normal::new(self.mean, self.std_dev).ok()
    }

    /// Density at `x`. `None` for the degenerate point mass, which has no density.
    pub fn pdf(&self, x: f64) -> Option<f64> {
        self.normal().map(|n| n.pdf(x))
    }

    pub fn cdf(&self, x: f64) -> f64 {
        match self.normal() {
            Some(n) => n.cdf(x),
            None if x < self.mean => 0.0,
            None => 1.0,
        }
    }

    /// Left limit F(x-). Equal to [`cdf`](Self::cdf) except at the atom of the
    /// degenerate distribution.
    pub fn cdf_left(&self, x: f64) -> f64 {
        match self.normal() {
            Some(n) => n.cdf(x),
            None if x <= self.mean => 0.0,
            None => 1.0,
        }
    }

    /// Inverse CDF for `p` in (0, 1).
    pub fn quantile(&self, p: f64) -> f64 {
        match self.normal() {
            Some(n) => n.inverse_cdf(p),
            None => self.mean,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// `n` evenly spaced points over `[start, end]`, endpoints included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Ascending copy of `samples`.
pub fn sorted(samples: &[f64]) -> Vec<f64> {
    let mut out = samples.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Piecewise-linear interpolation of `(xp, fp)` at `x`, clamped to the end
/// values outside `[xp[0], xp[last]]`. `xp` must be ascending.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let n = xp.len().min(fp.len());
    if n == 0 {
        return f64::NAN;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }
    // First index with xp[i] > x; guaranteed in 1..n by the clamps above.
    let hi = xp[..n].partition_point(|&v| v <= x);
    let lo = hi - 1;
    let span = xp[hi] - xp[lo];
    if span == 0.0 {
        return fp[hi];
    }
    fp[lo] + (fp[hi] - fp[lo]) * (x - xp[lo]) / span
}

/// Filliben's estimate of uniform order statistic medians, the plotting
/// positions used for normal probability plots.
pub fn order_statistic_medians(n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![0.5],
        _ => {
            let last = 0.5f64.powf(1.0 / n as f64);
            let nf = n as f64;
            (1..=n)
                .map(|i| {
                    if i == 1 {
                        1.0 - last
                    } else if i == n {
                        last
                    } else {
                        (i as f64 - 0.3175) / (nf + 0.365)
                    }
                })
                .collect()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Descriptive statistics
// ═══════════════════════════════════════════════════════════════════════════════

/// Moments and extremes of a sample set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Descriptive {
    pub n: usize,
    pub mean: f64,
    /// Unbiased (n - 1) variance.
    pub variance: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Mean of x^2 (average power).
    pub mean_square: f64,
    /// Largest x^2 (peak power).
    pub peak_square: f64,
}

/// Describe a sample set. Needs at least two samples for the unbiased variance.
pub fn describe(samples: &[f64]) -> Result<Descriptive, StatsError> {
    let n = samples.len();
    if n < 2 {
        return Err(StatsError::Insufficient { needed: 2, got: n });
    }
    let variance = samples.iter().variance();
    Ok(Descriptive {
        n,
        mean: samples.iter().mean(),
        variance,
        std_dev: variance.sqrt(),
        min: Statistics::min(samples.iter()),
        max: Statistics::max(samples.iter()),
        mean_square: samples.iter().map(|x| x * x).mean(),
        peak_square: Statistics::max(samples.iter().map(|x| x * x)),
    })
}

/// `20 * log10(|mean| / std)`. Positive infinity when `std` is 0.
pub fn snr_db(mean: f64, std_dev: f64) -> f64 {
    if std_dev > 0.0 {
        20.0 * (mean.abs() / std_dev).log10()
    } else {
        f64::INFINITY
    }
}

/// `10 * log10(peak / average)`. Positive infinity when the average power is 0.
pub fn papr_db(peak_square: f64, mean_square: f64) -> f64 {
    if mean_square > 0.0 {
        10.0 * (peak_square / mean_square).log10()
    } else {
        f64::INFINITY
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Goodness of fit
// ═══════════════════════════════════════════════════════════════════════════════

/// One-sample Kolmogorov-Smirnov result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KsResult {
    pub n: usize,
    /// D = sup |F_n(x) - F(x)|.
    pub statistic: f64,
    pub p_value: f64,
}

/// Two-sided one-sample KS test of `samples` against `target`.
pub fn ks_test(samples: &[f64], target: &TargetNormal) -> Result<KsResult, StatsError> {
    let n = samples.len();
    if n == 0 {
        return Err(StatsError::Insufficient { needed: 1, got: 0 });
    }
    let nf = n as f64;
    let mut d_max = 0.0f64;
    for (i, &x) in sorted(samples).iter().enumerate() {
        let d_plus = (i + 1) as f64 / nf - target.cdf(x);
        let d_minus = target.cdf_left(x) - i as f64 / nf;
        d_max = d_max.max(d_plus).max(d_minus);
    }
    Ok(KsResult {
        n,
        statistic: d_max,
        p_value: kolmogorov_p_value(d_max, n),
    })
}

/// Asymptotic Kolmogorov p-value with Stephens' small-sample correction.
pub fn kolmogorov_p_value(d: f64, n: usize) -> f64 {
    if n == 0 {
        return 1.0;
    }
    let sqrt_n = (n as f64).sqrt();
    let lambda = (sqrt_n + 0.12 + 0.11 / sqrt_n) * d;
    // Below this the alternating series has not converged and Q(lambda) is 1
    // to double precision anyway.
    if lambda < 0.2 {
        return 1.0;
    }
    let mut p = 0.0;
    for k in 1..=100i32 {
        let sign = if k % 2 == 0 { -1.0 } else { 1.0 };
        p += sign * (-2.0 * (k as f64 * lambda).powi(2)).exp();
    }
    (2.0 * p).clamp(0.0, 1.0)
}

/// Qualitative fit of the empirical distribution, judged from the KS statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Convergence {
    Poor,
    Fair,
    Good,
}

impl Convergence {
    pub fn from_ks_statistic(d: f64) -> Self {
        if d > 0.1 {
            Self::Poor
        } else if d > 0.05 {
            Self::Fair
        } else {
            Self::Good
        }
    }
}

impl std::fmt::Display for Convergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Poor => write!(f, "Poor"),
            Self::Fair => write!(f, "Fair"),
            Self::Good => write!(f, "Good"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Kernel density estimate
// ═══════════════════════════════════════════════════════════════════════════════

/// Gaussian kernel density estimate with Scott's-rule bandwidth.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    points: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Fit to `samples`. Fails for fewer than two points, non-finite values, or
    /// a sample set with no spread.
    pub fn fit(samples: &[f64]) -> Result<Self, KdeError> {
        let n = samples.len();
        if n < 2 {
            return Err(KdeError::TooFewSamples(n));
        }
        if samples.iter().any(|x| !x.is_finite()) {
            return Err(KdeError::NonFinite);
        }
        let std_dev = samples.iter().std_dev();
        let bandwidth = std_dev * (n as f64).powf(-0.2);
        if !(bandwidth > 0.0) || !bandwidth.is_finite() {
            return Err(KdeError::SingularBandwidth);
        }
        Ok(Self {
            points: samples.to_vec(),
            bandwidth,
        })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let norm = 1.0 / (self.points.len() as f64 * h * (2.0 * std::f64::consts::PI).sqrt());
        let sum: f64 = self
            .points
            .iter()
            .map(|&p| {
                let z = (x - p) / h;
                (-0.5 * z * z).exp()
            })
            .sum();
        norm * sum
    }

    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Correlation and intervals
// ═══════════════════════════════════════════════════════════════════════════════

/// Pearson correlation coefficient. `None` for mismatched lengths, fewer than
/// two pairs, or a constant series.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let sx = x.iter().std_dev();
    let sy = y.iter().std_dev();
    if !(sx > 0.0 && sy > 0.0) {
        return None;
    }
    let r = x.iter().covariance(y.iter()) / (sx * sy);
    Some(r.clamp(-1.0, 1.0))
}

/// Least-squares line `y = slope * x + intercept`. `None` when `x` has no
/// spread or the lengths disagree.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let var_x = x.iter().variance();
    if !(var_x > 0.0) {
        return None;
    }
    let slope = x.iter().covariance(y.iter()) / var_x;
    let intercept = y.iter().mean() - slope * x.iter().mean();
    Some((slope, intercept))
}

/// Two-sided Student-t confidence interval for a mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub level: f64,
    pub lower: f64,
    pub upper: f64,
    pub margin: f64,
}

pub fn mean_confidence_interval(
    desc: &Descriptive,
    level: f64,
) -> Result<ConfidenceInterval, StatsError> {
    if !(level > 0.0 && level < 1.0) {
        return Err(StatsError::InvalidLevel(level));
    }
    if desc.n < 2 {
        return Err(StatsError::Insufficient {
            needed: 2,
            got: desc.n,
        });
    }
    let t = StudentsT::new(0.0, 1.0, (desc.n - 1) as f64).map_err(|_| {
        StatsError::Insufficient {
            needed: 2,
            got: desc.n,
        }
    })?;
    let alpha = 1.0 - level;
    let t_critical = t.inverse_cdf(1.0 - alpha / 2.0);
    let margin = t_critical * desc.std_dev / (desc.n as f64).sqrt();
    Ok(ConfidenceInterval {
        level,
        lower: desc.mean - margin,
        upper: desc.mean + margin,
        margin,
    })
}
