//! Chart data for the four panels.
//!
//! Each builder is a deterministic function of the sample sequence (plus the
//! target distribution). Renderers, the terminal dashboard and the GIF
//! exporter alike, only ever read these structs.

use normlab_stats::{
    GaussianKde, TargetNormal, interp, linear_fit, linspace, order_statistic_medians, pearson,
    sorted,
};
use serde::{Deserialize, Serialize};

/// Resolution of the theoretical curves.
pub const CURVE_POINTS: usize = 200;

/// The smoothed density is only attempted above this many samples.
pub const KDE_MIN_SAMPLES: usize = 10;

/// Q-Q R^2 needs more than this many samples.
pub const R_SQUARED_MIN_SAMPLES: usize = 3;

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub left: f64,
    pub right: f64,
    /// Count divided by `n * width`, so the bars integrate to 1.
    pub density: f64,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        0.5 * (self.left + self.right)
    }
}

/// Histogram panel: density bars, the theoretical pdf, and the smoothed
/// empirical density when it could be computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramChart {
    pub bins: Vec<HistogramBin>,
    /// Absent for a zero-variance target, which has no density.
    pub theoretical: Option<Vec<(f64, f64)>>,
    /// Absent when there are too few samples or the estimate failed.
    pub smoothed: Option<Vec<(f64, f64)>>,
}

/// How many histogram bins to use for `n` samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinRule {
    /// `n / 10`, at most 50 and at least 1.
    #[default]
    Tenth,
    /// `n / 20` clamped to `[10, 50]`.
    Twentieth,
}

impl BinRule {
    pub fn bin_count(self, n: usize) -> usize {
        match self {
            Self::Tenth => (n / 10).clamp(1, 50),
            Self::Twentieth => (n / 20).clamp(10, 50),
        }
    }
}

/// Equal-width density histogram over `[min, max]`. The last bin is closed on
/// the right. A sample set with no spread is binned over `[v - 0.5, v + 0.5]`.
pub fn density_histogram(samples: &[f64], bins: usize) -> Vec<HistogramBin> {
    if samples.is_empty() || bins == 0 {
        return vec![];
    }
    let (mut lo, mut hi) = min_max(samples);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &x in samples {
        let idx = (((x - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let scale = 1.0 / (samples.len() as f64 * width);
    counts
        .iter()
        .enumerate()
        .map(|(i, &c)| HistogramBin {
            left: lo + width * i as f64,
            right: if i == bins - 1 {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            density: c as f64 * scale,
        })
        .collect()
}

/// Kernel-smoothed density over `xs`, or `None` if the estimate cannot be
/// formed for this sample set.
pub fn smoothed_density(samples: &[f64], xs: &[f64]) -> Option<Vec<(f64, f64)>> {
    if samples.len() <= KDE_MIN_SAMPLES {
        return None;
    }
    match GaussianKde::fit(samples) {
        Ok(kde) => Some(xs.iter().map(|&x| (x, kde.evaluate(x))).collect()),
        Err(e) => {
            log::debug!("smoothed density skipped: {e}");
            None
        }
    }
}

impl HistogramChart {
    pub fn build(samples: &[f64], bins: BinRule, target: &TargetNormal) -> Self {
        if samples.is_empty() {
            return Self {
                bins: vec![],
                theoretical: None,
                smoothed: None,
            };
        }
        let (lo, hi) = min_max(samples);
        let pad = 0.5 * target.std_dev();
        let xs = linspace(lo - pad, hi + pad, CURVE_POINTS);
        let theoretical = if target.is_degenerate() {
            None
        } else {
            xs.iter()
                .map(|&x| target.pdf(x).map(|y| (x, y)))
                .collect::<Option<Vec<_>>>()
        };
        Self {
            bins: density_histogram(samples, bins.bin_count(samples.len())),
            theoretical,
            smoothed: smoothed_density(samples, &xs),
        }
    }

    pub fn x_bounds(&self) -> (f64, f64) {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        if let (Some(first), Some(last)) = (self.bins.first(), self.bins.last()) {
            lo = first.left;
            hi = last.right;
        }
        for &(x, _) in self.theoretical.iter().chain(self.smoothed.iter()).flatten() {
            lo = lo.min(x);
            hi = hi.max(x);
        }
        finite_bounds(lo, hi)
    }

    pub fn y_max(&self) -> f64 {
        let bars = self.bins.iter().map(|b| b.density);
        let curves = self
            .theoretical
            .iter()
            .chain(self.smoothed.iter())
            .flatten()
            .map(|&(_, y)| y);
        bars.chain(curves).fold(0.0, f64::max).max(f64::EPSILON)
    }
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// Sample index vs value, split into earlier samples and the latest batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesChart {
    pub previous: Vec<(f64, f64)>,
    pub recent: Vec<(f64, f64)>,
    pub mean: f64,
    pub upper: f64,
    pub lower: f64,
}

impl TimeSeriesChart {
    /// `recent` is the number of trailing samples to highlight.
    pub fn build(samples: &[f64], recent: usize, target: &TargetNormal) -> Self {
        let split = samples.len().saturating_sub(recent);
        let indexed = |offset: usize, xs: &[f64]| -> Vec<(f64, f64)> {
            xs.iter()
                .enumerate()
                .map(|(i, &v)| ((offset + i) as f64, v))
                .collect()
        };
        Self {
            previous: indexed(0, &samples[..split]),
            recent: indexed(split, &samples[split..]),
            mean: target.mean(),
            upper: target.mean() + target.std_dev(),
            lower: target.mean() - target.std_dev(),
        }
    }

    pub fn len(&self) -> usize {
        self.previous.len() + self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn y_bounds(&self) -> (f64, f64) {
        let (lo, hi) = self
            .previous
            .iter()
            .chain(self.recent.iter())
            .map(|&(_, y)| y)
            .chain([self.lower, self.upper])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
                (lo.min(y), hi.max(y))
            });
        finite_bounds(lo, hi)
    }
}

// ---------------------------------------------------------------------------
// Q-Q
// ---------------------------------------------------------------------------

/// Sorted samples against normal quantiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QqChart {
    /// `(theoretical quantile, ordered sample)`.
    pub points: Vec<(f64, f64)>,
    /// Least-squares `(slope, intercept)` through the points.
    pub fit: Option<(f64, f64)>,
    /// Squared correlation of the ordered samples with quantiles at evenly
    /// spaced probabilities in `[0.01, 0.99]`.
    pub r_squared: Option<f64>,
}

impl QqChart {
    pub fn build(samples: &[f64], target: &TargetNormal) -> Self {
        let ordered = sorted(samples);
        let n = ordered.len();
        let theoretical: Vec<f64> = order_statistic_medians(n)
            .iter()
            .map(|&p| target.quantile(p))
            .collect();
        let r_squared = if n > R_SQUARED_MIN_SAMPLES {
            let even: Vec<f64> = linspace(0.01, 0.99, n)
                .iter()
                .map(|&p| target.quantile(p))
                .collect();
            pearson(&even, &ordered).map(|r| r * r)
        } else {
            None
        };
        Self {
            fit: linear_fit(&theoretical, &ordered),
            points: theoretical.into_iter().zip(ordered).collect(),
            r_squared,
        }
    }

    /// Endpoints of the fit line across the plotted quantile range.
    pub fn fit_line(&self) -> Option<[(f64, f64); 2]> {
        let (slope, intercept) = self.fit?;
        let first = self.points.first()?.0;
        let last = self.points.last()?.0;
        Some([
            (first, slope * first + intercept),
            (last, slope * last + intercept),
        ])
    }

    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let (x_lo, x_hi, y_lo, y_hi) = self.points.iter().fold(
            (
                f64::INFINITY,
                f64::NEG_INFINITY,
                f64::INFINITY,
                f64::NEG_INFINITY,
            ),
            |(a, b, c, d), &(x, y)| (a.min(x), b.max(x), c.min(y), d.max(y)),
        );
        (finite_bounds(x_lo, x_hi), finite_bounds(y_lo, y_hi))
    }
}

// ---------------------------------------------------------------------------
// CDF
// ---------------------------------------------------------------------------

/// Empirical step CDF, theoretical CDF, and the gap between them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CdfChart {
    /// `(x_(i), i / n)` for the ordered samples, i = 1..=n.
    pub empirical: Vec<(f64, f64)>,
    pub theoretical: Vec<(f64, f64)>,
    /// `(x, interpolated empirical, theoretical)` on the theoretical grid.
    pub gap: Vec<(f64, f64, f64)>,
}

impl CdfChart {
    pub fn build(samples: &[f64], target: &TargetNormal) -> Self {
        let ordered = sorted(samples);
        let n = ordered.len();
        if n == 0 {
            return Self {
                empirical: vec![],
                theoretical: vec![],
                gap: vec![],
            };
        }
        let steps: Vec<f64> = (1..=n).map(|i| i as f64 / n as f64).collect();
        let xs = linspace(ordered[0], ordered[n - 1], CURVE_POINTS);
        let theoretical: Vec<(f64, f64)> = xs.iter().map(|&x| (x, target.cdf(x))).collect();
        let gap = theoretical
            .iter()
            .map(|&(x, f)| (x, interp(x, &ordered, &steps), f))
            .collect();
        Self {
            empirical: ordered.iter().copied().zip(steps).collect(),
            theoretical,
            gap,
        }
    }

    /// Largest vertical distance between the interpolated empirical curve and
    /// the theoretical one on the plotting grid.
    pub fn max_gap(&self) -> f64 {
        self.gap
            .iter()
            .map(|&(_, e, t)| (e - t).abs())
            .fold(0.0, f64::max)
    }

    pub fn x_bounds(&self) -> (f64, f64) {
        match (self.empirical.first(), self.empirical.last()) {
            (Some(&(lo, _)), Some(&(hi, _))) => finite_bounds(lo, hi),
            _ => (0.0, 1.0),
        }
    }
}

// ---------------------------------------------------------------------------
// All four
// ---------------------------------------------------------------------------

/// The four panels for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub histogram: HistogramChart,
    pub time_series: TimeSeriesChart,
    pub qq: QqChart,
    pub cdf: CdfChart,
}

impl ChartSet {
    pub fn build(samples: &[f64], recent: usize, bins: BinRule, target: &TargetNormal) -> Self {
        Self {
            histogram: HistogramChart::build(samples, bins, target),
            time_series: TimeSeriesChart::build(samples, recent, target),
            qq: QqChart::build(samples, target),
            cdf: CdfChart::build(samples, target),
        }
    }
}

fn min_max(samples: &[f64]) -> (f64, f64) {
    samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        })
}

/// Widen a degenerate or empty range so axes always have extent.
fn finite_bounds(lo: f64, hi: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}
