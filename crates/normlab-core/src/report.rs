//! Plain-text readouts: start-up banner, per-tick statistics, final report.
//!
//! Everything here returns lines rather than printing, so the terminal
//! dashboard, the headless runner and tests share one formatting path.

use crate::config::RunConfig;
use crate::snapshot::StatisticsSnapshot;

const RULE_WIDTH: usize = 60;

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Parameters, sample progression, planned ticks and approximate duration.
pub fn banner_lines(config: &RunConfig) -> Vec<String> {
    vec![
        rule(),
        format!("normlab {}: normal sampling animation", crate::VERSION),
        rule(),
        format!(
            "Distribution:       N(mu={}, sigma^2={})",
            config.mean,
            config.std_dev * config.std_dev
        ),
        format!(
            "Sample progression: {} -> {} (batch: {})",
            config.initial_count, config.max_count, config.batch_size
        ),
        format!("Seed:               {}", config.seed),
        format!(
            "Ticks:              {} at {} ms (~{:.1} s)",
            config.tick_count(),
            config.interval_ms,
            config.estimated_duration().as_secs_f64()
        ),
        rule(),
    ]
}

/// The statistics readout shown beside the charts.
pub fn stats_lines(s: &StatisticsSnapshot) -> Vec<String> {
    let mut lines = vec![
        format!("Sample size:  {}", s.n),
        format!(
            "Mean:     {:8.4}  (theory {:8.4})  err {:.4}",
            s.mean, s.theoretical_mean, s.mean_error
        ),
        format!(
            "Variance: {:8.4}  (theory {:8.4})  err {:.4}",
            s.variance, s.theoretical_variance, s.variance_error
        ),
        format!("Std dev:  {:8.4}", s.std_dev),
    ];
    if let Some(ci) = &s.confidence {
        lines.push(format!(
            "{:.0}% CI:   [{:.4}, {:.4}]  (+/- {:.4})",
            ci.level * 100.0,
            ci.lower,
            ci.upper,
            ci.margin
        ));
    }
    lines.push(format!(
        "KS test:  D={:.4}  p={:.4}",
        s.ks_statistic, s.ks_p_value
    ));
    lines.push(format!("Convergence: {}", s.convergence));
    lines.push(format!(
        "SNR: {} dB   PAPR: {} dB",
        decibels(s.snr_db),
        decibels(s.papr_db)
    ));
    lines
}

/// Verdicts after the last tick.
pub fn final_report_lines(s: &StatisticsSnapshot) -> Vec<String> {
    let a = s.assess();
    vec![
        rule(),
        "FINAL ANALYSIS REPORT".to_string(),
        rule(),
        format!("Final sample size:    {}", s.n),
        format!("Mean convergence:     {:.6} (target: 0)", s.mean_error),
        format!("Variance convergence: {:.6} (target: 0)", s.variance_error),
        format!("KS test statistic:    {:.6}", s.ks_statistic),
        format!("KS test p-value:      {:.6}", s.ks_p_value),
        format!(
            "Distribution fit:     {}",
            if a.fits_target {
                "PASS (consistent with the target normal)"
            } else {
                "FAIL (deviates from the target normal)"
            }
        ),
        format!("Mean estimate:        {}", a.mean),
        format!("Variance estimate:    {}", a.variance),
        rule(),
    ]
}

/// `"1250/2000 (62.5%)"`.
pub fn progress_label(len: usize, max: usize) -> String {
    let pct = if max == 0 {
        100.0
    } else {
        len as f64 / max as f64 * 100.0
    };
    format!("{len}/{max} ({pct:.1}%)")
}

fn decibels(v: f64) -> String {
    if v.is_infinite() {
        if v > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{v:.2}")
    }
}
