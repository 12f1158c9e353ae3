//! The sampling loop.
//!
//! [`Simulation`] owns the growing sample sequence. Hosts (the terminal
//! dashboard's timer, the headless runner, tests) call
//! [`Simulation::advance`] once per tick until it reports [`Tick::Complete`].

use normlab_stats::{StatsError, TargetNormal};
use thiserror::Error;

use crate::charts::ChartSet;
use crate::config::{ConfigError, RunConfig};
use crate::milestone::{Milestone, MilestoneTracker};
use crate::sampler::Sampler;
use crate::snapshot::StatisticsSnapshot;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("statistics unavailable: {0}")]
    Stats(#[from] StatsError),
    #[error("cannot sample from the target distribution: {0}")]
    Sampling(String),
}

/// Outcome of one [`Simulation::advance`] call.
#[derive(Debug, Clone)]
pub enum Tick {
    /// New samples were appended and everything was recomputed.
    Advanced(Box<TickReport>),
    /// The sequence is already at `max_count`; nothing was sampled.
    Complete,
}

/// What a single tick produced.
#[derive(Debug, Clone)]
pub struct TickReport {
    /// 0-based tick index.
    pub index: u64,
    /// Samples appended this tick (`batch_size`, or fewer on the last tick).
    pub added: usize,
    /// Sequence length after the tick.
    pub len: usize,
    /// `len / max_count`.
    pub progress: f64,
    pub stats: StatisticsSnapshot,
    pub charts: ChartSet,
    pub milestone: Option<Milestone>,
}

/// Growing normal sample plus the state needed to extend it.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: RunConfig,
    target: TargetNormal,
    sampler: Sampler,
    samples: Vec<f64>,
    ticks: u64,
    last_added: usize,
    milestones: MilestoneTracker,
}

impl Simulation {
    /// Validate `config`, seed the generator and draw the initial batch.
    pub fn new(config: RunConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let target = config.target()?;
        let mut sampler = Sampler::new(config.mean, config.std_dev, config.seed)?;
        // Grows one batch at a time; `max_count` is only a bound.
        let samples = sampler.draw(config.initial_count);
        log::info!(
            "simulation ready: N({}, {}^2), {} -> {} samples in batches of {} (seed {})",
            config.mean,
            config.std_dev,
            config.initial_count,
            config.max_count,
            config.batch_size,
            config.seed
        );
        Ok(Self {
            last_added: samples.len().min(config.batch_size),
            config,
            target,
            sampler,
            samples,
            ticks: 0,
            milestones: MilestoneTracker::new(),
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn target(&self) -> &TargetNormal {
        &self.target
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sampling ticks performed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn remaining(&self) -> usize {
        self.config.max_count.saturating_sub(self.samples.len())
    }

    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    pub fn progress(&self) -> f64 {
        if self.config.max_count == 0 {
            return 1.0;
        }
        self.samples.len() as f64 / self.config.max_count as f64
    }

    /// Statistics over the current sequence.
    pub fn snapshot(&self) -> Result<StatisticsSnapshot, SimulationError> {
        Ok(StatisticsSnapshot::compute(&self.samples, &self.target)?)
    }

    /// Chart data for the current sequence, highlighting the latest batch.
    pub fn charts(&self) -> ChartSet {
        ChartSet::build(&self.samples, self.last_added, self.config.bin_rule, &self.target)
    }

    /// Append one batch and recompute statistics and charts.
    pub fn advance(&mut self) -> Result<Tick, SimulationError> {
        let remaining = self.remaining();
        if remaining == 0 {
            return Ok(Tick::Complete);
        }
        let added = remaining.min(self.config.batch_size);
        self.sampler.draw_into(&mut self.samples, added);
        self.last_added = added;

        let index = self.ticks;
        self.ticks += 1;

        let stats = self.snapshot()?;
        let charts = self.charts();
        let milestone = self.milestones.observe(
            index,
            self.samples.len(),
            self.config.max_count,
            self.config.batch_size,
        );
        log::debug!(
            "tick {index}: +{added} -> n={} D={:.4} p={:.4}",
            self.samples.len(),
            stats.ks_statistic,
            stats.ks_p_value
        );
        if let Some(m) = milestone {
            log::info!("milestone: {}", m.label());
        }

        Ok(Tick::Advanced(Box::new(TickReport {
            index,
            added,
            len: self.samples.len(),
            progress: self.progress(),
            stats,
            charts,
            milestone,
        })))
    }

    /// Drive `advance` until complete, handing each report to `on_tick`.
    /// Returns the number of ticks performed.
    pub fn run_to_completion<F>(&mut self, mut on_tick: F) -> Result<u64, SimulationError>
    where
        F: FnMut(&TickReport),
    {
        let start = self.ticks;
        while let Tick::Advanced(report) = self.advance()? {
            on_tick(&report);
        }
        log::info!(
            "simulation complete: {} samples after {} ticks",
            self.samples.len(),
            self.ticks
        );
        Ok(self.ticks - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> RunConfig {
        RunConfig {
            initial_count: 50,
            max_count: 200,
            batch_size: 25,
            seed: 42,
            ..RunConfig::default()
        }
    }

    #[test]
    fn new_draws_initial_batch() {
        let sim = Simulation::new(small()).unwrap();
        assert_eq!(sim.len(), 50);
        assert_eq!(sim.ticks(), 0);
        assert!((sim.progress() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn huge_max_count_does_not_preallocate() {
        let mut sim = Simulation::new(RunConfig {
            max_count: usize::MAX / 4,
            ..small()
        })
        .unwrap();
        assert_eq!(sim.len(), 50);
        assert!(sim.progress() < 1e-9);
        match sim.advance().unwrap() {
            Tick::Advanced(r) => assert_eq!(r.len, 75),
            Tick::Complete => panic!("a huge run cannot be complete"),
        }
        assert!(!sim.is_complete());
    }

    #[test]
    fn histogram_bins_follow_config_rule() {
        let script = Simulation::new(small()).unwrap();
        assert_eq!(script.charts().histogram.bins.len(), 5);
        let notebook = Simulation::new(RunConfig {
            bin_rule: crate::charts::BinRule::Twentieth,
            ..small()
        })
        .unwrap();
        assert_eq!(notebook.charts().histogram.bins.len(), 10);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let err = Simulation::new(RunConfig {
            batch_size: 0,
            ..small()
        })
        .unwrap_err();
        assert!(matches!(err, SimulationError::Config(ConfigError::ZeroBatch)));
    }

    #[test]
    fn length_follows_batch_formula() {
        let cfg = small();
        let mut sim = Simulation::new(cfg.clone()).unwrap();
        for k in 1..=cfg.tick_count() as usize {
            let before = sim.len();
            match sim.advance().unwrap() {
                Tick::Advanced(r) => {
                    assert_eq!(r.len, (cfg.initial_count + k * cfg.batch_size).min(cfg.max_count));
                    assert!(r.len >= before);
                    assert_eq!(r.added, r.len - before);
                    assert_eq!(r.index, (k - 1) as u64);
                }
                Tick::Complete => panic!("completed early at tick {k}"),
            }
        }
        assert!(sim.is_complete());
        assert!(matches!(sim.advance().unwrap(), Tick::Complete));
        assert_eq!(sim.len(), cfg.max_count);
    }

    #[test]
    fn last_tick_is_partial() {
        let mut sim = Simulation::new(RunConfig {
            max_count: 110,
            ..small()
        })
        .unwrap();
        let mut added = vec![];
        sim.run_to_completion(|r| added.push(r.added)).unwrap();
        assert_eq!(added, vec![25, 25, 10]);
        assert_eq!(sim.len(), 110);
    }

    #[test]
    fn complete_does_not_sample() {
        let mut sim = Simulation::new(RunConfig {
            max_count: 50,
            ..small()
        })
        .unwrap();
        let before = sim.samples().to_vec();
        assert!(matches!(sim.advance().unwrap(), Tick::Complete));
        assert_eq!(sim.samples(), before.as_slice());
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn time_series_highlights_latest_batch() {
        let mut sim = Simulation::new(RunConfig {
            max_count: 110,
            ..small()
        })
        .unwrap();
        let mut last = None;
        sim.run_to_completion(|r| last = Some(r.charts.time_series.recent.len()))
            .unwrap();
        assert_eq!(last, Some(10));
        assert_eq!(sim.charts().time_series.recent.len(), 10);
    }

    #[test]
    fn samples_are_append_only() {
        let mut sim = Simulation::new(small()).unwrap();
        let mut prefix = sim.samples().to_vec();
        while let Tick::Advanced(_) = sim.advance().unwrap() {
            assert_eq!(&sim.samples()[..prefix.len()], prefix.as_slice());
            prefix = sim.samples().to_vec();
        }
    }

    #[test]
    fn progress_reaches_one() {
        let mut sim = Simulation::new(small()).unwrap();
        let mut last = 0.0;
        sim.run_to_completion(|r| {
            assert!(r.progress >= last);
            last = r.progress;
        })
        .unwrap();
        assert_eq!(last, 1.0);
    }
}
