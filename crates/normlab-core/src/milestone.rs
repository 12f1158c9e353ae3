//! Progress checkpoints shown as one-off annotations.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Milestone {
    Start,
    Quarter,
    Half,
    ThreeQuarters,
    Complete,
}

impl Milestone {
    pub const ALL: [Milestone; 5] = [
        Self::Start,
        Self::Quarter,
        Self::Half,
        Self::ThreeQuarters,
        Self::Complete,
    ];

    /// Progress checkpoints in the order they are checked.
    const CHECKPOINTS: [Milestone; 3] = [Self::Quarter, Self::Half, Self::ThreeQuarters];

    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "Starting: small sample, high variability",
            Self::Quarter => "25% complete: shape emerging",
            Self::Half => "50% complete: distribution stabilizing",
            Self::ThreeQuarters => "75% complete: converging to theory",
            Self::Complete => "Complete: law of large numbers demonstrated",
        }
    }

    /// Fraction of `max_count` at which the checkpoint sits.
    pub fn fraction(self) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Quarter => 0.25,
            Self::Half => 0.5,
            Self::ThreeQuarters => 0.75,
            Self::Complete => 1.0,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Start => 0,
            Self::Quarter => 1,
            Self::Half => 2,
            Self::ThreeQuarters => 3,
            Self::Complete => 4,
        }
    }
}

/// Fires each milestone at most once per run.
#[derive(Debug, Clone, Default)]
pub struct MilestoneTracker {
    fired: [bool; 5],
}

impl MilestoneTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milestone reached by tick `tick` (0-based), which left `len` samples out
    /// of `max`. A checkpoint at fraction p fires while `len` is in
    /// `[p * max, p * max + batch)`. At most one milestone per tick.
    pub fn observe(&mut self, tick: u64, len: usize, max: usize, batch: usize) -> Option<Milestone> {
        let candidate = self.candidate(tick, len, max, batch)?;
        if self.fired[candidate.index()] {
            return None;
        }
        self.fired[candidate.index()] = true;
        Some(candidate)
    }

    fn candidate(&self, tick: u64, len: usize, max: usize, batch: usize) -> Option<Milestone> {
        if tick == 0 {
            return Some(Milestone::Start);
        }
        if len >= max {
            return Some(Milestone::Complete);
        }
        let lenf = len as f64;
        Milestone::CHECKPOINTS.into_iter().find(|m| {
            let at = m.fraction() * max as f64;
            lenf >= at && lenf < at + batch as f64 && !self.fired[m.index()]
        })
    }

    pub fn has_fired(&self, m: Milestone) -> bool {
        self.fired[m.index()]
    }
}
