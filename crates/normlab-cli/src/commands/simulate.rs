use normlab_core::{
    ExportOutcome, Frame, FrameRecorder, RunConfig, Simulation, StatisticsSnapshot, TickReport,
    report,
};
use serde_json::Value;

use super::RunArgs;

pub struct SimulateCommandConfig<'a> {
    pub run: &'a RunArgs,
    pub output_path: Option<&'a str>,
    pub quiet: bool,
}

pub fn run(cmd: SimulateCommandConfig<'_>) {
    let config = super::config_or_exit(cmd.run);

    if !cmd.quiet {
        for line in report::banner_lines(&config) {
            println!("{line}");
        }
    }

    let mut sim = match Simulation::new(config.clone()) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Cannot start simulation: {e}");
            std::process::exit(1);
        }
    };

    let mut recorder = FrameRecorder::to_gif(&config);
    if let Some(msg) = recorder.failure() {
        eprintln!("Animation export unavailable: {msg}");
    }

    let initial = match sim.snapshot() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Cannot compute statistics: {e}");
            std::process::exit(1);
        }
    };
    recorder.record(&Frame {
        charts: &sim.charts(),
        stats: &initial,
        milestone: None,
        max_count: config.max_count,
    });
    if !cmd.quiet {
        println!(
            "Initial samples: {}  mean={:.4}  std={:.4}  D={:.4}\n",
            initial.n, initial.mean, initial.std_dev, initial.ks_statistic
        );
    }

    let mut history = Vec::new();
    let outcome = sim.run_to_completion(|r| {
        recorder.record(&Frame::from_tick(r, config.max_count));
        history.push(history_entry(r));
        if !cmd.quiet {
            println!(
                "  tick {:>3}  {:<20} mean={:+.4}  std={:.4}  D={:.4}  p={:.4}  [{}]",
                r.index + 1,
                report::progress_label(r.len, config.max_count),
                r.stats.mean,
                r.stats.std_dev,
                r.stats.ks_statistic,
                r.stats.ks_p_value,
                r.stats.convergence,
            );
            if let Some(m) = r.milestone {
                println!("         ▸ {}", m.label());
            }
        }
    });
    if let Err(e) = outcome {
        eprintln!("Simulation failed: {e}");
        std::process::exit(1);
    }

    let final_stats = match sim.snapshot() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Cannot compute statistics: {e}");
            std::process::exit(1);
        }
    };

    println!();
    for line in report::final_report_lines(&final_stats) {
        println!("{line}");
    }

    match recorder.finish() {
        ExportOutcome::Disabled => {}
        ExportOutcome::Saved { path, frames } => {
            println!("\n🎞  Animation saved to {} ({frames} frames)", path.display());
        }
        ExportOutcome::Failed(msg) => eprintln!("\nCould not save animation: {msg}"),
    }

    if let Some(path) = cmd.output_path {
        let json = results_json(&config, sim.ticks(), &final_stats, history);
        match serde_json::to_string_pretty(&json) {
            Ok(contents) => match std::fs::write(path, contents) {
                Ok(()) => println!("\n📄 Results saved to: {path}"),
                Err(e) => eprintln!("Failed to write results to {path}: {e}"),
            },
            Err(e) => eprintln!("Failed to serialize results: {e}"),
        }
    }
}

/// One row of the per-tick history in the results file.
fn history_entry(r: &TickReport) -> Value {
    serde_json::json!({
        "tick": r.index,
        "added": r.added,
        "n": r.len,
        "mean": r.stats.mean,
        "std_dev": r.stats.std_dev,
        "ks_statistic": r.stats.ks_statistic,
        "ks_p_value": r.stats.ks_p_value,
        "milestone": r.milestone.map(|m| m.label()),
    })
}

/// The document written by `--output`. Infinite SNR/PAPR serialize as `null`.
fn results_json(
    config: &RunConfig,
    ticks: u64,
    final_stats: &StatisticsSnapshot,
    history: Vec<Value>,
) -> Value {
    serde_json::json!({
        "version": normlab_core::VERSION,
        "config": config,
        "ticks": ticks,
        "final": final_stats,
        "assessment": final_stats.assess(),
        "history": history,
    })
}
