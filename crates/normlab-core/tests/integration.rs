//! Integration tests for normlab-core.
//!
//! These drive whole runs through the public API:
//! config → simulation → per-tick snapshot and charts → export → final report.

use normlab_core::{
    ExportOutcome, Frame, FrameRecorder, Milestone, Preset, RunConfig, Simulation,
    StatisticsSnapshot, Tick, report,
};

fn classroom() -> RunConfig {
    RunConfig {
        mean: 0.0,
        std_dev: 1.0,
        initial_count: 50,
        max_count: 200,
        batch_size: 25,
        seed: 42,
        ..RunConfig::default()
    }
}

#[test]
fn classroom_run_takes_six_ticks() {
    let cfg = classroom();
    assert_eq!(cfg.tick_count(), 6);
    let mut sim = Simulation::new(cfg).unwrap();
    let mut milestones = Vec::new();
    let ticks = sim
        .run_to_completion(|r| milestones.extend(r.milestone))
        .unwrap();
    assert_eq!(ticks, 6);
    assert_eq!(sim.len(), 200);
    let stats = sim.snapshot().unwrap();
    assert!(stats.mean.abs() < 0.3, "mean drifted to {}", stats.mean);
    assert_eq!(milestones.first(), Some(&Milestone::Start));
    assert_eq!(milestones.last(), Some(&Milestone::Complete));
}

#[test]
fn max_equal_to_initial_completes_immediately() {
    let mut sim = Simulation::new(RunConfig {
        initial_count: 80,
        max_count: 80,
        ..classroom()
    })
    .unwrap();
    assert!(sim.is_complete());
    assert!(matches!(sim.advance().unwrap(), Tick::Complete));
    assert_eq!(sim.run_to_completion(|_| {}).unwrap(), 0);
    assert_eq!(sim.len(), 80);
}

#[test]
fn length_never_exceeds_max() {
    let cfg = RunConfig {
        initial_count: 7,
        max_count: 101,
        batch_size: 13,
        ..classroom()
    };
    let mut sim = Simulation::new(cfg.clone()).unwrap();
    let mut k = 0;
    while let Tick::Advanced(r) = sim.advance().unwrap() {
        k += 1;
        assert_eq!(r.len, (cfg.initial_count + k * cfg.batch_size).min(cfg.max_count));
        assert!(r.len <= cfg.max_count);
    }
    assert_eq!(k as u64, cfg.tick_count());
}

#[test]
fn same_seed_same_run() {
    let mut a = Simulation::new(classroom()).unwrap();
    let mut b = Simulation::new(classroom()).unwrap();
    assert_eq!(a.samples(), b.samples());
    loop {
        match (a.advance().unwrap(), b.advance().unwrap()) {
            (Tick::Advanced(ra), Tick::Advanced(rb)) => {
                assert_eq!(a.samples(), b.samples());
                assert_eq!(ra.stats, rb.stats);
                assert_eq!(ra.charts, rb.charts);
            }
            (Tick::Complete, Tick::Complete) => break,
            _ => panic!("runs diverged"),
        }
    }
}

#[test]
fn snapshot_is_repeatable() {
    let mut sim = Simulation::new(classroom()).unwrap();
    sim.advance().unwrap();
    let first = sim.snapshot().unwrap();
    let second = sim.snapshot().unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first,
        StatisticsSnapshot::compute(sim.samples(), sim.target()).unwrap()
    );
}

#[test]
fn zero_std_dev_run_uses_sentinels() {
    let mut sim = Simulation::new(RunConfig {
        mean: 1.5,
        std_dev: 0.0,
        ..classroom()
    })
    .unwrap();
    let mut last = None;
    sim.run_to_completion(|r| last = Some(r.stats.clone()))
        .unwrap();
    let stats = last.unwrap();
    assert_eq!(stats.std_dev, 0.0);
    assert_eq!(stats.snr_db, f64::INFINITY);
    assert!(stats.papr_db == 0.0 || stats.papr_db.is_infinite());
    assert!(sim.charts().histogram.theoretical.is_none());
    assert!(sim.charts().histogram.smoothed.is_none());
}

#[test]
fn ks_statistic_shrinks_with_sample_size() {
    let mean_d = |n: usize| -> f64 {
        let total: f64 = (0..20u64)
            .map(|seed| {
                let sim = Simulation::new(RunConfig {
                    initial_count: n,
                    max_count: n,
                    seed,
                    ..classroom()
                })
                .unwrap();
                sim.snapshot().unwrap().ks_statistic
            })
            .sum();
        total / 20.0
    };
    let small = mean_d(50);
    let large = mean_d(2000);
    assert!(large < small, "D(2000)={large} not below D(50)={small}");
}

#[test]
fn failed_export_leaves_run_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = RunConfig {
        save_animation: true,
        save_path: dir.path().join("missing").join("out.gif"),
        frame_width: 120,
        frame_height: 90,
        ..classroom()
    };

    let mut exported = Simulation::new(cfg.clone()).unwrap();
    let mut recorder = FrameRecorder::to_gif(&cfg);
    exported
        .run_to_completion(|r| recorder.record(&Frame::from_tick(r, cfg.max_count)))
        .unwrap();
    assert!(matches!(recorder.finish(), ExportOutcome::Failed(_)));

    let mut plain = Simulation::new(RunConfig {
        save_animation: false,
        ..cfg
    })
    .unwrap();
    plain.run_to_completion(|_| {}).unwrap();

    assert_eq!(exported.samples(), plain.samples());
    assert_eq!(exported.snapshot().unwrap(), plain.snapshot().unwrap());
}

#[test]
fn notebook_preset_runs_to_completion() {
    let cfg = Preset::Notebook.config();
    let mut sim = Simulation::new(cfg.clone()).unwrap();
    let ticks = sim.run_to_completion(|_| {}).unwrap();
    assert_eq!(ticks, cfg.tick_count());
    assert_eq!(sim.len(), 1500);
    let text = report::final_report_lines(&sim.snapshot().unwrap()).join("\n");
    assert!(text.contains("Final sample size:    1500"));
}
