//! TUI application state and event loop.
//!
//! One [`Simulation`] advances on a timer. Each tick replaces the cached
//! statistics and chart data that `ui::draw` reads, and hands a frame to the
//! optional GIF recorder. The run stops sampling at `max_count`; the dashboard
//! stays up until the user quits.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use normlab_core::export::Frame as ExportFrame;
use normlab_core::{
    ChartSet, ExportOutcome, FrameRecorder, Milestone, RunConfig, Simulation, SimulationError,
    StatisticsSnapshot, Tick, report,
};

/// Fastest and slowest tick interval reachable with `+` / `-`.
const MIN_INTERVAL: Duration = Duration::from_millis(20);
const MAX_INTERVAL: Duration = Duration::from_secs(5);

pub struct App {
    sim: Simulation,
    stats: StatisticsSnapshot,
    charts: ChartSet,
    milestone: Option<Milestone>,
    recorder: FrameRecorder,
    export_outcome: Option<ExportOutcome>,
    running: bool,
    paused: bool,
    interval: Duration,
    last_export: Option<PathBuf>,
    status: Option<String>,
}

impl App {
    pub fn new(config: RunConfig) -> Result<Self, SimulationError> {
        let interval = config.interval();
        let mut recorder = FrameRecorder::to_gif(&config);
        let sim = Simulation::new(config)?;
        let stats = sim.snapshot()?;
        let charts = sim.charts();
        recorder.record(&ExportFrame {
            charts: &charts,
            stats: &stats,
            milestone: None,
            max_count: sim.config().max_count,
        });
        let status = recorder
            .failure()
            .map(|msg| format!("Animation export unavailable: {msg}"));
        Ok(Self {
            sim,
            stats,
            charts,
            milestone: None,
            recorder,
            export_outcome: None,
            running: true,
            paused: false,
            interval,
            last_export: None,
            status,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores terminal before printing the panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error.
        let _ = std::panic::take_hook(); // remove our hook
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        // Quitting mid-run still closes whatever was recorded so far.
        self.finish_export();

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let mut last_tick = Instant::now();

        while self.running {
            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(Duration::from_millis(50))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code);
            }

            if last_tick.elapsed() >= self.interval {
                if !self.paused {
                    self.tick();
                }
                last_tick = Instant::now();
            }
        }

        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('p') | KeyCode::Char(' ') => self.paused = !self.paused,
            KeyCode::Char('s') => self.export_snapshot(),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char(']') => {
                self.interval = (self.interval / 2).max(MIN_INTERVAL);
            }
            KeyCode::Char('-') | KeyCode::Char('[') => {
                self.interval = (self.interval * 2).min(MAX_INTERVAL);
            }
            _ => {}
        }
    }

    /// Advance the simulation by one batch and refresh the cached views.
    pub fn tick(&mut self) {
        match self.sim.advance() {
            Ok(Tick::Advanced(r)) => {
                self.recorder
                    .record(&ExportFrame::from_tick(&r, self.sim.config().max_count));
                if r.milestone.is_some() {
                    self.milestone = r.milestone;
                }
                let r = *r;
                self.stats = r.stats;
                self.charts = r.charts;
                if self.sim.is_complete() {
                    self.finish_export();
                }
            }
            Ok(Tick::Complete) => {}
            Err(e) => {
                log::warn!("tick failed: {e}");
                self.status = Some(format!("Tick failed: {e}"));
                self.paused = true;
            }
        }
    }

    fn finish_export(&mut self) {
        if self.export_outcome.is_some() {
            return;
        }
        let outcome = std::mem::take(&mut self.recorder).finish();
        match &outcome {
            ExportOutcome::Disabled => {}
            ExportOutcome::Saved { path, frames } => {
                self.status = Some(format!("Animation saved to {} ({frames} frames)", path.display()));
            }
            ExportOutcome::Failed(msg) => {
                self.status = Some(format!("Could not save animation: {msg}"));
            }
        }
        self.export_outcome = Some(outcome);
    }

    fn export_snapshot(&mut self) {
        let json = serde_json::json!({
            "version": normlab_core::VERSION,
            "config": self.sim.config(),
            "ticks": self.sim.ticks(),
            "progress": self.sim.progress(),
            "statistics": &self.stats,
            "milestone": self.milestone.map(|m| m.label()),
        });

        let epoch = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let path = PathBuf::from(format!("normlab-snapshot-{epoch}.json"));

        let written = serde_json::to_string_pretty(&json)
            .map_err(|e| e.to_string())
            .and_then(|contents| std::fs::write(&path, contents).map_err(|e| e.to_string()));
        match written {
            Ok(()) => {
                self.status = Some(format!("Snapshot saved to {}", path.display()));
                self.last_export = Some(path);
            }
            Err(e) => {
                log::warn!("snapshot export failed: {e}");
                self.status = Some(format!("Snapshot failed: {e}"));
            }
        }
    }

    /// Final report and export outcome, printed once the terminal is restored.
    pub fn print_summary(&self) {
        for line in report::final_report_lines(&self.stats) {
            println!("{line}");
        }
        if !self.sim.is_complete() {
            println!(
                "Stopped early at {}",
                report::progress_label(self.sim.len(), self.sim.config().max_count)
            );
        }
        match &self.export_outcome {
            Some(ExportOutcome::Saved { path, frames }) => {
                println!("🎞  Animation saved to {} ({frames} frames)", path.display());
            }
            Some(ExportOutcome::Failed(msg)) => eprintln!("Could not save animation: {msg}"),
            _ => {}
        }
        if let Some(path) = &self.last_export {
            println!("📄 Last snapshot: {}", path.display());
        }
    }

    // --- Accessors for the renderer ---

    pub fn config(&self) -> &RunConfig {
        self.sim.config()
    }
    pub fn stats(&self) -> &StatisticsSnapshot {
        &self.stats
    }
    pub fn charts(&self) -> &ChartSet {
        &self.charts
    }
    pub fn milestone(&self) -> Option<Milestone> {
        self.milestone
    }
    pub fn progress(&self) -> f64 {
        self.sim.progress()
    }
    pub fn len(&self) -> usize {
        self.sim.len()
    }
    pub fn ticks(&self) -> u64 {
        self.sim.ticks()
    }
    pub fn is_complete(&self) -> bool {
        self.sim.is_complete()
    }
    pub fn is_paused(&self) -> bool {
        self.paused
    }
    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }
    pub fn interval(&self) -> Duration {
        self.interval
    }
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> RunConfig {
        RunConfig {
            initial_count: 50,
            max_count: 125,
            batch_size: 25,
            seed: 42,
            interval_ms: 100,
            ..RunConfig::default()
        }
    }

    #[test]
    fn new_app_shows_initial_sample() {
        let app = App::new(small()).unwrap();
        assert_eq!(app.len(), 50);
        assert_eq!(app.stats().n, 50);
        assert_eq!(app.ticks(), 0);
        assert!(app.milestone().is_none());
        assert!(!app.is_recording());
    }

    #[test]
    fn tick_refreshes_views() {
        let mut app = App::new(small()).unwrap();
        app.tick();
        assert_eq!(app.len(), 75);
        assert_eq!(app.stats().n, 75);
        assert_eq!(app.charts().time_series.recent.len(), 25);
        assert_eq!(app.milestone(), Some(Milestone::Start));
    }

    #[test]
    fn ticks_stop_at_max() {
        let mut app = App::new(small()).unwrap();
        for _ in 0..10 {
            app.tick();
        }
        assert!(app.is_complete());
        assert_eq!(app.len(), 125);
        assert_eq!(app.ticks(), 3);
        assert_eq!(app.milestone(), Some(Milestone::Complete));
    }

    #[test]
    fn pause_and_quit_keys() {
        let mut app = App::new(small()).unwrap();
        app.handle_key(KeyCode::Char('p'));
        assert!(app.is_paused());
        app.handle_key(KeyCode::Char('p'));
        assert!(!app.is_paused());
        app.handle_key(KeyCode::Esc);
        assert!(!app.running);
    }

    #[test]
    fn speed_keys_are_bounded() {
        let mut app = App::new(small()).unwrap();
        app.handle_key(KeyCode::Char('+'));
        assert_eq!(app.interval(), Duration::from_millis(50));
        for _ in 0..10 {
            app.handle_key(KeyCode::Char('+'));
        }
        assert_eq!(app.interval(), MIN_INTERVAL);
        for _ in 0..20 {
            app.handle_key(KeyCode::Char('-'));
        }
        assert_eq!(app.interval(), MAX_INTERVAL);
    }

    #[test]
    fn failed_export_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(RunConfig {
            save_animation: true,
            save_path: dir.path().join("nope").join("a.gif"),
            ..small()
        })
        .unwrap();
        assert!(app.status().unwrap().contains("export unavailable"));
        for _ in 0..3 {
            app.tick();
        }
        assert!(app.is_complete());
        assert!(matches!(app.export_outcome, Some(ExportOutcome::Failed(_))));
    }
}
