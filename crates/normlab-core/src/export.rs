//! Best-effort animated export.
//!
//! [`GifExporter`] renders each frame into an animated GIF with plotters: the
//! four chart panels with their captions, the statistics readout beside them,
//! and a labelled progress bar underneath. Text uses a bundled DejaVu Sans
//! Mono face so no system fonts are needed. [`FrameRecorder`] wraps any
//! [`FrameSink`] and turns sink failures into a stored message: once a write
//! fails the recorder stops exporting, logs a warning and lets the run carry on.

use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::register_font;
use thiserror::Error;

use crate::charts::{CdfChart, ChartSet, HistogramChart, QqChart, TimeSeriesChart};
use crate::config::RunConfig;
use crate::milestone::Milestone;
use crate::report;
use crate::simulation::TickReport;
use crate::snapshot::StatisticsSnapshot;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot create {path}: {message}")]
    Create { path: PathBuf, message: String },
    #[error("failed to render frame {frame}: {message}")]
    Render { frame: usize, message: String },
    #[error("failed to finalize {path}: {message}")]
    Finish { path: PathBuf, message: String },
    #[error("bundled font could not be loaded")]
    Font,
}

/// One rendered step of the animation.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub charts: &'a ChartSet,
    pub stats: &'a StatisticsSnapshot,
    /// Annotated on the histogram panel when set.
    pub milestone: Option<Milestone>,
    pub max_count: usize,
}

impl<'a> Frame<'a> {
    pub fn from_tick(report: &'a TickReport, max_count: usize) -> Self {
        Self {
            charts: &report.charts,
            stats: &report.stats,
            milestone: report.milestone,
            max_count,
        }
    }

    /// Fraction of `max_count` reached, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.max_count == 0 {
            return 1.0;
        }
        (self.stats.n as f64 / self.max_count as f64).min(1.0)
    }
}

/// Destination for animation frames.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &Frame<'_>) -> Result<(), ExportError>;

    /// Flush and close the output. Returns the number of frames written.
    fn finish(self: Box<Self>) -> Result<usize, ExportError>;
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

type Plot<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;
type DrawResult = Result<(), Box<dyn StdError>>;

const FONT_FAMILY: &str = "DejaVu Sans Mono";
static FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

const GRID_LINES: usize = 5;
/// Monospace advance width as a fraction of the font size.
const GLYPH_WIDTH: f64 = 0.62;

const MILESTONE_COLOR: RGBColor = RGBColor(170, 60, 0);

/// Register the bundled face with plotters. Later calls reuse the first result.
fn ensure_font() -> Result<(), ExportError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let ok = *REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok());
    if ok { Ok(()) } else { Err(ExportError::Font) }
}

/// Pixel sizes derived from the frame height.
#[derive(Debug, Clone, Copy)]
struct Scale {
    text: f64,
    caption: f64,
    margin: i32,
}

impl Scale {
    fn for_height(height: u32) -> Self {
        let text = (f64::from(height) / 48.0).max(7.0);
        Self {
            text,
            caption: text * 1.15,
            margin: (height / 90).max(3) as i32,
        }
    }

    fn font(&self, size: f64, color: &RGBColor) -> TextStyle<'static> {
        (FONT_FAMILY, size).into_font().color(color)
    }
}

/// Draw one frame onto `root`: charts on the left, statistics readout on the
/// right, progress bar along the bottom. Does not present the area.
pub fn render_frame<DB>(root: &DrawingArea<DB, Shift>, frame: &Frame<'_>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    ensure_font()?;
    root.fill(&WHITE)?;
    let (width, height) = root.dim_in_pixel();
    let scale = Scale::for_height(height);

    let footer = (height / 14).max(12);
    let (body, bar) = root.split_vertically(height.saturating_sub(footer));
    let (plots, side) = body.split_horizontally(width * 7 / 10);

    let panels = plots.split_evenly((2, 2));
    draw_histogram(&panels[0], &frame.charts.histogram, frame.milestone, scale)?;
    draw_time_series(&panels[1], &frame.charts.time_series, scale)?;
    draw_qq(&panels[2], &frame.charts.qq, scale)?;
    draw_cdf(&panels[3], &frame.charts.cdf, scale)?;
    draw_readout(&side, frame.stats, scale)?;
    draw_progress(&bar, frame, scale)?;
    Ok(())
}

fn outline<DB>(area: &DrawingArea<DB, Shift>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (w, h) = area.dim_in_pixel();
    area.draw(&Rectangle::new(
        [(0, 0), (w as i32 - 1, h as i32 - 1)],
        BLACK.mix(0.3),
    ))?;
    Ok(())
}

fn plot<'a, DB>(
    area: &'a DrawingArea<DB, Shift>,
    title: &str,
    (x0, x1): (f64, f64),
    (y0, y1): (f64, f64),
    scale: Scale,
) -> Result<Plot<'a, DB>, Box<dyn StdError>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    outline(area)?;
    let mut chart = ChartBuilder::on(area)
        .caption(title, scale.font(scale.caption, &BLACK))
        .margin(scale.margin)
        .build_cartesian_2d(x0..x1, y0..y1)?;
    for i in 0..=GRID_LINES {
        let t = i as f64 / GRID_LINES as f64;
        let x = x0 + t * (x1 - x0);
        let y = y0 + t * (y1 - y0);
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x, y0), (x, y1)],
            BLACK.mix(0.1),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x0, y), (x1, y)],
            BLACK.mix(0.1),
        )))?;
    }
    Ok(chart)
}

/// Text anchored near the top-left corner of the plotting range.
fn corner_note<DB>(
    chart: &mut Plot<'_, DB>,
    text: String,
    (x0, x1): (f64, f64),
    (y0, y1): (f64, f64),
    style: TextStyle<'static>,
) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let at = (x0 + 0.03 * (x1 - x0), y1 - 0.03 * (y1 - y0));
    chart.draw_series(std::iter::once(Text::new(text, at, style)))?;
    Ok(())
}

fn hline<DB>(chart: &mut Plot<'_, DB>, (x0, x1): (f64, f64), y: f64, style: ShapeStyle) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    chart.draw_series(std::iter::once(PathElement::new(vec![(x0, y), (x1, y)], style)))?;
    Ok(())
}

fn draw_histogram<DB>(
    area: &DrawingArea<DB, Shift>,
    h: &HistogramChart,
    milestone: Option<Milestone>,
    scale: Scale,
) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let xr = h.x_bounds();
    let yr = (0.0, h.y_max() * 1.15);
    let mut chart = plot(area, "Histogram vs theoretical pdf", xr, yr, scale)?;
    chart.draw_series(h.bins.iter().map(|b| {
        Rectangle::new([(b.left, 0.0), (b.right, b.density)], BLUE.mix(0.45).filled())
    }))?;
    if let Some(pdf) = &h.theoretical {
        chart.draw_series(LineSeries::new(pdf.iter().copied(), RED.stroke_width(2)))?;
    }
    if let Some(kde) = &h.smoothed {
        chart.draw_series(LineSeries::new(kde.iter().copied(), GREEN.stroke_width(2)))?;
    }
    if let Some(m) = milestone {
        let style = scale.font(scale.text, &MILESTONE_COLOR);
        corner_note(&mut chart, m.label().to_string(), xr, yr, style)?;
    }
    Ok(())
}

fn draw_time_series<DB>(area: &DrawingArea<DB, Shift>, ts: &TimeSeriesChart, scale: Scale) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let xr = (0.0, (ts.len().max(2) - 1) as f64);
    let (lo, hi) = ts.y_bounds();
    let pad = 0.05 * (hi - lo);
    let mut chart = plot(area, "Samples over time", xr, (lo - pad, hi + pad), scale)?;
    chart.draw_series(
        ts.previous
            .iter()
            .map(|&p| Circle::new(p, 1, BLUE.mix(0.5).filled())),
    )?;
    chart.draw_series(ts.recent.iter().map(|&p| Circle::new(p, 2, RED.filled())))?;
    hline(&mut chart, xr, ts.mean, BLACK.stroke_width(1))?;
    hline(&mut chart, xr, ts.upper, RED.mix(0.6).stroke_width(1))?;
    hline(&mut chart, xr, ts.lower, RED.mix(0.6).stroke_width(1))?;
    Ok(())
}

fn draw_qq<DB>(area: &DrawingArea<DB, Shift>, qq: &QqChart, scale: Scale) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (xr, yr) = qq.bounds();
    let mut chart = plot(area, "Normal Q-Q", xr, yr, scale)?;
    chart.draw_series(
        qq.points
            .iter()
            .map(|&p| Circle::new(p, 2, BLUE.mix(0.7).filled())),
    )?;
    if let Some(line) = qq.fit_line() {
        chart.draw_series(LineSeries::new(line, RED.stroke_width(2)))?;
    }
    if let Some(r2) = qq.r_squared {
        corner_note(&mut chart, format!("R² = {r2:.4}"), xr, yr, scale.font(scale.text, &BLACK))?;
    }
    Ok(())
}

fn draw_cdf<DB>(area: &DrawingArea<DB, Shift>, cdf: &CdfChart, scale: Scale) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let xr = cdf.x_bounds();
    let mut chart = plot(area, "Empirical vs theoretical CDF", xr, (-0.02, 1.02), scale)?;
    chart.draw_series(cdf.gap.iter().map(|&(x, e, t)| {
        PathElement::new(vec![(x, e), (x, t)], MAGENTA.mix(0.2))
    }))?;
    chart.draw_series(LineSeries::new(
        cdf.theoretical.iter().copied(),
        RED.stroke_width(2),
    ))?;
    // Step curve: hold each level until the next order statistic.
    let mut steps = Vec::with_capacity(cdf.empirical.len() * 2 + 1);
    let mut level = 0.0;
    for &(x, y) in &cdf.empirical {
        steps.push((x, level));
        steps.push((x, y));
        level = y;
    }
    chart.draw_series(LineSeries::new(steps, BLUE.stroke_width(2)))?;
    corner_note(
        &mut chart,
        format!("max gap = {:.3}", cdf.max_gap()),
        xr,
        (-0.02, 1.02),
        scale.font(scale.text, &BLACK),
    )?;
    Ok(())
}

fn draw_readout<DB>(area: &DrawingArea<DB, Shift>, stats: &StatisticsSnapshot, scale: Scale) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    outline(area)?;
    let (width, _) = area.dim_in_pixel();
    let pad = scale.margin * 2;
    let lines = report::stats_lines(stats);

    // Shrink the face until the longest line fits the panel width.
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(1).max(1);
    let fit = f64::from(width.saturating_sub(2 * pad as u32)) / (GLYPH_WIDTH * longest as f64);
    let size = scale.text.min(fit).max(4.0);
    let step = (size * 1.5).round() as i32;

    area.draw_text("Statistics", &scale.font(scale.caption, &BLACK), (pad, pad))?;
    let mut y = pad + (scale.caption * 2.0).round() as i32;
    let style = scale.font(size, &BLACK);
    for line in &lines {
        area.draw_text(line, &style, (pad, y))?;
        y += step;
    }
    Ok(())
}

fn draw_progress<DB>(area: &DrawingArea<DB, Shift>, frame: &Frame<'_>, scale: Scale) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (w, h) = area.dim_in_pixel();
    let filled = (frame.progress() * f64::from(w)).round() as i32;
    area.fill(&BLACK.mix(0.08))?;
    area.draw(&Rectangle::new([(0, 0), (filled, h as i32)], GREEN.mix(0.7).filled()))?;

    let size = scale.text.min(f64::from(h) * 0.7);
    let label = format!(
        "Progress {}",
        report::progress_label(frame.stats.n, frame.max_count)
    );
    let y = ((f64::from(h) - size) / 2.0).max(0.0).round() as i32;
    area.draw_text(&label, &scale.font(size, &BLACK), (scale.margin * 2, y))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// GIF
// ---------------------------------------------------------------------------

/// Animated GIF writer.
pub struct GifExporter {
    root: DrawingArea<BitMapBackend<'static>, Shift>,
    path: PathBuf,
    frames: usize,
}

impl GifExporter {
    /// Create `path` and prepare a `width` x `height` animation advancing every
    /// `delay_ms`.
    pub fn create(path: &Path, (width, height): (u32, u32), delay_ms: u64) -> Result<Self, ExportError> {
        ensure_font()?;
        let delay = u32::try_from(delay_ms).unwrap_or(u32::MAX);
        let backend = BitMapBackend::gif(path.to_path_buf(), (width, height), delay).map_err(|e| {
            ExportError::Create {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        log::info!("recording {width}x{height} animation to {}", path.display());
        Ok(Self {
            root: backend.into_drawing_area(),
            path: path.to_path_buf(),
            frames: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, frame: &Frame<'_>) -> DrawResult {
        render_frame(&self.root, frame)?;
        self.root.present()?;
        Ok(())
    }
}

impl FrameSink for GifExporter {
    fn write_frame(&mut self, frame: &Frame<'_>) -> Result<(), ExportError> {
        self.render(frame).map_err(|e| ExportError::Render {
            frame: self.frames,
            message: e.to_string(),
        })?;
        self.frames += 1;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<usize, ExportError> {
        let frames = self.frames;
        if frames == 0 {
            return Err(ExportError::Finish {
                path: self.path.clone(),
                message: "no frames were recorded".to_string(),
            });
        }
        // The encoder writes the trailer when the backend is dropped.
        drop(self);
        Ok(frames)
    }
}


// ---------------------------------------------------------------------------
// Recorder
// ---------------------------------------------------------------------------

/// How an export ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Export was not requested.
    Disabled,
    Saved { path: PathBuf, frames: usize },
    /// Export was requested but could not be completed.
    Failed(String),
}

/// Feeds frames to an optional sink without ever failing the caller.
pub struct FrameRecorder {
    sink: Option<Box<dyn FrameSink>>,
    path: Option<PathBuf>,
    failure: Option<String>,
}

impl FrameRecorder {
    pub fn disabled() -> Self {
        Self {
            sink: None,
            path: None,
            failure: None,
        }
    }

    /// GIF recorder for `config`, or a disabled one when saving is off.
    pub fn to_gif(config: &RunConfig) -> Self {
        if !config.save_animation {
            return Self::disabled();
        }
        match GifExporter::create(
            &config.save_path,
            (config.frame_width, config.frame_height),
            config.interval_ms,
        ) {
            Ok(gif) => Self::with_sink(Box::new(gif), config.save_path.clone()),
            Err(e) => {
                let mut recorder = Self::disabled();
                recorder.path = Some(config.save_path.clone());
                recorder.fail(e);
                recorder
            }
        }
    }

    pub fn with_sink(sink: Box<dyn FrameSink>, path: impl Into<PathBuf>) -> Self {
        Self {
            sink: Some(sink),
            path: Some(path.into()),
            failure: None,
        }
    }

    /// True while frames are still being written.
    pub fn is_recording(&self) -> bool {
        self.sink.is_some()
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn record(&mut self, frame: &Frame<'_>) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if let Err(e) = sink.write_frame(frame) {
            self.fail(e);
        }
    }

    fn fail(&mut self, e: ExportError) {
        log::warn!("animation export disabled: {e}");
        self.failure = Some(e.to_string());
        self.sink = None;
    }

    pub fn finish(mut self) -> ExportOutcome {
        if let Some(message) = self.failure.take() {
            return ExportOutcome::Failed(message);
        }
        let (Some(sink), Some(path)) = (self.sink.take(), self.path.take()) else {
            return ExportOutcome::Disabled;
        };
        match sink.finish() {
            Ok(frames) => {
                log::info!("saved {frames} frames to {}", path.display());
                ExportOutcome::Saved { path, frames }
            }
            Err(e) => {
                log::warn!("animation export failed: {e}");
                ExportOutcome::Failed(e.to_string())
            }
        }
    }
}

impl Default for FrameRecorder {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Simulation;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FlakySink {
        calls: Rc<Cell<usize>>,
        fail_at: usize,
    }

    impl FrameSink for FlakySink {
        fn write_frame(&mut self, _frame: &Frame<'_>) -> Result<(), ExportError> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            if n == self.fail_at {
                return Err(ExportError::Render {
                    frame: n,
                    message: "disk full".to_string(),
                });
            }
            Ok(())
        }

        fn finish(self: Box<Self>) -> Result<usize, ExportError> {
            Ok(self.calls.get())
        }
    }

    fn small_config(dir: &Path) -> RunConfig {
        RunConfig {
            initial_count: 50,
            max_count: 125,
            batch_size: 25,
            save_animation: true,
            save_path: dir.join("run.gif"),
            frame_width: 160,
            frame_height: 120,
            interval_ms: 50,
            ..RunConfig::default()
        }
    }

    fn record_run(sim: &mut Simulation, recorder: &mut FrameRecorder) {
        let charts = sim.charts();
        let stats = sim.snapshot().unwrap();
        let max_count = sim.config().max_count;
        recorder.record(&Frame {
            charts: &charts,
            stats: &stats,
            milestone: None,
            max_count,
        });
        sim.run_to_completion(|r| recorder.record(&Frame::from_tick(r, max_count)))
            .unwrap();
    }

    #[test]
    fn disabled_when_not_requested() {
        let cfg = RunConfig::default();
        let recorder = FrameRecorder::to_gif(&cfg);
        assert!(!recorder.is_recording());
        assert_eq!(recorder.finish(), ExportOutcome::Disabled);
    }

    #[test]
    fn gif_export_writes_every_frame() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = small_config(dir.path());
        let mut sim = Simulation::new(cfg.clone()).unwrap();
        let mut recorder = FrameRecorder::to_gif(&cfg);
        assert!(recorder.is_recording());
        record_run(&mut sim, &mut recorder);
        match recorder.finish() {
            ExportOutcome::Saved { path, frames } => {
                assert_eq!(frames, 4); // initial + 3 ticks
                assert!(std::fs::metadata(&path).unwrap().len() > 0);
            }
            other => panic!("expected Saved, got {other:?}"),
        }
    }

    #[test]
    fn missing_directory_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = small_config(&dir.path().join("no/such/dir"));
        let recorder = FrameRecorder::to_gif(&cfg);
        assert!(!recorder.is_recording());
        assert!(recorder.failure().is_some());
        match recorder.finish() {
            ExportOutcome::Failed(msg) => assert!(msg.contains("run.gif")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn sink_failure_stops_recording() {
        let calls = Rc::new(Cell::new(0));
        let sink = FlakySink {
            calls: Rc::clone(&calls),
            fail_at: 1,
        };
        let mut recorder = FrameRecorder::with_sink(Box::new(sink), "flaky.gif");
        let mut sim = Simulation::new(RunConfig {
            max_count: 150,
            ..RunConfig::default()
        })
        .unwrap();
        record_run(&mut sim, &mut recorder);
        // The second write failed; nothing was attempted after that.
        assert_eq!(calls.get(), 2);
        assert!(sim.is_complete());
        match recorder.finish() {
            ExportOutcome::Failed(msg) => assert!(msg.contains("disk full")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn empty_gif_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = small_config(dir.path());
        let recorder = FrameRecorder::to_gif(&cfg);
        assert!(matches!(recorder.finish(), ExportOutcome::Failed(_)));
    }

    // --- frame rendering ---

    const RENDER_SIZE: (u32, u32) = (320, 240);

    fn render_to_buffer(frame: &Frame<'_>) -> Vec<u8> {
        let (w, h) = RENDER_SIZE;
        let mut buf = vec![0u8; (w * h * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, RENDER_SIZE).into_drawing_area();
            render_frame(&root, frame).unwrap();
            root.present().unwrap();
        }
        buf
    }

    fn sample_frame_parts() -> (ChartSet, StatisticsSnapshot) {
        let sim = Simulation::new(RunConfig {
            max_count: 200,
            ..RunConfig::default()
        })
        .unwrap();
        (sim.charts(), sim.snapshot().unwrap())
    }

    #[test]
    fn bundled_font_registers() {
        assert!(ensure_font().is_ok());
        assert!(ensure_font().is_ok());
    }

    #[test]
    fn frame_progress_follows_sample_count() {
        let (charts, stats) = sample_frame_parts();
        let frame = Frame {
            charts: &charts,
            stats: &stats,
            milestone: None,
            max_count: 200,
        };
        assert!((frame.progress() - 0.25).abs() < 1e-12);
        let done = Frame { max_count: 0, ..frame };
        assert_eq!(done.progress(), 1.0);
    }

    #[test]
    fn statistics_are_drawn_into_the_frame() {
        let (charts, stats) = sample_frame_parts();
        let mut shifted = stats.clone();
        shifted.mean += 1.0;
        shifted.ks_statistic = 0.5;

        let frame = Frame {
            charts: &charts,
            stats: &stats,
            milestone: None,
            max_count: 200,
        };
        let a = render_to_buffer(&frame);
        let b = render_to_buffer(&Frame {
            stats: &shifted,
            ..frame
        });
        assert_ne!(a, b, "readout text did not change with the statistics");
        assert_eq!(a, render_to_buffer(&frame));
    }

    #[test]
    fn milestone_is_annotated() {
        let (charts, stats) = sample_frame_parts();
        let plain = Frame {
            charts: &charts,
            stats: &stats,
            milestone: None,
            max_count: 200,
        };
        let marked = Frame {
            milestone: Some(Milestone::Half),
            ..plain
        };
        assert_ne!(render_to_buffer(&plain), render_to_buffer(&marked));
    }

    #[test]
    fn progress_label_tracks_max_count() {
        let (charts, stats) = sample_frame_parts();
        let quarter = Frame {
            charts: &charts,
            stats: &stats,
            milestone: None,
            max_count: 200,
        };
        let half = Frame {
            max_count: 100,
            ..quarter
        };
        assert_ne!(render_to_buffer(&quarter), render_to_buffer(&half));
    }
}
