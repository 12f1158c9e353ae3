//! TUI rendering: four chart panels beside a statistics readout.
//!
//! ┌──────────────────────────────────────────────────────────┐
//! │  📈 normlab   N(0, 1)   tick 12/78   300ms               │
//! ├───────────────────┬───────────────────┬──────────────────┤
//! │  Histogram + pdf  │  Time series      │  Statistics      │
//! │                   │                   │  n, mean, var    │
//! ├───────────────────┼───────────────────┤  CI, KS, SNR     │
//! │  Q-Q              │  CDF              │                  │
//! │                   │                   │  ▸ milestone     │
//! ├───────────────────┴───────────────────┴──────────────────┤
//! │  ████████████░░░░░░░░░░░░  350/2000 (17.5%)              │
//! ├──────────────────────────────────────────────────────────┤
//! │  q quit   p pause   +/- speed   s snapshot               │
//! └──────────────────────────────────────────────────────────┘

use super::app::App;
use normlab_core::{Convergence, report};
use ratatui::{prelude::*, widgets::*};

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(16),   // charts + stats
            Constraint::Length(3), // progress
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app);
    draw_main(f, rows[1], app);
    draw_progress(f, rows[2], app);
    draw_keys(f, rows[3]);
}

fn draw_title(f: &mut Frame, area: Rect, app: &App) {
    let cfg = app.config();
    let state = if app.is_complete() {
        " ✓ done"
    } else if app.is_paused() {
        " ⏸ paused"
    } else {
        ""
    };
    let rec = if app.is_recording() { "  ● rec" } else { "" };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(" 📈 normlab ", Style::default().bold().fg(Color::Cyan)),
            Span::styled(
                format!("  N({}, {}²)", cfg.mean, cfg.std_dev),
                Style::default().bold().fg(Color::Yellow),
            ),
            Span::styled(
                format!(
                    "  tick {}/{}  {}ms{state}{rec} ",
                    app.ticks(),
                    cfg.tick_count(),
                    app.interval().as_millis()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

    f.render_widget(block, area);
}

fn draw_main(f: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let grid = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(cols[0]);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(grid[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(grid[1]);

    draw_histogram(f, top[0], app);
    draw_time_series(f, top[1], app);
    draw_qq(f, bottom[0], app);
    draw_cdf(f, bottom[1], app);
    draw_stats(f, cols[1], app);
}

fn bounds_labels(lo: f64, hi: f64) -> Vec<Line<'static>> {
    vec![
        Line::from(format!("{lo:.1}")),
        Line::from(format!("{:.1}", 0.5 * (lo + hi))),
        Line::from(format!("{hi:.1}")),
    ]
}

fn draw_histogram(f: &mut Frame, area: Rect, app: &App) {
    let h = &app.charts().histogram;
    let bars: Vec<(f64, f64)> = h.bins.iter().map(|b| (b.center(), b.density)).collect();

    let mut datasets = vec![
        Dataset::default()
            .name("samples")
            .graph_type(GraphType::Bar)
            .marker(symbols::Marker::HalfBlock)
            .style(Style::default().fg(Color::Blue))
            .data(&bars),
    ];
    if let Some(pdf) = h.theoretical.as_deref() {
        datasets.push(
            Dataset::default()
                .name("theory")
                .graph_type(GraphType::Line)
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(Color::Red))
                .data(pdf),
        );
    }
    if let Some(kde) = h.smoothed.as_deref() {
        datasets.push(
            Dataset::default()
                .name("kde")
                .graph_type(GraphType::Line)
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(Color::Green))
                .data(kde),
        );
    }

    let (x_lo, x_hi) = h.x_bounds();
    let y_hi = h.y_max() * 1.1;
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Histogram  n={} ", app.len())),
        )
        .x_axis(Axis::default().bounds([x_lo, x_hi]).labels(bounds_labels(x_lo, x_hi)))
        .y_axis(Axis::default().bounds([0.0, y_hi]).labels(vec![
            Line::from("0"),
            Line::from(format!("{y_hi:.2}")),
        ]));
    f.render_widget(chart, area);
}

fn draw_time_series(f: &mut Frame, area: Rect, app: &App) {
    let ts = &app.charts().time_series;
    let x_hi = (ts.len() as f64).max(1.0);
    let mean_line = [(0.0, ts.mean), (x_hi, ts.mean)];
    let upper_line = [(0.0, ts.upper), (x_hi, ts.upper)];
    let lower_line = [(0.0, ts.lower), (x_hi, ts.lower)];

    let datasets = vec![
        Dataset::default()
            .graph_type(GraphType::Scatter)
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(Color::Blue))
            .data(&ts.previous),
        Dataset::default()
            .name("new")
            .graph_type(GraphType::Scatter)
            .marker(symbols::Marker::Dot)
            .style(Style::default().fg(Color::Red))
            .data(&ts.recent),
        Dataset::default()
            .name("μ")
            .graph_type(GraphType::Line)
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(Color::White))
            .data(&mean_line),
        Dataset::default()
            .name("μ±σ")
            .graph_type(GraphType::Line)
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(Color::DarkGray))
            .data(&upper_line),
        Dataset::default()
            .graph_type(GraphType::Line)
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(Color::DarkGray))
            .data(&lower_line),
    ];

    let (y_lo, y_hi) = ts.y_bounds();
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Time series  +{} new ", ts.recent.len())),
        )
        .x_axis(Axis::default().bounds([0.0, x_hi]).labels(vec![
            Line::from("0"),
            Line::from(format!("{}", ts.len())),
        ]))
        .y_axis(Axis::default().bounds([y_lo, y_hi]).labels(bounds_labels(y_lo, y_hi)));
    f.render_widget(chart, area);
}

fn draw_qq(f: &mut Frame, area: Rect, app: &App) {
    let qq = &app.charts().qq;
    let fit: Vec<(f64, f64)> = qq.fit_line().map(|l| l.to_vec()).unwrap_or_default();

    let datasets = vec![
        Dataset::default()
            .graph_type(GraphType::Scatter)
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(Color::Blue))
            .data(&qq.points),
        Dataset::default()
            .name("fit")
            .graph_type(GraphType::Line)
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(Color::Red))
            .data(&fit),
    ];

    let title = match qq.r_squared {
        Some(r2) => format!(" Q-Q  R²={r2:.4} "),
        None => " Q-Q ".to_string(),
    };
    let ((x_lo, x_hi), (y_lo, y_hi)) = qq.bounds();
    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(Axis::default().bounds([x_lo, x_hi]).labels(bounds_labels(x_lo, x_hi)))
        .y_axis(Axis::default().bounds([y_lo, y_hi]).labels(bounds_labels(y_lo, y_hi)));
    f.render_widget(chart, area);
}

fn draw_cdf(f: &mut Frame, area: Rect, app: &App) {
    let cdf = &app.charts().cdf;

    let datasets = vec![
        Dataset::default()
            .name("empirical")
            .graph_type(GraphType::Line)
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(Color::Blue))
            .data(&cdf.empirical),
        Dataset::default()
            .name("theory")
            .graph_type(GraphType::Line)
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(Color::Red))
            .data(&cdf.theoretical),
    ];

    let (x_lo, x_hi) = cdf.x_bounds();
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" CDF  max gap={:.3} ", cdf.max_gap())),
        )
        .x_axis(Axis::default().bounds([x_lo, x_hi]).labels(bounds_labels(x_lo, x_hi)))
        .y_axis(Axis::default().bounds([0.0, 1.0]).labels(vec![
            Line::from("0"),
            Line::from("0.5"),
            Line::from("1"),
        ]));
    f.render_widget(chart, area);
}

fn draw_stats(f: &mut Frame, area: Rect, app: &App) {
    let stats = app.stats();
    let mut lines: Vec<Line> = report::stats_lines(stats)
        .into_iter()
        .map(Line::from)
        .collect();

    let color = match stats.convergence {
        Convergence::Good => Color::Green,
        Convergence::Fair => Color::Yellow,
        Convergence::Poor => Color::Red,
    };
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Fit: {}", stats.convergence),
        Style::default().bold().fg(color),
    )));

    if let Some(m) = app.milestone() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("▸ {}", m.label()),
            Style::default().fg(Color::Cyan),
        )));
    }
    if let Some(status) = app.status() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default().borders(Borders::ALL).title(" Statistics ");
    let p = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    f.render_widget(p, area);
}

fn draw_progress(f: &mut Frame, area: Rect, app: &App) {
    let label = report::progress_label(app.len(), app.config().max_count);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Progress "))
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio(app.progress().clamp(0.0, 1.0))
        .label(label);
    f.render_widget(gauge, area);
}

fn draw_keys(f: &mut Frame, area: Rect) {
    let bar = Paragraph::new(" q quit   p pause   +/- speed   s snapshot")
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}
