use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use icicle::layout::TilingConfig;
use icicle::text::truncate_to_width;
use icicle::{CellMeasure, Chart, ChartConfig, Easing, NodeIdx, Notification, TransitionConfig};
use thiserror::Error;

use crate::buffer::{Buffer, Rgb};
use crate::cli::{Cli, Family};
use crate::render::{cell_center, paint_frame, viewport_for};
use crate::terminal::Terminal;
use crate::trace::{LoadError, TraceFile};

const FRAME: Duration = Duration::from_millis(16);
const IDLE: Duration = Duration::from_millis(250);
const HINT: &str = "click: zoom in  esc: zoom out  +/-: depth  0: all levels  q: quit";

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("trace cannot be rendered: {0}")]
    NotRenderable(String),
}

/// Merge command line overrides over the options stored in the trace file.
pub fn chart_config(cli: &Cli, file: &TraceFile) -> ChartConfig {
    let family = cli.family.or(file.family).unwrap_or(Family::Treemap);
    let mut config = match family {
        Family::Treemap => ChartConfig::treemap().tiling(TilingConfig::default().pad(cli.pad)),
        Family::Sunburst => ChartConfig::sunburst(),
    }
    // One cell per label row; headers take a single terminal row.
    .font_size(1.0)
    .text_pad(0.0)
    .transition(TransitionConfig::new(
        Duration::from_millis(cli.duration_ms),
        Easing::CubicInOut,
    ));

    if let Some(packing) = cli.packing.or(file.packing) {
        config = config.packing(packing.into());
    }
    if let Some(mode) = cli.value_mode.or(file.value_mode) {
        config = config.value_mode(mode.into());
    }
    if let Some(depth) = cli.max_depth.or(file.max_depth) {
        config = config.max_depth(depth);
    }
    if let Some(level) = cli.level.clone().or_else(|| file.level.clone()) {
        config = config.level(level);
    }
    config
}

pub struct App {
    chart: Chart,
    /// Rows available to the chart; the last terminal row is the status bar.
    rows: u16,
    hovered: Option<NodeIdx>,
    status: String,
    quit: bool,
}

impl App {
    pub fn new(chart: Chart, rows: u16) -> Self {
        Self {
            chart,
            rows,
            hovered: None,
            status: HINT.to_string(),
            quit: false,
        }
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn is_animating(&self) -> bool {
        self.chart.is_animating()
    }

    pub fn tick(&mut self, now: Instant) {
        let notes = self.chart.tick(now);
        self.apply(notes);
    }

    pub fn handle(&mut self, event: Event, now: Instant) {
        let notes = match event {
            Event::Key(key) => self.handle_key(key, now),
            Event::Mouse(mouse) => self.handle_mouse(mouse, now),
            Event::Resize(cols, rows) => {
                self.rows = rows.saturating_sub(1);
                self.chart.resize(viewport_for(cols, self.rows))
            }
            Event::FocusLost => self.chart.pointer_leave(),
            _ => Vec::new(),
        };
        self.apply(notes);
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Notification> {
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }
        let depth = self.chart.config().layout.max_depth;
        match key.code {
            KeyCode::Char('q') => {
                self.quit = true;
                Vec::new()
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
                Vec::new()
            }
            KeyCode::Esc | KeyCode::Backspace => match self.chart.entry() {
                Some(entry) => self.chart.click(entry, now),
                None => Vec::new(),
            },
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let next = depth.map(|d| d + 1).unwrap_or(2);
                self.chart.set_max_depth(Some(next), now)
            }
            KeyCode::Char('-') => {
                let next = depth.map(|d| d.saturating_sub(1)).unwrap_or(2).max(1);
                self.chart.set_max_depth(Some(next), now)
            }
            KeyCode::Char('0') => self.chart.set_max_depth(None, now),
            _ => Vec::new(),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) -> Vec<Notification> {
        if mouse.row >= self.rows {
            return self.chart.pointer_leave();
        }
        let (x, y) = cell_center(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => self.chart.pointer_move(x, y),
            MouseEventKind::Down(MouseButton::Left) => self.chart.click_at(x, y, now),
            MouseEventKind::Drag(_) => {
                self.chart.set_dragging(true);
                Vec::new()
            }
            MouseEventKind::Up(_) => {
                self.chart.set_dragging(false);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn apply(&mut self, notes: Vec<Notification>) {
        for note in notes {
            match note {
                Notification::Hover(info) => {
                    self.hovered = Some(info.idx);
                    self.status = format!(
                        "{}{}  {}  {:.1}% of entry  {:.1}% of root",
                        info.path,
                        info.label,
                        info.value,
                        info.percent_entry * 100.0,
                        info.percent_root * 100.0
                    );
                }
                Notification::Unhover { .. } => {
                    self.hovered = None;
                    self.status = HINT.to_string();
                }
                Notification::EntryChanged { id } => {
                    log::info!("[app] entry -> {}", id);
                }
                other => log::debug!("[app] {:?}", other),
            }
        }
    }

    pub fn draw(&self, buf: &mut Buffer, now: Instant) {
        if let Some(tree) = self.chart.tree() {
            paint_frame(
                buf,
                self.rows,
                &self.chart.frame(now),
                tree,
                self.chart.viewport(),
                self.hovered,
            );
        }

        let width = buf.width();
        let bar = Rgb::new(28, 28, 32);
        for col in 0..width {
            if let Some(cell) = buf.get_mut(col, self.rows) {
                cell.bg = bar;
            }
        }
        let status = truncate_to_width(&self.status, width as usize);
        buf.put_str(0, self.rows, width, &status, Rgb::new(200, 200, 200), false);
    }
}

pub fn run(cli: Cli) -> Result<(), AppError> {
    let file = TraceFile::load(&cli.trace)?;
    let data = file.to_data()?;
    let config = chart_config(&cli, &file);

    let (cols, height) = crossterm::terminal::size()?;
    let rows = height.saturating_sub(1);
    let chart = Chart::new(&data, config, viewport_for(cols, rows)).with_measure(CellMeasure);
    if !chart.is_renderable() {
        let errors: Vec<String> = chart
            .diagnostics()
            .errors()
            .iter()
            .map(|e| e.to_string())
            .collect();
        return Err(AppError::NotRenderable(errors.join("; ")));
    }

    let mut app = App::new(chart, rows);
    let mut terminal = Terminal::new()?;
    log::info!("[app] started at {:?}", terminal.size());

    while !app.should_quit() {
        let now = Instant::now();
        app.tick(now);
        terminal.draw(|buf| app.draw(buf, now))?;

        let timeout = if app.is_animating() { FRAME } else { IDLE };
        for event in terminal.poll(timeout)? {
            app.handle(event, Instant::now());
        }
    }

    log::info!("[app] quit");
    Ok(())
}
