// src/tui_app.rs

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, TableState},
    Frame, Terminal,
};
use strum::IntoEnumIterator;
use tracing::{info, warn};

use crate::chart::{self, BarChartModel};
use crate::data_loader::{load_document, FileReader, RawDocument};
use crate::display_table::{DisplayTable, TableView};
use crate::error::{AppError, Result};
use crate::fields::{Axis, FieldSelector};
use crate::metrics::{self, MetricsSummary};
use crate::parser::parse;
use crate::sorter::SortMode;

const CHART_HEIGHT: u16 = 14;
const SUMMARY_HEIGHT: u16 = 4;
const HELP: &str =
    "arrows move | s sort | [ ] asc/desc | x/y chart fields | o open | q quit";

/// Everything derived from one loaded file. Replaced wholesale on each load.
pub struct Session {
    pub document: RawDocument,
    pub table: DisplayTable,
    pub fields: FieldSelector,
    pub chart: Option<BarChartModel>,
    pub metrics: Option<MetricsSummary>,
}

impl Session {
    /// Builds a session. A metrics failure does not block the table; it is
    /// handed back for the status line.
    pub fn open(document: RawDocument) -> Result<(Session, Option<AppError>)> {
        let parsed = parse(&document)?;
        let fields = FieldSelector::new(&parsed.headers);
        let table = DisplayTable::new(parsed);

        let (metrics, metrics_error) = match metrics::calculate(&document) {
            Ok(summary) => (Some(summary), None),
            Err(e) => (None, Some(e)),
        };

        let session = Session {
            document,
            table,
            fields,
            chart: None,
            metrics,
        };
        Ok((session, metrics_error))
    }
}

enum Popup {
    Sort(ListState),
    Field(Axis, ListState),
    OpenFile(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct TuiApp {
    reader: Box<dyn FileReader>,
    pub session: Option<Session>,
    /// Latest error; replaced by the next one, cleared on success.
    pub status: Option<AppError>,
    popup: Option<Popup>,

    pub selected_row: usize,
    pub selected_header: usize,
    pub table_state: TableState,
    view: TableView,
    bar_width: u16,
}

impl TuiApp {
    pub fn new(reader: Box<dyn FileReader>, bar_width: u16) -> Self {
        TuiApp {
            reader,
            session: None,
            status: None,
            popup: None,
            selected_row: 0,
            selected_header: 0,
            table_state: TableState::default(),
            view: TableView::default(),
            bar_width,
        }
    }

    /// Loads `path` into a fresh session. On failure the current session
    /// stays on screen and the error goes to the status line.
    pub fn open(&mut self, path: &Path) {
        let opened = load_document(self.reader.as_ref(), path).and_then(Session::open);
        match opened {
            Ok((session, metrics_error)) => {
                info!(
                    path = %path.display(),
                    rows = session.table.row_count(),
                    "session opened"
                );
                if let Some(e) = &metrics_error {
                    warn!(error = %e, detail = %e.detail(), "metrics unavailable");
                }
                self.session = Some(session);
                self.status = metrics_error;
                self.selected_row = 0;
                self.selected_header = 0;
                self.table_state.select(Some(0));
            }
            Err(e) => {
                warn!(error = %e, detail = %e.detail(), "open failed");
                self.status = Some(e);
            }
        }
    }

    pub fn main_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) == Control::Quit {
                        return Ok(());
                    }
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        match self.popup.take() {
            Some(popup) => {
                self.popup = self.handle_popup_key(popup, key.code);
                Control::Continue
            }
            None => self.handle_table_key(key.code),
        }
    }

    fn handle_table_key(&mut self, code: KeyCode) -> Control {
        match code {
            KeyCode::Char('q') => return Control::Quit,
            KeyCode::Char('o') => {
                self.popup = Some(Popup::OpenFile(String::new()));
            }
            KeyCode::Up => {
                self.selected_row = self.selected_row.saturating_sub(1);
                self.table_state.select(Some(self.selected_row));
            }
            KeyCode::Down => {
                let num_rows = self.session.as_ref().map_or(0, |s| s.table.row_count());
                if self.selected_row + 1 < num_rows {
                    self.selected_row += 1;
                }
                self.table_state.select(Some(self.selected_row));
            }
            KeyCode::Left => {
                self.selected_header = self.selected_header.saturating_sub(1);
            }
            KeyCode::Right => {
                let num_headers = self.session.as_ref().map_or(0, |s| s.table.headers().len());
                if self.selected_header + 1 < num_headers {
                    self.selected_header += 1;
                }
            }
            KeyCode::Char('s') => {
                if let Some(session) = &self.session {
                    if !session.table.headers().is_empty() {
                        let current = session.table.sort_mode(self.selected_header);
                        let index = SortMode::iter().position(|m| m == current).unwrap_or(0);
                        let mut state = ListState::default();
                        state.select(Some(index));
                        self.popup = Some(Popup::Sort(state));
                    }
                }
            }
            KeyCode::Char('[') => self.apply_sort(SortMode::Ascending),
            KeyCode::Char(']') => self.apply_sort(SortMode::Descending),
            KeyCode::Char('x') => self.open_field_picker(Axis::X),
            KeyCode::Char('y') => self.open_field_picker(Axis::Y),
            _ => {}
        }
        Control::Continue
    }

    fn handle_popup_key(&mut self, popup: Popup, code: KeyCode) -> Option<Popup> {
        match popup {
            Popup::Sort(mut state) => match code {
                KeyCode::Up => {
                    step(&mut state, SortMode::iter().count(), false);
                    Some(Popup::Sort(state))
                }
                KeyCode::Down => {
                    step(&mut state, SortMode::iter().count(), true);
                    Some(Popup::Sort(state))
                }
                KeyCode::Enter => {
                    let index = state.selected().unwrap_or(0);
                    if let Some(mode) = SortMode::iter().nth(index) {
                        self.apply_sort(mode);
                    }
                    None
                }
                KeyCode::Esc | KeyCode::Char('q') => None,
                _ => Some(Popup::Sort(state)),
            },
            Popup::Field(axis, mut state) => {
                let len = self.session.as_ref().map_or(0, |s| s.fields.options().len());
                match code {
                    KeyCode::Up => {
                        step(&mut state, len, false);
                        Some(Popup::Field(axis, state))
                    }
                    KeyCode::Down => {
                        step(&mut state, len, true);
                        Some(Popup::Field(axis, state))
                    }
                    KeyCode::Enter => {
                        if let Some(index) = state.selected() {
                            self.select_field(axis, index);
                        }
                        None
                    }
                    KeyCode::Esc | KeyCode::Char('q') => None,
                    _ => Some(Popup::Field(axis, state)),
                }
            }
            Popup::OpenFile(mut input) => match code {
                KeyCode::Char(c) => {
                    input.push(c);
                    Some(Popup::OpenFile(input))
                }
                KeyCode::Backspace => {
                    input.pop();
                    Some(Popup::OpenFile(input))
                }
                KeyCode::Enter => {
                    let path = PathBuf::from(input.trim());
                    if !input.trim().is_empty() {
                        self.open(&path);
                    }
                    None
                }
                KeyCode::Esc => None,
                _ => Some(Popup::OpenFile(input)),
            },
        }
    }

    fn open_field_picker(&mut self, axis: Axis) {
        let Some(session) = &self.session else {
            return;
        };
        let mut state = ListState::default();
        if !session.fields.options().is_empty() {
            state.select(Some(session.fields.selected_option(axis).unwrap_or(0)));
        }
        self.popup = Some(Popup::Field(axis, state));
    }

    /// Sorts the selected column. An existing chart follows the new order.
    pub fn apply_sort(&mut self, mode: SortMode) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.table.sort(self.selected_header, mode);
        info!(header = self.selected_header, ?mode, "table sorted");
        if session.fields.selection().is_ok() {
            self.update_chart();
        }
    }

    pub fn select_field(&mut self, axis: Axis, index: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.fields.select(axis, index) {
            self.update_chart();
        }
    }

    /// Rebuilds the chart from the live table. On error the previous chart
    /// is left as it was.
    pub fn update_chart(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match chart::build(&session.table, &session.fields) {
            Ok(model) => {
                session.chart = Some(model);
                self.status = None;
            }
            Err(e) => {
                warn!(error = %e, detail = %e.detail(), "chart not updated");
                self.status = Some(e);
            }
        }
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.area();

        let chart_height = match self.session.as_ref().and_then(|s| s.chart.as_ref()) {
            Some(_) => CHART_HEIGHT,
            None => 0,
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(chart_height),
                Constraint::Length(SUMMARY_HEIGHT),
                Constraint::Length(1),
            ])
            .split(size);

        match &self.session {
            Some(session) => {
                session.table.render(&mut self.view);
                let selected_column = session
                    .table
                    .headers()
                    .get(self.selected_header)
                    .map(|h| h.column);
                let title = session.document.source.display().to_string();
                let table = self.view.widget(selected_column, &title);
                f.render_stateful_widget(table, chunks[0], &mut self.table_state);

                if let Some(chart) = &session.chart {
                    f.render_widget(chart.widget(self.bar_width), chunks[1]);
                }

                let lines = match &session.metrics {
                    Some(m) => vec![
                        Line::from(m.product_sentence()),
                        Line::from(m.customer_sentence()),
                    ],
                    None => Vec::new(),
                };
                let summary = Paragraph::new(lines)
                    .block(Block::default().borders(Borders::ALL).title("Summary"));
                f.render_widget(summary, chunks[2]);
            }
            None => {
                let empty = Paragraph::new("No file loaded. Press o to open a CSV file.")
                    .block(Block::default().borders(Borders::ALL).title("Table"));
                f.render_widget(empty, chunks[0]);
            }
        }

        let status = match &self.status {
            Some(e) => Paragraph::new(e.to_string()).style(Style::default().fg(Color::Red)),
            None => Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        };
        f.render_widget(status, chunks[3]);

        if let Some(popup) = &mut self.popup {
            let area = Self::centered_rect(60, 40, size);
            f.render_widget(Clear, area);
            match popup {
                Popup::Sort(state) => {
                    let items: Vec<ListItem> =
                        SortMode::iter().map(|m| ListItem::new(m.label())).collect();
                    render_list(f, area, "Sort column (Esc to cancel)", items, state);
                }
                Popup::Field(axis, state) => {
                    let items: Vec<ListItem> = self
                        .session
                        .iter()
                        .flat_map(|s| s.fields.options())
                        .map(|o| ListItem::new(o.label.clone()))
                        .collect();
                    render_list(f, area, axis.title(), items, state);
                }
                Popup::OpenFile(input) => {
                    let prompt = Paragraph::new(format!("{}_", input)).block(
                        Block::default()
                            .title("Open CSV file (Enter to load, Esc to cancel)")
                            .borders(Borders::ALL)
                            .style(Style::default().bg(Color::Black)),
                    );
                    let height = 3.min(area.height);
                    f.render_widget(prompt, Rect { height, ..area });
                }
            }
        }
    }

    fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}

fn render_list(f: &mut Frame, area: Rect, title: &str, items: Vec<ListItem>, state: &mut ListState) {
    let list = List::new(items)
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .style(Style::default().bg(Color::Black)),
        )
        .highlight_style(Style::default().fg(Color::Yellow).bg(Color::Blue))
        .highlight_symbol(">> ");
    f.render_stateful_widget(list, area, state);
}

// Wrapping list navigation.
fn step(state: &mut ListState, len: usize, forward: bool) {
    if len == 0 {
        state.select(None);
        return;
    }
    let i = match state.selected() {
        Some(i) if forward => (i + 1) % len,
        Some(0) => len - 1,
        Some(i) => i - 1,
        None => 0,
    };
    state.select(Some(i));
}
