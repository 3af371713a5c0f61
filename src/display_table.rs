// src/display_table.rs

use ratatui::{
    layout::Constraint,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
};

use crate::parser::{HeaderSet, ParsedDocument, RowRecord};
use crate::sorter::{sort_rows, SortMode};

const MIN_COLUMN_WIDTH: u16 = 8;
const MAX_COLUMN_WIDTH: u16 = 30;

/// Minimal surface a table can be drawn onto.
pub trait TableRenderer {
    fn clear(&mut self);
    fn render_header(&mut self, headers: &HeaderSet, modes: &[SortMode]);
    fn render_rows(&mut self, rows: &[RowRecord]);
}

/// Live table state. Sorting reorders `rows` in place; column meaning never
/// changes after parse.
#[derive(Debug, Clone, Default)]
pub struct DisplayTable {
    headers: HeaderSet,
    rows: Vec<RowRecord>,
    sort_modes: Vec<SortMode>,
}

impl DisplayTable {
    pub fn new(doc: ParsedDocument) -> Self {
        let sort_modes = vec![SortMode::None; doc.headers.len()];
        DisplayTable {
            headers: doc.headers,
            rows: doc.rows,
            sort_modes,
        }
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn sort_mode(&self, header: usize) -> SortMode {
        self.sort_modes.get(header).copied().unwrap_or_default()
    }

    /// Sorts by the column behind `header` (an index into the header set).
    pub fn sort(&mut self, header: usize, mode: SortMode) {
        let Some(column) = self.headers.get(header).map(|h| h.column) else {
            return;
        };
        if let Some(slot) = self.sort_modes.get_mut(header) {
            *slot = mode;
        }
        sort_rows(&mut self.rows, column, mode);
    }

    pub fn render<R: TableRenderer>(&self, renderer: &mut R) {
        renderer.clear();
        renderer.render_header(&self.headers, &self.sort_modes);
        renderer.render_rows(&self.rows);
    }
}

/// Text grid handed to `ratatui` when the frame is drawn.
#[derive(Debug, Default)]
pub struct TableView {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableRenderer for TableView {
    fn clear(&mut self) {
        self.header.clear();
        self.rows.clear();
    }

    fn render_header(&mut self, headers: &HeaderSet, modes: &[SortMode]) {
        self.header = vec![String::new(); headers.span()];
        for (i, h) in headers.iter().enumerate() {
            let mode = modes.get(i).copied().unwrap_or_default();
            self.header[h.column] = match mode.tag() {
                Some(tag) => format!("{} [{}]", h.name, tag),
                None => h.name.clone(),
            };
        }
    }

    fn render_rows(&mut self, rows: &[RowRecord]) {
        self.rows = rows.to_vec();
    }
}

#[cfg(test)]
impl TableView {
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Header row plus data rows.
    pub fn line_count(&self) -> usize {
        if self.header.is_empty() && self.rows.is_empty() {
            0
        } else {
            self.rows.len() + 1
        }
    }
}

impl TableView {
    fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }

    fn column_width(&self, index: usize) -> u16 {
        let header = self.header.get(index).map_or(0, |h| h.chars().count());
        let widest = self
            .rows
            .iter()
            .filter_map(|r| r.get(index))
            .map(|cell| cell.chars().count())
            .chain(std::iter::once(header))
            .max()
            .unwrap_or(0);
        (widest as u16 + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
    }

    pub fn widget(&self, selected_column: Option<usize>, title: &str) -> Table<'_> {
        let header_cells = (0..self.column_count()).map(|i| {
            let text = self.header.get(i).map(String::as_str).unwrap_or("");
            let style = if Some(i) == selected_column {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                    .bg(Color::Blue)
            } else {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            };
            Cell::from(text).style(style)
        });
        let header = Row::new(header_cells).height(1).bottom_margin(0);

        let rows = self.rows.iter().map(|r| {
            let cells = r.iter().map(|c| Cell::from(c.as_str()));
            Row::new(cells).height(1).bottom_margin(0)
        });

        let widths = (0..self.column_count())
            .map(|i| Constraint::Length(self.column_width(i)))
            .collect::<Vec<_>>();

        Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title.to_string()))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("-> ")
            .column_spacing(2)
    }
}
