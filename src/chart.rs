// src/chart.rs

use ratatui::{
    style::{Color, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders},
};
use tracing::{debug, warn};

use crate::display_table::DisplayTable;
use crate::error::{AppError, Result};
use crate::fields::FieldSelector;
use crate::sorter::parse_float;

pub const BAR_COLOR: Color = Color::Rgb(54, 162, 235);

// Bar heights are integers scaled against the tallest bar.
const BAR_RESOLUTION: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BarChartModel {
    /// Dataset label, taken from the Y column header.
    pub label: String,
    pub bars: Vec<(String, f64)>,
}

/// Reads the selected columns from the table in its current row order.
pub fn build(table: &DisplayTable, fields: &FieldSelector) -> Result<BarChartModel> {
    let (x, y) = fields.selection()?;

    let mut bars = Vec::with_capacity(table.row_count());
    for (i, row) in table.rows().iter().enumerate() {
        let label = row.get(x).cloned().unwrap_or_default();
        let raw = row.get(y).map(String::as_str).unwrap_or("");
        let Some(value) = parse_float(raw) else {
            warn!(row = i, value = raw, "non-numeric Y value");
            return Err(AppError::NonNumericY {
                row: i,
                value: raw.to_string(),
            });
        };
        bars.push((label, value));
    }

    let label = table.headers().name_of(y).unwrap_or_default().to_string();
    debug!(x, y, bars = bars.len(), "built bar chart");
    Ok(BarChartModel { label, bars })
}

// Negative values draw as empty bars; the axis always starts at zero.
fn bar_height(value: f64, max: f64) -> u64 {
    if value.is_finite() && value > 0.0 && max > 0.0 {
        (value / max * BAR_RESOLUTION).round() as u64
    } else {
        0
    }
}

impl BarChartModel {
    fn max_value(&self) -> f64 {
        self.bars
            .iter()
            .map(|(_, v)| *v)
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }

    pub fn widget(&self, bar_width: u16) -> BarChart<'_> {
        let max = self.max_value();
        let bars: Vec<Bar> = self
            .bars
            .iter()
            .map(|(label, value)| {
                Bar::default()
                    .label(Line::from(label.as_str()))
                    .value(bar_height(*value, max))
                    .text_value(value.to_string())
            })
            .collect();

        BarChart::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(BAR_COLOR))
                    .title(self.label.clone()),
            )
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(1)
            .bar_style(Style::default().fg(BAR_COLOR))
            .value_style(Style::default().fg(Color::Black).bg(BAR_COLOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::RawDocument;
    use crate::fields::Axis;
    use crate::parser::parse;
    use crate::sorter::SortMode;
    use ratatui::{backend::TestBackend, Terminal};

    fn setup(text: &str) -> (DisplayTable, FieldSelector) {
        let doc = parse(&RawDocument::new("t.csv", text)).unwrap();
        let fields = FieldSelector::new(&doc.headers);
        (DisplayTable::new(doc), fields)
    }

    #[test]
    fn test_build_from_selected_columns() {
        let (table, mut fields) = setup("Fruit,Count\napple,3\npear,1.5\n");
        fields.select(Axis::X, 0);
        fields.select(Axis::Y, 1);

        let chart = build(&table, &fields).unwrap();
        assert_eq!(chart.label, "Count");
        assert_eq!(
            chart.bars,
            vec![("apple".to_string(), 3.0), ("pear".to_string(), 1.5)]
        );
    }

    #[test]
    fn test_follows_current_row_order() {
        let (mut table, mut fields) = setup("Fruit,Count\napple,3\npear,1\n");
        table.sort(1, SortMode::Ascending);
        fields.select(Axis::X, 0);
        fields.select(Axis::Y, 1);

        let chart = build(&table, &fields).unwrap();
        assert_eq!(chart.bars[0].0, "pear");
    }

    #[test]
    fn test_non_numeric_y_rejected() {
        let (table, mut fields) = setup("Fruit,Count\napple,3\npear,abc\n");
        fields.select(Axis::X, 0);
        fields.select(Axis::Y, 1);

        let err = build(&table, &fields).unwrap_err();
        assert!(matches!(err, AppError::NonNumericY { row: 1, ref value } if value == "abc"));
    }

    #[test]
    fn test_requires_both_fields() {
        let (table, mut fields) = setup("Fruit,Count\napple,3\n");
        fields.select(Axis::Y, 1);
        assert!(matches!(
            build(&table, &fields),
            Err(AppError::MissingChartField)
        ));
    }

    #[test]
    fn test_bar_height_scales_to_tallest() {
        assert_eq!(bar_height(-4.0, 10.0), 0);
        assert_eq!(bar_height(0.0, 10.0), 0);
        assert_eq!(bar_height(1.25, 2.5), 500);
        assert_eq!(bar_height(3e16, 3e16), 1000);
        assert_eq!(bar_height(f64::INFINITY, 1.0), 0);
        assert_eq!(bar_height(5.0, 0.0), 0);
    }

    #[test]
    fn test_leading_number_and_infinities() {
        let (table, mut fields) = setup("Item,Weight\nflour,12kg\nsugar,3.5%\n");
        fields.select(Axis::X, 0);
        fields.select(Axis::Y, 1);
        let chart = build(&table, &fields).unwrap();
        assert_eq!(
            chart.bars,
            vec![("flour".to_string(), 12.0), ("sugar".to_string(), 3.5)]
        );

        for text in ["Name,Amount\na,inf\nb,1\n", "Name,Amount\na,1e400\nb,1\n"] {
            let (table, mut fields) = setup(text);
            fields.select(Axis::X, 0);
            fields.select(Axis::Y, 1);
            assert!(matches!(
                build(&table, &fields),
                Err(AppError::NonNumericY { row: 0, .. })
            ));
        }
    }

    fn render(chart: &BarChartModel) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 14)).unwrap();
        terminal
            .draw(|f| f.render_widget(chart.widget(5), f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_renders_huge_values() {
        let (table, mut fields) =
            setup("Name,Amount\na,20000000000000000\nb,30000000000000000\n");
        fields.select(Axis::X, 0);
        fields.select(Axis::Y, 1);
        let chart = build(&table, &fields).unwrap();

        let text = render(&chart);
        assert!(text.contains("Amount"));
        assert!(text.contains('a'));
    }

    #[test]
    fn test_renders_model_with_infinite_bar() {
        let chart = BarChartModel {
            label: "Amount".to_string(),
            bars: vec![("a".to_string(), f64::INFINITY), ("b".to_string(), 1.0)],
        };
        assert!(render(&chart).contains("Amount"));
    }

    #[test]
    fn test_renders_labels() {
        let chart = BarChartModel {
            label: "Sales".to_string(),
            bars: vec![("north".to_string(), 4.0), ("south".to_string(), 2.0)],
        };
        let text = render(&chart);
        assert!(text.contains("Sales"));
        assert!(text.contains("north"));
        assert!(text.contains("south"));
    }
}
