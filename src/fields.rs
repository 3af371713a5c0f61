// src/fields.rs

use tracing::debug;

use crate::error::{AppError, Result};
use crate::parser::HeaderSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn title(self) -> &'static str {
        match self {
            Axis::X => "X-Axis field",
            Axis::Y => "Y-Axis field",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOption {
    pub column: usize,
    pub label: String,
}

/// Two independent pickers over the same header options. Nothing is selected
/// until the user picks.
#[derive(Debug, Clone, Default)]
pub struct FieldSelector {
    options: Vec<FieldOption>,
    x: Option<usize>,
    y: Option<usize>,
}

impl FieldSelector {
    pub fn new(headers: &HeaderSet) -> Self {
        let options = headers
            .iter()
            .map(|h| FieldOption {
                column: h.column,
                label: h.name.clone(),
            })
            .collect();
        FieldSelector {
            options,
            x: None,
            y: None,
        }
    }

    pub fn options(&self) -> &[FieldOption] {
        &self.options
    }

    /// Picks option `index` for `axis`. Out-of-range picks are ignored.
    pub fn select(&mut self, axis: Axis, index: usize) -> bool {
        let Some(option) = self.options.get(index) else {
            return false;
        };
        debug!(?axis, column = option.column, label = %option.label, "field selected");
        match axis {
            Axis::X => self.x = Some(option.column),
            Axis::Y => self.y = Some(option.column),
        }
        true
    }

    /// Selected source column for `axis`.
    pub fn selected(&self, axis: Axis) -> Option<usize> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Position of the selected column in the option list.
    pub fn selected_option(&self, axis: Axis) -> Option<usize> {
        let column = self.selected(axis)?;
        self.options.iter().position(|o| o.column == column)
    }

    /// Both columns, or the missing-field error when either is unset.
    pub fn selection(&self) -> Result<(usize, usize)> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(AppError::MissingChartField),
        }
    }
}
