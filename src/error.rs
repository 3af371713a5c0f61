// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// `Display` is the status-line message shown to the user.
#[derive(Debug, Error)]
pub enum AppError {
    /// Selected file does not report `text/csv`.
    #[error("Please select a CSV file.")]
    WrongFileType {
        path: PathBuf,
        content_type: Option<&'static str>,
    },

    /// Failed to read the selected file.
    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The splitter rejected the document.
    #[error("Could not parse CSV: {0}")]
    Parse(#[from] csv::Error),

    /// X or Y picker has no selection yet.
    #[error("Please select valid fields for the chart.")]
    MissingChartField,

    /// A cell of the Y column did not parse as a number.
    #[error("Selected Y-Axis field contains non-numeric values.")]
    NonNumericY { row: usize, value: String },

    /// At least one of the fixed metric columns is absent.
    #[error("Could not identify necessary columns for products, sales, or customers.")]
    MissingMetricColumns { missing: Vec<&'static str> },
}

impl AppError {
    /// Context for the log file; the status line only shows `Display`.
    pub fn detail(&self) -> String {
        match self {
            AppError::WrongFileType { path, content_type } => format!(
                "{} reports {}",
                path.display(),
                content_type.unwrap_or("no content type")
            ),
            AppError::Read { path, source } => format!("{}: {}", path.display(), source),
            AppError::Parse(e) => e.to_string(),
            AppError::MissingChartField => "x or y field unset".to_string(),
            AppError::NonNumericY { row, value } => format!("row {row}: {value:?}"),
            AppError::MissingMetricColumns { missing } => {
                format!("missing {}", missing.join(", "))
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = AppError::WrongFileType {
            path: PathBuf::from("notes.txt"),
            content_type: Some("text/plain"),
        };
        assert_eq!(err.to_string(), "Please select a CSV file.");
        assert_eq!(
            AppError::MissingChartField.to_string(),
            "Please select valid fields for the chart."
        );
        let err = AppError::NonNumericY {
            row: 3,
            value: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Selected Y-Axis field contains non-numeric values."
        );
    }

    #[test]
    fn test_detail_carries_context() {
        let err = AppError::NonNumericY {
            row: 2,
            value: "abc".to_string(),
        };
        assert_eq!(err.detail(), "row 2: \"abc\"");
        let err = AppError::MissingMetricColumns {
            missing: vec!["Product", "Customer ID"],
        };
        assert_eq!(err.detail(), "missing Product, Customer ID");
    }

    #[test]
    fn test_read_error_names_path() {
        let err = AppError::Read {
            path: PathBuf::from("/tmp/missing.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().starts_with("Could not read /tmp/missing.csv"));
    }
}
