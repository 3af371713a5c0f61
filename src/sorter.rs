// src/sorter.rs

use std::cmp::Ordering;

use strum_macros::EnumIter;
use tracing::debug;

use crate::parser::RowRecord;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter)]
pub enum SortMode {
    #[default]
    None,
    Ascending,
    Descending,
    Alphabetical,
    ReverseAlphabetical,
}

impl SortMode {
    pub fn label(self) -> &'static str {
        match self {
            SortMode::None => "Sort by",
            SortMode::Ascending => "Ascending",
            SortMode::Descending => "Descending",
            SortMode::Alphabetical => "Alphabetical",
            SortMode::ReverseAlphabetical => "Reverse Alphabetical",
        }
    }

    pub fn tag(self) -> Option<&'static str> {
        match self {
            SortMode::None => None,
            SortMode::Ascending => Some("asc"),
            SortMode::Descending => Some("desc"),
            SortMode::Alphabetical => Some("alph"),
            SortMode::ReverseAlphabetical => Some("revAlph"),
        }
    }
}

/// Parses a cell as a number. Blank text and NaN are rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| !n.is_nan())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Reads the leading number of a cell and ignores whatever follows it, so
/// `12kg` is 12 and `3.5%` is 3.5. Infinite or overflowing values are
/// rejected.
pub fn parse_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_digits = count_digits(bytes.get(end + 1 + sign..).unwrap_or_default());
        if exp_digits > 0 {
            end += 1 + sign + exp_digits;
        }
    }

    text[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Case-insensitive ordering with lowercase ahead of uppercase on ties.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a
        .cmp(folded_b)
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

// Unparsable cells go after every number in both directions.
fn compare_numeric(a: &str, b: &str, ascending: bool) -> Ordering {
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn compare_cells(a: &str, b: &str, mode: SortMode) -> Ordering {
    match mode {
        SortMode::Ascending => compare_numeric(a, b, true),
        SortMode::Descending => compare_numeric(a, b, false),
        SortMode::Alphabetical => locale_compare(a, b),
        SortMode::ReverseAlphabetical => locale_compare(b, a),
        SortMode::None => Ordering::Equal,
    }
}

/// Stable reorder of `rows` by one column. Prior order survives among ties.
pub fn sort_rows(rows: &mut [RowRecord], column: usize, mode: SortMode) {
    if mode == SortMode::None {
        return;
    }

    rows.sort_by(|a, b| {
        let a = a.get(column).map(String::as_str).unwrap_or("");
        let b = b.get(column).map(String::as_str).unwrap_or("");
        compare_cells(a, b, mode)
    });
    debug!(column, ?mode, rows = rows.len(), "sorted rows");
}
