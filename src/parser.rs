// src/parser.rs

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::data_loader::RawDocument;
use crate::error::Result;

pub const DELIMITER: u8 = b',';

/// One column name and the source column it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub column: usize,
}

/// Ordered column names. Empty header cells are skipped, so the position in
/// the set and the source column can differ.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    headers: Vec<Header>,
}

impl HeaderSet {
    pub fn new(headers: Vec<Header>) -> Self {
        HeaderSet { headers }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Header> {
        self.headers.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.headers.iter()
    }

    #[cfg(test)]
    pub fn names(&self) -> Vec<&str> {
        self.headers.iter().map(|h| h.name.as_str()).collect()
    }

    /// Source column of the first header named `name`.
    pub fn column_of(&self, name: &str) -> Option<usize> {
        self.headers.iter().find(|h| h.name == name).map(|h| h.column)
    }

    /// Header text for a source column.
    pub fn name_of(&self, column: usize) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.column == column)
            .map(|h| h.name.as_str())
    }

    /// Width needed to show every source column that has a header.
    pub fn span(&self) -> usize {
        self.headers.iter().map(|h| h.column + 1).max().unwrap_or(0)
    }
}

pub type RowRecord = Vec<String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub headers: HeaderSet,
    pub rows: Vec<RowRecord>,
}

/// Strips one leading and one trailing double quote.
pub fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

fn clean_cell(value: &str) -> String {
    strip_quotes(value.trim()).to_string()
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty()) && record.len() <= 1
}

// Quoting is off: a comma inside a quoted cell still ends the field, and
// quotes are stripped from cell edges afterwards.
pub fn parse(doc: &RawDocument) -> Result<ParsedDocument> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(doc.text.as_bytes());

    let mut records = reader.records();

    let headers = match records.next() {
        Some(record) => {
            let record = record?;
            let headers = record
                .iter()
                .enumerate()
                .filter(|(_, h)| !h.trim().is_empty())
                .map(|(column, h)| Header {
                    name: clean_cell(h),
                    column,
                })
                .collect();
            HeaderSet::new(headers)
        }
        None => HeaderSet::default(),
    };

    let mut rows = Vec::new();
    for result in records {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        rows.push(record.iter().map(clean_cell).collect());
    }

    debug!(
        columns = headers.len(),
        rows = rows.len(),
        "parsed document"
    );
    Ok(ParsedDocument { headers, rows })
}
