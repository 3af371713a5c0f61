// src/data_loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{AppError, Result};

pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Unparsed file content, kept whole for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub source: PathBuf,
    pub text: String,
}

impl RawDocument {
    pub fn new(source: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        RawDocument {
            source: source.into(),
            text: text.into(),
        }
    }
}

/// Whole-file read primitive.
pub trait FileReader {
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

pub struct FsReader;

impl FileReader for FsReader {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Content type reported for a path, derived from its extension.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "csv" => Some(CSV_CONTENT_TYPE),
        "tsv" => Some("text/tab-separated-values"),
        "txt" => Some("text/plain"),
        "json" => Some("application/json"),
        _ => None,
    }
}

/// Checks the content type and reads the whole file.
pub fn load_document(reader: &dyn FileReader, path: &Path) -> Result<RawDocument> {
    let content_type = content_type_for(path);
    if content_type != Some(CSV_CONTENT_TYPE) {
        return Err(AppError::WrongFileType {
            path: path.to_path_buf(),
            content_type,
        });
    }

    let text = reader.read_to_string(path)?;
    info!(path = %path.display(), bytes = text.len(), "loaded document");
    debug!(lines = text.lines().count(), "document line count");
    Ok(RawDocument::new(path, text))
}
