//! The upload pipeline: validate, decode, parse, summarize
//!
//! Each step short-circuits on the first failure. Nothing here keeps state
//! between calls, so the same file always produces the same view.

use crate::error::UploadError;
use crate::summary::NumericSummary;
use crate::table::{ColumnDescriptor, ParsedTable, Row};
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};

/// Default upload limit, 2 MiB
pub const MAX_FILE_SIZE: usize = 2 * 1024 * 1024;

/// Filename suffix accepted by the type check
pub const CSV_SUFFIX: &str = ".csv";

/// Limits the pipeline enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_file_size: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

/// A file as received from the form, fully read into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Everything the page needs to show a parsed file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub data: Vec<Row>,
    pub columns: Vec<ColumnDescriptor>,
    /// Summary table markup, absent when no column is numeric
    pub describe: Option<String>,
}

/// Reject anything whose name does not end in `.csv`
///
/// The match is a case-sensitive suffix check; content is never sniffed.
pub fn check_file_type(filename: &str) -> Result<(), UploadError> {
    if filename.ends_with(CSV_SUFFIX) {
        Ok(())
    } else {
        Err(UploadError::UnsupportedFileType)
    }
}

/// Reject content larger than the configured limit
pub fn check_size(size: usize, limits: &UploadLimits) -> Result<(), UploadError> {
    if size > limits.max_file_size {
        Err(UploadError::FileTooLarge {
            size,
            limit: limits.max_file_size,
        })
    } else {
        Ok(())
    }
}

/// Decode content strictly as UTF-8
pub fn decode(content: &[u8]) -> Result<&str, UploadError> {
    Ok(std::str::from_utf8(content)?)
}

/// Run a received file through the whole pipeline
///
/// # Examples
/// ```
/// use csvview::upload::{handle_upload, UploadLimits, UploadedFile};
///
/// let file = UploadedFile::new("data.csv", "x,y\n1,2\n");
/// let view = handle_upload(&file, &UploadLimits::default()).unwrap();
/// assert_eq!(view.columns.len(), 2);
/// assert!(view.describe.is_some());
/// ```
pub fn handle_upload(file: &UploadedFile, limits: &UploadLimits) -> Result<TableView, UploadError> {
    check_file_type(&file.filename)?;
    check_size(file.size(), limits)?;
    let text = decode(&file.content)?;
    let table = ParsedTable::parse(text)?;

    let columns = table.column_descriptors();
    let data = table.records();
    let describe = NumericSummary::from_table(&table).map(|summary| summary.to_html());

    Ok(TableView {
        data,
        columns,
        describe,
    })
}

/// Same as [`handle_upload`], with a panic anywhere in the pipeline reported
/// as [`UploadError::Unexpected`] instead of unwinding into the server.
pub fn handle_upload_guarded(
    file: &UploadedFile,
    limits: &UploadLimits,
) -> Result<TableView, UploadError> {
    panic::catch_unwind(AssertUnwindSafe(|| handle_upload(file, limits)))
        .unwrap_or_else(|payload| Err(UploadError::Unexpected(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "pipeline panicked".to_string()
    }
}
