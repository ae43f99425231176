use crate::error::UploadError;
use csv::{ReaderBuilder, StringRecord};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;

/// Cell values read as missing rather than as text
///
/// Matching is exact and case-sensitive. Missing cells show up as empty
/// strings in the table view and are skipped by the numeric summary.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Editor tag attached to every column of the interactive grid
pub const DEFAULT_EDITOR: &str = "input";

/// Column metadata handed to the grid renderer
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ColumnDescriptor {
    pub title: String,
    pub field: String,
    pub editor: &'static str,
}

impl ColumnDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            title: name.to_string(),
            field: name.to_string(),
            editor: DEFAULT_EDITOR,
        }
    }
}

/// One row of the table view, column name to cell text, in header order
///
/// Serializes as a JSON object whose keys keep the column order of the file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row(Vec<(String, String)>);

impl Row {
    /// Cell text for `column`, if the table has that column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// CSV content parsed into named columns and rows of optional cells
///
/// `None` marks a missing cell: an NA marker in the file or a row shorter
/// than the header.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl ParsedTable {
    /// Parse comma-separated text whose first non-blank line is the header
    ///
    /// Rows shorter than the header are padded with missing cells. A row with
    /// more fields than the header is rejected, since there is no column to
    /// put the extra values in.
    ///
    /// # Examples
    /// ```
    /// use csvview::table::ParsedTable;
    ///
    /// let table = ParsedTable::parse("a,b\n1,2\n").unwrap();
    /// assert_eq!(table.columns(), ["a", "b"]);
    /// assert_eq!(table.row_count(), 1);
    /// ```
    pub fn parse(text: &str) -> Result<Self, UploadError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut reader = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(UploadError::Parse(
                "No columns to parse from file".to_string(),
            ));
        }
        let columns = unique_column_names(&headers);
        let width = columns.len();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            if record.len() > width {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                return Err(UploadError::Parse(format!(
                    "Expected {} fields in line {}, saw {}",
                    width,
                    line,
                    record.len()
                )));
            }
            rows.push(parse_record(&record, width));
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of one column, top to bottom
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(|cell| cell.as_deref()))
    }

    /// One descriptor per column, in header order
    pub fn column_descriptors(&self) -> Vec<ColumnDescriptor> {
        self.columns
            .iter()
            .map(|name| ColumnDescriptor::new(name))
            .collect()
    }

    /// Row records with missing cells rendered as empty strings
    pub fn records(&self) -> Vec<Row> {
        self.rows
            .iter()
            .map(|cells| {
                Row(self
                    .columns
                    .iter()
                    .zip(cells)
                    .map(|(name, cell)| (name.clone(), cell.clone().unwrap_or_default()))
                    .collect())
            })
            .collect()
    }
}

/// Whether a raw cell counts as missing
pub fn is_missing(value: &str) -> bool {
    NA_VALUES.contains(&value)
}

fn parse_record(record: &StringRecord, width: usize) -> Vec<Option<String>> {
    let mut cells: Vec<Option<String>> = record
        .iter()
        .map(|value| {
            if is_missing(value) {
                None
            } else {
                Some(value.to_string())
            }
        })
        .collect();
    cells.resize(width, None);
    cells
}

// Blank header cells become `Unnamed: <i>`; repeats get a `.1`, `.2`, ... suffix
fn unique_column_names(headers: &StringRecord) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(headers.len());

    for (i, header) in headers.iter().enumerate() {
        let base = if header.is_empty() {
            format!("Unnamed: {}", i)
        } else {
            header.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while used.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        used.insert(name.clone());
        names.push(name);
    }

    names
}
