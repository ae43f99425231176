use crate::table::ParsedTable;
use std::fmt;

/// CSS classes put on the rendered summary table
pub const SUMMARY_CLASSES: &str = "dataframe table-auto border border-collapse";

/// Row labels of the summary table, top to bottom
pub const STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Descriptive statistics of one numeric column
///
/// Values are already rounded to two decimals. `std` is the sample standard
/// deviation and is `NaN` for a column with a single value.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnStats {
    /// Compute statistics over the non-missing values of a column
    ///
    /// Returns `None` for an empty slice.
    pub fn compute(name: &str, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = if n < 2 {
            f64::NAN
        } else {
            let variance = sorted
                .iter()
                .map(|&x| {
                    let diff = x - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (n - 1) as f64;
            variance.sqrt()
        };

        Some(Self {
            name: name.to_string(),
            count: n,
            mean: round2(mean),
            std: round2(std),
            min: round2(sorted[0]),
            q25: round2(quantile(&sorted, 0.25)),
            median: round2(quantile(&sorted, 0.5)),
            q75: round2(quantile(&sorted, 0.75)),
            max: round2(sorted[n - 1]),
        })
    }

    /// Statistic values in [`STAT_LABELS`] order
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

/// Summary of every numeric column of a table
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    columns: Vec<ColumnStats>,
}

impl NumericSummary {
    /// Build the summary, or `None` when the table has no numeric column
    ///
    /// A column is numeric when it has at least one non-missing cell and every
    /// non-missing cell parses as a number.
    pub fn from_table(table: &ParsedTable) -> Option<Self> {
        let columns: Vec<ColumnStats> = table
            .columns()
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                let values = numeric_values(table.column_values(i))?;
                ColumnStats::compute(name, &values)
            })
            .collect();

        if columns.is_empty() {
            None
        } else {
            Some(Self { columns })
        }
    }

    pub fn columns(&self) -> &[ColumnStats] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Render as an HTML table: one header cell per column, one body row per
    /// statistic.
    pub fn to_html(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NumericSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<table border=\"1\" class=\"{}\">", SUMMARY_CLASSES)?;
        writeln!(f, "  <thead>")?;
        writeln!(f, "    <tr style=\"text-align: right;\">")?;
        writeln!(f, "      <th></th>")?;
        for column in &self.columns {
            writeln!(f, "      <th>{}</th>", escape_html(&column.name))?;
        }
        writeln!(f, "    </tr>")?;
        writeln!(f, "  </thead>")?;
        writeln!(f, "  <tbody>")?;

        let values: Vec<[f64; 8]> = self.columns.iter().map(ColumnStats::values).collect();
        for (i, label) in STAT_LABELS.iter().enumerate() {
            writeln!(f, "    <tr>")?;
            writeln!(f, "      <th>{}</th>", label)?;
            for column in &values {
                writeln!(f, "      <td>{:.2}</td>", column[i])?;
            }
            writeln!(f, "    </tr>")?;
        }

        writeln!(f, "  </tbody>")?;
        write!(f, "</table>")
    }
}

/// Parse a number the way a CSV cell is read: surrounding whitespace allowed
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

// `None` unless every present cell is a number and at least one is present
fn numeric_values<'a>(cells: impl Iterator<Item = Option<&'a str>>) -> Option<Vec<f64>> {
    let mut values = Vec::new();
    for cell in cells.flatten() {
        values.push(parse_number(cell)?);
    }
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

// Linear interpolation between the closest ranks of a sorted slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
    }
}

// Ties go to the even neighbour: 0.125 -> 0.12, 0.375 -> 0.38
fn round2(x: f64) -> f64 {
    if x.is_finite() {
        (x * 100.0).round_ties_even() / 100.0
    } else {
        x
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
