//! Error types for the upload pipeline and server startup

use thiserror::Error;

/// Reason an upload could not be turned into a table view
///
/// Every variant ends up as a message on the form page. The HTTP-style status
/// returned by [`UploadError::status_code`] is only used for logging; the page
/// itself is always served with 200.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The request carried no `file` field
    #[error("No file uploaded.")]
    MissingFile,

    /// Filename does not end in `.csv`
    #[error("Only CSV files are allowed.")]
    UnsupportedFileType,

    /// Content is larger than the configured limit
    #[error("File too large (max {}).", format_limit(.limit))]
    FileTooLarge { size: usize, limit: usize },

    /// Content is not valid UTF-8
    #[error("Failed to decode file. Ensure it's valid UTF-8: {0}")]
    Decode(String),

    /// Content is not structurally valid CSV
    #[error("Invalid CSV format: {0}")]
    Parse(String),

    /// Anything else: multipart read failures, panics inside the pipeline
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl UploadError {
    /// HTTP-style status this failure would map to
    pub fn status_code(&self) -> u16 {
        match self {
            UploadError::MissingFile => 422,
            UploadError::UnsupportedFileType => 400,
            UploadError::FileTooLarge { .. } => 413,
            UploadError::Decode(_) => 400,
            UploadError::Parse(_) => 400,
            UploadError::Unexpected(_) => 500,
        }
    }

    /// Short machine-readable name used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            UploadError::MissingFile => "missing_file",
            UploadError::UnsupportedFileType => "unsupported_file_type",
            UploadError::FileTooLarge { .. } => "file_too_large",
            UploadError::Decode(_) => "decode_failure",
            UploadError::Parse(_) => "parse_failure",
            UploadError::Unexpected(_) => "unexpected_failure",
        }
    }
}

impl From<std::str::Utf8Error> for UploadError {
    fn from(err: std::str::Utf8Error) -> Self {
        UploadError::Decode(err.to_string())
    }
}

impl From<csv::Error> for UploadError {
    fn from(err: csv::Error) -> Self {
        UploadError::Parse(err.to_string())
    }
}

/// Render a byte limit the way the form page shows it: whole mebibytes as
/// `2MB`, anything else in bytes.
fn format_limit(limit: &usize) -> String {
    const MIB: usize = 1024 * 1024;
    let limit = *limit;
    if limit >= MIB && limit % MIB == 0 {
        format!("{}MB", limit / MIB)
    } else {
        format!("{} bytes", limit)
    }
}

/// Invalid command-line configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid port: {0}")]
    InvalidPort(String),

    #[error("invalid value for {flag}: {value}")]
    InvalidValue { flag: String, value: String },

    #[error("missing value for {0}")]
    MissingValue(String),

    #[error("unknown argument: {0}")]
    UnknownArgument(String),
}

/// Startup failure of the web server
#[cfg(feature = "web")]
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to register templates: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
