/*!
# CSV Viewer

A small web application that turns an uploaded CSV file into an interactive
table and a numeric summary.

## Overview

The browser posts a single file through an upload form. The server checks it,
parses it and renders the same page again, either with the table and summary
or with an error message. Nothing is stored: every request starts from scratch.

## Pipeline

1. **Type check** - the filename must end in `.csv`
2. **Size check** - the content must not exceed the upload limit (2 MiB by default)
3. **Decode** - the content must be valid UTF-8
4. **Parse** - comma-separated values with a header row
5. **Columns** - one grid column descriptor per header
6. **Rows** - one record per line, missing cells as empty strings
7. **Summary** - count, mean, std, min, quartiles and max of numeric columns

The first failing step decides the error shown on the page. The page is always
served with status 200. The request body is not capped: an upload is read in
full and then measured, so any oversized file is reported as too large.

## Modules

- **upload**: the pipeline and its limits
- **table**: CSV parsing, row records and column descriptors
- **summary**: descriptive statistics and their HTML table
- **render**: the values handed to the page template
- **error**: upload, configuration and startup errors
- **config**: command-line configuration
- **templates**: the page template (feature `web`)
- **app**: routing and handlers (feature `web`)

## Routes

- `GET /` - upload form
- `POST /` - upload a file in the multipart field `file`
- `GET /health` - liveness check
- `/static/...` - stylesheet and grid script
*/

pub mod config;
pub mod error;
pub mod render;
pub mod summary;
pub mod table;
pub mod upload;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod templates;

pub use config::Config;
pub use error::{ConfigError, UploadError};
pub use render::RenderContext;
pub use summary::NumericSummary;
pub use table::{ColumnDescriptor, ParsedTable, Row};
pub use upload::{handle_upload, UploadLimits, UploadedFile};

#[cfg(feature = "web")]
pub use app::create_router;
#[cfg(feature = "web")]
pub use error::AppError;
