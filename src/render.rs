use crate::error::UploadError;
use crate::table::{ColumnDescriptor, Row};
use crate::upload::TableView;
use serde::Serialize;

/// Request details the page template can use
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestInfo {
    pub method: String,
    pub path: String,
}

/// Values handed to the page template
///
/// On a GET everything but `request` is empty. After an upload either the
/// data fields or `error` are set, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct RenderContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Row>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub describe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RenderContext {
    /// Context for the blank form
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_request(mut self, method: &str, path: &str) -> Self {
        self.request = Some(RequestInfo {
            method: method.to_string(),
            path: path.to_string(),
        });
        self
    }

    pub fn from_view(view: TableView) -> Self {
        Self {
            data: Some(view.data),
            columns: Some(view.columns),
            describe: view.describe,
            ..Self::default()
        }
    }

    pub fn from_error(err: &UploadError) -> Self {
        Self {
            error: Some(err.to_string()),
            ..Self::default()
        }
    }

    pub fn from_outcome(outcome: Result<TableView, UploadError>) -> Self {
        match outcome {
            Ok(view) => Self::from_view(view),
            Err(err) => Self::from_error(&err),
        }
    }
}

/// Blank form context; the GET route never fails
pub fn render_form() -> RenderContext {
    RenderContext::empty()
}
