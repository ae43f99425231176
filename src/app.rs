use axum::{
    extract::{DefaultBodyLimit, Multipart, OriginalUri, State},
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::error::{AppError, UploadError};
use crate::render::{render_form, RenderContext};
use crate::templates::Templates;
use crate::upload::{self, UploadLimits, UploadedFile};

/// Multipart field carrying the uploaded file
pub const FILE_FIELD: &str = "file";

/// Read-only state shared by every request
pub struct AppState {
    templates: Templates,
    limits: UploadLimits,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            templates: Templates::new()?,
            limits: config.limits(),
        })
    }
}

/// Build the router: the upload form on `/`, assets on `/static`
pub fn create_router(config: &Config) -> Result<Router, AppError> {
    let app_state = Arc::new(AppState::new(config)?);

    Ok(Router::new()
        .route("/", get(serve_form).post(upload_csv))
        .route("/health", get(|| async { "OK" }))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(DefaultBodyLimit::disable())
        .with_state(app_state))
}

pub async fn run(config: Config) -> Result<(), AppError> {
    let app = create_router(&config)?;

    let address = config.address();
    let listener = TcpListener::bind(&address).await?;
    log::info!(
        "Listening on http://{} (upload limit {} bytes, static dir {})",
        address,
        config.max_upload_bytes,
        config.static_dir.display()
    );
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_form(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let ctx = render_form().with_request(method.as_str(), uri.path());
    render_page(&state, &ctx)
}

async fn upload_csv(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    multipart: Multipart,
) -> Response {
    let outcome = match receive_file(multipart).await {
        Ok(file) => {
            log::info!("Received {} ({} bytes)", file.filename, file.size());
            upload::handle_upload_guarded(&file, &state.limits)
        }
        Err(err) => Err(err),
    };

    match &outcome {
        Ok(view) => log::info!(
            "Parsed upload: {} rows, {} columns, summary: {}",
            view.data.len(),
            view.columns.len(),
            view.describe.is_some()
        ),
        Err(err) if matches!(err, UploadError::Unexpected(_)) => {
            log::error!("Upload failed ({}, {}): {}", err.kind(), err.status_code(), err)
        }
        Err(err) => {
            log::warn!("Upload rejected ({}, {}): {}", err.kind(), err.status_code(), err)
        }
    }

    let ctx = RenderContext::from_outcome(outcome).with_request(method.as_str(), uri.path());
    render_page(&state, &ctx)
}

// Find the `file` field, check its name, then read it whole
async fn receive_file(mut multipart: Multipart) -> Result<UploadedFile, UploadError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        upload::check_file_type(&filename)?;

        let content = field.bytes().await.map_err(multipart_error)?;
        return Ok(UploadedFile::new(filename, content.to_vec()));
    }

    Err(UploadError::MissingFile)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> UploadError {
    UploadError::Unexpected(err.body_text())
}

fn render_page(state: &AppState, ctx: &RenderContext) -> Response {
    match state.templates.render_index(ctx) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            log::error!("Failed to render page: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                "Failed to render page",
            )
                .into_response()
        }
    }
}
