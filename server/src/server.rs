//! HTTP server for template verification.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, DefaultBodyLimit, Multipart,
        Query, State,
    },
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use formcheck::report::pdf::DEFAULT_TITLE;
use formcheck::sanitize;
use formcheck::{
    render_report_pdf, FormcheckError, VerificationMode, VerificationReport, VerificationRequest,
    Verifier,
};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::ApiError;

/// Application state shared across handlers
pub struct AppState {
    pub verifier: Verifier,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    mode: VerificationMode,
}

#[derive(Deserialize)]
struct ExportQuery {
    title: Option<String>,
}

pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/verify", post(verify_handler))
        .route("/export", post(export_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(
    config: ServerConfig,
    verifier: Verifier,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mode = verifier.mode();
    let state = Arc::new(AppState { verifier });
    let app = router(state, config.max_upload_bytes);

    let addr = config
        .addr()
        .map_err(|e| format!("Invalid address: {}", e))?;

    info!(%addr, %mode, "Server listening");
    info!("Endpoints:");
    info!("  GET  /health - Health check");
    info!("  POST /verify - Verify a resume against a template (multipart: template, resume)");
    info!("  POST /export - Render a verification report as PDF");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mode: state.verifier.mode(),
    })
}

async fn verify_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VerificationReport>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let multipart = multipart.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let uploads = receive_uploads(multipart).await?;
    info!(
        request_id = %request_id,
        template = uploads.template.is_some(),
        resume = uploads.resume.is_some(),
        "Processing verification request"
    );

    let request = VerificationRequest {
        template: uploads.template.clone(),
        candidate: uploads.resume.clone(),
    };

    let result = tokio::task::spawn_blocking(move || {
        let span = info_span!("request", request_id = %request_id);
        let result = span.in_scope(|| state.verifier.verify(&request));
        // Uploaded files are removed once the verification has read them.
        drop(uploads);
        result
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Verification task failed: {}", e)))?;

    Ok(Json(result?))
}

async fn export_handler(
    Query(query): Query<ExportQuery>,
    payload: Result<Json<VerificationReport>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(report) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let title = query.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let bytes = tokio::task::spawn_blocking(move || render_report_pdf(&report, &title))
        .await
        .map_err(|e| ApiError::Internal(format!("Export task failed: {}", e)))?
        .map_err(FormcheckError::from)?;

    debug!(bytes = bytes.len(), "Rendered report PDF");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"verification-report.pdf\"",
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Uploaded documents, kept alive for as long as the temp directory is.
struct Uploads {
    _dir: TempDir,
    template: Option<PathBuf>,
    resume: Option<PathBuf>,
}

#[derive(Clone, Copy)]
enum UploadSlot {
    Template,
    Resume,
}

impl UploadSlot {
    fn from_field_name(name: Option<&str>) -> Option<Self> {
        match name {
            Some("template") => Some(Self::Template),
            Some("resume") => Some(Self::Resume),
            _ => None,
        }
    }

    fn stem(self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::Resume => "resume",
        }
    }
}

async fn receive_uploads(mut multipart: Multipart) -> Result<Uploads, ApiError> {
    let dir = tempfile::Builder::new()
        .prefix("formcheck-upload-")
        .tempdir()
        .map_err(|e| ApiError::Internal(format!("Failed to create upload directory: {}", e)))?;

    let mut template = None;
    let mut resume = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(e.body_text()))?
    {
        let Some(slot) = UploadSlot::from_field_name(field.name()) else {
            debug!(name = ?field.name(), "Ignoring unexpected multipart field");
            continue;
        };
        let extension = field.file_name().and_then(sanitize::upload_extension);

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
        if bytes.is_empty() {
            warn!(field = slot.stem(), "Ignoring empty upload");
            continue;
        }

        let file_name = match extension {
            Some(ext) => format!("{}.{}", slot.stem(), ext),
            None => slot.stem().to_string(),
        };
        let path = dir.path().join(file_name);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to store upload: {}", e)))?;

        match slot {
            UploadSlot::Template => template = Some(path),
            UploadSlot::Resume => resume = Some(path),
        }
    }

    Ok(Uploads {
        _dir: dir,
        template,
        resume,
    })
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        }
    }
}
