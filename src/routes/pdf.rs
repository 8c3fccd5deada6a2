use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use tracing::info;

use crate::agents::{AnalysisAgent, DocumentAnalysis};
use crate::models::AppState;
use crate::routes::session::ActiveSession;
use crate::types::{AppError, AppResult};

const FILE_FIELD: &str = "file";

pub fn router(state: AppState) -> Router {
    let upload_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/api/pdf", post(analyze_pdf).get(cached_analysis))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

struct UploadedPdf {
    filename: Option<String>,
    data: Bytes,
}

fn is_pdf(filename: Option<&str>, content_type: Option<&str>) -> bool {
    let by_type = content_type
        .and_then(|ct| ct.parse::<mime::Mime>().ok())
        .map(|m| m.essence_str() == mime::APPLICATION_PDF.essence_str())
        .unwrap_or(false);
    let by_name = filename
        .map(|name| name.to_ascii_lowercase().ends_with(".pdf"))
        .unwrap_or(false);

    by_type || by_name
}

/// Keep the body-limit status instead of reporting every failure as malformed.
fn upload_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{}: {}", context, err.body_text()))
    } else {
        AppError::InvalidRequest(format!("{}: {}", context, err.body_text()))
    }
}

async fn read_upload(multipart: &mut Multipart) -> AppResult<UploadedPdf> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error("Malformed upload", e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        if !is_pdf(filename.as_deref(), field.content_type()) {
            return Err(AppError::InvalidRequest("Only PDF files are accepted".to_string()));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| upload_error("Failed to read upload", e))?;

        return Ok(UploadedPdf { filename, data });
    }

    Err(AppError::InvalidRequest(format!("Missing '{}' field", FILE_FIELD)))
}

async fn analyze_pdf(
    State(state): State<AppState>,
    active: ActiveSession,
    mut multipart: Multipart,
) -> AppResult<Json<DocumentAnalysis>> {
    let upload = read_upload(&mut multipart).await?;
    info!(
        session_id = %active.id,
        filename = ?upload.filename,
        size = upload.data.len(),
        "PDF upload received"
    );

    let mut session = active.handle.lock().await;
    let analysis = AnalysisAgent::analyze(
        &mut session,
        &state.models,
        state.extractor.clone(),
        upload.filename,
        upload.data,
    )
    .await?;

    Ok(Json(analysis))
}

async fn cached_analysis(active: ActiveSession) -> Json<Option<DocumentAnalysis>> {
    let session = active.handle.lock().await;
    Json(session.pdf_analysis.clone().map(|analysis| DocumentAnalysis {
        analysis,
        cached: true,
    }))
}
