//! Export file downloads.
//!
//! Streams the raw CSV mirror file as an attachment. A file that has
//! never been created yields a plain-text not-found message, not an
//! empty download.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::export::ExportKind;
use crate::service::ServiceError;

/// `GET /download_patients`
pub async fn patients(State(ctx): State<ApiContext>) -> Result<Response, ApiError> {
    download(&ctx, ExportKind::Patients)
}

/// `GET /download_followups`
pub async fn followups(State(ctx): State<ApiContext>) -> Result<Response, ApiError> {
    download(&ctx, ExportKind::Followups)
}

fn download(ctx: &ApiContext, kind: ExportKind) -> Result<Response, ApiError> {
    match ctx.service.export_bytes(kind) {
        Ok(bytes) => Ok((
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", kind.file_name()),
                ),
            ],
            bytes,
        )
            .into_response()),
        Err(ServiceError::Export(e)) if e.is_not_found() => Ok((
            StatusCode::NOT_FOUND,
            format!("No {kind} export file has been created yet."),
        )
            .into_response()),
        Err(other) => Err(other.into()),
    }
}
