use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::pipeline::{FailureOutcome, PipelineError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Body is always `{ "error": "<message>" }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid upload: {0}")]
    Upload(#[from] MultipartError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upload(e) => (e.status(), format!("Invalid upload: {}", e.body_text())),
            AppError::Pipeline(e) => match e.outcome() {
                FailureOutcome::RejectedInput => (StatusCode::BAD_REQUEST, rejected_message(e)),
                FailureOutcome::UpstreamFailure => {
                    tracing::error!("Upstream failure: {e}");
                    (StatusCode::INTERNAL_SERVER_ERROR, upstream_message(e))
                }
                FailureOutcome::Internal => {
                    tracing::error!("Internal error: {e:?}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Resume text extraction is temporarily unavailable".to_string(),
                    )
                }
            },
        }
    }
}

fn rejected_message(e: &PipelineError) -> String {
    match e {
        PipelineError::TextTooShort { chars, min } => format!(
            "Insufficient text extracted from the resume ({chars} characters, at least {min} required). \
             The file may be mostly images or nearly empty; upload a resume with more readable text."
        ),
        PipelineError::Extraction(_) => "The resume could not be read. The file may be corrupted \
             or in an unsupported format; upload a PDF or a clear image of your resume."
            .to_string(),
        _ => "No text could be extracted from the resume. It may be an image-based PDF that \
             could not be recognised, a corrupted file, or empty."
            .to_string(),
    }
}

fn upstream_message(e: &PipelineError) -> String {
    match e {
        PipelineError::MalformedAnalysis(_) => {
            "Resume analysis failed: the AI service returned an unreadable response. Please try again."
                .to_string()
        }
        _ => "Resume analysis failed: the AI service is unavailable. Please try again later."
            .to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_client_error() {
            tracing::warn!("Request rejected ({status}): {self}");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
