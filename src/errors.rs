// src/errors.rs
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VectorQuoteError {
    #[error("Please upload a valid image file (JPG, PNG, GIF, BMP, or WebP), got {0}")]
    InvalidFileType(String),

    #[error("File size must be less than 10MB ({size} bytes uploaded)")]
    FileTooLarge { size: usize },

    #[error("Failed to analyze image. Please try again.")]
    AnalysisFailed,

    #[error("Analysis for session {0} has not completed")]
    AnalysisNotReady(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("No open order for session {0}")]
    OrderNotFound(String),

    #[error("Order cannot move from {from} to {to}")]
    InvalidOrderState { from: String, to: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),
}

impl VectorQuoteError {
    fn label(&self) -> &'static str {
        match self {
            VectorQuoteError::InvalidFileType(_) => "Invalid file type",
            VectorQuoteError::FileTooLarge { .. } => "File too large",
            VectorQuoteError::AnalysisFailed => "Analysis failed",
            VectorQuoteError::AnalysisNotReady(_) => "Analysis not ready",
            VectorQuoteError::SessionNotFound(_) => "Session not found",
            VectorQuoteError::OrderNotFound(_) => "Order not found",
            VectorQuoteError::InvalidOrderState { .. } => "Invalid order state",
            VectorQuoteError::Validation(_) => "Validation error",
            VectorQuoteError::ImageProcessing(_) => "Image processing error",
        }
    }
}

impl ResponseError for VectorQuoteError {
    fn status_code(&self) -> StatusCode {
        match self {
            VectorQuoteError::InvalidFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            VectorQuoteError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            VectorQuoteError::AnalysisFailed => StatusCode::INTERNAL_SERVER_ERROR,
            VectorQuoteError::AnalysisNotReady(_) | VectorQuoteError::InvalidOrderState { .. } => {
                StatusCode::CONFLICT
            }
            VectorQuoteError::SessionNotFound(_) | VectorQuoteError::OrderNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            VectorQuoteError::Validation(_) | VectorQuoteError::ImageProcessing(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.label(),
            "message": self.to_string()
        }))
    }
}
