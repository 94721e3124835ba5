use actix_multipart::MultipartError;
use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Body returned for every failed prediction. The cause is only logged.
pub const GENERIC_ERROR_MESSAGE: &str = "Error processing image";

/// Everything that can go wrong between receiving an upload and rendering a prediction.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("multipart payload error: {0}")]
    Multipart(#[from] MultipartError),
    #[error("no `file` field in the upload")]
    MissingFile,
    #[error("staging upload failed: {0}")]
    Staging(#[from] std::io::Error),
    #[error("reading staged upload failed: {0}")]
    Read(#[source] std::io::Error),
    #[error("image decoding failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("model load failed: {0}")]
    ModelLoad(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("unexpected model output: expected {expected} scores, got {actual}")]
    UnexpectedOutput { expected: usize, actual: usize },
    #[error("blocking task failed: {0}")]
    Blocking(#[from] BlockingError),
}

impl ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            message: GENERIC_ERROR_MESSAGE.to_string(),
        })
    }
}
