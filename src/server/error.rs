use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::analysis::ErrorResponse;
use crate::error::AnalyzeError;

/// Message for requests that need a stored analysis when there is none.
pub const NO_ANALYSIS_MESSAGE: &str = "没有分析数据";

/// Failures of the JSON API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Analyze(#[from] AnalyzeError),

    #[error("{}", NO_ANALYSIS_MESSAGE)]
    NoAnalysis,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Analyze(err) => {
                StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::NoAnalysis => StatusCode::NOT_FOUND,
        }
    }

    pub fn body(&self) -> ErrorResponse {
        match self {
            ApiError::Analyze(err) => ErrorResponse {
                error: err.kind().to_string(),
                message: err.to_string(),
                code: Some(err.code().to_string()),
            },
            ApiError::NoAnalysis => ErrorResponse {
                error: "NOT_FOUND".to_string(),
                message: self.to_string(),
                code: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.body();

        if status.is_server_error() {
            error!(status = status.as_u16(), code = ?body.code, error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), code = ?body.code, error = %self, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
