//! Client for the `/api/analyze` endpoint of a running server.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::{validate_analysis, AnalysisResult, ErrorResponse};
use crate::error::{format_error_message, ErrorCode};

/// Failures seen by an API caller.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a structured error body.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        code: Option<ErrorCode>,
    },

    /// The request never produced a readable answer.
    #[error("网络错误: {message}")]
    Network { message: String },

    /// A success status with a body that is not an analysis.
    #[error("{message}")]
    Unknown { message: String },
}

impl ClientError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Api { code, .. } => code.unwrap_or(ErrorCode::UnknownError),
            ClientError::Network { .. } => ErrorCode::NetworkError,
            ClientError::Unknown { .. } => ErrorCode::UnknownError,
        }
    }

    /// Text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api {
                code: Some(code),
                message,
                ..
            } => format_error_message(Some(*code), message),
            // No code, or one this build does not know
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Network { message } => {
                format_error_message(Some(ErrorCode::NetworkError), message)
            }
            ClientError::Unknown { message } => {
                format_error_message(Some(ErrorCode::UnknownError), message)
            }
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit `input` and return the validated analysis.
    pub async fn analyze(&self, input: &str) -> Result<AnalysisResult, ClientError> {
        let url = format!("{}/api/analyze", self.base_url);
        debug!(url = %url, chars = input.chars().count(), "Submitting analysis");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "input": input }))
            .send()
            .await
            .map_err(|e| ClientError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ClientError::Network {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            let error: ErrorResponse =
                serde_json::from_str(&body).map_err(|e| ClientError::Network {
                    message: format!("HTTP {}: {}", status.as_u16(), e),
                })?;
            warn!(status = status.as_u16(), code = ?error.code, "Analysis request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error.message,
                code: error.code.and_then(|c| c.parse().ok()),
            });
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| ClientError::Unknown {
                message: format!("响应不是有效的JSON: {}", e),
            })?;
        validate_analysis(&value).map_err(|errors| ClientError::Unknown {
            message: format!("响应数据格式不正确: {}", errors.messages()),
        })
    }
}
