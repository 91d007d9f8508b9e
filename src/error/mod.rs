use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Analysis error: {0}")]
    Analyze(#[from] AnalyzeError),

    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while talking to the chat-completion provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider credential is not configured")]
    MissingCredential,

    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    #[error("Invalid response envelope: {message}")]
    InvalidEnvelope { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// One violated constraint, located by a dotted field path such as
/// `logicGraph.nodes[2].id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every constraint a value violated, in the order they were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// Shorthand for a failure with a single issue.
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![ValidationIssue {
                path: path.into(),
                message: message.into(),
            }],
        }
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Whether any issue sits at exactly `path`.
    pub fn has_path(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }

    /// Messages only, joined for display next to a form control.
    pub fn messages(&self) -> String {
        self.issues
            .iter()
            .map(|issue| issue.message.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let summary = self
            .issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&summary)
    }
}

impl std::error::Error for ValidationErrors {}

/// Machine-readable error codes shared by the HTTP API and its clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    MissingApiKey,
    OpenaiApiError,
    NoContent,
    InvalidResponse,
    InternalServerError,
    /// Only produced on the client side of the API.
    NetworkError,
    /// Only produced on the client side of the API.
    UnknownError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::MissingApiKey => "MISSING_API_KEY",
            ErrorCode::OpenaiApiError => "OPENAI_API_ERROR",
            ErrorCode::NoContent => "NO_CONTENT",
            ErrorCode::InvalidResponse => "INVALID_RESPONSE",
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ErrorCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INVALID_INPUT" => Ok(ErrorCode::InvalidInput),
            "MISSING_API_KEY" => Ok(ErrorCode::MissingApiKey),
            "OPENAI_API_ERROR" => Ok(ErrorCode::OpenaiApiError),
            "NO_CONTENT" => Ok(ErrorCode::NoContent),
            "INVALID_RESPONSE" => Ok(ErrorCode::InvalidResponse),
            "INTERNAL_SERVER_ERROR" => Ok(ErrorCode::InternalServerError),
            "NETWORK_ERROR" => Ok(ErrorCode::NetworkError),
            "UNKNOWN_ERROR" => Ok(ErrorCode::UnknownError),
            _ => Err(format!("Unknown error code: {}", s)),
        }
    }
}

/// Failures of a single analysis request.
///
/// Display strings are user facing; they end up in the `message` field of the
/// API error body.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("输入验证失败：{}", .0.messages())]
    Validation(ValidationErrors),

    #[error("OpenAI API key 未配置")]
    Configuration,

    #[error("OpenAI API 错误: {message}{}", code_suffix(.provider_code))]
    Provider {
        status: u16,
        message: String,
        provider_code: Option<String>,
    },

    #[error("OpenAI 返回空响应")]
    EmptyResponse,

    #[error("AI 返回的数据格式不正确")]
    ResponseShape(ValidationErrors),

    #[error("无法连接 AI 服务: {message}")]
    Network { message: String },

    #[error("{message}")]
    Internal { message: String },
}

impl AnalyzeError {
    /// Code the client uses to pick its display text.
    pub fn code(&self) -> ErrorCode {
        match self {
            AnalyzeError::Validation(_) => ErrorCode::InvalidInput,
            AnalyzeError::Configuration => ErrorCode::MissingApiKey,
            AnalyzeError::Provider { .. } => ErrorCode::OpenaiApiError,
            AnalyzeError::EmptyResponse => ErrorCode::NoContent,
            AnalyzeError::ResponseShape(_) => ErrorCode::InvalidResponse,
            AnalyzeError::Network { .. } | AnalyzeError::Internal { .. } => {
                ErrorCode::InternalServerError
            }
        }
    }

    /// Coarse error category, sent as the `error` field of the API body.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyzeError::Validation(_) => "VALIDATION_ERROR",
            AnalyzeError::Configuration => "CONFIGURATION_ERROR",
            AnalyzeError::Provider { .. } => "OPENAI_API_ERROR",
            AnalyzeError::EmptyResponse => "EMPTY_RESPONSE",
            AnalyzeError::ResponseShape(_) => "RESPONSE_VALIDATION_ERROR",
            AnalyzeError::Network { .. } => "NETWORK_ERROR",
            AnalyzeError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// HTTP status for the API response. Provider failures keep the
    /// provider's own status.
    pub fn status(&self) -> u16 {
        match self {
            AnalyzeError::Validation(_) => 400,
            AnalyzeError::Provider { status, .. } => *status,
            AnalyzeError::Configuration
            | AnalyzeError::EmptyResponse
            | AnalyzeError::ResponseShape(_)
            | AnalyzeError::Network { .. }
            | AnalyzeError::Internal { .. } => 500,
        }
    }
}

impl From<ProviderError> for AnalyzeError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::MissingCredential => AnalyzeError::Configuration,
            ProviderError::Api {
                status,
                message,
                code,
            } => AnalyzeError::Provider {
                status,
                message,
                provider_code: code,
            },
            ProviderError::Timeout { timeout_ms } => AnalyzeError::Network {
                message: format!("请求超时 ({}ms)", timeout_ms),
            },
            ProviderError::Http(e) => AnalyzeError::Network {
                message: e.to_string(),
            },
            ProviderError::InvalidEnvelope { message } => AnalyzeError::Internal { message },
        }
    }
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_ref().map(|c| format!(" ({})", c)).unwrap_or_default()
}

/// Text shown to users for an API failure.
///
/// Known codes get a fixed message; other codes show the server's message.
/// `None` stands for a failure that never produced a structured API error.
pub fn format_error_message(code: Option<ErrorCode>, message: &str) -> String {
    match code {
        Some(ErrorCode::InvalidInput) => "输入格式不正确，请检查后重试".to_string(),
        Some(ErrorCode::MissingApiKey) => "服务配置错误，请联系管理员".to_string(),
        Some(ErrorCode::OpenaiApiError) => "AI 服务暂时不可用，请稍后重试".to_string(),
        Some(ErrorCode::NetworkError) => "网络连接失败，请检查网络后重试".to_string(),
        Some(
            ErrorCode::NoContent
            | ErrorCode::InvalidResponse
            | ErrorCode::InternalServerError
            | ErrorCode::UnknownError,
        ) => message.to_string(),
        None => "发生未知错误，请重试".to_string(),
    }
}

/// Clipboard write failures
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("No clipboard command available on this system")]
    Unavailable,

    #[error("Clipboard command `{program}` failed: {message}")]
    CommandFailed { program: String, message: String },

    #[error("Clipboard I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Result type alias for analysis operations
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;
