//! Error types for braid operations.
//!
//! Provider failures never surface through these types at orchestration time:
//! adapters turn them into empty result lists. What remains is configuration
//! misuse, which is rejected when an orchestrator is constructed, and the
//! errors raised by backend clients before an adapter swallows them.

use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for braid operations.
pub type BraidResult<T> = Result<T, BraidError>;

/// Main error type for all braid operations.
#[derive(Error, Debug)]
pub enum BraidError {
    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        details: HashMap<String, String>,
        suggestion: Option<String>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A retrieval backend reported a failure.
    #[error("{backend} backend error: {message}")]
    Backend {
        backend: String,
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network error.
    #[error("Network error: {message}")]
    Network {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A backend call exceeded its deadline.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Tool execution over MCP failed.
    #[error("Tool error: {message}")]
    Tool { message: String, code: ErrorCode },

    /// Parse error.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValInvalidInput,
    ValOutOfRange,

    // Configuration (CFG_xxx)
    CfgInvalid,

    // Backend (BKD_xxx)
    BkdOperationFailed,
    BkdInvalidResponse,

    // Network (NET_xxx)
    NetTimeout,
    NetConnectionFailed,

    // Tool (TOOL_xxx)
    ToolExecutionFailed,

    // Parse (PARSE_xxx)
    ParseInvalidJson,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValOutOfRange => "VAL_002",
            ErrorCode::CfgInvalid => "CFG_001",
            ErrorCode::BkdOperationFailed => "BKD_001",
            ErrorCode::BkdInvalidResponse => "BKD_002",
            ErrorCode::NetTimeout => "NET_001",
            ErrorCode::NetConnectionFailed => "NET_002",
            ErrorCode::ToolExecutionFailed => "TOOL_001",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl BraidError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            details: HashMap::new(),
            suggestion: None,
        }
    }

    /// Create a validation error for a value outside its allowed range.
    pub fn out_of_range(field: &str, value: impl ToString, allowed: &str) -> Self {
        let mut details = HashMap::new();
        details.insert("field".to_string(), field.to_string());
        details.insert("value".to_string(), value.to_string());
        Self::Validation {
            message: format!("{} must be {}", field, allowed),
            code: ErrorCode::ValOutOfRange,
            details,
            suggestion: Some(format!("Set {} to a value {}", field, allowed)),
        }
    }

    /// Create a backend error.
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.into(),
            message: message.into(),
            code: ErrorCode::BkdOperationFailed,
            source: None,
        }
    }

    /// Create a backend error for a malformed response body.
    pub fn invalid_response(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.into(),
            message: message.into(),
            code: ErrorCode::BkdInvalidResponse,
            source: None,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            code: ErrorCode::NetConnectionFailed,
            source: None,
        }
    }

    /// Create a tool execution error.
    pub fn tool(message: impl Into<String>) -> Self {
        Self::Tool {
            message: message.into(),
            code: ErrorCode::ToolExecutionFailed,
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidJson,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::Configuration(_) => ErrorCode::CfgInvalid,
            Self::Backend { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Timeout(_) => ErrorCode::NetTimeout,
            Self::Tool { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::Configuration(_) => Some("Please check your orchestration configuration"),
            Self::Backend { .. } => Some("Please check that the retrieval backend is reachable"),
            Self::Timeout(_) => Some("Increase provider_timeout_ms or check backend latency"),
            _ => None,
        }
    }

    /// Whether this error belongs to the configuration-misuse class that is
    /// rejected before any query runs.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Validation { .. })
    }
}
