//! 统一错误模型
//! 定义客户端所有错误类型与分类规则

use serde::Serialize;
use thiserror::Error;

/// 结果类型别名
pub type Result<T> = std::result::Result<T, ApiError>;

/// 表单字段级错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// 客户端错误类型
///
/// 按响应状态分类：401 触发会话清除，403/404/其他状态原样上抛，
/// 无响应（网络失败）与请求构造失败使用独立变体区分。
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Response decode error: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// 获取对应的 HTTP 状态码（非 HTTP 错误返回 None）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 获取用户友好的错误消息（不包含内部细节）
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Authentication failed".to_string(),
            ApiError::Forbidden => "Access denied".to_string(),
            ApiError::NotFound(msg) => format!("Resource not found: {}", msg),
            ApiError::Api { message, .. } => message.clone(),
            ApiError::Validation(fields) => fields
                .iter()
                .map(|f| f.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            ApiError::Network(_) => "Network error occurred".to_string(),
            ApiError::InvalidRequest(_) => "Invalid request".to_string(),
            ApiError::Decode(_) => "Unexpected server response".to_string(),
            ApiError::Storage(_) => "Local storage error".to_string(),
            ApiError::Config(msg) => format!("Configuration error: {}", msg),
        }
    }

    /// 服务端未提供 detail 时填充调用方的本地化消息
    pub fn with_fallback(self, fallback: &str) -> Self {
        match self {
            ApiError::Api { status, message } if message.is_empty() => ApiError::Api {
                status,
                message: fallback.to_string(),
            },
            other => other,
        }
    }

    // 便捷方法
    pub fn not_found(msg: &str) -> Self {
        ApiError::NotFound(msg.to_string())
    }

    pub fn invalid_request(msg: &str) -> Self {
        ApiError::InvalidRequest(msg.to_string())
    }

    pub fn storage(msg: &str) -> Self {
        ApiError::Storage(msg.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            ApiError::InvalidRequest(e.to_string())
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            // 连接失败、超时等未收到响应的情况
            ApiError::Network(e.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        ApiError::InvalidRequest(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(e: config::ConfigError) -> Self {
        ApiError::Config(e.to_string())
    }
}
