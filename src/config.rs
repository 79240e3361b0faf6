//! 配置系统
//! 从环境变量加载所有配置，带默认值与合法性校验

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// 后端 API 基础地址，例如 "http://localhost:8000/api"
    pub base_url: String,
    /// 单次请求超时时间（秒）
    pub timeout_secs: u64,
    /// 列表默认每页条数
    pub page_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 凭证持久化目录
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl ApiConfig {
    /// 获取请求超时
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ClientConfig {
    /// 从环境变量加载配置（前缀为 BLOG_）
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        // 添加默认配置
        settings = settings
            .set_default("api.base_url", "http://localhost:8000/api")?
            .set_default("api.timeout_secs", 10)?
            .set_default("api.page_size", 9)?
            .set_default("storage.dir", ".blog-client")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?;

        settings = settings.add_source(
            Environment::with_prefix("BLOG")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: ClientConfig = settings.build()?.try_deserialize()?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    fn validate(&self) -> Result<(), ConfigError> {
        // 基础地址必须是合法 URL
        if Url::parse(&self.api.base_url).is_err() {
            return Err(ConfigError::Message(format!(
                "Invalid API base URL: {}",
                self.api.base_url
            )));
        }

        // 验证超时范围
        if self.api.timeout_secs < 1 || self.api.timeout_secs > 300 {
            return Err(ConfigError::Message(
                "api.timeout_secs must be between 1 and 300".to_string(),
            ));
        }

        // 验证分页大小
        if self.api.page_size < 1 || self.api.page_size > 100 {
            return Err(ConfigError::Message(
                "api.page_size must be between 1 and 100".to_string(),
            ));
        }

        // 验证日志级别
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        // 验证日志格式
        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty",
                    self.logging.format
                )))
            }
        }

        if self.storage.dir.trim().is_empty() {
            return Err(ConfigError::Message("storage.dir must not be empty".to_string()));
        }

        Ok(())
    }
}
