//! API 客户端封装
//! 所有出站请求的统一入口：注入 Bearer 令牌、分类响应错误、
//! 401 时清除会话并广播未授权信号

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::session::{SessionEvent, SessionStore};
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, error, warn};
use url::Url;

/// API 客户端
///
/// 单条线性请求/响应路径：无重试、无退避、无在途去重，
/// 超时由共享的 reqwest Client 统一设置。
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// 创建客户端
    pub fn new(config: &ApiConfig, session: SessionStore) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        // 提前验证基础地址
        Url::parse(&base_url)?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// 会话句柄（供服务层复用）
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self.dispatch(self.http.get(url), "GET", path).await?;
        Self::decode(response).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let response = self
            .dispatch(self.http.get(url).query(query), "GET", path)
            .await?;
        Self::decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self
            .dispatch(self.http.post(url).json(body), "POST", path)
            .await?;
        Self::decode(response).await
    }

    /// 无请求体的 POST（如收藏切换）
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self.dispatch(self.http.post(url), "POST", path).await?;
        Self::decode(response).await
    }

    /// 忽略响应体的 POST（如登出）
    pub async fn post_unit(&self, path: &str) -> Result<()> {
        let url = self.endpoint(path)?;
        self.dispatch(self.http.post(url), "POST", path).await?;
        Ok(())
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self
            .dispatch(self.http.put(url).json(body), "PUT", path)
            .await?;
        Self::decode(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.endpoint(path)?;
        self.dispatch(self.http.delete(url), "DELETE", path).await?;
        Ok(())
    }

    /// 使用显式令牌的 GET
    ///
    /// 仅用于登录流程：令牌刚签发、会话尚未建立时拉取用户资料。
    pub async fn get_with_token<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self
            .send_classified(self.http.get(url).bearer_auth(token), "GET", path)
            .await?;
        Self::decode(response).await
    }

    /// 拼接端点地址，路径必须以 '/' 开头
    fn endpoint(&self, path: &str) -> Result<Url> {
        if !path.starts_with('/') {
            return Err(ApiError::invalid_request(&format!(
                "endpoint path must start with '/': {}",
                path
            )));
        }
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    /// 发送请求：请求拦截（附加令牌）→ 发送 → 响应拦截（错误分类）
    async fn dispatch(
        &self,
        builder: RequestBuilder,
        method: &'static str,
        path: &str,
    ) -> Result<Response> {
        let builder = match self.session.access_token().await {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        };
        self.send_classified(builder, method, path).await
    }

    async fn send_classified(
        &self,
        builder: RequestBuilder,
        method: &'static str,
        path: &str,
    ) -> Result<Response> {
        let started = Instant::now();
        let result = builder.send().await;
        metrics::histogram!("api_client_request_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                let err = ApiError::from(e);
                // 网络失败与请求构造失败分别记录
                error!(method, path, "Request failed: {}", err);
                metrics::counter!(
                    "api_client_requests_total",
                    "method" => method,
                    "status" => "error"
                )
                .increment(1);
                return Err(err);
            }
        };

        let status = response.status();
        metrics::counter!(
            "api_client_requests_total",
            "method" => method,
            "status" => status.as_u16().to_string()
        )
        .increment(1);

        if status.is_success() {
            debug!(method, path, status = status.as_u16(), "Request completed");
            return Ok(response);
        }

        Err(self.classify_failure(response, path).await)
    }

    /// 按状态码分类失败响应
    async fn classify_failure(&self, response: Response, path: &str) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED => {
                // 令牌过期或无效：清除会话并广播，再向上传播
                warn!(path, "Unauthorized response, forcing logout");
                self.session.clear(SessionEvent::Unauthorized).await;
                ApiError::Unauthorized
            }
            StatusCode::FORBIDDEN => {
                error!(path, "Access denied");
                ApiError::Forbidden
            }
            StatusCode::NOT_FOUND => {
                error!(path, "Resource not found");
                ApiError::NotFound(extract_detail(&body).unwrap_or_else(|| path.to_string()))
            }
            _ => {
                error!(path, status = status.as_u16(), "API error: {}", body);
                ApiError::Api {
                    status: status.as_u16(),
                    message: extract_detail(&body).unwrap_or_default(),
                }
            }
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// 从错误响应体中提取人类可读的消息
///
/// 兼容两种后端风格：`{"detail": "..."}` 与字段错误对象
/// `{"field": ["...", ...]}`（取第一条）。
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    for key in ["detail", "message", "error"] {
        if let Some(text) = object.get(key).and_then(|v| v.as_str()) {
            return Some(text.to_string());
        }
    }

    // 字段错误对象：取第一个字段的第一条消息
    for entry in object.values() {
        match entry {
            serde_json::Value::String(s) => return Some(s.clone()),
            serde_json::Value::Array(items) => {
                if let Some(first) = items.iter().find_map(|v| v.as_str()) {
                    return Some(first.to_string());
                }
            }
            _ => continue,
        }
    }

    None
}
