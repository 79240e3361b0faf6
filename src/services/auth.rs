//! 认证服务
//! 登录、注册、登出、令牌刷新与资料维护，会话副作用集中在这里

use crate::error::{ApiError, Result};
use crate::http::ApiClient;
use crate::models::{
    LoginRequest, ProfileUpdate, RefreshRequest, RefreshResponse, RegisterRequest, TokenPair, User,
};
use crate::session::{Session, SessionEvent, SessionStore};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::{info, warn};

/// 认证服务
pub struct AuthService {
    client: Arc<ApiClient>,
    session: SessionStore,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        let session = client.session().clone();
        Self { client, session }
    }

    /// 登录
    ///
    /// 先换取令牌对，再用新令牌拉取用户资料；两步都成功才建立会话，
    /// 令牌与用户一次性原子写入。
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let tokens: TokenPair = self
            .client
            .post("/token/", &request)
            .await
            .map_err(|e| e.with_fallback("登录失败"))?;

        let user: User = self
            .client
            .get_with_token("/auth/profile/", &tokens.access)
            .await
            .map_err(|e| e.with_fallback("获取用户资料失败"))?;

        self.session
            .set_session(Session::new(tokens.access, Some(tokens.refresh), user.clone()))
            .await?;

        info!(username = %user.username, "Login successful");
        Ok(user)
    }

    /// 注册（不建立会话，注册后仍需登录）
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        self.client
            .post("/auth/register/", request)
            .await
            .map_err(|e| e.with_fallback("注册失败"))
    }

    /// 登出
    ///
    /// 通知后端失败只记录日志，本地会话总是清除。
    pub async fn logout(&self) {
        if let Err(e) = self.client.post_unit("/auth/logout/").await {
            warn!("Logout request failed: {}", e);
        }
        self.session.clear(SessionEvent::LoggedOut).await;
        info!("Logged out");
    }

    /// 从持久层恢复会话并通过资料接口验证
    ///
    /// 任何验证失败都回到匿名态（401 路径由拦截器清除，其余在此清除）。
    pub async fn restore(&self) -> Result<Option<User>> {
        if !self.session.load().await? {
            return Ok(None);
        }

        match self.client.get::<User>("/auth/profile/").await {
            Ok(user) => {
                self.session.replace_user(user.clone()).await?;
                info!(username = %user.username, "Session restored");
                Ok(Some(user))
            }
            Err(e) => {
                warn!("Stored session rejected: {}", e);
                if self.session.is_authenticated().await {
                    self.session.clear(SessionEvent::LoggedOut).await;
                }
                Ok(None)
            }
        }
    }

    /// 刷新访问令牌
    ///
    /// 后端提供该端点但拦截器不会主动调用（保持 401 即登出的被动
    /// 模型）；调用方可按需显式刷新。失败即会话终结。
    pub async fn refresh_access_token(&self) -> Result<()> {
        let Some(refresh) = self.session.refresh_token().await else {
            self.session.clear(SessionEvent::LoggedOut).await;
            return Err(ApiError::Unauthorized);
        };

        let request = RefreshRequest {
            refresh: refresh.expose_secret().clone(),
        };

        match self
            .client
            .post::<_, RefreshResponse>("/token/refresh/", &request)
            .await
        {
            Ok(response) => {
                self.session.replace_access_token(response.access).await?;
                info!("Access token refreshed");
                Ok(())
            }
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                if self.session.is_authenticated().await {
                    self.session.clear(SessionEvent::LoggedOut).await;
                }
                Err(e.with_fallback("登录状态已过期"))
            }
        }
    }

    /// 获取当前用户资料
    pub async fn profile(&self) -> Result<User> {
        self.client
            .get("/auth/profile/")
            .await
            .map_err(|e| e.with_fallback("获取用户资料失败"))
    }

    /// 更新资料，成功后同步会话内缓存的用户
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        let user: User = self
            .client
            .put("/auth/profile/", update)
            .await
            .map_err(|e| e.with_fallback("更新资料失败"))?;
        self.session.replace_user(user.clone()).await?;
        Ok(user)
    }
}
