//! 会话存储
//! 登录状态的唯一事实来源：令牌与用户作为单一原子值持有，
//! 变更先落盘再发布到内存，并通过广播通道通知订阅者

use crate::error::{ApiError, Result};
use crate::models::User;
use crate::storage::CredentialStorage;
use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

/// 持久化存储键
pub const TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "user";

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// 会话生命周期事件
///
/// `Unauthorized` 是 401 触发的进程级信号，任何订阅者都可以响应
/// （例如强制跳转到登录页）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    LoggedOut,
    Unauthorized,
}

/// 已认证会话
///
/// 令牌与用户捆绑为一个值，不存在"半更新"窗口。
#[derive(Clone)]
pub struct Session {
    pub access_token: Secret<String>,
    pub refresh_token: Option<Secret<String>>,
    pub user: User,
}

impl Session {
    pub fn new(access_token: String, refresh_token: Option<String>, user: User) -> Self {
        Self {
            access_token: Secret::new(access_token),
            refresh_token: refresh_token.map(Secret::new),
            user,
        }
    }
}

/// 会话存储句柄
///
/// Clone 成本低廉（内部全部为 Arc/Sender），显式传递给消费者，
/// 不依赖任何全局单例。
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn CredentialStorage>,
    inner: Arc<RwLock<Option<Session>>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// 创建匿名会话存储（不读取持久层）
    pub fn new(storage: Arc<dyn CredentialStorage>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            storage,
            inner: Arc::new(RwLock::new(None)),
            events,
        }
    }

    /// 订阅会话事件
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// 从持久层恢复会话，返回是否恢复成功
    ///
    /// 令牌与用户必须同时存在；缓存的用户 JSON 损坏时回退为匿名并
    /// 清除残留键，不会 panic。
    pub async fn load(&self) -> Result<bool> {
        let token = match self.storage.get(TOKEN_KEY)? {
            Some(t) if !t.is_empty() => t,
            _ => {
                self.remove_persisted();
                return Ok(false);
            }
        };

        let user = match self.storage.get(USER_KEY)? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => user,
                Err(e) => {
                    warn!("Discarding malformed cached user: {}", e);
                    self.remove_persisted();
                    return Ok(false);
                }
            },
            None => {
                // 令牌与用户不同步，视为无效会话
                self.remove_persisted();
                return Ok(false);
            }
        };

        let refresh_token = self.storage.get(REFRESH_TOKEN_KEY)?;

        let mut guard = self.inner.write().await;
        *guard = Some(Session::new(token, refresh_token, user));
        debug!("Session restored from storage");
        Ok(true)
    }

    /// 建立新会话：先写持久层，再替换内存值，最后广播 LoggedIn
    pub async fn set_session(&self, session: Session) -> Result<()> {
        self.storage
            .set(TOKEN_KEY, session.access_token.expose_secret())?;
        match &session.refresh_token {
            Some(refresh) => self.storage.set(REFRESH_TOKEN_KEY, refresh.expose_secret())?,
            None => self.storage.remove(REFRESH_TOKEN_KEY)?,
        }
        let user_json = serde_json::to_string(&session.user)?;
        self.storage.set(USER_KEY, &user_json)?;

        let mut guard = self.inner.write().await;
        *guard = Some(session);
        drop(guard);

        self.emit(SessionEvent::LoggedIn);
        Ok(())
    }

    /// 更新缓存的用户资料（资料编辑成功后调用）
    pub async fn replace_user(&self, user: User) -> Result<()> {
        let mut guard = self.inner.write().await;
        let session = guard.as_mut().ok_or(ApiError::Unauthorized)?;
        let user_json = serde_json::to_string(&user)?;
        self.storage.set(USER_KEY, &user_json)?;
        session.user = user;
        Ok(())
    }

    /// 替换访问令牌（令牌刷新成功后调用）
    pub async fn replace_access_token(&self, access_token: String) -> Result<()> {
        let mut guard = self.inner.write().await;
        let session = guard.as_mut().ok_or(ApiError::Unauthorized)?;
        self.storage.set(TOKEN_KEY, &access_token)?;
        session.access_token = Secret::new(access_token);
        Ok(())
    }

    /// 清除会话：移除全部持久化键、回到匿名态并广播事件
    ///
    /// 持久层删除失败只记录日志，内存态必须回到匿名，保证 401
    /// 之后不会带着失效令牌继续请求。
    pub async fn clear(&self, event: SessionEvent) {
        self.remove_persisted();

        let mut guard = self.inner.write().await;
        *guard = None;
        drop(guard);

        self.emit(event);
    }

    /// 当前是否已认证
    pub async fn is_authenticated(&self) -> bool {
        let guard = self.inner.read().await;
        guard
            .as_ref()
            .map(|s| !s.access_token.expose_secret().is_empty())
            .unwrap_or(false)
    }

    /// 当前用户快照
    pub async fn current_user(&self) -> Option<User> {
        self.inner.read().await.as_ref().map(|s| s.user.clone())
    }

    /// 当前访问令牌
    pub async fn access_token(&self) -> Option<Secret<String>> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// 当前刷新令牌
    pub async fn refresh_token(&self) -> Option<Secret<String>> {
        self.inner
            .read()
            .await
            .as_ref()
            .and_then(|s| s.refresh_token.clone())
    }

    fn remove_persisted(&self) {
        for key in [TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!("Failed to remove persisted key {}: {}", key, e);
            }
        }
    }

    fn emit(&self, event: SessionEvent) {
        // 没有订阅者时发送失败是正常情况
        let _ = self.events.send(event);
    }
}
