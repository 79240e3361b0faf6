//! 收藏服务

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{Article, FavoriteStatus};
use std::sync::Arc;

/// 收藏服务
pub struct FavoriteService {
    client: Arc<ApiClient>,
}

impl FavoriteService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// 切换收藏状态，返回服务端判定后的新状态
    pub async fn add(&self, article_id: i64) -> Result<FavoriteStatus> {
        self.client
            .post_empty(&format!("/articles/{}/favorite/", article_id))
            .await
            .map_err(|e| e.with_fallback("收藏失败"))
    }

    /// 取消收藏
    pub async fn remove(&self, article_id: i64) -> Result<()> {
        self.client
            .delete(&format!("/articles/{}/favorite/", article_id))
            .await
            .map_err(|e| e.with_fallback("取消收藏失败"))
    }

    /// 获取当前用户的收藏列表
    pub async fn favorites(&self) -> Result<Vec<Article>> {
        self.client
            .get("/auth/favorites/")
            .await
            .map_err(|e| e.with_fallback("获取收藏列表失败"))
    }
}
