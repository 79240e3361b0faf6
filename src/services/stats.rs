//! 统计服务

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{BlogStats, UserStats};
use std::sync::Arc;

/// 统计服务
pub struct StatsService {
    client: Arc<ApiClient>,
}

impl StatsService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// 获取站点统计
    pub async fn blog(&self) -> Result<BlogStats> {
        self.client
            .get("/stats/blog/")
            .await
            .map_err(|e| e.with_fallback("获取统计数据失败"))
    }

    /// 获取当前用户统计
    pub async fn user(&self) -> Result<UserStats> {
        self.client
            .get("/auth/stats/")
            .await
            .map_err(|e| e.with_fallback("获取统计数据失败"))
    }
}
