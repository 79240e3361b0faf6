//! 分类服务

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{Article, Category};
use std::sync::Arc;

/// 分类服务（只读参考数据）
pub struct CategoryService {
    client: Arc<ApiClient>,
}

impl CategoryService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// 获取全部分类
    pub async fn list(&self) -> Result<Vec<Category>> {
        self.client
            .get("/categories/")
            .await
            .map_err(|e| e.with_fallback("获取分类失败"))
    }

    /// 获取某分类下的文章
    pub async fn articles(&self, category_id: i64) -> Result<Vec<Article>> {
        self.client
            .get(&format!("/categories/{}/articles/", category_id))
            .await
            .map_err(|e| e.with_fallback("获取分类文章失败"))
    }
}
