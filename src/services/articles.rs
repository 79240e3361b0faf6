//! 文章服务

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{Article, ArticleListResponse, ArticlePage, ArticlePayload, ArticleQuery};
use std::sync::Arc;

/// 文章服务
pub struct ArticleService {
    client: Arc<ApiClient>,
}

impl ArticleService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// 获取文章列表（分页参数原样透传）
    pub async fn list(&self, query: &ArticleQuery) -> Result<ArticlePage> {
        let response: ArticleListResponse = self
            .client
            .get_query("/articles/", query)
            .await
            .map_err(|e| e.with_fallback("获取文章列表失败"))?;
        Ok(response.into_page(query.page_size))
    }

    /// 获取单篇文章（详情端点会内嵌评论）
    pub async fn get(&self, id: i64) -> Result<Article> {
        self.client
            .get(&format!("/articles/{}/", id))
            .await
            .map_err(|e| e.with_fallback("获取文章失败"))
    }

    /// 获取当前登录用户的文章
    pub async fn my_articles(&self) -> Result<Vec<Article>> {
        self.client
            .get("/articles/my")
            .await
            .map_err(|e| e.with_fallback("获取我的文章失败"))
    }

    /// 创建文章
    pub async fn create(&self, payload: &ArticlePayload) -> Result<Article> {
        self.client
            .post("/articles/", payload)
            .await
            .map_err(|e| e.with_fallback("创建文章失败"))
    }

    /// 更新文章
    pub async fn update(&self, id: i64, payload: &ArticlePayload) -> Result<Article> {
        self.client
            .put(&format!("/articles/{}/", id), payload)
            .await
            .map_err(|e| e.with_fallback("更新文章失败"))
    }

    /// 删除文章
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .delete(&format!("/articles/{}/", id))
            .await
            .map_err(|e| e.with_fallback("删除文章失败"))
    }

    /// 搜索文章
    pub async fn search(&self, q: &str) -> Result<Vec<Article>> {
        self.client
            .get_query("/articles/search/", &[("q", q)])
            .await
            .map_err(|e| e.with_fallback("搜索失败"))
    }
}
