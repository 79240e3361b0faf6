//! 评论服务

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{Comment, CommentPayload};
use std::sync::Arc;

/// 评论服务
pub struct CommentService {
    client: Arc<ApiClient>,
}

impl CommentService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// 获取文章的评论
    pub async fn list(&self, article_id: i64) -> Result<Vec<Comment>> {
        self.client
            .get(&format!("/articles/{}/comments/", article_id))
            .await
            .map_err(|e| e.with_fallback("获取评论失败"))
    }

    /// 发布评论
    pub async fn add(&self, article_id: i64, content: &str) -> Result<Comment> {
        let payload = CommentPayload {
            content: content.to_string(),
        };
        self.client
            .post(&format!("/articles/{}/comments/", article_id), &payload)
            .await
            .map_err(|e| e.with_fallback("评论发布失败"))
    }

    /// 编辑评论（端点可用，当前没有界面入口）
    pub async fn update(&self, article_id: i64, comment_id: i64, content: &str) -> Result<Comment> {
        let payload = CommentPayload {
            content: content.to_string(),
        };
        self.client
            .put(
                &format!("/articles/{}/comments/{}/", article_id, comment_id),
                &payload,
            )
            .await
            .map_err(|e| e.with_fallback("更新评论失败"))
    }

    /// 删除评论
    pub async fn delete(&self, article_id: i64, comment_id: i64) -> Result<()> {
        self.client
            .delete(&format!("/articles/{}/comments/{}/", article_id, comment_id))
            .await
            .map_err(|e| e.with_fallback("删除评论失败"))
    }
}
