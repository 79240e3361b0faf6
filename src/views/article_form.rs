//! 文章表单控制器
//! 提交前本地校验，校验未通过不发起任何网络调用

use crate::error::{ApiError, Result};
use crate::models::Article;
use crate::services::ArticleService;
use crate::validation::{validate_form, ArticleDraft};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 新建/编辑文章表单
pub struct ArticleForm {
    service: Arc<ArticleService>,
    /// 编辑已有文章时为 Some
    editing: Option<i64>,
    /// 提交在途标志，阻止并发重复提交
    submitting: AtomicBool,
}

impl ArticleForm {
    /// 新建文章表单
    pub fn new(service: Arc<ArticleService>) -> Self {
        Self {
            service,
            editing: None,
            submitting: AtomicBool::new(false),
        }
    }

    /// 编辑既有文章的表单
    pub fn for_edit(service: Arc<ArticleService>, article_id: i64) -> Self {
        Self {
            service,
            editing: Some(article_id),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// 提交表单：先校验，通过后恰好发起一次创建（或更新）调用
    pub async fn submit(&self, draft: &ArticleDraft) -> Result<Article> {
        if self.submitting.swap(true, Ordering::SeqCst) {
            return Err(ApiError::invalid_request("submission already in progress"));
        }

        let result = self.submit_inner(draft).await;
        self.submitting.store(false, Ordering::SeqCst);
        result
    }

    async fn submit_inner(&self, draft: &ArticleDraft) -> Result<Article> {
        validate_form(draft)?;

        let payload = draft.to_payload();
        match self.editing {
            Some(id) => self.service.update(id, &payload).await,
            None => self.service.create(&payload).await,
        }
    }
}
