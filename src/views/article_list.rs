//! 文章列表视图状态机
//! 获取/过滤/分页控制器：任一输入变化即重新拉取，
//! 过期响应通过单调序号丢弃

use crate::error::{ApiError, Result};
use crate::models::{Article, ArticleQuery};
use crate::services::{ArticleService, FavoriteService};
use crate::session::SessionStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// 排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Popular,
    Trending,
}

impl SortOrder {
    /// 映射为后端 ordering 参数
    pub fn ordering(&self) -> &'static str {
        match self {
            SortOrder::Newest => "-created_at",
            SortOrder::Popular => "-view_count",
            SortOrder::Trending => "-like_count",
        }
    }
}

/// 列表查询输入
#[derive(Debug, Clone)]
pub struct ArticleListQuery {
    pub page: u32,
    pub page_size: u32,
    pub category: Option<i64>,
    pub sort: SortOrder,
}

/// 列表渲染状态快照
#[derive(Debug, Clone, Default)]
pub struct ArticleListState {
    pub articles: Vec<Article>,
    pub loading: bool,
    pub error: Option<String>,
    pub total_pages: u32,
}

/// 文章列表视图
pub struct ArticleListView {
    articles: Arc<ArticleService>,
    favorites: Arc<FavoriteService>,
    session: SessionStore,
    query: RwLock<ArticleListQuery>,
    state: RwLock<ArticleListState>,
    /// 单调请求序号，用于丢弃过期响应
    seq: AtomicU64,
}

impl ArticleListView {
    pub fn new(
        articles: Arc<ArticleService>,
        favorites: Arc<FavoriteService>,
        session: SessionStore,
        page_size: u32,
    ) -> Self {
        Self {
            articles,
            favorites,
            session,
            query: RwLock::new(ArticleListQuery {
                page: 1,
                page_size,
                category: None,
                sort: SortOrder::default(),
            }),
            state: RwLock::new(ArticleListState::default()),
            seq: AtomicU64::new(0),
        }
    }

    /// 当前查询输入快照
    pub async fn query(&self) -> ArticleListQuery {
        self.query.read().await.clone()
    }

    /// 当前渲染状态快照
    pub async fn state(&self) -> ArticleListState {
        self.state.read().await.clone()
    }

    /// 拉取当前查询对应的一页
    ///
    /// 不是最新请求的响应直接丢弃，错误写入状态供界面展示。
    pub async fn fetch(&self) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let query = {
            let q = self.query.read().await;
            ArticleQuery {
                page: q.page,
                page_size: q.page_size,
                category: q.category,
                ordering: q.sort.ordering().to_string(),
            }
        };

        let result = self.articles.list(&query).await;

        let mut state = self.state.write().await;
        if self.seq.load(Ordering::SeqCst) != seq {
            debug!("Discarding stale article list response");
            return;
        }

        match result {
            Ok(page) => {
                state.articles = page.articles;
                state.total_pages = page.total_pages;
            }
            Err(e) => {
                warn!("Article list fetch failed: {}", e);
                state.error = Some(e.user_message());
            }
        }
        state.loading = false;
    }

    /// 翻页
    pub async fn set_page(&self, page: u32) {
        self.query.write().await.page = page.max(1);
        self.fetch().await;
    }

    /// 切换分类过滤，回到第一页
    pub async fn set_category(&self, category: Option<i64>) {
        {
            let mut query = self.query.write().await;
            query.category = category;
            query.page = 1;
        }
        self.fetch().await;
    }

    /// 切换排序，回到第一页
    pub async fn set_sort(&self, sort: SortOrder) {
        {
            let mut query = self.query.write().await;
            query.sort = sort;
            query.page = 1;
        }
        self.fetch().await;
    }

    /// 外部触发的刷新（如新文章发布后）
    pub async fn refresh(&self) {
        self.fetch().await;
    }

    /// 删除文章：恰好一次删除调用加一次整页重拉
    pub async fn delete_article(&self, article_id: i64) -> Result<()> {
        if let Err(e) = self.articles.delete(article_id).await {
            let mut state = self.state.write().await;
            state.error = Some(e.user_message());
            return Err(e);
        }
        self.fetch().await;
        Ok(())
    }

    /// 切换收藏：只用服务端返回的新状态修补目标文章
    ///
    /// 未登录时本地直接拒绝，不发起请求。
    pub async fn toggle_favorite(&self, article_id: i64) -> Result<bool> {
        if !self.session.is_authenticated().await {
            return Err(ApiError::Unauthorized);
        }

        let status = self.favorites.add(article_id).await?;

        let mut state = self.state.write().await;
        if let Some(article) = state.articles.iter_mut().find(|a| a.id == article_id) {
            article.is_favorite = status.is_favorite;
        }
        Ok(status.is_favorite)
    }
}
