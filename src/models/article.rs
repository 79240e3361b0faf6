//! Article domain models and list-response normalization

use crate::models::Comment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An article as returned by the backend
///
/// Counts and `is_favorite` are always server-supplied. The only local write
/// anywhere in the client is the single-item `is_favorite` patch applied from
/// the favorite-toggle response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Category name (slug-related field on the backend), absent when untagged
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Author username
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub comments_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub is_favorite: bool,
    /// Embedded on the detail endpoint, empty elsewhere
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Payload for creating or updating an article
///
/// Optional fields are stripped from the JSON body when absent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArticlePayload {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Query parameters for the article list endpoint, passed through untouched
#[derive(Debug, Clone, Serialize)]
pub struct ArticleQuery {
    pub page: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,
    pub ordering: String,
}

/// Raw article list response
///
/// The backend answers either with a DRF-style pagination envelope or with a
/// bare array; both shapes normalize through [`ArticleListResponse::into_page`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArticleListResponse {
    Paginated {
        results: Vec<Article>,
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        total_pages: Option<u32>,
    },
    Plain(Vec<Article>),
}

/// Normalized page of articles
#[derive(Debug, Clone, PartialEq)]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub total_pages: u32,
}

impl ArticleListResponse {
    /// Normalize into a page, deriving `total_pages = ceil(count / page_size)`
    /// when the server omits it. A server-supplied `total_pages` is trusted
    /// verbatim and `count` is ignored.
    pub fn into_page(self, page_size: u32) -> ArticlePage {
        match self {
            ArticleListResponse::Paginated {
                results,
                count,
                total_pages,
            } => {
                let total_pages = total_pages.unwrap_or_else(|| {
                    ceil_pages(count.unwrap_or(results.len() as u64), page_size)
                });
                ArticlePage {
                    articles: results,
                    total_pages,
                }
            }
            ArticleListResponse::Plain(articles) => {
                let total_pages = ceil_pages(articles.len() as u64, page_size);
                ArticlePage {
                    articles,
                    total_pages,
                }
            }
        }
    }
}

fn ceil_pages(count: u64, page_size: u32) -> u32 {
    let page_size = page_size.max(1) as u64;
    (count.div_ceil(page_size)).max(1) as u32
}
