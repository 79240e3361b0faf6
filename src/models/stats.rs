//! Statistics payloads

use serde::{Deserialize, Serialize};

/// Blog-wide counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogStats {
    #[serde(default)]
    pub total_articles: u64,
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub total_categories: u64,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_views: u64,
}

/// Per-user counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub articles_count: u64,
    #[serde(default)]
    pub comments_count: u64,
    #[serde(default)]
    pub favorites_count: u64,
    #[serde(default)]
    pub total_views: u64,
}
