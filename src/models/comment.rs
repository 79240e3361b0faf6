//! Comment domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment attached to an article
///
/// `author` is the username string as serialized by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or editing a comment
#[derive(Debug, Clone, Serialize)]
pub struct CommentPayload {
    pub content: String,
}
