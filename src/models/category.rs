//! Category domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only reference data used for filtering and tagging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
