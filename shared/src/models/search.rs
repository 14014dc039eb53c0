//! Search history and suggestions

use crate::util::{iso_millis, null_default};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistory {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub keyword: String,
    #[serde(default = "Utc::now", with = "iso_millis::or_now")]
    pub searched_at: DateTime<Utc>,
}

/// `searchSuggestions/default`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSuggestions {
    pub suggestions: Vec<String>,
}

/// `POST /api/search/history` payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchHistoryCreate {
    pub keyword: Option<String>,
}
