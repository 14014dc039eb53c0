//! Search suggestions and per-user history

use chrono::Utc;
use shared::error::AppError;
use shared::models::{SearchHistory, SearchSuggestions};

use crate::error::ServiceResult;
use crate::store::{Direction, DocumentStore, Query, collections, get_as, query_as, to_document};

const HISTORY_LIMIT: usize = 20;
const SUGGESTIONS_DOC: &str = "default";

pub async fn suggestions(store: &dyn DocumentStore) -> ServiceResult<Vec<String>> {
    let doc: Option<SearchSuggestions> =
        get_as(store, collections::SEARCH_SUGGESTIONS, SUGGESTIONS_DOC).await?;
    Ok(doc.map(|d| d.suggestions).unwrap_or_default())
}

/// Most recent searches first
pub async fn history(store: &dyn DocumentStore, user_id: &str) -> ServiceResult<Vec<SearchHistory>> {
    Ok(query_as(
        store,
        &Query::new(collections::SEARCH_HISTORY)
            .where_eq("userId", user_id)
            .order_by("searchedAt", Direction::Desc)
            .limit(HISTORY_LIMIT),
    )
    .await?)
}

pub async fn add_history(
    store: &dyn DocumentStore,
    user_id: &str,
    keyword: &str,
) -> ServiceResult<SearchHistory> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(AppError::validation("Keyword is required").into());
    }

    let mut entry = SearchHistory {
        id: String::new(),
        user_id: user_id.to_string(),
        keyword: keyword.to_string(),
        searched_at: Utc::now(),
    };
    entry.id = store
        .add(collections::SEARCH_HISTORY, to_document(&entry)?)
        .await?;
    tracing::debug!(user_id = %user_id, "Search recorded");
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_suggestions_default_to_empty() {
        let store = MemoryStore::new();
        assert!(suggestions(&store).await.unwrap().is_empty());

        store
            .set(
                "searchSuggestions",
                "default",
                to_document(&json!({"suggestions": ["yoga", "pranayama"]})).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(suggestions(&store).await.unwrap(), vec!["yoga", "pranayama"]);
    }

    #[tokio::test]
    async fn test_history_is_capped_and_newest_first() {
        let store = MemoryStore::new();
        for day in 1..=25 {
            store
                .set(
                    "searchHistory",
                    &format!("h{day}"),
                    to_document(&json!({
                        "userId": "u1",
                        "keyword": format!("k{day}"),
                        "searchedAt": format!("2025-01-{day:02}T00:00:00.000Z"),
                    }))
                    .unwrap(),
                )
                .await
                .unwrap();
        }
        add_history(&store, "u2", "other").await.unwrap();

        let entries = history(&store, "u1").await.unwrap();
        assert_eq!(entries.len(), 20);
        assert_eq!(entries[0].keyword, "k25");
        assert_eq!(entries[19].keyword, "k6");
    }

    #[tokio::test]
    async fn test_add_history_requires_keyword() {
        let store = MemoryStore::new();
        let err: AppError = add_history(&store, "u1", "  ").await.unwrap_err().into();
        assert_eq!(err.message, "Keyword is required");

        let entry = add_history(&store, "u1", " meditation ").await.unwrap();
        assert_eq!(entry.keyword, "meditation");
        assert_eq!(history(&store, "u1").await.unwrap().len(), 1);
    }
}
