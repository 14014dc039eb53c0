//! Categories, mentors and promotions

use shared::models::{Category, Mentor, Promote};

use crate::error::ServiceResult;
use crate::store::{Direction, DocumentStore, Query, collections, query_as};

pub async fn categories(store: &dyn DocumentStore) -> ServiceResult<Vec<Category>> {
    Ok(query_as(
        store,
        &Query::new(collections::CATEGORIES).order_by("name", Direction::Asc),
    )
    .await?)
}

pub async fn mentors(store: &dyn DocumentStore) -> ServiceResult<Vec<Mentor>> {
    Ok(query_as(
        store,
        &Query::new(collections::MENTORS).order_by("name", Direction::Asc),
    )
    .await?)
}

/// Active promotions, soonest expiry first
pub async fn active_promotes(store: &dyn DocumentStore) -> ServiceResult<Vec<Promote>> {
    Ok(query_as(
        store,
        &Query::new(collections::PROMOTES)
            .where_eq("isActive", true)
            .order_by("expiryDate", Direction::Asc),
    )
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Document, MemoryStore};
    use serde_json::{Value, json};

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_categories_sorted_by_name() {
        let store = MemoryStore::new();
        store.set("categories", "a", doc(json!({"name": "Yoga"}))).await.unwrap();
        store.set("categories", "b", doc(json!({"name": "Meditation"}))).await.unwrap();

        let names: Vec<_> = categories(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Meditation", "Yoga"]);
    }

    #[tokio::test]
    async fn test_only_active_promotes() {
        let store = MemoryStore::new();
        store
            .set("promotes", "p1", doc(json!({"isActive": true, "expiryDate": "2025-05-01T00:00:00.000Z"})))
            .await
            .unwrap();
        store
            .set("promotes", "p2", doc(json!({"isActive": false, "expiryDate": "2025-01-01T00:00:00.000Z"})))
            .await
            .unwrap();
        store
            .set("promotes", "p3", doc(json!({"isActive": true, "expiryDate": "2025-02-01T00:00:00.000Z"})))
            .await
            .unwrap();

        let ids: Vec<_> = active_promotes(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["p3", "p1"]);
    }
}
