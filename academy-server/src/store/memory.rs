//! In-memory document store (tests and local development)

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use super::{Direction, Document, DocumentStore, Query, Snapshot, StoreError, generate_id, sort_order};

/// collection -> (id -> document)
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, BTreeMap<String, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub async fn count(&self, collection: &str) -> usize {
        self.inner
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Snapshot>, StoreError> {
        let map = self.inner.read().await;
        Ok(map
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Snapshot {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn add(&self, collection: &str, data: Document) -> Result<String, StoreError> {
        let mut map = self.inner.write().await;
        let docs = map.entry(collection.to_string()).or_default();
        let mut id = generate_id();
        while docs.contains_key(&id) {
            id = generate_id();
        }
        docs.insert(id.clone(), data);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, data: Document) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        map.entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        let doc = map
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        doc.extend(patch);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        if let Some(docs) = map.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn query(&self, query: &Query) -> Result<Vec<Snapshot>, StoreError> {
        let map = self.inner.read().await;
        let Some(docs) = map.get(&query.collection) else {
            return Ok(Vec::new());
        };

        let mut hits: Vec<Snapshot> = docs
            .iter()
            .filter(|(_, data)| query.matches(data))
            .filter(|(_, data)| {
                query
                    .order_by
                    .as_ref()
                    .is_none_or(|(field, _)| data.contains_key(field))
            })
            .map(|(id, data)| Snapshot {
                id: id.clone(),
                data: data.clone(),
            })
            .collect();

        if let Some((field, direction)) = &query.order_by {
            hits.sort_by(|a, b| {
                let ord = sort_order(&a.data[field], &b.data[field]);
                match direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            hits.truncate(limit);
        }
        Ok(hits)
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        values: Vec<Value>,
    ) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        let doc = map
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        let entry = doc
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            *entry = Value::Array(Vec::new());
        }
        if let Value::Array(items) = entry {
            for value in values {
                if !items.contains(&value) {
                    items.push(value);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FilterOp;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_add_get_update_delete() {
        let store = MemoryStore::new();
        let id = store
            .add("courses", doc(json!({"title": "Yoga", "students": 3})))
            .await
            .unwrap();

        store
            .update("courses", &id, doc(json!({"students": 4})))
            .await
            .unwrap();
        let snap = store.get("courses", &id).await.unwrap().unwrap();
        assert_eq!(snap.data["title"], "Yoga");
        assert_eq!(snap.data["students"], 4);

        store.delete("courses", &id).await.unwrap();
        assert!(store.get("courses", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let store = MemoryStore::new();
        let err = store
            .update("users", "nobody", Document::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_query_order_limit_and_missing_sort_field() {
        let store = MemoryStore::new();
        for (id, students) in [("a", json!(5)), ("b", json!(50)), ("c", json!(20))] {
            store
                .set("courses", id, doc(json!({"students": students})))
                .await
                .unwrap();
        }
        store
            .set("courses", "d", doc(json!({"title": "no students field"})))
            .await
            .unwrap();

        let hits = store
            .query(
                &Query::new("courses")
                    .order_by("students", Direction::Desc)
                    .limit(2),
            )
            .await
            .unwrap();
        let ids: Vec<_> = hits.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);

        let all = store
            .query(&Query::new("courses").order_by("students", Direction::Asc))
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_query_range_on_timestamps() {
        let store = MemoryStore::new();
        store
            .set("schedules", "past", doc(json!({"startTime": "2020-01-01T00:00:00.000Z"})))
            .await
            .unwrap();
        store
            .set("schedules", "next", doc(json!({"startTime": "2099-01-01T00:00:00.000Z"})))
            .await
            .unwrap();

        let hits = store
            .query(&Query::new("schedules").filter(
                "startTime",
                FilterOp::Gte,
                "2025-01-01T00:00:00.000Z",
            ))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "next");
    }

    #[tokio::test]
    async fn test_array_union_keeps_order_and_dedups() {
        let store = MemoryStore::new();
        store
            .set("chatRooms", "r1", doc(json!({"participants": ["u1"]})))
            .await
            .unwrap();
        store
            .array_union("chatRooms", "r1", "participants", vec![json!("u2"), json!("u1")])
            .await
            .unwrap();

        let snap = store.get("chatRooms", "r1").await.unwrap().unwrap();
        assert_eq!(snap.data["participants"], json!(["u1", "u2"]));
        assert_eq!(store.count("chatRooms").await, 1);
    }
}
