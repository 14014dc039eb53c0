//! Document store access layer
//!
//! Every entity lives in a named collection of flat JSON documents keyed by
//! string IDs. [`DocumentStore`] is the only seam services talk to; the
//! PostgreSQL JSONB backend serves production and [`MemoryStore`] serves
//! tests and local development.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

use async_trait::async_trait;
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cmp::Ordering;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Collection names
pub mod collections {
    pub const USERS: &str = "users";
    pub const COURSES: &str = "courses";
    pub const CATEGORIES: &str = "categories";
    pub const MENTORS: &str = "mentors";
    pub const PROMOTES: &str = "promotes";
    pub const LESSONS: &str = "lessons";
    pub const REVIEWS: &str = "reviews";
    pub const SEARCH_HISTORY: &str = "searchHistory";
    pub const SEARCH_SUGGESTIONS: &str = "searchSuggestions";
    pub const ENROLLMENTS: &str = "enrollments";
    pub const SCHEDULES: &str = "schedules";
    pub const ATTENDANCE: &str = "attendance";
    pub const CHAT_ROOMS: &str = "chatRooms";
}

/// A stored document body (top-level fields only, no `id`)
pub type Document = serde_json::Map<String, Value>;

/// A document read back together with its ID
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub id: String,
    pub data: Document,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },
    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("document is not a JSON object")]
    NotAnObject,
    #[error("{0}")]
    Backend(BoxError),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Field value equals one of the listed values
    In,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Collection query: conjunctive filters, one optional sort key, optional limit
///
/// Documents without the sort field are left out of ordered results.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filters: Vec<Filter>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn filter(mut self, field: &str, op: FilterOp, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn where_eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.filter(field, FilterOp::Eq, value)
    }

    pub fn where_in(self, field: &str, values: Vec<Value>) -> Self {
        self.filter(field, FilterOp::In, Value::Array(values))
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some((field.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a document satisfies every filter
    pub fn matches(&self, doc: &Document) -> bool {
        self.filters.iter().all(|f| {
            let Some(actual) = doc.get(&f.field) else {
                return false;
            };
            match f.op {
                FilterOp::Eq => values_equal(actual, &f.value),
                FilterOp::In => f
                    .value
                    .as_array()
                    .is_some_and(|vals| vals.iter().any(|v| values_equal(actual, v))),
                FilterOp::Gt => compare_values(actual, &f.value) == Some(Ordering::Greater),
                FilterOp::Gte => matches!(
                    compare_values(actual, &f.value),
                    Some(Ordering::Greater | Ordering::Equal)
                ),
                FilterOp::Lt => compare_values(actual, &f.value) == Some(Ordering::Less),
                FilterOp::Lte => matches!(
                    compare_values(actual, &f.value),
                    Some(Ordering::Less | Ordering::Equal)
                ),
            }
        })
    }
}

/// Equality with numbers compared by value (`1 == 1.0`)
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Ordering between two values of the same JSON type; `None` across types
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

/// Total order used for sorting: type rank first, then value
pub fn sort_order(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }
    compare_values(a, b).unwrap_or_else(|| rank(a).cmp(&rank(b)))
}

/// Random 20-character document ID
pub fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(20)
        .map(char::from)
        .collect()
}

/// Document store operations
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Snapshot>, StoreError>;

    /// Insert under a generated ID, returning it
    async fn add(&self, collection: &str, data: Document) -> Result<String, StoreError>;

    /// Create or overwrite the document at `id`
    async fn set(&self, collection: &str, id: &str, data: Document) -> Result<(), StoreError>;

    /// Merge top-level fields into an existing document
    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<(), StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    async fn query(&self, query: &Query) -> Result<Vec<Snapshot>, StoreError>;

    /// Append each value to the array `field` unless already present
    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        values: Vec<Value>,
    ) -> Result<(), StoreError>;
}

/// Serialize a model into a document body, dropping its `id` field
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(mut map) => {
            map.remove("id");
            Ok(map)
        }
        _ => Err(StoreError::NotAnObject),
    }
}

/// Deserialize a snapshot into a model, injecting the document ID as `id`
pub fn from_snapshot<T: DeserializeOwned>(snapshot: Snapshot) -> Result<T, StoreError> {
    let mut data = snapshot.data;
    data.insert("id".to_string(), Value::String(snapshot.id));
    Ok(serde_json::from_value(Value::Object(data))?)
}

/// Fetch one document as a model
pub async fn get_as<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>, StoreError> {
    store.get(collection, id).await?.map(from_snapshot).transpose()
}

/// Run a query and deserialize every hit
pub async fn query_as<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    query: &Query,
) -> Result<Vec<T>, StoreError> {
    store
        .query(query)
        .await?
        .into_iter()
        .map(from_snapshot)
        .collect()
}

/// First hit of a query
pub async fn find_one<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    query: Query,
) -> Result<Option<T>, StoreError> {
    Ok(query_as(store, &query.limit(1)).await?.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_matches_eq_and_range() {
        let d = doc(json!({"courseId": "c1", "students": 12, "startTime": "2025-02-01T10:00:00.000Z"}));
        assert!(Query::new("x").where_eq("courseId", "c1").matches(&d));
        assert!(Query::new("x").where_eq("students", 12.0).matches(&d));
        assert!(
            Query::new("x")
                .filter("startTime", FilterOp::Gte, "2025-02-01T10:00:00.000Z")
                .matches(&d)
        );
        assert!(
            !Query::new("x")
                .filter("startTime", FilterOp::Gt, "2025-02-01T10:00:00.000Z")
                .matches(&d)
        );
        // Cross-type comparisons never match
        assert!(!Query::new("x").filter("students", FilterOp::Gt, "1").matches(&d));
    }

    #[test]
    fn test_matches_in_and_missing_field() {
        let d = doc(json!({"scheduleId": "s2"}));
        assert!(
            Query::new("x")
                .where_in("scheduleId", vec![json!("s1"), json!("s2")])
                .matches(&d)
        );
        assert!(!Query::new("x").where_eq("userId", "u1").matches(&d));
    }

    #[test]
    fn test_to_document_strips_id() {
        #[derive(Serialize)]
        struct Item {
            id: String,
            name: String,
        }
        let d = to_document(&Item {
            id: "i1".into(),
            name: "n".into(),
        })
        .unwrap();
        assert!(!d.contains_key("id"));
        assert_eq!(d["name"], "n");
        assert!(matches!(to_document(&3), Err(StoreError::NotAnObject)));
    }

    #[test]
    fn test_from_snapshot_injects_id() {
        #[derive(serde::Deserialize)]
        struct Item {
            id: String,
            name: String,
        }
        let item: Item = from_snapshot(Snapshot {
            id: "i1".into(),
            data: doc(json!({"name": "n"})),
        })
        .unwrap();
        assert_eq!(item.id, "i1");
        assert_eq!(item.name, "n");
    }

    #[test]
    fn test_generate_id() {
        let id = generate_id();
        assert_eq!(id.len(), 20);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
