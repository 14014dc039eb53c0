//! PostgreSQL document store
//!
//! All collections share one `documents` table with a JSONB body (see
//! `migrations/`). Filters and ordering run inside PostgreSQL.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{
    Direction, Document, DocumentStore, FilterOp, Query, Snapshot, StoreError, generate_id,
};

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: String,
    data: Json<Document>,
}

impl From<DocumentRow> for Snapshot {
    fn from(row: DocumentRow) -> Self {
        Snapshot {
            id: row.id,
            data: row.data.0,
        }
    }
}

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and apply pending migrations
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.into()))?;
        Ok(Self::new(pool))
    }
}

fn comparison(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Eq | FilterOp::In => "=",
        FilterOp::Gt => ">",
        FilterOp::Gte => ">=",
        FilterOp::Lt => "<",
        FilterOp::Lte => "<=",
    }
}

/// Append `WHERE` conditions for a query
fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, query: &Query) {
    builder.push(" WHERE collection = ");
    builder.push_bind(query.collection.clone());

    for filter in &query.filters {
        let field = filter.field.clone();
        match (filter.op, &filter.value) {
            (FilterOp::Eq, value) => {
                builder.push(" AND data -> ");
                builder.push_bind(field);
                builder.push(" = ");
                builder.push_bind(Json(value.clone()));
            }
            (FilterOp::In, value) => {
                builder.push(" AND ");
                builder.push_bind(Json(value.clone()));
                builder.push(" @> jsonb_build_array(data -> ");
                builder.push_bind(field);
                builder.push(")");
            }
            (op, Value::String(s)) => {
                // Bytewise comparison keeps ISO timestamps in time order
                builder.push(" AND jsonb_typeof(data -> ");
                builder.push_bind(field.clone());
                builder.push(") = 'string' AND (data ->> ");
                builder.push_bind(field);
                builder.push(") COLLATE \"C\" ");
                builder.push(comparison(op));
                builder.push(" ");
                builder.push_bind(s.clone());
                builder.push(" COLLATE \"C\"");
            }
            (op, Value::Number(n)) => {
                builder.push(" AND CASE WHEN jsonb_typeof(data -> ");
                builder.push_bind(field.clone());
                builder.push(") = 'number' THEN (data ->> ");
                builder.push_bind(field);
                builder.push(")::float8 END ");
                builder.push(comparison(op));
                builder.push(" ");
                builder.push_bind(n.as_f64().unwrap_or_default());
            }
            (op, value) => {
                builder.push(" AND jsonb_typeof(data -> ");
                builder.push_bind(field.clone());
                builder.push(") = jsonb_typeof(");
                builder.push_bind(Json(value.clone()));
                builder.push(") AND data -> ");
                builder.push_bind(field);
                builder.push(" ");
                builder.push(comparison(op));
                builder.push(" ");
                builder.push_bind(Json(value.clone()));
            }
        }
    }

    if let Some((field, _)) = &query.order_by {
        builder.push(" AND data -> ");
        builder.push_bind(field.clone());
        builder.push(" IS NOT NULL");
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Snapshot>, StoreError> {
        let row: Option<DocumentRow> =
            sqlx::query_as("SELECT id, data FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Snapshot::from))
    }

    async fn add(&self, collection: &str, data: Document) -> Result<String, StoreError> {
        let data = Json(data);
        loop {
            let id = generate_id();
            let result = sqlx::query(
                "INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)
                 ON CONFLICT (collection, id) DO NOTHING",
            )
            .bind(collection)
            .bind(&id)
            .bind(&data)
            .execute(&self.pool)
            .await?;
            if result.rows_affected() > 0 {
                return Ok(id);
            }
        }
    }

    async fn set(&self, collection: &str, id: &str, data: Document) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)
             ON CONFLICT (collection, id) DO UPDATE SET data = EXCLUDED.data, updated_at = now()",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(data))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE documents SET data = data || $3, updated_at = now()
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(patch))
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn query(&self, query: &Query) -> Result<Vec<Snapshot>, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id, data FROM documents");
        push_conditions(&mut builder, query);

        match &query.order_by {
            Some((field, direction)) => {
                builder.push(" ORDER BY data -> ");
                builder.push_bind(field.clone());
                builder.push(match direction {
                    Direction::Asc => " ASC",
                    Direction::Desc => " DESC",
                });
                builder.push(", id");
            }
            None => {
                builder.push(" ORDER BY id");
            }
        }

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ");
            builder.push_bind(limit as i64);
        }

        let rows: Vec<DocumentRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Snapshot::from).collect())
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        values: Vec<Value>,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<DocumentRow> = sqlx::query_as(
            "SELECT id, data FROM documents WHERE collection = $1 AND id = $2 FOR UPDATE",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(mut row) = row else {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        };

        let mut items = match row.data.0.remove(field) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        for value in values {
            if !items.contains(&value) {
                items.push(value);
            }
        }
        row.data.0.insert(field.to_string(), Value::Array(items));

        sqlx::query(
            "UPDATE documents SET data = $3, updated_at = now() WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(&row.data)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sql(query: &Query) -> String {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id, data FROM documents");
        push_conditions(&mut builder, query);
        builder.sql().to_string()
    }

    #[test]
    fn test_eq_filter_sql() {
        let s = sql(&Query::new("enrollments").where_eq("userId", "u1"));
        assert_eq!(
            s,
            "SELECT id, data FROM documents WHERE collection = $1 AND data -> $2 = $3"
        );
    }

    #[test]
    fn test_string_range_uses_bytewise_collation() {
        let s = sql(&Query::new("schedules").filter(
            "startTime",
            FilterOp::Gte,
            "2025-01-01T00:00:00.000Z",
        ));
        assert!(s.contains("COLLATE \"C\" >= $4 COLLATE \"C\""));
    }

    #[test]
    fn test_in_filter_and_order_presence() {
        let s = sql(
            &Query::new("attendance")
                .where_in("scheduleId", vec![json!("s1"), json!("s2")])
                .order_by("markedAt", Direction::Desc),
        );
        assert!(s.contains("$2 @> jsonb_build_array(data -> $3)"));
        assert!(s.ends_with("AND data -> $4 IS NOT NULL"));
    }
}
