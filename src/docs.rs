//! Collection-organized JSON document store on top of SQLite.
//!
//! Every document lives in the `documents` table keyed by
//! `(collection, id)` with its body stored as JSON text. Filtering uses the
//! SQLite JSON functions, so only top-level fields can be matched.

use std::str::FromStr;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    QueryBuilder, Sqlite, SqlitePool,
};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DocError {
    #[error("database error: {0}")]
    Sqlite(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Swaps,
    Feedback,
    Skills,
}

impl Collection {
    pub fn name(self) -> &'static str {
        use Collection::*;
        match self {
            Users => "users",
            Swaps => "swaps",
            Feedback => "feedback",
            Skills => "skills",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Scalar<'a> {
    Str(&'a str),
    Bool(bool),
}

#[derive(Debug, Clone, Copy)]
pub enum Filter<'a> {
    /// Top-level field equals the value.
    Eq(&'a str, Scalar<'a>),
    /// Top-level array field has the string as a member.
    Contains(&'a str, &'a str),
}

#[derive(Debug, Clone)]
pub struct Docs {
    pool: SqlitePool,
}

impl Docs {
    /// Open the database at `url` and bring the schema up to date.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DocError> {
        let opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;

        sqlx::migrate!().run(&pool).await?;

        Ok(Self { pool })
    }

    pub fn new_id() -> String {
        Uuid::now_v7().to_string()
    }

    /// Single-connection in-memory store. Each call yields an empty database.
    pub async fn in_memory() -> Result<Self, DocError> {
        Self::connect("sqlite::memory:", 1).await
    }

    pub async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, DocError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT body FROM documents WHERE collection=? AND id=?")
                .bind(collection.name())
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(body,)| serde_json::from_str(&body)).transpose()?)
    }

    pub async fn get_as<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<T>, DocError> {
        Ok(self
            .get(collection, id)
            .await?
            .map(serde_json::from_value)
            .transpose()?)
    }

    /// Replace the document, creating it if needed.
    pub async fn set<T: Serialize>(
        &self,
        collection: Collection,
        id: &str,
        body: &T,
    ) -> Result<(), DocError> {
        sqlx::query(
            "INSERT INTO documents (collection,id,body) VALUES (?,?,?) \
             ON CONFLICT(collection,id) DO UPDATE SET body=excluded.body",
        )
        .bind(collection.name())
        .bind(id)
        .bind(serde_json::to_string(body)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Apply a JSON merge patch to an existing document.
    /// `null` members of the patch remove the field.
    ///
    /// Returns `false` without writing anything when the document is absent.
    pub async fn merge<T: Serialize>(
        &self,
        collection: Collection,
        id: &str,
        patch: &T,
    ) -> Result<bool, DocError> {
        self.merge_where(collection, id, &[], patch).await
    }

    /// Like [`Docs::merge`], but only patches the document while it still
    /// matches every filter. The check and the write are one statement.
    pub async fn merge_where<T: Serialize>(
        &self,
        collection: Collection,
        id: &str,
        filters: &[Filter<'_>],
        patch: &T,
    ) -> Result<bool, DocError> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("UPDATE documents SET body=json_patch(body, ");
        query.push_bind(serde_json::to_string(patch)?);
        query.push(") WHERE collection=");
        query.push_bind(collection.name());
        query.push(" AND id=");
        query.push_bind(id.to_owned());
        push_filters(&mut query, filters);

        let result = query.build().execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, collection: Collection, id: &str) -> Result<bool, DocError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection=? AND id=?")
            .bind(collection.name())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Store under a freshly generated id and return that id.
    pub async fn insert<T: Serialize>(
        &self,
        collection: Collection,
        body: &T,
    ) -> Result<String, DocError> {
        let id = Self::new_id();
        sqlx::query("INSERT INTO documents (collection,id,body) VALUES (?,?,?)")
            .bind(collection.name())
            .bind(&id)
            .bind(serde_json::to_string(body)?)
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    /// All `(id, body)` pairs of the collection matching every filter.
    pub async fn scan(
        &self,
        collection: Collection,
        filters: &[Filter<'_>],
    ) -> Result<Vec<(String, Value)>, DocError> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id,body FROM documents WHERE collection=");
        query.push_bind(collection.name());

        push_filters(&mut query, filters);

        let rows: Vec<(String, String)> = query.build_query_as().fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|(id, body)| -> Result<_, DocError> { Ok((id, serde_json::from_str(&body)?)) })
            .collect()
    }

    pub async fn scan_as<T: DeserializeOwned>(
        &self,
        collection: Collection,
        filters: &[Filter<'_>],
    ) -> Result<Vec<(String, T)>, DocError> {
        self.scan(collection, filters)
            .await?
            .into_iter()
            .map(|(id, body)| -> Result<_, DocError> { Ok((id, serde_json::from_value(body)?)) })
            .collect()
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, filters: &[Filter<'_>]) {
    for filter in filters {
        match *filter {
            Filter::Eq(field, value) => {
                query.push(" AND json_extract(body, ");
                query.push_bind(format!("$.{field}"));
                query.push(")=");
                match value {
                    Scalar::Str(s) => query.push_bind(s.to_owned()),
                    Scalar::Bool(b) => query.push_bind(b),
                };
            }
            Filter::Contains(field, member) => {
                query.push(" AND EXISTS (SELECT 1 FROM json_each(body, ");
                query.push_bind(format!("$.{field}"));
                query.push(") WHERE json_each.value=");
                query.push_bind(member.to_owned());
                query.push(")");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn set_get_delete() {
        let docs = Docs::in_memory().await.unwrap();

        docs.set(Collection::Users, "u1", &json!({"name": "Ada"})).await.unwrap();
        assert_eq!(
            docs.get(Collection::Users, "u1").await.unwrap(),
            Some(json!({"name": "Ada"}))
        );
        // same id, other collection
        assert_eq!(docs.get(Collection::Swaps, "u1").await.unwrap(), None);

        docs.set(Collection::Users, "u1", &json!({"name": "Grace"})).await.unwrap();
        assert_eq!(
            docs.get(Collection::Users, "u1").await.unwrap(),
            Some(json!({"name": "Grace"}))
        );

        assert!(docs.delete(Collection::Users, "u1").await.unwrap());
        assert!(!docs.delete(Collection::Users, "u1").await.unwrap());
        assert_eq!(docs.get(Collection::Users, "u1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn merge_patches_existing_only() {
        let docs = Docs::in_memory().await.unwrap();

        assert!(!docs.merge(Collection::Users, "ghost", &json!({"rating": 3.0})).await.unwrap());
        assert_eq!(docs.get(Collection::Users, "ghost").await.unwrap(), None);

        docs.set(Collection::Users, "u1", &json!({"name": "Ada", "location": "Paris"}))
            .await
            .unwrap();
        assert!(docs
            .merge(Collection::Users, "u1", &json!({"rating": 4.5, "location": null}))
            .await
            .unwrap());
        assert_eq!(
            docs.get(Collection::Users, "u1").await.unwrap(),
            Some(json!({"name": "Ada", "rating": 4.5}))
        );
    }

    #[tokio::test]
    async fn merge_where_requires_a_match() {
        let docs = Docs::in_memory().await.unwrap();
        docs.set(Collection::Swaps, "s1", &json!({"status": "pending"})).await.unwrap();
        let pending = [Filter::Eq("status", Scalar::Str("pending"))];

        assert!(docs
            .merge_where(Collection::Swaps, "s1", &pending, &json!({"status": "accepted"}))
            .await
            .unwrap());
        assert!(!docs
            .merge_where(Collection::Swaps, "s1", &pending, &json!({"status": "rejected"}))
            .await
            .unwrap());
        assert!(!docs
            .merge_where(Collection::Swaps, "ghost", &pending, &json!({"status": "rejected"}))
            .await
            .unwrap());
        assert_eq!(
            docs.get(Collection::Swaps, "s1").await.unwrap(),
            Some(json!({"status": "accepted"}))
        );
    }

    #[tokio::test]
    async fn insert_generates_distinct_ids() {
        let docs = Docs::in_memory().await.unwrap();

        let a = docs.insert(Collection::Feedback, &json!({"rating": 1.0})).await.unwrap();
        let b = docs.insert(Collection::Feedback, &json!({"rating": 1.0})).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(docs.scan(Collection::Feedback, &[]).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn scan_filters_are_anded() {
        let docs = Docs::in_memory().await.unwrap();
        docs.set(Collection::Users, "a", &json!({"is_public": true, "tags": ["x", "y"]}))
            .await
            .unwrap();
        docs.set(Collection::Users, "b", &json!({"is_public": false, "tags": ["x"]}))
            .await
            .unwrap();
        docs.set(Collection::Users, "c", &json!({"is_public": true, "tags": []}))
            .await
            .unwrap();

        let ids = |rows: Vec<(String, Value)>| {
            let mut ids: Vec<String> = rows.into_iter().map(|(id, _)| id).collect();
            ids.sort();
            ids
        };

        let public = docs
            .scan(Collection::Users, &[Filter::Eq("is_public", Scalar::Bool(true))])
            .await
            .unwrap();
        assert_eq!(ids(public), ["a", "c"]);

        let tagged = docs
            .scan(Collection::Users, &[Filter::Contains("tags", "x")])
            .await
            .unwrap();
        assert_eq!(ids(tagged), ["a", "b"]);

        let both = docs
            .scan(
                Collection::Users,
                &[
                    Filter::Eq("is_public", Scalar::Bool(true)),
                    Filter::Contains("tags", "x"),
                ],
            )
            .await
            .unwrap();
        assert_eq!(ids(both), ["a"]);

        let by_str = docs
            .scan(Collection::Users, &[Filter::Eq("missing", Scalar::Str("x"))])
            .await
            .unwrap();
        assert!(by_str.is_empty());
    }
}
