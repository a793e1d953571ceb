use serde::de::DeserializeOwned;
use surrealdb::opt::QueryResult;

use super::Database;
use crate::store::{DeserializeSnafu, NoResultsSnafu, QuerySnafu, StoreError};
use crate::prelude::*;

/// An extension trait that allows you to execute raw SurrealQL queries. Parameters can be bound using the
/// [Bindings::bind] method which takes any serializable data structure.
///
/// # Example
/// ```
/// let uploads: Vec<Video> = database.sql("SELECT * FROM videos WHERE uploader = $user")
///     .bind(("user", &user_id))
///     .fetch_first()
///     .await?;
/// ```
pub trait Sql<'a> {
    fn sql(&'a self, query: &str) -> Bindings<'a>;
}

impl<'a> Sql<'a> for Database {
    fn sql(&'a self, query: &str) -> Bindings<'a> {
        Bindings::new(self.query(query))
    }
}

#[derive(Debug, new)]
pub struct Bindings<'a> {
    query: surrealdb::method::Query<'a, surrealdb::engine::any::Any>,
}

impl Bindings<'_> {
    pub fn bind(mut self, params: impl serde::Serialize) -> Self {
        let query = self.query;
        self.query = query.bind(params);
        self
    }

    /// Execute the query and return a [surrealdb::Response] which is SurrealDB's way to represent a list of statements returned from the database.
    pub async fn execute(self) -> Result<surrealdb::Response, StoreError> {
        let response = self
            .query
            .await
            .and_then(surrealdb::Response::check)
            .context(QuerySnafu)?;
        tracing::trace!(?response, "executed query");
        Ok(response)
    }

    /// Execute the query and return the first result as a deserialized value.
    pub async fn fetch_first<T: DeserializeOwned>(self) -> Result<T, StoreError>
    where
        usize: QueryResult<T>,
    {
        let mut statements = self.execute().await?;
        let result = statements.take::<T>(0).context(DeserializeSnafu)?;
        Ok(result)
    }

    /// Like [Bindings::fetch_first] but fails with [StoreError::NoResults] when the statement returned nothing.
    pub async fn fetch_one<T: DeserializeOwned>(self) -> Result<T, StoreError>
    where
        usize: QueryResult<Option<T>>,
    {
        self.fetch_first::<Option<T>>()
            .await?
            .context(NoResultsSnafu)
    }
}
