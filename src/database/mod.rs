use std::fmt::Display;
use std::ops::Deref;

use surrealdb::engine::any::Any;
use surrealdb::opt::auth;
use surrealdb::Surreal;
use tracing::instrument;
use url::Url;

/// Helper trait for executing arbitrary SurrealQL queries.
pub mod query;

mod record;
mod users;
mod videos;

pub use query::{Bindings, Sql};
pub use record::Record;

use crate::prelude::*;

const SETUP: &str = include_str!("../../schema.surrealql");

/// Represents a model stored in its own table.
pub trait Table {
    /// Returns the ID of the record.
    fn id(&self) -> &Thing;

    /// Returns the name of the table associated with the record.
    fn table() -> &'static str;
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConnectError {
    #[snafu(display("cannot connect to the database `{url}` at {location}: {source}"))]
    Connect {
        url: Url,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cannot sign in to the database as `{username}` at {location}: {source}"))]
    SignIn {
        username: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cannot select `{namespace}/{database}` at {location}: {source}"))]
    Select {
        namespace: String,
        database: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to apply the database schema at {location}: {source}"))]
    Schema {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

/// A connection to the document store, with the schema applied.
///
/// Cloning is cheap: clones share the underlying connection.
#[derive(Debug, Clone)]
pub struct Database {
    database: Surreal<Any>,
}

impl Database {
    #[instrument(skip_all, fields(url = %config.url, namespace = %config.namespace, database = %config.database))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, ConnectError> {
        let database = surrealdb::engine::any::connect(config.url.as_str())
            .await
            .context(ConnectSnafu {
                url: config.url.clone(),
            })?;

        if let Some(credentials) = &config.credentials {
            database
                .signin(credentials.auth())
                .await
                .context(SignInSnafu {
                    username: &credentials.username,
                })?;
        }

        database
            .use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .context(SelectSnafu {
                namespace: &config.namespace,
                database: &config.database,
            })?;

        database
            .query(SETUP)
            .await
            .and_then(surrealdb::Response::check)
            .context(SchemaSnafu)?;

        tracing::info!("connected to the database");
        Ok(Database { database })
    }
}

impl Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.database
    }
}

/// Helper function for throwing a database error
pub fn throw(msg: impl Display) -> surrealdb::Error {
    surrealdb::error::Db::Thrown(msg.to_string()).into()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(rename = "surreal_url", default = "default_url")]
    pub url: Url,
    #[serde(rename = "surreal_ns", default = "default_name")]
    pub namespace: String,
    #[serde(rename = "surreal_db", default = "default_name")]
    pub database: String,
    #[serde(flatten)]
    pub credentials: Option<DatabaseCredentials>,
}

impl DatabaseConfig {
    /// An embedded in-memory database, nothing is persisted.
    pub fn memory() -> Self {
        Self {
            url: default_url(),
            namespace: default_name(),
            database: default_name(),
            credentials: None,
        }
    }
}

fn default_url() -> Url {
    Url::parse("mem://").expect("`mem://` is a valid url")
}

fn default_name() -> String {
    "vidhub".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseCredentials {
    #[serde(rename = "surreal_name")]
    username: String,
    #[serde(rename = "surreal_pass")]
    password: String,
}

impl DatabaseCredentials {
    fn auth(&self) -> impl auth::Credentials<auth::Signin, auth::Jwt> + '_ {
        auth::Root {
            username: &self.username,
            password: &self.password,
        }
    }
}
