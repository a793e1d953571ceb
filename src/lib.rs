pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod logger;
pub mod model;
pub mod projection;
pub mod seed;
pub mod service;
pub mod store;

mod macros;

#[cfg(test)]
pub(crate) mod testing;

pub mod prelude {
    pub use derive_new::new;
    pub use serde::{Deserialize, Serialize};
    pub use snafu::{Location, OptionExt as _, ResultExt as _, Snafu};
    pub use surrealdb::sql::{Datetime, Thing};

    pub use crate::database::{Database, Record, Table};
    pub use crate::model::{Privacy, User, Video};
    pub use crate::store::{StoreError, VideoStore};
}
