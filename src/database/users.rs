use super::Sql as _;
use crate::prelude::*;
use crate::store::StoreError;

impl User {
    /// Writes the user under its id, replacing whatever was stored there before.
    #[tracing::instrument(skip(db), fields(user = %self.id))]
    pub async fn upsert(&self, db: &Database) -> Result<User, StoreError> {
        db.sql("UPDATE $id CONTENT $user RETURN AFTER")
            .bind(("id", &self.id))
            .bind(("user", self))
            .fetch_one()
            .await
    }
}
