use crate::define_table;
use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
pub struct User {
    pub id: Record<User>,
    pub username: String,
    pub email: String,
    #[new(value = "chrono::Utc::now().into()")]
    pub created_at: Datetime,
}

define_table!("users" : User = id);

/// The uploader side of a stored video, as far as it could be resolved.
///
/// `username` is `None` when the linked user no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Uploader {
    pub id: Record<User>,
    pub username: Option<String>,
}
