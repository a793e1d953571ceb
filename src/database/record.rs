use surrealdb::opt::IntoResource;
use surrealdb::sql::Id;

use super::Table;
use crate::prelude::*;

/// A typed record id for a database record. type `T` must implement [Table] trait so that the table name can be inferred.
///
/// This type implements [Default] which creates a new record with a random key.
pub struct Record<T> {
    inner: Thing,
    _marker: std::marker::PhantomData<T>,
}

/// Longest key accepted from the outside world, see [Record::parse_key].
const MAX_KEY_LEN: usize = 64;

impl<T: Table> Record<T> {
    /// Creates a new `Record` from the specified `id` and inferred the table's name from `T`.
    pub fn new(id: impl Into<Id>) -> Self {
        let inner = Thing {
            tb: T::table().to_string(),
            id: id.into(),
        };

        Record {
            inner,
            _marker: std::marker::PhantomData,
        }
    }

    /// Creates a new `Record` with a random, URL-safe key.
    pub fn random() -> Self {
        Self::new(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Parses a key that came from a request path or a token.
    ///
    /// Returns `None` for anything that could not have been produced by [Record::random] or a fixture file:
    /// empty keys, overly long keys and keys with characters outside `[A-Za-z0-9_-]`.
    pub fn parse_key(key: &str) -> Option<Self> {
        let valid = !key.is_empty()
            && key.len() <= MAX_KEY_LEN
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        valid.then(|| Self::new(key.to_string()))
    }
}

impl<T> Record<T> {
    /// The key of the record without its table name, e.g. `abc` for `videos:abc`.
    pub fn key(&self) -> String {
        match &self.inner.id {
            Id::String(key) => key.clone(),
            other => other.to_string(),
        }
    }
}

impl<T> AsRef<Thing> for Record<T> {
    fn as_ref(&self) -> &Thing {
        &self.inner
    }
}

impl<T: Table> std::default::Default for Record<T> {
    fn default() -> Self {
        Self::random()
    }
}

impl<T> std::ops::Deref for Record<T> {
    type Target = Thing;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> std::fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

impl<T> std::fmt::Display for Record<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

impl<T> std::clone::Clone for Record<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> serde::Serialize for Record<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

impl<'de, T: Table> serde::Deserialize<'de> for Record<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let thing = Thing::deserialize(deserializer)?;

        let expected = T::table();
        let actual = &thing.tb;

        if expected != actual {
            return Err(serde::de::Error::custom(format!(
                "table name mismatch, expected '{expected}' but got '{actual}'"
            )));
        }

        Ok(Record {
            inner: thing,
            _marker: std::marker::PhantomData,
        })
    }
}

impl<T> std::cmp::PartialEq for Record<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> std::cmp::Eq for Record<T> {}

impl<T> std::hash::Hash for Record<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state)
    }
}

impl<T, R> IntoResource<R> for Record<T>
where
    Thing: IntoResource<R>,
{
    fn into_resource(self) -> std::result::Result<surrealdb::opt::Resource, surrealdb::Error> {
        self.inner.into_resource()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_keys_are_accepted_back() {
        let record = Record::<Video>::random();
        let parsed = Record::<Video>::parse_key(&record.key());
        assert_eq!(parsed, Some(record));
    }

    #[test]
    fn key_strips_the_table_name() {
        let record = Record::<Video>::new("pal-pal-chainal".to_string());
        assert_eq!(record.tb, "videos");
        assert_eq!(record.key(), "pal-pal-chainal");
    }

    #[test]
    fn reject_malformed_keys() {
        assert_eq!(Record::<Video>::parse_key(""), None);
        assert_eq!(Record::<Video>::parse_key("videos:abc"), None);
        assert_eq!(Record::<Video>::parse_key("a b"), None);
        assert_eq!(Record::<Video>::parse_key(&"x".repeat(65)), None);
    }

    #[test]
    fn reject_records_from_another_table() {
        let thing = Thing {
            tb: "users".to_string(),
            id: Id::String("krishna".to_string()),
        };
        let value = serde_json::to_value(&thing).unwrap();

        let result = serde_json::from_value::<Record<Video>>(value);
        assert!(result.is_err(), "a users record must not decode as a video");
    }
}
