//! The document store capability the video services are written against.
//!
//! [`crate::database::Database`] implements it on top of SurrealDB. Services stay generic over [`VideoStore`] so
//! they never reach for a concrete connection.

use std::future::Future;

use crate::model::{Uploader, VideoPatch};
use crate::prelude::*;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    #[snafu(display("failed to query the database at {location}: {source}"))]
    Query {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to deserialize the database response at {location}: {source}"))]
    Deserialize {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("expected a record from the database at {location}, but got none"))]
    NoResults {
        #[snafu(implicit)]
        location: Location,
    },
}

/// How a [`VideoFilter`] compares its text against the selected fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Relevance-scored full-text lookup through the search indexes, best match first.
    Ranked,
    /// Case-insensitive literal containment, in storage order.
    Substring,
}

/// The text fields a [`VideoFilter`] looks at. `tags` is matched per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct FieldMatches {
    pub title: bool,
    pub description: bool,
    pub category: bool,
    pub tags: bool,
}

impl FieldMatches {
    pub fn all() -> Self {
        Self::new(true, true, true, true)
    }
}

/// A typed text predicate over videos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFilter {
    pub text: String,
    pub fields: FieldMatches,
    pub mode: MatchMode,
    pub limit: usize,
}

impl VideoFilter {
    pub fn ranked(text: impl Into<String>, limit: usize) -> Self {
        Self {
            text: text.into(),
            fields: FieldMatches::all(),
            mode: MatchMode::Ranked,
            limit,
        }
    }

    pub fn substring(text: impl Into<String>, limit: usize) -> Self {
        Self {
            text: text.into(),
            fields: FieldMatches::all(),
            mode: MatchMode::Substring,
            limit,
        }
    }

    /// Whether `video` satisfies the substring predicate of this filter. The needle is the whole filter text.
    pub fn contained_in(&self, video: &Video) -> bool {
        let needle = self.text.to_lowercase();
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

        (self.fields.title && contains(&video.title))
            || (self.fields.description && contains(&video.description))
            || (self.fields.category && contains(&video.category))
            || (self.fields.tags && video.tags.iter().any(|tag| contains(tag)))
    }
}

/// Predicate/sort/limit listings that need no text matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    All,
    MostViewed { limit: usize },
    ShortForm { max_duration: i64, limit: usize },
}

/// A stored video joined with whatever could be resolved about its uploader.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRow {
    pub video: Video,
    pub uploader: Uploader,
}

pub trait VideoStore: Clone + Send + Sync + 'static {
    /// Runs a text filter. Rows come back best match first for [`MatchMode::Ranked`].
    fn find(&self, filter: &VideoFilter) -> impl Future<Output = Result<Vec<VideoRow>>> + Send;

    fn list(&self, listing: Listing) -> impl Future<Output = Result<Vec<VideoRow>>> + Send;

    fn get(&self, id: &Record<Video>) -> impl Future<Output = Result<Option<VideoRow>>> + Send;

    fn url_taken(&self, url: &str) -> impl Future<Output = Result<bool>> + Send;

    fn insert(&self, video: &Video) -> impl Future<Output = Result<Video>> + Send;

    /// Merges the set fields of `patch` into an existing video. Returns `None` when the video does not exist.
    fn update(
        &self,
        id: &Record<Video>,
        patch: &VideoPatch,
    ) -> impl Future<Output = Result<Option<Video>>> + Send;

    fn delete(&self, id: &Record<Video>) -> impl Future<Output = Result<Option<Video>>> + Send;

    fn increment_views(
        &self,
        id: &Record<Video>,
    ) -> impl Future<Output = Result<Option<Video>>> + Send;
}
