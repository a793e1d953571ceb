//! Test doubles shared by the unit tests.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex, MutexGuard};

use snafu::IntoError as _;

use crate::database::{throw, DatabaseConfig};
use crate::model::{Uploader, VideoDefaults, VideoDraft, VideoPatch};
use crate::prelude::*;
use crate::store::{Listing, MatchMode, QuerySnafu, Result, VideoFilter, VideoRow};

/// A fresh embedded database with the schema applied.
pub async fn database() -> Database {
    Database::connect(&DatabaseConfig::memory())
        .await
        .expect("in-memory database should always be available")
}

/// A draft that passes validation, titled `title`.
pub fn draft(title: &str) -> VideoDraft {
    VideoDraft {
        title: title.to_string(),
        description: format!("{title} (official video)"),
        thumbnail: "https://i.ytimg.com/vi/placeholder/hqdefault.jpg".to_string(),
        duration: Some(240),
        ..VideoDraft::default()
    }
}

pub fn video(uploader: &Record<User>, draft: VideoDraft) -> Video {
    draft
        .into_video(uploader.clone(), &VideoDefaults::default())
        .expect("test drafts should be valid")
}

#[derive(Debug, Default)]
struct State {
    videos: Vec<Video>,
    users: Vec<User>,
    ranked_lookups: usize,
    substring_lookups: usize,
    offline: bool,
}

/// An in-memory [VideoStore] that counts its text lookups.
///
/// The ranked tier behaves like a word index: the whole query has to equal one whitespace separated word of a
/// field, or one whole tag, ignoring case. Everything else is left to the substring tier.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store lock poisoned")
    }

    pub fn add_user(&self, key: &str, username: &str) -> Record<User> {
        let id = Record::<User>::new(key.to_string());
        let user = User::new(id.clone(), username.to_string(), format!("{key}@example.com"));
        self.state().users.push(user);
        id
    }

    pub fn add(&self, video: Video) -> Video {
        self.state().videos.push(video.clone());
        video
    }

    pub fn lookups(&self, mode: MatchMode) -> usize {
        let state = self.state();
        match mode {
            MatchMode::Ranked => state.ranked_lookups,
            MatchMode::Substring => state.substring_lookups,
        }
    }

    /// Makes every following call fail like a lost connection.
    pub fn go_offline(&self) {
        self.state().offline = true;
    }

    fn check_online(state: &State) -> Result<()> {
        if state.offline {
            return Err(QuerySnafu.into_error(throw("connection refused")));
        }
        Ok(())
    }

    fn row(state: &State, video: &Video) -> VideoRow {
        let username = state
            .users
            .iter()
            .find(|user| user.id == video.uploader)
            .map(|user| user.username.clone());

        VideoRow {
            video: video.clone(),
            uploader: Uploader::new(video.uploader.clone(), username),
        }
    }
}

fn word_score(filter: &VideoFilter, video: &Video) -> usize {
    let query = filter.text.trim().to_lowercase();
    let words = |text: &str| {
        text.split_whitespace()
            .filter(|word| word.to_lowercase() == query)
            .count()
    };

    let mut score = 0;
    if filter.fields.title {
        score += words(&video.title);
    }
    if filter.fields.description {
        score += words(&video.description);
    }
    if filter.fields.category {
        score += words(&video.category);
    }
    if filter.fields.tags {
        score += video
            .tags
            .iter()
            .filter(|tag| tag.to_lowercase() == query)
            .count();
    }
    score
}

impl VideoStore for MemoryStore {
    async fn find(&self, filter: &VideoFilter) -> Result<Vec<VideoRow>> {
        let mut state = self.state();
        match filter.mode {
            MatchMode::Ranked => state.ranked_lookups += 1,
            MatchMode::Substring => state.substring_lookups += 1,
        }
        Self::check_online(&state)?;

        let rows = match filter.mode {
            MatchMode::Ranked => {
                let mut scored: Vec<_> = state
                    .videos
                    .iter()
                    .map(|video| (word_score(filter, video), video))
                    .filter(|(score, _)| *score > 0)
                    .collect();
                scored.sort_by(|(a, _), (b, _)| b.cmp(a));
                scored
                    .into_iter()
                    .take(filter.limit)
                    .map(|(_, video)| Self::row(&state, video))
                    .collect()
            }
            MatchMode::Substring => state
                .videos
                .iter()
                .filter(|video| filter.contained_in(video))
                .take(filter.limit)
                .map(|video| Self::row(&state, video))
                .collect(),
        };

        Ok(rows)
    }

    async fn list(&self, listing: Listing) -> Result<Vec<VideoRow>> {
        let state = self.state();
        Self::check_online(&state)?;

        let mut videos: Vec<&Video> = state.videos.iter().collect();
        match listing {
            Listing::All => {}
            Listing::MostViewed { limit } => {
                videos.sort_by(|a, b| b.views.cmp(&a.views));
                videos.truncate(limit);
            }
            Listing::ShortForm {
                max_duration,
                limit,
            } => {
                videos.retain(|video| video.duration < max_duration);
                videos.sort_by(|a, b| {
                    b.created_at
                        .partial_cmp(&a.created_at)
                        .unwrap_or(Ordering::Equal)
                });
                videos.truncate(limit);
            }
        }

        Ok(videos
            .into_iter()
            .map(|video| Self::row(&state, video))
            .collect())
    }

    async fn get(&self, id: &Record<Video>) -> Result<Option<VideoRow>> {
        let state = self.state();
        Self::check_online(&state)?;

        Ok(state
            .videos
            .iter()
            .find(|video| &video.id == id)
            .map(|video| Self::row(&state, video)))
    }

    async fn url_taken(&self, url: &str) -> Result<bool> {
        let state = self.state();
        Self::check_online(&state)?;

        Ok(state.videos.iter().any(|video| video.url == url))
    }

    async fn insert(&self, video: &Video) -> Result<Video> {
        let mut state = self.state();
        Self::check_online(&state)?;

        state.videos.push(video.clone());
        Ok(video.clone())
    }

    async fn update(&self, id: &Record<Video>, patch: &VideoPatch) -> Result<Option<Video>> {
        let mut state = self.state();
        Self::check_online(&state)?;

        Ok(state
            .videos
            .iter_mut()
            .find(|video| &video.id == id)
            .map(|video| {
                patch.apply(video);
                video.clone()
            }))
    }

    async fn delete(&self, id: &Record<Video>) -> Result<Option<Video>> {
        let mut state = self.state();
        Self::check_online(&state)?;

        let position = state.videos.iter().position(|video| &video.id == id);
        Ok(position.map(|index| state.videos.remove(index)))
    }

    async fn increment_views(&self, id: &Record<Video>) -> Result<Option<Video>> {
        let mut state = self.state();
        Self::check_online(&state)?;

        Ok(state
            .videos
            .iter_mut()
            .find(|video| &video.id == id)
            .map(|video| {
                video.views += 1;
                video.clone()
            }))
    }
}
