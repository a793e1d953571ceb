//! Loads users and videos from a JSON fixtures file into the database.
//!
//! Seeding is idempotent: users are upserted under their fixture key and videos whose `url` is already stored are
//! skipped.

use std::path::Path;

use tracing::instrument;

use crate::model::{DraftError, VideoDefaults, VideoDraft};
use crate::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SeedError {
    #[snafu(display("cannot read the fixtures file: {source}"))]
    Read { source: std::io::Error },

    #[snafu(display("malformed fixtures: {source}"))]
    Parse { source: serde_json::Error },

    #[snafu(display("`{key}` is not a valid user key"))]
    InvalidUser { key: String },

    #[snafu(display("fixture video `{title}` is invalid: {source}"))]
    InvalidVideo { title: String, source: DraftError },

    #[snafu(display("cannot write fixtures: {source}"))]
    Store { source: StoreError },
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserFixture {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoFixture {
    /// Key of the uploading user.
    pub uploader: String,
    #[serde(default)]
    pub views: i64,
    #[serde(flatten)]
    pub draft: VideoDraft,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    pub users: Vec<UserFixture>,
    pub videos: Vec<VideoFixture>,
}

/// What a seeding run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub videos_added: usize,
    pub videos_skipped: usize,
}

impl Fixtures {
    pub fn parse(text: &str) -> Result<Self, SeedError> {
        serde_json::from_str(text).context(ParseSnafu)
    }

    pub async fn load(path: &Path) -> Result<Self, SeedError> {
        let text = tokio::fs::read_to_string(path).await.context(ReadSnafu)?;
        Self::parse(&text)
    }

    #[instrument(skip_all, fields(users = self.users.len(), videos = self.videos.len()))]
    pub async fn apply(
        self,
        db: &Database,
        defaults: &VideoDefaults,
    ) -> Result<SeedReport, SeedError> {
        let mut report = SeedReport::default();

        for fixture in self.users {
            let id = user_key(&fixture.id)?;
            let user = User::new(id, fixture.username, fixture.email);
            user.upsert(db).await.context(StoreSnafu)?;
            report.users += 1;
        }

        for VideoFixture {
            uploader,
            views,
            draft,
        } in self.videos
        {
            let uploader = user_key(&uploader)?;
            let title = draft.title.clone();
            let video = VideoDraft { views, ..draft }
                .into_video(uploader, defaults)
                .context(InvalidVideoSnafu { title })?;

            if db.url_taken(&video.url).await.context(StoreSnafu)? {
                tracing::debug!(url = %video.url, "video already stored, skipping");
                report.videos_skipped += 1;
                continue;
            }

            db.insert(&video).await.context(StoreSnafu)?;
            report.videos_added += 1;
        }

        tracing::info!(?report, "fixtures applied");
        Ok(report)
    }
}

fn user_key(key: &str) -> Result<Record<User>, SeedError> {
    Record::parse_key(key).context(InvalidUserSnafu { key })
}
