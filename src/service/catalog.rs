use snafu::ensure;
use tracing::instrument;

use super::{
    ConflictSnafu, ForbiddenSnafu, InvalidDraftSnafu, NotFoundSnafu, Result, UnavailableSnafu,
};
use crate::model::{VideoDefaults, VideoDraft, VideoPatch};
use crate::prelude::*;
use crate::projection::{project, VideoView};
use crate::store::Listing;

pub const TRENDING_LIMIT: usize = 20;
pub const SHORTS_LIMIT: usize = 20;
/// Videos strictly shorter than this many seconds count as shorts.
pub const SHORT_FORM_MAX_DURATION: i64 = 60;

/// Listing, lookup and owner-gated mutation of videos.
#[derive(Debug, Clone, new)]
pub struct VideoCatalog<S> {
    store: S,
    defaults: VideoDefaults,
}

fn parse_id(id: &str) -> Result<Record<Video>> {
    Record::parse_key(id).context(NotFoundSnafu { id })
}

impl<S: VideoStore> VideoCatalog<S> {
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<VideoView>> {
        self.listing(Listing::All).await
    }

    #[instrument(skip(self))]
    pub async fn trending(&self) -> Result<Vec<VideoView>> {
        self.listing(Listing::MostViewed {
            limit: TRENDING_LIMIT,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn shorts(&self) -> Result<Vec<VideoView>> {
        self.listing(Listing::ShortForm {
            max_duration: SHORT_FORM_MAX_DURATION,
            limit: SHORTS_LIMIT,
        })
        .await
    }

    async fn listing(&self, listing: Listing) -> Result<Vec<VideoView>> {
        let rows = self.store.list(listing).await.context(UnavailableSnafu)?;
        Ok(project(rows))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<VideoView> {
        let id = parse_id(id)?;
        self.view(&id).await
    }

    async fn view(&self, id: &Record<Video>) -> Result<VideoView> {
        let row = self.store.get(id).await.context(UnavailableSnafu)?;
        let row = row.context(NotFoundSnafu { id: id.key() })?;
        Ok(row.into())
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&self, owner: &Record<User>, draft: VideoDraft) -> Result<VideoView> {
        let video = draft
            .into_video(owner.clone(), &self.defaults)
            .context(InvalidDraftSnafu)?;

        let taken = self
            .store
            .url_taken(&video.url)
            .await
            .context(UnavailableSnafu)?;
        ensure!(!taken, ConflictSnafu { url: &video.url });

        let video = self.store.insert(&video).await.context(UnavailableSnafu)?;
        tracing::info!(video = %video.id, "video created");

        self.view(&video.id).await
    }

    /// Resolves `id` to a video uploaded by `owner`.
    async fn owned(&self, owner: &Record<User>, id: &str) -> Result<Record<Video>> {
        let id = parse_id(id)?;
        let row = self.store.get(&id).await.context(UnavailableSnafu)?;
        let row = row.context(NotFoundSnafu { id: id.key() })?;

        ensure!(
            &row.video.uploader == owner,
            ForbiddenSnafu {
                id: id.key(),
                user: owner.key(),
            }
        );

        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        owner: &Record<User>,
        id: &str,
        patch: VideoPatch,
    ) -> Result<VideoView> {
        let id = self.owned(owner, id).await?;

        let patch = patch.normalized();
        if !patch.is_empty() {
            let updated = self
                .store
                .update(&id, &patch)
                .await
                .context(UnavailableSnafu)?;
            updated.context(NotFoundSnafu { id: id.key() })?;
        }

        self.view(&id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, owner: &Record<User>, id: &str) -> Result<()> {
        let id = self.owned(owner, id).await?;

        let deleted = self.store.delete(&id).await.context(UnavailableSnafu)?;
        deleted.context(NotFoundSnafu { id: id.key() })?;

        tracing::info!(video = %id, "video removed");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn increment_views(&self, id: &str) -> Result<VideoView> {
        let id = parse_id(id)?;

        let viewed = self
            .store
            .increment_views(&id)
            .await
            .context(UnavailableSnafu)?;
        viewed.context(NotFoundSnafu { id: id.key() })?;

        self.view(&id).await
    }
}
