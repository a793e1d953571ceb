use tracing::instrument;

use super::Sql as _;
use crate::define_relation;
use crate::model::{Uploader, VideoPatch};
use crate::prelude::*;
use crate::store::{
    FieldMatches, Listing, MatchMode, NoResultsSnafu, QuerySnafu, Result, VideoFilter, VideoRow,
};

/// A video row with its uploader's display name resolved through the record link.
#[derive(Debug, Deserialize)]
pub struct JoinedVideo {
    #[serde(flatten)]
    video: Video,
    uploader_name: Option<String>,
}

impl From<JoinedVideo> for VideoRow {
    fn from(row: JoinedVideo) -> Self {
        let uploader = Uploader::new(row.video.uploader.clone(), row.uploader_name);
        VideoRow {
            video: row.video,
            uploader,
        }
    }
}

define_relation! {
    Video > everything() > Vec<JoinedVideo>
        where "SELECT *, uploader.username AS uploader_name FROM videos"
}

define_relation! {
    Video > most_viewed(limit: usize) > Vec<JoinedVideo>
        where "SELECT *, uploader.username AS uploader_name FROM videos ORDER BY views DESC LIMIT $limit"
}

define_relation! {
    Video > short_form(max_duration: i64, limit: usize) > Vec<JoinedVideo>
        where "SELECT *, uploader.username AS uploader_name FROM videos WHERE duration < $max_duration ORDER BY created_at DESC LIMIT $limit"
}

define_relation! {
    Video > joined(id: &Record<Video>) > Option<JoinedVideo>
        where "SELECT *, uploader.username AS uploader_name FROM $id"
}

define_relation! {
    Video > by_url(url: &str) > Option<Video>
        where "SELECT * FROM videos WHERE url = $url LIMIT 1"
}

define_relation! {
    Video > merge(id: &Record<Video>, patch: &VideoPatch) > Option<Video>
        where "UPDATE videos MERGE $patch WHERE id = $id RETURN AFTER"
}

define_relation! {
    Video > add_view(id: &Record<Video>) > Option<Video>
        where "UPDATE videos SET views += 1 WHERE id = $id RETURN AFTER"
}

fn selected_fields(fields: FieldMatches) -> Vec<&'static str> {
    [
        (fields.title, "title"),
        (fields.description, "description"),
        (fields.category, "category"),
        (fields.tags, "tags"),
    ]
    .into_iter()
    .filter_map(|(selected, field)| selected.then_some(field))
    .collect()
}

/// Builds the SurrealQL statement for a text filter. Field names come from a fixed list, the user's text is always
/// bound as `$text`.
fn text_query(filter: &VideoFilter) -> Option<String> {
    let fields = selected_fields(filter.fields);
    if fields.is_empty() {
        return None;
    }

    let query = match filter.mode {
        MatchMode::Ranked => {
            let conditions = fields
                .iter()
                .enumerate()
                .map(|(reference, field)| format!("{field} @{reference}@ $text"))
                .collect::<Vec<_>>()
                .join(" OR ");

            // a document that only matched some of the indexes has no score for the others
            let score = (0..fields.len())
                .map(|reference| format!("(search::score({reference}) OR 0)"))
                .collect::<Vec<_>>()
                .join(" + ");

            format!(
                "SELECT *, uploader.username AS uploader_name, {score} AS score FROM videos \
                 WHERE {conditions} ORDER BY score DESC LIMIT $limit"
            )
        }
        MatchMode::Substring => {
            let conditions = fields
                .iter()
                .map(|field| match *field {
                    // each tag on its own, so a match never spans two tags
                    "tags" => "array::len(tags[WHERE string::lowercase($this) CONTAINS $text]) > 0".to_string(),
                    field => format!("string::lowercase({field}) CONTAINS $text"),
                })
                .collect::<Vec<_>>()
                .join(" OR ");

            format!(
                "SELECT *, uploader.username AS uploader_name FROM videos WHERE {conditions} LIMIT $limit"
            )
        }
    };

    Some(query)
}

impl VideoStore for Database {
    #[instrument(skip(self))]
    async fn find(&self, filter: &VideoFilter) -> Result<Vec<VideoRow>> {
        let Some(query) = text_query(filter) else {
            return Ok(Vec::new());
        };

        let text = match filter.mode {
            MatchMode::Ranked => filter.text.clone(),
            MatchMode::Substring => filter.text.to_lowercase(),
        };

        let rows: Vec<JoinedVideo> = self
            .sql(&query)
            .bind(("text", text))
            .bind(("limit", filter.limit))
            .fetch_first()
            .await?;

        tracing::debug!(mode = ?filter.mode, found = rows.len(), "text lookup finished");
        Ok(rows.into_iter().map(VideoRow::from).collect())
    }

    async fn list(&self, listing: Listing) -> Result<Vec<VideoRow>> {
        let rows = match listing {
            Listing::All => Video::everything(self).await?,
            Listing::MostViewed { limit } => Video::most_viewed(limit, self).await?,
            Listing::ShortForm {
                max_duration,
                limit,
            } => Video::short_form(max_duration, limit, self).await?,
        };

        Ok(rows.into_iter().map(VideoRow::from).collect())
    }

    async fn get(&self, id: &Record<Video>) -> Result<Option<VideoRow>> {
        let row = Video::joined(id, self).await?;
        Ok(row.map(VideoRow::from))
    }

    async fn url_taken(&self, url: &str) -> Result<bool> {
        let video = Video::by_url(url, self).await?;
        Ok(video.is_some())
    }

    #[instrument(skip_all, fields(video = %video.id))]
    async fn insert(&self, video: &Video) -> Result<Video> {
        let created: Option<Video> = self
            .create(video.id.clone())
            .content(video)
            .await
            .context(QuerySnafu)?;

        created.context(NoResultsSnafu)
    }

    async fn update(&self, id: &Record<Video>, patch: &VideoPatch) -> Result<Option<Video>> {
        Video::merge(id, patch, self).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &Record<Video>) -> Result<Option<Video>> {
        self.database
            .delete(id.clone())
            .await
            .context(QuerySnafu)
    }

    async fn increment_views(&self, id: &Record<Video>) -> Result<Option<Video>> {
        Video::add_view(id, self).await
    }
}
