//! The response form of a video.

use crate::prelude::*;
use crate::store::VideoRow;

/// Only the display name of an uploader is ever exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploaderView {
    pub id: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub thumbnail: String,
    pub duration: i64,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub uploader: UploaderView,
    pub category: String,
    pub tags: Vec<String>,
    pub privacy: Privacy,
    pub created_at: Datetime,
}

impl From<VideoRow> for VideoView {
    fn from(VideoRow { video, uploader }: VideoRow) -> Self {
        VideoView {
            id: video.id.key(),
            title: video.title,
            description: video.description,
            url: video.url,
            thumbnail: video.thumbnail,
            duration: video.duration,
            views: video.views,
            likes: video.likes,
            dislikes: video.dislikes,
            uploader: UploaderView {
                id: uploader.id.key(),
                username: uploader.username,
            },
            category: video.category,
            tags: video.tags,
            privacy: video.privacy,
            created_at: video.created_at,
        }
    }
}

pub fn project(rows: Vec<VideoRow>) -> Vec<VideoView> {
    rows.into_iter().map(VideoView::from).collect()
}
