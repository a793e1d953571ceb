use snafu::ensure;

use crate::define_table;
use crate::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Public,
    Private,
    Unlisted,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Video {
    pub id: Record<Video>,
    pub title: String,
    pub description: String,
    pub url: String,
    pub thumbnail: String,
    /// Length in seconds.
    pub duration: i64,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub dislikes: i64,
    pub uploader: Record<User>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub privacy: Privacy,
    pub created_at: Datetime,
}

define_table!("videos" : Video = id);

/// Values a new video falls back to when the upload leaves them out.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VideoDefaults {
    #[serde(rename = "default_category", default = "default_category")]
    pub category: String,
    #[serde(rename = "default_privacy", default)]
    pub privacy: Privacy,
}

impl Default for VideoDefaults {
    fn default() -> Self {
        Self {
            category: default_category(),
            privacy: Privacy::default(),
        }
    }
}

fn default_category() -> String {
    "Music".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum DraftError {
    #[snafu(display("Title is required"))]
    MissingTitle,
    #[snafu(display("Description is required"))]
    MissingDescription,
    #[snafu(display("Thumbnail is required"))]
    MissingThumbnail,
    #[snafu(display("Duration is required"))]
    MissingDuration,
    #[snafu(display("Duration must not be negative"))]
    NegativeDuration { duration: i64 },
}

/// An upload request as it arrives, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VideoDraft {
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub url: Option<String>,
    pub duration: Option<i64>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub privacy: Option<Privacy>,
    #[serde(skip)]
    pub views: i64,
}

impl VideoDraft {
    /// Validates the draft and turns it into a video owned by `uploader`.
    ///
    /// Uploads without a source url get an `uploaded://` placeholder, since `url` must be unique.
    pub fn into_video(
        self,
        uploader: Record<User>,
        defaults: &VideoDefaults,
    ) -> Result<Video, DraftError> {
        let title = self.title.trim();
        ensure!(!title.is_empty(), MissingTitleSnafu);
        ensure!(!self.description.trim().is_empty(), MissingDescriptionSnafu);
        ensure!(!self.thumbnail.trim().is_empty(), MissingThumbnailSnafu);

        let duration = self.duration.context(MissingDurationSnafu)?;
        ensure!(duration >= 0, NegativeDurationSnafu { duration });

        let url = non_empty(self.url)
            .unwrap_or_else(|| format!("uploaded://{}", uuid::Uuid::new_v4().simple()));
        let category = non_empty(self.category).unwrap_or_else(|| defaults.category.clone());

        Ok(Video {
            id: Record::random(),
            title: title.to_string(),
            description: self.description,
            url,
            thumbnail: self.thumbnail,
            duration,
            views: self.views,
            likes: 0,
            dislikes: 0,
            uploader,
            category,
            tags: self.tags,
            privacy: self.privacy.unwrap_or(defaults.privacy),
            created_at: chrono::Utc::now().into(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// The editable fields of a video. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct VideoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl VideoPatch {
    /// Drops blank text fields so they count as "not provided". An empty tag list still clears the tags.
    pub fn normalized(self) -> Self {
        Self {
            title: non_empty(self.title),
            description: self.description.filter(|text| !text.trim().is_empty()),
            thumbnail: non_empty(self.thumbnail),
            category: non_empty(self.category),
            tags: self.tags,
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(&self, video: &mut Video) {
        let Self {
            title,
            description,
            thumbnail,
            category,
            tags,
        } = self.clone();

        if let Some(title) = title {
            video.title = title;
        }
        if let Some(description) = description {
            video.description = description;
        }
        if let Some(thumbnail) = thumbnail {
            video.thumbnail = thumbnail;
        }
        if let Some(category) = category {
            video.category = category;
        }
        if let Some(tags) = tags {
            video.tags = tags;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> VideoDraft {
        VideoDraft {
            title: "  Tu Hai Kahan ".to_string(),
            description: "Official music video for \"Tu Hai Kahan\" by Rauf & Faik.".to_string(),
            thumbnail: "https://i.ytimg.com/vi/YyKh758hwT0/hqdefault.jpg".to_string(),
            duration: Some(260),
            ..VideoDraft::default()
        }
    }

    #[test]
    fn apply_defaults_to_missing_fields() {
        let uploader = Record::<User>::new("atharva".to_string());
        let video = draft()
            .into_video(uploader.clone(), &VideoDefaults::default())
            .unwrap();

        assert_eq!(video.title, "Tu Hai Kahan", "title should be trimmed");
        assert_eq!(video.category, "Music");
        assert_eq!(video.privacy, Privacy::Public);
        assert_eq!(video.uploader, uploader);
        assert_eq!((video.views, video.likes, video.dislikes), (0, 0, 0));
        assert!(video.url.starts_with("uploaded://"));
    }

    #[test]
    fn configured_defaults_win_over_builtin_ones() {
        let defaults = VideoDefaults {
            category: "Gaming".to_string(),
            privacy: Privacy::Unlisted,
        };
        let video = draft()
            .into_video(Record::new("atharva".to_string()), &defaults)
            .unwrap();

        assert_eq!(video.category, "Gaming");
        assert_eq!(video.privacy, Privacy::Unlisted);
    }

    #[test]
    fn placeholder_urls_are_unique() {
        let uploader = Record::<User>::new("atharva".to_string());
        let defaults = VideoDefaults::default();
        let a = draft().into_video(uploader.clone(), &defaults).unwrap();
        let b = draft().into_video(uploader, &defaults).unwrap();
        assert_ne!(a.url, b.url);
    }

    #[test]
    fn reject_incomplete_drafts() {
        let uploader = Record::<User>::new("atharva".to_string());
        let defaults = VideoDefaults::default();

        let cases = [
            (VideoDraft { title: " ".into(), ..draft() }, DraftError::MissingTitle),
            (VideoDraft { description: "".into(), ..draft() }, DraftError::MissingDescription),
            (VideoDraft { thumbnail: "".into(), ..draft() }, DraftError::MissingThumbnail),
            (VideoDraft { duration: None, ..draft() }, DraftError::MissingDuration),
            (
                VideoDraft { duration: Some(-1), ..draft() },
                DraftError::NegativeDuration { duration: -1 },
            ),
        ];

        for (draft, expected) in cases {
            let result = draft.into_video(uploader.clone(), &defaults);
            assert_eq!(result, Err(expected));
        }
    }

    #[test]
    fn blank_patch_fields_are_ignored() {
        let patch = VideoPatch {
            title: Some("".to_string()),
            category: Some("  ".to_string()),
            tags: Some(vec![]),
            ..VideoPatch::default()
        }
        .normalized();

        assert_eq!(patch.title, None);
        assert_eq!(patch.category, None);
        assert_eq!(patch.tags, Some(vec![]));
        assert!(!patch.is_empty());
    }

    #[test]
    fn patch_serializes_only_provided_fields() {
        let patch = VideoPatch {
            title: Some("Pal Pal Chainal".to_string()),
            ..VideoPatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "title": "Pal Pal Chainal" }));
    }
}
