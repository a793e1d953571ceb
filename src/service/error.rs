use crate::model::DraftError;
use crate::prelude::*;

pub type Result<T, E = VideoError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum VideoError {
    #[snafu(display("{message}"))]
    InvalidArgument { message: String },

    #[snafu(display("{source}"))]
    InvalidDraft { source: DraftError },

    #[snafu(display("video `{id}` not found"))]
    NotFound { id: String },

    #[snafu(display("user `{user}` does not own video `{id}`"))]
    Forbidden { id: String, user: String },

    #[snafu(display("a video with url `{url}` already exists"))]
    Conflict { url: String },

    #[snafu(display("the video store is unavailable at {location}: {source}"))]
    Unavailable {
        source: StoreError,
        #[snafu(implicit)]
        location: Location,
    },
}
