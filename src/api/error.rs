use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::Message;
use crate::prelude::*;
use crate::service::VideoError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApiError {
    #[snafu(context(false), display("{source}"))]
    Video { source: VideoError },

    #[snafu(display("malformed request body: {source}"))]
    Body { source: JsonRejection },
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Body { source } => (StatusCode::BAD_REQUEST, source.body_text()),
            ApiError::Video { source } => match source {
                VideoError::InvalidArgument { message } => (StatusCode::BAD_REQUEST, message.clone()),
                VideoError::InvalidDraft { source } => (StatusCode::BAD_REQUEST, source.to_string()),
                VideoError::NotFound { .. } => (StatusCode::NOT_FOUND, "Video not found".into()),
                VideoError::Forbidden { .. } => (StatusCode::FORBIDDEN, "User not authorized".into()),
                VideoError::Conflict { .. } => (
                    StatusCode::CONFLICT,
                    "Video with this URL already exists".into(),
                ),
                VideoError::Unavailable { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Server error".into())
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        (status, Json(Message { msg })).into_response()
    }
}
