use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::instrument;

use super::{App, BodySnafu, Message, Result};
use crate::auth::Identity;
use crate::model::{VideoDraft, VideoPatch};
use crate::prelude::*;
use crate::projection::VideoView;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

#[instrument(skip(app))]
pub async fn search<S: VideoStore>(
    State(app): State<App<S>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<VideoView>>> {
    let videos = app.search.search(params.q.as_deref()).await?;
    Ok(Json(videos))
}

#[instrument(skip(app))]
pub async fn list<S: VideoStore>(State(app): State<App<S>>) -> Result<Json<Vec<VideoView>>> {
    Ok(Json(app.catalog.list_all().await?))
}

#[instrument(skip(app))]
pub async fn trending<S: VideoStore>(State(app): State<App<S>>) -> Result<Json<Vec<VideoView>>> {
    Ok(Json(app.catalog.trending().await?))
}

#[instrument(skip(app))]
pub async fn shorts<S: VideoStore>(State(app): State<App<S>>) -> Result<Json<Vec<VideoView>>> {
    Ok(Json(app.catalog.shorts().await?))
}

#[instrument(skip(app))]
pub async fn get<S: VideoStore>(
    State(app): State<App<S>>,
    Path(id): Path<String>,
) -> Result<Json<VideoView>> {
    Ok(Json(app.catalog.get(&id).await?))
}

#[instrument(skip(app, body))]
pub async fn create<S: VideoStore>(
    State(app): State<App<S>>,
    identity: Identity,
    body: std::result::Result<Json<VideoDraft>, JsonRejection>,
) -> Result<Json<VideoView>> {
    let Json(draft) = body.context(BodySnafu)?;
    let video = app.catalog.create(&identity.user, draft).await?;
    Ok(Json(video))
}

#[instrument(skip(app, body))]
pub async fn update<S: VideoStore>(
    State(app): State<App<S>>,
    identity: Identity,
    Path(id): Path<String>,
    body: std::result::Result<Json<VideoPatch>, JsonRejection>,
) -> Result<Json<VideoView>> {
    let Json(patch) = body.context(BodySnafu)?;
    let video = app.catalog.update(&identity.user, &id, patch).await?;
    Ok(Json(video))
}

#[instrument(skip(app))]
pub async fn remove<S: VideoStore>(
    State(app): State<App<S>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Message>> {
    app.catalog.delete(&identity.user, &id).await?;
    Ok(Json(Message::new("Video removed")))
}

#[instrument(skip(app))]
pub async fn view<S: VideoStore>(
    State(app): State<App<S>>,
    Path(id): Path<String>,
) -> Result<Json<VideoView>> {
    Ok(Json(app.catalog.increment_views(&id).await?))
}
