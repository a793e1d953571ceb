use axum::routing::{get, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod error;
mod state;
mod videos;

pub use error::*;
pub use state::*;

use crate::prelude::*;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// The `{ "msg": ... }` body used for errors and plain acknowledgements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub msg: String,
}

impl Message {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

pub fn create_router<S: VideoStore>(app: App<S>) -> Router {
    let videos = Router::new()
        .route("/", get(videos::list::<S>).post(videos::create::<S>))
        .route("/search", get(videos::search::<S>))
        .route("/trending", get(videos::trending::<S>))
        .route("/shorts", get(videos::shorts::<S>))
        .route(
            "/:id",
            get(videos::get::<S>)
                .put(videos::update::<S>)
                .delete(videos::remove::<S>),
        )
        .route("/:id/views", put(videos::view::<S>));

    Router::new()
        .nest("/api/videos", videos)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app)
}
