use axum::extract::FromRef;

use crate::auth::Authenticator;
use crate::model::VideoDefaults;
use crate::prelude::*;
use crate::service::{SearchService, VideoCatalog};

/// Everything a request handler needs, cloned into each request.
#[derive(Debug, Clone, new)]
pub struct App<S> {
    pub search: SearchService<S>,
    pub catalog: VideoCatalog<S>,
    pub authenticator: Authenticator,
}

impl<S> FromRef<App<S>> for Authenticator {
    fn from_ref(app: &App<S>) -> Self {
        app.authenticator.clone()
    }
}

pub fn create_app<S: VideoStore>(
    store: S,
    defaults: VideoDefaults,
    authenticator: Authenticator,
) -> App<S> {
    App {
        search: SearchService::new(store.clone()),
        catalog: VideoCatalog::new(store, defaults),
        authenticator,
    }
}
