use tracing::instrument;

use super::{InvalidArgumentSnafu, Result, UnavailableSnafu};
use crate::prelude::*;
use crate::projection::{project, VideoView};
use crate::store::VideoFilter;

/// Upper bound on the number of videos a single search returns.
pub const SEARCH_LIMIT: usize = 20;

/// Two-tier video search.
///
/// The ranked tier goes through the full-text indexes, which only match whole tokens. When it finds nothing the
/// query is matched again as a case-insensitive substring, so partial words like `chain` in `Chainal` still
/// turn up.
#[derive(Debug, Clone, new)]
pub struct SearchService<S> {
    store: S,
}

impl<S: VideoStore> SearchService<S> {
    #[instrument(skip(self))]
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<VideoView>> {
        // stricter than only rejecting a missing or empty `q`: blank queries are refused too
        let text = query
            .filter(|text| !text.trim().is_empty())
            .context(InvalidArgumentSnafu {
                message: "Query parameter is required",
            })?;

        let ranked = self
            .store
            .find(&VideoFilter::ranked(text, SEARCH_LIMIT))
            .await
            .context(UnavailableSnafu)?;

        let mut rows = if ranked.is_empty() {
            tracing::debug!("no ranked match, falling back to substring matching");
            self.store
                .find(&VideoFilter::substring(text, SEARCH_LIMIT))
                .await
                .context(UnavailableSnafu)?
        } else {
            ranked
        };

        rows.truncate(SEARCH_LIMIT);
        tracing::info!(found = rows.len(), "search finished");

        Ok(project(rows))
    }
}
