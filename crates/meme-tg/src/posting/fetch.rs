use crate::posting::reddit::api::{self, Listing};
use crate::posting::reddit::Subreddit;
use crate::posting::Post;
use crate::prelude::*;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of raw listings. The production implementation goes to Reddit over
/// HTTP, but the fetching logic doesn't care where the listings come from.
#[async_trait]
pub(crate) trait ListingApi: Send + Sync {
    async fn hot_listing(&self, subreddit: &Subreddit, limit: u32) -> Result<Listing>;
}

#[async_trait]
impl ListingApi for api::Client {
    async fn hot_listing(&self, subreddit: &Subreddit, limit: u32) -> Result<Listing> {
        self.get_hot_listing(subreddit, limit).await
    }
}

#[derive(Clone)]
pub(crate) struct Fetcher {
    api: Arc<dyn ListingApi>,
}

impl Fetcher {
    pub(crate) fn new(api: Arc<dyn ListingApi>) -> Self {
        Self { api }
    }

    /// Fetches the hot posts of the subreddit and keeps only the ones that
    /// point to an image or a video. Any failure is logged and results in an
    /// empty list, so the caller can move on to another source.
    pub(crate) async fn fetch_media_posts(&self, subreddit: &Subreddit, limit: u32) -> Vec<Post> {
        let outcome;

        let posts = match self.api.hot_listing(subreddit, limit).await {
            Ok(listing) => {
                let posts = listing.into_media_posts(subreddit);
                outcome = if posts.is_empty() { "empty" } else { "ok" };
                posts
            }
            Err(err) => {
                warn!(
                    err = tracing_err(&err),
                    err_id = err.id(),
                    %subreddit,
                    "Failed to fetch the subreddit listing"
                );
                outcome = "error";
                vec![]
            }
        };

        debug!(%subreddit, outcome, media_posts = posts.len(), "Fetched subreddit listing");

        metrics::increment_counter!(
            "reddit_fetches_total",
            "subreddit" => subreddit.to_string(),
            "outcome" => outcome
        );

        posts
    }
}
