use crate::http;
use crate::posting::reddit::api::Listing;
use crate::posting::reddit::{Config, Subreddit};
use crate::prelude::*;
use crate::Result;
use url::Url;

pub(crate) struct Client {
    http: http::Client,
    base_url: Url,
}

impl Client {
    pub(crate) fn new(cfg: &Config, http: http::Client) -> Self {
        Self {
            http,
            base_url: cfg.base_url.clone(),
        }
    }

    /// Returns the "hot" listing of the subreddit via the public JSON endpoint
    /// that doesn't require authentication.
    pub(crate) async fn get_hot_listing(&self, subreddit: &Subreddit, limit: u32) -> Result<Listing> {
        let url = self.hot_listing_url(subreddit, limit)?;
        self.http.get(url).read_json().await
    }

    fn hot_listing_url(&self, subreddit: &Subreddit, limit: u32) -> Result<Url> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .ok()
            .fatal_ctx(|| format!("Base URL can't have path segments: {}", self.base_url))?
            .pop_if_empty()
            .extend(["r", subreddit.as_str(), "hot.json"]);

        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        Ok(url)
    }
}
