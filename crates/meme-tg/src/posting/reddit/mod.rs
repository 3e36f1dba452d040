pub(crate) mod api;

use crate::config::invalid_value;
use crate::Result;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Reddit caps the size of a single listing page at this value
const MAX_LISTING_LIMIT: u32 = 100;

#[derive(Deserialize, Clone)]
pub(crate) struct Config {
    #[serde(default = "default_base_url")]
    pub(crate) base_url: Url,

    /// Fixed set of sources to pick the memes from
    #[serde(default = "default_subreddits")]
    pub(crate) subreddits: Vec<Subreddit>,

    /// Number of posts requested from a single listing
    #[serde(default = "default_limit")]
    pub(crate) limit: u32,

    #[serde(default = "default_timeout_secs")]
    pub(crate) timeout_secs: u64,
}

fn default_base_url() -> Url {
    Url::parse("https://www.reddit.com").expect("BUG: the default base URL is invalid")
}

fn default_subreddits() -> Vec<Subreddit> {
    ["memes", "dankmemes", "wholesomememes"]
        .into_iter()
        .map(|name| Subreddit(name.to_owned()))
        .collect()
}

fn default_limit() -> u32 {
    50
}

fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub(crate) fn validate(&self) -> Result {
        if self.subreddits.is_empty() {
            return Err(invalid_value("REDDIT_SUBREDDITS", "at least one subreddit is required"));
        }

        let has_duplicates = self
            .subreddits
            .iter()
            .enumerate()
            .any(|(i, subreddit)| self.subreddits[..i].contains(subreddit));

        if has_duplicates {
            return Err(invalid_value("REDDIT_SUBREDDITS", "subreddits must be unique"));
        }

        if !(1..=MAX_LISTING_LIMIT).contains(&self.limit) {
            return Err(invalid_value("REDDIT_LIMIT", "must be in range [1, 100]"));
        }

        if self.timeout_secs == 0 {
            return Err(invalid_value("REDDIT_TIMEOUT_SECS", "must be greater than zero"));
        }

        Ok(())
    }
}

/// Name of a subreddit without the `r/` prefix
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display, Deserialize)]
#[serde(try_from = "String")]
pub(crate) struct Subreddit(String);

impl Subreddit {
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid subreddit name '{name}': only ASCII letters, digits and underscores are allowed")]
pub(crate) struct InvalidSubreddit {
    name: String,
}

impl FromStr for Subreddit {
    type Err = InvalidSubreddit;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let name = trimmed.strip_prefix("r/").unwrap_or(trimmed);

        let is_valid = !name.is_empty()
            && name
                .chars()
                .all(|char| char.is_ascii_alphanumeric() || char == '_');

        if !is_valid {
            return Err(InvalidSubreddit {
                name: input.to_owned(),
            });
        }

        Ok(Self(name.to_owned()))
    }
}

impl TryFrom<String> for Subreddit {
    type Error = InvalidSubreddit;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
