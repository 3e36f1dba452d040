use crate::posting::reddit::Subreddit;
use crate::posting::{Fetcher, Post};
use crate::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks a random post from a random source, falling back to the other
/// sources if the first one has nothing to offer.
pub(crate) struct Selector {
    fetcher: Fetcher,
    subreddits: Vec<Subreddit>,
    limit: u32,
}

impl Selector {
    pub(crate) fn new(fetcher: Fetcher, subreddits: Vec<Subreddit>, limit: u32) -> Self {
        Self {
            fetcher,
            subreddits,
            limit,
        }
    }

    pub(crate) async fn random_post(&self) -> Option<Post> {
        // A new generator per request. There is no shared state between
        // concurrently handled commands this way.
        let mut rng = StdRng::from_entropy();
        self.random_post_with(&mut rng).await
    }

    /// Every source is requested at most once. The post is chosen uniformly
    /// from the list of the first source that returned a non-empty one.
    /// Candidates from different sources are never mixed together.
    pub(crate) async fn random_post_with<R: Rng + Send>(&self, rng: &mut R) -> Option<Post> {
        if self.subreddits.is_empty() {
            return None;
        }

        let first = rng.gen_range(0..self.subreddits.len());

        for subreddit in fallback_order(&self.subreddits, first) {
            if subreddit != &self.subreddits[first] {
                info!(%subreddit, "Trying backup subreddit");
            } else {
                info!(%subreddit, "Fetching meme");
            }

            let mut posts = self.fetcher.fetch_media_posts(subreddit, self.limit).await;

            if posts.is_empty() {
                continue;
            }

            let index = rng.gen_range(0..posts.len());
            return Some(posts.swap_remove(index));
        }

        warn!("No media posts were found in any of the subreddits");

        None
    }
}

/// The randomly chosen source goes first, then the rest of them in the
/// order they are configured.
fn fallback_order(subreddits: &[Subreddit], first: usize) -> impl Iterator<Item = &Subreddit> {
    let rest = subreddits
        .iter()
        .enumerate()
        .filter(move |&(i, _)| i != first)
        .map(|(_, subreddit)| subreddit);

    subreddits.get(first).into_iter().chain(rest)
}
