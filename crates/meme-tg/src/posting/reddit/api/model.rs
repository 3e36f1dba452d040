//! Declarations of the subset of the Reddit listing JSON API that is used
//! by the bot. All fields are optional, because Reddit doesn't guarantee
//! their presence for every kind of entry in the listing.
use crate::posting::model::is_media_url;
use crate::posting::reddit::Subreddit;
use crate::posting::Post;
use serde::Deserialize;

const PERMALINK_BASE: &str = "https://reddit.com";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Listing {
    #[serde(default)]
    pub(crate) data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingData {
    #[serde(default)]
    pub(crate) children: Vec<ListingChild>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingChild {
    #[serde(default)]
    pub(crate) data: RawPost,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPost {
    pub(crate) title: Option<String>,
    pub(crate) url: Option<String>,
    pub(crate) permalink: Option<String>,
    pub(crate) subreddit: Option<String>,
}

impl Listing {
    /// Returns the posts that point to an image or a video, in the order
    /// they appear in the listing.
    pub(crate) fn into_media_posts(self, requested: &Subreddit) -> Vec<Post> {
        self.data
            .children
            .into_iter()
            .filter_map(|child| child.data.into_media_post(requested))
            .collect()
    }
}

impl RawPost {
    fn into_media_post(self, requested: &Subreddit) -> Option<Post> {
        let url = self.url.filter(|url| is_media_url(url))?;

        // Reddit always returns a valid subreddit name, but if it doesn't,
        // the one that was requested is good enough for the caption.
        let subreddit = self
            .subreddit
            .and_then(|name| name.parse().ok())
            .unwrap_or_else(|| requested.clone());

        Some(Post {
            title: self.title.unwrap_or_else(|| "No title".to_owned()),
            url,
            permalink: format!("{PERMALINK_BASE}{}", self.permalink.unwrap_or_default()),
            subreddit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    fn media_posts(json: &str) -> Vec<Post> {
        let listing: Listing = serde_json::from_str(json).unwrap();
        listing.into_media_posts(&"requested".parse().unwrap())
    }

    #[test]
    fn only_media_entries_are_kept_in_order() {
        let posts = media_posts(
            r#"{
                "kind": "Listing",
                "data": {
                    "after": "t3_xyz",
                    "children": [
                        { "kind": "t3", "data": { "title": "First", "url": "https://i.redd.it/1.png", "permalink": "/r/memes/comments/1/first/", "subreddit": "memes", "ups": 10 } },
                        { "kind": "t3", "data": { "title": "Text post", "url": "https://www.reddit.com/r/memes/comments/2/text/", "permalink": "/r/memes/comments/2/text/", "subreddit": "memes" } },
                        { "kind": "t3", "data": { "title": "Article", "url": "https://example.com/article.html", "permalink": "/r/memes/comments/3/article/", "subreddit": "memes" } },
                        { "kind": "t3", "data": { "title": "Second", "url": "https://v.redd.it/2", "permalink": "/r/memes/comments/4/second/", "subreddit": "memes" } }
                    ]
                }
            }"#,
        );

        expect![[r#"
            [
                Post {
                    title: "First",
                    url: "https://i.redd.it/1.png",
                    permalink: "https://reddit.com/r/memes/comments/1/first/",
                    subreddit: Subreddit(
                        "memes",
                    ),
                },
                Post {
                    title: "Second",
                    url: "https://v.redd.it/2",
                    permalink: "https://reddit.com/r/memes/comments/4/second/",
                    subreddit: Subreddit(
                        "memes",
                    ),
                },
            ]
        "#]]
        .assert_debug_eq(&posts);
    }

    #[test]
    fn missing_fields_have_defaults() {
        let posts = media_posts(
            r#"{ "data": { "children": [
                { "data": { "url": "https://i.imgur.com/abc.gif" } },
                { "data": { "title": "No URL" } },
                {}
            ] } }"#,
        );

        assert_eq!(
            posts,
            [Post {
                title: "No title".to_owned(),
                url: "https://i.imgur.com/abc.gif".to_owned(),
                permalink: "https://reddit.com".to_owned(),
                subreddit: "requested".parse().unwrap(),
            }]
        );
    }

    #[test]
    fn empty_listing_shapes() {
        assert!(media_posts("{}").is_empty());
        assert!(media_posts(r#"{ "data": {} }"#).is_empty());
        assert!(media_posts(r#"{ "data": { "children": [] } }"#).is_empty());
    }

    #[test]
    fn malformed_listing_is_an_error() {
        assert!(serde_json::from_str::<Listing>(r#"{ "data": { "children": 42 } }"#).is_err());
        assert!(serde_json::from_str::<Listing>("<html>Too many requests</html>").is_err());
    }
}
