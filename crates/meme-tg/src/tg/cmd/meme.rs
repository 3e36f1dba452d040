use crate::posting::{MediaKind, Post, Selector};
use crate::prelude::*;
use crate::tg::reply::Reply;
use crate::Result;
use futures::prelude::*;
use std::panic::AssertUnwindSafe;

pub(crate) const NO_MEME: &str = "Sorry, I couldn't fetch a meme right now. \
    Reddit might be unreachable. Please try again later! 😅";

pub(crate) const GENERIC_FAILURE: &str =
    "Oops! Something went wrong while fetching your meme. Please try again! 🤖";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
enum Outcome {
    Delivered(MediaKind),
    TextFallback,
    NoResult,
    Failure,
}

impl Outcome {
    fn label(self) -> &'static str {
        match self {
            Self::Delivered(kind) => kind.into(),
            other => other.into(),
        }
    }
}

/// Replies with a random meme. Never fails: if anything goes wrong the user
/// gets an apology instead of the meme.
pub(crate) async fn handle(reply: &dyn Reply, selector: &Selector) {
    let result = AssertUnwindSafe(deliver_random_meme(reply, selector))
        .catch_unwind()
        .await;

    let outcome = match result {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(err)) => {
            warn!(
                err = tracing_err(&err),
                err_id = err.id(),
                "Failed to deliver a meme"
            );
            apologize(reply).await
        }
        Err(payload) => {
            error!(
                panic = crate::util::panic_message(&*payload),
                "Meme delivery panicked"
            );
            apologize(reply).await
        }
    };

    metrics::increment_counter!("memes_total", "outcome" => outcome.label());
}

async fn apologize(reply: &dyn Reply) -> Outcome {
    if let Err(err) = reply.text(GENERIC_FAILURE.to_owned()).await {
        warn!(
            err = tracing_err(&err),
            "Failed to reply with the error message to the user"
        );
    }
    Outcome::Failure
}

async fn deliver_random_meme(reply: &dyn Reply, selector: &Selector) -> Result<Outcome> {
    reply.upload_photo_action().await?;

    let Some(post) = selector.random_post().await else {
        reply.text(NO_MEME.to_owned()).await?;
        return Ok(Outcome::NoResult);
    };

    deliver_post(reply, &post).await
}

async fn deliver_post(reply: &dyn Reply, post: &Post) -> Result<Outcome> {
    let caption = post.caption();
    let kind = post.media_kind();

    info!(
        url = %post.url,
        permalink = %post.permalink,
        subreddit = %post.subreddit,
        %kind,
        "Sending meme"
    );

    let sent = match kind {
        MediaKind::Video => reply.video(&post.url, caption.clone()).await,
        MediaKind::Photo => reply.photo(&post.url, caption.clone()).await,
    };

    let Err(err) = sent else {
        return Ok(Outcome::Delivered(kind));
    };

    warn!(
        err = tracing_err(&err),
        url = %post.url,
        "Failed to send media, falling back to a link"
    );

    reply.text(format!("{caption}\n\nLink: {}", post.url)).await?;

    Ok(Outcome::TextFallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fatal;
    use crate::posting::fetch::tests::{raw_post, MockListingApi};
    use crate::posting::reddit::api::RawPost;
    use crate::posting::Fetcher;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Sent {
        UploadPhotoAction,
        Text(String),
        Photo { url: String, caption: String },
        Video { url: String, caption: String },
    }

    /// Records the replies. The configured kinds of replies fail as if
    /// Telegram rejected them.
    #[derive(Default)]
    struct MockReply {
        sent: Mutex<Vec<Sent>>,
        fail_media: bool,
        fail_action: bool,
    }

    impl MockReply {
        fn record(&self, sent: Sent) {
            self.sent.lock().unwrap().push(sent);
        }

        fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }

        fn media_result(&self) -> Result {
            if self.fail_media {
                return Err(fatal!("Bad Request: wrong file identifier/HTTP URL specified"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Reply for MockReply {
        async fn upload_photo_action(&self) -> Result {
            if self.fail_action {
                return Err(fatal!("Forbidden: bot was blocked by the user"));
            }
            self.record(Sent::UploadPhotoAction);
            Ok(())
        }

        async fn text(&self, text: String) -> Result {
            self.record(Sent::Text(text));
            Ok(())
        }

        async fn photo(&self, url: &str, caption: String) -> Result {
            self.record(Sent::Photo {
                url: url.to_owned(),
                caption,
            });
            self.media_result()
        }

        async fn video(&self, url: &str, caption: String) -> Result {
            self.record(Sent::Video {
                url: url.to_owned(),
                caption,
            });
            self.media_result()
        }
    }

    fn selector(listings: Vec<(&str, Vec<RawPost>)>) -> Selector {
        let subreddits = listings
            .iter()
            .map(|(name, _)| name.parse().unwrap())
            .collect();

        let api = listings
            .into_iter()
            .fold(MockListingApi::default(), |api, (name, posts)| {
                api.with(name, posts)
            });

        Selector::new(Fetcher::new(Arc::new(api)), subreddits, 50)
    }

    fn cat_post() -> RawPost {
        RawPost {
            title: Some("Cat".to_owned()),
            url: Some("https://i.redd.it/x.jpg".to_owned()),
            permalink: Some("/r/b/1".to_owned()),
            subreddit: Some("b".to_owned()),
        }
    }

    #[test_log::test(tokio::test)]
    async fn photo_from_the_fallback_source() {
        let selector = selector(vec![
            ("a", vec![raw_post("Article", "https://example.com/a.html", "a")]),
            ("b", vec![cat_post()]),
        ]);
        let reply = MockReply::default();

        handle(&reply, &selector).await;

        assert_eq!(
            reply.sent(),
            [
                Sent::UploadPhotoAction,
                Sent::Photo {
                    url: "https://i.redd.it/x.jpg".to_owned(),
                    caption: "Cat\n\nFrom r/b".to_owned(),
                },
            ]
        );
    }

    #[test_log::test(tokio::test)]
    async fn video_urls_are_sent_as_video() {
        let selector = selector(vec![(
            "a",
            vec![raw_post("Clip", "https://v.redd.it/abc", "a")],
        )]);
        let reply = MockReply::default();

        handle(&reply, &selector).await;

        assert_eq!(
            reply.sent(),
            [
                Sent::UploadPhotoAction,
                Sent::Video {
                    url: "https://v.redd.it/abc".to_owned(),
                    caption: "Clip\n\nFrom r/a".to_owned(),
                },
            ]
        );
    }

    #[test_log::test(tokio::test)]
    async fn apology_when_nothing_is_found() {
        let selector = selector(vec![("a", vec![]), ("b", vec![]), ("c", vec![])]);
        let reply = MockReply::default();

        handle(&reply, &selector).await;

        assert_eq!(
            reply.sent(),
            [Sent::UploadPhotoAction, Sent::Text(NO_MEME.to_owned())]
        );
    }

    #[test_log::test(tokio::test)]
    async fn link_when_media_delivery_fails() {
        let selector = selector(vec![("b", vec![cat_post()])]);
        let reply = MockReply {
            fail_media: true,
            ..Default::default()
        };

        handle(&reply, &selector).await;

        let sent = reply.sent();
        assert_eq!(sent.len(), 3, "{sent:#?}");

        let Sent::Text(text) = &sent[2] else {
            panic!("Expected a text reply, got {sent:#?}");
        };

        assert!(text.contains("Cat\n\nFrom r/b"), "{text}");
        assert!(text.contains("https://i.redd.it/x.jpg"), "{text}");
        assert_eq!(text, "Cat\n\nFrom r/b\n\nLink: https://i.redd.it/x.jpg");
    }

    #[test_log::test(tokio::test)]
    async fn generic_apology_on_unexpected_failure() {
        let selector = selector(vec![("b", vec![cat_post()])]);
        let reply = MockReply {
            fail_action: true,
            ..Default::default()
        };

        handle(&reply, &selector).await;

        assert_eq!(reply.sent(), [Sent::Text(GENERIC_FAILURE.to_owned())]);
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(Outcome::Delivered(MediaKind::Photo).label(), "photo");
        assert_eq!(Outcome::Delivered(MediaKind::Video).label(), "video");
        assert_eq!(Outcome::TextFallback.label(), "text_fallback");
        assert_eq!(Outcome::NoResult.label(), "no_result");
        assert_eq!(Outcome::Failure.label(), "failure");
    }
}
