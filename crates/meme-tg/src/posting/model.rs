use crate::posting::reddit::Subreddit;

/// URL suffixes of the media files that can be relayed to the chat
const MEDIA_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".mp4", ".webm"];
const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".webm"];

/// Hosts that serve the media files directly rather than an HTML page around them
const MEDIA_HOSTS: &[&str] = &["i.redd.it", "v.redd.it", "i.imgur.com"];
const VIDEO_HOSTS: &[&str] = &["v.redd.it"];

/// A single media post fetched from the content platform.
/// It lives only for the duration of the request that fetched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Post {
    pub(crate) title: String,

    /// Direct URL of the image or video
    pub(crate) url: String,

    /// Human-readable page of the post
    pub(crate) permalink: String,

    pub(crate) subreddit: Subreddit,
}

impl Post {
    pub(crate) fn caption(&self) -> String {
        format!("{}\n\nFrom r/{}", self.title, self.subreddit)
    }

    /// Kind of media to deliver the post as. Any URL that isn't recognized
    /// as a video is sent as a photo.
    pub(crate) fn media_kind(&self) -> MediaKind {
        MediaKind::from_url(&self.url).unwrap_or(MediaKind::Photo)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub(crate) enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    /// Infers the kind of media from the URL. Returns `None` if the URL
    /// doesn't look like it points to an image or a video.
    pub(crate) fn from_url(url: &str) -> Option<Self> {
        let lowercase = url.to_ascii_lowercase();

        let has_extension = |extensions: &[&str]| {
            extensions
                .iter()
                .any(|extension| lowercase.ends_with(extension))
        };
        let has_host = |hosts: &[&str]| hosts.iter().any(|host| lowercase.contains(host));

        if has_extension(VIDEO_EXTENSIONS) || has_host(VIDEO_HOSTS) {
            return Some(Self::Video);
        }

        if has_extension(MEDIA_EXTENSIONS) || has_host(MEDIA_HOSTS) {
            return Some(Self::Photo);
        }

        None
    }
}

pub(crate) fn is_media_url(url: &str) -> bool {
    MediaKind::from_url(url).is_some()
}
