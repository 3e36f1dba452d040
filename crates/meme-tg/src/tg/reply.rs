use crate::prelude::*;
use crate::tg::Bot;
use crate::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, InputFile, MessageId};
use url::Url;

/// Replies to the message that triggered a command
#[async_trait]
pub(crate) trait Reply: Send + Sync {
    /// Shows that the bot is working on the reply. The indicator goes away
    /// as soon as the reply is sent.
    async fn upload_photo_action(&self) -> Result;

    async fn text(&self, text: String) -> Result;

    async fn photo(&self, url: &str, caption: String) -> Result;

    async fn video(&self, url: &str, caption: String) -> Result;
}

pub(crate) struct TgReply {
    bot: Bot,
    chat_id: ChatId,
    reply_to: MessageId,
}

impl TgReply {
    pub(crate) fn new(bot: Bot, msg: &Message) -> Self {
        Self {
            bot,
            chat_id: msg.chat.id,
            reply_to: msg.id,
        }
    }
}

#[async_trait]
impl Reply for TgReply {
    async fn upload_photo_action(&self) -> Result {
        self.bot
            .send_chat_action(self.chat_id, ChatAction::UploadPhoto)
            .await?;
        Ok(())
    }

    async fn text(&self, text: String) -> Result {
        self.bot
            .reply_text(self.chat_id, self.reply_to, text)
            .await?;
        Ok(())
    }

    async fn photo(&self, url: &str, caption: String) -> Result {
        let photo = InputFile::url(parse_media_url(url)?);
        self.bot
            .reply_photo(self.chat_id, self.reply_to, photo, caption)
            .await?;
        Ok(())
    }

    async fn video(&self, url: &str, caption: String) -> Result {
        let video = InputFile::url(parse_media_url(url)?);
        self.bot
            .reply_video(self.chat_id, self.reply_to, video, caption)
            .await?;
        Ok(())
    }
}

fn parse_media_url(url: &str) -> Result<Url> {
    Url::parse(url).fatal_ctx(|| format!("Invalid media URL: {url}"))
}
