//! Rust analyzer is very slow on processing requester extension here, so extracted
//! it to a separate module to limit the scope of analysis.

use easy_ext::ext;
use teloxide::payloads::setters::*;
use teloxide::requests::Requester;
use teloxide::types::{ChatId, InputFile, MessageId};

/// There is [`RequesterExt`](teloxide::prelude::RequesterExt) in [`teloxide::prelude`].
/// We name this symbol different to avoid collisions.
#[ext(UtilRequesterExt)]
pub(crate) impl<T: Requester> T {
    /// Send a text message to the chat as a reply to the given message.
    /// If the original message was deleted, the reply is sent anyway.
    fn reply_text(
        &self,
        chat_id: ChatId,
        reply_to: MessageId,
        text: impl Into<String>,
    ) -> Self::SendMessage {
        self.send_message(chat_id, text)
            .reply_to_message_id(reply_to)
            .allow_sending_without_reply(true)
    }

    fn reply_photo(
        &self,
        chat_id: ChatId,
        reply_to: MessageId,
        photo: InputFile,
        caption: impl Into<String>,
    ) -> Self::SendPhoto {
        self.send_photo(chat_id, photo)
            .caption(caption)
            .reply_to_message_id(reply_to)
            .allow_sending_without_reply(true)
    }

    fn reply_video(
        &self,
        chat_id: ChatId,
        reply_to: MessageId,
        video: InputFile,
        caption: impl Into<String>,
    ) -> Self::SendVideo {
        self.send_video(chat_id, video)
            .caption(caption)
            .reply_to_message_id(reply_to)
            .allow_sending_without_reply(true)
    }
}
