mod meme;

use crate::prelude::*;
use crate::tg::reply::TgReply;
use crate::util::DynResult;
use crate::{tg, Result};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use teloxide::macros::BotCommands;
use teloxide::types::{Message, User};

const GREETING: &str = "Hi! Send /meme to get a random meme.";

/// Sent when a command handler returns an error. The meme flow has its own
/// apology and never gets here.
const COMMAND_FAILURE: &str = "Oops! Something went wrong. Please try again! 🤖";

#[async_trait]
pub(crate) trait Command: fmt::Debug + Send + Sync + 'static {
    async fn handle(self, ctx: &tg::Ctx, msg: &Message) -> Result;
}

pub(crate) fn handle<'a, C: Command>(
) -> impl Fn(Arc<tg::Ctx>, Message, C) -> BoxFuture<'a, DynResult> {
    move |ctx, msg, cmd| {
        let info = info_span!(
            "handle_message",
            sender = msg.from().map(User::debug_id).as_deref(),
            chat = %msg.chat.debug_id(),
            cmd = ?cmd,
        );

        let fut = async move {
            debug!("Processing command");

            metrics::increment_counter!("tg_commands_total", "cmd" => format!("{cmd:?}"));

            let result = cmd.handle(&ctx, &msg).await;
            if let Err(err) = &result {
                let span = warn_span!("err", err = tracing_err(err), id = err.id());
                async {
                    warn!("Command handler returned an error");

                    let msg_result = ctx
                        .bot
                        .reply_text(msg.chat.id, msg.id, COMMAND_FAILURE)
                        .await;

                    if let Err(err) = msg_result {
                        warn!(
                            err = tracing_err(&err),
                            "Failed to reply with the error message to the user"
                        );
                    }
                }
                .instrument(span)
                .await;
            }
            result.map_err(Into::into)
        };

        Box::pin(fut.instrument(info))
    }
}

#[derive(BotCommands, Clone, Debug)]
#[command(
    rename_rule = "lowercase",
    description = "The following commands are available:"
)]
pub(crate) enum Cmd {
    #[command(description = "show the greeting")]
    Start,

    #[command(description = "get a random meme")]
    Meme,
}

#[async_trait]
impl Command for Cmd {
    async fn handle(self, ctx: &tg::Ctx, msg: &Message) -> Result {
        match self {
            Cmd::Start => {
                ctx.bot.reply_text(msg.chat.id, msg.id, GREETING).await?;
            }
            Cmd::Meme => {
                let reply = TgReply::new(ctx.bot.clone(), msg);
                meme::handle(&reply, &ctx.selector).await;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::utils::command::BotCommands as _;

    #[test]
    fn command_parsing() {
        assert_matches::assert_matches!(Cmd::parse("/start", "meme_bot"), Ok(Cmd::Start));
        assert_matches::assert_matches!(Cmd::parse("/meme", "meme_bot"), Ok(Cmd::Meme));
        assert_matches::assert_matches!(Cmd::parse("/meme@meme_bot", "meme_bot"), Ok(Cmd::Meme));
        assert!(Cmd::parse("/meme@other_bot", "meme_bot").is_err());
        assert!(Cmd::parse("/unknown", "meme_bot").is_err());
    }

    #[test]
    fn command_descriptions() {
        let descriptions = Cmd::descriptions().to_string();

        assert!(descriptions.starts_with("The following commands are available:"));
        assert!(descriptions.contains("/start"), "{descriptions}");
        assert!(descriptions.contains("/meme"), "{descriptions}");
        assert!(descriptions.contains("get a random meme"), "{descriptions}");
    }

    #[test]
    fn command_failure_is_not_about_memes() {
        assert!(!COMMAND_FAILURE.to_lowercase().contains("meme"));
        assert_ne!(COMMAND_FAILURE, meme::GENERIC_FAILURE);
    }
}
