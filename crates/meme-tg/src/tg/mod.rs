//! Telegram commands root module

mod cmd;
mod config;
mod reply;

use crate::posting::reddit::{self, api};
use crate::posting::{Fetcher, Selector};
use crate::prelude::*;
use crate::{http, Result};
use dptree::di::DependencyMap;
use std::sync::Arc;
use teloxide::adaptors::{CacheMe, Throttle, Trace};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

pub(crate) use config::*;

pub(crate) type Bot = Trace<CacheMe<Throttle<teloxide::Bot>>>;

pub(crate) struct Ctx {
    bot: Bot,
    selector: Selector,
}

pub(crate) struct RunBotOptions {
    pub(crate) tg_cfg: Config,
    pub(crate) reddit_cfg: reddit::Config,
}

pub(crate) async fn run_bot(opts: RunBotOptions) -> Result {
    let mut di = DependencyMap::new();

    let http = http::create_client(opts.reddit_cfg.timeout())?;

    let bot = create_bot(teloxide::Bot::new(opts.tg_cfg.token));

    let reddit = api::Client::new(&opts.reddit_cfg, http);
    let fetcher = Fetcher::new(Arc::new(reddit));
    let selector = Selector::new(
        fetcher,
        opts.reddit_cfg.subreddits,
        opts.reddit_cfg.limit,
    );

    di.insert(Arc::new(Ctx {
        bot: bot.clone(),
        selector,
    }));

    info!("Starting bot...");

    register_commands(&bot).await;

    let handler = dptree::entry()
        .inspect(|update: Update| {
            metrics::increment_counter!(
                "tg_updates_total",
                "kind" => update.kind.discriminator()
            );
        })
        .branch(
            Update::filter_message()
                .filter_command::<cmd::Cmd>()
                .endpoint(cmd::handle::<cmd::Cmd>()),
        )
        .inspect(|update: Update| {
            metrics::increment_counter!(
                "tg_updates_skipped_total",
                "kind" => update.kind.discriminator()
            );
        });

    Dispatcher::builder(bot, handler)
        .dependencies(di)
        // We don't handle all possible messages that users send,
        // so to suppress the warning that we don't do this we have
        // a noop default handler here
        .default_handler(|_| std::future::ready(()))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Bot stopped");

    Ok(())
}

fn create_bot(bot: teloxide::Bot) -> Bot {
    bot.throttle(Default::default())
        .cache_me()
        .trace(teloxide::adaptors::trace::Settings::all())
}

/// The command list only powers the hints in Telegram clients. The bot works
/// without it, so a failure here must not stop the startup.
async fn register_commands(bot: &Bot) {
    if let Err(err) = bot.set_my_commands(cmd::Cmd::bot_commands()).await {
        warn!(
            err = tracing_err(&err),
            "Failed to register the bot commands, continuing without them"
        );
    }
}
