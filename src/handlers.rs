pub mod callback_handler;
pub mod command_handler;
pub mod message_handler;

pub use callback_handler::callback_handler;
pub use command_handler::Command;
pub use message_handler::message_handler;

use crate::{
    controller::{Controller, Incoming, Reply, MENU_PROMPT},
    error::Result,
    types::DataKind,
};
use std::sync::Arc;
use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, LinkPreviewOptions, ParseMode},
};
use tokio::time;

/// Runs one update in its own task under the controller's deadline.
///
/// Whatever happens inside, including a panic, ends here in the log so the
/// dispatcher keeps serving other updates.
async fn process(bot: Bot, controller: Arc<Controller>, incoming: Incoming) -> ResponseResult<()> {
    let chat = incoming.chat();
    let budget = controller.update_timeout();

    let task = tokio::spawn(async move {
        time::timeout(budget, async {
            let replies = controller.handle(incoming).await?;
            deliver(&bot, chat, replies).await
        })
        .await
    });

    match task.await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => log::error!("failed to handle an update from {}: {}", chat, e),
        Ok(Err(_)) => log::warn!("gave up on an update from {} after {:?}", chat, budget),
        Err(e) if e.is_panic() => log::error!("handler panicked on an update from {}: {}", chat, e),
        Err(e) => log::error!("update task for {} did not finish: {}", chat, e),
    }

    Ok(())
}

async fn deliver(bot: &Bot, chat: ChatId, replies: Vec<Reply>) -> Result<()> {
    for reply in replies {
        match reply {
            Reply::Text(text) => {
                bot.send_message(chat, text).await?;
            }
            Reply::Html(text) => {
                bot.send_message(chat, text)
                    .parse_mode(ParseMode::Html)
                    .link_preview_options(no_link_preview())
                    .await?;
            }
            Reply::Menu => {
                bot.send_message(chat, MENU_PROMPT)
                    .reply_markup(menu_keyboard())
                    .await?;
            }
            Reply::AnswerCallback(id) => {
                if let Err(e) = bot.answer_callback_query(id).await {
                    log::warn!("failed to answer a callback query from {}: {}", chat, e);
                }
            }
        }
    }
    Ok(())
}

/// follows / moders on the first row, vips / founders on the second.
pub fn menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(DataKind::ALL.chunks(2).map(|row| {
        row.iter()
            .map(|kind| InlineKeyboardButton::callback(kind.label(), kind.label()))
            .collect::<Vec<_>>()
    }))
}

fn no_link_preview() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}

#[cfg(test)]
mod handlers_test {
    use super::*;
    use crate::{
        controller::Context,
        fetcher::{FetchError, Fetcher},
        session::SessionStore,
        types::{Follow, Founder, Mod, Vip},
    };
    use async_trait::async_trait;
    use std::time::Duration;
    use teloxide::types::InlineKeyboardButtonKind;
    use tokio::time::Instant;

    const CHAT: ChatId = ChatId(42);

    enum Broken {
        Panics,
        Stalls,
    }

    impl Broken {
        async fn answer<T>(&self) -> std::result::Result<Vec<T>, FetchError> {
            match self {
                Broken::Panics => panic!("upstream exploded"),
                Broken::Stalls => {
                    time::sleep(Duration::from_secs(30)).await;
                    Ok(vec![])
                }
            }
        }
    }

    #[async_trait]
    impl Fetcher for Broken {
        async fn fetch_follows(&self, _: &str) -> std::result::Result<Vec<Follow>, FetchError> {
            self.answer().await
        }
        async fn fetch_mods(&self, _: &str) -> std::result::Result<Vec<Mod>, FetchError> {
            self.answer().await
        }
        async fn fetch_vips(&self, _: &str) -> std::result::Result<Vec<Vip>, FetchError> {
            self.answer().await
        }
        async fn fetch_founders(&self, _: &str) -> std::result::Result<Vec<Founder>, FetchError> {
            self.answer().await
        }
    }

    /// Sends a channel name to a chat that has just pressed "vips".
    async fn run_pending_update(
        fetcher: Broken,
        budget: Duration,
    ) -> (ResponseResult<()>, Duration, SessionStore) {
        let sessions = SessionStore::new();
        let controller = Arc::new(Controller::new(
            Context::new(Arc::new(fetcher), sessions.clone(), "twitchkitbot"),
            budget,
        ));
        sessions.begin(CHAT, DataKind::Vips).await;

        let started = Instant::now();
        let result = process(
            Bot::new("1:x"),
            controller,
            Incoming::Text {
                chat: CHAT,
                text: "alice".to_string(),
            },
        )
        .await;
        (result, started.elapsed(), sessions)
    }

    #[tokio::test]
    async fn panic_is_contained_test() {
        let (result, elapsed, sessions) =
            run_pending_update(Broken::Panics, Duration::from_secs(5)).await;
        assert!(result.is_ok());
        assert!(elapsed < Duration::from_secs(5));
        assert!(!sessions.is_awaiting(CHAT).await);
        assert_eq!(sessions.len().await, 0);
    }

    #[tokio::test]
    async fn slow_update_is_abandoned_test() {
        let budget = Duration::from_millis(200);
        let (result, elapsed, sessions) = run_pending_update(Broken::Stalls, budget).await;
        assert!(result.is_ok());
        assert!(elapsed >= budget);
        assert!(elapsed < Duration::from_secs(5));
        assert_eq!(sessions.len().await, 0);
    }

    #[test]
    fn menu_keyboard_test() {
        let keyboard = menu_keyboard();
        let rows = keyboard
            .inline_keyboard
            .iter()
            .map(|row| {
                row.iter()
                    .map(|b| match &b.kind {
                        InlineKeyboardButtonKind::CallbackData(data) => {
                            assert_eq!(data, &b.text);
                            b.text.as_str()
                        }
                        other => panic!("unexpected button kind {:?}", other),
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        assert_eq!(
            rows,
            vec![vec!["follows", "moders"], vec!["vips", "founders"]]
        );
    }

    #[test]
    fn no_link_preview_test() {
        assert!(no_link_preview().is_disabled);
    }
}
